/// Data layer: core types, loading, reconciliation and filtering.
///
/// Architecture:
/// ```text
///  epi_r.csv        All_Diets.csv
///      │                  │
///      ▼                  ▼
///   ┌────────────────────────┐
///   │  loader                 │  parse file → Table
///   └────────────────────────┘
///               │
///               ▼
///   ┌────────────────────────┐
///   │  reconcile              │  dedup, rename, normalize title, inner join
///   └────────────────────────┘
///               │
///               ▼
///   ┌────────────────────────┐
///   │  combined Table         │  immutable for the life of the process
///   └────────────────────────┘
///               │
///               ▼
///   ┌────────────────────────┐
///   │  filter                 │  cuisine + calorie range → row indices
///   └────────────────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod reconcile;
