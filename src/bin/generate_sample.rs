//! Writes `epi_r.csv` and `All_Diets.csv` sample datasets into the directory
//! given as the first argument (default: current directory).

use std::path::PathBuf;

const CUISINES: &[&str] = &["italian", "french", "indian", "mexican", "chinese", "american"];
const DIETS: &[&str] = &["vegan", "paleo", "keto", "mediterranean", "dash"];
const ADJECTIVES: &[&str] = &["Roasted", "Spicy", "Creamy", "Grilled", "Smoky", "Lemony", "Crispy"];
const DISHES: &[&str] = &["Chicken", "Lentil Soup", "Salmon", "Tofu Bowl", "Pasta", "Tacos", "Curry"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// The same title as the other file would spell it: different case and
/// stray whitespace, so the join has something to normalize.
fn scramble(title: &str, rng: &mut SimpleRng) -> String {
    match rng.next_u64() % 3 {
        0 => title.to_lowercase(),
        1 => format!("  {} ", title.to_uppercase()),
        _ => title.to_string(),
    }
}

fn main() {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut rng = SimpleRng::new(42);

    let titles: Vec<String> = ADJECTIVES
        .iter()
        .flat_map(|a| DISHES.iter().map(move |d| format!("{a} {d}")))
        .collect();

    // ---- healthy-diet dataset ----
    let healthy_path = out_dir.join("epi_r.csv");
    let mut healthy = csv::Writer::from_path(&healthy_path).expect("Failed to create epi_r.csv");
    healthy
        .write_record(["title", "rating", "calories", "protein", "fat", "sodium", "vegetarian", "date"])
        .expect("Failed to write header");

    let mut healthy_rows = 0;
    for (i, title) in titles.iter().enumerate() {
        let calories = rng.range(80.0, 2400.0).round();
        let record = [
            title.clone(),
            format!("{:.3}", rng.range(0.0, 5.0)),
            format!("{calories}"),
            format!("{}", rng.range(0.0, 80.0).round()),
            format!("{}", rng.range(0.0, 120.0).round()),
            format!("{}", rng.range(10.0, 3000.0).round()),
            format!("{}", u8::from(title.contains("Tofu") || title.contains("Lentil"))),
            if i % 9 == 0 {
                String::new()
            } else {
                format!("2024-{:02}-{:02}", 1 + i % 12, 1 + i % 28)
            },
        ];
        healthy.write_record(&record).expect("Failed to write row");
        healthy_rows += 1;
        // exact duplicates for the dedup step
        if i % 10 == 0 {
            healthy.write_record(&record).expect("Failed to write row");
            healthy_rows += 1;
        }
    }
    healthy
        .write_record(["Unmatched Healthy Only", "4.0", "500", "10", "10", "100", "0", ""])
        .expect("Failed to write row");
    healthy_rows += 1;
    healthy.flush().expect("Failed to flush epi_r.csv");

    // ---- epicurious dataset ----
    let epi_path = out_dir.join("All_Diets.csv");
    let mut epi = csv::Writer::from_path(&epi_path).expect("Failed to create All_Diets.csv");
    epi.write_record([
        "Diet_type",
        "Recipe_name",
        "Cuisine_type",
        "Protein(g)",
        "Carbs(g)",
        "Fat(g)",
        "Extraction_day",
        "Extraction_time",
    ])
    .expect("Failed to write header");

    let mut epi_rows = 0;
    for title in &titles {
        // some titles appear under more than one diet
        let variants = 1 + rng.next_u64() % 2;
        for _ in 0..variants {
            epi.write_record([
                rng.pick(DIETS).to_string(),
                scramble(title, &mut rng),
                rng.pick(CUISINES).to_string(),
                format!("{:.2}", rng.range(0.0, 90.0)),
                format!("{:.2}", rng.range(0.0, 200.0)),
                format!("{:.2}", rng.range(0.0, 110.0)),
                "2022-10-16".to_string(),
                "17:20:09".to_string(),
            ])
            .expect("Failed to write row");
            epi_rows += 1;
        }
    }
    epi.flush().expect("Failed to flush All_Diets.csv");

    println!(
        "Wrote {healthy_rows} rows to {} and {epi_rows} rows to {}",
        healthy_path.display(),
        epi_path.display()
    );
}
