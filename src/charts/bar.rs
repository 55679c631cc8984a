use std::collections::HashMap;

use serde_json::json;

use super::{ChartKind, ChartSpec};
use crate::data::filter::{Subset, CUISINE};

pub const TITLE: &str = "Number of Recipes by Cuisine";

/// Row count per cuisine in first-appearance order. Rows without a cuisine
/// are not counted.
pub fn count_by_cuisine(subset: &Subset<'_>) -> Vec<(String, usize)> {
    let Some(cuisines) = subset.column(CUISINE) else {
        return Vec::new();
    };
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();
    for value in cuisines.filter(|v| !v.is_null()) {
        let key = value.to_string();
        match slot.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts
}

/// One bar per cuisine present in the subset, height = number of recipes.
pub fn bar_chart(subset: &Subset<'_>) -> ChartSpec {
    let values: Vec<_> = count_by_cuisine(subset)
        .into_iter()
        .map(|(cuisine, count)| json!({ CUISINE: cuisine, "count": count }))
        .collect();

    ChartSpec::new(
        ChartKind::Bar,
        TITLE,
        json!({
            "data": { "values": values },
            "mark": "bar",
            "encoding": {
                "x": { "field": CUISINE, "type": "nominal", "sort": null },
                "y": { "field": "count", "type": "quantitative", "title": "Number of recipes" },
                "tooltip": [
                    { "field": CUISINE, "type": "nominal" },
                    { "field": "count", "type": "quantitative" }
                ]
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::CALORIES;
    use crate::data::model::{CellValue, Table};

    fn table() -> Table {
        let s = |v: &str| CellValue::String(v.to_string());
        Table::new(
            vec!["title".into(), CUISINE.into(), CALORIES.into()],
            vec![
                vec![s("a"), s("italian"), CellValue::Integer(1)],
                vec![s("b"), s("french"), CellValue::Integer(2)],
                vec![s("c"), s("italian"), CellValue::Integer(3)],
                vec![s("d"), CellValue::Null, CellValue::Integer(4)],
            ],
        )
    }

    #[test]
    fn one_bar_per_distinct_cuisine() {
        let t = table();
        let idx: Vec<usize> = (0..t.len()).collect();
        let sub = Subset::new(&t, &idx);
        assert_eq!(
            count_by_cuisine(&sub),
            vec![("italian".to_string(), 2), ("french".to_string(), 1)]
        );
        let chart = bar_chart(&sub);
        assert_eq!(chart.data_len(), t.unique_values(CUISINE).len());
        assert_eq!(chart.vega_lite["data"]["values"][0]["count"], 2);
        assert_eq!(chart.title, TITLE);
    }

    #[test]
    fn single_cuisine_subset_has_one_bar() {
        let t = table();
        let idx = vec![0, 2];
        let chart = bar_chart(&Subset::new(&t, &idx));
        assert_eq!(chart.data_len(), 1);
        assert!(!chart.is_placeholder());
    }

    #[test]
    fn empty_subset_has_no_bars() {
        let t = table();
        let chart = bar_chart(&Subset::new(&t, &[]));
        assert_eq!(chart.data_len(), 0);
    }
}
