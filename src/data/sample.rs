//! Deterministic sample dataset.

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

const CATEGORIES: [&str; 4] = ["A", "B", "C", "D"];
const DESCRIPTIONS: [&str; 7] = [
    "AI",
    "Data",
    "Python",
    "Streamlit",
    "Visualization",
    "Plotly",
    "Machine Learning",
];

/// Build the sample table: `Category`, `Value1`, `Value2`, `Score`, `Description`.
///
/// Columns are drawn one after another from a single seeded generator, so the
/// same seed and row count always give the same frame.
pub fn generate_sample(seed: u64, rows: usize) -> PolarsResult<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);

    let category: Vec<&str> = (0..rows)
        .map(|_| CATEGORIES[rng.gen_range(0..CATEGORIES.len())])
        .collect();
    let value1: Vec<i64> = (0..rows).map(|_| rng.gen_range(10..100)).collect();
    let value2: Vec<i64> = (0..rows).map(|_| rng.gen_range(20..200)).collect();

    let score = match Normal::new(50.0, 10.0) {
        Ok(normal) => (0..rows).map(|_| rng.sample(normal)).collect::<Vec<f64>>(),
        Err(e) => {
            return Err(PolarsError::ComputeError(
                format!("invalid score distribution: {}", e).into(),
            ))
        }
    };

    let description: Vec<&str> = (0..rows)
        .map(|_| DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())])
        .collect();

    DataFrame::new(vec![
        Column::new("Category".into(), category),
        Column::new("Value1".into(), value1),
        Column::new("Value2".into(), value2),
        Column::new("Score".into(), score),
        Column::new("Description".into(), description),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, DatasetSource};

    #[test]
    fn same_seed_gives_identical_frames() {
        let a = generate_sample(42, 100).unwrap();
        let b = generate_sample(42, 100).unwrap();
        assert!(a.equals(&b));
        assert_eq!(a.get_column_names(), b.get_column_names());
    }

    #[test]
    fn different_seed_changes_values() {
        let a = generate_sample(42, 100).unwrap();
        let b = generate_sample(7, 100).unwrap();
        assert!(!a.equals(&b));
    }

    #[test]
    fn sample_shape_and_bounds() {
        let df = generate_sample(42, 100).unwrap();
        assert_eq!(df.height(), 100);

        let ds = Dataset::new(df, DatasetSource::Sample { seed: 42 });
        assert_eq!(
            ds.all_columns(),
            ["Category", "Value1", "Value2", "Score", "Description"]
        );
        assert_eq!(ds.numeric_columns(), ["Value1", "Value2", "Score"]);
        assert_eq!(ds.text_columns(), ["Category", "Description"]);

        for v in ds.numeric_values("Value1").unwrap().into_iter().flatten() {
            assert!((10.0..100.0).contains(&v));
        }
        for v in ds.numeric_values("Value2").unwrap().into_iter().flatten() {
            assert!((20.0..200.0).contains(&v));
        }
        for c in ds.text_values("Category").unwrap().into_iter().flatten() {
            assert!(CATEGORIES.contains(&c.as_str()));
        }
        for d in ds.text_values("Description").unwrap().into_iter().flatten() {
            assert!(DESCRIPTIONS.contains(&d.as_str()));
        }
    }
}
