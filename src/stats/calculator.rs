//! Statistics Calculator Module
//! Means, ranges, histogram bins and correlation matrices.

use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

/// One equal-width histogram bin, `[start, end)` except the last which is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Mean of the present values, NaN when there are none.
    pub fn mean(values: &[Option<f64>]) -> f64 {
        values.iter().flatten().mean()
    }

    /// Minimum and maximum of the present values.
    pub fn min_max(values: &[Option<f64>]) -> Option<(f64, f64)> {
        values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Pearson correlation over rows where both values are present.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y.iter())
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .unzip();

        if xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }
        xs.iter().covariance(ys.iter()) / (sx * sy)
    }

    /// Full correlation matrix, pairs computed in parallel.
    pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
        let n = columns.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i..n).map(move |j| (i, j)))
            .collect();

        let values: Vec<((usize, usize), f64)> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let r = if i == j {
                    // A column with any variance is perfectly correlated with itself.
                    let self_r = Self::pearson(&columns[i], &columns[i]);
                    if self_r.is_nan() {
                        f64::NAN
                    } else {
                        1.0
                    }
                } else {
                    Self::pearson(&columns[i], &columns[j])
                };
                ((i, j), r)
            })
            .collect();

        let mut matrix = vec![vec![f64::NAN; n]; n];
        for ((i, j), r) in values {
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
        matrix
    }

    /// Split present values into `bins` equal-width bins over `[min, max]`.
    pub fn histogram(values: &[Option<f64>], bins: usize) -> Vec<HistogramBin> {
        let Some((min, max)) = Self::min_max(values) else {
            return Vec::new();
        };
        let bins = bins.max(1);

        // A constant column gets a single unit-wide bin.
        if min == max {
            let count = values.iter().flatten().count();
            return vec![HistogramBin {
                start: min - 0.5,
                end: max + 0.5,
                count,
            }];
        }

        let width = (max - min) / bins as f64;
        let mut result: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                start: min + i as f64 * width,
                end: if i + 1 == bins {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                count: 0,
            })
            .collect();

        for &v in values.iter().flatten() {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            result[idx].count += 1;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn mean_skips_missing() {
        let v = vec![Some(1.0), None, Some(3.0)];
        assert_eq!(StatsCalculator::mean(&v), 2.0);
        assert!(StatsCalculator::mean(&[None]).is_nan());
    }

    #[test]
    fn pearson_detects_linear_relations() {
        let x = some(&[1.0, 2.0, 3.0, 4.0]);
        let y = some(&[2.0, 4.0, 6.0, 8.0]);
        let z = some(&[8.0, 6.0, 4.0, 2.0]);
        assert!((StatsCalculator::pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!((StatsCalculator::pearson(&x, &z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let x = vec![Some(1.0), Some(2.0), None, Some(4.0)];
        let y = vec![Some(1.0), Some(2.0), Some(100.0), Some(4.0)];
        assert!((StatsCalculator::pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let cols = vec![
            some(&[1.0, 2.0, 3.0, 5.0]),
            some(&[3.0, 1.0, 4.0, 1.0]),
            some(&[2.0, 7.0, 1.0, 8.0]),
        ];
        let m = StatsCalculator::correlation_matrix(&cols);
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert_eq!(m[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i]);
                assert!(m[i][j] <= 1.0 + 1e-12 && m[i][j] >= -1.0 - 1e-12);
            }
        }
    }

    #[test]
    fn constant_column_has_undefined_correlation() {
        let cols = vec![some(&[1.0, 1.0, 1.0]), some(&[1.0, 2.0, 3.0])];
        let m = StatsCalculator::correlation_matrix(&cols);
        assert!(m[0][0].is_nan());
        assert!(m[0][1].is_nan());
        assert_eq!(m[1][1], 1.0);
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let values = some(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let bins = StatsCalculator::histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 11);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 10.0);
        assert_eq!(bins[4].count, 3); // 8, 9 and the closed upper edge 10
    }

    #[test]
    fn histogram_of_constant_column_is_single_bin() {
        let bins = StatsCalculator::histogram(&some(&[4.0, 4.0]), 20);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert!(StatsCalculator::histogram(&[None], 20).is_empty());
    }
}
