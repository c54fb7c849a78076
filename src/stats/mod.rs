//! Statistics module - Aggregates feeding the chart builders

mod calculator;

pub use calculator::{HistogramBin, StatsCalculator};
