//! Data module - CSV loading, sample generation and column classification

mod dataset;
mod loader;
mod sample;

pub use dataset::Dataset;
#[cfg(test)]
pub use dataset::DatasetSource;
pub use loader::{DataLoader, LoaderError};
#[cfg(test)]
pub use sample::generate_sample;
