// src/data_analysis/mod.rs

pub mod reference_normalizer;
pub mod results_packager;
pub mod windowed_regression;

// src/data_analysis/mod.rs
