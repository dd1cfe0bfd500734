// src/plot_functions/mod.rs

pub mod plot_fit_lines;

// src/plot_functions/mod.rs
