// src/data_input/mod.rs

pub mod block_extractor;
pub mod channel_table;

// src/data_input/mod.rs
