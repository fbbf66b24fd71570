//! Process-level helpers shared by hosts embedding the pipeline.

pub mod utils;
