// The primary purpose of this file will be to expose the modules for the main.rs and integration tests.
pub mod archiver;
pub mod chunk_writer;
pub mod chunkifier;
pub mod cli;
pub mod config;
pub mod consts;
pub mod errors;
pub mod estimator;
pub mod output_store;
pub mod pdf_extractor;
pub mod runner;
pub mod sample;
pub mod types;
pub mod ui;
pub mod utils;
