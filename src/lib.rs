pub mod analyzer;
pub mod config;
pub mod fetcher;
pub mod indicators;
pub mod indices;
pub mod model;
pub mod storage;
pub mod utils;
