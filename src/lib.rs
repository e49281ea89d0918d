// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod generator;
pub mod model;
pub mod storage;

pub use config::Config;
pub use generator::{Generator, RunReport};
