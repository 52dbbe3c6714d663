pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use crate::config::PipelineConfig;
pub use crate::error::{ProcessingError, Result};
pub use crate::pipeline::{Pipeline, RunReport};
