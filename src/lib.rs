//! Resume relevance library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod storage;

pub use config::Config;
pub use error::{RelevanceError, Result};
pub use processing::scorer::{MatchResult, RelevanceScorer, Verdict};
