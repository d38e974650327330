pub mod boundary;
pub mod bump;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod output;
pub mod resolver;
pub mod ui;

pub use error::{Result, TaggerError};
