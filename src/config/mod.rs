//! Configuration module for Spinneret
//!
//! Handles loading, parsing, and validating TOML configuration files, and
//! defines the option types the crawl engine is built from.
//!
//! # Example
//!
//! ```no_run
//! use spinneret::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Follow behavior: {:?}", config.crawler.follow);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, CrawlerConfig, FollowBehavior, ProgressConfig, UserAgentConfig};
pub use validation::validate;
