pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::config::{toml_config::ProbeFileConfig, Settings};
pub use crate::core::{harness::SmokeHarness, probe::HttpProbe, report::RunReport};
pub use crate::utils::error::{ProbeError, Result};
