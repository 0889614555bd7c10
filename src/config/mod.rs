pub mod toml_config;

use crate::domain::model::ProbeSpec;
use crate::domain::ports::HarnessSettings;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::ProbeFileConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9999/api/v1";
pub const DEFAULT_WARMUP_SECS: u64 = 2;
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "node-probe")]
#[command(about = "Smoke test for the node management API")]
pub struct CliConfig {
    #[arg(long, help = "API base URL [default: http://localhost:9999/api/v1]")]
    pub base_url: Option<String>,

    #[arg(long, help = "Seconds to wait before the first probe [default: 2]")]
    pub warmup_secs: Option<u64>,

    #[arg(long, help = "Seconds to wait after each probe [default: 1]")]
    pub interval_secs: Option<u64>,

    #[arg(long, help = "Request timeout in seconds (client default if unset)")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "TOML probe plan")]
    pub config: Option<String>,

    #[arg(long, help = "Write a JSON run report to this path")]
    pub report: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit diagnostics as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列 > 配置檔 > 預設值
    pub fn to_settings(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            let file = ProbeFileConfig::from_file(path)?;
            file.validate()?;
            settings.apply_file(&file);
        }

        settings.apply_overrides(
            self.base_url.clone(),
            self.warmup_secs,
            self.interval_secs,
            self.timeout_secs,
        );
        settings.validate()?;

        Ok(settings)
    }
}

/// 合併後的執行設定
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub warmup: Duration,
    pub interval: Duration,
    pub request_timeout: Option<Duration>,
    pub probes: Vec<ProbeSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            warmup: Duration::from_secs(DEFAULT_WARMUP_SECS),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            request_timeout: None,
            probes: ProbeSpec::default_plan(),
        }
    }
}

impl Settings {
    pub fn apply_file(&mut self, file: &ProbeFileConfig) {
        let harness = &file.harness;
        self.apply_overrides(
            harness.base_url.clone(),
            harness.warmup_secs,
            harness.interval_secs,
            harness.timeout_secs,
        );
        self.probes = file.probe_specs();
    }

    pub fn apply_overrides(
        &mut self,
        base_url: Option<String>,
        warmup_secs: Option<u64>,
        interval_secs: Option<u64>,
        timeout_secs: Option<u64>,
    ) {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(secs) = warmup_secs {
            self.warmup = Duration::from_secs(secs);
        }
        if let Some(secs) = interval_secs {
            self.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
    }
}

impl HarnessSettings for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn warmup(&self) -> Duration {
        self.warmup
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    fn probes(&self) -> &[ProbeSpec] {
        &self.probes
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_range("warmup_secs", self.warmup.as_secs(), 0, 3600)?;
        validation::validate_range("interval_secs", self.interval.as_secs(), 0, 3600)?;
        if let Some(timeout) = self.request_timeout {
            validation::validate_range("timeout_secs", timeout.as_secs(), 1, 3600)?;
        }

        for spec in &self.probes {
            validation::validate_non_empty_string("probes.name", &spec.name)?;
            validation::validate_probe_path("probes.path", &spec.path)?;
        }
        validation::validate_unique_names("probes.name", self.probes.iter().map(|p| p.name.as_str()))
    }
}
