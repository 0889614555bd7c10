use clap::Parser;
use node_probe::utils::logger;
use node_probe::{CliConfig, SmokeHarness};

/// 配置錯誤的退出碼，探測結果只會是 0 或 1
const CONFIG_EXIT_CODE: i32 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.to_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(CONFIG_EXIT_CODE);
        }
    };

    let harness = match SmokeHarness::from_settings(&settings) {
        Ok(harness) => harness,
        Err(e) => {
            tracing::error!("❌ Failed to build HTTP client: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(CONFIG_EXIT_CODE);
        }
    };

    tracing::info!(
        "Probing {} ({} probes)",
        settings.base_url,
        harness.probe_names().len()
    );

    let report = harness.run().await;

    if let Some(path) = &config.report {
        if let Err(e) = report.write_json(path) {
            tracing::warn!("Failed to write run report to {}: {}", path, e);
        }
    }

    std::process::exit(report.exit_code());
}
