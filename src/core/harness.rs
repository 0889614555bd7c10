use crate::core::probe::{build_client, HttpProbe};
use crate::core::report::{rule, RunReport};
use crate::domain::ports::{HarnessSettings, Probe};
use crate::utils::error::Result;
use chrono::Utc;
use std::io::Write;
use std::time::Duration;

/// 依固定順序逐一執行探測
pub struct SmokeHarness {
    base_url: String,
    probes: Vec<Box<dyn Probe>>,
    warmup: Duration,
    interval: Duration,
}

impl SmokeHarness {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            probes: Vec::new(),
            warmup: Duration::from_secs(2),
            interval: Duration::from_secs(1),
        }
    }

    pub fn from_settings<S: HarnessSettings>(settings: &S) -> Result<Self> {
        let client = build_client(settings.request_timeout())?;
        let mut harness = Self::new(settings.base_url().to_string())
            .with_delays(settings.warmup(), settings.interval());

        for spec in settings.probes() {
            harness.add_probe(Box::new(HttpProbe::new(
                spec.clone(),
                settings.base_url(),
                client.clone(),
            )));
        }

        Ok(harness)
    }

    pub fn with_delays(mut self, warmup: Duration, interval: Duration) -> Self {
        self.warmup = warmup;
        self.interval = interval;
        self
    }

    pub fn add_probe(&mut self, probe: Box<dyn Probe>) {
        self.probes.push(probe);
    }

    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.spec().name.as_str()).collect()
    }

    pub async fn run(&self) -> RunReport {
        let mut out = std::io::stdout();
        self.run_with_output(&mut out).await
    }

    /// 探測失敗不會中斷流程，所有探測都會跑完
    pub async fn run_with_output<W: Write + Send>(&self, out: &mut W) -> RunReport {
        let started_at = Utc::now();

        emit(out, "🚀 开始节点连接管理功能测试");
        emit(out, &rule());

        emit(out, "⏳ 等待服务器启动...");
        tokio::time::sleep(self.warmup).await;

        let mut results = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            let spec = probe.spec();
            emit(out, &spec.start_line());

            let result = probe.run().await;
            // 非物件的回應會同時輸出成功行與失敗行
            if let Some(body) = &result.body {
                emit(out, &spec.ok_line(body));
            }
            if let Some(error) = &result.error {
                emit(out, &spec.failure_line(error));
            }
            tracing::info!(probe = %spec.name, success = result.success, "probe finished");
            results.push(result);

            emit(out, "");
            tokio::time::sleep(self.interval).await;
        }

        let report = RunReport {
            base_url: self.base_url.clone(),
            started_at,
            finished_at: Utc::now(),
            results,
        };

        for line in report.summary_lines() {
            emit(out, &line);
        }

        report
    }
}

fn emit<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{}", line) {
        tracing::warn!("Failed to write output: {}", e);
    }
}
