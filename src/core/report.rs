use crate::domain::model::ProbeResult;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

pub const RULE_WIDTH: usize = 50;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// 一次執行的彙總結果，依執行順序保存每個探測
#[derive(Debug, Clone)]
pub struct RunReport {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<ProbeResult>,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    base_url: &'a str,
    passed: usize,
    failed: usize,
    total: usize,
    all_passed: bool,
    probes: &'a [ProbeResult],
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let total = self.total();
        let verdict = if self.all_passed() {
            "🎉 所有测试通过！节点连接管理功能正常"
        } else {
            "⚠️  部分测试失败，请检查服务器状态"
        };

        vec![
            rule(),
            "📊 测试结果汇总:".to_string(),
            format!("✅ 通过: {}/{}", self.passed(), total),
            format!("❌ 失败: {}/{}", self.failed(), total),
            verdict.to_string(),
        ]
    }

    pub fn to_json(&self) -> Result<String> {
        let document = ReportDocument {
            started_at: self.started_at,
            finished_at: self.finished_at,
            base_url: &self.base_url,
            passed: self.passed(),
            failed: self.failed(),
            total: self.total(),
            all_passed: self.all_passed(),
            probes: &self.results,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;
        tracing::debug!("Run report written to {}", path.display());
        Ok(())
    }
}
