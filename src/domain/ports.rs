use crate::domain::model::{ProbeResult, ProbeSpec};
use async_trait::async_trait;
use std::time::Duration;

/// 一次探測。實作必須吞下自己的錯誤，回傳失敗的 `ProbeResult`。
#[async_trait]
pub trait Probe: Send + Sync {
    fn spec(&self) -> &ProbeSpec;
    async fn run(&self) -> ProbeResult;
}

pub trait HarnessSettings: Send + Sync {
    fn base_url(&self) -> &str;
    fn warmup(&self) -> Duration;
    fn interval(&self) -> Duration;
    fn request_timeout(&self) -> Option<Duration>;
    fn probes(&self) -> &[ProbeSpec];
}
