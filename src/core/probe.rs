use crate::domain::model::{ProbeResult, ProbeSpec};
use crate::domain::ports::Probe;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

/// 所有探測共用一個 client；未指定逾時則沿用 reqwest 預設
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// 對 `{base_url}{path}` 發出一次 GET
pub struct HttpProbe {
    spec: ProbeSpec,
    base_url: String,
    client: Client,
}

impl HttpProbe {
    pub fn new(spec: ProbeSpec, base_url: &str, client: Client) -> Self {
        Self {
            spec,
            base_url: base_url.to_string(),
            client,
        }
    }

    pub fn url(&self) -> String {
        self.spec.url(&self.base_url)
    }

    // HTTP 狀態碼不判讀，結果只看回應內容
    async fn fetch(&self, url: &str) -> Result<serde_json::Value> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("{} responded with status {}", url, response.status());

        let text = response.text().await?;
        let body = serde_json::from_str(&text)?;
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Probe for HttpProbe {
    fn spec(&self) -> &ProbeSpec {
        &self.spec
    }

    async fn run(&self) -> ProbeResult {
        let url = self.url();
        match self.fetch(&url).await {
            Ok(body) => {
                let result = ProbeResult::from_body(&self.spec.name, &url, body);
                if !result.success {
                    tracing::warn!(
                        "Probe '{}' reported success=false: {}",
                        self.spec.name,
                        result.message.as_deref().unwrap_or("-")
                    );
                }
                result
            }
            Err(e) => {
                tracing::warn!("Probe '{}' failed: {}", self.spec.name, e);
                tracing::debug!("💡 {}", e.recovery_suggestion());
                ProbeResult::from_error(&self.spec.name, &url, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn probe_for(server: &MockServer, path: &str) -> HttpProbe {
        let spec = ProbeSpec::from_label("test", path, "测试");
        HttpProbe::new(spec, &server.url(""), build_client(None).unwrap())
    }

    #[tokio::test]
    async fn test_success_true_passes() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"success": true, "message": "ok", "data": null}));
        });

        let result = probe_for(&server, "/health").run().await;

        api_mock.assert();
        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.body.unwrap()["message"], "ok");
    }

    #[tokio::test]
    async fn test_success_false_fails_without_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/nodes");
            then.status(200).json_body(json!({"success": false, "message": "获取节点列表失败"}));
        });

        let result = probe_for(&server, "/nodes").run().await;

        assert!(!result.success);
        assert!(result.error.is_none());
        assert_eq!(result.message.as_deref(), Some("获取节点列表失败"));
    }

    #[tokio::test]
    async fn test_missing_success_field_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/nodes/stats");
            then.status(200).json_body(json!({"total_nodes": 4}));
        });

        let result = probe_for(&server, "/nodes/stats").run().await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_status_code_is_not_checked() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/nodes/cleanup");
            then.status(503).json_body(json!({"success": true}));
        });

        let result = probe_for(&server, "/nodes/cleanup").run().await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).body("<html>not json</html>");
        });

        let result = probe_for(&server, "/health").run().await;

        assert!(!result.success);
        assert!(result.body.is_none());
        assert!(result.error.unwrap().starts_with("Invalid JSON response"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_failure() {
        let spec = ProbeSpec::from_label("health", "/health", "健康检查");
        // discard 埠，本機通常沒有服務
        let probe = HttpProbe::new(
            spec,
            "http://127.0.0.1:9",
            build_client(Some(Duration::from_secs(2))).unwrap(),
        );

        let result = probe.run().await;

        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("HTTP request failed"));
        assert_eq!(result.url, "http://127.0.0.1:9/health");
    }
}
