use serde::{Deserialize, Serialize};

/// 回應 JSON 的輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// 單行
    Compact,
    /// 兩格縮排，非 ASCII 字元不跳脫
    #[default]
    Pretty,
}

impl OutputStyle {
    pub fn render(&self, body: &serde_json::Value) -> String {
        let rendered = match self {
            OutputStyle::Compact => serde_json::to_string(body),
            OutputStyle::Pretty => serde_json::to_string_pretty(body),
        };
        // Value 序列化不會失敗
        rendered.unwrap_or_else(|_| body.to_string())
    }
}

/// 一個探測項目：名稱、路徑與顯示文字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSpec {
    pub name: String,
    pub path: String,
    /// 開始行使用的文字，例如 "健康检查接口"
    pub subject: String,
    /// 成功行前綴，例如 "健康检查响应"
    pub ok_label: String,
    /// 失敗行前綴，例如 "健康检查失败"
    pub failure_label: String,
    pub style: OutputStyle,
}

impl ProbeSpec {
    pub fn new(name: &str, path: &str, subject: &str, ok_label: &str, failure_label: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            subject: subject.to_string(),
            ok_label: ok_label.to_string(),
            failure_label: failure_label.to_string(),
            style: OutputStyle::Pretty,
        }
    }

    /// 由單一標籤推出三種顯示文字，供配置檔自訂的探測使用
    pub fn from_label(name: &str, path: &str, label: &str) -> Self {
        Self::new(
            name,
            path,
            &format!("{}接口", label),
            &format!("{}响应", label),
            &format!("{}失败", label),
        )
    }

    pub fn with_style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }

    pub fn start_line(&self) -> String {
        format!("🧪 测试{}...", self.subject)
    }

    pub fn ok_line(&self, body: &serde_json::Value) -> String {
        format!("✅ {}: {}", self.ok_label, self.style.render(body))
    }

    pub fn failure_line(&self, error: &str) -> String {
        format!("❌ {}: {}", self.failure_label, error)
    }

    /// 健康檢查 → 節點列表 → 節點統計 → 清理過期節點
    pub fn default_plan() -> Vec<ProbeSpec> {
        vec![
            ProbeSpec::new("health", "/health", "健康检查接口", "健康检查响应", "健康检查失败")
                .with_style(OutputStyle::Compact),
            ProbeSpec::new(
                "nodes",
                "/nodes",
                "获取节点列表接口",
                "节点列表响应",
                "获取节点列表失败",
            ),
            ProbeSpec::new(
                "stats",
                "/nodes/stats",
                "获取节点统计信息接口",
                "节点统计信息",
                "获取节点统计信息失败",
            ),
            ProbeSpec::new(
                "cleanup",
                "/nodes/cleanup",
                "清理过期节点接口",
                "清理过期节点响应",
                "清理过期节点失败",
            ),
        ]
    }
}

/// 節點管理服務的回應外殼。只有 `success` 會被判讀，其餘欄位格式不符時忽略。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<serde_json::Value>,
    pub timestamp: Option<String>,
}

impl ResponseEnvelope {
    /// 非物件的 JSON 一律視為失敗
    pub fn from_body(body: &serde_json::Value) -> Self {
        let Some(obj) = body.as_object() else {
            return Self::default();
        };

        Self {
            success: obj
                .get("success")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            message: obj
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            data: obj.get("data").filter(|v| !v.is_null()).cloned(),
            timestamp: obj
                .get("timestamp")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }
}

/// 單次探測的結果
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub url: String,
    pub success: bool,
    /// 服務回應中的 `message`
    pub message: Option<String>,
    pub body: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ProbeResult {
    /// 非物件的 JSON 仍保留 body 供輸出，同時記錄錯誤
    pub fn from_body(name: &str, url: &str, body: serde_json::Value) -> Self {
        let envelope = ResponseEnvelope::from_body(&body);
        let error = if body.is_object() {
            None
        } else {
            Some(format!("response is not a JSON object: {}", body))
        };

        Self {
            name: name.to_string(),
            url: url.to_string(),
            success: envelope.success,
            message: envelope.message,
            body: Some(body),
            error,
        }
    }

    pub fn from_error(name: &str, url: &str, error: impl std::fmt::Display) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            success: false,
            message: None,
            body: None,
            error: Some(error.to_string()),
        }
    }
}
