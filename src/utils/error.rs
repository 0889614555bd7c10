use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

impl ProbeError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ProbeError::Config { .. }
                | ProbeError::InvalidConfigValue { .. }
                | ProbeError::MissingConfig { .. }
        )
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ProbeError::Http(e) if e.is_timeout() => "請求逾時，服務沒有在時限內回應".to_string(),
            ProbeError::Http(e) if e.is_connect() => "無法連線到節點管理服務".to_string(),
            ProbeError::Http(_) => "HTTP 請求失敗".to_string(),
            ProbeError::Decode(_) => "服務回應不是有效的 JSON".to_string(),
            ProbeError::Io(e) => format!("檔案讀寫失敗: {}", e),
            ProbeError::Config { message } => format!("配置錯誤: {}", message),
            ProbeError::InvalidConfigValue { field, reason, .. } => {
                format!("配置欄位 {} 無效: {}", field, reason)
            }
            ProbeError::MissingConfig { field } => format!("缺少必要配置: {}", field),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProbeError::Http(_) => "確認服務已啟動，並檢查 --base-url 是否正確",
            ProbeError::Decode(_) => "確認 --base-url 指向節點管理 API 而不是其他服務",
            ProbeError::Io(_) => "檢查檔案路徑與權限",
            ProbeError::Config { .. } => "檢查 TOML 配置檔語法",
            ProbeError::InvalidConfigValue { .. } => "修正配置值後重新執行",
            ProbeError::MissingConfig { .. } => "在配置檔或命令列參數中補上該欄位",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
