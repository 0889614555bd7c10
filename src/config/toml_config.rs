use crate::domain::model::{OutputStyle, ProbeSpec};
use crate::utils::error::{ProbeError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML 探測計畫檔
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeFileConfig {
    #[serde(default)]
    pub harness: HarnessSection,
    #[serde(default)]
    pub probes: Vec<ProbeEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessSection {
    pub base_url: Option<String>,
    pub warmup_secs: Option<u64>,
    pub interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeEntry {
    pub name: String,
    pub path: String,
    pub label: Option<String>,
    pub style: Option<OutputStyle>,
}

impl ProbeEntry {
    /// 名稱與預設探測相同且未指定 label 時沿用預設的顯示文字
    pub fn to_spec(&self) -> ProbeSpec {
        let builtin = ProbeSpec::default_plan()
            .into_iter()
            .find(|spec| spec.name == self.name);

        let mut spec = match (&self.label, builtin) {
            (None, Some(mut builtin)) => {
                builtin.path = self.path.clone();
                builtin
            }
            (label, _) => {
                ProbeSpec::from_label(&self.name, &self.path, label.as_deref().unwrap_or(&self.name))
            }
        };

        if let Some(style) = self.style {
            spec.style = style;
        }
        spec
    }
}

impl ProbeFileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!("Loaded probe plan from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ProbeError::Config {
            message: format!("TOML parsing error: {}", e),
        })?;

        // 只替換字串值，註解裡的 ${VAR} 不會被處理
        let mut value = toml::Value::Table(table);
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProbeError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;
        Self::substitute_env_vars(&re, &mut value)?;

        value.try_into().map_err(|e| ProbeError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NODE_API_URL})，未設定的變數視為缺少配置
    fn substitute_env_vars(re: &Regex, value: &mut toml::Value) -> Result<()> {
        match value {
            toml::Value::String(text) => {
                if let Some(missing) = re
                    .captures_iter(text)
                    .map(|caps| caps[1].to_string())
                    .find(|name| std::env::var(name).is_err())
                {
                    return Err(ProbeError::MissingConfig { field: missing });
                }

                let replaced = re.replace_all(text, |caps: &regex::Captures| {
                    std::env::var(&caps[1]).unwrap_or_default()
                });
                *text = replaced.into_owned();
            }
            toml::Value::Array(items) => {
                for item in items {
                    Self::substitute_env_vars(re, item)?;
                }
            }
            toml::Value::Table(table) => {
                for (_, item) in table.iter_mut() {
                    Self::substitute_env_vars(re, item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// 未列出任何探測時回傳預設的四項
    pub fn probe_specs(&self) -> Vec<ProbeSpec> {
        if self.probes.is_empty() {
            ProbeSpec::default_plan()
        } else {
            self.probes.iter().map(ProbeEntry::to_spec).collect()
        }
    }
}

impl Validate for ProbeFileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.harness.base_url {
            validation::validate_url("harness.base_url", base_url)?;
        }

        for entry in &self.probes {
            validation::validate_non_empty_string("probes.name", &entry.name)?;
            validation::validate_probe_path("probes.path", &entry.path)?;
            if let Some(label) = &entry.label {
                validation::validate_non_empty_string("probes.label", label)?;
            }
        }

        validation::validate_unique_names("probes.name", self.probes.iter().map(|p| p.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[harness]
base_url = "http://10.0.0.5:9999/api/v1"
warmup_secs = 0
interval_secs = 0
timeout_secs = 5

[[probes]]
name = "health"
path = "/health"

[[probes]]
name = "node"
path = "/nodes/node-1"
label = "获取单个节点"
style = "compact"
"#;

        let config = ProbeFileConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.harness.timeout_secs, Some(5));

        let specs = config.probe_specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].ok_label, "健康检查响应");
        assert_eq!(specs[0].style, OutputStyle::Compact);
        assert_eq!(specs[1].subject, "获取单个节点接口");
        assert_eq!(specs[1].style, OutputStyle::Compact);
    }

    #[test]
    fn test_empty_config_uses_default_plan() {
        let config = ProbeFileConfig::from_toml_str("").unwrap();
        let names: Vec<String> = config.probe_specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["health", "nodes", "stats", "cleanup"]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NODE_PROBE_TEST_URL", "http://node-core:9999/api/v1");

        let config =
            ProbeFileConfig::from_toml_str("[harness]\nbase_url = \"${NODE_PROBE_TEST_URL}\"\n")
                .unwrap();
        assert_eq!(
            config.harness.base_url.as_deref(),
            Some("http://node-core:9999/api/v1")
        );

        std::env::remove_var("NODE_PROBE_TEST_URL");
    }

    #[test]
    fn test_unset_env_var_is_missing_config() {
        let err = ProbeFileConfig::from_toml_str(
            "[harness]\nbase_url = \"${NODE_PROBE_SURELY_UNSET_VAR}\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ProbeError::MissingConfig { field } if field == "NODE_PROBE_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_env_var_in_comment_is_ignored() {
        let config = ProbeFileConfig::from_toml_str(
            "[harness]\n# base_url = \"${NODE_PROBE_COMMENTED_UNSET_VAR}\"\nwarmup_secs = 0 # ${NODE_PROBE_COMMENTED_UNSET_VAR}\n",
        )
        .unwrap();
        assert_eq!(config.harness.base_url, None);
        assert_eq!(config.harness.warmup_secs, Some(0));
    }

    #[test]
    fn test_env_var_substitution_in_probe_entries() {
        std::env::set_var("NODE_PROBE_TEST_NODE_ID", "node-7");

        let config = ProbeFileConfig::from_toml_str(
            "[[probes]]\nname = \"node\"\npath = \"/nodes/${NODE_PROBE_TEST_NODE_ID}\"\n",
        )
        .unwrap();
        assert_eq!(config.probes[0].path, "/nodes/node-7");

        std::env::remove_var("NODE_PROBE_TEST_NODE_ID");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_url = ProbeFileConfig::from_toml_str("[harness]\nbase_url = \"not-a-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_path = ProbeFileConfig::from_toml_str(
            "[[probes]]\nname = \"health\"\npath = \"health\"\n",
        )
        .unwrap();
        assert!(bad_path.validate().is_err());

        let duplicate = ProbeFileConfig::from_toml_str(
            "[[probes]]\nname = \"health\"\npath = \"/health\"\n\n[[probes]]\nname = \"health\"\npath = \"/nodes\"\n",
        )
        .unwrap();
        assert!(duplicate.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ProbeFileConfig::from_toml_str("[[probes]\nname = ").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[harness]\nwarmup_secs = 3\n")
            .unwrap();

        let config = ProbeFileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.harness.warmup_secs, Some(3));
    }
}
