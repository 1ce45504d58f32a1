use crate::adapters::http::DownstreamEndpoints;
use crate::core::policy::FailurePolicies;
use crate::utils::error::{CompositeError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_socket_addr, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub downstream: DownstreamConfig,
    pub policy: FailurePolicies,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Origin tag put on every composite. Derived from host name and bind address when unset.
    pub service_address: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:7000".to_string(),
            service_address: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownstreamConfig {
    pub product_url: String,
    pub recommendation_url: String,
    pub review_url: String,
    pub timeout_seconds: u64,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            product_url: "http://localhost:8081".to_string(),
            recommendation_url: "http://localhost:8082".to_string(),
            review_url: "http://localhost:8083".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CompositeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CompositeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PRODUCT_SERVICE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CompositeError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn endpoints(&self) -> DownstreamEndpoints {
        DownstreamEndpoints {
            product_url: self.downstream.product_url.clone(),
            recommendation_url: self.downstream.recommendation_url.clone(),
            review_url: self.downstream.review_url.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.downstream.timeout_seconds)
    }

    /// `<host>/<bind address>` unless configured explicitly.
    pub fn service_address(&self) -> String {
        match &self.server.service_address {
            Some(address) => address.clone(),
            None => {
                let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
                format!("{}/{}", host, self.server.bind)
            }
        }
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.bind", &self.server.bind)?;
        if let Some(address) = &self.server.service_address {
            validate_non_empty_string("server.service_address", address)?;
        }

        validate_url("downstream.product_url", &self.downstream.product_url)?;
        validate_url("downstream.recommendation_url", &self.downstream.recommendation_url)?;
        validate_url("downstream.review_url", &self.downstream.review_url)?;
        validate_range("downstream.timeout_seconds", self.downstream.timeout_seconds, 1, 300)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::FailurePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind = "127.0.0.1:9000"
service_address = "composite-1/10.0.0.5:9000"

[downstream]
product_url = "http://product:8080"
recommendation_url = "http://recommendation:8080"
review_url = "http://review:8080"
timeout_seconds = 3

[policy.blocking.product]
on_status = "tolerate_and_null"
on_transport = "abort_request"

[policy.blocking.recommendations]
on_status = "tolerate_and_null"
on_transport = "tolerate_and_null"

[policy.blocking.reviews]
on_status = "tolerate_and_null"
on_transport = "abort_request"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.service_address(), "composite-1/10.0.0.5:9000");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(
            config.policy.blocking.recommendations.on_transport,
            FailurePolicy::TolerateAndNull
        );
        assert_eq!(config.policy.non_blocking, FailurePolicies::default().non_blocking);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_REVIEW_SERVICE_URL", "http://reviews.internal:8080");

        let toml_content = r#"
[downstream]
review_url = "${TEST_REVIEW_SERVICE_URL}"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.downstream.review_url, "http://reviews.internal:8080");

        std::env::remove_var("TEST_REVIEW_SERVICE_URL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[downstream]
product_url = "invalid-url"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.downstream.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
bind = "127.0.0.1:7100"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ServiceConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:7100");
    }
}
