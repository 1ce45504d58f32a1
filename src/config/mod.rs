pub mod toml_config;

use crate::utils::error::Result;
use clap::Parser;
use toml_config::ServiceConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "product-composite")]
#[command(about = "Composite product service aggregating product, recommendation and review data")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, e.g. 0.0.0.0:7000
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long)]
    pub product_url: Option<String>,

    #[arg(long)]
    pub recommendation_url: Option<String>,

    #[arg(long)]
    pub review_url: Option<String>,

    /// Origin tag reported in every composite
    #[arg(long)]
    pub service_address: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入 TOML 配置並套用命令列覆蓋設定
    pub fn load(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(address) = &self.service_address {
            config.server.service_address = Some(address.clone());
        }
        if let Some(url) = &self.product_url {
            config.downstream.product_url = url.clone();
        }
        if let Some(url) = &self.recommendation_url {
            config.downstream.recommendation_url = url.clone();
        }
        if let Some(url) = &self.review_url {
            config.downstream.review_url = url.clone();
        }
    }
}
