use clap::Parser;
use product_composite::app::server;
use product_composite::utils::{logger, validation::Validate};
use product_composite::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting product-composite {}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.load().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!(
        "🔗 Downstream: product={}, recommendation={}, review={}",
        config.downstream.product_url,
        config.downstream.recommendation_url,
        config.downstream.review_url
    );

    if let Err(e) = server::run(config).await {
        tracing::error!("❌ Server failed: {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return Err(e.into());
    }

    Ok(())
}
