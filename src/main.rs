use clap::Parser;
use sar_ticket_monitor::config::settings::RendererKind;
use sar_ticket_monitor::core::query::{plan_as_json, plan_queries};
use sar_ticket_monitor::domain::model::DispatchOutcome;
use sar_ticket_monitor::domain::ports::PageRenderer;
use sar_ticket_monitor::utils::{logger, validation::Validate};
use sar_ticket_monitor::{
    notifier_for, CliConfig, EmailCredentials, HttpRenderer, MonitorConfig, MonitorEngine,
    MonitorError, MonitorPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚆 SAR Ticket Availability Monitor");
    tracing::info!("Started at: {}", chrono::Local::now().to_rfc3339());

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            match MonitorConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => exit_with(&e),
            }
        }
        None => MonitorConfig::default(),
    };
    cli.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    for route in &config.routes {
        tracing::info!(
            "Route {}: {} ({} → {}), {} to {}",
            route.name,
            route.label(),
            route.from_station,
            route.to_station,
            route.start_date,
            route.end_date
        );
    }

    tracing::info!("Planned {} queries", config.total_queries());

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no pages will be fetched");
        let queries = plan_queries(&config.routes, &config.site)?;
        println!("{}", plan_as_json(&queries)?);
        return Ok(());
    }

    let renderer = match open_renderer(&config).await {
        Ok(renderer) => renderer,
        Err(e) => exit_with(&e),
    };
    let notifier = notifier_for(EmailCredentials::from_env(), &config.email);

    let pipeline = match MonitorPipeline::new(renderer, notifier, &config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };

    let engine = MonitorEngine::new_with_monitoring(pipeline, cli.monitor);

    match engine.run().await {
        Ok(summary) => {
            match &summary.dispatch {
                DispatchOutcome::NothingToReport => println!("No tickets available at this time."),
                DispatchOutcome::Sent { recipient, results } => {
                    println!("✅ Found {} available trip(s), email sent to {}", results, recipient)
                }
                DispatchOutcome::Printed { results } => {
                    println!("✅ Found {} available trip(s) (email disabled)", results)
                }
                DispatchOutcome::Failed { reason } => {
                    eprintln!("⚠️  Trips found but the email could not be sent: {}", reason)
                }
            }
            tracing::info!("Finished at: {}", chrono::Local::now().to_rfc3339());
        }
        Err(e) => {
            tracing::error!(
                "❌ Monitor run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_with(&e);
        }
    }

    Ok(())
}

async fn open_renderer(config: &MonitorConfig) -> Result<Box<dyn PageRenderer>, MonitorError> {
    match config.browser.renderer {
        #[cfg(feature = "browser")]
        RendererKind::WebDriver => {
            let renderer =
                sar_ticket_monitor::WebDriverRenderer::launch(&config.browser, &config.pacing).await?;
            Ok(Box::new(renderer))
        }
        #[cfg(not(feature = "browser"))]
        RendererKind::WebDriver => Err(MonitorError::ConfigError {
            message: "this build has no WebDriver support; use --renderer http".to_string(),
        }),
        RendererKind::Http => Ok(Box::new(HttpRenderer::new(&config.browser)?)),
    }
}

fn exit_with(e: &MonitorError) -> ! {
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1))
}
