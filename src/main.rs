use clap::Parser;
use sheet_catalog::config::cli::LogFormat;
use sheet_catalog::core::Pipeline;
use sheet_catalog::utils::error::{CatalogError, ErrorSeverity};
use sheet_catalog::utils::{logger, validation::Validate};
use sheet_catalog::{CatalogConfig, CatalogPipeline, CliConfig, EtlEngine, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.log_format == LogFormat::Json);

    tracing::info!("Starting sheet-catalog");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.load_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    tracing::info!("✅ Configuration loaded and validated successfully");
    if cli.dry_run {
        display_config_summary(&config);
        return Ok(());
    }

    let monitor_enabled = cli.monitoring_enabled(&config);
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CatalogPipeline::new(storage, config);

    if let Some(id) = &cli.customer_id {
        let page = match pipeline.extract().await {
            Ok(page) => page,
            Err(e) => exit_with(e),
        };
        match page.find_by_customer_id(id) {
            Some(customer) => println!("{}", serde_json::to_string_pretty(customer)?),
            None => {
                tracing::warn!("Customer '{}' not found", id);
                eprintln!("❌ Customer '{}' not found", id);
                std::process::exit(4);
            }
        }
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Catalog generated successfully!");
            println!("✅ Catalog generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: CatalogError) -> ! {
    tracing::error!(
        "❌ Catalog run failed: {} (Category: {:?}, Severity: {:?}, HTTP {})",
        e,
        e.category(),
        e.severity(),
        e.http_status()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

fn display_config_summary(config: &CatalogConfig) {
    println!("📋 Configuration Summary:");
    println!("  Title: {}", config.page.title);
    for (label, source) in [("Customers", &config.customers), ("Products", &config.products)] {
        println!("  {}: {}", label, source.location);
        println!("    Remote: {}", source.source_location().is_remote());
        println!("    Sheets: {}", source.sheets.join(", "));
        println!("    Header rows: {}", source.header_rows);
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    if let Some(compression) = config.load.compression.as_ref().filter(|c| c.enabled) {
        println!("  Compression: {} (ZIP)", compression.filename);
    }
    println!("  🔍 DRY RUN MODE - nothing was read or written");
}
