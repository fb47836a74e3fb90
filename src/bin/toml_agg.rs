use clap::Parser;
use unit_agg::core::ConfigProvider;
use unit_agg::utils::{logger, validation::Validate};
use unit_agg::{EtlEngine, LocalStorage, TomlConfig, UnitAggregationPipeline};

#[derive(Parser)]
#[command(name = "toml-agg")]
#[command(about = "Unit aggregation driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "unit-agg.toml")]
    config: String,

    /// Override the journal path from the config
    #[arg(short, long)]
    input: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_cli_logger_with_level(args.verbose, config.log_level());

    tracing::info!("🚀 Starting TOML-based unit aggregation");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(input) = &args.input {
        config.input.path = input.clone();
        tracing::info!("🔧 Input overridden to: {}", input);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = UnitAggregationPipeline::new(LocalStorage::default(), config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No report will be written");
        let sources = match pipeline.plan().await {
            Ok(sources) => sources,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                std::process::exit(e.exit_code());
            }
        };
        println!("🔍 Dry Run Analysis:");
        println!("  Journals found: {}", sources.len());
        for source in &sources {
            println!("  {:<20} {}", source.key, source.file_name);
        }
        println!();
        println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Unit aggregation completed successfully!");
            println!("✅ Unit aggregation completed successfully!");
            println!("📁 Report written to {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Unit aggregation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!(
        "  Report: {}",
        config.report_filename().unwrap_or("<today> unit aggregation report")
    );
    println!("  Format: {:?}", config.output_format());
    println!(
        "  Units: letters '{}' in column {}, amounts in column {}",
        config.unit_letters(),
        config.unit_column(),
        config.amount_column()
    );
    println!("  Invalid amounts: {:?}", config.on_invalid_amount());
    println!("  Summary sheet: {}", config.include_summary());

    if let Some(level) = config.log_level() {
        println!("  Log level: {}", level);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
