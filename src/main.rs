use clap::Parser;
use unit_agg::domain::model::JournalSource;
use unit_agg::utils::{logger, validation::Validate};
use unit_agg::{CliConfig, EtlEngine, LocalStorage, UnitAggregationPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting unit-agg CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let dry_run = config.dry_run;

    let pipeline = UnitAggregationPipeline::new(LocalStorage::default(), config);

    if dry_run {
        match pipeline.plan().await {
            Ok(sources) => {
                print_plan(&sources);
                return Ok(());
            }
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                std::process::exit(e.exit_code());
            }
        }
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

fn print_plan(sources: &[JournalSource]) {
    println!("🔍 Dry run: {} journals would be aggregated", sources.len());
    for source in sources {
        println!("  {:<20} {}", source.key, source.path);
    }
}
