use clap::Parser;
use sheet_export::utils::logger;
use sheet_export::CliArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Help and version keep clap's exit; every other parse failure exits 1.
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => e.exit(),
            _ => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
    };

    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting sheet-export");

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!("Export config: {:?}", config);

    match sheet_export::run(config).await {
        Ok(summary) => {
            println!(
                "✅ Exported {} rows x {} columns from '{}' / '{}'",
                summary.rows, summary.columns, summary.spreadsheet_title, summary.worksheet
            );
            println!("📁 Output saved to: {}", summary.output_path.display());
        }
        Err(e) => {
            tracing::error!("❌ Export failed: {} (Category: {:?})", e, e.kind());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
