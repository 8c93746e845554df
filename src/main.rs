use clap::Parser;
use numeric_json::utils::error::ErrorCategory;
use numeric_json::utils::{logger, validation::Validate};
use numeric_json::{CliArgs, Datum, JsonWriter, LocalStorage, Result, WriterError};
use std::io::Read;
use std::path::PathBuf;

fn main() {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting numeric-json");
    tracing::debug!("CLI args: {:?}", args);

    match run(&args) {
        Ok(path) => {
            tracing::info!("✅ Wrote {}", path.display());
            println!("{}", path.display());
        }
        Err(e) => {
            tracing::error!(
                "❌ Write failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.category() {
                ErrorCategory::Configuration => 1,
                ErrorCategory::Encoding => 2,
                ErrorCategory::Filesystem => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

fn run(args: &CliArgs) -> Result<PathBuf> {
    args.validate()?;
    let config = args.writer_config()?;
    tracing::debug!("Writer config: {:?}", config);

    let input = read_input(&args.input)?;
    let value: serde_json::Value = serde_json::from_str(&input)?;

    let writer = JsonWriter::new(LocalStorage::new(&args.output_path)).with_config(config);
    writer.write(&Datum::from(value), &args.filename)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| WriterError::io("<stdin>", e))?;
        return Ok(buf);
    }

    std::fs::read_to_string(input).map_err(|e| WriterError::io(input, e))
}
