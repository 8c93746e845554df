use crate::config::WriterConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_filename, validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "numeric-json")]
#[command(about = "Write a JSON document as indented JSON into a directory")]
pub struct CliArgs {
    /// Input JSON file, or '-' for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Existing directory the file is written into
    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(short, long)]
    pub filename: String,

    /// Path to a TOML writer configuration
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub indent: Option<usize>,

    #[arg(long, help = "Escape non-ASCII characters as \\uXXXX")]
    pub ensure_ascii: bool,

    #[arg(long, conflicts_with = "ensure_ascii", help = "Write non-ASCII characters as UTF-8")]
    pub no_ensure_ascii: bool,

    #[arg(long, help = "Replace the target file atomically")]
    pub atomic: bool,

    #[arg(long)]
    pub trailing_newline: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Configuration file values with command-line flags applied on top.
    pub fn writer_config(&self) -> Result<WriterConfig> {
        let mut config = match &self.config {
            Some(path) => WriterConfig::from_file(path)?,
            None => WriterConfig::default(),
        };

        if let Some(indent) = self.indent {
            config.indent = indent;
        }
        if self.ensure_ascii {
            config.ensure_ascii = true;
        } else if self.no_ensure_ascii {
            config.ensure_ascii = false;
        }
        config.atomic |= self.atomic;
        config.trailing_newline |= self.trailing_newline;

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;
        validate_filename("filename", &self.filename)
    }
}
