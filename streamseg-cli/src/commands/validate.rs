//! Validate command implementation

use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use streamseg_engine::language::load_pack_file;
use streamseg_engine::SegmenterConfig;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Segmenter configuration file to validate
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Language pack file to validate
    #[arg(long, value_name = "FILE")]
    pub language_pack: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        if self.config.is_none() && self.language_pack.is_none() {
            return Err(CliError::ConfigError(
                "nothing to validate; pass --config and/or --language-pack".to_string(),
            )
            .into());
        }

        if let Some(path) = &self.config {
            println!("Validating configuration: {}", path.display());
            match SegmenterConfig::from_toml_file(path) {
                Ok(config) => {
                    println!("✓ Configuration is valid!");
                    println!("  Backend: {}", config.tokenizer.backend);
                    println!("  Language: {}", config.tokenizer.language);
                }
                Err(e) => {
                    println!("✗ Configuration is invalid!");
                    println!("  Error: {e}");
                    return Err(CliError::ValidationFailed(e.to_string()).into());
                }
            }
        }

        if let Some(path) = &self.language_pack {
            println!("Validating language pack: {}", path.display());
            match load_pack_file(path) {
                Ok(pack) => {
                    println!("✓ Language pack is valid!");
                    println!("  Language code: {}", pack.metadata.code);
                    println!("  Language name: {}", pack.metadata.name);
                    println!("  Abbreviations: {}", pack.abbreviation_list().count());
                }
                Err(e) => {
                    println!("✗ Language pack is invalid!");
                    println!("  Error: {e}");
                    return Err(CliError::ValidationFailed(e.to_string()).into());
                }
            }
        }

        Ok(())
    }
}
