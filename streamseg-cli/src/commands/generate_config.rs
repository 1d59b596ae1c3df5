//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use streamseg_engine::SegmenterConfig;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Language code to put in the configuration
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        let document = self.render()?;

        let Some(path) = &self.output else {
            print!("{document}");
            return Ok(());
        };

        fs::write(path, document)
            .with_context(|| format!("Failed to write to {}", path.display()))?;

        println!("✓ Configuration written to {}", path.display());
        println!();
        println!("Next steps:");
        println!("1. Edit the file to tune the segmenter");
        println!("2. Validate it:");
        println!("   streamseg validate -c {}", path.display());
        println!("3. Use it for processing:");
        println!("   streamseg process -i input.txt -c {}", path.display());
        Ok(())
    }

    /// Default configuration as commented TOML
    pub fn render(&self) -> Result<String> {
        let mut builder = SegmenterConfig::builder();
        if let Some(language) = &self.language {
            builder = builder.language(language.as_str());
        }
        let config = builder.build()?;

        let body = config.to_toml_string()?;
        Ok(format!(
            "# streamseg segmenter configuration\n\
             # Every key is optional; missing keys take the values shown here.\n\n{body}"
        ))
    }
}
