//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;
use streamseg_engine::language::{bundled_languages, bundled_pack};

pub mod generate_config;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment text files or stdin into sentence fragments
    Process(process::ProcessArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Print or write a default segmenter configuration
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a segmenter configuration and/or a language pack
    Validate(validate::ValidateArgs),
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List bundled language packs
    Languages,

    /// List available output formats
    Formats,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Process(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
        }
    }
}

impl ListCommands {
    /// Print the requested listing to stdout
    pub fn execute(&self) -> Result<()> {
        match self {
            ListCommands::Languages => {
                println!("Bundled languages:");
                for code in bundled_languages() {
                    let pack = bundled_pack(code)?;
                    println!("  {code:<4} {}", pack.metadata.name);
                }
            }
            ListCommands::Formats => {
                println!("Output formats:");
                println!("  text      one fragment per line");
                println!("  json      array of fragments with kind, index and length");
                println!("  markdown  numbered list with a total");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_debug_format() {
        let list_cmd = Commands::List {
            subcommand: ListCommands::Languages,
        };
        let debug_str = format!("{list_cmd:?}");
        assert!(debug_str.contains("List"));
        assert!(debug_str.contains("Languages"));
    }

    #[test]
    fn test_list_commands_run() {
        assert!(ListCommands::Languages.execute().is_ok());
        assert!(ListCommands::Formats.execute().is_ok());
    }
}
