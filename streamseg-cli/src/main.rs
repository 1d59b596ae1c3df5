use clap::Parser;
use streamseg_cli::commands::Commands;

/// Split streamed text into speakable sentence fragments
#[derive(Debug, Parser)]
#[command(name = "streamseg", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process() {
        let cli = Cli::try_parse_from(["streamseg", "process", "-i", "a.txt", "-vv"]).unwrap();
        match cli.command {
            Commands::Process(args) => {
                assert_eq!(args.input, vec!["a.txt".to_string()]);
                assert_eq!(args.verbose, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
