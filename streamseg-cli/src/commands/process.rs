//! Process command implementation

use crate::error::CliError;
use crate::input::chunk_reader::DEFAULT_CHUNK_SIZE;
use crate::input::{resolve_inputs, ChunkReader, InputSource};
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use streamseg_engine::{Segmenter, SegmenterConfig, SentenceStream};

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files or patterns (supports glob); `-` reads stdin
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Language of the sentence model (overrides the configuration file)
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Segmenter configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bytes read per chunk, simulating streamed tokens
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Never install language packs into the data directory
    #[arg(long)]
    pub offline: bool,

    /// Directory holding installed language packs
    #[arg(long, value_name = "DIR", env = "STREAMSEG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Echo every consumed character to stderr
    #[arg(long)]
    pub echo: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text with one fragment per line
    Text,
    /// JSON array of fragments with metadata
    Json,
    /// Markdown formatted output
    Markdown,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::info!("Starting stream segmentation");
        log::debug!("Arguments: {:?}", self);

        if self.chunk_size == 0 {
            return Err(CliError::InvalidChunkSize(self.chunk_size).into());
        }

        let config = self.build_config()?;
        let sources = resolve_inputs(&self.input)?;
        let mut formatter = self.create_formatter()?;

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_sources(sources.len() as u64);

        for source in &sources {
            let count = self.process_source(source, &config, formatter.as_mut())?;
            progress.source_completed(&source.to_string(), count);
        }

        formatter.finish()?;
        progress.finish();
        log::info!(
            "Emitted {} fragments from {} source(s)",
            progress.total_fragments(),
            sources.len()
        );
        Ok(())
    }

    /// Load the configuration file, then apply command-line overrides
    pub fn build_config(&self) -> Result<SegmenterConfig> {
        let mut config = match &self.config {
            Some(path) => SegmenterConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
            None => SegmenterConfig::default(),
        };

        if let Some(language) = &self.language {
            config.tokenizer.language = language.clone();
        }
        if self.offline {
            config.tokenizer.offline = true;
        }
        if let Some(dir) = &self.data_dir {
            config.tokenizer.data_dir = Some(dir.clone());
        }
        if self.echo {
            config.log_characters = true;
        }
        if self.verbose >= 2 {
            config.debug = true;
        }

        config
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        Ok(config.normalized())
    }

    fn process_source(
        &self,
        source: &InputSource,
        config: &SegmenterConfig,
        formatter: &mut dyn OutputFormatter,
    ) -> Result<usize> {
        log::info!("Processing {source}");

        let reader = source.open()?;
        let segmenter = Segmenter::from_config(config.clone())
            .with_context(|| format!("Failed to create segmenter for {source}"))?;
        let stream = SentenceStream::new(ChunkReader::new(reader, self.chunk_size), segmenter);

        let mut count = 0;
        for item in stream {
            let fragment = item.map_err(|e| CliError::SegmentationFailed {
                source: source.to_string(),
                reason: e.to_string(),
            })?;
            formatter.format_fragment(&fragment)?;
            count += 1;
        }
        Ok(count)
    }

    fn create_formatter(&self) -> Result<Box<dyn OutputFormatter>> {
        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };

        Ok(match self.format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        })
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .init();
        }

        Ok(())
    }
}
