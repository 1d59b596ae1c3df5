//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;
use streamseg_engine::Fragment;

/// Markdown formatter - outputs fragments as a numbered list
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    fragment_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            fragment_count: 0,
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_fragment(&mut self, fragment: &Fragment) -> Result<()> {
        self.fragment_count += 1;
        writeln!(self.writer, "{}. {}", self.fragment_count, fragment.as_str())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total fragments: {}*", self.fragment_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
