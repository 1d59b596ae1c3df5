//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;
use streamseg_engine::Fragment;

/// Plain text formatter - outputs one fragment per line, as soon as it arrives
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_fragment(&mut self, fragment: &Fragment) -> Result<()> {
        writeln!(self.writer, "{}", fragment.as_str())?;
        // Fragments are meant to be consumed live
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
