//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use streamseg_engine::Fragment;

/// JSON formatter - outputs fragments as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    fragments: Vec<FragmentData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct FragmentData {
    /// The fragment text
    pub text: String,
    /// Emission path: first, confirmed, forced or final
    pub kind: String,
    /// Position within its stream
    pub index: usize,
    /// Length in characters
    pub length: usize,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            fragments: Vec::new(),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_fragment(&mut self, fragment: &Fragment) -> Result<()> {
        self.fragments.push(FragmentData {
            text: fragment.as_str().to_string(),
            kind: fragment.kind().as_str().to_string(),
            index: fragment.index(),
            length: fragment.char_len(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.fragments)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
