//! Chunked UTF-8 reading

use std::io::{self, Read};

/// Default bytes per chunk, roughly a handful of model tokens
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Reads a byte stream as a sequence of UTF-8 text chunks
///
/// A multi-byte character split across reads is held back until it is
/// complete, so every chunk is valid text. Chunks never exceed the read size
/// plus three carried-over bytes.
pub struct ChunkReader<R> {
    reader: R,
    buf: Vec<u8>,
    pending: Vec<u8>,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Create a reader yielding chunks of about `chunk_size` bytes
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            buf: vec![0; chunk_size.max(1)],
            pending: Vec::new(),
            done: false,
        }
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let read = match self.reader.read(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            if read == 0 {
                self.done = true;
                if self.pending.is_empty() {
                    return None;
                }
                return Some(Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "input ends inside a UTF-8 sequence",
                )));
            }

            self.pending.extend_from_slice(&self.buf[..read]);
            match take_complete_text(&mut self.pending) {
                Ok(Some(text)) => return Some(Ok(text)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Split off the longest valid UTF-8 prefix, keeping an incomplete tail
fn take_complete_text(pending: &mut Vec<u8>) -> io::Result<Option<String>> {
    let valid = match std::str::from_utf8(pending) {
        Ok(_) => pending.len(),
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
    };
    if valid == 0 {
        return Ok(None);
    }

    let tail = pending.split_off(valid);
    let complete = std::mem::replace(pending, tail);
    String::from_utf8(complete)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(bytes: &[u8], size: usize) -> io::Result<Vec<String>> {
        ChunkReader::new(Cursor::new(bytes.to_vec()), size).collect()
    }

    #[test]
    fn test_ascii_chunks() {
        let chunks = collect(b"Hello, world!", 5).unwrap();
        assert_eq!(chunks, vec!["Hello", ", wor", "ld!"]);
    }

    #[test]
    fn test_multibyte_never_split() {
        let text = "Привет, мир! Как дела?";
        for size in 1..8 {
            let chunks = collect(text.as_bytes(), size).unwrap();
            assert_eq!(chunks.concat(), text);
            assert!(chunks.iter().all(|c| !c.is_empty()));
        }
    }

    #[test]
    fn test_invalid_utf8() {
        let result = collect(&[b'a', 0xff, b'b'], 8);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_sequence_at_eof() {
        let bytes = "ж".as_bytes();
        let result = collect(&bytes[..1], 4);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"", 4).unwrap().is_empty());
    }
}
