//! Character stream adapter
//!
//! Turns an iterator of text chunks into a lazy sequence of characters,
//! holding at most one chunk at a time.

use std::fmt;
use std::io::{self, Write};

const ECHO_PREFIX: &str = "Stream: ";

struct Echo {
    sink: Box<dyn Write + Send>,
    started: bool,
}

impl Echo {
    fn write_char(&mut self, ch: char) -> io::Result<()> {
        if !self.started {
            self.sink.write_all(ECHO_PREFIX.as_bytes())?;
            self.started = true;
        }
        let mut utf8 = [0u8; 4];
        self.sink.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
        self.sink.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.started {
            self.sink.write_all(b"\n")?;
            self.sink.flush()?;
        }
        Ok(())
    }
}

/// Lazy character sequence over fallible chunks
///
/// The first upstream error is yielded once; the stream is fused afterwards.
pub struct CharStream<I, S> {
    chunks: I,
    current: Option<S>,
    position: usize,
    echo: Option<Echo>,
    done: bool,
}

impl<I, S> fmt::Debug for CharStream<I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharStream")
            .field("position", &self.position)
            .field("echo", &self.echo.is_some())
            .field("done", &self.done)
            .finish()
    }
}

impl<I, S, E> CharStream<I, S>
where
    I: Iterator<Item = Result<S, E>>,
    S: AsRef<str>,
{
    pub fn new(chunks: I) -> Self {
        Self {
            chunks,
            current: None,
            position: 0,
            echo: None,
            done: false,
        }
    }

    /// Mirror every produced character to `sink`
    pub fn with_echo(mut self, sink: impl Write + Send + 'static) -> Self {
        self.echo = Some(Echo {
            sink: Box::new(sink),
            started: false,
        });
        self
    }

    fn echo_char(&mut self, ch: char) {
        let Some(echo) = self.echo.as_mut() else {
            return;
        };
        if let Err(e) = echo.write_char(ch) {
            log::warn!("Character echo failed, disabling it: {e}");
            self.echo = None;
        }
    }

    fn echo_end(&mut self) {
        if let Some(mut echo) = self.echo.take() {
            if let Err(e) = echo.finish() {
                log::warn!("Character echo failed: {e}");
            }
        }
    }
}

impl<I, S, E> Iterator for CharStream<I, S>
where
    I: Iterator<Item = Result<S, E>>,
    S: AsRef<str>,
{
    type Item = Result<char, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let next_char = self
                .current
                .as_ref()
                .and_then(|chunk| chunk.as_ref()[self.position..].chars().next());
            if let Some(ch) = next_char {
                self.position += ch.len_utf8();
                self.echo_char(ch);
                return Some(Ok(ch));
            }

            match self.chunks.next() {
                Some(Ok(chunk)) => {
                    self.current = Some(chunk);
                    self.position = 0;
                }
                Some(Err(e)) => {
                    self.done = true;
                    self.current = None;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    self.current = None;
                    self.echo_end();
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::convert::Infallible;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn ok_chunks(chunks: &[&'static str]) -> impl Iterator<Item = Result<&'static str, Infallible>> {
        chunks.to_vec().into_iter().map(Ok)
    }

    #[test]
    fn test_preserves_order_across_chunks() {
        let chars: String = CharStream::new(ok_chunks(&["Привет", "", ", ", "мир"]))
            .map(|c| c.unwrap())
            .collect();
        assert_eq!(chars, "Привет, мир");
    }

    #[test]
    fn test_error_is_yielded_once() {
        let chunks = vec![Ok("ab".to_string()), Err("lost"), Ok("cd".to_string())];
        let mut stream = CharStream::new(chunks.into_iter());

        assert_eq!(stream.next(), Some(Ok('a')));
        assert_eq!(stream.next(), Some(Ok('b')));
        assert_eq!(stream.next(), Some(Err("lost")));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_echo() {
        let sink = SharedSink::default();
        let stream = CharStream::new(ok_chunks(&["Hi", "!"])).with_echo(sink.clone());
        assert_eq!(stream.count(), 3);
        assert_eq!(String::from_utf8(sink.0.lock().clone()).unwrap(), "Stream: Hi!\n");
    }

    #[test]
    fn test_echo_failure_does_not_stop_stream() {
        let stream = CharStream::new(ok_chunks(&["abc"])).with_echo(BrokenSink);
        let chars: Vec<char> = stream.map(|c| c.unwrap()).collect();
        assert_eq!(chars, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_empty_input_writes_no_echo() {
        let sink = SharedSink::default();
        let stream = CharStream::new(ok_chunks(&[])).with_echo(sink.clone());
        assert_eq!(stream.count(), 0);
        assert!(sink.0.lock().is_empty());
    }
}
