//! Pull-based fragment stream

use crate::config::SegmenterConfig;
use crate::error::{ConfigResult, SegmentError};
use crate::fragment::{Fragment, SegmenterStats};
use crate::input::CharStream;
use crate::segmenter::Segmenter;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::iter::{self, Map};

/// Chunk iterator adapter used for plain, infallible chunks
pub type InfallibleChunks<I, S> = Map<I, fn(S) -> Result<S, Infallible>>;

/// Iterator of fragments over a chunk iterator
///
/// Chunks are pulled only while no fragment is pending. An upstream error is
/// yielded once and ends the stream without draining the buffer.
#[derive(Debug)]
pub struct SentenceStream<I, S> {
    chars: CharStream<I, S>,
    segmenter: Segmenter,
    pending: VecDeque<Fragment>,
    finished: bool,
}

impl<I, S, E> SentenceStream<I, S>
where
    I: Iterator<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Into<SegmentError>,
{
    pub fn new(chunks: I, segmenter: Segmenter) -> Self {
        let chars = CharStream::new(chunks);
        let chars = if segmenter.config().log_characters {
            chars.with_echo(std::io::stderr())
        } else {
            chars
        };

        Self {
            chars,
            segmenter,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    pub fn stats(&self) -> SegmenterStats {
        self.segmenter.stats()
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }
}

impl<I, S, E> Iterator for SentenceStream<I, S>
where
    I: Iterator<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Into<SegmentError>,
{
    type Item = Result<Fragment, SegmentError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Some(Ok(fragment));
            }
            if self.finished {
                return None;
            }

            let pending = &mut self.pending;
            match self.chars.next() {
                Some(Ok(ch)) => self.segmenter.step(ch, &mut |f| pending.push_back(f)),
                Some(Err(e)) => {
                    self.finished = true;
                    let err = e.into();
                    log::warn!("Stream aborted: {err}");
                    return Some(Err(err));
                }
                None => {
                    self.finished = true;
                    self.segmenter.finish(&mut |f| pending.push_back(f));
                }
            }
        }
    }
}

/// Stream fragments from plain chunks using the configured backend
pub fn generate_sentences<I, S>(
    chunks: I,
    config: SegmenterConfig,
) -> ConfigResult<SentenceStream<InfallibleChunks<I::IntoIter, S>, S>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segmenter = Segmenter::from_config(config)?;
    let chunks = chunks
        .into_iter()
        .map(Ok as fn(S) -> Result<S, Infallible>);
    Ok(SentenceStream::new(chunks, segmenter))
}

/// Segment a complete text in one go
pub fn segment_text(text: &str, config: SegmenterConfig) -> Result<Vec<String>, SegmentError> {
    generate_sentences(iter::once(text), config)?
        .map(|fragment| fragment.map(Fragment::into_text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CustomTokenizer;

    fn split_on_periods() -> CustomTokenizer {
        CustomTokenizer::infallible(|text| {
            text.split_inclusive('.')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    #[test]
    fn test_stream_matches_direct_driving() {
        let config = SegmenterConfig::default();
        let segmenter = Segmenter::with_custom_tokenizer(config, split_on_periods()).unwrap();
        let chunks = vec!["Hello world, ", "this is a test. ", "Another one here."];
        let stream = SentenceStream::new(chunks.into_iter().map(Ok::<_, Infallible>), segmenter);

        let fragments: Vec<String> = stream.map(|f| f.unwrap().into_text()).collect();
        assert_eq!(
            fragments,
            vec!["Hello world,", "this is a test.", "Another one here."]
        );
    }

    #[test]
    fn test_upstream_error_ends_stream() {
        let segmenter =
            Segmenter::with_custom_tokenizer(SegmenterConfig::default(), split_on_periods())
                .unwrap();
        let chunks: Vec<Result<&str, std::io::Error>> = vec![
            Ok("Partial text without end"),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let mut stream = SentenceStream::new(chunks.into_iter(), segmenter);

        match stream.next() {
            Some(Err(SegmentError::Upstream(e))) => assert!(e.to_string().contains("reset")),
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(stream.next().is_none());
        assert_eq!(stream.stats().fragments_emitted, 0);
    }

    #[test]
    fn test_segment_text() {
        let sentences = segment_text(
            "Привет! Как дела? Отлично, спасибо.",
            SegmenterConfig::builder()
                .min_first_fragment_length(5)
                .min_sentence_length(5)
                .short_sentence_merge_length(5)
                .build()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(sentences, vec!["Привет!", "Как дела?", "Отлично, спасибо."]);
    }

    #[test]
    fn test_generate_sentences_rejects_custom_without_callback() {
        let config = SegmenterConfig::builder().backend("custom").unwrap().build().unwrap();
        assert!(generate_sentences(["text"], config).is_err());
    }
}
