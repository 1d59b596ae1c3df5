//! Segmenter running on a worker thread
//!
//! Chunks go in through a [`ChunkSender`], fragments come out of a
//! [`SegmenterHandle`]. Both channels are bounded, so a slow consumer
//! eventually blocks the producer.
//!
//! ```text
//! producer --ChunkSender--> [worker: SentenceStream] --SegmenterHandle--> consumer
//! ```

use crate::error::{Result, SegmentError};
use crate::fragment::{Fragment, SegmenterStats};
use crate::segmenter::Segmenter;
use crate::stream::SentenceStream;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

#[derive(Debug)]
enum ChunkMessage {
    Chunk(String),
    End,
}

/// Producer side of a worker segmenter
///
/// Dropping the sender without calling [`ChunkSender::finish`] abandons the
/// stream: the consumer receives [`SegmentError::SourceAbandoned`] and the
/// buffered text is discarded.
#[derive(Debug)]
pub struct ChunkSender {
    tx: Option<Sender<ChunkMessage>>,
}

impl ChunkSender {
    /// Send one chunk, blocking while the worker is saturated
    pub fn send(&self, chunk: impl Into<String>) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(SegmentError::WorkerStopped)?;
        tx.send(ChunkMessage::Chunk(chunk.into()))
            .map_err(|_| SegmentError::WorkerStopped)
    }

    /// Signal end of input so the worker drains its buffer
    pub fn finish(mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => tx
                .send(ChunkMessage::End)
                .map_err(|_| SegmentError::WorkerStopped),
            None => Err(SegmentError::WorkerStopped),
        }
    }
}

impl Drop for ChunkSender {
    fn drop(&mut self) {
        if self.tx.is_some() {
            log::debug!("Chunk sender dropped before end of input");
        }
    }
}

struct ChunkReceiver {
    rx: Receiver<ChunkMessage>,
    ended: bool,
}

impl Iterator for ChunkReceiver {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ended {
            return None;
        }
        match self.rx.recv() {
            Ok(ChunkMessage::Chunk(chunk)) => Some(Ok(chunk)),
            Ok(ChunkMessage::End) => {
                self.ended = true;
                None
            }
            Err(_) => {
                self.ended = true;
                Some(Err(SegmentError::SourceAbandoned))
            }
        }
    }
}

/// Consumer side of a worker segmenter
#[derive(Debug)]
pub struct SegmenterHandle {
    fragments: Receiver<Result<Fragment>>,
    worker: JoinHandle<SegmenterStats>,
}

impl SegmenterHandle {
    /// Next fragment, or `None` once the worker is done
    pub fn recv(&self) -> Option<Result<Fragment>> {
        self.fragments.recv().ok()
    }

    /// Blocking iterator over the remaining fragments
    pub fn iter(&self) -> impl Iterator<Item = Result<Fragment>> + '_ {
        self.fragments.iter()
    }

    /// Stop consuming and wait for the worker
    ///
    /// Undelivered fragments are discarded.
    pub fn join(self) -> Result<SegmenterStats> {
        let Self { fragments, worker } = self;
        drop(fragments);
        worker.join().map_err(|_| SegmentError::WorkerStopped)
    }
}

/// Run `segmenter` on a worker thread
///
/// `capacity` bounds both the chunk queue and the fragment queue.
pub fn spawn_segmenter(segmenter: Segmenter, capacity: usize) -> (ChunkSender, SegmenterHandle) {
    let (chunk_tx, chunk_rx) = bounded(capacity);
    let (fragment_tx, fragment_rx) = bounded(capacity);

    let chunks = ChunkReceiver {
        rx: chunk_rx,
        ended: false,
    };
    let worker = thread::spawn(move || run_worker(segmenter, chunks, fragment_tx));

    (
        ChunkSender { tx: Some(chunk_tx) },
        SegmenterHandle {
            fragments: fragment_rx,
            worker,
        },
    )
}

fn run_worker(
    segmenter: Segmenter,
    chunks: ChunkReceiver,
    out: Sender<Result<Fragment>>,
) -> SegmenterStats {
    let mut stream = SentenceStream::new(chunks, segmenter);
    for item in stream.by_ref() {
        if out.send(item).is_err() {
            log::debug!("Fragment receiver dropped; stopping worker");
            break;
        }
    }
    let stats = stream.stats();
    log::debug!("Worker finished: {stats:?}");
    stats
}
