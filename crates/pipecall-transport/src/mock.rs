//! Scripted in-memory pipe.
//!
//! [`MockPipe`] plays back a queue of server messages and OS failures with
//! message-mode semantics: a message longer than the read buffer comes back as
//! [`ReadOutcome::ChunkContinues`] pieces followed by a final
//! [`ReadOutcome::Chunk`]. Once the script runs out the pipe reports
//! [`ReadOutcome::Closed`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use crate::error::OsErrorCode;
use crate::traits::{RawPipe, ReadOutcome};

#[derive(Debug)]
enum Step {
    Message(Bytes),
    Error(OsErrorCode),
    Closed,
}

#[derive(Debug, Default)]
struct StatsInner {
    reads: AtomicUsize,
    closes: AtomicUsize,
    written: Mutex<Vec<Bytes>>,
}

/// Counters shared with a [`MockPipe`], readable after the pipe is dropped.
#[derive(Debug, Clone, Default)]
pub struct MockStats {
    inner: Arc<StatsInner>,
}

impl MockStats {
    /// Number of OS reads performed.
    pub fn read_calls(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    /// Number of times the handle was released.
    pub fn close_calls(&self) -> usize {
        self.inner.closes.load(Ordering::SeqCst)
    }

    /// Messages accepted by successful writes, in order.
    pub fn written(&self) -> Vec<Bytes> {
        match self.inner.written.lock() {
            Ok(written) => written.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record_write(&self, message: Bytes) {
        match self.inner.written.lock() {
            Ok(mut written) => written.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}

/// In-memory [`RawPipe`] driven by a script.
#[derive(Debug, Default)]
pub struct MockPipe {
    script: VecDeque<Step>,
    write_faults: Vec<(usize, WriteFault)>,
    writes: usize,
    stats: MockStats,
}

#[derive(Debug, Clone, Copy)]
enum WriteFault {
    Fail(OsErrorCode),
    Short(usize),
}

impl MockPipe {
    /// An empty script: the first read reports a closed pipe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one server message.
    pub fn with_message(mut self, message: impl AsRef<[u8]>) -> Self {
        self.script
            .push_back(Step::Message(Bytes::copy_from_slice(message.as_ref())));
        self
    }

    /// Queue a framed response: a 4-byte native-order header message followed
    /// by the body message.
    pub fn with_response(self, body: impl AsRef<[u8]>) -> Self {
        let body = body.as_ref();
        let len = u32::try_from(body.len()).unwrap_or(u32::MAX);
        self.with_message(len.to_ne_bytes()).with_message(body)
    }

    /// Queue `count` consecutive failed reads with `code`.
    pub fn with_transient_errors(mut self, count: usize, code: OsErrorCode) -> Self {
        for _ in 0..count {
            self.script.push_back(Step::Error(code));
        }
        self
    }

    /// Queue a server-side close. Every read after it also reports closed.
    pub fn with_close(mut self) -> Self {
        self.script.push_back(Step::Closed);
        self
    }

    /// Make the write with zero-based index `index` fail with `code`.
    pub fn failing_write(mut self, index: usize, code: OsErrorCode) -> Self {
        self.write_faults.push((index, WriteFault::Fail(code)));
        self
    }

    /// Make the write with zero-based index `index` accept only `accepted` bytes.
    pub fn short_write(mut self, index: usize, accepted: usize) -> Self {
        self.write_faults.push((index, WriteFault::Short(accepted)));
        self
    }

    /// Shared counters for this pipe.
    pub fn stats(&self) -> MockStats {
        self.stats.clone()
    }

    /// Number of OS reads performed.
    pub fn read_calls(&self) -> usize {
        self.stats.read_calls()
    }

    /// Number of times the handle was released.
    pub fn close_calls(&self) -> usize {
        self.stats.close_calls()
    }

    /// Messages accepted by successful writes, in order.
    pub fn written(&self) -> Vec<Bytes> {
        self.stats.written()
    }
}

impl RawPipe for MockPipe {
    fn read_chunk(&mut self, buf_size: usize) -> ReadOutcome {
        self.stats.inner.reads.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front() {
            None => ReadOutcome::Closed,
            Some(Step::Closed) => {
                self.script.push_front(Step::Closed);
                ReadOutcome::Closed
            }
            Some(Step::Error(code)) => ReadOutcome::TransientError(code),
            Some(Step::Message(mut message)) => {
                if message.len() > buf_size {
                    let head = message.split_to(buf_size);
                    self.script.push_front(Step::Message(message));
                    ReadOutcome::ChunkContinues(head)
                } else {
                    ReadOutcome::Chunk(message)
                }
            }
        }
    }

    fn write_message(&mut self, buf: &[u8]) -> Result<usize, OsErrorCode> {
        let index = self.writes;
        self.writes += 1;

        let fault = self
            .write_faults
            .iter()
            .find(|(at, _)| *at == index)
            .map(|(_, fault)| *fault);
        match fault {
            Some(WriteFault::Fail(code)) => Err(code),
            Some(WriteFault::Short(accepted)) => {
                let accepted = accepted.min(buf.len());
                self.stats
                    .record_write(Bytes::copy_from_slice(&buf[..accepted]));
                Ok(accepted)
            }
            None => {
                self.stats.record_write(Bytes::copy_from_slice(buf));
                Ok(buf.len())
            }
        }
    }

    fn close(&mut self) {
        self.stats.inner.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_message_is_split_at_buffer_size() {
        let mut pipe = MockPipe::new().with_message(b"0123456789");

        assert_eq!(
            pipe.read_chunk(4),
            ReadOutcome::ChunkContinues(Bytes::from_static(b"0123"))
        );
        assert_eq!(
            pipe.read_chunk(4),
            ReadOutcome::ChunkContinues(Bytes::from_static(b"4567"))
        );
        assert_eq!(pipe.read_chunk(4), ReadOutcome::Chunk(Bytes::from_static(b"89")));
        assert_eq!(pipe.read_chunk(4), ReadOutcome::Closed);
        assert_eq!(pipe.read_calls(), 4);
    }

    #[test]
    fn test_close_is_sticky() {
        let mut pipe = MockPipe::new().with_close().with_message(b"never");
        assert_eq!(pipe.read_chunk(16), ReadOutcome::Closed);
        assert_eq!(pipe.read_chunk(16), ReadOutcome::Closed);
    }

    #[test]
    fn test_write_faults_apply_by_index() {
        let mut pipe = MockPipe::new().short_write(0, 2).failing_write(1, 232);

        assert_eq!(pipe.write_message(b"abcd"), Ok(2));
        assert_eq!(pipe.write_message(b"efgh"), Err(232));
        assert_eq!(pipe.write_message(b"ijkl"), Ok(4));
        assert_eq!(
            pipe.written(),
            vec![Bytes::from_static(b"ab"), Bytes::from_static(b"ijkl")]
        );
    }

    #[test]
    fn test_with_response_frames_body() {
        let mut pipe = MockPipe::new().with_response("ok");
        assert_eq!(
            pipe.read_chunk(4096),
            ReadOutcome::Chunk(Bytes::copy_from_slice(&2u32.to_ne_bytes()))
        );
        assert_eq!(pipe.read_chunk(4096), ReadOutcome::Chunk(Bytes::from_static(b"ok")));
    }
}
