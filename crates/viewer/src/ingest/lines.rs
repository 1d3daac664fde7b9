//! Line splitting over a byte stream.
//!
//! Line-ending agnostic: `\n`, `\r\n`, and lone `\r` all terminate a line,
//! including a `\r\n` pair split across two read chunks. A trailing line
//! without a terminator is emitted at end of stream. No line-length limit.

use bytes::{Bytes, BytesMut};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_stream::Stream;

use super::READ_CHUNK_SIZE;

/// Incremental splitter: feed chunks in, take complete lines out.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buf: BytesMut,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk read from the source.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// The next complete line, if one is buffered.
    ///
    /// A `\r` as the final buffered byte is not yet a terminator: the next
    /// chunk may begin with `\n`. Call [`finish`](Self::finish) at end of
    /// stream to flush it.
    pub fn next_line(&mut self) -> Option<Bytes> {
        let pos = self.buf.iter().position(|b| *b == b'\n' || *b == b'\r')?;

        let consumed = match self.buf[pos] {
            b'\n' => pos + 1,
            // CR: need one byte of lookahead to tell CRLF from lone CR
            _ if pos + 1 == self.buf.len() => return None,
            _ if self.buf[pos + 1] == b'\n' => pos + 2,
            _ => pos + 1,
        };

        let mut line = self.buf.split_to(consumed);
        line.truncate(pos);
        Some(line.freeze())
    }

    /// Remaining content at end of stream, if any.
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.buf.is_empty() {
            return None;
        }
        let mut line = self.buf.split_off(0);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        Some(line.freeze())
    }
}

/// Stream the lines of an open file.
pub fn stream_lines(mut file: File) -> impl Stream<Item = std::io::Result<Bytes>> {
    async_stream::try_stream! {
        let mut splitter = LineSplitter::new();
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let n = file.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            splitter.extend(&chunk[..n]);
            while let Some(line) = splitter.next_line() {
                yield line;
            }
        }
        if let Some(line) = splitter.finish() {
            yield line;
        }
    }
}
