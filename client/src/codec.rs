//! Newline-delimited framing for the hsdev wire protocol.
//!
//! hsdev speaks one UTF-8 JSON object per line in both directions. This
//! module provides [`LineReader`] and [`LineWriter`] for async reading and
//! writing of framed messages over the socket halves.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Maximum line size (16 MiB) to prevent unbounded buffering on a peer that
/// never sends a newline.
const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// Reads newline-terminated frames from an async reader.
///
/// Lines are returned in arrival order with the terminator stripped; a
/// partial segment is retained across reads until its newline arrives. A
/// trailing segment the stream ends on without a newline is never surfaced
/// as a line.
pub struct LineReader<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the next complete line.
    ///
    /// Returns `Ok(None)` on end of stream (exactly once; callers stop
    /// reading then). Returns `Err` for oversized lines.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let limit = MAX_LINE_BYTES as u64 + 1;
        let read = (&mut self.reader)
            .take(limit)
            .read_line(&mut line)
            .await
            .context("reading line")?;

        if read == 0 {
            return Ok(None);
        }

        let terminated = line.ends_with('\n');
        if terminated {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        if line.len() > MAX_LINE_BYTES {
            bail!("line exceeds maximum {MAX_LINE_BYTES} bytes");
        }
        if !terminated {
            // Stream ended mid-line; the fragment is not a frame.
            tracing::trace!("discarding {} unterminated trailing bytes", line.len());
            return Ok(None);
        }

        Ok(Some(line))
    }
}

/// Writes one JSON value per line to an async writer.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_line(&mut self, msg: &Value) -> Result<()> {
        let mut body = serde_json::to_string(msg).context("serializing message")?;
        body.push('\n');
        self.writer
            .write_all(body.as_bytes())
            .await
            .context("writing line")?;
        self.writer.flush().await.context("flushing line")?;
        Ok(())
    }
}
