//! Text line splitting for child process output.
//!
//! `yt-dlp` terminates lines with `\n`, but redraws progress with a bare
//! `\r` when it believes it is writing to a terminal. [`LineReader`] treats
//! `\n`, `\r\n` and `\r` alike, buffers partial lines until a terminator
//! arrives, and decodes lossily so garbled bytes never abort the stream.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Longest line kept in memory; longer lines are emitted in pieces.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Async reader yielding one decoded line at a time.
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            buf: Vec::new(),
        }
    }

    /// Next non-empty line without its terminator, or `None` at end of stream.
    ///
    /// A trailing line without a terminator is returned before `None`.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        loop {
            let available = self.inner.fill_buf().await?;

            if available.is_empty() {
                return Ok(self.take_line());
            }

            match available.iter().position(|b| *b == b'\n' || *b == b'\r') {
                Some(end) => {
                    self.buf.extend_from_slice(&available[..end]);
                    self.inner.consume(end + 1);
                    if let Some(line) = self.take_line() {
                        return Ok(Some(line));
                    }
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.inner.consume(len);
                    if self.buf.len() >= MAX_LINE_BYTES {
                        return Ok(self.take_line());
                    }
                }
            }
        }
    }

    fn take_line(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        Some(line)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    async fn collect(bytes: &[u8]) -> Vec<String> {
        let mut reader = LineReader::new(Cursor::new(bytes.to_vec()));
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().await.expect("read line") {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn splits_on_all_terminators() {
        let lines = collect(b"one\ntwo\r\nthree\rfour\n").await;
        assert_eq!(lines, ["one", "two", "three", "four"]);
    }

    #[tokio::test]
    async fn keeps_trailing_partial_line() {
        let lines = collect(b"done\n[download]  12.0%").await;
        assert_eq!(lines, ["done", "[download]  12.0%"]);
    }

    #[tokio::test]
    async fn skips_blank_lines() {
        let lines = collect(b"\n\n\r\na\n\n").await;
        assert_eq!(lines, ["a"]);
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let lines = collect(b"ok\n\xff\xfebad\n").await;
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("bad"));
    }

    #[tokio::test]
    async fn empty_stream_yields_nothing() {
        assert!(collect(b"").await.is_empty());
    }

    #[tokio::test]
    async fn partial_lines_across_reads_are_joined() {
        let (mut tx, rx) = tokio::io::duplex(8);
        let writer = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            tx.write_all(b"[downl").await.expect("write");
            tx.write_all(b"oad]  50.0%\nnext\n").await.expect("write");
        });

        let mut reader = LineReader::new(rx);
        assert_eq!(
            reader.next_line().await.expect("read").as_deref(),
            Some("[download]  50.0%")
        );
        assert_eq!(reader.next_line().await.expect("read").as_deref(), Some("next"));
        writer.await.expect("writer");
        assert_eq!(reader.next_line().await.expect("read"), None);
    }
}
