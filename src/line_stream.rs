//! Stream adapter that splits an HTTP body byte stream into text lines.

use crate::Error;
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Lines longer than this are dropped instead of growing the buffer forever.
const MAX_LINE_BYTES: usize = 1_000_000;

/// A stream adapter that yields one item per `\n`-terminated line.
/// Maintains internal state to handle lines (and UTF-8 characters) split across chunks.
pub struct LineStream<S> {
    /// The underlying byte stream
    inner: S,
    /// Bytes of the current, not yet terminated line
    buffer: Vec<u8>,
    /// Offset up to which `buffer` is known to contain no newline
    scanned: usize,
    /// Set once the inner stream ended or failed
    finished: bool,
}

impl<S> LineStream<S> {
    /// Create a new line stream from a byte stream.
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            buffer: Vec::new(),
            scanned: 0,
            finished: false,
        }
    }

    /// Take the next complete line out of the buffer, if there is one.
    fn next_buffered_line(&mut self) -> Option<Result<String, Error>> {
        let pos = memchr::memchr(b'\n', &self.buffer[self.scanned..])?;
        let end = self.scanned + pos;
        let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
        self.scanned = 0;

        line.pop(); // '\n'
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        Some(Self::decode(line))
    }

    fn decode(line: Vec<u8>) -> Result<String, Error> {
        String::from_utf8(line)
            .map_err(|e| Error::streaming(format!("Invalid UTF-8 in stream line: {e}")))
    }
}

impl<S, E> Stream for LineStream<S>
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Item = Result<String, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(line) = self.next_buffered_line() {
                return Poll::Ready(Some(line));
            }
            self.scanned = self.buffer.len();

            if self.finished {
                // Body ended without a final newline
                if self.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                let rest = std::mem::take(&mut self.buffer);
                self.scanned = 0;
                return Poll::Ready(Some(Self::decode(rest)));
            }

            match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => {
                    self.buffer.extend_from_slice(&chunk);

                    if self.buffer.len() > MAX_LINE_BYTES
                        && memchr::memchr(b'\n', &self.buffer).is_none()
                    {
                        self.buffer.clear();
                        self.scanned = 0;
                        return Poll::Ready(Some(Err(Error::streaming(
                            "Stream line exceeded maximum size",
                        ))));
                    }
                }
                Some(Err(e)) => {
                    // A transport failure ends the body; whatever is buffered is incomplete
                    self.finished = true;
                    self.buffer.clear();
                    self.scanned = 0;
                    return Poll::Ready(Some(Err(Error::streaming(format!(
                        "Stream error: {}",
                        e.into()
                    )))));
                }
                None => self.finished = true,
            }
        }
    }
}

/// Extension trait to add line splitting to byte streams.
pub trait LineStreamExt: Stream {
    /// Split this byte stream into text lines.
    fn lines(self) -> LineStream<Self>
    where
        Self: Sized,
    {
        LineStream::new(self)
    }
}

impl<S: Stream> LineStreamExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn byte_stream(
        chunks: Vec<Vec<u8>>,
    ) -> impl Stream<Item = Result<bytes::Bytes, std::io::Error>> + Unpin {
        stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok(bytes::Bytes::from(c)))
                .collect::<Vec<_>>(),
        )
    }

    fn text_stream(
        chunks: &[&str],
    ) -> impl Stream<Item = Result<bytes::Bytes, std::io::Error>> + Unpin {
        byte_stream(chunks.iter().map(|c| c.as_bytes().to_vec()).collect())
    }

    #[tokio::test]
    async fn test_complete_lines() {
        let mut lines = text_stream(&["data: one\n\ndata: two\n"]).lines();

        assert_eq!(lines.next().await.unwrap().unwrap(), "data: one");
        assert_eq!(lines.next().await.unwrap().unwrap(), "");
        assert_eq!(lines.next().await.unwrap().unwrap(), "data: two");
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let mut lines = text_stream(&["data: Hel", "lo\r", "\ndata: ", "World\n"]).lines();

        assert_eq!(lines.next().await.unwrap().unwrap(), "data: Hello");
        assert_eq!(lines.next().await.unwrap().unwrap(), "data: World");
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn test_final_line_without_newline() {
        let mut lines = text_stream(&["data: first\n", "data: [DONE]"]).lines();

        assert_eq!(lines.next().await.unwrap().unwrap(), "data: first");
        assert_eq!(lines.next().await.unwrap().unwrap(), "data: [DONE]");
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn test_utf8_boundary() {
        // "€" is E2 82 AC
        let mut lines =
            byte_stream(vec![b"data: Price: \xE2\x82".to_vec(), b"\xAC100\n".to_vec()]).lines();

        assert_eq!(lines.next().await.unwrap().unwrap(), "data: Price: €100");
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_stream() {
        let mut lines = byte_stream(vec![b"data: \xFF\xFE\n".to_vec(), b"data: ok\n".to_vec()]).lines();

        assert!(lines.next().await.unwrap().is_err());
        assert_eq!(lines.next().await.unwrap().unwrap(), "data: ok");
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let chunks: Vec<Result<bytes::Bytes, std::io::Error>> = vec![
            Ok(bytes::Bytes::from("data: kept\ndata: parti")),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )),
            Ok(bytes::Bytes::from("data: never seen\n")),
        ];
        let mut lines = stream::iter(chunks).lines();

        assert_eq!(lines.next().await.unwrap().unwrap(), "data: kept");
        let err = lines.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert!(lines.next().await.is_none());
    }
}
