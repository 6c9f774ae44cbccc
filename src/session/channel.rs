//! Line framing for the session protocol.
//!
//! Reads are `\n`-delimited and trimmed. Output lines end in `\r\n`; prompts
//! end in a single space and no newline.

use super::error::{ProtocolViolation, SessionError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub struct LineChannel<R, W> {
    reader: R,
    writer: W,
    max_line_bytes: usize,
}

impl<R, W> LineChannel<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub const fn new(reader: R, writer: W, max_line_bytes: usize) -> Self {
        Self {
            reader,
            writer,
            max_line_bytes,
        }
    }

    /// Reads one line and returns it with surrounding whitespace removed.
    ///
    /// End of stream, including a final line with no terminator, is reported
    /// as [`ProtocolViolation::Closed`].
    pub async fn read_line(&mut self) -> Result<String, SessionError> {
        let limit = self.max_line_bytes as u64 + 1;
        let mut buf = Vec::new();

        let n = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut buf)
            .await?;

        if buf.last() != Some(&b'\n') {
            if n as u64 >= limit {
                return Err(ProtocolViolation::LineTooLong(self.max_line_bytes).into());
            }
            return Err(ProtocolViolation::Closed.into());
        }

        let line = String::from_utf8(buf).map_err(|_| ProtocolViolation::InvalidUtf8)?;
        Ok(line.trim().to_string())
    }

    pub async fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn send_lines<I, S>(&mut self, lines: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.writer.write_all(line.as_ref().as_bytes()).await?;
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Writes `text` followed by a space and reads the answer.
    pub async fn prompt(&mut self, text: &str) -> Result<String, SessionError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b" ").await?;
        self.writer.flush().await?;
        self.read_line().await
    }

    pub async fn close(&mut self) {
        let _ = self.writer.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(input: &'static [u8], max: usize) -> LineChannel<&'static [u8], Vec<u8>> {
        LineChannel::new(input, Vec::new(), max)
    }

    #[tokio::test]
    async fn reads_trimmed_lines() {
        let mut ch = channel(b"  alice \r\nexit\n", 64);
        assert_eq!(ch.read_line().await.unwrap(), "alice");
        assert_eq!(ch.read_line().await.unwrap(), "exit");
        assert!(matches!(
            ch.read_line().await,
            Err(SessionError::Protocol(ProtocolViolation::Closed))
        ));
    }

    #[tokio::test]
    async fn unterminated_final_line_is_a_close() {
        let mut ch = channel(b"half", 64);
        assert!(matches!(
            ch.read_line().await,
            Err(SessionError::Protocol(ProtocolViolation::Closed))
        ));
    }

    #[tokio::test]
    async fn rejects_overlong_lines() {
        let mut ch = channel(b"0123456789\n", 4);
        assert!(matches!(
            ch.read_line().await,
            Err(SessionError::Protocol(ProtocolViolation::LineTooLong(4)))
        ));
    }

    #[tokio::test]
    async fn line_at_limit_is_accepted() {
        let mut ch = channel(b"abcd\n", 4);
        assert_eq!(ch.read_line().await.unwrap(), "abcd");
    }

    #[tokio::test]
    async fn rejects_invalid_utf8() {
        let mut ch = channel(b"\xff\xfe\n", 64);
        assert!(matches!(
            ch.read_line().await,
            Err(SessionError::Protocol(ProtocolViolation::InvalidUtf8))
        ));
    }

    #[tokio::test]
    async fn frames_output() {
        let mut ch = channel(b"42\n", 64);
        ch.send_line("hello").await.unwrap();
        assert_eq!(ch.prompt("Enter RAM size:").await.unwrap(), "42");
        ch.send_lines(["a", "b"]).await.unwrap();
        assert_eq!(ch.writer, b"hello\r\nEnter RAM size: a\r\nb\r\n");
    }
}
