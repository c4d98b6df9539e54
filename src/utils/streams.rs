// src/utils/streams.rs
use std::io;

use log::debug;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};


#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildStream {
    Stdout,
    Stderr,
}

impl ChildStream {
    fn label(&self) -> &'static str {
        match self {
            ChildStream::Stdout => "stdout",
            ChildStream::Stderr => "stderr",
        }
    }
}


/// Drains a child pipe to completion, logging each line at debug level.
/// Bytes are kept exactly as written; invalid UTF-8 is replaced only
/// when the buffer is converted at the end.
///
/// # Arguments
///
/// * `reader` - Child stdout or stderr handle.
/// * `stream` - Which stream this is, for log lines.
/// * `tool` - Tool name, for log lines.
///
/// # Returns
/// Everything the child wrote to the stream.
pub async fn read_child_stream<R>(reader: R, stream: ChildStream, tool: String) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut captured: Vec<u8> = Vec::new();
    let mut line: Vec<u8> = Vec::new();

    loop {
        line.clear();
        let n = reader.read_until(b'\n', &mut line).await?;
        if n == 0 {
            break;
        }
        debug!("[{} {}] {}", tool, stream.label(), String::from_utf8_lossy(&line).trim_end());
        captured.extend_from_slice(&line);
    }

    Ok(String::from_utf8_lossy(&captured).into_owned())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_child_stream_keeps_bytes() -> anyhow::Result<()> {
        let data: &[u8] = b"line one\n\nline three without newline";
        let out = read_child_stream(data, ChildStream::Stdout, "test".to_string()).await?;
        assert_eq!(out, "line one\n\nline three without newline");
        Ok(())
    }

    #[tokio::test]
    async fn test_read_child_stream_empty() -> anyhow::Result<()> {
        let data: &[u8] = b"";
        let out = read_child_stream(data, ChildStream::Stderr, "test".to_string()).await?;
        assert!(out.is_empty());
        Ok(())
    }
}
