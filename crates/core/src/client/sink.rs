//! Output sinks for tailed log bytes.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// An append-only consumer of log bytes.
///
/// The tail engine writes each delivered chunk and flushes before issuing
/// the next read, so bytes reach the sink strictly in offset order and at
/// most one poll's worth of data is buffered.
#[async_trait]
pub trait LogSink: Send {
    /// Append one chunk and flush it.
    async fn write_chunk(&mut self, bytes: &[u8]) -> std::io::Result<()>;
}

/// Adapter writing chunks to any tokio [`AsyncWrite`] (a file, stdout, a
/// socket).
pub struct WriterSink<W>(pub W);

#[async_trait]
impl<W> LogSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_chunk(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.0.write_all(bytes).await?;
        self.0.flush().await
    }
}
