//! TCP transport for the client.
//!
//! Provides [`ConnectedClient`], which owns the socket through two background
//! tasks: a writer that drains request lines into the socket and a reader that
//! forwards every socket read as one raw chunk. The protocol has no framing,
//! so a chunk is whatever a single read returned, capped at
//! [`MAX_REPLY_SIZE`]. Protocol logic stays with the caller.

use bytes::Bytes;
use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
    task::AbortHandle,
};

use crate::MAX_REPLY_SIZE;

/// Capacity of the outgoing and incoming channels.
const CHANNEL_CAPACITY: usize = 32;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The connection is gone (server closed it or a socket operation failed).
    #[error("connection closed")]
    Closed,
}

/// Handle to a connected socket.
///
/// Lines sent on `to_server` are written verbatim. Each chunk read from the
/// socket arrives on `from_server`; the channel closes when the server closes
/// the connection or a read fails.
pub struct ConnectedClient {
    /// Send request lines to the server.
    pub to_server: mpsc::Sender<String>,
    /// Receive raw chunks from the server.
    pub from_server: mpsc::Receiver<Bytes>,
    reader: AbortHandle,
    writer: AbortHandle,
}

impl ConnectedClient {
    /// Stop both background tasks, closing the socket.
    pub fn stop(&self) {
        self.reader.abort();
        self.writer.abort();
    }
}

impl Drop for ConnectedClient {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Connect to a chat server at `server_addr` (`host:port`).
pub async fn connect(server_addr: &str) -> Result<ConnectedClient, TransportError> {
    let stream = TcpStream::connect(server_addr)
        .await
        .map_err(|e| TransportError::Connection(format!("{server_addr}: {e}")))?;

    // Requests are not terminated, so each must leave in its own segment.
    stream
        .set_nodelay(true)
        .map_err(|e| TransportError::Connection(format!("set_nodelay failed: {e}")))?;

    let (read_half, write_half) = stream.into_split();
    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let (from_server_tx, from_server_rx) = mpsc::channel::<Bytes>(CHANNEL_CAPACITY);

    let reader = tokio::spawn(read_chunks(read_half, from_server_tx));
    let writer = tokio::spawn(write_lines(write_half, to_server_rx));

    tracing::info!("connected to {server_addr}");

    Ok(ConnectedClient {
        to_server: to_server_tx,
        from_server: from_server_rx,
        reader: reader.abort_handle(),
        writer: writer.abort_handle(),
    })
}

/// Forward socket reads until EOF, error, or the receiver goes away.
async fn read_chunks(mut read_half: OwnedReadHalf, tx: mpsc::Sender<Bytes>) {
    let mut buf = [0u8; MAX_REPLY_SIZE];
    loop {
        match read_half.read(&mut buf).await {
            Ok(0) => {
                tracing::info!("server closed the connection");
                break;
            },
            Ok(n) => {
                tracing::trace!(len = n, "chunk from server");
                if tx.send(Bytes::copy_from_slice(&buf[..n])).await.is_err() {
                    break;
                }
            },
            Err(e) => {
                tracing::error!("socket read failed: {e}");
                break;
            },
        }
    }
}

/// Write request lines until the sender goes away or a write fails.
async fn write_lines(mut write_half: OwnedWriteHalf, mut rx: mpsc::Receiver<String>) {
    while let Some(line) = rx.recv().await {
        if let Err(e) = write_half.write_all(line.as_bytes()).await {
            tracing::error!("socket write failed: {e}");
            break;
        }
    }
    let _ = write_half.shutdown().await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    #[tokio::test]
    async fn lines_out_chunks_in() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let n = socket.read(&mut buf).await.unwrap();
            socket.write_all(b"+\n").await.unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        let mut client = connect(&addr).await.unwrap();
        client.to_server.send("PING".to_string()).await.unwrap();

        let chunk = client.from_server.recv().await.unwrap();
        assert_eq!(&chunk[..], b"+\n");
        assert_eq!(server.await.unwrap(), "PING");
    }

    #[tokio::test]
    async fn server_close_ends_stream() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let mut client = connect(&addr).await.unwrap();
        assert!(client.from_server.recv().await.is_none());
    }

    #[tokio::test]
    async fn unreachable_server_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let result = connect(&addr).await;
        assert!(matches!(result, Err(TransportError::Connection(_))));
    }
}
