// ABOUTME: Provides the byte-stream transport for an SMPP v3.4 session
// ABOUTME: Frames PDUs by their length prefix and serializes writes from many callers

use crate::codec::{PduHeader, MAX_PDU_SIZE};
use bytes::{Buf, Bytes, BytesMut};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, trace};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// SMPP connection transport
///
/// Owns the raw byte stream of one session. The connection is split into a
/// single [`FrameReader`], driven by the session's read loop, and a
/// [`FrameWriter`] that any number of callers share.
///
/// This type does not track session state. Which PDUs may be written when is
/// decided by the session above it.
pub struct Connection {
    reader: BoxedReader,
    writer: BoxedWriter,
    write_timeout: Duration,
}

impl Connection {
    /// Open a TCP connection to the SMSC with Nagle's algorithm disabled.
    pub async fn open(host: &str, port: u16) -> io::Result<Connection> {
        let socket = TcpStream::connect((host, port)).await?;
        socket.set_nodelay(true)?;
        debug!(host, port, "TCP connection established");
        Ok(Connection::new(socket))
    }

    /// Wrap any byte stream, such as one half of `tokio::io::duplex`.
    pub fn new<S>(stream: S) -> Connection
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        Connection {
            reader: Box::new(reader),
            writer: Box::new(writer),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    /// Bound how long a single PDU write may take
    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    pub fn into_split(self) -> (FrameReader, FrameWriter) {
        let reader = FrameReader {
            stream: self.reader,
            // 4KB holds the common PDUs several times over
            buffer: BytesMut::with_capacity(4 * 1024),
        };
        let writer = FrameWriter {
            stream: Mutex::new(BufWriter::new(self.writer)),
            write_timeout: self.write_timeout,
        };
        (reader, writer)
    }
}

/// Read half of a [`Connection`]. There is exactly one per session.
pub struct FrameReader {
    stream: BoxedReader,

    // Bytes received but not yet returned as a frame
    buffer: BytesMut,
}

impl FrameReader {
    /// Read a single length-prefixed PDU from the underlying stream.
    ///
    /// Waits until a complete frame is buffered. Any data remaining after the
    /// frame is kept for the next call.
    ///
    /// # Returns
    ///
    /// The raw frame, header included. `Ok(None)` when the peer closed the
    /// stream on a frame boundary; an error if it closed mid-frame or sent a
    /// length prefix outside 16..=65536.
    pub async fn read_frame(&mut self) -> io::Result<Option<Bytes>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` indicates "end of stream"
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                // For a clean shutdown there must be no partial frame buffered
                return if self.buffer.is_empty() {
                    Ok(None)
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        "connection reset by peer",
                    ))
                };
            }
        }
    }

    /// Split one complete frame off the buffer, if one is there.
    fn parse_frame(&mut self) -> io::Result<Option<Bytes>> {
        if self.buffer.len() < 4 {
            return Ok(None);
        }

        let length = (&self.buffer[..4]).get_u32();
        if length < PduHeader::SIZE as u32 || length > MAX_PDU_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "PDU length {length} outside {}..={MAX_PDU_SIZE}",
                    PduHeader::SIZE
                ),
            ));
        }

        let length = length as usize;
        if self.buffer.len() < length {
            self.buffer.reserve(length - self.buffer.len());
            return Ok(None);
        }

        trace!(length, "frame reassembled");
        Ok(Some(self.buffer.split_to(length).freeze()))
    }
}

/// Write half of a [`Connection`], shared by every task of a session.
pub struct FrameWriter {
    stream: Mutex<BufWriter<BoxedWriter>>,
    write_timeout: Duration,
}

impl FrameWriter {
    /// Write and flush one encoded PDU. Concurrent callers are serialized so
    /// PDUs never interleave on the wire.
    pub async fn write_frame(&self, frame: &[u8]) -> io::Result<()> {
        let mut stream = self.stream.lock().await;
        let write = async {
            stream.write_all(frame).await?;
            stream.flush().await
        };

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("write did not complete within {:?}", self.write_timeout),
            )),
        }
    }

    /// Flush and close the write side. Errors are ignored since the peer may
    /// already be gone.
    pub async fn shutdown(&self) {
        let mut stream = self.stream.lock().await;
        if let Err(error) = stream.shutdown().await {
            debug!(%error, "transport shutdown failed");
        }
    }
}
