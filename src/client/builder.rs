// ABOUTME: Client factory for opening and binding SMPP sessions
// ABOUTME: Wires configuration, transport and deliver handler into a running session

use crate::client::error::SmppResult;
use crate::client::handle::SessionHandle;
use crate::client::session::{DeliverHandler, Session};
use crate::client::types::ClientConfig;
use crate::connection::Connection;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

/// Factory for SMPP sessions
///
/// `connect` opens the TCP connection and binds in one step. `open` stops
/// before the bind so the caller controls when (and whether) to bind. The
/// `_stream` variants run the session over any byte stream, which is how the
/// tests drive a mock SMSC.
///
/// ```rust,no_run
/// use smpp_load::client::{ClientBuilder, ClientConfig};
/// use smpp_load::datatypes::CommandStatus;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("localhost", "test", "secret");
/// let client = ClientBuilder::new(config)
///     .deliver_handler(|pdu: &smpp_load::datatypes::DeliverSm| {
///         println!("receipt: {:?}", pdu.receipted_message_id());
///         CommandStatus::Ok
///     })
///     .connect()
///     .await?;
///
/// let message_id = client.send_sms("1234", "5678", "hello").await?;
/// println!("accepted as {message_id}");
/// client.close().await;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
    deliver_handler: Option<Arc<dyn DeliverHandler>>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            deliver_handler: None,
        }
    }

    /// Install the handler that answers deliver_sm from the SMSC.
    ///
    /// Without one, deliver_sm is acknowledged with ESME_ROK and dropped.
    pub fn deliver_handler(mut self, handler: impl DeliverHandler + 'static) -> Self {
        self.deliver_handler = Some(Arc::new(handler));
        self
    }

    /// Open the TCP connection and start an `Unbound` session.
    pub async fn open(self) -> SmppResult<SessionHandle> {
        self.config.validate()?;
        let connection = Connection::open(&self.config.host, self.config.port).await?;
        info!(host = %self.config.host, port = self.config.port, "connected to SMSC");
        Ok(self.start(connection))
    }

    /// Start an `Unbound` session over an already connected stream.
    pub fn open_stream<S>(self, stream: S) -> SmppResult<SessionHandle>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        self.config.validate()?;
        Ok(self.start(Connection::new(stream)))
    }

    /// Open the TCP connection and bind.
    pub async fn connect(self) -> SmppResult<SessionHandle> {
        let handle = self.open().await?;
        bind_or_close(handle).await
    }

    /// Bind over an already connected stream.
    pub async fn connect_stream<S>(self, stream: S) -> SmppResult<SessionHandle>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let handle = self.open_stream(stream)?;
        bind_or_close(handle).await
    }

    fn start(self, connection: Connection) -> SessionHandle {
        SessionHandle::new(Session::start(
            connection,
            self.config,
            self.deliver_handler,
        ))
    }
}

/// A session that failed to bind is closed rather than handed back half open.
async fn bind_or_close(handle: SessionHandle) -> SmppResult<SessionHandle> {
    match handle.bind().await {
        Ok(()) => Ok(handle),
        Err(err) => {
            handle.close().await;
            Err(err)
        }
    }
}

/// Validate `config`, connect to the SMSC and bind.
///
/// Shorthand for `ClientBuilder::new(config).connect()`.
pub async fn connect(config: ClientConfig) -> SmppResult<SessionHandle> {
    ClientBuilder::new(config).connect().await
}
