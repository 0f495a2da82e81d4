// ABOUTME: SMPP client module for driving one shared session from many load-generating tasks
// ABOUTME: Exports the session handle, builder, configuration, error types and keep-alive status

//! SMPP Client Module
//!
//! One [`SessionHandle`] wraps one TCP connection bound to an SMSC. Handles
//! are cheap to clone, and any number of tasks can submit through the same
//! session at once:
//!
//! * **Correlation** - each request gets its own sequence number and waits
//!   only for its own response
//! * **Windowing** - at most `window_size` requests are in flight; waiting for
//!   a slot counts against the request timeout
//! * **State gating** - commands illegal in the current state fail with
//!   [`SmppError::InvalidState`] without touching the connection
//! * **Keep-alive** - enquire_link runs while bound and closes a dead session
//! * **Inbound PDUs** - enquire_link and unbind from the SMSC are answered,
//!   deliver_sm goes to an optional [`DeliverHandler`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smpp_load::client::{self, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("localhost", "test", "secret");
//! let session = client::connect(config).await?;
//!
//! let message_id = session.send_sms("1234", "5678", "Hello!").await?;
//! println!("accepted as {message_id}");
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Sharing a Session
//!
//! ```rust,no_run
//! # use smpp_load::client::{self, ClientConfig};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = client::connect(ClientConfig::new("localhost", "test", "secret")).await?;
//!
//! let mut users = Vec::new();
//! for vu in 0..50 {
//!     let session = session.clone();
//!     users.push(tokio::spawn(async move {
//!         session.send_sms("1234", &format!("4470000{vu:05}"), "load").await
//!     }));
//! }
//! for user in users {
//!     user.await??;
//! }
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! [`SmppError::Connection`] and [`SmppError::ConnectionClosed`] end the
//! session and reach every pending caller. Rejections and timeouts only
//! reach the caller that issued the request; the session stays bound. There
//! is no automatic reconnect.

pub mod builder;
pub mod correlator;
pub mod error;
pub mod handle;
pub mod keepalive;
pub mod session;
pub mod types;

pub use builder::{connect, ClientBuilder};
pub use correlator::{Correlator, PendingResponse};
pub use error::{SmppError, SmppResult};
pub use handle::SessionHandle;
pub use keepalive::{KeepAliveConfig, KeepAliveManager, KeepAliveStatus};
pub use session::{DeliverHandler, SessionState};
pub use types::{ClientConfig, SmsMessage, SmsMessageBuilder, SmsOptions};
