//! SMPP v3.4 client engine for load generation.
//!
//! The crate is layered bottom-up:
//!
//! * [`datatypes`] and [`codec`] - bit-exact encoding of the PDUs a load
//!   client exchanges with an SMSC
//! * [`connection`] - length-prefixed framing over a byte stream with
//!   serialized writes
//! * [`client`] - sequence correlation, the session state machine,
//!   keep-alive and the [`SessionHandle`] facade
//!
//! ```rust,no_run
//! use smpp_load::{connect, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = connect(ClientConfig::new("localhost", "test", "secret")).await?;
//! let message_id = session.send_sms("1234", "5678", "Hello, World!").await?;
//! println!("Message sent with ID: {message_id}");
//! session.close().await;
//! # Ok(())
//! # }
//! ```

mod macros;

pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;

#[cfg(test)]
mod tests;

// Re-export codec types for direct access
pub use codec::{CodecError, Decodable, Encodable, Frame, PduHeader, PduRegistry};

// Re-export the main client API for easy access
pub use client::{
    connect, ClientBuilder, ClientConfig, DeliverHandler, SessionHandle, SessionState, SmppError,
    SmppResult, SmsMessage,
};
