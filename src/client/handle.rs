// ABOUTME: Cloneable handle through which virtual users drive one shared SMPP session
// ABOUTME: Validates caller input and turns messages into submit_sm requests

use crate::client::error::SmppResult;
use crate::client::keepalive::KeepAliveStatus;
use crate::client::session::{Session, SessionState};
use crate::client::types::SmsMessage;
use crate::datatypes::{BindType, SubmitSm};
use std::sync::Arc;
use tracing::debug;

/// Handle to a running session.
///
/// Cheap to clone. Every clone talks to the same session, so many tasks can
/// submit concurrently; responses are matched by sequence number and no
/// caller waits on another's response.
///
/// The session keeps running until [`SessionHandle::close`] is called or the
/// connection fails. Dropping the last handle does not unbind.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Session>,
}

impl SessionHandle {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Bind using the credentials and bind type from the configuration.
    pub async fn bind(&self) -> SmppResult<()> {
        self.session.bind().await
    }

    /// Send a text message with the configured numbering defaults.
    ///
    /// Returns the SMSC-assigned message_id.
    pub async fn send_sms(&self, from: &str, to: &str, text: &str) -> SmppResult<String> {
        let message = SmsMessage {
            to: to.to_string(),
            from: from.to_string(),
            text: text.to_string(),
            options: self.session.config().sms_options(),
        };
        self.send_message(&message).await
    }

    /// Send a message built with [`SmsMessage::builder`].
    pub async fn send_message(&self, message: &SmsMessage) -> SmppResult<String> {
        message.validate()?;
        let message_id = self.submit_sm(message.to_submit_sm()).await?;
        debug!(to = %message.to, message_id = %message_id, "message accepted");
        Ok(message_id)
    }

    /// Submit a fully specified submit_sm. The sequence number is assigned by
    /// the session.
    pub async fn submit_sm(&self, submit_sm: SubmitSm) -> SmppResult<String> {
        self.session.submit_sm(submit_sm).await
    }

    /// Check the link with one enquire_link, bounded by the keep-alive timeout.
    pub async fn enquire_link(&self) -> SmppResult<()> {
        let timeout = self.session.keep_alive_config().timeout;
        self.session.enquire_link_within(timeout).await
    }

    /// Unbind if bound and close the connection. Safe to call more than once.
    pub async fn close(&self) {
        self.session.close().await
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_bound(&self) -> bool {
        self.state() == SessionState::Bound
    }

    /// The bind type in effect, once bound.
    pub fn bind_type(&self) -> Option<BindType> {
        self.session.bind_type()
    }

    /// Requests sent and still awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.session.pending_requests()
    }

    pub fn keep_alive_status(&self) -> KeepAliveStatus {
        self.session.keep_alive_status()
    }

    /// Resolves once the session has closed, for whatever reason.
    pub async fn wait_closed(&self) {
        self.session.wait_closed().await
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("system_id", &self.session.config().system_id)
            .field("state", &self.state())
            .field("pending_requests", &self.pending_requests())
            .finish()
    }
}
