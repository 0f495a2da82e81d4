// ABOUTME: SMPP session state machine shared by every caller of one binding
// ABOUTME: Gates outbound PDUs by state, runs the read loop and answers peer-initiated PDUs

use crate::client::correlator::{Correlator, PendingResponse};
use crate::client::error::{SmppError, SmppResult};
use crate::client::keepalive::{self, KeepAliveConfig, KeepAliveManager, KeepAliveStatus};
use crate::client::types::ClientConfig;
use crate::codec::{CodecError, Frame, PduHeader};
use crate::connection::{Connection, FrameReader, FrameWriter};
use crate::datatypes::{
    BindType, CommandId, CommandStatus, DeliverSm, DeliverSmResponse, EnquireLink,
    EnquireLinkResponse, GenericNack, SubmitSm, Unbind, UnbindResponse,
};
use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

/// Lifecycle of one SMPP binding.
///
/// ```text
/// Unbound → Binding → Bound → Unbinding → Closed
///    ↑         │
///    └─────────┘  (bind rejected or timed out)
/// ```
///
/// Any state moves straight to `Closed` on transport failure, keep-alive
/// failure or an unbind from the peer. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Unbound,
    Binding,
    Bound,
    Unbinding,
    Closed,
}

impl SessionState {
    /// Whether `command` may be written in this state.
    ///
    /// Replies to the peer (enquire_link_resp, unbind_resp, generic_nack) are
    /// allowed until the session closes. submit_sm additionally needs a bind
    /// that can transmit.
    pub fn permits(&self, command: CommandId, bind_type: Option<BindType>) -> bool {
        match command {
            CommandId::BindTransmitter | CommandId::BindReceiver | CommandId::BindTransceiver => {
                *self == SessionState::Unbound
            }
            CommandId::SubmitSm => {
                *self == SessionState::Bound && bind_type.is_some_and(|b| b.can_transmit())
            }
            CommandId::DeliverSmResp | CommandId::EnquireLink | CommandId::Unbind => {
                *self == SessionState::Bound
            }
            CommandId::EnquireLinkResp | CommandId::UnbindResp | CommandId::GenericNack => {
                *self != SessionState::Closed
            }
            _ => false,
        }
    }
}

/// Application hook for deliver_sm PDUs from the SMSC.
///
/// The returned status is sent back in the deliver_sm_resp. Called on the
/// read loop, so it must not block.
///
/// ```rust
/// use smpp_load::client::DeliverHandler;
/// use smpp_load::datatypes::{CommandStatus, DeliverSm};
///
/// let handler = |pdu: &DeliverSm| {
///     println!("from {}: {} octets", pdu.source_addr, pdu.short_message.len());
///     CommandStatus::Ok
/// };
/// let _: &dyn DeliverHandler = &handler;
/// ```
pub trait DeliverHandler: Send + Sync {
    fn on_deliver_sm(&self, pdu: &DeliverSm) -> CommandStatus;
}

impl<F> DeliverHandler for F
where
    F: Fn(&DeliverSm) -> CommandStatus + Send + Sync,
{
    fn on_deliver_sm(&self, pdu: &DeliverSm) -> CommandStatus {
        self(pdu)
    }
}

/// One SMPP session: a transport, a correlator and the state machine tying
/// them together. Shared behind an `Arc` by the handle, the read loop and
/// the keep-alive task.
pub struct Session {
    config: ClientConfig,
    writer: FrameWriter,
    correlator: Arc<Correlator>,
    state_tx: watch::Sender<SessionState>,
    bind_type: Mutex<Option<BindType>>,
    window: Semaphore,
    keep_alive: Mutex<KeepAliveManager>,
    deliver_handler: Option<Arc<dyn DeliverHandler>>,
}

impl Session {
    /// Wrap `connection` in an `Unbound` session and start its read loop.
    pub(crate) fn start(
        connection: Connection,
        config: ClientConfig,
        deliver_handler: Option<Arc<dyn DeliverHandler>>,
    ) -> Arc<Session> {
        let (reader, writer) = connection
            .with_write_timeout(config.write_timeout_duration())
            .into_split();
        let (state_tx, _) = watch::channel(SessionState::Unbound);

        let session = Arc::new(Session {
            window: Semaphore::new(config.window_size),
            keep_alive: Mutex::new(KeepAliveManager::new(config.keep_alive_config())),
            config,
            writer,
            correlator: Arc::new(Correlator::new()),
            state_tx,
            bind_type: Mutex::new(None),
            deliver_handler,
        });

        tokio::spawn(Arc::clone(&session).read_loop(reader));
        session
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    pub fn bind_type(&self) -> Option<BindType> {
        *self.bind_type.lock()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn pending_requests(&self) -> usize {
        self.correlator.pending_count()
    }

    pub fn keep_alive_status(&self) -> KeepAliveStatus {
        self.keep_alive.lock().status()
    }

    pub(crate) fn keep_alive_config(&self) -> KeepAliveConfig {
        self.keep_alive.lock().config().clone()
    }

    pub(crate) fn keep_alive_manager(&self) -> MutexGuard<'_, KeepAliveManager> {
        self.keep_alive.lock()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Resolves once the session reaches `Closed`.
    pub async fn wait_closed(&self) {
        let mut state_rx = self.subscribe();
        Self::until(&mut state_rx, |state| state == SessionState::Closed).await;
    }

    pub(crate) async fn until_unbound(state_rx: &mut watch::Receiver<SessionState>) {
        Self::until(state_rx, |state| state != SessionState::Bound).await;
    }

    async fn until(
        state_rx: &mut watch::Receiver<SessionState>,
        condition: impl Fn(SessionState) -> bool,
    ) {
        // The sender lives as long as the session, so this only ends on the condition
        let _ = state_rx.wait_for(|state| condition(*state)).await;
    }

    /// Move to `to` if the current state is one of `from`.
    fn transition(&self, from: &[SessionState], to: SessionState) -> bool {
        let mut previous = None;
        let changed = self.state_tx.send_if_modified(|state| {
            if from.contains(state) {
                previous = Some(*state);
                *state = to;
                true
            } else {
                false
            }
        });
        if let Some(previous) = previous {
            debug!(from = ?previous, to = ?to, "session state changed");
        }
        changed
    }

    fn check_permitted(&self, command: CommandId) -> SmppResult<()> {
        let state = self.state();
        if state.permits(command, self.bind_type()) {
            Ok(())
        } else {
            Err(SmppError::InvalidState { state, command })
        }
    }

    /// Bind with the configured credentials. `Unbound` → `Binding` → `Bound`;
    /// a rejection or timeout returns the session to `Unbound`.
    pub async fn bind(self: &Arc<Self>) -> SmppResult<()> {
        let request = self.config.bind_request();
        let bind_type = request.bind_type;
        let command = bind_type.request_command_id();

        if !self.transition(&[SessionState::Unbound], SessionState::Binding) {
            return Err(SmppError::InvalidState {
                state: self.state(),
                command,
            });
        }

        info!(
            system_id = %self.config.system_id,
            bind_type = %bind_type,
            "binding"
        );
        let result = self
            .request(Frame::Bind(request), self.config.bind_timeout_duration())
            .await;

        let failure = match result {
            Ok(Frame::BindResp(resp)) if resp.command_status.is_ok() => {
                *self.bind_type.lock() = Some(bind_type);
                if !self.transition(&[SessionState::Binding], SessionState::Bound) {
                    // Closed while the response was in flight
                    return Err(SmppError::ConnectionClosed);
                }
                info!(
                    smsc_system_id = %resp.system_id,
                    sc_interface_version = ?resp.sc_interface_version(),
                    bind_type = %bind_type,
                    "bound"
                );
                tokio::spawn(keepalive::run(Arc::clone(self)));
                return Ok(());
            }
            Ok(Frame::BindResp(resp)) => SmppError::BindRejected {
                status: resp.command_status,
            },
            Ok(Frame::GenericNack(nack)) => SmppError::BindRejected {
                status: nack.command_status,
            },
            Ok(other) => SmppError::UnexpectedPdu {
                expected: bind_type.response_command_id(),
                actual: other.command_id(),
            },
            Err(err) => err,
        };

        self.transition(&[SessionState::Binding], SessionState::Unbound);
        warn!(error = %failure, "bind failed");
        Err(failure)
    }

    /// Submit a message and return the SMSC message_id.
    pub async fn submit_sm(&self, submit_sm: SubmitSm) -> SmppResult<String> {
        self.check_permitted(CommandId::SubmitSm)?;

        let response = self
            .request(
                Frame::SubmitSm(Box::new(submit_sm)),
                self.config.submit_timeout_duration(),
            )
            .await?;

        match response {
            Frame::SubmitSmResp(resp) if resp.command_status.is_ok() => Ok(resp.message_id),
            Frame::SubmitSmResp(resp) => Err(SmppError::SubmitRejected {
                status: resp.command_status,
            }),
            Frame::GenericNack(nack) => Err(SmppError::SubmitRejected {
                status: nack.command_status,
            }),
            other => Err(SmppError::UnexpectedPdu {
                expected: CommandId::SubmitSmResp,
                actual: other.command_id(),
            }),
        }
    }

    /// Send one enquire_link and wait up to `timeout` for its response. The
    /// outcome is recorded in the keep-alive statistics.
    ///
    /// enquire_link does not take a window slot, so a window full of
    /// unanswered submits cannot hold it back.
    pub async fn enquire_link_within(&self, timeout: Duration) -> SmppResult<()> {
        self.check_permitted(CommandId::EnquireLink)?;
        let pending = self
            .send_request(Frame::EnquireLink(EnquireLink::new(0)))
            .await?;
        self.keep_alive.lock().on_ping_sent();

        let result = match pending.wait(timeout).await {
            Ok(Frame::EnquireLinkResp(_)) => Ok(()),
            Ok(other) => Err(SmppError::UnexpectedPdu {
                expected: CommandId::EnquireLinkResp,
                actual: other.command_id(),
            }),
            Err(err) => Err(err),
        };

        match &result {
            Ok(()) => self.keep_alive.lock().on_ping_success(),
            Err(err) if err.is_fatal() => {}
            Err(_) => self.keep_alive.lock().on_ping_failure(),
        }
        result
    }

    /// Unbind if bound, then close the transport. Safe to call repeatedly.
    pub async fn close(&self) {
        if self.transition(&[SessionState::Bound], SessionState::Unbinding) {
            let timeout = self.config.unbind_timeout_duration();
            let response = match self.send_request(Frame::Unbind(Unbind::new(0))).await {
                Ok(pending) => pending.wait(timeout).await,
                Err(err) => Err(err),
            };
            match response {
                Ok(Frame::UnbindResp(resp)) if resp.command_status.is_ok() => {
                    info!("unbound");
                }
                Ok(other) => {
                    warn!(
                        response = ?other.command_id(),
                        status = %other.command_status(),
                        "unbind not acknowledged, closing anyway"
                    );
                }
                Err(err) => warn!(error = %err, "unbind failed, closing anyway"),
            }
        }
        self.teardown().await;
    }

    /// Send a windowed request and wait for its response until `timeout`
    /// elapses.
    ///
    /// The caller has already checked the state. Waiting for a window slot
    /// counts against the same deadline.
    async fn request(&self, frame: Frame, timeout: Duration) -> SmppResult<Frame> {
        let deadline = Instant::now() + timeout;
        let command = frame.command_id();

        let _permit = match tokio::time::timeout_at(deadline, self.window.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(SmppError::ConnectionClosed),
            Err(_) => {
                debug!(command = ?command, "no window slot before deadline");
                return Err(SmppError::RequestTimeout);
            }
        };

        let pending = self.send_request(frame).await?;
        pending.wait_until(deadline).await
    }

    /// Register a waiter, stamp its sequence number on `frame` and write it.
    /// Takes no window slot.
    async fn send_request(&self, mut frame: Frame) -> SmppResult<PendingResponse> {
        let command = frame.command_id();
        let pending = self.correlator.register(command)?;
        frame.set_sequence_number(pending.sequence_number());
        let bytes = frame.encode()?;

        trace!(
            sequence_number = pending.sequence_number(),
            command = ?command,
            "sending request"
        );
        self.write(&bytes).await?;
        Ok(pending)
    }

    /// Write a reply to a peer-initiated PDU.
    async fn reply(&self, frame: Frame) -> SmppResult<()> {
        self.check_permitted(frame.command_id())?;
        let bytes = frame.encode()?;
        trace!(
            sequence_number = frame.sequence_number(),
            command = ?frame.command_id(),
            "sending reply"
        );
        self.write(&bytes).await
    }

    /// A failed write leaves the stream in an unknown state, so it ends the session.
    async fn write(&self, bytes: &[u8]) -> SmppResult<()> {
        if let Err(err) = self.writer.write_frame(bytes).await {
            error!(error = %err, "write failed, closing session");
            self.teardown().await;
            return Err(SmppError::Connection(err));
        }
        Ok(())
    }

    /// Move to `Closed`, release every waiter and shut the transport.
    pub(crate) async fn teardown(&self) {
        let was_open = self.state_tx.send_if_modified(|state| {
            if *state == SessionState::Closed {
                false
            } else {
                *state = SessionState::Closed;
                true
            }
        });

        self.correlator.fail_all();
        self.window.close();

        if was_open {
            self.writer.shutdown().await;
            info!("session closed");
        }
    }

    async fn read_loop(self: Arc<Self>, mut reader: FrameReader) {
        let mut state_rx = self.subscribe();
        let mut decode_failures = 0u32;

        loop {
            let read = tokio::select! {
                read = reader.read_frame() => read,
                _ = Self::until(&mut state_rx, |state| state == SessionState::Closed) => break,
            };

            let bytes = match read {
                Ok(Some(bytes)) => bytes,
                Ok(None) => {
                    info!("peer closed the connection");
                    break;
                }
                Err(err) => {
                    error!(error = %err, "read failed");
                    break;
                }
            };

            match Frame::decode(&bytes) {
                Ok(frame) => {
                    decode_failures = 0;
                    if !self.handle_inbound(frame).await {
                        break;
                    }
                }
                Err(err) => {
                    decode_failures += 1;
                    self.handle_decode_failure(err, &bytes).await;
                    if decode_failures >= self.config.max_decode_failures {
                        error!(decode_failures, "too many undecodable PDUs, closing session");
                        break;
                    }
                }
            }
        }

        self.teardown().await;
    }

    /// Route one inbound PDU. Returns false when the read loop should stop.
    async fn handle_inbound(&self, frame: Frame) -> bool {
        if frame.is_response() {
            self.correlator.resolve(frame);
            return true;
        }

        let sequence_number = frame.sequence_number();
        let outcome = match frame {
            Frame::EnquireLink(_) => {
                trace!(sequence_number, "answering enquire_link");
                self.reply(Frame::EnquireLinkResp(EnquireLinkResponse::new(
                    sequence_number,
                )))
                .await
            }
            Frame::DeliverSm(pdu) => self.handle_deliver_sm(&pdu).await,
            Frame::Unbind(_) => {
                info!("peer requested unbind");
                if let Err(err) = self
                    .reply(Frame::UnbindResp(UnbindResponse::new(sequence_number)))
                    .await
                {
                    debug!(error = %err, "could not acknowledge unbind");
                }
                return false;
            }
            other => {
                warn!(
                    sequence_number,
                    command = ?other.command_id(),
                    "unsupported request from peer"
                );
                self.reply(Frame::GenericNack(GenericNack::invalid_command_id(
                    sequence_number,
                )))
                .await
            }
        };

        match outcome {
            Ok(()) => true,
            Err(err) if err.is_fatal() => false,
            Err(err) => {
                debug!(error = %err, "reply not sent");
                true
            }
        }
    }

    async fn handle_deliver_sm(&self, pdu: &DeliverSm) -> SmppResult<()> {
        let sequence_number = pdu.sequence_number;

        if self.state() != SessionState::Bound {
            warn!(sequence_number, state = ?self.state(), "deliver_sm while not bound, dropping");
            return Ok(());
        }

        let status = match &self.deliver_handler {
            Some(handler) => handler.on_deliver_sm(pdu),
            None => {
                debug!(sequence_number, "no deliver handler installed, acknowledging");
                CommandStatus::Ok
            }
        };

        debug!(
            sequence_number,
            source_addr = %pdu.source_addr,
            receipt = pdu.is_delivery_receipt(),
            status = %status,
            "deliver_sm handled"
        );
        self.reply(Frame::DeliverSmResp(DeliverSmResponse::error(
            sequence_number,
            status,
        )))
        .await
    }

    /// Undecodable frames are dropped. Requests among them get a generic_nack
    /// so the peer is not left waiting.
    async fn handle_decode_failure(&self, err: CodecError, bytes: &Bytes) {
        let header = match &err {
            CodecError::UnknownCommand(header) => Some(header.clone()),
            _ => PduHeader::decode(&mut std::io::Cursor::new(&bytes[..])).ok(),
        };

        let Some(header) = header else {
            warn!(error = %err, "dropping undecodable PDU");
            return;
        };

        warn!(
            error = %err,
            command_id = header.command_id,
            sequence_number = header.sequence_number,
            "dropping undecodable PDU"
        );

        if !header.is_response() {
            let nack = GenericNack::error(header.sequence_number, err.to_command_status());
            if let Err(reply_err) = self.reply(Frame::GenericNack(nack)).await {
                debug!(error = %reply_err, "generic_nack not sent");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_only_from_unbound() {
        for command in [
            CommandId::BindTransmitter,
            CommandId::BindReceiver,
            CommandId::BindTransceiver,
        ] {
            assert!(SessionState::Unbound.permits(command, None));
            assert!(!SessionState::Binding.permits(command, None));
            assert!(!SessionState::Bound.permits(command, Some(BindType::Transceiver)));
            assert!(!SessionState::Closed.permits(command, None));
        }
    }

    #[test]
    fn submit_requires_transmitting_bind() {
        let bound = SessionState::Bound;
        assert!(bound.permits(CommandId::SubmitSm, Some(BindType::Transmitter)));
        assert!(bound.permits(CommandId::SubmitSm, Some(BindType::Transceiver)));
        assert!(!bound.permits(CommandId::SubmitSm, Some(BindType::Receiver)));
        assert!(!SessionState::Unbound.permits(CommandId::SubmitSm, None));
        assert!(!SessionState::Unbinding.permits(CommandId::SubmitSm, Some(BindType::Transceiver)));
    }

    #[test]
    fn replies_allowed_until_closed() {
        for state in [
            SessionState::Unbound,
            SessionState::Binding,
            SessionState::Bound,
            SessionState::Unbinding,
        ] {
            assert!(state.permits(CommandId::EnquireLinkResp, None));
            assert!(state.permits(CommandId::UnbindResp, None));
            assert!(state.permits(CommandId::GenericNack, None));
        }
        assert!(!SessionState::Closed.permits(CommandId::GenericNack, None));
        assert!(!SessionState::Closed.permits(CommandId::EnquireLinkResp, None));
    }

    #[test]
    fn keep_alive_and_unbind_only_when_bound() {
        assert!(SessionState::Bound.permits(CommandId::EnquireLink, None));
        assert!(!SessionState::Unbound.permits(CommandId::EnquireLink, None));
        assert!(SessionState::Bound.permits(CommandId::Unbind, None));
        assert!(!SessionState::Binding.permits(CommandId::Unbind, None));
        assert!(!SessionState::Unbinding.permits(CommandId::DeliverSmResp, None));
    }

    #[test]
    fn closures_are_deliver_handlers() {
        let handler = |pdu: &DeliverSm| {
            if pdu.short_message.is_empty() {
                CommandStatus::InvalidMsgLength
            } else {
                CommandStatus::Ok
            }
        };
        let handler: Arc<dyn DeliverHandler> = Arc::new(handler);

        let empty = DeliverSm::new("1234", "5678", Bytes::new());
        let text = DeliverSm::new("1234", "5678", &b"hi"[..]);
        assert_eq!(handler.on_deliver_sm(&empty), CommandStatus::InvalidMsgLength);
        assert_eq!(handler.on_deliver_sm(&text), CommandStatus::Ok);
    }
}
