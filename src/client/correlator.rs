// ABOUTME: Matches inbound SMPP responses to the callers waiting on them
// ABOUTME: Allocates sequence numbers and owns the pending-request registry of one session

use crate::client::error::{SmppError, SmppResult};
use crate::codec::Frame;
use crate::datatypes::CommandId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Largest sequence number allowed by SMPP v3.4; allocation wraps back to 1.
pub const MAX_SEQUENCE_NUMBER: u32 = 0x7FFF_FFFF;

/// One outstanding request, owned by the registry until resolved or abandoned.
struct PendingRequest {
    /// Distinguishes this registration from a later one that reuses the
    /// sequence number after wraparound
    registration: u64,
    command_id: CommandId,
    sent_at: Instant,
    response_tx: oneshot::Sender<Frame>,
}

struct Registry {
    next_sequence: u32,
    next_registration: u64,
    pending: HashMap<u32, PendingRequest>,
    closed: bool,
}

impl Registry {
    fn advance(&mut self) -> u32 {
        let sequence = self.next_sequence;
        self.next_sequence = if sequence >= MAX_SEQUENCE_NUMBER {
            1
        } else {
            sequence + 1
        };
        sequence
    }
}

/// Sequence allocator and pending-request registry for one session.
///
/// The lock is held only for map operations, never across I/O or codec work.
pub struct Correlator {
    registry: Mutex<Registry>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::with_initial_sequence(1)
    }

    /// Start allocation at `sequence` (clamped into 1..=0x7FFFFFFF)
    pub fn with_initial_sequence(sequence: u32) -> Self {
        Self {
            registry: Mutex::new(Registry {
                next_sequence: sequence.clamp(1, MAX_SEQUENCE_NUMBER),
                next_registration: 0,
                pending: HashMap::new(),
                closed: false,
            }),
        }
    }

    /// Allocate a sequence number and register a waiter for its response.
    ///
    /// Numbers still pending are skipped, so a slow request survives the
    /// counter wrapping around. Fails with `ConnectionClosed` once
    /// [`Correlator::fail_all`] has run.
    pub fn register(self: &Arc<Self>, command_id: CommandId) -> SmppResult<PendingResponse> {
        let (response_tx, response_rx) = oneshot::channel();
        let mut registry = self.registry.lock();

        if registry.closed {
            return Err(SmppError::ConnectionClosed);
        }

        let sequence_number = loop {
            let candidate = registry.advance();
            if !registry.pending.contains_key(&candidate) {
                break candidate;
            }
            trace!(sequence_number = candidate, "sequence still pending, skipping");
        };

        let registration = registry.next_registration;
        registry.next_registration += 1;
        registry.pending.insert(
            sequence_number,
            PendingRequest {
                registration,
                command_id,
                sent_at: Instant::now(),
                response_tx,
            },
        );

        Ok(PendingResponse {
            sequence_number,
            registration,
            correlator: Arc::clone(self),
            response_rx,
        })
    }

    /// Deliver a response to the caller waiting on its sequence number.
    ///
    /// Returns false when nobody is waiting: an unknown or duplicate sequence
    /// number, or a caller that already gave up.
    pub fn resolve(&self, frame: Frame) -> bool {
        let sequence_number = frame.sequence_number();
        let entry = self.registry.lock().pending.remove(&sequence_number);

        match entry {
            Some(pending) => {
                debug!(
                    sequence_number,
                    request = ?pending.command_id,
                    response = ?frame.command_id(),
                    elapsed_ms = pending.sent_at.elapsed().as_millis() as u64,
                    "response matched"
                );
                pending.response_tx.send(frame).is_ok()
            }
            None => {
                debug!(
                    sequence_number,
                    response = ?frame.command_id(),
                    "no pending request for response, dropping"
                );
                false
            }
        }
    }

    /// Release every waiter with `ConnectionClosed` and refuse new requests.
    pub fn fail_all(&self) {
        let drained: Vec<PendingRequest> = {
            let mut registry = self.registry.lock();
            registry.closed = true;
            registry.pending.drain().map(|(_, pending)| pending).collect()
        };

        if !drained.is_empty() {
            debug!(count = drained.len(), "failing pending requests");
        }
        // Dropping each sender wakes its receiver with an error
        drop(drained);
    }

    pub fn pending_count(&self) -> usize {
        self.registry.lock().pending.len()
    }

    fn abandon(&self, sequence_number: u32, registration: u64) {
        let mut registry = self.registry.lock();
        let ours = registry
            .pending
            .get(&sequence_number)
            .is_some_and(|pending| pending.registration == registration);
        if ours {
            registry.pending.remove(&sequence_number);
        }
    }
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one registered request. Dropping it before a response arrives
/// removes the registry entry.
pub struct PendingResponse {
    sequence_number: u32,
    registration: u64,
    correlator: Arc<Correlator>,
    response_rx: oneshot::Receiver<Frame>,
}

impl PendingResponse {
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// Wait up to `timeout` for the response.
    pub async fn wait(self, timeout: Duration) -> SmppResult<Frame> {
        self.wait_until(Instant::now() + timeout).await
    }

    /// Wait until `deadline` for the response.
    ///
    /// `RequestTimeout` if the deadline passes (the entry is removed, so a
    /// late response is discarded); `ConnectionClosed` if the session dies.
    pub async fn wait_until(mut self, deadline: Instant) -> SmppResult<Frame> {
        match tokio::time::timeout_at(deadline, &mut self.response_rx).await {
            Ok(Ok(frame)) => Ok(frame),
            Ok(Err(_)) => Err(SmppError::ConnectionClosed),
            Err(_) => {
                debug!(sequence_number = self.sequence_number, "request timed out");
                Err(SmppError::RequestTimeout)
            }
        }
    }
}

impl Drop for PendingResponse {
    fn drop(&mut self) {
        self.correlator
            .abandon(self.sequence_number, self.registration);
    }
}
