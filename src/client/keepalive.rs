// ABOUTME: SMPP keep-alive implementation for long-running load sessions
// ABOUTME: Sends periodic enquire_link while bound and closes the session after repeated misses

use crate::client::session::{Session, SessionState};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, warn};

/// Configuration for SMPP keep-alive functionality
///
/// Controls the periodic enquire_link PDUs sent while a session is bound.
/// Each enquire_link must be answered within `timeout`; after `max_failures`
/// consecutive misses the session is considered dead and closed.
///
/// # Example
///
/// ```rust
/// use smpp_load::client::KeepAliveConfig;
/// use std::time::Duration;
///
/// // Default configuration (30s interval, 10s timeout, 2 max failures)
/// let config = KeepAliveConfig::default();
///
/// // Custom configuration
/// let config = KeepAliveConfig::new(Duration::from_secs(60))
///     .with_timeout(Duration::from_secs(15))
///     .with_max_failures(5);
///
/// // Disabled keep-alive is a zero interval
/// let config = KeepAliveConfig::disabled();
/// assert!(!config.is_enabled());
/// assert!(!KeepAliveConfig::new(Duration::ZERO).is_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Interval between enquire_link PDUs (default: 30 seconds)
    ///
    /// Zero disables the background task. Manual enquire_link calls still
    /// work and are counted.
    pub interval: Duration,

    /// Timeout for enquire_link responses (default: 10 seconds)
    ///
    /// Should be significantly less than the interval.
    pub timeout: Duration,

    /// Consecutive failures before the session is closed (default: 2)
    pub max_failures: u32,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(10),
            max_failures: 2,
        }
    }
}

impl KeepAliveConfig {
    /// Create a new keep-alive configuration with custom interval
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Set the timeout for enquire_link responses
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum consecutive failures before the session is closed
    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures;
        self
    }

    /// Create a disabled keep-alive configuration
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }
}

/// Status information about keep-alive state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepAliveStatus {
    /// Whether the keep-alive task is currently running
    pub running: bool,

    /// Count of enquire_link operations that have failed in a row.
    /// Reset to 0 on any successful response.
    pub consecutive_failures: u32,

    /// Total enquire_link PDUs sent, automatic and manual
    pub total_pings: u32,

    /// Total enquire_link_resp PDUs received
    pub total_pongs: u32,
}

/// Tracks enquire_link outcomes for one session.
///
/// Every enquire_link the session sends is recorded here, whether issued by
/// the keep-alive task or by a caller.
#[derive(Debug)]
pub struct KeepAliveManager {
    config: KeepAliveConfig,
    running: bool,
    consecutive_failures: u32,
    total_pings: u32,
    total_pongs: u32,
}

impl KeepAliveManager {
    pub fn new(config: KeepAliveConfig) -> Self {
        Self {
            config,
            running: false,
            consecutive_failures: 0,
            total_pings: 0,
            total_pongs: 0,
        }
    }

    pub fn config(&self) -> &KeepAliveConfig {
        &self.config
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Record that an enquire_link was sent
    pub fn on_ping_sent(&mut self) {
        self.total_pings += 1;
        debug!(total_pings = self.total_pings, "enquire_link sent");
    }

    /// Record a successful enquire_link response
    pub fn on_ping_success(&mut self) {
        self.consecutive_failures = 0;
        self.total_pongs += 1;
        debug!(total_pongs = self.total_pongs, "enquire_link answered");
    }

    /// Record a failed enquire_link: timeout, error response or send failure
    pub fn on_ping_failure(&mut self) {
        self.consecutive_failures += 1;
        warn!(
            consecutive_failures = self.consecutive_failures,
            max_failures = self.config.max_failures,
            "enquire_link failed"
        );
    }

    /// Whether consecutive failures have reached the configured maximum
    pub fn is_connection_failed(&self) -> bool {
        self.consecutive_failures >= self.config.max_failures
    }

    pub fn status(&self) -> KeepAliveStatus {
        KeepAliveStatus {
            running: self.running,
            consecutive_failures: self.consecutive_failures,
            total_pings: self.total_pings,
            total_pongs: self.total_pongs,
        }
    }
}

/// Keep-alive task body, spawned when a session becomes `Bound`.
///
/// Exits as soon as the session leaves `Bound`. Closes the session when the
/// peer stops answering.
pub(crate) async fn run(session: Arc<Session>) {
    let config = session.keep_alive_config();
    if !config.is_enabled() {
        return;
    }

    let mut state_rx = session.subscribe();
    let mut ticker = tokio::time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    session.keep_alive_manager().set_running(true);
    debug!(interval_ms = config.interval.as_millis() as u64, "keep-alive started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = Session::until_unbound(&mut state_rx) => break,
        }

        match session.enquire_link_within(config.timeout).await {
            Ok(()) => {}
            Err(err) if err.is_fatal() => break,
            Err(_) => {
                let failed = session.keep_alive_manager().is_connection_failed();
                if failed {
                    error!(
                        max_failures = config.max_failures,
                        "peer stopped answering enquire_link, closing session"
                    );
                    session.teardown().await;
                    break;
                }
            }
        }

        if session.state() != SessionState::Bound {
            break;
        }
    }

    session.keep_alive_manager().set_running(false);
    debug!("keep-alive stopped");
}
