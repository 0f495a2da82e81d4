// ABOUTME: Supporting types for SMPP client operations including configuration and message builders
// ABOUTME: Provides simplified interfaces for common SMPP operations with sensible defaults

use crate::client::error::{SmppError, SmppResult};
use crate::client::keepalive::KeepAliveConfig;
use crate::datatypes::bind::{
    MAX_ADDRESS_RANGE_LENGTH, MAX_PASSWORD_LENGTH, MAX_SYSTEM_ID_LENGTH, MAX_SYSTEM_TYPE_LENGTH,
};
use crate::datatypes::submit_sm::{MAX_ADDRESS_LENGTH, MAX_SHORT_MESSAGE_LENGTH};
use crate::datatypes::{
    BindRequest, BindType, InterfaceVersion, NumericPlanIndicator, PriorityFlag, SubmitSm,
    TypeOfNumber,
};
use serde::Deserialize;
use std::time::Duration;

/// Connection, bind and timing settings for one session.
///
/// Deserializes from the option object a load script passes to `connect`,
/// so the millisecond keys use the script's camelCase spelling. Anything
/// omitted takes its default; `host` and `system_id` are checked by
/// [`ClientConfig::validate`].
///
/// ```rust
/// use smpp_load::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("localhost", "test", "secret")
///     .port(2776)
///     .window_size(32);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.submit_timeout_duration(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    #[serde(alias = "systemId")]
    pub system_id: String,
    pub password: String,
    #[serde(alias = "systemType")]
    pub system_type: String,
    pub bind: BindType,

    #[serde(rename = "bindTimeoutMs")]
    pub bind_timeout_ms: u64,
    #[serde(rename = "submitTimeoutMs")]
    pub submit_timeout_ms: u64,
    /// 0 disables keep-alive
    #[serde(rename = "enquireIntervalMs")]
    pub enquire_interval_ms: u64,
    #[serde(rename = "enquireTimeoutMs")]
    pub enquire_timeout_ms: u64,
    #[serde(rename = "enquireMaxFailures")]
    pub enquire_max_failures: u32,
    #[serde(rename = "unbindTimeoutMs")]
    pub unbind_timeout_ms: u64,
    #[serde(rename = "writeTimeoutMs")]
    pub write_timeout_ms: u64,

    /// Maximum requests awaiting a response at once
    #[serde(rename = "windowSize")]
    pub window_size: usize,
    /// Consecutive undecodable frames tolerated before the session is closed
    #[serde(rename = "maxDecodeFailures")]
    pub max_decode_failures: u32,

    #[serde(rename = "interfaceVersion")]
    pub interface_version: u8,
    #[serde(rename = "addrTon")]
    pub addr_ton: u8,
    #[serde(rename = "addrNpi")]
    pub addr_npi: u8,
    #[serde(rename = "addressRange")]
    pub address_range: String,

    // Numbering applied to send_sms addresses
    #[serde(rename = "sourceAddrTon")]
    pub source_addr_ton: u8,
    #[serde(rename = "sourceAddrNpi")]
    pub source_addr_npi: u8,
    #[serde(rename = "destAddrTon")]
    pub dest_addr_ton: u8,
    #[serde(rename = "destAddrNpi")]
    pub dest_addr_npi: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 2775,
            system_id: String::new(),
            password: String::new(),
            system_type: String::new(),
            bind: BindType::Transceiver,
            bind_timeout_ms: 10_000,
            submit_timeout_ms: 30_000,
            enquire_interval_ms: 30_000,
            enquire_timeout_ms: 10_000,
            enquire_max_failures: 2,
            unbind_timeout_ms: 5_000,
            write_timeout_ms: 10_000,
            window_size: 10,
            max_decode_failures: 5,
            interface_version: InterfaceVersion::SmppV34 as u8,
            addr_ton: u8::from(TypeOfNumber::Unknown),
            addr_npi: u8::from(NumericPlanIndicator::Unknown),
            address_range: String::new(),
            source_addr_ton: u8::from(TypeOfNumber::International),
            source_addr_npi: u8::from(NumericPlanIndicator::Isdn),
            dest_addr_ton: u8::from(TypeOfNumber::International),
            dest_addr_npi: u8::from(NumericPlanIndicator::Isdn),
        }
    }
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            system_id: system_id.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    crate::macros::builder_setters! {
        port: u16,
        system_type: String,
        bind: BindType,
        window_size: usize,
        max_decode_failures: u32,
        address_range: String,
    }

    pub fn bind_timeout(mut self, timeout: Duration) -> Self {
        self.bind_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn unbind_timeout(mut self, timeout: Duration) -> Self {
        self.unbind_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Apply a keep-alive configuration; a zero interval disables it
    pub fn keep_alive(mut self, keep_alive: KeepAliveConfig) -> Self {
        self.enquire_interval_ms = keep_alive.interval.as_millis() as u64;
        self.enquire_timeout_ms = keep_alive.timeout.as_millis() as u64;
        self.enquire_max_failures = keep_alive.max_failures;
        self
    }

    /// Check required fields, field lengths and numeric ranges.
    pub fn validate(&self) -> SmppResult<()> {
        if self.host.is_empty() {
            return Err(invalid("host is required"));
        }
        if self.system_id.is_empty() {
            return Err(invalid("system_id is required"));
        }
        check_length("system_id", &self.system_id, MAX_SYSTEM_ID_LENGTH)?;
        check_length("password", &self.password, MAX_PASSWORD_LENGTH)?;
        check_length("system_type", &self.system_type, MAX_SYSTEM_TYPE_LENGTH)?;
        check_length("address_range", &self.address_range, MAX_ADDRESS_RANGE_LENGTH)?;

        if self.window_size == 0 {
            return Err(invalid("windowSize must be at least 1"));
        }
        if self.bind_timeout_ms == 0 || self.submit_timeout_ms == 0 {
            return Err(invalid("bind and submit timeouts must be non-zero"));
        }
        if self.enquire_interval_ms > 0
            && (self.enquire_timeout_ms == 0 || self.enquire_max_failures == 0)
        {
            return Err(invalid(
                "enquireTimeoutMs and enquireMaxFailures must be non-zero when keep-alive is on",
            ));
        }

        InterfaceVersion::try_from(self.interface_version)
            .map_err(|_| invalid("interfaceVersion must be 0x33 or 0x34"))?;
        for (key, ton) in [
            ("addrTon", self.addr_ton),
            ("sourceAddrTon", self.source_addr_ton),
            ("destAddrTon", self.dest_addr_ton),
        ] {
            if let TypeOfNumber::Other(_) = TypeOfNumber::from(ton) {
                return Err(SmppError::InvalidConfig(format!("{key} {ton} is not a known TON")));
            }
        }
        for (key, npi) in [
            ("addrNpi", self.addr_npi),
            ("sourceAddrNpi", self.source_addr_npi),
            ("destAddrNpi", self.dest_addr_npi),
        ] {
            if let NumericPlanIndicator::Other(_) = NumericPlanIndicator::from(npi) {
                return Err(SmppError::InvalidConfig(format!("{key} {npi} is not a known NPI")));
            }
        }
        Ok(())
    }

    /// Build the bind PDU for this configuration. Call after `validate`.
    pub fn bind_request(&self) -> BindRequest {
        BindRequest::new(self.bind, &self.system_id, &self.password)
            .system_type(self.system_type.clone())
            .interface_version(
                InterfaceVersion::try_from(self.interface_version).unwrap_or_default(),
            )
            .addr_ton(TypeOfNumber::from(self.addr_ton))
            .addr_npi(NumericPlanIndicator::from(self.addr_npi))
            .address_range(self.address_range.clone())
    }

    /// Default options for `send_sms`, taken from the configured numbering
    pub fn sms_options(&self) -> SmsOptions {
        SmsOptions {
            source_ton: TypeOfNumber::from(self.source_addr_ton),
            source_npi: NumericPlanIndicator::from(self.source_addr_npi),
            dest_ton: TypeOfNumber::from(self.dest_addr_ton),
            dest_npi: NumericPlanIndicator::from(self.dest_addr_npi),
            ..SmsOptions::default()
        }
    }

    pub fn bind_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.bind_timeout_ms)
    }

    pub fn submit_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    pub fn unbind_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.unbind_timeout_ms)
    }

    pub fn write_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn keep_alive_config(&self) -> KeepAliveConfig {
        KeepAliveConfig::new(Duration::from_millis(self.enquire_interval_ms))
            .with_timeout(Duration::from_millis(self.enquire_timeout_ms))
            .with_max_failures(self.enquire_max_failures)
    }
}

fn invalid(reason: &str) -> SmppError {
    SmppError::InvalidConfig(reason.to_string())
}

/// `max_len` counts the C-Octet String NUL terminator
fn check_length(field: &str, value: &str, max_len: usize) -> SmppResult<()> {
    if value.len() >= max_len {
        return Err(SmppError::InvalidConfig(format!(
            "{field} is {} octets, maximum is {}",
            value.len(),
            max_len - 1
        )));
    }
    Ok(())
}

/// Simplified SMS message for easy client usage
///
/// Provides a high-level interface for SMS messages with sensible defaults,
/// hiding the complexity of the underlying SubmitSm PDU structure.
#[derive(Debug, Clone)]
pub struct SmsMessage {
    /// Destination phone number
    pub to: String,
    /// Source phone number
    pub from: String,
    /// Message text content
    pub text: String,
    /// Additional message options
    pub options: SmsOptions,
}

impl SmsMessage {
    /// Create a new SMS message with default options
    pub fn new(to: impl Into<String>, from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            text: text.into(),
            options: SmsOptions::default(),
        }
    }

    /// Create a builder for constructing SMS messages
    pub fn builder() -> SmsMessageBuilder {
        SmsMessageBuilder::default()
    }

    /// Check addresses and text against what one submit_sm can carry
    pub fn validate(&self) -> SmppResult<()> {
        check_address("source address", &self.from)?;
        check_address("destination address", &self.to)?;
        if self.text.len() > MAX_SHORT_MESSAGE_LENGTH {
            return Err(SmppError::InvalidData(format!(
                "message text is {} bytes, maximum is {MAX_SHORT_MESSAGE_LENGTH}",
                self.text.len()
            )));
        }
        Ok(())
    }

    /// Build the submit_sm PDU carrying this message
    pub fn to_submit_sm(&self) -> SubmitSm {
        SubmitSm::new(&self.from, &self.to, self.text.clone().into_bytes())
            .source_addr_ton(self.options.source_ton)
            .source_addr_npi(self.options.source_npi)
            .dest_addr_ton(self.options.dest_ton)
            .dest_addr_npi(self.options.dest_npi)
            .priority_flag(self.options.priority)
            .data_coding(self.options.data_coding)
            .registered_delivery(self.options.registered_delivery)
    }
}

fn check_address(name: &str, address: &str) -> SmppResult<()> {
    if address.is_empty() {
        return Err(SmppError::InvalidData(format!("{name} is empty")));
    }
    if address.len() >= MAX_ADDRESS_LENGTH {
        return Err(SmppError::InvalidData(format!(
            "{name} is {} bytes, maximum is {}",
            address.len(),
            MAX_ADDRESS_LENGTH - 1
        )));
    }
    Ok(())
}

/// SMS message options with sensible defaults
#[derive(Debug, Clone)]
pub struct SmsOptions {
    /// Message priority level
    pub priority: PriorityFlag,
    /// Data coding scheme (0 = SMSC default alphabet)
    pub data_coding: u8,
    /// Source address type of number
    pub source_ton: TypeOfNumber,
    /// Source address numbering plan indicator
    pub source_npi: NumericPlanIndicator,
    /// Destination address type of number
    pub dest_ton: TypeOfNumber,
    /// Destination address numbering plan indicator
    pub dest_npi: NumericPlanIndicator,
    /// Request delivery receipt (0 = no, 1 = yes)
    pub registered_delivery: u8,
}

impl Default for SmsOptions {
    fn default() -> Self {
        Self {
            priority: PriorityFlag::Level0,
            data_coding: 0,
            source_ton: TypeOfNumber::International,
            source_npi: NumericPlanIndicator::Isdn,
            dest_ton: TypeOfNumber::International,
            dest_npi: NumericPlanIndicator::Isdn,
            registered_delivery: 0,
        }
    }
}

/// Builder for constructing SMS messages with fluent API
#[derive(Debug, Default)]
pub struct SmsMessageBuilder {
    to: Option<String>,
    from: Option<String>,
    text: Option<String>,
    options: SmsOptions,
}

impl SmsMessageBuilder {
    /// Set destination phone number
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Set source phone number
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set message text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set message priority
    pub fn priority(mut self, priority: PriorityFlag) -> Self {
        self.options.priority = priority;
        self
    }

    /// Set data coding scheme
    pub fn data_coding(mut self, data_coding: u8) -> Self {
        self.options.data_coding = data_coding;
        self
    }

    /// Request delivery receipt
    pub fn with_delivery_receipt(mut self) -> Self {
        self.options.registered_delivery = 1;
        self
    }

    /// Set source address numbering
    pub fn source_numbering(mut self, ton: TypeOfNumber, npi: NumericPlanIndicator) -> Self {
        self.options.source_ton = ton;
        self.options.source_npi = npi;
        self
    }

    /// Set destination address numbering
    pub fn dest_numbering(mut self, ton: TypeOfNumber, npi: NumericPlanIndicator) -> Self {
        self.options.dest_ton = ton;
        self.options.dest_npi = npi;
        self
    }

    /// Build the SMS message
    pub fn build(self) -> SmppResult<SmsMessage> {
        let missing = |what: &str| SmppError::InvalidData(format!("{what} is required"));
        let message = SmsMessage {
            to: self.to.ok_or_else(|| missing("destination address"))?,
            from: self.from.ok_or_else(|| missing("source address"))?,
            text: self.text.ok_or_else(|| missing("message text"))?,
            options: self.options,
        };
        message.validate()?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_follow_script_conventions() {
        let config = ClientConfig::new("localhost", "test", "secret");
        assert_eq!(config.port, 2775);
        assert_eq!(config.bind, BindType::Transceiver);
        assert_eq!(config.bind_timeout_duration(), Duration::from_secs(10));
        assert_eq!(config.submit_timeout_duration(), Duration::from_secs(30));
        assert_eq!(config.unbind_timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.window_size, 10);

        let keep_alive = config.keep_alive_config();
        assert!(keep_alive.is_enabled());
        assert_eq!(keep_alive.interval, Duration::from_secs(30));
        assert_eq!(keep_alive.timeout, Duration::from_secs(10));
        assert_eq!(keep_alive.max_failures, 2);
    }

    #[test]
    fn config_from_script_options() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({
            "host": "smsc.example.com",
            "port": 2776,
            "system_id": "test",
            "password": "secret",
            "systemType": "LOAD",
            "bind": "transmitter",
            "bindTimeoutMs": 2000,
            "submitTimeoutMs": 500,
            "enquireIntervalMs": 0,
            "windowSize": 50
        }))
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.host, "smsc.example.com");
        assert_eq!(config.system_type, "LOAD");
        assert_eq!(config.bind, BindType::Transmitter);
        assert_eq!(config.bind_timeout_duration(), Duration::from_secs(2));
        assert_eq!(config.submit_timeout_duration(), Duration::from_millis(500));
        assert!(!config.keep_alive_config().is_enabled());
        assert_eq!(config.window_size, 50);
        assert_eq!(config.unbind_timeout_ms, 5_000);
    }

    #[test]
    fn config_validation_failures() {
        let missing_host = ClientConfig::new("", "test", "secret");
        assert!(matches!(
            missing_host.validate(),
            Err(SmppError::InvalidConfig(_))
        ));

        let long_system_id = ClientConfig::new("localhost", "abcdefghijklmnop", "secret");
        assert!(matches!(
            long_system_id.validate(),
            Err(SmppError::InvalidConfig(_))
        ));

        let long_password = ClientConfig::new("localhost", "test", "123456789");
        assert!(long_password.validate().is_err());

        let empty_window = ClientConfig::new("localhost", "test", "secret").window_size(0);
        assert!(empty_window.validate().is_err());

        let mut bad_ton = ClientConfig::new("localhost", "test", "secret");
        bad_ton.source_addr_ton = 9;
        assert!(bad_ton.validate().is_err());

        let fifteen = ClientConfig::new("localhost", "abcdefghijklmno", "12345678");
        assert!(fifteen.validate().is_ok());
    }

    #[test]
    fn bind_request_from_config() {
        let config = ClientConfig::new("localhost", "test", "secret")
            .bind(BindType::Receiver)
            .system_type("VMS".to_string());

        let bind = config.bind_request();
        assert_eq!(bind.bind_type, BindType::Receiver);
        assert_eq!(bind.system_id, "test");
        assert_eq!(bind.password, "secret");
        assert_eq!(bind.system_type, "VMS");
        assert_eq!(bind.interface_version, InterfaceVersion::SmppV34);
    }

    #[test]
    fn sms_message_builder() {
        let sms = SmsMessage::builder()
            .to("447700900123")
            .from("1234")
            .text("Hello")
            .priority(PriorityFlag::Level1)
            .with_delivery_receipt()
            .build()
            .unwrap();

        let submit_sm = sms.to_submit_sm();
        assert_eq!(submit_sm.destination_addr, "447700900123");
        assert_eq!(submit_sm.source_addr, "1234");
        assert_eq!(submit_sm.short_message.as_ref(), b"Hello");
        assert_eq!(submit_sm.source_addr_ton, TypeOfNumber::International);
        assert_eq!(submit_sm.dest_addr_npi, NumericPlanIndicator::Isdn);
        assert_eq!(submit_sm.priority_flag, PriorityFlag::Level1);
        assert_eq!(submit_sm.registered_delivery, 1);
    }

    #[test]
    fn sms_message_validation() {
        assert!(SmsMessage::new("5678", "", "Hi").validate().is_err());
        assert!(SmsMessage::new("123456789012345678901", "1234", "Hi")
            .validate()
            .is_err());
        assert!(SmsMessage::new("5678", "1234", "x".repeat(255))
            .validate()
            .is_err());
        assert!(SmsMessage::new("5678", "1234", "x".repeat(254))
            .validate()
            .is_ok());
        assert!(SmsMessage::builder().to("5678").text("Hi").build().is_err());
    }
}
