// SMPP v3.4 Codec - Separates parsing/encoding logic from domain models
//
// Each PDU implements Encodable/Decodable; the Frame enum ties them together
// and the PduRegistry dispatches an inbound header to the right decoder.
// Nothing in here knows about sessions, so every function can be exercised
// with plain byte fixtures.

use crate::datatypes::{
    BindRequest, BindResponse, CommandId, CommandStatus, DeliverSm, DeliverSmResponse,
    EnquireLink, EnquireLinkResponse, GenericNack, SubmitSm, SubmitSmResponse, Unbind,
    UnbindResponse,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::OnceLock;
use thiserror::Error;

/// Maximum allowed PDU size to prevent memory exhaustion attacks
pub const MAX_PDU_SIZE: u32 = 65536; // 64KB

/// SMPP v3.4 PDU Header (16 bytes, common to all PDUs)
///
/// `command_id` is kept as the raw wire value so that a PDU with an
/// unrecognised command can still be reported with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: u32,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    /// Decode PDU header from buffer with length validation
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::MalformedPdu(format!(
                "header needs {} octets, got {}",
                Self::SIZE,
                buf.remaining()
            )));
        }

        let command_length = buf.get_u32();
        let command_id = buf.get_u32();
        let command_status = CommandStatus::from(buf.get_u32());
        let sequence_number = buf.get_u32();

        if command_length < Self::SIZE as u32 || command_length > MAX_PDU_SIZE {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: Self::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        Ok(PduHeader {
            command_length,
            command_id,
            command_status,
            sequence_number,
        })
    }

    /// Encode PDU header to buffer
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id);
        buf.put_u32(self.command_status.code());
        buf.put_u32(self.sequence_number);
    }

    /// The typed command, if this client knows it
    pub fn command(&self) -> Option<CommandId> {
        CommandId::try_from(self.command_id).ok()
    }

    pub fn is_response(&self) -> bool {
        self.command_id & 0x8000_0000 != 0
    }
}

/// Write a header whose command_length is patched later by `to_bytes`.
pub(crate) fn encode_header(
    buf: &mut BytesMut,
    command_id: CommandId,
    command_status: CommandStatus,
    sequence_number: u32,
) {
    PduHeader {
        command_length: 0,
        command_id: command_id as u32,
        command_status,
        sequence_number,
    }
    .encode(buf);
}

/// Trait for types that can be encoded to bytes
pub trait Encodable {
    /// Encode this PDU, header included, to the buffer
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    /// Convert this PDU to bytes with the command_length field filled in.
    fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::with_capacity(64);
        self.encode(&mut buf)?;

        let length = buf.len() as u32;
        if length > MAX_PDU_SIZE {
            return Err(CodecError::InvalidPduLength {
                length,
                min: PduHeader::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }
        buf[0..4].copy_from_slice(&length.to_be_bytes());

        Ok(buf.freeze())
    }
}

/// Trait for types that can be decoded from bytes
pub trait Decodable: Sized {
    /// Decode this PDU from the buffer positioned just after the header
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed PDU: {0}")]
    MalformedPdu(String),

    #[error("Unknown command_id: {:#010x} (sequence {})", .0.command_id, .0.sequence_number)]
    UnknownCommand(PduHeader),

    #[error("Invalid PDU length: {length}, must be {min}-{max}")]
    InvalidPduLength { length: u32, min: u32, max: u32 },

    #[error("Field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error("UTF-8 decoding error in field '{field}': {source}")]
    Utf8Error {
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl CodecError {
    /// Status to put in a generic_nack sent back for a frame that failed to decode
    pub fn to_command_status(&self) -> CommandStatus {
        match self {
            CodecError::InvalidPduLength { .. } => CommandStatus::InvalidCommandLength,
            CodecError::UnknownCommand(_) => CommandStatus::InvalidCommandId,
            CodecError::FieldValidation { field, .. } => match *field {
                "source_addr" => CommandStatus::InvalidSourceAddress,
                "destination_addr" => CommandStatus::InvalidDestinationAddress,
                "short_message" => CommandStatus::InvalidMsgLength,
                _ => CommandStatus::SystemError,
            },
            CodecError::MalformedPdu(_) => CommandStatus::InvalidCommandLength,
            CodecError::Utf8Error { .. } => CommandStatus::SystemError,
        }
    }
}

/// Decode a C-Octet String of at most `max_len` octets, NUL included.
pub fn decode_cstring(
    buf: &mut Cursor<&[u8]>,
    max_len: usize,
    field: &'static str,
) -> Result<String, CodecError> {
    let remaining = buf.chunk();
    let window = &remaining[..remaining.len().min(max_len)];

    let end = match window.iter().position(|&b| b == 0) {
        Some(end) => end,
        None if remaining.len() < max_len => {
            return Err(CodecError::MalformedPdu(format!(
                "field '{field}' is not NUL terminated"
            )));
        }
        None => {
            return Err(CodecError::FieldValidation {
                field,
                reason: format!("exceeds {max_len} octets including NUL"),
            });
        }
    };

    let value =
        String::from_utf8(window[..end].to_vec()).map_err(|source| CodecError::Utf8Error {
            field,
            source,
        })?;
    buf.advance(end + 1);
    Ok(value)
}

/// Decode a single byte
pub fn decode_u8(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(truncated(field));
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer
pub fn decode_u16(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(truncated(field));
    }
    Ok(buf.get_u16())
}

/// Decode `len` raw octets
pub fn decode_octets(
    buf: &mut Cursor<&[u8]>,
    len: usize,
    field: &'static str,
) -> Result<Bytes, CodecError> {
    if buf.remaining() < len {
        return Err(truncated(field));
    }
    Ok(buf.copy_to_bytes(len))
}

fn truncated(field: &'static str) -> CodecError {
    CodecError::MalformedPdu(format!("truncated before field '{field}'"))
}

/// Encode a C-Octet String; `max_len` counts the NUL terminator.
pub fn encode_cstring(
    buf: &mut BytesMut,
    value: &str,
    max_len: usize,
    field: &'static str,
) -> Result<(), CodecError> {
    let bytes = value.as_bytes();
    if bytes.len() + 1 > max_len {
        return Err(CodecError::FieldValidation {
            field,
            reason: format!(
                "{} octets exceeds maximum of {}",
                bytes.len(),
                max_len - 1
            ),
        });
    }
    if bytes.contains(&0) {
        return Err(CodecError::FieldValidation {
            field,
            reason: "embedded NUL".to_string(),
        });
    }
    buf.put_slice(bytes);
    buf.put_u8(0);
    Ok(())
}

/// Generic frame type that can hold any PDU this client understands
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    // Bind PDUs (transmitter, receiver and transceiver share a layout)
    Bind(BindRequest),
    BindResp(BindResponse),

    // Message PDUs
    SubmitSm(Box<SubmitSm>),
    SubmitSmResp(SubmitSmResponse),
    DeliverSm(Box<DeliverSm>),
    DeliverSmResp(DeliverSmResponse),

    // Keep-alive PDUs
    EnquireLink(EnquireLink),
    EnquireLinkResp(EnquireLinkResponse),

    // Session management PDUs
    Unbind(Unbind),
    UnbindResp(UnbindResponse),

    GenericNack(GenericNack),
}

/// Registry of PDU decoders for extensible parsing
type DecoderFn =
    Box<dyn Fn(PduHeader, &mut Cursor<&[u8]>) -> Result<Frame, CodecError> + Send + Sync>;

pub struct PduRegistry {
    decoders: HashMap<CommandId, DecoderFn>,
}

impl PduRegistry {
    /// Create a new registry with every supported SMPP v3.4 PDU registered
    pub fn new() -> Self {
        let mut registry = Self {
            decoders: HashMap::new(),
        };

        for command_id in [
            CommandId::BindTransmitter,
            CommandId::BindReceiver,
            CommandId::BindTransceiver,
        ] {
            registry.register_pdu::<BindRequest, _>(command_id, Frame::Bind);
        }
        for command_id in [
            CommandId::BindTransmitterResp,
            CommandId::BindReceiverResp,
            CommandId::BindTransceiverResp,
        ] {
            registry.register_pdu::<BindResponse, _>(command_id, Frame::BindResp);
        }

        registry.register_pdu::<SubmitSm, _>(CommandId::SubmitSm, |pdu| {
            Frame::SubmitSm(Box::new(pdu))
        });
        registry.register_pdu::<SubmitSmResponse, _>(CommandId::SubmitSmResp, Frame::SubmitSmResp);
        registry.register_pdu::<DeliverSm, _>(CommandId::DeliverSm, |pdu| {
            Frame::DeliverSm(Box::new(pdu))
        });
        registry
            .register_pdu::<DeliverSmResponse, _>(CommandId::DeliverSmResp, Frame::DeliverSmResp);

        registry.register_pdu::<EnquireLink, _>(CommandId::EnquireLink, Frame::EnquireLink);
        registry.register_pdu::<EnquireLinkResponse, _>(
            CommandId::EnquireLinkResp,
            Frame::EnquireLinkResp,
        );
        registry.register_pdu::<Unbind, _>(CommandId::Unbind, Frame::Unbind);
        registry.register_pdu::<UnbindResponse, _>(CommandId::UnbindResp, Frame::UnbindResp);
        registry.register_pdu::<GenericNack, _>(CommandId::GenericNack, Frame::GenericNack);

        registry
    }

    /// Shared registry used by `Frame::decode`
    pub fn global() -> &'static PduRegistry {
        static REGISTRY: OnceLock<PduRegistry> = OnceLock::new();
        REGISTRY.get_or_init(PduRegistry::new)
    }

    fn register_pdu<T, F>(&mut self, command_id: CommandId, frame_constructor: F)
    where
        T: Decodable + 'static,
        F: Fn(T) -> Frame + Send + Sync + 'static,
    {
        let decoder = Box::new(move |header: PduHeader, buf: &mut Cursor<&[u8]>| {
            let pdu = T::decode(header, buf)?;
            Ok(frame_constructor(pdu))
        });
        self.decoders.insert(command_id, decoder);
    }

    /// Decode a PDU given its header and body
    pub fn decode_pdu(
        &self,
        header: PduHeader,
        buf: &mut Cursor<&[u8]>,
    ) -> Result<Frame, CodecError> {
        let decoder = header
            .command()
            .and_then(|command_id| self.decoders.get(&command_id));

        match decoder {
            Some(decoder) => {
                let frame = decoder(header, buf)?;
                if buf.has_remaining() {
                    return Err(CodecError::MalformedPdu(format!(
                        "{} trailing octets after {:?}",
                        buf.remaining(),
                        frame.command_id()
                    )));
                }
                Ok(frame)
            }
            None => Err(CodecError::UnknownCommand(header)),
        }
    }

    /// Check if a command_id is registered
    pub fn is_registered(&self, command_id: CommandId) -> bool {
        self.decoders.contains_key(&command_id)
    }
}

impl Default for PduRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Decode one complete frame. The length prefix must match `data.len()`.
    pub fn decode(data: &[u8]) -> Result<Frame, CodecError> {
        let mut buf = Cursor::new(data);
        let header = PduHeader::decode(&mut buf)?;

        if header.command_length as usize != data.len() {
            return Err(CodecError::MalformedPdu(format!(
                "command_length {} does not match frame size {}",
                header.command_length,
                data.len()
            )));
        }

        PduRegistry::global().decode_pdu(header, &mut buf)
    }

    /// Encode this frame to wire bytes
    pub fn encode(&self) -> Result<Bytes, CodecError> {
        match self {
            Frame::Bind(pdu) => pdu.to_bytes(),
            Frame::BindResp(pdu) => pdu.to_bytes(),
            Frame::SubmitSm(pdu) => pdu.to_bytes(),
            Frame::SubmitSmResp(pdu) => pdu.to_bytes(),
            Frame::DeliverSm(pdu) => pdu.to_bytes(),
            Frame::DeliverSmResp(pdu) => pdu.to_bytes(),
            Frame::EnquireLink(pdu) => pdu.to_bytes(),
            Frame::EnquireLinkResp(pdu) => pdu.to_bytes(),
            Frame::Unbind(pdu) => pdu.to_bytes(),
            Frame::UnbindResp(pdu) => pdu.to_bytes(),
            Frame::GenericNack(pdu) => pdu.to_bytes(),
        }
    }

    /// Get the command_id for this frame
    pub fn command_id(&self) -> CommandId {
        match self {
            Frame::Bind(pdu) => pdu.bind_type.request_command_id(),
            Frame::BindResp(pdu) => pdu.bind_type.response_command_id(),
            Frame::SubmitSm(_) => CommandId::SubmitSm,
            Frame::SubmitSmResp(_) => CommandId::SubmitSmResp,
            Frame::DeliverSm(_) => CommandId::DeliverSm,
            Frame::DeliverSmResp(_) => CommandId::DeliverSmResp,
            Frame::EnquireLink(_) => CommandId::EnquireLink,
            Frame::EnquireLinkResp(_) => CommandId::EnquireLinkResp,
            Frame::Unbind(_) => CommandId::Unbind,
            Frame::UnbindResp(_) => CommandId::UnbindResp,
            Frame::GenericNack(_) => CommandId::GenericNack,
        }
    }

    /// Get the sequence number for this frame
    pub fn sequence_number(&self) -> u32 {
        match self {
            Frame::Bind(pdu) => pdu.sequence_number,
            Frame::BindResp(pdu) => pdu.sequence_number,
            Frame::SubmitSm(pdu) => pdu.sequence_number,
            Frame::SubmitSmResp(pdu) => pdu.sequence_number,
            Frame::DeliverSm(pdu) => pdu.sequence_number,
            Frame::DeliverSmResp(pdu) => pdu.sequence_number,
            Frame::EnquireLink(pdu) => pdu.sequence_number,
            Frame::EnquireLinkResp(pdu) => pdu.sequence_number,
            Frame::Unbind(pdu) => pdu.sequence_number,
            Frame::UnbindResp(pdu) => pdu.sequence_number,
            Frame::GenericNack(pdu) => pdu.sequence_number,
        }
    }

    /// Assign the sequence number, used once the correlator hands one out
    pub fn set_sequence_number(&mut self, sequence_number: u32) {
        match self {
            Frame::Bind(pdu) => pdu.sequence_number = sequence_number,
            Frame::BindResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::SubmitSm(pdu) => pdu.sequence_number = sequence_number,
            Frame::SubmitSmResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::DeliverSm(pdu) => pdu.sequence_number = sequence_number,
            Frame::DeliverSmResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::EnquireLink(pdu) => pdu.sequence_number = sequence_number,
            Frame::EnquireLinkResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::Unbind(pdu) => pdu.sequence_number = sequence_number,
            Frame::UnbindResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::GenericNack(pdu) => pdu.sequence_number = sequence_number,
        }
    }

    /// Get the command_status for this frame
    pub fn command_status(&self) -> CommandStatus {
        match self {
            Frame::Bind(pdu) => pdu.command_status,
            Frame::BindResp(pdu) => pdu.command_status,
            Frame::SubmitSm(pdu) => pdu.command_status,
            Frame::SubmitSmResp(pdu) => pdu.command_status,
            Frame::DeliverSm(pdu) => pdu.command_status,
            Frame::DeliverSmResp(pdu) => pdu.command_status,
            Frame::EnquireLink(pdu) => pdu.command_status,
            Frame::EnquireLinkResp(pdu) => pdu.command_status,
            Frame::Unbind(pdu) => pdu.command_status,
            Frame::UnbindResp(pdu) => pdu.command_status,
            Frame::GenericNack(pdu) => pdu.command_status,
        }
    }

    /// Check if this frame is a response PDU
    pub fn is_response(&self) -> bool {
        self.command_id().is_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{BindType, CommandStatus};

    #[test]
    fn pdu_header_encode_decode() {
        let header = PduHeader {
            command_length: 24,
            command_id: CommandId::EnquireLink as u32,
            command_status: CommandStatus::Ok,
            sequence_number: 42,
        };

        let mut buf = BytesMut::new();
        header.encode(&mut buf);

        let mut cursor = Cursor::new(buf.as_ref());
        let decoded = PduHeader::decode(&mut cursor).unwrap();

        assert_eq!(header, decoded);
    }

    #[test]
    fn pdu_header_validation() {
        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x08, // command_length too small
            0x00, 0x00, 0x00, 0x15, // command_id
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x01, // sequence_number
        ];
        let mut cursor = Cursor::new(data);

        let result = PduHeader::decode(&mut cursor);
        assert!(matches!(result, Err(CodecError::InvalidPduLength { .. })));
    }

    #[test]
    fn decode_cstring_variable_length() {
        let data = b"hello\0world\0";
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(decode_cstring(&mut cursor, 16, "a").unwrap(), "hello");
        assert_eq!(cursor.position(), 6);
        assert_eq!(decode_cstring(&mut cursor, 16, "b").unwrap(), "world");
        assert!(!cursor.has_remaining());
    }

    #[test]
    fn decode_cstring_without_nul() {
        let data = b"hello";
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            decode_cstring(&mut cursor, 16, "system_id"),
            Err(CodecError::MalformedPdu(_))
        ));

        let data = b"0123456789abcdef\0";
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            decode_cstring(&mut cursor, 16, "system_id"),
            Err(CodecError::FieldValidation { field: "system_id", .. })
        ));
    }

    #[test]
    fn encode_cstring_rejects_oversized_values() {
        let mut buf = BytesMut::new();
        encode_cstring(&mut buf, "hello", 6, "f").unwrap();
        assert_eq!(buf.as_ref(), b"hello\0");

        let result = encode_cstring(&mut buf, "toolong", 6, "f");
        assert!(matches!(result, Err(CodecError::FieldValidation { .. })));
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        let mut bytes = BytesMut::from(EnquireLink::new(7).to_bytes().unwrap().as_ref());
        bytes.put_u8(0);
        assert!(matches!(
            Frame::decode(&bytes),
            Err(CodecError::MalformedPdu(_))
        ));

        let bytes = EnquireLink::new(7).to_bytes().unwrap();
        assert!(matches!(
            Frame::decode(&bytes[..12]),
            Err(CodecError::MalformedPdu(_))
        ));
    }

    #[test]
    fn decode_rejects_body_on_header_only_pdu() {
        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x11, // command_length 17
            0x00, 0x00, 0x00, 0x15, // enquire_link
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x01, // sequence_number
            0xFF, // stray body octet
        ];
        assert!(matches!(
            Frame::decode(data),
            Err(CodecError::MalformedPdu(_))
        ));
    }

    #[test]
    fn decode_unknown_command_keeps_header() {
        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x14, // command_length 20
            0x00, 0x00, 0x00, 0x03, // query_sm, not supported here
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x2A, // sequence_number
            0x01, 0x02, 0x03, 0x04, // body
        ];

        match Frame::decode(data) {
            Err(CodecError::UnknownCommand(header)) => {
                assert_eq!(header.command_id, 0x0000_0003);
                assert_eq!(header.sequence_number, 42);
                assert!(!header.is_response());
            }
            other => panic!("expected UnknownCommand, got {other:?}"),
        }
    }

    #[test]
    fn frame_accessors() {
        let mut frame = Frame::EnquireLink(EnquireLink::new(42));

        assert_eq!(frame.command_id(), CommandId::EnquireLink);
        assert_eq!(frame.sequence_number(), 42);
        assert!(!frame.is_response());

        frame.set_sequence_number(43);
        assert_eq!(frame.sequence_number(), 43);

        let frame = Frame::EnquireLinkResp(EnquireLinkResponse::new(43));
        assert_eq!(frame.command_id(), CommandId::EnquireLinkResp);
        assert!(frame.is_response());
    }

    #[test]
    fn registry_has_all_supported_pdus() {
        let registry = PduRegistry::new();
        for command_id in [
            CommandId::BindTransmitter,
            CommandId::BindReceiverResp,
            CommandId::BindTransceiver,
            CommandId::BindTransceiverResp,
            CommandId::SubmitSm,
            CommandId::SubmitSmResp,
            CommandId::DeliverSm,
            CommandId::DeliverSmResp,
            CommandId::EnquireLink,
            CommandId::EnquireLinkResp,
            CommandId::Unbind,
            CommandId::UnbindResp,
            CommandId::GenericNack,
        ] {
            assert!(registry.is_registered(command_id), "{command_id:?}");
        }
    }

    #[test]
    fn bind_frame_reports_its_bind_type() {
        let frame = Frame::Bind(BindRequest::new(BindType::Receiver, "test", "secret"));
        assert_eq!(frame.command_id(), CommandId::BindReceiver);
    }

    #[test]
    fn codec_error_maps_to_nack_status() {
        let header = PduHeader {
            command_length: 16,
            command_id: 0x0000_0103,
            command_status: CommandStatus::Ok,
            sequence_number: 1,
        };
        assert_eq!(
            CodecError::UnknownCommand(header).to_command_status(),
            CommandStatus::InvalidCommandId
        );
    }
}
