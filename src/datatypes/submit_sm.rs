use crate::codec::{
    decode_cstring, encode_cstring, encode_header, CodecError, Decodable, Encodable, PduHeader,
};
use crate::datatypes::tlv::Tlv;
use crate::datatypes::{
    CommandId, CommandStatus, NumericPlanIndicator, PriorityFlag, TypeOfNumber,
};
use bytes::{Buf, Bytes, BytesMut};
use std::io::Cursor;

// SMPP v3.4 field maxima, NUL terminator included
pub const MAX_SERVICE_TYPE_LENGTH: usize = 6;
pub const MAX_ADDRESS_LENGTH: usize = 21;
pub const MAX_TIME_LENGTH: usize = 17;
pub const MAX_MESSAGE_ID_LENGTH: usize = 65;
/// short_message is length-prefixed by a single octet; 255 is reserved
pub const MAX_SHORT_MESSAGE_LENGTH: usize = 254;

/// This operation is used by an ESME to submit a short message to the SMSC for onward transmission
/// to a specified short message entity (SME).
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// 4.1.1 service_type: SMS application service associated with the message. NULL for default.
    pub service_type: String,

    /// 4.1.2 source_addr_ton: Type of Number for source address.
    pub source_addr_ton: TypeOfNumber,

    /// 4.1.3 source_addr_npi: Numbering Plan Indicator for source address.
    pub source_addr_npi: NumericPlanIndicator,

    /// 4.1.4 source_addr: Address of SME which originated this message.
    pub source_addr: String,

    /// 4.1.5 dest_addr_ton: Type of Number for destination address.
    pub dest_addr_ton: TypeOfNumber,

    /// 4.1.6 dest_addr_npi: Numbering Plan Indicator for destination address.
    pub dest_addr_npi: NumericPlanIndicator,

    /// 4.1.7 destination_addr: Destination address of this short message.
    pub destination_addr: String,

    /// 4.1.8 esm_class: Message Mode and Message Type.
    pub esm_class: u8,

    /// 4.1.9 protocol_id: Protocol Identifier. Network specific field.
    pub protocol_id: u8,

    /// 4.1.10 priority_flag: Designates the priority level of the message.
    pub priority_flag: PriorityFlag,

    /// 4.1.11 schedule_delivery_time: NULL for immediate delivery.
    pub schedule_delivery_time: String,

    /// 4.1.12 validity_period: NULL to request the SMSC default validity period.
    pub validity_period: String,

    /// 4.1.13 registered_delivery: Delivery receipt and acknowledgement request bits.
    pub registered_delivery: u8,

    /// 4.1.14 replace_if_present_flag
    pub replace_if_present_flag: u8,

    /// 4.1.15 data_coding: Encoding scheme of the short message user data.
    pub data_coding: u8,

    /// 4.1.16 sm_default_msg_id: Index of a pre-defined ('canned') message, 0 if unused.
    pub sm_default_msg_id: u8,

    /// 4.1.18 short_message: Up to 254 octets of user data. sm_length is derived from it.
    pub short_message: Bytes,

    /// Optional parameters, in the order they appear on the wire
    pub tlvs: Vec<Tlv>,
}

impl SubmitSm {
    pub fn new(source_addr: &str, destination_addr: &str, short_message: impl Into<Bytes>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            service_type: String::new(),
            source_addr_ton: TypeOfNumber::Unknown,
            source_addr_npi: NumericPlanIndicator::Unknown,
            source_addr: source_addr.to_string(),
            dest_addr_ton: TypeOfNumber::Unknown,
            dest_addr_npi: NumericPlanIndicator::Unknown,
            destination_addr: destination_addr.to_string(),
            esm_class: 0,
            protocol_id: 0,
            priority_flag: PriorityFlag::Level0,
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 0,
            replace_if_present_flag: 0,
            data_coding: 0,
            sm_default_msg_id: 0,
            short_message: short_message.into(),
            tlvs: Vec::new(),
        }
    }

    crate::macros::builder_setters! {
        sequence_number: u32,
        service_type: String,
        source_addr_ton: TypeOfNumber,
        source_addr_npi: NumericPlanIndicator,
        dest_addr_ton: TypeOfNumber,
        dest_addr_npi: NumericPlanIndicator,
        esm_class: u8,
        protocol_id: u8,
        priority_flag: PriorityFlag,
        schedule_delivery_time: String,
        validity_period: String,
        registered_delivery: u8,
        replace_if_present_flag: u8,
        data_coding: u8,
        tlvs: Vec<Tlv>,
    }

    /// sm_length as it will appear on the wire
    pub fn sm_length(&self) -> u8 {
        self.short_message.len().min(MAX_SHORT_MESSAGE_LENGTH) as u8
    }
}

crate::macros::impl_short_message_pdu!(SubmitSm, CommandId::SubmitSm);

/// submit_sm_resp. The body is omitted by some SMSCs when command_status is
/// non-zero, so an empty body decodes to an empty message_id.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// 4.2.4 message_id: SMSC-assigned identifier of the submitted message.
    pub message_id: String,
}

impl SubmitSmResponse {
    pub fn new(sequence_number: u32, message_id: &str) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: message_id.to_string(),
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            sequence_number,
            message_id: String::new(),
        }
    }
}

impl Encodable for SubmitSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(
            buf,
            CommandId::SubmitSmResp,
            self.command_status,
            self.sequence_number,
        );
        encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH, "message_id")
    }
}

impl Decodable for SubmitSmResponse {
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let message_id = if buf.has_remaining() {
            decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?
        } else {
            String::new()
        };

        Ok(SubmitSmResponse {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
        })
    }
}
