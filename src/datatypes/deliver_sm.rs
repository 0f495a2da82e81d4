use crate::codec::{
    decode_cstring, encode_cstring, encode_header, CodecError, Decodable, Encodable, PduHeader,
};
use crate::datatypes::submit_sm::MAX_MESSAGE_ID_LENGTH;
use crate::datatypes::tlv::{Tlv, TAG_MESSAGE_STATE, TAG_RECEIPTED_MESSAGE_ID};
use crate::datatypes::{
    CommandId, CommandStatus, NumericPlanIndicator, PriorityFlag, TypeOfNumber,
};
use bytes::{Buf, Bytes, BytesMut};
use std::io::Cursor;

/// esm_class message type bits (2-5) marking an SMSC delivery receipt
const ESM_CLASS_DELIVERY_RECEIPT: u8 = 0b0000_0100;
const ESM_CLASS_TYPE_MASK: u8 = 0b0011_1100;

/// deliver_sm is issued by the SMSC to send a message to an ESME, either a
/// mobile originated message or a delivery receipt for an earlier submit_sm.
/// Same body layout as submit_sm.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    pub service_type: String,
    pub source_addr_ton: TypeOfNumber,
    pub source_addr_npi: NumericPlanIndicator,
    pub source_addr: String,
    pub dest_addr_ton: TypeOfNumber,
    pub dest_addr_npi: NumericPlanIndicator,
    pub destination_addr: String,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: PriorityFlag,
    /// Always NULL from a conforming SMSC
    pub schedule_delivery_time: String,
    /// Always NULL from a conforming SMSC
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
    pub tlvs: Vec<Tlv>,
}

impl DeliverSm {
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
        esm_class: u8,
        data_coding: u8,
        tlvs: Vec<Tlv>,
    }

    pub fn is_delivery_receipt(&self) -> bool {
        self.esm_class & ESM_CLASS_TYPE_MASK == ESM_CLASS_DELIVERY_RECEIPT
    }

    /// receipted_message_id TLV, without its NUL terminator
    pub fn receipted_message_id(&self) -> Option<String> {
        let tlv = self.tlvs.iter().find(|tlv| tlv.tag == TAG_RECEIPTED_MESSAGE_ID)?;
        let value = tlv.value.strip_suffix(&[0]).unwrap_or(&tlv.value[..]);
        Some(String::from_utf8_lossy(value).into_owned())
    }

    /// message_state TLV of a delivery receipt
    pub fn message_state(&self) -> Option<u8> {
        self.tlvs
            .iter()
            .find(|tlv| tlv.tag == TAG_MESSAGE_STATE)
            .and_then(|tlv| tlv.value.first().copied())
    }
}

crate::macros::impl_short_message_pdu!(DeliverSm, CommandId::DeliverSm);

/// deliver_sm_resp. message_id is unused and always NULL.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl DeliverSmResponse {
    pub fn new(sequence_number: u32) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            sequence_number,
        }
    }
}

impl Encodable for DeliverSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(
            buf,
            CommandId::DeliverSmResp,
            self.command_status,
            self.sequence_number,
        );
        encode_cstring(buf, "", MAX_MESSAGE_ID_LENGTH, "message_id")
    }
}

impl Decodable for DeliverSmResponse {
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.has_remaining() {
            decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?;
        }

        Ok(DeliverSmResponse {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
        })
    }
}
