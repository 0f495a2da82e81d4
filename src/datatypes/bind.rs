use crate::codec::{
    decode_cstring, decode_u8, encode_cstring, encode_header, CodecError, Decodable, Encodable,
    PduHeader,
};
use crate::datatypes::tlv::{decode_tlvs, encode_tlvs, Tlv, TAG_SC_INTERFACE_VERSION};
use crate::datatypes::{
    CommandId, CommandStatus, InterfaceVersion, NumericPlanIndicator, TypeOfNumber,
};
use bytes::{Buf, BufMut, BytesMut};
use serde::Deserialize;
use std::io::Cursor;

pub const MAX_SYSTEM_ID_LENGTH: usize = 16;
pub const MAX_PASSWORD_LENGTH: usize = 9;
pub const MAX_SYSTEM_TYPE_LENGTH: usize = 13;
pub const MAX_ADDRESS_RANGE_LENGTH: usize = 41;

/// Direction of a binding. Fixed for the lifetime of a session once bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindType {
    Receiver,
    Transmitter,
    #[default]
    Transceiver,
}

impl BindType {
    pub fn request_command_id(&self) -> CommandId {
        match self {
            BindType::Receiver => CommandId::BindReceiver,
            BindType::Transmitter => CommandId::BindTransmitter,
            BindType::Transceiver => CommandId::BindTransceiver,
        }
    }

    pub fn response_command_id(&self) -> CommandId {
        match self {
            BindType::Receiver => CommandId::BindReceiverResp,
            BindType::Transmitter => CommandId::BindTransmitterResp,
            BindType::Transceiver => CommandId::BindTransceiverResp,
        }
    }

    /// Whether a session bound this way may submit messages
    pub fn can_transmit(&self) -> bool {
        matches!(self, BindType::Transmitter | BindType::Transceiver)
    }

    /// Whether a session bound this way receives deliver_sm
    pub fn can_receive(&self) -> bool {
        matches!(self, BindType::Receiver | BindType::Transceiver)
    }

    fn from_command_id(command_id: u32) -> Option<BindType> {
        match CommandId::try_from(command_id).ok()? {
            CommandId::BindReceiver | CommandId::BindReceiverResp => Some(BindType::Receiver),
            CommandId::BindTransmitter | CommandId::BindTransmitterResp => {
                Some(BindType::Transmitter)
            }
            CommandId::BindTransceiver | CommandId::BindTransceiverResp => {
                Some(BindType::Transceiver)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for BindType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BindType::Receiver => "receiver",
            BindType::Transmitter => "transmitter",
            BindType::Transceiver => "transceiver",
        };
        f.write_str(name)
    }
}

/// bind_transmitter, bind_receiver or bind_transceiver. The three share one
/// body layout and differ only in command_id, which `bind_type` selects.
#[derive(Clone, Debug, PartialEq)]
pub struct BindRequest {
    pub bind_type: BindType,
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// 5.2.1 system_id: identification of the ESME requesting to bind.
    pub system_id: String,

    /// 5.2.2 password: NULL when the SMSC requires none.
    pub password: String,

    /// 5.2.3 system_type: category of ESME, e.g. "VMS" or "OTA".
    pub system_type: String,

    /// 5.2.4 interface_version: SMPP version supported by the ESME.
    pub interface_version: InterfaceVersion,

    /// 5.2.5 addr_ton: Type of Number of the ESME address(es) served.
    pub addr_ton: TypeOfNumber,

    /// 5.2.6 addr_npi: Numbering Plan Indicator of the ESME address(es) served.
    pub addr_npi: NumericPlanIndicator,

    /// 5.2.7 address_range: SME addresses serviced by this ESME.
    pub address_range: String,
}

impl BindRequest {
    pub fn new(bind_type: BindType, system_id: &str, password: &str) -> Self {
        Self {
            bind_type,
            command_status: CommandStatus::Ok,
            sequence_number: 0,
            system_id: system_id.to_string(),
            password: password.to_string(),
            system_type: String::new(),
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: String::new(),
        }
    }

    crate::macros::builder_setters! {
        sequence_number: u32,
        system_type: String,
        interface_version: InterfaceVersion,
        addr_ton: TypeOfNumber,
        addr_npi: NumericPlanIndicator,
        address_range: String,
    }
}

impl Encodable for BindRequest {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(
            buf,
            self.bind_type.request_command_id(),
            self.command_status,
            self.sequence_number,
        );
        encode_cstring(buf, &self.system_id, MAX_SYSTEM_ID_LENGTH, "system_id")?;
        encode_cstring(buf, &self.password, MAX_PASSWORD_LENGTH, "password")?;
        encode_cstring(buf, &self.system_type, MAX_SYSTEM_TYPE_LENGTH, "system_type")?;
        buf.put_u8(self.interface_version as u8);
        buf.put_u8(self.addr_ton.into());
        buf.put_u8(self.addr_npi.into());
        encode_cstring(
            buf,
            &self.address_range,
            MAX_ADDRESS_RANGE_LENGTH,
            "address_range",
        )?;
        Ok(())
    }
}

impl Decodable for BindRequest {
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let bind_type = BindType::from_command_id(header.command_id)
            .ok_or(CodecError::UnknownCommand(header.clone()))?;

        let system_id = decode_cstring(buf, MAX_SYSTEM_ID_LENGTH, "system_id")?;
        let password = decode_cstring(buf, MAX_PASSWORD_LENGTH, "password")?;
        let system_type = decode_cstring(buf, MAX_SYSTEM_TYPE_LENGTH, "system_type")?;
        let interface_version = decode_u8(buf, "interface_version")?;
        let interface_version =
            InterfaceVersion::try_from(interface_version).map_err(|_| {
                CodecError::FieldValidation {
                    field: "interface_version",
                    reason: format!("unsupported version {interface_version:#04x}"),
                }
            })?;
        let addr_ton = decode_ton(buf, "addr_ton")?;
        let addr_npi = decode_npi(buf, "addr_npi")?;
        let address_range = decode_cstring(buf, MAX_ADDRESS_RANGE_LENGTH, "address_range")?;

        Ok(BindRequest {
            bind_type,
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id,
            password,
            system_type,
            interface_version,
            addr_ton,
            addr_npi,
            address_range,
        })
    }
}

/// bind_*_resp. Error responses may arrive without a body, in which case
/// `system_id` is empty.
#[derive(Clone, Debug, PartialEq)]
pub struct BindResponse {
    pub bind_type: BindType,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub system_id: String,
    pub tlvs: Vec<Tlv>,
}

impl BindResponse {
    pub fn new(bind_type: BindType, sequence_number: u32, system_id: &str) -> Self {
        Self {
            bind_type,
            command_status: CommandStatus::Ok,
            sequence_number,
            system_id: system_id.to_string(),
            tlvs: Vec::new(),
        }
    }

    pub fn error(bind_type: BindType, sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            bind_type,
            command_status: status,
            sequence_number,
            system_id: String::new(),
            tlvs: Vec::new(),
        }
    }

    /// SMPP version advertised by the SMSC, when it sent one
    pub fn sc_interface_version(&self) -> Option<u8> {
        self.tlvs
            .iter()
            .find(|tlv| tlv.tag == TAG_SC_INTERFACE_VERSION)
            .and_then(|tlv| tlv.value.first().copied())
    }
}

impl Encodable for BindResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(
            buf,
            self.bind_type.response_command_id(),
            self.command_status,
            self.sequence_number,
        );
        encode_cstring(buf, &self.system_id, MAX_SYSTEM_ID_LENGTH, "system_id")?;
        encode_tlvs(buf, &self.tlvs)
    }
}

impl Decodable for BindResponse {
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let bind_type = BindType::from_command_id(header.command_id)
            .ok_or(CodecError::UnknownCommand(header.clone()))?;

        let (system_id, tlvs) = if buf.has_remaining() {
            let system_id = decode_cstring(buf, MAX_SYSTEM_ID_LENGTH, "system_id")?;
            (system_id, decode_tlvs(buf)?)
        } else {
            (String::new(), Vec::new())
        };

        Ok(BindResponse {
            bind_type,
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id,
            tlvs,
        })
    }
}

pub(crate) fn decode_ton(
    buf: &mut Cursor<&[u8]>,
    field: &'static str,
) -> Result<TypeOfNumber, CodecError> {
    decode_u8(buf, field).map(TypeOfNumber::from)
}

pub(crate) fn decode_npi(
    buf: &mut Cursor<&[u8]>,
    field: &'static str,
) -> Result<NumericPlanIndicator, CodecError> {
    decode_u8(buf, field).map(NumericPlanIndicator::from)
}
