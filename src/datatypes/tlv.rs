use crate::codec::{decode_u16, CodecError};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// sc_interface_version, carried by bind_*_resp
pub const TAG_SC_INTERFACE_VERSION: u16 = 0x0210;
/// receipted_message_id, carried by delivery receipts
pub const TAG_RECEIPTED_MESSAGE_ID: u16 = 0x001E;
/// message_state, carried by delivery receipts
pub const TAG_MESSAGE_STATE: u16 = 0x0427;

/// Optional parameter trailing the mandatory part of a PDU body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tlv {
    /// The Tag field is used to uniquely identify the particular optional parameter in question.
    pub tag: u16,

    /// The Value field contains the actual data for the optional parameter in question.
    /// Its length is written on the wire as a 16-bit prefix.
    pub value: Bytes,
}

impl Tlv {
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let length = u16::try_from(self.value.len()).map_err(|_| CodecError::FieldValidation {
            field: "tlv_value",
            reason: format!("value of tag {:#06x} exceeds 65535 octets", self.tag),
        })?;
        buf.put_u16(self.tag);
        buf.put_u16(length);
        buf.put_slice(&self.value);
        Ok(())
    }

    pub fn encoded_size(&self) -> usize {
        4 + self.value.len()
    }
}

/// Decode every TLV remaining in `buf`.
///
/// A trailer that stops part-way through a tag, length or value is a
/// malformed PDU.
pub fn decode_tlvs(buf: &mut Cursor<&[u8]>) -> Result<Vec<Tlv>, CodecError> {
    let mut tlvs = Vec::new();
    while buf.has_remaining() {
        let tag = decode_u16(buf, "tlv_tag")?;
        let length = decode_u16(buf, "tlv_length")? as usize;
        if buf.remaining() < length {
            return Err(CodecError::MalformedPdu(format!(
                "TLV {tag:#06x} declares {length} octets but only {} remain",
                buf.remaining()
            )));
        }
        tlvs.push(Tlv {
            tag,
            value: buf.copy_to_bytes(length),
        });
    }
    Ok(tlvs)
}

pub fn encode_tlvs(buf: &mut BytesMut, tlvs: &[Tlv]) -> Result<(), CodecError> {
    for tlv in tlvs {
        tlv.encode(buf)?;
    }
    Ok(())
}
