// ABOUTME: This module provides macros to reduce boilerplate in SMPP PDU implementations
// ABOUTME: Includes macros for header-only PDUs and builder patterns

/// Macro for implementing codec traits on header-only PDUs (no body)
///
/// # Arguments
/// * `$pdu_type` - The PDU struct name (e.g., EnquireLink)
/// * `$command_id` - The CommandId variant (e.g., CommandId::EnquireLink)
///
/// # Generated code
/// - Decodable implementation that rejects any body octets
/// - Encodable implementation writing only the 16-byte header
macro_rules! impl_header_only_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        impl $crate::codec::Decodable for $pdu_type {
            fn decode(
                header: $crate::codec::PduHeader,
                buf: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                use bytes::Buf;

                if buf.has_remaining() {
                    return Err($crate::codec::CodecError::MalformedPdu(format!(
                        concat!(stringify!($pdu_type), " carries {} unexpected body octets"),
                        buf.remaining()
                    )));
                }

                Ok($pdu_type {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                })
            }
        }

        impl $crate::codec::Encodable for $pdu_type {
            fn encode(&self, buf: &mut bytes::BytesMut) -> Result<(), $crate::codec::CodecError> {
                $crate::codec::encode_header(
                    buf,
                    $command_id,
                    self.command_status,
                    self.sequence_number,
                );
                Ok(())
            }
        }
    };
}

/// Macro for implementing codec traits on submit_sm and deliver_sm
///
/// Both PDUs share the same mandatory body followed by optional TLVs, so the
/// struct must provide every field named below.
macro_rules! impl_short_message_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        impl $crate::codec::Encodable for $pdu_type {
            fn encode(&self, buf: &mut bytes::BytesMut) -> Result<(), $crate::codec::CodecError> {
                use bytes::BufMut;
                use $crate::codec::encode_cstring;
                use $crate::datatypes::submit_sm::*;

                if self.short_message.len() > MAX_SHORT_MESSAGE_LENGTH {
                    return Err($crate::codec::CodecError::FieldValidation {
                        field: "short_message",
                        reason: format!(
                            "{} octets exceeds maximum of {}",
                            self.short_message.len(),
                            MAX_SHORT_MESSAGE_LENGTH
                        ),
                    });
                }

                $crate::codec::encode_header(
                    buf,
                    $command_id,
                    self.command_status,
                    self.sequence_number,
                );
                encode_cstring(buf, &self.service_type, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
                buf.put_u8(self.source_addr_ton.into());
                buf.put_u8(self.source_addr_npi.into());
                encode_cstring(buf, &self.source_addr, MAX_ADDRESS_LENGTH, "source_addr")?;
                buf.put_u8(self.dest_addr_ton.into());
                buf.put_u8(self.dest_addr_npi.into());
                encode_cstring(
                    buf,
                    &self.destination_addr,
                    MAX_ADDRESS_LENGTH,
                    "destination_addr",
                )?;
                buf.put_u8(self.esm_class);
                buf.put_u8(self.protocol_id);
                buf.put_u8(self.priority_flag.into());
                encode_cstring(
                    buf,
                    &self.schedule_delivery_time,
                    MAX_TIME_LENGTH,
                    "schedule_delivery_time",
                )?;
                encode_cstring(buf, &self.validity_period, MAX_TIME_LENGTH, "validity_period")?;
                buf.put_u8(self.registered_delivery);
                buf.put_u8(self.replace_if_present_flag);
                buf.put_u8(self.data_coding);
                buf.put_u8(self.sm_default_msg_id);
                buf.put_u8(self.short_message.len() as u8);
                buf.put_slice(&self.short_message);
                $crate::datatypes::tlv::encode_tlvs(buf, &self.tlvs)
            }
        }

        impl $crate::codec::Decodable for $pdu_type {
            fn decode(
                header: $crate::codec::PduHeader,
                buf: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                use $crate::codec::{decode_cstring, decode_octets, decode_u8};
                use $crate::datatypes::bind::{decode_npi, decode_ton};
                use $crate::datatypes::submit_sm::*;

                let service_type = decode_cstring(buf, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
                let source_addr_ton = decode_ton(buf, "source_addr_ton")?;
                let source_addr_npi = decode_npi(buf, "source_addr_npi")?;
                let source_addr = decode_cstring(buf, MAX_ADDRESS_LENGTH, "source_addr")?;
                let dest_addr_ton = decode_ton(buf, "dest_addr_ton")?;
                let dest_addr_npi = decode_npi(buf, "dest_addr_npi")?;
                let destination_addr =
                    decode_cstring(buf, MAX_ADDRESS_LENGTH, "destination_addr")?;
                let esm_class = decode_u8(buf, "esm_class")?;
                let protocol_id = decode_u8(buf, "protocol_id")?;
                let priority_flag =
                    $crate::datatypes::PriorityFlag::from(decode_u8(buf, "priority_flag")?);
                let schedule_delivery_time =
                    decode_cstring(buf, MAX_TIME_LENGTH, "schedule_delivery_time")?;
                let validity_period = decode_cstring(buf, MAX_TIME_LENGTH, "validity_period")?;
                let registered_delivery = decode_u8(buf, "registered_delivery")?;
                let replace_if_present_flag = decode_u8(buf, "replace_if_present_flag")?;
                let data_coding = decode_u8(buf, "data_coding")?;
                let sm_default_msg_id = decode_u8(buf, "sm_default_msg_id")?;
                let sm_length = decode_u8(buf, "sm_length")? as usize;
                if sm_length > MAX_SHORT_MESSAGE_LENGTH {
                    return Err($crate::codec::CodecError::FieldValidation {
                        field: "short_message",
                        reason: format!("sm_length {sm_length} exceeds {MAX_SHORT_MESSAGE_LENGTH}"),
                    });
                }
                let short_message = decode_octets(buf, sm_length, "short_message")?;
                let tlvs = $crate::datatypes::tlv::decode_tlvs(buf)?;

                Ok($pdu_type {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                    service_type,
                    source_addr_ton,
                    source_addr_npi,
                    source_addr,
                    dest_addr_ton,
                    dest_addr_npi,
                    destination_addr,
                    esm_class,
                    protocol_id,
                    priority_flag,
                    schedule_delivery_time,
                    validity_period,
                    registered_delivery,
                    replace_if_present_flag,
                    data_coding,
                    sm_default_msg_id,
                    short_message,
                    tlvs,
                })
            }
        }
    };
}

/// Macro for generating builder setter methods
///
/// For each `field: Type` pair this generates a fluent `field(mut self, value) -> Self`.
macro_rules! builder_setters {
    ($($field:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $field(mut self, $field: $type) -> Self {
                self.$field = $field;
                self
            }
        )*
    };
}

/// Macro for generating constructor methods for header-only PDUs
///
/// # Generated code
/// - `new(sequence_number: u32)` - Creates PDU with Ok status
/// - `error(sequence_number: u32, status: CommandStatus)` - Creates PDU with error status
macro_rules! impl_header_only_constructors {
    ($pdu_type:ident) => {
        impl $pdu_type {
            /// Create a new PDU with Ok status
            pub fn new(sequence_number: u32) -> Self {
                Self {
                    command_status: $crate::datatypes::CommandStatus::Ok,
                    sequence_number,
                }
            }

            /// Create a PDU with error status
            pub fn error(sequence_number: u32, status: $crate::datatypes::CommandStatus) -> Self {
                Self {
                    command_status: status,
                    sequence_number,
                }
            }
        }
    };
}

/// Combines codec implementation and constructor generation for header-only PDUs.
macro_rules! impl_complete_header_only_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        $crate::macros::impl_header_only_pdu!($pdu_type, $command_id);
        $crate::macros::impl_header_only_constructors!($pdu_type);
    };
}

// Make macros available to the rest of the crate
pub(crate) use {
    builder_setters, impl_complete_header_only_pdu, impl_header_only_constructors,
    impl_header_only_pdu, impl_short_message_pdu,
};
