use num_enum::TryFromPrimitive;

/// SMPP v3.4 command_id values for the PDUs this client speaks.
///
/// Response identifiers are the request identifier with bit 31 set. Any
/// other value on the wire is reported by the codec as an unknown command.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandId {
    GenericNack = 0x8000_0000,
    BindReceiver = 0x0000_0001,
    BindReceiverResp = 0x8000_0001,
    BindTransmitter = 0x0000_0002,
    BindTransmitterResp = 0x8000_0002,
    SubmitSm = 0x0000_0004,
    SubmitSmResp = 0x8000_0004,
    DeliverSm = 0x0000_0005,
    DeliverSmResp = 0x8000_0005,
    Unbind = 0x0000_0006,
    UnbindResp = 0x8000_0006,
    BindTransceiver = 0x0000_0009,
    BindTransceiverResp = 0x8000_0009,
    EnquireLink = 0x0000_0015,
    EnquireLinkResp = 0x8000_0015,
}

impl CommandId {
    /// Check if this command_id represents a response PDU
    pub fn is_response(&self) -> bool {
        (*self as u32) & 0x8000_0000 != 0
    }

    /// Check if this command_id is one of the three bind requests
    pub fn is_bind(&self) -> bool {
        matches!(
            self,
            CommandId::BindReceiver | CommandId::BindTransmitter | CommandId::BindTransceiver
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_id_is_response() {
        assert!(!CommandId::EnquireLink.is_response());
        assert!(CommandId::EnquireLinkResp.is_response());
        assert!(!CommandId::SubmitSm.is_response());
        assert!(CommandId::SubmitSmResp.is_response());
        assert!(CommandId::GenericNack.is_response());
    }

    #[test]
    fn reserved_command_ids_are_rejected() {
        assert!(CommandId::try_from(0x0000_000A).is_err());
        assert!(CommandId::try_from(0x0000_0003).is_err());
        assert_eq!(
            CommandId::try_from(0x8000_0009).unwrap(),
            CommandId::BindTransceiverResp
        );
    }
}
