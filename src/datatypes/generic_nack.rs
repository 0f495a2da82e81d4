use crate::datatypes::{CommandId, CommandStatus};

/// GenericNack answers a PDU the receiver could not process: an unknown
/// command_id, a malformed body, or a command not allowed in the current
/// session state.
///
/// The generic_nack PDU has no body. When the offending PDU's sequence number
/// could not be determined it is 0.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericNack {
    /// The reason for the generic_nack
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl GenericNack {
    /// Creates a GenericNack for an invalid command ID error
    pub fn invalid_command_id(sequence_number: u32) -> Self {
        Self::error(sequence_number, CommandStatus::InvalidCommandId)
    }

    /// Creates a GenericNack for an invalid command length error
    pub fn invalid_command_length(sequence_number: u32) -> Self {
        Self::error(sequence_number, CommandStatus::InvalidCommandLength)
    }

    /// Creates a GenericNack for a system error
    pub fn system_error(sequence_number: u32) -> Self {
        Self::error(sequence_number, CommandStatus::SystemError)
    }
}

crate::macros::impl_complete_header_only_pdu!(GenericNack, CommandId::GenericNack);
