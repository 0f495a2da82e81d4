use crate::datatypes::{CommandId, CommandStatus};

/// unbind ends the binding. Either peer may send it; the other answers with
/// unbind_resp and the connection is then closed.
#[derive(Clone, Debug, PartialEq)]
pub struct Unbind {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnbindResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

crate::macros::impl_complete_header_only_pdu!(Unbind, CommandId::Unbind);
crate::macros::impl_complete_header_only_pdu!(UnbindResponse, CommandId::UnbindResp);
