use crate::datatypes::{CommandId, CommandStatus};

/// enquire_link is sent by either peer to confirm the link is still alive.
#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLink {
    /// Always ESME_ROK on the request
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLinkResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

crate::macros::impl_complete_header_only_pdu!(EnquireLink, CommandId::EnquireLink);
crate::macros::impl_complete_header_only_pdu!(EnquireLinkResponse, CommandId::EnquireLinkResp);
