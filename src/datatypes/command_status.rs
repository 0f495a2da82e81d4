use num_enum::{FromPrimitive, IntoPrimitive};

/// The command_status field of an SMPP message response indicates the success
/// or failure of an SMPP request. It is relevant only in the SMPP response
/// message and should be set to NULL in SMPP request messages.
///
/// Codes outside the SMPP v3.4 table (reserved ranges, SMSC vendor specific
/// errors) are kept verbatim in `Other`.
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandStatus {
    /// No Error
    Ok = 0x00000000,

    /// Message Length is invalid
    InvalidMsgLength = 0x00000001,

    /// Command Length is invalid
    InvalidCommandLength = 0x00000002,

    /// Invalid Command ID
    InvalidCommandId = 0x00000003,

    /// Incorrect BIND Status for given command
    IncorrectBindStatus = 0x00000004,

    /// ESME Already in Bound State
    AlreadyBoundState = 0x00000005,

    /// Invalid Priority Flag
    InvalidPriorityFlag = 0x00000006,

    /// Invalid Registered Delivery Flag
    InvalidRegisteredDeliveryFlag = 0x00000007,

    /// System Error
    SystemError = 0x00000008,

    /// Invalid Source Address
    InvalidSourceAddress = 0x0000000A,

    /// Invalid Dest Addr
    InvalidDestinationAddress = 0x0000000B,

    /// Message ID is invalid
    InvalidMessageId = 0x0000000C,

    /// Bind Failed
    BindFailed = 0x0000000D,

    /// Invalid Password
    InvalidPassword = 0x0000000E,

    /// Invalid System ID
    InvalidSystemId = 0x0000000F,

    /// Message Queue Full
    MessageQueueFull = 0x00000014,

    /// Invalid Service Type
    InvalidServiceType = 0x00000015,

    /// Invalid esm_class field data
    InvalidEsmClassFieldData = 0x00000043,

    /// submit_sm or submit_multi failed
    SubmitFailed = 0x00000045,

    /// Invalid Source address TON
    InvalidSourceAddressTon = 0x00000048,

    /// Invalid Source address NPI
    InvalidSourceAddressNpi = 0x00000049,

    /// Invalid Destination address TON
    InvalidDestinationAddressTon = 0x00000050,

    /// Invalid Destination address NPI
    InvalidDestinationAddressNpi = 0x00000051,

    /// Invalid system_type field
    InvalidSystemTypeField = 0x00000053,

    /// Throttling error (ESME has exceeded allowed message limits)
    ThrottlingError = 0x00000058,

    /// Invalid Scheduled Delivery Time
    InvalidScheduledDeliveryTime = 0x00000061,

    /// Invalid message validity period (Expiry time)
    InvalidExpiryTime = 0x00000062,

    /// ESME Receiver Temporary App Error Code
    ReceiverTemporaryAppError = 0x00000064,

    /// ESME Receiver Permanent App Error Code
    ReceiverPermanentAppError = 0x00000065,

    /// ESME Receiver Reject Message Error Code
    ReceiverRejectMessageError = 0x00000066,

    /// Error in the optional part of the PDU Body.
    ErrorInOptionalPartofPduBody = 0x000000C0,

    /// Optional Parameter not allowed
    OptionalParameterNotAllowed = 0x000000C1,

    /// Invalid Parameter Length.
    InvalidParameterLength = 0x000000C2,

    /// Unknown Error
    UnknownError = 0x000000FF,

    /// Reserved or SMSC vendor specific status
    #[num_enum(catch_all)]
    Other(u32),
}

impl CommandStatus {
    pub fn is_ok(&self) -> bool {
        *self == CommandStatus::Ok
    }

    /// Raw wire value of this status
    pub fn code(&self) -> u32 {
        u32::from(*self)
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandStatus::Other(code) => write!(f, "{code:#010x}"),
            known => write!(f, "{known:?} ({:#010x})", known.code()),
        }
    }
}
