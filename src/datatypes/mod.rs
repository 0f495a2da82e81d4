// ABOUTME: SMPP v3.4 PDU types and the enumerated field values they carry
// ABOUTME: Each PDU module owns its wire layout through the codec traits

pub mod bind;
mod command_id;
mod command_status;
pub mod deliver_sm;
mod enquire_link;
mod generic_nack;
mod interface_version;
mod numeric_plan_indicator;
mod priority_flag;
pub mod submit_sm;
pub mod tlv;
mod type_of_number;
mod unbind;

pub use bind::{BindRequest, BindResponse, BindType};
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use deliver_sm::{DeliverSm, DeliverSmResponse};
pub use enquire_link::{EnquireLink, EnquireLinkResponse};
pub use generic_nack::GenericNack;
pub use interface_version::InterfaceVersion;
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use priority_flag::PriorityFlag;
pub use submit_sm::{SubmitSm, SubmitSmResponse};
pub use tlv::Tlv;
pub use type_of_number::TypeOfNumber;
pub use unbind::{Unbind, UnbindResponse};
