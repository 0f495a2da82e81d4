use num_enum::{FromPrimitive, IntoPrimitive};

/// SMPP v3.4 Priority Flag Field (Section 5.2.14)
///
/// Carried by both submit_sm and deliver_sm. Levels 4-255 are reserved.
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PriorityFlag {
    /// Normal / non-priority
    Level0 = 0,
    Level1 = 1,
    Level2 = 2,
    /// Highest priority (emergency in ANSI-41)
    Level3 = 3,

    /// Reserved level, kept as received
    #[num_enum(catch_all)]
    Other(u8),
}

impl Default for PriorityFlag {
    fn default() -> Self {
        PriorityFlag::Level0
    }
}
