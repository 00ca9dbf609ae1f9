use strum_macros::{EnumCount, EnumIter};

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Back,
    Forward,

    // Unknown is the last value
    Unknown,
}
