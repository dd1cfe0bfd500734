//! Centralized side naming utilities
//!
//! The rig reports every channel for the left (`li`, links) and right
//! (`re`, rechts) wheel of the axle under test.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Column/parameter suffix used by the rig exports.
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Left => "li",
            Side::Right => "re",
        }
    }

    /// Human readable name for titles and tables.
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }

    /// Panel index in side-by-side plots.
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Both sides in reporting order.
pub const SIDES: [Side; 2] = [Side::Left, Side::Right];
