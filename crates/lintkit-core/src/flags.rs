//! Registration flags for checks.

use std::fmt;

bitflags::bitflags! {
    /// Flags a check is registered with.
    ///
    /// The level bits decide which default run a check belongs to;
    /// [`CheckFlags::HIDDEN`] keeps it out of default listings while leaving
    /// it creatable by explicit name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CheckFlags: u32 {
        /// Safe, high-signal checks.
        const LEVEL0 = 1 << 0;
        /// Checks with a small false-positive rate.
        const LEVEL1 = 1 << 1;
        /// Opinionated checks.
        const LEVEL2 = 1 << 2;
        /// Experimental or very noisy checks.
        const LEVEL3 = 1 << 3;
        /// Excluded from default listings and level-based selection.
        const HIDDEN = 1 << 4;
    }
}

impl CheckFlags {
    /// Returns `true` if the hidden bit is set.
    #[must_use]
    pub fn is_hidden(self) -> bool {
        self.contains(Self::HIDDEN)
    }

    /// Returns the level encoded in these flags.
    ///
    /// The highest level bit wins; no level bit means level 0.
    #[must_use]
    pub fn level(self) -> CheckLevel {
        if self.contains(Self::LEVEL3) {
            CheckLevel::Level3
        } else if self.contains(Self::LEVEL2) {
            CheckLevel::Level2
        } else if self.contains(Self::LEVEL1) {
            CheckLevel::Level1
        } else {
            CheckLevel::Level0
        }
    }
}

/// Check level, ordered from most to least conservative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckLevel {
    /// Level 0.
    #[default]
    Level0,
    /// Level 1.
    Level1,
    /// Level 2.
    Level2,
    /// Level 3.
    Level3,
}

impl CheckLevel {
    /// Highest supported level number.
    pub const MAX: u8 = 3;

    /// Converts a level number (0..=3).
    #[must_use]
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(Self::Level0),
            1 => Some(Self::Level1),
            2 => Some(Self::Level2),
            3 => Some(Self::Level3),
            _ => None,
        }
    }

    /// Returns the level number.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Level0 => 0,
            Self::Level1 => 1,
            Self::Level2 => 2,
            Self::Level3 => 3,
        }
    }
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level{}", self.number())
    }
}
