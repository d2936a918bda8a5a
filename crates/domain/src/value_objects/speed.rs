//! Movement types.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedType {
    Land,
    Burrow,
    Climb,
    Fly,
    Swim,
}

impl SpeedType {
    pub const ALL: [SpeedType; 5] = [
        Self::Land,
        Self::Burrow,
        Self::Climb,
        Self::Fly,
        Self::Swim,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::Burrow => "burrow",
            Self::Climb => "climb",
            Self::Fly => "fly",
            Self::Swim => "swim",
        }
    }
}

impl fmt::Display for SpeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
