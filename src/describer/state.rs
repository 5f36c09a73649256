use serde::{Deserialize, Serialize};
use std::fmt;

/// Evaluation state of a describer.
///
/// Variants are declared in ascending order, so the derived `Ord` gives
/// `Uncalculated < Invalid < Unqualified < Qualified`. "Valid" means
/// `> Invalid`, "qualified" means `> Unqualified`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum State {
    Uncalculated,
    Invalid,
    Unqualified,
    Qualified,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uncalculated => "UNCALCULATED",
            Self::Invalid => "INVALID",
            Self::Unqualified => "UNQUALIFIED",
            Self::Qualified => "QUALIFIED",
        }
    }

    pub fn is_valid(self) -> bool {
        self > Self::Invalid
    }

    pub fn is_qualified(self) -> bool {
        self > Self::Unqualified
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
