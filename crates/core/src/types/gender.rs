//! Catalog gender categories.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Gender category a product is listed under.
///
/// The set is closed: the backend only accepts these four tokens, serialized
/// in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Kid,
    Unisex,
}

impl Gender {
    /// All categories, in display order (used by navigation and the edit
    /// form's select).
    pub const ALL: [Self; 4] = [Self::Men, Self::Women, Self::Kid, Self::Unisex];

    /// The lowercase wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kid => "kid",
            Self::Unisex => "unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`Gender`] token.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown gender: {0}")]
pub struct ParseGenderError(String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "kid" => Ok(Self::Kid),
            "unisex" => Ok(Self::Unisex),
            other => Err(ParseGenderError(other.to_owned())),
        }
    }
}
