//! Sales Channel Model
//!
//! A channel is an independent storefront with its own order-numbering
//! sequence. Channel codes are part of the external order number format
//! and must never be renamed or merged once in use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Requested channel code does not match any known storefront
#[derive(Debug, Clone, Error)]
#[error("Unknown sales channel: {0}")]
pub struct UnknownChannel(pub String);

/// Sales channel (storefront)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum Channel {
    /// Main atelier storefront
    #[serde(rename = "AS")]
    #[cfg_attr(feature = "db", sqlx(rename = "AS"))]
    Atelier,
    /// Workshop / lab storefront
    #[serde(rename = "LAB")]
    #[cfg_attr(feature = "db", sqlx(rename = "LAB"))]
    Lab,
}

impl Channel {
    /// Every known channel, in seeding order
    pub const ALL: [Channel; 2] = [Channel::Atelier, Channel::Lab];

    /// Stable wire/storage code for this channel
    pub fn code(&self) -> &'static str {
        match self {
            Channel::Atelier => "AS",
            Channel::Lab => "LAB",
        }
    }

    /// Parse a channel code (case-sensitive, codes are canonical)
    pub fn from_code(code: &str) -> Result<Self, UnknownChannel> {
        match code {
            "AS" => Ok(Channel::Atelier),
            "LAB" => Ok(Channel::Lab),
            other => Err(UnknownChannel(other.to_string())),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_code(channel.code()).unwrap(), channel);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        let err = Channel::from_code("WEB").unwrap_err();
        assert_eq!(err.0, "WEB");
        // Codes are canonical, no case folding
        assert!(Channel::from_code("as").is_err());
        assert!(Channel::from_code("").is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Channel::Atelier).unwrap(), "\"AS\"");
        assert_eq!(serde_json::to_string(&Channel::Lab).unwrap(), "\"LAB\"");
        let parsed: Channel = serde_json::from_str("\"LAB\"").unwrap();
        assert_eq!(parsed, Channel::Lab);
    }

    #[test]
    fn test_display_matches_code() {
        assert_eq!(Channel::Atelier.to_string(), "AS");
        assert_eq!("LAB".parse::<Channel>().unwrap(), Channel::Lab);
    }
}
