//! Device colour handling with hex parsing and serialization.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB colour used for device blocks.
///
/// Serialized as a `#RRGGBB` string so layout documents stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Colour {
    /// Creates a new `Colour` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `Colour` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB" (any case).
    ///
    /// # Examples
    ///
    /// ```
    /// use rackplan::models::Colour;
    ///
    /// assert_eq!(Colour::from_hex("#FF0000").unwrap(), Colour::new(255, 0, 0));
    /// assert_eq!(Colour::from_hex("0f0").unwrap(), Colour::new(0, 255, 0));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => anyhow::bail!(
                "Invalid hex colour '{hex}'. Expected #RRGGBB or #RGB"
            ),
        };

        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&expanded[range], 16)
                .with_context(|| format!("Invalid {name} channel in hex colour '{hex}'"))
        };

        Ok(Self::new(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Converts the colour to "#RRGGBB" (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Default for Colour {
    /// Neutral grey used for device types without an explicit colour.
    fn default() -> Self {
        Self::new(0x75, 0x75, 0x75)
    }
}

impl TryFrom<String> for Colour {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_valid() {
        assert_eq!(Colour::from_hex("#4A90D9").unwrap(), Colour::new(0x4A, 0x90, 0xD9));
        assert_eq!(Colour::from_hex("4a90d9").unwrap(), Colour::new(0x4A, 0x90, 0xD9));
        assert_eq!(Colour::from_hex("  #fff ").unwrap(), Colour::new(255, 255, 255));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("").is_err());
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Colour::new(1, 2, 255)).unwrap();
        assert_eq!(json, "\"#0102FF\"");

        let parsed: Colour = serde_json::from_str("\"#0102ff\"").unwrap();
        assert_eq!(parsed, Colour::new(1, 2, 255));

        assert!(serde_json::from_str::<Colour>("\"nope\"").is_err());
    }
}
