use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{GridArtError, GridArtResult};

/// Opaque sRGB color, displayed in normalized `#RRGGBB` (uppercase) form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `#RGB` (case-insensitive, surrounding whitespace ignored).
    pub fn parse_hex(s: &str) -> GridArtResult<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        fn malformed(s: &str) -> GridArtError {
            GridArtError::invalid_input(format!(
                "malformed color value \"{s}\" (expected #RRGGBB or #RGB)"
            ))
        }

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed(s));
        }

        let hex_byte = |pair: &str| u8::from_str_radix(pair, 16).map_err(|_| malformed(s));

        match digits.len() {
            6 => Ok(Self::new(
                hex_byte(&digits[0..2])?,
                hex_byte(&digits[2..4])?,
                hex_byte(&digits[4..6])?,
            )),
            3 if trimmed.starts_with('#') => {
                // #RGB expands each nibble: #F0A -> #FF00AA.
                let nibble = |i: usize| hex_byte(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            _ => Err(malformed(s)),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = GridArtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = GridArtError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&s)
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        c.to_hex()
    }
}

/// Ordered, non-empty list of fill colors. Duplicates are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb8>", into = "Vec<Rgb8>")]
pub struct Palette {
    colors: Vec<Rgb8>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb8>) -> GridArtResult<Self> {
        if colors.is_empty() {
            return Err(GridArtError::invalid_input(
                "palette must contain at least one color",
            ));
        }
        Ok(Self { colors })
    }

    /// Parse every entry of `values` as a hex color.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> GridArtResult<Self> {
        let colors = values
            .iter()
            .map(|v| Rgb8::parse_hex(v.as_ref()))
            .collect::<GridArtResult<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn colors(&self) -> &[Rgb8] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// `#RRGGBB, #RRGGBB, ...` in palette order.
    pub fn joined_hex(&self) -> String {
        self.colors
            .iter()
            .map(|c| c.to_hex())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<Vec<Rgb8>> for Palette {
    type Error = GridArtError;

    fn try_from(colors: Vec<Rgb8>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Rgb8> {
    fn from(p: Palette) -> Self {
        p.colors
    }
}
