use crate::error::{DispairError, DispairResult};

/// An RGB colour, as used for the side bar of an [`Embed`](super::Embed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub type Color = Colour;

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn red() -> Self {
        Self::new(255, 0, 0)
    }

    pub const fn green() -> Self {
        Self::new(0, 255, 0)
    }

    pub const fn blue() -> Self {
        Self::new(0, 0, 255)
    }

    /// Parse `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(hex_string: &str) -> DispairResult<Self> {
        let digits = hex_string.strip_prefix('#').unwrap_or(hex_string);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DispairError::Colour(format!(
                "'{hex_string}' is not a 6 digit hex colour"
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| DispairError::Colour(e.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn from_decimal(decimal: u32) -> DispairResult<Self> {
        if decimal > 0xFF_FFFF {
            return Err(DispairError::Colour(format!(
                "{decimal} is larger than 0xFFFFFF"
            )));
        }
        Ok(Self::new(
            (decimal >> 16) as u8,
            (decimal >> 8) as u8,
            decimal as u8,
        ))
    }

    /// Integer form Discord expects in the embed `color` field.
    pub const fn decimal(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}
