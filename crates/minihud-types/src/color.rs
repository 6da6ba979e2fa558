use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// An RGBA color parsed from HUD color text.
///
/// Accepted syntax is a `#` or `r` prefix followed by 3, 4, 6 or 8 hex
/// digits (case-insensitive): `#f00`, `#f008`, `#ff0000`, `#ff000080`.
/// Short forms expand each nibble (`#f00` == `#ff0000`). Alpha defaults to
/// fully opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse color text, returning `None` when it does not match the syntax.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').or_else(|| text.strip_prefix('r'))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nibbles: Vec<u8> = digits.bytes().map(hex_value).collect();
        match nibbles.as_slice() {
            [r, g, b] => Some(Self::rgb(r * 17, g * 17, b * 17)),
            [r, g, b, a] => Some(Self {
                r: r * 17,
                g: g * 17,
                b: b * 17,
                a: a * 17,
            }),
            [r1, r2, g1, g2, b1, b2] => Some(Self::rgb(r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2)),
            [r1, r2, g1, g2, b1, b2, a1, a2] => Some(Self {
                r: r1 << 4 | r2,
                g: g1 << 4 | g2,
                b: b1 << 4 | b2,
                a: a1 << 4 | a2,
            }),
            _ => None,
        }
    }

    /// Returns `true` if `text` is accepted by [`Color::parse`].
    pub fn is_valid(text: &str) -> bool {
        Self::parse(text).is_some()
    }
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

impl FromStr for Color {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TypeError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xff {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
