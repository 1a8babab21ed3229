//! Wire format for `backgroundColor`.
//!
//! The API sends colors as strings: `#RRGGBB`, `#AARRGGBB` or one of the
//! basic color names. A bare `#` means "unspecified", stored as ARGB `0`.

use serde::{Deserialize, Deserializer, Serializer};

pub const UNSPECIFIED: u32 = 0;

const NAMED: &[(&str, u32)] = &[
    ("black", 0xFF00_0000),
    ("darkgray", 0xFF44_4444),
    ("darkgrey", 0xFF44_4444),
    ("gray", 0xFF88_8888),
    ("grey", 0xFF88_8888),
    ("lightgray", 0xFFCC_CCCC),
    ("lightgrey", 0xFFCC_CCCC),
    ("white", 0xFFFF_FFFF),
    ("red", 0xFFFF_0000),
    ("green", 0xFF00_FF00),
    ("blue", 0xFF00_00FF),
    ("yellow", 0xFFFF_FF00),
    ("cyan", 0xFF00_FFFF),
    ("magenta", 0xFFFF_00FF),
    ("aqua", 0xFF00_FFFF),
    ("fuchsia", 0xFFFF_00FF),
    ("lime", 0xFF00_FF00),
    ("maroon", 0xFF80_0000),
    ("navy", 0xFF00_0080),
    ("olive", 0xFF80_8000),
    ("purple", 0xFF80_0080),
    ("silver", 0xFFC0_C0C0),
    ("teal", 0xFF00_8080),
];

pub fn parse_color(raw: &str) -> Result<u32, String> {
    let value = raw.trim().to_lowercase();
    if value == "#" {
        return Ok(UNSPECIFIED);
    }

    if let Some(hex) = value.strip_prefix('#') {
        let parsed = u32::from_str_radix(hex, 16).ok();
        return match (hex.len(), parsed) {
            (6, Some(rgb)) => Ok(0xFF00_0000 | rgb),
            (8, Some(argb)) => Ok(argb),
            _ => Err(format!("Unknown color: {}", value)),
        };
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, argb)| *argb)
        .ok_or_else(|| format!("Unknown color: {}", value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_color(&raw).map_err(serde::de::Error::custom)
}

pub fn serialize<S>(argb: &u32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("#{:08X}", argb))
}

pub fn unspecified() -> u32 {
    UNSPECIFIED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_with_opaque_alpha() {
        assert_eq!(parse_color("#FF6B6B"), Ok(0xFFFF_6B6B));
    }

    #[test]
    fn parses_argb() {
        assert_eq!(parse_color("#80ff0000"), Ok(0x80FF_0000));
    }

    #[test]
    fn bare_hash_is_unspecified() {
        assert_eq!(parse_color("#"), Ok(UNSPECIFIED));
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(parse_color("Teal"), Ok(0xFF00_8080));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_color("#12345"),
            Err("Unknown color: #12345".to_string())
        );
        assert_eq!(
            parse_color("chartreuse-ish"),
            Err("Unknown color: chartreuse-ish".to_string())
        );
    }
}
