//! The fixed accent color palette.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::UserError;

/// Accent color shown next to an account across the UI.
///
/// Stored and serialized as its hex string (e.g. `"#c02c38"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    Ruby,
    Emerald,
    Sapphire,
    Amber,
    Violet,
    Coral,
    Rose,
    Slate,
    Ivory,
    Silver,
    Teal,
    Crimson,
    Lavender,
    Mint,
    Indigo,
    Honey,
}

impl Color {
    /// Every assignable color, in palette order.
    pub const PALETTE: [Color; 16] = [
        Color::Ruby,
        Color::Emerald,
        Color::Sapphire,
        Color::Amber,
        Color::Violet,
        Color::Coral,
        Color::Rose,
        Color::Slate,
        Color::Ivory,
        Color::Silver,
        Color::Teal,
        Color::Crimson,
        Color::Lavender,
        Color::Mint,
        Color::Indigo,
        Color::Honey,
    ];

    /// Color given to every superuser.
    pub const NEUTRAL: Color = Color::Silver;

    pub fn hex(self) -> &'static str {
        match self {
            Color::Ruby => "#c02c38",
            Color::Emerald => "#2ecc71",
            Color::Sapphire => "#3498db",
            Color::Amber => "#e6b32e",
            Color::Violet => "#9b59b6",
            Color::Coral => "#e67e22",
            Color::Rose => "#e84393",
            Color::Slate => "#34495e",
            Color::Ivory => "#f5f5f0",
            Color::Silver => "#bdc3c7",
            Color::Teal => "#16a085",
            Color::Crimson => "#e74c3c",
            Color::Lavender => "#967bb6",
            Color::Mint => "#00b894",
            Color::Indigo => "#5352ed",
            Color::Honey => "#fbc531",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Ruby => "Ruby",
            Color::Emerald => "Emerald",
            Color::Sapphire => "Sapphire",
            Color::Amber => "Amber",
            Color::Violet => "Violet",
            Color::Coral => "Coral",
            Color::Rose => "Rose",
            Color::Slate => "Slate",
            Color::Ivory => "Ivory",
            Color::Silver => "Silver",
            Color::Teal => "Teal",
            Color::Crimson => "Crimson",
            Color::Lavender => "Lavender",
            Color::Mint => "Mint",
            Color::Indigo => "Indigo",
            Color::Honey => "Honey",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl FromStr for Color {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::PALETTE
            .into_iter()
            .find(|color| color.hex() == s)
            .ok_or_else(|| UserError::Constraint(format!("{s:?} is not a palette color")))
    }
}

impl TryFrom<String> for Color {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_palette_entries_are_distinct() {
        let hexes: HashSet<_> = Color::PALETTE.iter().map(|c| c.hex()).collect();
        let names: HashSet<_> = Color::PALETTE.iter().map(|c| c.name()).collect();
        assert_eq!(hexes.len(), 16);
        assert_eq!(names.len(), 16);
    }

    #[test]
    fn test_neutral_is_silver() {
        assert_eq!(Color::NEUTRAL, Color::Silver);
        assert_eq!(Color::NEUTRAL.hex(), "#bdc3c7");
        assert_eq!(Color::Ruby.hex(), "#c02c38");
        assert_eq!(Color::Honey.hex(), "#fbc531");
    }

    #[test]
    fn test_parse_roundtrips_every_entry() {
        for color in Color::PALETTE {
            assert_eq!(color.hex().parse::<Color>().unwrap(), color);
        }
    }

    #[test]
    fn test_unknown_colors_are_rejected() {
        assert!(matches!("#000000".parse::<Color>(), Err(UserError::Constraint(_))));
        assert!(matches!("Ruby".parse::<Color>(), Err(UserError::Constraint(_))));
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_serializes_as_hex() {
        let json = serde_json::to_string(&Color::Mint).unwrap();
        assert_eq!(json, "\"#00b894\"");

        let parsed: Color = serde_json::from_str("\"#5352ed\"").unwrap();
        assert_eq!(parsed, Color::Indigo);
        assert!(serde_json::from_str::<Color>("\"#123456\"").is_err());
    }
}
