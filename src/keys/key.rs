//! Key symbols and the static button-to-key table
//!
//! Keys are single lowercase ASCII letters or digits. Each one knows its
//! macOS virtual key code (ANSI layout) so the CoreGraphics sink can post it.

use serde::{Deserialize, Serialize};

/// macOS virtual key codes for the ANSI keyboard layout
pub mod codes {
    pub const ANSI_A: u16 = 0x00;
    pub const ANSI_S: u16 = 0x01;
    pub const ANSI_D: u16 = 0x02;
    pub const ANSI_F: u16 = 0x03;
    pub const ANSI_H: u16 = 0x04;
    pub const ANSI_G: u16 = 0x05;
    pub const ANSI_Z: u16 = 0x06;
    pub const ANSI_X: u16 = 0x07;
    pub const ANSI_C: u16 = 0x08;
    pub const ANSI_V: u16 = 0x09;
    pub const ANSI_B: u16 = 0x0B;
    pub const ANSI_Q: u16 = 0x0C;
    pub const ANSI_W: u16 = 0x0D;
    pub const ANSI_E: u16 = 0x0E;
    pub const ANSI_R: u16 = 0x0F;
    pub const ANSI_Y: u16 = 0x10;
    pub const ANSI_T: u16 = 0x11;
    pub const ANSI_1: u16 = 0x12;
    pub const ANSI_2: u16 = 0x13;
    pub const ANSI_3: u16 = 0x14;
    pub const ANSI_4: u16 = 0x15;
    pub const ANSI_6: u16 = 0x16;
    pub const ANSI_5: u16 = 0x17;
    pub const ANSI_9: u16 = 0x19;
    pub const ANSI_7: u16 = 0x1A;
    pub const ANSI_8: u16 = 0x1C;
    pub const ANSI_0: u16 = 0x1D;
    pub const ANSI_O: u16 = 0x1F;
    pub const ANSI_U: u16 = 0x20;
    pub const ANSI_I: u16 = 0x22;
    pub const ANSI_P: u16 = 0x23;
    pub const ANSI_L: u16 = 0x25;
    pub const ANSI_J: u16 = 0x26;
    pub const ANSI_K: u16 = 0x28;
    pub const ANSI_N: u16 = 0x2D;
    pub const ANSI_M: u16 = 0x2E;
}

/// A single-character output key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Key(char);

impl Key {
    /// Create a key from a lowercase ASCII letter or digit
    pub fn new(symbol: char) -> Option<Self> {
        (symbol.is_ascii_lowercase() || symbol.is_ascii_digit()).then_some(Self(symbol))
    }

    /// The character this key types
    pub fn symbol(&self) -> char {
        self.0
    }

    /// macOS virtual key code for this key
    pub fn macos_keycode(&self) -> u16 {
        use codes::*;
        match self.0 {
            'a' => ANSI_A,
            'b' => ANSI_B,
            'c' => ANSI_C,
            'd' => ANSI_D,
            'e' => ANSI_E,
            'f' => ANSI_F,
            'g' => ANSI_G,
            'h' => ANSI_H,
            'i' => ANSI_I,
            'j' => ANSI_J,
            'k' => ANSI_K,
            'l' => ANSI_L,
            'm' => ANSI_M,
            'n' => ANSI_N,
            'o' => ANSI_O,
            'p' => ANSI_P,
            'q' => ANSI_Q,
            'r' => ANSI_R,
            's' => ANSI_S,
            't' => ANSI_T,
            'u' => ANSI_U,
            'v' => ANSI_V,
            'w' => ANSI_W,
            'x' => ANSI_X,
            'y' => ANSI_Y,
            'z' => ANSI_Z,
            '0' => ANSI_0,
            '1' => ANSI_1,
            '2' => ANSI_2,
            '3' => ANSI_3,
            '4' => ANSI_4,
            '5' => ANSI_5,
            '6' => ANSI_6,
            '7' => ANSI_7,
            '8' => ANSI_8,
            // Key::new only admits [a-z0-9]
            _ => ANSI_9,
        }
    }
}

impl TryFrom<char> for Key {
    type Error = String;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        Key::new(symbol).ok_or_else(|| format!("unsupported key symbol {symbol:?}"))
    }
}

impl From<Key> for char {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_ascii_uppercase())
    }
}

/// Static mapping from button identifier to output key
///
/// Entries keep their declaration order; shutdown releases keys in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapping {
    entries: Vec<(String, Key)>,
}

impl KeyMapping {
    /// Build a mapping from `(button_id, key)` pairs
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Key)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, key)| (id.into(), key))
                .collect(),
        }
    }

    /// Key mapped to the given button, if any
    pub fn key_for(&self, button_id: &str) -> Option<Key> {
        self.entries
            .iter()
            .find(|(id, _)| id == button_id)
            .map(|(_, key)| *key)
    }

    pub fn contains(&self, button_id: &str) -> bool {
        self.key_for(button_id).is_some()
    }

    /// Iterate entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Key)> {
        self.entries.iter().map(|(id, key)| (id.as_str(), *key))
    }
}

impl Default for KeyMapping {
    /// B1..B4 drive W/A/S/D
    fn default() -> Self {
        Self {
            entries: vec![
                ("B1".to_string(), Key('w')),
                ("B2".to_string(), Key('a')),
                ("B3".to_string(), Key('s')),
                ("B4".to_string(), Key('d')),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_accepts_lowercase_and_digits() {
        assert!(Key::new('w').is_some());
        assert!(Key::new('7').is_some());
        assert!(Key::new('W').is_none());
        assert!(Key::new(' ').is_none());
        assert!(Key::new('é').is_none());
    }

    #[test]
    fn test_key_display_is_uppercase() {
        assert_eq!(Key::new('d').unwrap().to_string(), "D");
    }

    #[test]
    fn test_wasd_keycodes() {
        assert_eq!(Key::new('w').unwrap().macos_keycode(), codes::ANSI_W);
        assert_eq!(Key::new('a').unwrap().macos_keycode(), codes::ANSI_A);
        assert_eq!(Key::new('s').unwrap().macos_keycode(), codes::ANSI_S);
        assert_eq!(Key::new('d').unwrap().macos_keycode(), codes::ANSI_D);
        assert_eq!(Key::new('9').unwrap().macos_keycode(), codes::ANSI_9);
    }

    #[test]
    fn test_default_mapping() {
        let mapping = KeyMapping::default();
        assert_eq!(mapping.iter().count(), 4);
        assert_eq!(mapping.key_for("B1"), Key::new('w'));
        assert_eq!(mapping.key_for("B2"), Key::new('a'));
        assert_eq!(mapping.key_for("B3"), Key::new('s'));
        assert_eq!(mapping.key_for("B4"), Key::new('d'));
        assert_eq!(mapping.key_for("B9"), None);
        assert!(!mapping.contains("b1"));
    }

    #[test]
    fn test_mapping_preserves_order() {
        let mapping = KeyMapping::default();
        let ids: Vec<&str> = mapping.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["B1", "B2", "B3", "B4"]);
    }

    #[test]
    fn test_key_rejects_invalid_json() {
        assert!(serde_json::from_str::<Key>("\"W\"").is_err());
        assert_eq!(serde_json::from_str::<Key>("\"w\"").unwrap(), Key('w'));
    }
}
