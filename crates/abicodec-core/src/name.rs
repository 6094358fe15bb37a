//! The compact 64-bit name codec.
//!
//! Account, action, and table identifiers are short strings over the
//! charset `.12345a-z`, packed into a `u64`: 5 bits per character for the
//! first twelve characters and 4 bits for a thirteenth (which is therefore
//! limited to `.1-5a-j`). Encoding is total — characters outside the
//! charset map to `.` and anything past the thirteenth character is
//! ignored — so the inverse trims trailing dots and the round-trip law
//! holds for every string the encoder accepts cleanly.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Decode charset, indexed by the 5-bit (or 4-bit) symbol value.
const NAME_CHARSET: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Map a character to its symbol value. Unknown characters pack as 0 (`.`).
fn char_to_symbol(c: u8) -> u64 {
    match c {
        b'a'..=b'z' => (c - b'a') as u64 + 6,
        b'1'..=b'5' => (c - b'1') as u64 + 1,
        _ => 0,
    }
}

/// A 64-bit packed name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(u64);

impl Name {
    /// Encode a string. Total and truncating: invalid characters become
    /// `.`, characters beyond the thirteenth are dropped, and the
    /// thirteenth keeps only its low 4 bits.
    pub fn new(s: &str) -> Self {
        let bytes = s.as_bytes();
        let mut value: u64 = 0;
        for i in 0..13u64 {
            let mut c = bytes.get(i as usize).map_or(0, |&b| char_to_symbol(b));
            if i < 12 {
                c &= 0x1f;
                c <<= 64 - 5 * (i + 1);
            } else {
                c &= 0x0f;
            }
            value |= c;
        }
        Name(value)
    }

    pub const fn from_u64(value: u64) -> Self {
        Name(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The empty name (`""`), which packs to zero.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [b'.'; 13];
        let mut tmp = self.0;
        for i in 0..13 {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            buf[12 - i] = NAME_CHARSET[(tmp & mask) as usize];
            tmp >>= shift;
        }
        let len = buf
            .iter()
            .rposition(|&c| c != b'.')
            .map_or(0, |p| p + 1);
        // buf is drawn from NAME_CHARSET, always valid ASCII
        f.write_str(std::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Name::new(&s))
    }
}
