/// Character set selector carried in the first content octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CharacterSet {
    Utf8,
    IbmMicrosoftDbcs,
    JisX0208,
    Ucs4,
    Ucs2,
    Iso8859_1,
    Other(u8),
}

impl CharacterSet {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Utf8,
            1 => Self::IbmMicrosoftDbcs,
            2 => Self::JisX0208,
            3 => Self::Ucs4,
            4 => Self::Ucs2,
            5 => Self::Iso8859_1,
            v => Self::Other(v),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Utf8 => 0,
            Self::IbmMicrosoftDbcs => 1,
            Self::JisX0208 => 2,
            Self::Ucs4 => 3,
            Self::Ucs2 => 4,
            Self::Iso8859_1 => 5,
            Self::Other(v) => v,
        }
    }
}

/// Character string content as it appears on the wire.
///
/// The payload is kept as raw octets so strings in any character set
/// re-encode unchanged; [`as_str`](Self::as_str) views UTF-8 content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CharacterString<'a> {
    pub charset: CharacterSet,
    pub data: &'a [u8],
}

impl<'a> CharacterString<'a> {
    pub const fn new(charset: CharacterSet, data: &'a [u8]) -> Self {
        Self { charset, data }
    }

    pub const fn utf8(value: &'a str) -> Self {
        Self {
            charset: CharacterSet::Utf8,
            data: value.as_bytes(),
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self.charset {
            CharacterSet::Utf8 => core::str::from_utf8(self.data).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CharacterSet, CharacterString};

    #[test]
    fn utf8_view() {
        assert_eq!(CharacterString::utf8("AHU-1").as_str(), Some("AHU-1"));
        let latin = CharacterString::new(CharacterSet::Iso8859_1, &[0xE9]);
        assert_eq!(latin.as_str(), None);
        assert_eq!(CharacterSet::from_u8(9), CharacterSet::Other(9));
    }
}
