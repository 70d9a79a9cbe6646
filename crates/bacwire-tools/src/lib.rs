use clap::ValueEnum;
use thiserror::Error;

/// How `bacdecode` prints a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed Rust debug tree.
    Debug,
    /// The serialized tree as JSON.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("odd number of hex digits")]
    OddLength,
    #[error("invalid hex digit '{0}'")]
    InvalidDigit(char),
}

/// Parses hex octets, ignoring whitespace, `:`/`-` separators, `0x`
/// prefixes, and `#` comments to the end of a line.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, HexError> {
    let mut digits = Vec::new();
    for line in input.lines() {
        let line = line.split('#').next().unwrap_or_default();
        for token in line.split(|c: char| c.is_whitespace() || c == ':' || c == '-') {
            let token = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            for c in token.chars() {
                let value = c.to_digit(16).ok_or(HexError::InvalidDigit(c))?;
                digits.push(value as u8);
            }
        }
    }
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }
    Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}
