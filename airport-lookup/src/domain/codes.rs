//! Airport code types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid ICAO or IATA code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} code {input:?}: {reason}")]
pub struct InvalidCode {
    kind: &'static str,
    input: String,
    reason: &'static str,
}

/// Check that `s` is exactly `N` uppercase ASCII letters or digits.
fn parse_code<const N: usize>(s: &str, kind: &'static str) -> Result<[u8; N], InvalidCode> {
    let invalid = |reason| InvalidCode {
        kind,
        input: s.to_string(),
        reason,
    };

    let bytes: [u8; N] = s.as_bytes().try_into().map_err(|_| {
        invalid(if N == 4 {
            "must be exactly 4 characters"
        } else {
            "must be exactly 3 characters"
        })
    })?;

    if !bytes
        .iter()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        return Err(invalid("must be uppercase ASCII letters or digits"));
    }

    Ok(bytes)
}

/// A valid 4-character ICAO airport code.
///
/// ICAO codes are the stable identifier of an airport record. Any `Icao`
/// value holds exactly 4 uppercase ASCII letters or digits.
///
/// # Examples
///
/// ```
/// use airport_lookup::domain::Icao;
///
/// let jfk = Icao::parse("KJFK").unwrap();
/// assert_eq!(jfk.as_str(), "KJFK");
///
/// assert!(Icao::parse("kjfk").is_err());
/// assert_eq!(Icao::parse_normalized(" kjfk ").unwrap(), jfk);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Icao([u8; 4]);

impl Icao {
    /// Parse an ICAO code. The input must already be uppercase.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        parse_code(s, "ICAO").map(Icao)
    }

    /// Parse an ICAO code after trimming whitespace and uppercasing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

/// A valid 3-character IATA airport code.
///
/// Not every airport has one; see [`crate::domain::Airport::iata`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iata([u8; 3]);

impl Iata {
    /// Parse an IATA code. The input must already be uppercase.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        parse_code(s, "IATA").map(Iata)
    }

    /// Parse an IATA code after trimming whitespace and uppercasing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl TryFrom<String> for Icao {
    type Error = InvalidCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Icao> for String {
    fn from(code: Icao) -> Self {
        code.as_str().to_string()
    }
}

impl TryFrom<String> for Iata {
    type Error = InvalidCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Iata> for String {
    fn from(code: Iata) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Debug for Icao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Icao({})", self.as_str())
    }
}

impl fmt::Display for Icao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Iata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iata({})", self.as_str())
    }
}

impl fmt::Display for Iata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
