//! HTTP response families keyed on the leading digit of the status code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Response family of a status code. `Zero` covers anything out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResponseFamily {
    #[serde(rename = "0xx")]
    Zero,
    #[serde(rename = "1xx")]
    Informational,
    #[serde(rename = "2xx")]
    Success,
    #[serde(rename = "3xx")]
    Redirection,
    #[serde(rename = "4xx")]
    ClientError,
    #[serde(rename = "5xx")]
    ServerError,
}

impl ResponseFamily {
    pub const ALL: [ResponseFamily; 6] = [
        Self::Zero,
        Self::Informational,
        Self::Success,
        Self::Redirection,
        Self::ClientError,
        Self::ServerError,
    ];

    /// Family of a numeric status. Codes outside 100..=599 map to `Zero`.
    pub fn of(status: u16) -> Self {
        match status {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Zero,
        }
    }

    /// Family of a textual status; anything unparsable maps to `Zero`.
    pub fn of_code(code: &str) -> Self {
        code.trim().parse::<u16>().map_or(Self::Zero, Self::of)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "0xx",
            Self::Informational => "1xx",
            Self::Success => "2xx",
            Self::Redirection => "3xx",
            Self::ClientError => "4xx",
            Self::ServerError => "5xx",
        }
    }

    pub fn leading_digit(&self) -> char {
        match self {
            Self::Zero => '0',
            Self::Informational => '1',
            Self::Success => '2',
            Self::Redirection => '3',
            Self::ClientError => '4',
            Self::ServerError => '5',
        }
    }

    pub fn is_2xx(&self) -> bool {
        *self == Self::Success
    }

    pub fn is_4xx(&self) -> bool {
        *self == Self::ClientError
    }

    pub fn is_5xx(&self) -> bool {
        *self == Self::ServerError
    }
}

impl fmt::Display for ResponseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFamily {
    type Err = String;

    /// Accepts family names (`4xx`, `4XX`); other text is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == lower)
            .ok_or_else(|| format!("unknown response family: {}", s))
    }
}

/// Family of a numeric status code.
pub fn family_of(status: u16) -> ResponseFamily {
    ResponseFamily::of(status)
}

pub fn is_2xx(status: u16) -> bool {
    ResponseFamily::of(status).is_2xx()
}

pub fn is_4xx(status: u16) -> bool {
    ResponseFamily::of(status).is_4xx()
}

pub fn is_5xx(status: u16) -> bool {
    ResponseFamily::of(status).is_5xx()
}

/// Compare two codes where either may be a range such as `4XX`.
///
/// Inputs that are not three characters long only match on exact equality.
pub fn matches_code_or_range(first: &str, second: &str) -> bool {
    if first.eq_ignore_ascii_case(second) {
        return true;
    }
    if first.len() != 3 || second.len() != 3 || !first.is_ascii() || !second.is_ascii() {
        return false;
    }
    let is_range = |code: &str| code[1..].eq_ignore_ascii_case("xx");
    let same_lead = first[..1] == second[..1];
    same_lead && (is_range(first) || is_range(second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(family_of(99), ResponseFamily::Zero);
        assert_eq!(family_of(100), ResponseFamily::Informational);
        assert_eq!(family_of(599), ResponseFamily::ServerError);
        assert_eq!(family_of(600), ResponseFamily::Zero);
    }

    #[test]
    fn textual_codes() {
        assert_eq!(ResponseFamily::of_code("404"), ResponseFamily::ClientError);
        assert_eq!(ResponseFamily::of_code("abc"), ResponseFamily::Zero);
        assert_eq!(ResponseFamily::of_code("-1"), ResponseFamily::Zero);
    }

    #[test]
    fn family_names_round_trip_through_from_str() {
        assert_eq!("4XX".parse::<ResponseFamily>(), Ok(ResponseFamily::ClientError));
        assert!("4x".parse::<ResponseFamily>().is_err());
    }

    #[test]
    fn code_or_range_matching() {
        assert!(matches_code_or_range("4XX", "404"));
        assert!(matches_code_or_range("404", "4xx"));
        assert!(matches_code_or_range("200", "200"));
        assert!(!matches_code_or_range("4XX", "500"));
        assert!(!matches_code_or_range("40", "4XX"));
    }
}
