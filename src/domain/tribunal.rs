//! Tribunal code newtype

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Court identifier as the API expects it in `siglaTribunal` (e.g. `TJMG`)
///
/// # Examples
///
/// ```
/// use comunica::domain::TribunalCode;
/// use std::str::FromStr;
///
/// let code = TribunalCode::from_str("tjmg").unwrap();
/// assert_eq!(code.as_str(), "TJMG");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TribunalCode(String);

impl TribunalCode {
    /// Creates a tribunal code, normalised to upper case
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or contains anything other than
    /// ASCII letters and digits.
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into().trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err("Tribunal code cannot be empty".to_string());
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!(
                "Tribunal code must be ASCII letters and digits, got: {code}"
            ));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TribunalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TribunalCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TribunalCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TribunalCode> for String {
    fn from(code: TribunalCode) -> Self {
        code.0
    }
}

impl AsRef<str> for TribunalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tribunal_code_normalises_case() {
        let code = TribunalCode::new(" trf1 ").unwrap();
        assert_eq!(code.as_str(), "TRF1");
        assert_eq!(code.to_string(), "TRF1");
    }

    #[test]
    fn test_tribunal_code_rejects_empty() {
        assert!(TribunalCode::new("").is_err());
        assert!(TribunalCode::new("   ").is_err());
    }

    #[test]
    fn test_tribunal_code_rejects_symbols() {
        assert!(TribunalCode::new("TJ-MG").is_err());
        assert!(TribunalCode::new("TJ MG").is_err());
    }

    #[test]
    fn test_tribunal_code_serde() {
        let code: TribunalCode = serde_json::from_str("\"tjsp\"").unwrap();
        assert_eq!(code.as_str(), "TJSP");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"TJSP\"");
        assert!(serde_json::from_str::<TribunalCode>("\"\"").is_err());
    }
}
