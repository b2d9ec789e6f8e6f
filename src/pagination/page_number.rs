//! Page-number labels of listing pages

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Label of the "current page" marker on a listing page
///
/// Most pages carry a plain number, but pagination widgets also render
/// non-numeric markers (ellipses, "Next"). Those are kept verbatim as
/// [`PageNumber::Label`]. Only numeric pages have neighbours by arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageNumber {
    Numeric(u32),
    Label(String),
}

impl PageNumber {
    /// Parses a marker text: all-digit text is numeric, anything else a label
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(number) = trimmed.parse::<u32>() {
                return Self::Numeric(number);
            }
        }
        Self::Label(text.to_string())
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Label(_) => None,
        }
    }

    /// The following page number, if this one is numeric
    pub fn next(&self) -> Option<u32> {
        self.as_number().and_then(|n| n.checked_add(1))
    }

    /// The preceding page number, if this one is numeric and above 1
    pub fn previous(&self) -> Option<u32> {
        self.as_number()
            .and_then(|n| n.checked_sub(1))
            .filter(|n| *n >= 1)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Numeric(n) => Value::from(*n),
            Self::Label(label) => Value::String(label.clone()),
        }
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{}", n),
            Self::Label(label) => write!(f, "{:?}", label),
        }
    }
}
