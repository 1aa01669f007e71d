use std::{fmt, str::FromStr};

/// How many values a flag carries once resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Valuation {
    /// Boolean presence flag, never followed by a value
    None,
    /// Exactly one value, the flag may appear once
    Mono,
    /// Zero or more values, the flag may be repeated
    Multi,
}

impl FromStr for Valuation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "bool" | "boolean" => Ok(Self::None),
            "mono" | "single" => Ok(Self::Mono),
            "multi" | "list" => Ok(Self::Multi),
            _ => Err(format!(
                "unknown valuation '{}', expected 'none', 'mono' or 'multi'",
                s
            )),
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Mono => write!(f, "mono"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

impl Valuation {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_mono(&self) -> bool {
        matches!(self, Self::Mono)
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi)
    }

    /// Whether the flag consumes the token following it on the command line
    pub fn takes_value(&self) -> bool {
        !self.is_none()
    }

    /// Connector placed between alias names in usage text
    pub(crate) fn connector(&self) -> &'static str {
        match self {
            Self::Multi => ", and/or ",
            _ => ", or ",
        }
    }
}
