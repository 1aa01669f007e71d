use crate::error::FlagError;
use crate::valuation::Valuation;

/// Marker stored for a boolean flag once it is present
pub(crate) const PRESENT: &str = "true";

/// A declared flag: every alias name shares one `FlagDef`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagDef {
    pub(crate) names: Vec<String>,
    pub(crate) env: String,
    pub(crate) valuation: Valuation,
    pub(crate) separator: String,
    pub(crate) defaults: Vec<String>,
    pub(crate) description: String,
    pub(crate) values: Vec<String>,
    pub(crate) is_set: bool,
}

impl FlagDef {
    pub(crate) fn new(
        names: Vec<String>,
        env: &str,
        defaults: Vec<String>,
        valuation: Valuation,
        separator: &str,
        description: &str,
    ) -> Self {
        Self {
            names,
            env: env.to_string(),
            valuation,
            // only multi-valuated flags split their values
            separator: if valuation.is_multi() {
                separator.to_string()
            } else {
                String::new()
            },
            defaults: defaults.into_iter().filter(|d| !d.is_empty()).collect(),
            description: description.to_string(),
            values: Vec::new(),
            is_set: false,
        }
    }

    /// All alias names, in declaration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The first declared alias
    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    /// Environment variable name, `None` when there is no environment fallback
    pub fn env(&self) -> Option<&str> {
        if self.env.is_empty() {
            None
        } else {
            Some(&self.env)
        }
    }

    pub fn valuation(&self) -> Valuation {
        self.valuation
    }

    /// Separator used to split one token into several values, `None` when unset
    pub fn separator(&self) -> Option<&str> {
        if self.separator.is_empty() {
            None
        } else {
            Some(&self.separator)
        }
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Resolved values, empty until one of the resolution stages sets the flag
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_set(&self) -> bool {
        self.is_set
    }

    pub(crate) fn mark_present(&mut self) {
        if !self.is_set {
            self.values.push(PRESENT.to_string());
            self.is_set = true;
        }
    }

    pub(crate) fn push_value(&mut self, value: &str) {
        self.values.push(value.to_string());
        self.is_set = true;
    }

    /// Appends the non-empty parts of `raw` split on `separator`.
    /// Returns how many parts were appended.
    pub(crate) fn push_split(&mut self, raw: &str, separator: &str) -> usize {
        let mut pushed = 0;
        for part in raw.split(separator).filter(|p| !p.is_empty()) {
            self.push_value(part);
            pushed += 1;
        }
        pushed
    }
}

/// Splits a single default string the way multi-valuated flags declare them
pub(crate) fn split_defaults(default: &str, valuation: Valuation, separator: &str) -> Vec<String> {
    if valuation.is_multi() && !separator.is_empty() {
        return default
            .split(separator)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
    }
    if default.is_empty() {
        Vec::new()
    } else {
        vec![default.to_string()]
    }
}

pub(crate) fn check_env_format(env: &str) -> Result<(), FlagError> {
    if env.chars().any(char::is_whitespace) {
        return Err(FlagError::InvalidName {
            name: env.to_string(),
            reason: "environment variable name contains whitespace",
        });
    }
    Ok(())
}

pub(crate) fn check_flag_format(flag: &str) -> Result<(), FlagError> {
    if flag.is_empty() {
        return Err(FlagError::InvalidName {
            name: String::new(),
            reason: "flag name is empty",
        });
    }
    if flag.chars().any(char::is_whitespace) {
        return Err(FlagError::InvalidName {
            name: flag.to_string(),
            reason: "flag name contains whitespace",
        });
    }
    Ok(())
}
