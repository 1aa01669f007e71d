//! Conversion from resolved string values to Rust types.
//!
//! [`ScalarValue`] converts one stored string. [`FlagValue`] converts the whole
//! value list of a flag and fixes, through the target type, which valuation the
//! flag must have: `bool` is a boolean flag, `T` and `Option<T>` are
//! mono-valuated, `Vec<T>` is multi-valuated.

use crate::error::FlagError;
use crate::valuation::Valuation;
use std::path::PathBuf;

/// A type one stored string converts into
pub trait ScalarValue: Sized {
    fn parse_scalar(name: &str, raw: &str) -> Result<Self, FlagError>;
}

/// A type the full value list of a flag converts into
pub trait FlagValue: Sized {
    /// Valuation a flag must be declared with to convert into `Self`
    const VALUATION: Valuation;

    fn from_values(name: &str, values: &[String]) -> Result<Self, FlagError>;
}

macro_rules! integer_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl ScalarValue for $t {
                fn parse_scalar(name: &str, raw: &str) -> Result<Self, FlagError> {
                    raw.parse::<$t>()
                        .map_err(|e| FlagError::parse_error::<$t>(name, raw, e))
                }
            }
        )*
    };
}

integer_scalar!(i8, i16, i32, i64, isize);

macro_rules! unsigned_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl ScalarValue for $t {
                // Unsigned values take no sign at all, not even '+'
                fn parse_scalar(name: &str, raw: &str) -> Result<Self, FlagError> {
                    if raw.starts_with('+') {
                        return Err(FlagError::parse_error::<$t>(
                            name,
                            raw,
                            "invalid digit found in string",
                        ));
                    }
                    raw.parse::<$t>()
                        .map_err(|e| FlagError::parse_error::<$t>(name, raw, e))
                }
            }
        )*
    };
}

unsigned_scalar!(u8, u16, u32, u64, usize);

macro_rules! float_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl ScalarValue for $t {
                // Overflow to infinity is an error unless infinity was spelled out
                fn parse_scalar(name: &str, raw: &str) -> Result<Self, FlagError> {
                    let parsed = raw
                        .parse::<$t>()
                        .map_err(|e| FlagError::parse_error::<$t>(name, raw, e))?;
                    if parsed.is_infinite() && !spells_infinity(raw) {
                        return Err(FlagError::parse_error::<$t>(
                            name,
                            raw,
                            "value out of range",
                        ));
                    }
                    Ok(parsed)
                }
            }
        )*
    };
}

float_scalar!(f32, f64);

fn spells_infinity(raw: &str) -> bool {
    let digits = raw.trim_start_matches(['+', '-']);
    digits.eq_ignore_ascii_case("inf") || digits.eq_ignore_ascii_case("infinity")
}

impl ScalarValue for String {
    fn parse_scalar(_name: &str, raw: &str) -> Result<Self, FlagError> {
        Ok(raw.to_string())
    }
}

impl ScalarValue for PathBuf {
    fn parse_scalar(_name: &str, raw: &str) -> Result<Self, FlagError> {
        Ok(PathBuf::from(raw))
    }
}

impl FlagValue for bool {
    const VALUATION: Valuation = Valuation::None;

    fn from_values(_name: &str, values: &[String]) -> Result<Self, FlagError> {
        Ok(!values.is_empty())
    }
}

macro_rules! required_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl FlagValue for $t {
                const VALUATION: Valuation = Valuation::Mono;

                fn from_values(name: &str, values: &[String]) -> Result<Self, FlagError> {
                    match values.first() {
                        Some(raw) => <$t as ScalarValue>::parse_scalar(name, raw),
                        None => Err(FlagError::Required {
                            name: name.to_string(),
                        }),
                    }
                }
            }
        )*
    };
}

required_scalar!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, PathBuf,
);

impl<T: ScalarValue> FlagValue for Option<T> {
    const VALUATION: Valuation = Valuation::Mono;

    fn from_values(name: &str, values: &[String]) -> Result<Self, FlagError> {
        values
            .first()
            .map(|raw| T::parse_scalar(name, raw))
            .transpose()
    }
}

impl<T: ScalarValue> FlagValue for Vec<T> {
    const VALUATION: Valuation = Valuation::Multi;

    fn from_values(name: &str, values: &[String]) -> Result<Self, FlagError> {
        values.iter().map(|raw| T::parse_scalar(name, raw)).collect()
    }
}
