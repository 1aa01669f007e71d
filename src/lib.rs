//! Command-line flags with environment variable and default fallbacks.
//!
//! Flags are declared on a [`FlagSet`] as boolean, mono-valuated (exactly one
//! value) or multi-valuated (any number of values), each under one or more
//! alias names. Resolution fills every flag from the first source that
//! provides it:
//!
//! ```text
//! command line   -l value --long other
//!      ↓ then, for flags still unset
//! environment    LONG_FLAG_ENV=value,other
//!      ↓ then, for flags still unset
//! defaults       declared with the flag
//! ```
//!
//! Values are then read back as strings or converted to numbers with the
//! typed accessors.
//!
//! ```rust
//! use flag_loadr::{env_from_pairs, FlagSet};
//!
//! let mut flags = FlagSet::new();
//! flags.add_bool_flags(&["-b", "--boolean"], "a boolean flag").unwrap();
//! flags.add_multi_flags_with_env(&["-l", "--long"], "LONG_FLAG_ENV", "1,2", ",", "the long things").unwrap();
//!
//! let env = env_from_pairs([("LONG_FLAG_ENV", "3,4")]);
//! flags.parse_from(["-b"], &env).unwrap();
//!
//! assert!(flags.get_bool("-b").unwrap());
//! assert_eq!(flags.get_int("--long").unwrap(), [3, 4]);
//! ```
//!
//! Structs can be bound directly with [`define_flags!`] or, without the
//! macro, with a [`Schema`].

mod access;
pub mod env;
pub mod error;
pub mod field;
pub mod flag;
pub mod registry;
mod resolve;
pub mod schema;
mod usage;
pub mod valuation;
pub mod value;

// Re-export main types
pub use env::{env_from_pairs, EnvSource, ProcessEnv};
pub use error::{format_flag_errors, FlagError};
pub use field::FlagField;
pub use flag::FlagDef;
pub use registry::FlagSet;
pub use schema::{Binder, Bindings, FieldSpec, Schema};
pub use valuation::Valuation;
pub use value::{FlagValue, ScalarValue};

// Re-export macro
pub use flag_loadr_macros::define_flags;

/// Trait for structs bound from command-line flags and environment variables
pub trait Bind: Sized {
    /// The flag declarations backing this struct
    fn schema() -> Schema;

    /// Build the struct from resolved bindings, collecting every field error
    fn from_bindings(bindings: &Bindings) -> Result<Self, Vec<FlagError>>;

    /// Bind from the given arguments and environment
    fn load_from<I, S, E>(args: I, env: &E) -> Result<Self, Vec<FlagError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: EnvSource + ?Sized,
    {
        let bindings = Self::schema().bind_from(args, env).map_err(|e| vec![e])?;
        Self::from_bindings(&bindings)
    }

    /// Bind from the process arguments and environment, after loading `.env`
    fn load_or_error() -> Result<Self, Vec<FlagError>> {
        let _ = dotenvy::dotenv();
        let args = resolve::process_args().map_err(|e| vec![e])?;
        Self::load_from(args, &ProcessEnv)
    }

    /// Bind from the process arguments and environment, panicking on errors
    fn load() -> Self {
        match Self::load_or_error() {
            Ok(bound) => bound,
            Err(errors) => panic!("{}", format_flag_errors(&errors)),
        }
    }
}
