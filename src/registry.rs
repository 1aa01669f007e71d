use crate::error::FlagError;
use crate::flag::{check_env_format, check_flag_format, split_defaults, FlagDef};
use crate::valuation::Valuation;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// The set of declared flags.
///
/// Each logical flag is stored once; every alias name maps to the index of
/// that shared definition, so setting a value through one alias is visible
/// through all of them.
///
/// # Example
/// ```rust
/// use flag_loadr::FlagSet;
///
/// let mut flags = FlagSet::new();
/// flags.add_bool_flags(&["-v", "--verbose"], "print more").unwrap();
/// flags.add_multi_flags_with_env(&["-s", "--server"], "SERVERS", "", ",", "servers to contact").unwrap();
///
/// flags.parse_args(["--server", "10.0.0.1,10.0.0.2", "-v"]).unwrap();
///
/// assert!(flags.get_bool("--verbose").unwrap());
/// assert_eq!(flags.get_string("-s").unwrap(), ["10.0.0.1", "10.0.0.2"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    pub(crate) defs: Vec<FlagDef>,
    pub(crate) index: HashMap<String, usize>,
}

impl FlagSet {
    /// Create an empty flag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare one flag under several alias names.
    ///
    /// Validation happens before anything is bound: either every name is
    /// registered or none is.
    pub fn register<N, D>(
        &mut self,
        names: &[N],
        env: &str,
        defaults: &[D],
        valuation: Valuation,
        separator: &str,
        description: &str,
    ) -> Result<(), FlagError>
    where
        N: AsRef<str>,
        D: AsRef<str>,
    {
        check_env_format(env)?;

        if names.is_empty() {
            return Err(FlagError::InvalidName {
                name: String::new(),
                reason: "no flag name given",
            });
        }
        for name in names {
            check_flag_format(name.as_ref())?;
        }

        let mut requested = HashSet::new();
        for name in names {
            let name = name.as_ref();
            if self.index.contains_key(name) || !requested.insert(name) {
                return Err(FlagError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        let too_many = match valuation {
            Valuation::None => !defaults.is_empty(),
            Valuation::Mono => defaults.len() > 1,
            Valuation::Multi => false,
        };
        if too_many {
            return Err(FlagError::ValuationMismatch {
                names: join_names(names),
                valuation,
                count: defaults.len(),
            });
        }

        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let defaults = defaults.iter().map(|d| d.as_ref().to_string()).collect();
        let def = FlagDef::new(names, env, defaults, valuation, separator, description);

        let slot = self.defs.len();
        for name in &def.names {
            self.index.insert(name.clone(), slot);
        }
        trace!(
            names = ?def.names,
            env = %def.env,
            valuation = %valuation,
            "registered flag"
        );
        self.defs.push(def);
        Ok(())
    }

    /// Add several boolean flags for the same behavior, e.g. `-f` and `--force`,
    /// possibly set using an environment variable
    pub fn add_bool_flags_with_env<N: AsRef<str>>(
        &mut self,
        names: &[N],
        env: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.register(names, env, &[] as &[&str], Valuation::None, "", description)
    }

    /// Add a boolean flag, possibly set using an environment variable
    pub fn add_bool_flag_with_env(
        &mut self,
        name: &str,
        env: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.add_bool_flags_with_env(&[name], env, description)
    }

    /// Add several boolean flags for the same behavior
    pub fn add_bool_flags<N: AsRef<str>>(
        &mut self,
        names: &[N],
        description: &str,
    ) -> Result<(), FlagError> {
        self.add_bool_flags_with_env(names, "", description)
    }

    /// Add a boolean flag
    pub fn add_bool_flag(&mut self, name: &str, description: &str) -> Result<(), FlagError> {
        self.add_bool_flag_with_env(name, "", description)
    }

    /// Add several flags holding a single value that cannot be repeated.
    /// An empty `default` means no default.
    pub fn add_mono_flags_with_env<N: AsRef<str>>(
        &mut self,
        names: &[N],
        env: &str,
        default: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.register(names, env, &[default], Valuation::Mono, "", description)
    }

    pub fn add_mono_flag_with_env(
        &mut self,
        name: &str,
        env: &str,
        default: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.add_mono_flags_with_env(&[name], env, default, description)
    }

    pub fn add_mono_flags<N: AsRef<str>>(
        &mut self,
        names: &[N],
        default: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.add_mono_flags_with_env(names, "", default, description)
    }

    pub fn add_mono_flag(
        &mut self,
        name: &str,
        default: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.add_mono_flag_with_env(name, "", default, description)
    }

    /// Add several flags holding any number of values; the flag may be repeated.
    ///
    /// For example `--server 10.1.2.3 --server 10.2.3.4`, or
    /// `--server 10.1.2.3,10.2.3.4` when `","` is the separator. The default
    /// string is split on the separator too.
    pub fn add_multi_flags_with_env<N: AsRef<str>>(
        &mut self,
        names: &[N],
        env: &str,
        default: &str,
        separator: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        let defaults = split_defaults(default, Valuation::Multi, separator);
        self.register(names, env, defaults.as_slice(), Valuation::Multi, separator, description)
    }

    pub fn add_multi_flag_with_env(
        &mut self,
        name: &str,
        env: &str,
        default: &str,
        separator: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.add_multi_flags_with_env(&[name], env, default, separator, description)
    }

    pub fn add_multi_flags<N: AsRef<str>>(
        &mut self,
        names: &[N],
        default: &str,
        separator: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.add_multi_flags_with_env(names, "", default, separator, description)
    }

    pub fn add_multi_flag(
        &mut self,
        name: &str,
        default: &str,
        separator: &str,
        description: &str,
    ) -> Result<(), FlagError> {
        self.add_multi_flag_with_env(name, "", default, separator, description)
    }

    /// Number of distinct flags (aliases of one flag count once)
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Whether `name` is bound to a flag
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The definition bound to `name`
    pub fn definition(&self, name: &str) -> Option<&FlagDef> {
        self.index.get(name).map(|&slot| &self.defs[slot])
    }

    /// Every distinct definition, in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &FlagDef> {
        self.defs.iter()
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<&FlagDef, FlagError> {
        self.definition(name)
            .ok_or_else(|| FlagError::not_found(name))
    }
}

fn join_names<N: AsRef<str>>(names: &[N]) -> String {
    names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}
