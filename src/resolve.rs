use crate::env::{EnvSource, ProcessEnv};
use crate::error::FlagError;
use crate::registry::FlagSet;
use crate::valuation::Valuation;
use std::ffi::OsString;
use tracing::{debug, trace};

/// The process arguments after the program name
pub(crate) fn process_args() -> Result<Vec<String>, FlagError> {
    utf8_args(std::env::args_os().skip(1))
}

fn utf8_args<I>(args: I) -> Result<Vec<String>, FlagError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| FlagError::InvalidName {
                name: raw.to_string_lossy().into_owned(),
                reason: "argument is not valid UTF-8",
            })
        })
        .collect()
}

impl FlagSet {
    /// Resolve flags from the process arguments and environment, then defaults
    pub fn parse(&mut self) -> Result<(), FlagError> {
        let args = process_args()?;
        self.parse_from(args, &ProcessEnv)
    }

    /// Resolve flags from the given arguments and environment, then defaults.
    ///
    /// Stages run in precedence order (command line, environment, defaults) and
    /// the first error stops resolution.
    pub fn parse_from<I, S, E>(&mut self, args: I, env: &E) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: EnvSource + ?Sized,
    {
        self.parse_args(args)?;
        self.parse_env(env)?;
        self.parse_defaults()
    }

    /// Command-line stage: consume `args` left to right as flag names and values
    pub fn parse_args<I, S>(&mut self, args: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let mut i = 0;

        while i < args.len() {
            let name = args[i].as_ref();
            let slot = *self.index.get(name).ok_or_else(|| FlagError::UnknownFlag {
                name: name.to_string(),
            })?;
            let def = &mut self.defs[slot];

            if def.valuation == Valuation::None {
                def.mark_present();
                trace!(flag = name, "set from command line");
                i += 1;
                continue;
            }

            let value = args
                .get(i + 1)
                .map(|v| v.as_ref())
                .ok_or_else(|| FlagError::MissingValue {
                    name: name.to_string(),
                })?;

            match def.valuation {
                Valuation::Mono => {
                    if def.is_set {
                        return Err(FlagError::AlreadySet {
                            name: name.to_string(),
                        });
                    }
                    def.push_value(value);
                }
                _ => {
                    if !def.separator.is_empty() && value.contains(def.separator.as_str()) {
                        let separator = def.separator.clone();
                        def.push_split(value, &separator);
                    } else {
                        def.push_value(value);
                    }
                }
            }
            trace!(flag = name, value, "set from command line");
            i += 2;
        }

        Ok(())
    }

    /// Environment stage: fill flags still unset from their environment variable
    pub fn parse_env<E>(&mut self, env: &E) -> Result<(), FlagError>
    where
        E: EnvSource + ?Sized,
    {
        for def in self.defs.iter_mut() {
            if def.is_set || def.env.is_empty() {
                continue;
            }
            let raw = match env.lookup(&def.env) {
                Some(raw) if !raw.is_empty() => raw,
                _ => continue,
            };

            match def.valuation {
                Valuation::None => def.mark_present(),
                Valuation::Mono => def.push_value(&raw),
                Valuation::Multi => {
                    let separator = def.separator.clone();
                    if separator.is_empty() || def.push_split(&raw, &separator) == 0 {
                        def.push_value(&raw);
                    }
                }
            }
            debug!(flag = def.primary_name(), env = %def.env, "set from environment");
        }

        Ok(())
    }

    /// Defaults stage: fill flags still unset from their declared defaults
    pub fn parse_defaults(&mut self) -> Result<(), FlagError> {
        for def in self.defs.iter_mut() {
            if def.is_set {
                continue;
            }
            let defaults = def.defaults.clone();
            for value in defaults.iter().filter(|v| !v.is_empty()) {
                def.push_value(value);
            }
            if def.is_set {
                trace!(flag = def.primary_name(), "set from defaults");
            }
        }

        Ok(())
    }
}
