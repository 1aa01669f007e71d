use crate::env::{EnvSource, ProcessEnv};
use crate::error::{format_flag_errors, FlagError};
use crate::field::FlagField;
use crate::flag::split_defaults;
use crate::registry::FlagSet;
use crate::resolve::process_args;
use crate::value::FlagValue;
use crate::valuation::Valuation;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Declaration of one bound field: which flags feed it and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    field: String,
    names: Vec<String>,
    env: String,
    separator: String,
    default: String,
    valuation: Valuation,
    description: String,
}

impl FieldSpec {
    /// A field fed by `--field-id` until other names are given
    pub fn new(field: impl Into<String>, valuation: Valuation) -> Self {
        Self {
            field: field.into(),
            names: Vec::new(),
            env: String::new(),
            separator: String::new(),
            default: String::new(),
            valuation,
            description: String::new(),
        }
    }

    /// A field whose valuation follows from its target type
    pub fn of<T: FlagValue>(field: impl Into<String>) -> Self {
        Self::new(field, T::VALUATION)
    }

    pub fn boolean(field: impl Into<String>) -> Self {
        Self::new(field, Valuation::None)
    }

    pub fn single(field: impl Into<String>) -> Self {
        Self::new(field, Valuation::Mono)
    }

    pub fn list(field: impl Into<String>, separator: impl Into<String>) -> Self {
        Self::new(field, Valuation::Multi).separator(separator)
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.env = env.into();
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Default as written; multi-valuated fields split it on the separator
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn valuation(&self) -> Valuation {
        self.valuation
    }

    /// Flag names this field is registered under
    pub fn flag_names(&self) -> Vec<String> {
        if self.names.is_empty() {
            vec![format!("--{}", self.field.replace('_', "-"))]
        } else {
            self.names.clone()
        }
    }
}

/// An ordered set of field declarations that resolves into [`Bindings`]
///
/// # Example
/// ```rust
/// use flag_loadr::{env_from_pairs, FieldSpec, Schema};
///
/// let schema = Schema::new()
///     .field(FieldSpec::of::<u16>("port").names(["-p", "--port"]).env("PORT").default_value("8080"))
///     .field(FieldSpec::of::<Vec<String>>("servers").separator(","));
///
/// let env = env_from_pairs([("PORT", "9000")]);
/// let bindings = schema.bind_from(["--servers", "a,b"], &env).unwrap();
///
/// assert_eq!(bindings.get::<u16>("port").unwrap(), 9000);
/// assert_eq!(bindings.get::<Vec<String>>("servers").unwrap(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style
    pub fn field(mut self, decl: FieldSpec) -> Self {
        self.fields.push(decl);
        self
    }

    pub fn push(&mut self, decl: FieldSpec) {
        self.fields.push(decl);
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Register every field into a fresh [`FlagSet`]
    pub fn flag_set(&self) -> Result<FlagSet, FlagError> {
        let mut flags = FlagSet::new();
        let mut seen = HashSet::new();

        for decl in &self.fields {
            if !seen.insert(decl.field.as_str()) {
                return Err(FlagError::DuplicateField {
                    field: decl.field.clone(),
                });
            }
            let names = decl.flag_names();
            let defaults = split_defaults(&decl.default, decl.valuation, &decl.separator);
            flags.register(
                names.as_slice(),
                &decl.env,
                defaults.as_slice(),
                decl.valuation,
                &decl.separator,
                &decl.description,
            )?;
        }

        Ok(flags)
    }

    /// Resolve the process arguments and environment against this schema
    pub fn bind(&self) -> Result<Bindings, FlagError> {
        let args = process_args()?;
        self.bind_from(args, &ProcessEnv)
    }

    pub fn bind_from<I, S, E>(&self, args: I, env: &E) -> Result<Bindings, FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: EnvSource + ?Sized,
    {
        let mut flags = self.flag_set()?;
        flags.parse_from(args, env)?;

        let fields = self
            .fields
            .iter()
            .map(|decl| (decl.field.clone(), decl.flag_names().remove(0)))
            .collect();

        Ok(Bindings { flags, fields })
    }

    pub fn usage(&self, program: &str) -> Result<String, FlagError> {
        Ok(self.flag_set()?.usage(program))
    }

    /// Write flag documentation for this schema to a markdown file
    pub fn write_docs(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let flags = self
            .flag_set()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        flags.write_docs(path)
    }
}

/// Resolved flags, addressed by schema field identifier
#[derive(Debug, Clone)]
pub struct Bindings {
    flags: FlagSet,
    fields: HashMap<String, String>,
}

impl Bindings {
    /// Value of `field` converted to `T`.
    ///
    /// `T` must agree with the field's valuation: `bool` for boolean fields,
    /// `T` or `Option<T>` for mono-valuated fields, `Vec<T>` for multi-valuated.
    pub fn get<T: FlagValue>(&self, field: &str) -> Result<T, FlagError> {
        let name = self.primary_name(field)?;
        let def = self.flags.lookup(name)?;
        if def.valuation() != T::VALUATION {
            return Err(FlagError::WrongValuation {
                name: name.to_string(),
                valuation: def.valuation(),
                expected: expected_for(T::VALUATION),
            });
        }
        T::from_values(name, def.values())
    }

    /// Value of `field` wrapped with its flag metadata
    pub fn field<T: FlagValue>(&self, field: &str) -> Result<FlagField<T>, FlagError> {
        let value = self.get::<T>(field)?;
        let def = self.flags.lookup(self.primary_name(field)?)?;
        Ok(FlagField::new(
            def.names().to_vec(),
            def.env().map(str::to_string),
            def.description(),
            value,
        ))
    }

    /// The underlying flag set, for raw or typed accessor queries
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    fn primary_name(&self, field: &str) -> Result<&str, FlagError> {
        self.fields
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| FlagError::not_found(field))
    }
}

fn expected_for(valuation: Valuation) -> &'static str {
    match valuation {
        Valuation::None => "a boolean flag",
        Valuation::Mono => "a mono-valuated flag",
        Valuation::Multi => "a multi-valuated flag",
    }
}

/// Extracts fields from [`Bindings`] while collecting every error
///
/// # Example
/// ```rust
/// use flag_loadr::{Binder, FieldSpec, Schema};
/// use std::collections::HashMap;
///
/// let schema = Schema::new().field(FieldSpec::of::<u16>("port").default_value("8080"));
/// let bindings = schema.bind_from(Vec::<String>::new(), &HashMap::<String, String>::new()).unwrap();
///
/// let mut binder = Binder::new(&bindings);
/// let port = binder.take::<u16>("port");
///
/// assert!(binder.validate().is_ok());
/// assert_eq!(port.map(|p| *p), Some(8080));
/// ```
pub struct Binder<'a> {
    bindings: &'a Bindings,
    errors: Vec<FlagError>,
}

impl<'a> Binder<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        Self {
            bindings,
            errors: Vec::new(),
        }
    }

    /// Extract a field, collecting the error if it fails
    pub fn take<T: FlagValue>(&mut self, field: &str) -> Option<FlagField<T>> {
        match self.bindings.field::<T>(field) {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    /// Check that every field extracted so far converted successfully
    ///
    /// Unlike `finish()`, this doesn't consume the binder.
    pub fn validate(&self) -> Result<(), Vec<FlagError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.clone())
        }
    }

    /// Finish and return any errors that were collected
    pub fn finish(self) -> Result<(), Vec<FlagError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Finish and panic if there were any errors
    pub fn finish_or_panic(self) {
        if !self.errors.is_empty() {
            panic!("{}", format_flag_errors(&self.errors));
        }
    }

    pub fn into_errors(self) -> Vec<FlagError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::env_from_pairs;
    use std::path::PathBuf;

    fn server_schema() -> Schema {
        Schema::new()
            .field(
                FieldSpec::of::<bool>("verbose")
                    .names(["-v", "--verbose"])
                    .env("APP_VERBOSE")
                    .description("print more"),
            )
            .field(
                FieldSpec::of::<u16>("port")
                    .names(["-p", "--port"])
                    .env("APP_PORT")
                    .default_value("8080")
                    .description("listening port"),
            )
            .field(FieldSpec::of::<Option<PathBuf>>("config_file").env("APP_CONFIG"))
            .field(
                FieldSpec::of::<Vec<String>>("servers")
                    .names(["-s", "--server"])
                    .env("APP_SERVERS")
                    .separator(",")
                    .default_value("10.0.0.1,10.0.0.2"),
            )
    }

    #[test]
    fn test_field_spec_defaults_to_kebab_name() {
        let decl = FieldSpec::single("config_file");
        assert_eq!(decl.flag_names(), ["--config-file"]);

        let decl = FieldSpec::single("config_file").names(["-c"]);
        assert_eq!(decl.flag_names(), ["-c"]);
    }

    #[test]
    fn test_field_spec_constructors() {
        assert_eq!(FieldSpec::boolean("b").valuation(), Valuation::None);
        assert_eq!(FieldSpec::single("s").valuation(), Valuation::Mono);
        let list = FieldSpec::list("l", ";");
        assert_eq!(list.valuation(), Valuation::Multi);
        assert_eq!(list.field(), "l");
        assert_eq!(FieldSpec::of::<Vec<u8>>("x"), FieldSpec::new("x", Valuation::Multi));
    }

    #[test]
    fn test_bind_defaults() {
        let bindings = server_schema()
            .bind_from(Vec::<String>::new(), &HashMap::<String, String>::new())
            .unwrap();

        assert!(!bindings.get::<bool>("verbose").unwrap());
        assert_eq!(bindings.get::<u16>("port").unwrap(), 8080);
        assert_eq!(bindings.get::<Option<PathBuf>>("config_file").unwrap(), None);
        assert_eq!(
            bindings.get::<Vec<String>>("servers").unwrap(),
            ["10.0.0.1", "10.0.0.2"]
        );
    }

    #[test]
    fn test_bind_precedence() {
        let env = env_from_pairs([
            ("APP_PORT", "9000"),
            ("APP_CONFIG", "/etc/app.toml"),
            ("APP_SERVERS", "10.1.1.1"),
            ("APP_VERBOSE", "1"),
        ]);

        let bindings = server_schema()
            .bind_from(["--port", "7000", "-s", "a", "-s", "b,c"], &env)
            .unwrap();

        assert!(bindings.get::<bool>("verbose").unwrap());
        assert_eq!(bindings.get::<u16>("port").unwrap(), 7000);
        assert_eq!(
            bindings.get::<Option<PathBuf>>("config_file").unwrap(),
            Some(PathBuf::from("/etc/app.toml"))
        );
        assert_eq!(bindings.get::<Vec<String>>("servers").unwrap(), ["a", "b", "c"]);
        assert_eq!(bindings.flags().get_uint16("-p").unwrap(), [7000]);
    }

    #[test]
    fn test_get_with_wrong_type_valuation() {
        let bindings = server_schema()
            .bind_from(Vec::<String>::new(), &HashMap::<String, String>::new())
            .unwrap();

        let err = bindings.get::<Vec<u16>>("port").unwrap_err();
        assert_eq!(
            err,
            FlagError::WrongValuation {
                name: "-p".to_string(),
                valuation: Valuation::Mono,
                expected: "a multi-valuated flag",
            }
        );
        assert!(matches!(
            bindings.get::<String>("verbose"),
            Err(FlagError::WrongValuation { .. })
        ));
    }

    #[test]
    fn test_get_unknown_field() {
        let bindings = server_schema()
            .bind_from(Vec::<String>::new(), &HashMap::<String, String>::new())
            .unwrap();

        assert_eq!(
            bindings.get::<bool>("nope").unwrap_err(),
            FlagError::NotFound {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_field_carries_metadata() {
        let bindings = server_schema().bind_from(["-p", "1234"], &HashMap::<String, String>::new()).unwrap();

        let port = bindings.field::<u16>("port").unwrap();
        assert_eq!(*port, 1234);
        assert_eq!(port.names, ["-p", "--port"]);
        assert_eq!(port.env.as_deref(), Some("APP_PORT"));
        assert_eq!(port.description, "listening port");
    }

    #[test]
    fn test_duplicate_field() {
        let schema = Schema::new()
            .field(FieldSpec::single("name").names(["-a"]))
            .field(FieldSpec::single("name").names(["-b"]));

        assert_eq!(
            schema.flag_set().unwrap_err(),
            FlagError::DuplicateField {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn test_registry_errors_propagate() {
        let schema = Schema::new().field(FieldSpec::boolean("debug").default_value("true"));
        assert!(matches!(
            schema.flag_set(),
            Err(FlagError::ValuationMismatch { .. })
        ));

        let schema = Schema::new()
            .field(FieldSpec::single("a").names(["-x"]))
            .field(FieldSpec::single("b").names(["-x"]));
        assert!(matches!(
            schema.bind_from(Vec::<String>::new(), &HashMap::<String, String>::new()),
            Err(FlagError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_resolution_errors_propagate() {
        let err = server_schema()
            .bind_from(["-p", "1", "--port", "2"], &HashMap::<String, String>::new())
            .unwrap_err();

        assert_eq!(err, FlagError::AlreadySet { name: "--port".to_string() });
    }

    #[test]
    fn test_schema_usage() {
        colored::control::set_override(false);

        let usage = server_schema().usage("server").unwrap();
        assert!(usage.contains("  -p, or --port, or set $APP_PORT\n\t\tlistening port"));
        assert!(usage.contains("  --config-file, or set $APP_CONFIG"));
    }

    #[test]
    fn test_binder_collects_all_errors() {
        let schema = Schema::new()
            .field(FieldSpec::of::<u16>("port"))
            .field(FieldSpec::of::<u8>("level").default_value("300"))
            .field(FieldSpec::of::<String>("name").default_value("svc"));
        let bindings = schema.bind_from(Vec::<String>::new(), &HashMap::<String, String>::new()).unwrap();

        let mut binder = Binder::new(&bindings);
        let port = binder.take::<u16>("port");
        let level = binder.take::<u8>("level");
        let name = binder.take::<String>("name");

        assert!(port.is_none());
        assert!(level.is_none());
        assert_eq!(name.map(FlagField::into_inner).as_deref(), Some("svc"));

        let errors = binder.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], FlagError::Required { .. }));
        assert!(matches!(errors[1], FlagError::ParseError { .. }));

        assert_eq!(binder.into_errors().len(), 2);
    }

    #[test]
    fn test_binder_finish_without_errors() {
        let bindings = server_schema()
            .bind_from(Vec::<String>::new(), &HashMap::<String, String>::new())
            .unwrap();

        let mut binder = Binder::new(&bindings);
        assert!(binder.take::<u16>("port").is_some());
        assert!(binder.finish().is_ok());
    }

    #[test]
    fn test_finish_or_panic_succeeds() {
        let bindings = Schema::new()
            .bind_from(Vec::<String>::new(), &HashMap::<String, String>::new())
            .unwrap();
        Binder::new(&bindings).finish_or_panic();
    }

    #[test]
    #[should_panic(expected = "Flag resolution failed")]
    fn test_finish_or_panic_panics() {
        let bindings = Schema::new()
            .field(FieldSpec::of::<u16>("port"))
            .bind_from(Vec::<String>::new(), &HashMap::<String, String>::new())
            .unwrap();

        let mut binder = Binder::new(&bindings);
        let _ = binder.take::<u16>("port");
        binder.finish_or_panic();
    }
}
