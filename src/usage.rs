use crate::flag::FlagDef;
use crate::registry::FlagSet;
use colored::Colorize;
use std::{fmt::Write as _, fs, path::Path};

impl FlagSet {
    /// Usage text listing every declared flag in registration order
    pub fn usage(&self, program: &str) -> String {
        let mut out = format!("Usage: {} [OPTIONS]\nOptions:\n", program);

        for def in self.definitions() {
            let names = def
                .names()
                .iter()
                .map(|n| n.bold().to_string())
                .collect::<Vec<_>>()
                .join(def.valuation().connector());
            let _ = write!(out, "  {}", names);

            if let Some(env) = def.env() {
                let _ = write!(out, ", or set ${}", env.cyan());
            }
            if let Some(separator) = def.separator() {
                let _ = write!(
                    out,
                    " (set multiple values at once using separator '{}')",
                    separator
                );
            }
            let description = def.description().replace('\n', "\n\t\t");
            let _ = write!(out, "\n\t\t{}\n\n", description);
        }

        out
    }

    /// Write flag documentation to a markdown file
    ///
    /// # Example
    /// ```no_run
    /// use flag_loadr::FlagSet;
    ///
    /// let mut flags = FlagSet::new();
    /// flags.add_mono_flag_with_env("-p", "PORT", "8080", "Server port").unwrap();
    /// flags.write_docs("FLAGS.md").unwrap();
    /// ```
    pub fn write_docs(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path, self.docs_markdown())
    }

    pub(crate) fn docs_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("## Flags Summary\n\n");
        md.push_str("| Flags | Environment | Kind | Default | Description |\n");
        md.push_str("|-------|-------------|------|---------|-------------|\n");
        for def in self.definitions() {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} |",
                def.names()
                    .iter()
                    .map(|n| format!("`{}`", n))
                    .collect::<Vec<_>>()
                    .join(", "),
                def.env().map(|e| format!("`{}`", e)).unwrap_or_else(|| "-".to_string()),
                kind_label(def),
                default_label(def),
                def.description().replace('\n', " ").replace('|', "\\|"),
            );
        }

        md
    }
}

fn kind_label(def: &FlagDef) -> String {
    match def.separator() {
        Some(separator) => format!("{} (separator `{}`)", def.valuation(), separator),
        None => def.valuation().to_string(),
    }
}

fn default_label(def: &FlagDef) -> String {
    if def.defaults().is_empty() {
        "-".to_string()
    } else {
        def.defaults().join(def.separator().unwrap_or(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::Valuation;

    fn sample() -> FlagSet {
        let mut flags = FlagSet::new();
        flags
            .add_bool_flags(&["-b", "--boolean"], "a boolean flag")
            .unwrap();
        flags
            .add_multi_flags_with_env(
                &["-l", "--long"],
                "LONG_FLAG_ENV",
                "1,2",
                ",",
                "-l and --long set the long things",
            )
            .unwrap();
        flags
            .add_mono_flag("-w", "value01", "first line\nsecond line")
            .unwrap();
        flags
    }

    #[test]
    fn test_usage_layout() {
        colored::control::set_override(false);

        let usage = sample().usage("app");

        assert!(usage.starts_with("Usage: app [OPTIONS]\nOptions:\n"));
        assert!(usage.contains("  -b, or --boolean\n\t\ta boolean flag\n\n"));
        assert!(usage.contains(
            "  -l, and/or --long, or set $LONG_FLAG_ENV (set multiple values at once using separator ',')\n"
        ));
        assert!(usage.contains("\t\tfirst line\n\t\tsecond line\n\n"));
    }

    #[test]
    fn test_usage_hides_separator_of_single_value_flags() {
        colored::control::set_override(false);

        let mut flags = FlagSet::new();
        flags
            .register(&["-p", "--port"], "PORT", &["8080"], Valuation::Mono, ",", "listening port")
            .unwrap();

        let usage = flags.usage("app");
        assert!(usage.contains("  -p, or --port, or set $PORT\n\t\tlistening port\n\n"));
        assert!(!usage.contains("separator"));
        assert!(flags.docs_markdown().contains("| mono | 8080 |"));
    }

    #[test]
    fn test_usage_follows_registration_order() {
        colored::control::set_override(false);

        let usage = sample().usage("app");
        let b = usage.find("-b,").unwrap();
        let l = usage.find("-l,").unwrap();
        let w = usage.find("  -w").unwrap();
        assert!(b < l && l < w);
    }

    #[test]
    fn test_docs_markdown_table() {
        let md = sample().docs_markdown();

        assert!(md.contains("| Flags | Environment | Kind | Default | Description |"));
        assert!(md.contains("| `-b`, `--boolean` | - | none | - | a boolean flag |"));
        assert!(md.contains(
            "| `-l`, `--long` | `LONG_FLAG_ENV` | multi (separator `,`) | 1,2 | -l and --long set the long things |"
        ));
        assert!(md.contains("| `-w` | - | mono | value01 | first line second line |"));
    }

    #[test]
    fn test_write_docs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FLAGS.md");

        sample().write_docs(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("## Flags Summary"));
        assert!(written.contains("LONG_FLAG_ENV"));
    }
}
