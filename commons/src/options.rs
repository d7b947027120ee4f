//! Option schema and parsed command lines.
//!
//! Converters register the options they understand into an `OptionSchema`,
//! which is rendered into a `clap::Command` for tokenizing `argv`. The
//! resulting matches are flattened into a `ParsedCommandLine`, the read-only
//! input of every converter.

use crate::errors::option_label;
use clap::{value_parser, Arg, ArgMatches, Command};
use failure::{ensure, Fallible};
use std::collections::BTreeMap;
use std::ffi::OsString;

/// Id of the positional argument collecting extra arguments (task names).
const EXTRA_ARGUMENTS: &str = "extra-arguments";

/// Names taken by the generated help and version flags.
const RESERVED_NAMES: [&str; 4] = ["h", "help", "V", "version"];

/// Number of values an option takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Plain flag.
    None,
    /// Exactly one value.
    Single,
    /// One value per occurrence, option may repeat.
    Multiple,
}

/// An option known to a converter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognizedOption {
    id: &'static str,
    long: Option<&'static str>,
    arity: Arity,
    description: String,
    subcommand: Option<&'static str>,
}

impl RecognizedOption {
    /// New flag option; a one-character `id` is the short form, anything
    /// longer is a long-only option.
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            long: None,
            arity: Arity::None,
            description: String::new(),
            subcommand: None,
        }
    }

    pub fn with_long(mut self, long: &'static str) -> Self {
        self.long = Some(long);
        self
    }

    pub fn with_single_value(mut self) -> Self {
        self.arity = Arity::Single;
        self
    }

    pub fn with_values(mut self) -> Self {
        self.arity = Arity::Multiple;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark this option as a shortcut for running the pseudo-task `task`.
    pub fn maps_to_subcommand(mut self, task: &'static str) -> Self {
        self.subcommand = Some(task);
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn long_name(&self) -> Option<&'static str> {
        self.long
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn subcommand(&self) -> Option<&'static str> {
        self.subcommand
    }

    /// Short form, for one-character ids.
    pub fn short(&self) -> Option<char> {
        let mut chars = self.id.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// Long names this option answers to.
    fn long_names(&self) -> impl Iterator<Item = &'static str> {
        let long_id = if self.short().is_none() {
            Some(self.id)
        } else {
            None
        };
        long_id.into_iter().chain(self.long)
    }

    fn to_arg(&self) -> Arg<'_> {
        let mut arg = Arg::new(self.id).help(self.description.as_str());
        arg = match self.short() {
            Some(c) => arg.short(c),
            None => arg.long(self.id),
        };
        if let Some(long) = self.long {
            arg = arg.long(long);
        }
        match self.arity {
            Arity::None => arg.multiple_occurrences(true),
            Arity::Single => arg.takes_value(true).value_parser(value_parser!(String)),
            Arity::Multiple => arg
                .takes_value(true)
                .multiple_occurrences(true)
                .value_parser(value_parser!(String)),
        }
    }
}

/// All options recognized by a set of converters.
#[derive(Clone, Debug, Default)]
pub struct OptionSchema {
    options: BTreeMap<&'static str, RecognizedOption>,
    order: Vec<&'static str>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an option; ids and long names must be unique and not reserved.
    pub fn register(&mut self, option: RecognizedOption) -> Fallible<()> {
        ensure!(!option.id.is_empty(), "empty option id");
        for name in std::iter::once(option.id).chain(option.long_names()) {
            ensure!(
                !RESERVED_NAMES.contains(&name),
                "option name '{}' is reserved",
                name
            );
        }
        ensure!(
            !self.options.contains_key(option.id),
            "option '{}' registered twice",
            option_label(option.id)
        );
        for long in option.long_names() {
            let taken = self
                .options
                .values()
                .flat_map(RecognizedOption::long_names)
                .any(|existing| existing == long);
            ensure!(!taken, "long option '--{}' registered twice", long);
        }

        log::trace!("registered option {}", option_label(option.id));
        self.order.push(option.id);
        self.options.insert(option.id, option);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&RecognizedOption> {
        self.options.get(id)
    }

    /// Options in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RecognizedOption> {
        self.order.iter().filter_map(move |id| self.options.get(id))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Render this schema into a command-line parser.
    ///
    /// Options may be freely mixed with positional arguments, which are
    /// collected in order as extra arguments.
    pub fn command(&self, name: &str) -> Command<'_> {
        let mut command = Command::new(name);
        for option in self.iter() {
            command = command.arg(option.to_arg());
        }
        command.arg(
            Arg::new(EXTRA_ARGUMENTS)
                .value_name("TASK")
                .help("Tasks to execute.")
                .takes_value(true)
                .multiple_values(true)
                .value_parser(value_parser!(String)),
        )
    }

    /// Tokenize `args` (including the program name) against this schema.
    pub fn parse<I, T>(&self, name: &str, args: I) -> Fallible<ParsedCommandLine>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command(name).try_get_matches_from(args)?;
        Ok(ParsedCommandLine::from_matches(self, &matches))
    }
}

/// Options and extra arguments found on a command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedCommandLine {
    options: BTreeMap<String, Vec<String>>,
    extra_arguments: Vec<String>,
}

impl ParsedCommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract all options of `schema` from clap matches.
    ///
    /// Options mapping to a subcommand contribute their pseudo-task to the
    /// extra arguments, at the position they were given.
    pub fn from_matches(schema: &OptionSchema, matches: &ArgMatches) -> Self {
        let mut parsed = Self::new();
        let mut extra: Vec<(usize, String)> = vec![];

        for option in schema.iter() {
            if !matches.contains_id(option.id) {
                continue;
            }
            let values = match option.arity {
                Arity::None => vec![],
                Arity::Single | Arity::Multiple => matches
                    .get_many::<String>(option.id)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
            };
            parsed.options.insert(option.id.to_string(), values);

            if let Some(task) = option.subcommand {
                let index = matches.index_of(option.id).unwrap_or_default();
                extra.push((index, task.to_string()));
            }
        }

        if let (Some(values), Some(indices)) = (
            matches.get_many::<String>(EXTRA_ARGUMENTS),
            matches.indices_of(EXTRA_ARGUMENTS),
        ) {
            extra.extend(indices.zip(values.cloned()));
        }
        extra.sort_by_key(|(index, _)| *index);
        parsed.extra_arguments = extra.into_iter().map(|(_, arg)| arg).collect();

        parsed
    }

    /// Mark option `id` as present.
    pub fn with_option(mut self, id: &str) -> Self {
        self.options.entry(id.to_string()).or_default();
        self
    }

    /// Mark option `id` as present, appending `values` to its values.
    pub fn with_values<I, S>(mut self, id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options
            .entry(id.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_extra_arguments<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_arguments.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn has_option(&self, id: &str) -> bool {
        self.options.contains_key(id)
    }

    /// All values given for `id`, in order; empty if absent.
    pub fn values(&self, id: &str) -> &[String] {
        self.options.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Last value given for `id`.
    pub fn value(&self, id: &str) -> Option<&str> {
        self.values(id).last().map(String::as_str)
    }

    pub fn extra_arguments(&self) -> &[String] {
        &self.extra_arguments
    }

    /// Number of distinct options present.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> OptionSchema {
        let mut schema = OptionSchema::new();
        schema
            .register(RecognizedOption::new("s").with_long("stacktrace"))
            .unwrap();
        schema
            .register(
                RecognizedOption::new("D")
                    .with_long("system-prop")
                    .with_values(),
            )
            .unwrap();
        schema
            .register(
                RecognizedOption::new("b")
                    .with_long("build-file")
                    .with_single_value(),
            )
            .unwrap();
        schema
            .register(
                RecognizedOption::new("t")
                    .with_long("tasks")
                    .maps_to_subcommand("tasks"),
            )
            .unwrap();
        schema.register(RecognizedOption::new("profile")).unwrap();
        schema
    }

    #[test]
    fn test_register_duplicates() {
        let mut schema = sample_schema();
        {
            let r = schema.register(RecognizedOption::new("s"));
            assert!(r.is_err());
        }
        {
            let r = schema.register(RecognizedOption::new("x").with_long("stacktrace"));
            assert!(r.is_err());
        }
        {
            let r = schema.register(RecognizedOption::new("x").with_long("profile"));
            assert!(r.is_err());
        }
        {
            let r = schema.register(RecognizedOption::new(""));
            assert!(r.is_err());
        }
        assert_eq!(schema.len(), 5);
    }

    #[test]
    fn test_register_reserved() {
        let mut schema = sample_schema();
        {
            let e = schema.register(RecognizedOption::new("h")).unwrap_err();
            assert_eq!(e.to_string(), "option name 'h' is reserved");
        }
        let reserved = vec![
            RecognizedOption::new("V"),
            RecognizedOption::new("help"),
            RecognizedOption::new("x").with_long("version"),
        ];
        for option in reserved {
            let r = schema.register(option);
            assert!(r.is_err());
        }
        assert_eq!(schema.len(), 5);

        // Lowercase `-v` is free.
        schema.register(RecognizedOption::new("v")).unwrap();
        schema.command("test").debug_assert();
    }

    #[test]
    fn test_registration_order() {
        let schema = sample_schema();
        let ids: Vec<_> = schema.iter().map(RecognizedOption::id).collect();
        assert_eq!(ids, vec!["s", "D", "b", "t", "profile"]);
        assert_eq!(schema.get("profile").unwrap().short(), None);
        assert_eq!(schema.get("D").unwrap().short(), Some('D'));
        assert_eq!(schema.get("D").unwrap().arity(), Arity::Multiple);
    }

    #[test]
    fn test_parse_values() {
        let schema = sample_schema();
        let args = vec![
            "test",
            "-Dfoo=bar",
            "--system-prop",
            "a=b=c",
            "-b",
            "x.gradle",
        ];
        let parsed = schema.parse("test", args).unwrap();

        assert_eq!(parsed.values("D"), &["foo=bar", "a=b=c"]);
        assert_eq!(parsed.value("b"), Some("x.gradle"));
        assert!(!parsed.has_option("s"));
        assert!(parsed.extra_arguments().is_empty());
    }

    #[test]
    fn test_parse_flags_and_extra_arguments() {
        let schema = sample_schema();
        let parsed = schema
            .parse("test", vec!["test", "--profile", "-s", "build", "test"])
            .unwrap();

        assert!(parsed.has_option("profile"));
        assert!(parsed.has_option("s"));
        assert!(parsed.values("s").is_empty());
        assert_eq!(parsed.extra_arguments(), &["build", "test"]);
        assert_eq!(parsed.option_count(), 2);
    }

    #[test]
    fn test_parse_subcommand_alias() {
        let schema = sample_schema();
        let parsed = schema.parse("test", vec!["test", "-t", "build"]).unwrap();

        assert!(parsed.has_option("t"));
        assert_eq!(parsed.extra_arguments(), &["tasks", "build"]);
    }

    #[test]
    fn test_parse_unknown_option() {
        let schema = sample_schema();
        let r = schema.parse("test", vec!["test", "-Z"]);
        assert!(r.is_err());
    }

    #[test]
    fn test_builder() {
        let parsed = ParsedCommandLine::new()
            .with_option("s")
            .with_values("D", vec!["a=1"])
            .with_values("D", vec!["b=2"])
            .with_extra_arguments(vec!["build"]);

        assert!(parsed.has_option("s"));
        assert_eq!(parsed.values("D"), &["a=1", "b=2"]);
        assert_eq!(parsed.value("D"), Some("b=2"));
        assert_eq!(parsed.values("missing"), &[] as &[String]);
        assert_eq!(parsed.extra_arguments(), &["build"]);
    }
}
