//! Conversion of parsed command lines into build configurations.

use crate::configuration::{BuildConfiguration, CacheUsage, DependencyRebuild, ShowStacktrace};
use crate::errors::{option_label, ConversionError};
use crate::logging::{LoggingConfiguration, LoggingConverter};
use crate::options::{OptionSchema, ParsedCommandLine, RecognizedOption};
use crate::stacktrace;
use failure::Fallible;
use std::collections::BTreeMap;
use std::path::PathBuf;

const NO_SEARCH_UPWARDS: &str = "u";
const PROJECT_DIR: &str = "p";
const PROJECT_DEPENDENCY_TASK_NAMES: &str = "A";
const NO_PROJECT_DEPENDENCY_REBUILD: &str = "a";
const BUILD_FILE: &str = "b";
const INIT_SCRIPT: &str = "I";
const SETTINGS_FILE: &str = "c";
const TASKS: &str = "t";
const PROPERTIES: &str = "r";
const DEPENDENCIES: &str = "n";
const FULL_STACKTRACE: &str = "S";
const STACKTRACE: &str = "s";
const SYSTEM_PROP: &str = "D";
const PROJECT_PROP: &str = "P";
const USER_HOME: &str = "g";
const EMBEDDED_SCRIPT: &str = "e";
const CACHE: &str = "C";
const DRY_RUN: &str = "m";
const NO_OPT: &str = "no-opt";
const EXCLUDE_TASK: &str = "x";
const PROFILE: &str = "profile";

/// Deprecated flags standing for a pseudo-task, with the task they run.
const SUBCOMMAND_ALIASES: [(&str, &str, &str); 3] = [
    (
        TASKS,
        "tasks",
        "[deprecated] Show list of all available tasks.",
    ),
    (
        PROPERTIES,
        "properties",
        "[deprecated] Show list of all available project properties.",
    ),
    (
        DEPENDENCIES,
        "dependencies",
        "[deprecated] Show list of all project dependencies.",
    ),
];

/// Default name of the settings file searched for in parent directories.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.gradle";

/// Converter from parsed options into a value of type `T`.
pub trait CommandLineConverter<T> {
    /// Register all options this converter understands.
    fn configure(&self, schema: &mut OptionSchema) -> Fallible<()>;

    /// Apply `options` on top of `target`.
    ///
    /// Options that are absent leave the corresponding part of `target`
    /// untouched. On error `target` is consumed and nothing is produced.
    fn convert_with(&self, options: &ParsedCommandLine, target: T) -> Result<T, ConversionError>;

    /// Convert `options` starting from a default value.
    fn convert(&self, options: &ParsedCommandLine) -> Result<T, ConversionError>
    where
        T: Default,
    {
        self.convert_with(options, T::default())
    }
}

/// Converter for build options, see `configure` for the recognized flags.
#[derive(Clone, Debug, Default)]
pub struct BuildOptionsConverter<L = LoggingConverter> {
    logging: L,
}

impl BuildOptionsConverter {
    pub fn new() -> Self {
        Self::with_logging(LoggingConverter)
    }
}

impl<L> BuildOptionsConverter<L>
where
    L: CommandLineConverter<LoggingConfiguration>,
{
    /// Build a converter delegating logging options to `logging`.
    pub fn with_logging(logging: L) -> Self {
        Self { logging }
    }

    /// Reject invalid values and conflicting options, before anything is applied.
    fn validate(options: &ParsedCommandLine) -> Result<Option<CacheUsage>, ConversionError> {
        let cache_usage = match options.value(CACHE) {
            Some(value) => Some(
                value
                    .parse::<CacheUsage>()
                    .map_err(|e| ConversionError::invalid_value(CACHE, value, e))?,
            ),
            None => None,
        };

        if options.has_option(EMBEDDED_SCRIPT) {
            let conflicting = [BUILD_FILE, SETTINGS_FILE, NO_SEARCH_UPWARDS]
                .iter()
                .find(|id| options.has_option(id));
            if let Some(id) = conflicting {
                return Err(ConversionError::conflicting(EMBEDDED_SCRIPT, id));
            }
        }

        if options.has_option(FULL_STACKTRACE) && options.has_option(STACKTRACE) {
            return Err(ConversionError::conflicting(FULL_STACKTRACE, STACKTRACE));
        }

        if options.has_option(PROJECT_DEPENDENCY_TASK_NAMES)
            && options.has_option(NO_PROJECT_DEPENDENCY_REBUILD)
        {
            return Err(ConversionError::conflicting(
                PROJECT_DEPENDENCY_TASK_NAMES,
                NO_PROJECT_DEPENDENCY_REBUILD,
            ));
        }

        Ok(cache_usage)
    }
}

/// Merge `key[=value]` expressions into `properties`.
///
/// The key ends at the first `=`; a missing value is the empty string.
fn put_properties(properties: &mut BTreeMap<String, String>, expressions: &[String]) {
    for expression in expressions {
        let (key, value) = expression
            .split_once('=')
            .unwrap_or((expression.as_str(), ""));
        properties.insert(key.to_string(), value.to_string());
    }
}

/// Stack-trace level requested by a flag, if any.
fn requested_stacktrace(options: &ParsedCommandLine) -> Option<ShowStacktrace> {
    stacktrace::flags()
        .find(|(flag, _)| options.has_option(&flag.to_string()))
        .map(|(_, level)| level)
}

impl<L> CommandLineConverter<BuildConfiguration> for BuildOptionsConverter<L>
where
    L: CommandLineConverter<LoggingConfiguration>,
{
    fn configure(&self, schema: &mut OptionSchema) -> Fallible<()> {
        self.logging.configure(schema)?;

        let mut options = vec![
            RecognizedOption::new(NO_SEARCH_UPWARDS)
                .with_long("no-search-upward")
                .with_description(format!(
                    "Don't search in parent folders for a {} file.",
                    DEFAULT_SETTINGS_FILE
                )),
            RecognizedOption::new(CACHE)
                .with_long("cache")
                .with_single_value()
                .with_description(
                    "Specifies how compiled build scripts should be cached. \
                     Possible values are: 'rebuild' and 'on'. Default value is 'on'",
                ),
            RecognizedOption::new(DRY_RUN)
                .with_long("dry-run")
                .with_description("Runs the builds with all task actions disabled."),
            RecognizedOption::new(STACKTRACE)
                .with_long("stacktrace")
                .with_description(
                    "Print out the stacktrace also for user exceptions (e.g. compile error).",
                ),
            RecognizedOption::new(FULL_STACKTRACE)
                .with_long("full-stacktrace")
                .with_description(
                    "Print out the full (very verbose) stacktrace for any exceptions.",
                ),
        ];
        for &(id, task, description) in &SUBCOMMAND_ALIASES {
            options.push(
                RecognizedOption::new(id)
                    .with_long(task)
                    .maps_to_subcommand(task)
                    .with_description(description),
            );
        }
        options.extend(vec![
            RecognizedOption::new(PROJECT_DIR)
                .with_long("project-dir")
                .with_single_value()
                .with_description(
                    "Specifies the start directory for the build. Defaults to current directory.",
                ),
            RecognizedOption::new(USER_HOME)
                .with_long("gradle-user-home")
                .with_single_value()
                .with_description("Specifies the user home directory."),
            RecognizedOption::new(INIT_SCRIPT)
                .with_long("init-script")
                .with_values()
                .with_description("Specifies an initialization script."),
            RecognizedOption::new(SETTINGS_FILE)
                .with_long("settings-file")
                .with_single_value()
                .with_description("Specifies the settings file."),
            RecognizedOption::new(BUILD_FILE)
                .with_long("build-file")
                .with_single_value()
                .with_description("Specifies the build file."),
            RecognizedOption::new(SYSTEM_PROP)
                .with_long("system-prop")
                .with_values()
                .with_description("Set system property (e.g. -Dmyprop=myvalue)."),
            RecognizedOption::new(PROJECT_PROP)
                .with_long("project-prop")
                .with_values()
                .with_description(
                    "Set project property for the build script (e.g. -Pmyprop=myvalue).",
                ),
            RecognizedOption::new(EMBEDDED_SCRIPT)
                .with_long("embedded")
                .with_single_value()
                .with_description("Specify an embedded build script."),
            RecognizedOption::new(PROJECT_DEPENDENCY_TASK_NAMES)
                .with_long("dep-tasks")
                .with_values()
                .with_description("Specify additional tasks for building project dependencies."),
            RecognizedOption::new(NO_PROJECT_DEPENDENCY_REBUILD)
                .with_long("no-rebuild")
                .with_description("Do not rebuild project dependencies."),
            RecognizedOption::new(NO_OPT).with_description("Ignore any task optimization."),
            RecognizedOption::new(EXCLUDE_TASK)
                .with_long("exclude-task")
                .with_values()
                .with_description("Specify a task to be excluded from execution."),
            RecognizedOption::new(PROFILE).with_description(
                "Profiles build execution time and generates a report in the \
                 <build_dir>/reports/profile directory.",
            ),
        ]);
        for option in options {
            schema.register(option)?;
        }
        Ok(())
    }

    fn convert_with(
        &self,
        options: &ParsedCommandLine,
        target: BuildConfiguration,
    ) -> Result<BuildConfiguration, ConversionError> {
        let cache_usage = Self::validate(options)?;
        log::debug!("converting {} command-line options", options.option_count());

        for (alias, task, _) in &SUBCOMMAND_ALIASES {
            if options.has_option(alias) {
                log::warn!(
                    "the {} option is deprecated, run the '{}' task instead",
                    option_label(alias),
                    task
                );
            }
        }

        let mut cfg = target;

        let current = LoggingConfiguration {
            log_level: cfg.log_level,
            color_output: cfg.color_output,
        };
        let logging = self.logging.convert_with(options, current)?;
        cfg.log_level = logging.log_level;
        cfg.color_output = logging.color_output;

        put_properties(&mut cfg.system_properties, options.values(SYSTEM_PROP));
        put_properties(&mut cfg.project_properties, options.values(PROJECT_PROP));
        log::trace!(
            "system properties: {:?}, project properties: {:?}",
            cfg.system_properties,
            cfg.project_properties
        );

        if options.has_option(NO_SEARCH_UPWARDS) {
            cfg.search_upwards = false;
        }

        if let Some(dir) = options.value(PROJECT_DIR) {
            cfg.project_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = options.value(USER_HOME) {
            cfg.user_home_dir = Some(PathBuf::from(dir));
        }
        if let Some(file) = options.value(BUILD_FILE) {
            cfg.build_file = Some(PathBuf::from(file));
        }
        if let Some(file) = options.value(SETTINGS_FILE) {
            cfg.settings_file = Some(PathBuf::from(file));
        }

        for script in options.values(INIT_SCRIPT) {
            cfg.add_init_script(script);
        }

        if let Some(usage) = cache_usage {
            cfg.cache_usage = usage;
        }

        if let Some(source) = options.value(EMBEDDED_SCRIPT) {
            cfg.use_embedded_script(source);
        }

        if let Some(level) = requested_stacktrace(options) {
            cfg.show_stacktrace = level;
        }

        if options.has_option(NO_PROJECT_DEPENDENCY_REBUILD) {
            cfg.project_dependencies = DependencyRebuild::Skip;
        } else if options.has_option(PROJECT_DEPENDENCY_TASK_NAMES) {
            let tasks = options.values(PROJECT_DEPENDENCY_TASK_NAMES).to_vec();
            cfg.project_dependencies = DependencyRebuild::Tasks(tasks);
        }
        log::trace!("project dependencies: {:?}", cfg.project_dependencies);

        if !options.extra_arguments().is_empty() {
            cfg.task_names = options.extra_arguments().to_vec();
        }

        if options.has_option(DRY_RUN) {
            cfg.dry_run = true;
        }
        if options.has_option(NO_OPT) {
            cfg.no_opt = true;
        }
        if options.has_option(EXCLUDE_TASK) {
            cfg.excluded_task_names = options.values(EXCLUDE_TASK).to_vec();
        }
        if options.has_option(PROFILE) {
            cfg.profile = true;
        }

        log::trace!(
            "tasks: {:?}, excluded: {:?}",
            cfg.task_names,
            cfg.excluded_task_names
        );
        Ok(cfg)
    }
}
