//! Logging options.

use crate::converter::CommandLineConverter;
use crate::errors::ConversionError;
use crate::options::{OptionSchema, ParsedCommandLine, RecognizedOption};
use failure::Fallible;
use serde_derive::Serialize;

const QUIET: &str = "q";
const INFO: &str = "i";
const DEBUG: &str = "d";
const NO_COLOR: &str = "no-color";

/// Log levels selectable from the command line, most verbose first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    Debug,
    Info,
    /// Progress of the build lifecycle, plus warnings and errors.
    Lifecycle,
    /// Errors only.
    Quiet,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Lifecycle
    }
}

/// Logging settings from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoggingConfiguration {
    pub log_level: LogLevel,
    pub color_output: bool,
}

impl Default for LoggingConfiguration {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            color_output: true,
        }
    }
}

/// Converter for `-q`, `-i`, `-d` and `--no-color`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingConverter;

impl LoggingConverter {
    const LEVEL_FLAGS: [(&'static str, LogLevel); 3] = [
        (QUIET, LogLevel::Quiet),
        (INFO, LogLevel::Info),
        (DEBUG, LogLevel::Debug),
    ];
}

impl CommandLineConverter<LoggingConfiguration> for LoggingConverter {
    fn configure(&self, schema: &mut OptionSchema) -> Fallible<()> {
        schema.register(
            RecognizedOption::new(QUIET)
                .with_long("quiet")
                .with_description("Log errors only."),
        )?;
        schema.register(
            RecognizedOption::new(INFO)
                .with_long("info")
                .with_description("Set log level to info."),
        )?;
        schema.register(
            RecognizedOption::new(DEBUG)
                .with_long("debug")
                .with_description("Log in debug mode (includes normal stacktrace)."),
        )?;
        schema.register(
            RecognizedOption::new(NO_COLOR)
                .with_description("Do not use color in the console output."),
        )?;
        Ok(())
    }

    fn convert_with(
        &self,
        options: &ParsedCommandLine,
        target: LoggingConfiguration,
    ) -> Result<LoggingConfiguration, ConversionError> {
        let mut logging = target;

        // Most verbose level wins.
        let requested = Self::LEVEL_FLAGS
            .iter()
            .filter(|(id, _)| options.has_option(id))
            .map(|(_, level)| *level)
            .min();
        if let Some(level) = requested {
            logging.log_level = level;
        }

        if options.has_option(NO_COLOR) {
            logging.color_output = false;
        }

        Ok(logging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        let converter = LoggingConverter;
        {
            let cfg = converter.convert(&ParsedCommandLine::new()).unwrap();
            assert_eq!(cfg, LoggingConfiguration::default());
        }
        {
            let options = ParsedCommandLine::new().with_option("q");
            let cfg = converter.convert(&options).unwrap();
            assert_eq!(cfg.log_level, LogLevel::Quiet);
        }
        {
            let options = ParsedCommandLine::new().with_option("i");
            let cfg = converter.convert(&options).unwrap();
            assert_eq!(cfg.log_level, LogLevel::Info);
        }
        {
            let options = ParsedCommandLine::new().with_option("q").with_option("d");
            let cfg = converter.convert(&options).unwrap();
            assert_eq!(cfg.log_level, LogLevel::Debug);
            assert!(cfg.color_output);
        }
    }

    #[test]
    fn test_no_color() {
        let converter = LoggingConverter;
        let options = ParsedCommandLine::new().with_option("no-color");
        let cfg = converter.convert(&options).unwrap();
        assert!(!cfg.color_output);
        assert_eq!(cfg.log_level, LogLevel::Lifecycle);
    }

    #[test]
    fn test_configure() {
        let mut schema = OptionSchema::new();
        LoggingConverter.configure(&mut schema).unwrap();
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.get("d").unwrap().long_name(), Some("debug"));

        let parsed = schema
            .parse("test", vec!["test", "--quiet", "--no-color"])
            .unwrap();
        let cfg = LoggingConverter.convert(&parsed).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Quiet);
        assert!(!cfg.color_output);
    }
}
