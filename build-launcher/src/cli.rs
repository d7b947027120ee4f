use clap::{crate_name, crate_version};
use commons::converter::{BuildOptionsConverter, CommandLineConverter};
use commons::logging::{LogLevel, LoggingConfiguration, LoggingConverter};
use commons::options::{OptionSchema, ParsedCommandLine};
use env_logger::WriteStyle;
use failure::Fallible;
use log::LevelFilter;

/// CLI configuration options.
#[derive(Debug)]
pub(crate) struct CliOptions {
    /// Options and task names as given on the command line.
    pub parsed: ParsedCommandLine,
    logging: LoggingConfiguration,
}

impl CliOptions {
    /// Parse process arguments against the options registered by `converter`.
    ///
    /// Malformed command lines are reported by the tokenizer, which exits.
    pub(crate) fn parse(converter: &BuildOptionsConverter) -> Fallible<Self> {
        let mut schema = OptionSchema::new();
        converter.configure(&mut schema)?;
        let matches = schema
            .command(crate_name!())
            .version(crate_version!())
            .about("Convert build launcher options into a build configuration")
            .get_matches();
        Self::from_parsed(ParsedCommandLine::from_matches(&schema, &matches))
    }

    fn from_parsed(parsed: ParsedCommandLine) -> Fallible<Self> {
        let logging = LoggingConverter.convert(&parsed)?;
        Ok(Self { parsed, logging })
    }

    /// Returns the log-level set via command-line flags.
    pub(crate) fn loglevel(&self) -> LevelFilter {
        match self.logging.log_level {
            LogLevel::Quiet => LevelFilter::Error,
            LogLevel::Lifecycle => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }

    /// Returns whether log output may be colored.
    pub(crate) fn write_style(&self) -> WriteStyle {
        if self.logging.color_output {
            WriteStyle::Auto
        } else {
            WriteStyle::Never
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loglevel() {
        {
            let opts = CliOptions::from_parsed(ParsedCommandLine::new()).unwrap();
            assert_eq!(opts.loglevel(), LevelFilter::Warn);
            assert_eq!(opts.write_style(), WriteStyle::Auto);
        }
        {
            let parsed = ParsedCommandLine::new()
                .with_option("q")
                .with_option("no-color");
            let opts = CliOptions::from_parsed(parsed).unwrap();
            assert_eq!(opts.loglevel(), LevelFilter::Error);
            assert_eq!(opts.write_style(), WriteStyle::Never);
        }
        {
            let parsed = ParsedCommandLine::new().with_option("d");
            let opts = CliOptions::from_parsed(parsed).unwrap();
            assert_eq!(opts.loglevel(), LevelFilter::Debug);
        }
    }
}
