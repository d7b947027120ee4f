use commons::configuration::BuildConfiguration;
use failure::{Fallible, ResultExt};
use std::ffi::OsString;
use std::path::PathBuf;

/// Launcher defaults, derived from the process environment.
///
/// These seed the build configuration before command-line options are
/// applied on top of it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LauncherSettings {
    pub(crate) project_dir: Option<PathBuf>,
    pub(crate) user_home_dir: Option<PathBuf>,
}

impl LauncherSettings {
    /// Environment variable overriding the user home directory.
    const USER_HOME_ENV: &'static str = "GRADLE_USER_HOME";
    /// Default user home directory, relative to `$HOME`.
    const DEFAULT_USER_HOME_DIR: &'static str = ".gradle";

    pub fn from_env() -> Fallible<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::from_vars(cwd, |key| std::env::var_os(key)))
    }

    fn from_vars(cwd: PathBuf, var: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |key: &str| var(key).filter(|value| !value.is_empty());
        let user_home_dir = non_empty(Self::USER_HOME_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                non_empty("HOME").map(|home| PathBuf::from(home).join(Self::DEFAULT_USER_HOME_DIR))
            });

        Self {
            project_dir: Some(cwd),
            user_home_dir,
        }
    }

    /// Build configuration holding these defaults.
    pub fn seed_configuration(&self) -> BuildConfiguration {
        BuildConfiguration {
            project_dir: self.project_dir.clone(),
            user_home_dir: self.user_home_dir.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commons::converter::{BuildOptionsConverter, CommandLineConverter};
    use commons::options::ParsedCommandLine;
    use std::collections::HashMap;

    fn settings(vars: HashMap<&str, &str>) -> LauncherSettings {
        LauncherSettings::from_vars(PathBuf::from("/work"), |key| {
            vars.get(key).map(OsString::from)
        })
    }

    #[test]
    fn test_from_vars() {
        {
            let s = settings(HashMap::new());
            assert_eq!(s.project_dir, Some(PathBuf::from("/work")));
            assert_eq!(s.user_home_dir, None);
        }
        {
            let s = settings(maplit::hashmap! {"HOME" => "/home/user"});
            assert_eq!(s.user_home_dir, Some(PathBuf::from("/home/user/.gradle")));
        }
        {
            let s = settings(maplit::hashmap! {
                "HOME" => "/home/user",
                "GRADLE_USER_HOME" => "/opt/cache",
            });
            assert_eq!(s.user_home_dir, Some(PathBuf::from("/opt/cache")));
        }
        {
            let s = settings(maplit::hashmap! {"GRADLE_USER_HOME" => "", "HOME" => "/root"});
            assert_eq!(s.user_home_dir, Some(PathBuf::from("/root/.gradle")));
        }
    }

    #[test]
    fn test_command_line_overlay() {
        let seed = settings(maplit::hashmap! {"HOME" => "/home/user"}).seed_configuration();
        let converter = BuildOptionsConverter::new();
        {
            let cfg = converter
                .convert_with(&ParsedCommandLine::new(), seed.clone())
                .unwrap();
            assert_eq!(cfg.project_dir, Some(PathBuf::from("/work")));
            assert_eq!(cfg.user_home_dir, Some(PathBuf::from("/home/user/.gradle")));
        }
        {
            let options = ParsedCommandLine::new().with_values("g", vec!["/tmp/home"]);
            let cfg = converter.convert_with(&options, seed).unwrap();
            assert_eq!(cfg.project_dir, Some(PathBuf::from("/work")));
            assert_eq!(cfg.user_home_dir, Some(PathBuf::from("/tmp/home")));
        }
    }
}
