//! Build configuration produced from the command line.

use crate::logging::LogLevel;
use failure::{format_err, Error};
use serde_derive::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How compiled build scripts are cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheUsage {
    /// Reuse cached scripts when up to date.
    On,
    /// Recompile every script.
    Rebuild,
}

impl CacheUsage {
    /// All accepted values, in help order.
    pub const VALUES: [CacheUsage; 2] = [CacheUsage::Rebuild, CacheUsage::On];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheUsage::On => "on",
            CacheUsage::Rebuild => "rebuild",
        }
    }
}

impl Default for CacheUsage {
    fn default() -> Self {
        CacheUsage::On
    }
}

impl fmt::Display for CacheUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheUsage {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::VALUES
            .iter()
            .copied()
            .find(|usage| usage.as_str().eq_ignore_ascii_case(input))
            .ok_or_else(|| {
                let valid: Vec<String> = Self::VALUES
                    .iter()
                    .map(|usage| format!("'{}'", usage))
                    .collect();
                format_err!(
                    "unknown cache usage '{}', valid values are: {}",
                    input,
                    valid.join(", ")
                )
            })
    }
}

/// Stack-trace verbosity for build failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShowStacktrace {
    /// Stack traces only for internal failures (no command-line flag).
    InternalExceptions,
    /// Stack traces for every failure.
    Always,
    /// Full, unfiltered stack traces for every failure.
    AlwaysFull,
}

impl Default for ShowStacktrace {
    fn default() -> Self {
        ShowStacktrace::InternalExceptions
    }
}

/// What to do with project dependencies before running the requested tasks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyRebuild {
    /// Rebuild dependencies with their default tasks.
    DefaultTasks,
    /// Rebuild dependencies running exactly these tasks.
    Tasks(Vec<String>),
    /// Do not rebuild dependencies.
    Skip,
}

impl Default for DependencyRebuild {
    fn default() -> Self {
        DependencyRebuild::DefaultTasks
    }
}

/// Configuration for a single build invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    pub log_level: LogLevel,
    pub color_output: bool,
    pub system_properties: BTreeMap<String, String>,
    pub project_properties: BTreeMap<String, String>,
    /// Whether to look for a settings file in parent directories.
    pub search_upwards: bool,
    pub project_dir: Option<PathBuf>,
    pub user_home_dir: Option<PathBuf>,
    pub build_file: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
    pub init_scripts: Vec<PathBuf>,
    pub cache_usage: CacheUsage,
    /// Source of an embedded build script, replacing build and settings files.
    pub embedded_script: Option<String>,
    pub show_stacktrace: ShowStacktrace,
    pub project_dependencies: DependencyRebuild,
    pub task_names: Vec<String>,
    pub excluded_task_names: Vec<String>,
    pub dry_run: bool,
    pub no_opt: bool,
    pub profile: bool,
}

impl BuildConfiguration {
    /// Use `source` as the whole build definition.
    ///
    /// This drops any build or settings file and disables the upward
    /// search for a settings file.
    pub fn use_embedded_script(&mut self, source: impl Into<String>) {
        self.embedded_script = Some(source.into());
        self.build_file = None;
        self.settings_file = None;
        self.search_upwards = false;
    }

    pub fn add_init_script(&mut self, script: impl Into<PathBuf>) {
        self.init_scripts.push(script.into());
    }
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            color_output: true,
            system_properties: BTreeMap::new(),
            project_properties: BTreeMap::new(),
            search_upwards: true,
            project_dir: None,
            user_home_dir: None,
            build_file: None,
            settings_file: None,
            init_scripts: vec![],
            cache_usage: CacheUsage::default(),
            embedded_script: None,
            show_stacktrace: ShowStacktrace::default(),
            project_dependencies: DependencyRebuild::default(),
            task_names: vec![],
            excluded_task_names: vec![],
            dry_run: false,
            no_opt: false,
            profile: false,
        }
    }
}
