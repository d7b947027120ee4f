//! Mapping between stack-trace levels and their command-line flags.
//!
//! `ShowStacktrace::InternalExceptions` has no flag: it is what you get
//! when no stack-trace flag is given, so it is absent from the table.

use crate::configuration::ShowStacktrace;
use std::collections::BTreeMap;

/// Flag selecting `ShowStacktrace::AlwaysFull`.
pub const FULL_STACKTRACE: char = 'S';
/// Flag selecting `ShowStacktrace::Always`.
pub const STACKTRACE: char = 's';

lazy_static::lazy_static! {
    static ref STACKTRACE_FLAGS: BTreeMap<char, ShowStacktrace> = maplit::btreemap! {
        FULL_STACKTRACE => ShowStacktrace::AlwaysFull,
        STACKTRACE => ShowStacktrace::Always,
    };
}

/// Return the level selected by `flag`, if any.
pub fn level_for_flag(flag: char) -> Option<ShowStacktrace> {
    STACKTRACE_FLAGS.get(&flag).copied()
}

/// Return the flag selecting `level`, if it can be selected from the command line.
pub fn flag_for_level(level: ShowStacktrace) -> Option<char> {
    STACKTRACE_FLAGS
        .iter()
        .find(|(_, candidate)| **candidate == level)
        .map(|(flag, _)| *flag)
}

/// Levels that have a command-line flag.
pub fn supported_levels() -> Vec<ShowStacktrace> {
    STACKTRACE_FLAGS.values().copied().collect()
}

/// All `(flag, level)` pairs, ordered by flag.
pub fn flags() -> impl Iterator<Item = (char, ShowStacktrace)> {
    STACKTRACE_FLAGS.iter().map(|(flag, level)| (*flag, *level))
}
