use std::fmt;
use std::io;
use std::path::PathBuf;

/// Which registration scope a duplicate alias was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Flag,
    Subcommand,
    Suboption,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Flag => write!(f, "Flag"),
            Namespace::Subcommand => write!(f, "Subcommand"),
            Namespace::Suboption => write!(f, "Suboption"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unrecognized option: {0}")]
    UnrecognizedOption(String),

    #[error("Option requires arguments: {0}")]
    OptionRequiresArgument(String),

    #[error("Option does not take arguments: {0}")]
    OptionTakesNoArguments(String),

    #[error("Order of \"-{0}\" matters, so it cannot be part of multiple short arguments.")]
    OrderDependentFlagInBundle(char),

    #[error("{namespace} already used: {alias}")]
    DuplicateAliasRegistration { namespace: Namespace, alias: String },

    #[error("Option does not exist: {option}{suboption}")]
    UnrecognizedSuboption { option: String, suboption: String },

    #[error("cannot accumulate values of type {0}: the length of each buffer cannot be tracked")]
    UnsupportedElementType(String),

    #[error("cannot size a table for {0} entries")]
    CapacityExceeded(usize),

    #[error("Key not in table: {0}")]
    KeyNotFound(String),

    #[error("the help file path has not been set; call set_file_path before generating help")]
    HelpPathUnset,

    #[error("{} has not been generated; call generate_help before parse", .0.display())]
    HelpNotGenerated(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
