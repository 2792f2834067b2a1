//! Command-line parsing that binds flags directly to caller variables.
//!
//! Register bindings on a [`Parser`], then hand it `argv`:
//!
//! ```
//! use argbind::Parser;
//!
//! let mut file = String::from("a.out");
//! let mut verbosity = 0u32;
//! let mut level = 0i32;
//!
//! let mut p: Parser = Parser::new();
//! p.arg(&mut file, &["f", "file"], "Output file.");
//! p.repeated(&mut verbosity, &["v"], "More output.");
//! p.arg(&mut level, &["c"], "Compression level.");
//! let rest = p.parse(&["prog", "-f", "out.txt", "-vvv", "-c5", "extra"])?;
//!
//! assert_eq!(file, "out.txt");
//! assert_eq!(verbosity, 3);
//! assert_eq!(level, 5);
//! assert_eq!(rest.args(), ["extra"]);
//! # Ok::<(), argbind::Error>(())
//! ```
//!
//! Flags are resolved through an open-addressing [`AliasTable`] built for
//! each parse. Subcommands get an independent parser of their own, so the
//! same alias may mean different things under different subcommands.

pub mod binding;
pub mod convert;
pub mod error;
pub mod group;
pub mod help;
pub mod parser;
pub mod table;

pub use binding::{Binding, BindingHandle, BindingKind, Declaration};
pub use convert::{buffer_text, FromArg, Target};
pub use error::{Error, Namespace, Result};
pub use group::SubOptions;
pub use help::{render_alias, render_aliases, wrap, HelpFile, HelpSettings, DEFAULT_HELP_WIDTH};
pub use parser::{EntryPoint, Invocation, Parser, Positional, Positionals};
pub use table::{AliasTable, DEFAULT_LOAD_FACTOR};
