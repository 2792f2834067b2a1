//! Help text: wrapping, rendering, and the generated help file.
//!
//! A program generates its help file once, before parsing, and reprints the
//! stored file when `--help` is seen. Subcommands inherit the parent's
//! settings and extend the command chain, so `prog push test` gets its own
//! file (`.prog_push_test_help_file`) next to the parent's.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_HELP_WIDTH: usize = 80;

/// Indentation of help text under its flag or subcommand line.
const DESCRIPTION_INDENT: usize = 8;

#[derive(Debug, Clone)]
pub struct HelpSettings {
    pub(crate) header: String,
    pub(crate) usage: String,
    pub(crate) footer: String,
    pub(crate) width: usize,
    pub(crate) file_path: Option<PathBuf>,
    pub(crate) commands: Vec<String>,
}

impl Default for HelpSettings {
    fn default() -> Self {
        HelpSettings {
            header: String::new(),
            usage: String::new(),
            footer: String::new(),
            width: DEFAULT_HELP_WIDTH,
            file_path: None,
            commands: Vec::new(),
        }
    }
}

impl HelpSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Directory the help files are written to.
    pub fn file_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_path = Some(dir.into());
        self
    }

    /// Command names from the program down to the current subcommand.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Append a command to the chain; a leading `./` is dropped.
    pub(crate) fn push_command(&mut self, name: &str) {
        let name = name.strip_prefix("./").unwrap_or(name);
        self.commands.push(name.to_string());
    }

    /// `<file_path>/.<cmd1>_<cmd2>_help_file` for the current chain.
    pub fn help_file_name(&self) -> Result<PathBuf> {
        let dir = self.file_path.as_ref().ok_or(Error::HelpPathUnset)?;
        let mut name = String::from(".");
        for command in &self.commands {
            name.push_str(command);
            name.push('_');
        }
        name.push_str("help_file");
        Ok(dir.join(name))
    }

    /// Handle to the help file of the current chain, generated or not.
    pub fn help_file(&self) -> Result<HelpFile> {
        Ok(HelpFile {
            path: self.help_file_name()?,
        })
    }

    /// Lay out the full help message.
    ///
    /// `subcommands` are `(name, description)` pairs; `options` are
    /// `(aliases, help)` pairs. Entries with empty text are left out.
    pub fn render<'e, S, O>(&self, subcommands: S, options: O) -> String
    where
        S: IntoIterator<Item = (&'e str, &'e str)>,
        O: IntoIterator<Item = (&'e [String], &'e str)>,
    {
        let mut out = String::new();

        let mut usage = String::from("usage:");
        for command in &self.commands {
            usage.push(' ');
            usage.push_str(command);
        }
        if !self.usage.is_empty() {
            usage.push(' ');
            usage.push_str(&self.usage);
        }
        self.push_wrapped(&mut out, &usage, 0);
        out.push('\n');

        if !self.header.is_empty() {
            self.push_wrapped(&mut out, &self.header, 0);
            out.push('\n');
        }

        let described: Vec<(&str, &str)> = subcommands
            .into_iter()
            .filter(|(_, description)| !description.is_empty())
            .collect();
        if !described.is_empty() {
            out.push_str("SUBCOMMANDS:\n");
            for (name, description) in described {
                out.push_str(name);
                out.push('\n');
                self.push_wrapped(&mut out, description, DESCRIPTION_INDENT);
            }
            out.push('\n');
        }

        out.push_str("OPTIONS:\n");
        for (aliases, help) in options {
            if help.is_empty() {
                continue;
            }
            out.push_str(&render_aliases(aliases));
            out.push('\n');
            self.push_wrapped(&mut out, help, DESCRIPTION_INDENT);
        }
        out.push('\n');

        if !self.footer.is_empty() {
            self.push_wrapped(&mut out, &self.footer, 0);
        }
        out
    }

    fn push_wrapped(&self, out: &mut String, text: &str, indent: usize) {
        for line in wrap(text, indent, self.width) {
            out.push_str(&line);
            out.push('\n');
        }
    }

    /// Write `contents` as the help file of the current chain.
    pub(crate) fn write_help_file(&self, contents: &str) -> Result<HelpFile> {
        let path = self.help_file_name()?;
        let mut file = File::create(&path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        log::debug!("wrote help file {}", path.display());
        Ok(HelpFile { path })
    }
}

/// A help file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpFile {
    path: PathBuf,
}

impl HelpFile {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        HelpFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn print(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.print_to(&mut out)
    }

    /// Copy the stored help verbatim to `out`.
    pub fn print_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut file = File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::HelpNotGenerated(self.path.clone()),
            _ => Error::Io(e),
        })?;
        io::copy(&mut file, out)?;
        out.flush()?;
        Ok(())
    }
}

/// Break `text` into lines of at most `width` columns, each starting with
/// `indent` spaces. Embedded newlines are kept; lines break at the last
/// space or tab that fits, and words longer than a line are split.
pub fn wrap(text: &str, indent: usize, width: usize) -> Vec<String> {
    let room = width.saturating_sub(indent).max(1);
    let pad = " ".repeat(indent);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut rest = paragraph;
        while rest.chars().count() > room {
            let cut = rest
                .char_indices()
                .nth(room)
                .map_or(rest.len(), |(i, _)| i);
            // A blank exactly at the limit still ends the line.
            let limit = cut + rest[cut..].chars().next().map_or(0, char::len_utf8);
            match rest[..limit].rfind(|c: char| c == ' ' || c == '\t') {
                Some(blank) if blank > 0 => {
                    lines.push(format!("{}{}", pad, &rest[..blank]));
                    rest = &rest[blank + 1..];
                }
                _ => {
                    lines.push(format!("{}{}", pad, &rest[..cut]));
                    rest = &rest[cut..];
                }
            }
        }
        if !rest.is_empty() {
            lines.push(format!("{}{}", pad, rest));
        }
    }
    lines
}

/// `-x` for a single character, `-` for the stdin hyphen, `--name` otherwise.
pub fn render_alias(alias: &str) -> String {
    if alias == "-" {
        alias.to_string()
    } else if alias.chars().count() == 1 {
        format!("-{}", alias)
    } else {
        format!("--{}", alias)
    }
}

pub fn render_aliases<S: AsRef<str>>(aliases: &[S]) -> String {
    aliases
        .iter()
        .map(|alias| render_alias(alias.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
