//! Bindings: how a registered flag writes into a caller variable.
//!
//! A `Binding` is built with one of the kind constructors and then given its
//! aliases and help text, in the same builder style the option tables use:
//!
//! ```
//! use argbind::Binding;
//!
//! let mut output = String::new();
//! let binding = Binding::direct(&mut output)
//!     .aliases(["o", "output"])
//!     .takes_argument()
//!     .help("Write the result to this file.");
//! assert_eq!(binding.declaration().aliases(), ["o", "output"]);
//! ```

use crate::convert::{FromArg, Target};
use crate::error::{Error, Result};
use crate::group::SubOptions;

pub(crate) type Setter<'a> = Box<dyn FnMut(&str) -> Result<()> + 'a>;

/// The closed set of binding variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Parses the argument text into the variable.
    Direct,
    /// Writes a payload chosen at registration; the text is ignored.
    FixedValue,
    /// Parses the text and appends it to a sequence.
    Accumulator,
    /// Owns no variable; the raw token is kept among the positionals.
    Ignored,
    /// Forwards `name[=value]` to a nested sub-option table.
    Group,
}

/// Everything about a binding except the variable it writes.
#[derive(Debug, Clone)]
pub struct Declaration {
    aliases: Vec<String>,
    takes_argument: bool,
    help: String,
    kind: BindingKind,
}

impl Declaration {
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn takes_argument(&self) -> bool {
        self.takes_argument
    }

    pub fn is_ignored(&self) -> bool {
        self.kind == BindingKind::Ignored
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }
}

/// Index of a binding within the parser it was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingHandle(pub(crate) usize);

impl BindingHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

pub(crate) enum Action<'a> {
    Direct(Setter<'a>),
    Fixed(Setter<'a>),
    Accumulate(Setter<'a>),
    Ignored,
    Group(SubOptions<'a>),
}

impl Action<'_> {
    pub(crate) fn apply(&mut self, text: &str) -> Result<()> {
        match self {
            Action::Direct(set) | Action::Fixed(set) | Action::Accumulate(set) => set(text),
            Action::Ignored => Ok(()),
            Action::Group(options) => options.apply(text),
        }
    }
}

pub struct Binding<'a> {
    declaration: Declaration,
    action: Action<'a>,
    unsupported: Option<&'static str>,
}

/// Length of `text` when it is a single repeated character (`vvv` is 3),
/// otherwise 1.
pub(crate) fn repetition_count(text: &str) -> usize {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if chars.all(|c| c == first) => text.chars().count(),
        _ => 1,
    }
}

impl<'a> Binding<'a> {
    fn new(kind: BindingKind, action: Action<'a>) -> Self {
        Binding {
            declaration: Declaration {
                aliases: Vec::new(),
                takes_argument: false,
                help: String::new(),
                kind,
            },
            action,
            unsupported: None,
        }
    }

    /// Overwrite the variable with the converted argument text. A direct
    /// binding without an argument receives the alias that triggered it.
    pub fn direct<T: FromArg + 'a>(target: impl Into<Target<'a, T>>) -> Self {
        let mut target = target.into();
        Self::new(
            BindingKind::Direct,
            Action::Direct(Box::new(move |text| {
                target.set(T::from_arg(text));
                Ok(())
            })),
        )
    }

    /// Store `payload` whenever one of the aliases appears.
    pub fn fixed<T: Clone + 'a>(target: impl Into<Target<'a, T>>, payload: T) -> Self {
        let mut target = target.into();
        Self::new(
            BindingKind::FixedValue,
            Action::Fixed(Box::new(move |_| {
                target.set(payload.clone());
                Ok(())
            })),
        )
    }

    /// Store how many times the flag was repeated in one token:
    /// `-vvv` stores 3, `-v` or `--verbose` stores 1.
    pub fn counter<T: FromArg + 'a>(target: impl Into<Target<'a, T>>) -> Self {
        let mut target = target.into();
        Self::new(
            BindingKind::Direct,
            Action::Direct(Box::new(move |text| {
                let count = repetition_count(text).to_string();
                target.set(T::from_arg(&count));
                Ok(())
            })),
        )
    }

    /// Append each converted argument to the sequence. Always takes an argument.
    pub fn accumulator<T: FromArg + 'a>(target: impl Into<Target<'a, Vec<T>>>) -> Self {
        let mut target = target.into();
        let mut binding = Self::new(
            BindingKind::Accumulator,
            Action::Accumulate(Box::new(move |text| {
                target.update(|values| values.push(T::from_arg(text)));
                Ok(())
            })),
        );
        binding.declaration.takes_argument = true;
        if !T::ACCUMULABLE {
            binding.unsupported = Some(std::any::type_name::<T>());
        }
        binding
    }

    /// Accept the aliases but leave each occurrence, verbatim, among the
    /// positionals so that its position relative to them survives.
    pub fn ignored() -> Self {
        Self::new(BindingKind::Ignored, Action::Ignored)
    }

    /// Forward `-Wname` / `-Wname=value` to a nested sub-option table.
    pub fn group(options: SubOptions<'a>) -> Self {
        let mut binding = Self::new(BindingKind::Group, Action::Group(options));
        binding.declaration.takes_argument = true;
        binding
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.declaration.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declaration
            .aliases
            .extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn takes_argument(self) -> Self {
        self.with_argument(true)
    }

    pub fn with_argument(mut self, takes_argument: bool) -> Self {
        self.declaration.takes_argument = takes_argument;
        self
    }

    /// Help text; bindings with empty help are left out of the help file.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.declaration.help = help.into();
        self
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// Fails for an accumulator whose element type cannot be collected.
    pub(crate) fn check(&self) -> Result<()> {
        match self.unsupported {
            Some(type_name) => Err(Error::UnsupportedElementType(type_name.to_string())),
            None => Ok(()),
        }
    }

    pub(crate) fn into_parts(self) -> (Declaration, Action<'a>) {
        (self.declaration, self.action)
    }
}
