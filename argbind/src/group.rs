//! Nested sub-option groups, after gcc's `-W` flag.
//!
//! A group is registered as the target of an ordinary flag. Its argument
//! text is split at the first `=` into a sub-option name and a value, and the
//! name is resolved through the group's own table:
//!
//! ```text
//! -Wall                  value sub-option, no text allowed
//! -Werror-level=3        arg sub-option, receives "3"
//! ```

use crate::binding::Setter;
use crate::convert::{FromArg, Target};
use crate::error::{Error, Namespace, Result};
use crate::table::AliasTable;

enum SubOption<'a> {
    /// Writes a fixed payload; trailing text is an error.
    Value(Setter<'a>),
    /// Converts the text after `=`.
    Arg(Setter<'a>),
}

pub struct SubOptions<'a> {
    expected: usize,
    pending: Vec<(String, SubOption<'a>)>,
    table: Option<AliasTable<String, SubOption<'a>>>,
    label: String,
}

impl<'a> SubOptions<'a> {
    /// `expected` sizes the group's private table.
    pub fn new(expected: usize) -> Self {
        SubOptions {
            expected,
            pending: Vec::new(),
            table: None,
            label: String::new(),
        }
    }

    pub fn value<T: Clone + 'a>(
        mut self,
        target: impl Into<Target<'a, T>>,
        name: impl Into<String>,
        payload: T,
    ) -> Self {
        let mut target = target.into();
        let set: Setter<'a> = Box::new(move |_| {
            target.set(payload.clone());
            Ok(())
        });
        self.pending.push((name.into(), SubOption::Value(set)));
        self
    }

    pub fn arg<T: FromArg + 'a>(mut self, target: impl Into<Target<'a, T>>, name: impl Into<String>) -> Self {
        let mut target = target.into();
        let set: Setter<'a> = Box::new(move |text| {
            target.set(T::from_arg(text));
            Ok(())
        });
        self.pending.push((name.into(), SubOption::Arg(set)));
        self
    }

    /// Registered sub-option names, in registration order until the group is sealed.
    pub fn names(&self) -> Vec<&str> {
        match &self.table {
            Some(table) => table.iter().map(|(name, _)| name.as_str()).collect(),
            None => self.pending.iter().map(|(name, _)| name.as_str()).collect(),
        }
    }

    /// Build the lookup table. `label` is the owning flag as typed (`-W`),
    /// used in error messages.
    pub(crate) fn seal(&mut self, label: String) -> Result<()> {
        let mut table = match self.table.take() {
            Some(table) => table,
            None => AliasTable::with_capacity(self.expected.max(self.pending.len()))?,
        };
        for (name, entry) in self.pending.drain(..) {
            if table.contains_key(&name) {
                return Err(Error::DuplicateAliasRegistration {
                    namespace: Namespace::Suboption,
                    alias: name,
                });
            }
            table.insert(name, entry)?;
        }
        log::debug!("sealed sub-option group {} ({} entries)", label, table.len());
        self.table = Some(table);
        self.label = label;
        Ok(())
    }

    pub(crate) fn apply(&mut self, text: &str) -> Result<()> {
        let (name, rest) = text.split_once('=').unwrap_or((text, ""));
        match self.table.as_mut().and_then(|table| table.get_mut(name)) {
            Some(SubOption::Arg(set)) => set(rest),
            Some(SubOption::Value(set)) if rest.is_empty() => set(rest),
            Some(SubOption::Value(_)) => Err(Error::OptionTakesNoArguments(format!(
                "{}{}",
                self.label, name
            ))),
            None => Err(Error::UnrecognizedSuboption {
                option: self.label.clone(),
                suboption: name.to_string(),
            }),
        }
    }
}
