//! The dispatch engine.
//!
//! A `Parser` collects bindings and subcommands, then `parse` builds the
//! alias tables and walks the argument vector once, left to right. Each
//! token is classified as one of:
//!
//! ```text
//! name           subcommand: hand the rest of argv to its entry point
//! --name[=val]   long option
//! --             everything after it is positional
//! -              the stdin hyphen, applied only if bound
//! -xVAL, -x VAL  short option taking an argument
//! -vvv, -abc     repeated / bundled short options
//! anything else  positional
//! ```
//!
//! Parsing consumes the parser: its tables and the borrows of the caller's
//! variables end when `parse` returns, and a subcommand builds its own
//! parser from scratch.

use crate::binding::{Action, Binding, BindingHandle, Declaration};
use crate::convert::{FromArg, Target};
use crate::error::{Error, Namespace, Result};
use crate::group::SubOptions;
use crate::help::{render_alias, HelpFile, HelpSettings};
use crate::table::AliasTable;

// ============================================================================
// Positionals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Positional {
    Arg(String),
    /// Marks where a subcommand took over; the subcommand name follows.
    Boundary,
}

/// Tokens that were not consumed as flags, in command-line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Positionals(Vec<Positional>);

impl Positionals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_arg(&mut self, arg: impl Into<String>) {
        self.0.push(Positional::Arg(arg.into()));
    }

    pub fn push_boundary(&mut self) {
        self.0.push(Positional::Boundary);
    }

    /// Every positional, subcommand names included, without boundaries.
    pub fn args(&self) -> Vec<&str> {
        self.nested().into_iter().map(|(_, arg)| arg).collect()
    }

    /// Positionals that came before the first subcommand.
    pub fn top_level(&self) -> Vec<&str> {
        self.0
            .iter()
            .take_while(|p| **p != Positional::Boundary)
            .filter_map(|p| match p {
                Positional::Arg(arg) => Some(arg.as_str()),
                Positional::Boundary => None,
            })
            .collect()
    }

    /// Each positional with its subcommand depth.
    pub fn nested(&self) -> Vec<(usize, &str)> {
        let mut depth = 0;
        let mut out = Vec::with_capacity(self.0.len());
        for p in &self.0 {
            match p {
                Positional::Boundary => depth += 1,
                Positional::Arg(arg) => out.push((depth, arg.as_str())),
            }
        }
        out
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Positional> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Positional> {
        self.0
    }
}

impl Extend<Positional> for Positionals {
    fn extend<I: IntoIterator<Item = Positional>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Positionals {
    type Item = Positional;
    type IntoIter = std::vec::IntoIter<Positional>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'p> IntoIterator for &'p Positionals {
    type Item = &'p Positional;
    type IntoIter = std::slice::Iter<'p, Positional>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Subcommands
// ============================================================================

pub type EntryPoint<'a, C> = Box<dyn FnOnce(Invocation<'_, C>) -> Result<Positionals> + 'a>;

struct Subcommand<'a, C> {
    name: String,
    entry: EntryPoint<'a, C>,
    description: String,
}

/// What a subcommand's entry point is handed.
pub struct Invocation<'s, C> {
    args: Vec<String>,
    context: &'s C,
    help: HelpSettings,
}

impl<'s, C> Invocation<'s, C> {
    /// The remaining arguments, starting with the subcommand name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn name(&self) -> &str {
        self.args.first().map_or("", String::as_str)
    }

    pub fn context(&self) -> &'s C {
        self.context
    }

    /// Help settings inherited from the parent command.
    pub fn help(&self) -> &HelpSettings {
        &self.help
    }

    /// A fresh parser for this subcommand, starting from the inherited help settings.
    pub fn parser<'a, D>(&self) -> Parser<'a, D> {
        Parser::with_help(self.help.clone())
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Registration set and entry point of one parse.
///
/// `C` is the context handed by reference to subcommand entry points.
pub struct Parser<'a, C = ()> {
    bindings: Vec<Binding<'a>>,
    subcommands: Vec<Subcommand<'a, C>>,
    help: HelpSettings,
}

impl<C> Default for Parser<'_, C> {
    fn default() -> Self {
        Self::with_help(HelpSettings::default())
    }
}

impl<'a, C> Parser<'a, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_help(help: HelpSettings) -> Self {
        Parser {
            bindings: Vec::new(),
            subcommands: Vec::new(),
            help,
        }
    }

    pub fn register(&mut self, binding: Binding<'a>) -> BindingHandle {
        self.bindings.push(binding);
        BindingHandle(self.bindings.len() - 1)
    }

    pub fn declaration(&self, handle: BindingHandle) -> Option<&Declaration> {
        self.bindings.get(handle.0).map(Binding::declaration)
    }

    /// Direct binding that takes an argument.
    pub fn arg<T: FromArg + 'a>(
        &mut self,
        target: impl Into<Target<'a, T>>,
        aliases: &[&str],
        help: &str,
    ) -> BindingHandle {
        self.var(target, aliases, true, help)
    }

    pub fn var<T: FromArg + 'a>(
        &mut self,
        target: impl Into<Target<'a, T>>,
        aliases: &[&str],
        takes_argument: bool,
        help: &str,
    ) -> BindingHandle {
        self.register(
            Binding::direct(target)
                .aliases(aliases.iter().copied())
                .with_argument(takes_argument)
                .help(help),
        )
    }

    pub fn value<T: Clone + 'a>(
        &mut self,
        target: impl Into<Target<'a, T>>,
        aliases: &[&str],
        payload: T,
        help: &str,
    ) -> BindingHandle {
        self.register(
            Binding::fixed(target, payload)
                .aliases(aliases.iter().copied())
                .help(help),
        )
    }

    /// Counter: `-vvv` stores 3.
    pub fn repeated<T: FromArg + 'a>(
        &mut self,
        target: impl Into<Target<'a, T>>,
        aliases: &[&str],
        help: &str,
    ) -> BindingHandle {
        self.register(
            Binding::counter(target)
                .aliases(aliases.iter().copied())
                .help(help),
        )
    }

    pub fn vector<T: FromArg + 'a>(
        &mut self,
        target: impl Into<Target<'a, Vec<T>>>,
        aliases: &[&str],
        help: &str,
    ) -> BindingHandle {
        self.register(
            Binding::accumulator(target)
                .aliases(aliases.iter().copied())
                .help(help),
        )
    }

    /// Position-sensitive flag kept among the positionals, like gcc's `-l`.
    pub fn ignored(&mut self, aliases: &[&str], help: &str) -> BindingHandle {
        self.register(
            Binding::ignored()
                .aliases(aliases.iter().copied())
                .takes_argument()
                .help(help),
        )
    }

    pub fn group(&mut self, options: SubOptions<'a>, aliases: &[&str], help: &str) -> BindingHandle {
        self.register(
            Binding::group(options)
                .aliases(aliases.iter().copied())
                .help(help),
        )
    }

    /// Register a subcommand. An empty description keeps it out of the help file.
    pub fn subcommand<F>(&mut self, name: &str, entry: F, description: &str)
    where
        F: FnOnce(Invocation<'_, C>) -> Result<Positionals> + 'a,
    {
        self.subcommands.push(Subcommand {
            name: name.to_string(),
            entry: Box::new(entry),
            description: description.to_string(),
        });
    }

    // ------------------------------------------------------------------------
    // Help
    // ------------------------------------------------------------------------

    pub fn help_settings(&self) -> &HelpSettings {
        &self.help
    }

    pub fn set_header(&mut self, header: &str) {
        self.help.header = header.to_string();
    }

    pub fn set_usage(&mut self, usage: &str) {
        self.help.usage = usage.to_string();
    }

    pub fn set_footer(&mut self, footer: &str) {
        self.help.footer = footer.to_string();
    }

    pub fn set_help_width(&mut self, width: usize) {
        self.help.width = width;
    }

    pub fn set_help_file_path(&mut self, dir: impl Into<std::path::PathBuf>) {
        self.help.file_path = Some(dir.into());
    }

    pub fn render_help(&self) -> String {
        self.help.render(
            self.subcommands
                .iter()
                .map(|s| (s.name.as_str(), s.description.as_str())),
            self.bindings.iter().map(|b| {
                let decl = b.declaration();
                (decl.aliases(), decl.help())
            }),
        )
    }

    /// Add `command_name` to the command chain and write this command's help file.
    pub fn generate_help(&mut self, command_name: &str) -> Result<HelpFile> {
        self.help.push_command(command_name);
        let rendered = self.render_help();
        self.help.write_help_file(&rendered)
    }

    /// Help file of the current command chain.
    pub fn help_file(&self) -> Result<HelpFile> {
        self.help.help_file()
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    /// Parse `argv` (`argv[0]` is the program name), handing `context` to
    /// any subcommand that takes over.
    pub fn parse_with<S: AsRef<str>>(self, argv: &[S], context: &C) -> Result<Positionals> {
        let Parser {
            bindings,
            subcommands,
            help,
        } = self;

        for binding in &bindings {
            binding.check()?;
        }
        let (declarations, mut actions): (Vec<Declaration>, Vec<Action<'a>>) =
            bindings.into_iter().map(Binding::into_parts).unzip();

        let flags = build_flag_table(&declarations)?;
        for (decl, action) in declarations.iter().zip(actions.iter_mut()) {
            if let Action::Group(options) = action {
                let label = decl.aliases().first().map_or_else(String::new, |a| render_alias(a));
                options.seal(label)?;
            }
        }

        let mut commands: AliasTable<String, usize> = AliasTable::with_capacity(subcommands.len())?;
        let mut entries = Vec::with_capacity(subcommands.len());
        for Subcommand { name, entry, .. } in subcommands {
            if commands.contains_key(&name) {
                return Err(Error::DuplicateAliasRegistration {
                    namespace: Namespace::Subcommand,
                    alias: name,
                });
            }
            commands.insert(name, entries.len())?;
            entries.push(entry);
        }
        log::debug!(
            "built tables: {} aliases (capacity {}), {} subcommands",
            flags.len(),
            flags.capacity(),
            commands.len()
        );

        let args: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
        let mut dispatch = Dispatch {
            argv: &args,
            flags: &flags,
            commands: &commands,
            declarations: &declarations,
            actions,
            positionals: Positionals::new(),
        };
        let handoff = dispatch.run()?;
        let Dispatch {
            actions,
            mut positionals,
            ..
        } = dispatch;
        drop(actions);

        if let Some((at, index)) = handoff {
            if let Some(entry) = entries.into_iter().nth(index) {
                let name = args[at];
                log::debug!(
                    "dispatching subcommand {} with {} argument(s)",
                    name,
                    args.len() - at - 1
                );
                positionals.push_boundary();
                positionals.push_arg(name);
                let invocation = Invocation {
                    args: args[at..].iter().map(|s| s.to_string()).collect(),
                    context,
                    help,
                };
                positionals.extend(entry(invocation)?);
            }
        }
        Ok(positionals)
    }
}

impl<'a> Parser<'a, ()> {
    pub fn parse<S: AsRef<str>>(self, argv: &[S]) -> Result<Positionals> {
        self.parse_with(argv, &())
    }
}

/// Alias to binding index; every alias must be unique within one parser.
fn build_flag_table(declarations: &[Declaration]) -> Result<AliasTable<&str, usize>> {
    let total = declarations.iter().map(|d| d.aliases().len()).sum();
    let mut table = AliasTable::with_capacity(total)?;
    for (index, decl) in declarations.iter().enumerate() {
        for alias in decl.aliases() {
            if table.contains_key(alias) {
                return Err(Error::DuplicateAliasRegistration {
                    namespace: Namespace::Flag,
                    alias: alias.clone(),
                });
            }
            table.insert(alias.as_str(), index)?;
        }
    }
    Ok(table)
}

// ============================================================================
// Dispatch: one left-to-right scan
// ============================================================================

struct Dispatch<'p, 'a> {
    argv: &'p [&'p str],
    flags: &'p AliasTable<&'p str, usize>,
    commands: &'p AliasTable<String, usize>,
    declarations: &'p [Declaration],
    actions: Vec<Action<'a>>,
    positionals: Positionals,
}

impl<'p> Dispatch<'p, '_> {
    /// Scan `argv[1..]`. Returns the argv index and entry index of the
    /// subcommand that takes over the rest of the line, if any.
    fn run(&mut self) -> Result<Option<(usize, usize)>> {
        let mut i = 1;
        while i < self.argv.len() {
            let token = self.argv[i];
            if let Some(&entry) = self.commands.get(token) {
                return Ok(Some((i, entry)));
            }
            if token.len() > 2 && token.starts_with("--") {
                log::trace!("long option {}", token);
                self.long_option(token)?;
            } else if token == "--" {
                log::trace!("end of options at argument {}", i);
                for rest in &self.argv[i + 1..] {
                    self.positionals.push_arg(*rest);
                }
                break;
            } else if token == "-" {
                self.stdin_hyphen()?;
            } else if token.starts_with('-') {
                log::trace!("short option {}", token);
                i = self.short_option(i)?;
            } else {
                self.positionals.push_arg(token);
            }
            i += 1;
        }
        Ok(None)
    }

    fn declaration(&self, index: usize) -> &'p Declaration {
        let declarations: &'p [Declaration] = self.declarations;
        &declarations[index]
    }

    fn resolve(&self, alias: &str, spelled: impl FnOnce() -> String) -> Result<usize> {
        self.flags
            .get(alias)
            .copied()
            .ok_or_else(|| Error::UnrecognizedOption(spelled()))
    }

    fn apply(&mut self, index: usize, text: &str) -> Result<()> {
        match self.actions.get_mut(index) {
            Some(action) => action.apply(text),
            None => Ok(()),
        }
    }

    /// `--name`, `--name=value`.
    fn long_option(&mut self, token: &'p str) -> Result<()> {
        let body = &token[2..];
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let index = self.resolve(name, || format!("--{}", name))?;
        let decl = self.declaration(index);
        if decl.is_ignored() {
            self.positionals.push_arg(token);
            return Ok(());
        }
        match value {
            Some(value) if decl.takes_argument() => self.apply(index, value),
            Some(_) => Err(Error::OptionTakesNoArguments(format!("--{}", name))),
            None if decl.takes_argument() => Err(Error::OptionRequiresArgument(format!("--{}", name))),
            None => self.apply(index, name),
        }
    }

    /// A lone `-` does something only when a binding claims it.
    fn stdin_hyphen(&mut self) -> Result<()> {
        match self.flags.get("-").copied() {
            Some(index) if self.declaration(index).is_ignored() => {
                self.positionals.push_arg("-");
                Ok(())
            }
            Some(index) => self.apply(index, "-"),
            None => Ok(()),
        }
    }

    /// `-xVALUE`, `-x VALUE`, or a bundle. Returns the index of the last
    /// argv token consumed.
    fn short_option(&mut self, i: usize) -> Result<usize> {
        let token = self.argv[i];
        let body = &token[1..];
        let Some(lead) = body.chars().next() else {
            return Ok(i);
        };
        let split = lead.len_utf8();
        let index = self.resolve(&body[..split], || format!("-{}", lead))?;
        let decl = self.declaration(index);
        if decl.is_ignored() {
            self.positionals.push_arg(token);
            return Ok(i);
        }
        if decl.takes_argument() {
            let attached = &body[split..];
            if !attached.is_empty() {
                self.apply(index, attached)?;
                return Ok(i);
            }
            return match self.argv.get(i + 1) {
                Some(&value) => {
                    self.apply(index, value)?;
                    Ok(i + 1)
                }
                None => Err(Error::OptionRequiresArgument(format!("-{}", lead))),
            };
        }
        self.bundle(i, body, lead, index)
    }

    /// `-vvv` applies `v` once with the run "vvv"; each remaining character
    /// is its own flag. A flag taking an argument must end the bundle and
    /// consumes the next token.
    fn bundle(&mut self, i: usize, body: &'p str, lead: char, lead_index: usize) -> Result<usize> {
        let run_end = body
            .char_indices()
            .find(|&(_, c)| c != lead)
            .map_or(body.len(), |(pos, _)| pos);
        self.apply(lead_index, &body[..run_end])?;

        let tail = &body[run_end..];
        let mut chars = tail.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            let alias = &tail[pos..pos + c.len_utf8()];
            let index = self.resolve(alias, || format!("-{}", c))?;
            let decl = self.declaration(index);
            if decl.is_ignored() {
                return Err(Error::OrderDependentFlagInBundle(c));
            }
            if decl.takes_argument() {
                let last = chars.peek().is_none();
                return match self.argv.get(i + 1) {
                    Some(&value) if last => {
                        self.apply(index, value)?;
                        Ok(i + 1)
                    }
                    _ => Err(Error::OptionRequiresArgument(format!("-{}", c))),
                };
            }
            self.apply(index, alias)?;
        }
        Ok(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("prog")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn end_to_end_example() {
        let mut file = String::new();
        let mut count = 0i32;
        let mut verbose = 0u32;
        let mut p: Parser = Parser::new();
        p.var(&mut file, &["f", "file"], true, "");
        p.arg(&mut count, &["c"], "");
        p.repeated(&mut verbose, &["v"], "");
        let rest = p
            .parse(&argv(&["-f", "out.txt", "-vvv", "-c5", "extra"]))
            .unwrap();
        assert_eq!(file, "out.txt");
        assert_eq!(verbose, 3);
        assert_eq!(count, 5);
        assert_eq!(rest.args(), ["extra"]);
    }

    #[test]
    fn long_and_short_forms_agree() {
        for value in ["42", "-7", "abc", "3.5"] {
            let mut long = 0i64;
            let mut short = 0i64;
            let mut p: Parser = Parser::new();
            p.arg(&mut long, &["s", "size"], "");
            p.parse(&argv(&[&format!("--size={}", value)])).unwrap();

            let mut p: Parser = Parser::new();
            p.arg(&mut short, &["s", "size"], "");
            p.parse(&argv(&["-s", value])).unwrap();
            assert_eq!(long, short, "value {}", value);
        }
    }

    #[test]
    fn value_spelled_like_another_alias_is_still_a_value() {
        let mut file = String::new();
        let mut count = 0;
        let mut p: Parser = Parser::new();
        p.arg(&mut file, &["f"], "");
        p.arg(&mut count, &["c"], "");
        let rest = p.parse(&argv(&["-f", "c"])).unwrap();
        assert_eq!(file, "c");
        assert_eq!(count, 0);
        assert!(rest.is_empty());
    }

    #[test]
    fn duplicate_aliases_fail_before_scanning() {
        for (first, second, shared) in [
            (&["a", "apple"][..], &["b", "apple"][..], "apple"),
            (&["x"][..], &["y", "x"][..], "x"),
        ] {
            let touched = RefCell::new(0);
            let mut p: Parser = Parser::new();
            p.arg(&touched, first, "");
            p.arg(&touched, second, "");
            let err = p.parse(&argv(&["-x", "5", "--apple=5"])).unwrap_err();
            assert!(matches!(
                err,
                Error::DuplicateAliasRegistration { namespace: Namespace::Flag, ref alias } if alias == shared
            ));
            assert_eq!(*touched.borrow(), 0);
        }
    }

    #[test]
    fn bundle_matches_separate_flags() {
        let run = |args: &[&str]| {
            let seen = RefCell::new(Vec::<String>::new());
            let mut p: Parser = Parser::new();
            for name in ["a", "b", "c"] {
                p.register(Binding::accumulator(&seen).alias(name).with_argument(false));
            }
            p.parse(&argv(args)).unwrap();
            seen.into_inner()
        };
        assert_eq!(run(&["-abc"]), ["a", "b", "c"]);
        assert_eq!(run(&["-abc"]), run(&["-a", "-b", "-c"]));
        assert_eq!(run(&["-cab"]), ["c", "a", "b"]);
    }

    #[test]
    fn repeated_flag_counts_and_last_write_wins() {
        let mut verbosity = 0usize;
        let mut p: Parser = Parser::new();
        p.repeated(&mut verbosity, &["v"], "");
        p.parse(&argv(&["-vvvv"])).unwrap();
        assert_eq!(verbosity, 4);

        let mut p: Parser = Parser::new();
        p.repeated(&mut verbosity, &["v"], "");
        p.parse(&argv(&["-v", "-v"])).unwrap();
        assert_eq!(verbosity, 1);
    }

    #[test]
    fn positional_order_is_preserved() {
        let mut a = false;
        let mut p: Parser = Parser::new();
        p.value(&mut a, &["a"], true, "");
        let rest = p.parse(&argv(&["x", "-a", "y", "--", "-z"])).unwrap();
        assert!(a);
        assert_eq!(rest.args(), ["x", "y", "-z"]);
    }

    #[test]
    fn unknown_options_are_errors() {
        let p: Parser = Parser::new();
        let err = p.parse(&argv(&["--nope"])).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedOption(ref s) if s == "--nope"));

        let p: Parser = Parser::new();
        let err = p.parse(&argv(&["-q"])).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedOption(ref s) if s == "-q"));

        let mut a = false;
        let mut p: Parser = Parser::new();
        p.value(&mut a, &["a"], true, "");
        let err = p.parse(&argv(&["-az"])).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedOption(ref s) if s == "-z"));
    }

    #[test]
    fn argument_arity_is_enforced() {
        let mut name = String::new();
        let mut p: Parser = Parser::new();
        p.arg(&mut name, &["n", "name"], "");
        let err = p.parse(&argv(&["--name"])).unwrap_err();
        assert!(matches!(err, Error::OptionRequiresArgument(ref s) if s == "--name"));

        let mut p: Parser = Parser::new();
        p.arg(&mut name, &["n", "name"], "");
        let err = p.parse(&argv(&["-n"])).unwrap_err();
        assert!(matches!(err, Error::OptionRequiresArgument(ref s) if s == "-n"));

        let mut flag = false;
        let mut p: Parser = Parser::new();
        p.value(&mut flag, &["quiet"], true, "");
        let err = p.parse(&argv(&["--quiet=yes"])).unwrap_err();
        assert!(matches!(err, Error::OptionTakesNoArguments(ref s) if s == "--quiet"));
    }

    #[test]
    fn long_flag_without_argument_receives_its_name() {
        let mut seen = String::new();
        let mut p: Parser = Parser::new();
        p.var(&mut seen, &["dry-run"], false, "");
        p.parse(&argv(&["--dry-run"])).unwrap();
        assert_eq!(seen, "dry-run");
    }

    #[test]
    fn bundle_may_end_with_an_argument_flag() {
        let mut a = false;
        let mut out = String::new();
        let mut p: Parser = Parser::new();
        p.value(&mut a, &["a"], true, "");
        p.arg(&mut out, &["o"], "");
        let rest = p.parse(&argv(&["-ao", "file", "tail"])).unwrap();
        assert!(a);
        assert_eq!(out, "file");
        assert_eq!(rest.args(), ["tail"]);

        let mut p: Parser = Parser::new();
        let mut b = false;
        p.value(&mut a, &["a"], true, "");
        p.value(&mut b, &["b"], true, "");
        p.arg(&mut out, &["o"], "");
        let err = p.parse(&argv(&["-aob", "x"])).unwrap_err();
        assert!(matches!(err, Error::OptionRequiresArgument(ref s) if s == "-o"));

        let mut p: Parser = Parser::new();
        p.value(&mut a, &["a"], true, "");
        p.arg(&mut out, &["o"], "");
        let err = p.parse(&argv(&["-ao"])).unwrap_err();
        assert!(matches!(err, Error::OptionRequiresArgument(ref s) if s == "-o"));
    }

    #[test]
    fn ignored_flags_stay_in_place() {
        let mut p: Parser = Parser::new();
        p.ignored(&["l", "library"], "");
        let rest = p
            .parse(&argv(&["a.o", "-lm", "b.o", "--library=z"]))
            .unwrap();
        assert_eq!(rest.args(), ["a.o", "-lm", "b.o", "--library=z"]);

        let mut v = false;
        let mut p: Parser = Parser::new();
        p.ignored(&["l"], "");
        p.value(&mut v, &["v"], true, "");
        let err = p.parse(&argv(&["-vl"])).unwrap_err();
        assert!(matches!(err, Error::OrderDependentFlagInBundle('l')));
    }

    #[test]
    fn stdin_hyphen_applies_only_when_bound() {
        let p: Parser = Parser::new();
        let rest = p.parse(&argv(&["-", "x"])).unwrap();
        assert_eq!(rest.args(), ["x"]);

        let mut stdin = false;
        let mut p: Parser = Parser::new();
        p.value(&mut stdin, &["-"], true, "");
        p.parse(&argv(&["-"])).unwrap();
        assert!(stdin);
    }

    #[test]
    fn shared_variable_across_fixed_values() {
        let mode = RefCell::new('\0');
        let mut p: Parser = Parser::new();
        p.value(&mode, &["flag", "a"], 'a', "");
        p.value(&mode, &["no-flag", "b"], 'b', "");
        p.value(&mode, &["some-flag", "c"], 'c', "");
        p.parse(&argv(&["-a", "--some-flag"])).unwrap();
        assert_eq!(*mode.borrow(), 'c');
    }

    #[test]
    fn accumulator_collects_every_occurrence() {
        let mut ints: Vec<i32> = Vec::new();
        let mut defs: Vec<String> = Vec::new();
        let mut p: Parser = Parser::new();
        p.vector(&mut ints, &["i", "list"], "");
        p.vector(&mut defs, &["D"], "");
        p.parse(&argv(&["-i", "1", "--list=2", "-i3", "-DNDEBUG", "-D", "X=1"]))
            .unwrap();
        assert_eq!(ints, [1, 2, 3]);
        assert_eq!(defs, ["NDEBUG", "X=1"]);
    }

    #[test]
    fn buffer_accumulator_fails_at_table_build() {
        let mut buffers: Vec<[u8; 8]> = Vec::new();
        let mut p: Parser = Parser::new();
        p.vector(&mut buffers, &["b"], "");
        let err = p.parse(&argv(&[])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedElementType(_)));
    }

    #[test]
    fn nested_group_through_short_and_long_forms() {
        let sign = RefCell::new(true);
        let mut all = false;
        let mut level = 1;
        let mut p: Parser = Parser::new();
        p.group(
            SubOptions::new(8)
                .value(&sign, "sign-conversion", true)
                .value(&sign, "no-sign-conversion", false)
                .value(&mut all, "all", true)
                .arg(&mut level, "error-level"),
            &["W"],
            "",
        );
        p.parse(&argv(&["-Wall", "-W", "error-level=4", "-Wno-sign-conversion"]))
            .unwrap();
        assert!(all);
        assert_eq!(level, 4);
        assert!(!*sign.borrow());

        let mut all = false;
        let mut p: Parser = Parser::new();
        p.group(SubOptions::new(2).value(&mut all, "all", true), &["W"], "");
        let err = p.parse(&argv(&["-Wextra"])).unwrap_err();
        assert_eq!(err.to_string(), "Option does not exist: -Wextra");
    }

    #[test]
    fn subcommands_have_isolated_namespaces() {
        struct Shared {
            path: String,
        }
        let ctx = Shared { path: "/srv".into() };
        let url = RefCell::new(String::new());
        let count = RefCell::new(0);
        let seen_path = RefCell::new(String::new());

        let mut verbose = false;
        let mut p: Parser<'_, Shared> = Parser::new();
        p.value(&mut verbose, &["v"], true, "");
        p.subcommand(
            "push",
            |inv| {
                seen_path.borrow_mut().push_str(&inv.context().path);
                let mut child = inv.parser();
                child.arg(&url, &["u"], "");
                child.subcommand(
                    "test",
                    |inv| {
                        let mut grandchild = inv.parser();
                        grandchild.arg(&count, &["u"], "");
                        grandchild.parse_with(inv.args(), inv.context())
                    },
                    "",
                );
                child.parse_with(inv.args(), inv.context())
            },
            "",
        );
        p.subcommand("pull", |_| Ok(Positionals::new()), "");

        let rest = p
            .parse_with(
                &argv(&["top", "-v", "push", "-u", "http://x", "mid", "test", "-u", "3", "leaf"]),
                &ctx,
            )
            .unwrap();
        assert!(verbose);
        assert_eq!(*url.borrow(), "http://x");
        assert_eq!(*count.borrow(), 3);
        assert_eq!(*seen_path.borrow(), "/srv");
        assert_eq!(rest.top_level(), ["top"]);
        assert_eq!(
            rest.nested(),
            [(0, "top"), (1, "push"), (1, "mid"), (2, "test"), (2, "leaf")]
        );
        assert_eq!(
            rest.iter().filter(|p| **p == Positional::Boundary).count(),
            2
        );
    }

    #[test]
    fn duplicate_subcommands_are_rejected() {
        let mut p: Parser = Parser::new();
        p.subcommand("go", |_| Ok(Positionals::new()), "");
        p.subcommand("go", |_| Ok(Positionals::new()), "");
        let err = p.parse(&argv(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Subcommand already used: go");
    }

    #[test]
    fn subcommand_errors_escape_the_whole_parse() {
        let mut p: Parser = Parser::new();
        p.subcommand(
            "run",
            |inv| {
                let child: Parser = inv.parser();
                child.parse(inv.args())
            },
            "",
        );
        let err = p.parse(&argv(&["run", "--bogus"])).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedOption(ref s) if s == "--bogus"));
    }

    #[test]
    fn help_is_generated_per_command_chain() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = String::new();
        let mut p: Parser = Parser::new();
        p.set_help_file_path(dir.path());
        p.set_usage("[options]");
        p.set_help_width(40);
        p.arg(&mut file, &["f", "file"], "Input file.");
        p.ignored(&["l"], "");
        p.subcommand(
            "sub",
            |inv| {
                let mut child: Parser = inv.parser();
                let help = child.generate_help(inv.name())?;
                assert!(help.path().ends_with(".prog_sub_help_file"));
                child.parse(inv.args())
            },
            "Nested command.",
        );
        let help = p.generate_help("./prog").unwrap();
        assert!(help.path().ends_with(".prog_help_file"));

        let mut printed = Vec::new();
        help.print_to(&mut printed).unwrap();
        let text = String::from_utf8(printed).unwrap();
        assert!(text.starts_with("usage: prog [options]\n"));
        assert!(text.contains("SUBCOMMANDS:\nsub\n        Nested command.\n"));
        assert!(text.contains("-f, --file\n        Input file.\n"));
        assert!(!text.contains("-l"));

        p.parse(&argv(&["sub"])).unwrap();
        assert!(dir.path().join(".prog_sub_help_file").exists());
    }

    #[test]
    fn handles_report_declarations() {
        let mut n = 0;
        let mut p: Parser = Parser::new();
        let handle = p.arg(&mut n, &["n", "number"], "How many.");
        let decl = p.declaration(handle).unwrap();
        assert_eq!(decl.aliases(), ["n", "number"]);
        assert!(decl.takes_argument());
        assert_eq!(handle.index(), 0);
    }
}
