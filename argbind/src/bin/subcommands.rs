// Demo of nested subcommands. `pull` and `push` are siblings under the main
// program and `push` has its own subcommand `test`. Every level has its own
// flags: `-u` is a URL under `push` and a count under `test`.

use std::cell::RefCell;
use std::path::Path;
use std::process;

use argbind::{buffer_text, HelpFile, Invocation, Parser, Positional, Positionals, Result};

const USAGE: &str = "[options/non-options] [subcommand]\n\
\t\t[subcommand's options/non-options] [subcommand's subcommand]\n\n\
Each subcommand repeats the pattern [command] [command's options/non-options] [subcommand], \
acting like a completely new command with its own options and subcommands.";

const HEADER: &str = "This program demonstrates how subcommands work. Each subcommand behaves as if \
it were written on its own, knowing only what its parent passes to it and the help settings it \
inherits. Changing those settings in a subcommand has no effect on the parent's help message. \
'push' and 'pull' are siblings, 'push' has its own subcommand 'test', and all of them have flags \
independent of each other.";

const FOOTER: &str = "Report problems on the project page. Version information could go here too.";

/// State shared by every level of the command tree.
struct Shared {
    file_path: RefCell<String>,
    verbosity: RefCell<[u8; 20]>,
    help: RefCell<bool>,
    /// Help file of the deepest command that generated one.
    help_file: RefCell<Option<HelpFile>>,
}

/// What `push` hands to `test`.
struct PushContext<'c> {
    shared: &'c Shared,
    url: &'c RefCell<String>,
}

fn main() {
    env_logger::init();
    let argv: Vec<String> = std::env::args().collect();
    let program = argv
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map_or_else(|| "subcommands".to_string(), |name| name.to_string_lossy().into_owned());
    if let Err(e) = run(&program, &argv) {
        eprintln!("{}: {}", program, e);
        process::exit(1);
    }
}

fn run(program: &str, argv: &[String]) -> Result<()> {
    let shared = Shared {
        file_path: RefCell::new(String::new()),
        verbosity: RefCell::new([0; 20]),
        help: RefCell::new(false),
        help_file: RefCell::new(None),
    };

    let mut p: Parser<'_, Shared> = Parser::new();
    p.arg(&shared.file_path, &["path", "p"], "Dummy variable.");
    p.var(&shared.verbosity, &["v"], false, "Dummy variable.");
    p.value(&shared.help, &["h", "help"], true, "Prints this help message and exits.");
    p.subcommand(
        "pull",
        pull_prog,
        "Does something like 'git pull' if this program actually did anything.",
    );
    p.subcommand(
        "push",
        push_prog,
        "Does something like 'git push' if this program actually did anything.",
    );
    p.set_help_file_path(".");
    p.set_usage(USAGE);
    p.set_header(HEADER);
    p.set_footer(FOOTER);

    let help_file = p.generate_help(program)?;
    *shared.help_file.borrow_mut() = Some(help_file);

    let non_options = p.parse_with(argv, &shared)?;

    if *shared.help.borrow() {
        if let Some(file) = shared.help_file.borrow().as_ref() {
            file.print()?;
        }
        return Ok(());
    }

    println!("file_path: {}", shared.file_path.borrow());
    println!("verbosity: {}", buffer_text(&*shared.verbosity.borrow()));

    let mut nesting = String::new();
    for (i, positional) in non_options.iter().enumerate() {
        match positional {
            Positional::Boundary => nesting.push('\t'),
            Positional::Arg(arg) => println!("{}NON_OPTION {}: {}", nesting, i, arg),
        }
    }
    Ok(())
}

fn push_prog(inv: Invocation<'_, Shared>) -> Result<Positionals> {
    let shared = inv.context();
    let url = RefCell::new(String::new());

    let mut p: Parser<'_, PushContext<'_>> = inv.parser();
    p.arg(&url, &["u", "URL"], "Sets the URL.");
    p.value(&shared.help, &["h", "help"], true, "Displays this help message and exits.");
    p.subcommand("test", test_prog, "");
    *shared.help_file.borrow_mut() = Some(p.generate_help(inv.name())?);

    let context = PushContext { shared, url: &url };
    let non_options = p.parse_with(inv.args(), &context).map_err(|e| {
        eprintln!("INVALID ARGUMENT FOR SUBCOMMAND PUSH");
        e
    })?;

    if *shared.help.borrow() {
        return Ok(non_options);
    }
    println!();
    println!("IN SUBCOMMAND PUSH");
    println!("argc: {}", inv.args().len());
    println!("argv[0]: {}", inv.name());
    println!("file_path: {}", shared.file_path.borrow());
    println!("verbosity: {}", buffer_text(&*shared.verbosity.borrow()));
    println!("URL: {}", url.borrow());
    println!("LEAVING SUBCOMMAND PUSH");
    println!();
    Ok(non_options)
}

fn pull_prog(inv: Invocation<'_, Shared>) -> Result<Positionals> {
    let shared = inv.context();
    let mut url = String::new();
    let mut timeout = 100u64;

    let mut p: Parser<'_, Shared> = inv.parser();
    p.arg(&mut url, &["u", "URL"], "Sets the URL.");
    p.arg(&mut timeout, &["t", "timeout"], "Sets the amount of time before a timeout.");
    p.value(&shared.help, &["h", "help"], true, "Displays this help message and exits.");
    *shared.help_file.borrow_mut() = Some(p.generate_help(inv.name())?);

    let non_options = p.parse_with(inv.args(), shared).map_err(|e| {
        eprintln!("INVALID ARGUMENT FOR SUBCOMMAND PULL");
        e
    })?;

    if *shared.help.borrow() {
        return Ok(non_options);
    }
    println!();
    println!("IN SUBCOMMAND PULL");
    println!("argc: {}", inv.args().len());
    println!("argv[0]: {}", inv.name());
    println!("URL: {}", url);
    println!("Timeout: {}", timeout);
    println!("LEAVING SUBCOMMAND PULL");
    println!();
    Ok(non_options)
}

fn test_prog(inv: Invocation<'_, PushContext<'_>>) -> Result<Positionals> {
    let context = inv.context();
    let shared = context.shared;
    let mut underwear_count = 0i32;
    let mut eurl = -1.0f64;

    let mut p: Parser<'_, PushContext<'_>> = inv.parser();
    p.arg(
        &mut underwear_count,
        &["u"],
        "Sets the number of underwear currently available. Note that this has no idea \
         that '-u' was the URL in the push subcommand.",
    );
    p.arg(
        &mut eurl,
        &["e", "E", "EURL", "URL"],
        "Sets the value of EURL. Note that '--URL' and '-u' correspond to completely \
         different variables.",
    );
    p.value(&shared.help, &["h", "help"], true, "Displays this help message and exits.");
    p.set_usage("\n\tTest.");
    p.set_header(
        "Changing this header shows that help settings changed in a subcommand \
         do not affect any other help message.",
    );
    *shared.help_file.borrow_mut() = Some(p.generate_help(inv.name())?);

    let non_options = p.parse_with(inv.args(), context)?;

    if *shared.help.borrow() {
        return Ok(non_options);
    }
    println!();
    println!("IN SUBCOMMAND TEST");
    println!("argc: {}", inv.args().len());
    println!("argv[0]: {}", inv.name());
    println!("URL: {}", context.url.borrow());
    println!("underwear_count: {}", underwear_count);
    println!("EURL: {}", eurl);
    Ok(non_options)
}
