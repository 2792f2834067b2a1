// Demo of the basic binding kinds: direct, counter, fixed value, ignored,
// accumulator, and the stdin hyphen.

use std::cell::RefCell;
use std::path::Path;
use std::process;

use argbind::{Parser, Positional, Result};

const HEADER: &str = "This test program demonstrates the basic functionality of this library. \
Other demo programs show the more advanced features. The header is deliberately long so that \
the help formatter has to break it into several lines, which shows that wrapping works.";

const USAGE: &str = "[options/non-options]\n\n\
It doesn't really matter what you put here since none of the positions matter.";

const FOOTER: &str = "Report problems on the project page. Version information could go here too.";

fn main() {
    env_logger::init();
    let argv: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&argv) {
        eprintln!("{}: {}", program_name(&argv), e);
        process::exit(1);
    }
}

fn program_name(argv: &[String]) -> String {
    argv.first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map_or_else(|| "basic".to_string(), |name| name.to_string_lossy().into_owned())
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn run(argv: &[String]) -> Result<()> {
    let mut filename = String::from("a.out");
    let mut recursion_level = -1i32;
    let flag = RefCell::new('-');
    let mut probability_of_success = 0.0001f64;
    let mut standard_input_hyphen = String::new();
    let mut verbosity = 0usize;
    let mut help = false;
    let mut list_of_ints: Vec<i32> = Vec::new();
    let mut list_of_declarations: Vec<String> = Vec::new();

    let mut p: Parser = Parser::new();
    p.set_header(HEADER);
    p.set_usage(USAGE);
    p.set_footer(FOOTER);
    p.set_help_file_path(".");

    p.arg(
        &mut filename,
        &["f", "file", "filename"],
        "Determines the file to be read. In this program, though, it doesn't do anything.",
    );
    p.arg(
        &mut recursion_level,
        &["r", "recursion", "max-depth"],
        "Maximum level of recursion allowed before nothing happens.",
    );
    p.arg(
        &mut probability_of_success,
        &["p", "prob", "probability"],
        "Sets the probability of this program working properly.",
    );
    p.repeated(
        &mut verbosity,
        &["v"],
        "Verbosity: -v is a little verbose, -vvvv is very verbose.",
    );
    // Three flags, one variable.
    p.value(&flag, &["flag", "a"], 'a', "Sets the flag variable to 'a'.");
    p.value(&flag, &["no-flag", "b"], 'b', "Same as --flag, -a, but sets it to 'b'.");
    p.value(&flag, &["some-flag", "c"], 'c', "Same as --flag, -a, but sets it to 'c'.");
    p.arg(
        &mut standard_input_hyphen,
        &["-"],
        "The standard input hyphen. It is only here to show that it can be parsed.",
    );
    p.ignored(
        &["l", "library"],
        "Like gcc's -l flag: position dependent, so it is kept among the non-options.",
    );
    p.value(&mut help, &["h", "help"], true, "Prints this help message and exits.");
    p.vector(&mut list_of_ints, &["i", "list"], "Collects integers, one per occurrence.");
    p.vector(&mut list_of_declarations, &["D"], "Collects strings, one per occurrence.");

    let help_file = p.generate_help(&program_name(argv))?;
    let non_options = p.parse(argv)?;

    if help {
        return help_file.print();
    }

    println!("filename:\t{}", filename);
    println!("recursion:\t{}", recursion_level);
    println!("flag:\t\t'{}'", flag.borrow());
    println!("probability_of_success:\t{}", probability_of_success);
    println!("standard_input_hyphen:\t{}", standard_input_hyphen);
    println!("verbosity:\t{}", verbosity);
    println!("List of ints:\t[ {} ]", join(&list_of_ints));
    println!("List of ints size:\t{}", list_of_ints.len());
    println!("List of declarations:\t[ {} ]", join(&list_of_declarations));
    for (i, positional) in non_options.iter().enumerate() {
        if let Positional::Arg(arg) = positional {
            println!("NON_OPTION {}:\t{}", i, arg);
        }
    }
    Ok(())
}
