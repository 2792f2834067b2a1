// Demo of nested sub-option groups in the style of gcc's -W flag:
// `-Wall`, `-Wno-sign-conversion`, `-Werror-level=3`, `-Dconfig=debug`.

use std::cell::RefCell;
use std::path::Path;
use std::process;

use argbind::{Parser, Positional, Result, SubOptions};

const HEADER: &str = "This program shows that the library can emulate gcc's -W flag for several \
variables at once. The library keeps all of this text within whatever help width you specify. \
The default is 80 columns, but this program uses 90 to show that it can be changed.";

const USAGE: &str = "[options/non-options]\n\n\
These demo programs don't have any structure to their options/non-options, so there is nothing \
more specific to say.";

const FOOTER: &str = "Report problems on the project page. Version information could go here too.";

fn main() {
    env_logger::init();
    let argv: Vec<String> = std::env::args().collect();
    let program = argv
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map_or_else(|| "suboptions".to_string(), |name| name.to_string_lossy().into_owned());
    if let Err(e) = run(&program, &argv) {
        eprintln!("{}: {}", program, e);
        process::exit(1);
    }
}

fn run(program: &str, argv: &[String]) -> Result<()> {
    let mut filename = String::from("a.out");
    let mut recursion_level = -1i32;
    let mut probability_of_success = 0.0001f64;
    let mut standard_input_hyphen = false;
    let mut verbosity = 0usize;

    let w_sign_conversion = RefCell::new(true);
    let mut w_all = false;
    let mut w_extra = false;
    let mut w_error_level = 1i32;
    let mut w_warning_level = 1i32;
    let w_type = RefCell::new('x');

    let mut d_ignore_parentheses = false;
    let d_allow_infinite_recursion = RefCell::new(false);
    let mut d_configuration_name = String::new();
    let mut d_debug_level = 0i32;

    let mut help = false;

    let mut p: Parser = Parser::new();
    p.arg(
        &mut filename,
        &["f", "file", "filename"],
        "Dummy variable for some sort of file name, usually an input or an output file.",
    );
    p.arg(
        &mut recursion_level,
        &["r", "recursion", "max-depth"],
        "Dummy variable for some sort of recursion limit.",
    );
    p.arg(
        &mut probability_of_success,
        &["p", "prob", "probability"],
        "Determines the probability that this program will work.",
    );
    p.repeated(&mut verbosity, &["v"], "Dummy verbosity level.");
    p.value(
        &mut standard_input_hyphen,
        &["-"],
        true,
        "Shows that the standard input hyphen still works alongside sub-option groups.",
    );
    p.ignored(&["l", "library"], "Position dependent, kept among the non-options.");

    let w_options = SubOptions::new(100)
        .value(&w_sign_conversion, "sign-conversion", true)
        .value(&w_sign_conversion, "no-sign-conversion", false)
        .value(&mut w_all, "all", true)
        .value(&mut w_extra, "extra", true)
        .value(&w_type, "file", 'f')
        .value(&w_type, "dir", 'd')
        .value(&w_type, "link", 'l')
        .value(&w_type, "any", 'a')
        .arg(&mut w_error_level, "error-level")
        .arg(&mut w_warning_level, "warning-level");
    p.group(
        w_options,
        &["W"],
        "Warning settings. Sub-options are documented separately from this help message.",
    );

    let d_options = SubOptions::new(100)
        .value(&mut d_ignore_parentheses, "ignore-parentheses", true)
        .value(&d_allow_infinite_recursion, "allow-infinite-recursion", true)
        .value(&d_allow_infinite_recursion, "no-infinite-recursion", false)
        .arg(&mut d_configuration_name, "config")
        .arg(&mut d_debug_level, "level");
    p.group(d_options, &["D"], "Debug settings.");

    p.value(&mut help, &["help", "h"], true, "Displays this help message and exits.");

    p.set_header(HEADER);
    p.set_usage(USAGE);
    p.set_footer(FOOTER);
    p.set_help_width(90);
    p.set_help_file_path(".");

    let help_file = p.generate_help(program)?;
    let non_options = p.parse(argv)?;

    if help {
        return help_file.print();
    }

    println!("--------------------STANDARD--------------------");
    println!("filename:\t{}", filename);
    println!("recursion:\t{}", recursion_level);
    println!("probability_of_success:\t{}", probability_of_success);
    println!("standard_input_hyphen:\t{}", standard_input_hyphen);
    println!("verbosity:\t{}", verbosity);

    println!("--------------------W FLAGS---------------------");
    println!("w_sign_conversion:\t{}", w_sign_conversion.borrow());
    println!("w_all:\t{}", w_all);
    println!("w_extra:\t{}", w_extra);
    println!("w_error_level:\t{}", w_error_level);
    println!("w_warning_level:\t{}", w_warning_level);
    println!("w_type:\t{}", w_type.borrow());

    println!("--------------------D FLAGS---------------------");
    println!("d_ignore_parentheses:\t{}", d_ignore_parentheses);
    println!("d_allow_infinite_recursion:\t{}", d_allow_infinite_recursion.borrow());
    println!("d_configuration_name:\t{}", d_configuration_name);
    println!("d_debug_level:\t{}", d_debug_level);

    for (i, positional) in non_options.iter().enumerate() {
        if let Positional::Arg(arg) = positional {
            println!("NON_OPTION {}:\t{}", i, arg);
        }
    }
    Ok(())
}
