use std::fs;

use test_driver::{run, DemoRun};

fn demo(binary: &str, args: &[&str]) -> DemoRun {
    run(binary, args).unwrap_or_else(|e| panic!("failed to run {binary}: {e}"))
}

fn non_options(out: &DemoRun) -> Vec<String> {
    out.stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim_start_matches('\t');
            let rest = line.strip_prefix("NON_OPTION ")?;
            let (_, arg) = rest.split_once(':')?;
            Some(arg.trim().to_string())
        })
        .collect()
}

// ============================================================================
// basic
// ============================================================================

#[test]
fn basic_defaults() {
    let out = demo("basic", &[]);
    assert!(out.success(), "stderr: {}", out.stderr);
    assert_eq!(out.field("filename"), Some("a.out"));
    assert_eq!(out.field("recursion"), Some("-1"));
    assert_eq!(out.field("flag"), Some("'-'"));
    assert_eq!(out.field("probability_of_success"), Some("0.0001"));
    assert_eq!(out.field("verbosity"), Some("0"));
    assert_eq!(out.field("List of ints"), Some("[  ]"));
    assert!(non_options(&out).is_empty());
}

#[test]
fn basic_binds_every_kind() {
    let out = demo(
        "basic",
        &[
            "-f", "in.txt", "--recursion=4", "-p0.5", "-vvv", "-b", "-i", "1", "--list=2",
            "-DNDEBUG", "-", "first", "-lm", "second",
        ],
    );
    assert!(out.success(), "stderr: {}", out.stderr);
    assert_eq!(out.field("filename"), Some("in.txt"));
    assert_eq!(out.field("recursion"), Some("4"));
    assert_eq!(out.field("flag"), Some("'b'"));
    assert_eq!(out.field("probability_of_success"), Some("0.5"));
    assert_eq!(out.field("standard_input_hyphen"), Some("-"));
    assert_eq!(out.field("verbosity"), Some("3"));
    assert_eq!(out.field("List of ints"), Some("[ 1, 2 ]"));
    assert_eq!(out.field("List of ints size"), Some("2"));
    assert_eq!(out.field("List of declarations"), Some("[ NDEBUG ]"));
    assert_eq!(non_options(&out), ["first", "-lm", "second"]);
}

#[test]
fn basic_double_dash_ends_options() {
    let out = demo("basic", &["--", "-f", "--help"]);
    assert!(out.success(), "stderr: {}", out.stderr);
    assert_eq!(out.field("filename"), Some("a.out"));
    assert_eq!(non_options(&out), ["-f", "--help"]);
}

#[test]
fn basic_unknown_option_exits_with_error() {
    let out = demo("basic", &["--bogus"]);
    assert_eq!(out.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert_eq!(out.stderr.trim(), "basic: Unrecognized option: --bogus");
}

#[test]
fn basic_missing_argument_exits_with_error() {
    let out = demo("basic", &["-f"]);
    assert_eq!(out.code(), Some(1));
    assert_eq!(out.stderr.trim(), "basic: Option requires arguments: -f");
}

#[test]
fn basic_ignored_flag_in_bundle_is_rejected() {
    let out = demo("basic", &["-vl"]);
    assert_eq!(out.code(), Some(1));
    assert!(out.stderr.starts_with("basic: "), "stderr: {}", out.stderr);
}

#[test]
fn basic_help_prints_generated_file() {
    let out = demo("basic", &["--help"]);
    assert!(out.success(), "stderr: {}", out.stderr);
    assert!(out.stdout.starts_with("usage: basic"), "stdout: {}", out.stdout);
    assert!(out.stdout.contains("OPTIONS:"));
    assert!(out.stdout.contains("-f, --file, --filename"));
    assert!(!out.stdout.contains("filename:\t"));

    let written = fs::read_to_string(out.help_file(&["basic"])).unwrap();
    assert_eq!(written, out.stdout);
}

// ============================================================================
// subcommands
// ============================================================================

#[test]
fn subcommands_top_level_only() {
    let out = demo("subcommands", &["-vvv", "--path=/tmp", "loose"]);
    assert!(out.success(), "stderr: {}", out.stderr);
    assert_eq!(out.field("file_path"), Some("/tmp"));
    assert_eq!(out.field("verbosity"), Some("vvv"));
    assert_eq!(non_options(&out), ["loose"]);
    assert!(!out.stdout.contains("IN SUBCOMMAND"));
}

#[test]
fn subcommands_nested_chain() {
    let out = demo(
        "subcommands",
        &["-p", "root", "a", "push", "-u", "example.org", "b", "test", "-u", "7", "--URL=2.5", "c"],
    );
    assert!(out.success(), "stderr: {}", out.stderr);

    let test_at = out.stdout.find("IN SUBCOMMAND TEST").unwrap();
    let push_at = out.stdout.find("IN SUBCOMMAND PUSH").unwrap();
    assert!(test_at < push_at, "innermost subcommand finishes first");

    assert!(out.stdout.contains("URL: example.org"));
    assert!(out.stdout.contains("underwear_count: 7"));
    assert!(out.stdout.contains("EURL: 2.5"));
    assert!(out.stdout.contains("file_path: root"));
    assert_eq!(non_options(&out), ["a", "push", "b", "test", "c"]);
    assert!(out.stdout.contains("\tNON_OPTION 2: push"));
    assert!(out.stdout.contains("\t\tNON_OPTION 6: c"));
}

#[test]
fn subcommands_flags_stay_with_their_command() {
    let out = demo("subcommands", &["pull", "-u", "host", "-t", "30"]);
    assert!(out.success(), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("IN SUBCOMMAND PULL"));
    assert!(out.stdout.contains("URL: host"));
    assert!(out.stdout.contains("Timeout: 30"));

    // -t belongs to pull only.
    let out = demo("subcommands", &["push", "-t", "30"]);
    assert_eq!(out.code(), Some(1));
    assert!(out.stderr.contains("INVALID ARGUMENT FOR SUBCOMMAND PUSH"));
    assert!(out.stderr.contains("subcommands: Unrecognized option: -t"));
}

#[test]
fn subcommands_help_comes_from_deepest_command() {
    let out = demo("subcommands", &["push", "test", "--help"]);
    assert!(out.success(), "stderr: {}", out.stderr);
    assert!(out.stdout.starts_with("usage: subcommands push test"), "stdout: {}", out.stdout);
    assert!(out.stdout.contains("Changing this header"));
    assert!(!out.stdout.contains("IN SUBCOMMAND"));

    assert!(out.help_file(&["subcommands"]).exists());
    assert!(out.help_file(&["subcommands", "push"]).exists());
    assert!(out.help_file(&["subcommands", "push", "test"]).exists());
    assert!(!out.help_file(&["subcommands", "pull"]).exists());

    let top = fs::read_to_string(out.help_file(&["subcommands"])).unwrap();
    assert!(top.contains("SUBCOMMANDS:"));
    assert!(top.contains("pull"));
    assert!(!top.contains("Changing this header"));
}

// ============================================================================
// suboptions
// ============================================================================

#[test]
fn suboptions_defaults() {
    let out = demo("suboptions", &[]);
    assert!(out.success(), "stderr: {}", out.stderr);
    assert_eq!(out.field("w_sign_conversion"), Some("true"));
    assert_eq!(out.field("w_all"), Some("false"));
    assert_eq!(out.field("w_type"), Some("x"));
    assert_eq!(out.field("d_debug_level"), Some("0"));
}

#[test]
fn suboptions_set_grouped_variables() {
    let out = demo(
        "suboptions",
        &[
            "-Wall", "-Wno-sign-conversion", "-Werror-level=3", "-W", "dir", "-Dconfig=debug",
            "-Dlevel=2", "-Dallow-infinite-recursion", "-vv", "input",
        ],
    );
    assert!(out.success(), "stderr: {}", out.stderr);
    assert_eq!(out.field("w_sign_conversion"), Some("false"));
    assert_eq!(out.field("w_all"), Some("true"));
    assert_eq!(out.field("w_extra"), Some("false"));
    assert_eq!(out.field("w_error_level"), Some("3"));
    assert_eq!(out.field("w_warning_level"), Some("1"));
    assert_eq!(out.field("w_type"), Some("d"));
    assert_eq!(out.field("d_configuration_name"), Some("debug"));
    assert_eq!(out.field("d_debug_level"), Some("2"));
    assert_eq!(out.field("d_allow_infinite_recursion"), Some("true"));
    assert_eq!(out.field("verbosity"), Some("2"));
    assert_eq!(non_options(&out), ["input"]);
}

#[test]
fn suboptions_unknown_name_exits_with_error() {
    let out = demo("suboptions", &["-Wbogus"]);
    assert_eq!(out.code(), Some(1));
    assert_eq!(out.stderr.trim(), "suboptions: Option does not exist: -Wbogus");
}

#[test]
fn suboptions_value_rejects_argument() {
    let out = demo("suboptions", &["-Wall=yes"]);
    assert_eq!(out.code(), Some(1));
    assert_eq!(out.stderr.trim(), "suboptions: Option does not take arguments: -Wall");
}
