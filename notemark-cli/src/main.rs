// Command-line interface for notemark
//
// This binary is a thin shell over the notemark-babel codec: converting notes between markdown,
// block JSON and clipboard HTML, normalizing markdown, and a few queries the editor's
// collaborators use (outline, linked references, href checks).
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  notemark <input> --to <format> [--from <format>] [--output <file>]          - Convert (default)
//  notemark convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above
//  notemark format <input>        - Normalize markdown to stdout
//  notemark paste <input>         - Clipboard HTML to markdown on stdout
//  notemark check-href <href>     - Print the href if its scheme is allowed, exit 1 otherwise
//  notemark outline <input>       - Headings and linked-reference targets
//
// Any <input> may be `-` to read stdin.
//
// Extra Parameters:
//
// Codec settings can be overridden per run with --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and applies the value over the loaded configuration.
// Example:
//  notemark format note.md --extra-list-indent 4

use clap::{Arg, ArgAction, Command, ValueHint};
use notemark_babel::formats::JsonFormat;
use notemark_babel::{
    html_to_markdown_with_options, linked_references, normalize, outline, parse_with_options,
    sanitize_href, FormatRegistry,
};
use notemark_config::{Loader, NotemarkConfig};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "format", "paste", "check-href", "outline", "help"];

/// Splits `--extra-<key> [value]` pairs out of the raw arguments.
///
/// A key with no following value (end of args, or another flag next) is
/// a boolean switch and maps to "true". `--extras-<key>` is accepted too.
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        let Some(key) = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"))
        else {
            cleaned_args.push(arg.clone());
            continue;
        };

        let value = match iter.peek() {
            Some(next) if !next.starts_with('-') => iter.next().cloned(),
            _ => None,
        };
        extra_params.insert(key.to_string(), value.unwrap_or_else(|| "true".to_string()));
    }

    (cleaned_args, extra_params)
}

fn input_arg(help: &'static str) -> Arg {
    Arg::new("input")
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("notemark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert and normalize notemark markdown notes")
        .long_about(
            "notemark converts notes between the editor's markdown dialect, block JSON\n\
            and clipboard HTML.\n\n\
            Commands:\n  \
            - convert:    Transform between formats (markdown, json, html)\n  \
            - format:     Normalize markdown to its canonical form\n  \
            - paste:      Convert clipboard HTML to markdown\n  \
            - check-href: Test a link target against the scheme allow-list\n  \
            - outline:    List headings and linked references\n\n\
            Extra Parameters:\n  \
            --extra-list-indent <n>          Spaces per nested list level\n  \
            --extra-diagram-language <tag>   Fence tag for diagram blocks\n  \
            --extra-json-pretty <bool>       Pretty-print block JSON\n\n\
            Examples:\n  \
            notemark note.md --to json               # Blocks as JSON (stdout)\n  \
            notemark blocks.json --to markdown       # Back to markdown\n  \
            notemark format note.md                  # Canonical markdown\n  \
            pbpaste -Prefer html | notemark paste -  # Paste HTML as markdown",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a notemark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log codec decisions to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Note markdown (.md, .markdown)\n  \
                    - json:     Block records (.json)\n  \
                    - html:     Clipboard HTML, input only (.html, .htm)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(input_arg("Input file path, or - for stdin"))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Normalize a markdown note")
                .long_about(
                    "Parses the note and re-serializes it in canonical form.\n\
                    Formatting canonical text leaves it unchanged.\n\n\
                    Output is always written to stdout.",
                )
                .arg(input_arg("Markdown file path, or - for stdin")),
        )
        .subcommand(
            Command::new("paste")
                .about("Convert clipboard HTML to markdown")
                .arg(input_arg("HTML file path, or - for stdin")),
        )
        .subcommand(
            Command::new("check-href")
                .about("Check a link target against the scheme allow-list")
                .arg(
                    Arg::new("href")
                        .help("Link target to check")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::Url),
                ),
        )
        .subcommand(
            Command::new("outline")
                .about("List the headings and linked references of a note")
                .arg(input_arg("Markdown file path, or - for stdin")),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file as first argument means `convert`.
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_flag("verbose"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    if let Err(err) = config.validate() {
        eprintln!("Invalid configuration: {err}");
        std::process::exit(1);
    }
    for key in extra_params.keys() {
        eprintln!("Warning: ignoring unknown parameter --extra-{key}");
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let registry = registry_from_config(&config);

            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => match registry.detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                },
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output);
        }
        Some(("format", sub_matches)) => {
            handle_format_command(required(sub_matches, "input"), &config);
        }
        Some(("paste", sub_matches)) => {
            handle_paste_command(required(sub_matches, "input"), &config);
        }
        Some(("check-href", sub_matches)) => {
            handle_check_href_command(required(sub_matches, "href"));
        }
        Some(("outline", sub_matches)) => {
            handle_outline_command(required(sub_matches, "input"), &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a clap::ArgMatches, id: &str) -> &'a str {
    match matches.get_one::<String>(id) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Missing required argument '{id}'");
            std::process::exit(2);
        }
    }
}

/// Logs go to stderr so stdout only ever carries converted output.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reads a file, or stdin when `path` is `-`.
fn read_input(path: &str) -> String {
    if path == "-" {
        let mut source = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {e}");
            std::process::exit(1);
        }
        return source;
    }
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn registry_from_config(config: &NotemarkConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::with_options(config.codec_options());
    registry.register(JsonFormat::new(config.convert.json_pretty));
    registry
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
) {
    let source = read_input(input);
    debug!(from, to, bytes = source.len(), "converting");

    let text = registry.convert(&source, from, to).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{text}"),
    }
}

/// Handle the format command
fn handle_format_command(input: &str, config: &NotemarkConfig) {
    let source = read_input(input);
    print!("{}", normalize(&source, &config.codec_options()));
}

/// Handle the paste command
fn handle_paste_command(input: &str, config: &NotemarkConfig) {
    let html = read_input(input);
    print!(
        "{}",
        html_to_markdown_with_options(&html, &config.codec_options())
    );
}

/// Handle the check-href command
fn handle_check_href_command(href: &str) {
    match sanitize_href(href) {
        Some(accepted) => println!("{accepted}"),
        None => {
            eprintln!("Rejected: '{href}' does not use an allowed scheme");
            std::process::exit(1);
        }
    }
}

/// Handle the outline command
fn handle_outline_command(input: &str, config: &NotemarkConfig) {
    let source = read_input(input);
    let doc = parse_with_options(&source, &config.codec_options());

    for entry in outline(&doc) {
        let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
        println!("{indent}{}", entry.text);
    }

    let references = linked_references(&doc);
    if !references.is_empty() {
        println!();
        println!("Linked references:");
        for reference in references {
            println!("  {}", reference.target);
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> NotemarkConfig {
    let loader = Loader::new().with_optional_file("notemark.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut NotemarkConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["list-indent", "indent"]) {
        config.codec.list_indent = match raw.parse::<usize>() {
            Ok(width) if width > 0 => width,
            _ => {
                eprintln!("Invalid list indent '{raw}' for --extra-list-indent");
                std::process::exit(1);
            }
        };
    }
    if let Some(raw) = take_override(extra_params, &["diagram-language", "diagram"]) {
        config.codec.diagram_language = raw;
    }
    if let Some(raw) = take_override(extra_params, &["json-pretty", "pretty"]) {
        config.convert.json_pretty = parse_bool_arg("json-pretty", &raw);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
