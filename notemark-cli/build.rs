use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() in src/main.rs
// Build scripts can't access src/ modules, so the command tree is duplicated here
fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or - for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("notemark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert and normalize notemark markdown notes")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .arg(input_arg())
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_parser(["markdown", "json", "html"]),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(["markdown", "json"]),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Normalize a markdown note")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("paste")
                .about("Convert clipboard HTML to markdown")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("check-href")
                .about("Check a link target against the scheme allow-list")
                .arg(
                    Arg::new("href")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::Url),
                ),
        )
        .subcommand(
            Command::new("outline")
                .about("List the headings and linked references of a note")
                .arg(input_arg()),
        );

    generate_to(Bash, &mut cmd, "notemark", &outdir)?;
    generate_to(Zsh, &mut cmd, "notemark", &outdir)?;
    generate_to(Fish, &mut cmd, "notemark", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
