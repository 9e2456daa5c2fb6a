use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the views from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_VIEWS: &[&str] = &[
    "source-json",
    "source-treeviz",
    "output-json",
    "output-treeviz",
];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("texweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts parsed LaTeX documents into interactive HTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-packages")
                .long("list-packages")
                .help("List extensions a \\usepackage can activate")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a texweave.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("output").index(2).value_hint(ValueHint::FilePath))
                .arg(Arg::new("title").long("title").value_hint(ValueHint::Other))
                .arg(Arg::new("css").long("css").value_hint(ValueHint::FilePath))
                .arg(
                    Arg::new("iterative")
                        .long("iterative")
                        .action(ArgAction::SetTrue),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "texweave", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "texweave", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "texweave", &outdir)?;

    Ok(())
}
