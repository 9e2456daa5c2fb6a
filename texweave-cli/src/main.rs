// Command-line interface for texweave
//
// This binary converts parsed LaTeX document trees (JSON, as emitted by an external parser)
// into self-contained interactive HTML pages.
//
// The inspect command is a development aid: it shows the source tree as read and the output
// tree built by the converter, before rendering.
//
// Usage:
//  texweave <input> [output]                 - Convert to HTML (default command)
//  texweave convert <input> [output]         - Same as above (explicit)
//  texweave inspect <input> [<view>]         - Show a tree view (defaults to "output-treeviz")
//  texweave --list-packages                  - List known extensions
//
// The output path defaults to the input path with an .html extension; "-" writes to stdout.
//
// Configuration is layered: built-in defaults, then texweave.toml in the working directory,
// then the file given with --config, then command-line flags.

mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::fs;
use std::path::{Path, PathBuf};
use texweave::{convert_document, ConvertOptions, ExtensionRegistry, SourceNode};
use texweave_config::{Loader, TexweaveConfig};

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "help"];

fn build_cli() -> Command {
    Command::new("texweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts parsed LaTeX documents into interactive HTML")
        .long_about(
            "texweave turns a parsed LaTeX document tree (JSON) into a single HTML page with\n\
            numbered sections and theorems, collapsible proofs, hover previews on references\n\
            and citations, and math left for MathJax to typeset.\n\n\
            Examples:\n  \
            texweave paper.json                      # Writes paper.html\n  \
            texweave paper.json out/index.html       # Explicit output path\n  \
            texweave paper.json - --title Notes      # To stdout, custom title\n  \
            texweave inspect paper.json              # Output tree visualization",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .help("Log more (repeat for debug and trace output)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Log nothing")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the source or output tree of a document")
                .long_about(
                    "View a document at different stages of the conversion.\n\n\
                    Views (stage-format):\n  \
                    - source-treeviz:  parsed source as tree visualization\n  \
                    - source-json:     parsed source as JSON\n  \
                    - output-treeviz:  output tree as tree visualization (default)\n  \
                    - output-json:     output tree as JSON",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the JSON source tree")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to show. Defaults to 'output-treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_VIEWS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a document to HTML (default command)")
                .arg(
                    Arg::new("input")
                        .help("Path to the JSON source tree")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .help("Output path (defaults to the input with an .html extension, '-' for stdout)")
                        .required(false)
                        .index(2)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("Page title")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("css")
                        .long("css")
                        .value_name("PATH")
                        .help("CSS file appended after the built-in styles")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("iterative")
                        .long("iterative")
                        .help("Walk the source with an explicit stack (for very deep documents)")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Parse `args`, injecting `convert` when the first argument is not a subcommand.
fn parse_args(cli: Command, args: &[String]) -> Result<ArgMatches, clap::Error> {
    match cli.clone().try_get_matches_from(args) {
        Ok(matches) => Ok(matches),
        Err(err) => {
            let injectable = args
                .get(1)
                .is_some_and(|first| !first.starts_with('-') && !SUBCOMMANDS.contains(&first.as_str()));
            if !injectable {
                return Err(err);
            }
            let mut injected = vec![args[0].clone(), "convert".to_string()];
            injected.extend_from_slice(&args[1..]);
            cli.try_get_matches_from(&injected)
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let matches = parse_args(build_cli(), &args).unwrap_or_else(|err| err.exit());

    init_logging(matches.get_count("verbose"), matches.get_flag("quiet"));

    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());

    if matches.get_flag("list-packages") {
        let config = load_cli_config(config_path, Vec::new());
        handle_list_packages_command(&config);
        return;
    }

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                fail("missing input path");
            };
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_VIEW);
            let config = load_cli_config(config_path, Vec::new());
            handle_inspect_command(path, view, &config);
        }
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("missing input path");
            };
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let config = load_cli_config(config_path, convert_overrides(sub_matches));
            handle_convert_command(input, output, &config);
        }
        _ => fail("unknown subcommand. Use --help for usage information."),
    }
}

/// Default level is `warn`; `-v` raises it, `-q` silences it, `RUST_LOG` wins over both.
fn init_logging(verbosity: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(format!("cannot read '{path}': {e}")))
}

/// Handle the convert command
fn handle_convert_command(input: &str, output: Option<&str>, config: &TexweaveConfig) {
    let json = read_source(input);
    let source = SourceNode::from_json(&json)
        .unwrap_or_else(|e| fail(format!("invalid source tree in '{input}': {e}")));

    let options = ConvertOptions::from(config);
    let result = convert_document(&source, &options).unwrap_or_else(|e| fail(e));
    log::info!(
        "converted '{input}' with {} diagnostic(s)",
        result.diagnostics.len()
    );

    match output {
        Some("-") => print!("{}", result.html),
        _ => {
            let path = output_path(input, output);
            if path == Path::new(input) {
                fail(format!("output would overwrite the input '{input}'"));
            }
            fs::write(&path, result.html)
                .unwrap_or_else(|e| fail(format!("cannot write '{}': {e}", path.display())));
            log::info!("wrote {}", path.display());
        }
    }
}

fn output_path(input: &str, output: Option<&str>) -> PathBuf {
    match output {
        Some(path) => PathBuf::from(path),
        None => Path::new(input).with_extension("html"),
    }
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, view: &str, config: &TexweaveConfig) {
    let json = read_source(path);
    let output = transforms::execute_view(&json, view, &ConvertOptions::from(config)).unwrap_or_else(|e| fail(e));
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the list-packages command
fn handle_list_packages_command(config: &TexweaveConfig) {
    let registry = ExtensionRegistry::with_defaults();
    let packages = &config.convert.packages;
    println!("Available packages:\n");
    for name in registry.list_extensions() {
        let mut notes = Vec::new();
        if !packages.enabled.contains(&name) {
            notes.push("disabled");
        }
        if packages.preload.contains(&name) {
            notes.push("preloaded");
        }
        if notes.is_empty() {
            println!("  {name}");
        } else {
            println!("  {name} ({})", notes.join(", "));
        }
    }
}

/// Config keys set by `convert` flags.
fn convert_overrides(matches: &ArgMatches) -> Vec<(&'static str, String)> {
    let mut overrides = Vec::new();
    if let Some(title) = matches.get_one::<String>("title") {
        overrides.push(("convert.html.title", title.clone()));
    }
    if let Some(path) = matches.get_one::<String>("css") {
        let css = fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("cannot read CSS file '{path}': {e}")));
        overrides.push(("convert.html.custom_css", css));
    }
    if matches.get_flag("iterative") {
        overrides.push(("convert.traversal.strategy", "iterative".to_string()));
    }
    overrides
}

fn load_cli_config(
    explicit_path: Option<&str>,
    overrides: Vec<(&'static str, String)>,
) -> TexweaveConfig {
    let loader = Loader::new().with_project_file(".");
    let mut loader = if let Some(path) = explicit_path {
        loader.with_config_file(path)
    } else {
        loader
    };
    for (key, value) in overrides {
        loader = loader
            .set_override(key, value)
            .unwrap_or_else(|err| fail(format!("invalid setting '{key}': {err}")));
    }

    loader
        .build()
        .unwrap_or_else(|err| fail(format!("failed to load configuration: {err}")))
}
