//! Command-line interface for dossier
//!
//! Renders research responses produced by the generation backend and exposes the
//! pieces of the pipeline for inspection.
//!
//! Usage:
//!   dossier render `<response.json|->` [--to `<format>`] [--output `<file>`]  - Render a response
//!   dossier detect `<report.md|->`                                        - Check for an embedded references section
//!   dossier inspect `<report.md|->`                                       - Print the parsed document outline
//!   dossier request --topic `<topic>` [--depth N] [--focus F]...          - Validate and print a request body
//!   dossier formats                                                     - List output formats

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use dossier_config::{DossierConfig, Loader};
use dossier_render::detect::ReferenceDetector;
use dossier_render::format::Format;
use dossier_render::formats::html::HtmlFormat;
use dossier_render::formats::markdown::parse_markdown;
use dossier_render::formats::treeviz::document_outline;
use dossier_render::model::{ResearchRequest, ResearchResponse};
use dossier_render::registry::FormatRegistry;
use dossier_render::viewer::ReportViewer;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    let verbosity = match matches.subcommand() {
        Some((_, sub)) => sub.get_count("verbose").max(matches.get_count("verbose")),
        None => matches.get_count("verbose"),
    };
    init_logging(verbosity);

    if let Err(err) = run(&matches) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn build_cli() -> Command {
    Command::new("dossier")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render and inspect AI-generated research reports")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
        .subcommand(
            Command::new("render")
                .about("Render a research response")
                .arg(
                    Arg::new("input")
                        .help("Response JSON file, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Output format (default: from --output extension, else html)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to this file instead of stdout"),
                )
                .arg(strictness_arg()),
        )
        .subcommand(
            Command::new("detect")
                .about("Check whether a report carries its own references section")
                .arg(
                    Arg::new("input")
                        .help("Markdown report, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(strictness_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the parsed document tree of a report")
                .arg(
                    Arg::new("input")
                        .help("Markdown report, or '-' for stdin")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("request")
                .about("Validate a research request and print its JSON body")
                .arg(
                    Arg::new("topic")
                        .long("topic")
                        .required(true)
                        .help("Research topic"),
                )
                .arg(
                    Arg::new("depth")
                        .long("depth")
                        .value_parser(clap::value_parser!(u8))
                        .default_value("3")
                        .help("Research depth, 1-5"),
                )
                .arg(
                    Arg::new("language")
                        .long("language")
                        .default_value("zh")
                        .help("Report language"),
                )
                .arg(
                    Arg::new("focus")
                        .long("focus")
                        .action(ArgAction::Append)
                        .help("Focus area (repeatable, at most 5)"),
                ),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
}

fn strictness_arg() -> Arg {
    Arg::new("strictness")
        .long("strictness")
        .value_parser(["substring", "heading"])
        .help("How references markers are matched (overrides configuration)")
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("render", sub)) => handle_render_command(matches, sub),
        Some(("detect", sub)) => handle_detect_command(matches, sub),
        Some(("inspect", sub)) => handle_inspect_command(sub),
        Some(("request", sub)) => handle_request_command(sub),
        Some(("formats", _)) => {
            handle_formats_command();
            Ok(())
        }
        _ => bail!("no command given, see --help"),
    }
}

/// Defaults, then the --config file, then command-line overrides.
fn load_config(matches: &ArgMatches, sub: &ArgMatches) -> Result<DossierConfig> {
    let mut loader = Loader::new();
    let path = sub
        .get_one::<String>("config")
        .or_else(|| matches.get_one::<String>("config"));
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    if let Some(strictness) = sub.get_one::<String>("strictness") {
        loader = loader.set_override("detection.strictness", strictness.as_str())?;
    }
    let config = loader.build().context("failed to load configuration")?;
    tracing::debug!(
        strictness = ?config.detection.strictness,
        markers = config.detection.markers.len(),
        "configuration loaded"
    );
    Ok(config)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

fn handle_render_command(matches: &ArgMatches, sub: &ArgMatches) -> Result<()> {
    let config = load_config(matches, sub)?;
    let input = sub
        .get_one::<String>("input")
        .context("input is required")?;
    let source = read_input(input)?;
    let response: ResearchResponse = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a valid research response", input))?;

    let mut registry = FormatRegistry::with_defaults();
    registry.register(HtmlFormat::from_config(&config.rendering));

    let output = sub.get_one::<String>("output");
    let format = match (sub.get_one::<String>("to"), output) {
        (Some(name), _) => registry.get(name)?,
        (None, Some(path)) => Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| registry.for_extension(ext))
            .map_or_else(|| registry.get("html"), Ok)?,
        (None, None) => registry.get("html")?,
    };

    let mut viewer = ReportViewer::from_config(&config);
    viewer.receive(response);
    let page = viewer.render();
    let rendered = format.serialize(&page)?;

    match output {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("failed to write {}", path))?;
            tracing::info!(path = %path, format = format.name(), "report written");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn handle_detect_command(matches: &ArgMatches, sub: &ArgMatches) -> Result<()> {
    let config = load_config(matches, sub)?;
    let input = sub
        .get_one::<String>("input")
        .context("input is required")?;
    let text = read_input(input)?;

    let detector = ReferenceDetector::from_config(&config.detection);
    let detection = detector.evaluate(&text);
    if detection.needs_separate_section() {
        println!("show");
    } else {
        println!("suppress");
    }
    if let Some(marker) = detection.marker {
        println!("marker: {}", marker);
    }
    Ok(())
}

fn handle_inspect_command(sub: &ArgMatches) -> Result<()> {
    let input = sub
        .get_one::<String>("input")
        .context("input is required")?;
    let text = read_input(input)?;
    print!("{}", document_outline(&parse_markdown(&text)));
    Ok(())
}

fn handle_request_command(sub: &ArgMatches) -> Result<()> {
    let topic = sub
        .get_one::<String>("topic")
        .context("topic is required")?;
    let mut request = ResearchRequest::new(topic.trim());
    if let Some(depth) = sub.get_one::<u8>("depth") {
        request.depth = *depth;
    }
    if let Some(language) = sub.get_one::<String>("language") {
        request.language = language.clone();
    }
    request.focus_areas = sub
        .get_many::<String>("focus")
        .map(|areas| areas.map(|area| area.trim().to_string()).collect())
        .unwrap_or_default();

    request.validate().context("invalid research request")?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            let extensions = format.file_extensions().join(", ");
            if extensions.is_empty() {
                println!("  {:<10} {}", name, format.description());
            } else {
                println!("  {:<10} {} ({})", name, format.description(), extensions);
            }
        }
    }
}
