//! Fabula CLI entry point.

use fabula_debug::TraceOutput;
use fabula_runtime::{Repl, Session, SessionConfig};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<PathBuf>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
    origin: Option<String>,
    count: Option<usize>,
    seed: Option<u64>,
    rules: Vec<String>,
    trace: bool,
    json: bool,
}

fn main() -> ExitCode {
    fabula_runtime::init_tracing();
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

/// Returns the value following option `name`.
fn value<'a>(args: &'a [String], i: &mut usize, name: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{name} requires a value"))
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--trace" => config.trace = true,
            "--json" => config.json = true,
            "--origin" => config.origin = Some(value(args, &mut i, "--origin")?.to_string()),
            "--rule" => config.rules.push(value(args, &mut i, "--rule")?.to_string()),
            "--count" => {
                let raw = value(args, &mut i, "--count")?;
                config.count = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid --count value: {raw}"))?,
                );
            }
            "--seed" => {
                let raw = value(args, &mut i, "--seed")?;
                config.seed = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid --seed value: {raw}"))?,
                );
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => config.files.push(PathBuf::from(path)),
        }
        i += 1;
    }

    Ok(config)
}

fn session_config(config: &CliConfig) -> SessionConfig {
    let mut session = SessionConfig::new();
    if let Some(origin) = &config.origin {
        session = session.with_origin(origin.clone());
    }
    if let Some(count) = config.count {
        session = session.with_count(count);
    }
    if let Some(seed) = config.seed {
        session = session.with_seed(seed);
    }
    if config.trace {
        session = session.with_trace();
    }
    session
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(&args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("fabula {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut session = Session::with_config(session_config(&config))?;
    if config.trace {
        let tracer = session.tracer_mut();
        tracer.set_output(TraceOutput::Stderr);
        tracer.set_json_format(config.json);
    }

    for file in &config.files {
        session.load_file(file)?;
    }

    if config.batch_mode {
        return run_batch(&mut session, &config);
    }

    let mut repl = Repl::new()?.with_session(session);
    if !config.files.is_empty() {
        repl = repl.without_banner();
    }
    repl.run()?;
    Ok(())
}

/// Prints generated text and exits. Expands each `--rule` if any were
/// given, otherwise runs the origin.
fn run_batch(session: &mut Session, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.rules.is_empty() {
        for text in session.generate()? {
            println!("{text}");
        }
        report_errors(session.generated());
    } else {
        for rule in &config.rules {
            let tree = session.expand(rule)?;
            println!("{}", tree.finished_text());
            report_errors(std::slice::from_ref(&tree));
        }
    }
    Ok(())
}

fn report_errors(trees: &[fabula_engine::ExpansionTree]) {
    for tree in trees {
        for (node, error) in tree.errors() {
            eprintln!("\x1b[33mwarning: {node}: {error}\x1b[0m");
        }
    }
}

fn print_help() {
    println!(
        "\x1b[1mFabula\x1b[0m - Generative text grammars

\x1b[1mUSAGE:\x1b[0m
    fabula [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    JSON grammar files to load before starting

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    -b, --batch        Generate, print, and exit (no REPL)
    --origin NAME      Start symbol (default: origin)
    --count N          Texts per run (default: 1)
    --seed N           Fixed seed; runs repeat exactly
    --rule RULE        In batch mode, expand RULE instead of the origin
                       (may be given more than once)

\x1b[1mDEBUG OPTIONS:\x1b[0m
    --trace            Print an expansion trace to stderr
    --json             Print the trace as JSON

\x1b[1mEXAMPLES:\x1b[0m
    fabula                                  Start the REPL
    fabula story.json                       Load story.json, then start the REPL
    fabula -b --count 5 story.json          Print five stories
    fabula -b --seed 7 story.json           Print a repeatable story
    fabula -b --rule '#hero.capitalize#' story.json

Set RUST_LOG (e.g. RUST_LOG=fabula_engine=debug) for engine logs.
Type :help in the REPL for commands."
    );
}
