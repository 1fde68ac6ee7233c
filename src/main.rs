//! helperbars CLI
//!
//! Usage:
//!   helperbars [OPTIONS] [FILE]
//!
//! Options:
//!   -d, --data <FILE>    Context values (TOML), one helper per key
//!   -c, --config <FILE>  Grammar settings (TOML, `[grammar]` table)
//!   --strict             Fail on the first unresolved placeholder
//!   --check              Report malformed helper calls and exit
//!   --list-helpers       Print the registered helpers and exit
//!   -v, --verbose        Log every helper call to stderr
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use helperbars::{builtins, Context, Grammar, Replacer};

#[derive(Parser)]
#[command(name = "helperbars")]
#[command(about = "Replace {{helper(...)}} placeholders with whitelisted helper calls")]
struct Cli {
    /// Template file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Context values for helpers (TOML format)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Grammar settings (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop at the first placeholder that cannot be resolved
    #[arg(long)]
    strict: bool,

    /// Only report malformed helper calls
    #[arg(long)]
    check: bool,

    /// Print the registered helpers
    #[arg(long)]
    list_helpers: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let grammar = match &cli.config {
        Some(path) => match Grammar::from_file(path) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Grammar::default(),
    };

    let context = match &cli.data {
        Some(path) => match Context::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading data '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Context::new(),
    };

    let mut helpers = builtins::standard();
    let exposed = builtins::expose_context(&mut helpers, &context);
    tracing::debug!(count = exposed.len(), "exposed context keys as helpers");

    if cli.list_helpers {
        for name in helpers.names() {
            let arity = helpers.get(name).map_or(0, |h| h.arity());
            println!("{}({})", name, if arity == 0 { "" } else { "arg" });
        }
        return;
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let replacer = Replacer::new(helpers).with_grammar(grammar);

    if cli.check {
        let errors = replacer.lint(&source);
        for err in &errors {
            eprint!("{}", err.format(&source, &filename));
        }
        if !errors.is_empty() {
            std::process::exit(1);
        }
        return;
    }

    if cli.strict {
        match replacer.render_strict(&source, &context) {
            Ok(output) => print!("{}", output),
            Err(e) => {
                eprint!("{}", e.format(&source, &filename));
                std::process::exit(1);
            }
        }
        return;
    }

    let rendered = replacer.render(&source, &context);
    for err in &rendered.errors {
        eprint!("{}", err.format(&source, &filename));
    }
    print!("{}", rendered.output);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
