//! jsonpick CLI - pick fields out of JSON documents

use std::collections::HashMap;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::Level;

use jsonpick::{
    evaluate, parse_selector, tokenize, EvalOptions, FixSuggestion, PickError, PickOptions,
    PickSpec, Picked, Picker, Selector, Step,
};

#[derive(Parser)]
#[command(name = "jsonpick")]
#[command(about = "Fetch a JSON document and pick fields out of it")]
#[command(version)]
struct Cli {
    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,

    /// Log request details to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL and pick fields from the response
    Fetch {
        /// http:// or https:// URL returning JSON
        url: String,

        /// Selector: path, key=path, optionally followed by '?? <json default>'
        #[arg(short, long = "select")]
        select: Vec<String>,

        /// Request header as 'Name: value'
        #[arg(short = 'H', long = "header")]
        header: Vec<String>,

        /// Convert numeric strings ("100.5") to numbers
        #[arg(short = 'n', long)]
        parse_numbers: bool,

        /// Request timeout in milliseconds
        #[arg(short, long, default_value_t = 15_000)]
        timeout_ms: u64,
    },

    /// Run a YAML pick spec
    Run {
        /// Path to the spec file
        file: String,
    },

    /// Pick fields from a local JSON file (or stdin)
    Pick {
        /// JSON file; reads stdin when omitted or '-'
        file: Option<String>,

        /// Selector: path, key=path, optionally followed by '?? <json default>'
        #[arg(short, long = "select")]
        select: Vec<String>,

        /// Convert numeric strings ("100.5") to numbers
        #[arg(short = 'n', long)]
        parse_numbers: bool,
    },

    /// Show how a path is tokenized
    Tokenize {
        /// Path such as balances[*].balance
        path: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Fetch {
            url,
            select,
            header,
            parse_numbers,
            timeout_ms,
        } => fetch(&url, &select, &header, parse_numbers, timeout_ms, cli.compact).await,
        Commands::Run { file } => run_spec(&file, cli.compact).await,
        Commands::Pick {
            file,
            select,
            parse_numbers,
        } => pick_local(file.as_deref(), &select, parse_numbers, cli.compact).await,
        Commands::Tokenize { path } => {
            print_steps(&tokenize(&path));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn fetch(
    url: &str,
    select: &[String],
    header: &[String],
    parse_numbers: bool,
    timeout_ms: u64,
    compact: bool,
) -> Result<(), PickError> {
    let selectors = parse_selectors(select)?;
    let options = PickOptions {
        parse_numbers,
        timeout: Duration::from_millis(timeout_ms),
        headers: parse_headers(header)?,
    };

    let picked = Picker::new()?.pick(url, &selectors, &options).await?;
    print_picked(&picked, select.is_empty(), compact);
    Ok(())
}

async fn run_spec(file: &str, compact: bool) -> Result<(), PickError> {
    let spec = PickSpec::load(file).await?;
    let picked = Picker::new()?
        .pick(&spec.url, &spec.selectors, &spec.options())
        .await?;
    print_picked(&picked, false, compact);
    Ok(())
}

async fn pick_local(
    file: Option<&str>,
    select: &[String],
    parse_numbers: bool,
    compact: bool,
) -> Result<(), PickError> {
    let text = match file {
        Some(path) if path != "-" => tokio::fs::read_to_string(path).await?,
        _ => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    let document: Value = serde_json::from_str(&text).map_err(|e| PickError::InvalidJson {
        details: e.to_string(),
    })?;

    let selectors = parse_selectors(select)?;
    let picked = evaluate(&selectors, &document, &EvalOptions { parse_numbers });
    print_picked(&picked, select.is_empty(), compact);
    Ok(())
}

/// No selectors means "the whole document" (the empty path)
fn parse_selectors(raw: &[String]) -> Result<Vec<Selector>, PickError> {
    if raw.is_empty() {
        return Ok(vec![Selector::new("")]);
    }
    raw.iter().map(|s| parse_selector(s)).collect()
}

fn parse_headers(raw: &[String]) -> Result<HashMap<String, String>, PickError> {
    raw.iter()
        .map(|h| match h.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(PickError::InvalidHeader { header: h.clone() }),
        })
        .collect()
}

fn print_picked(picked: &Picked, whole_document: bool, compact: bool) {
    let json = if whole_document {
        picked.get("").cloned().unwrap_or(Value::Null)
    } else {
        picked.to_json()
    };

    if compact {
        println!("{}", json);
    } else {
        println!("{:#}", json);
    }

    // A null document is not a failed lookup
    if whole_document {
        return;
    }

    for (key, value) in picked.iter() {
        if value.is_none() {
            eprintln!("  {} '{}' resolved to nothing", "→".cyan(), key);
        }
    }
}

fn print_steps(steps: &[Step]) {
    if steps.is_empty() {
        println!("{}", "(no steps: selects the whole document)".dimmed());
        return;
    }
    for (i, step) in steps.iter().enumerate() {
        match step {
            Step::Key(name) => println!("{:>3}  {}  {:?}", i, "key".cyan(), name),
            Step::Index(index) => println!("{:>3}  {}  {}", i, "index".yellow(), index),
            Step::Wildcard => println!("{:>3}  {}", i, "wildcard".magenta()),
        }
    }
}
