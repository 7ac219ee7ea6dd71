mod input;
mod view;

use std::fmt;
use std::io::BufRead;

use interview_core::catalog::builtin_bank;
use interview_core::model::{QuestionBank, SessionSettings};
use interview_core::time::format_countdown;
use services::{Clock, SessionIntent, SessionLoop};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::input::parse_intent;
use crate::view::TerminalView;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTickMs { raw: String },
    EmptyType,
    EmptyFallback,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTickMs { raw } => write!(f, "invalid tick period (ms): {raw}"),
            ArgsError::EmptyType => write!(f, "--type cannot be empty"),
            ArgsError::EmptyFallback => write!(f, "--fallback cannot be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_tick_ms(raw: &str) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidTickMs { raw: raw.to_string() })
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- run  [--type <key>] [--fallback <key>] [--bank <file.json>] [--tick-ms <ms>]"
    );
    eprintln!("  cargo run -p app -- list [--bank <file.json>]");
    eprintln!();
    eprintln!("Defaults for run:");
    eprintln!("  --type general");
    eprintln!("  --fallback <the bank's default>");
    eprintln!("  --tick-ms 1000");
    eprintln!();
    eprintln!("Commands during a session:");
    eprintln!("  start | pause | resume | p | next | prev | jump <n> | answer <text> | end");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_TYPE, INTERVIEW_FALLBACK, INTERVIEW_BANK, INTERVIEW_TICK_MS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    List,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

struct Args {
    type_key: Option<String>,
    fallback: Option<String>,
    bank_path: Option<String>,
    tick_ms: u64,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut type_key = non_empty_env("INTERVIEW_TYPE");
        let mut fallback = non_empty_env("INTERVIEW_FALLBACK");
        let mut bank_path = non_empty_env("INTERVIEW_BANK");
        let mut tick_ms = match non_empty_env("INTERVIEW_TICK_MS") {
            Some(raw) => parse_tick_ms(&raw)?,
            None => SessionSettings::default().tick_period_ms(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--type" => {
                    let value = require_value(args, "--type")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::EmptyType);
                    }
                    type_key = Some(value.trim().to_string());
                }
                "--fallback" => {
                    let value = require_value(args, "--fallback")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::EmptyFallback);
                    }
                    fallback = Some(value.trim().to_string());
                }
                "--bank" => {
                    bank_path = Some(require_value(args, "--bank")?);
                }
                "--tick-ms" => {
                    tick_ms = parse_tick_ms(&require_value(args, "--tick-ms")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            type_key,
            fallback,
            bank_path,
            tick_ms,
        })
    }
}

fn load_bank(path: Option<&str>) -> Result<QuestionBank, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(QuestionBank::from_json(&raw)?)
        }
        None => Ok(builtin_bank()?),
    }
}

/// Forward stdin lines as intents from a plain thread, so a pending read
/// never holds up runtime shutdown. EOF drops the sender and ends the session.
fn spawn_stdin_reader(tx: mpsc::Sender<SessionIntent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_intent(&line) {
                Ok(intent) => {
                    if tx.blocking_send(intent).is_err() {
                        break;
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
        }
    });
}

fn list(bank: &QuestionBank) {
    for overview in bank.overview() {
        let marker = if overview.key == bank.default_key() {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<12} {:>2} questions, about {} min{marker}",
            overview.key, overview.question_count, overview.estimated_minutes
        );
    }
}

async fn run_session(args: Args, bank: QuestionBank) -> Result<(), Box<dyn std::error::Error>> {
    let fallback = args.fallback.as_deref().unwrap_or(bank.default_key());
    let settings = SessionSettings::new(fallback, args.tick_ms, 30)?;
    let type_key = args
        .type_key
        .unwrap_or_else(|| settings.default_bank().to_string());

    let session = SessionLoop::tokio(&bank, &type_key, &settings, Clock::default())?
        .with_observer(Box::new(TerminalView::default()));

    let engine = session.engine();
    let first = engine.current_question();
    println!(
        "{} interview: {} questions, about {} minutes.",
        engine.bank_key(),
        engine.questions().len(),
        engine.estimated_minutes()
    );
    println!(
        "First question: {} ({}, {}, {})",
        first.prompt(),
        format_countdown(first.time_limit_secs()),
        first.difficulty(),
        first.category()
    );
    println!("Type `start` when ready.");

    let (tx, rx) = mpsc::channel(32);
    spawn_stdin_reader(tx);

    let summary = session.run(rx).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let bank = load_bank(parsed.bank_path.as_deref())?;
    tracing::debug!(banks = bank.keys().count(), "question bank loaded");

    match cmd {
        Command::List => {
            list(&bank);
            Ok(())
        }
        Command::Run => run_session(parsed, bank).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,services=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = argv.iter().map(ToString::to_string);
        Args::parse(&mut iter)
    }

    #[test]
    fn tick_ms_must_be_a_number() {
        assert_eq!(parse_tick_ms(" 250 ").unwrap(), 250);
        assert!(matches!(
            parse_tick_ms("fast"),
            Err(ArgsError::InvalidTickMs { raw }) if raw == "fast"
        ));
        assert!(matches!(
            parse(&["--tick-ms", "soon"]),
            Err(ArgsError::InvalidTickMs { .. })
        ));
    }

    #[test]
    fn flags_are_read() {
        let args = parse(&[
            "--type",
            " technical ",
            "--fallback",
            "behavioral",
            "--tick-ms",
            "50",
        ])
        .unwrap();
        assert_eq!(args.type_key.as_deref(), Some("technical"));
        assert_eq!(args.fallback.as_deref(), Some("behavioral"));
        assert_eq!(args.tick_ms, 50);
        assert!(matches!(
            parse(&["--fallback", " "]),
            Err(ArgsError::EmptyFallback)
        ));
    }
}
