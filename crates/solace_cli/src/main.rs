//! Solace command-line companion.
//!
//! # Responsibility
//! - Map subcommands onto `CompanionService` handlers, one handler per action.
//! - Resolve configuration (env, then flags), start logging, pick the storage
//!   backend.
//!
//! # Invariants
//! - Errors print one line to stderr and exit with code 1.
//! - Breathing sessions run in real time and stop when Enter is pressed.

use clap::{Args, Parser, Subcommand};
use log::info;
use solace_core::breathing::CancellationToken;
use solace_core::demo::seed_demo_data;
use solace_core::support::{
    call_at_boundary, offline_reply, ExternalService, ExternalServiceError,
};
use solace_core::{
    find_technique, init_logging, open_db, technique_catalog, BreathingTechnique, CompanionConfig,
    CompanionService, DocumentGateway, IntervalTicker, JsonFileGateway, RunOutcome, SessionEvent,
    SortOrder, SqliteDocumentGateway, StorageBackend, EXPORT_FILE_NAME,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod error;
mod render;

use error::{CliError, CliResult};

const CHAT_KEY_ENV: &str = "OPENAI_API_KEY";
const CUSTOM_TECHNIQUE_NAME: &str = "Custom";
const DEFAULT_CUSTOM_CYCLES: i64 = 4;

/// Guided breathing, mood tracking and journaling.
#[derive(Parser, Debug)]
#[command(name = "solace", version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Data directory (overrides SOLACE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Storage backend: sqlite or json (overrides SOLACE_STORAGE)
    #[arg(long, global = true, value_parser = parse_backend)]
    backend: Option<StorageBackend>,

    /// Log level: trace|debug|info|warn|error (overrides SOLACE_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a guided breathing exercise; press Enter to stop early
    Breathe(BreatheArgs),
    /// Record and review moods
    Mood {
        #[command(subcommand)]
        action: MoodCommand,
    },
    /// Write and read journal entries
    Journal {
        #[command(subcommand)]
        action: JournalCommand,
    },
    /// Latest journal entries, moods and today's prompt
    Dashboard,
    /// Export all data as JSON
    Export {
        /// Output file, `-` for stdout
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: String,
    },
    /// Delete all mood and journal data
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Fill the last two weeks with sample data
    Demo,
    /// Talk to the offline companion
    Chat {
        /// Single message; omit for an interactive session
        message: Option<String>,
    },
}

#[derive(Args, Debug)]
struct BreatheArgs {
    /// Technique name or alias (box, 4-7-8, calm)
    #[arg(default_value = "box")]
    technique: String,

    /// List available techniques and exit
    #[arg(long)]
    list: bool,

    /// Custom pattern as inhale,hold,exhale,hold seconds, e.g. 4,7,8,0
    #[arg(long, value_parser = parse_pattern, allow_hyphen_values = true)]
    custom: Option<[i64; 4]>,

    /// Cycles for a custom pattern (default 4)
    #[arg(long, requires = "custom", allow_hyphen_values = true)]
    cycles: Option<i64>,
}

impl BreatheArgs {
    fn technique(&self) -> CliResult<BreathingTechnique> {
        let technique = match self.custom {
            Some(durations) => BreathingTechnique::from_signed(
                CUSTOM_TECHNIQUE_NAME,
                durations,
                self.cycles.unwrap_or(DEFAULT_CUSTOM_CYCLES),
            )?,
            None => find_technique(&self.technique)?,
        };
        Ok(technique)
    }
}

#[derive(Subcommand, Debug)]
enum MoodCommand {
    /// Record a mood with optional notes
    Record {
        /// Very Bad, Bad, Neutral, Good or Excellent
        mood: String,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Record a mood without notes
    Quick { mood: String },
    /// List all moods
    List {
        /// Newest first
        #[arg(short, long)]
        reverse: bool,
    },
    /// Most recent moods, newest first
    Recent {
        #[arg(default_value_t = 3)]
        count: usize,
    },
    /// Sentiment score chart over time
    Chart,
}

#[derive(Subcommand, Debug)]
enum JournalCommand {
    /// Save an entry; text is read from stdin when omitted
    Save {
        /// YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<String>,
        text: Option<String>,
    },
    /// Print the entry for a date
    Show { date: String },
    /// Delete the entry for a date
    Delete { date: String },
    /// List entry dates, newest first
    List {
        #[arg(long)]
        oldest_first: bool,
    },
    /// Today's writing prompt
    Prompt,
}

fn parse_backend(value: &str) -> Result<StorageBackend, String> {
    value.parse().map_err(|err: solace_core::ConfigError| err.to_string())
}

fn parse_pattern(value: &str) -> Result<[i64; 4], String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| format!("`{}` is not a whole number of seconds", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    <[i64; 4]>::try_from(parts).map_err(|parts| {
        format!(
            "expected 4 comma-separated durations (inhale,hold,exhale,hold), got {}",
            parts.len()
        )
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = resolve_config(&cli)?;
    init_logging(&config.log_settings().with_stderr_warnings())?;
    info!(
        "event=cli_start module=cli status=ok backend={} command={}",
        config.backend,
        command_name(&cli.command)
    );

    if let Command::Breathe(args) = &cli.command {
        if args.list {
            list_techniques();
            return Ok(());
        }
    }
    if let Command::Chat { message } = &cli.command {
        return chat(message.as_deref());
    }

    let lenient = matches!(cli.command, Command::Clear { .. });
    match config.backend {
        StorageBackend::Sqlite => {
            std::fs::create_dir_all(&config.data_dir).map_err(|source| CliError::Io {
                path: config.data_dir.clone(),
                source,
            })?;
            let conn = open_db(config.database_path())?;
            let gateway = SqliteDocumentGateway::try_new(&conn)?;
            let mut service = open_service(&gateway, &gateway, lenient)?;
            dispatch(cli.command, &mut service)
        }
        StorageBackend::Json => {
            let gateway = JsonFileGateway::new(&config.data_dir);
            let mut service = open_service(&gateway, &gateway, lenient)?;
            dispatch(cli.command, &mut service)
        }
    }
}

fn resolve_config(cli: &Cli) -> CliResult<CompanionConfig> {
    let mut config = CompanionConfig::from_env()?;
    if let Some(dir) = &cli.data_dir {
        config = config.override_data_dir(dir)?;
    }
    if let Some(backend) = cli.backend {
        config = config.with_backend(backend);
    }
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level)?;
    }
    Ok(config)
}

// Strict loading protects unreadable documents from being overwritten;
// `clear` alone starts from empty stores so it can reset broken data.
fn open_service<M, J>(moods: M, journal: J, lenient: bool) -> CliResult<CompanionService<M, J>>
where
    M: DocumentGateway,
    J: DocumentGateway,
{
    if !lenient {
        return Ok(CompanionService::open(moods, journal)?);
    }
    let (service, report) = CompanionService::open_or_empty(moods, journal);
    for err in report.mood.iter().chain(report.journal.iter()) {
        eprintln!("warning: existing data could not be read: {err}");
    }
    Ok(service)
}

fn dispatch<M, J>(command: Command, service: &mut CompanionService<M, J>) -> CliResult<()>
where
    M: DocumentGateway,
    J: DocumentGateway,
{
    match command {
        Command::Breathe(args) => breathe(service, args.technique()?),
        Command::Mood { action } => mood(service, action),
        Command::Journal { action } => journal(service, action),
        Command::Dashboard => {
            println!(
                "{}",
                render::dashboard(&service.dashboard(), service.todays_prompt())
            );
            Ok(())
        }
        Command::Export { output } => export(service, &output),
        Command::Clear { yes } => {
            if !yes {
                return Err(CliError::Usage(
                    "refusing to delete all data without --yes".to_string(),
                ));
            }
            service.clear_all_data()?;
            println!("All mood and journal data deleted.");
            Ok(())
        }
        Command::Demo => {
            let today = service.today();
            let summary = seed_demo_data(service, today)?;
            println!(
                "Added {} journal entries and {} mood check-ins.",
                summary.journal_entries, summary.mood_entries
            );
            Ok(())
        }
        Command::Chat { message } => chat(message.as_deref()),
    }
}

fn list_techniques() {
    for technique in technique_catalog() {
        println!(
            "{:<26} {}  x{}  ({}s)",
            technique.name(),
            technique.pattern(),
            technique.cycles(),
            technique.total_seconds()
        );
    }
}

fn breathe<M, J>(
    service: &mut CompanionService<M, J>,
    technique: BreathingTechnique,
) -> CliResult<()>
where
    M: DocumentGateway,
    J: DocumentGateway,
{
    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    // Detached: the reader stays blocked on stdin until the process exits.
    std::thread::spawn(move || cancel_on_enter(std::io::stdin().lock(), &stopper));

    println!("{} ({}) x{}", technique.name(), technique.pattern(), technique.cycles());
    println!("Press Enter to stop.");
    let mut ticker = IntervalTicker::every_second();
    let outcome = service.run_technique(technique, &mut ticker, &cancel, |event| match event {
        SessionEvent::Tick(tick) => {
            print!("\r{}", render::tick_line(tick));
            let _ = std::io::stdout().flush();
        }
        SessionEvent::Completed(summary) => {
            println!("\n{}", summary.message);
        }
    })?;

    if let RunOutcome::Cancelled { elapsed_seconds } = outcome {
        println!("\nStopped after {elapsed_seconds}s.");
    }
    Ok(())
}

/// Cancels on a typed line; end of input or a read error leaves the session running.
fn cancel_on_enter<R: BufRead>(mut input: R, token: &CancellationToken) {
    let mut line = String::new();
    if let Ok(read) = input.read_line(&mut line) {
        if read > 0 {
            token.cancel();
        }
    }
}

fn mood<M, J>(service: &mut CompanionService<M, J>, action: MoodCommand) -> CliResult<()>
where
    M: DocumentGateway,
    J: DocumentGateway,
{
    match action {
        MoodCommand::Record { mood, notes } => {
            let record = service.record_mood(&mood, notes.as_deref())?;
            println!("Recorded: {}", render::mood_line(&record));
        }
        MoodCommand::Quick { mood } => {
            let record = service.quick_mood(&mood)?;
            println!("Recorded: {}", render::mood_line(&record));
        }
        MoodCommand::List { reverse } => {
            let order = if reverse {
                SortOrder::ReverseChronological
            } else {
                SortOrder::Chronological
            };
            print_or_empty(
                service.moods().list(order).map(render::mood_line),
                "No mood entries yet.",
            );
        }
        MoodCommand::Recent { count } => {
            print_or_empty(
                service.moods().recent(count).map(render::mood_line),
                "No mood entries yet.",
            );
        }
        MoodCommand::Chart => {
            let points = service.mood_chart();
            if points.is_empty() {
                println!("No mood entries yet.");
            } else {
                println!("{}", render::mood_chart(&points));
            }
        }
    }
    Ok(())
}

fn journal<M, J>(service: &mut CompanionService<M, J>, action: JournalCommand) -> CliResult<()>
where
    M: DocumentGateway,
    J: DocumentGateway,
{
    match action {
        JournalCommand::Save { date, text } => {
            let content = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            if content.trim().is_empty() {
                return Err(CliError::Usage("journal entry is empty".to_string()));
            }
            let saved = match date {
                Some(date) => service.save_journal(&date, &content)?,
                None => service.save_today(&content)?,
            };
            println!("Entry saved for {saved}.");
        }
        JournalCommand::Show { date } => match service.journal_entry(&date)? {
            Some(content) => println!("{content}"),
            None => println!("No entry for {date}."),
        },
        JournalCommand::Delete { date } => {
            if service.delete_journal(&date)? {
                println!("Entry for {date} deleted.");
            } else {
                println!("No entry for {date}.");
            }
        }
        JournalCommand::List { oldest_first } => {
            let order = if oldest_first {
                SortOrder::Chronological
            } else {
                SortOrder::ReverseChronological
            };
            print_or_empty(
                service.journal().list_dates(order).map(|date| date.to_string()),
                "No journal entries yet.",
            );
        }
        JournalCommand::Prompt => println!("{}", service.todays_prompt()),
    }
    Ok(())
}

fn export<M, J>(service: &CompanionService<M, J>, output: &str) -> CliResult<()>
where
    M: DocumentGateway,
    J: DocumentGateway,
{
    let json = service.export_json()?;
    if output == "-" {
        println!("{json}");
        return Ok(());
    }
    let path = PathBuf::from(output);
    std::fs::write(&path, json).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    println!("Exported to {}.", path.display());
    Ok(())
}

fn chat_credential() -> Result<String, ExternalServiceError> {
    std::env::var(CHAT_KEY_ENV)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(ExternalServiceError::Unconfigured(ExternalService::Chat))
}

fn chat(message: Option<&str>) -> CliResult<()> {
    // Replies stay offline either way; the credential only changes the notice.
    if let Err(notice) = call_at_boundary(chat_credential) {
        println!("{notice}");
    }

    if let Some(message) = message {
        println!("{}", offline_reply(message, 0));
        return Ok(());
    }

    println!("Type a message, or `quit` to leave.");
    let stdin = std::io::stdin();
    for (turn, line) in stdin.lock().lines().enumerate() {
        let line = line.map_err(|source| CliError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        println!("{}", offline_reply(trimmed, turn));
    }
    Ok(())
}

fn read_stdin() -> CliResult<String> {
    let mut content = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut content).map_err(|source| {
        CliError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        }
    })?;
    Ok(content)
}

fn print_or_empty(lines: impl Iterator<Item = String>, empty: &str) {
    let mut any = false;
    for line in lines {
        println!("{line}");
        any = true;
    }
    if !any {
        println!("{empty}");
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Breathe(_) => "breathe",
        Command::Mood { .. } => "mood",
        Command::Journal { .. } => "journal",
        Command::Dashboard => "dashboard",
        Command::Export { .. } => "export",
        Command::Clear { .. } => "clear",
        Command::Demo => "demo",
        Command::Chat { .. } => "chat",
    }
}

#[cfg(test)]
mod tests {
    use super::{cancel_on_enter, parse_pattern, Cli, Command, JournalCommand, MoodCommand};
    use clap::{CommandFactory, Parser};
    use solace_core::breathing::CancellationToken;
    use solace_core::StorageBackend;
    use std::io::Cursor;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "solace",
            "mood",
            "record",
            "Very Bad",
            "--notes",
            "long day",
            "--backend",
            "json",
            "--data-dir",
            "/tmp/solace",
        ])
        .unwrap();

        assert_eq!(cli.backend, Some(StorageBackend::Json));
        assert_eq!(cli.data_dir.as_deref(), Some("/tmp/solace"));
        match cli.command {
            Command::Mood {
                action: MoodCommand::Record { mood, notes },
            } => {
                assert_eq!(mood, "Very Bad");
                assert_eq!(notes.as_deref(), Some("long day"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["solace", "--backend", "redis", "dashboard"]).is_err());
    }

    #[test]
    fn breathe_defaults_to_box() {
        let cli = Cli::try_parse_from(["solace", "breathe"]).unwrap();
        match cli.command {
            Command::Breathe(args) => {
                assert_eq!(args.technique, "box");
                assert!(!args.list);
                assert_eq!(args.technique().unwrap().pattern(), "4-4-4-4");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn breathe_accepts_custom_pattern_and_cycles() {
        let cli =
            Cli::try_parse_from(["solace", "breathe", "--custom", "6,0,6,2", "--cycles", "3"])
                .unwrap();
        match cli.command {
            Command::Breathe(args) => {
                let technique = args.technique().unwrap();
                assert_eq!(technique.pattern(), "6-0-6-2");
                assert_eq!(technique.cycles(), 3);
                assert_eq!(technique.total_seconds(), 42);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn custom_pattern_rejects_bad_input() {
        assert!(parse_pattern("4,7,8").is_err());
        assert!(parse_pattern("4,seven,8,0").is_err());
        assert_eq!(parse_pattern(" 4, 7 ,8,0").unwrap(), [4, 7, 8, 0]);
        assert!(Cli::try_parse_from(["solace", "breathe", "--cycles", "3"]).is_err());

        let cli = Cli::try_parse_from(["solace", "breathe", "--custom=4,-1,4,0"]).unwrap();
        match cli.command {
            Command::Breathe(args) => assert!(args.technique().is_err()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn closed_stdin_does_not_cancel_breathing() {
        let token = CancellationToken::new();
        cancel_on_enter(Cursor::new(Vec::new()), &token);
        assert!(!token.is_cancelled());

        cancel_on_enter(Cursor::new(b"\n".to_vec()), &token);
        assert!(token.is_cancelled());
    }

    #[test]
    fn journal_save_accepts_optional_date() {
        let cli =
            Cli::try_parse_from(["solace", "journal", "save", "--date", "2024-01-01", "hello"])
                .unwrap();
        match cli.command {
            Command::Journal {
                action: JournalCommand::Save { date, text },
            } => {
                assert_eq!(date.as_deref(), Some("2024-01-01"));
                assert_eq!(text.as_deref(), Some("hello"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
