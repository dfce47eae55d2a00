use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use dayfocus::clock::{Clock, SystemClock};
use dayfocus::config::load_config;
use dayfocus::domain::{format_time, sort_for_display, NewTask, TaskId, TaskPatch};
use dayfocus::persistence::{
    ensure_data_dir, init_local_data_dir, load_metadata, save_metadata, CONFIG_FILE, META_FILE,
};
use dayfocus::scheduler::Schedule;
use dayfocus::{report, Tracker, TrackerError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dayfocus")]
#[command(about = "Track tasks and focus time, one day at a time", long_about = None)]
struct Cli {
    /// Data directory. Defaults to a local .dayfocus, then ~/.dayfocus
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .dayfocus directory in the current directory
    Init,
    /// Add a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Due time, RFC 3339 or "YYYY-MM-DD HH:MM" in the configured timezone
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        pin: bool,
    },
    /// List tasks, pinned first then newest
    List,
    /// Show one task
    Show { id: String },
    /// Edit a task's title, description or due time
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
    },
    /// Pin or unpin a task
    Pin { id: String },
    /// Delete a task
    Delete { id: String },
    /// Start the timer
    Start { id: String },
    /// Pause the timer
    Pause { id: String },
    /// Stop the timer
    Stop { id: String },
    /// Start the timer if stopped, pause it if running
    Toggle { id: String },
    /// Mark a task done, or not done
    Done { id: String },
    /// Show today's statistics, or an archived day's
    Stats {
        /// Date to show (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show archived days, newest first
    History,
    /// Delete all archived days
    ClearHistory,
    /// Archive the previous day now if the date has changed
    Roll,
    /// Keep running: roll over at midnight and show running timers
    Watch,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init = cli.command {
        let data_dir = init_local_data_dir()?;
        println!("Initialized dayfocus directory: {}", data_dir.display());
        return Ok(());
    }

    let mut session = Session::open(cli.dir.as_deref())?;
    run(&mut session, cli.command)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "dayfocus=debug" } else { "dayfocus=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with_writer(io::stderr)
        .init();
}

/// Open tracker plus the bookkeeping the CLI keeps between invocations
struct Session {
    dir: PathBuf,
    tracker: Tracker<SystemClock>,
    schedule: Schedule,
}

impl Session {
    fn open(dir_override: Option<&Path>) -> Result<Self> {
        let dir = ensure_data_dir(dir_override)?;
        let config = load_config(dir.join(CONFIG_FILE))?;
        let clock = config.clock()?;
        let tracker = Tracker::open(&dir, clock)
            .with_context(|| format!("Failed to open data in {}", dir.display()))?;

        let mut session = Self {
            dir,
            tracker,
            schedule: Schedule::from_config(&config),
        };
        session.roll_over()?;
        Ok(session)
    }

    /// Re-read the stores so changes made by other invocations are seen
    fn reload(&mut self) -> Result<()> {
        let clock = *self.tracker.clock();
        self.tracker = Tracker::open(&self.dir, clock)
            .with_context(|| format!("Failed to open data in {}", self.dir.display()))?;
        Ok(())
    }

    /// Run the rollover check against the persisted last-checked date
    fn roll_over(&mut self) -> Result<Option<NaiveDate>> {
        let meta_path = self.dir.join(META_FILE);
        let mut metadata = load_metadata(&meta_path)?;
        let last_checked = metadata.last_checked_or(self.tracker.clock().today());

        let rolled = self.tracker.check_and_roll(last_checked)?;
        if rolled.is_some() {
            eprintln!("Archived {} and started a new day", last_checked);
        }

        let current = rolled.unwrap_or(last_checked);
        if metadata.last_checked != Some(current) {
            metadata.last_checked = Some(current);
            save_metadata(&meta_path, &metadata)?;
        }
        Ok(rolled)
    }

    /// Accept a full id or any unique prefix of one
    fn resolve_id(&self, input: &str) -> Result<TaskId> {
        if let Ok(id) = input.parse::<TaskId>() {
            return Ok(id);
        }

        let needle = input.trim().to_lowercase().replace('-', "");
        if needle.is_empty() {
            anyhow::bail!("Task id must not be empty");
        }
        let matches: Vec<TaskId> = self
            .tracker
            .tasks()?
            .iter()
            .map(|task| task.id)
            .filter(|id| id.to_string().replace('-', "").starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => anyhow::bail!("No task matches '{}'", input),
            _ => anyhow::bail!("'{}' matches {} tasks; use a longer prefix", input, matches.len()),
        }
    }
}

fn run(session: &mut Session, command: Commands) -> Result<()> {
    let now = session.tracker.clock().now();

    match command {
        Commands::Init => unreachable!("handled before the session is opened"),
        Commands::Add {
            title,
            description,
            due,
            pin,
        } => {
            let mut fields = NewTask::titled(title).pinned(pin);
            if let Some(description) = description {
                fields = fields.description(description);
            }
            if let Some(due) = due {
                fields = fields.due(parse_due(&due, session.tracker.clock())?);
            }
            let task = session.tracker.add_task(fields)?;
            println!("Added {} {}", task.id.short(), task.title);
        }
        Commands::List => {
            let mut tasks = session.tracker.tasks()?;
            sort_for_display(&mut tasks);
            print!("{}", report::render_task_list(&tasks, now));
        }
        Commands::Show { id } => {
            let id = session.resolve_id(&id)?;
            let task = session.tracker.task(id)?.ok_or(TrackerError::TaskNotFound(id))?;
            let offset = session.tracker.clock().offset();
            print!("{}", report::render_task_detail(&task, now, offset));
        }
        Commands::Edit {
            id,
            title,
            description,
            due,
            clear_due,
        } => {
            let id = session.resolve_id(&id)?;
            let due_date = match (due, clear_due) {
                (Some(due), _) => Some(Some(parse_due(&due, session.tracker.clock())?)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let patch = TaskPatch {
                title,
                description,
                due_date,
                pinned: None,
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to change; pass --title, --description, --due or --clear-due");
            }
            let task = session
                .tracker
                .update_task(id, patch)?
                .ok_or(TrackerError::TaskNotFound(id))?;
            println!("Updated {} {}", task.id.short(), task.title);
        }
        Commands::Pin { id } => {
            let id = session.resolve_id(&id)?;
            let task = session.tracker.toggle_pin(id)?.ok_or(TrackerError::TaskNotFound(id))?;
            let state = if task.pinned { "Pinned" } else { "Unpinned" };
            println!("{} {} {}", state, task.id.short(), task.title);
        }
        Commands::Delete { id } => {
            let id = session.resolve_id(&id)?;
            session.tracker.delete_task(id)?;
            println!("Deleted {}", id.short());
        }
        Commands::Start { id } => {
            let id = session.resolve_id(&id)?;
            let task = session.tracker.start(id)?.ok_or(TrackerError::TaskNotFound(id))?;
            println!("Running {} ({})", task.title, format_time(task.effective_time(now)));
        }
        Commands::Pause { id } => {
            let id = session.resolve_id(&id)?;
            let task = session.tracker.pause(id)?.ok_or(TrackerError::TaskNotFound(id))?;
            println!("Paused {} at {}", task.title, format_time(task.total_time));
        }
        Commands::Stop { id } => {
            let id = session.resolve_id(&id)?;
            let task = session.tracker.stop(id)?.ok_or(TrackerError::TaskNotFound(id))?;
            println!("Stopped {} at {}", task.title, format_time(task.total_time));
        }
        Commands::Toggle { id } => {
            let id = session.resolve_id(&id)?;
            let task = session
                .tracker
                .toggle_timer(id)?
                .ok_or(TrackerError::TaskNotFound(id))?;
            let state = if task.is_timer_running() { "Running" } else { "Paused" };
            println!("{} {} ({})", state, task.title, format_time(task.effective_time(now)));
        }
        Commands::Done { id } => {
            let id = session.resolve_id(&id)?;
            let task = session
                .tracker
                .toggle_complete(id)?
                .ok_or(TrackerError::TaskNotFound(id))?;
            let state = if task.completed { "Completed" } else { "Reopened" };
            println!("{} {} ({})", state, task.title, format_time(task.total_time));
        }
        Commands::Stats { date } => {
            let today = session.tracker.clock().today();
            let date = match date {
                Some(date) => NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?,
                None => today,
            };

            if date == today {
                let stats = session.tracker.today_stats()?;
                print!("{}", report::render_stats(&stats, "Today's Statistics"));
            } else {
                let stats = session
                    .tracker
                    .stats_for(date)?
                    .ok_or(TrackerError::StatsNotFound(date))?;
                print!("{}", report::render_stats(&stats, "Statistics"));
            }
        }
        Commands::History => {
            let history = session.tracker.history()?;
            print!("{}", report::render_history(&history));
        }
        Commands::ClearHistory => {
            session.tracker.clear_history()?;
            println!("History cleared");
        }
        Commands::Roll => {
            // The session already ran the check when it opened
            println!("Current day: {}", session.tracker.clock().today());
        }
        Commands::Watch => watch(session)?,
    }

    Ok(())
}

/// Driver loop: rollover on schedule, live line while a timer runs
fn watch(session: &mut Session) -> Result<()> {
    let mut stdout = io::stdout();
    eprintln!("Watching {} (Ctrl-C to quit)", session.dir.display());

    loop {
        session.reload()?;
        session.roll_over()?;

        let running = session.tracker.has_running_timer()?;
        if running {
            let stats = session.tracker.today_stats()?;
            write!(stdout, "\rFocus today: {}", format_time(stats.total_focus_time))?;
            stdout.flush()?;
        }

        let wait = session.schedule.next_wake(session.tracker.clock(), running);
        std::thread::sleep(wait);
    }
}

/// Parse a due time given as RFC 3339, or as a local "YYYY-MM-DD HH:MM"
/// under the clock's day offset
fn parse_due<C: Clock>(input: &str, clock: &C) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("Invalid due time. Use RFC 3339 or YYYY-MM-DD HH:MM: {}", e))?;
    let local = clock
        .offset()
        .from_local_datetime(&naive)
        .single()
        .context("Ambiguous due time")?;
    Ok(local.with_timezone(&Utc))
}
