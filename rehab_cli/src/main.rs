use clap::{Parser, Subcommand};
use rehab_core::progression::{multiplier_percent, total_sets};
use rehab_core::timer::drive;
use rehab_core::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rehab")]
#[command(about = "Joint rehab session tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the program set by set (default)
    Session {
        /// Complete every set without prompting
        #[arg(long)]
        auto_complete: bool,

        /// Start in deload mode
        #[arg(long)]
        deload: bool,

        /// Shoulder pain (0-10)
        #[arg(long, allow_negative_numbers = true)]
        shoulder: Option<i64>,

        /// Hip pain (0-10)
        #[arg(long, allow_negative_numbers = true)]
        hip: Option<i64>,

        /// Session notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show or change the program week
    Week {
        #[command(subcommand)]
        action: Option<WeekAction>,
    },

    /// Show the effective sets for every exercise
    Plan {
        /// Week to plan for (defaults to the current week)
        #[arg(long, allow_negative_numbers = true)]
        week: Option<i64>,

        /// Plan a deload session
        #[arg(long)]
        deload: bool,
    },

    /// Run a rest countdown
    Rest {
        /// Rest length in seconds (15-180)
        #[arg(long)]
        seconds: Option<u32>,
    },

    /// List completed sessions
    History {
        /// Also export the history to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Only show the most recent N sessions
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum WeekAction {
    /// Print the current week
    Show,
    /// Advance one week
    Up,
    /// Go back one week
    Down,
    /// Jump to a specific week
    Set {
        #[arg(allow_negative_numbers = true)]
        week: i64,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    rehab_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Session {
            auto_complete,
            deload,
            shoulder,
            hip,
            notes,
        }) => cmd_session(
            data_dir,
            &config,
            SessionOptions {
                auto_complete,
                deload,
                shoulder,
                hip,
                notes,
            },
        ),
        Some(Commands::Week { action }) => {
            cmd_week(data_dir, &config, action.unwrap_or(WeekAction::Show))
        }
        Some(Commands::Plan { week, deload }) => cmd_plan(data_dir, &config, week, deload),
        Some(Commands::Rest { seconds }) => cmd_rest(&config, seconds),
        Some(Commands::History { csv, limit }) => cmd_history(data_dir, &config, csv, limit),
        None => {
            // Default to an interactive session
            cmd_session(data_dir, &config, SessionOptions::default())
        }
    }
}

#[derive(Default)]
struct SessionOptions {
    auto_complete: bool,
    deload: bool,
    shoulder: Option<i64>,
    hip: Option<i64>,
    notes: Option<String>,
}

fn open_tracker(data_dir: &Path, config: &Config) -> Result<RehabTracker<JsonFileStore>> {
    let tracker = RehabTracker::from_config(config, JsonFileStore::new(data_dir))?;
    Ok(tracker)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn cmd_session(data_dir: PathBuf, config: &Config, opts: SessionOptions) -> Result<()> {
    let mut tracker = open_tracker(&data_dir, config)?;
    tracker.subscribe(render_event);

    if opts.deload {
        tracker.set_deload(true);
    }
    if let Some(value) = opts.shoulder {
        tracker.set_pain(Joint::Shoulder, value);
    }
    if let Some(value) = opts.hip {
        tracker.set_pain(Joint::Hip, value);
    }
    if let Some(notes) = opts.notes {
        tracker.set_notes(notes);
    }

    if opts.auto_complete {
        display_view(&tracker.view());
        let steps = total_sets(
            tracker.program(),
            tracker.state().week(),
            tracker.state().deload(),
        );
        for _ in 0..steps {
            tracker.advance_set(today());
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        display_view(&tracker.view());
        print_prompt()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match parse_command(&line) {
            SessionCommand::CompleteSet => {
                tracker.advance_set(today());
            }
            SessionCommand::Rest => run_rest(&mut tracker),
            SessionCommand::ToggleDeload => {
                let deload = !tracker.state().deload();
                tracker.set_deload(deload);
            }
            SessionCommand::WeekUp => {
                tracker.set_week(1);
            }
            SessionCommand::WeekDown => {
                tracker.set_week(-1);
            }
            SessionCommand::Pain(joint, value) => {
                tracker.set_pain(joint, value);
            }
            SessionCommand::Notes(text) => tracker.set_notes(text),
            SessionCommand::RestLength(seconds) => {
                tracker.set_rest_duration(seconds);
            }
            SessionCommand::Quit => break,
            SessionCommand::Unknown(input) => {
                eprintln!("Unknown command: {}", input);
            }
        }
    }

    println!("\nBye. Sets completed in an unfinished session are not saved.");
    Ok(())
}

fn run_rest(tracker: &mut RehabTracker<JsonFileStore>) {
    if tracker.timer().state() != TimerState::Idle {
        tracker.reset_timer();
    }
    if let Some(handle) = tracker.start_timer() {
        drive(Duration::from_secs(1), || tracker.tick(handle));
    }
    tracker.reset_timer();
}

fn cmd_week(data_dir: PathBuf, config: &Config, action: WeekAction) -> Result<()> {
    let mut tracker = open_tracker(&data_dir, config)?;
    tracker.subscribe(render_event);

    let week = match action {
        WeekAction::Show => tracker.state().week(),
        WeekAction::Up => tracker.set_week(1),
        WeekAction::Down => tracker.set_week(-1),
        WeekAction::Set { week } => tracker.set_week_absolute(week),
    };

    println!(
        "Week {} of {} ({})",
        week,
        MAX_WEEK,
        format_multiplier(multiplier_percent(week))
    );
    Ok(())
}

fn cmd_plan(data_dir: PathBuf, config: &Config, week: Option<i64>, deload: bool) -> Result<()> {
    let tracker = open_tracker(&data_dir, config)?;
    let week = week
        .map(clamp_week)
        .unwrap_or_else(|| tracker.state().week());

    println!(
        "Week {} of {} | {}",
        week,
        MAX_WEEK,
        if deload {
            "deload".to_string()
        } else {
            format_multiplier(multiplier_percent(week))
        }
    );
    println!();

    for (idx, planned) in plan_for(tracker.program(), week, deload).iter().enumerate() {
        println!(
            "  {}. {:<34} {} x {}",
            idx + 1,
            planned.exercise.name,
            planned.sets,
            planned.exercise.reps
        );
    }
    println!();
    println!(
        "  Total: {} sets",
        total_sets(tracker.program(), week, deload)
    );
    Ok(())
}

fn cmd_rest(config: &Config, seconds: Option<u32>) -> Result<()> {
    let mut timer = RestTimer::new(seconds.unwrap_or_else(|| config.rest_seconds()));
    println!("Resting for {}s", timer.duration());

    if let Some(handle) = timer.start() {
        let mut flush_error = None;
        let expired = drive(Duration::from_secs(1), || {
            let outcome = timer.tick(handle);
            if let TickOutcome::Ticked { remaining } = outcome {
                if let Err(e) = print_countdown(remaining) {
                    flush_error = Some(e);
                    return TickOutcome::Ignored;
                }
            }
            outcome
        });
        if let Some(e) = flush_error {
            return Err(e.into());
        }
        if expired {
            print_rest_finished();
        }
    }
    Ok(())
}

fn cmd_history(
    data_dir: PathBuf,
    config: &Config,
    csv: Option<PathBuf>,
    limit: Option<usize>,
) -> Result<()> {
    let tracker = open_tracker(&data_dir, config)?;
    let history = tracker.history();

    if history.is_empty() {
        println!("No sessions recorded yet.");
    } else {
        let shown = history.recent(limit.unwrap_or(history.len()));
        println!("Session history ({} of {}):", shown.len(), history.len());
        for record in shown {
            println!("  {}", record);
        }
    }

    if let Some(path) = csv {
        let count = export_csv(history.records(), &path)?;
        println!("✓ Exported {} sessions to {}", count, path.display());
    }
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

fn render_event(event: &TrackerEvent) {
    match event {
        TrackerEvent::SessionCompleted(record) => {
            println!("\n✓ Session logged!");
            println!("  {}", record);
        }
        TrackerEvent::ExerciseChanged { .. } => println!("\n→ Next exercise"),
        TrackerEvent::WeekChanged(week) => println!("Week set to {}", week),
        TrackerEvent::DeloadChanged(true) => println!("Deload mode on"),
        TrackerEvent::DeloadChanged(false) => println!("Deload mode off"),
        TrackerEvent::PainChanged { joint, value } => {
            println!("{} pain: {}", joint, value)
        }
        TrackerEvent::TimerStarted { remaining } => println!("Resting for {}s", remaining),
        TrackerEvent::TimerTicked { remaining } => {
            if let Err(e) = print_countdown(*remaining) {
                tracing::warn!("Failed to flush countdown: {}", e);
            }
        }
        TrackerEvent::RestDurationChanged(seconds) => println!("Rest set to {}s", seconds),
        TrackerEvent::RestFinished => print_rest_finished(),
        TrackerEvent::PersistenceWarning(message) => eprintln!("warning: {}", message),
        TrackerEvent::SetAdvanced { .. }
        | TrackerEvent::NotesChanged
        | TrackerEvent::TimerPaused { .. }
        | TrackerEvent::TimerReset { .. } => {}
    }
}

fn print_countdown(remaining: u32) -> io::Result<()> {
    print!("\r  {:>3}s ", remaining);
    io::stdout().flush()
}

fn print_rest_finished() {
    // Terminal bell as the audible alert
    println!("\r  Rest over!\x07");
}

fn format_multiplier(percent: u32) -> String {
    format!("x{}.{}", percent / 100, (percent % 100) / 10)
}

fn display_view(view: &SessionView) {
    println!("\n╭─────────────────────────────────────────╮");
    print!("│  WEEK {} of {} ({})", view.week, MAX_WEEK, format_multiplier(view.multiplier_percent));
    if view.deload {
        print!("  [DELOAD]");
    }
    println!();
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Exercise {}/{}: {}",
        view.exercise_index + 1,
        view.exercise_count,
        view.exercise_name
    );
    println!("  {} | Reps: {}", view.set_progress(), view.reps);
    if let Some(ref media) = view.media_ref {
        println!("  ℹ Demo: {}", media);
    }
    println!(
        "  Rest: {}s | Shoulder pain: {} | Hip pain: {}",
        view.rest_duration, view.pain.shoulder, view.pain.hip
    );
    if let Some(ref notes) = view.notes {
        println!("  Notes: {}", notes);
    }
    println!();
}

fn print_prompt() -> Result<()> {
    println!("─────────────────────────────────────────");
    println!("Press Enter when the set is done");
    println!("  'r' rest   't N' rest length   'd' toggle deload   '+'/'-' week");
    println!("  's N' shoulder pain   'h N' hip pain   'n TEXT' notes   'q' quit");
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

// ============================================================================
// Input
// ============================================================================

#[derive(Debug, PartialEq)]
enum SessionCommand {
    CompleteSet,
    Rest,
    ToggleDeload,
    WeekUp,
    WeekDown,
    Pain(Joint, i64),
    Notes(String),
    RestLength(u32),
    Quit,
    Unknown(String),
}

fn parse_command(input: &str) -> SessionCommand {
    let input = input.trim();
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    };

    match head.to_lowercase().as_str() {
        "" => SessionCommand::CompleteSet,
        "r" => SessionCommand::Rest,
        "d" => SessionCommand::ToggleDeload,
        "+" => SessionCommand::WeekUp,
        "-" => SessionCommand::WeekDown,
        "q" => SessionCommand::Quit,
        "n" => SessionCommand::Notes(rest.to_string()),
        "t" => match rest.parse::<u32>() {
            Ok(seconds) => SessionCommand::RestLength(seconds),
            Err(_) => SessionCommand::Unknown(input.to_string()),
        },
        "s" | "h" => {
            let joint = if head.eq_ignore_ascii_case("s") {
                Joint::Shoulder
            } else {
                Joint::Hip
            };
            match rest.parse::<i64>() {
                Ok(value) => SessionCommand::Pain(joint, value),
                Err(_) => SessionCommand::Unknown(input.to_string()),
            }
        }
        _ => SessionCommand::Unknown(input.to_string()),
    }
}
