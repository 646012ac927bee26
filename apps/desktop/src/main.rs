use std::{io::Write as _, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    progress_state, submit_batch, ChangeOutcome, CrumbSource, HttpCrumbSource, Keypad, Tally,
    TallyEvent,
};
use gesture::{Feedback, GestureController, HapticPattern, TokioTimers};
use loaf_render::{render, CellMask, DotGroups};
use shared::{
    domain::{ActionType, GOAL},
    protocol::Stats,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod paint;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "crumbs", about = "Track crumbs toward the bread goal")]
struct Args {
    /// Backend API base, e.g. http://127.0.0.1:8000/api
    #[arg(long)]
    api_url: Option<String>,
    /// Draw with ASCII instead of terminal colors.
    #[arg(long)]
    plain: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch current totals and paint the loaf.
    Show {
        /// Also print the crumbs as grouped dots.
        #[arg(long)]
        dots: bool,
    },
    /// Paint the loaf for a given total without contacting the backend.
    Preview {
        total: i64,
        #[arg(long, default_value_t = GOAL)]
        goal: i64,
    },
    /// Log interactions and submit them as one batch.
    Log {
        #[arg(long, default_value_t = 0)]
        chat: i64,
        #[arg(long, default_value_t = 0)]
        call: i64,
        #[arg(long, default_value_t = 0)]
        deep: i64,
        #[arg(long, default_value_t = 0)]
        penalty: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Hold a counter control for a while using real timers and report the
    /// resulting count. Nothing is submitted.
    Rehearse {
        #[arg(value_enum)]
        action: ActionArg,
        /// How long the press lasts.
        #[arg(long, default_value_t = 250)]
        hold_ms: u64,
        /// Press the step button with this delta instead of the surface.
        #[arg(long, allow_negative_numbers = true)]
        step: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Chat,
    Call,
    Deep,
    Penalty,
}

impl From<ActionArg> for ActionType {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Chat => ActionType::Chat,
            ActionArg::Call => ActionType::Call,
            ActionArg::Deep => ActionType::Deep,
            ActionArg::Penalty => ActionType::Penalty,
        }
    }
}

struct TerminalFeedback;

impl Feedback for TerminalFeedback {
    fn feedback(&self, pattern: HapticPattern) {
        debug!(?pattern, ms = ?pattern.vibration_ms(), "feedback");
        if pattern == HapticPattern::Double {
            eprint!("\x07");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let color = !args.plain && std::env::var_os("NO_COLOR").is_none();

    match args.command {
        Command::Show { dots } => {
            let source = HttpCrumbSource::new(&settings.api_url)?;
            let stats = source.fetch_stats().await?;
            print_loaf(&stats, color);
            if dots {
                print_dots(stats.total_crumbs);
            }
        }
        Command::Preview { total, goal } => print_loaf(&preview_stats(total, goal), color),
        Command::Log {
            chat,
            call,
            deep,
            penalty,
            yes,
        } => {
            let source = HttpCrumbSource::new(&settings.api_url)?;
            let counts = [
                (ActionType::Chat, chat),
                (ActionType::Call, call),
                (ActionType::Deep, deep),
                (ActionType::Penalty, penalty),
            ];
            log_interactions(&source, &counts, yes, color).await?;
        }
        Command::Rehearse {
            action,
            hold_ms,
            step,
        } => {
            rehearse(&settings, action.into(), Duration::from_millis(hold_ms), step).await?;
        }
    }

    Ok(())
}

fn preview_stats(total: i64, goal: i64) -> Stats {
    let goal = goal.max(0);
    let total_crumbs = total.clamp(0, goal);
    let percent = if goal > 0 {
        total_crumbs as f64 / goal as f64 * 100.0
    } else {
        0.0
    };
    Stats {
        total_crumbs,
        goal,
        percent,
    }
}

fn print_loaf(stats: &Stats, color: bool) {
    let mask = CellMask::bolillo();
    let cells = render(progress_state(stats), mask);
    print!("{}", paint::paint_loaf(mask, &cells, color));
    println!("{}", paint::summary(stats));
}

fn print_dots(total: i64) {
    let dots = DotGroups::new(total);
    println!("{dots}");
    if dots.hidden() > 0 {
        println!("... and {} more crumbs not shown", dots.hidden());
    }
}

async fn log_interactions(
    source: &dyn CrumbSource,
    counts: &[(ActionType, i64)],
    yes: bool,
    color: bool,
) -> Result<()> {
    let mut tally = Tally::new(Arc::new(TerminalFeedback));
    for (action, count) in counts {
        if let ChangeOutcome::RejectedAtCeiling { attempted } = tally.apply(*action, *count) {
            return Err(anyhow!(
                "{attempted} {} is over the limit of {}",
                action.label(),
                shared::domain::CRUMB_CEILING
            ));
        }
    }

    let batch = tally.prepare_batch()?;
    if !yes && !confirm(&tally.confirmation_prompt())? {
        info!("log: cancelled");
        return Ok(());
    }

    submit_batch(source, &batch).await?;
    let stats = source.fetch_stats().await?;
    print_loaf(&stats, color);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn rehearse(
    settings: &Settings,
    action: ActionType,
    hold: Duration,
    step: Option<i64>,
) -> Result<()> {
    let feedback: Arc<dyn Feedback> = Arc::new(TerminalFeedback);
    let mut tally = Tally::new(feedback.clone());
    let (timers, mut fired) = TokioTimers::new();
    let mut control = GestureController::new(settings.gesture_config(), timers);
    let mut events = Vec::new();

    match step {
        Some(delta) => events.push(tally.handle(action, control.press_step(delta))),
        None => control.press_surface(),
    }

    let release = tokio::time::sleep(hold);
    tokio::pin!(release);
    loop {
        tokio::select! {
            Some(handle) = fired.recv() => {
                if let Some(gesture) = control.timer_fired(handle) {
                    events.push(tally.handle(action, gesture));
                }
            }
            _ = &mut release => break,
        }
    }

    match step {
        Some(_) => control.release_step(),
        None => {
            if let Some(gesture) = control.release_surface() {
                events.push(tally.handle(action, gesture));
            }
        }
    }
    control.teardown();

    if events.contains(&TallyEvent::EditRequested(action)) {
        let value = read_exact_value(feedback)?;
        tally.set_exact(action, value);
    }

    println!(
        "{} after {} ms: {} ({} events)",
        action.label(),
        hold.as_millis(),
        tally.count(action),
        events.len()
    );
    Ok(())
}

fn read_exact_value(feedback: Arc<dyn Feedback>) -> Result<i64> {
    print!("exact value: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read value")?;

    let mut keypad = Keypad::new(feedback);
    for digit in line.trim().chars().filter_map(|ch| ch.to_digit(10)) {
        keypad.push_digit(digit as u8);
    }
    Ok(keypad.confirm())
}
