//! Interactive timer session.
//!
//! Reads one command per line from stdin and ticks the coordinator once per
//! second while the timer runs. The tick schedule is reset every time the
//! timer starts, and ticks are not polled at all while it is paused.

use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use pomofocus_core::notifier;
use pomofocus_core::{
    format_minutes, Clock, Config, Coordinator, Event, KeyValueStore, MemoryStore, SystemClock,
    TimerMode,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::warn;

#[derive(Args)]
pub struct FocusArgs {
    /// Select this task for the session
    #[arg(long)]
    task: Option<String>,
    /// Keep everything in memory; nothing is read from or written to disk
    #[arg(long)]
    memory: bool,
}

const HELP: &str = "\
commands:
  s, start, pause      start or pause the timer
  r, reset             refill the current interval
  p, pomodoro          switch to a pomodoro
  sb, short            switch to a short break
  lb, long             switch to a long break
  add [-e N] <title>   add a task estimated at N pomodoros (default 1)
  done <id>            toggle a task's completed flag
  rm, delete <id>      delete a task
  select <id>          select (or unselect) a task
  tasks                list tasks
  stats                show statistics
  h, help              this text
  q, quit              leave";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusCommand {
    Toggle,
    Reset,
    Switch(TimerMode),
    Add { title: String, estimate: u32 },
    Done(String),
    Delete(String),
    Select(String),
    Tasks,
    Stats,
    Help,
    Quit,
}

impl FocusCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?;
        let cmd = match head {
            "s" | "start" | "pause" => FocusCommand::Toggle,
            "r" | "reset" => FocusCommand::Reset,
            "add" => {
                let rest: Vec<&str> = words.collect();
                let (estimate, title) = match rest.as_slice() {
                    [flag, n, title @ ..] if *flag == "-e" || *flag == "--estimate" => {
                        let n = n.parse::<u32>().ok().filter(|n| (1..=10).contains(n))?;
                        (n, title)
                    }
                    title => (1, title),
                };
                FocusCommand::Add {
                    title: title.join(" "),
                    estimate,
                }
            }
            "done" => FocusCommand::Done(words.next()?.to_string()),
            "rm" | "delete" => FocusCommand::Delete(words.next()?.to_string()),
            "select" => FocusCommand::Select(words.next()?.to_string()),
            "tasks" => FocusCommand::Tasks,
            "stats" => FocusCommand::Stats,
            "h" | "help" | "?" => FocusCommand::Help,
            "q" | "quit" | "exit" => FocusCommand::Quit,
            other => FocusCommand::Switch(other.parse().ok()?),
        };
        Some(cmd)
    }
}

pub fn run(
    db: Option<&Path>,
    config: &Config,
    args: FocusArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let store: Rc<dyn KeyValueStore> = if args.memory {
        Rc::new(MemoryStore::new())
    } else {
        super::open_store(db)?
    };
    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    let mut app = Coordinator::open(store, clock, notifier::from_config(&config.notifications));
    app.session_log_mut()
        .set_history_days(config.stats.history_days);

    if let Some(id) = args.task {
        if app.select_task(&id).is_none() {
            warn!(task_id = %id, "unknown task, starting without a selection");
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    runtime.block_on(drive(&mut app, stdin, &mut stdout))?;
    Ok(())
}

/// Run the session loop until `quit` or end of input.
pub async fn drive<R, W>(app: &mut Coordinator, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    writeln!(out, "{HELP}")?;
    render_status(app, out)?;

    loop {
        tokio::select! {
            _ = ticker.tick(), if app.timer().is_running() => {
                let events = app.tick();
                for event in &events {
                    render_event(app, event, out)?;
                }
                render_status(app, out)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(command) = FocusCommand::parse(&line) else {
                    writeln!(out, "unknown command: {} (try `help`)", line.trim())?;
                    continue;
                };
                if command == FocusCommand::Quit {
                    break;
                }
                let was_running = app.timer().is_running();
                apply(app, command, out)?;
                if !was_running && app.timer().is_running() {
                    // First tick lands one full second after start.
                    ticker.reset();
                }
            }
        }
    }
    writeln!(out)?;
    out.flush()
}

fn apply<W: Write>(
    app: &mut Coordinator,
    command: FocusCommand,
    out: &mut W,
) -> std::io::Result<()> {
    match command {
        FocusCommand::Toggle => {
            let event = app.toggle_timer();
            render_event(app, &event, out)?;
        }
        FocusCommand::Reset => {
            let event = app.reset_timer();
            render_event(app, &event, out)?;
        }
        FocusCommand::Switch(mode) => {
            let event = app.switch_mode(mode);
            render_event(app, &event, out)?;
        }
        FocusCommand::Add { title, estimate } => match app.add_task(&title, estimate) {
            Some(task) => writeln!(out, "added task {} {}", task.id, task.title)?,
            None => writeln!(out, "task title must not be empty")?,
        },
        FocusCommand::Done(id) => {
            if app.toggle_task_complete(&id) {
                writeln!(out, "toggled task {id}")?;
            } else {
                writeln!(out, "task not found: {id}")?;
            }
        }
        FocusCommand::Delete(id) => {
            if app.delete_task(&id) {
                writeln!(out, "deleted task {id}")?;
            } else {
                writeln!(out, "task not found: {id}")?;
            }
        }
        FocusCommand::Select(id) => match app.select_task(&id) {
            Some(selected) => writeln!(out, "selected task {selected}")?,
            None => writeln!(out, "no task selected")?,
        },
        FocusCommand::Tasks => render_tasks(app, out)?,
        FocusCommand::Stats => render_stats(app, out)?,
        FocusCommand::Help => writeln!(out, "{HELP}")?,
        FocusCommand::Quit => {}
    }
    render_status(app, out)
}

fn render_status<W: Write>(app: &Coordinator, out: &mut W) -> std::io::Result<()> {
    let snap = app.snapshot();
    let state = if snap.is_running { "running" } else { "paused" };
    let task = app
        .selected_task()
        .map(|t| format!(" | {} ({})", t.title, t.progress_label()))
        .unwrap_or_default();
    write!(
        out,
        "\r{} {} [{}] pomodoros: {}{}   ",
        snap.mode.label(),
        snap.display,
        state,
        snap.pomodoro_count,
        task
    )?;
    out.flush()
}

fn render_event<W: Write>(app: &Coordinator, event: &Event, out: &mut W) -> std::io::Result<()> {
    match event {
        Event::TimerCompleted { mode } => writeln!(out, "\n{} complete!", mode.label()),
        Event::ModeSwitched {
            to,
            automatic: true,
            ..
        } => writeln!(out, "next up: {} (press s to start)", to.label()),
        Event::LogSession { .. } => {
            let stats = app.stats();
            writeln!(
                out,
                "\ntoday: {} pomodoros, total focus {}",
                stats.today_pomodoros,
                format_minutes(stats.total_focus_minutes)
            )
        }
        _ => Ok(()),
    }
}

fn render_tasks<W: Write>(app: &Coordinator, out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    if app.tasks().is_empty() {
        return writeln!(out, "no tasks");
    }
    for task in app.tasks() {
        let marker = if app.selected_task_id() == Some(task.id.as_str()) {
            '>'
        } else {
            ' '
        };
        let done = if task.completed { 'x' } else { ' ' };
        writeln!(
            out,
            "{marker} [{done}] {} {} ({})",
            task.id,
            task.title,
            task.progress_label()
        )?;
    }
    Ok(())
}

fn render_stats<W: Write>(app: &Coordinator, out: &mut W) -> std::io::Result<()> {
    let stats = app.stats();
    writeln!(out)?;
    writeln!(out, "total focus time:  {}", format_minutes(stats.total_focus_minutes))?;
    writeln!(out, "total pomodoros:   {}", stats.total_pomodoros)?;
    writeln!(out, "today's pomodoros: {}", stats.today_pomodoros)?;
    for day in &stats.daily {
        writeln!(
            out,
            "  {:<14} {} pomodoros ({})",
            day.label,
            day.pomodoros,
            format_minutes(day.focus_minutes)
        )?;
    }
    Ok(())
}
