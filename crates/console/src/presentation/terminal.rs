//! Interactive line-based front end.
//!
//! Plain lines are submitted as instructions. Lines starting with `:` are
//! console commands. New timeline entries are printed as they arrive.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use simdeck_domain::{EntryId, InstructionDraft, InventoryKind, Timeline};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::app::App;
use crate::presentation::render;
use crate::use_cases::DispatchError;

const HELP: &str = "\
Type an instruction and press Enter to send it. Commands:
  :status          connection status
  :objects         available objects
  :scene           objects in the scene
  :history         the whole timeline
  :show <n>        details of entry n
  :pick <name>     insert an object name into the draft
  :draft <text>    append text to the draft
  :send            send the draft
  :reset           clear the session and reconnect
  :quit            exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Empty,
    Submit(String),
    Status,
    Objects,
    Scene,
    History,
    Show(usize),
    Pick(String),
    Draft(String),
    Send,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Self::Submit(line.to_string());
        };

        // Arguments keep their spacing so the draft sees them verbatim
        let (name, arg) = match command.split_once(' ') {
            Some((name, arg)) => (name, arg),
            None => (command, ""),
        };

        match name {
            "status" => Self::Status,
            "objects" => Self::Objects,
            "scene" => Self::Scene,
            "history" => Self::History,
            "show" => match arg.trim().parse() {
                Ok(index) => Self::Show(index),
                Err(_) => Self::Unknown(line.to_string()),
            },
            "pick" if !arg.trim().is_empty() => Self::Pick(arg.to_string()),
            "draft" if !arg.is_empty() => Self::Draft(arg.to_string()),
            "send" => Self::Send,
            "reset" => Self::Reset,
            "help" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

pub struct Terminal {
    app: Arc<App>,
    draft: InstructionDraft,
}

impl Terminal {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            draft: InstructionDraft::new(),
        }
    }

    /// Read stdin until `:quit`, end of input, or shutdown.
    pub async fn run(mut self) -> io::Result<()> {
        let shutdown = self.app.shutdown_token();
        let mut lines = spawn_line_reader(io::BufReader::new(io::stdin()))?;
        let printer = spawn_printer(self.app.clone());

        println!("{}", HELP);

        loop {
            let line = tokio::select! {
                _ = shutdown.cancelled() => break,
                line = lines.recv() => line.transpose()?,
            };
            let Some(line) = line else {
                tracing::debug!("End of input");
                break;
            };
            if !self.handle(ConsoleCommand::parse(&line)).await {
                break;
            }
        }

        printer.abort();
        Ok(())
    }

    /// Execute one command. Returns `false` when the console should exit.
    async fn handle(&mut self, command: ConsoleCommand) -> bool {
        match command {
            ConsoleCommand::Empty => {}
            ConsoleCommand::Submit(text) => self.submit(text),
            ConsoleCommand::Status => {
                println!("{}", render::status_line(&self.app.session.snapshot().await));
            }
            ConsoleCommand::Objects => self.print_inventory(InventoryKind::Available).await,
            ConsoleCommand::Scene => self.print_inventory(InventoryKind::Scene).await,
            ConsoleCommand::History => {
                let newest_first = self.app.config.newest_first;
                let lines = self
                    .app
                    .session
                    .read(|state| render::history(&state.timeline, newest_first))
                    .await;
                for line in lines {
                    println!("{}", line);
                }
            }
            ConsoleCommand::Show(index) => {
                let details = self
                    .app
                    .session
                    .read(|state| state.timeline.get(index).map(render::entry_details))
                    .await;
                match details {
                    Some(details) => println!("{}", details),
                    None => println!("No entry {}.", index),
                }
            }
            ConsoleCommand::Pick(name) => {
                self.draft.insert_object(&name);
                println!("Draft: {}", self.draft.as_str());
            }
            ConsoleCommand::Draft(text) => {
                self.draft.push_str(&text);
                println!("Draft: {}", self.draft.as_str());
            }
            ConsoleCommand::Send => {
                let text = self.draft.take();
                self.submit(text);
            }
            ConsoleCommand::Reset => {
                self.app.reset().await;
                println!("Session reset.");
            }
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => return false,
            ConsoleCommand::Unknown(line) => println!("Unknown command: {} (try :help)", line),
        }
        true
    }

    /// Dispatch in the background so the prompt stays responsive.
    fn submit(&self, text: String) {
        let app = self.app.clone();
        tokio::spawn(async move {
            match app.submit(&text).await {
                Ok(_) => {}
                Err(DispatchError::Rejected(_)) => println!("Nothing to send."),
                // Already logged by the dispatcher
                Err(DispatchError::Backend { .. }) => {}
            }
        });
    }

    async fn print_inventory(&self, kind: InventoryKind) {
        let excluded = &self.app.config.excluded_keywords;
        let panel = self
            .app
            .session
            .read(|state| render::inventory_panel(kind, state, excluded))
            .await;
        println!("{}", panel);
    }
}

/// Read lines on a dedicated thread.
///
/// The thread is detached: a read still pending at exit does not hold up
/// runtime shutdown the way `tokio::io::stdin` does.
fn spawn_line_reader<R>(input: R) -> io::Result<mpsc::Receiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    thread::Builder::new()
        .name("simdeck-stdin".to_string())
        .spawn(move || {
            for line in input.lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Index of the first entry not yet printed, given the last printed id.
///
/// An id that is no longer on the timeline means the session was reset, so
/// everything is new again.
fn unprinted(timeline: &Timeline, last: Option<EntryId>) -> usize {
    last.and_then(|id| timeline.position(id))
        .map_or(0, |index| index + 1)
}

/// Print entries and connection changes as the session changes.
fn spawn_printer(app: Arc<App>) -> JoinHandle<()> {
    let mut changes: watch::Receiver<u64> = app.session.subscribe();
    tokio::spawn(async move {
        let mut last_printed: Option<EntryId> = None;
        let mut last_status = String::new();

        loop {
            let snapshot = app.session.snapshot().await;
            let timeline = &snapshot.state.timeline;
            let start = unprinted(timeline, last_printed);
            for (index, entry) in timeline.entries().iter().enumerate().skip(start) {
                println!("{}", render::entry_line(index, entry));
                last_printed = Some(entry.id());
            }

            let status = render::status_line(&snapshot);
            if status != last_status {
                println!("{}", status);
                last_status = status;
            }

            if changes.changed().await.is_err() {
                break;
            }
        }
    })
}
