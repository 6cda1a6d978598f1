//! Interactive session
//!
//! Reads commands from stdin and keeps one [`Workbench`] alive across them.
//! Backend calls run concurrently on a [`JoinSet`]; the loop applies each
//! response as it completes, so a slow answer for a video the user already
//! left is discarded instead of overwriting the current view.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

use vidqa::api::BackendClient;
use vidqa::app::{dispatch, Outcome, Request, Response, Workbench};
use vidqa::session::{LoadId, MediaSource, Phase, Player, View};
use vidqa::theme::{current_theme, Theme};
use vidqa::timecode::TimeCode;
use vidqa::Config;

use super::search::render_hits;
use super::{client, render_catalog, render_results, runtime, spawn_request, terminal_width};

const PROMPT: &str = "vidqa> ";

const HELP: &str = "\
Commands:
  list                 Refresh and show processed videos
  open <N|ID>          Load catalog video N, a hash or a composite id
  upload <FILE>        Play a local file and send it for analysis
  ask <QUESTION>       Ask about the active video
  search <KEYWORD>     Search every processed video
  select <N>           Jump to displayed result N
  hit <G> <N>          Jump to result N of search hit G
  seek <MM:SS>         Move the playhead
  view <summary|qa|search>
  status               Show what is loaded and running
  help                 Show this help
  quit                 Leave the shell";

/// One line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    List,
    Open(String),
    Upload(PathBuf),
    Ask(String),
    Search(String),
    /// 0-based index into the displayed results
    Select(usize),
    /// 0-based hit group and entry
    Hit(usize, usize),
    Seek(TimeCode),
    View(View),
    Status,
    Help,
    Quit,
}

/// Parse a 1-based position into a 0-based index.
fn parse_position(text: &str, what: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("{what} must be a number starting at 1, got '{}'", text.trim())),
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest)
    }
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(ShellCommand::List),
            "open" => Ok(ShellCommand::Open(required(rest, "open <N|ID>")?.to_string())),
            "upload" => Ok(ShellCommand::Upload(PathBuf::from(required(rest, "upload <FILE>")?))),
            "ask" => Ok(ShellCommand::Ask(required(rest, "ask <QUESTION>")?.to_string())),
            "search" => Ok(ShellCommand::Search(required(rest, "search <KEYWORD>")?.to_string())),
            "select" => Ok(ShellCommand::Select(parse_position(
                required(rest, "select <N>")?,
                "result",
            )?)),
            "hit" => {
                let mut parts = required(rest, "hit <G> <N>")?.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(group), Some(entry), None) => Ok(ShellCommand::Hit(
                        parse_position(group, "hit")?,
                        parse_position(entry, "result")?,
                    )),
                    _ => Err("usage: hit <G> <N>".to_string()),
                }
            }
            "seek" => required(rest, "seek <MM:SS>")?
                .parse::<TimeCode>()
                .map(ShellCommand::Seek)
                .map_err(|e| e.to_string()),
            "view" => required(rest, "view <summary|qa|search>")?
                .parse::<View>()
                .map(ShellCommand::View),
            "status" => Ok(ShellCommand::Status),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

/// Player that reports to the terminal.
///
/// There is no decoder behind it: a new source counts as ready as soon as
/// the event loop picks up the notification.
#[derive(Debug)]
pub struct TerminalPlayer {
    ready_tx: mpsc::UnboundedSender<LoadId>,
    theme: Theme,
    url: Option<String>,
}

impl TerminalPlayer {
    pub fn new(ready_tx: mpsc::UnboundedSender<LoadId>, theme: Theme) -> Self {
        Self {
            ready_tx,
            theme,
            url: None,
        }
    }
}

impl Player for TerminalPlayer {
    fn set_source(&mut self, source: &MediaSource) {
        println!("{}", self.theme.secondary_text(&format!("loading {}", source.url)));
        self.url = Some(source.url.clone());
        // Receiver only goes away when the shell exits
        let _ = self.ready_tx.send(source.load);
    }

    fn set_position(&mut self, seconds: f64) {
        println!("{}", self.theme.secondary_text(&format!("position {seconds:.0}s")));
    }

    fn play(&mut self) {
        if let Some(url) = &self.url {
            println!("{} {}", self.theme.accent_text("playing"), url);
        }
    }
}

/// Shell state: workbench, backend and in-flight calls.
struct Shell {
    workbench: Workbench<TerminalPlayer>,
    client: BackendClient,
    tasks: JoinSet<Response>,
    theme: Theme,
}

impl Shell {
    fn start(&mut self, request: Request) {
        spawn_request(&mut self.tasks, &self.client, request);
    }

    /// Run one command. Returns false on quit.
    fn execute(&mut self, command: ShellCommand) -> bool {
        let result = match command {
            ShellCommand::Quit => return false,
            ShellCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            ShellCommand::Status => {
                self.print_status();
                Ok(())
            }
            ShellCommand::List => {
                let request = self.workbench.refresh_catalog();
                self.start(request);
                Ok(())
            }
            ShellCommand::Open(key) => self.workbench.open(&key).map(|_| self.print_description()),
            ShellCommand::Upload(path) => self.workbench.upload(&path).map(|requests| {
                for request in requests {
                    self.start(request);
                }
            }),
            ShellCommand::Ask(question) => self.workbench.ask(&question).map(|request| self.start(request)),
            ShellCommand::Search(keyword) => {
                if let Some(request) = self.workbench.search(&keyword) {
                    self.start(request);
                }
                Ok(())
            }
            ShellCommand::Select(index) => self.workbench.select(index),
            ShellCommand::Hit(group, index) => self.workbench.select_hit(group, index),
            ShellCommand::Seek(time_code) => self.workbench.seek(time_code),
            ShellCommand::View(view) => {
                self.workbench.set_view(view);
                self.print_view();
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("{}", self.theme.error_text(&e.to_string()));
        }
        true
    }

    fn handle_response(&mut self, response: Response) {
        let endpoint = response.label();
        let update = self.workbench.apply(response);
        debug!(endpoint, outcome = ?update.outcome, "Applied response");

        match update.outcome {
            Outcome::Applied => match endpoint {
                "list-processed-videos" => {
                    println!(
                        "{}",
                        render_catalog(self.workbench.catalog(), &self.theme, terminal_width())
                    );
                }
                "analyze-video" => {
                    println!("{}", self.theme.success_text("Analysis finished."));
                    self.print_description();
                }
                "index-video" => println!("{}", self.theme.success_text("Indexing finished.")),
                _ => self.print_view(),
            },
            Outcome::Failed => {
                if let Some(banner) = self.workbench.take_banner() {
                    println!("{}", self.theme.error_text(&banner));
                }
            }
            Outcome::Discarded => {}
        }
        for request in update.follow_up {
            self.start(request);
        }
    }

    fn print_description(&self) {
        let description = &self.workbench.state().description;
        if !description.is_empty() {
            println!("{}", self.theme.primary_text(description));
        }
    }

    fn print_view(&self) {
        let state = self.workbench.state();
        match state.view {
            View::Summary => self.print_description(),
            View::Qa => match &state.displayed {
                Some(results) if results.view == View::Qa => {
                    println!("{}", render_results(results, state.selected_result, &self.theme));
                }
                _ => println!("{}", self.theme.secondary_text("No answers yet.")),
            },
            View::Search => println!("{}", render_hits(self.workbench.search_hits(), &self.theme)),
        }
    }

    fn print_status(&self) {
        let state = self.workbench.state();
        let video = state.active_video_id().unwrap_or("none");
        let phase = match state.phase {
            Phase::Loading {
                pending_seek: Some(time_code),
                ..
            } => format!("loading (seek to {time_code})"),
            phase => phase.label().to_string(),
        };
        println!("{} {}", self.theme.accent_text("video:"), video);
        println!("{} {}", self.theme.accent_text("state:"), phase);
        println!("{} {}", self.theme.accent_text("view:"), state.view);
        if let Some(entry) = state.selected_entry() {
            println!("{} {} (frame {})", self.theme.accent_text("selected:"), entry.time_code, entry.source_frame);
        }
        println!("{} {}", self.theme.accent_text("busy:"), self.workbench.activity().describe());
    }
}

fn prompt() {
    print!("{PROMPT}");
    let _ = std::io::stdout().flush();
}

#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config) -> Result<()> {
    runtime()?.block_on(run(config))
}

async fn run(config: &Config) -> Result<()> {
    let theme = current_theme();
    let (ready_tx, mut ready_rx) = mpsc::unbounded_channel();
    let mut shell = Shell {
        workbench: Workbench::new(TerminalPlayer::new(ready_tx, theme.clone()), config.playback.interval()?),
        client: client(config)?,
        tasks: JoinSet::new(),
        theme,
    };
    info!(backend = shell.client.base_url(), "Starting shell");

    // Catalog first, so `open N` works from the first prompt
    let request = shell.workbench.refresh_catalog();
    let response = dispatch(&shell.client, request).await;
    shell.handle_response(response);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match line.parse::<ShellCommand>() {
                    Ok(command) => {
                        if !shell.execute(command) {
                            break;
                        }
                    }
                    Err(e) if e.is_empty() => {}
                    Err(e) => println!("{}", shell.theme.error_text(&e)),
                }
                prompt();
            }
            Some(joined) = shell.tasks.join_next(), if !shell.tasks.is_empty() => {
                match joined {
                    Ok(response) => shell.handle_response(response),
                    Err(e) => println!("{}", shell.theme.error_text(&format!("Backend task failed: {e}"))),
                }
                prompt();
            }
            Some(load) = ready_rx.recv() => {
                shell.workbench.source_ready(load);
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    shell.tasks.abort_all();
    Ok(())
}
