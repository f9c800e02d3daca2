//! Interactive shell mode for Folio CLI
//!
//! Keeps one bootstrapped page alive and feeds it clicks and form input.
//! The repository load runs in the background; its result is rendered as soon
//! as a command finishes after the load completes.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

use super::commands::open_page;
use super::commands::render::PageSummary;
use super::output::{OutputFormat, print_output, print_status};
use crate::controller::PageController;
use crate::github::GitHubClient;
use crate::page::{ClickTarget, PageEvent, render_document};
use crate::repos::RepoSource;
use crate::storage::Storage;
use crate::task::{LoadOutcome, RepoTask};
use crate::theme::Theme;

/// Command completer for the shell
#[derive(Default)]
struct ShellCompleter {
    commands: Vec<(&'static str, Vec<&'static str>)>,
}

impl ShellCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                ("menu", vec![]),
                ("link", vec![]),
                ("click", vec!["menu", "nav", "theme", "outside"]),
                ("theme", vec![]),
                ("form", vec!["name", "email", "message"]),
                ("submit", vec![]),
                ("status", vec![]),
                ("html", vec![]),
                ("wait", vec![]),
                ("open", vec![]),
                ("help", vec![]),
                ("exit", vec![]),
                ("quit", vec![]),
            ],
        }
    }

    fn pairs<'a>(words: impl Iterator<Item = &'a &'static str>) -> Vec<Pair> {
        words
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect()
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let words: Vec<&str> = line.split_whitespace().collect();
        let start = line.rfind(' ').map(|i| i + 1).unwrap_or(0);

        match words.len() {
            0 => Ok((0, Self::pairs(self.commands.iter().map(|(cmd, _)| cmd)))),
            1 if line.ends_with(' ') => {
                // Command complete, suggest its first argument
                let subs = self
                    .commands
                    .iter()
                    .find(|(cmd, _)| *cmd == words[0])
                    .map(|(_, subs)| Self::pairs(subs.iter()))
                    .unwrap_or_default();
                Ok((pos, subs))
            }
            1 => {
                let prefix = words[0];
                let candidates = self
                    .commands
                    .iter()
                    .map(|(cmd, _)| cmd)
                    .filter(|cmd| cmd.starts_with(prefix));
                Ok((start, Self::pairs(candidates)))
            }
            2 if !line.ends_with(' ') => {
                let prefix = words[1];
                let candidates = self
                    .commands
                    .iter()
                    .find(|(cmd, _)| *cmd == words[0])
                    .map(|(_, subs)| Self::pairs(subs.iter().filter(|s| s.starts_with(prefix))))
                    .unwrap_or_default();
                Ok((start, candidates))
            }
            _ => Ok((pos, vec![])),
        }
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellCompleter {}
impl Validator for ShellCompleter {}
impl Helper for ShellCompleter {}

/// Parse a command line into arguments, handling quotes
fn parse_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = ' ';

    for c in line.chars() {
        match c {
            '"' | '\'' if !in_quotes => {
                in_quotes = true;
                quote_char = c;
            }
            c if c == quote_char && in_quotes => {
                in_quotes = false;
            }
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Where a `click` lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Menu,
    Nav,
    Theme,
    Outside,
}

impl From<Target> for ClickTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Menu => ClickTarget::MenuToggle,
            Target::Nav => ClickTarget::NavPanel,
            Target::Theme => ClickTarget::ThemeToggle,
            Target::Outside => ClickTarget::Outside,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "folio", no_binary_name = true, disable_help_subcommand = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Click the menu button
    Menu,
    /// Click the nth navigation link (starting at 1)
    Link { n: usize },
    /// Click somewhere on the page
    Click {
        #[arg(value_enum)]
        target: Target,
    },
    /// Click the theme toggle
    Theme,
    /// Type into a contact form field
    Form { field: String, value: Vec<String> },
    /// Submit the contact form
    Submit,
    /// Show what the page currently displays
    Status,
    /// Print the page as HTML
    Html,
    /// Wait for the repository load to finish
    Wait,
    /// Open the nth repository card in the browser (starting at 1)
    Open { n: usize },
}

/// A live page plus its in-flight repository load
struct Session<S> {
    page: PageController<S>,
    repos: RepoTask,
    format: OutputFormat,
}

impl<S: Storage> Session<S> {
    /// Bootstrap the page and start loading repositories in the background
    fn start<R>(mut page: PageController<S>, source: R, format: OutputFormat) -> Self
    where
        R: RepoSource + Send + Sync + 'static,
    {
        let repos = page
            .init()
            .map(|request| RepoTask::spawn(source, request))
            .unwrap_or_default();
        Self {
            page,
            repos,
            format,
        }
    }

    /// Render the repository load if it has finished
    fn poll(&mut self) {
        if let Some(outcome) = self.repos.try_finish() {
            self.complete(outcome);
        }
    }

    async fn wait(&mut self) {
        match self.repos.finish().await {
            Some(outcome) => self.complete(outcome),
            None => println!("Nothing to wait for."),
        }
    }

    fn complete(&mut self, outcome: LoadOutcome) {
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Repository task failed: {}", e);
                return;
            }
        };
        self.page.finish_repos(result);
        let doc = self.page.document();
        match doc.visible_placeholder() {
            Some(text) => println!("{}", text),
            None => println!("Loaded {} repositories.", doc.cards().len()),
        }
    }

    fn click(&mut self, target: ClickTarget) {
        self.page.dispatch(PageEvent::Click(target));
        let state = self.page.state();
        println!(
            "Navigation {}, {} theme",
            if state.nav_open { "open" } else { "closed" },
            state.theme
        );
    }

    async fn run(&mut self, command: ShellCommand) -> Result<()> {
        match command {
            ShellCommand::Menu => self.click(ClickTarget::MenuToggle),
            ShellCommand::Link { n } => {
                let idx = self
                    .page
                    .document()
                    .nav
                    .as_ref()
                    .and_then(|nav| nav.link_indices().nth(n.saturating_sub(1)))
                    .ok_or_else(|| anyhow::anyhow!("No navigation link #{}", n))?;
                self.click(ClickTarget::NavItem(idx));
            }
            ShellCommand::Click { target } => self.click(target.into()),
            ShellCommand::Theme => self.click(ClickTarget::ThemeToggle),
            ShellCommand::Form { field, value } => {
                let form = self
                    .page
                    .document_mut()
                    .contact_form
                    .as_mut()
                    .ok_or_else(|| anyhow::anyhow!("The page has no contact form"))?;
                let slot = form
                    .field_mut(&field)
                    .ok_or_else(|| anyhow::anyhow!("Unknown form field: {}", field))?;
                *slot = value.join(" ");
            }
            ShellCommand::Submit => {
                self.page.dispatch(PageEvent::Submit);
                if let Some(feedback) = &self.page.document().feedback {
                    print_status(feedback.classes.contains("success"), &feedback.text);
                }
            }
            ShellCommand::Status => print_output(&PageSummary::new(&self.page), self.format),
            ShellCommand::Html => println!("{}", render_document(self.page.document())),
            ShellCommand::Wait => self.wait().await,
            ShellCommand::Open { n } => {
                let card = self
                    .page
                    .document()
                    .cards()
                    .get(n.saturating_sub(1))
                    .ok_or_else(|| anyhow::anyhow!("No repository card #{}", n))?;
                open::that(&card.url)?;
                println!("Opened {}", card.url);
            }
        }
        Ok(())
    }
}

/// Run a single shell line.
/// Returns Ok(true) to continue, Ok(false) to exit gracefully.
async fn run_command<S: Storage>(session: &mut Session<S>, args: Vec<String>) -> Result<bool> {
    let Some(first) = args.first() else {
        return Ok(true);
    };

    match first.as_str() {
        "help" => {
            print_help();
            return Ok(true);
        }
        "exit" | "quit" => {
            return Ok(false);
        }
        _ => {}
    }

    let line = match ShellLine::try_parse_from(&args) {
        Ok(line) => line,
        Err(e) => {
            // Print clap's error message (includes usage hints)
            println!("{}", e);
            return Ok(true);
        }
    };

    session.run(line.command).await?;
    Ok(true)
}

fn print_help() {
    println!(
        r#"Folio Interactive Shell

Commands:
  menu                     Click the menu button
  link <n>                 Click the nth navigation link
  click <target>           Click menu, nav, theme or outside
  theme                    Click the theme toggle

  form <field> <value>     Fill in name, email or message
  submit                   Submit the contact form

  status                   Show what the page displays
  html                     Print the page as HTML
  wait                     Wait for repositories to load
  open <n>                 Open the nth repository in a browser

  help                     Show this help
  exit, quit               Exit the shell
"#
    );
}

/// Get the history file path
fn history_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "folio", "Folio")
        .map(|dirs| dirs.data_dir().join("shell_history"))
}

/// Run the interactive shell
pub async fn run(prefers: Option<Theme>, format: OutputFormat) -> Result<()> {
    println!("Folio Interactive Shell v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let config = crate::config::Config::load()?;
    let page = open_page(&config, prefers)?;
    let client = GitHubClient::new()?;
    let mut session = Session::start(page, client, format);

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(ShellCompleter::new()));

    // Load history
    if let Some(path) = history_path() {
        let _ = rl.load_history(&path);
    }

    loop {
        session.poll();

        let prompt = if session.repos.is_running() {
            "folio (loading)> "
        } else {
            "folio> "
        };

        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                let args = parse_args(line);
                match run_command(&mut session, args).await {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    // Save history
    if let Some(path) = history_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(&path);
    }

    Ok(())
}
