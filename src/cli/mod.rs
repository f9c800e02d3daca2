//! CLI module for Folio
//!
//! Provides one-shot commands over the portfolio page and an interactive
//! shell that keeps a single page alive between commands.

mod commands;
mod output;
mod shell;

use clap::{Parser, Subcommand};

use crate::theme::Theme;

pub use output::{OutputFormat, print_error};

/// Folio - portfolio page controller
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    /// Operating system color-scheme preference to assume
    #[arg(long, global = true, value_enum)]
    pub prefers_color_scheme: Option<Theme>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bootstrap the page, load repositories and print the result
    Render {
        /// Print the page as HTML
        #[arg(long)]
        html: bool,
    },

    /// Theme preference
    Theme {
        #[command(subcommand)]
        command: commands::theme::ThemeCommands,
    },

    /// List the repositories the page would show
    Repos,

    /// Validate a contact form submission
    Contact {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        message: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Interactive page session
    Shell,
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output.format();
    let quiet = cli.output.quiet;
    let prefers = cli.prefers_color_scheme;

    match cli.command {
        Commands::Render { html } => commands::render::run(html, prefers, format).await,
        Commands::Theme { command } => commands::theme::run(command, prefers, format, quiet).await,
        Commands::Repos => commands::repos::run(prefers, format).await,
        Commands::Contact {
            name,
            email,
            message,
        } => commands::contact::run(name, email, message, format).await,
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
        Commands::Shell => shell::run(prefers, format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "folio",
            "render",
            "--html",
            "--prefers-color-scheme",
            "light",
            "--json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Render { html: true }));
        assert_eq!(cli.prefers_color_scheme, Some(Theme::Light));
        assert_eq!(cli.output.format(), OutputFormat::Json);
    }

    #[test]
    fn test_parse_contact() {
        let cli = Cli::try_parse_from(["folio", "contact", "--name", "Ada", "--email", "a@b.co"])
            .unwrap();
        match cli.command {
            Commands::Contact { name, email, message } => {
                assert_eq!(name, "Ada");
                assert_eq!(email, "a@b.co");
                assert_eq!(message, "");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["folio", "theme", "set", "sepia"]).is_err());
    }
}
