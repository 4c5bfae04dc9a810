//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ToolVault - detect and render tool execution results
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long, global = true, env = "TOOLVAULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Configuration profile (development, production, read-only, minimal)
    #[arg(short, long, global = true, env = "TOOLVAULT_PROFILE")]
    pub profile: Option<String>,

    /// Output format (json, human, text)
    #[arg(long, global = true)]
    pub output_format: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect the output type of a value
    Detect(InputArgs),

    /// Render a value for the terminal
    Render(RenderArgs),

    /// Inspect recorded executions
    #[command(subcommand)]
    History(HistoryCommand),

    /// Manage saved parameter templates
    #[command(subcommand)]
    Templates(TemplatesCommand),
}

/// Where the value comes from and what is known about it
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON file to read, or `-` for stdin. Input that is not JSON is
    /// treated as a plain string.
    pub input: PathBuf,

    /// Explicit output type; skips detection
    #[arg(long = "type")]
    pub output_type: Option<String>,

    /// Extra metadata as a JSON object, e.g. '{"chartType": "line"}'
    #[arg(long)]
    pub metadata: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// JSON file to read, or `-` for stdin
    pub input: PathBuf,

    /// Render as this type instead of the detected one
    #[arg(long = "type")]
    pub output_type: Option<String>,

    /// Extra metadata as a JSON object
    #[arg(long)]
    pub metadata: Option<String>,

    /// Display only; overrides are rejected
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub read_only: bool,

    /// Do not record this execution in history
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_history: bool,

    /// Tool id stored with the history entry
    #[arg(long, default_value = "cli")]
    pub tool: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List recorded executions, newest first
    List {
        /// Only bookmarked entries
        #[arg(long, action = clap::ArgAction::SetTrue)]
        bookmarked: bool,
    },
    /// Bookmark an entry so it is never evicted
    Bookmark { id: String },
    /// Remove a bookmark
    Unbookmark { id: String },
    /// Delete every entry
    Clear,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TemplatesCommand {
    /// List saved templates
    List,
    /// Write all templates to a JSON file
    Export { file: PathBuf },
    /// Load templates from a JSON file
    Import { file: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "toolvault",
            "-vv",
            "render",
            "out.json",
            "--type",
            "table",
            "--read-only",
            "--output-format",
            "text",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output_format.as_deref(), Some("text"));
        match cli.command {
            Command::Render(args) => {
                assert_eq!(args.output_type.as_deref(), Some("table"));
                assert!(args.read_only);
                assert!(!args.no_history);
                assert_eq!(args.tool, "cli");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_history_bookmark() {
        let cli = Cli::try_parse_from(["toolvault", "history", "bookmark", "abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::History(HistoryCommand::Bookmark { id }) if id == "abc"
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
