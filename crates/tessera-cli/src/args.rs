//! Command-line argument definitions for the Tessera CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the message source, the output path and
//! format, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Output document format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Self-contained HTML page with inline SVG diagrams
    #[default]
    Html,
    /// Plain text with fenced blocks
    Text,
    /// Segments as JSON
    Json,
}

/// Command-line arguments for the Tessera message renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the message file, or `-` to read standard input
    #[arg(
        help = "Path to the input message (`-` for stdin)",
        required_unless_present_any = ["prompt", "agents"]
    )]
    pub input: Option<String>,

    /// Render the canned assistant response to this prompt instead of a file
    #[arg(long, conflicts_with = "input")]
    pub prompt: Option<String>,

    /// List the agent library, optionally filtered by a search term
    #[arg(
        long,
        value_name = "SEARCH",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with_all = ["input", "prompt"]
    )]
    pub agents: Option<String>,

    /// Path to the output file, or `-` for standard output
    #[arg(short, long, default_value = "out.html")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Only check that every diagram block parses; write no output
    #[arg(long)]
    pub check: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["tessera", "message.md"]).unwrap();
        assert_eq!(args.input.as_deref(), Some("message.md"));
        assert_eq!(args.output, "out.html");
        assert_eq!(args.format, OutputFormat::Html);
        assert!(!args.check);
    }

    #[test]
    fn test_prompt_replaces_input() {
        let args = Args::try_parse_from(["tessera", "--prompt", "flowchart", "-f", "json"]).unwrap();
        assert_eq!(args.prompt.as_deref(), Some("flowchart"));
        assert_eq!(args.format, OutputFormat::Json);

        assert!(Args::try_parse_from(["tessera"]).is_err());
        assert!(Args::try_parse_from(["tessera", "a.md", "--prompt", "x"]).is_err());
    }

    #[test]
    fn test_agents_without_search() {
        let args = Args::try_parse_from(["tessera", "--agents"]).unwrap();
        assert_eq!(args.agents.as_deref(), Some(""));

        let args = Args::try_parse_from(["tessera", "--agents", "summary"]).unwrap();
        assert_eq!(args.agents.as_deref(), Some("summary"));
    }
}
