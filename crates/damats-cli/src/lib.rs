//! Shared CLI definitions for damats.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

/// MIME type requested from the reference endpoint when nothing else is given.
pub const DEFAULT_MIME_TYPE: &str = "text/tab-separated-values";

/// Output format for non-interactive mode.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PrintFormat {
    /// The dialog's template data as pretty-printed JSON
    Json,
    /// Aligned plain-text table
    Table,
}

/// Command-line arguments for damats
#[derive(Clone, Parser, Debug)]
#[command(
    name = "damats",
    version,
    about = "DAMATS class statistics in the terminal",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    /// URL or path of the statistics table (TSV).
    /// Not required with --output, --generate-config or --clear-cache
    #[arg(required_unless_present_any = ["output", "generate_config", "clear_cache"], value_name = "REFERENCE")]
    pub reference: Option<String>,

    /// JSON process-output descriptor; its `reference.url` is fetched and the rest is shown as metadata
    #[arg(long = "output", value_name = "FILE", conflicts_with = "reference")]
    pub output: Option<PathBuf>,

    /// MIME type sent in the Accept header (default: text/tab-separated-values, or config)
    #[arg(long = "mime-type", value_name = "TYPE")]
    pub mime_type: Option<String>,

    /// 0-based index of the output class to highlight
    #[arg(long = "class-idx", value_name = "N")]
    pub class_idx: Option<usize>,

    /// 0-based index of the land-cover class to highlight (counted among rows with non-zero pixels)
    #[arg(long = "lc-class-idx", value_name = "N")]
    pub lc_class_idx: Option<usize>,

    /// Print the parsed statistics and exit instead of opening the dialog
    #[arg(long = "print", value_enum, value_name = "FORMAT")]
    pub print: Option<PrintFormat>,

    /// HTTP request timeout in seconds (overrides config [http] timeout_secs)
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable debug mode to show operational information and write a debug log
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Generate default configuration file at ~/.config/damats/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,

    /// Remove cached log files and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
///
/// Used by the gen_docs binary; output is written to stdout.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    let usage = cmd.render_usage();
    out.push_str(&usage.to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let option_str = if arg.is_positional() {
            if arg.is_required_set() {
                placeholder
            } else {
                format!("[{placeholder}]")
            }
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            if placeholder.is_empty() || !arg.get_action().takes_values() {
                op
            } else {
                format!("{op} {placeholder}")
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}
