use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "memo")]
#[command(about = "Local-first markdown memo desk with autosave", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.memo-desk/config.toml)
    #[arg(long, global = true, env = "MEMO_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Open a memo folder (prompts when no path is given)")]
    Folder {
        /// Folder containing markdown memos
        path: Option<String>,
    },

    #[command(about = "List memos in the working folder, newest first")]
    List,

    #[command(about = "Open a memo and print it")]
    Open {
        /// Memo name or path
        memo: String,

        /// Show the raw markdown instead of the rendered view
        #[arg(short, long)]
        raw: bool,
    },

    #[command(about = "Create a new memo (default name: memo-YYYY-MM-DD-HHMM)")]
    New {
        name: Option<String>,
    },

    #[command(about = "Replace a memo's content from a file or stdin")]
    Write {
        /// Memo name or path
        memo: String,

        /// Read content from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    #[command(about = "Rename a memo")]
    Rename {
        /// Memo name or path
        memo: String,

        /// New name (without .md)
        name: String,
    },

    #[command(about = "Delete a memo")]
    Delete {
        /// Memo name or path
        memo: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    #[command(about = "Show the working folder, selection and settings")]
    Status,

    #[command(about = "Manage the editor font")]
    Font {
        #[command(subcommand)]
        command: FontCommands,
    },
}

#[derive(Subcommand)]
pub enum FontCommands {
    #[command(about = "Install a font file and use it in the editor")]
    Install {
        /// ttf / otf / woff / woff2 file (prompts when omitted)
        path: Option<String>,
    },

    #[command(about = "Go back to the default font")]
    Reset,

    #[command(about = "List installed fonts")]
    List,

    #[command(about = "Remove an installed font")]
    Remove {
        /// Font id (see `memo font list`)
        id: String,
    },

    #[command(about = "Print the @font-face rule for the current font")]
    Show,
}
