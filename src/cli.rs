use clap::{ArgAction, Parser, Subcommand};
use io_manager::stream::ErrorPolicy;
use std::path::PathBuf;

/// Read, write, copy and inspect files with typed stream errors
#[derive(Parser, Debug)]
#[command(name = "io-manager")]
#[command(version)]
#[command(about = "Read, write, copy and inspect files with typed stream errors", long_about = None)]
pub struct Args {
    /// Path to a config file (defaults to ./io-manager.config.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Error policy: propagate or legacy
    #[arg(long, global = true, value_name = "POLICY")]
    pub policy: Option<ErrorPolicy>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a line of text to a file
    Write {
        /// Target file
        path: PathBuf,
        /// Text to write (read from stdin when omitted)
        content: Option<String>,
        /// Append instead of truncating
        #[arg(short, long)]
        append: bool,
    },
    /// Print the text of a file (stdin when no path is given)
    Read {
        path: Option<PathBuf>,
    },
    /// Copy a file verbatim
    Copy {
        input: PathBuf,
        output: PathBuf,
        /// Append to the output instead of truncating it
        #[arg(short, long)]
        append: bool,
    },
    /// Summarize the records of an object file
    Inspect {
        path: PathBuf,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default tracing filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
