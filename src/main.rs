mod cli;
mod config;

use anyhow::Context;
use cli::{Args, Command};
use config::{discover_config, load_config_from_path, Settings};
use io_manager::prelude::*;
use io_manager::shared::error::ExitCode;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();
    init_tracing(&args);

    if let Err(e) = run(args) {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(exit_code_for(&e).as_i32());
    }
}

/// Installs the stderr log subscriber; `-v` wins over `RUST_LOG`
fn init_tracing(args: &Args) {
    let filter = if args.verbose > 0 {
        EnvFilter::new(args.log_filter())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    error
        .downcast_ref::<StreamError>()
        .map(StreamError::exit_code)
        .unwrap_or(ExitCode::ApplicationError)
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => discover_config(Path::new("."))?.unwrap_or_default(),
    };
    let settings = config.resolve(args.policy);
    tracing::debug!(?settings, "Resolved settings");

    match args.command {
        Command::Inspect { path } => {
            let summary = InspectObjectsUseCase::new(settings.options).execute(&path)?;
            print_stdout(&render_summary(&path, &summary))
        }
        command => {
            let request = build_request(command, &settings)?;
            let use_case = TextTransferUseCase::new(
                OneShot::new(settings.options),
                settings.policy,
                StderrProgressReporter::new(),
            );
            let response = use_case.execute(request)?;
            match response.text {
                Some(text) => print_stdout(&text),
                None => Ok(()),
            }
        }
    }
}

fn build_request(command: Command, settings: &Settings) -> Result<TransferRequest> {
    let request = match command {
        Command::Write {
            path,
            content,
            append,
        } => {
            let content = match content {
                Some(content) => content,
                None => {
                    let piped = OneShot::new(settings.options).read_all_text_from_stdin()?;
                    // write_text adds the terminator back
                    piped.strip_suffix('\n').unwrap_or(&piped).to_string()
                }
            };
            TransferRequest::write(path, content, append)
        }
        Command::Read { path } => TransferRequest::read(match path {
            Some(path) => TextSource::File(path),
            None => TextSource::Stdin,
        }),
        Command::Copy {
            input,
            output,
            append,
        } => TransferRequest::copy(input, output, append),
        Command::Inspect { path } => {
            anyhow::bail!("inspect is not a text transfer: {}", path.display())
        }
    };
    Ok(request)
}

fn render_summary(path: &Path, summary: &ObjectFileSummary) -> String {
    let mut out = format!(
        "{}\ncodec: {}\nrecords: {} ({} payload bytes)\n",
        path.display(),
        summary.codec,
        summary.records.len(),
        summary.total_payload_bytes()
    );
    for record in &summary.records {
        match &record.value {
            Some(value) => {
                out.push_str(&format!("#{} {} bytes {}\n", record.index, record.size, value))
            }
            None => out.push_str(&format!("#{} {} bytes\n", record.index, record.size)),
        }
    }
    out
}

fn print_stdout(content: &str) -> Result<()> {
    io::stdout()
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")
}
