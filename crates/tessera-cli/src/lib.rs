//! CLI logic for the Tessera message renderer.
//!
//! Reads an assistant message (or produces one with the canned responder),
//! renders it and writes the result as HTML, plain text or JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::{
    fs,
    io::{self, Write},
};

use log::{info, warn};
use serde::Serialize;

use tessera::{
    Diagnostic, MessageRenderer, Segment, TesseraError,
    export::{Exporter, HtmlExporter, TextExporter},
    responder::{self, Agent, CannedResponder},
};

use error_adapter::warning_reports;

/// Segments written by the JSON output format.
#[derive(Serialize)]
struct SegmentsDocument<'a> {
    segments: &'a [Segment],
    warnings: Vec<String>,
}

/// Run the Tessera CLI application
///
/// This function reads the message selected by `args`, renders it through
/// the Tessera pipeline and writes the result to the output path.
///
/// # Errors
///
/// Returns `TesseraError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid diagram blocks when checking
/// - Export errors
pub async fn run(args: &Args) -> Result<(), TesseraError> {
    let app_config = config::load_config(args.config.as_ref())?;

    if let Some(search) = &args.agents {
        let agents = responder::search_agents(search);
        info!(search, found = agents.len(); "Listing agents");
        return write_output(&args.output, &agents_document(&agents, args.format)?);
    }

    let message = read_message(args)?;
    let renderer = MessageRenderer::new(app_config);

    if args.check {
        let warnings = renderer.check(&message)?;
        report_warnings(&warnings, &message);
        info!(warnings = warnings.len(); "All diagram blocks are valid");
        return Ok(());
    }

    let document = match args.format {
        OutputFormat::Json => {
            let extraction = renderer.segments(&message);
            report_warnings(extraction.diagnostics(), &message);
            let document = SegmentsDocument {
                segments: extraction.segments(),
                warnings: extraction
                    .diagnostics()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            };
            to_json(&document)?
        }
        OutputFormat::Html | OutputFormat::Text => {
            let mut rendered = renderer.render(&message);
            report_warnings(rendered.diagnostics(), &message);
            rendered.resolve().await;

            let failed = rendered.failed_count();
            if failed > 0 {
                warn!(failed; "Some diagrams could not be rendered");
            }

            if args.format == OutputFormat::Html {
                HtmlExporter::new(renderer.config())?.export(&rendered)?
            } else {
                TextExporter::new(renderer.config()).export(&rendered)?
            }
        }
    };

    write_output(&args.output, &document)?;
    info!(output_file = args.output, format:? = args.format; "Message exported successfully");

    Ok(())
}

fn read_message(args: &Args) -> Result<String, TesseraError> {
    if let Some(prompt) = &args.prompt {
        info!(prompt; "Using canned response");
        return Ok(CannedResponder::new().respond(prompt));
    }

    match args.input.as_deref() {
        Some("-") | None => {
            info!("Reading message from standard input");
            Ok(io::read_to_string(io::stdin())?)
        }
        Some(path) => {
            info!(input_path = path; "Reading message");
            Ok(fs::read_to_string(path)?)
        }
    }
}

fn write_output(output: &str, document: &str) -> Result<(), TesseraError> {
    if output == "-" {
        io::stdout().write_all(document.as_bytes())?;
    } else {
        fs::write(output, document)?;
    }
    Ok(())
}

fn to_json(value: &impl Serialize) -> Result<String, TesseraError> {
    serde_json::to_string_pretty(value).map_err(|err| TesseraError::Export(Box::new(err)))
}

fn agents_document(agents: &[&Agent], format: OutputFormat) -> Result<String, TesseraError> {
    if format == OutputFormat::Json {
        return to_json(&agents);
    }
    Ok(agents
        .iter()
        .map(|agent| {
            let status = if agent.is_available() { "" } else { " (coming soon)" };
            format!(
                "{} {}{status}\n    {}\n    {}\n",
                agent.icon(),
                agent.title(),
                agent.id(),
                agent.description()
            )
        })
        .collect())
}

/// Log extraction warnings with source snippets from the message.
fn report_warnings(warnings: &[Diagnostic], message: &str) {
    let reporter = miette::GraphicalReportHandler::new();
    for report in warning_reports(warnings, message) {
        let mut writer = String::new();
        match reporter.render_report(&mut writer, &report) {
            Ok(()) => warn!("{writer}"),
            Err(_) => warn!("{report}"),
        }
    }
}
