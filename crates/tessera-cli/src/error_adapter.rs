//! miette reports for Tessera errors and warnings.
//!
//! Everything the CLI prints through miette is first flattened into a
//! [`Report`]. A diagram error becomes one report per parser diagnostic,
//! with the diagram description as snippet source. Extraction warnings use
//! the whole message instead. The remaining error variants carry no
//! location and become a single report with a `tessera::` code.

use std::{error::Error, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, Severity, SourceSpan};

use tessera::TesseraError;
use tessera_parser::{Span, error::Diagnostic};

/// One printable problem.
#[derive(Debug)]
pub struct Report<'a> {
    message: String,
    code: Option<String>,
    severity: Severity,
    help: Option<String>,
    snippet: Option<NamedSource<String>>,
    labels: Vec<LabeledSpan>,
    cause: Option<&'a (dyn Error + 'static)>,
}

impl Report<'_> {
    fn from_diagnostic(diag: &Diagnostic, name: &str, source: &str) -> Self {
        let severity = if diag.severity().is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        };
        let labels = diag
            .labels()
            .iter()
            .map(|label| {
                let text = Some(label.message().to_string());
                let span = source_span(label.span());
                if label.is_primary() {
                    LabeledSpan::new_primary_with_span(text, span)
                } else {
                    LabeledSpan::new_with_span(text, span)
                }
            })
            .collect();

        Self {
            message: diag.message().to_string(),
            code: diag.code().map(|code| code.to_string()),
            severity,
            help: diag.help().map(str::to_string),
            snippet: Some(NamedSource::new(name, source.to_string())),
            labels,
            cause: None,
        }
    }

    pub fn severity_level(&self) -> Severity {
        self.severity
    }
}

impl<'a> Report<'a> {
    fn from_error(err: &'a TesseraError) -> Self {
        let (code, help) = match err {
            TesseraError::Io(_) => ("tessera::io", None),
            TesseraError::Config(_) => (
                "tessera::config",
                Some("check the [segments], [render] and [style] sections of the configuration file"),
            ),
            TesseraError::Export(_) => ("tessera::export", None),
            TesseraError::Diagram { .. } => ("tessera::diagram", None),
        };

        Self {
            message: err.to_string(),
            code: Some(code.to_string()),
            severity: Severity::Error,
            help: help.map(str::to_string),
            snippet: None,
            labels: Vec::new(),
            cause: err.source(),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for Report<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.code
            .as_deref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.help
            .as_deref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.snippet
            .as_ref()
            .map(|snippet| snippet as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.iter().cloned()))
        }
    }
}

fn source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Reports for an error returned by [`tessera_cli::run`](crate::run).
pub fn error_reports(err: &TesseraError) -> Vec<Report<'_>> {
    match err {
        TesseraError::Diagram { err: parse_err, src } if !parse_err.diagnostics().is_empty() => {
            parse_err
                .diagnostics()
                .iter()
                .map(|diag| Report::from_diagnostic(diag, "diagram", src))
                .collect()
        }
        _ => vec![Report::from_error(err)],
    }
}

/// Reports for extraction warnings, whose spans point into `message`.
pub fn warning_reports<'a>(warnings: &[Diagnostic], message: &str) -> Vec<Report<'a>> {
    warnings
        .iter()
        .map(|diag| Report::from_diagnostic(diag, "message", message))
        .collect()
}
