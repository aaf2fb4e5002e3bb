//! Resolution report
//!
//! Each resolver phase returns a `ResolutionReport` instead of surfacing
//! errors: dropped modules and assets become `Diagnostic`s next to the
//! identifiers that made it through. Recording a diagnostic also logs it.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::domain::value_objects::Identifier;
use crate::domain::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Scan,
    Validate,
    Compile,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Scan => "scan",
            Phase::Validate => "validate",
            Phase::Compile => "compile",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub phase: Phase,
    /// Module identifier, or the module directory when it never parsed.
    pub subject: String,
    pub code: &'static str,
    pub message: String,
    #[serde(skip)]
    pub error: Option<ResolveError>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.phase, self.subject, self.code, self.message
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub registered: Vec<Identifier>,
    pub validated: Vec<Identifier>,
    pub compiled: Vec<Identifier>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dropped module or asset.
    pub fn record(&mut self, phase: Phase, subject: impl fmt::Display, error: ResolveError) {
        let subject = subject.to_string();
        warn!(%phase, %subject, code = error.code(), "{error}");
        self.diagnostics.push(Diagnostic {
            phase,
            subject,
            code: error.code(),
            message: error.to_string(),
            error: Some(error),
        });
    }

    /// Record a failure that has no `ResolveError` behind it (unreadable
    /// manifest, missing root).
    pub fn record_message(
        &mut self,
        phase: Phase,
        subject: impl fmt::Display,
        code: &'static str,
        message: impl fmt::Display,
    ) {
        let subject = subject.to_string();
        let message = message.to_string();
        warn!(%phase, %subject, code, "{message}");
        self.diagnostics.push(Diagnostic {
            phase,
            subject,
            code,
            message,
            error: None,
        });
    }

    pub fn merge(&mut self, other: ResolutionReport) {
        self.registered.extend(other.registered);
        self.validated.extend(other.validated);
        self.compiled.extend(other.compiled);
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics whose subject is `subject`.
    pub fn diagnostics_for<'a>(
        &'a self,
        subject: &'a str,
    ) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.subject == subject)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }
}

impl fmt::Display for ResolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "registered {}, validated {}, compiled {}",
            self.registered.len(),
            self.validated.len(),
            self.compiled.len()
        )?;
        for identifier in &self.compiled {
            writeln!(f, "  ok    {identifier}")?;
        }
        if self.diagnostics.is_empty() {
            return Ok(());
        }
        writeln!(f, "{} diagnostic(s):", self.diagnostics.len())?;
        for diagnostic in &self.diagnostics {
            writeln!(f, "  {diagnostic}")?;
        }
        Ok(())
    }
}
