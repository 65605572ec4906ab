//! Defines types for incflat diagnostics.
//!
//! This module defines the structure of the diagnostics produced while an
//! include tree is expanded. A [`Diagnostic`] pairs a [`DiagnosticKind`] with
//! its severity and, when one exists, the [`Location`] of the line which
//! caused it.

use std::{error::Error, fmt::Display};

use ansi_term::{Color, Style};
use incflat_utils::location::Location;

use crate::{fmt::display_source_line, DiagnosticKind};

/// The severity of a [`Diagnostic`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Severity {
    /// Error. The expansion will not continue.
    Error,
}

impl Severity {
    /// The terminal style used when rendering this severity
    pub(crate) fn style(&self) -> Style {
        match *self {
            Self::Error => Color::Red.bold(),
        }
    }

    /// The text of this severity
    const fn text(&self) -> &'static str {
        match *self {
            Self::Error => "error",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// A diagnostic message produced by incflat
#[derive(Debug, PartialEq, Eq)]
pub struct Diagnostic(pub Severity, pub DiagnosticKind, pub Option<Location>);

impl Diagnostic {
    /// The [`DiagnosticKind`] of this diagnostic
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> &DiagnosticKind {
        &self.1
    }

    /// The [`Location`] of the line that caused this diagnostic, if any
    #[must_use]
    #[inline]
    pub const fn location(&self) -> Option<&Location> {
        self.2.as_ref()
    }

    /// The one-line message of this diagnostic, without severity or color
    ///
    /// This is the stable, machine-comparable form.
    #[must_use]
    pub fn plain(&self) -> String {
        self.1.to_string()
    }

    /// Convert this [`Diagnostic`] to a colored, human readable string
    ///
    /// When a [`Location`] is attached, the offending line is shown beneath
    /// the message.
    #[must_use]
    pub fn print(&self) -> String {
        let header = format!(
            "{}: {}",
            self.0.style().paint(self.0.text()),
            Color::White.bold().paint(self.1.to_string())
        );

        match self.2 {
            Some(ref location) => {
                format!("{header}\n{}", display_source_line(&self.0, location))
            }
            None => header,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0, self.1)
    }
}

impl Error for Diagnostic {}
