//! Defines formatting for incflat diagnostics.

use ansi_term::Color;
use incflat_utils::location::Location;

use crate::Severity;

/// Format and display the 'source window' -- the file and line of a
/// [`Location`], the line itself, and an underline beneath its non-blank part.
pub fn display_source_line(severity: &Severity, location: &Location) -> String {
    let text = location.text();
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len().max(start);

    // one extra character of padding looks better
    let gutter = location.line().to_string().len() + 1;

    // Display format:
    //   --> file:line
    //    |
    // line | CODE CODE CODE CODE
    //    | ^^^^^^^^^^^^^^^^^^^
    format!(
        "{}{} {location}\n{} {}\n{} {text}\n{} {} {}",
        " ".repeat(gutter),
        Color::Blue.bold().paint("-->"),
        " ".repeat(gutter),
        Color::Blue.bold().paint("|"),
        Color::Blue
            .bold()
            .paint(format!("{: >gutter$} |", location.line())),
        " ".repeat(gutter),
        Color::Blue.bold().paint("|"),
        severity.style().paint(format!(
            "{}{}",
            " ".repeat(start),
            "^".repeat(text[start..end].chars().count())
        ))
    )
}
