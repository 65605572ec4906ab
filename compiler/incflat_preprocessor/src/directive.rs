//! Classification of source lines into include directives and plain text
//!
//! A line is an include directive only if the *whole* line, give or take
//! surrounding whitespace, is an `#include "file"` or `#include <file>`.
//! Whitespace is allowed between `#` and `include` and before the reference.
//! Anything else on the line makes it plain text.
//!
//! The classifier knows nothing about comments: a directive-shaped line
//! inside a block comment is still a directive.

use std::sync::OnceLock;

use regex::Regex;

/// Get the quoted include regex
fn quoted_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"^\s*#\s*include\s*"([^"]+)"\s*$"#).expect("Invalid regex")
    })
}

/// Get the angle bracket include regex
fn angle_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\s*#\s*include\s*<([^>]+)>\s*$").expect("Invalid regex"))
}

/// The delimiter form of an include directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    /// `#include "file"`, looked up next to the including file first
    Quoted,
    /// `#include <file>`, looked up in the search paths only
    Angle,
}

/// One parsed include directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeDirective<'line> {
    /// Which delimiters were used
    pub kind: IncludeKind,
    /// The literal text between the delimiters
    pub reference: &'line str,
}

/// The classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'line> {
    /// Anything that is not an include directive
    Plain,
    /// An include directive
    Include(IncludeDirective<'line>),
}

/// Classify one line of text (without its terminator)
///
/// The quoted form is checked before the angle form.
///
/// # Example
/// ```
/// use incflat_preprocessor::directive::{classify, IncludeDirective, IncludeKind, LineKind};
///
/// assert_eq!(
///     classify(r#"#include "dir1/b.h""#),
///     LineKind::Include(IncludeDirective {
///         kind: IncludeKind::Quoted,
///         reference: "dir1/b.h",
///     })
/// );
/// assert_eq!(classify("int x;"), LineKind::Plain);
/// ```
#[must_use]
pub fn classify(line: &str) -> LineKind<'_> {
    let found = |regex: &Regex, kind: IncludeKind| {
        regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|reference| {
                LineKind::Include(IncludeDirective {
                    kind,
                    reference: reference.as_str(),
                })
            })
    };

    found(quoted_regex(), IncludeKind::Quoted)
        .or_else(|| found(angle_regex(), IncludeKind::Angle))
        .unwrap_or(LineKind::Plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn include(kind: IncludeKind, reference: &str) -> LineKind<'_> {
        LineKind::Include(IncludeDirective { kind, reference })
    }

    #[test]
    fn quoted_and_angle_forms_are_recognized() {
        assert_eq!(
            classify("#include \"subdir/c.h\""),
            include(IncludeKind::Quoted, "subdir/c.h")
        );
        assert_eq!(
            classify("#include <std1.h>"),
            include(IncludeKind::Angle, "std1.h")
        );
    }

    #[test]
    fn whitespace_around_tokens_is_tolerated() {
        assert_eq!(
            classify("#   include<dummy.txt>"),
            include(IncludeKind::Angle, "dummy.txt")
        );
        assert_eq!(
            classify("\t  #include\"lib/std2.h\"   "),
            include(IncludeKind::Quoted, "lib/std2.h")
        );
        assert_eq!(
            classify("  #  include   <a b.h>\r"),
            include(IncludeKind::Angle, "a b.h")
        );
    }

    #[test]
    fn trailing_or_leading_text_makes_a_line_plain() {
        assert_eq!(classify("#include \"a.h\" // comment"), LineKind::Plain);
        assert_eq!(classify("x #include <a.h>"), LineKind::Plain);
        assert_eq!(classify("#includes <a.h>x"), LineKind::Plain);
        assert_eq!(classify("#include a.h"), LineKind::Plain);
    }

    #[test]
    fn empty_references_are_plain() {
        assert_eq!(classify("#include \"\""), LineKind::Plain);
        assert_eq!(classify("#include <>"), LineKind::Plain);
    }

    #[test]
    fn mismatched_delimiters_are_plain() {
        assert_eq!(classify("#include \"a.h>"), LineKind::Plain);
        assert_eq!(classify("#include <a.h\""), LineKind::Plain);
    }

    #[test]
    fn comment_state_is_ignored() {
        // the line sits inside a block comment in C, but is still a directive
        assert_eq!(
            classify(" #include <inside_comment.h>"),
            include(IncludeKind::Angle, "inside_comment.h")
        );
        assert_eq!(classify("// #include <a.h>"), LineKind::Plain);
    }

    #[test]
    fn quoted_form_wins_when_both_could_match() {
        // `<` and `>` are plain characters inside a quoted reference
        assert_eq!(
            classify("#include \"<odd>.h\""),
            include(IncludeKind::Quoted, "<odd>.h")
        );
    }

    #[test]
    fn blank_lines_are_plain() {
        assert_eq!(classify(""), LineKind::Plain);
        assert_eq!(classify("    "), LineKind::Plain);
    }
}
