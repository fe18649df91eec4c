//! Styles for the odma terminal output.
//!
//! Rendering code asks for a style by what the text *is* (an accessor name,
//! an error, an interface) and never picks colors itself. Changing the look
//! of the CLI means changing this file only.
//!
//! `console` drops the escape codes when stdout is not a terminal, so piped
//! output and the end-to-end tests see plain text.

use console::Style;

/// Object and repository ids.
pub fn id() -> Style {
    Style::new().bold()
}

/// Section headers such as interface names.
pub fn title() -> Style {
    Style::new().cyan().bold()
}

/// Accessor names in listings.
pub fn accessor() -> Style {
    Style::new().yellow()
}

/// Secondary information: attribute names, shapes, class names.
pub fn muted() -> Style {
    Style::new().dim()
}

/// Null values.
pub fn faint() -> Style {
    Style::new().dim().italic()
}

pub fn error() -> Style {
    Style::new().red()
}
