//! Styled terminal output
//!
//! Commands write through `termcolor::WriteColor` so the same code renders
//! to a colored terminal or, in tests, to a plain buffer.

use std::io::Write;

use clap::ValueEnum;
use termcolor::{Color, ColorChoice, ColorSpec, WriteColor};

/// `--color` flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorFlag {
    #[default]
    Auto,
    Always,
    Never,
}

/// Resolve the color choice; `NO_COLOR` wins over the flag
pub fn color_choice(flag: ColorFlag) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        ColorFlag::Auto => ColorChoice::Auto,
        ColorFlag::Always => ColorChoice::Always,
        ColorFlag::Never => ColorChoice::Never,
    }
}

/// Role of a piece of output text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Info kinds and type tags
    Kind,
    /// Info and namespace names
    Name,
    /// Ordinals and secondary detail
    Dim,
    /// Headings
    Heading,
}

impl Style {
    fn spec(self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Style::Kind => spec.set_fg(Some(Color::Cyan)),
            Style::Name => spec.set_bold(true),
            Style::Dim => spec.set_dimmed(true),
            Style::Heading => spec.set_fg(Some(Color::Green)).set_bold(true),
        };
        spec
    }
}

/// Write `text` in `style`, then restore the default style
pub fn styled(out: &mut dyn WriteColor, style: Style, text: &str) -> std::io::Result<()> {
    out.set_color(&style.spec())?;
    write!(out, "{}", text)?;
    out.reset()
}
