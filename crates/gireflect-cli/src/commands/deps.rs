//! `gireflect deps` - version and dependencies of a namespace

use std::io::Write;

use termcolor::WriteColor;

use gireflect_engine::Gi;

use super::RequireArgs;
use crate::output::{styled, Style};

/// Print the loaded version, then one dependency per line
pub fn execute(gi: &Gi, args: &RequireArgs, out: &mut dyn WriteColor) -> anyhow::Result<()> {
    let ns = args.require(gi)?;
    styled(out, Style::Heading, ns.name())?;
    writeln!(out, " {}", ns.version().unwrap_or_default())?;
    for dependency in ns.dependencies().unwrap_or_default() {
        write!(out, "  ")?;
        styled(out, Style::Name, &dependency)?;
        writeln!(out)?;
    }
    Ok(())
}
