//! `gireflect list` - top-level infos of a namespace

use std::io::Write;

use termcolor::WriteColor;

use gireflect_engine::Gi;

use super::RequireArgs;
use crate::output::{styled, Style};

/// Print one line per info: ordinal, kind, name
pub fn execute(gi: &Gi, args: &RequireArgs, out: &mut dyn WriteColor) -> anyhow::Result<()> {
    let ns = args.require(gi)?;
    let width = ns.n_infos().to_string().len();
    for (ordinal, handle) in ns.iter().enumerate() {
        let info = handle.info();
        styled(out, Style::Dim, &format!("{:>width$}", ordinal + 1))?;
        write!(out, "  ")?;
        styled(out, Style::Kind, &format!("{:<13}", info.kind()))?;
        write!(out, " ")?;
        styled(out, Style::Name, info.name().unwrap_or("-"))?;
        writeln!(out)?;
    }
    Ok(())
}
