//! gireflect command-line interface

use std::path::PathBuf;
use std::sync::Once;

use clap::{Parser, Subcommand};
use termcolor::StandardStream;

use gireflect_cli::commands::{deps, list, show};
use gireflect_cli::output::{color_choice, ColorFlag};
use gireflect_cli::{open, RequireArgs};

#[derive(Parser)]
#[command(name = "gireflect", version, about = "Inspect GObject-Introspection typelibs")]
struct Cli {
    /// Repository configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t = ColorFlag::Auto)]
    color: ColorFlag,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the top-level infos of a namespace
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        require: RequireArgs,
    },

    /// Show the value at a dotted path such as `Widget.fields.1`
    Show {
        #[command(flatten)]
        require: RequireArgs,

        /// Path from the namespace; the namespace itself when omitted
        path: Option<String>,
    },

    /// Print the version and dependencies of a namespace
    Deps {
        #[command(flatten)]
        require: RequireArgs,
    },
}

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber when `RUST_LOG` is set
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{fmt, EnvFilter};

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    });
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let gi = open(cli.config.as_deref())?;
    let mut out = StandardStream::stdout(color_choice(cli.color));

    match cli.command {
        Commands::List { require } => list::execute(&gi, &require, &mut out),
        Commands::Show { require, path } => show::execute(&gi, &require, path.as_deref(), &mut out),
        Commands::Deps { require } => deps::execute(&gi, &require, &mut out),
    }
}
