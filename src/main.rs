// SPDX-License-Identifier: MIT
//
// weft: developer tool over the weft-term rendering and input core.
//
//   weft decode [SEQ…]   mouse reports → one event per line
//   weft render          paint a demo panel, write full + incremental frames
//
// Logging goes to stderr. `RUST_LOG` takes precedence over `-v`.

mod decode;
mod demo;
mod error;
mod telemetry;

use std::io;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use weft_term::{MouseEventParser, ParserConfig, RenderConfig};

use crate::demo::DemoOptions;
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "weft", version, about = "Terminal cell rendering and mouse decoding")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode mouse reports given as escaped strings, or raw stdin
    Decode(DecodeArgs),
    /// Paint a demo panel and write its full and incremental frames
    Render(RenderArgs),
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Escaped byte strings such as '\e[<0;10;5M' (reads stdin when empty)
    seqs: Vec<String>,

    /// Longest gap between clicks that still makes a double-click
    #[arg(long, default_value_t = 0.5)]
    double_click_secs: f64,

    /// How far apart, in cells per axis, paired clicks may land
    #[arg(long, default_value_t = ParserConfig::DEFAULT_DISTANCE)]
    double_click_distance: u16,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[arg(long, default_value_t = 40)]
    width: u16,

    #[arg(long, default_value_t = 12)]
    height: u16,

    /// Wrap frames in synchronized-output markers
    #[arg(long)]
    sync: bool,

    /// Leave the last style active at the end of each frame
    #[arg(long)]
    no_reset: bool,
}

fn run(cli: Cli) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Decode(args) => {
            let config = ParserConfig::default()
                .with_threshold_secs(args.double_click_secs)?
                .with_distance(args.double_click_distance);
            let mut parser = MouseEventParser::with_config(config);
            decode::run(&mut parser, &args.seqs, &mut stdout)
        }
        Command::Render(args) => {
            let config = RenderConfig::default()
                .with_synchronized_output(args.sync)
                .with_reset_after_frame(!args.no_reset);
            let opts = DemoOptions {
                width: args.width,
                height: args.height,
                config,
            };
            demo::run(opts, &mut stdout)?;
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(telemetry::default_level(cli.verbose));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "command failed");
            eprintln!("weft: {err}");
            ExitCode::FAILURE
        }
    }
}
