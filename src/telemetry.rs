// SPDX-License-Identifier: MIT
//
// Log setup for the weft binary. The library only emits `tracing` events;
// this is the one place a subscriber gets installed.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset, by `-v` count.
#[must_use]
pub const fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over `default_level`.
/// A second call is a no-op.
pub fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
