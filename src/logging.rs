//! Logger setup shared by the `put` and `get` programs.

use std::io::Write;

use env_logger::Env;
use log::LevelFilter;

/// Formats a record as `[<rank>] <LEVEL> <message>`.
fn format_line(rank: usize, level: log::Level, args: &std::fmt::Arguments) -> String {
    format!("[{}] {} {}", rank, level, args)
}

/// Installs a logger that tags every record with `rank`.
///
/// The default level is `info` (`debug` if `verbose`); `RUST_LOG` overrides it.
pub fn init(rank: usize, verbose: bool) {
    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format(move |buf, record| {
        writeln!(buf, "{}", format_line(rank, record.level(), record.args()))
    });
    let _ = builder.try_init();
}
