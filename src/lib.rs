//! Pilot and formation statistics from Tacview ACMI text logs.
//!
//! ```
//! let stats = acmi_tools::parse("101,Pilot=Viper,Group=Red\n101,T=0,Event=Shot");
//! assert_eq!(stats.pilots.get("Viper").unwrap().shots, 1);
//! ```
pub mod decoder;
pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

pub use decoder::{decode_line, Line};
pub use engine::{parse, parse_bytes, AcmiStats, Aggregator, EventKind, ObjectRecord, ObjectTable, UNKNOWN};
pub use error::Error;
pub use stats::{Counter, Counters, StatsTable};

use std::io::Read;
use std::path::Path;

pub fn version() -> String {
    std::format!("{}-Alpha", env!("CARGO_PKG_VERSION"))
}

pub fn about() -> String {
    "Shots, hits, kills, deaths, takeoffs and landings per pilot and per \n\
    formation, pulled from a Tacview ACMI text log.\n\
    Copyright (C) 2021 Joshua Vander Hook\n\n\
    This program comes with ABSOLUTELY NO WARRANTY.\n\
    This is free software, and you are welcome to redistribute\n\
    it under certain conditions. See LICENSE for more details."
        .to_string()
}

/// Read a whole log, from `path` or from stdin when `path` is None or "-".
/// Bytes that are not UTF-8 are replaced rather than rejected.
pub fn read_input(path: Option<&str>) -> Result<String, Error> {
    let mut bytes = Vec::new();
    match path {
        None | Some("-") => {
            std::io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .map_err(Error::Stdin)?;
        }
        Some(p) => {
            bytes = std::fs::read(p).map_err(|source| Error::Io {
                path: Path::new(p).to_path_buf(),
                source,
            })?;
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Log level picked by `-v` repeats: 0 = warn, 1 = info, 2 = debug, more = trace.
pub fn verbosity_level(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Set up `env_logger`. `RUST_LOG`, when set, decides the filter;
/// otherwise the level comes from [`verbosity_level`].
pub fn init_logging(verbosity: u64) {
    let level = verbosity_level(verbosity).to_string().to_lowercase();
    let env = env_logger::Env::default().default_filter_or(level);
    //a second init (tests, embedding) is harmless
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
