/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, Level};

/// Pick the log level from the `LOGGING` flags, warnings by default
pub fn log_level(options: &ArgMatches) -> Level {
    if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    }
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = log_level(options);

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}

#[cfg(test)]
mod tests {
    use log::Level;

    use crate::cmd_args::create_cmd_args;
    use crate::cmd_parsers::global_options::log_level;

    #[test]
    fn level_from_flags() {
        let base = ["pixconv", "-i", "a", "-o", "b"];

        let matches = create_cmd_args().try_get_matches_from(base).unwrap();
        assert_eq!(log_level(&matches), Level::Warn);

        let matches = create_cmd_args()
            .try_get_matches_from(base.iter().chain(&["--trace"]))
            .unwrap();
        assert_eq!(log_level(&matches), Level::Trace);

        let matches = create_cmd_args()
            .try_get_matches_from(base.iter().chain(&["--info"]))
            .unwrap();
        assert_eq!(log_level(&matches), Level::Info);
    }
}
