/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Command line front end for the pixconv codecs
//!
//! Reads PPM or JPEG files (detected from their magic bytes) and writes
//! them in the format named by the output extension.
use std::process::exit;

use log::error;

use crate::workflow::create_and_exec_workflow_from_cmd;

mod cmd_args;
mod cmd_parsers;
mod errors;
mod file_io;
mod formats;
mod probe_files;
mod serde;
mod workflow;

pub use errors::CliErrors;

pub fn main() {
    let cmd = cmd_args::create_cmd_args();
    let options = cmd.get_matches();

    cmd_parsers::global_options::setup_logger(&options);

    let result = if options.get_flag("probe") {
        probe_files::probe_input_files(&options)
    } else {
        create_and_exec_workflow_from_cmd(&options)
    };

    if let Err(reason) = result {
        error!("Could not complete workflow, reason {:?}", reason);
        exit(1);
    }
}
