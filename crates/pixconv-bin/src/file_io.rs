/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};

use log::{debug, trace};

use crate::errors::CliErrors;

/// Read a whole file into memory
pub fn read_file(path: &OsStr) -> Result<Vec<u8>, CliErrors> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();

    file.read_to_end(&mut data)?;
    debug!("Read {} bytes from {:?}", data.len(), path);

    Ok(data)
}

/// Create or truncate `path` and write `data` to it
pub fn write_file(path: &OsStr, data: &[u8]) -> Result<(), CliErrors> {
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)?;

    let mut writer = BufWriter::new(file);
    writer.write_all(data)?;
    writer.flush()?;

    trace!("Wrote {} bytes to {:?}", data.len(), path);
    Ok(())
}
