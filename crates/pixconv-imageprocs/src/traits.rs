/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pixconv_core::raster::Raster;

/// An adjustment that can be run on a raster
pub trait OperationsTrait {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Run the adjustment, modifying `raster` in place
    fn execute(&self, raster: &mut Raster);
}
