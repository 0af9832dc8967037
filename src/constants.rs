/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Maximum width or height in pixels the library will read or write.
///
/// Chosen so that width and height can be multiplied together
/// without overflowing the signed 32-bit range.
pub const MAX_DIMENSIONS: usize = 32_000;

/// Quality used when the caller passes the `-1` sentinel.
pub(crate) const DEFAULT_QUALITY: i32 = 90;
