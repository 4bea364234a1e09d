// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{DbResult, error::Details};
use std::io::{ErrorKind, Read};
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Maximum number of bytes a header line may have before its newline.
/// This is a protection against input that is not a db data stream at all,
/// which would otherwise be buffered until the first newline or end of input.
/// See [`max_header_bytes`] to change this limit.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 1024 * 1024;
static MAX_HEADER_BYTES: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_HEADER_BYTES);
static MAX_HEADER_BYTES_ONCE: Once = Once::new();

/// Set a new maximum number of bytes that can be read for a single header.
/// Once called, the limit cannot be changed.
///
/// **NOTE** This function must be called before reading **any** header. The
/// library leverages [`std::sync::Once`](https://doc.rust-lang.org/std/sync/struct.Once.html)
/// to set the limit either when calling this method, or when reading a header
/// for the first time.
///
/// # Returns
/// The configured maximum, which might be different from what the function was called with if the
/// value was already set before.
pub fn max_header_bytes(num_bytes: usize) -> usize {
    MAX_HEADER_BYTES_ONCE.call_once(|| {
        MAX_HEADER_BYTES.store(num_bytes, Ordering::Release);
    });
    MAX_HEADER_BYTES.load(Ordering::Acquire)
}

/// Read bytes one at a time until `delimiter`, returning everything before it.
///
/// The delimiter is consumed but not returned. Nothing after the delimiter is read, so the
/// reader is left positioned on the first byte that follows it.
///
/// Reading stops with [`Details::MalformedHeader`] as soon as `prefix.len()` bytes are buffered
/// and they differ from `prefix`. Shorter lines are left to the caller to check.
pub(crate) fn read_until<R: Read + ?Sized>(
    reader: &mut R,
    delimiter: u8,
    prefix: &[u8],
) -> DbResult<Vec<u8>> {
    let maximum = max_header_bytes(DEFAULT_MAX_HEADER_BYTES);
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Err(Details::UnexpectedEndOfInput { read: buf.len() }.into()),
            Ok(_) if byte[0] == delimiter => return Ok(buf),
            Ok(_) => {
                if buf.len() == maximum {
                    return Err(Details::HeaderTooLong { maximum }.into());
                }
                buf.push(byte[0]);
                if buf.len() == prefix.len() && buf != prefix {
                    return Err(
                        Details::MalformedHeader(String::from_utf8_lossy(&buf).into_owned()).into(),
                    );
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Details::ReadHeader(e).into()),
        }
    }
}
