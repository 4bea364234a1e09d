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

use std::{error::Error as _, fmt};

/// Errors encountered while reading, parsing or writing a `#db` header.
///
/// To inspect the details of the error use [`details`](Self::details) or [`into_details`](Self::into_details)
/// to get a [`Details`] which contains more precise error information.
///
/// See [`Details`] for all possible errors.
#[derive(thiserror::Error, Debug)]
#[repr(transparent)]
#[error(transparent)]
pub struct Error {
    details: Box<Details>,
}

impl Error {
    pub fn new(details: Details) -> Self {
        Self {
            details: Box::new(details),
        }
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn into_details(self) -> Details {
        *self.details
    }
}

impl From<Details> for Error {
    fn from(details: Details) -> Self {
        Self::new(details)
    }
}

#[derive(thiserror::Error)]
pub enum Details {
    #[error("Failed to read header")]
    ReadHeader(#[source] std::io::Error),

    #[error("Failed to write header")]
    WriteHeader(#[source] std::io::Error),

    /// The stream ended before the newline terminating the header.
    #[error("Unexpected end of input after {read} header bytes")]
    UnexpectedEndOfInput { read: usize },

    #[error("Header is longer than the maximum of {maximum} bytes")]
    HeaderTooLong { maximum: usize },

    #[error("Invalid utf-8 string")]
    ConvertToUtf8(#[source] std::string::FromUtf8Error),

    /// The header does not start with `#db` followed by a tab.
    #[error("Missing or malformed #db header: {0:?}")]
    MalformedHeader(String),

    /// A column spec does not consist of exactly one non-empty name and one
    /// non-empty type separated by a colon.
    #[error("Invalid column definition in header: {0:?}")]
    MalformedColumnSpec(String),

    #[error("Column {0:?} is defined more than once")]
    DuplicateColumnName(String),

    /// Column positions are not exactly `0..N` for a schema with `N` columns.
    #[error("Invalid schema: {reason}")]
    InvalidSchema { reason: String },

    #[error("Invalid column name {0:?}. It must match the regex '{1}'")]
    InvalidColumnName(String, &'static str),

    #[error("Invalid type {1:?} for column {0:?}. It must match the regex '{2}'")]
    InvalidColumnType(String, String, &'static str),
}

impl fmt::Debug for Details {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut msg = self.to_string();
        if let Some(e) = self.source() {
            msg.extend([": ", &e.to_string()]);
        }
        write!(f, "{msg}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn debug_includes_source_once() {
        let error = Details::ReadHeader(io::Error::other("disk on fire"));
        assert_eq!(error.to_string(), "Failed to read header");
        assert_eq!(format!("{error:?}"), "Failed to read header: disk on fire");

        let error = Details::WriteHeader(io::Error::other("pipe closed"));
        assert_eq!(format!("{error:?}"), "Failed to write header: pipe closed");
    }

    #[test]
    fn error_is_transparent() {
        let error: Error = Details::MalformedHeader("foo".to_string()).into();
        assert_eq!(error.to_string(), r#"Missing or malformed #db header: "foo""#);
        assert!(matches!(error.into_details(), Details::MalformedHeader(h) if h == "foo"));
    }
}
