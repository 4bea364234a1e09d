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

//! Handling of the `#db` header that starts every db data stream.
//!
//! A db data stream is tab-separated text. Its first line names and types the columns of the rows
//! that follow:
//!
//! ```text
//! #db	id:int	name:str
//! 1	bob
//! ```
//!
//! This crate reads that line off a stream without touching the rows, parses it into a [`Schema`]
//! and renders a [`Schema`] back into a header line:
//!
//! ```
//! use db_header::{read_schema, write_header};
//! use std::io::{Cursor, Read};
//!
//! let mut input = Cursor::new("#db\tid:int\tname:str\n1\tbob\n");
//! let mut schema = read_schema(&mut input)?;
//! assert_eq!(schema.position_of("name"), Some(1));
//!
//! // The rows are still there for whoever reads them next.
//! let mut rows = String::new();
//! input.read_to_string(&mut rows)?;
//! assert_eq!(rows, "1\tbob\n");
//!
//! schema.push_column("score", "float")?;
//! let mut output = Vec::new();
//! write_header(&schema, &mut output)?;
//! assert_eq!(output, b"#db\tid:int\tname:str\tscore:float\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Column type tags are opaque strings. Column names and type tags can be restricted further by
//! registering custom validators, see [`validator`].
//!
//! # MSRV
//!
//! The current MSRV is 1.88.0.

pub mod error;
pub mod header;
pub mod schema;
pub mod util;
pub mod validator;

pub use error::Error;
pub use header::{make_header, parse_header, read_header, read_schema, write_header};
pub use schema::{Column, Schema};

/// A convenience type alias for `Result`s with `Error`s.
pub type DbResult<T> = Result<T, Error>;

#[cfg(test)]
pub(crate) type TestResult = anyhow::Result<()>;
