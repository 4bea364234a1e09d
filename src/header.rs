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

//! Reading, parsing and writing of the `#db` header line.
//!
//! A db data stream starts with a single header line naming and typing its columns:
//!
//! ```text
//! #db\t<name1>:<type1>\t<name2>:<type2>\t...\t<nameN>:<typeN>\n
//! ```
//!
//! Tabs, colons and newlines are reserved; there is no escaping.

use crate::{DbResult, error::Details, schema::Schema, util};
use log::{debug, trace, warn};
use std::io::{Read, Write};

/// The literal every header starts with.
pub const HEADER_MAGIC: &str = "#db\t";

const MAGIC_FIELD: &str = "#db";
const COLUMN_SEPARATOR: char = '\t';
const TYPE_SEPARATOR: char = ':';

/// Read the header line from `reader`, without its newline.
///
/// Bytes are read one at a time, so `reader` is left positioned on the first byte after the
/// newline and the rows that follow can be read from it directly. Wrapping `reader` in a
/// [`BufReader`](std::io::BufReader) beforehand is recommended for unbuffered sources.
///
/// ```
/// # use db_header::header::read_header;
/// # use std::io::{Cursor, Read};
/// let mut input = Cursor::new("#db\tid:int\tname:str\n1\tbob\n");
/// assert_eq!(read_header(&mut input)?, "#db\tid:int\tname:str");
///
/// let mut rows = String::new();
/// input.read_to_string(&mut rows)?;
/// assert_eq!(rows, "1\tbob\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_header<R: Read>(reader: &mut R) -> DbResult<String> {
    let bytes = util::read_until(reader, b'\n', HEADER_MAGIC.as_bytes())?;

    if !bytes.starts_with(HEADER_MAGIC.as_bytes()) {
        return Err(Details::MalformedHeader(String::from_utf8_lossy(&bytes).into_owned()).into());
    }
    let header = String::from_utf8(bytes).map_err(Details::ConvertToUtf8)?;
    debug!("Read a header of {} bytes", header.len());
    Ok(header)
}

/// Parse a header line into a [`Schema`].
///
/// Trailing ASCII whitespace, including the newline, is ignored. Each column gets the position at which
/// it appears in the header.
pub fn parse_header(header: &str) -> DbResult<Schema> {
    let line = header.trim_end_matches('\n');
    if line.ends_with('\r') {
        warn!("Ignoring carriage return at the end of the header");
    }

    let mut fields = line.trim_ascii_end().split(COLUMN_SEPARATOR);
    if fields.next() != Some(MAGIC_FIELD) {
        return Err(Details::MalformedHeader(header.to_string()).into());
    }

    let mut schema = Schema::new();
    for (position, field) in fields.enumerate() {
        let (name, data_type) = split_column_spec(field)?;
        trace!("Column {position}: {name:?} of type {data_type:?}");
        schema.add_column(name, position, data_type)?;
    }
    Ok(schema)
}

fn split_column_spec(field: &str) -> DbResult<(&str, &str)> {
    match field.split_once(TYPE_SEPARATOR) {
        Some((name, data_type))
            if !name.is_empty() && !data_type.is_empty() && !data_type.contains(TYPE_SEPARATOR) =>
        {
            Ok((name, data_type))
        }
        _ => Err(Details::MalformedColumnSpec(field.to_string()).into()),
    }
}

/// Render `schema` as a header line, ordered by column position.
///
/// No trailing newline is added; see [`write_header`] for that. Fails with
/// [`Details::InvalidSchema`] unless the positions are exactly `0..N`.
pub fn make_header(schema: &Schema) -> DbResult<String> {
    schema.validate()?;
    Ok(render_header(schema))
}

pub(crate) fn render_header(schema: &Schema) -> String {
    let mut header = String::from(HEADER_MAGIC);
    for (i, (name, column)) in schema.columns().enumerate() {
        if i > 0 {
            header.push(COLUMN_SEPARATOR);
        }
        header.push_str(name);
        header.push(TYPE_SEPARATOR);
        header.push_str(&column.data_type);
    }
    header
}

/// Read and parse the header line from `reader`.
///
/// Like [`read_header`], this leaves `reader` positioned on the first row.
pub fn read_schema<R: Read>(reader: &mut R) -> DbResult<Schema> {
    parse_header(&read_header(reader)?)
}

/// Write the header line for `schema`, followed by a newline, to `writer`.
///
/// Returns the number of bytes written.
pub fn write_header<W: Write>(schema: &Schema, writer: &mut W) -> DbResult<usize> {
    let mut header = make_header(schema)?;
    header.push('\n');
    writer
        .write_all(header.as_bytes())
        .map_err(Details::WriteHeader)?;
    Ok(header.len())
}
