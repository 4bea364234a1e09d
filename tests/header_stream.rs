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

use db_header::{
    Schema, error::Details, make_header, parse_header, read_header, read_schema, write_header,
};
use pretty_assertions::assert_eq;
use std::io::{self, Cursor, Read};

type TestResult = anyhow::Result<()>;

/// Hands out at most one byte per call and remembers how many it gave away.
struct Trickle<'a> {
    data: &'a [u8],
    consumed: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.consumed == self.data.len() {
            return Ok(0);
        }
        buf[0] = self.data[self.consumed];
        self.consumed += 1;
        Ok(1)
    }
}

#[test]
fn header_then_rows() -> TestResult {
    let mut input = Cursor::new(b"#db\tid:int\tname:str\n1\tbob\n2\talice\n".to_vec());
    let schema = read_schema(&mut input)?;
    assert_eq!(schema.column_names(), ["id", "name"]);

    let mut rows = String::new();
    input.read_to_string(&mut rows)?;
    let rows: Vec<Vec<&str>> = rows.lines().map(|l| l.split('\t').collect()).collect();
    let name = schema.position_of("name").unwrap();
    assert_eq!(rows[1][name], "alice");
    Ok(())
}

#[test]
fn read_header_consumes_exactly_the_header() -> TestResult {
    let data = b"#db\tsrc:ip\tdst:ip\n10.0.0.1\t10.0.0.2\n";
    let mut reader = Trickle { data, consumed: 0 };
    let header = read_header(&mut reader)?;
    assert_eq!(header, "#db\tsrc:ip\tdst:ip");
    assert_eq!(reader.consumed, header.len() + 1);
    Ok(())
}

#[test]
fn stream_without_newline_fails_instead_of_blocking() {
    let mut reader = Trickle {
        data: b"#db\tid:int",
        consumed: 0,
    };
    let error = read_header(&mut reader).unwrap_err();
    assert!(matches!(
        error.details(),
        Details::UnexpectedEndOfInput { read: 10 }
    ));
}

#[test]
fn stream_without_magic_fails() {
    let error = read_schema(&mut Cursor::new("foo\n")).unwrap_err();
    assert!(matches!(error.details(), Details::MalformedHeader(h) if h == "foo"));
}

#[test]
fn headers_start_with_magic() -> TestResult {
    let mut schema = Schema::new();
    assert!(make_header(&schema)?.starts_with("#db\t"));
    schema.push_column("id", "int")?;
    assert!(make_header(&schema)?.starts_with("#db\t"));
    Ok(())
}

#[test]
fn built_schema_survives_write_and_read() -> TestResult {
    let mut schema = Schema::new();
    schema.add_column("bytes", 3, "int")?;
    schema.add_column("ts", 0, "float")?;
    schema.add_column("dst", 2, "ip")?;
    schema.add_column("src", 1, "ip")?;

    let mut stream = Vec::new();
    write_header(&schema, &mut stream)?;
    stream.extend_from_slice(b"1.0\t10.0.0.1\t10.0.0.2\t512\n");
    assert!(stream.starts_with(b"#db\tts:float\tsrc:ip\tdst:ip\tbytes:int\n"));

    let mut input = Cursor::new(stream);
    assert_eq!(read_schema(&mut input)?, schema);
    Ok(())
}

#[test]
fn replaying_a_header_keeps_it_intact() -> TestResult {
    let header = "#db\tts:float\tsrc:ip\tdst:ip";
    let schema = parse_header(header)?;
    let mut output = Vec::new();
    write_header(&schema, &mut output)?;
    assert_eq!(output, format!("{header}\n").as_bytes());
    Ok(())
}
