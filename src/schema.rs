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

//! Logic for describing the columns of a db data stream.

use crate::{
    DbResult, Error,
    error::Details,
    header::{make_header, parse_header, render_header},
    validator::{validate_column_name, validate_column_type},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Position and type of a single column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Zero-based index of the column within a row.
    pub position: usize,
    /// Type tag, opaque to this crate.
    #[serde(rename = "type")]
    pub data_type: String,
}

impl Column {
    pub fn new(position: usize, data_type: impl Into<String>) -> Self {
        Self {
            position,
            data_type: data_type.into(),
        }
    }
}

/// The columns of a db data stream, keyed by name.
///
/// A `Schema` is obtained by parsing a header, see [`parse_header`] and [`FromStr`], or by adding
/// columns one at a time:
///
/// ```
/// # use db_header::Schema;
/// let mut schema = Schema::new();
/// schema.push_column("id", "int")?;
/// schema.push_column("name", "str")?;
///
/// assert_eq!(schema.to_string(), "#db\tid:int\tname:str");
/// assert_eq!(schema.position_of("name"), Some(1));
/// # Ok::<(), db_header::Error>(())
/// ```
///
/// The position of a column, not the order in which it was added, determines where it appears in
/// the header. A schema with `N` columns is only valid when the positions are exactly `0..N`; see
/// [`Schema::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "HashMap<String, Column>",
    try_from = "HashMap<String, Column>"
)]
pub struct Schema {
    columns: HashMap<String, Column>,
}

impl Schema {
    /// Create an empty `Schema`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the column `name` at an explicit `position`.
    ///
    /// Positions are not checked here, so columns can be added in any order. Call
    /// [`Schema::validate`] once all columns are present.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        position: usize,
        data_type: impl Into<String>,
    ) -> DbResult<()> {
        let name = name.into();
        let data_type = data_type.into();
        validate_column_name(&name)?;
        validate_column_type(&name, &data_type)?;

        if self.columns.contains_key(&name) {
            return Err(Details::DuplicateColumnName(name).into());
        }
        self.columns.insert(name, Column::new(position, data_type));
        Ok(())
    }

    /// Add the column `name` after the last column, returning its position.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> DbResult<usize> {
        let position = match self.columns.values().map(|c| c.position).max() {
            None => 0,
            Some(last) => last.checked_add(1).ok_or_else(|| Details::InvalidSchema {
                reason: format!("no position left after the last column at {last}"),
            })?,
        };
        self.add_column(name, position, data_type)?;
        Ok(position)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.columns.get(name).map(|c| c.position)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over `(name, column)` pairs in position order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        let mut columns: Vec<_> = self
            .columns
            .iter()
            .map(|(name, column)| (name.as_str(), column))
            .collect();
        columns.sort_by_key(|(name, column)| (column.position, *name));
        columns.into_iter()
    }

    /// Column names in position order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns().map(|(name, _)| name).collect()
    }

    /// Check that the positions are exactly `0..N` for `N` columns.
    pub fn validate(&self) -> DbResult<()> {
        let mut owners: Vec<Option<&str>> = vec![None; self.columns.len()];
        for (name, column) in &self.columns {
            let Some(owner) = owners.get_mut(column.position) else {
                return Err(Details::InvalidSchema {
                    reason: format!(
                        "column {name:?} has position {} but the schema only has {} columns",
                        column.position,
                        self.columns.len()
                    ),
                }
                .into());
            };
            if let Some(other) = owner.replace(name) {
                return Err(Details::InvalidSchema {
                    reason: format!(
                        "columns {other:?} and {name:?} share position {}",
                        column.position
                    ),
                }
                .into());
            }
        }
        // With every position in range and none shared, all of `0..N` is taken.
        Ok(())
    }
}

impl TryFrom<HashMap<String, Column>> for Schema {
    type Error = Error;

    fn try_from(columns: HashMap<String, Column>) -> Result<Self, Self::Error> {
        for (name, column) in &columns {
            validate_column_name(name)?;
            validate_column_type(name, &column.data_type)?;
        }
        let schema = Schema { columns };
        schema.validate()?;
        Ok(schema)
    }
}

impl From<Schema> for HashMap<String, Column> {
    fn from(schema: Schema) -> Self {
        schema.columns
    }
}

impl FromStr for Schema {
    type Err = Error;

    fn from_str(header: &str) -> Result<Self, Self::Err> {
        parse_header(header)
    }
}

/// Renders the header line in position order, without its trailing newline.
///
/// Positions are not validated here, so gaps and shared positions go unnoticed. Use
/// [`make_header`] to reject a schema that does not pass [`Schema::validate`].
impl Display for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&render_header(self))
    }
}
