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

//! # Custom column validation
//!
//! By default, the only requirement on column names and type tags is that they can be written into
//! a header and read back unchanged: they must be non-empty, must not contain a tab, a colon or a
//! newline, and must not start or end with ASCII whitespace. Type tags are otherwise opaque.
//!
//! Applications that know which types their tools understand can restrict them:
//!
//! ```
//! # use db_header::validator::{ColumnTypeValidator, set_column_type_validator};
//! # use regex_lite::Regex;
//! # use std::sync::OnceLock;
//! struct KnownTypes;
//!
//! impl ColumnTypeValidator for KnownTypes {
//!     fn regex(&self) -> &'static Regex {
//!         static KNOWN_TYPES_ONCE: OnceLock<Regex> = OnceLock::new();
//!         KNOWN_TYPES_ONCE.get_or_init(|| {
//!             Regex::new(r"^(int|float|str|ip)$").expect("Regex is valid")
//!         })
//!     }
//! }
//!
//! // don't parse any header before registering the custom validator(s)!
//!
//! if set_column_type_validator(Box::new(KnownTypes)).is_err() {
//!     // the rejected validator is handed back, so report the conflict ourselves
//!     panic!("There was already a column type validator configured")
//! }
//!
//! // ... use the library
//! ```
//!
//! Column names can be restricted in the same way with [`set_column_name_validator`].
//!
//! **Note**: the library allows to set a validator only once per the application lifetime!
//! If the application parses or builds a schema before setting a validator, the default validator
//! will be registered and used!

use crate::{DbResult, error::Details};
use log::debug;
use regex_lite::Regex;
use std::sync::OnceLock;

/// Accepts anything that survives a trip through the header format.
struct HeaderFormatValidator;

fn header_token_regex() -> &'static Regex {
    static HEADER_TOKEN_ONCE: OnceLock<Regex> = OnceLock::new();
    // Same whitespace set as `str::trim_ascii_end`, which strips it off the end of a header.
    HEADER_TOKEN_ONCE.get_or_init(|| {
        Regex::new(r"^[^\t\n\x0C\r :](?:[^\t\n:]*[^\t\n\x0C\r :])?$").unwrap()
    })
}

/// A trait that validates column names.
///
/// To register a custom one use [`set_column_name_validator`].
pub trait ColumnNameValidator: Send + Sync {
    /// The regex used to validate the column name.
    ///
    /// The default implementation rejects empty names, names containing a tab, a colon or a
    /// newline, and names with leading or trailing ASCII whitespace.
    fn regex(&self) -> &'static Regex {
        header_token_regex()
    }

    /// Validates a column name.
    ///
    /// Should return [`Details::InvalidColumnName`] if it is invalid.
    fn validate(&self, name: &str) -> DbResult<()> {
        let regex = ColumnNameValidator::regex(self);
        if !regex.is_match(name) {
            Err(Details::InvalidColumnName(name.to_string(), regex.as_str()).into())
        } else {
            Ok(())
        }
    }
}

impl ColumnNameValidator for HeaderFormatValidator {}

static NAME_VALIDATOR_ONCE: OnceLock<Box<dyn ColumnNameValidator + Send + Sync>> = OnceLock::new();

/// Sets a custom column name validator.
///
/// Returns `Err(validator)` if a validator is already configured.
///
/// **Note**: This function must be called before parsing any header because this will
/// register the default validator and the registration is one time only!
pub fn set_column_name_validator(
    validator: Box<dyn ColumnNameValidator + Send + Sync>,
) -> Result<(), Box<dyn ColumnNameValidator + Send + Sync>> {
    debug!("Setting a custom column name validator.");
    NAME_VALIDATOR_ONCE.set(validator)
}

pub(crate) fn validate_column_name(name: &str) -> DbResult<()> {
    NAME_VALIDATOR_ONCE
        .get_or_init(|| {
            debug!("Going to use the default column name validator.");
            Box::new(HeaderFormatValidator)
        })
        .validate(name)
}

/// A trait that validates column type tags.
///
/// To register a custom one use [`set_column_type_validator`].
pub trait ColumnTypeValidator: Send + Sync {
    /// The regex used to validate the type tag.
    ///
    /// The default implementation treats type tags as opaque and only rejects empty tags, tags
    /// containing a tab, a colon or a newline, and tags with leading or trailing ASCII whitespace.
    fn regex(&self) -> &'static Regex {
        header_token_regex()
    }

    /// Validates the type tag of the column `name`.
    ///
    /// Should return [`Details::InvalidColumnType`] if it is invalid.
    fn validate(&self, name: &str, data_type: &str) -> DbResult<()> {
        let regex = ColumnTypeValidator::regex(self);
        if !regex.is_match(data_type) {
            Err(Details::InvalidColumnType(
                name.to_string(),
                data_type.to_string(),
                regex.as_str(),
            )
            .into())
        } else {
            Ok(())
        }
    }
}

impl ColumnTypeValidator for HeaderFormatValidator {}

static TYPE_VALIDATOR_ONCE: OnceLock<Box<dyn ColumnTypeValidator + Send + Sync>> = OnceLock::new();

/// Sets a custom column type validator.
///
/// Returns `Err(validator)` if a validator is already configured.
///
/// **Note**: This function must be called before parsing any header because this will
/// register the default validator and the registration is one time only!
pub fn set_column_type_validator(
    validator: Box<dyn ColumnTypeValidator + Send + Sync>,
) -> Result<(), Box<dyn ColumnTypeValidator + Send + Sync>> {
    debug!("Setting a custom column type validator.");
    TYPE_VALIDATOR_ONCE.set(validator)
}

pub(crate) fn validate_column_type(name: &str, data_type: &str) -> DbResult<()> {
    TYPE_VALIDATOR_ONCE
        .get_or_init(|| {
            debug!("Going to use the default column type validator.");
            Box::new(HeaderFormatValidator)
        })
        .validate(name, data_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestResult;
    use rstest::rstest;

    #[rstest]
    #[case("id")]
    #[case("src ip")]
    #[case("résumé")]
    #[case("#")]
    #[case("x")]
    #[case("a\u{a0}")]
    fn default_name_validator_accepts(#[case] name: &str) -> TestResult {
        validate_column_name(name)?;
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("a\tb")]
    #[case("a:b")]
    #[case("a\nb")]
    #[case(" ")]
    #[case(" id")]
    #[case("id ")]
    #[case("id\r")]
    fn default_name_validator_rejects(#[case] name: &str) {
        let error = validate_column_name(name).unwrap_err();
        assert!(matches!(error.details(), Details::InvalidColumnName(n, _) if n == name));
    }

    #[rstest]
    #[case("int")]
    #[case("string")]
    #[case("some-opaque/type")]
    fn default_type_validator_is_opaque(#[case] data_type: &str) -> TestResult {
        validate_column_type("col", data_type)?;
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("in\tt")]
    #[case("map:str")]
    #[case("str ")]
    #[case("\tint")]
    #[case("int\x0C")]
    fn default_type_validator_rejects(#[case] data_type: &str) {
        let error = validate_column_type("col", data_type).unwrap_err();
        assert!(matches!(
            error.details(),
            Details::InvalidColumnType(n, t, _) if n == "col" && t == data_type
        ));
    }
}
