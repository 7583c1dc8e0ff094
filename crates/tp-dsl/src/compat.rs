//! Backward-compatibility rewriting for stored example code.
//!
//! Old clients speak the pre-dataset surface where each example is a bare
//! `let` declaration and names never leave the server. The rewriters below
//! turn stored dataset-era code into that shape, with an extra pass of
//! string-level fixups for the oldest (v1) JSON API.

use std::sync::LazyLock;

use regex::Regex;
use tp_core::entities::ExampleRow;

use crate::{DslError, DslToolkit};

static DECLARATION_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \r\n\t\v]*(stream|query|action)[ \r\n\t\v]*(:=|\()").unwrap()
});
static PROGRAM_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \r\n\t\v]*program[ \r\n\t\v]*:=").unwrap());
static TRAILING_BRACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\};\s*$").unwrap());
static LEGACY_LET_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \r\n\t\v]*let[ \r\n\t\v]+query[ \r\n\t\v]").unwrap());
static LET_ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[ \r\n\t\v]*let[ \r\n\t\v]+(table|action|stream)[ \r\n\t\v]+x[ \r\n\t\v]*(\(.+\))[ \r\n\t\v]+:=[ \r\n\t\v]+",
    )
    .unwrap()
});

/// Rewrite one example row's target code into the legacy declaration shape,
/// clearing the name annotation old clients never saw.
///
/// # Errors
///
/// Returns `DslError` if the stored example does not parse.
pub fn rewrite_example(
    toolkit: &dyn DslToolkit,
    row: &mut ExampleRow,
    apply_legacy: bool,
) -> Result<(), DslError> {
    if DECLARATION_HEAD.is_match(&row.target_code) {
        // convert the dataset-era example to a named declaration
        let wrapped = format!("dataset @foo {{ {} }}", row.target_code);
        row.target_code = toolkit.dataset_example_to_declaration(&wrapped)?;
    } else {
        let stripped = PROGRAM_PREFIX.replace(&row.target_code, "");
        row.target_code = TRAILING_BRACE.replace(&stripped, "}").into_owned();
    }

    if apply_legacy {
        row.target_code = LEGACY_LET_QUERY
            .replace(&row.target_code, "let table ")
            .into_owned();
        row.target_code = LET_ARROW
            .replace(&row.target_code, "let ${1} x := \\${2} -> ")
            .into_owned();
    }

    row.name = None;
    Ok(())
}

/// Rewrite a batch of rows in place.
///
/// # Errors
///
/// Returns `DslError` if any stored example does not parse.
pub fn rewrite_examples(
    toolkit: &dyn DslToolkit,
    rows: &mut [ExampleRow],
    apply_legacy: bool,
) -> Result<(), DslError> {
    for row in rows {
        rewrite_example(toolkit, row, apply_legacy)?;
    }
    Ok(())
}
