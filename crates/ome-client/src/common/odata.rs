//! OData helpers for OME collection endpoints
//!
//! OME wraps every collection in `{"@odata.count": n, "value": [...], "@odata.nextLink": "..."}`
//! and filters with `$filter=<expression>`.

use serde::{Deserialize, Serialize};

/// Collection response wrapper from the OME API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ODataCollection<T> {
    #[serde(rename = "@odata.count", default)]
    pub count: Option<u64>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Quote a string literal for use inside an OData filter expression
///
/// Single quotes are doubled, as OData requires.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Build a `?$filter=` query suffix from a filter expression
pub fn filter_query(expression: &str) -> String {
    format!("?$filter={}", urlencoding::encode(expression))
}

/// Build an `eq` filter for a string property, e.g. `Name eq 'x'`
pub fn eq_filter(property: &str, value: &str) -> String {
    filter_query(&format!("{} eq {}", property, quote(value)))
}
