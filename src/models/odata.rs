//! OData collection envelope returned by Microsoft Graph

use serde::Deserialize;

/// Graph collection response with value array
///
/// Graph truncates large collections to one page and points at the rest
/// through `@odata.nextLink`. This tool reports the first page only, so the
/// link is surfaced for logging but never followed.
#[derive(Debug, Deserialize)]
pub struct GraphCollection<T> {
    #[serde(rename = "value")]
    pub value: Vec<T>,

    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}
