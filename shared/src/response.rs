//! API Response types

use serde::{Deserialize, Serialize};

/// Collection envelope returned by list endpoints
///
/// ```json
/// {
///     "records": [ ... ],
///     "count": 42
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Records on this page
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    /// Total matching records, when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}
