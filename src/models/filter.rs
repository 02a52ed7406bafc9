//! List filters reflected into query strings

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Optional list filters for one screen
///
/// Filters round-trip through the URL: the screen reads them from its own
/// query string and forwards the same canonical string to the remote API.
pub trait Filter: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    /// Trim every value and drop the blank ones
    fn normalized(self) -> Self;

    /// Canonical query string, without the leading `?`
    fn to_query(&self) -> Result<String> {
        serde_urlencoded::to_string(self.clone().normalized())
            .map_err(|e| Error::Other(format!("Failed to encode filter: {}", e)))
    }

    fn is_empty(&self) -> bool {
        self.to_query().map(|q| q.is_empty()).unwrap_or(true)
    }
}

/// Trimmed value, or `None` when blank
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Append a query string to a path when it is not empty
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}
