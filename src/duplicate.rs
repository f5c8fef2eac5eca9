//! Duplicate detection against published records
//!
//! Before metadata is attached, the workflow asks the repository whether a
//! record with the document's DOI is already public. The check is
//! best-effort: if the search itself fails, the item is treated as new.

use crate::remote::DepositApi;
use serde_json::Value;
use tracing::{debug, warn};

/// Search query matching records with the given DOI
///
/// The value is quoted so the slash in a DOI is not read as query syntax.
pub fn doi_query(doi: &str) -> String {
    format!("doi:\"{}\"", doi.replace('"', "\\\""))
}

/// Check whether a published record with `doi` already exists
///
/// Returns `true` only when the search answers with an accepted status and a
/// non-empty `hits.hits` array. A rejected status, a transport error or an
/// unreadable body all return `false` (fail-open).
pub async fn identifier_exists(api: &dyn DepositApi, doi: &str) -> bool {
    let response = match api.search_records(&doi_query(doi)).await {
        Ok(response) => response,
        Err(e) => {
            warn!(doi, error = %e, "Duplicate check failed, assuming DOI is new");
            return false;
        }
    };

    if !response.is_accepted() {
        warn!(
            doi,
            status = response.status,
            "Duplicate check rejected, assuming DOI is new"
        );
        return false;
    }

    let hits = match response.json() {
        Ok(body) => hit_count(&body),
        Err(e) => {
            warn!(doi, error = %e, "Duplicate check returned unreadable body, assuming DOI is new");
            return false;
        }
    };

    debug!(doi, hits, "Duplicate check complete");
    hits > 0
}

fn hit_count(body: &Value) -> usize {
    body.get("hits")
        .and_then(|hits| hits.get("hits"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
