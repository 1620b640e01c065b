//! Grove Query Request
//!
//! Normalizes raw caller parameters into an immutable request. Nothing here
//! rejects input: bad page sizes are clamped, unknown sort fields and scopes
//! fall back to defaults, and unusable paths are ignored.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::filter::TextFilter;
use crate::sort::SortSpec;
use grove_common::{RecordsConfig, ScanScope};
use grove_document::CollectionPath;

// =============================================================================
// Raw Parameters
// =============================================================================

/// Caller parameters as they arrive on the query string. Everything is a
/// string so malformed values normalize instead of failing extraction.
#[derive(Debug, Clone, Default)]
pub struct RecordParams {
    pub page_size: Option<String>,
    pub sort_field: Option<String>,
    pub sort_dir: Option<String>,
    pub scope: Option<String>,
    pub cursor: Option<String>,
    pub page_token: Option<String>,
    pub q: Option<String>,
    pub all: Option<String>,
    pub path: Option<String>,
}

impl RecordParams {
    /// Build from raw query-string pairs. The first occurrence of a key wins
    /// and unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "pageSize" => &mut params.page_size,
                "sortField" => &mut params.sort_field,
                "sortDir" => &mut params.sort_dir,
                "scope" => &mut params.scope,
                "cursor" => &mut params.cursor,
                "pageToken" => &mut params.page_token,
                "q" => &mut params.q,
                "all" => &mut params.all,
                "path" => &mut params.path,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

// =============================================================================
// Query Request
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub page_size: usize,
    pub sort: SortSpec,
    pub text_filter: Option<TextFilter>,
    pub cursor: Option<String>,
    pub accumulate_all: bool,
    pub scope: ScanScope,
    /// Alternate fixed collection for single-scope scans.
    pub path_override: Option<CollectionPath>,
}

impl QueryRequest {
    pub fn from_params(params: &RecordParams, config: &RecordsConfig) -> Self {
        let page_size = params
            .page_size
            .as_deref()
            .and_then(|raw| parse_page_size(raw, config.max_page_size))
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));

        let cursor = params
            .cursor
            .as_deref()
            .or(params.page_token.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let accumulate_all = matches!(
            params.all.as_deref().map(str::trim),
            Some("1") | Some("true")
        );

        let scope = params
            .scope
            .as_deref()
            .and_then(ScanScope::parse)
            .unwrap_or(config.default_scope);

        let path_override = params
            .path
            .as_deref()
            .and_then(|raw| CollectionPath::parse(raw).ok());

        Self {
            page_size,
            sort: SortSpec::parse(params.sort_field.as_deref(), params.sort_dir.as_deref()),
            text_filter: TextFilter::new(params.q.as_deref()),
            cursor,
            accumulate_all,
            scope,
            path_override,
        }
    }
}

/// Digits too large for `usize` still mean "as many as allowed".
fn parse_page_size(raw: &str, max: usize) -> Option<usize> {
    let raw = raw.trim();
    match raw.parse::<usize>() {
        Ok(size) => Some(size),
        Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => Some(max),
        Err(_) => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
