use shared::SortOrder;
use std::collections::BTreeMap;
use wasm_bindgen::JsValue;
use web_sys::UrlSearchParams;
use yew::prelude::*;

use crate::services::logging::Logger;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Per-table configuration supplied by the listing screen.
#[derive(Clone, PartialEq)]
pub struct TableQueryConfig {
    /// Filter keys this table recognizes in the URL; anything else in the
    /// query string is ignored.
    pub filter_keys: &'static [&'static str],
    pub default_page_size: u32,
}

impl Default for TableQueryConfig {
    fn default() -> Self {
        Self {
            filter_keys: &[],
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// What the user is currently looking at, derived from the URL query
/// string on every render. The URL is the single source of truth; this
/// value is never stored anywhere it could drift.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQueryState {
    /// 1-based page number, always >= 1.
    pub page: u32,
    pub limit: u32,
    /// Empty string means no text filter.
    pub search: String,
    /// Column key and direction together, or no sort at all.
    pub sort: Option<(String, SortOrder)>,
    pub filters: BTreeMap<String, String>,
}

impl TableQueryState {
    pub fn new(config: &TableQueryConfig) -> Self {
        Self::from_pairs(&[], config)
    }

    /// Parse key/value pairs from a query string. Malformed values never
    /// error; they fall back to defaults (`page=1`,
    /// `limit=default_page_size`, sort absent).
    pub fn from_pairs(pairs: &[(String, String)], config: &TableQueryConfig) -> Self {
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let page = get("page")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = get("limit")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(config.default_page_size);
        let search = get("search").unwrap_or("").to_string();

        // sortBy and sortOrder only count when both are present and the
        // order is one of the two exact literals.
        let sort = match (get("sortBy"), get("sortOrder").and_then(SortOrder::from_param)) {
            (Some(by), Some(order)) if !by.is_empty() => Some((by.to_string(), order)),
            _ => None,
        };

        let mut filters = BTreeMap::new();
        for key in config.filter_keys {
            if let Some(value) = get(key) {
                if !value.is_empty() {
                    filters.insert(key.to_string(), value.to_string());
                }
            }
        }

        Self {
            page,
            limit,
            search,
            sort,
            filters,
        }
    }

    /// Serialize back to query-string pairs. `page` and `limit` are always
    /// written; everything else only while active, keeping the URL minimal.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search".to_string(), self.search.clone()));
        }
        if let Some((by, order)) = &self.sort {
            pairs.push(("sortBy".to_string(), by.clone()));
            pairs.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }

    /// Percent-encoded query string for request URLs and the address bar.
    pub fn to_query_string(&self) -> String {
        match UrlSearchParams::new() {
            Ok(params) => {
                for (key, value) in self.to_pairs() {
                    params.append(&key, &value);
                }
                params.to_string().into()
            }
            Err(_) => String::new(),
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    pub fn with_page_size(&self, limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_search(&self, search: String) -> Self {
        Self {
            search,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: Option<(String, SortOrder)>) -> Self {
        Self {
            sort,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_filter(&self, key: &str, value: Option<String>) -> Self {
        let mut filters = self.filters.clone();
        match value {
            Some(value) if !value.is_empty() => {
                filters.insert(key.to_string(), value);
            }
            // Clearing a filter deletes the key rather than writing an
            // empty value.
            _ => {
                filters.remove(key);
            }
        }
        Self {
            filters,
            page: 1,
            ..self.clone()
        }
    }

    /// Header-click sort cycle: unsorted column -> asc, asc -> desc,
    /// desc -> no sort.
    pub fn cycled_sort(&self, column: &str) -> Self {
        let next = match &self.sort {
            Some((active, SortOrder::Asc)) if active == column => {
                Some((column.to_string(), SortOrder::Desc))
            }
            Some((active, SortOrder::Desc)) if active == column => None,
            _ => Some((column.to_string(), SortOrder::Asc)),
        };
        self.with_sort(next)
    }
}

/// Current state plus URL-writing setters for one table instance.
#[derive(Clone, PartialEq)]
pub struct UseTableQueryHandle {
    pub state: TableQueryState,
    pub set_page: Callback<u32>,
    pub set_page_size: Callback<u32>,
    pub set_search: Callback<String>,
    /// Takes the clicked column's sort key and applies the 3-state cycle.
    pub cycle_sort: Callback<String>,
    /// `(key, None)` clears the filter.
    pub set_filter: Callback<(String, Option<String>)>,
}

/// Two-way binding between the URL query string and a [`TableQueryState`].
///
/// Setters rewrite the query string through `history.replaceState`, so the
/// back button does not step through every keystroke and the current view
/// is shareable as a link. Every setter except `set_page` resets `page`
/// to 1.
#[hook]
pub fn use_table_query(config: TableQueryConfig) -> UseTableQueryHandle {
    // The URL is the source of truth; this counter only forces a
    // re-render after the URL has been rewritten.
    let revision = use_state(|| 0u32);

    let state = read_location(&config);

    let commit = {
        let revision = revision.clone();
        let config = config.clone();
        Callback::from(move |next: TableQueryState| {
            replace_location(&next, &config);
            revision.set((*revision).wrapping_add(1));
        })
    };

    let set_page = {
        let config = config.clone();
        let commit = commit.clone();
        Callback::from(move |page: u32| commit.emit(read_location(&config).with_page(page)))
    };

    let set_page_size = {
        let config = config.clone();
        let commit = commit.clone();
        Callback::from(move |limit: u32| commit.emit(read_location(&config).with_page_size(limit)))
    };

    let set_search = {
        let config = config.clone();
        let commit = commit.clone();
        Callback::from(move |search: String| commit.emit(read_location(&config).with_search(search)))
    };

    let cycle_sort = {
        let config = config.clone();
        let commit = commit.clone();
        Callback::from(move |column: String| commit.emit(read_location(&config).cycled_sort(&column)))
    };

    let set_filter = {
        let config = config.clone();
        let commit = commit.clone();
        Callback::from(move |(key, value): (String, Option<String>)| {
            commit.emit(read_location(&config).with_filter(&key, value))
        })
    };

    UseTableQueryHandle {
        state,
        set_page,
        set_page_size,
        set_search,
        cycle_sort,
        set_filter,
    }
}

fn params_to_pairs(params: &UrlSearchParams, config: &TableQueryConfig) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for key in ["page", "limit", "search", "sortBy", "sortOrder"] {
        if let Some(value) = params.get(key) {
            pairs.push((key.to_string(), value));
        }
    }
    for key in config.filter_keys {
        if let Some(value) = params.get(key) {
            pairs.push((key.to_string(), value));
        }
    }
    pairs
}

fn read_location(config: &TableQueryConfig) -> TableQueryState {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    match UrlSearchParams::new_with_str(search.trim_start_matches('?')) {
        Ok(params) => TableQueryState::from_pairs(&params_to_pairs(&params, config), config),
        Err(_) => TableQueryState::new(config),
    }
}

fn replace_location(state: &TableQueryState, config: &TableQueryConfig) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let current = location.search().unwrap_or_default();

    // Merge into the existing query string: only the managed keys are
    // rewritten, anything else (tabs, campaign params) passes through.
    let params = match UrlSearchParams::new_with_str(current.trim_start_matches('?')) {
        Ok(params) => params,
        Err(_) => match UrlSearchParams::new() {
            Ok(params) => params,
            Err(_) => return,
        },
    };
    for key in ["page", "limit", "search", "sortBy", "sortOrder"] {
        params.delete(key);
    }
    for key in config.filter_keys {
        params.delete(key);
    }
    for (key, value) in state.to_pairs() {
        params.append(&key, &value);
    }

    let query: String = params.to_string().into();
    let url = if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    };
    if let Ok(history) = window.history() {
        if history
            .replace_state_with_url(&JsValue::NULL, "", Some(&url))
            .is_err()
        {
            Logger::warn_with_component("table-query", "Failed to rewrite the URL query string");
        }
    }
}
