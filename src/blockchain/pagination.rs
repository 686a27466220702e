// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Forward-only page cursors.
//!
//! Cursors are issued by the upstream and passed through untouched. This
//! module only decides whether there is a next page and, for HTTP callers,
//! how to ask for it.

use url::Url;

/// Query parameter carrying the upstream cursor.
pub const PAGE_TOKEN_PARAM: &str = "pageToken";

/// Query parameters that change what a page contains. They are carried over
/// to the next-page URL so the next page is filtered the same way.
pub const CONTENT_PARAMS: &[&str] = &["includeMetadata", "includeZeroBalance", "pageSize"];

/// Descriptor of the page after the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextPage {
    /// Upstream cursor; empty on the final page.
    pub page_token: String,
    /// Fully qualified URL for the next page, when a base URL is known.
    pub url: Option<String>,
}

impl NextPage {
    pub fn is_final(&self) -> bool {
        self.page_token.is_empty()
    }
}

/// Build the next-page descriptor from an upstream cursor.
///
/// `base` is the current request URL; its query and fragment are replaced.
/// `query` holds the current request's query pairs in their original order.
pub fn build_next_page(base: Option<&Url>, query: &[(String, String)], upstream_cursor: &str) -> NextPage {
    if upstream_cursor.is_empty() {
        return NextPage::default();
    }

    let url = base.map(|base| {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(PAGE_TOKEN_PARAM, upstream_cursor);
            for (key, value) in query {
                if CONTENT_PARAMS.contains(&key.as_str()) {
                    pairs.append_pair(key, value);
                }
            }
        }
        url.to_string()
    });

    NextPage {
        page_token: upstream_cursor.to_string(),
        url,
    }
}

/// Decode a raw `a=1&b=2` query string into ordered pairs.
pub fn query_pairs(raw_query: Option<&str>) -> Vec<(String, String)> {
    raw_query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}
