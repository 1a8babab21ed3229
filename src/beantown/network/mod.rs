//! # Remote Data Source
//!
//! The catalog lives behind a paged HTTP API. This module defines the contract
//! the sync engine consumes ([`JellyBeanNetworkSource`]) and the wire types of
//! one response ([`NetworkJellyBeans`]).
//!
//! ## Error vs. empty
//!
//! Asking for a page past the end is **not** an error: sources return a
//! well-formed envelope with no items whose `current_page >= total_pages`.
//! A broken response (non-success status) is reported as the
//! [`INVALID_RESPONSE`] sentinel. Transport failures come back as `Err`.
//!
//! ## Implementations
//!
//! - [`http::HttpJellyBeanSource`]: production source over `reqwest`
//! - `fake::FakeJellyBeanSource`: in-memory source for tests (behind the
//!   `test_utils` feature)

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod color;
pub mod http;

#[cfg(any(test, feature = "test_utils"))]
pub mod fake;

/// One page of jelly beans plus the pagination metadata around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkJellyBeans {
    pub total_count: u32,
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u32,
    pub items: Vec<NetworkJellyBean>,
}

/// Sentinel for a response that could not be used at all.
pub const INVALID_RESPONSE: NetworkJellyBeans = NetworkJellyBeans {
    total_count: 0,
    page_size: 0,
    current_page: 0,
    total_pages: 0,
    items: Vec::new(),
};

impl NetworkJellyBeans {
    pub fn has_reached_end(&self) -> bool {
        self.current_page >= self.total_pages
    }

    pub fn is_error(&self) -> bool {
        *self == INVALID_RESPONSE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkJellyBean {
    pub bean_id: i64,
    pub group_name: Vec<String>,
    pub ingredients: Vec<String>,
    pub flavor_name: String,
    pub description: String,
    pub color_group: String,
    #[serde(with = "color", default = "color::unspecified")]
    pub background_color: u32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub sugar_free: bool,
    #[serde(default)]
    pub seasonal: bool,
    #[serde(default)]
    pub kosher: bool,
}

/// Source of remote jelly bean pages.
#[async_trait]
pub trait JellyBeanNetworkSource: Send + Sync {
    /// Fetch the 1-based `page_index` at `page_size` items per page.
    ///
    /// Pages past the end return an envelope with no items, never an error.
    async fn get_jelly_beans(&self, page_index: u32, page_size: u32)
        -> Result<NetworkJellyBeans>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_JSON: &str = r##"{
        "totalCount": 2,
        "pageSize": 10,
        "currentPage": 1,
        "totalPages": 1,
        "items": [
            {
                "beanId": 1,
                "groupName": ["Jelly Belly Official Flavors"],
                "ingredients": ["Sugar", "Corn Syrup"],
                "flavorName": "Very Cherry",
                "description": "Our most popular flavor",
                "colorGroup": "red",
                "backgroundColor": "#C00000",
                "imageUrl": "https://example.com/cherry.png",
                "glutenFree": true,
                "sugarFree": false,
                "seasonal": false,
                "kosher": true,
                "unknownExtra": 42
            },
            {
                "beanId": 2,
                "groupName": [],
                "ingredients": [],
                "flavorName": "Mystery",
                "description": "",
                "colorGroup": "",
                "backgroundColor": "#"
            }
        ]
    }"##;

    #[test]
    fn decodes_envelope_ignoring_unknown_keys() {
        let page: NetworkJellyBeans = serde_json::from_str(PAGE_JSON).unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items.len(), 2);

        let cherry = &page.items[0];
        assert_eq!(cherry.flavor_name, "Very Cherry");
        assert_eq!(cherry.background_color, 0xFFC0_0000);
        assert!(cherry.gluten_free);
        assert!(cherry.kosher);

        let mystery = &page.items[1];
        assert_eq!(mystery.background_color, color::UNSPECIFIED);
        assert_eq!(mystery.image_url, "");
        assert!(!mystery.seasonal);
    }

    #[test]
    fn unknown_color_fails_decoding() {
        let json = PAGE_JSON.replace("#C00000", "not-a-color");
        let err = serde_json::from_str::<NetworkJellyBeans>(&json).unwrap_err();
        assert!(err.to_string().contains("Unknown color: not-a-color"));
    }

    #[test]
    fn sentinel_is_error_but_empty_page_is_not() {
        assert!(INVALID_RESPONSE.is_error());

        let empty = NetworkJellyBeans {
            total_count: 0,
            page_size: 10,
            current_page: 1,
            total_pages: 0,
            items: vec![],
        };
        assert!(!empty.is_error());
        assert!(empty.has_reached_end());
    }

    #[test]
    fn reached_end_compares_current_and_total() {
        let mut page: NetworkJellyBeans = serde_json::from_str(PAGE_JSON).unwrap();
        assert!(page.has_reached_end());
        page.total_pages = 2;
        assert!(!page.has_reached_end());
    }
}
