use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type BeanId = i64;

/// Remote pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// A jelly bean as persisted in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JellyBean {
    pub bean_id: BeanId,
    pub group_name: Vec<String>,
    pub ingredients: Vec<String>,
    pub flavor_name: String,
    pub description: String,
    pub color_group: String,
    /// Packed ARGB
    pub background_color: u32,
    pub image_url: String,
    pub gluten_free: bool,
    pub sugar_free: bool,
    pub seasonal: bool,
    pub kosher: bool,
    /// Remote page this bean was last fetched with. Only meaningful while the
    /// page size stays the same for the lifetime of the cache.
    pub page: u32,
}

impl JellyBean {
    pub fn background_hex(&self) -> String {
        format!("#{:08X}", self.background_color)
    }

    /// Short marker string for the dietary flags, e.g. "GF SF".
    pub fn dietary_tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.gluten_free {
            tags.push("GF");
        }
        if self.sugar_free {
            tags.push("SF");
        }
        if self.seasonal {
            tags.push("S");
        }
        if self.kosher {
            tags.push("K");
        }
        tags
    }
}

/// Neighbor links for one fetched remote page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteKey {
    pub prev_page: Option<u32>,
    pub current_page: u32,
    pub next_page: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl RemoteKey {
    pub fn for_page(current_page: u32, total_pages: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            prev_page: current_page.checked_sub(1).filter(|p| *p >= FIRST_PAGE),
            current_page,
            next_page: current_page
                .checked_add(1)
                .filter(|p| *p <= total_pages),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_prev() {
        let key = RemoteKey::for_page(1, 3, Utc::now());
        assert_eq!(key.prev_page, None);
        assert_eq!(key.next_page, Some(2));
    }

    #[test]
    fn last_page_has_no_next() {
        let key = RemoteKey::for_page(3, 3, Utc::now());
        assert_eq!(key.prev_page, Some(2));
        assert_eq!(key.next_page, None);
    }

    #[test]
    fn page_past_the_end_has_no_next() {
        let key = RemoteKey::for_page(5, 2, Utc::now());
        assert_eq!(key.prev_page, Some(4));
        assert_eq!(key.next_page, None);
    }

    #[test]
    fn empty_data_set_has_no_neighbors() {
        let key = RemoteKey::for_page(1, 0, Utc::now());
        assert_eq!(key.prev_page, None);
        assert_eq!(key.next_page, None);
    }

    #[test]
    fn background_hex_is_argb() {
        let bean = JellyBean {
            bean_id: 1,
            group_name: vec![],
            ingredients: vec![],
            flavor_name: "Very Cherry".into(),
            description: String::new(),
            color_group: "red".into(),
            background_color: 0xFFB3_1B1B,
            image_url: String::new(),
            gluten_free: true,
            sugar_free: false,
            seasonal: false,
            kosher: true,
            page: 1,
        };
        assert_eq!(bean.background_hex(), "#FFB31B1B");
        assert_eq!(bean.dietary_tags(), vec!["GF", "K"]);
    }
}
