use super::{JellyBeanNetworkSource, NetworkJellyBean, NetworkJellyBeans, INVALID_RESPONSE};
use crate::error::Result;
use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory data source serving a fixed list of beans in chunks.
#[derive(Default)]
pub struct FakeJellyBeanSource {
    beans: Mutex<Vec<NetworkJellyBean>>,
    requests: Mutex<Vec<(u32, u32)>>,
    simulate_network_error: AtomicBool,
    simulate_exception: AtomicBool,
}

impl FakeJellyBeanSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_beans(beans: Vec<NetworkJellyBean>) -> Self {
        let source = Self::new();
        source.add_jelly_beans(beans);
        source
    }

    pub fn add_jelly_beans(&self, beans: Vec<NetworkJellyBean>) {
        lock(&self.beans).extend(beans);
    }

    /// Answer every request with [`INVALID_RESPONSE`].
    pub fn set_simulate_network_error(&self, simulate: bool) {
        self.simulate_network_error.store(simulate, Ordering::SeqCst);
    }

    /// Fail every request with an I/O error.
    pub fn set_simulate_exception(&self, simulate: bool) {
        self.simulate_exception.store(simulate, Ordering::SeqCst);
    }

    /// `(page_index, page_size)` of every request received, in order.
    pub fn requests(&self) -> Vec<(u32, u32)> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl JellyBeanNetworkSource for FakeJellyBeanSource {
    async fn get_jelly_beans(
        &self,
        page_index: u32,
        page_size: u32,
    ) -> Result<NetworkJellyBeans> {
        lock(&self.requests).push((page_index, page_size));

        if self.simulate_exception.load(Ordering::SeqCst) {
            return Err(io::Error::other(format!(
                "Simulated exception while trying to fetch page: {} of size {} Jelly Beans!",
                page_index, page_size
            ))
            .into());
        }
        if self.simulate_network_error.load(Ordering::SeqCst) {
            return Ok(INVALID_RESPONSE);
        }

        let beans = lock(&self.beans);
        let pages: Vec<&[NetworkJellyBean]> = beans.chunks(page_size.max(1) as usize).collect();
        let items = page_index
            .checked_sub(1)
            .and_then(|i| pages.get(i as usize))
            .map(|page| page.to_vec())
            .unwrap_or_default();

        Ok(NetworkJellyBeans {
            total_count: beans.len() as u32,
            page_size,
            current_page: page_index,
            total_pages: pages.len() as u32,
            items,
        })
    }
}

/// `count` distinct beans with ids `1..=count`.
pub fn network_beans(count: usize) -> Vec<NetworkJellyBean> {
    const GROUPS: [&str; 4] = ["red", "green", "yellow", "purple"];
    (1..=count)
        .map(|i| NetworkJellyBean {
            bean_id: i as i64,
            group_name: vec!["Jelly Belly Official Flavors".to_string()],
            ingredients: vec!["Sugar".to_string(), "Corn Syrup".to_string()],
            flavor_name: format!("Flavor {}", i),
            description: format!("Description of flavor {}", i),
            color_group: GROUPS[i % GROUPS.len()].to_string(),
            background_color: 0xFF00_0000 | ((i as u32).wrapping_mul(0x0001_0101) & 0x00FF_FFFF),
            image_url: format!("https://example.com/beans/{}.png", i),
            gluten_free: i % 2 == 0,
            sugar_free: i % 3 == 0,
            seasonal: i % 5 == 0,
            kosher: true,
        })
        .collect()
}
