use crate::commands::{CmdMessage, CmdResult};
use crate::model::{BeanId, JellyBean};
use crate::store::LocalStore;
use tracing::warn;

/// Point lookup against the local cache only. A failed read is logged and
/// treated as "not found".
pub async fn lookup<L: LocalStore + ?Sized>(store: &L, bean_id: BeanId) -> Option<JellyBean> {
    match store.get_bean(bean_id).await {
        Ok(bean) => bean,
        Err(e) => {
            warn!(bean_id, error = %e, "bean lookup failed");
            None
        }
    }
}

pub async fn run<L: LocalStore + ?Sized>(store: &L, bean_id: BeanId) -> CmdResult {
    match lookup(store, bean_id).await {
        Some(bean) => CmdResult::default().with_bean(bean),
        None => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning(format!(
                "Jelly bean {} is not in the local cache. Run `beantown list` to fetch more.",
                bean_id
            )));
            result
        }
    }
}
