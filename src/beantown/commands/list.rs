use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::network::JellyBeanNetworkSource;
use crate::paging::pager::Pager;
use crate::store::LocalStore;

/// Open a session and page through the catalog, stopping after `limit`
/// beans when given. Load failures are reported as warnings next to
/// whatever the cache could still serve.
pub async fn run<N, L>(pager: &Pager<N, L>, limit: Option<usize>) -> Result<CmdResult>
where
    N: JellyBeanNetworkSource + ?Sized,
    L: LocalStore + ?Sized,
{
    let mut session = pager.session();
    session.start().await?;

    let mut beans = match limit {
        Some(limit) => {
            while session.items().len() < limit && session.load_next().await? {}
            session.items().to_vec()
        }
        None => session.snapshot().await?,
    };
    if let Some(limit) = limit {
        beans.truncate(limit);
    }

    let mut result = CmdResult::default();
    let states = session.load_states();
    if let Some(e) = states.refresh.error() {
        result.add_message(CmdMessage::warning(format!(
            "Could not refresh, showing cached beans: {}",
            e
        )));
    }
    if let Some(e) = states.append.error() {
        result.add_message(CmdMessage::warning(format!("Listing is incomplete: {}", e)));
    }
    if beans.is_empty() {
        result.add_message(CmdMessage::info("No jelly beans found"));
    }
    Ok(result.with_listed_beans(beans))
}
