use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::network::JellyBeanNetworkSource;
use crate::paging::pager::Pager;
use crate::paging::LoadState;
use crate::store::LocalStore;

/// Drop the cache and re-fetch the first page.
pub async fn run<N, L>(pager: &Pager<N, L>) -> Result<CmdResult>
where
    N: JellyBeanNetworkSource + ?Sized,
    L: LocalStore + ?Sized,
{
    let mut session = pager.session();
    session.refresh().await?;

    let mut result = CmdResult::default();
    match &session.load_states().refresh {
        LoadState::Error(e) => {
            result.add_message(CmdMessage::error(format!("Refresh failed: {}", e)));
        }
        _ => {
            let more = if session.load_states().append.is_end() {
                "no more pages"
            } else {
                "more pages available"
            };
            result.add_message(CmdMessage::success(format!(
                "Refreshed {} beans ({})",
                session.items().len(),
                more
            )));
        }
    }
    Ok(result.with_listed_beans(session.items().to_vec()))
}
