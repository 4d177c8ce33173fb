mod favorites;
mod offers;

pub use favorites::FavoritesScreen;
pub use offers::OffersScreen;

use std::future::Future;

use tokio::sync::mpsc;
use tracing::debug;

use crate::events::Event;

/// Whether a screen has data to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// List-wide failure, cleared by a refresh
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Run a backend call as its own task and post the resulting event.
///
/// Once the screen is gone the send fails and the response is dropped.
pub(crate) fn spawn_call<F>(tx: &mpsc::Sender<Event>, call: F)
where
    F: Future<Output = Event> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = call.await;
        if tx.send(event).await.is_err() {
            debug!("screen closed, dropping backend response");
        }
    });
}
