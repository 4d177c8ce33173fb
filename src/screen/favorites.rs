use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{spawn_call, LoadState};
use crate::api::OfferBackend;
use crate::error::OfferError;
use crate::events::{Event, Notice};
use crate::state::{FavoritesList, OfferId};

/// The client's favorite offers. Un-favoriting drops the entry once the
/// backend confirms.
pub struct FavoritesScreen<B> {
    backend: Arc<B>,
    list: FavoritesList,
    load: LoadState,
    fetch_seq: u64,
    notices: Vec<Notice>,
    tx: mpsc::Sender<Event>,
}

impl<B: OfferBackend> FavoritesScreen<B> {
    pub fn new(backend: Arc<B>, tx: mpsc::Sender<Event>) -> Self {
        Self {
            backend,
            list: FavoritesList::new(),
            load: LoadState::Idle,
            fetch_seq: 0,
            notices: Vec::new(),
            tx,
        }
    }

    pub fn refresh(&mut self) {
        self.fetch_seq += 1;
        self.load = LoadState::Loading;
        let seq = self.fetch_seq;
        let backend = Arc::clone(&self.backend);
        spawn_call(&self.tx, async move {
            let result = backend
                .list_favorite_offers()
                .await
                .map_err(|e| e.to_string());
            Event::FavoritesLoaded { seq, result }
        });
    }

    pub fn remove(&mut self, id: OfferId) {
        if self.list.get(id).is_none() {
            return self.report(OfferError::UnknownOffer(id));
        }
        if !self.list.begin_remove(id) {
            return self.report(OfferError::FavoriteBusy(id));
        }
        let backend = Arc::clone(&self.backend);
        spawn_call(&self.tx, async move {
            let result = backend
                .set_offer_favorite(id, false)
                .await
                .map_err(|e| e.to_string());
            Event::UnfavoriteDone { offer_id: id, result }
        });
    }

    /// Apply one event. Returns false on shutdown.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Refresh => self.refresh(),
            Event::ToggleFavorite(id) => self.remove(id),
            Event::FavoritesLoaded { seq, result } => {
                if seq != self.fetch_seq {
                    debug!(seq, "dropping stale favorites list");
                    return true;
                }
                match result {
                    Ok(offers) => {
                        info!(count = offers.len(), "favorites loaded");
                        self.list.replace(offers);
                        self.load = LoadState::Ready;
                    }
                    Err(reason) => {
                        self.load = LoadState::Failed(reason.clone());
                        self.report(OfferError::FetchFailed(reason));
                    }
                }
            }
            Event::UnfavoriteDone { offer_id, result } => {
                let succeeded = result.is_ok();
                self.list.finish_remove(offer_id, succeeded);
                if let Err(reason) = result {
                    self.report(OfferError::FavoriteToggleFailed { offer_id, reason });
                }
            }
            Event::Shutdown => return false,
            _ => {}
        }
        true
    }

    fn report(&mut self, err: OfferError) {
        warn!(error = %err, "favorites operation failed");
        self.notices.push(Notice::Error(err));
    }

    pub fn list(&self) -> &FavoritesList {
        &self.list
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
