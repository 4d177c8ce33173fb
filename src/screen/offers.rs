use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::{spawn_call, LoadState};
use crate::api::OfferBackend;
use crate::error::OfferError;
use crate::events::{Event, Notice};
use crate::state::{CaseId, Offer, OfferId};
use crate::view::{Action, OfferListViewState, SortOption, ViewConfig};

/// The "offers received" screen for one case.
///
/// Owns the view state and is the only thing that mutates it. Backend
/// calls run as spawned tasks and come back as [`Event`]s through the
/// screen's channel, so several calls can be in flight at once.
pub struct OffersScreen<B> {
    case_id: CaseId,
    backend: Arc<B>,
    view: OfferListViewState,
    load: LoadState,
    fetch_seq: u64,
    notices: Vec<Notice>,
    tx: mpsc::Sender<Event>,
}

impl<B: OfferBackend> OffersScreen<B> {
    pub fn new(case_id: CaseId, backend: Arc<B>, config: ViewConfig, tx: mpsc::Sender<Event>) -> Self {
        Self {
            case_id,
            backend,
            view: OfferListViewState::new(config),
            load: LoadState::Idle,
            fetch_seq: 0,
            notices: Vec::new(),
            tx,
        }
    }

    // =========================================================================
    // USER INPUT
    // =========================================================================

    /// Fetch the offer list again. Answers to earlier fetches are dropped.
    pub fn refresh(&mut self) {
        self.fetch_seq += 1;
        self.load = LoadState::Loading;
        let seq = self.fetch_seq;
        let case_id = self.case_id;
        let backend = Arc::clone(&self.backend);
        info!(case_id = %case_id, "fetching offers");
        spawn_call(&self.tx, async move {
            let result = backend
                .list_offers_for_case(case_id)
                .await
                .map_err(|e| e.to_string());
            Event::OffersLoaded { seq, result }
        });
    }

    pub fn select_page(&mut self, page: usize) {
        let actions = self.view.select_page(page);
        self.execute_all(actions);
    }

    pub fn next_page(&mut self) {
        let actions = self.view.next_page();
        self.execute_all(actions);
    }

    pub fn prev_page(&mut self) {
        let actions = self.view.prev_page();
        self.execute_all(actions);
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        let actions = self.view.set_sort(sort);
        self.execute_all(actions);
    }

    /// Flip the favorite flag of an offer.
    pub fn toggle_favorite(&mut self, id: OfferId) {
        let target = match self.view.get(id) {
            Some(offer) => !offer.is_favorite,
            None => return self.report(OfferError::UnknownOffer(id)),
        };
        match self.view.toggle_favorite(id, target) {
            Ok(action) => self.execute(action),
            Err(e) => self.report(e),
        }
    }

    pub fn accept(&mut self, id: OfferId) {
        match self.view.accept(self.case_id, id) {
            Ok(action) => self.execute(action),
            Err(e) => self.report(e),
        }
    }

    // =========================================================================
    // EVENT LOOP
    // =========================================================================

    /// Apply one event. Returns false on shutdown.
    pub fn handle(&mut self, event: Event) -> bool {
        if event.is_response() {
            debug!(?event, "backend response");
        }
        match event {
            Event::Refresh => self.refresh(),
            Event::SelectPage(page) => self.select_page(page),
            Event::NextPage => self.next_page(),
            Event::PrevPage => self.prev_page(),
            Event::Sort(sort) => self.set_sort(sort),
            Event::ToggleFavorite(id) => self.toggle_favorite(id),
            Event::Accept(id) => self.accept(id),

            Event::OffersLoaded { seq, result } => self.on_offers_loaded(seq, result),
            Event::ViewedDone {
                session,
                offer_id,
                result,
            } => {
                match self.view.apply_viewed(session, offer_id, result) {
                    Ok(actions) => self.execute_all(actions),
                    Err(e) => self.report(e),
                }
            }
            Event::FavoriteDone {
                session,
                offer_id,
                result,
            } => {
                match self.view.apply_favorite(session, offer_id, result) {
                    Ok(actions) => self.execute_all(actions),
                    Err(e) => self.report(e),
                }
            }
            Event::AcceptDone { offer_id, result } => match result {
                Ok(message) => {
                    info!(offer_id = %offer_id, "offer accepted");
                    self.notices.push(Notice::Info(message));
                    self.refresh();
                }
                Err(reason) => self.report(OfferError::AcceptOfferFailed { offer_id, reason }),
            },

            Event::Shutdown => return false,
            Event::FavoritesLoaded { .. } | Event::UnfavoriteDone { .. } => {}
        }
        true
    }

    /// Process events until shutdown or until every sender is gone.
    /// `on_change` runs after each event.
    pub async fn run<F>(&mut self, mut rx: mpsc::Receiver<Event>, mut on_change: F)
    where
        F: FnMut(&mut Self),
    {
        while let Some(event) = rx.recv().await {
            if !self.handle(event) {
                info!("offers screen shutting down");
                break;
            }
            on_change(&mut *self);
        }
    }

    fn on_offers_loaded(&mut self, seq: u64, result: Result<Vec<Offer>, String>) {
        if seq != self.fetch_seq {
            debug!(seq, current = self.fetch_seq, "dropping stale offer list");
            return;
        }
        match result {
            Ok(offers) => {
                info!(count = offers.len(), "offers loaded");
                self.load = LoadState::Ready;
                let actions = self.view.replace_offers(offers);
                self.execute_all(actions);
            }
            Err(reason) => {
                self.load = LoadState::Failed(reason.clone());
                self.report(OfferError::FetchFailed(reason));
            }
        }
    }

    // =========================================================================
    // EXECUTION
    // =========================================================================

    fn execute_all(&self, actions: Vec<Action>) {
        for action in actions {
            self.execute(action);
        }
    }

    fn execute(&self, action: Action) {
        let backend = Arc::clone(&self.backend);
        match action {
            Action::MarkViewed { session, offer_id } => spawn_call(&self.tx, async move {
                let result = backend
                    .mark_offer_viewed(offer_id, true)
                    .await
                    .map_err(|e| e.to_string());
                Event::ViewedDone {
                    session,
                    offer_id,
                    result,
                }
            }),
            Action::SetFavorite {
                session,
                offer_id,
                favorite,
            } => spawn_call(&self.tx, async move {
                let result = backend
                    .set_offer_favorite(offer_id, favorite)
                    .await
                    .map_err(|e| e.to_string());
                Event::FavoriteDone {
                    session,
                    offer_id,
                    result,
                }
            }),
            Action::Accept { case_id, offer_id } => spawn_call(&self.tx, async move {
                let result = backend
                    .accept_offer(case_id, offer_id)
                    .await
                    .map_err(|e| e.to_string());
                Event::AcceptDone { offer_id, result }
            }),
        }
    }

    fn report(&mut self, err: OfferError) {
        match &err {
            OfferError::FetchFailed(_) => error!(error = %err, "offer list unavailable"),
            _ => warn!(error = %err, "offer operation failed"),
        }
        if err.is_user_visible() {
            self.notices.push(Notice::Error(err));
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn case_id(&self) -> CaseId {
        self.case_id
    }

    pub fn view(&self) -> &OfferListViewState {
        &self.view
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Drain pending notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
