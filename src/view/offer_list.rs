use std::collections::HashSet;

use tracing::{debug, warn};

use super::actions::Action;
use super::paging;
use super::sorting::{sort_order, SortOption};
use super::ViewConfig;
use crate::error::OfferError;
use crate::state::{
    CaseId, FavoriteLocks, Offer, OfferId, SessionId, ViewStatus, ViewedTracker,
};

/// Sorted, paginated view over the offers of one case.
///
/// Pure state: every operation that needs the backend returns [`Action`]s
/// and the caller feeds the responses back through the `apply_*` methods.
/// The sorted order is kept as a permutation of `offers` and rebuilt
/// whenever the offers or the sort option change.
#[derive(Debug)]
pub struct OfferListViewState {
    config: ViewConfig,
    session: SessionId,
    /// Offers in fetched order
    offers: Vec<Offer>,
    /// Indexes into `offers` in display order
    order: Vec<usize>,
    sort: SortOption,
    current_page: usize,
    viewed: ViewedTracker,
    /// Outlives sessions: a toggle stays in flight across a refetch.
    favorites: FavoriteLocks,
}

impl OfferListViewState {
    pub fn new(config: ViewConfig) -> Self {
        let sort = config.default_sort;
        Self {
            config,
            session: SessionId::default(),
            offers: Vec::new(),
            order: Vec::new(),
            sort,
            current_page: 0,
            viewed: ViewedTracker::new(),
            favorites: FavoriteLocks::new(),
        }
    }

    // =========================================================================
    // INPUTS
    // =========================================================================

    /// Install a freshly fetched list.
    ///
    /// Opens a new session, forgets what was submitted under the old one
    /// and shows the first page. Returns the mark-as-viewed requests for it.
    pub fn replace_offers(&mut self, offers: Vec<Offer>) -> Vec<Action> {
        let mut seen = HashSet::with_capacity(offers.len());
        let mut unique = Vec::with_capacity(offers.len());
        for offer in offers {
            if seen.insert(offer.id) {
                unique.push(offer);
            } else {
                warn!(offer_id = %offer.id, "duplicate offer in fetched list, keeping first");
            }
        }

        self.session = self.session.next();
        self.offers = unique;
        self.viewed = ViewedTracker::new();
        self.current_page = 0;
        self.rebuild();
        debug!(
            session = self.session.get(),
            offers = self.offers.len(),
            pages = self.page_count(),
            "offer list replaced"
        );
        self.visit_current_page()
    }

    /// Change the ordering. Jumps back to the first page.
    ///
    /// The submitted set is kept: it tracks offers, not pages.
    pub fn set_sort(&mut self, sort: SortOption) -> Vec<Action> {
        if sort == self.sort {
            return Vec::new();
        }
        self.sort = sort;
        self.current_page = 0;
        self.rebuild();
        self.visit_current_page()
    }

    /// The user moved to `page`. Out of range pages clamp to the last one.
    pub fn select_page(&mut self, page: usize) -> Vec<Action> {
        self.current_page = paging::clamp_page(page, self.order.len(), self.config.page_size);
        self.visit_current_page()
    }

    pub fn next_page(&mut self) -> Vec<Action> {
        self.select_page(self.current_page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Vec<Action> {
        self.select_page(self.current_page.saturating_sub(1))
    }

    /// Request mark-as-viewed for every offer on the current page that is
    /// neither viewed nor already submitted this session.
    pub fn visit_current_page(&mut self) -> Vec<Action> {
        let range = paging::page_bounds(self.current_page, self.order.len(), self.config.page_size);
        let offers = &self.offers;
        let page = self.order[range].iter().map(|&i| &offers[i]);

        let session = self.session;
        self.viewed
            .claim(page)
            .into_iter()
            .map(|id| Action::mark_viewed(session, id))
            .collect()
    }

    /// Request a favorite flip for one offer.
    ///
    /// Rejected while an earlier toggle for the same offer is in flight.
    pub fn toggle_favorite(&mut self, id: OfferId, favorite: bool) -> Result<Action, OfferError> {
        if self.get(id).is_none() {
            return Err(OfferError::UnknownOffer(id));
        }
        if !self.favorites.try_lock(id) {
            return Err(OfferError::FavoriteBusy(id));
        }
        Ok(Action::set_favorite(self.session, id, favorite))
    }

    /// Request acceptance of an offer still in `sent` state.
    pub fn accept(&self, case_id: CaseId, id: OfferId) -> Result<Action, OfferError> {
        let offer = self.get(id).ok_or(OfferError::UnknownOffer(id))?;
        if !offer.state.is_acceptable() {
            return Err(OfferError::NotAcceptable {
                offer_id: id,
                state: offer.state.label(),
            });
        }
        Ok(Action::accept(case_id, id))
    }

    // =========================================================================
    // RESPONSES
    // =========================================================================

    /// Apply a mark-as-viewed response.
    ///
    /// Success merges the returned fields. Failure rolls the offer back to
    /// unseen so the next visit retries it. Stale sessions are ignored.
    ///
    /// A merge can reorder the list; any offer that lands on the current
    /// page because of it is returned as a new mark-as-viewed request.
    pub fn apply_viewed(
        &mut self,
        session: SessionId,
        id: OfferId,
        result: Result<Offer, String>,
    ) -> Result<Vec<Action>, OfferError> {
        if session != self.session {
            debug!(offer_id = %id, "dropping viewed response from old session");
            return Ok(Vec::new());
        }
        let reason = match result {
            Ok(update) if update.id == id => return Ok(self.merge(id, update)),
            Ok(update) => mismatch(id, &update),
            Err(reason) => reason,
        };
        self.viewed.release(id);
        Err(OfferError::MarkViewedFailed { offer_id: id, reason })
    }

    /// Apply a favorite toggle response and release the offer's lock.
    pub fn apply_favorite(
        &mut self,
        session: SessionId,
        id: OfferId,
        result: Result<Offer, String>,
    ) -> Result<Vec<Action>, OfferError> {
        self.favorites.unlock(id);
        if session != self.session {
            debug!(offer_id = %id, "dropping favorite response from old session");
            return Ok(Vec::new());
        }
        let reason = match result {
            Ok(update) if update.id == id => return Ok(self.merge(id, update)),
            Ok(update) => mismatch(id, &update),
            Err(reason) => reason,
        };
        Err(OfferError::FavoriteToggleFailed { offer_id: id, reason })
    }

    fn merge(&mut self, id: OfferId, update: Offer) -> Vec<Action> {
        let before = self.current_ids();
        match self.offers.iter_mut().find(|o| o.id == id) {
            Some(offer) => offer.merge_from(update),
            None => {
                debug!(offer_id = %id, "response for offer no longer listed");
                return Vec::new();
            }
        }
        self.rebuild();
        if self.current_ids() == before {
            return Vec::new();
        }
        self.visit_current_page()
    }

    fn current_ids(&self) -> Vec<OfferId> {
        self.current_offers().iter().map(|o| o.id).collect()
    }

    fn rebuild(&mut self) {
        self.order = sort_order(&self.offers, self.sort);
        self.current_page =
            paging::clamp_page(self.current_page, self.order.len(), self.config.page_size);
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn page_count(&self) -> usize {
        paging::page_count(self.order.len(), self.config.page_size)
    }

    pub fn get(&self, id: OfferId) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id == id)
    }

    /// Offers in fetched order.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Offers in display order.
    pub fn sorted(&self) -> Vec<&Offer> {
        self.order.iter().map(|&i| &self.offers[i]).collect()
    }

    /// Offers on `page`, empty when past the end.
    pub fn page(&self, page: usize) -> Vec<&Offer> {
        let range = paging::page_bounds(page, self.order.len(), self.config.page_size);
        self.order[range].iter().map(|&i| &self.offers[i]).collect()
    }

    pub fn pages(&self) -> Vec<Vec<&Offer>> {
        (0..self.page_count()).map(|p| self.page(p)).collect()
    }

    pub fn current_offers(&self) -> Vec<&Offer> {
        self.page(self.current_page)
    }

    pub fn view_status(&self, id: OfferId) -> Option<ViewStatus> {
        self.get(id).map(|offer| self.viewed.status(offer))
    }

    pub fn is_favorite_busy(&self, id: OfferId) -> bool {
        self.favorites.is_busy(id)
    }
}

impl Default for OfferListViewState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

fn mismatch(requested: OfferId, update: &Offer) -> String {
    warn!(offer_id = %requested, returned = %update.id, "response for a different offer");
    format!("backend answered for offer {}", update.id)
}
