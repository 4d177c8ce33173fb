//! In-memory backend for exercising the screens without a server.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::{ApiError, OfferBackend};
use crate::state::{CaseId, Offer, OfferId, OfferState};

/// A request the backend received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(CaseId),
    Detail(OfferId),
    Viewed(OfferId),
    Favorite(OfferId, bool),
    Accept(CaseId, OfferId),
    Favorites,
}

#[derive(Debug, Default)]
struct Inner {
    offers: Vec<Offer>,
    /// Served by list calls, in order, before falling back to `offers`
    queued_lists: VecDeque<(Duration, Vec<Offer>)>,
    calls: Vec<Call>,
    fail_list: bool,
    fail_viewed: HashSet<OfferId>,
    fail_favorite: HashSet<OfferId>,
    fail_accept: bool,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn with_offers(offers: Vec<Offer>) -> Self {
        let backend = Self::default();
        backend.lock().offers = offers;
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn viewed_calls(&self) -> Vec<OfferId> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Viewed(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn set_offers(&self, offers: Vec<Offer>) {
        self.lock().offers = offers;
    }

    /// Answer the next list call with `offers` after `delay`.
    pub fn queue_list(&self, offers: Vec<Offer>, delay: Duration) {
        self.lock().queued_lists.push_back((delay, offers));
    }

    pub fn fail_list(&self, fail: bool) {
        self.lock().fail_list = fail;
    }

    pub fn fail_viewed(&self, id: OfferId, fail: bool) {
        let mut inner = self.lock();
        if fail {
            inner.fail_viewed.insert(id);
        } else {
            inner.fail_viewed.remove(&id);
        }
    }

    pub fn fail_favorite(&self, id: OfferId) {
        self.lock().fail_favorite.insert(id);
    }

    pub fn fail_accept(&self) {
        self.lock().fail_accept = true;
    }

    fn find(inner: &mut Inner, id: OfferId) -> Result<&mut Offer, ApiError> {
        inner
            .offers
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ApiError::Rejected(format!("offer {} not found", id)))
    }
}

impl OfferBackend for MemoryBackend {
    async fn list_offers_for_case(&self, case_id: CaseId) -> Result<Vec<Offer>, ApiError> {
        let (delay, result) = {
            let mut inner = self.lock();
            inner.calls.push(Call::List(case_id));
            if inner.fail_list {
                (Duration::ZERO, Err(ApiError::Status(500)))
            } else {
                match inner.queued_lists.pop_front() {
                    Some((delay, offers)) => (delay, Ok(offers)),
                    None => (Duration::ZERO, Ok(inner.offers.clone())),
                }
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn get_offer_detail(&self, offer_id: OfferId) -> Result<Offer, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Detail(offer_id));
        let offer = Self::find(&mut inner, offer_id)?;
        Ok(offer.clone())
    }

    async fn mark_offer_viewed(&self, offer_id: OfferId, viewed: bool) -> Result<Offer, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Viewed(offer_id));
        if inner.fail_viewed.contains(&offer_id) {
            return Err(ApiError::Rejected("viewed update failed".to_string()));
        }
        let offer = Self::find(&mut inner, offer_id)?;
        if viewed && offer.viewed_at.is_none() {
            offer.viewed_at = Some("2024-03-01T12:00:00".to_string());
        }
        Ok(offer.clone())
    }

    async fn set_offer_favorite(&self, offer_id: OfferId, favorite: bool) -> Result<Offer, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Favorite(offer_id, favorite));
        if inner.fail_favorite.contains(&offer_id) {
            return Err(ApiError::Rejected("favorite update failed".to_string()));
        }
        let offer = Self::find(&mut inner, offer_id)?;
        offer.is_favorite = favorite;
        Ok(offer.clone())
    }

    async fn accept_offer(&self, case_id: CaseId, offer_id: OfferId) -> Result<String, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Accept(case_id, offer_id));
        if inner.fail_accept {
            return Err(ApiError::Rejected("case already has a lawyer".to_string()));
        }
        for offer in inner.offers.iter_mut() {
            offer.state = if offer.id == offer_id {
                OfferState::Accepted
            } else {
                OfferState::Rejected
            };
        }
        Ok("Offer accepted".to_string())
    }

    async fn list_favorite_offers(&self) -> Result<Vec<Offer>, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Favorites);
        let favorites = inner.offers.iter().filter(|o| o.is_favorite).cloned().collect();
        Ok(favorites)
    }
}
