use std::collections::HashSet;

use super::offer::{Offer, OfferId};

/// Where an offer stands in the mark-as-viewed protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// Not viewed and not yet submitted this session.
    Unseen,
    /// A mark-as-viewed request is in flight.
    Submitting,
    /// The backend has recorded a view.
    Seen,
}

/// Ids submitted for mark-as-viewed during one fetch session.
///
/// An id enters when its request is issued and stays after success.
/// It leaves only on failure so a later page visit can retry.
#[derive(Debug, Default)]
pub struct ViewedTracker {
    submitted: HashSet<OfferId>,
}

impl ViewedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the offers that still need a request and record them as submitted.
    pub fn claim<'a, I>(&mut self, offers: I) -> Vec<OfferId>
    where
        I: IntoIterator<Item = &'a Offer>,
    {
        offers
            .into_iter()
            .filter(|offer| !offer.is_viewed())
            .filter(|offer| self.submitted.insert(offer.id))
            .map(|offer| offer.id)
            .collect()
    }

    /// Roll back a failed request.
    pub fn release(&mut self, id: OfferId) -> bool {
        self.submitted.remove(&id)
    }

    pub fn is_submitted(&self, id: OfferId) -> bool {
        self.submitted.contains(&id)
    }

    pub fn status(&self, offer: &Offer) -> ViewStatus {
        if offer.is_viewed() {
            ViewStatus::Seen
        } else if self.is_submitted(offer.id) {
            ViewStatus::Submitting
        } else {
            ViewStatus::Unseen
        }
    }

    pub fn len(&self) -> usize {
        self.submitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty()
    }
}
