use std::collections::HashSet;

use super::offer::{Offer, OfferId};

/// Offers with a favorite toggle in flight.
/// At most one toggle per offer may be outstanding.
#[derive(Debug, Default)]
pub struct FavoriteLocks {
    busy: HashSet<OfferId>,
}

impl FavoriteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if a toggle for this offer is already in flight.
    pub fn try_lock(&mut self, id: OfferId) -> bool {
        self.busy.insert(id)
    }

    pub fn unlock(&mut self, id: OfferId) {
        self.busy.remove(&id);
    }

    pub fn is_busy(&self, id: OfferId) -> bool {
        self.busy.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.busy.len()
    }
}

/// The client's favorite offers across all cases.
#[derive(Debug, Default)]
pub struct FavoritesList {
    offers: Vec<Offer>,
    locks: FavoriteLocks,
}

impl FavoritesList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, offers: Vec<Offer>) {
        self.offers = offers;
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn get(&self, id: OfferId) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Start an un-favorite request. False if unknown or already in flight.
    pub fn begin_remove(&mut self, id: OfferId) -> bool {
        self.get(id).is_some() && self.locks.try_lock(id)
    }

    /// Apply the outcome of an un-favorite request.
    /// Returns the dropped offer on success.
    pub fn finish_remove(&mut self, id: OfferId, succeeded: bool) -> Option<Offer> {
        self.locks.unlock(id);
        if !succeeded {
            return None;
        }
        let idx = self.offers.iter().position(|o| o.id == id)?;
        Some(self.offers.remove(idx))
    }

    pub fn is_busy(&self, id: OfferId) -> bool {
        self.locks.is_busy(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OfferState;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lock_per_offer() {
        let mut locks = FavoriteLocks::new();

        assert!(locks.try_lock(OfferId(3)));
        assert!(!locks.try_lock(OfferId(3)));
        assert!(locks.try_lock(OfferId(4)));
        assert_eq!(locks.count(), 2);

        locks.unlock(OfferId(3));
        assert!(!locks.is_busy(OfferId(3)));
        assert!(locks.try_lock(OfferId(3)));
    }

    #[test]
    fn test_favorites_remove() {
        let mut list = FavoritesList::new();
        list.replace(vec![
            Offer::new(1, dec!(10), OfferState::Sent),
            Offer::new(2, dec!(20), OfferState::Sent),
        ]);

        assert!(list.begin_remove(OfferId(1)));
        assert!(!list.begin_remove(OfferId(1)));
        assert!(list.is_busy(OfferId(1)));

        let removed = list.finish_remove(OfferId(1), true);
        assert_eq!(removed.map(|o| o.id), Some(OfferId(1)));
        assert_eq!(list.offers().len(), 1);
        assert!(!list.is_busy(OfferId(1)));
    }

    #[test]
    fn test_favorites_remove_failure_keeps_entry() {
        let mut list = FavoritesList::new();
        list.replace(vec![Offer::new(1, dec!(10), OfferState::Sent)]);

        assert!(list.begin_remove(OfferId(1)));
        assert!(list.finish_remove(OfferId(1), false).is_none());
        assert_eq!(list.offers().len(), 1);
        assert!(list.begin_remove(OfferId(1)));
    }

    #[test]
    fn test_favorites_unknown_offer() {
        let mut list = FavoritesList::new();
        assert!(!list.begin_remove(OfferId(9)));
    }
}
