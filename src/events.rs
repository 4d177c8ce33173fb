use crate::state::{Offer, OfferId, SessionId};
use crate::view::SortOption;

/// Everything a screen loop reacts to: user input and backend responses.
///
/// Backend responses carry their error as a display string; the screen
/// decides which failures the user gets to see.
#[derive(Debug)]
pub enum Event {
    // User input
    Refresh,
    SelectPage(usize),
    NextPage,
    PrevPage,
    Sort(SortOption),
    ToggleFavorite(OfferId),
    Accept(OfferId),

    // Offers screen responses
    OffersLoaded {
        /// Fetch sequence number, stale fetches are dropped
        seq: u64,
        result: Result<Vec<Offer>, String>,
    },
    ViewedDone {
        session: SessionId,
        offer_id: OfferId,
        result: Result<Offer, String>,
    },
    FavoriteDone {
        session: SessionId,
        offer_id: OfferId,
        result: Result<Offer, String>,
    },
    AcceptDone {
        offer_id: OfferId,
        result: Result<String, String>,
    },

    // Favorites screen responses
    FavoritesLoaded {
        seq: u64,
        result: Result<Vec<Offer>, String>,
    },
    UnfavoriteDone {
        offer_id: OfferId,
        result: Result<Offer, String>,
    },

    // Ctrl+C, EOF or "quit"
    Shutdown,
}

impl Event {
    /// Responses are produced by spawned backend calls; the rest by the user.
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Event::OffersLoaded { .. }
                | Event::ViewedDone { .. }
                | Event::FavoriteDone { .. }
                | Event::AcceptDone { .. }
                | Event::FavoritesLoaded { .. }
                | Event::UnfavoriteDone { .. }
        )
    }
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(crate::error::OfferError),
}
