use thiserror::Error;

use crate::state::OfferId;

/// Failures the offers screens surface or swallow.
///
/// Only `FetchFailed` is list-wide. Everything else concerns a single
/// offer and leaves the rest of the list untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OfferError {
    #[error("could not load offers: {0}")]
    FetchFailed(String),

    #[error("could not mark offer {offer_id} as viewed: {reason}")]
    MarkViewedFailed { offer_id: OfferId, reason: String },

    #[error("could not update favorite for offer {offer_id}: {reason}")]
    FavoriteToggleFailed { offer_id: OfferId, reason: String },

    #[error("could not accept offer {offer_id}: {reason}")]
    AcceptOfferFailed { offer_id: OfferId, reason: String },

    #[error("favorite update for offer {0} is already in progress")]
    FavoriteBusy(OfferId),

    #[error("offer {0} is not in the list")]
    UnknownOffer(OfferId),

    #[error("offer {offer_id} is {state} and can no longer be accepted")]
    NotAcceptable { offer_id: OfferId, state: &'static str },
}

impl OfferError {
    /// Whether the user should be told about this failure.
    /// Mark-as-viewed rollbacks happen silently.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::MarkViewedFailed { .. })
    }
}
