use crate::state::{CaseId, OfferId, SessionId};

/// Side effects the view state asks for.
/// The screen turns these into backend calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Record that the client has seen an offer.
    MarkViewed {
        session: SessionId,
        offer_id: OfferId,
    },

    /// Set or clear the favorite flag of an offer.
    SetFavorite {
        session: SessionId,
        offer_id: OfferId,
        favorite: bool,
    },

    /// Accept an offer; the backend rejects the case's other offers.
    Accept {
        case_id: CaseId,
        offer_id: OfferId,
    },
}

impl Action {
    pub fn mark_viewed(session: SessionId, offer_id: OfferId) -> Self {
        Self::MarkViewed { session, offer_id }
    }

    pub fn set_favorite(session: SessionId, offer_id: OfferId, favorite: bool) -> Self {
        Self::SetFavorite {
            session,
            offer_id,
            favorite,
        }
    }

    pub fn accept(case_id: CaseId, offer_id: OfferId) -> Self {
        Self::Accept { case_id, offer_id }
    }

    /// Offer this action targets.
    pub fn offer_id(&self) -> OfferId {
        match self {
            Self::MarkViewed { offer_id, .. }
            | Self::SetFavorite { offer_id, .. }
            | Self::Accept { offer_id, .. } => *offer_id,
        }
    }

    pub fn is_mark_viewed(&self) -> bool {
        matches!(self, Self::MarkViewed { .. })
    }
}
