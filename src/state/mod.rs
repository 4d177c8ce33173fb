mod favorites;
mod offer;
mod session;
mod viewed;

pub use favorites::{FavoriteLocks, FavoritesList};
pub use offer::{CaseId, Offer, OfferId, OfferState};
pub use session::SessionId;
pub use viewed::{ViewStatus, ViewedTracker};
