use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Backend identifier of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub u64);

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend identifier of a client case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub u64);

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of an offer on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferState {
    Sent,
    Accepted,
    Rejected,
    Cancelled,
}

impl OfferState {
    /// Only offers still waiting on the client can be accepted.
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Self::Sent)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

/// An offer a lawyer sent for a case, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    #[serde(default)]
    pub case_id: Option<CaseId>,
    #[serde(default)]
    pub case_name: String,
    #[serde(default)]
    pub lawyer_id: Option<u64>,
    #[serde(default)]
    pub lawyer_name: String,
    /// Fee asked by the lawyer
    pub price: Decimal,
    #[serde(default)]
    pub message: String,
    pub state: OfferState,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub viewed_at: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Offer {
    /// Minimal offer, mostly useful for building lists by hand.
    pub fn new(id: u64, price: Decimal, state: OfferState) -> Self {
        Self {
            id: OfferId(id),
            case_id: None,
            case_name: String::new(),
            lawyer_id: None,
            lawyer_name: String::new(),
            price,
            message: String::new(),
            state,
            created_at: None,
            viewed_at: None,
            is_favorite: false,
        }
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_viewed_at(mut self, viewed_at: impl Into<String>) -> Self {
        self.viewed_at = Some(viewed_at.into());
        self
    }

    pub fn is_viewed(&self) -> bool {
        self.viewed_at.is_some()
    }

    /// Creation time in epoch milliseconds.
    /// Missing or unparseable timestamps count as epoch zero.
    pub fn created_at_ms(&self) -> i64 {
        self.created_at
            .as_deref()
            .and_then(parse_timestamp_ms)
            .unwrap_or(0)
    }

    /// Overwrite fields from a fresher copy of the same offer.
    ///
    /// `viewed_at` only moves from null to set: a payload without it
    /// never clears a value we already have.
    pub fn merge_from(&mut self, update: Offer) {
        debug_assert_eq!(self.id, update.id);
        let viewed_at = update.viewed_at.or_else(|| self.viewed_at.take());
        *self = Offer { viewed_at, ..update };
    }
}

/// Parse the timestamp shapes the backend emits.
/// Naive values are read as UTC.
fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_backend_offer() {
        let json = r#"{
            "id": 7,
            "case_id": 3,
            "case_name": "Lease dispute",
            "lawyer_id": 11,
            "lawyer_name": "A. Perez",
            "price": 1500.5,
            "message": "I can help",
            "state": "sent",
            "created_at": "2024-01-02T10:00:00",
            "viewed_at": null,
            "is_favorite": false
        }"#;

        let offer: Offer = serde_json::from_str(json).unwrap();
        assert_eq!(offer.id, OfferId(7));
        assert_eq!(offer.case_id, Some(CaseId(3)));
        assert_eq!(offer.price, dec!(1500.5));
        assert_eq!(offer.state, OfferState::Sent);
        assert!(!offer.is_viewed());
    }

    #[test]
    fn test_deserialize_sparse_offer() {
        let json = r#"{"id": 1, "price": 100, "state": "cancelled"}"#;
        let offer: Offer = serde_json::from_str(json).unwrap();
        assert_eq!(offer.state, OfferState::Cancelled);
        assert_eq!(offer.created_at, None);
        assert!(!offer.is_favorite);
    }

    #[test]
    fn test_created_at_formats() {
        let base = Offer::new(1, dec!(1), OfferState::Sent);

        let date_only = base.clone().with_created_at("2024-01-01");
        assert_eq!(date_only.created_at_ms(), 1_704_067_200_000);

        let odoo = base.clone().with_created_at("2024-01-01 00:00:01");
        assert_eq!(odoo.created_at_ms(), 1_704_067_201_000);

        let rfc = base.clone().with_created_at("2024-01-01T01:00:00+01:00");
        assert_eq!(rfc.created_at_ms(), 1_704_067_200_000);

        assert_eq!(base.clone().with_created_at("yesterday").created_at_ms(), 0);
        assert_eq!(base.created_at_ms(), 0);
    }

    #[test]
    fn test_merge_keeps_viewed_at() {
        let mut offer = Offer::new(1, dec!(100), OfferState::Sent).with_viewed_at("2024-02-01");

        let mut update = Offer::new(1, dec!(100), OfferState::Sent);
        update.is_favorite = true;
        offer.merge_from(update);

        assert!(offer.is_favorite);
        assert_eq!(offer.viewed_at.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_merge_sets_viewed_at() {
        let mut offer = Offer::new(1, dec!(100), OfferState::Sent);
        offer.merge_from(Offer::new(1, dec!(100), OfferState::Sent).with_viewed_at("2024-02-01"));
        assert!(offer.is_viewed());
    }

    #[test]
    fn test_only_sent_is_acceptable() {
        assert!(OfferState::Sent.is_acceptable());
        assert!(!OfferState::Accepted.is_acceptable());
        assert!(!OfferState::Rejected.is_acceptable());
        assert!(!OfferState::Cancelled.is_acceptable());
    }

    #[test]
    fn test_label_matches_wire_name() {
        for state in [
            OfferState::Sent,
            OfferState::Accepted,
            OfferState::Rejected,
            OfferState::Cancelled,
        ] {
            let wire = serde_json::to_string(&state).unwrap();
            assert_eq!(wire, format!("\"{}\"", state.label()));
        }
    }
}
