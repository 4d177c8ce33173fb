use std::future::Future;
use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiError;
use crate::config::BackendConfig;
use crate::state::{CaseId, Offer, OfferId};

/// Offer operations of the marketplace backend.
///
/// Futures must be `Send` so screens can run each call as its own task.
pub trait OfferBackend: Send + Sync + 'static {
    fn list_offers_for_case(
        &self,
        case_id: CaseId,
    ) -> impl Future<Output = Result<Vec<Offer>, ApiError>> + Send;

    fn get_offer_detail(
        &self,
        offer_id: OfferId,
    ) -> impl Future<Output = Result<Offer, ApiError>> + Send;

    /// Returns the offer with `viewed_at` filled in.
    fn mark_offer_viewed(
        &self,
        offer_id: OfferId,
        viewed: bool,
    ) -> impl Future<Output = Result<Offer, ApiError>> + Send;

    fn set_offer_favorite(
        &self,
        offer_id: OfferId,
        favorite: bool,
    ) -> impl Future<Output = Result<Offer, ApiError>> + Send;

    /// Returns the backend's confirmation message.
    fn accept_offer(
        &self,
        case_id: CaseId,
        offer_id: OfferId,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    fn list_favorite_offers(&self) -> impl Future<Output = Result<Vec<Offer>, ApiError>> + Send;
}

/// Response envelope shared by every client endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    offers: Option<Vec<Offer>>,
    #[serde(default)]
    offer: Option<Offer>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl Envelope {
    fn offers(self) -> Result<Vec<Offer>, ApiError> {
        self.offers.ok_or(ApiError::MissingPayload("offers"))
    }

    fn offer(self) -> Result<Offer, ApiError> {
        self.offer.ok_or(ApiError::MissingPayload("offer"))
    }
}

#[derive(Serialize)]
struct ViewedBody {
    is_viewed: bool,
}

#[derive(Serialize)]
struct FavoriteBody {
    is_favorite: bool,
}

/// Turn a raw response into an envelope, or the reason it failed.
pub(crate) fn decode_envelope(status: StatusCode, body: &str) -> Result<Envelope, ApiError> {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(ApiError::Decode(e)),
        Err(_) => return Err(ApiError::Status(status.as_u16())),
    };

    if !status.is_success() || !envelope.success {
        let reason = envelope
            .error
            .unwrap_or_else(|| format!("request failed with status {}", status));
        return Err(ApiError::Rejected(reason));
    }

    Ok(envelope)
}

/// `OfferBackend` over the backend's JSON API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Envelope, ApiError> {
        debug!(path, "api request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(path, status = status.as_u16(), "api response");
        decode_envelope(status, &body)
    }

    async fn get(&self, path: &str) -> Result<Envelope, ApiError> {
        self.send(self.client.get(self.url(path)), path).await
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Envelope, ApiError> {
        self.send(self.client.post(self.url(path)).json(body), path).await
    }
}

impl OfferBackend for HttpBackend {
    async fn list_offers_for_case(&self, case_id: CaseId) -> Result<Vec<Offer>, ApiError> {
        self.get(&format!("/api/client/cases/{}/offers", case_id))
            .await?
            .offers()
    }

    async fn get_offer_detail(&self, offer_id: OfferId) -> Result<Offer, ApiError> {
        self.get(&format!("/api/client/offers/{}", offer_id))
            .await?
            .offer()
    }

    async fn mark_offer_viewed(&self, offer_id: OfferId, viewed: bool) -> Result<Offer, ApiError> {
        let path = format!("/api/client/offers/{}/viewed", offer_id);
        self.post(&path, &ViewedBody { is_viewed: viewed })
            .await?
            .offer()
    }

    async fn set_offer_favorite(&self, offer_id: OfferId, favorite: bool) -> Result<Offer, ApiError> {
        let path = format!("/api/client/offers/{}/favorite", offer_id);
        self.post(&path, &FavoriteBody { is_favorite: favorite })
            .await?
            .offer()
    }

    async fn accept_offer(&self, case_id: CaseId, offer_id: OfferId) -> Result<String, ApiError> {
        let path = format!("/api/client/cases/{}/offers/{}/accept", case_id, offer_id);
        let envelope = self.post(&path, &serde_json::json!({})).await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Offer accepted".to_string()))
    }

    async fn list_favorite_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.get("/api/client/offers/favorites").await?.offers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_offer_list() {
        let body = r#"{"success": true, "offers": [
            {"id": 1, "price": 100, "state": "sent", "created_at": "2024-01-01"},
            {"id": 2, "price": 50, "state": "accepted", "viewed_at": "2024-01-03"}
        ]}"#;

        let offers = decode_envelope(StatusCode::OK, body).unwrap().offers().unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[1].id, OfferId(2));
        assert!(offers[1].is_viewed());
    }

    #[test]
    fn test_decode_rejection() {
        let body = r#"{"success": false, "error": "Case not found"}"#;
        let err = decode_envelope(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref msg) if msg == "Case not found"));
    }

    #[test]
    fn test_decode_error_status_with_envelope() {
        let body = r#"{"success": false, "error": "Unauthorized"}"#;
        let err = decode_envelope(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[test]
    fn test_decode_error_status_without_envelope() {
        let err = decode_envelope(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Status(502)));
    }

    #[test]
    fn test_decode_garbage_on_success() {
        let err = decode_envelope(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_decode_missing_payload() {
        let body = r#"{"success": true, "message": "ok"}"#;
        let err = decode_envelope(StatusCode::OK, body).unwrap().offer().unwrap_err();
        assert!(matches!(err, ApiError::MissingPayload("offer")));
    }

    #[test]
    fn test_request_bodies() {
        let viewed = serde_json::to_string(&ViewedBody { is_viewed: true }).unwrap();
        assert_eq!(viewed, r#"{"is_viewed":true}"#);
        let favorite = serde_json::to_string(&FavoriteBody { is_favorite: false }).unwrap();
        assert_eq!(favorite, r#"{"is_favorite":false}"#);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = HttpBackend::new(&BackendConfig {
            base_url: "http://localhost:8069/".to_string(),
            timeout_secs: 10,
        })
        .unwrap();
        assert_eq!(
            backend.url("/api/client/offers/favorites"),
            "http://localhost:8069/api/client/offers/favorites"
        );
    }
}
