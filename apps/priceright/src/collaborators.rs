//! # External Collaborators
//!
//! The margin advisor and the checkout gateway live outside this process.
//! Both sit behind async traits so tests and alternative backends can stand
//! in for the HTTP implementations.
//!
//! ## Call Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request_margin_suggestion(advisor, "ceramics")                         │
//! │       │                                                                 │
//! │       ├── category < 3 chars ───────────► ValidationError              │
//! │       ├── no advisor configured ────────► CollaboratorError::Unavailable│
//! │       ▼                                                                 │
//! │  advisor.estimate(category)                                            │
//! │       ├── transport / HTTP failure ─────► CollaboratorError::Failed     │
//! │       ├── profitMargin not in 0..=10 ───► CollaboratorError::Malformed  │
//! │       ▼                                                                 │
//! │  MarginSuggestion { profitMargin: 0.18, reasoning }                    │
//! │                                                                         │
//! │  No retries. Session and ledger are never touched on failure.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use priceright_core::checkout::CheckoutRequest;
use priceright_core::validation::{validate_margin_suggestion, validate_product_category};
use priceright_core::{InventoryItem, MarginSuggestion};

use crate::error::AppResult;
use crate::state::config::CollaboratorSettings;

// =============================================================================
// Errors
// =============================================================================

/// Failure of an external collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// No endpoint configured for the collaborator.
    #[error("{service} is not configured")]
    Unavailable { service: &'static str },

    /// Transport error or non-success status.
    #[error("Collaborator call failed: {0}")]
    Failed(String),

    /// The collaborator answered with something unusable.
    #[error("Malformed collaborator response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CollaboratorError::Malformed(err.to_string())
        } else {
            CollaboratorError::Failed(err.to_string())
        }
    }
}

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

// =============================================================================
// Traits
// =============================================================================

/// Suggests a profit margin for a product category.
#[async_trait]
pub trait MarginAdvisor: Send + Sync {
    /// Returns the suggested margin as a fraction (0.15 = 15 %).
    async fn estimate(&self, category: &str) -> CollaboratorResult<MarginSuggestion>;
}

/// Opens a hosted checkout session.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Returns the URL the buyer should be redirected to.
    async fn create_session(&self, request: &CheckoutRequest) -> CollaboratorResult<String>;
}

/// The collaborators available to the command layer. Either may be absent.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub advisor: Option<Arc<dyn MarginAdvisor>>,
    pub checkout: Option<Arc<dyn CheckoutGateway>>,
}

impl Collaborators {
    /// Builds HTTP collaborators for every configured endpoint.
    pub fn from_settings(settings: &CollaboratorSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| crate::error::AppError::Config(format!("HTTP client: {}", e)))?;

        let advisor = settings.advisor_url.as_ref().map(|url| {
            info!(url = %url, "Margin advisor configured");
            Arc::new(HttpMarginAdvisor::new(client.clone(), url.clone())) as Arc<dyn MarginAdvisor>
        });
        let checkout = settings.checkout_url.as_ref().map(|url| {
            info!(url = %url, "Checkout gateway configured");
            Arc::new(HttpCheckoutGateway::new(client.clone(), url.clone()))
                as Arc<dyn CheckoutGateway>
        });

        Ok(Collaborators { advisor, checkout })
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Validates `category`, asks the advisor and validates its answer.
pub async fn request_margin_suggestion(
    advisor: Option<&dyn MarginAdvisor>,
    category: &str,
) -> AppResult<MarginSuggestion> {
    let category = validate_product_category(category)?;
    let advisor = advisor.ok_or(CollaboratorError::Unavailable {
        service: "Margin advisor",
    })?;

    debug!(category = %category, "Requesting margin suggestion");
    let suggestion = advisor.estimate(&category).await?;

    validate_margin_suggestion(&suggestion)
        .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

    info!(
        category = %category,
        margin = suggestion.profit_margin,
        "Margin suggestion received"
    );
    Ok(suggestion)
}

/// Maps `items` to line items and opens a checkout session.
///
/// ## Returns
/// The redirect URL. The ledger is left as is either way.
pub async fn start_checkout(
    gateway: Option<&dyn CheckoutGateway>,
    items: &[InventoryItem],
    app_url: &str,
) -> AppResult<String> {
    let request = CheckoutRequest::build(items, app_url)?;
    let gateway = gateway.ok_or(CollaboratorError::Unavailable {
        service: "Checkout gateway",
    })?;

    debug!(lines = request.line_items.len(), "Creating checkout session");
    let url = gateway.create_session(&request).await?;

    info!(lines = request.line_items.len(), "Checkout session created");
    Ok(url)
}

// =============================================================================
// HTTP Implementations
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateRequest<'a> {
    product_category: &'a str,
}

/// Margin advisor reached over HTTP.
///
/// `POST {endpoint}` with `{"productCategory": "..."}`, expecting
/// `{"profitMargin": 0.18, "reasoning": "..."}`.
pub struct HttpMarginAdvisor {
    client: Client,
    endpoint: String,
}

impl HttpMarginAdvisor {
    pub fn new(client: Client, endpoint: String) -> Self {
        HttpMarginAdvisor { client, endpoint }
    }
}

#[async_trait]
impl MarginAdvisor for HttpMarginAdvisor {
    async fn estimate(&self, category: &str) -> CollaboratorResult<MarginSuggestion> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EstimateRequest {
                product_category: category,
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<MarginSuggestion>().await?)
    }
}

#[derive(Deserialize)]
struct CheckoutSession {
    url: Option<String>,
}

/// Checkout gateway reached over HTTP.
///
/// `POST {endpoint}` with the [`CheckoutRequest`], expecting `{"url": "..."}`.
pub struct HttpCheckoutGateway {
    client: Client,
    endpoint: String,
}

impl HttpCheckoutGateway {
    pub fn new(client: Client, endpoint: String) -> Self {
        HttpCheckoutGateway { client, endpoint }
    }
}

#[async_trait]
impl CheckoutGateway for HttpCheckoutGateway {
    async fn create_session(&self, request: &CheckoutRequest) -> CollaboratorResult<String> {
        let session: CheckoutSession = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        session
            .url
            .ok_or_else(|| CollaboratorError::Malformed("checkout session has no url".into()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    struct FixedAdvisor(f64);

    #[async_trait]
    impl MarginAdvisor for FixedAdvisor {
        async fn estimate(&self, _category: &str) -> CollaboratorResult<MarginSuggestion> {
            Ok(MarginSuggestion {
                profit_margin: self.0,
                reasoning: "fixed".into(),
            })
        }
    }

    struct DownAdvisor;

    #[async_trait]
    impl MarginAdvisor for DownAdvisor {
        async fn estimate(&self, _category: &str) -> CollaboratorResult<MarginSuggestion> {
            Err(CollaboratorError::Failed("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_suggestion_passes_through() {
        let advisor = FixedAdvisor(0.18);
        let s = request_margin_suggestion(Some(&advisor), "ceramics").await.unwrap();
        assert_eq!(s.profit_margin, 0.18);
        assert_eq!(s.percent(), 18.0);
    }

    #[tokio::test]
    async fn test_short_category_is_validation_error() {
        let advisor = FixedAdvisor(0.18);
        let err = request_margin_suggestion(Some(&advisor), "tv").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_advisor_is_unavailable() {
        let err = request_margin_suggestion(None, "ceramics").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Collaborator(CollaboratorError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_advisor_propagates() {
        let err = request_margin_suggestion(Some(&DownAdvisor), "ceramics")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Collaborator(CollaboratorError::Failed(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_margin_is_malformed() {
        let advisor = FixedAdvisor(-0.5);
        let err = request_margin_suggestion(Some(&advisor), "ceramics").await.unwrap_err();
        assert!(matches!(err, AppError::Collaborator(CollaboratorError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_empty_checkout_never_calls_gateway() {
        let err = start_checkout(None, &[], "http://localhost:9002").await.unwrap_err();
        assert!(matches!(err, AppError::Core(priceright_core::CoreError::EmptyCheckout)));
    }

    #[test]
    fn test_unconfigured_settings_build_nothing() {
        let collaborators = Collaborators::from_settings(&CollaboratorSettings::default()).unwrap();
        assert!(collaborators.advisor.is_none());
        assert!(collaborators.checkout.is_none());
    }
}
