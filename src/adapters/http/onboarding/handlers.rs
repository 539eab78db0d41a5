//! HTTP handlers for onboarding endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Form, FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};

use crate::application::handlers::onboarding::{
    CheckCompletionHandler, CheckCompletionQuery, CreateAccountCommand,
    HandleAccountWebhookCommand, HandleAccountWebhookHandler, IssueOnboardingLinkCommand,
    IssueOnboardingLinkHandler, StartOnboardingCommand, StartOnboardingHandler,
};
use crate::config::PartnerConfig;
use crate::domain::onboarding::{AccountId, OnboardingError, SessionId};
use crate::ports::{ConnectPlatform, SessionStore};

use super::dto::{AccountIdParams, HealthResponse, OnboardRequest, WebhookReceivedResponse};
use super::pages;

/// Cookie carrying the caller's session id.
pub const SESSION_COOKIE: &str = "partner_session";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct OnboardingAppState {
    pub platform: Arc<dyn ConnectPlatform>,
    pub sessions: Arc<dyn SessionStore>,
    pub partner: PartnerConfig,
    /// Mark the session cookie `Secure` (production, behind TLS).
    pub secure_cookies: bool,
}

impl OnboardingAppState {
    pub fn new(
        platform: Arc<dyn ConnectPlatform>,
        sessions: Arc<dyn SessionStore>,
        partner: PartnerConfig,
    ) -> Self {
        Self {
            platform,
            sessions,
            partner,
            secure_cookies: false,
        }
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Create handlers on demand from the shared state.
    pub fn start_onboarding_handler(&self) -> StartOnboardingHandler {
        StartOnboardingHandler::new(self.platform.clone(), self.partner.clone())
    }

    pub fn issue_link_handler(&self) -> IssueOnboardingLinkHandler {
        IssueOnboardingLinkHandler::new(self.platform.clone())
    }

    pub fn check_completion_handler(&self) -> CheckCompletionHandler {
        CheckCompletionHandler::new(self.platform.clone())
    }

    pub fn webhook_handler(&self) -> HandleAccountWebhookHandler {
        HandleAccountWebhookHandler::new(self.platform.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Caller Session
// ════════════════════════════════════════════════════════════════════════════════

/// Session id from the `partner_session` cookie, if present and well formed.
#[derive(Debug, Clone, Copy)]
pub struct CallerSession(pub Option<SessionId>);

#[async_trait]
impl<S> FromRequestParts<S> for CallerSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CallerSession(session_from_headers(&parts.headers)))
    }
}

fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.trim().parse().ok())
}

fn session_cookie(session_id: SessionId, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Resolve the account for a callback: query parameter first, then the
/// caller's session binding.
async fn resolve_account_id(
    state: &OnboardingAppState,
    params: AccountIdParams,
    session: CallerSession,
) -> Result<AccountId, OnboardingError> {
    if let Some(id) = params.account_id.filter(|id| !id.trim().is_empty()) {
        return AccountId::new(id).map_err(|e| {
            tracing::warn!(error = %e, "Rejected malformed account_id");
            OnboardingError::MissingAccountId
        });
    }

    let Some(session_id) = session.0 else {
        return Err(OnboardingError::MissingAccountId);
    };

    match state.sessions.lookup(session_id).await {
        Ok(Some(account_id)) => Ok(account_id),
        Ok(None) => Err(OnboardingError::MissingAccountId),
        Err(e) => {
            tracing::error!(%session_id, error = %e, "Session lookup failed");
            Err(OnboardingError::platform_unavailable(e.to_string()))
        }
    }
}

fn redirect_found(url: &str) -> Result<Response, OnboardingApiError> {
    let location = HeaderValue::from_str(url).map_err(|e| {
        tracing::error!(error = %e, "Onboarding URL is not a valid header value");
        OnboardingApiError::internal("Error creating new account link")
    })?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Informational page
pub async fn index() -> impl IntoResponse {
    Html(pages::index_page())
}

/// GET /health - Liveness check
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /stripe/refresh - Mint a fresh onboarding link and redirect to it
pub async fn refresh_link(
    State(state): State<OnboardingAppState>,
    session: CallerSession,
    Query(params): Query<AccountIdParams>,
) -> Result<Response, OnboardingApiError> {
    const FAILURE: &str = "Error creating new account link";

    let account_id = resolve_account_id(&state, params, session)
        .await
        .map_err(|e| OnboardingApiError::new(e, FAILURE))?;

    let handler = state.issue_link_handler();
    let cmd = IssueOnboardingLinkCommand::refresh(account_id, &state.partner);

    let result = handler
        .handle(cmd)
        .await
        .map_err(|e| OnboardingApiError::new(e, FAILURE))?;

    redirect_found(&result.link.url)
}

/// GET /stripe/return - Report whether onboarding is complete
pub async fn return_status(
    State(state): State<OnboardingAppState>,
    session: CallerSession,
    Query(params): Query<AccountIdParams>,
) -> Result<impl IntoResponse, OnboardingApiError> {
    const FAILURE: &str = "Error checking account status";

    let account_id = resolve_account_id(&state, params, session)
        .await
        .map_err(|e| OnboardingApiError::new(e, FAILURE))?;

    let handler = state.check_completion_handler();
    let result = handler
        .handle(CheckCompletionQuery { account_id })
        .await
        .map_err(|e| OnboardingApiError::new(e, FAILURE))?;

    Ok(Html(pages::completion_page(&result.account_id, &result.status)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /stripe/onboard - Create an account, bind it to the caller's session
/// and redirect into hosted onboarding
pub async fn start_onboarding(
    State(state): State<OnboardingAppState>,
    session: CallerSession,
    request: Option<Form<OnboardRequest>>,
) -> Result<Response, OnboardingApiError> {
    const FAILURE: &str = "Error creating partner account";

    let request = request.map(|Form(r)| r).unwrap_or_default();
    let handler = state.start_onboarding_handler();
    let cmd = StartOnboardingCommand {
        profile: CreateAccountCommand {
            email: request.email,
            business_name: request.business_name,
            website_url: request.website_url,
            capabilities: None,
        },
    };

    let result = handler
        .handle(cmd)
        .await
        .map_err(|e| OnboardingApiError::new(e, FAILURE))?;

    let session_id = session.0.unwrap_or_default();
    state
        .sessions
        .bind(session_id, result.account_id.clone())
        .await
        .map_err(|e| {
            tracing::error!(%session_id, error = %e, "Failed to bind session");
            OnboardingApiError::internal(FAILURE)
        })?;

    tracing::info!(
        %session_id,
        account_id = %result.account_id,
        "Onboarding started"
    );

    let mut response = redirect_found(&result.onboarding_url)?;
    let cookie = HeaderValue::from_str(&session_cookie(session_id, state.secure_cookies))
        .map_err(|_| OnboardingApiError::internal(FAILURE))?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// POST /stripe/webhook - Handle Stripe webhook events
pub async fn handle_stripe_webhook(
    State(state): State<OnboardingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, OnboardingApiError> {
    // A missing header is a signature failure
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let handler = state.webhook_handler();
    let cmd = HandleAccountWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    handler
        .handle(cmd)
        .await
        .map_err(|e| OnboardingApiError::new(e, "Webhook Error"))?;

    Ok(Json(WebhookReceivedResponse { received: true }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error that turns onboarding errors into generic HTTP responses.
///
/// Bodies never carry platform detail; the detail is logged where the error
/// is raised.
#[derive(Debug)]
pub struct OnboardingApiError {
    status: StatusCode,
    message: &'static str,
}

impl OnboardingApiError {
    /// Classify `err`, using `failure` as the body for server-side errors.
    pub fn new(err: OnboardingError, failure: &'static str) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let message = match err {
            OnboardingError::MissingAccountId => "Account ID not found",
            OnboardingError::InvalidSignature => "Webhook Error: invalid signature",
            OnboardingError::InvalidProfile(_) => "Invalid partner profile",
            OnboardingError::AccountNotFound(_) | OnboardingError::PlatformUnavailable(_) => {
                failure
            }
        };

        Self { status, message }
    }

    pub fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl IntoResponse for OnboardingApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
