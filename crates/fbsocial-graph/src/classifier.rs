//! Maps Graph API responses onto [`ApiFailure`] categories.
//!
//! The HTTP status is only used to decide whether a response is an error.
//! Which category it falls into comes from the envelope's code, subcode and
//! message. The Graph API reports some errors with 200 OK (unknown aliases,
//! for one), so a 2xx body is still inspected.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiFailure;
use crate::types::{ErrorDetail, ErrorEnvelope, RawResponse};

/// Cap on the body kept in `Uncategorized` failures
const MAX_DIAGNOSTIC_BODY: usize = 400;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// OAuth token errors
const CODE_OAUTH: i64 = 190;
const CODE_PERMISSION: i64 = 10;
const CODE_PERMISSION_RANGE: std::ops::RangeInclusive<i64> = 200..=299;
const CODE_ALIAS_NOT_FOUND: i64 = 803;

const SUBCODE_APP_NOT_INSTALLED: i64 = 458;
const SUBCODE_PASSWORD_CHANGED: i64 = 460;
const SUBCODE_EXPIRED: i64 = 463;
const SUBCODE_SESSION_INVALID: i64 = 467;

static REQUIRED_PERMISSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)requires (?:'([a-z0-9_.]+)' permission|extended permission:\s*([a-z0-9_.]+))")
        .expect("permission pattern is valid")
});

/// What the caller knew when it sent the request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Whether an access token was attached to the request
    pub token_supplied: bool,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self {
            token_supplied: false,
        }
    }

    pub fn authorized() -> Self {
        Self {
            token_supplied: true,
        }
    }
}

/// Classify a response. Returns `None` when the call succeeded.
pub fn classify(response: &RawResponse, context: RequestContext) -> Option<ApiFailure> {
    let text = response.text();
    let trimmed = text.trim_start_matches(BYTE_ORDER_MARK).trim();

    let looks_like_error = starts_with_error_key(trimmed);

    if looks_like_error || !response.status.is_success() {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(trimmed) {
            return Some(classify_detail(&envelope.error, response, context));
        }
    }

    // Some lookups answer a plain `false` instead of an error object
    if trimmed == "false" {
        return Some(ApiFailure::ResourceNotFound {
            message: "Resource not found".to_string(),
        });
    }

    if response.status.is_success() && !looks_like_error {
        return None;
    }

    Some(uncategorized(
        format!("Unexpected {} response from Graph API", response.status),
        response,
    ))
}

/// Map an already-parsed envelope onto a category
pub fn classify_detail(
    detail: &ErrorDetail,
    response: &RawResponse,
    context: RequestContext,
) -> ApiFailure {
    let message = detail.message.clone();
    let msg = detail.message.as_str();

    if detail.code == Some(CODE_OAUTH) || msg.starts_with("Error validating access token") {
        return classify_token_error(detail);
    }

    if msg == "Error validating application." || msg == "Invalid access token signature." {
        return ApiFailure::InvalidAuthorization { message };
    }

    if msg.contains("An access token is required to request this resource")
        || msg.contains("An active access token must be used")
    {
        // With a token attached, the API is saying that token is unusable
        return if context.token_supplied {
            ApiFailure::InvalidAuthorization { message }
        } else {
            ApiFailure::MissingAuthorization { message }
        };
    }

    if msg.contains("Unknown path components")
        || detail.code == Some(CODE_ALIAS_NOT_FOUND)
        || msg.contains("aliases you requested do not exist")
    {
        return ApiFailure::ResourceNotFound { message };
    }

    if msg.contains("must be an owner of") {
        return ApiFailure::ResourceOwnership { message };
    }

    if msg.contains("must be a friend of") {
        return ApiFailure::NotAFriend { message };
    }

    if let Some(permission) = required_permission(msg) {
        return ApiFailure::InsufficientPermission {
            message,
            required_permission: Some(permission),
        };
    }

    let permission_code = detail
        .code
        .is_some_and(|c| c == CODE_PERMISSION || CODE_PERMISSION_RANGE.contains(&c));
    if permission_code || msg.contains("Permissions error") {
        return ApiFailure::InsufficientPermission {
            message,
            required_permission: None,
        };
    }

    let message = if message.is_empty() {
        format!("Unexpected {} response from Graph API", response.status)
    } else {
        message
    };
    uncategorized(message, response)
}

fn classify_token_error(detail: &ErrorDetail) -> ApiFailure {
    let message = detail.message.clone();
    let msg = detail.message.as_str();

    if detail.subcode() == Some(SUBCODE_EXPIRED) || msg.contains("Session has expired") {
        return ApiFailure::ExpiredAuthorization { message };
    }

    let revoked = match detail.subcode() {
        Some(SUBCODE_PASSWORD_CHANGED | SUBCODE_APP_NOT_INSTALLED | SUBCODE_SESSION_INVALID) => {
            true
        }
        _ => {
            msg.contains("changed the password")
                || msg.contains("has not authorized application")
                || msg.contains("Session does not match current stored session")
                || msg.contains("user logged out")
        }
    };

    if revoked {
        ApiFailure::RevokedAuthorization { message }
    } else {
        ApiFailure::InvalidAuthorization { message }
    }
}

/// Permission name from messages like "The operation requires 'rsvp_event'
/// permission." or "Requires extended permission: publish_stream"
pub fn required_permission(message: &str) -> Option<String> {
    let captures = REQUIRED_PERMISSION.captures(message)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().to_string())
}

/// `{"error": ...}` at the top of the body, allowing whitespace
fn starts_with_error_key(text: &str) -> bool {
    text.strip_prefix('{')
        .is_some_and(|rest| rest.trim_start().starts_with("\"error\""))
}

fn uncategorized(message: String, response: &RawResponse) -> ApiFailure {
    let body: String = response.text().chars().take(MAX_DIAGNOSTIC_BODY).collect();
    ApiFailure::Uncategorized {
        message,
        status: response.status.as_u16(),
        body,
    }
}
