use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;

/// Claims minted by the external identity provider. `sub` is the
/// provider-side id that users.external_id mirrors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": message})),
    )
        .into_response()
}

fn forbidden(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"success": false, "message": message})),
    )
        .into_response()
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

/// Requires a valid bearer token and attaches the backing user row as a
/// request extension. Creates the row on first sight of a subject.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized("Authentication required");
    };
    let config = crate::config::get_config();
    let claims = match decode_token(token, &config.jwt_secret) {
        Ok(claims) => claims,
        Err(_) => return unauthorized("Invalid or expired token"),
    };
    match state.user_service.resolve(&claims).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Attaches the user when a valid token is present but never rejects the
/// request. Malformed or expired tokens are treated as anonymous.
pub async fn optional_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(&req) {
        let config = crate::config::get_config();
        if let Ok(claims) = decode_token(token, &config.jwt_secret) {
            if let Ok(user) = state.user_service.resolve(&claims).await {
                req.extensions_mut().insert(user);
            }
        }
    }
    next.run(req).await
}

/// require_auth plus an admin role check on the resolved user.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized("Authentication required");
    };
    let config = crate::config::get_config();
    let claims = match decode_token(token, &config.jwt_secret) {
        Ok(claims) => claims,
        Err(_) => return unauthorized("Invalid or expired token"),
    };
    match state.user_service.resolve(&claims).await {
        Ok(user) => {
            if !user.is_admin() {
                return forbidden("Admin access required");
            }
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn mint(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn fresh_claims() -> Claims {
        Claims {
            sub: "auth0|abc123".to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            role: None,
        }
    }

    #[test]
    fn decode_roundtrip() {
        let claims = fresh_claims();
        let token = mint(&claims, "secret");
        let decoded = decode_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, "auth0|abc123");
        assert_eq!(decoded.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = mint(&fresh_claims(), "secret");
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn decode_rejects_expired() {
        let mut claims = fresh_claims();
        claims.exp = (chrono::Utc::now().timestamp() - 3600) as usize;
        let token = mint(&claims, "secret");
        assert!(decode_token(&token, "secret").is_err());
    }
}
