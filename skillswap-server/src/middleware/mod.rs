pub mod auth;

use skillswap_common::token::TokenError;

use actix_web::HttpRequest;

use crate::handlers::error::HttpErrorResponse;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn get_bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get("Authorization")?;
    let header = header.to_str().ok()?;

    let (scheme, token) = header.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[inline(always)]
fn into_actix_error_res<T>(result: Result<T, TokenError>) -> Result<T, HttpErrorResponse> {
    match result {
        Ok(t) => Ok(t),
        Err(TokenError::TokenMissing) => Err(HttpErrorResponse::Unauthorized(String::from(
            "Access token required",
        ))),
        Err(TokenError::TokenInvalid) | Err(TokenError::TokenExpired) => {
            Err(HttpErrorResponse::Forbidden(String::from("Invalid token")))
        }
    }
}
