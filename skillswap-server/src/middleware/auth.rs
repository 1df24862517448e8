use skillswap_common::token::auth_token::{AuthToken, AuthTokenClaims};
use skillswap_common::token::{Token, TokenError};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future;

use crate::env;
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::{get_bearer_token, into_actix_error_res};

/// The identity carried by a verified bearer token. Extracting this from a
/// request rejects the request when the token is missing (401) or fails
/// verification (403).
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub user_email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = HttpErrorResponse;
    type Future = future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match into_actix_error_res(claims_from_request(req)) {
            Ok(claims) => future::ok(AuthenticatedUser {
                user_id: claims.user_id,
                user_email: claims.user_email,
            }),
            Err(e) => future::err(e),
        }
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<AuthTokenClaims, TokenError> {
    let token = get_bearer_token(req).ok_or(TokenError::TokenMissing)?;
    let decoded = AuthToken::decode(token)?;
    let claims = decoded.verify(&env::CONF.token_signing_key)?;

    Ok(claims.clone())
}
