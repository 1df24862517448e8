pub mod auth;
pub mod health;
pub mod notification;
pub mod swap;
pub mod user;

pub mod error {
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use serde::Serialize;
    use std::fmt;
    use tokio::sync::oneshot;

    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        BadRequest(String),
        // 401
        Unauthorized(String),
        // 403
        Forbidden(String),
        // 404
        DoesNotExist(String),
        // 409
        ConflictWithExisting(String),
        // 500
        InternalError(String),
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                HttpErrorResponse::BadRequest(msg)
                | HttpErrorResponse::Unauthorized(msg)
                | HttpErrorResponse::Forbidden(msg)
                | HttpErrorResponse::DoesNotExist(msg)
                | HttpErrorResponse::ConflictWithExisting(msg)
                | HttpErrorResponse::InternalError(msg) => write!(f, "{}", msg),
            }
        }
    }

    #[derive(Serialize)]
    struct ErrorBody<'a> {
        error: &'a str,
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn status_code(&self) -> StatusCode {
            match self {
                HttpErrorResponse::BadRequest(_) => StatusCode::BAD_REQUEST,
                HttpErrorResponse::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                HttpErrorResponse::Forbidden(_) => StatusCode::FORBIDDEN,
                HttpErrorResponse::DoesNotExist(_) => StatusCode::NOT_FOUND,
                HttpErrorResponse::ConflictWithExisting(_) => StatusCode::CONFLICT,
                HttpErrorResponse::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn error_response(&self) -> HttpResponse {
            let msg = match self {
                HttpErrorResponse::BadRequest(msg)
                | HttpErrorResponse::Unauthorized(msg)
                | HttpErrorResponse::Forbidden(msg)
                | HttpErrorResponse::DoesNotExist(msg)
                | HttpErrorResponse::ConflictWithExisting(msg)
                | HttpErrorResponse::InternalError(msg) => msg,
            };

            HttpResponseBuilder::new(self.status_code()).json(ErrorBody { error: msg })
        }
    }

    impl From<oneshot::error::RecvError> for HttpErrorResponse {
        fn from(_: oneshot::error::RecvError) -> Self {
            HttpErrorResponse::InternalError(String::from("Failed to complete operation"))
        }
    }
}

pub mod password {
    use std::str::FromStr;
    use tokio::sync::oneshot;

    use crate::env;
    use crate::handlers::error::HttpErrorResponse;

    /// Hashes a password with Argon2id on a rayon thread so the hash doesn't
    /// block an Actix worker.
    pub async fn hash_password(password: String) -> Result<String, HttpErrorResponse> {
        let (sender, receiver) = oneshot::channel();

        rayon::spawn(move || {
            let hash_result = argon2_kdf::Hasher::default()
                .algorithm(argon2_kdf::Algorithm::Argon2id)
                .salt_length(env::CONF.hash_salt_length)
                .hash_length(env::CONF.hash_length)
                .iterations(env::CONF.hash_iterations)
                .memory_cost_kib(env::CONF.hash_mem_cost_kib)
                .threads(env::CONF.hash_threads)
                .secret(argon2_kdf::Secret::using(&env::CONF.hashing_key))
                .hash(password.as_bytes());

            let _ = match hash_result {
                Ok(hash) => sender.send(Ok(hash.to_string())),
                Err(_) => sender.send(Err(HttpErrorResponse::InternalError(String::from(
                    "Failed to hash password",
                )))),
            };
        });

        receiver.await?
    }

    pub async fn verify_password(
        password: String,
        hash: String,
    ) -> Result<bool, HttpErrorResponse> {
        let (sender, receiver) = oneshot::channel();

        rayon::spawn(move || {
            let result = match argon2_kdf::Hash::from_str(&hash) {
                Ok(parsed_hash) => Ok(parsed_hash
                    .verify_with_secret(
                        password.as_bytes(),
                        argon2_kdf::Secret::using(&env::CONF.hashing_key),
                    )),
                Err(_) => Err(HttpErrorResponse::InternalError(String::from(
                    "Failed to verify password",
                ))),
            };

            let _ = sender.send(result);
        });

        receiver.await?
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[actix_web::test]
        async fn test_hash_then_verify() {
            let hash = hash_password(String::from("correct horse battery staple"))
                .await
                .unwrap();

            assert!(hash.starts_with("$argon2id$"));

            assert!(
                verify_password(String::from("correct horse battery staple"), hash.clone())
                    .await
                    .unwrap()
            );
            assert!(!verify_password(String::from("incorrect horse"), hash)
                .await
                .unwrap());
        }
    }
}
