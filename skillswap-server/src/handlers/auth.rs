use actix_web::{web, HttpResponse};
use std::time::{SystemTime, UNIX_EPOCH};

use skillswap_common::db::{user, DaoError, DbAsyncPool};
use skillswap_common::models::user::User;
use skillswap_common::request_io::{
    InputUserCredentials, InputUserRegistration, OutputSession, OutputUserBrief,
};
use skillswap_common::token::auth_token::{AuthToken, NewAuthTokenClaims};
use skillswap_common::validators::{self, Validity};

use crate::env;
use crate::handlers::error::HttpErrorResponse;
use crate::handlers::password;

pub async fn register(
    db_async_pool: web::Data<DbAsyncPool>,
    user_data: web::Json<InputUserRegistration>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if let Validity::Invalid(msg) = validators::validate_email_address(&user_data.email) {
        return Err(HttpErrorResponse::BadRequest(msg));
    }

    if user_data.password.is_empty() {
        return Err(HttpErrorResponse::BadRequest(String::from(
            "Password cannot be empty",
        )));
    }

    let password_hash = password::hash_password(user_data.password.clone()).await?;

    let user_dao = user::Dao::new(&db_async_pool);
    let user = match user_dao
        .create_user(
            &user_data.email,
            &password_hash,
            None,
            user_data.date_of_birth,
            user_data.profile_photo.as_deref(),
        )
        .await
    {
        Ok(u) => u,
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(String::from(
                "User already exists with this email",
            )))
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Registration failed",
            )));
        }
    };

    let token = sign_auth_token(&user)?;

    Ok(HttpResponse::Created().json(OutputSession {
        message: String::from("User registered successfully"),
        token,
        user: OutputUserBrief {
            id: user.id,
            email: user.email,
            name: user.name,
            profile_photo: user.profile_photo,
        },
    }))
}

pub async fn login(
    db_async_pool: web::Data<DbAsyncPool>,
    credentials: web::Json<InputUserCredentials>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = user::Dao::new(&db_async_pool);

    let user = match user_dao.get_user_by_email(&credentials.email).await {
        Ok(u) => u,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::Unauthorized(String::from(
                "Invalid credentials",
            )))
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Login failed",
            )));
        }
    };

    let password_matches =
        password::verify_password(credentials.password.clone(), user.password_hash.clone()).await?;

    if !password_matches {
        return Err(HttpErrorResponse::Unauthorized(String::from(
            "Invalid credentials",
        )));
    }

    let token = sign_auth_token(&user)?;

    Ok(HttpResponse::Ok().json(OutputSession {
        message: String::from("Login successful"),
        token,
        user: OutputUserBrief {
            id: user.id,
            email: user.email,
            name: user.name,
            profile_photo: user.profile_photo,
        },
    }))
}

fn sign_auth_token(user: &User) -> Result<String, HttpErrorResponse> {
    let expiration = SystemTime::now() + env::CONF.auth_token_lifetime;
    let expiration = expiration
        .duration_since(UNIX_EPOCH)
        .map_err(|_| HttpErrorResponse::InternalError(String::from("Failed to sign token")))?
        .as_secs();

    let claims = NewAuthTokenClaims {
        user_id: user.id,
        user_email: &user.email,
        expiration,
    };

    Ok(AuthToken::sign_new(claims, &env::CONF.token_signing_key))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::web::Data;
    use actix_web::App;
    use serde_json::Value;

    use skillswap_common::request_io::OutputSession;
    use skillswap_common::token::auth_token::AuthToken;
    use skillswap_common::token::Token;

    use crate::env::{self, testing::DB_ASYNC_POOL};
    use crate::handlers::test_utils;
    use crate::services;

    #[actix_web::test]
    async fn test_register_returns_session_with_valid_token() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(DB_ASYNC_POOL.clone()))
                .configure(services::api::configure),
        )
        .await;

        let email = test_utils::unique_email();
        let (user, token) = test_utils::create_user(&app, &email, "password123").await;

        assert_eq!(user.email, email);

        let claims = AuthToken::decode(&token)
            .unwrap()
            .verify(&env::CONF.token_signing_key)
            .unwrap()
            .clone();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.user_email, email);

        test_utils::delete_user(user.id).await;
    }

    #[actix_web::test]
    async fn test_register_duplicate_email_conflicts() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(DB_ASYNC_POOL.clone()))
                .configure(services::api::configure),
        )
        .await;

        let email = test_utils::unique_email();
        let (user, _) = test_utils::create_user(&app, &email, "password123").await;

        let req = TestRequest::post()
            .uri("/api/auth/register")
            .insert_header(("content-type", "application/json"))
            .set_payload(format!(
                "{{\"email\": \"{email}\", \"password\": \"password123\"}}"
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "User already exists with this email");

        test_utils::delete_user(user.id).await;
    }

    #[actix_web::test]
    async fn test_register_preserves_email_case() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(DB_ASYNC_POOL.clone()))
                .configure(services::api::configure),
        )
        .await;

        let email = format!("Mixed.Case.{}", test_utils::unique_email());
        let (user, _) = test_utils::create_user(&app, &email, "password123").await;

        assert_eq!(user.email, email);

        // Login matches the address exactly as stored
        let req = TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload(format!(
                "{{\"email\": \"{email}\", \"password\": \"password123\"}}"
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let session: OutputSession = test::read_body_json(resp).await;
        assert_eq!(session.user.email, email);

        test_utils::delete_user(user.id).await;
    }

    #[actix_web::test]
    async fn test_register_rejects_invalid_email() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(DB_ASYNC_POOL.clone()))
                .configure(services::api::configure),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/auth/register")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"email": "not-an-email", "password": "password123"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_login_succeeds_with_correct_password() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(DB_ASYNC_POOL.clone()))
                .configure(services::api::configure),
        )
        .await;

        let email = test_utils::unique_email();
        let (user, _) = test_utils::create_user(&app, &email, "password123").await;

        let req = TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload(format!(
                "{{\"email\": \"{email}\", \"password\": \"password123\"}}"
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let session: OutputSession = test::read_body_json(resp).await;
        assert_eq!(session.message, "Login successful");
        assert_eq!(session.user.id, user.id);

        test_utils::delete_user(user.id).await;
    }

    #[actix_web::test]
    async fn test_login_rejects_wrong_password_and_unknown_email() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(DB_ASYNC_POOL.clone()))
                .configure(services::api::configure),
        )
        .await;

        let email = test_utils::unique_email();
        let (user, _) = test_utils::create_user(&app, &email, "password123").await;

        let req = TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload(format!(
                "{{\"email\": \"{email}\", \"password\": \"wrong-password\"}}"
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");

        let req = TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload(
                r#"{"email": "no.such.user@example.com", "password": "password123"}"#,
            )
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        test_utils::delete_user(user.id).await;
    }
}
