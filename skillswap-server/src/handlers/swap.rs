use actix_web::{web, HttpResponse};

use skillswap_common::db::swap::{SwapListFilter, SwapRequestEntry};
use skillswap_common::db::{swap, DaoError, DbAsyncPool};
use skillswap_common::request_io::{
    InputSwapListQuery, InputSwapRequestCreation, InputSwapResponse, OutputMessage,
    OutputSwapRequest,
};

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

pub async fn create(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
    request_data: web::Json<InputSwapRequestCreation>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if request_data.recipient_id == authenticated_user.user_id {
        return Err(HttpErrorResponse::BadRequest(String::from(
            "Cannot send a swap request to yourself",
        )));
    }

    let swap_dao = swap::Dao::new(&db_async_pool);

    match swap_dao
        .create_swap_request(
            authenticated_user.user_id,
            request_data.recipient_id,
            request_data.message.as_deref().unwrap_or(""),
        )
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(String::from(
                "Recipient not found",
            )))
        }
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(String::from(
                "Swap request already sent",
            )))
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to send swap request",
            )));
        }
    }

    Ok(HttpResponse::Created().json(OutputMessage::new("Swap request sent successfully")))
}

/// Lists the caller's swap requests. The optional `type` query parameter
/// narrows the listing to `sent` or `received`; anything else means both.
pub async fn list(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
    query: web::Query<InputSwapListQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let filter = match query.list_type.as_deref() {
        Some("sent") => SwapListFilter::Sent,
        Some("received") => SwapListFilter::Received,
        _ => SwapListFilter::All,
    };

    let swap_dao = swap::Dao::new(&db_async_pool);

    let entries = match swap_dao
        .list_swap_requests(authenticated_user.user_id, filter)
        .await
    {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to fetch swap requests",
            )));
        }
    };

    let requests = entries
        .into_iter()
        .map(
            |SwapRequestEntry {
                 request,
                 requester_name,
                 requester_photo,
                 recipient_name,
                 recipient_photo,
             }| OutputSwapRequest {
                id: request.id,
                status: request.status,
                message: request.message,
                created_at: request.created_at,
                requester_name,
                requester_photo,
                recipient_name,
                recipient_photo,
            },
        )
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(requests))
}

/// Accepts or rejects a pending request. Only the recipient may respond,
/// and only while the request is still pending.
pub async fn respond(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
    swap_request_id: web::Path<i32>,
    response_data: web::Json<InputSwapResponse>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let swap_dao = swap::Dao::new(&db_async_pool);

    match swap_dao
        .respond_to_swap_request(
            *swap_request_id,
            authenticated_user.user_id,
            response_data.status,
        )
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(String::from(
                "Swap request not found",
            )))
        }
        Err(DaoError::NotParticipant) => {
            return Err(HttpErrorResponse::Forbidden(String::from("Not authorized")))
        }
        Err(DaoError::AlreadyResolved) => {
            return Err(HttpErrorResponse::ConflictWithExisting(String::from(
                "Swap request has already been resolved",
            )))
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to update swap request",
            )));
        }
    }

    Ok(HttpResponse::Ok().json(OutputMessage::new("Swap request updated successfully")))
}

/// Withdraws a pending request. Only the requester may cancel.
pub async fn cancel(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
    swap_request_id: web::Path<i32>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let swap_dao = swap::Dao::new(&db_async_pool);

    match swap_dao
        .cancel_swap_request(*swap_request_id, authenticated_user.user_id)
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(String::from(
                "Swap request not found",
            )))
        }
        Err(DaoError::NotParticipant) => {
            return Err(HttpErrorResponse::Forbidden(String::from("Not authorized")))
        }
        Err(DaoError::AlreadyResolved) => {
            return Err(HttpErrorResponse::ConflictWithExisting(String::from(
                "Swap request has already been resolved",
            )))
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to cancel swap request",
            )));
        }
    }

    Ok(HttpResponse::Ok().json(OutputMessage::new("Swap request cancelled successfully")))
}
