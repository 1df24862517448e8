use actix_web::{web, HttpResponse};

use skillswap_common::db::{notification, DaoError, DbAsyncPool};
use skillswap_common::request_io::{InputNotificationQuery, OutputMessage, OutputNotification};

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

const DEFAULT_LIMIT: i64 = 50;

// e.g. "Aug 30, 2026, 05:04 PM"
const TIME_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// Lists the caller's notifications, newest first. A `limit` query parameter
/// must be a positive integer to take effect; anything else falls back to
/// the default of 50.
pub async fn list(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
    query: web::Query<InputNotificationQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let limit = query
        .limit
        .as_deref()
        .and_then(|l| l.parse::<i64>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_LIMIT);

    let notification_dao = notification::Dao::new(&db_async_pool);

    let user_notifications = match notification_dao
        .list_notifications(authenticated_user.user_id, limit)
        .await
    {
        Ok(n) => n,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to fetch notifications",
            )));
        }
    };

    let output = user_notifications
        .into_iter()
        .map(|n| OutputNotification {
            id: n.id,
            notification_type: n.notification_type,
            title: n.title,
            message: n.message,
            time: n.created_at.format(TIME_FORMAT).to_string(),
            related_id: n.related_id,
            read: n.is_read,
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(output))
}

pub async fn mark_read(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
    notification_id: web::Path<i32>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let notification_dao = notification::Dao::new(&db_async_pool);

    match notification_dao
        .mark_notification_read(*notification_id, authenticated_user.user_id)
        .await
    {
        Ok(()) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(String::from(
                "Notification not found",
            )))
        }
        Err(DaoError::NotParticipant) => {
            return Err(HttpErrorResponse::Forbidden(String::from("Not authorized")))
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to mark notification as read",
            )));
        }
    }

    Ok(HttpResponse::Ok().json(OutputMessage::new("Notification marked as read")))
}

pub async fn mark_all_read(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
) -> Result<HttpResponse, HttpErrorResponse> {
    let notification_dao = notification::Dao::new(&db_async_pool);

    if let Err(e) = notification_dao
        .mark_all_notifications_read(authenticated_user.user_id)
        .await
    {
        log::error!("{e}");
        return Err(HttpErrorResponse::InternalError(String::from(
            "Failed to mark notifications as read",
        )));
    }

    Ok(HttpResponse::Ok().json(OutputMessage::new("All notifications marked as read")))
}
