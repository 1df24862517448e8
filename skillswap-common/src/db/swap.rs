use chrono::Utc;
use diesel::{dsl, BoolExpressionMethods, ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use std::collections::HashMap;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::notification::{NewNotification, NotificationType};
use crate::models::swap_request::{NewSwapRequest, SwapRequest, SwapRequestStatus, SwapResponse};
use crate::models::user::User;

use crate::schema::notifications::dsl::notifications;
use crate::schema::swap_requests as swap_request_fields;
use crate::schema::swap_requests::dsl::swap_requests;
use crate::schema::user_profiles as user_profile_fields;
use crate::schema::user_profiles::dsl::user_profiles;
use crate::schema::users as user_fields;
use crate::schema::users::dsl::users;

/// Which side of a swap request a listing should be restricted to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapListFilter {
    All,
    Sent,
    Received,
}

/// A swap request joined with both participants' display data.
pub struct SwapRequestEntry {
    pub request: SwapRequest,
    pub requester_name: Option<String>,
    pub requester_photo: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_photo: Option<String>,
}

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    /// Creates a pending swap request and the recipient's notification in a
    /// single transaction. A second pending request for the same pair trips
    /// the partial unique index, surfacing as a unique-violation
    /// `QueryFailure`. An unknown recipient surfaces as `NotFound`.
    pub async fn create_swap_request(
        &self,
        requester_id: i32,
        recipient_id: i32,
        message: &str,
    ) -> Result<SwapRequest, DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    users
                        .select(user_fields::id)
                        .find(recipient_id)
                        .first::<i32>(conn)
                        .await?;

                    let requester_name = users
                        .select(user_fields::name)
                        .find(requester_id)
                        .first::<Option<String>>(conn)
                        .await?
                        .unwrap_or_else(|| "Someone".to_string());

                    let new_request = NewSwapRequest {
                        requester_id,
                        recipient_id,
                        status: SwapRequestStatus::Pending.as_str(),
                        message,
                    };

                    let request = dsl::insert_into(swap_requests)
                        .values(&new_request)
                        .get_result::<SwapRequest>(conn)
                        .await?;

                    let notification_message =
                        format!("{requester_name} wants to swap skills with you");
                    let new_notification = NewNotification {
                        user_id: recipient_id,
                        notification_type: NotificationType::SwapRequest.as_str(),
                        title: "New Swap Request",
                        message: &notification_message,
                        related_id: Some(request.id),
                    };

                    dsl::insert_into(notifications)
                        .values(&new_notification)
                        .execute(conn)
                        .await?;

                    Ok(request)
                })
            })
            .await
    }

    /// Lists the user's swap requests, newest first, with both participants'
    /// names and photos resolved.
    pub async fn list_swap_requests(
        &self,
        user_id: i32,
        filter: SwapListFilter,
    ) -> Result<Vec<SwapRequestEntry>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let mut query = swap_requests
            .filter(
                swap_request_fields::requester_id
                    .eq(user_id)
                    .or(swap_request_fields::recipient_id.eq(user_id)),
            )
            .into_boxed();

        match filter {
            SwapListFilter::All => (),
            SwapListFilter::Sent => {
                query = query.filter(swap_request_fields::requester_id.eq(user_id));
            }
            SwapListFilter::Received => {
                query = query.filter(swap_request_fields::recipient_id.eq(user_id));
            }
        }

        let requests = query
            .order(swap_request_fields::created_at.desc())
            .load::<SwapRequest>(&mut conn)
            .await?;

        let mut participant_ids = requests
            .iter()
            .flat_map(|r| [r.requester_id, r.recipient_id])
            .collect::<Vec<_>>();
        participant_ids.sort_unstable();
        participant_ids.dedup();

        let participants = users
            .filter(user_fields::id.eq_any(&participant_ids))
            .load::<User>(&mut conn)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect::<HashMap<i32, User>>();

        Ok(requests
            .into_iter()
            .map(|request| {
                let requester = participants.get(&request.requester_id);
                let recipient = participants.get(&request.recipient_id);

                SwapRequestEntry {
                    requester_name: requester.and_then(|u| u.name.clone()),
                    requester_photo: requester.and_then(|u| u.profile_photo.clone()),
                    recipient_name: recipient.and_then(|u| u.name.clone()),
                    recipient_photo: recipient.and_then(|u| u.profile_photo.clone()),
                    request,
                }
            })
            .collect())
    }

    /// Moves a pending request into a terminal state on the recipient's
    /// behalf, notifying the requester. Acceptance also bumps both
    /// participants' swap counters. The row is locked for the duration of
    /// the transaction so concurrent responses cannot both succeed.
    pub async fn respond_to_swap_request(
        &self,
        swap_request_id: i32,
        recipient_id: i32,
        response: SwapResponse,
    ) -> Result<SwapRequest, DaoError> {
        let current_time = Utc::now().naive_utc();

        let mut db_connection = self.db_async_pool.get().await?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    let request = swap_requests
                        .find(swap_request_id)
                        .for_update()
                        .first::<SwapRequest>(conn)
                        .await?;

                    if request.recipient_id != recipient_id {
                        return Err(DaoError::NotParticipant);
                    }

                    if request.status != SwapRequestStatus::Pending.as_str() {
                        return Err(DaoError::AlreadyResolved);
                    }

                    let new_status = response.status();

                    let updated = dsl::update(swap_requests.find(swap_request_id))
                        .set((
                            swap_request_fields::status.eq(new_status.as_str()),
                            swap_request_fields::updated_at.eq(current_time),
                        ))
                        .get_result::<SwapRequest>(conn)
                        .await?;

                    let (notification_type, title, message) = match response {
                        SwapResponse::Accepted => (
                            NotificationType::SwapAccepted,
                            "Swap Request Accepted",
                            "Your swap request has been accepted!",
                        ),
                        SwapResponse::Rejected => (
                            NotificationType::SwapRejected,
                            "Swap Request Rejected",
                            "Your swap request has been rejected.",
                        ),
                    };

                    let new_notification = NewNotification {
                        user_id: request.requester_id,
                        notification_type: notification_type.as_str(),
                        title,
                        message,
                        related_id: Some(swap_request_id),
                    };

                    dsl::insert_into(notifications)
                        .values(&new_notification)
                        .execute(conn)
                        .await?;

                    if response == SwapResponse::Accepted {
                        dsl::update(
                            user_profiles.filter(
                                user_profile_fields::user_id
                                    .eq_any(vec![request.requester_id, request.recipient_id]),
                            ),
                        )
                        .set((
                            user_profile_fields::total_swaps
                                .eq(user_profile_fields::total_swaps + 1),
                            user_profile_fields::updated_at.eq(current_time),
                        ))
                        .execute(conn)
                        .await?;
                    }

                    Ok(updated)
                })
            })
            .await
    }

    /// Withdraws a pending request on the requester's behalf. No
    /// notification is produced; the recipient sees the status change.
    pub async fn cancel_swap_request(
        &self,
        swap_request_id: i32,
        requester_id: i32,
    ) -> Result<SwapRequest, DaoError> {
        let current_time = Utc::now().naive_utc();

        let mut db_connection = self.db_async_pool.get().await?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    let request = swap_requests
                        .find(swap_request_id)
                        .for_update()
                        .first::<SwapRequest>(conn)
                        .await?;

                    if request.requester_id != requester_id {
                        return Err(DaoError::NotParticipant);
                    }

                    if request.status != SwapRequestStatus::Pending.as_str() {
                        return Err(DaoError::AlreadyResolved);
                    }

                    let updated = dsl::update(swap_requests.find(swap_request_id))
                        .set((
                            swap_request_fields::status
                                .eq(SwapRequestStatus::Cancelled.as_str()),
                            swap_request_fields::updated_at.eq(current_time),
                        ))
                        .get_result::<SwapRequest>(conn)
                        .await?;

                    Ok(updated)
                })
            })
            .await
    }
}
