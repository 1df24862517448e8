use diesel::{dsl, ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::notification::Notification;

use crate::schema::notifications as notification_fields;
use crate::schema::notifications::dsl::notifications;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn list_notifications(
        &self,
        user_id: i32,
        limit: i64,
    ) -> Result<Vec<Notification>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let user_notifications = notifications
            .filter(notification_fields::user_id.eq(user_id))
            .order(notification_fields::created_at.desc())
            .limit(limit)
            .load::<Notification>(&mut conn)
            .await?;

        Ok(user_notifications)
    }

    /// Marks a single notification read. `NotFound` if the id does not
    /// exist, `NotParticipant` if it belongs to someone else. Re-marking an
    /// already-read notification succeeds.
    pub async fn mark_notification_read(
        &self,
        notification_id: i32,
        user_id: i32,
    ) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let owner_id = notifications
            .select(notification_fields::user_id)
            .find(notification_id)
            .first::<i32>(&mut conn)
            .await?;

        if owner_id != user_id {
            return Err(DaoError::NotParticipant);
        }

        dsl::update(notifications.find(notification_id))
            .set(notification_fields::is_read.eq(true))
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn mark_all_notifications_read(&self, user_id: i32) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        dsl::update(notifications.filter(notification_fields::user_id.eq(user_id)))
            .set(notification_fields::is_read.eq(true))
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::db::{swap, test_utils, user};
    use crate::models::swap_request::SwapResponse;

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let dao = Dao::new(test_utils::db_async_pool());
        let swap_dao = swap::Dao::new(test_utils::db_async_pool());
        let user_dao = user::Dao::new(test_utils::db_async_pool());

        let requester = test_utils::create_user_with_dao(&user_dao, "Requester").await;
        let recipient = test_utils::create_user_with_dao(&user_dao, "Recipient").await;

        let request = swap_dao
            .create_swap_request(requester.id, recipient.id, "")
            .await
            .expect("Failed to create swap request");
        swap_dao
            .respond_to_swap_request(request.id, recipient.id, SwapResponse::Accepted)
            .await
            .expect("Failed to accept swap request");
        swap_dao
            .create_swap_request(recipient.id, requester.id, "return swap")
            .await
            .expect("Failed to create second swap request");

        let requester_notifications = dao
            .list_notifications(requester.id, 50)
            .await
            .expect("Failed to list notifications");

        assert_eq!(requester_notifications.len(), 2);
        assert!(
            requester_notifications[0].created_at >= requester_notifications[1].created_at,
            "Notifications are not newest-first"
        );

        test_utils::delete_user(requester.id).await;
        test_utils::delete_user(recipient.id).await;
    }

    #[tokio::test]
    async fn test_mark_read_enforces_ownership() {
        let dao = Dao::new(test_utils::db_async_pool());
        let swap_dao = swap::Dao::new(test_utils::db_async_pool());
        let user_dao = user::Dao::new(test_utils::db_async_pool());

        let requester = test_utils::create_user_with_dao(&user_dao, "Requester").await;
        let recipient = test_utils::create_user_with_dao(&user_dao, "Recipient").await;

        swap_dao
            .create_swap_request(requester.id, recipient.id, "")
            .await
            .expect("Failed to create swap request");

        let recipient_notifications = dao
            .list_notifications(recipient.id, 50)
            .await
            .expect("Failed to list notifications");
        let notification_id = recipient_notifications[0].id;

        let by_stranger = dao.mark_notification_read(notification_id, requester.id).await;
        assert!(matches!(by_stranger, Err(DaoError::NotParticipant)));

        dao.mark_notification_read(notification_id, recipient.id)
            .await
            .expect("Failed to mark notification read");

        // Idempotent
        dao.mark_notification_read(notification_id, recipient.id)
            .await
            .expect("Second mark-read failed");

        let missing = dao.mark_notification_read(-1, recipient.id).await;
        assert!(matches!(
            missing,
            Err(DaoError::QueryFailure(diesel::result::Error::NotFound))
        ));

        let recipient_notifications = dao
            .list_notifications(recipient.id, 50)
            .await
            .expect("Failed to list notifications");
        assert!(recipient_notifications[0].is_read);

        test_utils::delete_user(requester.id).await;
        test_utils::delete_user(recipient.id).await;
    }

    #[tokio::test]
    async fn test_mark_all_read_only_touches_own_rows() {
        let dao = Dao::new(test_utils::db_async_pool());
        let swap_dao = swap::Dao::new(test_utils::db_async_pool());
        let user_dao = user::Dao::new(test_utils::db_async_pool());

        let requester = test_utils::create_user_with_dao(&user_dao, "Requester").await;
        let recipient = test_utils::create_user_with_dao(&user_dao, "Recipient").await;

        let request = swap_dao
            .create_swap_request(requester.id, recipient.id, "")
            .await
            .expect("Failed to create swap request");
        swap_dao
            .respond_to_swap_request(request.id, recipient.id, SwapResponse::Rejected)
            .await
            .expect("Failed to reject swap request");

        dao.mark_all_notifications_read(recipient.id)
            .await
            .expect("Failed to mark all read");

        let recipient_notifications = dao
            .list_notifications(recipient.id, 50)
            .await
            .expect("Failed to list notifications");
        assert!(recipient_notifications.iter().all(|n| n.is_read));

        let requester_notifications = dao
            .list_notifications(requester.id, 50)
            .await
            .expect("Failed to list notifications");
        assert!(requester_notifications.iter().all(|n| !n.is_read));

        test_utils::delete_user(requester.id).await;
        test_utils::delete_user(recipient.id).await;
    }
}
