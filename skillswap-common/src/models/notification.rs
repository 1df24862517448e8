use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::schema::notifications;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    SwapRequest,
    SwapAccepted,
    SwapRejected,
    NewMessage,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::SwapRequest => "swap_request",
            NotificationType::SwapAccepted => "swap_accepted",
            NotificationType::SwapRejected => "swap_rejected",
            NotificationType::NewMessage => "new_message",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Associations, Queryable)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub related_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewNotification<'a> {
    pub user_id: i32,
    pub notification_type: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub related_id: Option<i32>,
}
