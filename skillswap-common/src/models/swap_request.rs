use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::schema::swap_requests;

/// Lifecycle states of a swap request. `Pending` is the only non-terminal
/// state; every transition out of it is final.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapRequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapRequestStatus::Pending => "pending",
            SwapRequestStatus::Accepted => "accepted",
            SwapRequestStatus::Rejected => "rejected",
            SwapRequestStatus::Cancelled => "cancelled",
        }
    }
}

/// The two terminal states a recipient may move a pending request into.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapResponse {
    Accepted,
    Rejected,
}

impl SwapResponse {
    pub fn status(&self) -> SwapRequestStatus {
        match self {
            SwapResponse::Accepted => SwapRequestStatus::Accepted,
            SwapResponse::Rejected => SwapRequestStatus::Rejected,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = swap_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SwapRequest {
    pub id: i32,
    pub requester_id: i32,
    pub recipient_id: i32,
    pub status: String,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swap_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSwapRequest<'a> {
    pub requester_id: i32,
    pub recipient_id: i32,
    pub status: &'a str,
    pub message: &'a str,
}
