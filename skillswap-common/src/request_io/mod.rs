use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::swap_request::SwapResponse;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputUserRegistration {
    pub email: String,
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InputUserCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProfileUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub profile_photo: Option<String>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSwapRequestCreation {
    pub recipient_id: i32,
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InputSwapResponse {
    pub status: SwapResponse,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InputSwapListQuery {
    #[serde(rename = "type")]
    pub list_type: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InputDirectoryQuery {
    pub search: Option<String>,
    pub availability: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InputNotificationQuery {
    pub limit: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputUserBrief {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub profile_photo: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputSession {
    pub message: String,
    pub token: String,
    pub user: OutputUserBrief,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDirectoryMember {
    pub id: i32,
    pub name: Option<String>,
    pub email: String,
    pub profile_photo: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub rating: f64,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputUserProfile {
    pub id: i32,
    pub name: Option<String>,
    pub email: String,
    pub profile_photo: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub rating: f64,
    pub total_swaps: i32,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSwapRequest {
    pub id: i32,
    pub status: String,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub requester_name: Option<String>,
    pub requester_photo: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_photo: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputNotification {
    pub id: i32,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub time: String,
    pub related_id: Option<i32>,
    pub read: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputMessage {
    pub message: String,
}

impl OutputMessage {
    pub fn new(message: &str) -> Self {
        Self {
            message: String::from(message),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputHealth {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_response_deserialization() {
        let accepted: InputSwapResponse = serde_json::from_str(r#"{"status":"accepted"}"#).unwrap();
        assert_eq!(accepted.status, SwapResponse::Accepted);

        let rejected: InputSwapResponse = serde_json::from_str(r#"{"status":"rejected"}"#).unwrap();
        assert_eq!(rejected.status, SwapResponse::Rejected);

        assert!(serde_json::from_str::<InputSwapResponse>(r#"{"status":"cancelled"}"#).is_err());
        assert!(serde_json::from_str::<InputSwapResponse>(r#"{"status":"pending"}"#).is_err());
    }

    #[test]
    fn test_output_field_names_are_camel_case() {
        let member = OutputDirectoryMember {
            id: 1,
            name: Some(String::from("Priya Sharma")),
            email: String::from("priya.sharma@example.com"),
            profile_photo: None,
            location: Some(String::from("Mumbai, Maharashtra")),
            availability: Some(String::from("weekends")),
            rating: 4.5,
            skills_offered: vec![String::from("Photoshop")],
            skills_wanted: vec![String::from("React")],
        };

        let json = serde_json::to_value(&member).unwrap();
        assert!(json.get("profilePhoto").is_some());
        assert!(json.get("skillsOffered").is_some());
        assert!(json.get("skillsWanted").is_some());
        assert!(json.get("profile_photo").is_none());

        let notification = OutputNotification {
            id: 3,
            notification_type: String::from("swap_request"),
            title: String::from("New Swap Request"),
            message: String::from("Priya Sharma wants to swap skills with you"),
            time: String::from("Aug 30, 2026, 05:04 PM"),
            related_id: Some(9),
            read: false,
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert!(json.get("type").is_some());
        assert!(json.get("relatedId").is_some());
        assert_eq!(json.get("read").unwrap(), &serde_json::Value::Bool(false));
    }
}
