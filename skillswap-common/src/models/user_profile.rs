use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::schema::user_profiles;

/// Scheduling-preference facet attached to every profile, used as a
/// directory filter.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Weekends,
    Evenings,
    Weekdays,
    Flexible,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Weekends => "weekends",
            Availability::Evenings => "evenings",
            Availability::Weekdays => "weekdays",
            Availability::Flexible => "flexible",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "weekends" => Some(Availability::Weekends),
            "evenings" => Some(Availability::Evenings),
            "weekdays" => Some(Availability::Weekdays),
            "flexible" => Some(Availability::Flexible),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Associations, Queryable)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = user_profiles, primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserProfile {
    pub user_id: i32,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub rating: f64,
    pub total_swaps: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_profiles, primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUserProfile<'a> {
    pub user_id: i32,
    pub location: Option<&'a str>,
    pub availability: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_round_trip() {
        for availability in [
            Availability::Weekends,
            Availability::Evenings,
            Availability::Weekdays,
            Availability::Flexible,
        ] {
            assert_eq!(
                Availability::from_str(availability.as_str()),
                Some(availability)
            );
        }

        assert_eq!(Availability::from_str("sometimes"), None);
        assert_eq!(Availability::from_str(""), None);
    }
}
