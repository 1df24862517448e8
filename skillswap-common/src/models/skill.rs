use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::schema::skills;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Offered,
    Wanted,
}

impl SkillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillType::Offered => "offered",
            SkillType::Wanted => "wanted",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Associations, Queryable)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = skills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Skill {
    pub id: i32,
    pub user_id: i32,
    pub skill_name: String,
    pub skill_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = skills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSkill<'a> {
    pub user_id: i32,
    pub skill_name: &'a str,
    pub skill_type: &'a str,
}
