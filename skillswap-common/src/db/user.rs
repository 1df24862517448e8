use chrono::{NaiveDate, Utc};
use diesel::{dsl, BoolExpressionMethods, ExpressionMethods, PgTextExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use std::collections::HashMap;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::skill::{NewSkill, Skill, SkillType};
use crate::models::user::{NewUser, User};
use crate::models::user_profile::{NewUserProfile, UserProfile};

use crate::schema::skills as skill_fields;
use crate::schema::skills::dsl::skills;
use crate::schema::user_profiles as user_profile_fields;
use crate::schema::user_profiles::dsl::user_profiles;
use crate::schema::users as user_fields;
use crate::schema::users::dsl::users;

/// One row of the member directory, with the skill lists already grouped
/// onto their owner.
pub struct DirectoryEntry {
    pub user: User,
    pub profile: Option<UserProfile>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
}

pub struct ProfileUpdate<'a> {
    pub name: Option<&'a str>,
    pub profile_photo: Option<&'a str>,
    pub location: Option<&'a str>,
    pub availability: Option<&'a str>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
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

    /// Inserts the user row together with its empty profile row. A duplicate
    /// email surfaces as a unique-violation `QueryFailure`.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
        date_of_birth: Option<NaiveDate>,
        profile_photo: Option<&str>,
    ) -> Result<User, DaoError> {
        let new_user = NewUser {
            email,
            password_hash,
            name,
            date_of_birth,
            profile_photo,
        };

        let mut db_connection = self.db_async_pool.get().await?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    let user = dsl::insert_into(users)
                        .values(&new_user)
                        .get_result::<User>(conn)
                        .await?;

                    let new_profile = NewUserProfile {
                        user_id: user.id,
                        location: None,
                        availability: None,
                    };

                    dsl::insert_into(user_profiles)
                        .values(&new_profile)
                        .execute(conn)
                        .await?;

                    Ok(user)
                })
            })
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let user = users
            .filter(user_fields::email.eq(email))
            .first::<User>(&mut conn)
            .await?;

        Ok(user)
    }

    pub async fn get_user_with_profile(
        &self,
        user_id: i32,
    ) -> Result<(User, Option<UserProfile>, Vec<Skill>), DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let (user, profile) = users
            .left_join(user_profiles)
            .filter(user_fields::id.eq(user_id))
            .first::<(User, Option<UserProfile>)>(&mut conn)
            .await?;

        let user_skills = skills
            .filter(skill_fields::user_id.eq(user_id))
            .order(skill_fields::id.asc())
            .load::<Skill>(&mut conn)
            .await?;

        Ok((user, profile, user_skills))
    }

    /// Lists directory members ordered by rating. A search term matches a
    /// user's name or any of their skill names (case-insensitively); an
    /// availability filter keeps only profiles with that exact value.
    pub async fn search_users(
        &self,
        search: Option<&str>,
        availability: Option<&str>,
    ) -> Result<Vec<DirectoryEntry>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let mut query = users.left_join(user_profiles).into_boxed();

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            let skill_owner_ids = skills
                .filter(skill_fields::skill_name.ilike(pattern.clone()))
                .select(skill_fields::user_id);

            query = query.filter(
                user_fields::name
                    .ilike(pattern)
                    .or(user_fields::id.eq_any(skill_owner_ids)),
            );
        }

        if let Some(avail) = availability {
            query = query.filter(user_profile_fields::availability.eq(avail.to_string()));
        }

        let members = query
            .order(user_profile_fields::rating.desc())
            .load::<(User, Option<UserProfile>)>(&mut conn)
            .await?;

        let member_ids = members.iter().map(|(user, _)| user.id).collect::<Vec<_>>();

        let member_skills = skills
            .filter(skill_fields::user_id.eq_any(&member_ids))
            .order(skill_fields::id.asc())
            .load::<Skill>(&mut conn)
            .await?;

        let mut skills_by_user: HashMap<i32, (Vec<String>, Vec<String>)> = HashMap::new();
        for skill in member_skills {
            let entry = skills_by_user.entry(skill.user_id).or_default();
            if skill.skill_type == SkillType::Offered.as_str() {
                entry.0.push(skill.skill_name);
            } else {
                entry.1.push(skill.skill_name);
            }
        }

        Ok(members
            .into_iter()
            .map(|(user, profile)| {
                let (skills_offered, skills_wanted) =
                    skills_by_user.remove(&user.id).unwrap_or_default();
                DirectoryEntry {
                    user,
                    profile,
                    skills_offered,
                    skills_wanted,
                }
            })
            .collect())
    }

    /// Applies a profile edit atomically. Skill lists, when present, replace
    /// the user's existing skills of that type wholesale.
    pub async fn update_user_profile(
        &self,
        user_id: i32,
        update: ProfileUpdate<'_>,
    ) -> Result<(), DaoError> {
        let current_time = Utc::now().naive_utc();

        let mut db_connection = self.db_async_pool.get().await?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    // Ensures absent rows produce a NotFound instead of a no-op
                    users
                        .select(user_fields::id)
                        .find(user_id)
                        .first::<i32>(conn)
                        .await?;

                    if let Some(name) = update.name {
                        dsl::update(users.find(user_id))
                            .set((
                                user_fields::name.eq(name),
                                user_fields::updated_at.eq(current_time),
                            ))
                            .execute(conn)
                            .await?;
                    }

                    if let Some(photo) = update.profile_photo {
                        dsl::update(users.find(user_id))
                            .set((
                                user_fields::profile_photo.eq(photo),
                                user_fields::updated_at.eq(current_time),
                            ))
                            .execute(conn)
                            .await?;
                    }

                    dsl::update(user_profiles.find(user_id))
                        .set((
                            user_profile_fields::location.eq(update.location),
                            user_profile_fields::availability.eq(update.availability),
                            user_profile_fields::updated_at.eq(current_time),
                        ))
                        .execute(conn)
                        .await?;

                    if let Some(offered) = &update.skills_offered {
                        Self::replace_skills(conn, user_id, SkillType::Offered, offered).await?;
                    }

                    if let Some(wanted) = &update.skills_wanted {
                        Self::replace_skills(conn, user_id, SkillType::Wanted, wanted).await?;
                    }

                    Ok(())
                })
            })
            .await
    }

    async fn replace_skills(
        conn: &mut diesel_async::AsyncPgConnection,
        user_id: i32,
        skill_type: SkillType,
        skill_names: &[String],
    ) -> Result<(), DaoError> {
        diesel::delete(
            skills
                .filter(skill_fields::user_id.eq(user_id))
                .filter(skill_fields::skill_type.eq(skill_type.as_str())),
        )
        .execute(conn)
        .await?;

        let new_skills = skill_names
            .iter()
            .map(|skill_name| NewSkill {
                user_id,
                skill_name,
                skill_type: skill_type.as_str(),
            })
            .collect::<Vec<_>>();

        dsl::insert_into(skills)
            .values(&new_skills)
            .execute(conn)
            .await?;

        Ok(())
    }

    pub async fn any_users_exist(&self) -> Result<bool, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let count = users
            .count()
            .get_result::<i64>(&mut conn)
            .await?;

        Ok(count > 0)
    }
}
