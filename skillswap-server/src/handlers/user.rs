use actix_web::{web, HttpResponse};

use skillswap_common::db::user::{DirectoryEntry, ProfileUpdate};
use skillswap_common::db::{user, DaoError, DbAsyncPool};
use skillswap_common::models::skill::SkillType;
use skillswap_common::models::user_profile::Availability;
use skillswap_common::request_io::{
    InputDirectoryQuery, InputProfileUpdate, OutputDirectoryMember, OutputMessage,
    OutputUserProfile,
};

use crate::handlers::error::HttpErrorResponse;
use crate::middleware::auth::AuthenticatedUser;

/// Public member directory, ordered by rating. Accepts optional `search`
/// and `availability` query parameters.
pub async fn list(
    db_async_pool: web::Data<DbAsyncPool>,
    query: web::Query<InputDirectoryQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = user::Dao::new(&db_async_pool);

    let entries = match user_dao
        .search_users(
            query.search.as_deref().filter(|s| !s.is_empty()),
            query.availability.as_deref().filter(|a| !a.is_empty()),
        )
        .await
    {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to fetch users",
            )));
        }
    };

    let members = entries
        .into_iter()
        .map(
            |DirectoryEntry {
                 user,
                 profile,
                 skills_offered,
                 skills_wanted,
             }| OutputDirectoryMember {
                id: user.id,
                name: user.name,
                email: user.email,
                profile_photo: user.profile_photo,
                location: profile.as_ref().and_then(|p| p.location.clone()),
                availability: profile.as_ref().and_then(|p| p.availability.clone()),
                rating: profile.as_ref().map(|p| p.rating).unwrap_or(0.0),
                skills_offered,
                skills_wanted,
            },
        )
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(members))
}

pub async fn get_current(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
) -> Result<HttpResponse, HttpErrorResponse> {
    get_profile(&db_async_pool, authenticated_user.user_id).await
}

pub async fn get_by_id(
    db_async_pool: web::Data<DbAsyncPool>,
    _authenticated_user: AuthenticatedUser,
    user_id: web::Path<i32>,
) -> Result<HttpResponse, HttpErrorResponse> {
    get_profile(&db_async_pool, *user_id).await
}

async fn get_profile(
    db_async_pool: &DbAsyncPool,
    user_id: i32,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = user::Dao::new(db_async_pool);

    let (user, profile, user_skills) = match user_dao.get_user_with_profile(user_id).await {
        Ok(found) => found,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(String::from(
                "User not found",
            )))
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to fetch user",
            )));
        }
    };

    let (skills_offered, skills_wanted) =
        user_skills
            .into_iter()
            .partition::<Vec<_>, _>(|s| s.skill_type == SkillType::Offered.as_str());

    Ok(HttpResponse::Ok().json(OutputUserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        profile_photo: user.profile_photo,
        date_of_birth: user.date_of_birth,
        location: profile.as_ref().and_then(|p| p.location.clone()),
        availability: profile.as_ref().and_then(|p| p.availability.clone()),
        rating: profile.as_ref().map(|p| p.rating).unwrap_or(0.0),
        total_swaps: profile.as_ref().map(|p| p.total_swaps).unwrap_or(0),
        skills_offered: skills_offered.into_iter().map(|s| s.skill_name).collect(),
        skills_wanted: skills_wanted.into_iter().map(|s| s.skill_name).collect(),
    }))
}

/// Edits a profile. Users may only edit their own.
pub async fn update(
    db_async_pool: web::Data<DbAsyncPool>,
    authenticated_user: AuthenticatedUser,
    user_id: web::Path<i32>,
    update_data: web::Json<InputProfileUpdate>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if *user_id != authenticated_user.user_id {
        return Err(HttpErrorResponse::Forbidden(String::from("Not authorized")));
    }

    if let Some(availability) = update_data.availability.as_deref() {
        if Availability::from_str(availability).is_none() {
            return Err(HttpErrorResponse::BadRequest(String::from(
                "Invalid availability",
            )));
        }
    }

    let user_dao = user::Dao::new(&db_async_pool);

    let update = ProfileUpdate {
        name: update_data.name.as_deref(),
        profile_photo: update_data.profile_photo.as_deref(),
        location: update_data.location.as_deref(),
        availability: update_data.availability.as_deref(),
        skills_offered: update_data.skills_offered.clone(),
        skills_wanted: update_data.skills_wanted.clone(),
    };

    match user_dao.update_user_profile(*user_id, update).await {
        Ok(()) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(String::from(
                "User not found",
            )))
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to update profile",
            )));
        }
    }

    Ok(HttpResponse::Ok().json(OutputMessage::new("Profile updated successfully")))
}
