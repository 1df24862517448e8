use chrono::NaiveDate;
use diesel::dsl;
use diesel_async::RunQueryDsl;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::skill::{NewSkill, SkillType};
use crate::models::user::{NewUser, User};
use crate::models::user_profile::NewUserProfile;

use crate::schema::skills::dsl::skills;
use crate::schema::user_profiles::dsl::user_profiles;
use crate::schema::users::dsl::users;

struct SampleUser {
    email: &'static str,
    name: &'static str,
    date_of_birth: (i32, u32, u32),
    profile_photo: &'static str,
    location: &'static str,
    availability: &'static str,
    skills_offered: &'static [&'static str],
    skills_wanted: &'static [&'static str],
}

const SAMPLE_USERS: &[SampleUser] = &[
    SampleUser {
        email: "priya.sharma@example.com",
        name: "Priya Sharma",
        date_of_birth: (1995, 3, 15),
        profile_photo:
            "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=150&h=150&fit=crop&crop=face",
        location: "Mumbai, Maharashtra",
        availability: "weekends",
        skills_offered: &["Photoshop", "Illustrator", "UI/UX Design"],
        skills_wanted: &["JavaScript", "React", "Node.js"],
    },
    SampleUser {
        email: "arjun.patel@example.com",
        name: "Arjun Patel",
        date_of_birth: (1992, 7, 22),
        profile_photo:
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
        location: "Bangalore, Karnataka",
        availability: "evenings",
        skills_offered: &["JavaScript", "React", "Node.js"],
        skills_wanted: &["Python", "Data Analysis", "Machine Learning"],
    },
    SampleUser {
        email: "anjali.reddy@example.com",
        name: "Anjali Reddy",
        date_of_birth: (1990, 11, 8),
        profile_photo:
            "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop&crop=face",
        location: "Hyderabad, Telangana",
        availability: "weekdays",
        skills_offered: &["Excel", "PowerPoint", "Project Management"],
        skills_wanted: &["Graphic Design", "Canva", "Social Media Marketing"],
    },
    SampleUser {
        email: "rahul.singh@example.com",
        name: "Rahul Singh",
        date_of_birth: (1988, 5, 12),
        profile_photo:
            "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
        location: "Delhi, NCR",
        availability: "flexible",
        skills_offered: &["Python", "Data Analysis", "Machine Learning"],
        skills_wanted: &["Web Development", "HTML/CSS", "JavaScript"],
    },
    SampleUser {
        email: "kavya.iyer@example.com",
        name: "Kavya Iyer",
        date_of_birth: (1993, 9, 30),
        profile_photo:
            "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150&h=150&fit=crop&crop=face",
        location: "Chennai, Tamil Nadu",
        availability: "weekends",
        skills_offered: &["Graphic Design", "Canva", "Social Media Marketing"],
        skills_wanted: &["Excel", "Data Visualization", "Business Analytics"],
    },
    SampleUser {
        email: "vikram.malhotra@example.com",
        name: "Vikram Malhotra",
        date_of_birth: (1991, 12, 3),
        profile_photo:
            "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=150&h=150&fit=crop&crop=face",
        location: "Pune, Maharashtra",
        availability: "evenings",
        skills_offered: &["Web Development", "HTML/CSS", "JavaScript"],
        skills_wanted: &["Mobile App Development", "React Native", "Flutter"],
    },
];

/// Inserts the sample directory members. All sample accounts share the same
/// (pre-hashed) password. Intended to run only against an empty users table.
pub async fn insert_sample_users(
    db_async_pool: &DbAsyncPool,
    password_hash: &str,
) -> Result<(), DaoError> {
    log::info!("Inserting {} sample users", SAMPLE_USERS.len());

    let mut db_connection = db_async_pool.get().await?;

    db_connection
        .build_transaction()
        .run::<_, DaoError, _>(|conn| {
            Box::pin(async move {
                for sample in SAMPLE_USERS {
                    let (year, month, day) = sample.date_of_birth;
                    let new_user = NewUser {
                        email: sample.email,
                        password_hash,
                        name: Some(sample.name),
                        date_of_birth: NaiveDate::from_ymd_opt(year, month, day),
                        profile_photo: Some(sample.profile_photo),
                    };

                    let user = dsl::insert_into(users)
                        .values(&new_user)
                        .get_result::<User>(conn)
                        .await?;

                    let new_profile = NewUserProfile {
                        user_id: user.id,
                        location: Some(sample.location),
                        availability: Some(sample.availability),
                    };

                    dsl::insert_into(user_profiles)
                        .values(&new_profile)
                        .execute(conn)
                        .await?;

                    let new_skills = sample
                        .skills_offered
                        .iter()
                        .map(|skill_name| NewSkill {
                            user_id: user.id,
                            skill_name,
                            skill_type: SkillType::Offered.as_str(),
                        })
                        .chain(sample.skills_wanted.iter().map(|skill_name| NewSkill {
                            user_id: user.id,
                            skill_name,
                            skill_type: SkillType::Wanted.as_str(),
                        }))
                        .collect::<Vec<_>>();

                    dsl::insert_into(skills)
                        .values(&new_skills)
                        .execute(conn)
                        .await?;
                }

                Ok(())
            })
        })
        .await
}
