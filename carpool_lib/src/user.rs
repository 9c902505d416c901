use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account record. Passwords and api tokens live here as opaque strings,
/// hashing and token issuance are the admin collaborator's job.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub profile_pic: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    #[serde(skip_serializing)]
    pub api_token: String,
}

#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(rename_all = "kebab-case"))]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Female,
    Male,
    #[default]
    WontSay,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::WontSay => "wont-say",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            "wont-say" => Ok(Gender::WontSay),
            other => Err(format!("Unknown gender: {other}")),
        }
    }
}

/// Media path for a user's profile picture: user_<id>/<filename>
pub fn profile_pic_path(user_id: i64, filename: &str) -> String {
    format!("user_{user_id}/{filename}")
}
