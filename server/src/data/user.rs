use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use carpool_lib::user::{Gender, User};

pub fn user_url(user_id: i64) -> String {
    format!("/api/v1/users/{user_id}/")
}

/// Password, token and account flags never leave the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserRead {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub url: String,
    pub profile_pic: Option<String>,
}

impl From<User> for UserRead {
    fn from(user: User) -> Self {
        Self {
            url: user_url(user.user_id),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            gender: user.gender,
            birth_date: user.birth_date,
            profile_pic: user.profile_pic,
        }
    }
}

/// Absent optional fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UserWrite {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub profile_pic: Option<String>,
}
