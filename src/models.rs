use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = "asha@example.com", format = "email")]
    pub email: String,
    pub password: String,
    /// One of: student, teacher, admin
    #[schema(example = "student")]
    pub role: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "asha@example.com", format = "email")]
    pub email: String,
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64, // matches BIGINT UNSIGNED
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// The user shape returned to clients. Never carries the password hash.
#[derive(Serialize, ToSchema)]
pub struct UserPublic {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Email address of the token holder.
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
}
