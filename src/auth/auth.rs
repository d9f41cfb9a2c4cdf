use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;

/// Identity of the caller, decoded from the bearer token on every request.
pub struct AuthUser {
    pub user_id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Missing or malformed header is 401; a token that fails the
        // signature or expiry check is 403.
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => {
                return ready(Err(ApiError::Unauthorized(
                    "Authentication token required".to_string(),
                )
                .into()));
            }
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => return ready(Err(ApiError::Internal.into())),
        };

        let claims = match verify_token(token, &config.jwt_secret) {
            Ok(c) => c,
            Err(_) => {
                return ready(Err(ApiError::Forbidden(
                    "Invalid or expired token".to_string(),
                )
                .into()));
            }
        };

        ready(Ok(AuthUser {
            user_id: claims.user_id,
            name: claims.name,
            email: claims.sub,
            role: claims.role,
        }))
    }
}

impl AuthUser {
    pub fn require_approver(&self) -> Result<(), ApiError> {
        if self.role.is_approver() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You do not have the required role".to_string(),
            ))
        }
    }
}
