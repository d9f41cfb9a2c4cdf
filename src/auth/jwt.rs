use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::model::role::Role;
use crate::models::Claims;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs() as usize
}

/// Issue a signed bearer token. The claims are the sole identity carrier;
/// the server keeps no session state.
pub fn generate_token(
    user_id: u64,
    name: String,
    email: String,
    role: Role,
    secret: &str,
    ttl: usize,
) -> String {
    let claims = Claims {
        user_id,
        sub: email,
        name,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("jwt encoding failed")
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_identity_and_role() {
        let token = generate_token(
            7,
            "Asha Verma".to_string(),
            "asha@example.com".to_string(),
            Role::Student,
            SECRET,
            3600,
        );

        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "asha@example.com");
        assert_eq!(claims.name, "Asha Verma");
        assert_eq!(claims.role, Role::Student);
        assert!(claims.exp > now());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token(
            7,
            "Asha Verma".to_string(),
            "asha@example.com".to_string(),
            Role::Student,
            SECRET,
            3600,
        );

        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Built by hand so exp can sit past the default decode leeway.
        let claims = Claims {
            user_id: 7,
            sub: "asha@example.com".to_string(),
            name: "Asha Verma".to_string(),
            role: Role::Student,
            exp: now() - 7200,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("not.a.jwt", SECRET).is_err());
    }
}
