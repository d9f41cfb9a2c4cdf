use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

use crate::{
    auth::{
        jwt::generate_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    model::role::Role,
    models::{LoginReqDto, RegisterReq, UserPublic, UserSql},
    utils::{email_cache, email_filter},
};

/// Inserts a new user and keeps the availability filter/cache populated.
/// The UNIQUE constraint on email stays authoritative; a duplicate-key
/// error surfaces as `Conflict` no matter what the fast path said.
async fn insert_user(
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    pool: &MySqlPool,
) -> Result<u64, ApiError> {
    let result =
        sqlx::query(r#"INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)"#)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(role.to_string())
            .execute(pool)
            .await;

    match result {
        Ok(done) => {
            email_filter::insert(email);
            email_cache::mark_taken(email).await;
            Ok(done.last_insert_id())
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Err(ApiError::Conflict(
                        "This email is already registered".to_string(),
                    ));
                }
            }

            error!(error = %e, "Failed to register user");
            Err(ApiError::Internal)
        }
    }
}

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(email: &str, pool: &MySqlPool) -> bool {
    let email = email.to_lowercase();

    // 1. Cuckoo filter: fast negative
    if !email_filter::might_exist(&email) {
        return true;
    }

    // 2. Moka cache: fast positive
    if email_cache::is_taken(&email).await {
        return false;
    }

    // 3. Database fallback
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)",
    )
    .bind(&email)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

/// User registration handler
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered", body = Object, example = json!({
            "message": "User registered successfully",
            "userId": 1
        })),
        (status = 400, description = "Missing field or invalid role"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    payload: web::Json<RegisterReq>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let name = payload.name.trim();
    let email = payload.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::InvalidInput("All fields are required".to_string()));
    }

    let role: Role = payload
        .role
        .parse()
        .map_err(|_| ApiError::InvalidInput("Invalid role specified".to_string()))?;

    if !is_email_available(&email, pool.get_ref()).await {
        return Err(ApiError::Conflict(
            "This email is already registered".to_string(),
        ));
    }

    let hashed = hash_password(&payload.password);
    let user_id = insert_user(name, &email, &hashed, role, pool.get_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "userId": user_id
    })))
}

/// User login handler
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = Object, example = json!({
            "message": "Login successful",
            "token": "<jwt>",
            "user": { "id": 1, "name": "Asha Verma", "email": "asha@example.com", "role": "student" }
        })),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, payload),
    fields(email = %payload.email)
)]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let email = payload.email.trim().to_lowercase();

    if email.is_empty() || payload.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(ApiError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    debug!("Fetching user from database");

    let db_user = sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, name, email, password_hash, role
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await?;

    // Unknown email and wrong password produce the identical response so
    // the endpoint does not leak which addresses are registered.
    let db_user = match db_user {
        Some(user) => user,
        None => {
            info!("Invalid credentials: user not found");
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    debug!(user_id = db_user.id, "Verifying password");

    if verify_password(&payload.password, &db_user.password_hash).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let role: Role = db_user.role.parse().map_err(|_| {
        error!(user_id = db_user.id, role = %db_user.role, "Unknown role stored for user");
        ApiError::Internal
    })?;

    debug!("Generating token");

    let token = generate_token(
        db_user.id,
        db_user.name.clone(),
        db_user.email.clone(),
        role,
        &config.jwt_secret,
        config.token_ttl,
    );

    info!("Login successful");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "token": token,
        "user": UserPublic {
            id: db_user.id,
            name: db_user.name,
            email: db_user.email,
            role,
        }
    })))
}
