use crate::{
    auth::{
        hash_password, issue_token, verify_password, Authenticated, Credentials, AUTH_HEADER,
    },
    error::AppError,
    models::{PublicUser, User},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Create a new account
///
/// Validates the email/password pair, persists the user with a hashed
/// password, and opens a first session: the new token travels back in the
/// `x-auth` response header while the body carries only the public fields.
#[post("")]
pub async fn create_user(
    pool: web::Data<PgPool>,
    body: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    // Validate input
    body.validate()?;

    // Check if email already exists
    let existing = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE email = $1")
        .bind(&body.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Validation("email already registered".into()));
    }

    // Hash password
    let password_hash = hash_password(&body.password)?;

    // Insert new user
    let user = sqlx::query_as::<_, PublicUser>(
        "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id, email",
    )
    .bind(&body.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    let token = issue_token(&**pool, user.id).await?;

    Ok(HttpResponse::Ok()
        .insert_header((AUTH_HEADER, token))
        .json(user))
}

/// Login
///
/// An unknown email and a wrong password produce the identical 400 response,
/// so a caller cannot probe which addresses are registered. Success appends a
/// fresh token to the user's sequence without touching existing sessions.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    body: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(&body.email)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::Authentication("invalid email or password".into()))?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Authentication("invalid email or password".into()));
    }

    let token = issue_token(&**pool, user.id).await?;

    Ok(HttpResponse::Ok()
        .insert_header((AUTH_HEADER, token))
        .json(user.public()))
}

/// Who am I
///
/// Returns the public fields of the session user. An unauthenticated request
/// never reaches this handler; the middleware answers 401 first.
#[get("/me")]
pub async fn me(session: Authenticated) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(PublicUser {
        id: session.0.user_id,
        email: session.0.email,
    }))
}

/// Logout
///
/// Removes exactly the token this request was authenticated with. Other
/// sessions of the same user keep working.
#[delete("/me/token")]
pub async fn logout(
    pool: web::Data<PgPool>,
    session: Authenticated,
) -> Result<impl Responder, AppError> {
    sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token = $2")
        .bind(session.0.user_id)
        .bind(&session.0.token)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().finish())
}
