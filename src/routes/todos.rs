use crate::{
    auth::Authenticated,
    error::AppError,
    models::{Todo, TodoInput, TodoPatch},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Parses a path segment as a todo id.
///
/// A string that is not a well-formed UUID responds 404, not 400: a malformed
/// id, a missing todo, and another user's todo are all the same outcome on the
/// wire.
fn parse_todo_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("malformed todo id: {}", raw)))
}

/// Creates a new todo owned by the caller.
///
/// Expects a JSON body with a `text` field; a body without it is rejected at
/// deserialization. No further checks: an empty string is stored as-is.
/// New todos start with `completed=false` and no completion timestamp.
///
/// ## Responses:
/// - `200 OK`: the created todo, unwrapped.
/// - `400 Bad Request`: body missing the `text` field.
/// - `401 Unauthorized`: missing or invalid session token.
#[post("")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    session: Authenticated,
    body: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let todo = Todo::new(body.into_inner(), session.0.user_id);

    let created = sqlx::query_as::<_, Todo>(
        "INSERT INTO todos (id, text, completed, completed_at, owner_id) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, text, completed, completed_at, owner_id",
    )
    .bind(todo.id)
    .bind(&todo.text)
    .bind(todo.completed)
    .bind(todo.completed_at)
    .bind(todo.owner_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Lists the caller's todos.
///
/// Only todos owned by the session user are returned, in storage order.
///
/// ## Responses:
/// - `200 OK`: `{"todos": [...]}`.
/// - `401 Unauthorized`: missing or invalid session token.
#[get("")]
pub async fn list_todos(
    pool: web::Data<PgPool>,
    session: Authenticated,
) -> Result<impl Responder, AppError> {
    let todos = sqlx::query_as::<_, Todo>(
        "SELECT id, text, completed, completed_at, owner_id FROM todos WHERE owner_id = $1",
    )
    .bind(session.0.user_id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "todos": todos })))
}

/// Retrieves a single todo by id.
///
/// The query is scoped to the caller; a todo owned by someone else is
/// indistinguishable from one that does not exist.
///
/// ## Responses:
/// - `200 OK`: `{"todo": {...}}`.
/// - `401 Unauthorized`: missing or invalid session token.
/// - `404 Not Found`: malformed id, no such todo, or not the caller's.
#[get("/{id}")]
pub async fn get_todo(
    pool: web::Data<PgPool>,
    session: Authenticated,
    raw_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_todo_id(&raw_id)?;

    let todo = sqlx::query_as::<_, Todo>(
        "SELECT id, text, completed, completed_at, owner_id \
         FROM todos WHERE id = $1 AND owner_id = $2",
    )
    .bind(id)
    .bind(session.0.user_id)
    .fetch_optional(&**pool)
    .await?;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("todo not found".into())),
    }
}

/// Applies a partial update to a todo.
///
/// Only `text` and `completed` are read from the body; everything else is
/// ignored. Exactly the boolean `true` marks the todo completed and stamps
/// `completedAt` with the current time; any other value for `completed`
/// (absent, `false`, non-boolean) forces it back to not-completed and clears
/// the timestamp. An absent `text` leaves the stored text unchanged.
/// The update is a single atomic statement scoped to the caller.
///
/// ## Responses:
/// - `200 OK`: `{"todo": {...}}` with the updated document.
/// - `401 Unauthorized`: missing or invalid session token.
/// - `404 Not Found`: malformed id, no such todo, or not the caller's.
#[patch("/{id}")]
pub async fn update_todo(
    pool: web::Data<PgPool>,
    session: Authenticated,
    raw_id: web::Path<String>,
    body: web::Json<TodoPatch>,
) -> Result<impl Responder, AppError> {
    let id = parse_todo_id(&raw_id)?;
    let patch = body.into_inner();

    let (completed, completed_at) = if patch.marks_completed() {
        (true, Some(Utc::now()))
    } else {
        (false, None)
    };

    let todo = sqlx::query_as::<_, Todo>(
        "UPDATE todos SET text = COALESCE($1, text), completed = $2, completed_at = $3 \
         WHERE id = $4 AND owner_id = $5 \
         RETURNING id, text, completed, completed_at, owner_id",
    )
    .bind(patch.text.as_deref())
    .bind(completed)
    .bind(completed_at)
    .bind(id)
    .bind(session.0.user_id)
    .fetch_optional(&**pool)
    .await?;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("todo not found".into())),
    }
}

/// Physically deletes a todo.
///
/// `DELETE ... RETURNING` keeps lookup and removal in one atomic statement;
/// the removed document is echoed back on success.
///
/// ## Responses:
/// - `200 OK`: `{"todo": <deleted document>}`.
/// - `401 Unauthorized`: missing or invalid session token.
/// - `404 Not Found`: malformed id, no such todo, or not the caller's.
#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    session: Authenticated,
    raw_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_todo_id(&raw_id)?;

    let todo = sqlx::query_as::<_, Todo>(
        "DELETE FROM todos WHERE id = $1 AND owner_id = $2 \
         RETURNING id, text, completed, completed_at, owner_id",
    )
    .bind(id)
    .bind(session.0.user_id)
    .fetch_optional(&**pool)
    .await?;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("todo not found".into())),
    }
}
