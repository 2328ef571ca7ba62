use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::token::verify_token;
use crate::error::AppError;

/// The request header carrying the session token, both directions.
pub const AUTH_HEADER: &str = "x-auth";

/// The session resolved by [`AuthMiddleware`], stored in request extensions.
///
/// Carries the presented token alongside the user so that logout can remove
/// exactly the session it was called with.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i32,
    pub email: String,
    pub token: String,
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc because resolving a session awaits the database before the inner
    // service can be called.
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Skip authentication for the health check, account creation, and login
        let path = req.path();
        if path == "/health"
            || path == "/users/login"
            || (path == "/users" && req.method() == Method::POST)
        {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let session = resolve_session(&req).await?;
            req.extensions_mut().insert(session);
            service.call(req).await
        })
    }
}

/// Resolves the `x-auth` header to a stored session.
///
/// The token must decode under the signing secret *and* match a row in
/// `user_tokens` for the user it names. A token removed by logout fails the
/// second check even while its signature is still valid. Every failure short
/// of a storage error maps to 401 with an empty body.
async fn resolve_session(req: &ServiceRequest) -> Result<Session, Error> {
    let token = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing x-auth header".into()))?;

    let claims = verify_token(token)?;

    let pool = req
        .app_data::<web::Data<PgPool>>()
        .ok_or_else(|| AppError::Internal("database pool not configured".into()))?;

    let row = sqlx::query_as::<_, (i32, String)>(
        "SELECT u.id, u.email FROM users u \
         JOIN user_tokens t ON t.user_id = u.id \
         WHERE u.id = $1 AND t.kind = 'auth' AND t.token = $2",
    )
    .bind(claims.sub)
    .bind(token)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    match row {
        Some((user_id, email)) => Ok(Session {
            user_id,
            email,
            token: token.to_owned(),
        }),
        None => Err(AppError::Unauthorized("unrecognized session token".into()).into()),
    }
}
