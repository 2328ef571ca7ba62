use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::middleware::Session;
use crate::error::AppError;

/// Extracts the resolved [`Session`] from request extensions.
///
/// This extractor is intended for routes protected by `AuthMiddleware`, which
/// validates the `x-auth` token against storage and inserts the session into
/// request extensions.
///
/// If no session is present (the middleware did not run, or failed to insert
/// one), this extractor returns `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Session);

impl FromRequest for Authenticated {
    type Error = ActixError; // AppError converts into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Session>().cloned() {
            Some(session) => ready(Ok(Authenticated(session))),
            None => {
                // Only reachable if a protected route was registered without
                // AuthMiddleware. Responding 401 is the safe default.
                let err = AppError::Unauthorized(
                    "no session in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
