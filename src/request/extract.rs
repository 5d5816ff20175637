use axum::{
    body::to_bytes,
    extract::{FromRef, FromRequest, FromRequestParts, RawPathParams, Request},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::{InputHandler, RawRequest};
use crate::errors::ApiError;

/// Axum extractor running an [`InputHandler`] on the incoming request.
///
/// The handler for `T` is taken from router state, so it is built (and its schema
/// checked) once at startup:
///
/// ```rust,ignore
/// #[derive(Clone)]
/// struct AppState {
///     create_user: Arc<InputHandler<CreateUser>>,
/// }
///
/// impl FromRef<AppState> for Arc<InputHandler<CreateUser>> {
///     fn from_ref(state: &AppState) -> Self {
///         Arc::clone(&state.create_user)
///     }
/// }
///
/// async fn create_user(Validated(input): Validated<CreateUser>) -> StatusCode { ... }
/// ```
///
/// Path parameters from the matched route are visible to [`Source::Url`](crate::Source)
/// fields ahead of the query string. The body is read up to the configured size limit.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
    Arc<InputHandler<T>>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let handler = Arc::<InputHandler<T>>::from_ref(state);
        let limits = handler.config().limits;

        let (mut parts, body) = req.into_parts();
        let path_params = RawPathParams::from_request_parts(&mut parts, state).await.ok();

        let bytes = to_bytes(body, limits.max_body_bytes)
            .await
            .map_err(|err| ApiError::invalid_input(format!("failed to read request body: {err}")))?;

        let mut raw = RawRequest::from_parts(&parts, &bytes, &limits)?;
        if let Some(params) = &path_params {
            for (key, value) in params {
                raw = raw.with_path_param(key, value);
            }
        }

        handler.handle(&raw).map(Validated)
    }
}
