//! Deadline Middleware
//!
//! Bounds every unary request with the configured deadline. The request
//! handler runs as a supervised task and receives a cancellation token via
//! request extensions; when the deadline wins, the client gets 504
//! immediately and the abandoned handler unwinds at its next await on the
//! token.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;

use crate::shared::deadline::DeadlineError;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Cancellation token handed to the request's unit of work.
#[derive(Debug, Clone)]
pub struct RequestCancellation(pub CancellationToken);

/// Deadline middleware applied to every unary route.
pub async fn deadline_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let outcome = state
        .deadline
        .run(move |token| {
            let mut request = request;
            request.extensions_mut().insert(RequestCancellation(token));
            next.run(request)
        })
        .await;

    match outcome {
        Ok(response) => response,
        Err(DeadlineError::Elapsed) => AppError::DeadlineExceeded.into_response(),
        Err(DeadlineError::Aborted(reason)) => AppError::Internal(reason).into_response(),
    }
}
