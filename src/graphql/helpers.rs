use async_graphql::{Context, ErrorExtensions};

use crate::{app_state::AppState, errors::AppResult};

pub fn app_state<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a AppState> {
    ctx.data::<AppState>()
}

/// Converts a service result, attaching the error `code` extension.
pub fn extend_err<T>(result: AppResult<T>) -> async_graphql::Result<T> {
    result.map_err(|e| e.extend())
}
