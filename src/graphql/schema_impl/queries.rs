use async_graphql::{Context, Object, ID};

use crate::{
    graphql::helpers::{app_state, extend_err},
    models::dto::response::{AttemptResult, QuizForTaking, QuizReport, QuizSummary},
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// A quiz by share link, without its answer key.
    async fn quiz(
        &self,
        ctx: &Context<'_>,
        share_link: String,
    ) -> async_graphql::Result<QuizForTaking> {
        let state = app_state(ctx)?;
        extend_err(state.quiz_service.get_quiz_for_taking(&share_link).await)
    }

    async fn quizzes(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<QuizSummary>> {
        let state = app_state(ctx)?;
        extend_err(state.quiz_service.list_quizzes().await)
    }

    async fn attempt(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<AttemptResult> {
        let state = app_state(ctx)?;
        extend_err(state.quiz_service.get_attempt_result(&id).await)
    }

    async fn report(
        &self,
        ctx: &Context<'_>,
        share_link: String,
    ) -> async_graphql::Result<QuizReport> {
        let state = app_state(ctx)?;
        extend_err(state.report_service.quiz_report(&share_link).await)
    }
}
