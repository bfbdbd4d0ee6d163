use async_graphql::{Context, Object, ID};

use crate::{
    graphql::helpers::{app_state, extend_err},
    models::dto::{
        request::{CreateQuizRequest, GenerateQuizRequest, SubmitAttemptRequest},
        response::{AttemptResult, QuizCreated, QuizPreview},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_quiz(
        &self,
        ctx: &Context<'_>,
        input: CreateQuizRequest,
    ) -> async_graphql::Result<QuizCreated> {
        let state = app_state(ctx)?;
        extend_err(state.quiz_service.create_quiz(input).await)
    }

    /// Generates questions without saving them.
    async fn preview_quiz(
        &self,
        ctx: &Context<'_>,
        input: GenerateQuizRequest,
    ) -> async_graphql::Result<QuizPreview> {
        let state = app_state(ctx)?;
        extend_err(state.quiz_service.preview_quiz(input).await)
    }

    async fn submit_attempt(
        &self,
        ctx: &Context<'_>,
        share_link: String,
        input: SubmitAttemptRequest,
    ) -> async_graphql::Result<AttemptResult> {
        let state = app_state(ctx)?;
        extend_err(state.quiz_service.submit_attempt(&share_link, input).await)
    }

    async fn delete_quiz(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let state = app_state(ctx)?;
        extend_err(state.quiz_service.delete_quiz(&id).await)?;
        Ok(true)
    }
}
