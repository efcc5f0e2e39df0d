use utoipa::OpenApi;

use crate::handlers::{
    AnswerRequest, AnswerResponse, ChallengeHistoryResponse, CompleteChallengeRequest,
    CompleteChallengeResponse, DailyArchiveResponse, DailyChallengeResponse,
    WeeklyChallengeResponse,
};
use crate::models::{ChallengeStats, DailyChallenge, DailyStats, WeeklyChallenge};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::current_challenge_handler,
        crate::handlers::complete_challenge_handler,
        crate::handlers::challenge_history_handler,
        crate::handlers::current_daily_handler,
        crate::handlers::answer_daily_handler,
        crate::handlers::daily_archive_handler,
    ),
    components(schemas(
        CompleteChallengeRequest,
        AnswerRequest,
        WeeklyChallengeResponse,
        CompleteChallengeResponse,
        ChallengeHistoryResponse,
        DailyChallengeResponse,
        AnswerResponse,
        DailyArchiveResponse,
        WeeklyChallenge,
        DailyChallenge,
        ChallengeStats,
        DailyStats,
    )),
    tags((name = "Challenges", description = "Weekly challenges and daily questions"))
)]
pub struct ChallengeApiDoc;
