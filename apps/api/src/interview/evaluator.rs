use async_trait::async_trait;

use crate::errors::AppError;
use crate::interview::models::ScoreComponents;

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: u32,
    pub components: ScoreComponents,
    pub feedback: String,
}

/// Scores one interview answer. Implement this to swap in a real scorer
/// without touching the interview flow or handlers.
///
/// Carried in `AppState` as `Arc<dyn AnswerEvaluator>`.
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        role: &str,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, AppError>;
}

pub const FIXED_FEEDBACK: &str = "Good response structure. Consider adding more specific examples and quantifying your achievements.";

/// Placeholder scorer: constant components, constant feedback.
pub struct FixedAnswerEvaluator;

#[async_trait]
impl AnswerEvaluator for FixedAnswerEvaluator {
    async fn evaluate(
        &self,
        _role: &str,
        _question: &str,
        _answer: &str,
    ) -> Result<Evaluation, AppError> {
        let components = ScoreComponents {
            technical: 70,
            communication: 75,
            confidence: 72,
        };
        Ok(Evaluation {
            score: components.mean(),
            components,
            feedback: FIXED_FEEDBACK.to_string(),
        })
    }
}
