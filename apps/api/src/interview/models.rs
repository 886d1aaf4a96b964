use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Request / response bodies (snake_case on the wire)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    pub role: String,
    pub difficulty: String,
    /// "text" | "voice"
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartResponse {
    pub interview_id: String,
    pub first_question: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub interview_id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreComponents {
    pub technical: u32,
    pub communication: u32,
    pub confidence: u32,
}

impl ScoreComponents {
    /// Rounded mean of the three components.
    pub fn mean(&self) -> u32 {
        let total = self.technical + self.communication + self.confidence;
        (f64::from(total) / 3.0).round() as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerResponse {
    pub score: u32,
    pub components: ScoreComponents,
    pub feedback: String,
    pub next_question: Option<String>,
    pub done: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinishRequest {
    pub interview_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewReport {
    pub interview_id: String,
    pub score: u32,
    pub components: ScoreComponents,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Stored records (camelCase in the document store)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Active,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub user_id: String,
    pub role: String,
    pub difficulty: String,
    pub mode: String,
    pub created_at: String,
    pub status: InterviewStatus,
    #[serde(default)]
    pub questions_asked: Vec<String>,
    #[serde(default)]
    pub scores: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<InterviewReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub interview_id: String,
    pub question: String,
    pub answer: String,
    pub score: u32,
    pub components: ScoreComponents,
    pub feedback: String,
    pub created_at: String,
    pub user_id: String,
}
