//! Turn-based interview flow: start → answer (repeated) → finish.
//!
//! The flow asks at most `MAX_QUESTIONS` questions; the answer that arrives
//! once that many have been asked is scored and reported as `done`.
//! Answers are appended to the interview through `DocumentStore::append`, so
//! concurrent answers to one interview never drop each other's entries.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::evaluator::AnswerEvaluator;
use crate::interview::models::{
    AnswerRequest, AnswerResponse, AttemptRecord, FinishRequest, InterviewRecord,
    InterviewReport, InterviewStatus, ScoreComponents, StartRequest, StartResponse,
};
use crate::store::{timestamp, Collection, DocumentStore};

pub const MAX_QUESTIONS: usize = 5;
/// Stand-in score when an interview is finished without any answers.
const NO_ANSWER_SCORE: u32 = 60;
const COMPONENT_FLOOR: u32 = 50;

pub fn first_question(role: &str) -> String {
    format!("Why do you want the role {role}?")
}

pub fn follow_up_question(role: &str) -> String {
    format!("Tell me about a challenge in {role}.")
}

pub async fn start(
    store: &dyn DocumentStore,
    uid: &str,
    req: StartRequest,
    now: DateTime<Utc>,
) -> Result<StartResponse, AppError> {
    if req.role.trim().is_empty() {
        return Err(AppError::Validation("role must not be empty".to_string()));
    }

    let interview_id = Uuid::new_v4().to_string();
    let question = first_question(&req.role);

    let record = InterviewRecord {
        user_id: uid.to_string(),
        role: req.role,
        difficulty: req.difficulty,
        mode: req.mode,
        created_at: timestamp(now),
        status: InterviewStatus::Active,
        questions_asked: vec![question.clone()],
        scores: Vec::new(),
        report: None,
    };
    store
        .put(Collection::Interviews, &interview_id, to_document(&record)?)
        .await?;

    info!(interview_id = %interview_id, role = %record.role, "Interview started");
    Ok(StartResponse {
        interview_id,
        first_question: question,
    })
}

pub async fn answer(
    store: &dyn DocumentStore,
    evaluator: &dyn AnswerEvaluator,
    uid: &str,
    req: AnswerRequest,
    now: DateTime<Utc>,
) -> Result<AnswerResponse, AppError> {
    let record = load_owned(store, uid, &req.interview_id).await?;

    let evaluation = evaluator
        .evaluate(&record.role, &req.question, &req.answer)
        .await?;

    let attempt = AttemptRecord {
        interview_id: req.interview_id.clone(),
        question: req.question.clone(),
        answer: req.answer,
        score: evaluation.score,
        components: evaluation.components,
        feedback: evaluation.feedback.clone(),
        created_at: timestamp(now),
        user_id: uid.to_string(),
    };
    store
        .put(
            Collection::Attempts,
            &Uuid::new_v4().to_string(),
            to_document(&attempt)?,
        )
        .await?;

    let updated = store
        .append(
            Collection::Interviews,
            &req.interview_id,
            &[
                ("questionsAsked", json!(req.question)),
                ("scores", json!(evaluation.score)),
            ],
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;

    // Questions asked before this answer's question was appended.
    let asked_before = updated
        .data
        .get("questionsAsked")
        .and_then(Value::as_array)
        .map_or(0, |asked| asked.len().saturating_sub(1));
    let done = asked_before >= MAX_QUESTIONS;
    let next_question = (!done).then(|| follow_up_question(&record.role));

    Ok(AnswerResponse {
        score: evaluation.score,
        components: evaluation.components,
        feedback: evaluation.feedback,
        next_question,
        done,
    })
}

pub async fn finish(
    store: &dyn DocumentStore,
    uid: &str,
    req: FinishRequest,
) -> Result<InterviewReport, AppError> {
    let record = load_owned(store, uid, &req.interview_id).await?;

    let scores = if record.scores.is_empty() {
        vec![NO_ANSWER_SCORE]
    } else {
        record.scores
    };
    let total: u32 = scores.iter().sum();
    let overall = (f64::from(total) / scores.len() as f64).round() as u32;

    let report = InterviewReport {
        interview_id: req.interview_id.clone(),
        score: overall,
        components: ScoreComponents {
            technical: overall,
            communication: overall.saturating_sub(5).max(COMPONENT_FLOOR),
            confidence: overall.saturating_sub(3).max(COMPONENT_FLOOR),
        },
        strengths: vec!["Clear communication".to_string()],
        weaknesses: vec!["Insufficient examples".to_string()],
        tips: vec!["Use STAR format".to_string(), "Quantify impact".to_string()],
    };

    store
        .merge(
            Collection::Interviews,
            &req.interview_id,
            json!({
                "status": InterviewStatus::Finished,
                "report": report,
            }),
        )
        .await?;

    info!(interview_id = %req.interview_id, score = overall, "Interview finished");
    Ok(report)
}

pub async fn list(store: &dyn DocumentStore, uid: &str) -> Result<Vec<Value>, AppError> {
    Ok(store
        .list_by_owner(Collection::Interviews, uid)
        .await?
        .into_iter()
        .map(|doc| doc.into_json_with_id())
        .collect())
}

pub async fn get(store: &dyn DocumentStore, uid: &str, id: &str) -> Result<Value, AppError> {
    match store.get(Collection::Interviews, id).await? {
        Some(doc) if doc.is_owned_by(uid) => Ok(doc.into_json_with_id()),
        _ => Err(AppError::NotFound("Not found".to_string())),
    }
}

async fn load_owned(
    store: &dyn DocumentStore,
    uid: &str,
    id: &str,
) -> Result<InterviewRecord, AppError> {
    let doc = store
        .get(Collection::Interviews, id)
        .await?
        .filter(|doc| doc.is_owned_by(uid))
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))?;

    let record = serde_json::from_value(doc.data)
        .with_context(|| format!("Stored interview {id} is malformed"))?;
    Ok(record)
}

fn to_document<T: serde::Serialize>(record: &T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(record).context("Failed to serialize record")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::evaluator::{Evaluation, FixedAnswerEvaluator};
    use crate::store::InMemoryStore;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap()
    }

    fn start_req(role: &str) -> StartRequest {
        StartRequest {
            role: role.to_string(),
            difficulty: "medium".to_string(),
            mode: "text".to_string(),
        }
    }

    fn answer_req(id: &str, question: &str) -> AnswerRequest {
        AnswerRequest {
            interview_id: id.to_string(),
            question: question.to_string(),
            answer: "An answer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_start_stores_active_record() {
        let store = InMemoryStore::new();
        let started = start(&store, "u1", start_req("Data Engineer"), at(1))
            .await
            .unwrap();
        assert_eq!(started.first_question, "Why do you want the role Data Engineer?");

        let doc = store
            .get(Collection::Interviews, &started.interview_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["status"], "active");
        assert_eq!(doc.data["userId"], "u1");
        assert_eq!(doc.data["questionsAsked"].as_array().unwrap().len(), 1);
        assert!(doc.data.get("report").is_none());
    }

    #[tokio::test]
    async fn test_blank_role_is_rejected() {
        let store = InMemoryStore::new();
        let result = start(&store, "u1", start_req("  "), at(1)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_answers_until_done() {
        let store = InMemoryStore::new();
        let eval = FixedAnswerEvaluator;
        let id = start(&store, "u1", start_req("SRE"), at(1))
            .await
            .unwrap()
            .interview_id;

        // One question asked at start; four more answers keep the flow open.
        for turn in 0..4 {
            let resp = answer(&store, &eval, "u1", answer_req(&id, "Q"), at(1))
                .await
                .unwrap();
            assert!(!resp.done, "turn {turn}");
            assert_eq!(resp.score, 72);
            assert_eq!(
                resp.next_question.as_deref(),
                Some("Tell me about a challenge in SRE.")
            );
        }

        let last = answer(&store, &eval, "u1", answer_req(&id, "Q"), at(1))
            .await
            .unwrap();
        assert!(last.done);
        assert!(last.next_question.is_none());

        let doc = store.get(Collection::Interviews, &id).await.unwrap().unwrap();
        assert_eq!(doc.data["scores"].as_array().unwrap().len(), 5);
        assert_eq!(doc.data["questionsAsked"].as_array().unwrap().len(), 6);
    }

    /// Yields to the scheduler mid-evaluation so concurrent answers interleave
    /// between loading the interview and recording the answer.
    struct YieldingEvaluator;

    #[async_trait::async_trait]
    impl AnswerEvaluator for YieldingEvaluator {
        async fn evaluate(
            &self,
            role: &str,
            question: &str,
            answer: &str,
        ) -> Result<Evaluation, AppError> {
            tokio::task::yield_now().await;
            FixedAnswerEvaluator.evaluate(role, question, answer).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_answers_are_both_recorded() {
        let store = InMemoryStore::new();
        let eval = YieldingEvaluator;
        let id = start(&store, "u1", start_req("SRE"), at(1))
            .await
            .unwrap()
            .interview_id;

        let (a, b) = tokio::join!(
            answer(&store, &eval, "u1", answer_req(&id, "First"), at(1)),
            answer(&store, &eval, "u1", answer_req(&id, "Second"), at(1)),
        );
        a.unwrap();
        b.unwrap();

        let doc = store.get(Collection::Interviews, &id).await.unwrap().unwrap();
        assert_eq!(doc.data["scores"], serde_json::json!([72, 72]));
        let asked: Vec<&str> = doc.data["questionsAsked"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q.as_str().unwrap())
            .collect();
        assert_eq!(asked.len(), 3);
        assert!(asked.contains(&"First") && asked.contains(&"Second"));
    }

    #[tokio::test]
    async fn test_answer_to_foreign_interview_is_not_found() {
        let store = InMemoryStore::new();
        let id = start(&store, "owner", start_req("PM"), at(1))
            .await
            .unwrap()
            .interview_id;

        let result = answer(&store, &FixedAnswerEvaluator, "intruder", answer_req(&id, "Q"), at(1)).await;
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Interview not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(store
            .list_by_owner(Collection::Attempts, "intruder")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_finish_without_answers_uses_default_score() {
        let store = InMemoryStore::new();
        let id = start(&store, "u1", start_req("QA"), at(1))
            .await
            .unwrap()
            .interview_id;

        let report = finish(&store, "u1", FinishRequest { interview_id: id.clone() })
            .await
            .unwrap();
        assert_eq!(report.score, 60);
        assert_eq!(report.components.communication, 55);
        assert_eq!(report.components.confidence, 57);
        assert_eq!(report.tips, vec!["Use STAR format", "Quantify impact"]);

        let doc = store.get(Collection::Interviews, &id).await.unwrap().unwrap();
        assert_eq!(doc.data["status"], "finished");
        assert_eq!(doc.data["report"]["score"], 60);
    }

    #[tokio::test]
    async fn test_finish_averages_scores_with_floor() {
        let store = InMemoryStore::new();
        store
            .put(
                Collection::Interviews,
                "i1",
                serde_json::json!({
                    "userId": "u1", "role": "Dev", "difficulty": "easy", "mode": "text",
                    "createdAt": timestamp(at(1)), "status": "active",
                    "questionsAsked": ["a", "b"], "scores": [50, 53]
                }),
            )
            .await
            .unwrap();

        let report = finish(&store, "u1", FinishRequest { interview_id: "i1".into() })
            .await
            .unwrap();
        // round(51.5) = 52
        assert_eq!(report.score, 52);
        assert_eq!(report.components.communication, 50);
        assert_eq!(report.components.confidence, 50);
    }

    #[tokio::test]
    async fn test_list_and_get_respect_ownership() {
        let store = InMemoryStore::new();
        let older = start(&store, "u1", start_req("A"), at(1)).await.unwrap().interview_id;
        let newer = start(&store, "u1", start_req("B"), at(2)).await.unwrap().interview_id;
        start(&store, "u2", start_req("C"), at(3)).await.unwrap();

        let listed = list(&store, "u1").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|v| v["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec![newer.as_str(), older.as_str()]);

        assert_eq!(get(&store, "u1", &older).await.unwrap()["role"], "A");
        match get(&store, "u2", &older).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
