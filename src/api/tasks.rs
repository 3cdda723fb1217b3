//! Demo task generation endpoint.

use super::{check_envelope, ApiClient, ApiError, Method};
use crate::catalog::Task;
use crate::progression::GenerationOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const GENERATE_TASKS_PATH: &str = "/api/demo/generate-tasks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateTasksRequest {
    pub quest_id: String,
    pub quest_title: String,
    pub interests: Vec<String>,
    pub custom_input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedTasks {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub rate_limit_remaining: Option<u32>,
}

impl ApiClient {
    /// Asks the backend for personalized tasks.
    pub fn generate_tasks(&self, request: &GenerateTasksRequest) -> Result<GeneratedTasks, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
        let envelope = self.send(Method::Post, GENERATE_TASKS_PATH, Some(&body))?;
        parse_generated(envelope)
    }
}

fn parse_generated(envelope: Value) -> Result<GeneratedTasks, ApiError> {
    let envelope = check_envelope(envelope)?;
    let generated: GeneratedTasks =
        serde_json::from_value(envelope).map_err(|e| ApiError::Decode(e.to_string()))?;
    if generated.tasks.is_empty() {
        return Err(ApiError::Rejected("No tasks were generated. Please try again.".into()));
    }
    Ok(generated)
}

/// Converts a request result into the store's outcome type.
pub fn generation_outcome(result: Result<GeneratedTasks, ApiError>) -> GenerationOutcome {
    match result {
        Ok(generated) => GenerationOutcome::Success {
            tasks: generated.tasks,
            rate_limit_remaining: generated.rate_limit_remaining,
        },
        Err(e) => GenerationOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Pillar;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let req = GenerateTasksRequest {
            quest_id: "game-design".into(),
            quest_title: "Game Design".into(),
            interests: vec!["chess".into(), "drawing".into()],
            custom_input: "I like puzzles".into(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["quest_id"], "game-design");
        assert_eq!(v["interests"][1], "drawing");
        assert_eq!(v["custom_input"], "I like puzzles");
    }

    #[test]
    fn test_parse_success() {
        let generated = parse_generated(json!({
            "success": true,
            "tasks": [
                { "id": "t1", "title": "Design a chess variant", "pillar": "creativity", "xp": 50 }
            ],
            "rate_limit_remaining": 2
        }))
        .unwrap();
        assert_eq!(generated.tasks[0].pillar, Pillar::Creativity);
        assert_eq!(generated.rate_limit_remaining, Some(2));
    }

    #[test]
    fn test_parse_rejected_and_empty() {
        assert_eq!(
            parse_generated(json!({ "success": false, "error": "Quest unavailable" })),
            Err(ApiError::Rejected("Quest unavailable".into()))
        );
        assert!(matches!(
            parse_generated(json!({ "success": true, "tasks": [] })),
            Err(ApiError::Rejected(_))
        ));
    }

    #[test]
    fn test_parse_bad_pillar_is_decode_error() {
        let result = parse_generated(json!({
            "success": true,
            "tasks": [{ "id": "t1", "title": "x", "pillar": "astrology", "xp": 5 }]
        }));
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_outcome_carries_rate_limit_message() {
        let outcome = generation_outcome(Err(ApiError::RateLimited("Slow down".into())));
        assert_eq!(outcome, GenerationOutcome::Failed("Slow down".into()));
    }
}
