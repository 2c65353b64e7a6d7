use crate::errors::ApiError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, de::IgnoredAny};
use std::collections::BTreeMap;

pub const MAX_TITLE_CHARS: usize = 35;
pub const MIN_WEEKLY_FREQUENCY: u8 = 1;
pub const MAX_WEEKLY_FREQUENCY: u8 = 7;

/// A goal creation request that already passed local validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    title: String,
    desired_weekly_frequency: u8,
}

impl NewGoal {
    pub fn new(title: &str, desired_weekly_frequency: i64) -> Result<Self, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::validation("title is required"));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(ApiError::validation(format!(
                "title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        let desired_weekly_frequency = u8::try_from(desired_weekly_frequency)
            .ok()
            .filter(|frequency| (MIN_WEEKLY_FREQUENCY..=MAX_WEEKLY_FREQUENCY).contains(frequency))
            .ok_or_else(frequency_out_of_range)?;

        Ok(Self {
            title: title.to_string(),
            desired_weekly_frequency,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn desired_weekly_frequency(&self) -> u8 {
        self.desired_weekly_frequency
    }
}

fn frequency_out_of_range() -> ApiError {
    ApiError::validation(format!(
        "desired weekly frequency must be a whole number between {MIN_WEEKLY_FREQUENCY} and {MAX_WEEKLY_FREQUENCY}"
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingGoal {
    pub id: String,
    pub title: String,
    pub desired_weekly_frequency: u8,
    pub completion_count: u32,
}

impl PendingGoal {
    pub fn can_complete(&self) -> bool {
        self.completion_count < u32::from(self.desired_weekly_frequency)
    }
}

/// One completion as listed inside `goalsPerDay`; `id` is the completion id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGoal {
    pub id: String,
    pub title: String,
    pub completed_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub completed: u32,
    pub total: u32,
    #[serde(default)]
    pub goals_per_day: Option<BTreeMap<String, Vec<CompletedGoal>>>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryEnvelope {
    pub summary: Summary,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PendingGoalsPayload {
    Bare(Vec<PendingGoal>),
    #[serde(rename_all = "camelCase")]
    Wrapped {
        pending_goals: Vec<PendingGoal>,
    },
}

impl PendingGoalsPayload {
    pub fn into_goals(self) -> Vec<PendingGoal> {
        match self {
            Self::Bare(goals) | Self::Wrapped { pending_goals: goals } => goals,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompletionRequest {
    pub goal_id: String,
}

/// Goal creation input from a form or JSON body. Fields are taken loosely so
/// that bad values reach [`NewGoal::new`] and come back as validation errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desired_weekly_frequency: FrequencyInput,
}

impl CreateGoalRequest {
    pub fn frequency(&self) -> Result<i64, ApiError> {
        match &self.desired_weekly_frequency {
            FrequencyInput::Number(value) => Ok(*value),
            FrequencyInput::Text(text) => text.trim().parse().map_err(|_| frequency_out_of_range()),
            FrequencyInput::Other(_) => Err(frequency_out_of_range()),
        }
    }
}

/// Form fields arrive as text, JSON fields as numbers; anything else is kept
/// only to be rejected.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FrequencyInput {
    Number(i64),
    Text(String),
    Other(IgnoredAny),
}

impl Default for FrequencyInput {
    fn default() -> Self {
        Self::Other(IgnoredAny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_over_limit_is_rejected() {
        let title = "a".repeat(36);
        let err = NewGoal::new(&title, 3).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let title = "a".repeat(35);
        assert!(NewGoal::new(&title, 3).is_ok());
    }

    #[test]
    fn title_length_counts_characters() {
        let title = "ç".repeat(35);
        assert!(NewGoal::new(&title, 1).is_ok());
    }

    #[test]
    fn blank_title_and_frequency_bounds() {
        assert!(matches!(NewGoal::new("   ", 3), Err(ApiError::Validation(_))));
        assert!(matches!(NewGoal::new("Run", 0), Err(ApiError::Validation(_))));
        assert!(matches!(NewGoal::new("Run", 8), Err(ApiError::Validation(_))));
        assert!(matches!(NewGoal::new("Run", 300), Err(ApiError::Validation(_))));
        assert!(matches!(NewGoal::new("Run", 259), Err(ApiError::Validation(_))));
        assert!(matches!(NewGoal::new("Run", -1), Err(ApiError::Validation(_))));

        let goal = NewGoal::new("  Run  ", 7).unwrap();
        assert_eq!(goal.title(), "Run");
        assert_eq!(goal.desired_weekly_frequency(), 7);
    }

    #[test]
    fn new_goal_serializes_camel_case() {
        let goal = NewGoal::new("Meditate", 5).unwrap();
        let value = serde_json::to_value(&goal).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "title": "Meditate", "desiredWeeklyFrequency": 5 })
        );
    }

    #[test]
    fn create_goal_request_accepts_numbers_and_text() {
        let json: CreateGoalRequest =
            serde_json::from_str(r#"{ "title": "Run", "desiredWeeklyFrequency": 3 }"#).unwrap();
        assert_eq!(json.frequency().unwrap(), 3);

        let text: CreateGoalRequest =
            serde_json::from_str(r#"{ "title": "Run", "desiredWeeklyFrequency": " 5 " }"#).unwrap();
        assert_eq!(text.frequency().unwrap(), 5);
    }

    #[test]
    fn out_of_range_frequency_is_a_validation_error() {
        for body in [
            r#"{ "title": "Run", "desiredWeeklyFrequency": 300 }"#,
            r#"{ "title": "Run", "desiredWeeklyFrequency": -1 }"#,
            r#"{ "title": "Run", "desiredWeeklyFrequency": "abc" }"#,
            r#"{ "title": "Run", "desiredWeeklyFrequency": 2.5 }"#,
            r#"{ "title": "Run", "desiredWeeklyFrequency": null }"#,
            r#"{ "title": "Run" }"#,
        ] {
            let request: CreateGoalRequest = serde_json::from_str(body).unwrap();
            let err = request
                .frequency()
                .and_then(|frequency| NewGoal::new(&request.title, frequency))
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{body}");
        }
    }

    #[test]
    fn pending_goal_soft_cap() {
        let mut goal = PendingGoal {
            id: "g1".into(),
            title: "Read".into(),
            desired_weekly_frequency: 2,
            completion_count: 1,
        };
        assert!(goal.can_complete());
        goal.completion_count = 2;
        assert!(!goal.can_complete());
    }
}
