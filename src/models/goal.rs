//! Growth goals (connections, posting cadence, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub target_value: u64,
    pub current_value: u64,
    pub goal_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    #[validate(range(min = 1, message = "must be positive"))]
    pub target_value: u64,
    #[serde(default)]
    pub current_value: u64,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub goal_type: String,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoalChanges {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(range(min = 1, message = "must be positive"))]
    pub target_value: Option<u64>,
    pub current_value: Option<u64>,
    pub goal_type: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

impl GoalChanges {
    pub(crate) fn apply(self, goal: &mut Goal) {
        if let Some(v) = self.title {
            goal.title = v;
        }
        if let Some(v) = self.target_value {
            goal.target_value = v;
        }
        if let Some(v) = self.current_value {
            goal.current_value = v;
        }
        if let Some(v) = self.goal_type {
            goal.goal_type = v;
        }
        if let Some(v) = self.end_date {
            goal.end_date = Some(v);
        }
        if let Some(v) = self.is_completed {
            goal.is_completed = v;
        }
    }
}
