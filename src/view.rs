use crate::cache::QueryState;
use crate::config::Locale;
use crate::models::{PendingGoal, Summary};
use crate::summary::{DisplaySummary, derive_view};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "view", content = "summary", rename_all = "kebab-case")]
pub enum View {
    Loading,
    EmptyGoals,
    Summary(DisplaySummary),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::EmptyGoals => "empty-goals",
            Self::Summary(_) => "summary",
        }
    }
}

/// Picks the page for the current summary query. Fetch errors fall back to
/// the empty state.
pub fn compose(summary: &QueryState<Summary>, locale: Locale) -> View {
    if summary.is_loading() {
        return View::Loading;
    }
    if summary.is_error() {
        return View::EmptyGoals;
    }
    match summary.data.as_deref() {
        Some(data) if data.total > 0 => View::Summary(derive_view(data, locale)),
        _ => View::EmptyGoals,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PendingGoalButton {
    pub id: String,
    pub title: String,
    pub disabled: bool,
}

pub fn pending_buttons(goals: &[PendingGoal]) -> Vec<PendingGoalButton> {
    goals
        .iter()
        .map(|goal| PendingGoalButton {
            id: goal.id.clone(),
            title: goal.title.clone(),
            disabled: !goal.can_complete(),
        })
        .collect()
}
