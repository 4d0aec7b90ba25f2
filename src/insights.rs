//! Profile insights derived from a user's repositories and public events.
//!
//! Pure functions over already-fetched data; the fetcher supplies "today".

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::{GitHubEvent, GitHubRepo, GitHubUser};

/// Language breakdown across a user's repositories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TechStack {
    /// Repository count per primary language
    pub languages: BTreeMap<String, usize>,
    /// Most used language; `""` when no repo has one
    pub top_language: String,
    pub total_repos: usize,
}

/// Consecutive-day activity derived from public events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Distinct days with at least one event
    pub total_days: usize,
    /// `YYYY-MM-DD`, or `""` without any event
    pub last_active: String,
}

/// Profile plus the derived insights, served by `/api/user/:username`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedUser {
    pub user: GitHubUser,
    pub tech_stack: TechStack,
    pub streak: StreakInfo,
}

// == Tech Stack ==
/// Counts repositories per language, skipping repos without one.
///
/// Ties for the top language go to the alphabetically first name.
pub fn tech_stack(repos: &[GitHubRepo]) -> TechStack {
    let mut languages = BTreeMap::new();
    for language in repos
        .iter()
        .filter_map(|repo| repo.language.as_deref())
        .filter(|language| !language.is_empty())
    {
        *languages.entry(language.to_string()).or_insert(0) += 1;
    }

    let mut top_language = String::new();
    let mut top_count = 0;
    for (language, &count) in &languages {
        if count > top_count {
            top_count = count;
            top_language = language.clone();
        }
    }

    TechStack {
        languages,
        top_language,
        total_repos: repos.len(),
    }
}

// == Streak ==
/// Computes streaks from event dates relative to `today`.
///
/// The current streak runs back from today, or from yesterday when nothing
/// happened yet today. Events whose timestamp has no readable date are
/// ignored.
pub fn streak(events: &[GitHubEvent], today: NaiveDate) -> StreakInfo {
    let days: BTreeSet<NaiveDate> = events
        .iter()
        .filter_map(|event| event.created_at.get(..10))
        .filter_map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .collect();

    let Some(last) = days.last() else {
        return StreakInfo::default();
    };

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &day in &days {
        run = match previous {
            Some(prev) if prev.checked_add_days(Days::new(1)) == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    let mut cursor = if days.contains(&today) {
        Some(today)
    } else {
        today.checked_sub_days(Days::new(1))
    };
    let mut current = 0;
    while let Some(day) = cursor.filter(|day| days.contains(day)) {
        current += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }

    StreakInfo {
        current_streak: current,
        longest_streak: longest,
        total_days: days.len(),
        last_active: last.format("%Y-%m-%d").to_string(),
    }
}
