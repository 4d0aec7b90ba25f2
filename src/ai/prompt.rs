//! Prompt construction for profile comparisons.

use chrono::{DateTime, Utc};

use crate::models::GitHubUser;

/// Fixed system instruction sent ahead of every comparison.
pub const SYSTEM_PROMPT: &str = "You are a concise GitHub profile analyst. Provide brief, \
actionable insights. Use bullet points. Keep total response under 200 words.";

/// Builds the user message comparing `users`, one block per profile.
pub fn build_comparison_prompt(users: &[GitHubUser]) -> String {
    build_prompt_at(users, Utc::now())
}

fn build_prompt_at(users: &[GitHubUser], now: DateTime<Utc>) -> String {
    let mut prompt = String::from("Compare these GitHub developers briefly:\n\n");

    for (i, user) in users.iter().enumerate() {
        prompt.push_str(&format!("**{}** (@{})\n", user.display_name(), user.login));
        prompt.push_str(&format!(
            "• {} repos | {} followers | {:.1}x ratio | {} yrs\n",
            user.public_repos,
            user.followers,
            follower_ratio(user),
            account_years(&user.created_at, now),
        ));
        if let Some(company) = user.company.as_deref().filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&format!("• Company: {company}\n"));
        }
        if i + 1 < users.len() {
            prompt.push('\n');
        }
    }

    prompt.push_str("\nProvide:\n");
    prompt.push_str("1. **Winner**: Who has the strongest profile and why (1 sentence)\n");
    prompt.push_str("2. **Key Differences**: 2-3 bullet points\n");
    prompt.push_str("3. **Tip**: One actionable suggestion for each developer");
    prompt
}

/// Followers per followed account; following is floored at one.
fn follower_ratio(user: &GitHubUser) -> f64 {
    f64::from(user.followers) / f64::from(user.following.max(1))
}

/// Whole years since `created_at`, or 0 if it isn't RFC 3339.
fn account_years(created_at: &str, now: DateTime<Utc>) -> i64 {
    DateTime::parse_from_rfc3339(created_at)
        .map(|created| (now - created.with_timezone(&Utc)).num_days() / 365)
        .map(|years| years.max(0))
        .unwrap_or(0)
}
