//! Poll lifetime, vote planning and tallies.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_POLL_DURATION_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollMetadata {
    pub poll_duration_days: Option<i64>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollOption {
    pub id: String,
    pub option_text: String,
    pub vote_count: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    #[error("This poll has ended")]
    Ended,
    #[error("Invalid option selected")]
    UnknownOption,
    #[error("You have already voted in this poll")]
    AlreadyVoted,
    #[error("No poll options found")]
    NoOptions,
}

/// When voting closes. An explicit, parseable `end_date` wins; otherwise
/// `created_at` plus the configured (or default 7) days.
pub fn end_date(created_at: DateTime<Utc>, metadata: &PollMetadata) -> DateTime<Utc> {
    if let Some(explicit) = metadata.end_date.as_deref().and_then(parse_timestamp) {
        return explicit;
    }
    let days = metadata
        .poll_duration_days
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_POLL_DURATION_DAYS);
    created_at + Duration::days(days)
}

pub fn is_ended(created_at: DateTime<Utc>, metadata: &PollMetadata, now: DateTime<Utc>) -> bool {
    end_date(created_at, metadata) < now
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// What a vote request turns into given the caller's existing vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteAction {
    /// Same option as before, nothing to write.
    Unchanged,
    Cast { option_id: String },
    Change { from: String, to: String },
}

pub fn plan_vote(
    options: &[PollOption],
    current: Option<&str>,
    chosen: &str,
    ended: bool,
) -> Result<VoteAction, PollError> {
    if ended {
        return Err(PollError::Ended);
    }
    if options.is_empty() {
        return Err(PollError::NoOptions);
    }
    if !options.iter().any(|o| o.id == chosen) {
        return Err(PollError::UnknownOption);
    }
    match current {
        Some(previous) if previous == chosen => Ok(VoteAction::Unchanged),
        Some(previous) => {
            if !options.iter().any(|o| o.id == previous) {
                return Err(PollError::UnknownOption);
            }
            Ok(VoteAction::Change {
                from: previous.to_string(),
                to: chosen.to_string(),
            })
        }
        None => Ok(VoteAction::Cast {
            option_id: chosen.to_string(),
        }),
    }
}

/// Apply a vote action to in-memory counts. Old counts never go below 0.
pub fn apply_vote(options: &mut [PollOption], action: &VoteAction) {
    match action {
        VoteAction::Unchanged => {}
        VoteAction::Cast { option_id } => {
            if let Some(o) = options.iter_mut().find(|o| &o.id == option_id) {
                o.vote_count += 1;
            }
        }
        VoteAction::Change { from, to } => {
            for o in options.iter_mut() {
                if &o.id == from {
                    o.vote_count = (o.vote_count - 1).max(0);
                } else if &o.id == to {
                    o.vote_count += 1;
                }
            }
        }
    }
}

pub fn total_votes(options: &[PollOption]) -> i64 {
    options.iter().map(|o| o.vote_count).sum()
}

/// Rounded share of the total, 0 when nobody has voted.
pub fn percentage(count: i64, total: i64) -> u32 {
    if total <= 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionView {
    pub id: String,
    pub text: String,
    pub votes: i64,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollSummary {
    pub options: Vec<PollOptionView>,
    pub total_votes: i64,
    pub end_date: DateTime<Utc>,
    pub ended: bool,
    pub user_vote: Option<String>,
}

impl PollSummary {
    pub fn build(
        options: &[PollOption],
        created_at: DateTime<Utc>,
        metadata: &PollMetadata,
        user_vote: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let total = total_votes(options);
        let end = end_date(created_at, metadata);
        Self {
            options: options
                .iter()
                .map(|o| PollOptionView {
                    id: o.id.clone(),
                    text: o.option_text.clone(),
                    votes: o.vote_count,
                    percentage: percentage(o.vote_count, total),
                })
                .collect(),
            total_votes: total,
            end_date: end,
            ended: end < now,
            user_vote,
        }
    }
}
