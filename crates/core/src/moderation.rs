//! Content reports: reasons, targets and the RPC argument shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTarget {
    Post,
    Comment,
    User,
}

impl ReportTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportTarget::Post => "post",
            ReportTarget::Comment => "comment",
            ReportTarget::User => "user",
        }
    }
}

impl fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportReason {
    Spam,
    Offensive,
    Rules,
    Other(String),
}

impl ReportReason {
    /// Build from the radio value plus the free-text box used by `other`.
    pub fn parse(kind: &str, custom: Option<&str>) -> Result<Self, CoreError> {
        match kind {
            "spam" => Ok(ReportReason::Spam),
            "offensive" => Ok(ReportReason::Offensive),
            "rules" => Ok(ReportReason::Rules),
            "other" => {
                let text = custom.map(str::trim).unwrap_or_default();
                if text.is_empty() {
                    return Err(CoreError::invalid(
                        "customReason",
                        "a description is required when the reason is other",
                    ));
                }
                Ok(ReportReason::Other(text.to_string()))
            }
            other => Err(CoreError::invalid(
                "reason",
                format!("unknown report reason: {other}"),
            )),
        }
    }

    /// Value stored in `p_reason`.
    pub fn as_param(&self) -> &str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::Offensive => "offensive",
            ReportReason::Rules => "rules",
            ReportReason::Other(text) => text,
        }
    }
}

/// Body accepted by `POST /v1/reports`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub target_type: ReportTarget,
    pub target_id: String,
    pub community_id: String,
    pub reason: String,
    #[serde(default)]
    pub custom_reason: Option<String>,
}

/// Arguments for `create_report_secure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub user_email: String,
    pub target_type: ReportTarget,
    pub target_id: String,
    pub community_id: String,
    pub reason: ReportReason,
}

impl ReportRequest {
    pub fn from_new(user_email: &str, report: NewReport) -> Result<Self, CoreError> {
        if report.target_id.trim().is_empty() {
            return Err(CoreError::invalid("targetId", "target id is required"));
        }
        if report.community_id.trim().is_empty() {
            return Err(CoreError::invalid("communityId", "community id is required"));
        }
        let reason = ReportReason::parse(&report.reason, report.custom_reason.as_deref())?;
        Ok(Self {
            user_email: user_email.to_string(),
            target_type: report.target_type,
            target_id: report.target_id,
            community_id: report.community_id,
            reason,
        })
    }

    pub fn post_id(&self) -> Option<&str> {
        (self.target_type == ReportTarget::Post).then_some(self.target_id.as_str())
    }

    pub fn comment_id(&self) -> Option<&str> {
        (self.target_type == ReportTarget::Comment).then_some(self.target_id.as_str())
    }
}

/// JSON object returned by `create_report_secure`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReportOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ReportOutcome {
    pub fn failure_message(&self) -> Option<String> {
        if self.success {
            return None;
        }
        Some(
            self.error
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "Failed to submit report. Please try again.".to_string()),
        )
    }
}
