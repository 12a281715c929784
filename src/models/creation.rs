use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// What the persistence service should do when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    Check,
    Overwrite,
    Version,
    Reject,
}

impl ConflictAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictAction::Check => "check",
            ConflictAction::Overwrite => "overwrite",
            ConflictAction::Version => "version",
            ConflictAction::Reject => "reject",
        }
    }
}

impl fmt::Display for ConflictAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "check" => Ok(ConflictAction::Check),
            "overwrite" => Ok(ConflictAction::Overwrite),
            "version" => Ok(ConflictAction::Version),
            "reject" => Ok(ConflictAction::Reject),
            _ => Err(AppError::Validation("Invalid action".into())),
        }
    }
}

/// Body of `POST /create-file` as the client sent it.
///
/// Every field is optional here so that a missing field is reported through
/// the gateway's own validation instead of a deserializer error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationRequest {
    pub top_folder: Option<String>,
    pub sub_folder: Option<String>,
    pub filename: Option<String>,
    pub content: Option<String>,
    pub action: Option<String>,
}

/// A request that passed local validation and may be forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedCreation {
    pub top_folder: String,
    pub sub_folder: String,
    pub filename: String,
    pub content: String,
    pub action: ConflictAction,
}

impl ValidatedCreation {
    pub fn target_path(&self) -> String {
        format!("{}/{}/{}", self.top_folder, self.sub_folder, self.filename)
    }
}

impl CreationRequest {
    pub fn validate(self) -> Result<ValidatedCreation, AppError> {
        let (Some(top_folder), Some(sub_folder), Some(filename), Some(content)) = (
            non_empty(self.top_folder),
            non_empty(self.sub_folder),
            non_empty(self.filename),
            non_empty(self.content),
        ) else {
            return Err(AppError::Validation("Missing required fields".into()));
        };

        let action = self
            .action
            .as_deref()
            .ok_or_else(|| AppError::Validation("Invalid action".into()))?
            .parse::<ConflictAction>()?;

        for (field, segment) in [
            ("topFolder", &top_folder),
            ("subFolder", &sub_folder),
            ("filename", &filename),
        ] {
            ensure_path_segment(field, segment)?;
        }

        Ok(ValidatedCreation {
            top_folder,
            sub_folder,
            filename,
            content,
            action,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn ensure_path_segment(field: &str, segment: &str) -> Result<(), AppError> {
    if segment == "." || segment == ".." || segment.contains(['/', '\\']) {
        return Err(AppError::Validation(format!(
            "{field} must be a single path segment"
        )));
    }
    Ok(())
}

/// Outcome reported by the persistence service for a forwarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationResult {
    /// The target exists and nothing was written.
    Exists { path: Option<String> },
    Written { path: String },
    Failed { error: String },
}

impl CreationResult {
    /// Classifies a persistence-service body. Returns `None` when the body
    /// matches none of the result shapes.
    pub fn from_body(body: &Value) -> Option<Self> {
        let exists = body.get("exists").and_then(Value::as_bool);
        let success = body.get("success").and_then(Value::as_bool);
        let path = body.get("path").and_then(Value::as_str).map(str::to_string);

        match (exists, success) {
            (Some(true), None) => Some(CreationResult::Exists { path }),
            (Some(true), Some(_)) => None,
            (_, Some(true)) => path.map(|path| CreationResult::Written { path }),
            (_, Some(false)) => {
                let error = body
                    .get("error")
                    .or_else(|| body.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("operation failed")
                    .to_string();
                Some(CreationResult::Failed { error })
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CreationResult::Exists { .. } => "exists",
            CreationResult::Written { .. } => "written",
            CreationResult::Failed { .. } => "failed",
        }
    }
}
