//! Validation profile: which sections an outline must carry, and in what
//! order.
//!
//! # Invariants
//! - The default profile is the paper layout from `model::document`.
//! - Profiles loaded from JSON reject unknown fields.

use crate::model::document::{CONCLUSION, FUTURE_WORK, PAPER_SECTIONS};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Placement rule for a section that may nest under a parent or stand alone
/// after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrailingSectionRule {
    pub title: String,
    pub parent: String,
}

/// Structure requirements applied by `validate_with`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationProfile {
    /// Sections required under the title, in narrative order.
    pub required_sections: Vec<String>,
    pub future_work: Option<TrailingSectionRule>,
    /// Require exactly one level-1 title section.
    pub require_single_title: bool,
}

impl Default for ValidationProfile {
    fn default() -> Self {
        Self {
            required_sections: PAPER_SECTIONS.iter().map(|s| s.to_string()).collect(),
            future_work: Some(TrailingSectionRule {
                title: FUTURE_WORK.to_string(),
                parent: CONCLUSION.to_string(),
            }),
            require_single_title: true,
        }
    }
}

impl ValidationProfile {
    /// Profile with structural checks only.
    pub fn structural() -> Self {
        Self {
            required_sections: Vec::new(),
            future_work: None,
            require_single_title: false,
        }
    }

    /// Parses a profile from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(text).map_err(ProfileError::Json)?;
        profile.check()?;
        Ok(profile)
    }

    /// Loads a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_json(&text)?;
        info!(
            "event=profile_load module=validate status=ok path={} required={}",
            path.display(),
            profile.required_sections.len()
        );
        Ok(profile)
    }

    fn check(&self) -> Result<(), ProfileError> {
        if let Some(blank) = self.required_sections.iter().find(|s| s.trim().is_empty()) {
            return Err(ProfileError::Invalid(format!(
                "required section names must not be blank, got `{blank}`"
            )));
        }
        if let Some(rule) = &self.future_work {
            if rule.title.trim().is_empty() || rule.parent.trim().is_empty() {
                return Err(ProfileError::Invalid(
                    "future_work title and parent must not be blank".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Profile loading failure.
#[derive(Debug)]
pub enum ProfileError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Invalid(String),
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read profile `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid profile json: {err}"),
            Self::Invalid(message) => write!(f, "invalid profile: {message}"),
        }
    }
}

impl Error for ProfileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProfileError, ValidationProfile};

    #[test]
    fn default_profile_lists_paper_sections() {
        let profile = ValidationProfile::default();
        assert_eq!(profile.required_sections.len(), 6);
        assert_eq!(profile.required_sections[0], "Abstract");
        assert!(profile.require_single_title);
    }

    #[test]
    fn json_profile_fills_missing_fields_from_default() {
        let profile =
            ValidationProfile::from_json(r#"{"required_sections": ["Summary"]}"#).unwrap();
        assert_eq!(profile.required_sections, vec!["Summary".to_string()]);
        assert!(profile.future_work.is_some());
    }

    #[test]
    fn json_profile_rejects_unknown_fields_and_blank_names() {
        let err = ValidationProfile::from_json(r#"{"sections": []}"#).unwrap_err();
        assert!(matches!(err, ProfileError::Json(_)));
        let err = ValidationProfile::from_json(r#"{"required_sections": [" "]}"#).unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }
}
