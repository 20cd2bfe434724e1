use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Severity / priority label. The model is asked for "high/medium/low" but is
/// not bound to it, so anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    High,
    Medium,
    Low,
    Unknown(String),
}

impl From<String> for Level {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Level::High,
            "medium" => Level::Medium,
            "low" => Level::Low,
            _ => Level::Unknown(raw),
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::High => f.write_str("high"),
            Level::Medium => f.write_str("medium"),
            Level::Low => f.write_str("low"),
            Level::Unknown(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strength {
    pub title: String,
    pub description: String,
    pub relevance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weakness {
    pub title: String,
    pub description: String,
    pub impact: String,
    pub severity: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementSuggestion {
    pub area: String,
    pub current_issue: String,
    pub recommendation: String,
    pub impact: String,
    pub priority: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiringChanceAnalysis {
    pub current_chance: String,
    pub potential_chance: String,
    pub time_to_improve: String,
}

/// Structured assessment returned by the model. Displayed, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0 – 100
    pub match_score: f64,
    /// e.g. "72%"
    pub match_percentage: String,
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Weakness>,
    pub keyword_missing: Vec<String>,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    pub hiring_chance_analysis: HiringChanceAnalysis,
    pub resume_optimization_tips: Vec<String>,
    pub competitor_advantage: String,
    pub interview_prep: Vec<String>,
}

/// Input to one analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
}

impl AnalysisRequest {
    /// Both texts must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.resume_text.trim().is_empty() || self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Please provide both resume and job description".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_result() -> AnalysisResult {
    AnalysisResult {
        match_score: 72.0,
        match_percentage: "72%".to_string(),
        strengths: vec![Strength {
            title: "Rust".to_string(),
            description: "Five years of production Rust".to_string(),
            relevance: "Core language for the role".to_string(),
        }],
        weaknesses: vec![Weakness {
            title: "Kubernetes".to_string(),
            description: "No orchestration experience listed".to_string(),
            impact: "Listed as required".to_string(),
            severity: Level::High,
        }],
        keyword_missing: vec!["Kubernetes".to_string(), "gRPC".to_string()],
        improvement_suggestions: vec![ImprovementSuggestion {
            area: "Experience".to_string(),
            current_issue: "Impact not quantified".to_string(),
            recommendation: "Add latency and throughput numbers".to_string(),
            impact: "Stronger evidence of seniority".to_string(),
            priority: Level::Medium,
        }],
        hiring_chance_analysis: HiringChanceAnalysis {
            current_chance: "40%".to_string(),
            potential_chance: "65%".to_string(),
            time_to_improve: "2-4 weeks".to_string(),
        },
        resume_optimization_tips: vec!["Lead with outcomes".to_string()],
        competitor_advantage: "Open-source maintainer experience".to_string(),
        interview_prep: vec!["Describe a production incident you resolved".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsed_case_insensitively() {
        assert_eq!(Level::from("HIGH".to_string()), Level::High);
        assert_eq!(Level::from(" Medium ".to_string()), Level::Medium);
        assert_eq!(Level::from("low".to_string()), Level::Low);
    }

    #[test]
    fn test_unknown_level_kept_verbatim() {
        let level = Level::from("critical".to_string());
        assert_eq!(level, Level::Unknown("critical".to_string()));
        assert_eq!(level.to_string(), "critical");
    }

    #[test]
    fn test_request_requires_both_texts() {
        let request = AnalysisRequest {
            resume_text: "Jane Doe".to_string(),
            job_description: " \n\t".to_string(),
        };
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));

        let request = AnalysisRequest {
            resume_text: String::new(),
            job_description: "Rust engineer".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_with_both_texts_is_valid() {
        let request = AnalysisRequest {
            resume_text: "Jane Doe".to_string(),
            job_description: "Rust engineer".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let value = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(value["matchScore"], 72.0);
        assert_eq!(value["hiringChanceAnalysis"]["timeToImprove"], "2-4 weeks");
        assert_eq!(value["weaknesses"][0]["severity"], "high");
        assert_eq!(value["improvementSuggestions"][0]["currentIssue"], "Impact not quantified");
    }
}
