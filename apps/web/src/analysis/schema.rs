//! Explicit schema check for the model's answer.
//!
//! The prompt describes the expected JSON, but nothing forces the model to
//! follow it. Every violation is collected (not just the first) so the log
//! shows the whole picture.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;

const STRENGTH_FIELDS: &[&str] = &["title", "description", "relevance"];
const WEAKNESS_FIELDS: &[&str] = &["title", "description", "impact", "severity"];
const SUGGESTION_FIELDS: &[&str] = &["area", "currentIssue", "recommendation", "impact", "priority"];
const HIRING_CHANCE_FIELDS: &[&str] = &["currentChance", "potentialChance", "timeToImprove"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub problem: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

#[derive(Debug, Error)]
#[error("analysis response violates schema ({} violation(s))", .violations.len())]
pub struct SchemaError {
    pub violations: Vec<SchemaViolation>,
}

impl From<SchemaError> for AppError {
    fn from(e: SchemaError) -> Self {
        AppError::Schema(e.violations.iter().map(ToString::to_string).collect())
    }
}

#[derive(Default)]
struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn fail(&mut self, path: impl Into<String>, problem: impl Into<String>) {
        self.violations.push(SchemaViolation {
            path: path.into(),
            problem: problem.into(),
        });
    }

    fn field<'a>(&mut self, obj: &'a Map<String, Value>, path: &str, key: &str) -> Option<&'a Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.fail(join(path, key), "missing");
        }
        value
    }

    fn string(&mut self, obj: &Map<String, Value>, path: &str, key: &str) {
        if let Some(value) = self.field(obj, path, key) {
            if !value.is_string() {
                self.fail(join(path, key), format!("expected string, found {}", kind(value)));
            }
        }
    }

    fn string_array(&mut self, obj: &Map<String, Value>, key: &str) {
        let Some(value) = self.field(obj, "", key) else {
            return;
        };
        let Some(items) = value.as_array() else {
            self.fail(key, format!("expected array, found {}", kind(value)));
            return;
        };
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                self.fail(format!("{key}[{i}]"), format!("expected string, found {}", kind(item)));
            }
        }
    }

    fn object(&mut self, value: &Value, path: &str, fields: &[&str]) {
        let Some(obj) = value.as_object() else {
            self.fail(path, format!("expected object, found {}", kind(value)));
            return;
        };
        for field in fields {
            self.string(obj, path, field);
        }
    }

    fn object_array(&mut self, obj: &Map<String, Value>, key: &str, fields: &[&str]) {
        let Some(value) = self.field(obj, "", key) else {
            return;
        };
        let Some(items) = value.as_array() else {
            self.fail(key, format!("expected array, found {}", kind(value)));
            return;
        };
        for (i, item) in items.iter().enumerate() {
            self.object(item, &format!("{key}[{i}]"), fields);
        }
    }

    fn match_score(&mut self, obj: &Map<String, Value>) {
        let Some(value) = self.field(obj, "", "matchScore") else {
            return;
        };
        match value.as_f64() {
            Some(score) if (0.0..=100.0).contains(&score) => {}
            Some(score) => self.fail("matchScore", format!("{score} is outside 0-100")),
            None => self.fail("matchScore", format!("expected number, found {}", kind(value))),
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validates the model's parsed JSON and converts it into an [`AnalysisResult`].
pub fn validate_result(value: &Value) -> Result<AnalysisResult, SchemaError> {
    let mut checker = Checker::default();

    let Some(obj) = value.as_object() else {
        checker.fail("$", format!("expected object, found {}", kind(value)));
        return Err(SchemaError {
            violations: checker.violations,
        });
    };

    checker.match_score(obj);
    checker.string(obj, "", "matchPercentage");
    checker.object_array(obj, "strengths", STRENGTH_FIELDS);
    checker.object_array(obj, "weaknesses", WEAKNESS_FIELDS);
    checker.string_array(obj, "keywordMissing");
    checker.object_array(obj, "improvementSuggestions", SUGGESTION_FIELDS);
    if let Some(hiring) = checker.field(obj, "", "hiringChanceAnalysis") {
        checker.object(hiring, "hiringChanceAnalysis", HIRING_CHANCE_FIELDS);
    }
    checker.string_array(obj, "resumeOptimizationTips");
    checker.string(obj, "", "competitorAdvantage");
    checker.string_array(obj, "interviewPrep");

    if !checker.violations.is_empty() {
        return Err(SchemaError {
            violations: checker.violations,
        });
    }

    serde_json::from_value(value.clone()).map_err(|e| SchemaError {
        violations: vec![SchemaViolation {
            path: "$".to_string(),
            problem: e.to_string(),
        }],
    })
}
