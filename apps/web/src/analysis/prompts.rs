// Prompt for the resume vs job description analysis.
// Reuses the JSON-only closing instruction from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub const ANALYSIS_PREAMBLE: &str = "You are an expert recruiter and career coach. \
Analyze the following resume against the job description and provide a detailed analysis in JSON format.";

/// The response schema, exactly as the model is asked to return it.
pub const ANALYSIS_SCHEMA: &str = r#"Please provide analysis in this exact JSON structure:
{
  "matchScore": (0-100),
  "matchPercentage": "X%",
  "strengths": [
    {
      "title": "skill/experience name",
      "description": "why this is a strength",
      "relevance": "how it matches the job"
    }
  ],
  "weaknesses": [
    {
      "title": "missing skill/experience",
      "description": "why it's a weakness",
      "impact": "how critical is this for the role",
      "severity": "high/medium/low"
    }
  ],
  "keywordMissing": ["keyword1", "keyword2"],
  "improvementSuggestions": [
    {
      "area": "section name",
      "currentIssue": "what's missing or weak",
      "recommendation": "specific action to take",
      "impact": "expected benefit",
      "priority": "high/medium/low"
    }
  ],
  "hiringChanceAnalysis": {
    "currentChance": "X%",
    "potentialChance": "Y%",
    "timeToImprove": "estimated time"
  },
  "resumeOptimizationTips": [
    "tip 1",
    "tip 2"
  ],
  "competitorAdvantage": "What would make you stand out from other candidates",
  "interviewPrep": [
    "question you should prepare for",
    "another question"
  ]
}"#;

/// Builds the single instruction string sent to the model.
/// Both texts are embedded verbatim.
pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "{ANALYSIS_PREAMBLE}\n\nRESUME:\n{resume_text}\n\nJOB DESCRIPTION:\n{job_description}\n\n\
         {ANALYSIS_SCHEMA}\n\n{JSON_ONLY_INSTRUCTION}"
    )
}
