//! HTML rendering for the two views. Every piece of user or model text goes
//! through `html-escape` before it reaches the page.

use chrono::{DateTime, Utc};
use html_escape::encode_text;
use uuid::Uuid;

use crate::analysis::models::{AnalysisResult, Level};
use crate::ui::{Notice, NoticeKind, View, Workspace};

const STYLE: &str = r#"
body { margin: 0; min-height: 100vh; font-family: system-ui, sans-serif; color: #e2e8f0;
       background: linear-gradient(135deg, #0f172a, #581c87, #0f172a); }
main { max-width: 72rem; margin: 0 auto; padding: 2rem 1rem; }
h1 { font-size: 2.5rem; margin: 0 0 .5rem; color: #fff; }
.subtitle { color: #e9d5ff; margin: 0 0 2rem; }
.tabs { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
.tabs form { margin: 0; }
.tab { padding: .75rem 1.5rem; border: 0; border-radius: .5rem; font-weight: 600;
       background: #334155; color: #e2e8f0; cursor: pointer; }
.tab.active { background: #a855f7; color: #fff; }
.notice { padding: 1rem; border-radius: .5rem; margin-bottom: 1.5rem; }
.notice.error { background: #7f1d1d; color: #fecaca; }
.notice.info { background: #1e3a8a; color: #bfdbfe; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(20rem, 1fr)); gap: 1.5rem; }
.card { background: #1e293b; border: 1px solid #334155; border-radius: .75rem; padding: 1.5rem; }
.card h2, .card h3 { margin-top: 0; color: #fff; }
textarea { width: 100%; height: 16rem; box-sizing: border-box; background: #334155; color: #f1f5f9;
           border: 0; border-radius: .5rem; padding: 1rem; resize: vertical; }
.count { color: #94a3b8; font-size: .75rem; }
.primary { grid-column: 1 / -1; width: 100%; padding: 1rem; border: 0; border-radius: .5rem;
           font-size: 1.1rem; font-weight: 700; color: #fff; cursor: pointer;
           background: linear-gradient(90deg, #9333ea, #2563eb); }
.primary:disabled { background: #475569; color: #94a3b8; cursor: not-allowed; }
.secondary { margin: .5rem 0 1rem; padding: .5rem 1rem; border: 0; border-radius: .5rem;
             background: #475569; color: #fff; cursor: pointer; }
.results { display: flex; flex-direction: column; gap: 1.5rem; }
.banner { border-radius: .75rem; padding: 2rem; color: #fff; }
.score { background: linear-gradient(90deg, #9333ea, #2563eb); display: flex;
         justify-content: space-between; align-items: center; }
.score .big { font-size: 3rem; font-weight: 700; margin: 0; }
.score .circle { width: 6rem; height: 6rem; border-radius: 50%; background: rgba(255,255,255,.2);
                 display: flex; align-items: center; justify-content: center; font-size: 2.25rem; font-weight: 700; }
.growth { background: linear-gradient(90deg, #16a34a, #059669); }
.compete { background: linear-gradient(90deg, #ea580c, #dc2626); }
.item { background: #334155; border-radius: .5rem; padding: 1rem; margin-bottom: 1rem; }
.item.strength { border-left: 4px solid #22c55e; }
.item.weakness { border-left: 4px solid #ef4444; }
.item header { display: flex; justify-content: space-between; align-items: flex-start; }
.badge { padding: .25rem .75rem; border-radius: .25rem; font-size: .75rem; font-weight: 600; }
.badge.high { background: #7f1d1d; color: #fecaca; }
.badge.medium { background: #713f12; color: #fef08a; }
.badge.low { background: #1e3a8a; color: #bfdbfe; }
.badge.minor { background: #14532d; color: #bbf7d0; }
.keywords { display: flex; flex-wrap: wrap; gap: .5rem; }
.keyword { background: #9333ea; color: #fff; padding: .25rem .75rem; border-radius: 999px; font-size: .875rem; }
.muted { color: #94a3b8; font-size: .8rem; }
"#;

/// Renders the full page for a workspace in its current view.
pub fn render_page(session_id: Uuid, workspace: &Workspace, notice: Option<&Notice>) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<title>Resume Job Match Analyzer</title>\n<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n<main>\n");
    out.push_str("<h1>Resume Job Match Analyzer</h1>\n");
    out.push_str(
        "<p class=\"subtitle\">AI-powered recruiter analysis to optimize your job applications</p>\n",
    );

    if let Some(notice) = notice {
        out.push_str(&render_notice(notice));
    }

    out.push_str(&render_tabs(session_id, workspace));

    match (workspace.view(), workspace.analysis()) {
        (View::Results, Some(analysis)) => {
            out.push_str(&render_results(session_id, analysis, workspace.analyzed_at()))
        }
        _ => out.push_str(&render_upload(session_id, workspace)),
    }

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Info => "info",
        NoticeKind::Error => "error",
    };
    format!(
        "<div class=\"notice {class}\" role=\"alert\">{}</div>\n",
        encode_text(&notice.message)
    )
}

fn render_tabs(session_id: Uuid, workspace: &Workspace) -> String {
    let tab = |view: View, label: &str| {
        let value = match view {
            View::Upload => "upload",
            View::Results => "results",
        };
        let active = if workspace.view() == view { " active" } else { "" };
        format!(
            "<form method=\"post\" action=\"/sessions/{session_id}/view\">\
             <button class=\"tab{active}\" name=\"view\" value=\"{value}\">{label}</button></form>"
        )
    };

    let mut out = String::from("<nav class=\"tabs\">");
    out.push_str(&tab(View::Upload, "Upload &amp; Input"));
    if workspace.analysis().is_some() {
        out.push_str(&tab(View::Results, "Analysis Results"));
    }
    out.push_str("</nav>\n");
    out
}

fn render_upload(session_id: Uuid, workspace: &Workspace) -> String {
    let mut out = format!(
        "<form class=\"grid\" method=\"post\" enctype=\"multipart/form-data\" \
         action=\"/sessions/{session_id}/analyze\">\n"
    );

    out.push_str("<section class=\"card\">\n<h2>Your Resume</h2>\n");
    out.push_str("<label for=\"resume_file\">Upload Resume File (TXT/PDF)</label><br>\n");
    out.push_str("<input type=\"file\" id=\"resume_file\" name=\"resume_file\" accept=\".txt,.pdf\">\n");
    out.push_str(&format!(
        "<button type=\"submit\" class=\"secondary\" formaction=\"/sessions/{session_id}/resume\">\
         Load file</button>\n"
    ));
    out.push_str(&format!(
        "<textarea name=\"resume_text\" placeholder=\"Or paste your resume content here...\">{}</textarea>\n",
        encode_text(&workspace.resume_text)
    ));
    out.push_str(&format!(
        "<p class=\"count\">{} characters</p>\n</section>\n",
        workspace.resume_text.chars().count()
    ));

    out.push_str("<section class=\"card\">\n<h2>Job Description</h2>\n");
    out.push_str("<label for=\"job_description\">Paste the Job Description</label>\n");
    out.push_str(&format!(
        "<textarea id=\"job_description\" name=\"job_description\" \
         placeholder=\"Paste the complete job description here...\">{}</textarea>\n",
        encode_text(&workspace.job_description)
    ));
    out.push_str(&format!(
        "<p class=\"count\">{} characters</p>\n</section>\n",
        workspace.job_description.chars().count()
    ));

    if workspace.analysis().is_none() {
        if workspace.is_in_progress() {
            out.push_str("<button type=\"submit\" class=\"primary\" disabled>Analyzing...</button>\n");
        } else {
            out.push_str(
                "<button type=\"submit\" class=\"primary\">\u{1F50D} Analyze Resume vs Job Description</button>\n",
            );
        }
    }

    out.push_str("</form>\n");
    out
}

/// Severity badge: upper-cased, blue for anything below medium.
fn severity_badge(level: &Level) -> String {
    let class = match level {
        Level::High => "high",
        Level::Medium => "medium",
        Level::Low | Level::Unknown(_) => "low",
    };
    format!(
        "<span class=\"badge {class}\">{}</span>",
        encode_text(&level.to_string().to_uppercase())
    )
}

/// Priority badge: shown as given, green for anything below medium.
fn priority_badge(level: &Level) -> String {
    let class = match level {
        Level::High => "high",
        Level::Medium => "medium",
        Level::Low | Level::Unknown(_) => "minor",
    };
    format!(
        "<span class=\"badge {class}\">{}</span>",
        encode_text(&level.to_string())
    )
}

fn render_results(
    session_id: Uuid,
    analysis: &AnalysisResult,
    analyzed_at: Option<DateTime<Utc>>,
) -> String {
    let hiring = &analysis.hiring_chance_analysis;
    let mut out = String::from("<div class=\"results\">\n");

    out.push_str(&format!(
        "<section class=\"banner score\"><div><p>Overall Match Score</p>\
         <p class=\"big\">{}</p><p>Current hiring chance: {}</p>{}</div>\
         <div class=\"circle\">{}</div></section>\n",
        encode_text(&analysis.match_percentage),
        encode_text(&hiring.current_chance),
        analyzed_at
            .map(|at| format!(
                "<p class=\"muted\">Analyzed {}</p>",
                at.format("%Y-%m-%d %H:%M UTC")
            ))
            .unwrap_or_default(),
        analysis.match_score
    ));

    out.push_str(&format!(
        "<section class=\"banner growth\"><h3>\u{1F680} Growth Potential</h3>\
         <p>With improvements, you can reach: <strong>{}</strong></p>\
         <p>Estimated time: {}</p></section>\n",
        encode_text(&hiring.potential_chance),
        encode_text(&hiring.time_to_improve)
    ));

    out.push_str("<section class=\"card\"><h3>Your Strengths</h3>\n");
    for strength in &analysis.strengths {
        out.push_str(&format!(
            "<div class=\"item strength\"><h4>{}</h4><p>{}</p><p class=\"muted\">\u{2713} {}</p></div>\n",
            encode_text(&strength.title),
            encode_text(&strength.description),
            encode_text(&strength.relevance)
        ));
    }
    out.push_str("</section>\n");

    out.push_str("<section class=\"card\"><h3>Areas for Improvement</h3>\n");
    for weakness in &analysis.weaknesses {
        out.push_str(&format!(
            "<div class=\"item weakness\"><header><h4>{}</h4>{}</header><p>{}</p>\
             <p class=\"muted\">Impact: {}</p></div>\n",
            encode_text(&weakness.title),
            severity_badge(&weakness.severity),
            encode_text(&weakness.description),
            encode_text(&weakness.impact)
        ));
    }
    out.push_str("</section>\n");

    out.push_str("<section class=\"card\"><h3>Improvement Recommendations</h3>\n");
    for suggestion in &analysis.improvement_suggestions {
        out.push_str(&format!(
            "<div class=\"item\"><header><h4>{}</h4>{}</header>\
             <p><strong>Current Issue:</strong> {}</p>\
             <p><strong>Action:</strong> {}</p>\
             <p class=\"muted\"><strong>Expected Impact:</strong> {}</p></div>\n",
            encode_text(&suggestion.area),
            priority_badge(&suggestion.priority),
            encode_text(&suggestion.current_issue),
            encode_text(&suggestion.recommendation),
            encode_text(&suggestion.impact)
        ));
    }
    out.push_str("</section>\n");

    out.push_str("<section class=\"card\"><h3>Keywords to Add</h3><div class=\"keywords\">");
    for keyword in &analysis.keyword_missing {
        out.push_str(&format!(
            "<span class=\"keyword\">{}</span>",
            encode_text(keyword)
        ));
    }
    out.push_str("</div></section>\n");

    out.push_str("<section class=\"card\"><h3>Resume Optimization Tips</h3><ol>\n");
    for tip in &analysis.resume_optimization_tips {
        out.push_str(&format!("<li>{}</li>\n", encode_text(tip)));
    }
    out.push_str("</ol></section>\n");

    out.push_str(&format!(
        "<section class=\"banner compete\"><h3>\u{1F3C6} Stand Out from Competitors</h3><p>{}</p></section>\n",
        encode_text(&analysis.competitor_advantage)
    ));

    out.push_str("<section class=\"card\"><h3>Interview Preparation</h3>\n");
    for (idx, question) in analysis.interview_prep.iter().enumerate() {
        out.push_str(&format!(
            "<div class=\"item\"><p><strong>Q{}:</strong> {}</p></div>\n",
            idx + 1,
            encode_text(question)
        ));
    }
    out.push_str("</section>\n");

    out.push_str(&format!(
        "<form method=\"post\" action=\"/sessions/{session_id}/reset\">\
         <button type=\"submit\" class=\"primary\">Analyze Another Position</button></form>\n"
    ));

    out.push_str("</div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::sample_result;
    use crate::errors::AppError;

    fn id() -> Uuid {
        Uuid::nil()
    }

    #[test]
    fn test_upload_view_without_analysis() {
        let ws = Workspace::default();
        let html = render_page(id(), &ws, None);
        assert!(html.contains("Upload &amp; Input"));
        assert!(!html.contains("Analysis Results"));
        assert!(html.contains("Analyze Resume vs Job Description"));
        assert!(html.contains("accept=\".txt,.pdf\""));
        assert!(html.contains("0 characters"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut ws = Workspace::default();
        ws.resume_text = "<script>alert(1)</script>".to_string();
        let html = render_page(id(), &ws, None);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_character_counts() {
        let mut ws = Workspace::default();
        ws.resume_text = "héllo".to_string();
        ws.job_description = "Rust engineer".to_string();
        let html = render_page(id(), &ws, None);
        assert!(html.contains("5 characters"));
        assert!(html.contains("13 characters"));
    }

    #[test]
    fn test_busy_button_disabled() {
        let ws = Workspace::default();
        let _guard = ws.begin_analysis();
        let html = render_page(id(), &ws, None);
        assert!(html.contains("disabled>Analyzing...</button>"));
    }

    #[test]
    fn test_notice_rendered() {
        let ws = Workspace::default();
        let notice = Notice::error(AppError::Analysis("boom".into()).user_message());
        let html = render_page(id(), &ws, Some(&notice));
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("Analysis failed."));
        assert!(!html.contains("boom"));
    }

    #[test]
    fn test_results_view_sections() {
        let mut ws = Workspace::default();
        ws.complete_analysis(sample_result());
        let html = render_page(id(), &ws, None);
        assert!(html.contains("tab active\" name=\"view\" value=\"results\""));
        assert!(html.contains("<p class=\"big\">72%</p>"));
        assert!(html.contains("<div class=\"circle\">72</div>"));
        assert!(html.contains("Current hiring chance: 40%"));
        assert!(html.contains("<strong>65%</strong>"));
        assert!(html.contains("<span class=\"badge high\">HIGH</span>"));
        assert!(html.contains("<span class=\"badge medium\">medium</span>"));
        assert!(html.contains("Analyzed "));
        assert!(html.contains("<span class=\"keyword\">gRPC</span>"));
        assert!(html.contains("<li>Lead with outcomes</li>"));
        assert!(html.contains("<strong>Q1:</strong> Describe a production incident"));
        assert!(html.contains("Analyze Another Position"));
        assert!(!html.contains("Analyze Resume vs Job Description"));
    }

    #[test]
    fn test_upload_view_with_analysis_hides_analyze_button() {
        let mut ws = Workspace::default();
        ws.complete_analysis(sample_result());
        ws.show(View::Upload);
        let html = render_page(id(), &ws, None);
        assert!(html.contains("Analysis Results"));
        assert!(!html.contains("Analyze Resume vs Job Description"));
    }

    #[test]
    fn test_low_priority_and_low_severity_badges_differ() {
        let mut result = sample_result();
        result.weaknesses[0].severity = Level::Low;
        result.improvement_suggestions[0].priority = Level::Low;
        let mut ws = Workspace::default();
        ws.complete_analysis(result);
        let html = render_page(id(), &ws, None);
        assert!(html.contains("<span class=\"badge low\">LOW</span>"));
        assert!(html.contains("<span class=\"badge minor\">low</span>"));
    }

    #[test]
    fn test_fractional_score_shown_as_given() {
        let mut result = sample_result();
        result.match_score = 72.5;
        let mut ws = Workspace::default();
        ws.complete_analysis(result);
        let html = render_page(id(), &ws, None);
        assert!(html.contains("<div class=\"circle\">72.5</div>"));
    }

    #[test]
    fn test_results_banner_shows_analysis_time() {
        let mut ws = Workspace::default();
        ws.complete_analysis(sample_result());
        let at = ws.analyzed_at().unwrap();
        let html = render_page(id(), &ws, None);
        assert!(html.contains(&format!(
            "<p class=\"muted\">Analyzed {}</p>",
            at.format("%Y-%m-%d %H:%M UTC")
        )));
    }
}
