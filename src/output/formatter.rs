//! Output formatters: console, JSON, Markdown and HTML

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{AtsTailorError, Result};
use crate::output::report::{ScoreReport, Verdict};
use crate::processing::matcher::{EvidenceRef, MatchResult, MatchStatus};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    max_suggestions: usize,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    max_suggestions: usize,
}

pub struct HtmlFormatter {
    include_styles: bool,
    max_suggestions: usize,
}

/// Routes a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

fn evidence_label(result: &MatchResult) -> String {
    match result.evidence() {
        Some(EvidenceRef::Bullet(i)) => format!("bullet {}", i + 1),
        Some(EvidenceRef::SkillsSection) => "skills section".to_string(),
        None => "-".to_string(),
    }
}

fn requirement_kind(result: &MatchResult) -> &'static str {
    if result.must_have {
        "required"
    } else {
        "preferred"
    }
}

fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool, max_suggestions: usize) -> Self {
        Self {
            use_colors,
            detailed,
            max_suggestions,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, verdict: Verdict) -> String {
        let (badge, color) = match verdict {
            Verdict::Strong => ("STRONG", Color::Green),
            Verdict::Good => ("GOOD", Color::Yellow),
            Verdict::Gaps => ("GAPS", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_status(&self, status: MatchStatus) -> String {
        let color = match status {
            MatchStatus::Present => Color::Green,
            MatchStatus::Weak => Color::Yellow,
            MatchStatus::Missing => Color::Red,
        };
        self.colorize(&format!("{:<8}", status.to_string()), color)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let breakdown = &report.breakdown;
        let mut output = String::new();

        output.push_str(&self.format_header("ATS MATCH SCORE", 1));
        output.push_str(&format!(
            "Generated: {} | Backend: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.backend,
            report.metadata.processing_time_ms
        ));
        if !breakdown.job_title.is_empty() || !breakdown.resume_title.is_empty() {
            output.push_str(&format!(
                "Target role: {} | Resume title: {}\n",
                breakdown.job_title, breakdown.resume_title
            ));
        }

        output.push_str(&format!(
            "\nScore: {}/100 {}\n",
            self.colorize(&breakdown.total.to_string(), Color::Cyan),
            self.format_score_badge(report.verdict)
        ));
        for note in &report.notes {
            output.push_str(&format!("  • {}\n", note));
        }

        output.push_str(&self.format_header("Components", 2));
        for (component, score) in breakdown.components.iter() {
            output.push_str(&format!(
                "{:<18} {:>4}  x {:.2} = {:>5.1} pts\n",
                component.label(),
                percent(score.score),
                score.weight,
                score.contribution
            ));
            if self.detailed {
                output.push_str(&format!("    {}\n", score.detail.summary));
                if !score.detail.unmatched.is_empty() {
                    output.push_str(&format!(
                        "    {}\n",
                        self.colorize(&score.detail.unmatched.join("; "), Color::BrightBlack)
                    ));
                }
            }
        }

        if self.detailed && !breakdown.matches.is_empty() {
            output.push_str(&self.format_header("Requirements", 2));
            for result in &breakdown.matches {
                output.push_str(&format!(
                    "{} {:<22} {:>5.2}  {:<9} {}{}\n",
                    self.format_status(result.status),
                    result.skill,
                    result.similarity,
                    requirement_kind(result),
                    evidence_label(result),
                    if result.explicit { "" } else { " (not named)" }
                ));
            }
        }

        if !breakdown.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 2));
            for (i, suggestion) in breakdown
                .suggestions
                .iter()
                .take(self.max_suggestions)
                .enumerate()
            {
                output.push_str(&format!(
                    "{}. {} {} ({} {})\n",
                    i + 1,
                    self.colorize(&format!("+{:.1}", suggestion.estimated_delta), Color::Green),
                    suggestion.skill,
                    suggestion.status,
                    if suggestion.must_have { "required" } else { "preferred" }
                ));
                if let Some(text) = &suggestion.evidence_text {
                    output.push_str(&format!("   Closest bullet: {}\n", text));
                }
            }
        }

        if let Some(insertion) = &breakdown.skill_insertion {
            output.push_str(&self.format_header("Skills to Add", 2));
            output.push_str(&format!(
                "Add: {}\nUpdated skills: {}\n",
                self.colorize(&insertion.skills.join(", "), Color::Yellow),
                insertion.updated
            ));
        }

        if !report.prompts.is_empty() || report.summary_prompt.is_some() {
            output.push_str(&self.format_header("Rewrite Prompts", 3));
            for prompt in &report.prompts {
                output.push_str(&format!("--- {} ---\n{}\n\n", prompt.skill, prompt.prompt));
            }
            if let Some(prompt) = &report.summary_prompt {
                output.push_str(&format!("--- Summary ---\n{}\n\n", prompt));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, max_suggestions: usize) -> Self {
        Self {
            include_metadata,
            max_suggestions,
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let breakdown = &report.breakdown;
        let mut md = String::new();

        md.push_str("# ATS Match Score\n\n");
        md.push_str(&format!("**Score: {}/100**\n\n", breakdown.total));
        for note in &report.notes {
            md.push_str(&format!("- {}\n", note));
        }

        md.push_str("\n## Components\n\n");
        md.push_str("| Component | Score | Weight | Points | Detail |\n");
        md.push_str("|-----------|------:|-------:|-------:|--------|\n");
        for (component, score) in breakdown.components.iter() {
            md.push_str(&format!(
                "| {} | {} | {:.2} | {:.1} | {} |\n",
                component.label(),
                percent(score.score),
                score.weight,
                score.contribution,
                score.detail.summary.replace('|', "\\|")
            ));
        }

        if !breakdown.matches.is_empty() {
            md.push_str("\n## Requirements\n\n");
            md.push_str("| Skill | Status | Similarity | Kind | Evidence | Named |\n");
            md.push_str("|-------|--------|-----------:|------|----------|:-----:|\n");
            for result in &breakdown.matches {
                md.push_str(&format!(
                    "| {} | {} | {:.2} | {} | {} | {} |\n",
                    result.skill.replace('|', "\\|"),
                    result.status,
                    result.similarity,
                    requirement_kind(result),
                    evidence_label(result),
                    if result.explicit { "yes" } else { "no" }
                ));
            }
        }

        if !breakdown.suggestions.is_empty() {
            md.push_str("\n## Suggestions\n\n");
            for (i, suggestion) in breakdown
                .suggestions
                .iter()
                .take(self.max_suggestions)
                .enumerate()
            {
                md.push_str(&format!(
                    "{}. **{}** (+{:.1} pts, {})\n",
                    i + 1,
                    suggestion.skill,
                    suggestion.estimated_delta,
                    suggestion.status
                ));
                if let Some(text) = &suggestion.evidence_text {
                    md.push_str(&format!("   - Closest bullet: _{}_\n", text));
                }
            }
        }

        if let Some(insertion) = &breakdown.skill_insertion {
            md.push_str("\n## Skills to Add\n\n");
            for skill in &insertion.skills {
                md.push_str(&format!("- {}\n", skill));
            }
            md.push_str(&format!("\nUpdated skills line:\n\n```text\n{}\n```\n", insertion.updated));
        }

        if !report.prompts.is_empty() || report.summary_prompt.is_some() {
            md.push_str("\n## Rewrite Prompts\n");
            for prompt in &report.prompts {
                md.push_str(&format!("\n### {}\n\n```text\n{}\n```\n", prompt.skill, prompt.prompt));
            }
            if let Some(prompt) = &report.summary_prompt {
                md.push_str(&format!("\n### Summary\n\n```text\n{}\n```\n", prompt));
            }
        }

        if self.include_metadata {
            md.push_str("\n---\n\n");
            md.push_str(&format!(
                "_Generated {} by ats-tailor v{} ({} backend). Resume: {}, job: {}._\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M UTC"),
                report.metadata.tool_version,
                report.metadata.backend,
                report.metadata.resume_file,
                report.metadata.job_file
            ));
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

struct HtmlComponentRow {
    label: String,
    score: String,
    weight: String,
    points: String,
    summary: String,
}

struct HtmlMatchRow {
    skill: String,
    status: String,
    status_class: &'static str,
    similarity: String,
    kind: &'static str,
    evidence: String,
}

struct HtmlSuggestionRow {
    skill: String,
    delta: String,
    status: String,
    evidence: String,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>ATS Match Score</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 900px; margin: 0 auto; padding: 20px; color: #333; }
        .score { font-size: 2.5em; font-weight: bold; }
        .verdict-strong { color: #28a745; }
        .verdict-good { color: #c69500; }
        .verdict-gaps { color: #dc3545; }
        table { border-collapse: collapse; width: 100%; margin: 15px 0; }
        th, td { border-bottom: 1px solid #e9ecef; padding: 6px 10px; text-align: left; }
        .present { color: #28a745; }
        .weak { color: #c69500; }
        .missing { color: #dc3545; }
        pre { background: #f8f9fa; padding: 12px; white-space: pre-wrap; }
        .metadata { color: #6c757d; font-size: 0.9em; margin-top: 30px; }
    </style>
    {% endif %}
</head>
<body>
    <h1>ATS Match Score</h1>
    <p class="score {{ verdict_class }}">{{ total }}/100</p>
    <p>Target role: {{ job_title }} | Resume title: {{ resume_title }}</p>
    <ul>
    {% for note in notes %}
        <li>{{ note }}</li>
    {% endfor %}
    </ul>

    <h2>Components</h2>
    <table>
        <tr><th>Component</th><th>Score</th><th>Weight</th><th>Points</th><th>Detail</th></tr>
        {% for row in components %}
        <tr><td>{{ row.label }}</td><td>{{ row.score }}</td><td>{{ row.weight }}</td><td>{{ row.points }}</td><td>{{ row.summary }}</td></tr>
        {% endfor %}
    </table>

    {% if !matches.is_empty() %}
    <h2>Requirements</h2>
    <table>
        <tr><th>Skill</th><th>Status</th><th>Similarity</th><th>Kind</th><th>Evidence</th></tr>
        {% for row in matches %}
        <tr><td>{{ row.skill }}</td><td class="{{ row.status_class }}">{{ row.status }}</td><td>{{ row.similarity }}</td><td>{{ row.kind }}</td><td>{{ row.evidence }}</td></tr>
        {% endfor %}
    </table>
    {% endif %}

    {% if !suggestions.is_empty() %}
    <h2>Suggestions</h2>
    <ol>
        {% for row in suggestions %}
        <li><strong>{{ row.skill }}</strong> (+{{ row.delta }} pts, {{ row.status }}){% if !row.evidence.is_empty() %}<br><em>{{ row.evidence }}</em>{% endif %}</li>
        {% endfor %}
    </ol>
    {% endif %}

    {% if !skills_to_add.is_empty() %}
    <h2>Skills to Add</h2>
    <p>{{ skills_to_add }}</p>
    <pre>{{ updated_skills }}</pre>
    {% endif %}

    {% for prompt in prompts %}
    <h3>Rewrite prompt: {{ prompt.0 }}</h3>
    <pre>{{ prompt.1 }}</pre>
    {% endfor %}

    <div class="metadata">
        <p>Generated {{ generated_at }} by ats-tailor v{{ version }} ({{ backend }} backend)</p>
        <p>Resume: {{ resume_file }} | Job: {{ job_file }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    total: u8,
    verdict_class: &'static str,
    job_title: String,
    resume_title: String,
    notes: Vec<String>,
    components: Vec<HtmlComponentRow>,
    matches: Vec<HtmlMatchRow>,
    suggestions: Vec<HtmlSuggestionRow>,
    skills_to_add: String,
    updated_skills: String,
    prompts: Vec<(String, String)>,
    generated_at: String,
    version: String,
    backend: String,
    resume_file: String,
    job_file: String,
}

impl HtmlFormatter {
    pub fn new(include_styles: bool, max_suggestions: usize) -> Self {
        Self {
            include_styles,
            max_suggestions,
        }
    }

    fn create_template_data(&self, report: &ScoreReport) -> HtmlTemplate {
        let breakdown = &report.breakdown;

        HtmlTemplate {
            include_styles: self.include_styles,
            total: breakdown.total,
            verdict_class: match report.verdict {
                Verdict::Strong => "verdict-strong",
                Verdict::Good => "verdict-good",
                Verdict::Gaps => "verdict-gaps",
            },
            job_title: breakdown.job_title.clone(),
            resume_title: breakdown.resume_title.clone(),
            notes: report.notes.clone(),
            components: breakdown
                .components
                .iter()
                .map(|(component, score)| HtmlComponentRow {
                    label: component.label().to_string(),
                    score: percent(score.score),
                    weight: format!("{:.2}", score.weight),
                    points: format!("{:.1}", score.contribution),
                    summary: score.detail.summary.clone(),
                })
                .collect(),
            matches: breakdown
                .matches
                .iter()
                .map(|result| HtmlMatchRow {
                    skill: result.skill.clone(),
                    status: result.status.to_string(),
                    status_class: match result.status {
                        MatchStatus::Present => "present",
                        MatchStatus::Weak => "weak",
                        MatchStatus::Missing => "missing",
                    },
                    similarity: format!("{:.2}", result.similarity),
                    kind: requirement_kind(result),
                    evidence: evidence_label(result),
                })
                .collect(),
            suggestions: breakdown
                .suggestions
                .iter()
                .take(self.max_suggestions)
                .map(|s| HtmlSuggestionRow {
                    skill: s.skill.clone(),
                    delta: format!("{:.1}", s.estimated_delta),
                    status: s.status.to_string(),
                    evidence: s.evidence_text.clone().unwrap_or_default(),
                })
                .collect(),
            skills_to_add: breakdown
                .skill_insertion
                .as_ref()
                .map(|i| i.skills.join(", "))
                .unwrap_or_default(),
            updated_skills: breakdown
                .skill_insertion
                .as_ref()
                .map(|i| i.updated.clone())
                .unwrap_or_default(),
            prompts: report
                .prompts
                .iter()
                .map(|p| (p.skill.clone(), p.prompt.clone()))
                .chain(
                    report
                        .summary_prompt
                        .iter()
                        .map(|p| ("Summary".to_string(), p.clone())),
                )
                .collect(),
            generated_at: report
                .metadata
                .generated_at
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
            version: report.metadata.tool_version.clone(),
            backend: report.metadata.backend.clone(),
            resume_file: report.metadata.resume_file.clone(),
            job_file: report.metadata.job_file.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| AtsTailorError::OutputFormatting(format!("HTML template error: {}", e)))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(
                output.color_output,
                output.detailed,
                output.max_suggestions,
            ),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true, output.max_suggestions),
            html_formatter: HtmlFormatter::new(true, output.max_suggestions),
        }
    }

    pub fn generate_report(&self, report: &ScoreReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("{}_ats_score{}.{}", base_name, timestamp_suffix, extension)
}
