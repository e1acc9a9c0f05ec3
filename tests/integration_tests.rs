//! Integration tests for the ATS tailor

use ats_tailor::config::{Config, FailurePolicy};
use ats_tailor::error::{AtsTailorError, Result};
use ats_tailor::input::InputManager;
use ats_tailor::processing::embeddings::Model2VecSimilarity;
use ats_tailor::processing::matcher::MatchStatus;
use ats_tailor::processing::similarity::{backend_or_unavailable, LexicalSimilarity, SimilarityBackend};
use ats_tailor::scoring::{score, ScoreComponent, Scorer};
use ats_tailor::taxonomy::SkillTaxonomy;
use std::collections::HashMap;
use std::path::Path;

const JOB_FIXTURE: &str = "tests/fixtures/data_scientist_job.txt";
const RESUME_MD_FIXTURE: &str = "tests/fixtures/jane_doe_resume.md";
const RESUME_TXT_FIXTURE: &str = "tests/fixtures/jane_doe_resume.txt";

/// Similarity looked up by query name only, so every candidate scores the same
struct ScriptedBackend {
    scores: HashMap<String, f32>,
}

impl ScriptedBackend {
    fn new(scores: &[(&str, f32)]) -> Self {
        Self {
            scores: scores
                .iter()
                .map(|(name, score)| (name.to_lowercase(), *score))
                .collect(),
        }
    }

    fn worked_example() -> Self {
        Self::new(&[
            ("Python", 0.9),
            ("SQL", 0.85),
            ("AWS", 0.6),
            ("Machine Learning", 0.88),
            ("A/B Testing", 0.3),
        ])
    }
}

impl SimilarityBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn similarity(&self, query: &str, _candidate: &str) -> Result<f32> {
        Ok(self.scores.get(&query.to_lowercase()).copied().unwrap_or(0.0))
    }
}

struct UnavailableBackend;

impl SimilarityBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn similarity(&self, _query: &str, _candidate: &str) -> Result<f32> {
        Err(AtsTailorError::MatchingUnavailable(
            "embedding service offline".to_string(),
        ))
    }
}

fn fixture(path: &str) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_worked_example_scores_66() {
    let config = Config::default();
    let breakdown = score(
        &fixture(RESUME_TXT_FIXTURE),
        &fixture(JOB_FIXTURE),
        &config,
        &ScriptedBackend::worked_example(),
    )
    .unwrap();

    let statuses: Vec<(&str, MatchStatus)> = breakdown
        .matches
        .iter()
        .map(|m| (m.skill.as_str(), m.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("Python", MatchStatus::Present),
            ("SQL", MatchStatus::Present),
            ("AWS", MatchStatus::Weak),
            ("Machine Learning", MatchStatus::Present),
            ("A/B Testing", MatchStatus::Missing),
        ]
    );

    let c = &breakdown.components;
    assert_close(c.coverage.score, 0.8);
    assert_close(c.explicitness.score, 0.6);
    assert_close(c.role_alignment.score, 0.5);
    assert_close(c.keywords.score, 0.5);
    assert!((c.writing_quality.score - 0.75).abs() < 1e-9);
    assert_eq!(breakdown.total, 66);

    assert_eq!(breakdown.job_title, "Data Scientist");
    assert_eq!(breakdown.resume_title, "Data Analyst");
    assert!(!breakdown.degraded);
}

#[test]
fn test_worked_example_suggestions() {
    let breakdown = score(
        &fixture(RESUME_TXT_FIXTURE),
        &fixture(JOB_FIXTURE),
        &Config::default(),
        &ScriptedBackend::worked_example(),
    )
    .unwrap();

    let ranked: Vec<&str> = breakdown
        .suggestions
        .iter()
        .map(|s| s.skill.as_str())
        .collect();
    assert_eq!(ranked, vec!["A/B Testing", "AWS"]);

    // Missing and unnamed: coverage and explicitness shares of one in five
    assert!((breakdown.suggestions[0].estimated_delta - 12.0).abs() < 1e-6);
    // Weak and unnamed: explicitness share only
    assert!((breakdown.suggestions[1].estimated_delta - 5.0).abs() < 1e-6);
    assert_eq!(breakdown.suggestions[1].evidence_bullet_index, Some(0));

    let insertion = breakdown.skill_insertion.as_ref().unwrap();
    assert_eq!(insertion.skills, vec!["AWS", "A/B Testing"]);
    assert_eq!(insertion.updated, "Python, SQL, Machine Learning, AWS, A/B Testing");
    // The fixture has no summary section
    assert!(breakdown.summary_update.is_none());
}

#[test]
fn test_breakdown_json_shape() {
    let breakdown = score(
        &fixture(RESUME_TXT_FIXTURE),
        &fixture(JOB_FIXTURE),
        &Config::default(),
        &ScriptedBackend::worked_example(),
    )
    .unwrap();

    let json = serde_json::to_value(&breakdown).unwrap();
    assert_eq!(json["total"], 66);
    for component in ScoreComponent::ALL {
        let entry = &json["components"][component.key()];
        assert!(entry["score"].is_number(), "{}", component.key());
        assert!(entry["weight"].is_number());
        assert!(entry["contribution"].is_number());
    }
    assert_eq!(json["matches"][2]["skill"], "AWS");
    assert_eq!(json["matches"][2]["status"], "Weak");
    assert_eq!(json["matches"][2]["evidenceBulletIndex"], 0);
    assert_eq!(json["suggestions"][0]["skill"], "A/B Testing");
    assert!(json["suggestions"][0]["estimatedDelta"].is_number());
    assert_eq!(json["jobTitle"], "Data Scientist");
}

#[test]
fn test_perfect_resume_scores_100() {
    let job = "Job Title: Data Analyst\nRequirements:\n- Python\n- SQL";
    let resume = "Jane Doe\nExperience\nData Analyst | Acme\n- Built Python reports for 30 teams\n- Cut SQL query time by 40%\nSkills\nPython, SQL";

    let breakdown = score(resume, job, &Config::default(), &LexicalSimilarity::new()).unwrap();

    assert!(breakdown.matches.iter().all(|m| m.status == MatchStatus::Present && m.explicit));
    assert_eq!(breakdown.total, 100);
    assert!(breakdown.suggestions.is_empty());
}

#[test]
fn test_lexical_backend_ignores_lookalike_words() {
    let job = "Requirements:\n- Rust\n- Scala\n- Machine Learning";
    let resume = "Experience\nSoftware Engineer | Initech\n- Built trust with 5 partner teams\n- Helped scale the platform to 2M users\n- Led my team of 4 engineers";

    let breakdown = score(resume, job, &Config::default(), &LexicalSimilarity::new()).unwrap();
    let status = |skill: &str| {
        breakdown
            .matches
            .iter()
            .find(|m| m.skill == skill)
            .map(|m| m.status)
            .unwrap()
    };

    assert_eq!(status("Rust"), MatchStatus::Missing);
    assert_eq!(status("Machine Learning"), MatchStatus::Missing);
    assert_ne!(status("Scala"), MatchStatus::Present);
    assert!(breakdown.components.coverage.score < 0.5);
}

#[test]
fn test_empty_job_description_is_not_an_error() {
    let resume = fixture(RESUME_TXT_FIXTURE);
    let breakdown = score(&resume, "", &Config::default(), &ScriptedBackend::worked_example()).unwrap();

    assert!(breakdown.matches.is_empty());
    assert!(breakdown.suggestions.is_empty());
    for component in [
        ScoreComponent::Coverage,
        ScoreComponent::Explicitness,
        ScoreComponent::RoleAlignment,
        ScoreComponent::Keywords,
    ] {
        assert_eq!(breakdown.components.get(component).score, 1.0);
    }
    assert!((breakdown.components.writing_quality.score - 0.75).abs() < 1e-9);
    // 90 + 10 x 0.75
    assert_eq!(breakdown.total, 98);
}

#[test]
fn test_empty_resume_trends_to_zero() {
    let breakdown = score("", &fixture(JOB_FIXTURE), &Config::default(), &ScriptedBackend::worked_example())
        .unwrap();

    assert_eq!(breakdown.components.writing_quality.score, 0.0);
    assert_eq!(breakdown.components.coverage.score, 0.0);
    assert_eq!(breakdown.components.explicitness.score, 0.0);
    assert!(breakdown.matches.iter().all(|m| m.status == MatchStatus::Missing));
    assert_eq!(breakdown.total, 0);
}

#[test]
fn test_weight_mismatch_is_a_config_error() {
    let mut config = Config::default();
    config.scoring.weights.keywords = 0.30;

    let err = score(
        &fixture(RESUME_TXT_FIXTURE),
        &fixture(JOB_FIXTURE),
        &config,
        &ScriptedBackend::worked_example(),
    )
    .unwrap_err();
    assert!(matches!(err, AtsTailorError::Config(_)));

    let toml = "[scoring]\ntau_high = 0.75\ntau_low = 0.5\n[scoring.weights]\ncoverage = 0.5\nexplicitness = 0.25\nrole_alignment = 0.15\nkeywords = 0.15\nwriting_quality = 0.10\n[similarity]\nbackend = \"lexical\"\nmodel = \"potion-base-8M\"\nmodels_dir = \"/tmp/models\"\n[output]\nformat = \"json\"\ndetailed = false\ncolor_output = false\nmax_suggestions = 5\n";
    assert!(Config::from_toml_str(toml).unwrap_err().is_config());
}

#[test]
fn test_matching_failure_propagates_by_default() {
    let err = score(
        &fixture(RESUME_TXT_FIXTURE),
        &fixture(JOB_FIXTURE),
        &Config::default(),
        &UnavailableBackend,
    )
    .unwrap_err();

    assert!(matches!(err, AtsTailorError::MatchingUnavailable(_)));
}

#[test]
fn test_explicit_only_degrades() {
    let mut config = Config::default();
    config.similarity.on_failure = FailurePolicy::ExplicitOnly;

    let breakdown = score(
        &fixture(RESUME_TXT_FIXTURE),
        &fixture(JOB_FIXTURE),
        &config,
        &UnavailableBackend,
    )
    .unwrap();

    assert!(breakdown.degraded);
    let present: Vec<&str> = breakdown
        .matches
        .iter()
        .filter(|m| m.status == MatchStatus::Present)
        .map(|m| m.skill.as_str())
        .collect();
    assert_eq!(present, vec!["Python", "SQL", "Machine Learning"]);
    assert_close(breakdown.components.coverage.score, 0.6);
}

fn load_missing_model() -> Result<Box<dyn SimilarityBackend>> {
    let dir = tempfile::TempDir::new().unwrap();
    Model2VecSimilarity::load(&dir.path().join("potion-base-8M"))
        .map(|model| Box::new(model) as Box<dyn SimilarityBackend>)
}

#[test]
fn test_missing_model_degrades_under_explicit_only() {
    let mut config = Config::default();
    config.similarity.on_failure = FailurePolicy::ExplicitOnly;

    let backend = backend_or_unavailable(load_missing_model(), config.similarity.on_failure).unwrap();
    let breakdown = score(
        &fixture(RESUME_TXT_FIXTURE),
        &fixture(JOB_FIXTURE),
        &config,
        backend.as_ref(),
    )
    .unwrap();

    assert!(breakdown.degraded);
    assert_close(breakdown.components.coverage.score, 0.6);
}

#[test]
fn test_missing_model_fails_by_default() {
    let config = Config::default();
    let err = backend_or_unavailable(load_missing_model(), config.similarity.on_failure)
        .err()
        .unwrap();

    assert!(matches!(err, AtsTailorError::MatchingUnavailable(_)));
}

#[test]
fn test_scoring_is_deterministic() {
    let config = Config::default();
    let backend = LexicalSimilarity::new();
    let scorer = Scorer::new(&config, SkillTaxonomy::builtin(), &backend).unwrap();
    let resume = fixture(RESUME_TXT_FIXTURE);
    let job = fixture(JOB_FIXTURE);

    let first = scorer.score(&resume, &job).unwrap();
    for _ in 0..3 {
        assert_eq!(scorer.score(&resume, &job).unwrap(), first);
    }
}

#[test]
fn test_scorer_shared_across_threads() {
    let config = Config::default();
    let backend = ScriptedBackend::worked_example();
    let scorer = Scorer::new(&config, SkillTaxonomy::builtin(), &backend).unwrap();
    let resume = fixture(RESUME_TXT_FIXTURE);
    let job = fixture(JOB_FIXTURE);
    let (scorer, resume, job) = (&scorer, resume.as_str(), job.as_str());

    let totals: Vec<u8> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(move || scorer.score(resume, job).unwrap().total))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(totals, vec![66; 4]);
}

#[test]
fn test_raising_a_missing_skill_never_lowers_the_score() {
    let config = Config::default();
    let resume = fixture(RESUME_TXT_FIXTURE);
    let job = fixture(JOB_FIXTURE);

    let before = score(&resume, &job, &config, &ScriptedBackend::worked_example()).unwrap();
    let improved = ScriptedBackend::new(&[
        ("Python", 0.9),
        ("SQL", 0.85),
        ("AWS", 0.6),
        ("Machine Learning", 0.88),
        ("A/B Testing", 0.95),
    ]);
    let after = score(&resume, &job, &config, &improved).unwrap();

    assert!(after.total >= before.total);
    assert!(after.components.coverage.score > before.components.coverage.score);
    assert_eq!(after.matches[4].status, MatchStatus::Present);
}

#[tokio::test]
async fn test_markdown_resume_matches_plain_text() {
    let mut manager = InputManager::new();
    let markdown = manager.extract_text(Path::new(RESUME_MD_FIXTURE)).await.unwrap();
    let plain = manager.extract_text(Path::new(RESUME_TXT_FIXTURE)).await.unwrap();
    let job = manager.extract_text(Path::new(JOB_FIXTURE)).await.unwrap();

    assert!(!markdown.contains("**"));
    assert!(!markdown.contains("##"));

    let backend = ScriptedBackend::worked_example();
    let config = Config::default();
    let from_markdown = score(&markdown, &job, &config, &backend).unwrap();
    let from_plain = score(&plain, &job, &config, &backend).unwrap();

    assert_eq!(from_markdown.total, 66);
    assert_eq!(from_markdown.matches, from_plain.matches);
    assert_eq!(from_markdown.resume_title, "Data Analyst");
}

/// Write a minimal Word document with one paragraph per line. "- " lines
/// become list paragraphs.
fn write_docx(path: &Path, text: &str) {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let escape = |s: &str| s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
    let paragraphs: String = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.strip_prefix("- ") {
            Some(item) => format!(
                r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
                escape(item)
            ),
            None => format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", escape(line)),
        })
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        paragraphs
    );

    let mut writer = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap();
}

#[tokio::test]
async fn test_docx_resume_matches_plain_text() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let docx_path = temp_dir.path().join("jane_doe_resume.docx");
    write_docx(&docx_path, &fixture(RESUME_TXT_FIXTURE));

    let mut manager = InputManager::new();
    let from_docx = manager.extract_text(&docx_path).await.unwrap();
    let plain = manager.extract_text(Path::new(RESUME_TXT_FIXTURE)).await.unwrap();
    assert!(from_docx.contains("- Built forecasting models in Python and SQL"));

    let backend = ScriptedBackend::worked_example();
    let config = Config::default();
    let job = fixture(JOB_FIXTURE);
    let docx_breakdown = score(&from_docx, &job, &config, &backend).unwrap();
    let plain_breakdown = score(&plain, &job, &config, &backend).unwrap();

    assert_eq!(docx_breakdown.total, 66);
    assert_eq!(docx_breakdown.matches, plain_breakdown.matches);
}

#[tokio::test]
async fn test_empty_resume_file_scores_instead_of_failing() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let empty = temp_dir.path().join("resume.txt");
    std::fs::write(&empty, "").unwrap();

    let mut manager = InputManager::new();
    let resume = manager.extract_text(&empty).await.unwrap();
    let breakdown = score(&resume, &fixture(JOB_FIXTURE), &Config::default(), &ScriptedBackend::worked_example())
        .unwrap();

    assert_eq!(breakdown.components.writing_quality.score, 0.0);
    assert_eq!(breakdown.components.explicitness.score, 0.0);
}

#[tokio::test]
async fn test_input_caching_and_unsupported_files() {
    let mut manager = InputManager::new();
    let path = Path::new(JOB_FIXTURE);

    let first = manager.extract_text(path).await.unwrap();
    let second = manager.extract_text(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    let result = manager.extract_text(Path::new("tests/fixtures/missing.docx")).await;
    assert!(result.is_err());
}
