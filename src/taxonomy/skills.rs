//! Skills taxonomy: canonical skill names, their aliases and categories

use crate::error::{AtsTailorError, Result};
use crate::processing::text_processor::contains_phrase;
use crate::taxonomy::PhraseMatcher;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub canonical: String,
    pub aliases: Vec<String>,
    pub category: String,
}

impl Skill {
    /// Canonical name followed by every alias
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str()).chain(self.aliases.iter().map(|a| a.as_str()))
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.names().any(|n| n.eq_ignore_ascii_case(name.trim()))
    }
}

/// Taxonomy file entry: `{"Python": {"aliases": ["py3"], "category": "languages"}}`
#[derive(Debug, Deserialize)]
struct TaxonomyEntry {
    #[serde(default)]
    aliases: Vec<String>,
    category: String,
}

pub struct SkillTaxonomy {
    skills: Vec<Skill>,
    matcher: PhraseMatcher,
    /// Pattern id to owning skill index
    owners: Vec<usize>,
}

static BUILTIN: LazyLock<SkillTaxonomy> = LazyLock::new(|| {
    let skills = BUILTIN_SKILLS
        .iter()
        .map(|(canonical, category, aliases)| Skill {
            canonical: canonical.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            category: category.to_string(),
        })
        .collect();
    SkillTaxonomy::new(skills).expect("builtin skills taxonomy is well-formed")
});

impl SkillTaxonomy {
    pub fn new(skills: Vec<Skill>) -> Result<Self> {
        if skills.is_empty() {
            return Err(AtsTailorError::Taxonomy("Taxonomy contains no skills".to_string()));
        }

        let mut seen = HashSet::new();
        for skill in &skills {
            if !seen.insert(skill.canonical.to_lowercase()) {
                return Err(AtsTailorError::Taxonomy(format!(
                    "Duplicate canonical skill: {}",
                    skill.canonical
                )));
            }
        }

        let mut patterns = Vec::new();
        let mut owners = Vec::new();
        for (idx, skill) in skills.iter().enumerate() {
            for name in skill.names() {
                patterns.push(name.to_string());
                owners.push(idx);
            }
        }

        let matcher = PhraseMatcher::new(&patterns)?;

        Ok(Self {
            skills,
            matcher,
            owners,
        })
    }

    /// Process-wide builtin taxonomy
    pub fn builtin() -> &'static SkillTaxonomy {
        &BUILTIN
    }

    /// Parse `{canonicalName: {aliases: [...], category: str}}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, TaxonomyEntry> = serde_json::from_str(json)
            .map_err(|e| AtsTailorError::Taxonomy(format!("Invalid taxonomy JSON: {}", e)))?;

        let skills = entries
            .into_iter()
            .map(|(canonical, entry)| Skill {
                canonical,
                aliases: entry.aliases,
                category: entry.category,
            })
            .collect();

        Self::new(skills)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Look up a skill by canonical name or alias
    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.is_named(name))
    }

    /// Skills occurring in `text` with the byte offset of their first hit,
    /// ordered by that offset and deduplicated by canonical name
    pub fn find_in(&self, text: &str) -> Vec<(&Skill, usize)> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for hit in self.matcher.find_all(text) {
            let owner = self.owners[hit.pattern];
            if seen.insert(owner) {
                found.push((&self.skills[owner], hit.start));
            }
        }

        found
    }

    pub fn find_skills(&self, text: &str) -> Vec<&Skill> {
        self.find_in(text).into_iter().map(|(skill, _)| skill).collect()
    }

    /// Whether `skill` is named verbatim (any alias, any case) in `text`
    pub fn mentions(&self, skill: &Skill, text: &str) -> bool {
        skill.names().any(|name| contains_phrase(text, name))
    }
}

/// (canonical, category, aliases)
const BUILTIN_SKILLS: &[(&str, &str, &[&str])] = &[
    // Programming languages
    ("Python", "programming_languages", &["python3", "python 3"]),
    ("SQL", "programming_languages", &["t-sql", "pl/sql", "ansi sql"]),
    ("Java", "programming_languages", &[]),
    ("Scala", "programming_languages", &[]),
    ("JavaScript", "programming_languages", &["ecmascript", "es6"]),
    ("TypeScript", "programming_languages", &[]),
    ("Rust", "programming_languages", &[]),
    ("Golang", "programming_languages", &["go lang"]),
    ("C++", "programming_languages", &["cpp"]),
    ("C#", "programming_languages", &["csharp", "c sharp"]),
    ("Bash", "programming_languages", &["shell scripting", "shell scripts"]),
    // Data science and machine learning
    ("Machine Learning", "machine_learning", &["ml", "machine-learning"]),
    ("Deep Learning", "machine_learning", &["neural networks", "neural network"]),
    ("Natural Language Processing", "machine_learning", &["nlp"]),
    ("Computer Vision", "machine_learning", &[]),
    ("scikit-learn", "machine_learning", &["sklearn", "scikit learn"]),
    ("TensorFlow", "machine_learning", &[]),
    ("PyTorch", "machine_learning", &[]),
    ("Keras", "machine_learning", &[]),
    ("XGBoost", "machine_learning", &["lightgbm", "gradient boosting"]),
    ("MLOps", "machine_learning", &["mlflow", "model deployment"]),
    ("Statistics", "data_science", &["statistical analysis", "statistical modeling", "statistical modelling"]),
    ("A/B Testing", "data_science", &["ab testing", "a/b tests", "split testing"]),
    ("Forecasting", "data_science", &["time series", "time-series"]),
    ("Pandas", "data_science", &[]),
    ("NumPy", "data_science", &[]),
    // Data engineering
    ("Spark", "data_engineering", &["pyspark", "apache spark"]),
    ("Hadoop", "data_engineering", &[]),
    ("Airflow", "data_engineering", &["apache airflow"]),
    ("Kafka", "data_engineering", &["apache kafka"]),
    ("ETL", "data_engineering", &["elt", "data pipelines", "data pipeline"]),
    ("dbt", "data_engineering", &[]),
    ("Data Modeling", "data_engineering", &["data modelling", "dimensional modeling"]),
    // Databases and warehouses
    ("PostgreSQL", "databases", &["postgres"]),
    ("MySQL", "databases", &[]),
    ("MongoDB", "databases", &["mongo"]),
    ("Redis", "databases", &[]),
    ("Snowflake", "databases", &[]),
    ("BigQuery", "databases", &["big query"]),
    ("Redshift", "databases", &["amazon redshift"]),
    // Cloud and infrastructure
    ("AWS", "cloud", &["amazon web services", "ec2", "s3", "sagemaker"]),
    ("GCP", "cloud", &["google cloud", "google cloud platform", "vertex ai"]),
    ("Azure", "cloud", &["microsoft azure"]),
    ("Databricks", "cloud", &[]),
    ("Docker", "devops", &["containers", "containerization"]),
    ("Kubernetes", "devops", &["k8s"]),
    ("Terraform", "devops", &["infrastructure as code"]),
    ("CI/CD", "devops", &["continuous integration", "continuous delivery", "github actions", "jenkins"]),
    ("Git", "devops", &["github", "gitlab", "version control"]),
    ("Linux", "devops", &["unix"]),
    // Web
    ("React", "web", &["reactjs", "react.js"]),
    ("Node.js", "web", &["nodejs", "node js"]),
    ("REST APIs", "web", &["rest api", "restful", "rest apis"]),
    ("GraphQL", "web", &[]),
    // Analytics and BI
    ("Tableau", "analytics", &[]),
    ("Power BI", "analytics", &["powerbi"]),
    ("Looker", "analytics", &[]),
    ("Excel", "analytics", &["microsoft excel", "spreadsheets"]),
    ("Data Visualization", "analytics", &["data visualisation", "dashboards", "dashboarding"]),
    // Soft skills
    ("Communication", "soft_skills", &["communication skills", "presentation skills"]),
    ("Leadership", "soft_skills", &["mentoring", "mentorship"]),
    ("Stakeholder Management", "soft_skills", &["stakeholders", "cross-functional"]),
    ("Project Management", "soft_skills", &["program management"]),
    ("Agile", "soft_skills", &["scrum", "kanban"]),
];
