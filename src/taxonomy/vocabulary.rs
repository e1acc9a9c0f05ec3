//! Fixed vocabularies: job-title role keywords and tool/platform keywords

use crate::taxonomy::PhraseMatcher;
use std::collections::HashSet;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

pub const ROLE_NOUNS: &[&str] = &[
    "scientist", "engineer", "analyst", "developer", "architect", "manager",
    "director", "consultant", "specialist", "researcher", "designer",
    "administrator", "lead", "intern",
];

pub const SENIORITY: &[&str] = &["senior", "junior", "staff", "principal", "head", "lead"];

pub const DOMAIN_QUALIFIERS: &[&str] = &[
    "data", "software", "ml", "product", "research", "backend", "frontend", "fullstack",
];

/// Maximum words on a line that can still be a job title
pub const MAX_TITLE_WORDS: usize = 12;

fn is_role_keyword(token: &str) -> bool {
    ROLE_NOUNS.contains(&token) || SENIORITY.contains(&token) || DOMAIN_QUALIFIERS.contains(&token)
}

/// Role keywords in a title, lowercased, in order of appearance without repeats
pub fn role_keywords(title: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    title
        .unicode_words()
        .map(|w| w.to_lowercase())
        .filter(|w| is_role_keyword(w))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// A short line naming a role, e.g. "Senior Data Scientist"
pub fn is_title_like(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.split_whitespace().count() > MAX_TITLE_WORDS {
        return false;
    }
    line.unicode_words()
        .any(|w| ROLE_NOUNS.contains(&w.to_lowercase().as_str()))
}

/// Tools, platforms and technical terms beyond the skills taxonomy
pub const TOOL_KEYWORDS: &[&str] = &[
    "Jupyter", "Jira", "Confluence", "Matplotlib", "Seaborn", "Plotly", "Hive",
    "Presto", "Trino", "SageMaker", "Vertex AI", "BigQuery", "Redshift", "Athena",
    "Lambda", "Glue", "EMR", "Kinesis", "DynamoDB", "Cassandra", "Elasticsearch",
    "Flink", "Beam", "Dagster", "Prefect", "Luigi", "MLflow", "Kubeflow",
    "Weights & Biases", "Hugging Face", "Transformers", "LLM", "LLMs", "RAG",
    "OpenAI", "LangChain", "Vector Database", "FastAPI", "Flask", "Django",
    "Streamlit", "Grafana", "Prometheus", "Datadog", "Splunk", "Looker Studio",
    "Google Analytics", "Amplitude", "Mixpanel", "Segment", "Salesforce",
    "SAS", "SPSS", "Stata", "MATLAB", "Excel", "Power BI", "Tableau", "Looker",
    "Snowflake", "Databricks", "Delta Lake", "Parquet", "Avro", "JSON", "REST",
    "gRPC", "Microservices", "Serverless", "Docker", "Kubernetes", "Terraform",
    "Ansible", "Jenkins", "GitHub Actions", "CircleCI", "Git", "Linux", "Bash",
    "Pandas", "NumPy", "SciPy", "Polars", "Dask", "Ray", "Spark", "Kafka",
    "Airflow", "dbt", "PostgreSQL", "MySQL", "MongoDB", "Redis", "SQL Server",
    "Oracle", "NoSQL", "Data Warehouse", "Data Lake", "Feature Store",
    "Experimentation", "Causal Inference", "Bayesian", "Regression",
    "Classification", "Clustering", "Recommendation Systems", "Optimization",
];

static TOOL_MATCHER: LazyLock<PhraseMatcher> = LazyLock::new(|| {
    PhraseMatcher::new(TOOL_KEYWORDS).expect("builtin tool vocabulary is well-formed")
});

/// Tool keywords occurring in `text` with the byte offset of their first hit,
/// in first-occurrence order
pub fn find_tool_keywords(text: &str) -> Vec<(&'static str, usize)> {
    let mut seen = HashSet::new();
    TOOL_MATCHER
        .find_all(text)
        .into_iter()
        .map(|hit| (TOOL_KEYWORDS[hit.pattern], hit.start))
        .filter(|(kw, _)| seen.insert(kw.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_keywords_from_title() {
        assert_eq!(
            role_keywords("Senior Data Scientist"),
            vec!["senior", "data", "scientist"]
        );
        assert_eq!(role_keywords("Data Analyst, Data Platform"), vec!["data", "analyst"]);
        assert!(role_keywords("Acme Corporation").is_empty());
    }

    #[test]
    fn test_title_like_requires_role_noun() {
        assert!(is_title_like("Machine Learning Engineer"));
        assert!(is_title_like("Lead Data Scientist | Acme | 2020 - Present"));
        assert!(!is_title_like("Senior Data"));
        assert!(!is_title_like(
            "Worked closely with every engineer on the team to ship a large number of features quickly"
        ));
    }

    fn tool_keywords_in(text: &str) -> Vec<&'static str> {
        find_tool_keywords(text).into_iter().map(|(kw, _)| kw).collect()
    }

    #[test]
    fn test_tool_keywords_in_text() {
        let found = tool_keywords_in("Dashboards in Tableau, notebooks in Jupyter, and more Tableau");
        assert_eq!(found, vec!["Tableau", "Jupyter"]);
    }

    #[test]
    fn test_tool_keywords_respect_boundaries() {
        // "Ray" inside "array" and "Beam" inside "beaming" are not hits
        assert!(tool_keywords_in("an array of beaming faces").is_empty());
    }
}
