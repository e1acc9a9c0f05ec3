//! Categorised action verbs for bullet quality checks and rewrite prompts

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbCategory {
    Creation,
    Leadership,
    Improvement,
    Analysis,
    Automation,
    DataScience,
}

impl VerbCategory {
    pub const ALL: [VerbCategory; 6] = [
        VerbCategory::Creation,
        VerbCategory::Leadership,
        VerbCategory::Improvement,
        VerbCategory::Analysis,
        VerbCategory::Automation,
        VerbCategory::DataScience,
    ];

    pub fn verbs(self) -> &'static [&'static str] {
        match self {
            VerbCategory::Creation => &[
                "built", "developed", "created", "designed", "launched", "implemented",
                "engineered", "established", "architected", "delivered", "introduced",
                "prototyped",
            ],
            VerbCategory::Leadership => &[
                "led", "managed", "mentored", "directed", "coordinated", "spearheaded",
                "supervised", "championed", "guided", "headed", "oversaw", "coached",
            ],
            VerbCategory::Improvement => &[
                "improved", "optimized", "increased", "reduced", "enhanced", "accelerated",
                "streamlined", "boosted", "cut", "refactored", "scaled", "upgraded",
            ],
            VerbCategory::Analysis => &[
                "analyzed", "evaluated", "researched", "investigated", "assessed",
                "identified", "measured", "quantified", "audited", "examined",
                "diagnosed", "surveyed",
            ],
            VerbCategory::Automation => &[
                "automated", "scripted", "orchestrated", "integrated", "deployed",
                "migrated", "configured", "containerized", "scheduled", "maintained",
            ],
            VerbCategory::DataScience => &[
                "modeled", "trained", "predicted", "forecasted", "tuned", "clustered",
                "classified", "validated", "experimented", "visualized", "segmented",
            ],
        }
    }
}

impl fmt::Display for VerbCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VerbCategory::Creation => "creation",
            VerbCategory::Leadership => "leadership",
            VerbCategory::Improvement => "improvement",
            VerbCategory::Analysis => "analysis",
            VerbCategory::Automation => "automation",
            VerbCategory::DataScience => "data_science",
        };
        write!(f, "{}", name)
    }
}

/// Keyword triggers checked in order; the first category with a hit wins
const CATEGORY_TRIGGERS: &[(VerbCategory, &[&str])] = &[
    (VerbCategory::Creation, &["build", "develop", "create", "design"]),
    (VerbCategory::Leadership, &["lead", "manage", "mentor"]),
    (VerbCategory::Improvement, &["improve", "optimize", "enhance"]),
    (VerbCategory::Analysis, &["analyze", "evaluate", "research"]),
    (VerbCategory::Automation, &["automate", "script", "pipeline"]),
    (
        VerbCategory::DataScience,
        &["model", "predict", "train", "ml", "machine learning"],
    ),
];

/// Flat lookup over every category plus common present-tense forms
pub struct ActionVerbs {
    all: HashSet<&'static str>,
}

static BUILTIN: LazyLock<ActionVerbs> = LazyLock::new(|| {
    let mut all: HashSet<&'static str> = VerbCategory::ALL
        .iter()
        .flat_map(|c| c.verbs().iter().copied())
        .collect();
    all.extend(EXTRA_VERBS.iter().copied());
    ActionVerbs { all }
});

/// Verbs that start strong bullets but do not drive prompt suggestions
const EXTRA_VERBS: &[&str] = &[
    "achieved", "administered", "authored", "collaborated", "drove", "executed",
    "facilitated", "founded", "generated", "grew", "initiated", "negotiated",
    "owned", "partnered", "presented", "produced", "resolved", "saved", "shipped",
    "solved", "trained", "transformed", "wrote", "build", "develop", "lead",
    "manage", "design", "analyze", "analysed", "optimised", "modelled",
];

impl ActionVerbs {
    pub fn builtin() -> &'static ActionVerbs {
        &BUILTIN
    }

    /// Case-insensitive membership test on a single token
    pub fn contains(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.all.contains(lower.as_str())
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Pick the verb category matching what a requirement or bullet talks about
    pub fn category_for(&self, text: &str) -> VerbCategory {
        let lower = text.to_lowercase();
        CATEGORY_TRIGGERS
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| lower.contains(t)))
            .map(|(category, _)| *category)
            .unwrap_or(VerbCategory::Creation)
    }

    pub fn suggest_for(&self, text: &str) -> &'static [&'static str] {
        self.category_for(text).verbs()
    }
}
