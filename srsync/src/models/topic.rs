//! Fixed topic taxonomy used for classification and card tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// The ten topics a passage can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "World History")]
    WorldHistory,
    #[serde(rename = "Science and Technology")]
    ScienceAndTechnology,
    #[serde(rename = "Geography and Cultures")]
    GeographyAndCultures,
    #[serde(rename = "Arts and Literature")]
    ArtsAndLiterature,
    #[serde(rename = "Biology and Medicine")]
    BiologyAndMedicine,
    #[serde(rename = "Environmental Science and Ecology")]
    EnvironmentalScienceAndEcology,
    #[serde(rename = "Philosophy and Religion")]
    PhilosophyAndReligion,
    #[serde(rename = "Economics and Business")]
    EconomicsAndBusiness,
    #[serde(rename = "Political Science and Law")]
    PoliticalScienceAndLaw,
    #[serde(rename = "Mathematics and Physics")]
    MathematicsAndPhysics,
}

impl Topic {
    pub const ALL: [Topic; 10] = [
        Topic::WorldHistory,
        Topic::ScienceAndTechnology,
        Topic::GeographyAndCultures,
        Topic::ArtsAndLiterature,
        Topic::BiologyAndMedicine,
        Topic::EnvironmentalScienceAndEcology,
        Topic::PhilosophyAndReligion,
        Topic::EconomicsAndBusiness,
        Topic::PoliticalScienceAndLaw,
        Topic::MathematicsAndPhysics,
    ];

    /// Human-readable label, exactly as the classifier must return it
    pub fn label(&self) -> &'static str {
        match self {
            Topic::WorldHistory => "World History",
            Topic::ScienceAndTechnology => "Science and Technology",
            Topic::GeographyAndCultures => "Geography and Cultures",
            Topic::ArtsAndLiterature => "Arts and Literature",
            Topic::BiologyAndMedicine => "Biology and Medicine",
            Topic::EnvironmentalScienceAndEcology => "Environmental Science and Ecology",
            Topic::PhilosophyAndReligion => "Philosophy and Religion",
            Topic::EconomicsAndBusiness => "Economics and Business",
            Topic::PoliticalScienceAndLaw => "Political Science and Law",
            Topic::MathematicsAndPhysics => "Mathematics and Physics",
        }
    }

    /// Exact-match lookup by label; no case folding, no fuzzy matching
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Tag-safe form of the label, e.g. `political_science_and_law`
    pub fn slug(&self) -> String {
        self.label().to_lowercase().replace(' ', "_")
    }

    /// Comma-separated list of every label, for prompts
    pub fn label_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
