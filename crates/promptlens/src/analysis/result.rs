//! The structured analysis returned to callers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reconstructed prompts for one website.
///
/// Field names serialize in camelCase (`coreIntentPrompt`, `styleDna`, ...).
/// All six fields are required; a reply missing any of them is rejected by
/// the [`ResponseNormalizer`](super::normalizer::ResponseNormalizer).
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Reusable master prompt capturing the essence of the site.
    pub core_intent_prompt: String,
    /// Design-system level prompt: layout, typography, color, density.
    pub ui_system_prompt: String,
    pub component_prompts: ComponentPrompts,
    /// Short aesthetic descriptors, in the order the model gave them.
    pub style_dna: Vec<String>,
    pub assumptions: String,
    /// Free text, expected to mention High, Medium, or Low.
    pub confidence_level: String,
}

impl AnalysisResult {
    /// Confidence parsed out of [`confidence_level`](Self::confidence_level).
    pub fn confidence(&self) -> Option<Confidence> {
        Confidence::from_label(&self.confidence_level)
    }
}

/// Per-component prompts. The key set is fixed.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct ComponentPrompts {
    pub navigation: String,
    pub hero: String,
    pub content_sections: String,
    pub cards_or_data: String,
    pub footer_or_cta: String,
}

impl ComponentPrompts {
    /// Component names in display order.
    pub const NAMES: [&'static str; 5] = [
        "navigation",
        "hero",
        "content_sections",
        "cards_or_data",
        "footer_or_cta",
    ];

    /// `(name, prompt)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        Self::NAMES.into_iter().zip([
            self.navigation.as_str(),
            self.hero.as_str(),
            self.content_sections.as_str(),
            self.cards_or_data.as_str(),
            self.footer_or_cta.as_str(),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().find(|(n, _)| *n == name).map(|(_, p)| p)
    }
}

/// Coarse confidence bucket.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Find `High`, `Medium`, or `Low` (checked in that order,
    /// case-sensitive) anywhere in `label`.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            ("High", Confidence::High),
            ("Medium", Confidence::Medium),
            ("Low", Confidence::Low),
        ]
        .into_iter()
        .find(|(needle, _)| label.contains(needle))
        .map(|(_, c)| c)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_result() -> AnalysisResult {
    AnalysisResult {
        core_intent_prompt: "A".into(),
        ui_system_prompt: "B".into(),
        component_prompts: ComponentPrompts {
            navigation: "n".into(),
            hero: "h".into(),
            content_sections: "c".into(),
            cards_or_data: "d".into(),
            footer_or_cta: "f".into(),
        },
        style_dna: vec!["Minimal".into()],
        assumptions: "none".into(),
        confidence_level: "High confidence".into(),
    }
}
