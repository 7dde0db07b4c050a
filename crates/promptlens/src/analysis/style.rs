//! Catalog of known style DNA descriptors.
//!
//! The model is free to return any descriptor; the catalog only adds a
//! description and category for the ones it recognises.

use std::fmt;

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Aesthetic,
    Technical,
    Functional,
}

impl StyleCategory {
    /// Lowercase name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleCategory::Aesthetic => "aesthetic",
            StyleCategory::Technical => "technical",
            StyleCategory::Functional => "functional",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTrait {
    pub name: &'static str,
    pub description: &'static str,
    pub category: StyleCategory,
}

const fn style(name: &'static str, description: &'static str, category: StyleCategory) -> StyleTrait {
    StyleTrait {
        name,
        description,
        category,
    }
}

pub const STYLE_TRAITS: &[StyleTrait] = &[
    style("Minimal", "Clean, reduced visual elements", StyleCategory::Aesthetic),
    style("Editorial", "Magazine-like layout and typography", StyleCategory::Aesthetic),
    style("Brutalist", "Raw, unpolished design choices", StyleCategory::Aesthetic),
    style("Fintech-grade", "Professional financial services aesthetic", StyleCategory::Functional),
    style("Developer-centric", "Technical, code-focused design", StyleCategory::Functional),
    style("Crypto-native", "Web3/blockchain aesthetic elements", StyleCategory::Aesthetic),
    style("Enterprise-calm", "Conservative, trustworthy business style", StyleCategory::Functional),
    style("Experimental", "Unconventional, boundary-pushing design", StyleCategory::Aesthetic),
    style("Dashboard-heavy", "Data visualization focused", StyleCategory::Technical),
    style("Mobile-first", "Designed primarily for small screens", StyleCategory::Technical),
    style("Content-dense", "High information density layout", StyleCategory::Technical),
    style("Whitespace-rich", "Generous spacing and breathing room", StyleCategory::Aesthetic),
];

/// Case-insensitive lookup of a descriptor in [`STYLE_TRAITS`].
pub fn lookup(name: &str) -> Option<&'static StyleTrait> {
    let name = name.trim();
    STYLE_TRAITS
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
}
