use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::ExtractionSettings;
use crate::core::experience::years_of_experience;
use crate::core::normalizer::{NormalizedText, Section};
use crate::core::vocabulary::{SectionKind, Vocabulary};
use crate::models::{EducationLevel, ExtractedProfile};

/// Characters that end a field-of-study phrase
const FIELD_TERMINATORS: &[char] = &[',', ';', '.', '(', ')', '|', '\n'];

/// Leading tokens dropped before a field of study when no "in" is present
const FIELD_FILLER: &[&str] = &["s", "of", "degree", "the", "a", "an", "in", "hons", "honours"];

/// Tokens that mark the start of an institution or date rather than a field
const FIELD_STOP: &[&str] = &["from", "at", "university", "college", "institute", "school", "with"];

/// Rule-based extractor for skills, experience and education.
///
/// Extraction never fails: anything it cannot determine is left as `None`.
/// Without a pinned reference date, "present" resolves to the current date
/// on every call.
#[derive(Debug, Clone)]
pub struct Extractor {
    vocabulary: Arc<Vocabulary>,
    as_of: Option<NaiveDate>,
    field_window: usize,
}

impl Extractor {
    /// Extractor with a pinned reference date
    pub fn new(vocabulary: Arc<Vocabulary>, as_of: NaiveDate) -> Self {
        Self {
            vocabulary,
            as_of: Some(as_of),
            field_window: 6,
        }
    }

    pub fn from_settings(vocabulary: Arc<Vocabulary>, settings: &ExtractionSettings) -> Self {
        Self {
            vocabulary,
            as_of: settings.as_of,
            field_window: settings.field_of_study_window.max(1),
        }
    }

    pub fn with_field_window(mut self, tokens: usize) -> Self {
        self.field_window = tokens.max(1);
        self
    }

    /// Reference date for open-ended ranges, resolved now if not pinned
    pub fn as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn pinned_as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn extract(&self, text: &NormalizedText) -> ExtractedProfile {
        if text.is_empty() {
            return ExtractedProfile::unknown();
        }

        let full_text = text.full_text();
        let skills = self.extract_skills(&full_text);
        let skill_categories = self.categorise(&skills);

        let experience_text = joined(&text.scoped(&SectionKind::Experience));
        let (experience_years, experience_evidence) =
            years_of_experience(&experience_text, &full_text, self.as_of());

        let education_text = joined(&text.scoped(&SectionKind::Education));
        let (education_level, field_of_study) = self.extract_education(&education_text);

        tracing::debug!(
            "Extracted {} skills, experience={:?}, education={:?}",
            skills.len(),
            experience_years,
            education_level
        );

        ExtractedProfile {
            skills,
            experience_years,
            experience_evidence,
            education_level,
            field_of_study,
            skill_categories,
        }
    }

    fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        self.vocabulary.find_skills(text)
    }

    fn categorise(&self, skills: &BTreeSet<String>) -> BTreeMap<String, String> {
        skills
            .iter()
            .filter_map(|skill| {
                let category = self.vocabulary.category_of(skill)?;
                Some((skill.clone(), category.to_string()))
            })
            .collect()
    }

    /// Highest degree level in `text` plus the field of study next to it
    fn extract_education(&self, text: &str) -> (Option<EducationLevel>, Option<String>) {
        let hits = self.vocabulary.find_degrees(text);

        let Some(level) = hits.iter().map(|hit| hit.value).max() else {
            return (None, None);
        };

        let field = hits
            .iter()
            .filter(|hit| hit.value == level)
            .find_map(|hit| field_of_study(&text[hit.end..], self.field_window));

        (Some(level), field)
    }
}

fn joined(sections: &[&Section]) -> String {
    sections
        .iter()
        .map(|s| s.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Field-of-study phrase at the start of `after` (the text following a
/// degree keyword), bounded to `window` tokens.
fn field_of_study(after: &str, window: usize) -> Option<String> {
    let after = after.trim_start_matches(|c: char| !c.is_alphanumeric() && c != '\n');
    let clause = after.split(FIELD_TERMINATORS).next()?;

    let tokens: Vec<&str> = clause.split_whitespace().take(window).collect();

    let tokens: &[&str] = match tokens.iter().position(|t| *t == "in") {
        Some(index) => &tokens[index + 1..],
        None => {
            let skip = tokens
                .iter()
                .take_while(|t| FIELD_FILLER.contains(t))
                .count();
            &tokens[skip..]
        }
    };

    let field: Vec<&str> = tokens
        .iter()
        .take_while(|t| !FIELD_STOP.contains(t) && !t.chars().any(|c| c.is_ascii_digit()))
        .copied()
        .collect();

    (!field.is_empty()).then(|| field.join(" "))
}
