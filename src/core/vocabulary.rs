//! Compiled vocabularies shared read-only by every scoring run.
//!
//! A `Vocabulary` is built once from `VocabularySettings` and passed
//! explicitly (usually behind an `Arc`) into the normalizer, extractor and
//! program catalog. Nothing here is process-global.

use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::VocabularySettings;
use crate::error::ConfigurationError;
use crate::models::EducationLevel;

/// Logical resume section a heading introduces
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Summary,
    Projects,
    Certifications,
    Other(String),
}

impl SectionKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "experience" => SectionKind::Experience,
            "education" => SectionKind::Education,
            "skills" => SectionKind::Skills,
            "summary" => SectionKind::Summary,
            "projects" => SectionKind::Projects,
            "certifications" => SectionKind::Certifications,
            other => SectionKind::Other(other.to_string()),
        }
    }
}

/// A match of a vocabulary term inside a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermHit<T> {
    pub value: T,
    pub start: usize,
    pub end: usize,
}

/// Whole-word multi-pattern matcher mapping every surface form to a value
#[derive(Debug, Clone)]
pub struct TermMatcher<T> {
    automaton: AhoCorasick,
    values: Vec<T>,
}

impl<T: Clone> TermMatcher<T> {
    fn build(terms: Vec<(String, T)>) -> Result<Self, ConfigurationError> {
        let (patterns, values): (Vec<String>, Vec<T>) = terms.into_iter().unzip();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ConfigurationError::Matcher(e.to_string()))?;

        Ok(Self { automaton, values })
    }

    /// All whole-word occurrences, in order of their start offset.
    ///
    /// `text` is expected to be lower-cased already.
    pub fn find_all(&self, text: &str) -> Vec<TermHit<T>> {
        let mut hits: Vec<TermHit<T>> = self
            .automaton
            .find_overlapping_iter(text)
            .filter(|m| is_whole_word(text, m.start(), m.end()))
            .map(|m| TermHit {
                value: self.values[m.pattern().as_usize()].clone(),
                start: m.start(),
                end: m.end(),
            })
            .collect();

        hits.sort_by_key(|hit| (hit.start, std::cmp::Reverse(hit.end)));
        hits
    }
}

/// Alphanumerics plus the symbols that are part of names like `c++` and `c#`
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    !before.map_or(false, is_word_char) && !after.map_or(false, is_word_char)
}

/// Canonical form of a vocabulary term or skill name: lower-cased, single spaces
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Skill, section-header and education vocabularies, compiled for matching
#[derive(Debug, Clone)]
pub struct Vocabulary {
    skills: TermMatcher<usize>,
    skill_names: Vec<String>,
    skill_categories: Vec<Option<String>>,
    headers: BTreeMap<String, SectionKind>,
    education: TermMatcher<EducationLevel>,
    degree_exclusions: TermMatcher<()>,
}

impl Vocabulary {
    pub fn from_settings(settings: &VocabularySettings) -> Result<Self, ConfigurationError> {
        if settings.skills.is_empty() {
            return Err(ConfigurationError::EmptyVocabulary("skill"));
        }
        if settings.sections.is_empty() {
            return Err(ConfigurationError::EmptyVocabulary("section"));
        }

        // Skills: canonical name is itself a surface form
        let mut skill_names = Vec::with_capacity(settings.skills.len());
        let mut skill_categories = Vec::with_capacity(settings.skills.len());
        let mut seen = BTreeSet::new();
        let mut skill_terms = Vec::new();

        for entry in &settings.skills {
            let canonical = normalize_term(&entry.name);
            if canonical.is_empty() {
                return Err(ConfigurationError::EmptyVocabulary("skill name"));
            }
            if !seen.insert(canonical.clone()) {
                return Err(ConfigurationError::DuplicateVocabularyEntry(canonical));
            }

            let index = skill_names.len();
            skill_names.push(canonical.clone());
            skill_categories.push(
                entry
                    .category
                    .as_deref()
                    .map(normalize_term)
                    .filter(|c| !c.is_empty()),
            );
            skill_terms.push((canonical, index));

            for alias in &entry.aliases {
                let alias = normalize_term(alias);
                if alias.is_empty() {
                    return Err(ConfigurationError::EmptyVocabulary("skill alias"));
                }
                skill_terms.push((alias, index));
            }
        }

        // Section headers
        let mut headers = BTreeMap::new();
        for entry in &settings.sections {
            let kind = SectionKind::from_label(&entry.label);
            for header in &entry.headers {
                let header = normalize_term(header);
                if header.is_empty() {
                    return Err(ConfigurationError::EmptyVocabulary("section header"));
                }
                if headers.insert(header.clone(), kind.clone()).is_some() {
                    return Err(ConfigurationError::DuplicateVocabularyEntry(header));
                }
            }
        }

        for (required, label) in [
            (SectionKind::Experience, "experience"),
            (SectionKind::Education, "education"),
        ] {
            if !headers.values().any(|kind| *kind == required) {
                return Err(ConfigurationError::MissingSection(label));
            }
        }

        // Education ordinal
        let mut education_terms = Vec::new();
        for (level, terms) in settings.education.levels() {
            for term in terms {
                let term = normalize_term(term);
                if term.is_empty() {
                    return Err(ConfigurationError::EmptyVocabulary("education keyword"));
                }
                education_terms.push((term, level));
            }
        }
        if education_terms.is_empty() {
            return Err(ConfigurationError::EmptyVocabulary("education"));
        }

        let exclusion_terms = settings
            .education
            .exclusions
            .iter()
            .map(|phrase| normalize_term(phrase))
            .filter(|phrase| !phrase.is_empty())
            .map(|phrase| (phrase, ()))
            .collect();

        Ok(Self {
            skills: TermMatcher::build(skill_terms)?,
            skill_names,
            skill_categories,
            headers,
            education: TermMatcher::build(education_terms)?,
            degree_exclusions: TermMatcher::build(exclusion_terms)?,
        })
    }

    /// Canonical skill names found in `text`, deduplicated
    pub fn find_skills(&self, text: &str) -> BTreeSet<String> {
        self.skills
            .find_all(text)
            .into_iter()
            .map(|hit| self.skill_names[hit.value].clone())
            .collect()
    }

    pub fn knows_skill(&self, name: &str) -> bool {
        let name = normalize_term(name);
        self.skill_names.iter().any(|known| *known == name)
    }

    pub fn skill_names(&self) -> &[String] {
        &self.skill_names
    }

    /// Category of a canonical skill, if the vocabulary assigns one
    pub fn category_of(&self, skill: &str) -> Option<&str> {
        let skill = normalize_term(skill);
        let index = self.skill_names.iter().position(|known| *known == skill)?;
        self.skill_categories[index].as_deref()
    }

    /// Section kind for an exact header phrase
    pub fn section_for_header(&self, phrase: &str) -> Option<&SectionKind> {
        self.headers.get(phrase)
    }

    /// Degree keywords in `text`, skipping those inside an excluded phrase
    /// such as "scrum master"
    pub fn find_degrees(&self, text: &str) -> Vec<TermHit<EducationLevel>> {
        let excluded = self.degree_exclusions.find_all(text);

        self.education
            .find_all(text)
            .into_iter()
            .filter(|hit| {
                !excluded
                    .iter()
                    .any(|ex| ex.start < hit.end && hit.start < ex.end)
            })
            .collect()
    }
}

impl Default for Vocabulary {
    /// Built-in vocabulary; the defaults are known to be valid
    fn default() -> Self {
        Self::from_settings(&VocabularySettings::default())
            .expect("built-in vocabulary is valid")
    }
}
