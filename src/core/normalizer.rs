use serde::{Deserialize, Serialize};

use crate::core::vocabulary::{SectionKind, Vocabulary};

/// Heading decoration stripped before a line is compared to header phrases
const HEADING_DECORATION: &[char] = &['#', '*', '-', '=', '_', ':', '|', '.', '•'];

/// Longest heading, in words, recognised without a trailing colon
const MAX_HEADING_WORDS: usize = 5;

/// A run of lines under one heading (or before any heading)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// `None` for text that precedes every heading
    pub kind: Option<SectionKind>,
    /// The heading line as it appeared, e.g. `experience: 5 years`
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

impl Section {
    fn unlabeled() -> Self {
        Self { kind: None, heading: None, lines: Vec::new() }
    }

    fn labeled(kind: SectionKind, heading: &str) -> Self {
        Self {
            kind: Some(kind),
            heading: Some(heading.to_string()),
            lines: Vec::new(),
        }
    }

    /// Lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flat_map(|line| line.split_whitespace())
    }

    pub fn is_unlabeled(&self) -> bool {
        self.kind.is_none()
    }
}

/// Lower-cased, whitespace-collapsed resume split into sections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedText {
    pub sections: Vec<Section>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn has_section(&self, kind: &SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind.as_ref() == Some(kind))
    }

    /// Sections labelled `kind`.
    ///
    /// When the document has none, every section not labelled with another
    /// extraction kind (experience or education) is returned instead.
    pub fn scoped(&self, kind: &SectionKind) -> Vec<&Section> {
        if self.has_section(kind) {
            self.sections
                .iter()
                .filter(|s| s.kind.as_ref() == Some(kind))
                .collect()
        } else {
            self.sections
                .iter()
                .filter(|s| !matches!(s.kind, Some(SectionKind::Experience | SectionKind::Education)))
                .collect()
        }
    }

    /// Whole document including heading lines, sections in order
    pub fn full_text(&self) -> String {
        self.sections
            .iter()
            .flat_map(|s| s.heading.iter().chain(s.lines.iter()))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Normalize raw resume text.
///
/// Lower-cases, collapses whitespace within each line, drops blank lines and
/// splits the result into sections at lines recognised as headings. Never
/// fails; empty input gives an empty document.
pub fn normalize(raw_text: &str, vocabulary: &Vocabulary) -> NormalizedText {
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Section::unlabeled();

    for raw_line in raw_text.lines() {
        let line = collapse_whitespace(&raw_line.to_lowercase());
        if line.is_empty() {
            continue;
        }

        match detect_heading(&line, vocabulary) {
            Some((kind, inline)) => {
                if !current.lines.is_empty() || current.kind.is_some() {
                    sections.push(current);
                }
                current = Section::labeled(kind, &line);
                if let Some(content) = inline {
                    current.lines.push(content);
                }
            }
            None => current.lines.push(line),
        }
    }

    if !current.lines.is_empty() || current.kind.is_some() {
        sections.push(current);
    }

    NormalizedText { sections }
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Recognise `line` as a heading, returning its kind and any inline content
/// following a `header:` prefix.
fn detect_heading(line: &str, vocabulary: &Vocabulary) -> Option<(SectionKind, Option<String>)> {
    let bare = line.trim_matches(|c: char| c.is_whitespace() || HEADING_DECORATION.contains(&c));

    if !bare.is_empty() && bare.split_whitespace().count() <= MAX_HEADING_WORDS {
        if let Some(kind) = vocabulary.section_for_header(bare) {
            return Some((kind.clone(), None));
        }
    }

    // "skills: python, sql" style headings
    let (head, rest) = line.split_once(':')?;
    let head = head.trim_matches(|c: char| c.is_whitespace() || HEADING_DECORATION.contains(&c));
    let kind = vocabulary.section_for_header(head)?;
    let rest = rest.trim();

    Some((kind.clone(), (!rest.is_empty()).then(|| rest.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let vocab = Vocabulary::default();
        assert!(normalize("", &vocab).is_empty());
        assert!(normalize("   \n\t\n", &vocab).is_empty());
    }

    #[test]
    fn test_no_headings_single_unlabeled_section() {
        let vocab = Vocabulary::default();
        let text = normalize("Python   Developer,\t2018–2021\nLagos", &vocab);

        assert_eq!(text.sections.len(), 1);
        assert!(text.sections[0].is_unlabeled());
        assert_eq!(text.sections[0].lines, vec!["python developer, 2018–2021", "lagos"]);
    }

    #[test]
    fn test_sections_split_on_headings() {
        let vocab = Vocabulary::default();
        let raw = "Jane Doe\n\n## WORK EXPERIENCE\nAcme Ltd 2019 - 2021\n\nEducation:\nBSc Physics\nSkills: Python, SQL";
        let text = normalize(raw, &vocab);

        let kinds: Vec<_> = text.sections.iter().map(|s| s.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(SectionKind::Experience),
                Some(SectionKind::Education),
                Some(SectionKind::Skills),
            ]
        );
        assert_eq!(text.sections[1].lines, vec!["acme ltd 2019 - 2021"]);
        assert_eq!(text.sections[3].lines, vec!["python, sql"]);
    }

    #[test]
    fn test_long_line_is_not_a_heading() {
        let vocab = Vocabulary::default();
        let text = normalize("I gained experience in many different fields of work", &vocab);
        assert_eq!(text.sections.len(), 1);
        assert!(text.sections[0].is_unlabeled());
    }

    #[test]
    fn test_scoped_falls_back_to_other_sections() {
        let vocab = Vocabulary::default();
        let text = normalize("intro line\nskills\npython\neducation\nbsc physics", &vocab);

        // no experience heading: everything except education
        let scoped = text.scoped(&SectionKind::Experience);
        assert_eq!(scoped.len(), 2);
        assert_eq!(scoped[0].lines, vec!["intro line"]);
        assert_eq!(scoped[1].lines, vec!["python"]);

        let scoped = text.scoped(&SectionKind::Skills);
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].lines, vec!["python"]);
    }

    #[test]
    fn test_full_text_keeps_heading_lines() {
        let vocab = Vocabulary::default();
        let text = normalize("Jane Doe\nExperience: 5 years\nEducation\nBSc Physics", &vocab);

        assert_eq!(text.sections[1].heading.as_deref(), Some("experience: 5 years"));
        assert_eq!(text.sections[1].lines, vec!["5 years"]);
        assert!(text.full_text().contains("experience: 5 years"));
        assert!(text.full_text().contains("\neducation\n"));
    }
}
