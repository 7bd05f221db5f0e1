//! Years-of-experience extraction.
//!
//! Date ranges are turned into half-open month intervals, overlapping
//! intervals are merged (concurrent jobs count once) and the union is
//! summed. Explicit "N years of experience" statements are only used when no
//! range could be parsed.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::models::ExperienceEvidence;

/// Ranges starting before this year are treated as noise
const EARLIEST_YEAR: i32 = 1950;

/// Stated figures above this are ignored
const MAX_STATED_YEARS: u32 = 50;

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b
        (?:
            (?P<start_month>january|february|march|april|may|june|july|august|september|october|november|december
                |jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?,?\s+
          | (?P<start_num>\d{1,2})\s*/\s*
        )?
        (?P<start_year>(?:19|20)\d{2})
        \s*(?:-|–|—|to|until|till)\s*
        (?:
            (?:
                (?P<end_month>january|february|march|april|may|june|july|august|september|october|november|december
                    |jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?,?\s+
              | (?P<end_num>\d{1,2})\s*/\s*
            )?
            (?P<end_year>(?:19|20)\d{2})
          | (?P<open>present|current|now|today|date)
        )
        \b",
    )
    .unwrap()
});

static STATED_YEARS_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(\d{1,2})\+?\s*(?:years?|yrs?)\s*(?:of\s*)?(?:work\s*|professional\s*|relevant\s*|industry\s*)?experience",
        r"\bexperience\s*:?\s*(?:of\s*)?(\d{1,2})\+?\s*(?:years?|yrs?)\b",
        r"\b(?:over|more\s+than)\s+(\d{1,2})\s*(?:years?|yrs?)\b",
        r"\bworked\s*(?:for\s*)?(\d{1,2})\s*(?:years?|yrs?)\b",
        r"\b(\d{1,2})\s*(?:years?|yrs?)\s*working\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Half-open interval of months, `start..end`, counted from year 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthSpan {
    pub start: i32,
    pub end: i32,
}

impl MonthSpan {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Span starting at the first of `start_month` and ending before `end_month`
    pub fn from_months(start_year: i32, start_month: u32, end_year: i32, end_month: u32) -> Self {
        Self {
            start: month_index(start_year, start_month),
            end: month_index(end_year, end_month),
        }
    }

    pub fn months(&self) -> u32 {
        (self.end - self.start).max(0) as u32
    }
}

fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Month given by name or number. `Ok(None)` when absent, `Err` when invalid.
fn captured_month(caps: &Captures, name_group: &str, num_group: &str) -> Result<Option<u32>, ()> {
    if let Some(m) = caps.name(name_group) {
        return month_from_name(m.as_str()).map(Some).ok_or(());
    }
    if let Some(m) = caps.name(num_group) {
        return match m.as_str().parse::<u32>() {
            Ok(month) if (1..=12).contains(&month) => Ok(Some(month)),
            _ => Err(()),
        };
    }
    Ok(None)
}

fn span_from_captures(caps: &Captures, as_of: NaiveDate) -> Option<MonthSpan> {
    let current = month_index(as_of.year(), as_of.month());

    let start_year: i32 = caps.name("start_year")?.as_str().parse().ok()?;
    let start_month = captured_month(caps, "start_month", "start_num").ok()?.unwrap_or(1);

    // An explicit end month is inclusive; a bare end year means "by January".
    let end = if caps.name("open").is_some() {
        current + 1
    } else {
        let end_year: i32 = caps.name("end_year")?.as_str().parse().ok()?;
        match captured_month(caps, "end_month", "end_num").ok()? {
            Some(month) => month_index(end_year, month) + 1,
            None => month_index(end_year, 1),
        }
    };

    let start = month_index(start_year, start_month);
    let end = end.min(current + 1);

    if start_year < EARLIEST_YEAR || start > current || end <= start {
        return None;
    }

    Some(MonthSpan::new(start, end))
}

/// Every parsable date range in `text`, clamped to `as_of`
pub fn find_date_ranges(text: &str, as_of: NaiveDate) -> Vec<MonthSpan> {
    DATE_RANGE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let span = span_from_captures(&caps, as_of);
            if span.is_none() {
                tracing::trace!("Discarding unusable date range: {}", &caps[0]);
            }
            span
        })
        .collect()
}

/// Merge overlapping or touching spans into a sorted, disjoint set
pub fn merge_spans(mut spans: Vec<MonthSpan>) -> Vec<MonthSpan> {
    spans.sort();

    let mut merged: Vec<MonthSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Months covered by the union of `spans`
pub fn union_months(spans: &[MonthSpan]) -> u32 {
    merge_spans(spans.to_vec()).iter().map(MonthSpan::months).sum()
}

/// Largest explicit "N years" figure stated in `text`, zero included
pub fn find_stated_years(text: &str) -> Option<u32> {
    STATED_YEARS_RES
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .filter(|years| *years <= MAX_STATED_YEARS)
        .max()
}

/// Whole years of experience and how they were established.
///
/// `range_text` is searched for date ranges; `statement_text` for explicit
/// statements when no range is usable.
pub fn years_of_experience(
    range_text: &str,
    statement_text: &str,
    as_of: NaiveDate,
) -> (Option<u32>, ExperienceEvidence) {
    let spans = find_date_ranges(range_text, as_of);
    if !spans.is_empty() {
        let months = union_months(&spans);
        return (
            Some(months / 12),
            ExperienceEvidence::DateRanges {
                ranges: spans.len(),
                months,
            },
        );
    }

    match find_stated_years(statement_text) {
        Some(years) => (Some(years), ExperienceEvidence::Statement),
        None => (None, ExperienceEvidence::Undetermined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    #[test]
    fn test_year_pair() {
        let spans = find_date_ranges("python developer, 2018–2021", as_of());
        assert_eq!(spans, vec![MonthSpan::from_months(2018, 1, 2021, 1)]);
        assert_eq!(spans[0].months(), 36);
    }

    #[test]
    fn test_month_names_and_numbers() {
        let spans = find_date_ranges("jan 2020 - mar 2020\n03/2021 to 05/2021", as_of());
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].months(), 3);
        assert_eq!(spans[1].months(), 3);

        let spans = find_date_ranges("september, 2019 – february 2020", as_of());
        assert_eq!(spans[0].months(), 6);
    }

    #[test]
    fn test_open_end_resolves_to_as_of() {
        let spans = find_date_ranges("june 2025 - present", as_of());
        assert_eq!(spans, vec![MonthSpan::from_months(2025, 6, 2026, 7)]);
        assert_eq!(spans[0].months(), 13);
    }

    #[test]
    fn test_invalid_ranges_discarded() {
        assert!(find_date_ranges("2021 - 2018", as_of()).is_empty());
        assert!(find_date_ranges("13/2019 - 02/2020", as_of()).is_empty());
        assert!(find_date_ranges("1901 - 1905", as_of()).is_empty());
        assert!(find_date_ranges("2030 - 2032", as_of()).is_empty());
    }

    #[test]
    fn test_future_end_is_clamped() {
        let spans = find_date_ranges("jan 2026 - dec 2030", as_of());
        assert_eq!(spans[0].months(), 6);
    }

    #[test]
    fn test_word_starting_with_month_prefix_is_not_a_month() {
        let spans = find_date_ranges("marketing 2019 - 2020", as_of());
        assert_eq!(spans, vec![MonthSpan::from_months(2019, 1, 2020, 1)]);
    }

    #[test]
    fn test_concurrent_jobs_not_double_counted() {
        let text = "acme: jan 2020 - jan 2022\nglobex: jan 2020 - jan 2022";
        let (years, evidence) = years_of_experience(text, text, as_of());

        assert_eq!(years, Some(2));
        assert_eq!(
            evidence,
            ExperienceEvidence::DateRanges { ranges: 2, months: 25 }
        );
    }

    #[test]
    fn test_partial_overlap_merged() {
        let spans = vec![
            MonthSpan::new(0, 12),
            MonthSpan::new(6, 18),
            MonthSpan::new(30, 36),
        ];
        assert_eq!(
            merge_spans(spans.clone()),
            vec![MonthSpan::new(0, 18), MonthSpan::new(30, 36)]
        );
        assert_eq!(union_months(&spans), 24);
    }

    #[test]
    fn test_stated_years_fallback() {
        let (years, evidence) = years_of_experience("", "i have 5+ years of experience in sql", as_of());
        assert_eq!(years, Some(5));
        assert_eq!(evidence, ExperienceEvidence::Statement);
    }

    #[test]
    fn test_explicit_zero_is_not_null() {
        assert_eq!(find_stated_years("0 years of experience"), Some(0));
        assert_eq!(find_stated_years("experience: 0 years"), Some(0));
    }

    #[test]
    fn test_stated_years_takes_maximum_and_ignores_implausible() {
        assert_eq!(find_stated_years("over 3 years ... worked for 7 years"), Some(7));
        assert_eq!(find_stated_years("99 years of experience"), None);
    }

    #[test]
    fn test_nothing_parsable_is_null() {
        let (years, evidence) = years_of_experience("worked at acme", "worked at acme", as_of());
        assert_eq!(years, None);
        assert_eq!(evidence, ExperienceEvidence::Undetermined);
    }
}
