//! Discovery survey -> organization search query.
//!
//! Answers are positional:
//!
//! | index | question        | effect                                      |
//! |-------|-----------------|---------------------------------------------|
//! | 0     | cause           | filter: NTEE prefix in cause's set          |
//! | 1     | location        | 2 chars: state filter, else boosted city    |
//! | 2     | org size        | filter: asset_amt range                     |
//! | 3     | org age         | filter: ruling date range                   |
//! | 4     | work setting    | boosted name keywords                       |
//!
//! Missing or unrecognized answers add nothing. The translation never fails;
//! an empty survey yields a match-all query.

use chrono::{Datelike, Utc};

use crate::models::SurveyAnswer;
use crate::search::query::{Clause, SearchQuery};

/// Result cap for survey searches.
pub const SURVEY_RESULT_SIZE: usize = 50;

const CITY_BOOST: f32 = 2.0;
const KEYWORD_BOOST: f32 = 1.5;

const CAUSE_NTEE_PREFIXES: &[(&str, &[&str])] = &[
    ("Education & Youth Development", &["B", "O"]),
    ("Environmental Conservation", &["C"]),
    ("Health & Medical", &["E", "H"]),
    ("Poverty & Homelessness", &["K", "L", "P"]),
    ("Legal Aid & Human Rights", &["I", "R"]),
];

/// Asset brackets as `[gte, lt)`.
const SIZE_BRACKETS: &[(&str, Option<i64>, Option<i64>)] = &[
    ("Small (Less than $100K)", None, Some(100_000)),
    ("Medium ($100K–$1M)", Some(100_000), Some(1_000_000)),
    ("Large (More than $1M)", Some(1_000_000), None),
];

const ENVIRONMENT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Office/Indoor setting", &["association", "society", "institute"]),
    ("Outdoor activities", &["park", "trail", "garden", "outdoor"]),
    ("Community centers", &["community", "center", "neighborhood"]),
    ("Virtual/Online work", &["online", "digital", "network"]),
];

fn cause_prefixes(cause: &str) -> &'static [&'static str] {
    CAUSE_NTEE_PREFIXES
        .iter()
        .find(|(label, _)| *label == cause)
        .map(|(_, prefixes)| *prefixes)
        .unwrap_or(&[])
}

fn size_range(bracket: &str) -> Option<(Option<i64>, Option<i64>)> {
    SIZE_BRACKETS
        .iter()
        .find(|(label, _, _)| *label == bracket)
        .map(|(_, gte, lt)| (*gte, *lt))
}

fn environment_keywords(environment: &str) -> &'static [&'static str] {
    ENVIRONMENT_KEYWORDS
        .iter()
        .find(|(label, _)| *label == environment)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// Ruling-date filter for an age answer. Newer cues are checked first, so an
/// answer mentioning both "newer" and "established" is treated as newer.
fn age_filter(answer: &str, current_year: i32) -> Option<Clause> {
    let answer = answer.to_lowercase();
    if answer.contains("under 5") || answer.contains("newer") {
        let since = i64::from(current_year - 5) * 100;
        return Some(Clause::range("ruling", Some(since), None));
    }
    if answer.contains("10+") || answer.contains("established") {
        let before = i64::from(current_year - 10) * 100;
        return Some(Clause::range("ruling", None, Some(before)));
    }
    None
}

fn answer_at(answers: &[SurveyAnswer], index: usize) -> Option<String> {
    answers.get(index).and_then(SurveyAnswer::answer_text)
}

/// Translate survey answers using the current UTC year for age brackets.
pub fn translate(answers: &[SurveyAnswer]) -> SearchQuery {
    translate_for_year(answers, Utc::now().year())
}

pub fn translate_for_year(answers: &[SurveyAnswer], current_year: i32) -> SearchQuery {
    let mut query = SearchQuery::new(SURVEY_RESULT_SIZE);

    if let Some(cause) = answer_at(answers, 0) {
        let prefixes = cause_prefixes(&cause);
        if !prefixes.is_empty() {
            query.filter.push(Clause::any_of(
                prefixes.iter().map(|p| Clause::prefix("ntee", *p)).collect(),
            ));
        }
    }

    if let Some(location) = answer_at(answers, 1) {
        let location = location.trim();
        if location.chars().count() == 2 {
            query
                .filter
                .push(Clause::term("state", location.to_uppercase()));
        } else if !location.is_empty() {
            query
                .should
                .push(Clause::boosted_match("city", location, CITY_BOOST));
        }
    }

    if let Some(bracket) = answer_at(answers, 2) {
        if let Some((gte, lt)) = size_range(&bracket) {
            query.filter.push(Clause::range("asset_amt", gte, lt));
        }
    }

    if let Some(age) = answer_at(answers, 3) {
        if let Some(clause) = age_filter(&age, current_year) {
            query.filter.push(clause);
        }
    }

    if let Some(environment) = answer_at(answers, 4) {
        for keyword in environment_keywords(&environment) {
            query
                .should
                .push(Clause::boosted_match("name", *keyword, KEYWORD_BOOST));
        }
    }

    query
}
