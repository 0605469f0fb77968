//! Syntax testing: valid and mutated strings for pattern-governed fields
//!
//! Each field declared with a regular expression gets:
//! - one **valid** string generated from the pattern
//! - four **invalid** variants, each a single localized edit of the valid
//!   string (the edits are independent, not cumulative):
//!   - `invalidValue`: a symbol appended
//!   - `invalidAddition`: a symbol inserted at a random position
//!   - `invalidOmission`: one character removed
//!   - `invalidSubstitution`: one character replaced by a random alphanumeric
//!
//! A field named like the configured date field (`Date` by default) ignores
//! its pattern and gets a real calendar date such as `29Feb2024`.

mod pattern;

pub use pattern::PatternGenerator;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Printable ASCII punctuation (33-47, 58-64, 91-96, 123-126)
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// A field governed by a regular expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SyntaxDefinition {
    /// Field name
    pub name: String,
    pub description: String,
    pub pattern: String,

    /// Declared data type (informational)
    #[serde(rename = "type", default)]
    pub data_type: String,

    /// Declared length (informational)
    #[serde(default)]
    pub length: String,
}

/// Generated strings for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxVariants {
    pub valid: String,
    pub invalid_value: String,
    pub invalid_substitution: String,
    pub invalid_omission: String,
    pub invalid_addition: String,
}

/// One syntax test case: the definition plus its generated strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxTestCase {
    pub name: String,
    pub description: String,
    pub regex: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub length: String,
    pub test_cases: SyntaxVariants,
}

/// Syntax generation options
#[derive(Debug, Clone)]
pub struct SyntaxOptions {
    /// Field name that gets a calendar date instead of pattern output
    pub date_field: String,
    /// Extra items allowed past a repetition's minimum
    pub max_repeat: u32,
}

impl Default for SyntaxOptions {
    fn default() -> Self {
        Self {
            date_field: "Date".to_string(),
            max_repeat: 5,
        }
    }
}

/// Cases for every field plus the fields that could not be generated
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SyntaxOutcome {
    pub cases: Vec<SyntaxTestCase>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate the test case for one field
pub fn synthesize(
    def: &SyntaxDefinition,
    options: &SyntaxOptions,
    rng: &mut impl Rng,
) -> Result<SyntaxTestCase> {
    let valid = if def.name == options.date_field {
        random_date(rng)?
    } else {
        PatternGenerator::new(&def.pattern, options.max_repeat)?.generate(rng)?
    };

    Ok(SyntaxTestCase {
        name: def.name.clone(),
        description: def.description.clone(),
        regex: def.pattern.clone(),
        data_type: def.data_type.clone(),
        length: def.length.clone(),
        test_cases: mutate(&valid, rng),
    })
}

/// Generate cases for every field; a field whose pattern fails is reported
/// and skipped
pub fn synthesize_all(
    defs: &[SyntaxDefinition],
    options: &SyntaxOptions,
    rng: &mut impl Rng,
) -> SyntaxOutcome {
    let mut outcome = SyntaxOutcome::default();

    for def in defs {
        match synthesize(def, options, rng) {
            Ok(case) => outcome.cases.push(case),
            Err(e) => {
                let d = Diagnostic::warning(
                    DiagnosticCode::InvalidPattern,
                    format!("Field '{}': {}", def.name, e),
                )
                .with_subject(def.name.clone());
                d.log();
                outcome.diagnostics.push(d);
            }
        }
    }

    tracing::debug!(
        fields = defs.len(),
        cases = outcome.cases.len(),
        "generated syntax cases"
    );
    outcome
}

/// Derive the four invalid variants from a valid string
pub fn mutate(valid: &str, rng: &mut impl Rng) -> SyntaxVariants {
    let chars: Vec<char> = valid.chars().collect();

    let mut invalid_value = valid.to_string();
    invalid_value.push(random_from(SYMBOLS, rng));

    let mut addition = chars.clone();
    let add_pos = rng.gen_range(0..=chars.len());
    addition.insert(add_pos, random_from(SYMBOLS, rng));

    let mut omission = chars.clone();
    if !omission.is_empty() {
        let omit_pos = rng.gen_range(0..omission.len());
        omission.remove(omit_pos);
    }

    // May pick the character already there; the variant is then still valid.
    let mut substitution = chars;
    if !substitution.is_empty() {
        let sub_pos = rng.gen_range(0..substitution.len());
        substitution[sub_pos] = random_from(ALPHANUMERIC, rng);
    }

    SyntaxVariants {
        valid: valid.to_string(),
        invalid_value,
        invalid_substitution: substitution.into_iter().collect(),
        invalid_omission: omission.into_iter().collect(),
        invalid_addition: addition.into_iter().collect(),
    }
}

/// `DDMonYYYY` with a year in `[2000, 2100]` and a day valid for its month
pub fn random_date(rng: &mut impl Rng) -> Result<String> {
    let year = rng.gen_range(2000..=2100);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.format("%d%b%Y").to_string())
        .ok_or_else(|| Error::Other(format!("invalid date {}-{}-{}", year, month, day)))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(start), Some(end)) => end.signed_duration_since(start).num_days() as u32,
        _ => 28,
    }
}

fn random_from(set: &[u8], rng: &mut impl Rng) -> char {
    set.choose(rng).map(|&b| b as char).unwrap_or('#')
}
