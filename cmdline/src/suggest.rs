//! "Did you mean" suggestions for unknown long options.
//!
//! Candidates are scored with the Jaro-Winkler similarity: the Jaro score
//! rewards characters that match within a sliding window and tolerates
//! transpositions, and the Winkler step boosts pairs that share a prefix of
//! up to four characters.

use crate::table::OptionTable;

/// Minimum similarity a candidate must reach.
pub const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Longest common prefix the Winkler boost considers.
const MAX_PREFIX: usize = 4;

/// Boost per shared prefix character.
const PREFIX_SCALE: f64 = 0.1;

/// Best matching option name and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suggestion<'t> {
    pub name: &'t str,
    pub score: f64,
}

/// Jaro-Winkler similarity of two strings, in `[0, 1]`.
///
/// Compares Unicode scalar values, case-sensitively.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::jaro_winkler;
///
/// assert_eq!(jaro_winkler("video", "video"), 1.0);
/// assert!(jaro_winkler("vidoe", "video") > 0.9);
/// assert_eq!(jaro_winkler("xyz123", "video"), 0.0);
/// ```
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, &ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && b[j] == ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Matched characters of `b` in order, paired with those of `a`.
    let b_in_order = b
        .iter()
        .zip(&b_matched)
        .filter_map(|(c, &m)| m.then_some(c));
    let half_transpositions = a
        .iter()
        .zip(&a_matched)
        .filter_map(|(c, &m)| m.then_some(c))
        .zip(b_in_order)
        .filter(|(x, y)| x != y)
        .count();

    let m = matches as f64;
    let t = half_transpositions as f64 / 2.0;
    let jaro = (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0;

    let prefix = a
        .iter()
        .zip(&b)
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    jaro + prefix as f64 * PREFIX_SCALE * (1.0 - jaro)
}

/// Finds the table row closest to `name`.
///
/// Obsolete rows are never proposed. A candidate replaces the current best
/// only with a strictly higher score, so ties go to the row registered
/// first. Returns `None` when nothing reaches `threshold`.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::{OptionTable, ParserConfig, suggest};
/// use modopts_core::{Module, ParameterCatalog, ParameterDescriptor};
///
/// let mut catalog = ParameterCatalog::new();
/// catalog.push(Module::new("core").with_param(ParameterDescriptor::boolean("video")));
/// let table = OptionTable::build(&catalog, &ParserConfig::default()).unwrap();
///
/// assert_eq!(suggest("vidoe", &table, 0.8).unwrap().name, "video");
/// assert!(suggest("xyz123", &table, 0.8).is_none());
/// ```
pub fn suggest<'t>(
    name: &str,
    table: &'t OptionTable<'_>,
    threshold: f64,
) -> Option<Suggestion<'t>> {
    let mut best: Option<Suggestion<'t>> = None;
    let mut best_score = threshold;

    for entry in table.entries().iter().filter(|e| !e.obsolete) {
        let score = jaro_winkler(name, &entry.name);
        if score > best_score || (best.is_none() && score >= threshold) {
            best = Some(Suggestion {
                name: &entry.name,
                score,
            });
            best_score = score;
        }
    }

    best
}
