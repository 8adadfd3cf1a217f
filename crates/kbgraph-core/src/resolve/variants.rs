//! Candidate spellings for a name that missed the resource catalog.
//!
//! Each rule is a pure function yielding at most one candidate; the chain is
//! applied in order and the output de-duplicated, so callers validate the
//! candidates against the catalog without caring which rule produced them.

use crate::text::dedup_in_order;

type CandidateRule = fn(&str) -> Option<String>;

const CANDIDATE_CHAIN: [CandidateRule; 4] = [
    append_plural_s,
    y_to_ies,
    summary_to_summaries,
    naive_singular,
];

/// Candidates for an already-normalized name, in rule order.
#[must_use]
pub fn name_variants(name: &str) -> Vec<String> {
    if name.is_empty() {
        return Vec::new();
    }
    dedup_in_order(CANDIDATE_CHAIN.iter().filter_map(|rule| rule(name)))
}

fn append_plural_s(name: &str) -> Option<String> {
    Some(format!("{name}s"))
}

fn y_to_ies(name: &str) -> Option<String> {
    let stem = name.strip_suffix('y')?;
    (!stem.is_empty()).then(|| format!("{stem}ies"))
}

pub(crate) fn summary_to_summaries(name: &str) -> Option<String> {
    name.strip_suffix("-summary")
        .map(|stem| format!("{stem}-summaries"))
}

fn naive_singular(name: &str) -> Option<String> {
    if name.len() <= 1 || !name.ends_with('s') {
        return None;
    }
    let singular = singularize_word(name);
    (singular != name).then_some(singular)
}

/// `parties` → `party`, `boxes` → `box`, `jobs` → `job`; `class` is left alone.
#[must_use]
pub fn singularize_word(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies")
        && !stem.is_empty()
    {
        return format!("{stem}y");
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") {
        return word.to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}
