//! Query normalization and catalog matching.
//!
//! Matching is deliberately simple: lowercase the query, expand a fixed
//! synonym table by literal substring replacement, then accept a record
//! when any whitespace token appears inside its lowercased name+reference.
//! Results keep source order; display truncation is the caller's job.

use crate::domain::product::ProductRecord;

/// Colloquial terms mapped onto the stems the catalog actually uses.
/// Several replacements may apply to the same query.
const SYNONYMS: &[(&str, &str)] = &[
    ("televisor", "tv"),
    ("refrigerador", "refrigera"),
    ("nevera", "refrigera"),
    ("refri", "refrigera"),
];

/// Appliance and brand vocabulary that marks a message as a product query.
const PRODUCT_KEYWORDS: &[&str] = &[
    "lavadora",
    "nevera",
    "licuadora",
    "televisor",
    "tv",
    "microondas",
    "sony",
    "samsung",
    "lg",
    "oster",
    "haceb",
    "estufa",
    "horno",
    "air fryer",
    "cafetera",
];

/// Greeting/farewell words excluded from the implicit short-message rule.
const SMALL_TALK_WORDS: &[&str] = &["hola", "gracias", "adios"];

/// Messages shorter than this many words are treated as implicit product
/// queries when no keyword matched. Known-fragile heuristic: a stray short
/// message like "ok" will run a search and find nothing.
const IMPLICIT_QUERY_MAX_WORDS: usize = 6;

/// Lowercases, trims, and applies the synonym table.
///
/// One left-to-right pass over the original query, longest term first at
/// each position. Replacement output is never re-scanned, so a term whose
/// replacement contains another term ("nevera" -> "refrigera", which holds
/// "refri") cannot trigger a second rewrite.
pub fn normalize_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    let mut rest = lowered.trim();
    let mut normalized = String::with_capacity(rest.len());

    while !rest.is_empty() {
        let hit = SYNONYMS
            .iter()
            .filter(|(term, _)| rest.starts_with(term))
            .max_by_key(|(term, _)| term.len());

        if let Some((term, replacement)) = hit {
            normalized.push_str(replacement);
            rest = &rest[term.len()..];
        } else if let Some(ch) = rest.chars().next() {
            normalized.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    normalized
}

/// Returns the records matching `query`, in source order.
///
/// A record matches when any token of the normalized query is a substring
/// of its lowercased name and reference.
pub fn search_records<'a>(records: &'a [ProductRecord], query: &str) -> Vec<&'a ProductRecord> {
    let normalized = normalize_query(query);
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| {
            let haystack =
                format!("{} {}", record.name.to_lowercase(), record.reference.to_lowercase());
            tokens.iter().any(|token| haystack.contains(token))
        })
        .collect()
}

/// Decides whether a lowered, trimmed message should be treated as a
/// product query, and with what search text.
///
/// An explicit keyword hit wins and searches for the keyword itself. A
/// short message with no keyword and no small talk is assumed to be a
/// product name and searched verbatim.
pub fn detect_product_query(message: &str) -> Option<String> {
    if let Some(keyword) = PRODUCT_KEYWORDS.iter().find(|keyword| message.contains(*keyword)) {
        return Some((*keyword).to_string());
    }

    let is_short = message.split_whitespace().count() < IMPLICIT_QUERY_MAX_WORDS;
    let is_small_talk = SMALL_TALK_WORDS.iter().any(|word| message.contains(word));
    if is_short && !is_small_talk && !message.is_empty() {
        return Some(message.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(reference: &str, name: &str) -> ProductRecord {
        ProductRecord {
            reference: reference.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn catalog() -> Vec<ProductRecord> {
        vec![
            record("TV-55S", "TV Samsung 55 pulgadas"),
            record("REF-300", "Refrigerador Haceb 300L"),
            record("LAV-18", "Lavadora LG 18kg"),
            record("LIC-02", "Licuadora Oster clasica"),
        ]
    }

    #[test]
    fn synonym_replacement_output_is_not_rewritten_again() {
        // "refrigera" contains "refri"; a second pass would corrupt it.
        assert_eq!(normalize_query("nevera"), "refrigera");
        assert_eq!(normalize_query("refrigerador"), "refrigera");
        assert_eq!(normalize_query("refri"), "refrigera");
    }

    #[test]
    fn longest_term_wins_at_a_shared_prefix() {
        assert_eq!(normalize_query("refrigerador haceb"), "refrigera haceb");
    }

    #[test]
    fn televisor_expands_to_tv() {
        let records = catalog();
        let results = search_records(&records, "Televisor");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].reference, "TV-55S");
    }

    #[test]
    fn nevera_expands_to_refrigera() {
        let records = catalog();
        let results = search_records(&records, "nevera");
        assert_eq!(results.len(), 1);
        assert!(results[0].name.to_lowercase().contains("refrigera"));
    }

    #[test]
    fn refri_and_refrigerador_reach_the_same_record() {
        let records = catalog();
        assert_eq!(search_records(&records, "refri"), search_records(&records, "refrigerador"));
    }

    #[test]
    fn any_token_matching_is_enough() {
        let records = catalog();
        let results = search_records(&records, "lavadora barata");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].reference, "LAV-18");
    }

    #[test]
    fn reference_field_is_searched_too() {
        let records = catalog();
        let results = search_records(&records, "ref-300");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn results_keep_source_order_and_are_stable() {
        let records = catalog();
        let first = search_records(&records, "samsung lg");
        let second = search_records(&records, "samsung lg");
        assert_eq!(first, second);
        assert_eq!(first[0].reference, "TV-55S");
        assert_eq!(first[1].reference, "LAV-18");
    }

    #[test]
    fn blank_query_matches_nothing() {
        let records = catalog();
        assert!(search_records(&records, "   ").is_empty());
    }

    #[test]
    fn keyword_hit_searches_the_keyword_itself() {
        let detected = detect_product_query("tienes alguna nevera disponible por favor dime");
        assert_eq!(detected.as_deref(), Some("nevera"));
    }

    #[test]
    fn short_unknown_message_becomes_an_implicit_query() {
        let detected = detect_product_query("plancha a vapor");
        assert_eq!(detected.as_deref(), Some("plancha a vapor"));
    }

    #[test]
    fn greetings_are_not_product_queries() {
        assert_eq!(detect_product_query("hola"), None);
        assert_eq!(detect_product_query("muchas gracias"), None);
        assert_eq!(detect_product_query("adios"), None);
    }

    #[test]
    fn long_messages_without_keywords_are_not_queries() {
        let detected =
            detect_product_query("me gustaria saber como funciona el proceso de envios aqui");
        assert_eq!(detected, None);
    }
}
