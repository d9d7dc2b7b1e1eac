//! Text helpers: tokenization, bag-of-words similarity and query escaping

use std::collections::HashMap;

/// Lowercased alphanumeric runs
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Query text reduced to plain terms, safe for any query parser
pub fn lexical_query(text: &str) -> String {
    tokenize(text).join(" ")
}

fn term_counts(tokens: &[String]) -> HashMap<&str, f32> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of term-frequency vectors.
///
/// Stands in for embedding similarity when no embedder is configured.
pub fn cosine_similarity(query_tokens: &[String], document: &str) -> f32 {
    let doc_tokens = tokenize(document);
    if query_tokens.is_empty() || doc_tokens.is_empty() {
        return 0.0;
    }

    let query = term_counts(query_tokens);
    let doc = term_counts(&doc_tokens);

    let dot: f32 = query
        .iter()
        .filter_map(|(term, q)| doc.get(term).map(|d| q * d))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }

    let norm = |counts: &HashMap<&str, f32>| counts.values().map(|c| c * c).sum::<f32>().sqrt();
    dot / (norm(&query) * norm(&doc))
}

/// Escape Lucene query syntax so user text is matched literally
pub fn escape_lucene(text: &str) -> String {
    const SPECIAL: &[char] = &[
        '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':',
        '\\', '/',
    ];

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
