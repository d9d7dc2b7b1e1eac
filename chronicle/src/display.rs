//! Console rendering of search results

use std::fmt::Write as _;

use chronicle_kg::Fact;

use crate::recipe::NodeView;

/// Facts in rank order: uuid, text and validity bounds when present
pub fn format_facts(facts: &[Fact]) -> String {
    let mut out = String::new();
    for fact in facts {
        let _ = writeln!(out, "UUID: {}", fact.uuid);
        let _ = writeln!(out, "Fact: {}", fact.fact);
        if let Some(valid_at) = fact.valid_at {
            let _ = writeln!(out, "Valid from: {}", valid_at);
        }
        if let Some(invalid_at) = fact.invalid_at {
            let _ = writeln!(out, "Valid until: {}", invalid_at);
        }
        out.push_str("---\n");
    }
    out
}

/// Nodes in rank order with their display summaries
pub fn format_nodes(nodes: &[NodeView]) -> String {
    let mut out = String::new();
    for node in nodes {
        let _ = writeln!(out, "Node UUID: {}", node.uuid);
        let _ = writeln!(out, "Node Name: {}", node.name);
        let _ = writeln!(out, "Content Summary: {}", node.summary);
        let _ = writeln!(out, "Node Labels: {}", node.labels.join(", "));
        let _ = writeln!(out, "Created At: {}", node.created_at);
        if !node.attributes.is_empty() {
            out.push_str("Attributes:\n");
            for (key, value) in &node.attributes {
                let _ = writeln!(out, "  {}: {}", key, value);
            }
        }
        out.push_str("---\n");
    }
    out
}

pub fn print_facts(title: &str, facts: &[Fact]) {
    println!("\n{}:", title);
    if facts.is_empty() {
        println!("(no results)");
    } else {
        print!("{}", format_facts(facts));
    }
}

pub fn print_nodes(title: &str, nodes: &[NodeView]) {
    println!("\n{}:", title);
    if nodes.is_empty() {
        println!("(no results)");
    } else {
        print!("{}", format_nodes(nodes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Map};
    use uuid::Uuid;

    #[test]
    fn test_format_facts_shows_validity_only_when_present() {
        let now = Utc::now();
        let mut fact = Fact {
            uuid: Uuid::new_v4(),
            name: "ASSESSMENT".to_string(),
            fact: "Claude 4 assessment: Currently the best LLM on the market".to_string(),
            source_node_uuid: Uuid::new_v4(),
            target_node_uuid: Uuid::new_v4(),
            valid_at: None,
            invalid_at: None,
            created_at: now,
        };

        let bare = format_facts(std::slice::from_ref(&fact));
        assert!(bare.contains(&format!("UUID: {}", fact.uuid)));
        assert!(!bare.contains("Valid from"));
        assert!(!bare.contains("Valid until"));

        fact.valid_at = Some(now);
        fact.invalid_at = Some(now);
        let bounded = format_facts(&[fact]);
        assert!(bounded.contains("Valid from: "));
        assert!(bounded.contains("Valid until: "));
    }

    #[test]
    fn test_format_nodes_lists_attributes() {
        let mut attributes = Map::new();
        attributes.insert("ranking".to_string(), json!(1));
        let node = NodeView {
            uuid: Uuid::new_v4(),
            name: "Claude 4".to_string(),
            summary: "short".to_string(),
            labels: vec!["Entity".to_string()],
            created_at: Utc::now(),
            attributes,
        };

        let out = format_nodes(&[node]);
        assert!(out.contains("Node Name: Claude 4"));
        assert!(out.contains("Node Labels: Entity"));
        assert!(out.contains("Attributes:\n  ranking: 1"));
    }
}
