//! DOT Export
//!
//! Renders a graph in Graphviz DOT format using node labels as identifiers.

use std::fmt::Write;

use super::model::Digraph;
use crate::error::Result;

const INDENT: &str = "    ";

/// Words DOT reserves, matched case-insensitively.
const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Render `graph` as a strict digraph called `name`.
pub fn to_dot(graph: &Digraph, name: &str) -> Result<String> {
    let mut out = String::new();

    if name.is_empty() {
        writeln!(out, "strict digraph {{")?;
    } else {
        writeln!(out, "strict digraph {} {{", quote_id(name))?;
    }

    if graph.node_count() > 0 {
        writeln!(out, "{INDENT}// Node definitions.")?;
        for node in 0..graph.node_count() {
            writeln!(out, "{INDENT}{};", quote_id(graph.label(node)))?;
        }
    }

    if graph.edge_count() > 0 {
        writeln!(out)?;
        writeln!(out, "{INDENT}// Edge definitions.")?;
        for (from, to) in graph.edges() {
            writeln!(
                out,
                "{INDENT}{} -> {};",
                quote_id(graph.label(from)),
                quote_id(graph.label(to))
            )?;
        }
    }

    writeln!(out, "}}")?;
    Ok(out)
}

/// Emit `id` bare if DOT accepts it as-is, otherwise double-quoted.
fn quote_id(id: &str) -> String {
    if is_dot_id(id) {
        id.to_string()
    } else {
        format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

fn is_dot_id(id: &str) -> bool {
    if is_keyword(id) {
        return false;
    }
    is_identifier(id) || is_numeral(id) || is_quoted(id) || is_html(id)
}

fn is_keyword(id: &str) -> bool {
    KEYWORDS.iter().any(|keyword| keyword.eq_ignore_ascii_case(id))
}

fn is_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii())
}

// [-]?(.[0-9]+ | [0-9]+(.[0-9]*)?)
fn is_numeral(id: &str) -> bool {
    let digits = id.strip_prefix('-').unwrap_or(id);
    let (whole, frac) = match digits.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) {
        return false;
    }
    match frac {
        None => !whole.is_empty(),
        Some(frac) => all_digits(frac) && (!whole.is_empty() || !frac.is_empty()),
    }
}

fn is_quoted(id: &str) -> bool {
    if id.len() < 2 || !id.starts_with('"') || !id.ends_with('"') {
        return false;
    }
    let inner = &id[1..id.len() - 1];
    let mut escaped = false;
    for c in inner.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return false,
            _ => escaped = false,
        }
    }
    !escaped
}

fn is_html(id: &str) -> bool {
    id.len() >= 2 && id.starts_with('<') && id.ends_with('>')
}
