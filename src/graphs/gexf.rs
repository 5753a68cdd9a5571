/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Loading of graphs in [GEXF](https://gexf.net/) format.
//!
//! The loader is a tag scanner rather than a full XML parser: it reads
//! `<attribute>`, `<node>`, `<attvalue>` and `<edge>` tags, which is all that
//! is needed to build a [`ProbGraph`]:
//!
//! - the value of a node is the value of the node attribute whose `title` is
//!   the requested attribute name; nodes without such an attribute (or with an
//!   unparsable or non-finite value) have no value, and are thus never seeds;
//! - the activation probability of an edge is its `weight`, or
//!   [`DEFAULT_PROBABILITY`] if the weight is missing, unparsable or not
//!   finite.
//!
//! Weights outside [0 . . 1] are used as they are: they are counted and
//! reported with a warning.
//!
//! # Examples
//!
//! ```
//! use infmax::graphs::gexf;
//! use infmax::traits::ValuedGraph;
//!
//! let gexf = r#"<gexf><graph defaultedgetype="directed">
//!   <attributes class="node">
//!     <attribute id="0" title="score" type="double"/>
//!   </attributes>
//!   <nodes>
//!     <node id="a"><attvalues><attvalue for="0" value="1.5"/></attvalues></node>
//!     <node id="b"/>
//!   </nodes>
//!   <edges>
//!     <edge id="0" source="a" target="b" weight="0.7"/>
//!     <edge id="1" source="b" target="a"/>
//!   </edges>
//! </graph></gexf>"#;
//!
//! let loaded = gexf::parse(gexf, "score");
//! assert!(loaded.attribute_found);
//! let graph = loaded.graph;
//! assert_eq!(graph.num_nodes(), 2);
//! assert_eq!(graph.value(0), 1.5);
//! assert!(!graph.has_value(1));
//! assert_eq!(graph.successors(1).collect::<Vec<_>>(), vec![(0, 0.1)]);
//! ```

use super::prob_graph::ProbGraph;
use crate::traits::ValuedGraph;
use anyhow::{Context, Result};
use std::path::Path;

/// The activation probability of edges without a (parsable) weight.
pub const DEFAULT_PROBABILITY: f64 = 0.1;

/// The result of loading a GEXF document.
#[derive(Debug, Clone)]
pub struct GexfGraph {
    /// The graph.
    pub graph: ProbGraph,
    /// Whether the requested attribute was declared in the document.
    pub attribute_found: bool,
}

/// Loads a GEXF file, using the node attribute titled `attribute` as node
/// value.
pub fn load(path: impl AsRef<Path>, attribute: &str) -> Result<GexfGraph> {
    let path = path.as_ref();
    log::info!("Loading GEXF graph from {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read GEXF file {}", path.display()))?;
    Ok(parse(&content, attribute))
}

/// Parses a GEXF document, using the node attribute titled `attribute` as
/// node value.
///
/// Parsing never fails: malformed records are skipped or completed with
/// defaults.
pub fn parse(content: &str, attribute: &str) -> GexfGraph {
    let mut graph = ProbGraph::new();

    let attr_id = Tags::new(content, "<attribute")
        .find(|tag| xml_attr(tag, "title") == Some(attribute))
        .and_then(|tag| xml_attr(tag, "id"));

    match attr_id {
        Some(id) => log::info!("Found attribute id for '{}': {}", attribute, id),
        None => log::warn!(
            "Attribute '{}' not found in GEXF definitions: no node will be a seed candidate",
            attribute
        ),
    }

    for (tag, body) in Elements::new(content, "<node", "</node>") {
        let Some(node_id) = xml_attr(tag, "id") else {
            log::debug!("Skipping node without id: {}", tag);
            continue;
        };
        let node = graph.node_id(node_id);
        let Some(attr_id) = attr_id else {
            continue;
        };
        for attvalue in Tags::new(body, "<attvalue") {
            if xml_attr(attvalue, "for") != Some(attr_id) {
                continue;
            }
            match xml_attr(attvalue, "value").map(str::parse::<f64>) {
                Some(Ok(value)) if value.is_finite() => graph.set_node_value(node, value),
                Some(Ok(value)) => log::debug!("Skipping value of node {}: {}", node_id, value),
                Some(Err(e)) => log::debug!("Skipping value of node {}: {}", node_id, e),
                None => {}
            }
        }
    }

    let mut out_of_range = 0_usize;
    for tag in Tags::new(content, "<edge") {
        let (Some(source), Some(target)) = (xml_attr(tag, "source"), xml_attr(tag, "target"))
        else {
            log::debug!("Skipping edge without endpoints: {}", tag);
            continue;
        };
        let probability = xml_attr(tag, "weight")
            .and_then(|w| w.parse::<f64>().ok())
            .filter(|w| w.is_finite())
            .unwrap_or(DEFAULT_PROBABILITY);
        if !(0.0..=1.0).contains(&probability) {
            out_of_range += 1;
        }
        graph.add_arc(source, target, probability);
    }

    if out_of_range != 0 {
        log::warn!(
            "{} edge weight(s) outside [0 . . 1] will be used as activation probabilities without clamping",
            out_of_range
        );
    }

    graph.shrink_to_fit();
    log::info!(
        "Loaded {} nodes ({} with a value) and {} arcs",
        graph.num_nodes(),
        graph.num_eligible(),
        graph.num_arcs()
    );

    GexfGraph {
        graph,
        attribute_found: attr_id.is_some(),
    }
}

/// Returns the value of the XML attribute `name` in `tag`, if present and
/// nonempty.
fn xml_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut from = 0;
    while let Some(pos) = tag[from..].find(name) {
        let start = from + pos;
        let rest = &tag[start + name.len()..];
        // the name must be a whole word followed by ="
        let preceded_by_space = tag[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        if preceded_by_space {
            if let Some(rest) = rest.strip_prefix("=\"") {
                let end = rest.find('"')?;
                let value = &rest[..end];
                return (!value.is_empty()).then_some(value);
            }
        }
        from = start + name.len();
    }
    None
}

/// Iterator over the opening tags starting with a given prefix.
///
/// Tags are returned from the opening `<` to the closing `>` included.
#[derive(Clone)]
struct Tags<'a> {
    content: &'a str,
    prefix: &'static str,
    pos: usize,
}

impl<'a> Tags<'a> {
    fn new(content: &'a str, prefix: &'static str) -> Self {
        Self {
            content,
            prefix,
            pos: 0,
        }
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let start = self.pos + self.content[self.pos..].find(self.prefix)?;
            let end = start + self.content[start..].find('>')?;
            self.pos = end + 1;
            if is_tag_boundary(self.content, start + self.prefix.len()) {
                return Some(&self.content[start..=end]);
            }
        }
    }
}

/// Iterator over elements with a given opening prefix and closing tag.
///
/// Returns pairs (opening tag, body); the body of a self-closing element is
/// empty. An element that is not closed before the next element with the same
/// prefix is returned with an empty body, and scanning continues from the
/// next element.
struct Elements<'a> {
    tags: Tags<'a>,
    close: &'static str,
}

impl<'a> Elements<'a> {
    fn new(content: &'a str, prefix: &'static str, close: &'static str) -> Self {
        Self {
            tags: Tags::new(content, prefix),
            close,
        }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<(&'a str, &'a str)> {
        let tag = self.tags.next()?;
        if tag.ends_with("/>") {
            return Some((tag, ""));
        }
        let content = self.tags.content;
        let body_start = self.tags.pos;
        let body_end = content[body_start..]
            .find(self.close)
            .map(|pos| body_start + pos);
        let mut following = self.tags.clone();
        let next_start = following.next().map(|next| following.pos - next.len());

        match body_end {
            Some(end) if next_start.map_or(true, |next| end < next) => {
                self.tags.pos = end + self.close.len();
                Some((tag, &content[body_start..end]))
            }
            _ => {
                log::debug!("Skipping the body of unclosed element {}", tag);
                Some((tag, ""))
            }
        }
    }
}

/// Checks that the character at `pos` ends a tag name, so that, for example,
/// `<node` does not match `<nodes>`.
fn is_tag_boundary(content: &str, pos: usize) -> bool {
    content[pos..]
        .chars()
        .next()
        .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
}
