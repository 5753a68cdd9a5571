/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use infmax::algo::celf::Celf;
use infmax::graphs::gexf::{self, DEFAULT_PROBABILITY};
use infmax::traits::ValuedGraph;
use infmax::utils::Fixed;
use std::io::Write;

const DEPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gexf xmlns="http://gexf.net/1.3" version="1.3">
  <graph mode="static" defaultedgetype="directed">
    <attributes class="node">
      <attribute id="0" title="downloads" type="long"/>
      <attribute id="1" title="criticality_score" type="double"/>
    </attributes>
    <nodes>
      <node id="zlib" label="zlib">
        <attvalues>
          <attvalue for="0" value="1000"/>
          <attvalue for="1" value="0.9"/>
        </attvalues>
      </node>
      <node id="openssl" label="openssl">
        <attvalues>
          <attvalue for="1" value="0.8"/>
        </attvalues>
      </node>
      <node id="curl" label="curl">
        <attvalues>
          <attvalue for="1" value="not-a-number"/>
        </attvalues>
      </node>
      <node id="git"/>
    </nodes>
    <edges>
      <edge id="0" source="zlib" target="openssl" weight="1.0"/>
      <edge id="1" source="openssl" target="curl" weight="0.25"/>
      <edge id="2" source="curl" target="git"/>
      <edge id="3" source="git" target="zlib" weight="heavy"/>
      <edge id="4" source="git" target="python" weight="1.5"/>
      <edge id="5" target="zlib" weight="0.5"/>
    </edges>
  </graph>
</gexf>
"#;

#[test]
fn test_parse() {
    let loaded = gexf::parse(DEPS, "criticality_score");
    assert!(loaded.attribute_found);
    let g = loaded.graph;

    // nodes are numbered in document order, then by first appearance in edges
    assert_eq!(g.num_nodes(), 5);
    assert_eq!(
        g.external_ids().collect::<Vec<_>>(),
        vec!["zlib", "openssl", "curl", "git", "python"]
    );
    assert_eq!(g.num_arcs(), 5);

    assert_eq!(g.value(0), 0.9);
    assert_eq!(g.value(1), 0.8);
    // unparsable value
    assert!(!g.has_value(2));
    // no attvalues
    assert!(!g.has_value(3));
    assert_eq!(g.num_eligible(), 2);

    assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![(1, 1.0)]);
    assert_eq!(g.successors(1).collect::<Vec<_>>(), vec![(2, 0.25)]);
    assert_eq!(
        g.successors(2).collect::<Vec<_>>(),
        vec![(3, DEFAULT_PROBABILITY)]
    );
    // unparsable weight, and an out-of-range weight used as is
    assert_eq!(
        g.successors(3).collect::<Vec<_>>(),
        vec![(0, DEFAULT_PROBABILITY), (4, 1.5)]
    );
}

#[test]
fn test_other_attribute() {
    let g = gexf::parse(DEPS, "downloads").graph;
    assert_eq!(g.value(0), 1000.0);
    assert_eq!(g.num_eligible(), 1);
}

#[test]
fn test_missing_attribute() {
    let loaded = gexf::parse(DEPS, "stars");
    assert!(!loaded.attribute_found);
    assert_eq!(loaded.graph.num_nodes(), 5);
    assert_eq!(loaded.graph.num_eligible(), 0);

    // no candidates: an empty selection with a shortfall
    let result = Celf::new(&loaded.graph).run(2);
    assert!(result.seeds().is_empty());
    assert!(result.shortfall());
}

#[test]
fn test_load_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("deps.gexf");
    std::fs::File::create(&path)?.write_all(DEPS.as_bytes())?;

    let loaded = gexf::load(&path, "criticality_score")?;
    assert_eq!(loaded.graph, gexf::parse(DEPS, "criticality_score").graph);

    let mut celf = Celf::with_seeder(&loaded.graph, Fixed(0));
    celf.rounds(100);
    let result = celf.run(1);
    // zlib always activates openssl
    assert_eq!(result.seeds(), vec![0]);
    assert_eq!(loaded.graph.external_id(result.seeds()[0]), "zlib");
    Ok(())
}

#[test]
fn test_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.gexf");
    let err = gexf::load(&path, "criticality_score").unwrap_err();
    assert!(format!("{err:#}").contains("missing.gexf"));
}

#[test]
fn test_empty_document() {
    let loaded = gexf::parse("", "score");
    assert!(!loaded.attribute_found);
    assert_eq!(loaded.graph.num_nodes(), 0);
    assert_eq!(loaded.graph.num_arcs(), 0);
}

const NON_FINITE: &str = r#"<gexf><graph defaultedgetype="directed">
  <attributes class="node">
    <attribute id="0" title="score" type="double"/>
  </attributes>
  <nodes>
    <node id="a"><attvalues><attvalue for="0" value="NaN"/></attvalues></node>
    <node id="b"><attvalues><attvalue for="0" value="5"/></attvalues></node>
    <node id="c"><attvalues><attvalue for="0" value="3"/></attvalues></node>
    <node id="d"><attvalues><attvalue for="0" value="-inf"/></attvalues></node>
  </nodes>
  <edges>
    <edge id="0" source="a" target="b" weight="inf"/>
    <edge id="1" source="b" target="c" weight="NaN"/>
  </edges>
</graph></gexf>"#;

#[test]
fn test_non_finite_numbers() {
    let g = gexf::parse(NON_FINITE, "score").graph;
    assert!(!g.has_value(0));
    assert!(!g.has_value(3));
    assert_eq!(g.num_eligible(), 2);
    assert_eq!(
        g.successors(0).collect::<Vec<_>>(),
        vec![(1, DEFAULT_PROBABILITY)]
    );
    assert_eq!(
        g.successors(1).collect::<Vec<_>>(),
        vec![(2, DEFAULT_PROBABILITY)]
    );

    let mut celf = Celf::with_seeder(&g, Fixed(0));
    celf.rounds(200);
    let result = celf.run(2);
    assert_eq!(result.seeds(), vec![1, 2]);
    assert!(result
        .selections()
        .iter()
        .all(|s| s.gain.is_finite() && s.total.is_finite()));
}

#[test]
fn test_unclosed_node() {
    let content = r#"<gexf><graph>
  <attributes class="node"><attribute id="0" title="score"/></attributes>
  <nodes>
    <node id="a"><attvalues><attvalue for="0" value="1"/></attvalues>
    <node id="b"><attvalues><attvalue for="0" value="2"/></attvalues></node>
    <node id="c"/>
  </nodes>
</graph></gexf>"#;
    let g = gexf::parse(content, "score").graph;
    assert_eq!(
        g.external_ids().collect::<Vec<_>>(),
        vec!["a", "b", "c"]
    );
    // the body of the unclosed node is ignored
    assert!(!g.has_value(0));
    assert_eq!(g.value(1), 2.0);
    assert!(!g.has_value(2));
}
