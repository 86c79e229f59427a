// RIPPLE: Impact Analysis of Link Cost and Status Changes on Routed Network Topologies
// Copyright (C) 2024-2025 Roland Schmid <roschmi@ethz.ch> and Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! End-to-end scenarios: from a snapshot through simulated link edits to the
//! impact report.

use std::collections::HashMap;

use super::{country_net, triangle_net, two_country_net};
use crate::{
    analyzer::{ImpactAnalyzer, LinkChange},
    graph::AdjacencyGraph,
    paths::enumerate_paths,
    spf::shortest_cost,
    topology::{LinkOverride, LinkStatus, TopologySnapshot},
};

#[test]
fn triangle_from_the_wire() {
    let snapshot: TopologySnapshot = serde_json::from_str(
        r#"{
            "nodes": [
                {"id": "a", "country": "AAA"},
                {"id": "b", "country": "BBB"},
                {"id": "c", "country": "CCC"}
            ],
            "links": [
                {"source": "a", "target": "b", "forward_cost": 5, "reverse_cost": 5, "status": "up"},
                {"source": "b", "target": "c", "forward_cost": 2, "reverse_cost": 8, "status": "up"},
                {"source": "a", "target": "c", "cost": 20, "status": "up"}
            ]
        }"#,
    )
    .unwrap();

    let graph = AdjacencyGraph::build(&snapshot.nodes, &snapshot.links);
    assert_eq!(shortest_cost(&graph, "a", "c"), Some(7.0));
    assert_eq!(shortest_cost(&graph, "c", "a"), Some(13.0));

    let paths = enumerate_paths(&graph, "a", "c", 10);
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].nodes, vec!["a", "b", "c"]);
    assert_eq!(paths[0].total_cost, 7.0);
    assert_eq!(paths[1].nodes, vec!["a", "c"]);
    assert_eq!(paths[1].total_cost, 20.0);
}

#[test]
fn raising_a_cost_ripples_to_the_far_pair() {
    let (nodes, links) = triangle_net();
    let overrides = HashMap::from([(
        1,
        LinkOverride {
            forward_cost: Some(25.0),
            ..Default::default()
        },
    )]);
    let report = ImpactAnalyzer::with_overrides(&nodes, &links, &overrides)
        .unwrap()
        .analyze();

    assert_eq!(report.link_impacts.len(), 1);
    let impact = &report.link_impacts[0];
    assert_eq!(impact.local_impact, vec!["b", "c"]);

    // the best a -> c route flips from over b (cost 7) to direct (cost 20)
    let pair = &impact.affected_pairs[&("AAA".to_string(), "CCC".to_string())];
    assert_eq!(pair.cost_before, Some(7.0));
    assert_eq!(pair.cost_after, Some(20.0));
    assert_eq!(impact.downstream_impact, vec!["b"]);
    assert_eq!(report.affected_nodes(), vec!["b", "c"]);
}

#[test]
fn failover_to_the_redundant_link() {
    let (nodes, links) = two_country_net();
    let overrides = HashMap::from([(
        2,
        LinkOverride {
            status: Some(LinkStatus::Down),
            ..Default::default()
        },
    )]);
    let report = ImpactAnalyzer::with_overrides(&nodes, &links, &overrides)
        .unwrap()
        .analyze();

    assert_eq!(report.link_impacts.len(), 1);
    let impact = &report.link_impacts[0];
    assert_eq!(impact.change, LinkChange::WentDown);
    assert_eq!(impact.local_impact, vec!["aaa-r1", "bbb-r1"]);
    // both best paths stay within the two endpoint countries
    assert!(impact.downstream_impact.is_empty());

    for pair in [("AAA", "BBB"), ("BBB", "AAA")] {
        let pair = &impact.affected_pairs[&(pair.0.to_string(), pair.1.to_string())];
        assert_eq!(pair.cost_before, Some(10.0));
        assert_eq!(pair.cost_after, Some(50.0));
    }

    // with no redundancy at all, the countries fall apart
    let overrides = HashMap::from([
        (2, overrides[&2]),
        (
            3,
            LinkOverride {
                status: Some(LinkStatus::Down),
                ..Default::default()
            },
        ),
    ]);
    let report = ImpactAnalyzer::with_overrides(&nodes, &links, &overrides)
        .unwrap()
        .analyze();
    let impact = &report.link_impacts[1];
    let pair = &impact.affected_pairs[&("AAA".to_string(), "BBB".to_string())];
    assert_eq!(pair.cost_after, None);
}

#[test]
fn bringing_a_link_up_restores_the_cheap_route() {
    let (nodes, mut links) = two_country_net();
    links[2] = links[2].clone().down();
    let overrides = HashMap::from([(
        2,
        LinkOverride {
            status: Some(LinkStatus::Up),
            ..Default::default()
        },
    )]);
    let report = ImpactAnalyzer::with_overrides(&nodes, &links, &overrides)
        .unwrap()
        .analyze();

    let impact = &report.link_impacts[0];
    assert_eq!(impact.change, LinkChange::CameUp);
    let pair = &impact.affected_pairs[&("AAA".to_string(), "BBB".to_string())];
    assert_eq!(pair.cost_before, Some(50.0));
    assert_eq!(pair.cost_after, Some(10.0));
}

#[test]
fn snapshot_survives_the_disk() {
    let snapshot = country_net();
    let path = std::env::temp_dir().join("ripple-test-snapshot.json");
    snapshot.store(&path).unwrap();
    let loaded = TopologySnapshot::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.nodes, snapshot.nodes);
    assert_eq!(loaded.links, snapshot.links);

    // the loaded snapshot analyzes exactly like the in-memory one
    let overrides = HashMap::from([(
        0,
        LinkOverride {
            forward_cost: Some(99.0),
            ..Default::default()
        },
    )]);
    let from_memory = ImpactAnalyzer::with_overrides(&snapshot.nodes, &snapshot.links, &overrides)
        .unwrap()
        .analyze();
    let from_disk = ImpactAnalyzer::with_overrides(&loaded.nodes, &loaded.links, &overrides)
        .unwrap()
        .analyze();
    assert_eq!(from_memory, from_disk);
}

#[test]
fn transit_ranking_of_a_generated_net() {
    let net = country_net();
    let report = ImpactAnalyzer::new(&net.nodes, &net.links, net.links.clone()).analyze();

    assert!(report.link_impacts.is_empty());
    for entry in &report.transit_ranking {
        assert!(entry.transit_paths > 0);
        assert!(!entry.pairs_served.is_empty());
        assert!(entry.criticality > 0.0 && entry.criticality <= 100.0);
        // a country never serves a pair it belongs to
        for (from, to) in &entry.pairs_served {
            assert_ne!(&entry.country, from);
            assert_ne!(&entry.country, to);
        }
    }
}
