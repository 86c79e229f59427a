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
//! Seeded construction of synthetic topologies.

use std::collections::{BTreeSet, HashMap};

use lazy_static::lazy_static;
use rand::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    topology::{Link, Node, TopologySnapshot},
    Cost,
};

/// Cost of a link between two routers of the same country.
pub const INTRA_COUNTRY_COST: Cost = 10.0;
/// Cost of a link connecting two countries.
pub const BACKBONE_COST: Cost = 100.0;
/// Share of intra-country links that get an independent reverse cost.
const ASYMMETRIC_SHARE: f64 = 0.2;

/// Small fixed network shapes for tests and demos. Nodes are named `r0`,
/// `r1`, ..., all links are symmetric with unit cost, and every node shares
/// one country.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub enum Shape {
    Path(usize),
    Star(usize),
    Grid(usize, usize),
}

impl Shape {
    /// print readable (and filename-compatible) string representation of the shape
    pub fn fmt(&self) -> String {
        match self {
            Self::Path(i) => format!("Path_{i}"),
            Self::Star(i) => format!("Star_{i}"),
            Self::Grid(rows, cols) => format!("Grid_{rows}_{cols}"),
        }
    }

    pub fn build(&self) -> TopologySnapshot {
        let mut links = Vec::new();
        let node = |i: usize| Node::new(format!("r{i}"), "SYN");
        let nodes: Vec<Node> = match self {
            Self::Path(k) => {
                for i in 1..*k {
                    links.push(Link::new(format!("r{}", i - 1), format!("r{i}")).symmetric(1.0));
                }
                (0..*k).map(node).collect()
            }
            Self::Star(k) => {
                // r0 is the center
                for i in 1..*k {
                    links.push(Link::new("r0", format!("r{i}")).symmetric(1.0));
                }
                (0..*k).map(node).collect()
            }
            Self::Grid(rows, cols) => {
                let id = |i: usize, j: usize| format!("r{}", i * cols + j);
                for i in 0..*rows {
                    for j in 0..*cols {
                        if j + 1 < *cols {
                            links.push(Link::new(id(i, j), id(i, j + 1)).symmetric(1.0));
                        }
                        if i + 1 < *rows {
                            links.push(Link::new(id(i, j), id(i + 1, j)).symmetric(1.0));
                        }
                    }
                }
                (0..rows * cols).map(node).collect()
            }
        };
        TopologySnapshot::new(nodes, links, self.fmt())
    }
}

lazy_static! {
    static ref INTERFACE_INDEX: Regex = Regex::new(r"/(?P<index>\d+)$").unwrap();
}

/// Hands out `GigabitEthernet0/0/0/<n>` interface names with one counter per
/// node. Seeding from an existing link collection continues behind the
/// highest index already in use, so extending a topology never reassigns an
/// interface.
#[derive(Debug, Default, Clone)]
struct InterfaceAllocator {
    counters: HashMap<String, usize>,
}

impl InterfaceAllocator {
    fn seeded_from(links: &[Link]) -> Self {
        let mut alloc = Self::default();
        for link in links {
            for (node, interface) in [
                (&link.source, &link.source_interface),
                (&link.target, &link.target_interface),
            ] {
                let index = interface.as_deref().map_or(0, used_interface_index);
                let counter = alloc.counters.entry(node.clone()).or_default();
                *counter = (*counter).max(index);
            }
        }
        alloc
    }

    fn next(&mut self, node: &str) -> String {
        let counter = self.counters.entry(node.to_string()).or_default();
        *counter += 1;
        format!("GigabitEthernet0/0/0/{counter}")
    }
}

fn used_interface_index(interface: &str) -> usize {
    INTERFACE_INDEX
        .captures(interface)
        .and_then(|caps| caps.name("index"))
        .and_then(|index| index.as_str().parse().ok())
        .unwrap_or(0)
}

/// Build a fresh multi-country topology from a plan of `(country, size)`
/// entries.
///
/// Every country gets a ring over its routers plus a few random chords, all
/// at [`INTRA_COUNTRY_COST`] with occasional asymmetric reverse costs. The
/// countries themselves are connected in a ring (first router to first
/// router) at [`BACKBONE_COST`], with two additional cross links between
/// random countries for redundancy. The same plan and seed always produce
/// the same topology.
pub fn build_country_net(plan: &[(String, usize)], seed: u64) -> TopologySnapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut net = Growth::new(&[], &[]);
    net.add_countries(plan, &mut rng);

    // backbone ring over the countries, in plan order
    let anchors: Vec<String> = plan
        .iter()
        .filter(|(_, size)| *size > 0)
        .map(|(country, _)| first_router_id(country))
        .collect();
    match anchors.len() {
        0 | 1 => {}
        // a two-country ring would duplicate the single link
        2 => net.connect(anchors[0].clone(), anchors[1].clone(), BACKBONE_COST, None),
        n => {
            for i in 0..n {
                let next = (i + 1) % n;
                net.connect(anchors[i].clone(), anchors[next].clone(), BACKBONE_COST, None);
            }
        }
    }

    // two redundant cross links between random countries
    for _ in 0..2 {
        let candidates: Vec<(&String, &String)> = anchors
            .iter()
            .flat_map(|a| anchors.iter().map(move |b| (a, b)))
            .filter(|(a, b)| a < b && !net.linked(a, b))
            .collect();
        if let Some((a, b)) = candidates.choose(&mut rng) {
            net.connect((*a).clone(), (*b).clone(), BACKBONE_COST, None);
        }
    }

    let countries = plan.len();
    TopologySnapshot::new(
        net.nodes,
        net.links,
        format!("synthetic topology with {countries} countries (seed {seed})"),
    )
}

/// Extend an existing snapshot with new countries without disturbing the
/// existing node and link indices.
///
/// Each new country is built like in [`build_country_net`] and wired into the
/// existing topology with two backbone links from its first router to random
/// existing routers. Interface counters continue behind the interfaces
/// already assigned in the snapshot.
pub fn extend_country_net(
    snapshot: &TopologySnapshot,
    plan: &[(String, usize)],
    seed: u64,
) -> TopologySnapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let existing_ids: Vec<String> = snapshot.nodes.iter().map(|node| node.id.clone()).collect();
    let mut net = Growth::new(&snapshot.nodes, &snapshot.links);
    net.add_countries(plan, &mut rng);

    for (country, size) in plan {
        if *size == 0 || existing_ids.is_empty() {
            continue;
        }
        let anchor = first_router_id(country);
        for uplink in existing_ids.choose_multiple(&mut rng, 2.min(existing_ids.len())) {
            net.connect(anchor.clone(), uplink.clone(), BACKBONE_COST, None);
        }
    }

    let description = snapshot
        .metadata
        .as_ref()
        .map(|meta| meta.description.clone())
        .unwrap_or_default();
    let added = plan.len();
    TopologySnapshot::new(
        net.nodes,
        net.links,
        format!("{description} + {added} countries (seed {seed})"),
    )
}

fn first_router_id(country: &str) -> String {
    format!("{}-r1", country.to_lowercase())
}

/// Accumulates nodes and links while growing a topology, tracking which node
/// pairs are already connected and which interfaces are already in use.
struct Growth {
    nodes: Vec<Node>,
    links: Vec<Link>,
    linked: BTreeSet<(String, String)>,
    interfaces: InterfaceAllocator,
    loopback_net: usize,
}

impl Growth {
    fn new(nodes: &[Node], links: &[Link]) -> Self {
        let linked = links
            .iter()
            .map(|link| ordered_pair(&link.source, &link.target))
            .collect();
        Self {
            nodes: nodes.to_vec(),
            links: links.to_vec(),
            linked,
            interfaces: InterfaceAllocator::seeded_from(links),
            loopback_net: 100 + nodes.len(),
        }
    }

    fn add_countries(&mut self, plan: &[(String, usize)], rng: &mut StdRng) {
        for (country, size) in plan {
            let ids: Vec<String> = (1..=*size)
                .map(|i| format!("{}-r{i}", country.to_lowercase()))
                .collect();
            for (i, id) in ids.iter().enumerate() {
                self.add_node(id, country, i + 1);
            }

            // ring over the country's routers
            if ids.len() > 1 {
                for i in 0..ids.len() {
                    let next = (i + 1) % ids.len();
                    // a two-router country needs no second parallel link
                    if next > i || ids.len() > 2 {
                        self.connect_intra(&ids[i], &ids[next], rng);
                    }
                }
            }

            // random chords through the ring
            let chords = (ids.len() / 3).max(2);
            for _ in 0..chords {
                let (Some(a), Some(b)) = (ids.choose(rng), ids.choose(rng)) else {
                    continue;
                };
                if a != b && !self.linked(a, b) {
                    let (a, b) = (a.clone(), b.clone());
                    self.connect_intra(&a, &b, rng);
                }
            }
        }
    }

    fn add_node(&mut self, id: &str, country: &str, index: usize) {
        self.loopback_net += 1;
        self.nodes.push(Node {
            name: Some(id.to_string()),
            hostname: Some(id.to_string()),
            loopback_ip: Some(format!("172.16.{}.{index}", self.loopback_net)),
            node_type: Some("router".to_string()),
            is_active: Some(true),
            ..Node::new(id, country)
        });
    }

    fn linked(&self, a: &str, b: &str) -> bool {
        self.linked.contains(&ordered_pair(a, b))
    }

    fn connect_intra(&mut self, a: &str, b: &str, rng: &mut StdRng) {
        let reverse = rng
            .gen_bool(ASYMMETRIC_SHARE)
            .then(|| rng.gen_range(10..=30) as Cost);
        self.connect(a.to_string(), b.to_string(), INTRA_COUNTRY_COST, reverse);
    }

    fn connect(&mut self, source: String, target: String, cost: Cost, reverse: Option<Cost>) {
        self.linked.insert(ordered_pair(&source, &target));
        let reverse = reverse.unwrap_or(cost);
        let link = Link {
            source_interface: Some(self.interfaces.next(&source)),
            target_interface: Some(self.interfaces.next(&target)),
            edge_type: Some("backbone".to_string()),
            ..Link::new(source, target).asymmetric(cost, reverse)
        };
        self.links.push(link);
    }
}

fn ordered_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
