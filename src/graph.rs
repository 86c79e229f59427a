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
//! Directed adjacency structure derived from the link collection.

use std::collections::HashMap;

use crate::{
    topology::{Link, Node},
    Cost, LinkIndex,
};

/// One directed edge of the adjacency, carrying the resolved cost for its
/// direction and the index of the link record it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectedEdge {
    pub to: usize,
    pub cost: Cost,
    pub link: LinkIndex,
}

/// Adjacency lists over dense node indices.
///
/// Every `Up` link contributes exactly two directed edges, one per direction
/// with its independently resolved cost. `Down` links contribute nothing.
/// Nodes are present even when no link touches them. Building the same
/// collections twice yields an equal graph.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Vec<DirectedEdge>>,
}

impl AdjacencyGraph {
    /// Build the adjacency from node and link collections. Links referencing
    /// unknown node ids are skipped with a warning.
    pub fn build(nodes: &[Node], links: &[Link]) -> Self {
        let ids: Vec<String> = nodes.iter().map(|node| node.id.clone()).collect();
        let index: HashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
        let mut edges: Vec<Vec<DirectedEdge>> = vec![Vec::new(); ids.len()];

        for (link_idx, link) in links.iter().enumerate() {
            if !link.is_up() {
                continue;
            }
            let (Some(&source), Some(&target)) =
                (index.get(&link.source), index.get(&link.target))
            else {
                log::warn!(
                    "skipping link {link_idx} ({} -- {}): unknown endpoint",
                    link.source,
                    link.target
                );
                continue;
            };
            edges[source].push(DirectedEdge {
                to: target,
                cost: link.forward(),
                link: link_idx,
            });
            edges[target].push(DirectedEdge {
                to: source,
                cost: link.reverse(),
                link: link_idx,
            });
        }

        Self { ids, index, edges }
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Dense index of a node id, if the node exists.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Node id at a dense index.
    ///
    /// # Panics
    /// If the index is out of range.
    pub fn id_of(&self, index: usize) -> &str {
        &self.ids[index]
    }

    /// Outgoing edges of a node. Empty for isolated nodes.
    pub fn outgoing(&self, index: usize) -> &[DirectedEdge] {
        &self.edges[index]
    }
}
