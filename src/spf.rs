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
//! Shortest-path-first cost queries over the adjacency.

use std::{cmp::Reverse, collections::BinaryHeap};

use ordered_float::NotNan;

use crate::{graph::AdjacencyGraph, Cost};

/// Cheapest total cost from `start` to `end`, or `None` if `end` is
/// unreachable or either id is unknown.
///
/// Dijkstra with a binary min-heap and lazy deletion: a node may sit in the
/// heap several times, and entries worse than the recorded distance are
/// dropped when popped. The search stops as soon as `end` pops, which is the
/// first time its distance is final. Edges with negative cost would break the
/// invariant and are skipped with a warning. A query from a node to itself is
/// 0 without any traversal, even for ids with no adjacency entry.
pub fn shortest_cost(graph: &AdjacencyGraph, start: &str, end: &str) -> Option<Cost> {
    if start == end {
        return Some(0.0);
    }
    let (Some(start), Some(end)) = (graph.index_of(start), graph.index_of(end)) else {
        return None;
    };

    let mut dist = vec![Cost::INFINITY; graph.node_count()];
    dist[start] = 0.0;
    let mut heap: BinaryHeap<Reverse<(NotNan<Cost>, usize)>> = BinaryHeap::new();
    heap.push(Reverse((NotNan::default(), start)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        let cost = cost.into_inner();
        if node == end {
            return Some(cost);
        }
        if cost > dist[node] {
            continue;
        }
        for edge in graph.outgoing(node) {
            if edge.cost < 0.0 {
                log::warn!(
                    "link {} has negative cost {} towards {}, skipping it",
                    edge.link,
                    edge.cost,
                    graph.id_of(edge.to)
                );
                continue;
            }
            let Ok(next) = NotNan::new(cost + edge.cost) else {
                continue;
            };
            if next.into_inner() < dist[edge.to] {
                dist[edge.to] = next.into_inner();
                heap.push(Reverse((next, edge.to)));
            }
        }
    }

    None
}
