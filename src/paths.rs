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
//! Enumeration of simple paths, ranked by total cost.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{graph::AdjacencyGraph, Cost, LinkIndex};

/// How many paths [`enumerate_paths`] collects when the caller does not say
/// otherwise.
pub const DEFAULT_PATH_LIMIT: usize = 50;

/// A loop-free path through the topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    /// Node ids from start to end, in order.
    pub nodes: Vec<String>,
    /// Indices of the traversed links, one per hop. Parallel links between
    /// the same pair of nodes stay distinguishable through these.
    pub links: Vec<LinkIndex>,
    pub total_cost: Cost,
}

impl RoutePath {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Ranking order: total cost, then hop count, then the node sequence.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.total_cost
            .total_cmp(&other.total_cost)
            .then(self.nodes.len().cmp(&other.nodes.len()))
            .then_with(|| self.nodes.cmp(&other.nodes))
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (cost {})", self.nodes.join(" -> "), self.total_cost)
    }
}

struct Frame {
    node: usize,
    nodes: Vec<usize>,
    links: Vec<LinkIndex>,
    cost: Cost,
}

/// Enumerate up to `limit` simple paths from `start` to `end`, cheapest
/// first.
///
/// Depth-first search over an explicit stack. Successors are pushed in
/// descending cost order so that the cheapest continuation is explored first,
/// biasing the collected set towards cheap paths; once `limit` paths are
/// found the search stops, so with many alternatives the set is a heuristic
/// sample rather than the exact cheapest `limit`. The collected paths are
/// sorted exactly by [`RoutePath::rank`] before returning. A path never
/// revisits a node, never continues past `end`, and negative-cost edges are
/// skipped with a warning. Queries from a node to itself, with an unknown
/// endpoint, or with a zero limit yield no paths.
pub fn enumerate_paths(
    graph: &AdjacencyGraph,
    start: &str,
    end: &str,
    limit: usize,
) -> Vec<RoutePath> {
    if limit == 0 || start == end {
        return Vec::new();
    }
    let (Some(start), Some(end)) = (graph.index_of(start), graph.index_of(end)) else {
        return Vec::new();
    };

    let mut found: Vec<Frame> = Vec::new();
    let mut stack = vec![Frame {
        node: start,
        nodes: vec![start],
        links: Vec::new(),
        cost: 0.0,
    }];

    while let Some(frame) = stack.pop() {
        if frame.node == end {
            found.push(frame);
            if found.len() >= limit {
                break;
            }
            continue;
        }

        let mut successors: Vec<_> = graph
            .outgoing(frame.node)
            .iter()
            .filter(|edge| {
                if edge.cost < 0.0 {
                    log::warn!(
                        "link {} has negative cost {} towards {}, skipping it",
                        edge.link,
                        edge.cost,
                        graph.id_of(edge.to)
                    );
                    return false;
                }
                !frame.nodes.contains(&edge.to)
            })
            .collect();
        // Descending, so the cheapest successor is popped first.
        successors.sort_by(|a, b| b.cost.total_cmp(&a.cost).then(b.to.cmp(&a.to)));

        for edge in successors {
            let mut nodes = frame.nodes.clone();
            nodes.push(edge.to);
            let mut links = frame.links.clone();
            links.push(edge.link);
            stack.push(Frame {
                node: edge.to,
                nodes,
                links,
                cost: frame.cost + edge.cost,
            });
        }
    }

    let mut paths: Vec<RoutePath> = found
        .into_iter()
        .map(|frame| RoutePath {
            nodes: frame
                .nodes
                .iter()
                .map(|&idx| graph.id_of(idx).to_string())
                .collect(),
            links: frame.links,
            total_cost: frame.cost,
        })
        .collect();
    paths.sort_by(RoutePath::rank);
    paths
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::topology::{Link, Node};

    fn graph(nodes: &[&str], links: Vec<Link>) -> AdjacencyGraph {
        let nodes: Vec<Node> = nodes.iter().map(|id| Node::new(*id, "AAA")).collect();
        AdjacencyGraph::build(&nodes, &links)
    }

    fn triangle() -> AdjacencyGraph {
        graph(
            &["a", "b", "c"],
            vec![
                Link::new("a", "b").symmetric(5.0),
                Link::new("b", "c").asymmetric(2.0, 8.0),
                Link::new("a", "c").symmetric(20.0),
            ],
        )
    }

    #[test]
    fn triangle_paths_in_order() {
        let paths = enumerate_paths(&triangle(), "a", "c", 10);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].nodes, vec!["a", "b", "c"]);
        assert_eq!(paths[0].links, vec![0, 1]);
        assert_eq!(paths[0].total_cost, 7.0);
        assert_eq!(paths[1].nodes, vec!["a", "c"]);
        assert_eq!(paths[1].links, vec![2]);
        assert_eq!(paths[1].total_cost, 20.0);
    }

    #[test]
    fn reverse_direction_uses_reverse_costs() {
        let paths = enumerate_paths(&triangle(), "c", "a", 10);
        assert_eq!(paths[0].nodes, vec!["c", "b", "a"]);
        assert_eq!(paths[0].total_cost, 13.0);
        assert_eq!(paths[1].total_cost, 20.0);
    }

    #[test]
    fn limit_one_finds_the_cheapest() {
        let paths = enumerate_paths(&triangle(), "a", "c", 1);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec!["a", "b", "c"]);
        assert_eq!(paths[0].total_cost, 7.0);
    }

    #[test]
    fn cost_ties_prefer_fewer_hops() {
        let graph = graph(
            &["a", "b", "c"],
            vec![
                Link::new("a", "b").symmetric(2.0),
                Link::new("b", "c").symmetric(2.0),
                Link::new("a", "c").symmetric(4.0),
            ],
        );
        let paths = enumerate_paths(&graph, "a", "c", 10);
        assert_eq!(paths[0].nodes, vec!["a", "c"]);
        assert_eq!(paths[1].nodes, vec!["a", "b", "c"]);
        assert_eq!(paths[0].total_cost, paths[1].total_cost);
    }

    #[test]
    fn parallel_links_yield_distinct_paths() {
        let graph = graph(
            &["a", "b"],
            vec![
                Link::new("a", "b").symmetric(5.0),
                Link::new("a", "b").symmetric(7.0),
            ],
        );
        let paths = enumerate_paths(&graph, "a", "b", 10);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].links, vec![0]);
        assert_eq!(paths[0].total_cost, 5.0);
        assert_eq!(paths[1].links, vec![1]);
        assert_eq!(paths[1].total_cost, 7.0);
    }

    #[test]
    fn paths_never_continue_past_the_end() {
        // A path through c could reach b more cheaply, but c is the end.
        let graph = graph(
            &["a", "b", "c"],
            vec![
                Link::new("a", "c").symmetric(1.0),
                Link::new("c", "b").symmetric(1.0),
                Link::new("a", "b").symmetric(9.0),
            ],
        );
        let paths = enumerate_paths(&graph, "a", "c", 10);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].nodes, vec!["a", "c"]);
        assert_eq!(paths[1].nodes, vec!["a", "b", "c"]);
    }

    #[test]
    fn negative_links_appear_in_no_path() {
        let graph = graph(
            &["a", "b", "c"],
            vec![
                Link::new("a", "b").symmetric(-3.0),
                Link::new("a", "c").symmetric(2.0),
                Link::new("c", "b").symmetric(2.0),
            ],
        );
        let paths = enumerate_paths(&graph, "a", "b", 10);
        // Only the detour over c remains.
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec!["a", "c", "b"]);
        assert_eq!(paths[0].links, vec![1, 2]);
        assert_eq!(paths[0].total_cost, 4.0);
        assert!(paths.iter().all(|path| !path.links.contains(&0)));
    }

    #[test]
    fn degenerate_queries_are_empty() {
        let graph = triangle();
        assert!(enumerate_paths(&graph, "a", "a", 10).is_empty());
        assert!(enumerate_paths(&graph, "a", "ghost", 10).is_empty());
        assert!(enumerate_paths(&graph, "ghost", "a", 10).is_empty());
        assert!(enumerate_paths(&graph, "a", "c", 0).is_empty());
    }

    #[test]
    fn hops_and_display() {
        let paths = enumerate_paths(&triangle(), "a", "c", 10);
        assert_eq!(paths[0].hops(), 2);
        assert_eq!(paths[0].to_string(), "a -> b -> c (cost 7)");
        assert_eq!(paths[1].hops(), 1);
    }
}
