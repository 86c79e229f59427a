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
//! Library for deterministic pathfinding and change-impact analysis on router topologies.

/// Cost of traversing a directed edge, and the total cost of a path.
pub type Cost = f64;

/// A link is identified by its index in the topology's link collection. The
/// index is carried into every path that traverses the link, so paths can be
/// traced back to the exact links used even between the same pair of nodes.
pub type LinkIndex = usize;

pub mod analyzer;
pub mod graph;
pub mod paths;
pub mod serde;
pub mod spf;
pub mod synthetic;
pub mod topology;
pub mod util;

#[cfg(test)]
mod test;

pub mod prelude {
    pub use super::{
        analyzer::{transit_ranking, ImpactAnalyzer, ImpactReport, LinkChange, TransitEntry},
        graph::AdjacencyGraph,
        paths::{enumerate_paths, RoutePath, DEFAULT_PATH_LIMIT},
        spf::shortest_cost,
        topology::{Link, LinkOverride, LinkStatus, Node, TopologySnapshot},
        Cost, LinkIndex,
    };
}
