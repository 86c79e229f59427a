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
//! Result types of the impact analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{topology::Link, util, Cost, LinkIndex};

/// What happened to a single link between the original and the modified
/// collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkChange {
    CostChange {
        forward_before: Cost,
        forward_after: Cost,
        reverse_before: Cost,
        reverse_after: Cost,
    },
    WentDown,
    CameUp,
}

impl LinkChange {
    /// The change between two versions of the same link record, if any. A
    /// status flip takes precedence over a simultaneous cost edit.
    pub fn between(before: &Link, after: &Link) -> Option<Self> {
        if before.status != after.status {
            return Some(if after.is_up() {
                Self::CameUp
            } else {
                Self::WentDown
            });
        }
        if before.forward() != after.forward() || before.reverse() != after.reverse() {
            return Some(Self::CostChange {
                forward_before: before.forward(),
                forward_after: after.forward(),
                reverse_before: before.reverse(),
                reverse_after: after.reverse(),
            });
        }
        None
    }
}

impl std::fmt::Display for LinkChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CostChange {
                forward_before,
                forward_after,
                reverse_before,
                reverse_after,
            } => write!(
                f,
                "cost {forward_before}/{reverse_before} -> {forward_after}/{reverse_after}"
            ),
            Self::WentDown => write!(f, "went down"),
            Self::CameUp => write!(f, "came up"),
        }
    }
}

/// How routing between one ordered country pair reacted to a link change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairImpact {
    /// Number of candidate paths ranked to compare the two topologies.
    pub paths_recomputed: usize,
    /// Best cost before the change, `None` if the pair was unreachable.
    pub cost_before: Option<Cost>,
    /// Best cost after the change, `None` if the pair became unreachable.
    pub cost_after: Option<Cost>,
}

/// Full impact record of one changed link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkImpact {
    pub link: LinkIndex,
    pub source: String,
    pub target: String,
    pub change: LinkChange,
    /// The endpoints of the changed link.
    pub local_impact: Vec<String>,
    /// Nodes on rerouted best paths, excluding nodes of the endpoint
    /// countries themselves.
    pub downstream_impact: Vec<String>,
    /// Ordered country pairs whose best path or path set changed.
    #[serde(with = "crate::serde::pair_map")]
    pub affected_pairs: BTreeMap<(String, String), PairImpact>,
}

fn fmt_cost(cost: Option<Cost>) -> String {
    match cost {
        Some(cost) => cost.to_string(),
        None => "unreachable".to_string(),
    }
}

impl std::fmt::Display for LinkImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "link {} ({} -- {}): {}",
            self.link, self.source, self.target, self.change
        )?;
        writeln!(f, "  local impact: {}", self.local_impact.join(", "))?;
        if self.downstream_impact.is_empty() {
            writeln!(f, "  downstream impact: none")?;
        } else {
            writeln!(
                f,
                "  downstream impact: {}",
                self.downstream_impact.join(", ")
            )?;
        }
        for ((from, to), pair) in &self.affected_pairs {
            writeln!(
                f,
                "  {from} -> {to}: cost {} -> {}, {} paths recomputed",
                fmt_cost(pair.cost_before),
                fmt_cost(pair.cost_after),
                pair.paths_recomputed
            )?;
        }
        Ok(())
    }
}

/// One country in the transit ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitEntry {
    pub country: String,
    /// Transit node appearances over all best paths between foreign country
    /// pairs. A path crossing two routers of this country counts twice.
    pub transit_paths: usize,
    /// The ordered country pairs this country carries traffic for.
    pub pairs_served: Vec<(String, String)>,
    /// Share of all ordered country pairs served, in percent.
    pub criticality: f64,
}

impl std::fmt::Display for TransitEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} transit paths, {} pairs served, criticality {:.2}%",
            self.country,
            self.transit_paths,
            self.pairs_served.len(),
            self.criticality
        )
    }
}

/// The complete outcome of an impact analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactReport {
    /// One record per changed link, in link index order.
    pub link_impacts: Vec<LinkImpact>,
    /// Countries serving at least one foreign pair, most critical first.
    pub transit_ranking: Vec<TransitEntry>,
}

impl ImpactReport {
    /// All impacted nodes over all changed links, in natural order.
    pub fn affected_nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self
            .link_impacts
            .iter()
            .flat_map(|impact| {
                impact
                    .local_impact
                    .iter()
                    .chain(impact.downstream_impact.iter())
                    .cloned()
            })
            .collect();
        util::sort_natural(&mut nodes);
        nodes.dedup();
        nodes
    }
}

impl std::fmt::Display for ImpactReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.link_impacts.is_empty() {
            writeln!(f, "no link changes")?;
        }
        for impact in &self.link_impacts {
            write!(f, "{impact}")?;
        }
        if !self.transit_ranking.is_empty() {
            writeln!(f, "transit ranking:")?;
            for entry in &self.transit_ranking {
                writeln!(f, "  {entry}")?;
            }
        }
        Ok(())
    }
}
