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
//! Topology model: nodes, links, snapshots on disk, link overrides, and
//! structural validation.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description, OffsetDateTime};

use crate::{util, Cost, LinkIndex};

/// Cost assumed for a direction that carries no cost information at all.
pub const DEFAULT_COST: Cost = 1.0;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("cannot access topology file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse topology JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("link override addresses index {0}, but the topology has only {1} links")]
    UnknownLink(LinkIndex, usize),
}

/// A router in the topology.
///
/// Only `id` and `country` matter to the engine. The remaining fields are
/// operational data carried through snapshots untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Country group used by the impact analyzer for aggregation. Nodes
    /// without a country form their own group under the empty string.
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub loopback_ip: Option<String>,
    #[serde(default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Node {
    pub fn new(id: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            country: country.into(),
            name: None,
            hostname: None,
            loopback_ip: None,
            node_type: None,
            is_active: None,
        }
    }
}

/// Operational state of a link. A `Down` link is structurally absent from the
/// adjacency, not merely expensive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Deserialize,
    Serialize,
    strum::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LinkStatus {
    #[default]
    Up,
    Down,
}

/// An undirected link record between two nodes with independent per-direction
/// costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    /// Cost in the source -> target direction, if explicitly configured.
    #[serde(default)]
    pub forward_cost: Option<Cost>,
    /// Cost in the target -> source direction, if explicitly configured.
    #[serde(default)]
    pub reverse_cost: Option<Cost>,
    /// Legacy unified cost, used when the directional costs are absent.
    #[serde(default)]
    pub cost: Option<Cost>,
    #[serde(default)]
    pub status: LinkStatus,
    #[serde(default)]
    pub source_interface: Option<String>,
    #[serde(default)]
    pub target_interface: Option<String>,
    #[serde(default)]
    pub edge_type: Option<String>,
    #[serde(default)]
    pub is_asymmetric: Option<bool>,
}

impl Link {
    /// A new link in `Up` state without any cost information; both directions
    /// resolve to [`DEFAULT_COST`].
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            forward_cost: None,
            reverse_cost: None,
            cost: None,
            status: LinkStatus::Up,
            source_interface: None,
            target_interface: None,
            edge_type: None,
            is_asymmetric: None,
        }
    }

    /// Set the same cost for both directions.
    pub fn symmetric(mut self, cost: Cost) -> Self {
        self.forward_cost = Some(cost);
        self.reverse_cost = Some(cost);
        self.is_asymmetric = Some(false);
        self
    }

    /// Set independent costs per direction.
    pub fn asymmetric(mut self, forward: Cost, reverse: Cost) -> Self {
        self.forward_cost = Some(forward);
        self.reverse_cost = Some(reverse);
        self.is_asymmetric = Some(forward != reverse);
        self
    }

    /// Take the link down.
    pub fn down(mut self) -> Self {
        self.status = LinkStatus::Down;
        self
    }

    /// Resolved cost in the source -> target direction: `forward_cost`, else
    /// the legacy `cost`, else [`DEFAULT_COST`].
    pub fn forward(&self) -> Cost {
        self.forward_cost.or(self.cost).unwrap_or(DEFAULT_COST)
    }

    /// Resolved cost in the target -> source direction: `reverse_cost`, else
    /// whatever the forward direction resolves to.
    pub fn reverse(&self) -> Cost {
        self.reverse_cost.unwrap_or_else(|| self.forward())
    }

    pub fn is_up(&self) -> bool {
        self.status == LinkStatus::Up
    }
}

/// A simulated edit to a single link, addressed by link index. Fields left
/// `None` keep the original value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkOverride {
    #[serde(default)]
    pub forward_cost: Option<Cost>,
    #[serde(default)]
    pub reverse_cost: Option<Cost>,
    #[serde(default)]
    pub status: Option<LinkStatus>,
}

impl LinkOverride {
    /// Merge another override into this one; fields set in `other` win.
    pub fn merge(mut self, other: LinkOverride) -> Self {
        self.forward_cost = other.forward_cost.or(self.forward_cost);
        self.reverse_cost = other.reverse_cost.or(self.reverse_cost);
        self.status = other.status.or(self.status);
        self
    }

    /// The modified copy of `link`.
    pub fn apply(&self, link: &Link) -> Link {
        let mut link = link.clone();
        if let Some(cost) = self.forward_cost {
            link.forward_cost = Some(cost);
        }
        if let Some(cost) = self.reverse_cost {
            link.reverse_cost = Some(cost);
        }
        if let Some(status) = self.status {
            link.status = status;
        }
        link.is_asymmetric = Some(link.forward() != link.reverse());
        link
    }
}

/// Apply link overrides (keyed by link index) to a link collection, yielding
/// the modified collection. Link indices are preserved.
pub fn apply_overrides(
    links: &[Link],
    overrides: &HashMap<LinkIndex, LinkOverride>,
) -> Result<Vec<Link>, TopologyError> {
    if let Some(&index) = overrides.keys().find(|index| **index >= links.len()) {
        return Err(TopologyError::UnknownLink(index, links.len()));
    }
    Ok(links
        .iter()
        .enumerate()
        .map(|(index, link)| match overrides.get(&index) {
            Some(change) => change.apply(link),
            None => link.clone(),
        })
        .collect())
}

/// Bookkeeping attached to a stored snapshot. Counts and timestamp are
/// recomputed on every store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyMetadata {
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(default)]
    pub export_timestamp: String,
    #[serde(default)]
    pub description: String,
}

/// A topology snapshot as stored on disk: the node and link collections of
/// the engine's data model plus bookkeeping metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    #[serde(default)]
    pub metadata: Option<TopologyMetadata>,
}

impl TopologySnapshot {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>, description: impl Into<String>) -> Self {
        let metadata = TopologyMetadata {
            node_count: nodes.len(),
            edge_count: links.len(),
            export_timestamp: now_timestamp(),
            description: description.into(),
        };
        Self {
            nodes,
            links,
            metadata: Some(metadata),
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Store the snapshot as pretty-printed JSON, restamping the metadata.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), TopologyError> {
        let mut stamped = self.clone();
        stamped.metadata = Some(TopologyMetadata {
            node_count: self.nodes.len(),
            edge_count: self.links.len(),
            export_timestamp: now_timestamp(),
            description: self
                .metadata
                .as_ref()
                .map(|meta| meta.description.clone())
                .unwrap_or_default(),
        });
        fs::write(path, serde_json::to_string_pretty(&stamped)?)?;
        Ok(())
    }

    pub fn validate(&self) -> ValidationReport {
        validate(&self.nodes, &self.links)
    }
}

/// Current local time in the format used for `export_timestamp`.
fn now_timestamp() -> String {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .format(&format_description::parse("[year]-[month]-[day]T[hour]:[minute]:[second]").unwrap())
        .unwrap_or_default()
}

/// Structural health of a topology, independent of any routing query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub node_count: usize,
    pub link_count: usize,
    /// Number of nodes per country group.
    pub country_distribution: BTreeMap<String, usize>,
    /// Number of link attachments per node, counting links of any status.
    pub degrees: BTreeMap<String, usize>,
    pub degree_min: usize,
    pub degree_max: usize,
    pub degree_avg: f64,
    /// Nodes without any link attached.
    pub isolated_nodes: Vec<String>,
    /// Links referencing a node id that is not part of the node collection.
    pub dangling_links: Vec<LinkIndex>,
    /// Links without any explicit cost (both directions fall back to the
    /// default).
    pub links_without_costs: Vec<LinkIndex>,
    /// Links missing an interface assignment on at least one side.
    pub links_without_interfaces: Vec<LinkIndex>,
}

impl ValidationReport {
    pub fn is_healthy(&self) -> bool {
        self.isolated_nodes.is_empty() && self.dangling_links.is_empty()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "nodes: {}, links: {}", self.node_count, self.link_count)?;
        writeln!(
            f,
            "countries: {}",
            self.country_distribution
                .iter()
                .map(|(country, count)| format!("{country}: {count}"))
                .join(", ")
        )?;
        writeln!(
            f,
            "degree: min {}, max {}, avg {:.2}",
            self.degree_min, self.degree_max, self.degree_avg
        )?;
        if self.isolated_nodes.is_empty() {
            writeln!(f, "no isolated nodes")?;
        } else {
            writeln!(f, "isolated nodes: {}", self.isolated_nodes.join(", "))?;
        }
        if self.dangling_links.is_empty() {
            writeln!(f, "no dangling links")?;
        } else {
            writeln!(
                f,
                "dangling links: {}",
                self.dangling_links.iter().map(|i| i.to_string()).join(", ")
            )?;
        }
        if !self.links_without_costs.is_empty() {
            writeln!(
                f,
                "links without explicit costs: {}",
                self.links_without_costs.iter().map(|i| i.to_string()).join(", ")
            )?;
        }
        if !self.links_without_interfaces.is_empty() {
            writeln!(
                f,
                "links without interfaces: {}",
                self.links_without_interfaces.iter().map(|i| i.to_string()).join(", ")
            )?;
        }
        Ok(())
    }
}

/// Check the structural health of a node and link collection.
pub fn validate(nodes: &[Node], links: &[Link]) -> ValidationReport {
    let mut degrees: BTreeMap<String, usize> =
        nodes.iter().map(|node| (node.id.clone(), 0)).collect();

    let mut dangling_links = Vec::new();
    let mut links_without_costs = Vec::new();
    let mut links_without_interfaces = Vec::new();
    for (index, link) in links.iter().enumerate() {
        let mut known = true;
        for endpoint in [&link.source, &link.target] {
            match degrees.get_mut(endpoint) {
                Some(degree) => *degree += 1,
                None => known = false,
            }
        }
        if !known {
            dangling_links.push(index);
        }
        if link.forward_cost.is_none() && link.cost.is_none() {
            links_without_costs.push(index);
        }
        if link.source_interface.is_none() || link.target_interface.is_none() {
            links_without_interfaces.push(index);
        }
    }

    let mut country_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for node in nodes {
        *country_distribution.entry(node.country.clone()).or_default() += 1;
    }

    let mut isolated_nodes = degrees
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| id.clone())
        .collect_vec();
    util::sort_natural(&mut isolated_nodes);

    let degree_min = degrees.values().min().copied().unwrap_or(0);
    let degree_max = degrees.values().max().copied().unwrap_or(0);
    let degree_avg = if degrees.is_empty() {
        0.0
    } else {
        degrees.values().sum::<usize>() as f64 / degrees.len() as f64
    };

    ValidationReport {
        node_count: nodes.len(),
        link_count: links.len(),
        country_distribution,
        degrees,
        degree_min,
        degree_max,
        degree_avg,
        isolated_nodes,
        dangling_links,
        links_without_costs,
        links_without_interfaces,
    }
}
