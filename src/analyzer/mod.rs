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
//! Module that performs the change-impact analysis.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use itertools::iproduct;
use rayon::prelude::*;

use crate::{
    graph::AdjacencyGraph,
    paths::{enumerate_paths, RoutePath},
    topology::{apply_overrides, Link, LinkOverride, Node, TopologyError},
    util, LinkIndex,
};

mod result;

pub use result::*;

/// Paths ranked per country pair when comparing the two topologies.
pub const DEFAULT_PAIR_LIMIT: usize = 3;

/// Compares two versions of the same link collection and quantifies the
/// routing impact of every changed link.
///
/// Both collections must describe the same links in the same order, so a link
/// index addresses the same link in either. Country pairs are evaluated
/// independently and in parallel; the report itself is deterministic for
/// identical inputs.
#[derive(Debug, Clone)]
pub struct ImpactAnalyzer<'a> {
    original: &'a [Link],
    modified: Vec<Link>,
    pair_limit: usize,
    original_graph: AdjacencyGraph,
    modified_graph: AdjacencyGraph,
    countries: BTreeMap<String, Vec<String>>,
    node_country: HashMap<String, String>,
}

impl<'a> ImpactAnalyzer<'a> {
    /// Compare the original link collection against a modified copy of it.
    pub fn new(nodes: &[Node], original: &'a [Link], modified: Vec<Link>) -> Self {
        let original_graph = AdjacencyGraph::build(nodes, original);
        let modified_graph = AdjacencyGraph::build(nodes, &modified);
        let (countries, node_country) = country_groups(nodes);
        Self {
            original,
            modified,
            pair_limit: DEFAULT_PAIR_LIMIT,
            original_graph,
            modified_graph,
            countries,
            node_country,
        }
    }

    /// Compare the original link collection against a copy with the given
    /// overrides applied.
    pub fn with_overrides(
        nodes: &[Node],
        original: &'a [Link],
        overrides: &HashMap<LinkIndex, LinkOverride>,
    ) -> Result<Self, TopologyError> {
        Ok(Self::new(
            nodes,
            original,
            apply_overrides(original, overrides)?,
        ))
    }

    /// Set how many candidate paths are ranked per country pair. At least one
    /// path is always ranked.
    pub fn pair_limit(mut self, limit: usize) -> Self {
        self.pair_limit = limit.max(1);
        self
    }

    /// Run the analysis: one impact record per changed link, in link index
    /// order, plus the transit ranking of the modified topology.
    pub fn analyze(&self) -> ImpactReport {
        let link_impacts = self
            .original
            .iter()
            .zip(self.modified.iter())
            .enumerate()
            .filter_map(|(index, (before, after))| {
                LinkChange::between(before, after)
                    .map(|change| self.link_impact(index, before, change))
            })
            .collect();

        let transit_ranking =
            transit_ranking_on(&self.modified_graph, &self.countries, &self.node_country);

        ImpactReport {
            link_impacts,
            transit_ranking,
        }
    }

    fn link_impact(&self, link: LinkIndex, before: &Link, change: LinkChange) -> LinkImpact {
        let pairs: Vec<(String, String)> = iproduct!(self.countries.keys(), self.countries.keys())
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect();

        let results: Vec<_> = pairs
            .par_iter()
            .filter_map(|(from, to)| self.pair_impact(from, to))
            .collect();

        let mut affected_pairs = BTreeMap::new();
        let mut downstream_impact = Vec::new();
        for (pair, impact, reroute) in results {
            affected_pairs.insert(pair, impact);
            downstream_impact.extend(reroute);
        }
        util::sort_natural(&mut downstream_impact);
        downstream_impact.dedup();

        let mut local_impact = vec![before.source.clone(), before.target.clone()];
        util::sort_natural(&mut local_impact);
        local_impact.dedup();

        LinkImpact {
            link,
            source: before.source.clone(),
            target: before.target.clone(),
            change,
            local_impact,
            downstream_impact,
            affected_pairs,
        }
    }

    /// The impact on one ordered country pair, or `None` if neither its best
    /// path nor its path set changed. The third element collects the nodes on
    /// either best path that belong to a third country.
    fn pair_impact(
        &self,
        from: &str,
        to: &str,
    ) -> Option<((String, String), PairImpact, Vec<String>)> {
        let before = country_pair_paths_on(
            &self.original_graph,
            &self.countries,
            from,
            to,
            self.pair_limit,
        );
        let after = country_pair_paths_on(
            &self.modified_graph,
            &self.countries,
            from,
            to,
            self.pair_limit,
        );

        let best_before = before.first();
        let best_after = after.first();
        let best_changed = match (best_before, best_after) {
            (Some(b), Some(a)) => b.nodes != a.nodes,
            (None, None) => false,
            _ => true,
        };
        if !best_changed && before.len() == after.len() {
            return None;
        }

        let mut reroute = Vec::new();
        if best_changed {
            for path in best_before.into_iter().chain(best_after) {
                for node in &path.nodes {
                    let Some(country) = self.node_country.get(node) else {
                        continue;
                    };
                    if country != from && country != to {
                        reroute.push(node.clone());
                    }
                }
            }
        }

        let impact = PairImpact {
            paths_recomputed: before.len() + after.len(),
            cost_before: best_before.map(|path| path.total_cost),
            cost_after: best_after.map(|path| path.total_cost),
        };
        Some(((from.to_string(), to.to_string()), impact, reroute))
    }
}

/// Rank countries by how much foreign traffic they carry.
///
/// For every ordered country pair, the top-ranked path between the two
/// countries is computed; every path node belonging to a third country counts
/// as one transit appearance for that country. Criticality is the share of
/// ordered pairs a country serves, in percent. Countries serving no pair are
/// left out.
pub fn transit_ranking(nodes: &[Node], links: &[Link]) -> Vec<TransitEntry> {
    let graph = AdjacencyGraph::build(nodes, links);
    let (countries, node_country) = country_groups(nodes);
    transit_ranking_on(&graph, &countries, &node_country)
}

fn transit_ranking_on(
    graph: &AdjacencyGraph,
    countries: &BTreeMap<String, Vec<String>>,
    node_country: &HashMap<String, String>,
) -> Vec<TransitEntry> {
    let pairs: Vec<(String, String)> = iproduct!(countries.keys(), countries.keys())
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (a.clone(), b.clone()))
        .collect();
    let total_pairs = pairs.len() as f64;

    let best_paths: Vec<((String, String), RoutePath)> = pairs
        .par_iter()
        .filter_map(|(from, to)| {
            country_pair_paths_on(graph, countries, from, to, 1)
                .into_iter()
                .next()
                .map(|path| ((from.clone(), to.clone()), path))
        })
        .collect();

    let mut transit_paths: BTreeMap<String, usize> = BTreeMap::new();
    let mut pairs_served: BTreeMap<String, BTreeSet<(String, String)>> = BTreeMap::new();
    for ((from, to), path) in &best_paths {
        for node in &path.nodes[1..path.nodes.len() - 1] {
            let Some(country) = node_country.get(node) else {
                continue;
            };
            if country != from && country != to {
                *transit_paths.entry(country.clone()).or_default() += 1;
                pairs_served
                    .entry(country.clone())
                    .or_default()
                    .insert((from.clone(), to.clone()));
            }
        }
    }

    let mut ranking: Vec<TransitEntry> = pairs_served
        .into_iter()
        .map(|(country, served)| TransitEntry {
            transit_paths: transit_paths.get(&country).copied().unwrap_or(0),
            criticality: 100.0 * served.len() as f64 / total_pairs,
            pairs_served: served.into_iter().collect(),
            country,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.criticality
            .total_cmp(&a.criticality)
            .then_with(|| a.country.cmp(&b.country))
    });
    ranking
}

/// Candidate paths between two countries: the per-node-pair enumerations,
/// merged, ranked, and truncated to `limit`.
fn country_pair_paths_on(
    graph: &AdjacencyGraph,
    countries: &BTreeMap<String, Vec<String>>,
    from: &str,
    to: &str,
    limit: usize,
) -> Vec<RoutePath> {
    let (Some(sources), Some(targets)) = (countries.get(from), countries.get(to)) else {
        return Vec::new();
    };
    let mut paths: Vec<RoutePath> = iproduct!(sources, targets)
        .flat_map(|(source, target)| enumerate_paths(graph, source, target, limit))
        .collect();
    paths.sort_by(RoutePath::rank);
    paths.truncate(limit);
    paths
}

fn country_groups(nodes: &[Node]) -> (BTreeMap<String, Vec<String>>, HashMap<String, String>) {
    let mut countries: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut node_country = HashMap::new();
    for node in nodes {
        countries
            .entry(node.country.clone())
            .or_default()
            .push(node.id.clone());
        node_country.insert(node.id.clone(), node.country.clone());
    }
    (countries, node_country)
}
