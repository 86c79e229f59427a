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
//! Query and analysis CLI operating on topology snapshots.

use std::{collections::HashMap, path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;

use ripple::{
    analyzer::{transit_ranking, ImpactAnalyzer, DEFAULT_PAIR_LIMIT},
    graph::AdjacencyGraph,
    paths::{enumerate_paths, DEFAULT_PATH_LIMIT},
    spf::shortest_cost,
    topology::{LinkOverride, LinkStatus, TopologySnapshot},
    Cost, LinkIndex,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Topology snapshot (JSON) to operate on.
    #[arg(short, long, global = true, default_value = "topology.json")]
    topology: PathBuf,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the cheapest cost between two routers.
    Route { start: String, end: String },
    /// Enumerate ranked loop-free paths between two routers.
    Paths {
        start: String,
        end: String,
        /// How many paths to collect at most.
        #[arg(short, long, default_value_t = DEFAULT_PATH_LIMIT)]
        limit: usize,
    },
    /// Analyze the routing impact of simulated link edits.
    Impact {
        /// Set the forward cost of a link. Repeatable.
        #[arg(long, value_name = "INDEX=COST", value_parser = parse_indexed_cost)]
        forward_cost: Vec<(LinkIndex, Cost)>,
        /// Set the reverse cost of a link. Repeatable.
        #[arg(long, value_name = "INDEX=COST", value_parser = parse_indexed_cost)]
        reverse_cost: Vec<(LinkIndex, Cost)>,
        /// Take a link down. Repeatable.
        #[arg(long, value_name = "INDEX")]
        down: Vec<LinkIndex>,
        /// Bring a link up. Repeatable.
        #[arg(long, value_name = "INDEX")]
        up: Vec<LinkIndex>,
        /// Candidate paths to rank per country pair.
        #[arg(long, default_value_t = DEFAULT_PAIR_LIMIT)]
        pair_limit: usize,
    },
    /// Rank countries by how critical they are as transit hubs.
    Transit,
    /// Check the structural health of the snapshot.
    Validate,
}

fn parse_indexed_cost(arg: &str) -> Result<(LinkIndex, Cost), String> {
    let (index, cost) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=COST, got `{arg}`"))?;
    let index = index
        .parse()
        .map_err(|e| format!("invalid link index `{index}`: {e}"))?;
    let cost = cost
        .parse()
        .map_err(|e| format!("invalid cost `{cost}`: {e}"))?;
    Ok((index, cost))
}

fn main() -> Result<()> {
    let logger = pretty_env_logger::formatted_builder().build();
    let multi = MultiProgress::new();
    LogWrapper::new(multi.clone(), logger).try_init()?;

    let cli = Cli::parse();
    let snapshot = TopologySnapshot::load(&cli.topology)
        .with_context(|| format!("cannot load topology from {:?}", cli.topology))?;

    match cli.command {
        Command::Route { start, end } => {
            let graph = AdjacencyGraph::build(&snapshot.nodes, &snapshot.links);
            let cost = shortest_cost(&graph, &start, &end);
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "start": start, "end": end, "cost": cost })
                );
            } else {
                match cost {
                    Some(cost) => println!("{start} -> {end}: cost {cost}"),
                    None => println!("{start} -> {end}: unreachable"),
                }
            }
        }
        Command::Paths { start, end, limit } => {
            let graph = AdjacencyGraph::build(&snapshot.nodes, &snapshot.links);
            let paths = enumerate_paths(&graph, &start, &end, limit);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&paths)?);
            } else if paths.is_empty() {
                println!("no path from {start} to {end}");
            } else {
                for path in &paths {
                    println!("{path}");
                }
            }
        }
        Command::Impact {
            forward_cost,
            reverse_cost,
            down,
            up,
            pair_limit,
        } => {
            let overrides = collect_overrides(forward_cost, reverse_cost, down, up);
            ensure!(!overrides.is_empty(), "no link edits given");
            let analyzer = ImpactAnalyzer::with_overrides(&snapshot.nodes, &snapshot.links, &overrides)?
                .pair_limit(pair_limit);

            let pb = multi.add(
                ProgressBar::new_spinner().with_style(
                    ProgressStyle::with_template("{spinner} {msg} ({elapsed})").unwrap(),
                ),
            );
            pb.set_message("analyzing impact");
            pb.enable_steady_tick(Duration::from_millis(100));
            let report = analyzer.analyze();
            pb.finish_and_clear();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Command::Transit => {
            let ranking = transit_ranking(&snapshot.nodes, &snapshot.links);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&ranking)?);
            } else if ranking.is_empty() {
                println!("no transit countries");
            } else {
                for entry in &ranking {
                    println!("{entry}");
                }
            }
        }
        Command::Validate => {
            let report = snapshot.validate();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
            ensure!(report.is_healthy(), "the topology has structural problems");
        }
    }

    Ok(())
}

fn collect_overrides(
    forward_cost: Vec<(LinkIndex, Cost)>,
    reverse_cost: Vec<(LinkIndex, Cost)>,
    down: Vec<LinkIndex>,
    up: Vec<LinkIndex>,
) -> HashMap<LinkIndex, LinkOverride> {
    let mut overrides: HashMap<LinkIndex, LinkOverride> = HashMap::new();
    let mut merge = |index: LinkIndex, change: LinkOverride| {
        let entry = overrides.entry(index).or_default();
        *entry = entry.merge(change);
    };

    for (index, cost) in forward_cost {
        merge(
            index,
            LinkOverride {
                forward_cost: Some(cost),
                ..Default::default()
            },
        );
    }
    for (index, cost) in reverse_cost {
        merge(
            index,
            LinkOverride {
                reverse_cost: Some(cost),
                ..Default::default()
            },
        );
    }
    for index in down {
        merge(
            index,
            LinkOverride {
                status: Some(LinkStatus::Down),
                ..Default::default()
            },
        );
    }
    for index in up {
        merge(
            index,
            LinkOverride {
                status: Some(LinkStatus::Up),
                ..Default::default()
            },
        );
    }
    overrides
}
