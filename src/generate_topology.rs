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
//! Synthesize or extend topology snapshots from a country plan.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;

use ripple::{
    synthetic::{build_country_net, extend_country_net},
    topology::TopologySnapshot,
    util,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// A country and its router count, as CODE:SIZE (e.g. `ZAF:24`).
    /// Repeatable.
    #[arg(short, long = "country", value_name = "CODE:SIZE", value_parser = parse_country, required = true)]
    countries: Vec<(String, usize)>,

    /// Seed of the random generator. The same plan and seed always produce
    /// the same topology.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Extend this existing snapshot instead of building a fresh one.
    #[arg(short, long, value_name = "FILE")]
    extend: Option<PathBuf>,

    /// Where to write the snapshot.
    #[arg(short, long, default_value = "topology.json")]
    output: PathBuf,

    /// Description stored in the snapshot metadata.
    #[arg(short, long)]
    description: Option<String>,
}

fn parse_country(arg: &str) -> Result<(String, usize), String> {
    let (code, size) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected CODE:SIZE, got `{arg}`"))?;
    let size = size
        .parse()
        .map_err(|e| format!("invalid router count `{size}`: {e}"))?;
    Ok((code.to_uppercase(), size))
}

fn main() -> Result<()> {
    util::init_logging();
    let cli = Cli::parse();
    ensure!(
        cli.countries.iter().all(|(_, size)| *size > 0),
        "every country needs at least one router"
    );

    let mut snapshot = match &cli.extend {
        Some(path) => {
            let base = TopologySnapshot::load(path)
                .with_context(|| format!("cannot load topology from {path:?}"))?;
            log::info!(
                "extending {:?} ({} nodes, {} links)",
                path,
                base.nodes.len(),
                base.links.len()
            );
            extend_country_net(&base, &cli.countries, cli.seed)
        }
        None => build_country_net(&cli.countries, cli.seed),
    };

    if let (Some(description), Some(meta)) = (cli.description, snapshot.metadata.as_mut()) {
        meta.description = description;
    }

    snapshot
        .store(&cli.output)
        .with_context(|| format!("cannot write topology to {:?}", cli.output))?;
    log::info!(
        "wrote {} nodes and {} links to {:?}",
        snapshot.nodes.len(),
        snapshot.links.len(),
        cli.output
    );
    Ok(())
}
