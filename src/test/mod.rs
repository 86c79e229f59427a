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
//! End-to-end scenarios and cross-cutting properties of the engine.

use crate::{
    synthetic::build_country_net,
    topology::{Link, Node, TopologySnapshot},
};

/// The triangle with one asymmetric link, each router its own country:
/// a -- b at 5/5, b -- c at 2/8, a -- c at 20/20.
pub fn triangle_net() -> (Vec<Node>, Vec<Link>) {
    (
        vec![
            Node::new("a", "AAA"),
            Node::new("b", "BBB"),
            Node::new("c", "CCC"),
        ],
        vec![
            Link::new("a", "b").symmetric(5.0),
            Link::new("b", "c").asymmetric(2.0, 8.0),
            Link::new("a", "c").symmetric(20.0),
        ],
    )
}

/// Two countries with two routers each and redundant cross links: traffic
/// between the countries can fail over from the cheap link to the expensive
/// one.
pub fn two_country_net() -> (Vec<Node>, Vec<Link>) {
    (
        vec![
            Node::new("aaa-r1", "AAA"),
            Node::new("aaa-r2", "AAA"),
            Node::new("bbb-r1", "BBB"),
            Node::new("bbb-r2", "BBB"),
        ],
        vec![
            Link::new("aaa-r1", "aaa-r2").symmetric(1.0),
            Link::new("bbb-r1", "bbb-r2").symmetric(1.0),
            Link::new("aaa-r1", "bbb-r1").symmetric(10.0),
            Link::new("aaa-r2", "bbb-r2").symmetric(50.0),
        ],
    )
}

/// A seeded synthetic net with three countries, identical on every call.
pub fn country_net() -> TopologySnapshot {
    build_country_net(
        &[
            ("ZAF".to_string(), 5),
            ("LSO".to_string(), 4),
            ("MOZ".to_string(), 4),
        ],
        12,
    )
}

mod ripple;
