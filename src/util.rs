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
//! Utility module collection of functions

use std::cmp::Ordering;

pub fn init_logging() {
    pretty_env_logger::init();
}

/// Compare two node ids in natural order, so that `r2` sorts before `r10`.
pub fn cmp_natural(a: &str, b: &str) -> Ordering {
    human_sort::compare(a, b)
}

/// Sort node ids in natural order.
pub fn sort_natural(ids: &mut [String]) {
    ids.sort_by(|a, b| cmp_natural(a, b));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn natural_order() {
        let mut ids = vec![
            "zaf-r10".to_string(),
            "zaf-r2".to_string(),
            "lso-r1".to_string(),
        ];
        sort_natural(&mut ids);
        assert_eq!(ids, vec!["lso-r1", "zaf-r2", "zaf-r10"]);
    }
}
