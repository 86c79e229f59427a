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
//! (De)serialization of `BTreeMap`s whose keys are no valid JSON object keys,
//! such as the country pairs of the impact report. The map is written as a
//! sequence of key/value entries instead.
//!
//! Annotate the field with `#[serde(with = "crate::serde::pair_map")]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
struct Entry<K, V> {
    key: K,
    val: V,
}

pub fn serialize<S, K, V>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    K: Serialize,
    V: Serialize,
{
    serializer.collect_seq(map.iter().map(|(key, val)| Entry { key, val }))
}

pub fn deserialize<'de, D, K, V>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
where
    D: serde::Deserializer<'de>,
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    let entries: Vec<Entry<K, V>> = Vec::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.key, entry.val))
        .collect())
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "crate::serde::pair_map")]
        map: BTreeMap<(String, String), usize>,
    }

    #[test]
    fn roundtrip() {
        let wrapper = Wrapper {
            map: BTreeMap::from([
                (("AAA".to_string(), "BBB".to_string()), 2),
                (("BBB".to_string(), "AAA".to_string()), 3),
            ]),
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(
            json,
            r#"{"map":[{"key":["AAA","BBB"],"val":2},{"key":["BBB","AAA"],"val":3}]}"#
        );
        let parsed: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, wrapper);
    }
}
