//! Serialized line artifact
//!
//! On disk the line set is a JSON document with two maps:
//!
//! ```json
//! {
//!   "lines":  { "322": { "file": "assets/audio/collision_2_2.mov", "text": "This is malarkey!" } },
//!   "groups": { "COLLISION": [322] }
//! }
//! ```
//!
//! Both maps are read as ordered key/value pairs so that a repeated key is
//! reported instead of silently replacing the earlier value.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, Violation, Violations};
use crate::model::{AudioEntry, LineId};
use crate::table::LineTable;

/// Unvalidated artifact contents, exactly as serialized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineArtifact {
    /// String-encoded line id → entry
    #[serde(with = "pairs")]
    pub lines: Vec<(String, AudioEntry)>,

    /// Category name → ordered line ids
    ///
    /// Ids are kept as raw JSON values so a bad id is reported as a
    /// violation alongside the others rather than aborting the decode.
    #[serde(with = "pairs", default)]
    pub groups: Vec<(String, Vec<Value>)>,
}

impl LineArtifact {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        debug!("Reading line artifact {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialized form of a validated table: ids ascending, groups by name
    pub fn from_table(table: &LineTable) -> Self {
        let lines: Vec<(String, AudioEntry)> = table
            .entries()
            .into_iter()
            .map(|(id, entry)| (id.to_string(), entry.clone()))
            .collect();

        let groups: Vec<(String, Vec<Value>)> = table
            .group_names()
            .into_iter()
            .filter_map(|name| {
                table
                    .group(name)
                    .ok()
                    .map(|ids| (name.to_string(), ids.iter().map(|id| Value::from(id.get())).collect()))
            })
            .collect();

        Self { lines, groups }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        info!("Wrote line artifact {} ({} lines)", path.display(), self.lines.len());
        Ok(())
    }

    /// Check every invariant, collecting all violations
    pub fn validate(&self) -> Result<()> {
        self.check().map(|_| ())
    }

    /// Validate and build the lookup table
    ///
    /// Fails with `Error::Malformed` listing every violation; no partial
    /// table is returned.
    pub fn into_table(self) -> Result<LineTable> {
        let (entries, groups) = self.check()?;
        Ok(LineTable::from_validated(entries, groups))
    }

    #[allow(clippy::type_complexity)]
    fn check(&self) -> Result<(HashMap<LineId, AudioEntry>, HashMap<String, Vec<LineId>>)> {
        let mut violations = Violations::new();
        let mut entries = HashMap::with_capacity(self.lines.len());

        for (key, entry) in &self.lines {
            let id = match key.parse::<LineId>() {
                Ok(id) => id,
                Err(v) => {
                    violations.push(v);
                    continue;
                }
            };
            if entries.contains_key(&id) {
                violations.push(Violation::DuplicateId(id));
                continue;
            }
            if entry.file.trim().is_empty() {
                violations.push(Violation::EmptyFile(id));
            }
            if entry.text.trim().is_empty() {
                violations.push(Violation::EmptyText(id));
            }
            if !entry.file.is_empty() && !entry.has_contained_path() {
                violations.push(Violation::EscapingPath(id));
            }
            entries.insert(id, entry.clone());
        }

        let mut groups = HashMap::with_capacity(self.groups.len());
        let mut seen_names = HashSet::new();

        for (name, raw_ids) in &self.groups {
            if name.trim().is_empty() {
                violations.push(Violation::EmptyGroupName);
                continue;
            }
            if !seen_names.insert(name.as_str()) {
                violations.push(Violation::DuplicateGroup(name.clone()));
                continue;
            }

            let mut ids = Vec::with_capacity(raw_ids.len());
            for raw in raw_ids {
                match raw_line_id(raw) {
                    Ok(id) if entries.contains_key(&id) => ids.push(id),
                    Ok(id) => violations.push(Violation::DanglingReference {
                        group: name.clone(),
                        id,
                    }),
                    Err(v) => violations.push(v),
                }
            }
            groups.insert(name.clone(), ids);
        }

        violations.into_result()?;
        Ok((entries, groups))
    }
}

/// Group id as written in the artifact: a positive integer that fits `u32`
fn raw_line_id(raw: &Value) -> std::result::Result<LineId, Violation> {
    raw.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .and_then(LineId::new)
        .ok_or_else(|| Violation::InvalidId(raw.to_string()))
}

impl TryFrom<LineArtifact> for LineTable {
    type Error = crate::error::Error;

    fn try_from(artifact: LineArtifact) -> Result<Self> {
        artifact.into_table()
    }
}

/// Map (de)serialization as an ordered list of pairs, keeping duplicates
mod pairs {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use serde::ser::{Serialize, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, K, V>(pairs: &Vec<(K, V)>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        K: Serialize,
        V: Serialize,
    {
        serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
    }

    pub fn deserialize<'de, D, K, V>(deserializer: D) -> Result<Vec<(K, V)>, D::Error>
    where
        D: Deserializer<'de>,
        K: Deserialize<'de>,
        V: Deserialize<'de>,
    {
        struct PairVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for PairVisitor<K, V>
        where
            K: Deserialize<'de>,
            V: Deserialize<'de>,
        {
            type Value = Vec<(K, V)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry()? {
                    out.push(pair);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(PairVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn id(n: u32) -> LineId {
        LineId::new(n).unwrap()
    }

    const VALID: &str = r#"{
        "lines": {
            "950": { "file": "assets/audio/random_0_0.mp3", "text": "Have you suffered a recent blow to the head?" },
            "970": { "file": "assets/audio/random_2_0.mp3", "text": "Bazinga!" }
        },
        "groups": { "RANDOM": [970, 950] }
    }"#;

    #[test]
    fn test_valid_artifact_builds_table() {
        let table = LineTable::from_json_str(VALID).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.group("RANDOM").unwrap(), &[id(970), id(950)]);
        assert_eq!(table.entry(970).unwrap().text, "Bazinga!");
    }

    #[test]
    fn test_missing_groups_defaults_to_empty_index() {
        let json = r#"{ "lines": { "1": { "file": "a.mp3", "text": "x" } } }"#;
        let table = LineTable::from_json_str(json).unwrap();
        assert!(table.group_names().is_empty());
    }

    #[test]
    fn test_duplicate_id_detected() {
        let json = r#"{
            "lines": {
                "322": { "file": "a.mov", "text": "first" },
                "322": { "file": "b.mov", "text": "second" }
            },
            "groups": {}
        }"#;
        let err = LineTable::from_json_str(json).unwrap_err();
        assert_eq!(err.violations(), &[Violation::DuplicateId(id(322))]);
    }

    #[test]
    fn test_dangling_reference_detected() {
        let json = r#"{
            "lines": { "421": { "file": "a.mp3", "text": "x" } },
            "groups": { "STUCK": [421, 422] }
        }"#;
        let err = LineTable::from_json_str(json).unwrap_err();
        assert_eq!(
            err.violations(),
            &[Violation::DanglingReference {
                group: "STUCK".to_string(),
                id: id(422)
            }]
        );
    }

    #[test]
    fn test_empty_fields_detected() {
        let json = r#"{
            "lines": {
                "1": { "file": "", "text": "x" },
                "2": { "file": "b.mp3", "text": "   " }
            }
        }"#;
        let err = LineTable::from_json_str(json).unwrap_err();
        assert_eq!(
            err.violations(),
            &[Violation::EmptyFile(id(1)), Violation::EmptyText(id(2))]
        );
    }

    #[test]
    fn test_every_violation_reported_in_one_pass() {
        let json = r#"{
            "lines": {
                "0": { "file": "a.mp3", "text": "x" },
                "abc": { "file": "a.mp3", "text": "x" },
                "5": { "file": "a.mp3", "text": "x" }
            },
            "groups": {
                "": [5],
                "BOOT": [5, 0, 6],
                "BOOT": [5]
            }
        }"#;
        let err = LineArtifact::from_json_str(json).unwrap().validate().unwrap_err();
        assert_eq!(
            err.violations(),
            &[
                Violation::InvalidId("0".to_string()),
                Violation::InvalidId("abc".to_string()),
                Violation::EmptyGroupName,
                Violation::InvalidId("0".to_string()),
                Violation::DanglingReference {
                    group: "BOOT".to_string(),
                    id: id(6)
                },
                Violation::DuplicateGroup("BOOT".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_top_level_field_rejected() {
        let json = r#"{ "lines": {}, "groups": {}, "voices": {} }"#;
        assert!(matches!(
            LineArtifact::from_json_str(json),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_from_table_orders_output() {
        let table = LineTable::from_json_str(VALID).unwrap();
        let artifact = LineArtifact::from_table(&table);

        let keys: Vec<&str> = artifact.lines.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["950", "970"]);
        assert_eq!(
            artifact.groups,
            vec![("RANDOM".to_string(), vec![json!(970), json!(950)])]
        );

        let reloaded = LineTable::from_json_str(&artifact.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_try_from_matches_into_table() {
        let artifact = LineArtifact::from_json_str(VALID).unwrap();
        let table = LineTable::try_from(artifact.clone()).unwrap();
        assert_eq!(table, artifact.into_table().unwrap());
    }

    #[test]
    fn test_non_integer_group_ids_are_violations() {
        let json = r#"{
            "lines": { "950": { "file": "assets/audio/random_0_0.mp3", "text": "x" } },
            "groups": {
                "NEGATIVE": [-5],
                "STRING": ["950"],
                "OVERSIZED": [99999999999],
                "FLOAT": [950, 1.5]
            }
        }"#;
        let err = LineTable::from_json_str(json).unwrap_err();
        assert_eq!(
            err.violations(),
            &[
                Violation::InvalidId("-5".to_string()),
                Violation::InvalidId("\"950\"".to_string()),
                Violation::InvalidId("99999999999".to_string()),
                Violation::InvalidId("1.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_escaping_file_paths_rejected() {
        let json = r#"{
            "lines": {
                "1": { "file": "/etc/passwd", "text": "x" },
                "2": { "file": "../../../../../../etc/hostname", "text": "x" },
                "3": { "file": "assets/../../outside.mp3", "text": "x" },
                "4": { "file": "assets/./audio/random_0_0.mp3", "text": "x" }
            }
        }"#;
        let err = LineTable::from_json_str(json).unwrap_err();
        assert_eq!(
            err.violations(),
            &[
                Violation::EscapingPath(id(1)),
                Violation::EscapingPath(id(2)),
                Violation::EscapingPath(id(3)),
            ]
        );
    }

    #[test]
    fn test_leading_zero_key_rejected() {
        let json = r#"{ "lines": { "0322": { "file": "a.mov", "text": "x" } } }"#;
        let err = LineTable::from_json_str(json).unwrap_err();
        assert_eq!(err.violations(), &[Violation::InvalidId("0322".to_string())]);
    }
}
