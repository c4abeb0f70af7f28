use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level fields that change on every collection and never count as drift.
pub const VOLATILE_FIELDS: [&str; 1] = ["timestamp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftKind {
    Added,
    Removed,
    Changed,
}

impl DriftKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftKind::Added => "added",
            DriftKind::Removed => "removed",
            DriftKind::Changed => "changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: DriftKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
}

impl DriftEntry {
    fn added(path: String, new: &Value) -> Self {
        Self { path, kind: DriftKind::Added, old: None, new: Some(new.clone()) }
    }

    fn removed(path: String, old: &Value) -> Self {
        Self { path, kind: DriftKind::Removed, old: Some(old.clone()), new: None }
    }

    fn changed(path: String, old: &Value, new: &Value) -> Self {
        Self {
            path,
            kind: DriftKind::Changed,
            old: Some(old.clone()),
            new: Some(new.clone()),
        }
    }
}

/// Structural diff of two mappings over the sorted union of their keys.
/// Nested mappings are walked; anything else is compared by value.
pub fn diff_maps(old: &Map<String, Value>, new: &Map<String, Value>, prefix: &str) -> Vec<DriftEntry> {
    let mut keys: Vec<&String> = old.keys().chain(new.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut out = Vec::new();
    for key in keys {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match (old.get(key), new.get(key)) {
            (None, Some(nv)) => out.push(DriftEntry::added(path, nv)),
            (Some(ov), None) => out.push(DriftEntry::removed(path, ov)),
            (Some(Value::Object(om)), Some(Value::Object(nm))) => out.extend(diff_maps(om, nm, &path)),
            (Some(ov), Some(nv)) if ov != nv => out.push(DriftEntry::changed(path, ov, nv)),
            _ => {}
        }
    }
    out
}

/// Diff two documents. Non-mapping documents compare as a whole under the empty path.
pub fn diff_values(old: &Value, new: &Value) -> Vec<DriftEntry> {
    match (old, new) {
        (Value::Object(om), Value::Object(nm)) => diff_maps(om, nm, ""),
        (ov, nv) if ov != nv => vec![DriftEntry::changed(String::new(), ov, nv)],
        _ => Vec::new(),
    }
}

pub fn strip_volatile(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| !VOLATILE_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_diff_nested_change() {
        let old = json!({"fingerprints": {"leaf1": {"hash": "a", "key_count": 2}}});
        let new = json!({"fingerprints": {"leaf1": {"hash": "b", "key_count": 2}}});
        let diffs = diff_values(&old, &new);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "fingerprints.leaf1.hash");
        assert_eq!(diffs[0].kind, DriftKind::Changed);
        assert_eq!(diffs[0].old, Some(json!("a")));
        assert_eq!(diffs[0].new, Some(json!("b")));
    }

    #[test]
    fn test_diff_added_removed_sorted() {
        let old = json!({"b": 1, "z": 2});
        let new = json!({"a": 1, "b": 1});
        let diffs = diff_values(&old, &new);
        let summary: Vec<_> = diffs.iter().map(|d| (d.path.as_str(), d.kind)).collect();
        assert_eq!(summary, vec![("a", DriftKind::Added), ("z", DriftKind::Removed)]);
    }

    #[test]
    fn test_diff_mapping_against_scalar_is_changed() {
        let diffs = diff_values(&json!({"x": {"y": 1}}), &json!({"x": [1]}));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DriftKind::Changed);
        assert_eq!(diffs[0].path, "x");
    }

    #[test]
    fn test_strip_volatile() {
        let snap = json!({"lab": "lab1", "timestamp": "2026-01-01T00:00:00Z"});
        assert_eq!(strip_volatile(&snap), json!({"lab": "lab1"}));
    }

    #[test]
    fn test_entry_serialization() {
        let diffs = diff_values(&json!({}), &json!({"n": 1}));
        let value = serde_json::to_value(&diffs[0]).unwrap();
        assert_eq!(value, json!({"path": "n", "type": "added", "new": 1}));
    }

    fn arb_doc() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::from),
            (-50i64..50).prop_map(Value::from),
            "[a-c]{0,2}".prop_map(Value::from),
        ];
        let tree = leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::from),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        });
        prop::collection::btree_map("[a-d]", tree, 0..5)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }

    proptest! {
        #[test]
        fn test_prop_self_diff_is_empty(doc in arb_doc()) {
            prop_assert!(diff_values(&doc, &doc).is_empty());
        }

        #[test]
        fn test_prop_diff_is_antisymmetric(old in arb_doc(), new in arb_doc()) {
            let forward = diff_values(&old, &new);
            let backward = diff_values(&new, &old);
            prop_assert_eq!(forward.len(), backward.len());

            for entry in &forward {
                let mirror = backward.iter().find(|b| b.path == entry.path);
                prop_assert!(mirror.is_some());
                let mirror = mirror.unwrap();
                match entry.kind {
                    DriftKind::Added => {
                        prop_assert_eq!(mirror.kind, DriftKind::Removed);
                        prop_assert_eq!(&mirror.old, &entry.new);
                    }
                    DriftKind::Removed => {
                        prop_assert_eq!(mirror.kind, DriftKind::Added);
                        prop_assert_eq!(&mirror.new, &entry.old);
                    }
                    DriftKind::Changed => {
                        prop_assert_eq!(mirror.kind, DriftKind::Changed);
                        prop_assert_eq!(&mirror.old, &entry.new);
                        prop_assert_eq!(&mirror.new, &entry.old);
                    }
                }
            }
        }
    }
}
