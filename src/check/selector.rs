use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::intent::Inventory;
use super::params::{opt_scalar_string, opt_string_list};

/// Which inventory nodes a check targets.
///
/// Precedence is strict: `node`, then `nodes` (verbatim, order kept), then a
/// conjunctive `role`/`group` filter over the inventory whose result is sorted
/// and deduplicated. With no field set every inventory node matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub node: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub nodes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub group: Option<String>,
}

impl Selector {
    pub fn node(name: impl Into<String>) -> Self {
        Self { node: Some(name.into()), ..Self::default() }
    }

    pub fn nodes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn role(role: impl Into<String>) -> Self {
        Self { role: Some(role.into()), ..Self::default() }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn resolve(&self, inventory: &Inventory) -> Vec<String> {
        if let Some(node) = &self.node {
            return vec![node.clone()];
        }
        if let Some(nodes) = &self.nodes {
            return nodes.clone();
        }

        let role = self.role.as_deref().filter(|r| !r.is_empty());
        let group = self.group.as_deref().filter(|g| !g.is_empty());

        let matched: BTreeSet<&String> = inventory
            .nodes
            .iter()
            .filter(|(_, attrs)| role.map_or(true, |r| attrs.roles.contains(r)))
            .filter(|(_, attrs)| group.map_or(true, |g| attrs.groups.contains(g)))
            .map(|(name, _)| name)
            .collect();

        matched.into_iter().cloned().collect()
    }
}
