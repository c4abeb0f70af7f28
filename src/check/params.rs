use serde::{Deserialize, Deserializer};
use serde_json::Value;
use super::selector::Selector;

/// Plain rendering of a scalar: strings lose their quotes, everything else
/// uses its JSON form.
pub fn plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.iter().map(plain_string).collect())
}

pub(crate) fn opt_string_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values.map(|v| v.iter().map(plain_string).collect()))
}

pub(crate) fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(plain_string(&value))
}

/// Integers written either as numbers or as numeric strings.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {}", value)))
}

pub(crate) fn opt_scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()).map(|v| plain_string(&v)))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigContainsParams {
    #[serde(default)]
    pub selector: Selector,
    #[serde(default, deserialize_with = "string_list")]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfacesUpParams {
    #[serde(default)]
    pub selector: Selector,
    #[serde(default, deserialize_with = "string_list")]
    pub required_interfaces: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub required_interface_regex: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub required_description_regex: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub ignore_interfaces: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub ignore_interface_regex: Vec<String>,
}

impl InterfacesUpParams {
    pub fn has_required_rule(&self) -> bool {
        !self.required_interfaces.is_empty()
            || !self.required_interface_regex.is_empty()
            || !self.required_description_regex.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BgpEstablishedParams {
    #[serde(default)]
    pub selector: Selector,
    #[serde(default = "default_min_total", deserialize_with = "lenient_i64")]
    pub min_total: i64,
    #[serde(default = "default_require_all")]
    pub require_all: bool,
}

impl BgpEstablishedParams {
    pub fn is_satisfied(&self, total: i64, established: i64) -> bool {
        let sessions_ok = if self.require_all {
            established == total
        } else {
            established >= self.min_total
        };
        total >= self.min_total && sessions_ok
    }
}

fn default_min_total() -> i64 {
    1
}

fn default_require_all() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvpnRoutesParams {
    #[serde(default)]
    pub selector: Selector,
    #[serde(default = "default_route_patterns", deserialize_with = "string_list")]
    pub patterns: Vec<String>,
    #[serde(default = "default_require", deserialize_with = "scalar_string")]
    pub require: String,
}

impl EvpnRoutesParams {
    pub fn matches(&self, output: &str) -> bool {
        if self.require == "all" {
            self.patterns.iter().all(|p| output.contains(p.as_str()))
        } else {
            self.patterns.iter().any(|p| output.contains(p.as_str()))
        }
    }
}

fn default_route_patterns() -> Vec<String> {
    vec!["mac-ip".to_string(), "ip-prefix".to_string()]
}

fn default_require() -> String {
    "any".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvpnSessionsParams {
    #[serde(default)]
    pub selector: Selector,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PingTargetsParams {
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub interface: Option<String>,
    #[serde(default)]
    pub probes: Vec<PingProbe>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PingProbe {
    #[serde(deserialize_with = "scalar_string")]
    pub source: String,
    #[serde(default, deserialize_with = "string_list")]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeighborAbsentParams {
    #[serde(default)]
    pub probes: Vec<NeighborProbe>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NeighborProbe {
    #[serde(deserialize_with = "scalar_string")]
    pub source: String,
    #[serde(deserialize_with = "scalar_string")]
    pub target_ip: String,
    #[serde(deserialize_with = "scalar_string")]
    pub interface: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentDistinctParams {
    #[serde(default, deserialize_with = "string_list")]
    pub paths: Vec<String>,
}
