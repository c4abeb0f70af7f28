use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use crate::error::{FabDriftError, Result};

/// Validation phase a check belongs to. `Drift` is reserved for drift runs
/// and is never accepted on a declared check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "intent")]
    Intent,
    #[serde(rename = "underlay")]
    Underlay,
    #[serde(rename = "control-plane", alias = "control_plane")]
    ControlPlane,
    #[serde(rename = "dataplane")]
    Dataplane,
    #[serde(rename = "drift")]
    Drift,
}

impl Phase {
    pub const VALIDATION: [Phase; 4] = [
        Phase::Intent,
        Phase::Underlay,
        Phase::ControlPlane,
        Phase::Dataplane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Intent => "intent",
            Phase::Underlay => "underlay",
            Phase::ControlPlane => "control-plane",
            Phase::Dataplane => "dataplane",
            Phase::Drift => "drift",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Phase {
    type Err = FabDriftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "intent" => Ok(Phase::Intent),
            "underlay" => Ok(Phase::Underlay),
            "control-plane" | "control_plane" => Ok(Phase::ControlPlane),
            "dataplane" => Ok(Phase::Dataplane),
            "drift" => Ok(Phase::Drift),
            other => Err(FabDriftError::IntentValidation(format!("unknown phase: {}", other))),
        }
    }
}

/// Which phases a validation run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    All,
    Only(Phase),
}

impl RunMode {
    pub fn includes(&self, phase: Phase) -> bool {
        match self {
            RunMode::All => Phase::VALIDATION.contains(&phase),
            RunMode::Only(selected) => *selected == phase,
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::All => write!(f, "all"),
            RunMode::Only(phase) => write!(f, "{}", phase),
        }
    }
}

impl FromStr for RunMode {
    type Err = FabDriftError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "all" {
            return Ok(RunMode::All);
        }
        match s.parse::<Phase>() {
            Ok(Phase::Drift) | Err(_) => Err(FabDriftError::InvalidMode(s.to_string())),
            Ok(phase) => Ok(RunMode::Only(phase)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Error,
    Warn,
    Info,
}

impl Severity {
    /// Anything that is not WARN or INFO (case-insensitive) is treated as ERROR.
    pub fn parse_lenient(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "WARN" => Severity::Warn,
            "INFO" => Severity::Info,
            _ => Severity::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of check kinds the engine knows how to interpret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CheckKind {
    ConfigContains,
    InterfacesUp,
    BgpEstablished,
    EvpnRoutesPresent,
    EvpnSessionsUp,
    PingTargets,
    L2NeighborAbsent,
    IntentDistinct,
    Unsupported(String),
}

impl CheckKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "config_contains" => CheckKind::ConfigContains,
            "interfaces_up" => CheckKind::InterfacesUp,
            "bgp_established" => CheckKind::BgpEstablished,
            "evpn_routes_present" => CheckKind::EvpnRoutesPresent,
            "evpn_sessions_up" => CheckKind::EvpnSessionsUp,
            "ping_targets" => CheckKind::PingTargets,
            "l2_neighbor_absent" => CheckKind::L2NeighborAbsent,
            "intent_distinct" => CheckKind::IntentDistinct,
            other => CheckKind::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CheckKind::ConfigContains => "config_contains",
            CheckKind::InterfacesUp => "interfaces_up",
            CheckKind::BgpEstablished => "bgp_established",
            CheckKind::EvpnRoutesPresent => "evpn_routes_present",
            CheckKind::EvpnSessionsUp => "evpn_sessions_up",
            CheckKind::PingTargets => "ping_targets",
            CheckKind::L2NeighborAbsent => "l2_neighbor_absent",
            CheckKind::IntentDistinct => "intent_distinct",
            CheckKind::Unsupported(kind) => kind,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, CheckKind::Unsupported(_))
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared check, as loaded from the intent document.
#[derive(Debug, Clone)]
pub struct CheckDef {
    pub name: String,
    pub phase: Phase,
    pub kind: CheckKind,
    pub severity: Severity,
    pub params: Map<String, Value>,
}

impl CheckDef {
    pub fn new(name: impl Into<String>, phase: Phase, kind: &str) -> Self {
        Self {
            name: name.into(),
            phase,
            kind: CheckKind::parse(kind),
            severity: Severity::Error,
            params: Map::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        if let Value::Object(map) = params {
            self.params = map;
        }
        self
    }

    /// Deserialize the semi-structured params into the typed shape a handler expects.
    pub fn typed_params<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.params.clone()))?)
    }
}
