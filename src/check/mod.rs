mod engine;
mod params;
mod result;
mod selector;
mod types;

pub use engine::CheckEngine;
pub use params::{
    plain_string, BgpEstablishedParams, ConfigContainsParams, EvpnRoutesParams,
    EvpnSessionsParams, IntentDistinctParams, InterfacesUpParams, NeighborAbsentParams,
    NeighborProbe, PingProbe, PingTargetsParams,
};
pub use result::{CheckResult, CheckStatus, RunSummary};
pub use selector::Selector;
pub use types::{CheckDef, CheckKind, Phase, RunMode, Severity};
