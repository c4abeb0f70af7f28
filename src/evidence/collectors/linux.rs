use serde::{Deserialize, Serialize};
use crate::adapter::{Adapter, CmdResult};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInterfaces {
    pub rc: i32,
    pub interfaces: Vec<String>,
    pub err: String,
}

impl HostInterfaces {
    pub fn has(&self, name: &str) -> bool {
        self.interfaces.iter().any(|i| i == name)
    }
}

pub fn ping_command(target: &str, interface: Option<&str>) -> String {
    match interface {
        Some(iface) if !iface.is_empty() => format!("ping -I {} -c 2 -W 1 {}", iface, target),
        _ => format!("ping -c 2 -W 1 {}", target),
    }
}

pub async fn ping(
    adapter: &dyn Adapter,
    host: &str,
    target: &str,
    interface: Option<&str>,
) -> Result<CmdResult> {
    adapter.exec(host, &ping_command(target, interface)).await
}

pub async fn neigh_show(adapter: &dyn Adapter, host: &str, interface: &str) -> Result<CmdResult> {
    adapter
        .exec(host, &format!("ip neigh show dev {}", interface))
        .await
}

pub async fn interfaces_present(adapter: &dyn Adapter, host: &str) -> Result<HostInterfaces> {
    let r = adapter
        .exec(host, "ip -o link show | awk -F': ' '{print $2}'")
        .await?;
    let interfaces = r
        .stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.split('@').next().unwrap_or(l).to_string())
        .collect();
    Ok(HostInterfaces {
        rc: r.rc,
        interfaces,
        err: r.stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockAdapter;

    #[test]
    fn test_ping_command() {
        assert_eq!(ping_command("10.10.0.2", None), "ping -c 2 -W 1 10.10.0.2");
        assert_eq!(ping_command("10.10.0.2", Some("")), "ping -c 2 -W 1 10.10.0.2");
        assert_eq!(
            ping_command("10.10.0.2", Some("eth1")),
            "ping -I eth1 -c 2 -W 1 10.10.0.2"
        );
    }

    #[tokio::test]
    async fn test_interfaces_present_strips_peer_suffix() {
        let adapter = MockAdapter::new("/tmp/lab").with_exec(
            "host1",
            "ip -o link show | awk -F': ' '{print $2}'",
            CmdResult::ok("lo\neth0@if12\n\neth1@if40\n"),
        );
        let found = interfaces_present(&adapter, "host1").await.unwrap();
        assert_eq!(found.interfaces, vec!["lo", "eth0", "eth1"]);
        assert!(found.has("eth1"));
        assert!(!found.has("bond0"));
    }
}
