use serde::{Deserialize, Serialize};

use cipherlot_types::Timestamp;

/// HTTP endpoint paths served by a Cipherlot node.
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const HEALTHZ: &str = "/healthz";
    pub const STATUS: &str = "/status";
    pub const BLOBS: &str = "/blobs";
    pub const MANIFESTS: &str = "/manifests";
    pub const FEEDS: &str = "/feeds";

    /// Route templates advertised by `/status`, in display order.
    pub const ADVERTISED: &[&str] = &[
        HEALTH,
        HEALTHZ,
        STATUS,
        "/blobs/{cid}",
        "/manifests/{cid}",
        "/feeds/{author}",
    ];
}

/// Liveness response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Server wall clock, unix seconds.
    pub time: i64,
}

impl HealthResponse {
    pub fn ok(now: Timestamp) -> Self {
        Self {
            status: "ok".into(),
            time: now.as_secs(),
        }
    }
}

/// Object counts reported by `/status`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCounts {
    pub blobs: usize,
    pub manifests: usize,
    pub feeds: usize,
}

/// Introspection response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    /// Host the node runs on; empty if it cannot be determined.
    pub hostname: String,
    /// Human-readable uptime, e.g. `1h2m3s`.
    pub uptime: String,
    pub uptime_secs: u64,
    pub data_root: String,
    pub storage: StorageCounts,
    pub endpoints: Vec<String>,
}

impl StatusResponse {
    pub fn new(
        hostname: impl Into<String>,
        uptime_secs: u64,
        data_root: impl Into<String>,
        storage: StorageCounts,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").into(),
            hostname: hostname.into(),
            uptime: format_uptime(uptime_secs),
            uptime_secs,
            data_root: data_root.into(),
            storage,
            endpoints: endpoints::ADVERTISED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Render whole seconds as `XhYmZs`, omitting leading zero units.
pub fn format_uptime(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m{s}s"),
        _ => format!("{h}h{m}m{s}s"),
    }
}
