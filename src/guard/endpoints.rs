//! Well-known sidecar control endpoints
//!
//! Readiness candidates are probed in table order. The primary entry is the
//! current proxy convention; the legacy entries cover older sidecar versions
//! and are only probed when legacy fallback is enabled.

/// Default readiness path used with an explicit ready port
pub const DEFAULT_READY_ENDPOINT: &str = "/ready";

/// Default quit path used with an explicit quit port
pub const DEFAULT_QUIT_ENDPOINT: &str = "/quitquitquit";

/// Quit address used when no quit port override is configured
pub const DEFAULT_QUIT_ADDR: &str = "http://localhost:15000/quitquitquit";

/// A named readiness endpoint from the built-in table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub name: &'static str,
    pub addr: &'static str,
    pub legacy: bool,
}

/// Built-in readiness candidates in priority order
pub const CANDIDATES: &[Candidate] = &[
    Candidate {
        name: "primary",
        addr: "http://localhost:15020/ready",
        legacy: false,
    },
    Candidate {
        name: "legacy-1",
        addr: "http://localhost:15021/healthz/ready",
        legacy: true,
    },
    Candidate {
        name: "legacy-2",
        addr: "http://localhost:15000/ready",
        legacy: true,
    },
];

/// Build a local control address from a port and a path
pub fn local_addr(port: u16, endpoint: &str) -> String {
    format!("http://localhost:{}{}", port, endpoint)
}

/// Addresses to probe on each round when no explicit ready address is set
pub fn candidate_addrs(legacy_fallback: bool) -> Vec<String> {
    CANDIDATES
        .iter()
        .filter(|c| legacy_fallback || !c.legacy)
        .map(|c| c.addr.to_string())
        .collect()
}
