//! Host fact collection
//!
//! Builds a fresh [`SystemInfo`] snapshot per request. Collection is
//! infallible: facts the OS refuses to report degrade to empty or zero
//! values instead of failing the response.

use sysinfo::{Networks, System};

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Per-request snapshot of host metadata
#[derive(Debug, Clone)]
pub struct SystemInfo {
    /// Host name, empty when unavailable
    pub hostname: String,
    /// Non-loopback IPv4 addresses in interface enumeration order
    pub ip_addresses: Vec<String>,
    /// OS identifier, e.g. "linux"
    pub platform: String,
    /// CPU architecture, e.g. "x86_64"
    pub architecture: String,
    /// Logical CPU count
    pub cpus: usize,
    /// Total physical memory, rounded to whole gigabytes
    pub memory_gb: u64,
    /// System uptime in whole minutes
    pub uptime_minutes: u64,
    /// Toolchain version captured at build time
    pub rustc_version: String,
}

impl SystemInfo {
    /// Collect a fresh snapshot of the current host.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();

        Self {
            hostname: System::host_name().unwrap_or_default(),
            ip_addresses: ipv4_addresses(),
            platform: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            cpus: num_cpus::get(),
            memory_gb: round_to_gb(sys.total_memory()),
            uptime_minutes: System::uptime() / 60,
            rustc_version: env!("HOSTPAGE_RUSTC_VERSION").to_string(),
        }
    }

    /// IPv4 list joined with ", " for display
    pub fn ip_addresses_joined(&self) -> String {
        self.ip_addresses.join(", ")
    }
}

/// All non-loopback IPv4 addresses across all interfaces.
fn ipv4_addresses() -> Vec<String> {
    let networks = Networks::new_with_refreshed_list();
    let mut addresses = Vec::new();
    for (_name, data) in networks.iter() {
        for ip in data.ip_networks() {
            if ip.addr.is_ipv4() && !ip.addr.is_loopback() {
                addresses.push(ip.addr.to_string());
            }
        }
    }
    addresses
}

fn round_to_gb(bytes: u64) -> u64 {
    (bytes + BYTES_PER_GB / 2) / BYTES_PER_GB
}
