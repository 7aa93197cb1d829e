use std::time::Duration;

/// Default candidate last octets for the subnet probe
const DEFAULT_PROBE_HOSTS: [u8; 8] = [100, 101, 102, 200, 201, 202, 150, 151];

/// Agent configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    /// Tried once when the primary port is already bound
    pub fallback_port: u16,
    /// How long a discovery snapshot stays fresh
    pub cache_ttl: Duration,
    /// Per-candidate timeout for the subnet probe
    pub probe_timeout: Duration,
    /// Candidate last octets probed inside the host's /24
    pub probe_hosts: Vec<u8>,
    /// Timeout for the OS printer listing command
    pub listing_timeout: Duration,
    /// Upper bound for one dispatch including adapter I/O
    pub dispatch_timeout: Duration,
    /// Paper width in characters (32 for 58mm, 48 for 80mm)
    pub paper_width: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(3001),
            fallback_port: env_parse("FALLBACK_PORT").unwrap_or(3002),
            cache_ttl: Duration::from_secs(env_parse("CACHE_TTL_SECS").unwrap_or(30)),
            probe_timeout: Duration::from_millis(env_parse("PROBE_TIMEOUT_MS").unwrap_or(1000)),
            probe_hosts: std::env::var("PROBE_HOSTS")
                .ok()
                .map(|v| parse_probe_hosts(&v))
                .filter(|hosts| !hosts.is_empty())
                .unwrap_or_else(|| DEFAULT_PROBE_HOSTS.to_vec()),
            listing_timeout: Duration::from_secs(env_parse("LISTING_TIMEOUT_SECS").unwrap_or(10)),
            dispatch_timeout: Duration::from_secs(env_parse("DISPATCH_TIMEOUT_SECS").unwrap_or(15)),
            paper_width: env_parse("PAPER_WIDTH").unwrap_or(32),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse a comma-separated last-octet list ("100,101,200")
fn parse_probe_hosts(value: &str) -> Vec<u8> {
    value
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}
