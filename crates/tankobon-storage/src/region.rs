//! Regional endpoint discovery
//!
//! A storage zone lives in one primary region and only that region's
//! endpoint accepts the zone password. The provider answers 401 both for a
//! wrong password and for the wrong region, so callers probe every known
//! region in a fixed order.

/// Provider domain shared by every storage endpoint
pub const PROVIDER_DOMAIN: &str = "bunnycdn.com";

/// Canonical, non-regional storage host
pub const DEFAULT_STORAGE_HOST: &str = "storage.bunnycdn.com";

/// Known region codes in probe order. `""` is the default endpoint.
pub const REGION_CATALOG: [&str; 8] = ["", "ny", "la", "sg", "de", "uk", "syd", "br"];

/// Map a region code to its storage host
pub fn host_for_region(region: &str) -> String {
    let region = region.trim();
    if region.is_empty() {
        DEFAULT_STORAGE_HOST.to_string()
    } else {
        format!("{}.storage.{}", region, PROVIDER_DOMAIN)
    }
}

/// Build the ordered, duplicate-free list of hosts to try
///
/// The configured region (if any) comes first, then the whole catalog.
pub fn build_host_candidates(configured_region: &str) -> Vec<String> {
    let configured = configured_region.trim();

    let mut candidates: Vec<String> = Vec::with_capacity(REGION_CATALOG.len() + 1);
    let preferred = (!configured.is_empty()).then(|| host_for_region(configured));

    for host in preferred
        .into_iter()
        .chain(REGION_CATALOG.iter().map(|r| host_for_region(r)))
    {
        let host = host.trim();
        if host.is_empty() || candidates.iter().any(|c| c == host) {
            continue;
        }
        candidates.push(host.to_string());
    }

    candidates
}

/// Infer the region code from a host that served a request
///
/// Returns `None` for the default host.
pub fn detect_region(host: &str) -> Option<String> {
    if host == DEFAULT_STORAGE_HOST {
        return None;
    }
    host.split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}
