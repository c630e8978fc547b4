//! Domain classification of destination URLs
//!
//! The registrable domain is approximated by the last two labels of the host,
//! which is what the navigation checks compare. IP hosts and single-label
//! hosts (`localhost`) are taken whole.

use crate::types::DomainVerdict;
use url::{Host, Url};

/// Registrable domain of a host name, lowercased.
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }
    labels[labels.len() - 2..].join(".")
}

/// Registrable domain of a URL, or `None` when it is unparseable or has no host.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    match parsed.host()? {
        Host::Domain(domain) => {
            let domain = registrable_domain(domain);
            (!domain.is_empty()).then_some(domain)
        }
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

/// Classify `url` against the application origin.
///
/// Pure: the same inputs always yield the same verdict. An absent or blank
/// `expected` fragment means no expectation, which always matches.
pub fn classify(url: &str, application_origin: &str, expected: Option<&str>) -> DomainVerdict {
    let Some(domain) = domain_of(url) else {
        return DomainVerdict::malformed();
    };
    let origin = domain_of(application_origin).unwrap_or_default();

    let matches_expected = match expected.map(str::trim) {
        None | Some("") => true,
        Some(fragment) => url.to_lowercase().contains(&fragment.to_lowercase()),
    };

    DomainVerdict {
        is_external: domain != origin,
        registrable_domain: domain,
        matches_expected,
    }
}
