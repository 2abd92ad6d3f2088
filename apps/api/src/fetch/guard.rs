//! SSRF guard for user-supplied job URLs.
//!
//! This is a literal check on the URL's host: IP literals are matched against
//! the private/loopback block-list and `localhost` is refused by name. Hostnames
//! are NOT resolved, so a public name that resolves to a private address passes.

use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use super::FetchError;

const BLOCKED_V4: &[(Ipv4Addr, u8)] = &[
    (Ipv4Addr::new(127, 0, 0, 0), 8),
    (Ipv4Addr::new(10, 0, 0, 0), 8),
    (Ipv4Addr::new(172, 16, 0, 0), 12),
    (Ipv4Addr::new(192, 168, 0, 0), 16),
];

const BLOCKED_V6: &[(Ipv6Addr, u8)] = &[
    (Ipv6Addr::LOCALHOST, 128),
    (Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 0), 7),
    (Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0), 10),
];

/// Parses a job URL and checks it against the scheme allow-list and host block-list.
/// No network I/O happens here.
pub fn validate_job_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
    }

    check_host(&url)?;
    Ok(url)
}

/// Rejects URLs whose host is a blocked IP literal or `localhost`.
pub fn check_host(url: &Url) -> Result<(), FetchError> {
    let forbidden = match url.host() {
        Some(Host::Ipv4(ip)) => is_blocked_v4(ip),
        Some(Host::Ipv6(ip)) => is_blocked_v6(ip),
        Some(Host::Domain(name)) => name.trim_end_matches('.').eq_ignore_ascii_case("localhost"),
        None => return Err(FetchError::InvalidUrl("URL has no host".to_string())),
    };

    if forbidden {
        let host = url.host_str().unwrap_or_default().to_string();
        return Err(FetchError::ForbiddenHost(host));
    }
    Ok(())
}

fn is_blocked_v4(ip: Ipv4Addr) -> bool {
    let addr = u32::from(ip);
    BLOCKED_V4.iter().any(|&(net, prefix)| {
        let mask = u32::MAX << (32 - u32::from(prefix));
        addr & mask == u32::from(net) & mask
    })
}

fn is_blocked_v6(ip: Ipv6Addr) -> bool {
    // ::ffff:a.b.c.d reaches the IPv4 host, so it gets the IPv4 rules.
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_blocked_v4(v4);
    }
    let addr = u128::from(ip);
    BLOCKED_V6.iter().any(|&(net, prefix)| {
        let mask = u128::MAX << (128 - u32::from(prefix));
        addr & mask == u128::from(net) & mask
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_list_hosts_are_forbidden() {
        for url in [
            "http://127.0.0.1/",
            "http://10.0.0.5/jobs",
            "http://172.16.0.1/",
            "http://192.168.1.1/",
            "http://[::1]/",
            "http://[fc00::1]/",
            "http://[fe80::1]/",
            "http://localhost/",
            "https://LOCALHOST:8443/x",
        ] {
            let err = validate_job_url(url).unwrap_err();
            assert!(
                matches!(err, FetchError::ForbiddenHost(_)),
                "{url} should be forbidden, got {err:?}"
            );
        }
    }

    #[test]
    fn test_range_edges() {
        assert!(is_blocked_v4(Ipv4Addr::new(172, 31, 255, 255)));
        assert!(!is_blocked_v4(Ipv4Addr::new(172, 32, 0, 0)));
        assert!(!is_blocked_v4(Ipv4Addr::new(11, 0, 0, 1)));
        assert!(!is_blocked_v4(Ipv4Addr::new(192, 169, 0, 1)));
        assert!(is_blocked_v6("fdff::1".parse().unwrap()));
        assert!(is_blocked_v6("febf::1".parse().unwrap()));
        assert!(!is_blocked_v6("fec0::1".parse().unwrap()));
        assert!(!is_blocked_v6("2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn test_ipv4_mapped_ipv6_uses_v4_rules() {
        let err = validate_job_url("http://[::ffff:127.0.0.1]/").unwrap_err();
        assert!(matches!(err, FetchError::ForbiddenHost(_)));
        assert!(validate_job_url("http://[::ffff:8.8.8.8]/").is_ok());
    }

    #[test]
    fn test_shorthand_ipv4_is_normalised_before_check() {
        // The url crate canonicalises 127.1 and 2130706433 to 127.0.0.1.
        assert!(matches!(
            validate_job_url("http://127.1/").unwrap_err(),
            FetchError::ForbiddenHost(_)
        ));
        assert!(matches!(
            validate_job_url("http://2130706433/").unwrap_err(),
            FetchError::ForbiddenHost(_)
        ));
    }

    #[test]
    fn test_public_hosts_are_allowed() {
        for url in [
            "https://example.com/careers/42",
            "http://8.8.8.8/",
            "https://jobs.localhost.example.org/",
        ] {
            assert!(validate_job_url(url).is_ok(), "{url} should be allowed");
        }
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let err = validate_job_url("ftp://example.com/job.txt").unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(s) if s == "ftp"));

        let err = validate_job_url("file:///etc/passwd").unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_scheme_is_checked_before_host() {
        let err = validate_job_url("ftp://127.0.0.1/").unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_garbage_is_invalid_url() {
        let err = validate_job_url("not a url").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
