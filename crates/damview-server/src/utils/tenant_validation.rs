//! Tenant host validation for the reverse proxy
//!
//! The proxy target comes straight from a query parameter, so it is checked
//! before any upstream connection is made:
//! - it must be a bare `host` or `host:port` (no path, userinfo or scheme);
//! - it must match the configured allowlist, when there is one;
//! - unless private upstreams are allowed, it must not name or resolve to a
//!   private, loopback or internal address.

use damview_core::AppError;
use std::net::{IpAddr, Ipv6Addr};
use tokio::net::lookup_host;

/// A validated proxy target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantHost {
    pub host: String,
    pub port: Option<u16>,
}

impl TenantHost {
    /// `host[:port]` as it goes into the upstream URL.
    pub fn authority(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        match self.port {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        }
    }
}

/// Split and syntax-check a tenant value.
pub fn parse_tenant(tenant: &str) -> Result<TenantHost, AppError> {
    let tenant = tenant.trim();
    if tenant.is_empty() {
        return Err(AppError::InvalidTenant(
            "Missing tenant query parameter".to_string(),
        ));
    }

    let malformed = || AppError::InvalidTenant(format!("Malformed tenant: {}", tenant));

    let parse_port = |p: Option<&str>| -> Result<Option<u16>, AppError> {
        p.map(|p| p.parse::<u16>().map_err(|_| malformed()))
            .transpose()
    };

    if let Some(rest) = tenant.strip_prefix('[') {
        // [v6] or [v6]:port
        let (host, after) = rest.split_once(']').ok_or_else(malformed)?;
        let port = match after {
            "" => None,
            p => Some(p.strip_prefix(':').ok_or_else(malformed)?),
        };
        let ip = host.parse::<Ipv6Addr>().map_err(|_| malformed())?;
        return Ok(TenantHost {
            host: ip.to_string(),
            port: parse_port(port)?,
        });
    }

    let (host, port) = match tenant.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (tenant, None),
    };
    let port = parse_port(port)?;

    let valid_host = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !host.starts_with('.')
        && !host.starts_with('-');
    if !valid_host {
        return Err(malformed());
    }

    Ok(TenantHost {
        host: host.to_lowercase(),
        port,
    })
}

/// Full validation of a tenant before it is used as a proxy target.
pub async fn validate_tenant(
    tenant: &str,
    allow_private: bool,
    allowlist: Option<&[String]>,
) -> Result<TenantHost, AppError> {
    let target = parse_tenant(tenant)?;
    let host = target.host.as_str();

    if let Some(allowed_domains) = allowlist {
        let is_allowed = allowed_domains.iter().any(|allowed| {
            let allowed = allowed.to_lowercase();
            // Exact match or subdomain match
            host == allowed || host.ends_with(&format!(".{}", allowed))
        });
        if !is_allowed {
            return Err(AppError::InvalidTenant(format!(
                "Tenant '{}' is not in the allowed list",
                host
            )));
        }
    }

    if allow_private {
        return Ok(target);
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(AppError::InvalidTenant(
                "Private/internal tenant addresses are not allowed".to_string(),
            ));
        }
        return Ok(target);
    }

    if host == "localhost"
        || host.ends_with(".localhost")
        || host.ends_with(".local")
        || host.contains(".internal")
        || host.contains(".corp")
    {
        return Err(AppError::InvalidTenant(
            "Localhost and internal tenant hostnames are not allowed".to_string(),
        ));
    }

    // Resolved addresses are checked too, so a public name cannot point inside
    let port = target.port.unwrap_or(443);
    match lookup_host((host, port)).await {
        Ok(addrs) => {
            for addr in addrs {
                if is_private_ip(&addr.ip()) {
                    return Err(AppError::InvalidTenant(format!(
                        "Tenant resolves to a private/internal address: {}",
                        addr.ip()
                    )));
                }
            }
        }
        Err(e) => {
            // The upstream request will fail with a 502 instead
            tracing::warn!(tenant = %host, error = %e, "Failed to resolve tenant host");
        }
    }

    Ok(target)
}

/// Private, loopback, link-local, multicast and reserved ranges.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            octets[0] == 10
                || (octets[0] == 172 && (16..=31).contains(&octets[1]))
                || (octets[0] == 192 && octets[1] == 168)
                || octets[0] == 127
                || (octets[0] == 169 && octets[1] == 254)
                || (224..=239).contains(&octets[0])
                || octets[0] == 0
        }
        IpAddr::V6(ipv6) => {
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                || ipv6.is_multicast()
                || ipv6.segments()[0] & 0xffc0 == 0xfe80 // fe80::/10
                || ipv6.segments()[0] & 0xfe00 == 0xfc00 // fc00::/7
                || ipv6.to_ipv4_mapped().is_some_and(|v4| is_private_ip(&IpAddr::V4(v4)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn parses_host_and_port() {
        assert_eq!(
            parse_tenant("Acme.Example.com").unwrap(),
            TenantHost {
                host: "acme.example.com".into(),
                port: None
            }
        );
        let t = parse_tenant("127.0.0.1:8080").unwrap();
        assert_eq!(t.port, Some(8080));
        assert_eq!(t.authority(), "127.0.0.1:8080");

        let v6 = parse_tenant("[::1]:9000").unwrap();
        assert_eq!(v6.host, "::1");
        assert_eq!(v6.authority(), "[::1]:9000");
    }

    #[test]
    fn rejects_malformed_tenants() {
        for bad in [
            "",
            "   ",
            "evil.com/path",
            "user@evil.com",
            "https://evil.com",
            "evil.com:port",
            "evil.com?x=1",
            ".evil.com",
            "[::1",
            "::1",
        ] {
            assert!(
                matches!(parse_tenant(bad), Err(AppError::InvalidTenant(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[tokio::test]
    async fn rejects_private_and_internal_hosts() {
        for bad in ["127.0.0.1", "10.0.0.1", "192.168.1.1", "localhost", "db.internal", "[::1]"] {
            assert!(validate_tenant(bad, false, None).await.is_err(), "accepted {}", bad);
        }
    }

    #[tokio::test]
    async fn private_hosts_allowed_when_configured() {
        assert!(validate_tenant("127.0.0.1:3000", true, None).await.is_ok());
    }

    #[tokio::test]
    async fn allowlist_matches_domain_and_subdomains() {
        let allowlist = vec!["example.com".to_string()];
        assert!(validate_tenant("example.com", true, Some(&allowlist))
            .await
            .is_ok());
        assert!(validate_tenant("acme.example.com", true, Some(&allowlist))
            .await
            .is_ok());
        assert!(validate_tenant("evil.com", true, Some(&allowlist))
            .await
            .is_err());
        assert!(validate_tenant("notexample.com", true, Some(&allowlist))
            .await
            .is_err());
    }

    #[test]
    fn private_ip_ranges() {
        assert!(is_private_ip(&IpAddr::V4(Ipv4Addr::new(172, 16, 0, 1))));
        assert!(is_private_ip(&IpAddr::V4(Ipv4Addr::new(169, 254, 1, 1))));
        assert!(!is_private_ip(&IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))));
        assert!(is_private_ip(&"::ffff:127.0.0.1".parse().unwrap()));
        assert!(!is_private_ip(&"2606:4700::1111".parse().unwrap()));
    }
}
