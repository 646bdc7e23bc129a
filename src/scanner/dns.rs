//! DNS resolution stage (spec §4.4 item 1): NS first, then A/AAAA/MX on
//! success, each with the `!ServFail` sentinel; falls back to the OS
//! resolver (A/AAAA only) when no external resolver is configured.

use std::net::SocketAddr;
use std::time::Duration;

use hickory_resolver::config::{
    NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use log::debug;

use crate::model::Permutation;

const SERVFAIL: &str = "!ServFail";
const DNS_TIMEOUT: Duration = Duration::from_millis(2500);
const DNS_RETRIES: usize = 2;

pub struct DnsResolver {
    resolver: TokioAsyncResolver,
    external: bool,
}

impl DnsResolver {
    /// Build a resolver from `nameservers` (host, host:port, or DoH
    /// `https://host/dns-query`); empty falls back to the OS resolver.
    pub fn new(nameservers: &[String]) -> crate::error::Result<Self> {
        let mut opts = ResolverOpts::default();
        opts.timeout = DNS_TIMEOUT;
        opts.attempts = DNS_RETRIES;
        // EDNS payload per spec §4.4 item 1.
        opts.edns0 = true;

        if nameservers.is_empty() {
            let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);
            return Ok(DnsResolver {
                resolver,
                external: false,
            });
        }

        let mut group = NameServerConfigGroup::new();
        for ns in nameservers {
            if let Some(host) = ns.strip_prefix("https://").and_then(|s| s.strip_suffix("/dns-query")) {
                group.push(NameServerConfig {
                    socket_addr: resolve_doh_placeholder(host)?,
                    protocol: Protocol::Https,
                    tls_dns_name: Some(host.to_string()),
                    trust_negative_responses: false,
                    bind_addr: None,
                });
                continue;
            }
            let addr: SocketAddr = parse_nameserver(ns)?;
            group.push(NameServerConfig {
                socket_addr: addr,
                protocol: Protocol::Udp,
                tls_dns_name: None,
                trust_negative_responses: false,
                bind_addr: None,
            });
        }
        // Rotation among configured servers, spec §4.4 item 1 / §5.
        opts.shuffle_dns_servers = true;

        let config = ResolverConfig::from_parts(None, vec![], group);
        let resolver = TokioAsyncResolver::tokio(config, opts);
        Ok(DnsResolver {
            resolver,
            external: true,
        })
    }

    /// Run the DNS stage for one permutation, mutating its `dns_*` fields
    /// in place. Never returns an `Error`: per spec §7, per-job DNS failures
    /// become the absence (or sentinel) of an annotation.
    pub async fn resolve(&self, p: &mut Permutation) {
        if !self.external {
            if let Ok(lookup) = self.resolver.lookup_ip(p.domain.as_str()).await {
                let mut a = Vec::new();
                let mut aaaa = Vec::new();
                for ip in lookup.iter() {
                    match ip {
                        std::net::IpAddr::V4(v4) => a.push(v4.to_string()),
                        std::net::IpAddr::V6(v6) => aaaa.push(v6.to_string()),
                    }
                }
                if !a.is_empty() {
                    a.sort();
                    p.dns_a = Some(a);
                }
                if !aaaa.is_empty() {
                    aaaa.sort();
                    p.dns_aaaa = Some(aaaa);
                }
            }
            return;
        }

        let ns_result = self.resolver.ns_lookup(p.domain.as_str()).await;
        match ns_result {
            Ok(lookup) => {
                let mut ns: Vec<String> = lookup.iter().map(|r| r.to_string().trim_end_matches('.').to_string()).collect();
                ns.sort();
                p.dns_ns = Some(ns);
            }
            Err(e) => {
                if is_servfail(&e) {
                    p.dns_ns = Some(vec![SERVFAIL.to_string()]);
                } else {
                    debug!("{}: NS lookup failed, not pursuing A/AAAA/MX: {}", p.domain, e);
                    return;
                }
            }
        }

        if matches!(p.dns_ns.as_deref(), Some([only]) if only == SERVFAIL) {
            return;
        }

        self.query_a(p).await;
        self.query_aaaa(p).await;
        self.query_mx(p).await;
    }

    async fn query_a(&self, p: &mut Permutation) {
        match self.resolver.ipv4_lookup(p.domain.as_str()).await {
            Ok(lookup) => {
                let mut v: Vec<String> = lookup.iter().map(|r| r.to_string()).collect();
                v.sort();
                p.dns_a = Some(v);
            }
            Err(e) if is_servfail(&e) => p.dns_a = Some(vec![SERVFAIL.to_string()]),
            Err(_) => {}
        }
    }

    async fn query_aaaa(&self, p: &mut Permutation) {
        match self.resolver.ipv6_lookup(p.domain.as_str()).await {
            Ok(lookup) => {
                let mut v: Vec<String> = lookup.iter().map(|r| r.to_string()).collect();
                v.sort();
                p.dns_aaaa = Some(v);
            }
            Err(e) if is_servfail(&e) => p.dns_aaaa = Some(vec![SERVFAIL.to_string()]),
            Err(_) => {}
        }
    }

    async fn query_mx(&self, p: &mut Permutation) {
        match self.resolver.mx_lookup(p.domain.as_str()).await {
            Ok(lookup) => {
                let mut v: Vec<String> = lookup
                    .iter()
                    .map(|r| r.exchange().to_string().trim_end_matches('.').to_string())
                    .collect();
                v.sort();
                p.dns_mx = Some(v);
            }
            Err(e) if is_servfail(&e) => p.dns_mx = Some(vec![SERVFAIL.to_string()]),
            Err(_) => {}
        }
    }
}

fn is_servfail(err: &hickory_resolver::error::ResolveError) -> bool {
    matches!(
        err.kind(),
        ResolveErrorKind::NoRecordsFound {
            response_code: hickory_resolver::proto::op::ResponseCode::ServFail,
            ..
        }
    )
}

fn parse_nameserver(ns: &str) -> crate::error::Result<SocketAddr> {
    let with_port = if ns.contains(':') { ns.to_string() } else { format!("{}:53", ns) };
    with_port
        .parse()
        .map_err(|_| crate::error::Error::TransientNetworkError(format!("invalid nameserver '{}'", ns)))
}

/// DoH endpoints are addressed by hostname, not IP; hickory-resolver's
/// `NameServerConfig` still wants a `SocketAddr` even for HTTPS transport,
/// so this resolves the well-known port (443) against a placeholder that
/// the TLS SNI (`tls_dns_name`) then overrides for the actual handshake.
fn resolve_doh_placeholder(host: &str) -> crate::error::Result<SocketAddr> {
    use std::net::ToSocketAddrs;
    format!("{}:443", host)
        .to_socket_addrs()
        .map_err(|e| crate::error::Error::TransientNetworkError(format!("cannot resolve DoH host '{}': {}", host, e)))?
        .next()
        .ok_or_else(|| crate::error::Error::TransientNetworkError(format!("no address for DoH host '{}'", host)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nameserver_defaults_to_port_53() {
        let addr = parse_nameserver("8.8.8.8").unwrap();
        assert_eq!(addr.port(), 53);
    }

    #[test]
    fn parse_nameserver_honors_explicit_port() {
        let addr = parse_nameserver("8.8.8.8:5353").unwrap();
        assert_eq!(addr.port(), 5353);
    }

    #[tokio::test]
    async fn os_resolver_is_used_when_no_nameservers_given() {
        let resolver = DnsResolver::new(&[]).unwrap();
        assert!(!resolver.external);
    }
}
