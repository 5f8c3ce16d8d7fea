use pingdeck_model::ProbeTarget;
use std::net::{IpAddr, ToSocketAddrs};

/// Hostname-to-address resolution, performed once per host at startup.
pub trait Resolver {
    fn resolve(&self, name: &str) -> Option<IpAddr>;
}

/// Resolver backed by the system's name service.
#[derive(Debug, Default, Clone)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn resolve(&self, name: &str) -> Option<IpAddr> {
        if let Ok(addr) = name.parse::<IpAddr>() {
            return Some(addr);
        }
        let addrs = (name, 0u16).to_socket_addrs().ok()?;
        addrs.into_iter().next().map(|addr| addr.ip())
    }
}

/// Resolve a host once, keeping failures as an unresolved sentinel target
/// so the host still occupies a display row.
pub fn resolve_target(resolver: &dyn Resolver, name: &str) -> ProbeTarget {
    match resolver.resolve(name) {
        Some(addr) => ProbeTarget::Resolved(addr),
        None => {
            tracing::warn!(host = name, "resolution failed, host kept as unreachable");
            ProbeTarget::Unresolved
        }
    }
}
