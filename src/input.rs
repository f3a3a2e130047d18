use crate::error::ConnectionError;
use crate::model::{Target, TargetSpec};
use std::net::SocketAddr;
use tokio::net::lookup_host;

/// IPv4 is preferred when the host has both families.
pub async fn resolve(spec: &TargetSpec) -> Result<Target, ConnectionError> {
    let addrs: Vec<SocketAddr> = lookup_host((spec.host.as_str(), spec.port))
        .await
        .map_err(|source| ConnectionError::Resolve {
            host: spec.host.clone(),
            source,
        })?
        .collect();

    let resolved = addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| ConnectionError::NoAddress(spec.host.clone()))?;

    tracing::debug!(host = %spec.host, addr = %resolved, candidates = addrs.len(), "resolved target");
    Ok(Target {
        original: spec.clone(),
        resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_literal_address() {
        let spec = TargetSpec {
            host: "127.0.0.1".into(),
            port: 8443,
        };
        let target = resolve(&spec).await.unwrap();
        assert_eq!(target.resolved, "127.0.0.1:8443".parse().unwrap());
        assert_eq!(target.original.host, "127.0.0.1");
    }

    #[tokio::test]
    async fn unknown_host_is_a_resolve_error() {
        let spec = TargetSpec {
            host: "no-such-host.invalid".into(),
            port: 443,
        };
        let err = resolve(&spec).await.unwrap_err();
        assert_eq!(err.stage(), "resolve");
    }
}
