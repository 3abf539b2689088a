//! Monitored endpoint definition.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One monitored endpoint. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    id: String,
    host: String,
    port: u16,
}

impl Target {
    pub fn new(id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port,
        }
    }

    /// Registry key for this endpoint.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Health check URL for `path` on this endpoint.
    ///
    /// IPv6 literals are bracketed.
    pub fn url(&self, path: &str) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}{}", self.host, self.port, path)
        } else {
            format!("http://{}:{}{}", self.host, self.port, path)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.id, self.host, self.port)
    }
}

/// Errors produced when parsing an `id:host:port` triple.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("expected ID:HOST:PORT, got '{0}'")]
    Shape(String),

    #[error("empty {field} in '{input}'")]
    Empty { field: &'static str, input: String },

    #[error("invalid port '{port}' in '{input}'")]
    Port { port: String, input: String },
}

/// Parse a port in 1..=65535.
pub fn parse_port(raw: &str) -> Option<u16> {
    raw.parse::<u16>().ok().filter(|p| *p != 0)
}

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [id, host, port] = parts.as_slice() else {
            return Err(TargetParseError::Shape(s.to_string()));
        };

        if id.is_empty() {
            return Err(TargetParseError::Empty { field: "id", input: s.to_string() });
        }
        if host.is_empty() {
            return Err(TargetParseError::Empty { field: "host", input: s.to_string() });
        }
        let port = parse_port(port).ok_or_else(|| TargetParseError::Port {
            port: port.to_string(),
            input: s.to_string(),
        })?;

        Ok(Target::new(*id, *host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triple() {
        let t: Target = "svc1:10.0.0.5:8000".parse().unwrap();
        assert_eq!(t.id(), "svc1");
        assert_eq!(t.host(), "10.0.0.5");
        assert_eq!(t.port(), 8000);
        assert_eq!(t.url("/health"), "http://10.0.0.5:8000/health");
        assert_eq!(t.to_string(), "svc1:10.0.0.5:8000");
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        assert_eq!(Target::new("v6", "::1", 8000).url("/health"), "http://[::1]:8000/health");
        assert_eq!(Target::new("v6", "[::1]", 8000).url("/health"), "http://[::1]:8000/health");
    }

    #[test]
    fn rejects_malformed_triples() {
        assert!(matches!("svc1:host".parse::<Target>(), Err(TargetParseError::Shape(_))));
        assert!(matches!("a:b:c:d".parse::<Target>(), Err(TargetParseError::Shape(_))));
        assert!(matches!(":host:80".parse::<Target>(), Err(TargetParseError::Empty { field: "id", .. })));
        assert!(matches!("svc::80".parse::<Target>(), Err(TargetParseError::Empty { field: "host", .. })));
        assert!(matches!("svc:host:http".parse::<Target>(), Err(TargetParseError::Port { .. })));
        assert!(matches!("svc:host:0".parse::<Target>(), Err(TargetParseError::Port { .. })));
        assert!(matches!("svc:host:70000".parse::<Target>(), Err(TargetParseError::Port { .. })));
    }
}
