//! Per-evaluation query context supplying sender, domain, and client IP.

use std::net::{IpAddr, Ipv4Addr};

/// Normalize a sender identity to a full address: a bare domain (no `@`)
/// becomes `postmaster@<domain>` (RFC 7208 Section 4.3).
pub fn effective_sender(raw: &str) -> String {
    if raw.contains('@') {
        raw.to_string()
    } else {
        format!("postmaster@{raw}")
    }
}

/// The domain a record is checked against: the explicit domain when set,
/// otherwise the domain part of the (normalized) sender.
pub fn effective_domain<'a>(sender: &'a str, explicit: Option<&'a str>) -> &'a str {
    match explicit {
        Some(d) => d,
        None => sender.rsplit_once('@').map(|(_, d)| d).unwrap_or(sender),
    }
}

/// Read-only inputs for macro expansion.
///
/// Built once per evaluation by the caller and never mutated; expansion only
/// reads from it. `helo` and `ip_domain` back the `%{h}` and `%{p}` macros
/// and are optional — expanding those macros without them fails with
/// `UnsupportedMacro`.
#[derive(Debug, Clone)]
pub struct QueryContext {
    sender: String,
    domain: Option<String>,
    ip: IpAddr,
    helo: Option<String>,
    ip_domain: Option<String>,
}

impl QueryContext {
    /// Create a context for the given sender (address or bare domain).
    /// The client IP defaults to `127.0.0.1`.
    pub fn new(sender: impl AsRef<str>) -> Self {
        Self {
            sender: effective_sender(sender.as_ref()),
            domain: None,
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            helo: None,
            ip_domain: None,
        }
    }

    /// Set the checked domain explicitly instead of deriving it from the sender.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the connecting client IP.
    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = ip;
        self
    }

    /// Supply the HELO/EHLO identity, enabling the `%{h}` macro.
    pub fn with_helo(mut self, helo: impl Into<String>) -> Self {
        self.helo = Some(helo.into());
        self
    }

    /// Supply the PTR-validated domain of the client IP, enabling `%{p}`.
    pub fn with_ip_domain(mut self, domain: impl Into<String>) -> Self {
        self.ip_domain = Some(domain.into());
        self
    }

    /// Full sender address, postmaster-normalized.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Domain being checked.
    pub fn domain(&self) -> &str {
        effective_domain(&self.sender, self.domain.as_deref())
    }

    /// Connecting client IP.
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// HELO/EHLO identity, if supplied.
    pub fn helo(&self) -> Option<&str> {
        self.helo.as_deref()
    }

    /// PTR-validated client domain, if supplied.
    pub fn ip_domain(&self) -> Option<&str> {
        self.ip_domain.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_with_at_kept_verbatim() {
        assert_eq!(
            effective_sender("strong-bad@email.example.com"),
            "strong-bad@email.example.com"
        );
    }

    #[test]
    fn bare_domain_gets_postmaster() {
        assert_eq!(effective_sender("example.com"), "postmaster@example.com");
    }

    #[test]
    fn explicit_domain_wins() {
        assert_eq!(
            effective_domain("user@example.com", Some("other.example.org")),
            "other.example.org"
        );
    }

    #[test]
    fn domain_falls_back_to_sender_domain() {
        assert_eq!(effective_domain("user@example.com", None), "example.com");
    }

    #[test]
    fn context_applies_both_rules() {
        let ctx = QueryContext::new("example.net");
        assert_eq!(ctx.sender(), "postmaster@example.net");
        assert_eq!(ctx.domain(), "example.net");
    }

    #[test]
    fn context_explicit_domain() {
        let ctx = QueryContext::new("user@example.com").with_domain("email.example.com");
        assert_eq!(ctx.domain(), "email.example.com");
    }

    #[test]
    fn default_ip_is_loopback() {
        let ctx = QueryContext::new("user@example.com");
        assert_eq!(ctx.ip(), IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
    }

    #[test]
    fn extension_fields_absent_by_default() {
        let ctx = QueryContext::new("user@example.com");
        assert_eq!(ctx.helo(), None);
        assert_eq!(ctx.ip_domain(), None);
        let ctx = ctx.with_helo("mail.example.com").with_ip_domain("mx.example.com");
        assert_eq!(ctx.helo(), Some("mail.example.com"));
        assert_eq!(ctx.ip_domain(), Some("mx.example.com"));
    }
}
