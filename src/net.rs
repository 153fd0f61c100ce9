//! CIDR network wrapper for the `ip4`/`ip6` mechanisms.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::SpfError;

/// An IP network in canonical CIDR form.
///
/// Construction masks host bits, so the stored address is always the network
/// base: `10.0.0.5/24` becomes `10.0.0.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpNetwork {
    addr: IpAddr,
    prefix: u8,
}

impl IpNetwork {
    /// Build a network from an address and prefix length, normalizing to the
    /// CIDR base. Rejects prefixes over 32 (v4) or 128 (v6).
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, SpfError> {
        let addr = match addr {
            IpAddr::V4(a) => {
                if prefix > 32 {
                    return Err(SpfError::InvalidValue(format!(
                        "IPv4 prefix {prefix} exceeds 32"
                    )));
                }
                IpAddr::V4(Ipv4Addr::from(u32::from(a) & mask4(prefix)))
            }
            IpAddr::V6(a) => {
                if prefix > 128 {
                    return Err(SpfError::InvalidValue(format!(
                        "IPv6 prefix {prefix} exceeds 128"
                    )));
                }
                IpAddr::V6(Ipv6Addr::from(u128::from(a) & mask6(prefix)))
            }
        };
        Ok(Self { addr, prefix })
    }

    /// Network base address (host bits cleared).
    pub fn address(&self) -> IpAddr {
        self.addr
    }

    /// CIDR prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.prefix
    }

    /// IP version, 4 or 6.
    pub fn version(&self) -> u8 {
        match self.addr {
            IpAddr::V4(_) => 4,
            IpAddr::V6(_) => 6,
        }
    }

    /// The full-host mask for this address family (32 or 128).
    fn natural_prefix(&self) -> u8 {
        match self.addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }
}

fn mask4(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        !0u32 << (32 - prefix)
    }
}

fn mask6(prefix: u8) -> u128 {
    if prefix == 0 {
        0
    } else {
        !0u128 << (128 - prefix)
    }
}

impl FromStr for IpNetwork {
    type Err = SpfError;

    /// Parse an `addr` or `addr/prefix` network literal.
    fn from_str(s: &str) -> Result<Self, SpfError> {
        let (addr_str, prefix_str) = match s.split_once('/') {
            Some((a, p)) => (a, Some(p)),
            None => (s, None),
        };
        let addr: IpAddr = addr_str
            .parse()
            .map_err(|_| SpfError::InvalidValue(format!("invalid IP address: {addr_str}")))?;
        let prefix = match prefix_str {
            Some(p) => p
                .parse::<u8>()
                .map_err(|_| SpfError::InvalidValue(format!("invalid prefix: {p}")))?,
            None => match addr {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            },
        };
        Self::new(addr, prefix)
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ip{}:{}", self.version(), self.addr)?;
        if self.prefix != self.natural_prefix() {
            write!(f, "/{}", self.prefix)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_host_bits_v4() {
        let net: IpNetwork = "10.1.2.3/24".parse().unwrap();
        assert_eq!(net.address(), IpAddr::V4(Ipv4Addr::new(10, 1, 2, 0)));
        assert_eq!(net.prefix_len(), 24);
        assert_eq!(net.to_string(), "ip4:10.1.2.0/24");
    }

    #[test]
    fn normalizes_host_bits_v6() {
        let net: IpNetwork = "2001:db8::1/32".parse().unwrap();
        assert_eq!(net.address(), IpAddr::V6("2001:db8::".parse().unwrap()));
        assert_eq!(net.to_string(), "ip6:2001:db8::/32");
    }

    #[test]
    fn natural_mask_elided() {
        let net: IpNetwork = "192.0.2.1/32".parse().unwrap();
        assert_eq!(net.to_string(), "ip4:192.0.2.1");
        let net: IpNetwork = "2001:db8::1".parse().unwrap();
        assert_eq!(net.to_string(), "ip6:2001:db8::1");
    }

    #[test]
    fn bare_address_gets_full_prefix() {
        let net: IpNetwork = "192.0.2.7".parse().unwrap();
        assert_eq!(net.prefix_len(), 32);
        assert_eq!(net.address(), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7)));
    }

    #[test]
    fn prefix_zero() {
        let net: IpNetwork = "203.0.113.9/0".parse().unwrap();
        assert_eq!(net.address(), IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(net.to_string(), "ip4:0.0.0.0/0");
    }

    #[test]
    fn rejects_out_of_range_prefix() {
        assert!("10.0.0.0/33".parse::<IpNetwork>().is_err());
        assert!("2001:db8::/129".parse::<IpNetwork>().is_err());
    }

    #[test]
    fn rejects_malformed_literal() {
        assert!("not-an-ip/24".parse::<IpNetwork>().is_err());
        assert!("10.0.0.0/abc".parse::<IpNetwork>().is_err());
    }

    #[test]
    fn version_reported() {
        let v4: IpNetwork = "10.0.0.0/8".parse().unwrap();
        let v6: IpNetwork = "::1".parse().unwrap();
        assert_eq!(v4.version(), 4);
        assert_eq!(v6.version(), 6);
    }
}
