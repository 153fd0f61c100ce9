//! SPF macro model and expansion (RFC 7208 Section 7).

use std::fmt;
use std::net::IpAddr;

use crate::query::QueryContext;
use crate::SpfError;

/// Macro letter, one per expandable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    /// `s` — full sender address.
    Sender,
    /// `l` — local part of the sender.
    SenderLocalPart,
    /// `o` — domain part of the sender.
    SenderDomain,
    /// `d` — domain being checked.
    Domain,
    /// `i` — client IP (dotted v4, dot-separated nibbles for v6).
    Ip,
    /// `p` — PTR-validated domain of the client IP.
    IpDomain,
    /// `v` — `in-addr` for v4, `ip6` for v6.
    IpVersion,
    /// `h` — HELO/EHLO identity.
    Helo,
}

impl MacroKind {
    pub fn as_char(self) -> char {
        match self {
            MacroKind::Sender => 's',
            MacroKind::SenderLocalPart => 'l',
            MacroKind::SenderDomain => 'o',
            MacroKind::Domain => 'd',
            MacroKind::Ip => 'i',
            MacroKind::IpDomain => 'p',
            MacroKind::IpVersion => 'v',
            MacroKind::Helo => 'h',
        }
    }

    pub fn from_char(c: char) -> Result<Self, SpfError> {
        match c {
            's' => Ok(MacroKind::Sender),
            'l' => Ok(MacroKind::SenderLocalPart),
            'o' => Ok(MacroKind::SenderDomain),
            'd' => Ok(MacroKind::Domain),
            'i' => Ok(MacroKind::Ip),
            'p' => Ok(MacroKind::IpDomain),
            'v' => Ok(MacroKind::IpVersion),
            'h' => Ok(MacroKind::Helo),
            _ => Err(SpfError::InvalidValue(format!("unknown macro letter: {c}"))),
        }
    }
}

/// One `%{...}` placeholder inside a domain-spec.
///
/// Transformers apply in fixed order during expansion: split on the delimiter
/// characters, reverse if requested, keep the last `length` labels, rejoin
/// with `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    kind: MacroKind,
    length: Option<usize>,
    reverse: bool,
    delimiter: String,
}

impl Macro {
    /// A plain macro with no transformers and the default `.` delimiter.
    pub fn new(kind: MacroKind) -> Self {
        Self {
            kind,
            length: None,
            reverse: false,
            delimiter: ".".to_string(),
        }
    }

    /// Keep only the last `length` labels after splitting. Zero is rejected.
    pub fn with_length(mut self, length: usize) -> Result<Self, SpfError> {
        if length == 0 {
            return Err(SpfError::InvalidMacro("label count must be positive".into()));
        }
        self.length = Some(length);
        Ok(self)
    }

    /// Reverse label order before truncation.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Split on any of the given characters instead of `.` alone.
    /// An empty set falls back to the default.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        self.delimiter = if delimiter.is_empty() {
            ".".to_string()
        } else {
            delimiter
        };
        self
    }

    pub fn kind(&self) -> MacroKind {
        self.kind
    }

    pub fn length(&self) -> Option<usize> {
        self.length
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Expand this macro against a query context.
    pub fn expand(&self, query: &QueryContext) -> Result<String, SpfError> {
        let raw = match self.kind {
            MacroKind::Sender => query.sender().to_string(),
            MacroKind::SenderLocalPart => query
                .sender()
                .rsplit_once('@')
                .map(|(local, _)| local)
                .unwrap_or(query.sender())
                .to_string(),
            MacroKind::SenderDomain => query
                .sender()
                .rsplit_once('@')
                .map(|(_, domain)| domain)
                .unwrap_or(query.sender())
                .to_string(),
            MacroKind::Domain => query.domain().to_string(),
            MacroKind::Ip => format_ip(query.ip()),
            MacroKind::IpVersion => match query.ip() {
                IpAddr::V4(_) => "in-addr".to_string(),
                IpAddr::V6(_) => "ip6".to_string(),
            },
            MacroKind::IpDomain => query
                .ip_domain()
                .ok_or(SpfError::UnsupportedMacro('p'))?
                .to_string(),
            MacroKind::Helo => query
                .helo()
                .ok_or(SpfError::UnsupportedMacro('h'))?
                .to_string(),
        };

        // Each delimiter character is a literal split point, never a pattern.
        let delims: Vec<char> = self.delimiter.chars().collect();
        let mut labels: Vec<&str> = raw.split(|c: char| delims.contains(&c)).collect();
        if self.reverse {
            labels.reverse();
        }
        if let Some(n) = self.length {
            if labels.len() > n {
                labels.drain(..labels.len() - n);
            }
        }
        Ok(labels.join("."))
    }
}

/// `%{i}` form of an IP: dotted decimal for v4; for v6, all 32 hex nibbles
/// with no `::` compression, `.`-separated (reverse-DNS label form).
fn format_ip(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => {
            let mut nibbles = String::with_capacity(63);
            for segment in v6.segments() {
                for shift in [12u32, 8, 4, 0] {
                    if !nibbles.is_empty() {
                        nibbles.push('.');
                    }
                    let nibble = (segment >> shift) & 0xf;
                    nibbles.push(char::from_digit(nibble as u32, 16).unwrap());
                }
            }
            nibbles
        }
    }
}

impl fmt::Display for Macro {
    /// Unexpanded literal form: `%{` letter digits `r` delimiters `}`.
    /// The delimiter set only appears when it differs from the default `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{{{}", self.kind.as_char())?;
        if let Some(n) = self.length {
            write!(f, "{n}")?;
        }
        if self.reverse {
            write!(f, "r")?;
        }
        if self.delimiter != "." {
            write!(f, "{}", self.delimiter)?;
        }
        write!(f, "}}")
    }
}
