//! SPF mechanisms, modifiers, and directives (RFC 7208 Sections 5 and 6).

use std::fmt;

use crate::domain_spec::DomainSpec;
use crate::net::IpNetwork;

/// Qualifier prefix on a directive. Defaults to Pass if omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Qualifier {
    #[default]
    Pass, // +
    Fail,     // -
    SoftFail, // ~
    Neutral,  // ?
}

impl Qualifier {
    pub fn as_char(self) -> char {
        match self {
            Qualifier::Pass => '+',
            Qualifier::Fail => '-',
            Qualifier::SoftFail => '~',
            Qualifier::Neutral => '?',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Qualifier::Pass),
            '-' => Some(Qualifier::Fail),
            '~' => Some(Qualifier::SoftFail),
            '?' => Some(Qualifier::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// CIDR prefix pair for the `a` and `mx` mechanisms. The natural full-host
/// masks (32/128) are the defaults and are elided when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualCidr {
    pub v4: u8,
    pub v6: u8,
}

impl Default for DualCidr {
    fn default() -> Self {
        Self { v4: 32, v6: 128 }
    }
}

impl fmt::Display for DualCidr {
    /// Suffix form: `/v4` only when not 32, `//v6` only when not 128, in
    /// that fixed order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.v4 != 32 {
            write!(f, "/{}", self.v4)?;
        }
        if self.v6 != 128 {
            write!(f, "//{}", self.v6)?;
        }
        Ok(())
    }
}

/// SPF mechanism variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mechanism {
    /// `all`
    All,
    /// `include:<domain-spec>`
    Include(DomainSpec),
    /// `exists:<domain-spec>`
    Exists(DomainSpec),
    /// `a[:<domain-spec>][/cidr4][//cidr6]`
    A {
        domain: Option<DomainSpec>,
        cidr: DualCidr,
    },
    /// `mx[:<domain-spec>][/cidr4][//cidr6]`
    Mx {
        domain: Option<DomainSpec>,
        cidr: DualCidr,
    },
    /// `ip4:<network>` / `ip6:<network>`, by address family.
    Ip(IpNetwork),
}

impl Mechanism {
    /// A bare `a` with default prefixes.
    pub fn a() -> Self {
        Mechanism::A {
            domain: None,
            cidr: DualCidr::default(),
        }
    }

    /// A bare `mx` with default prefixes.
    pub fn mx() -> Self {
        Mechanism::Mx {
            domain: None,
            cidr: DualCidr::default(),
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mechanism::All => write!(f, "all"),
            Mechanism::Include(domain) => write!(f, "include:{domain}"),
            Mechanism::Exists(domain) => write!(f, "exists:{domain}"),
            Mechanism::A { domain, cidr } => {
                write!(f, "a")?;
                if let Some(d) = domain {
                    write!(f, ":{d}")?;
                }
                write!(f, "{cidr}")
            }
            Mechanism::Mx { domain, cidr } => {
                write!(f, "mx")?;
                if let Some(d) = domain {
                    write!(f, ":{d}")?;
                }
                write!(f, "{cidr}")
            }
            Mechanism::Ip(network) => write!(f, "{network}"),
        }
    }
}

/// `name=value` modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    /// `redirect=<domain-spec>`
    Redirect(DomainSpec),
    /// `exp=<domain-spec>`
    Exp(DomainSpec),
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Redirect(domain) => write!(f, "redirect={domain}"),
            Modifier::Exp(domain) => write!(f, "exp={domain}"),
        }
    }
}

/// A directive is a qualifier + mechanism pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub qualifier: Qualifier,
    pub mechanism: Mechanism,
}

impl Directive {
    /// Directive with the default Pass qualifier.
    pub fn new(mechanism: Mechanism) -> Self {
        Self {
            qualifier: Qualifier::default(),
            mechanism,
        }
    }

    pub fn with_qualifier(mechanism: Mechanism, qualifier: Qualifier) -> Self {
        Self {
            qualifier,
            mechanism,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pass is the default and renders as an empty prefix, not "+".
        if self.qualifier != Qualifier::Pass {
            write!(f, "{}", self.qualifier)?;
        }
        write!(f, "{}", self.mechanism)
    }
}

/// One term of a record: a directive or a modifier. Modifier uniqueness and
/// placement rules are the evaluation layer's concern, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Directive(Directive),
    Modifier(Modifier),
}

impl From<Directive> for Term {
    fn from(d: Directive) -> Self {
        Term::Directive(d)
    }
}

impl From<Modifier> for Term {
    fn from(m: Modifier) -> Self {
        Term::Modifier(m)
    }
}

impl From<Mechanism> for Term {
    fn from(m: Mechanism) -> Self {
        Term::Directive(Directive::new(m))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Directive(d) => write!(f, "{d}"),
            Term::Modifier(m) => write!(f, "{m}"),
        }
    }
}
