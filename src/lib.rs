//! SPF (RFC 7208) policy record model.
//!
//! Represents an SPF record as an immutable tree of terms and provides the
//! two text transforms the rest of a mail stack builds on:
//!
//! - canonical rendering of a record (or any node) via [`std::fmt::Display`],
//!   producing the exact `v=spf1 ...` wire form;
//! - macro expansion of a [`DomainSpec`] into a concrete domain string
//!   against a per-evaluation [`QueryContext`].
//!
//! DNS lookups and the `check_host()` evaluation walk are the caller's
//! responsibility. This crate only models records; it performs no I/O.

mod domain_spec;
mod macros;
mod mechanism;
mod net;
mod query;
mod record;

pub use domain_spec::{DomainSpec, Fragment, MAX_DOMAIN_LEN};
pub use macros::{Macro, MacroKind};
pub use mechanism::{Directive, DualCidr, Mechanism, Modifier, Qualifier, Term};
pub use net::IpNetwork;
pub use query::{effective_domain, effective_sender, QueryContext};
pub use record::SpfRecord;

use thiserror::Error;

/// Errors raised while building or expanding a policy tree.
///
/// Construction errors mean no node was produced; expansion errors propagate
/// to the caller untouched. There are no transient failure modes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpfError {
    /// Malformed qualifier, macro-type letter, or IP network literal.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Macro with a non-positive label count.
    #[error("invalid macro: {0}")]
    InvalidMacro(String),
    /// Macro needs data the query context does not supply.
    #[error("unsupported macro %{{{0}}}: no data in query context")]
    UnsupportedMacro(char),
    /// Expanded domain cannot be reduced under 253 octets by label stripping.
    #[error("expanded domain exceeds 253 octets and has no label to strip")]
    LengthOverflow,
}
