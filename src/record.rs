//! Top-level SPF record.

use std::fmt;

use crate::mechanism::Term;

/// The only record version that exists.
pub const VERSION: &str = "spf1";

/// An ordered SPF policy record.
///
/// Term order is preserved and semantically significant: consumers evaluate
/// directives left to right. Rendering the same record twice yields
/// byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpfRecord {
    pub terms: Vec<Term>,
}

impl SpfRecord {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }
}

impl fmt::Display for SpfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={VERSION}")?;
        for term in &self.terms {
            write!(f, " {term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_spec::DomainSpec;
    use crate::mechanism::{Directive, DualCidr, Mechanism, Modifier, Qualifier};

    #[test]
    fn empty_record_is_version_only() {
        assert_eq!(SpfRecord::new(vec![]).to_string(), "v=spf1");
    }

    #[test]
    fn renders_terms_space_separated() {
        let record = SpfRecord::new(vec![
            Directive::new(Mechanism::Include(DomainSpec::literal("_spf.example.com")))
                .into(),
            Directive::with_qualifier(Mechanism::All, Qualifier::Fail).into(),
        ]);
        assert_eq!(record.to_string(), "v=spf1 include:_spf.example.com -all");
    }

    #[test]
    fn mixes_directives_and_modifiers_in_order() {
        let record = SpfRecord::new(vec![
            Mechanism::a().into(),
            Mechanism::Ip("192.0.2.0/24".parse().unwrap()).into(),
            Modifier::Redirect(DomainSpec::literal("_spf.example.net")).into(),
        ]);
        assert_eq!(
            record.to_string(),
            "v=spf1 a ip4:192.0.2.0/24 redirect=_spf.example.net"
        );
    }

    #[test]
    fn realistic_policy() {
        let record = SpfRecord::new(vec![
            Mechanism::mx().into(),
            Mechanism::A {
                domain: Some(DomainSpec::literal("mail.example.com")),
                cidr: DualCidr { v4: 24, v6: 128 },
            }
            .into(),
            Directive::with_qualifier(Mechanism::All, Qualifier::SoftFail).into(),
        ]);
        assert_eq!(record.to_string(), "v=spf1 mx a:mail.example.com/24 ~all");
    }

    #[test]
    fn render_is_deterministic() {
        let record = SpfRecord::new(vec![
            Mechanism::Ip("2001:db8::1/64".parse().unwrap()).into(),
            Directive::with_qualifier(Mechanism::All, Qualifier::Neutral).into(),
        ]);
        assert_eq!(record.to_string(), record.to_string());
    }

    #[test]
    fn version_is_fixed() {
        assert_eq!(SpfRecord::default().version(), "spf1");
    }
}
