//! Registrable domains and the pipeline that derives them from saved URLs.
//!
//! Password entries store whatever the user typed or the browser captured:
//! full URLs, bare hostnames, subdomains, ports. Only the registrable domain
//! (public suffix plus one label) is comparable against a leak list, so
//! every field is reduced to that form:
//!
//! - `https://login.example.com:8443/auth` -> `example.com`
//! - `bank.co.uk/path` -> `bank.co.uk`
//! - `co.uk` -> rejected, it is itself a public suffix

use std::borrow::Borrow;
use std::collections::hash_set;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use url::{Host, Url};

use crate::errors::ExtractError;

/// Scheme prepended to bare hostnames so the URL parser sees a host.
const DEFAULT_SCHEME: &str = "http://";

/// A canonical registrable domain such as `example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Domain {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Leak lists are keyed by registrable domain already, their lines are taken as-is.
impl From<String> for Domain {
    fn from(value: String) -> Self {
        Domain(value)
    }
}

impl From<&str> for Domain {
    fn from(value: &str) -> Self {
        Domain(value.to_string())
    }
}

/// Unordered collection of unique domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    domains: HashSet<Domain>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the domain was already present.
    pub fn insert(&mut self, domain: Domain) -> bool {
        self.domains.insert(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Domain> {
        self.domains.iter()
    }

    /// Domains present in both sets.
    pub fn intersection(&self, other: &DomainSet) -> DomainSet {
        // Look up the larger set from the smaller one.
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .iter()
            .filter(|domain| large.domains.contains(*domain))
            .cloned()
            .collect()
    }

    /// Lexicographically sorted copy of the domains.
    pub fn to_sorted_vec(&self) -> Vec<Domain> {
        let mut sorted: Vec<Domain> = self.domains.iter().cloned().collect();
        sorted.sort();
        sorted
    }
}

impl FromIterator<Domain> for DomainSet {
    fn from_iter<I: IntoIterator<Item = Domain>>(iter: I) -> Self {
        DomainSet {
            domains: iter.into_iter().collect(),
        }
    }
}

impl Extend<Domain> for DomainSet {
    fn extend<I: IntoIterator<Item = Domain>>(&mut self, iter: I) {
        self.domains.extend(iter);
    }
}

impl IntoIterator for DomainSet {
    type Item = Domain;
    type IntoIter = hash_set::IntoIter<Domain>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.into_iter()
    }
}

impl<'a> IntoIterator for &'a DomainSet {
    type Item = &'a Domain;
    type IntoIter = hash_set::Iter<'a, Domain>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.iter()
    }
}

/// Public suffix rules: reduce a hostname to its registrable domain.
pub trait SuffixRules {
    fn registrable_domain(&self, host: &str) -> Result<String, ExtractError>;
}

/// Suffix rules backed by the Public Suffix List compiled into the `psl` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicSuffixList;

impl SuffixRules for PublicSuffixList {
    fn registrable_domain(&self, host: &str) -> Result<String, ExtractError> {
        let host = host.trim_end_matches('.');
        if host.is_empty() {
            return Err(ExtractError::MissingHost);
        }
        psl::domain_str(host)
            .map(|domain| domain.to_string())
            .ok_or_else(|| ExtractError::NotRegistrable(host.to_string()))
    }
}

/// Turns raw URL or hostname fields into registrable domains.
#[derive(Debug, Clone, Default)]
pub struct DomainExtractor<S = PublicSuffixList> {
    rules: S,
}

impl DomainExtractor<PublicSuffixList> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: SuffixRules> DomainExtractor<S> {
    pub fn with_rules(rules: S) -> Self {
        Self { rules }
    }

    pub fn extract(&self, raw: &str) -> Result<Domain, ExtractError> {
        let url = parse_lenient(raw)?;
        let host = match url.host() {
            Some(Host::Domain(host)) => host,
            Some(Host::Ipv4(ip)) => return Err(ExtractError::IpAddress(ip.to_string())),
            Some(Host::Ipv6(ip)) => return Err(ExtractError::IpAddress(ip.to_string())),
            None => return Err(ExtractError::MissingHost),
        };
        if host.is_empty() {
            return Err(ExtractError::MissingHost);
        }

        // Only special schemes get their host lowercased by the parser.
        let host = host.to_lowercase();
        self.rules.registrable_domain(&host).map(Domain)
    }
}

/// Parse a URL, treating input without `//` as a bare host.
///
/// `example.com/path` would otherwise parse as a relative path, or as
/// scheme `example.com` for inputs like `example.com:8080`.
fn parse_lenient(raw: &str) -> Result<Url, ExtractError> {
    if raw.contains("//") {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{DEFAULT_SCHEME}{raw}"))?)
    }
}
