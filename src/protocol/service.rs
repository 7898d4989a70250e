//! Service kinds
//!
//! The closed set of lookup categories a table can answer.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Category of lookup being performed against a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Alias,
    Domain,
    Credentials,
    NetAddr,
    UserInfo,
    Source,
    MailAddr,
    AddrName,
    MailAddrMap,
    RelayHost,
    String,
    Regex,
    None,
}

impl Service {
    /// Every service kind, in wire-tag declaration order
    pub const ALL: [Service; 13] = [
        Service::Alias,
        Service::Domain,
        Service::Credentials,
        Service::NetAddr,
        Service::UserInfo,
        Service::Source,
        Service::MailAddr,
        Service::AddrName,
        Service::MailAddrMap,
        Service::RelayHost,
        Service::String,
        Service::Regex,
        Service::None,
    ];

    /// Canonical lowercase wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Alias => "alias",
            Service::Domain => "domain",
            Service::Credentials => "credentials",
            Service::NetAddr => "netaddr",
            Service::UserInfo => "userinfo",
            Service::Source => "source",
            Service::MailAddr => "mailaddr",
            Service::AddrName => "addrname",
            Service::MailAddrMap => "mailaddrmap",
            Service::RelayHost => "relayhost",
            Service::String => "string",
            Service::Regex => "regex",
            Service::None => "none",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .iter()
            .copied()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownService(s.to_string()))
    }
}
