//! Base address normalization.
//!
//! A base address is the scheme, host and port a `PretendServer` claims,
//! plus an optional path prefix. Hosts compare case-insensitively and
//! ports compare after filling in the scheme default, so
//! `HTTP://Pretend.Stub:80/` and `http://pretend.stub` are the same address.

use std::fmt;

use url::Url;

use crate::error::PretendError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseAddress {
    scheme: String,
    host: String,
    port: u16,
    explicit_port: bool,
    prefix: String,
}

impl BaseAddress {
    pub fn parse(base_url: &str) -> Result<Self, PretendError> {
        let invalid = |reason: &str| PretendError::InvalidBaseAddress {
            url: base_url.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(base_url).map_err(|err| invalid(&err.to_string()))?;
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("base address cannot carry a query or fragment"));
        }
        let host = url
            .host_str()
            .ok_or_else(|| invalid("base address has no host"))?
            .to_ascii_lowercase();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| invalid("base address has no port and no default for its scheme"))?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port,
            explicit_port: url.port().is_some(),
            prefix: url.path().trim_end_matches('/').to_string(),
        })
    }

    /// Normalized form, without a trailing slash.
    pub fn as_url(&self) -> String {
        if self.explicit_port {
            format!("{}://{}:{}{}", self.scheme, self.host, self.port, self.prefix)
        } else {
            format!("{}://{}{}", self.scheme, self.host, self.prefix)
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Route-relative path if this address claims `url`.
    ///
    /// The prefix must end on a segment boundary: `/api` claims `/api` and
    /// `/api/things` but not `/apiary`.
    pub fn claim(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?;
        if url.scheme() != self.scheme
            || !host.eq_ignore_ascii_case(&self.host)
            || url.port_or_known_default() != Some(self.port)
        {
            return None;
        }

        let rest = url.path().strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            Some("/".to_string())
        } else if rest.starts_with('/') {
            Some(rest.to_string())
        } else {
            None
        }
    }
}

impl fmt::Display for BaseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_url())
    }
}
