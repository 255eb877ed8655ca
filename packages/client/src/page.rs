//! Page lifecycle: where the page was served from and the events it goes
//! through.

use crate::error::ClientError;

/// Page lifecycle events, in the order a page emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Document parsed; handlers may be wired up.
    Ready,
    /// Document and sub-resources loaded.
    Loaded,
    /// Page is going away.
    Unload,
}

/// Domain and port the page was served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    domain: String,
    port: u16,
}

impl Location {
    /// Create a location, rejecting an empty or whitespace-only domain.
    pub fn new(domain: impl Into<String>, port: u16) -> Result<Self, ClientError> {
        let domain = domain.into();
        let trimmed = domain.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidLocation(
                "domain must not be empty".to_string(),
            ));
        }
        if trimmed.contains(['/', '?', '#', ' ']) {
            return Err(ClientError::InvalidLocation(format!(
                "'{}' is not a host name",
                trimmed
            )));
        }

        Ok(Self {
            domain: trimmed.to_string(),
            port,
        })
    }

    /// `domain:port`, with IPv6 literals bracketed
    pub fn authority(&self) -> String {
        if self.domain.contains(':') && !self.domain.starts_with('[') {
            format!("[{}]:{}", self.domain, self.port)
        } else {
            format!("{}:{}", self.domain, self.port)
        }
    }

    /// Secure origin of the page, `https://domain:port`
    pub fn origin(&self) -> String {
        format!("https://{}", self.authority())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_uses_https_domain_and_port() {
        // テスト項目: オリジンが https://ドメイン:ポート の形式で生成される
        // given (前提条件):
        let location = Location::new("door.local", 3000).unwrap();

        // when (操作):
        let origin = location.origin();

        // then (期待する結果):
        assert_eq!(origin, "https://door.local:3000");
    }

    #[test]
    fn test_origin_brackets_ipv6_literal() {
        // テスト項目: IPv6 アドレスは角括弧で囲まれる
        // given (前提条件):
        let location = Location::new("::1", 8443).unwrap();

        // when (操作):
        let origin = location.origin();

        // then (期待する結果):
        assert_eq!(origin, "https://[::1]:8443");
    }

    #[test]
    fn test_new_rejects_empty_domain() {
        // テスト項目: 空のドメインは InvalidLocation エラーになる
        // given (前提条件):
        let domain = "   ";

        // when (操作):
        let result = Location::new(domain, 3000);

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidLocation(_))));
    }

    #[test]
    fn test_new_rejects_url_instead_of_host() {
        // テスト項目: ホスト名ではなく URL を渡すとエラーになる
        // given (前提条件):
        let domain = "https://door.local/";

        // when (操作):
        let result = Location::new(domain, 3000);

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidLocation(_))));
    }
}
