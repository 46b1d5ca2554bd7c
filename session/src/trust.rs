//! Allow-list check for the embedded app's base URL.

use url::Url;

/// Hosts the embedded app may be served from. A host is trusted when it is
/// one of these or a subdomain of one of these.
pub const TRUSTED_HOST_SUFFIXES: &[&str] = &[
    "deriv-dta.vercel.app",
    "deriv.com",
    "deriv-dtrader.vercel.app",
];

/// Returns `true` if `base_url` parses as an http(s) URL whose host matches
/// [`TRUSTED_HOST_SUFFIXES`]. Never panics; unparseable input is untrusted.
pub fn is_trusted(base_url: &str) -> bool {
    is_trusted_with(base_url, TRUSTED_HOST_SUFFIXES)
}

/// Same as [`is_trusted`] against a caller-provided allow-list.
pub fn is_trusted_with(base_url: &str, suffixes: &[&str]) -> bool {
    let Ok(url) = Url::parse(base_url) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    // `Url` lowercases domains; a fully-qualified trailing dot is still the same host.
    let host = host.strip_suffix('.').unwrap_or(host);

    suffixes.iter().any(|suffix| host_matches(host, suffix))
}

/// Suffix match on a label boundary: `app.deriv.com` matches `deriv.com`,
/// `notderiv.com` does not.
fn host_matches(host: &str, suffix: &str) -> bool {
    match host.strip_suffix(suffix) {
        Some("") => true,
        Some(rest) => rest.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://deriv-dtrader.vercel.app/dtrader" ; "default destination")]
    #[test_case("https://deriv-dta.vercel.app" ; "alternate vercel deployment")]
    #[test_case("https://deriv.com/dtrader?x=1" ; "apex domain")]
    #[test_case("https://app.deriv.com/dtrader" ; "subdomain")]
    #[test_case("https://APP.Deriv.COM/" ; "mixed case host")]
    #[test_case("https://deriv.com./dtrader" ; "trailing dot")]
    #[test_case("http://deriv.com:8443/" ; "http with port")]
    fn trusted(url: &str) {
        assert!(is_trusted(url));
    }

    #[test_case("https://evil.example.com" ; "unrelated host")]
    #[test_case("https://notderiv.com" ; "sibling domain sharing the suffix text")]
    #[test_case("https://deriv.com.evil.io" ; "trusted name as a prefix")]
    #[test_case("https://deriv.com@evil.io/" ; "userinfo spoof")]
    #[test_case("javascript:alert(1)//deriv.com" ; "javascript scheme")]
    #[test_case("file:///deriv.com" ; "no host")]
    #[test_case("deriv.com/dtrader" ; "relative url")]
    #[test_case("" ; "empty")]
    #[test_case("https://" ; "scheme only")]
    fn untrusted(url: &str) {
        assert!(!is_trusted(url));
    }

    #[test]
    fn custom_allow_list() {
        assert!(is_trusted_with("https://staging.example.org", &["example.org"]));
        assert!(!is_trusted_with("https://deriv.com", &["example.org"]));
        assert!(!is_trusted_with("https://deriv.com", &[]));
    }
}
