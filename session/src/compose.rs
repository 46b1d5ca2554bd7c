//! Builds the iframe URL for the embedded trading app.

use std::fmt;

use url::form_urlencoded;

use crate::account::Credentials;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::trust;

const CHART_TYPE: &str = "area";
const INTERVAL: &str = "1t";
const TRADE_TYPE: &str = "over_under";
const LANG: &str = "EN";

/// A validated destination, ready to hand to the iframe.
#[derive(Clone, PartialEq, Eq)]
pub struct ComposedUrl {
    url: String,
    authenticated: bool,
}

impl ComposedUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Whether the URL carries the account's login (as opposed to the
    /// anonymous variant).
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

impl fmt::Display for ComposedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

// Authenticated URLs contain a token.
impl fmt::Debug for ComposedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.url.split('?').next().unwrap_or_default();
        write!(f, "ComposedUrl({base}?..)")
    }
}

/// Composes the destination URL.
///
/// With credentials the result logs the embedded app into that account;
/// without, the app opens anonymously on the default symbol. Either way the
/// base URL must pass the trust allow-list, otherwise
/// [`SyncError::UntrustedDestination`] is returned and no URL is built.
///
/// The output depends only on the inputs, so re-composing unchanged
/// credentials yields the same bytes.
pub fn compose(
    config: &SyncConfig,
    credentials: Option<&Credentials>,
) -> Result<ComposedUrl, SyncError> {
    if !trust::is_trusted(&config.dtrader_url) {
        return Err(SyncError::UntrustedDestination {
            url: config.dtrader_url.clone(),
        });
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(c) = credentials {
        query
            .append_pair("acct1", &c.login_id)
            .append_pair("token1", &c.token)
            .append_pair("cur1", &c.currency)
            .append_pair("lang", LANG)
            .append_pair("app_id", &config.app_id.to_string());
    }
    query
        .append_pair("chart_type", CHART_TYPE)
        .append_pair("interval", INTERVAL)
        .append_pair("symbol", &config.default_symbol)
        .append_pair("trade_type", TRADE_TYPE);

    Ok(ComposedUrl {
        url: join_query(&config.dtrader_url, &query.finish()),
        authenticated: credentials.is_some(),
    })
}

/// Appends `query` to `base`, keeping any existing query and fragment intact.
fn join_query(base: &str, query: &str) -> String {
    let (head, fragment) = match base.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (base, None),
    };

    let separator = if !head.contains('?') {
        "?"
    } else if head.ends_with('?') || head.ends_with('&') {
        ""
    } else {
        "&"
    };

    let mut url = format!("{head}{separator}{query}");
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn credentials(login_id: &str, token: &str, currency: &str) -> Credentials {
        Credentials {
            login_id: login_id.into(),
            token: token.into(),
            currency: currency.into(),
        }
    }

    #[test]
    fn authenticated_url() {
        let url = compose(
            &SyncConfig::default(),
            Some(&credentials("CR123", "abc", "EUR")),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://deriv-dtrader.vercel.app/dtrader?acct1=CR123&token1=abc&cur1=EUR&lang=EN\
             &app_id=110113&chart_type=area&interval=1t&symbol=1HZ100V&trade_type=over_under"
        );
        assert!(url.is_authenticated());
    }

    #[test]
    fn anonymous_url() {
        let url = compose(&SyncConfig::default(), None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://deriv-dtrader.vercel.app/dtrader?chart_type=area&interval=1t&symbol=1HZ100V&trade_type=over_under"
        );
        assert!(!url.is_authenticated());
    }

    #[test]
    fn base_query_does_not_make_a_url_authenticated() {
        let config = SyncConfig {
            dtrader_url: "https://deriv.com/dtrader?token1=preset".into(),
            ..SyncConfig::default()
        };
        let url = compose(&config, None).unwrap();
        assert!(url.as_str().contains("token1=preset"));
        assert!(!url.is_authenticated());
    }

    #[test]
    fn values_are_query_encoded() {
        let url = compose(
            &SyncConfig::default(),
            Some(&credentials("CR 1&x", "a+b/c=d", "US$")),
        )
        .unwrap();
        assert!(url
            .as_str()
            .contains("acct1=CR+1%26x&token1=a%2Bb%2Fc%3Dd&cur1=US%24&"));
    }

    #[test_case(Some(credentials("CR1", "t", "USD")) ; "with credentials")]
    #[test_case(None ; "anonymous")]
    fn untrusted_base_never_yields_a_url(creds: Option<Credentials>) {
        let config = SyncConfig {
            dtrader_url: "https://evil.example.com".into(),
            ..SyncConfig::default()
        };
        assert_eq!(
            compose(&config, creds.as_ref()),
            Err(SyncError::UntrustedDestination {
                url: "https://evil.example.com".into()
            })
        );
    }

    #[test]
    fn custom_app_id_and_symbol() {
        let config = SyncConfig {
            app_id: 1089,
            default_symbol: "R_50".into(),
            ..SyncConfig::default()
        };
        let url = compose(&config, Some(&credentials("CR1", "t", "USD"))).unwrap();
        assert!(url.as_str().contains("&app_id=1089&"));
        assert!(url.as_str().contains("&symbol=R_50&"));
    }

    #[test]
    fn debug_hides_query() {
        let url = compose(&SyncConfig::default(), Some(&credentials("CR1", "secret", "USD")))
            .unwrap();
        assert_eq!(
            format!("{url:?}"),
            "ComposedUrl(https://deriv-dtrader.vercel.app/dtrader?..)"
        );
    }

    #[test_case("https://deriv.com/dtrader", "https://deriv.com/dtrader?q=1" ; "plain base")]
    #[test_case("https://deriv.com/dtrader?theme=dark", "https://deriv.com/dtrader?theme=dark&q=1" ; "base with query")]
    #[test_case("https://deriv.com/dtrader?", "https://deriv.com/dtrader?q=1" ; "dangling question mark")]
    #[test_case("https://deriv.com/#/trade", "https://deriv.com/?q=1#/trade" ; "base with fragment")]
    fn joins_query(base: &str, expected: &str) {
        assert_eq!(join_query(base, "q=1"), expected);
    }
}
