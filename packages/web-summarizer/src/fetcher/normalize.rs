//! URL validation and scheme handling.

use url::{ParseError, Url};

use crate::error::FetchError;

/// Validate `raw` as an absolute http(s) URL.
///
/// A schemeless input (`example.com/post`) is given `https://`. An explicit
/// `http://` is kept as written. Anything else fails with `InvalidUrl`.
pub fn normalize_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty URL"));
    }

    let with_https = || {
        Url::parse(&format!("https://{trimmed}")).map_err(|e| invalid(&e.to_string()))
    };
    let url = match Url::parse(trimmed) {
        // `example.com:8080/a` parses with `example.com` as its scheme.
        Ok(url) if !trimmed.contains("://") && is_host_and_port(&url, trimmed) => {
            with_https()?
        }
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => with_https()?,
        Err(e) => return Err(invalid(&e.to_string())),
    };

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(&format!("unsupported scheme `{other}`"))),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(invalid("missing host")),
    }

    // A schemeless word like "notaurl" parses as a host; require a dotted name,
    // an IP literal, or localhost.
    if !raw.contains("://") && !looks_like_host(&url) {
        return Err(invalid("not a hostname"));
    }

    Ok(url)
}

fn is_host_and_port(url: &Url, raw: &str) -> bool {
    let scheme = url.scheme();
    let after = &raw[scheme.len() + 1..];
    scheme == "localhost"
        || scheme.contains('.')
        || after.starts_with(|c: char| c.is_ascii_digit())
}

fn looks_like_host(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost" || domain.contains('.'),
        Some(_) => true,
        None => false,
    }
}
