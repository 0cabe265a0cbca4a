//! Direct fetch tier: one spoofed-header POST against the lookup page
//!
//! Cheap and fast, and the first thing the upstream wall blocks. Origin and
//! Referer are derived from the request URL so the header set follows the
//! configured base URL instead of being process-wide constants.

use std::time::Duration;

use reqwest::header;

use crate::config::Config;

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "es-CL,es;q=0.9,en;q=0.8";

/// Completed direct-tier response, body fully read
#[derive(Debug)]
pub struct DirectResponse {
    pub status: u16,
    pub body: String,
}

/// Issues the single direct request
///
/// Any transport failure (connect error, timeout, aborted body read) comes
/// back as `Err`; the orchestrator treats all of them as inconclusive.
pub async fn fetch(
    client: &reqwest::Client,
    config: &Config,
    url: &str,
) -> Result<DirectResponse, reqwest::Error> {
    let mut request = client
        .post(url)
        .timeout(Duration::from_secs(config.direct_timeout_secs))
        .header(header::USER_AGENT, config.user_agent.as_str())
        .header(header::ACCEPT, ACCEPT)
        .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
        .header(header::CACHE_CONTROL, "no-cache");

    if let Some(origin) = site_origin(url) {
        request = request
            .header(header::ORIGIN, origin.as_str())
            .header(header::REFERER, format!("{origin}/"));
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;

    Ok(DirectResponse { status, body })
}

/// `scheme://host` of the URL, the value a browser would send as Origin
fn site_origin(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use super::site_origin;

    #[test]
    fn origin_drops_path_and_keeps_scheme_host() {
        assert_eq!(
            site_origin("https://r.rutificador.co/pr/15.421.741-K").as_deref(),
            Some("https://r.rutificador.co")
        );
    }

    #[test]
    fn unparseable_url_has_no_origin() {
        assert_eq!(site_origin("not a url"), None);
    }
}
