//! Two-tier escalating fetch
//!
//! The upstream site sits behind a simple anti-bot wall. The cheap path is a
//! single spoofed-header POST; when that comes back blocked (hard 403 or a
//! challenge page without a data table) the request escalates to a full
//! headless-browser render. The escalation decision is a pure classification
//! over explicit outcome values, not exception control flow.

pub mod direct;
pub mod headless;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::extract::has_data_row;
use crate::util::truncate_chars;

/// Which fetch strategy produced a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTier {
    Direct,
    Browser,
}

impl std::fmt::Display for FetchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchTier::Direct => f.write_str("direct"),
            FetchTier::Browser => f.write_str("browser"),
        }
    }
}

/// Final result of the escalating fetch; immutable once produced
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Upstream status code; `None` for the browser tier, which has no
    /// meaningful single status
    pub status: Option<u16>,
    pub body: String,
    pub tier: FetchTier,
}

/// Why the direct tier's response was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationReason {
    /// Hard block: upstream answered 403
    Forbidden,
    /// Soft block: a page (challenge or otherwise) without a `<tr>…<td>` row
    NoDataRow,
    /// Connection error or timeout; the attempt proves nothing either way
    Transport,
}

impl std::fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscalationReason::Forbidden => f.write_str("403"),
            EscalationReason::NoDataRow => f.write_str("sin filas <tr><td>"),
            EscalationReason::Transport => f.write_str("error de transporte"),
        }
    }
}

/// Verdict on a completed direct-tier response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectVerdict {
    Accept,
    Escalate(EscalationReason),
}

/// A direct response is final iff it is not a 403 and its body carries at
/// least one data row. Anything else escalates to the browser tier.
pub fn classify_direct(status: u16, body: &str) -> DirectVerdict {
    if status == 403 {
        return DirectVerdict::Escalate(EscalationReason::Forbidden);
    }
    if !has_data_row(body) {
        return DirectVerdict::Escalate(EscalationReason::NoDataRow);
    }
    DirectVerdict::Accept
}

/// Capability of rendering a page to final HTML with a real browser engine.
///
/// Injected into the [`Resolver`] at construction so that a missing engine is
/// a reported configuration error and tests can substitute a stub.
pub trait PageRenderer: Send + Sync + 'static {
    fn render(
        &self,
        url: &str,
        config: &Config,
    ) -> impl Future<Output = AppResult<String>> + Send;
}

/// Per-request fetch orchestrator
///
/// Holds only immutable configuration and the pooled HTTP client; requests
/// share no other state.
pub struct Resolver<R> {
    config: Arc<Config>,
    client: reqwest::Client,
    renderer: R,
}

impl<R: PageRenderer> Resolver<R> {
    pub fn new(config: Arc<Config>, renderer: R) -> Self {
        // Redirects are followed by default, matching upstream behavior.
        // The per-request timeout is applied in `direct::fetch`.
        let client = reqwest::Client::new();
        Self { config, client, renderer }
    }

    /// Runs the two-tier policy for one upstream URL
    ///
    /// The direct tier's transport errors are escalation triggers, never
    /// propagated. The browser tier's HTML is final regardless of content;
    /// downstream extraction handles the empty case.
    pub async fn resolve(&self, url: &str) -> AppResult<FetchOutcome> {
        match direct::fetch(&self.client, &self.config, url).await {
            Ok(res) => {
                debug!(
                    status = res.status,
                    "[direct] snippet: {}",
                    truncate_chars(&res.body, 600)
                );
                match classify_direct(res.status, &res.body) {
                    DirectVerdict::Accept => {
                        info!("✓ tier directo aceptado (status {})", res.status);
                        return Ok(FetchOutcome {
                            status: Some(res.status),
                            body: res.body,
                            tier: FetchTier::Direct,
                        });
                    }
                    DirectVerdict::Escalate(reason) => {
                        info!("tier directo descartado ({reason}), escalando al navegador");
                    }
                }
            }
            Err(e) => {
                let reason = EscalationReason::Transport;
                info!("tier directo no concluyente ({reason}: {e}), escalando al navegador");
            }
        }

        let html = self.renderer.render(url, &self.config).await?;
        debug!("[browser] snippet: {}", truncate_chars(&html, 600));
        Ok(FetchOutcome {
            status: None,
            body: html,
            tier: FetchTier::Browser,
        })
    }

    /// Like [`resolve`](Self::resolve), but detached from the caller: a
    /// client disconnect does not cancel the fetch, so the browser tier
    /// always reaches its close path.
    pub async fn resolve_detached(self: &Arc<Self>, url: &str) -> AppResult<FetchOutcome> {
        let resolver = Arc::clone(self);
        let url = url.to_string();
        tokio::spawn(async move { resolver.resolve(&url).await })
            .await
            .map_err(|e| AppError::Browser(format!("la tarea de fetch terminó abruptamente: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = "<table><tr><td>JUAN PEREZ</td></tr></table>";

    #[test]
    fn forbidden_escalates_even_with_table_markup() {
        assert_eq!(
            classify_direct(403, ROW),
            DirectVerdict::Escalate(EscalationReason::Forbidden)
        );
    }

    #[test]
    fn ok_without_table_markup_escalates() {
        assert_eq!(
            classify_direct(200, "<html><body>Just a moment…</body></html>"),
            DirectVerdict::Escalate(EscalationReason::NoDataRow)
        );
    }

    #[test]
    fn ok_with_table_markup_is_final() {
        assert_eq!(classify_direct(200, ROW), DirectVerdict::Accept);
    }

    #[test]
    fn empty_looking_row_still_counts_as_table_markup() {
        // The acceptance predicate only checks for <tr>…<td>; a row whose
        // cells clean to nothing is accepted here and rejected downstream.
        assert_eq!(
            classify_direct(200, "<tr><td> </td></tr>"),
            DirectVerdict::Accept
        );
    }
}
