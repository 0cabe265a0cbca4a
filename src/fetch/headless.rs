//! Browser fetch tier: headless Chromium render via chromiumoxide
//!
//! Expensive and slow, but it resolves the challenge pages that block the
//! direct tier. Each request launches its own browser process and terminates
//! it on every exit path; there is no pooling or concurrency cap here.

use std::path::Path;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::fetch::PageRenderer;

/// Renderer backed by a per-request headless Chromium process
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessRenderer;

impl PageRenderer for HeadlessRenderer {
    async fn render(&self, url: &str, config: &Config) -> AppResult<String> {
        fetch_rendered(url, config).await
    }
}

/// Launches a headless browser, renders the URL and returns the final HTML
pub async fn fetch_rendered(url: &str, config: &Config) -> AppResult<String> {
    info!("🚀 iniciando navegador sin cabeza...");
    debug!("URL objetivo: {}", url);

    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-setuid-sandbox",
            "--disable-dev-shm-usage",
            "--lang=es-CL",
            "--remote-debugging-port=0",
        ]);
    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(Path::new(path));
    }
    let browser_config = builder
        .build()
        .map_err(|reason| AppError::EngineUnavailable { reason })?;

    let (mut browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        AppError::EngineUnavailable { reason: e.to_string() }
    })?;
    debug!("navegador iniciado");

    // Drive CDP events in the background for the lifetime of this browser
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // Short pause so the browser state settles before the first command
    sleep(Duration::from_millis(300)).await;

    let result = render_page(&browser, url, config).await;

    // The browser dies on every exit path, success or not
    if let Err(e) = browser.close().await {
        warn!("no se pudo cerrar el navegador limpiamente: {}", e);
    }
    let _ = browser.wait().await;

    result
}

async fn render_page(browser: &Browser, url: &str, config: &Config) -> AppResult<String> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| AppError::Browser(format!("no se pudo crear la página: {e}")))?;

    // Present the same identity as the direct tier
    page.set_user_agent(config.user_agent.as_str())
        .await
        .map_err(|e| AppError::Browser(format!("no se pudo fijar el user agent: {e}")))?;

    navigate(&page, url, config).await?;
    info!("✅ navegador llegó a: {}", url);

    // Fixed dwell so an anti-bot challenge can run and redirect
    sleep(Duration::from_millis(config.browser_dwell_ms)).await;

    // Bounded poll for a data cell; on timeout we proceed with whatever
    // HTML the page ended up with
    let polled = timeout(
        Duration::from_millis(config.selector_poll_ms),
        wait_for_cell(&page),
    )
    .await;
    if polled.is_err() {
        debug!("no apareció ningún `tr td` dentro del plazo, continuando igual");
    }

    page.content()
        .await
        .map_err(|e| AppError::Browser(format!("no se pudo leer el HTML renderizado: {e}")))
}

async fn navigate(page: &Page, url: &str, config: &Config) -> AppResult<()> {
    let nav = async {
        page.goto(url).await?;
        // Wait for the initial DOM before the dwell starts
        page.wait_for_navigation().await?;
        Ok::<_, chromiumoxide::error::CdpError>(())
    };
    match timeout(Duration::from_secs(config.nav_timeout_secs), nav).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::Browser(format!("navegación a {url} falló: {e}"))),
        Err(_) => Err(AppError::Browser(format!(
            "navegación a {url} excedió {}s",
            config.nav_timeout_secs
        ))),
    }
}

async fn wait_for_cell(page: &Page) {
    loop {
        if page.find_element("tr td").await.is_ok() {
            return;
        }
        sleep(Duration::from_millis(250)).await;
    }
}
