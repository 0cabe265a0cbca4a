//! Live tests against the real upstream and a real local Chromium.
//!
//! Ignored by default; run manually with: cargo test -- --ignored

use std::sync::Arc;

use tokio_test::assert_ok;

use rutificador_proxy::fetch::headless::HeadlessRenderer;
use rutificador_proxy::{extract_first_row, normalize, Config, FetchTier, Resolver};

#[tokio::test]
#[ignore]
async fn resolve_known_rut_end_to_end() {
    rutificador_proxy::logger::init();

    let config = Arc::new(Config::from_env());
    let resolver = Resolver::new(config.clone(), HeadlessRenderer);

    let canonical = normalize("15421741K").expect("RUT de prueba válido").formatted();
    let url = config.lookup_url(&canonical);

    let outcome = tokio_test::assert_ok!(resolver.resolve(&url).await);
    println!("tier: {}, {} bytes", outcome.tier, outcome.body.len());

    let values = extract_first_row(&outcome.body);
    assert!(!values.is_empty(), "el upstream debería devolver al menos una fila");
}

#[tokio::test]
#[ignore]
async fn headless_render_produces_html() {
    rutificador_proxy::logger::init();

    let config = Config::from_env();
    let html = rutificador_proxy::fetch::headless::fetch_rendered("https://example.com", &config)
        .await
        .expect("el render no debería fallar con Chromium instalado");

    assert!(html.contains("<html"), "se esperaba un documento HTML");
}

#[tokio::test]
#[ignore]
async fn browser_tier_is_used_when_direct_is_refused() {
    rutificador_proxy::logger::init();

    let config = Arc::new(Config {
        // Nothing listens here, so the direct tier always escalates
        lookup_base_url: "http://127.0.0.1:9/pr".to_string(),
        direct_timeout_secs: 1,
        ..Config::from_env()
    });
    let resolver = Resolver::new(config.clone(), HeadlessRenderer);

    let outcome = resolver
        .resolve("https://example.com")
        .await
        .expect("el tier de navegador debería completar el fetch");
    assert_eq!(outcome.tier, FetchTier::Browser);
}
