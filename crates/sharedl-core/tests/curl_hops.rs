//! Integration test: redirect-chain behaviour of the curl client (deadline and cookies).

mod common;

use common::share_server::{self, Route};
use sharedl_core::config::SharedlConfig;
use sharedl_core::http::{CurlClient, HttpClient, HttpError};
use std::time::{Duration, Instant};
use url::Url;

fn client(probe_timeout: Duration) -> CurlClient {
    let mut opts = SharedlConfig::default().client_options();
    opts.connect_timeout = Duration::from_secs(2);
    opts.probe_timeout = probe_timeout;
    CurlClient::new(opts)
}

#[test]
fn timeout_bounds_whole_redirect_chain() {
    let hop = Duration::from_millis(1500);
    let server = share_server::start(vec![
        ("/a", Route::redirect("/b").delayed(hop)),
        ("/b", Route::redirect("/c").delayed(hop)),
        ("/c", Route::redirect("/d").delayed(hop)),
        ("/d", Route::file("application/octet-stream", vec![0u8; 16]).delayed(hop)),
    ]);
    let url = Url::parse(&format!("{}/a", server.base())).unwrap();

    let started = Instant::now();
    let result = client(Duration::from_secs(2)).probe(&url);
    let elapsed = started.elapsed();

    match result {
        Err(HttpError::Timeout { limit, .. }) => assert_eq!(limit, Duration::from_secs(2)),
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(elapsed < Duration::from_secs(3), "chain ran for {elapsed:?}");
    assert_eq!(server.hits("/c"), 0);
}

#[test]
fn cookies_carry_across_hops() {
    let server = share_server::start(vec![
        ("/login", Route::redirect("/sheet").header("Set-Cookie", "sid=abc123; Path=/")),
        (
            "/sheet",
            Route::file("application/octet-stream", vec![1u8; 64]).requires_cookie("sid=abc123"),
        ),
    ]);
    let url = Url::parse(&format!("{}/login", server.base())).unwrap();

    let response = client(Duration::from_secs(5)).probe(&url).expect("follow");
    assert_eq!(response.status, 200);
    assert_eq!(response.chain.len(), 2);

    let direct = Url::parse(&format!("{}/sheet", server.base())).unwrap();
    let without = client(Duration::from_secs(5)).probe(&direct).expect("follow");
    assert_eq!(without.status, 403);
}
