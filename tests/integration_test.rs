use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ethers::types::Address;
use grants_core::{
    chains::{NameApi, NameRpc},
    config::ResolverSettings,
    models::{InputType, Result, RoundStatus},
    resolver::AddressResolver,
    compute_status_at, is_avatar_safe,
};
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

/// Scripted HTTP API that records the names it was asked about.
#[derive(Default)]
struct StubApi {
    address: Option<String>,
    avatar: Option<String>,
    delay: Duration,
    names: Mutex<Vec<String>>,
    calls: AtomicU32,
}

#[async_trait]
impl NameApi for StubApi {
    async fn lookup_address(&self, name: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names.lock().unwrap().push(name.to_string());
        sleep(self.delay).await;
        Ok(self.address.clone())
    }

    async fn check_avatar(&self, _name: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.delay).await;
        Ok(self.avatar.clone())
    }
}

#[derive(Default)]
struct StubRpc {
    address: Option<Address>,
    avatar: Option<String>,
    delay: Duration,
    avatar_delay: Duration,
    calls: AtomicU32,
}

#[async_trait]
impl NameRpc for StubRpc {
    async fn resolve_name(&self, _name: &str) -> Result<Option<Address>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.delay).await;
        Ok(self.address)
    }

    async fn resolve_avatar(&self, _name: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.avatar_delay).await;
        Ok(self.avatar.clone())
    }
}

fn settings() -> ResolverSettings {
    ResolverSettings {
        fast_path_timeout_ms: 40,
        slow_path_timeout_ms: 80,
        avatar_timeout_ms: 30,
        ..Default::default()
    }
}

fn resolver(api: Arc<StubApi>, rpc: Arc<StubRpc>) -> AddressResolver {
    AddressResolver::new(api, rpc, &settings())
}

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[test]
fn test_year_boundary_round() {
    let status = |now: &str| compute_status_at("2025-12-31", "2026-01-02", None, None, at(now)).unwrap();

    assert_eq!(status("2025-12-31T11:00:00Z"), RoundStatus::Upcoming);
    assert_eq!(status("2025-12-31T20:00:00Z"), RoundStatus::Active);
    assert_eq!(status("2026-01-01T00:00:00Z"), RoundStatus::Active);
    assert_eq!(status("2026-01-03T12:00:00Z"), RoundStatus::Closed);
}

#[test]
fn test_avatar_safety() {
    assert!(is_avatar_safe("https://metadata.ens.domains/mainnet/avatar/nick.eth"));
    assert!(!is_avatar_safe("http://metadata.ens.domains/mainnet/avatar/nick.eth"));
    assert!(!is_avatar_safe("https://example.com/a.png"));
}

#[tokio::test]
async fn test_literal_address_makes_no_calls() {
    let api = Arc::new(StubApi::default());
    let rpc = Arc::new(StubRpc::default());

    let result = resolver(api.clone(), rpc.clone()).resolve(VITALIK).await;

    assert!(result.success);
    assert_eq!(result.input_type, InputType::Address);
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    assert_eq!(rpc.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_inputs_make_no_calls() {
    let api = Arc::new(StubApi::default());
    let rpc = Arc::new(StubRpc::default());
    let r = resolver(api.clone(), rpc.clone());

    for input in ["", "not-an-address-or-name"] {
        let result = r.resolve(input).await;
        assert!(!result.success);
        assert_eq!(result.input_type, InputType::Invalid);
    }
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    assert_eq!(rpc.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_name_is_normalized_before_lookup() {
    let api = Arc::new(StubApi {
        address: Some(VITALIK.to_string()),
        ..Default::default()
    });
    let rpc = Arc::new(StubRpc::default());

    let result = resolver(api.clone(), rpc.clone()).resolve("  VITALIK.eth ").await;

    assert!(result.success);
    assert_eq!(*api.names.lock().unwrap(), vec!["vitalik.eth".to_string()]);
    assert_eq!(rpc.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fast_path_timeout_falls_back_to_rpc() {
    let api = Arc::new(StubApi {
        address: Some(VITALIK.to_string()),
        delay: Duration::from_millis(500),
        ..Default::default()
    });
    let rpc = Arc::new(StubRpc {
        address: Some(Address::from_str(VITALIK).unwrap()),
        ..Default::default()
    });

    let result = resolver(api, rpc.clone()).resolve("vitalik.eth").await;

    assert!(result.success);
    assert_eq!(result.address.as_deref(), Some(VITALIK));
    assert_eq!(result.input_type, InputType::Ens);
    assert!(rpc.calls.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_slow_path_timeout_is_not_found() {
    let api = Arc::new(StubApi::default());
    let rpc = Arc::new(StubRpc {
        address: Some(Address::from_str(VITALIK).unwrap()),
        delay: Duration::from_millis(500),
        ..Default::default()
    });

    let result = resolver(api, rpc).resolve("vitalik.eth").await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("ENS name not found"));
    assert_eq!(result.input_type, InputType::Ens);
}

#[tokio::test]
async fn test_slow_avatar_is_omitted() {
    let api = Arc::new(StubApi::default());
    let rpc = Arc::new(StubRpc {
        address: Some(Address::from_str(VITALIK).unwrap()),
        avatar: Some("https://euc.li/vitalik.eth".to_string()),
        avatar_delay: Duration::from_millis(500),
        ..Default::default()
    });

    let result = resolver(api, rpc).resolve("vitalik.eth").await;

    assert!(result.success);
    assert_eq!(result.address.as_deref(), Some(VITALIK));
    assert!(result.avatar.is_none());
}

#[tokio::test]
async fn test_avatar_lookup_stays_inside_slow_path_limit() {
    let api = Arc::new(StubApi::default());
    let rpc = Arc::new(StubRpc {
        address: Some(Address::from_str(VITALIK).unwrap()),
        avatar: Some("https://euc.li/vitalik.eth".to_string()),
        delay: Duration::from_millis(180),
        avatar_delay: Duration::from_secs(5),
        ..Default::default()
    });
    let settings = ResolverSettings {
        fast_path_timeout_ms: 40,
        slow_path_timeout_ms: 200,
        avatar_timeout_ms: 150,
        ..Default::default()
    };
    let r = AddressResolver::new(api, rpc, &settings);

    let started = std::time::Instant::now();
    let result = r.resolve("vitalik.eth").await;
    let elapsed = started.elapsed();

    assert!(result.success);
    assert!(result.avatar.is_none());
    // Fast path (~0ms here) plus the 200ms slow-path bound, with scheduling slack
    assert!(elapsed < Duration::from_millis(290), "took {:?}", elapsed);
}
