use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serenity::async_trait;
use serenity::model::id::ChannelId;
use tokio::sync::Notify;

use ratechart::api::ratesapi::{parse_rates_body, ApiError};
use ratechart::services::rates_service::snapshot_from_response;
use ratechart::services::session_service::{self, FetchOutcome, LoadStatus};
use ratechart::traits::RatesSource;
use ratechart::RatesSnapshot;

const ENDPOINT: &str = "https://rates.test/api";

/// Serves canned bodies per URL; a URL with a gate waits until it is opened
#[derive(Default)]
struct ScriptedSource {
    bodies: HashMap<String, String>,
    gates: HashMap<String, Arc<Notify>>,
}

impl ScriptedSource {
    fn serve(mut self, path: &str, body: &str) -> Self {
        self.bodies.insert(format!("{}{}", ENDPOINT, path), body.to_string());
        self
    }

    fn gate(mut self, path: &str) -> (Self, Arc<Notify>) {
        let notify = Arc::new(Notify::new());
        self.gates.insert(format!("{}{}", ENDPOINT, path), notify.clone());
        (self, notify)
    }
}

#[async_trait]
impl RatesSource for ScriptedSource {
    async fn fetch_snapshot(&self, url: &str) -> Result<RatesSnapshot, ApiError> {
        if let Some(gate) = self.gates.get(url) {
            gate.notified().await;
        }
        let body = self.bodies.get(url).ok_or_else(|| ApiError::HttpStatus {
            status: 404,
            body: format!("no fixture for {}", url),
        })?;
        snapshot_from_response(parse_rates_body(body)?)
    }
}

const LATEST: &str = r#"{"base":"EUR","date":"2024-05-31","rates":{"USD":1.0848,"JPY":170.55,"GBP":0.85155,"BTC":0.0000161}}"#;
const JAN_2020: &str = r#"{"base":"EUR","date":"2020-01-01","rates":{"USD":1.1234,"JPY":121.94,"GBP":0.8508}}"#;
const JAN_2020_USD: &str = r#"{"base":"USD","date":"2020-01-01","rates":{"EUR":0.8902,"JPY":108.55,"GBP":0.7574}}"#;
const JAN_2020_USD_FILTERED: &str = r#"{"base":"USD","date":"2020-01-01","rates":{"JPY":108.55,"GBP":0.7574}}"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn codes(snapshot: &RatesSnapshot) -> Vec<String> {
    snapshot.codes().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_date_base_symbols_reset_flow() {
    let source = ScriptedSource::default()
        .serve("/latest", LATEST)
        .serve("/2020-01-01", JAN_2020)
        .serve("/2020-01-01?base=USD", JAN_2020_USD)
        .serve("/2020-01-01?base=USD&symbols=GBP,JPY", JAN_2020_USD_FILTERED);
    let store = session_service::new_store();
    let channel = ChannelId::new(1001);

    // initial load: unknown codes never reach the chart
    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.begin_fetch()).await;
    match session_service::run_fetch(&store, channel, &source, ticket).await {
        FetchOutcome::Applied(snapshot) => assert_eq!(codes(&snapshot), vec!["GBP", "JPY", "USD"]),
        other => panic!("unexpected outcome: {:?}", other),
    }

    let date = session_service::parse_chart_date("2020-01-01", today()).unwrap();
    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.select_date(date, today()))
        .await
        .unwrap();
    assert_eq!(ticket.url, format!("{}/2020-01-01", ENDPOINT));
    session_service::run_fetch(&store, channel, &source, ticket).await;

    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.select_base("USD"))
        .await
        .unwrap();
    assert_eq!(ticket.url, format!("{}/2020-01-01?base=USD", ENDPOINT));
    session_service::run_fetch(&store, channel, &source, ticket).await;

    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| {
        s.toggle("JPY").unwrap();
        s.toggle("GBP").unwrap();
        s.submit()
    })
    .await;
    assert_eq!(ticket.url, format!("{}/2020-01-01?base=USD&symbols=GBP,JPY", ENDPOINT));
    match session_service::run_fetch(&store, channel, &source, ticket).await {
        FetchOutcome::Applied(snapshot) => {
            assert_eq!(snapshot.base.as_str(), "USD");
            assert_eq!(codes(&snapshot), vec!["GBP", "JPY"]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.reset()).await;
    assert_eq!(ticket.url, format!("{}/latest", ENDPOINT));
    session_service::run_fetch(&store, channel, &source, ticket).await;

    let (base, selected) = session_service::with_session(&store, channel, ENDPOINT, |s| {
        (s.selection().effective_base().to_string(), s.selected_symbols())
    })
    .await;
    assert_eq!(base, "EUR");
    assert!(selected.is_empty());
}

#[tokio::test]
async fn test_resubmitting_gives_same_chart_data() {
    let source = ScriptedSource::default()
        .serve("/latest", LATEST)
        .serve("/latest?symbols=USD", r#"{"base":"EUR","date":"2024-05-31","rates":{"USD":1.0848}}"#);
    let store = session_service::new_store();
    let channel = ChannelId::new(1002);

    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.begin_fetch()).await;
    session_service::run_fetch(&store, channel, &source, ticket).await;

    let mut results = Vec::new();
    for _ in 0..2 {
        let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| {
            if s.selected_symbols().is_empty() {
                s.toggle("USD").unwrap();
            }
            s.submit()
        })
        .await;
        let url = ticket.url.clone();
        match session_service::run_fetch(&store, channel, &source, ticket).await {
            FetchOutcome::Applied(snapshot) => results.push((url, snapshot)),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    assert_eq!(results[0], results[1]);
}

#[tokio::test]
async fn test_slow_older_response_cannot_overwrite_newer() {
    let (source, usd_gate) = ScriptedSource::default()
        .serve("/latest", LATEST)
        .serve("/latest?base=USD", r#"{"base":"USD","date":"2024-05-31","rates":{"EUR":0.9218}}"#)
        .serve("/latest?base=GBP", r#"{"base":"GBP","date":"2024-05-31","rates":{"EUR":1.1743}}"#)
        .gate("/latest?base=USD");
    let source = Arc::new(source);
    let store = session_service::new_store();
    let channel = ChannelId::new(1003);

    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.begin_fetch()).await;
    session_service::run_fetch(&store, channel, source.as_ref(), ticket).await;

    let slow_ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.select_base("USD"))
        .await
        .unwrap();
    let slow = {
        let store = store.clone();
        let source = source.clone();
        tokio::spawn(async move {
            session_service::run_fetch(&store, channel, source.as_ref(), slow_ticket).await
        })
    };

    let fast_ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.select_base("GBP"))
        .await
        .unwrap();
    let fast = session_service::run_fetch(&store, channel, source.as_ref(), fast_ticket).await;
    assert!(matches!(fast, FetchOutcome::Applied(_)));

    usd_gate.notify_one();
    let slow = slow.await.unwrap();
    assert!(matches!(slow, FetchOutcome::Stale));

    let base = session_service::with_session(&store, channel, ENDPOINT, |s| {
        s.snapshot().map(|snap| snap.base.to_string())
    })
    .await;
    assert_eq!(base.as_deref(), Some("GBP"));
}

#[tokio::test]
async fn test_failed_load_keeps_previous_chart() {
    let source = ScriptedSource::default().serve("/latest", LATEST);
    let store = session_service::new_store();
    let channel = ChannelId::new(1004);

    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.begin_fetch()).await;
    session_service::run_fetch(&store, channel, &source, ticket).await;

    // no fixture for this URL, so the source answers 404
    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.select_base("JPY"))
        .await
        .unwrap();
    match session_service::run_fetch(&store, channel, &source, ticket).await {
        FetchOutcome::Failed { error, last_good } => {
            assert!(matches!(error, ApiError::HttpStatus { status: 404, .. }));
            assert_eq!(last_good.map(|s| s.base.to_string()).as_deref(), Some("EUR"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let status = session_service::with_session(&store, channel, ENDPOINT, |s| s.status().clone()).await;
    assert!(matches!(status, LoadStatus::Failed(_)));
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let source = ScriptedSource::default().serve("/latest", r#"{"base":"EUR","rates":[1,2,3]}"#);
    let store = session_service::new_store();
    let channel = ChannelId::new(1005);

    let ticket = session_service::with_session(&store, channel, ENDPOINT, |s| s.begin_fetch()).await;
    match session_service::run_fetch(&store, channel, &source, ticket).await {
        FetchOutcome::Failed { error, last_good } => {
            assert!(matches!(error, ApiError::MalformedResponse(_)));
            assert!(last_good.is_none());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
