use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use serenity::model::id::ChannelId;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::ratesapi::ApiError;
use crate::models::{CurrencyCode, RatesSnapshot, Selection};
use crate::services::query_service;
use crate::traits::RatesSource;
use crate::utils::errors::ChartError;

/// Chart sessions keyed by the channel they live in
pub type SessionStore = Arc<Mutex<HashMap<ChannelId, ChartSession>>>;

/// First day the rates API publishes data for
pub fn earliest_chart_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1999, 1, 4).unwrap_or(NaiveDate::MIN)
}

/// Parse a `YYYY-MM-DD` date and check it lies between the first published day and `today`
pub fn parse_chart_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ChartError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ChartError::InvalidDate(raw.to_string()))?;
    check_chart_date(date, today)?;
    Ok(date)
}

fn check_chart_date(date: NaiveDate, today: NaiveDate) -> Result<(), ChartError> {
    let min = earliest_chart_date();
    if date < min || date > today {
        return Err(ChartError::DateOutOfRange {
            date: date.to_string(),
            min: min.to_string(),
            max: today.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    /// Last fetch failed; the previous snapshot is still shown
    Failed(String),
}

/// Tag for one in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub url: String,
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// Result was current and is now the displayed snapshot
    Applied(RatesSnapshot),
    /// A newer request was started after this one; result dropped
    Stale,
    /// Fetch failed; `last_good` is what stays on screen
    Failed {
        error: ApiError,
        last_good: Option<RatesSnapshot>,
    },
}

/// Selection, displayed data and request bookkeeping for one channel's chart
#[derive(Debug, Clone)]
pub struct ChartSession {
    endpoint: String,
    selection: Selection,
    snapshot: Option<RatesSnapshot>,
    toggles: BTreeMap<CurrencyCode, bool>,
    toggles_date: Option<NaiveDate>,
    status: LoadStatus,
    last_seq: u64,
    in_flight: Option<u64>,
}

impl ChartSession {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            selection: Selection::default(),
            snapshot: None,
            toggles: BTreeMap::new(),
            toggles_date: None,
            status: LoadStatus::Idle,
            last_seq: 0,
            in_flight: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn snapshot(&self) -> Option<&RatesSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn current_url(&self) -> String {
        query_service::build_url(&self.endpoint, &self.selection)
    }

    /// Mark a request for the current selection as in flight
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        self.status = LoadStatus::Loading;

        let ticket = FetchTicket {
            seq: self.last_seq,
            url: self.current_url(),
        };
        debug!("Starting fetch #{} for {}", ticket.seq, ticket.url);
        ticket
    }

    /// Date picker: a new date starts from the default base with no symbol filter
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<FetchTicket, ChartError> {
        check_chart_date(date, today)?;
        self.selection = self.selection.with_date(date);
        Ok(self.begin_fetch())
    }

    /// Currencies the base selector offers: the displayed codes plus the current base
    pub fn base_options(&self) -> Vec<CurrencyCode> {
        let mut options: BTreeSet<CurrencyCode> = self
            .snapshot
            .iter()
            .flat_map(|snapshot| snapshot.codes().cloned())
            .collect();
        options.insert(self.selection.effective_base());
        options.into_iter().collect()
    }

    pub fn select_base(&mut self, raw: &str) -> Result<FetchTicket, ChartError> {
        let base = CurrencyCode::parse_known(raw)?;
        if !self.base_options().contains(&base) {
            return Err(ChartError::BaseNotOffered(base.to_string()));
        }

        self.selection = self.selection.with_base(base);
        Ok(self.begin_fetch())
    }

    /// Toggle state in code order
    pub fn toggles(&self) -> impl Iterator<Item = (&CurrencyCode, bool)> {
        self.toggles.iter().map(|(code, selected)| (code, *selected))
    }

    fn toggle_code(&self, raw: &str) -> Result<CurrencyCode, ChartError> {
        if self.toggles.is_empty() {
            return Err(ChartError::NoSnapshot);
        }

        let code: CurrencyCode = raw.parse()?;
        if !self.toggles.contains_key(&code) {
            return Err(ChartError::NotInToggleSet(code.to_string()));
        }
        Ok(code)
    }

    /// Flip one currency and return its new state
    pub fn toggle(&mut self, raw: &str) -> Result<bool, ChartError> {
        let code = self.toggle_code(raw)?;
        let selected = self.toggles.entry(code).or_insert(false);
        *selected = !*selected;
        Ok(*selected)
    }

    /// Flip several currencies. Nothing changes unless every code is in the toggle set.
    pub fn toggle_many(&mut self, raws: &[&str]) -> Result<(), ChartError> {
        let codes = raws
            .iter()
            .map(|raw| self.toggle_code(raw))
            .collect::<Result<Vec<_>, _>>()?;

        for code in codes {
            let selected = self.toggles.entry(code).or_insert(false);
            *selected = !*selected;
        }
        Ok(())
    }

    pub fn selected_symbols(&self) -> Vec<CurrencyCode> {
        self.toggles
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(code, _)| code.clone())
            .collect()
    }

    /// Apply the toggled currencies as the symbol filter. Nothing toggled shows everything.
    pub fn submit(&mut self) -> FetchTicket {
        self.selection = self.selection.with_symbols(self.selected_symbols());
        self.begin_fetch()
    }

    /// Back to the latest rates in the default base with nothing toggled
    pub fn reset(&mut self) -> FetchTicket {
        for selected in self.toggles.values_mut() {
            *selected = false;
        }
        self.selection = Selection::default();
        self.begin_fetch()
    }

    /// Record the result of a fetch. Only the most recently started request may
    /// change what is displayed.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<RatesSnapshot, ApiError>) -> FetchOutcome {
        if self.in_flight != Some(ticket.seq) {
            debug!(
                "Discarding stale response #{} (current: {:?})",
                ticket.seq, self.in_flight
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(snapshot) => {
                if self.toggles_date != Some(snapshot.date) {
                    self.toggles = snapshot.codes().map(|code| (code.clone(), false)).collect();
                    self.toggles_date = Some(snapshot.date);
                }
                self.snapshot = Some(snapshot.clone());
                self.status = LoadStatus::Idle;
                FetchOutcome::Applied(snapshot)
            }
            Err(error) => {
                warn!("Fetch #{} for {} failed: {}", ticket.seq, ticket.url, error);
                self.status = LoadStatus::Failed(error.to_string());
                FetchOutcome::Failed {
                    error,
                    last_good: self.snapshot.clone(),
                }
            }
        }
    }
}

pub fn new_store() -> SessionStore {
    Arc::new(Mutex::new(HashMap::new()))
}

/// Run `action` against the channel's session, creating it on first use
pub async fn with_session<T>(
    store: &SessionStore,
    channel_id: ChannelId,
    endpoint: &str,
    action: impl FnOnce(&mut ChartSession) -> T,
) -> T {
    let mut sessions = store.lock().await;
    let session = sessions.entry(channel_id).or_insert_with(|| {
        info!("Opening chart session for channel {}", channel_id);
        ChartSession::new(endpoint)
    });
    action(session)
}

/// Perform the request behind `ticket` and hand the result to the session.
///
/// The store lock is released for the duration of the request.
pub async fn run_fetch(
    store: &SessionStore,
    channel_id: ChannelId,
    source: &dyn RatesSource,
    ticket: FetchTicket,
) -> FetchOutcome {
    let result = source.fetch_snapshot(&ticket.url).await;

    let mut sessions = store.lock().await;
    match sessions.get_mut(&channel_id) {
        Some(session) => session.complete(&ticket, result),
        None => FetchOutcome::Stale,
    }
}
