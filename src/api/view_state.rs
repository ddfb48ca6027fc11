use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{AlignedSeriesMatrix, Alignment, AlignmentReport, CursorQuery, TooltipPayload};
use crate::error::{ScopeError, ScopeResult};
use crate::interaction::{CursorEvent, TooltipState, TooltipTracker, tooltip_lines};

use super::request::normalize_country_codes;
use super::{
    AggregationFunc, ChartViewConfig, Metric, ScopeRequest, ScopeResponse, SeriesOption,
    series_options,
};

/// User-editable filter selection; dates stay optional until picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub metric: Metric,
    pub aggregation: AggregationFunc,
    pub countries: Vec<String>,
}

impl FilterState {
    /// Builds the request for the current selection.
    pub fn to_request(&self) -> ScopeResult<ScopeRequest> {
        let start_date = self
            .start_date
            .ok_or(ScopeError::MissingParameter("startDate"))?;
        let end_date = self.end_date.ok_or(ScopeError::MissingParameter("endDate"))?;
        Ok(ScopeRequest::new(start_date, end_date, self.metric)?
            .with_aggregation(self.aggregation)
            .with_countries(&self.countries))
    }
}

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one issued fetch.
///
/// Only [`ScopeView::begin_fetch`] creates tokens; a token is bound to the
/// view that issued it and its sequence is monotonic within that view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestToken {
    view: u64,
    sequence: u64,
}

impl RequestToken {
    #[must_use]
    pub fn sequence(self) -> u64 {
        self.sequence
    }
}

/// What the chart area currently shows.
#[derive(Debug, Clone, Default)]
pub enum ChartPhase {
    /// Nothing fetched for the current filters.
    #[default]
    Unfetched,
    /// Fetch succeeded with zero usable rows; hosts render a "no data" indicator.
    NoData { report: AlignmentReport },
    /// Immutable snapshot, replaced wholesale by the next commit.
    Ready { alignment: Arc<Alignment> },
}

/// Result of committing a fetch response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied {
        timestamps: usize,
        entities: usize,
        dropped_rows: usize,
    },
    NoData {
        dropped_rows: usize,
    },
    /// The response carried an error; the chart is left untouched.
    UpstreamFailure {
        message: String,
    },
    /// Filters changed or a newer response was already committed.
    Stale,
    /// The token was not issued by this view; nothing is committed.
    UnknownToken,
}

/// Filter/fetch state machine for one chart view.
///
/// Every filter change returns the chart to [`ChartPhase::Unfetched`] and
/// invalidates tokens issued before it. Among responses for the current
/// filters, a response older than the last committed one is discarded, so the
/// latest issued fetch always wins.
#[derive(Debug)]
pub struct ScopeView {
    config: ChartViewConfig,
    filters: FilterState,
    phase: ChartPhase,
    last_error: Option<String>,
    tooltip: TooltipTracker,
    view_id: u64,
    next_sequence: u64,
    filter_epoch: u64,
    committed_sequence: Option<u64>,
}

impl Default for ScopeView {
    fn default() -> Self {
        Self::with_valid_config(ChartViewConfig::default())
    }
}

impl ScopeView {
    pub fn new(config: ChartViewConfig) -> ScopeResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ChartViewConfig) -> Self {
        Self {
            config,
            filters: FilterState::default(),
            phase: ChartPhase::Unfetched,
            last_error: None,
            tooltip: TooltipTracker::default(),
            view_id: NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed),
            next_sequence: 0,
            filter_epoch: 0,
            committed_sequence: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ChartViewConfig {
        &self.config
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub fn phase(&self) -> &ChartPhase {
        &self.phase
    }

    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self.phase, ChartPhase::NoData { .. })
    }

    #[must_use]
    pub fn matrix(&self) -> Option<&AlignedSeriesMatrix> {
        match &self.phase {
            ChartPhase::Ready { alignment } => Some(&alignment.matrix),
            _ => None,
        }
    }

    /// Shared handle to the committed snapshot.
    #[must_use]
    pub fn alignment(&self) -> Option<Arc<Alignment>> {
        match &self.phase {
            ChartPhase::Ready { alignment } => Some(Arc::clone(alignment)),
            _ => None,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&AlignmentReport> {
        match &self.phase {
            ChartPhase::Unfetched => None,
            ChartPhase::NoData { report } => Some(report),
            ChartPhase::Ready { alignment } => Some(&alignment.report),
        }
    }

    /// Message from the last failed response for the current filters.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        if self.filters.start_date != date {
            self.filters.start_date = date;
            self.invalidate("start_date");
        }
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        if self.filters.end_date != date {
            self.filters.end_date = date;
            self.invalidate("end_date");
        }
    }

    pub fn set_metric(&mut self, metric: Metric) {
        if self.filters.metric != metric {
            self.filters.metric = metric;
            self.invalidate("metric");
        }
    }

    pub fn set_aggregation(&mut self, aggregation: AggregationFunc) {
        if self.filters.aggregation != aggregation {
            self.filters.aggregation = aggregation;
            self.invalidate("aggregation");
        }
    }

    /// Adds `code` when absent, removes it when present.
    ///
    /// Returns whether the code is selected afterwards.
    pub fn toggle_country(&mut self, code: &str) -> bool {
        let Some(code) = normalize_country_codes([code]).pop() else {
            return false;
        };
        let selected = match self.filters.countries.iter().position(|c| *c == code) {
            Some(slot) => {
                self.filters.countries.remove(slot);
                false
            }
            None => {
                self.filters.countries.push(code);
                true
            }
        };
        self.invalidate("countries");
        selected
    }

    pub fn set_countries<I, S>(&mut self, countries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let countries = normalize_country_codes(countries);
        if self.filters.countries != countries {
            self.filters.countries = countries;
            self.invalidate("countries");
        }
    }

    /// Validates the filters and issues a token for a new fetch.
    pub fn begin_fetch(&mut self) -> ScopeResult<(RequestToken, ScopeRequest)> {
        let request = self.filters.to_request()?;
        let token = RequestToken {
            view: self.view_id,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        debug!(sequence = token.sequence, metric = %request.metric, "issued fetch");
        Ok((token, request))
    }

    /// Commits a response for `token` unless it is stale or foreign.
    pub fn commit(&mut self, token: RequestToken, response: ScopeResponse) -> CommitOutcome {
        if !self.issued(token) {
            warn!(
                sequence = token.sequence,
                view = token.view,
                "rejecting response for a token this view never issued"
            );
            return CommitOutcome::UnknownToken;
        }
        if self.is_stale(token) {
            debug!(
                sequence = token.sequence,
                filter_epoch = self.filter_epoch,
                committed = ?self.committed_sequence,
                "discarding stale response"
            );
            return CommitOutcome::Stale;
        }
        self.committed_sequence = Some(token.sequence);

        let alignment = match response.into_alignment() {
            Ok(alignment) => alignment,
            Err(err) => {
                let message = match err {
                    ScopeError::Upstream(message) => message,
                    other => other.to_string(),
                };
                warn!(sequence = token.sequence, error = %message, "fetch failed, chart unchanged");
                self.last_error = Some(message.clone());
                return CommitOutcome::UpstreamFailure { message };
            }
        };

        self.last_error = None;
        self.tooltip.on_pointer_leave();
        let dropped_rows = alignment.report.dropped_rows;
        if alignment.matrix.is_empty() {
            debug!(sequence = token.sequence, dropped_rows, "committed empty result");
            self.phase = ChartPhase::NoData {
                report: alignment.report,
            };
            return CommitOutcome::NoData { dropped_rows };
        }

        let outcome = CommitOutcome::Applied {
            timestamps: alignment.matrix.len(),
            entities: alignment.matrix.entity_count(),
            dropped_rows,
        };
        debug!(sequence = token.sequence, ?outcome, "committed aligned matrix");
        self.phase = ChartPhase::Ready {
            alignment: Arc::new(alignment),
        };
        outcome
    }

    /// Parses a raw response body and commits it.
    pub fn commit_json(&mut self, token: RequestToken, body: &str) -> ScopeResult<CommitOutcome> {
        let response = ScopeResponse::from_json_str(body)?;
        Ok(self.commit(token, response))
    }

    #[must_use]
    pub fn series_options(&self) -> Vec<SeriesOption> {
        self.matrix()
            .map(|matrix| series_options(matrix, &self.config))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn resolve_cursor(&self, query: CursorQuery) -> Option<TooltipPayload> {
        crate::core::resolve(self.matrix()?, query)
    }

    /// Feeds a plotting-surface cursor event into the tooltip.
    pub fn pointer_moved(&mut self, event: CursorEvent) -> bool {
        let matrix = match &self.phase {
            ChartPhase::Ready { alignment } => Some(&alignment.matrix),
            _ => None,
        };
        self.tooltip.on_cursor(matrix, event)
    }

    pub fn pointer_left(&mut self) {
        self.tooltip.on_pointer_leave();
    }

    #[must_use]
    pub fn tooltip(&self) -> &TooltipState {
        self.tooltip.state()
    }

    /// Formatted tooltip lines, empty while the tooltip is hidden.
    #[must_use]
    pub fn tooltip_lines(&self) -> Vec<String> {
        match &self.tooltip.state().payload {
            Some(payload) if self.tooltip.state().visible => tooltip_lines(payload, &self.config),
            _ => Vec::new(),
        }
    }

    fn issued(&self, token: RequestToken) -> bool {
        token.view == self.view_id && token.sequence < self.next_sequence
    }

    fn is_stale(&self, token: RequestToken) -> bool {
        token.sequence < self.filter_epoch
            || self.committed_sequence.is_some_and(|c| token.sequence <= c)
    }

    fn invalidate(&mut self, field: &'static str) {
        self.filter_epoch = self.next_sequence;
        self.phase = ChartPhase::Unfetched;
        self.last_error = None;
        self.tooltip.on_pointer_leave();
        debug!(field, filter_epoch = self.filter_epoch, "filters changed");
    }
}
