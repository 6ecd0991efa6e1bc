//! Debounced address suggestions for one search box
//!
//! Every input change bumps a session-local generation counter. Only the
//! response to the query of the current generation is ever published, no
//! matter in which order provider responses arrive.
//!
//! Lifecycle per input: `Idle -> Debouncing -> Fetching -> Idle`. A debounce
//! timer is a spawned task that is aborted by the next input change. Once the
//! timer fires the provider request runs in its own task, so a later abort
//! never cancels a request that is already in flight; its result is simply
//! dropped if a newer generation exists by then.

use std::sync::Arc;
use std::time::Duration;

use domain::{GeocodingError, ResolvedLocation, SearchQuery, SuggestionCandidate};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::ports::GeocodingPort;

/// Tuning of a suggestion session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Quiet period after the last keystroke before searching (default: 800)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum trimmed query length in characters (default: 3)
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Maximum number of candidates shown (default: 5)
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// How long after a blur a refocus restores the list (default: 200)
    #[serde(default = "default_focus_grace_ms")]
    pub focus_grace_ms: u64,
}

const fn default_debounce_ms() -> u64 {
    800
}

const fn default_min_query_chars() -> usize {
    3
}

const fn default_max_suggestions() -> usize {
    5
}

const fn default_focus_grace_ms() -> u64 {
    200
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            max_suggestions: default_max_suggestions(),
            focus_grace_ms: default_focus_grace_ms(),
        }
    }
}

impl SuggestionConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_suggestions == 0 {
            return Err("suggestions.max_suggestions must be greater than 0".to_string());
        }
        if self.min_query_chars == 0 {
            return Err("suggestions.min_query_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Debounce delay as a duration
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    const fn focus_grace(&self) -> Duration {
        Duration::from_millis(self.focus_grace_ms)
    }
}

/// Where the session currently is in its fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing pending
    Idle,
    /// Waiting for the debounce timer
    Debouncing,
    /// A provider request for the current generation is in flight
    Fetching,
}

/// What subscribers of a session observe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionSnapshot {
    /// Generation the candidates belong to
    pub generation: u64,
    /// Candidates in provider order
    pub candidates: Vec<SuggestionCandidate>,
    /// Whether the list should be shown
    pub visible: bool,
}

impl Default for SuggestionSnapshot {
    fn default() -> Self {
        Self {
            generation: 0,
            candidates: Vec::new(),
            visible: true,
        }
    }
}

#[derive(Debug)]
struct SessionState {
    generation: u64,
    phase: SessionPhase,
    timer: Option<JoinHandle<()>>,
    candidates: Vec<SuggestionCandidate>,
    visible: bool,
    blurred_at: Option<Instant>,
}

impl SessionState {
    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn snapshot(&self) -> SuggestionSnapshot {
        SuggestionSnapshot {
            generation: self.generation,
            candidates: self.candidates.clone(),
            visible: self.visible,
        }
    }
}

struct SessionInner {
    geocoder: Arc<dyn GeocodingPort>,
    config: SuggestionConfig,
    state: Mutex<SessionState>,
    tx: watch::Sender<SuggestionSnapshot>,
}

impl SessionInner {
    fn publish(&self, state: &SessionState) {
        self.tx.send_replace(state.snapshot());
    }

    /// Called by the debounce timer once the quiet period has elapsed
    fn start_fetch(self: Arc<Self>, query: SearchQuery) {
        {
            let mut state = self.state.lock();
            if query.is_superseded_by(state.generation) {
                return;
            }
            state.phase = SessionPhase::Fetching;
            // Detach: the fetch below must outlive any later abort
            state.timer = None;
        }

        tokio::spawn(async move {
            debug!(generation = query.generation, query = %query.text, "Fetching suggestions");
            let result = self
                .geocoder
                .search_candidates(&query.text, self.config.max_suggestions)
                .await;
            self.complete(&query, result);
        });
    }

    fn complete(
        &self,
        query: &SearchQuery,
        result: Result<Vec<SuggestionCandidate>, GeocodingError>,
    ) {
        let mut state = self.state.lock();
        if query.is_superseded_by(state.generation) {
            debug!(
                generation = query.generation,
                current = state.generation,
                "Dropping superseded suggestions"
            );
            return;
        }

        state.candidates = match result {
            Ok(mut candidates) => {
                candidates.truncate(self.config.max_suggestions);
                candidates
            },
            Err(e) => {
                warn!(error = %e, query = %query.text, "Suggestion search failed");
                Vec::new()
            },
        };
        state.phase = SessionPhase::Idle;
        self.publish(&state);
    }
}

/// Debounced suggestion lifecycle for a single search box
///
/// Sessions share no state with each other. Spawning requires a Tokio
/// runtime; dropping the session aborts a pending timer and invalidates any
/// in-flight request.
pub struct SuggestionSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SuggestionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("SuggestionSession")
            .field("config", &self.inner.config)
            .field("generation", &state.generation)
            .field("phase", &state.phase)
            .finish_non_exhaustive()
    }
}

impl SuggestionSession {
    /// Create an idle session searching through the given geocoder
    #[must_use]
    pub fn new(geocoder: Arc<dyn GeocodingPort>, config: SuggestionConfig) -> Self {
        let (tx, _rx) = watch::channel(SuggestionSnapshot::default());
        Self {
            inner: Arc::new(SessionInner {
                geocoder,
                config,
                state: Mutex::new(SessionState {
                    generation: 0,
                    phase: SessionPhase::Idle,
                    timer: None,
                    candidates: Vec::new(),
                    visible: true,
                    blurred_at: None,
                }),
                tx,
            }),
        }
    }

    /// Handle a change of the search box text
    ///
    /// Returns the generation assigned to this input.
    pub fn on_input(&self, text: impl Into<String>) -> u64 {
        let mut state = self.inner.state.lock();
        state.generation += 1;
        state.abort_timer();
        state.visible = true;
        state.blurred_at = None;

        let query = SearchQuery::new(text, state.generation);
        if query.trimmed_len() < self.inner.config.min_query_chars {
            state.candidates.clear();
            state.phase = SessionPhase::Idle;
            self.inner.publish(&state);
            return query.generation;
        }

        state.phase = SessionPhase::Debouncing;
        let generation = query.generation;
        let debounce = self.inner.config.debounce();
        let inner = Arc::clone(&self.inner);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            inner.start_fetch(query);
        }));

        generation
    }

    /// Choose the candidate at `index` of the current list
    ///
    /// Returns `None` if there is no such candidate. Selecting never contacts
    /// the provider.
    pub fn select(&self, index: usize) -> Option<ResolvedLocation> {
        let mut state = self.inner.state.lock();
        let candidate = state.candidates.get(index).cloned()?;
        Some(self.finish_selection(&mut state, candidate))
    }

    /// Choose a specific candidate
    pub fn select_candidate(&self, candidate: SuggestionCandidate) -> ResolvedLocation {
        let mut state = self.inner.state.lock();
        self.finish_selection(&mut state, candidate)
    }

    fn finish_selection(
        &self,
        state: &mut SessionState,
        candidate: SuggestionCandidate,
    ) -> ResolvedLocation {
        state.generation += 1;
        state.abort_timer();
        state.candidates.clear();
        state.phase = SessionPhase::Idle;
        state.blurred_at = None;
        self.inner.publish(state);

        debug!(address = %candidate.address, "Suggestion selected");
        candidate.into_resolved()
    }

    /// Hide the list without cancelling anything
    pub fn blur(&self) {
        let mut state = self.inner.state.lock();
        state.visible = false;
        state.blurred_at = Some(Instant::now());
        self.inner.publish(&state);
    }

    /// Show the list again
    ///
    /// Within the grace window after a blur the stored candidates reappear,
    /// including ones that arrived while hidden. Later, they are cleared.
    pub fn focus(&self) {
        let mut state = self.inner.state.lock();
        let grace = self.inner.config.focus_grace();
        if state.blurred_at.take().is_some_and(|at| at.elapsed() > grace) {
            state.candidates.clear();
        }
        state.visible = true;
        self.inner.publish(&state);
    }

    /// Subscribe to published snapshots
    pub fn subscribe(&self) -> watch::Receiver<SuggestionSnapshot> {
        self.inner.tx.subscribe()
    }

    /// Most recently published snapshot
    pub fn snapshot(&self) -> SuggestionSnapshot {
        self.inner.tx.borrow().clone()
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.inner.state.lock().generation
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        self.inner.state.lock().phase
    }

    /// Session configuration
    pub fn config(&self) -> &SuggestionConfig {
        &self.inner.config
    }
}

impl Drop for SuggestionSession {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        state.generation += 1;
        state.abort_timer();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use domain::Coordinates;

    use super::*;

    /// Geocoder that records every search and answers after a per-query delay
    #[derive(Default)]
    struct RecordingGeocoder {
        calls: Mutex<Vec<String>>,
        delays: HashMap<String, Duration>,
        failing: bool,
    }

    impl RecordingGeocoder {
        fn with_delay(mut self, query: &str, delay: Duration) -> Self {
            self.delays.insert(query.to_string(), delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    fn candidates_for(query: &str) -> Vec<SuggestionCandidate> {
        (0..7)
            .map(|i| {
                SuggestionCandidate::new(format!("{query} {i}"), Coordinates::bhubaneswar())
            })
            .collect()
    }

    #[async_trait]
    impl GeocodingPort for RecordingGeocoder {
        async fn forward_geocode(&self, address: &str) -> Result<ResolvedLocation, GeocodingError> {
            Err(GeocodingError::AddressNotFound(address.to_string()))
        }

        async fn reverse_geocode(&self, coordinates: Coordinates) -> String {
            coordinates.to_string()
        }

        async fn search_candidates(
            &self,
            query: &str,
            _limit: usize,
        ) -> Result<Vec<SuggestionCandidate>, GeocodingError> {
            self.calls.lock().push(query.to_string());
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing {
                return Err(GeocodingError::NetworkError("connection reset".to_string()));
            }
            Ok(candidates_for(query))
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    fn session(geocoder: &Arc<RecordingGeocoder>) -> SuggestionSession {
        SuggestionSession::new(
            Arc::clone(geocoder) as Arc<dyn GeocodingPort>,
            SuggestionConfig::default(),
        )
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_search() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        for text in ["p", "pi", "piz", "pizz", "pizza"] {
            session.on_input(text);
            advance(100).await;
        }
        advance(1_000).await;

        assert_eq!(geocoder.calls(), vec!["pizza".to_string()]);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.generation, 5);
        assert_eq!(snapshot.candidates.len(), 5);
        assert_eq!(snapshot.candidates[0].address, "pizza 0");
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_clears_without_network() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        let generation = session.on_input("pi");
        let snapshot = session.snapshot();
        assert_eq!(snapshot.generation, generation);
        assert!(snapshot.candidates.is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);

        advance(2_000).await;
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_does_not_count_towards_minimum() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        session.on_input("  pi   ");
        advance(2_000).await;
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_debounce_period() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        session.on_input("pizza");
        assert_eq!(session.phase(), SessionPhase::Debouncing);

        advance(799).await;
        assert!(geocoder.calls().is_empty());

        advance(2).await;
        assert_eq!(geocoder.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_superseded_query_is_dropped() {
        let geocoder = Arc::new(
            RecordingGeocoder::default()
                .with_delay("pizza", Duration::from_millis(2_000))
                .with_delay("pizzeria", Duration::from_millis(100)),
        );
        let session = session(&geocoder);
        let mut rx = session.subscribe();

        session.on_input("pizza");
        advance(900).await;
        assert_eq!(session.phase(), SessionPhase::Fetching);

        let current = session.on_input("pizzeria");
        advance(1_000).await;
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.generation, current);
        assert_eq!(snapshot.candidates[0].address, "pizzeria 0");

        // "pizza" answers at 2800 ms
        advance(2_000).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(session.snapshot().candidates[0].address, "pizzeria 0");
        assert_eq!(
            geocoder.calls(),
            vec!["pizza".to_string(), "pizzeria".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_search_publishes_empty_list() {
        let geocoder = Arc::new(RecordingGeocoder {
            failing: true,
            ..Default::default()
        });
        let session = session(&geocoder);

        session.on_input("pizza");
        advance(1_000).await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.generation, 1);
        assert!(snapshot.candidates.is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn select_returns_candidate_without_network() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        session.on_input("patia");
        advance(1_000).await;
        let expected = session.snapshot().candidates[1].clone();

        let resolved = session.select(1).unwrap();
        assert_eq!(resolved.address, expected.address);
        assert_eq!(resolved.coordinates, expected.coordinates);
        assert_eq!(geocoder.calls().len(), 1);

        let snapshot = session.snapshot();
        assert!(snapshot.candidates.is_empty());
        assert_eq!(snapshot.generation, 2);
        assert!(session.select(0).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn select_invalidates_in_flight_search() {
        let geocoder =
            Arc::new(RecordingGeocoder::default().with_delay("patia", Duration::from_millis(500)));
        let session = session(&geocoder);

        session.on_input("patia");
        advance(900).await;
        let chosen = SuggestionCandidate::new("Janpath", Coordinates::bhubaneswar());
        let resolved = session.select_candidate(chosen.clone());
        assert_eq!(resolved, chosen.into_resolved());

        advance(1_000).await;
        assert!(session.snapshot().candidates.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn refocus_within_grace_restores_candidates() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        session.on_input("pizza");
        advance(1_000).await;

        session.blur();
        let hidden = session.snapshot();
        assert!(!hidden.visible);
        assert_eq!(hidden.candidates.len(), 5);

        advance(100).await;
        session.focus();
        let shown = session.snapshot();
        assert!(shown.visible);
        assert_eq!(shown.candidates.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn refocus_after_grace_clears_candidates() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        session.on_input("pizza");
        advance(1_000).await;

        session.blur();
        advance(500).await;
        session.focus();

        let snapshot = session.snapshot();
        assert!(snapshot.visible);
        assert!(snapshot.candidates.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn results_arriving_while_blurred_show_on_refocus() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        session.on_input("pizza");
        advance(700).await;
        session.blur();
        advance(150).await;

        assert_eq!(geocoder.calls().len(), 1);
        assert!(!session.snapshot().visible);

        session.focus();
        assert_eq!(session.snapshot().candidates.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_session_cancels_pending_timer() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let session = session(&geocoder);

        session.on_input("pizza");
        drop(session);
        advance(2_000).await;

        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_are_independent() {
        let geocoder = Arc::new(RecordingGeocoder::default());
        let first = session(&geocoder);
        let second = session(&geocoder);

        first.on_input("pizza");
        second.on_input("tacos");
        advance(1_000).await;

        assert_eq!(first.snapshot().candidates[0].address, "pizza 0");
        assert_eq!(second.snapshot().candidates[0].address, "tacos 0");
        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 1);
    }

    #[test]
    fn config_defaults_and_validation() {
        let config = SuggestionConfig::default();
        assert_eq!(config.debounce_ms, 800);
        assert_eq!(config.min_query_chars, 3);
        assert_eq!(config.max_suggestions, 5);
        assert_eq!(config.focus_grace_ms, 200);
        assert!(config.validate().is_ok());

        let invalid = SuggestionConfig {
            max_suggestions: 0,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }
}
