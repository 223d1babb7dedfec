use crate::index::store::ContentStore;
use crate::index::types::LiveHit;
use crate::query::QueryEngine;
use crate::utils::app_data::{AppConfig, SnippetStyle};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Help,
}

/// Result from a background query, tagged with the edit that started it
pub struct SearchOutcome {
    pub generation: u64,
    pub query: String,
    pub hits: Result<Vec<LiveHit>, String>,
    pub elapsed: Duration,
}

/// LRU cache size for query results
const SEARCH_CACHE_SIZE: usize = 64;

/// Store and snippet settings shared with worker threads
struct Searcher {
    store: ContentStore,
    batch_style: SnippetStyle,
    live_style: SnippetStyle,
}

impl Searcher {
    fn live_search(&self, query: &str, limit: usize) -> Result<Vec<LiveHit>, String> {
        QueryEngine::new(&self.store, &self.batch_style, &self.live_style)
            .live_search(query, limit)
            .map_err(|e| e.to_string())
    }
}

/// Application state
pub struct App {
    searcher: Arc<Mutex<Searcher>>,
    pub live_style: SnippetStyle,
    limit: usize,
    pub query: String,
    pub results: Vec<LiveHit>,
    pub selected: usize,
    pub mode: Mode,
    pub status_message: String,
    /// Bumped on every query edit; shared with workers so superseded
    /// queries are skipped, and outcomes from older generations are dropped
    generation: Arc<AtomicU64>,
    /// Generation currently running in the background, if any
    in_flight: Option<(u64, Instant)>,
    sender: Sender<SearchOutcome>,
    receiver: Receiver<SearchOutcome>,
    search_cache: LruCache<String, Vec<LiveHit>>,
}

impl App {
    pub fn new(store: ContentStore, config: &AppConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        let searcher = Searcher {
            store,
            batch_style: config.search_snippet.clone(),
            live_style: config.live_snippet.clone(),
        };

        Self {
            searcher: Arc::new(Mutex::new(searcher)),
            live_style: config.live_snippet.clone(),
            limit: config.live_limit,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            mode: Mode::Search,
            status_message: "Type to search".to_string(),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
            sender,
            receiver,
            search_cache: LruCache::new(
                NonZeroUsize::new(SEARCH_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Milliseconds spent on the running query (for display)
    pub fn search_duration_ms(&self) -> Option<u128> {
        self.in_flight.map(|(_, start)| start.elapsed().as_millis())
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.on_query_changed();
    }

    pub fn backspace(&mut self) {
        if self.query.pop().is_some() {
            self.on_query_changed();
        }
    }

    /// Delete word backward from query (Ctrl+W)
    pub fn delete_word(&mut self) {
        let before = self.query.len();
        let trimmed = self.query.trim_end_matches(' ').len();
        let word_start = self.query[..trimmed]
            .rfind(' ')
            .map(|i| i + 1)
            .unwrap_or(0);
        self.query.truncate(word_start);
        if self.query.len() != before {
            self.on_query_changed();
        }
    }

    pub fn clear_query(&mut self) {
        if !self.query.is_empty() {
            self.query.clear();
            self.on_query_changed();
        }
    }

    /// Start a query for the current text, or serve it from the cache
    pub fn on_query_changed(&mut self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.selected = 0;

        if self.query.trim().is_empty() {
            self.results.clear();
            self.in_flight = None;
            self.status_message = "Type to search".to_string();
            return;
        }

        if let Some(cached) = self.search_cache.get(&self.query) {
            self.results = cached.clone();
            self.in_flight = None;
            self.status_message = format!("{} (cached)", found_message(self.results.len()));
            return;
        }

        let query = self.query.clone();
        let limit = self.limit;
        let searcher = Arc::clone(&self.searcher);
        let latest = Arc::clone(&self.generation);
        let sender = self.sender.clone();

        self.status_message = "Searching...".to_string();
        self.in_flight = Some((generation, Instant::now()));

        thread::spawn(move || {
            if let Some(outcome) = run_query(&searcher, &latest, generation, query, limit) {
                let _ = sender.send(outcome);
            }
        });
    }

    /// Drain finished background queries (call this in event loop)
    pub fn poll_search(&mut self) {
        loop {
            match self.receiver.try_recv() {
                Ok(outcome) => self.apply_outcome(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Apply a finished query unless a newer edit has superseded it
    pub fn apply_outcome(&mut self, outcome: SearchOutcome) {
        let current = self.generation.load(Ordering::SeqCst);
        if outcome.generation != current {
            debug!(
                "Dropping stale results for '{}' (generation {} < {})",
                outcome.query, outcome.generation, current
            );
            return;
        }
        self.in_flight = None;

        match outcome.hits {
            Ok(hits) => {
                self.status_message = format!(
                    "{} ({:.1}ms)",
                    found_message(hits.len()),
                    outcome.elapsed.as_secs_f64() * 1000.0
                );
                self.search_cache.put(outcome.query, hits.clone());
                self.results = hits;
                self.selected = 0;
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                self.results.clear();
            }
        }
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_page_down(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 10).min(self.results.len() - 1);
        }
    }

    pub fn select_page_up(&mut self) {
        self.selected = self.selected.saturating_sub(10);
    }

    pub fn show_help(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn hide_help(&mut self) {
        self.mode = Mode::Search;
    }

    pub fn get_selected_result(&self) -> Option<&LiveHit> {
        self.results.get(self.selected)
    }
}

/// Worker body: waits for the store, then runs the query unless a newer
/// edit arrived in the meantime
fn run_query(
    searcher: &Mutex<Searcher>,
    latest: &AtomicU64,
    generation: u64,
    query: String,
    limit: usize,
) -> Option<SearchOutcome> {
    let start = Instant::now();
    let hits = match searcher.lock() {
        Ok(searcher) => {
            if latest.load(Ordering::SeqCst) != generation {
                debug!("Skipping superseded query '{}'", query);
                return None;
            }
            searcher.live_search(&query, limit)
        }
        Err(_) => Err("search worker poisoned".to_string()),
    };
    Some(SearchOutcome {
        generation,
        query,
        hits,
        elapsed: start.elapsed(),
    })
}

fn found_message(count: usize) -> String {
    if count == 0 {
        "No results found".to_string()
    } else {
        format!("Found {} result(s)", count)
    }
}
