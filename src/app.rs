//! Application state management for portalscope
//!
//! This module contains the main application state: the query being typed,
//! the history dropdown, the current search view and pagination. Searches run
//! as background tasks; their outcomes come back over a channel and are
//! applied by [`App::poll_searches`] once per frame.

use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use portalscope::cli::StartupConfig;
use portalscope::data::{Character, GeminiClient, RickAndMortyClient};
use portalscope::search::{
    SearchError, SearchOrchestrator, SearchOutcome, SearchResult, SearchSession,
};

/// Characters shown per page
pub const PAGE_SIZE: usize = 8;

/// Which widget receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing into the search bar
    Input,
    /// Moving through the history dropdown
    History,
}

/// What the main panel shows
#[derive(Debug, Clone)]
pub enum View {
    /// Nothing searched yet
    Welcome,
    /// A search is in flight
    Searching { term: String },
    /// The latest search resolved
    Results(Box<SearchResult>),
    /// The latest search matched no location
    NotFound { term: String },
    /// The latest search failed
    Failed { term: String, message: String },
}

/// A finished background search
#[derive(Debug)]
pub struct SearchMessage {
    /// Matches [`App::latest_request`] for the search that is still wanted
    pub request: u64,
    pub term: String,
    pub outcome: Result<SearchOutcome, SearchError>,
}

/// Main application struct managing state and data
pub struct App {
    /// Text in the search bar
    pub query: String,
    pub focus: Focus,
    /// Highlighted row in the history dropdown
    pub history_index: usize,
    pub view: View,
    /// Zero-based page of the character list
    pub page: usize,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag to show the cache status panel
    pub show_cache_status: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    latest_request: u64,
    orchestrator: SearchOrchestrator,
    sender: mpsc::UnboundedSender<SearchMessage>,
    receiver: mpsc::UnboundedReceiver<SearchMessage>,
}

impl App {
    /// Creates a new App talking to the services named in `config`
    pub fn new(config: &StartupConfig) -> Self {
        let api = Arc::new(RickAndMortyClient::with_base_url(config.api_url.clone()));
        let fun_facts = Arc::new(
            GeminiClient::new(config.gemini_api_key.clone()).with_model(config.gemini_model.clone()),
        );
        let orchestrator = SearchOrchestrator::new(
            Arc::new(Mutex::new(SearchSession::new())),
            api.clone(),
            api,
            fun_facts,
        );
        Self::with_orchestrator(orchestrator)
    }

    /// Creates a new App around an existing orchestrator
    pub fn with_orchestrator(orchestrator: SearchOrchestrator) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            query: String::new(),
            focus: Focus::Input,
            history_index: 0,
            view: View::Welcome,
            page: 0,
            show_help: false,
            show_cache_status: false,
            should_quit: false,
            latest_request: 0,
            orchestrator,
            sender,
            receiver,
        }
    }

    /// Locks the search session for reading caches and history
    pub fn session(&self) -> MutexGuard<'_, SearchSession> {
        self.orchestrator.session()
    }

    /// Returns true while a search is in flight
    pub fn is_searching(&self) -> bool {
        matches!(self.view, View::Searching { .. })
    }

    /// Starts a background search for `term`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_search(&mut self, term: &str) {
        let term = term.trim().to_string();
        if term.is_empty() {
            return;
        }

        self.latest_request += 1;
        self.view = View::Searching { term: term.clone() };
        self.page = 0;

        let request = self.latest_request;
        let orchestrator = self.orchestrator.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.search(&term).await;
            let _ = sender.send(SearchMessage {
                request,
                term,
                outcome,
            });
        });
    }

    /// Applies every finished search without blocking
    pub fn poll_searches(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.apply(message);
        }
    }

    /// Applies one finished search, dropping it if a newer one was started
    pub fn apply(&mut self, message: SearchMessage) {
        if message.request != self.latest_request {
            return;
        }

        match message.outcome {
            Ok(SearchOutcome::Found(result)) => {
                self.view = View::Results(result);
                self.page = 0;
            }
            Ok(SearchOutcome::NotFound { term }) => {
                self.view = View::NotFound { term };
            }
            Ok(SearchOutcome::Superseded) => {}
            Err(err) => {
                tracing::warn!(term = %message.term, error = %err, "search failed");
                self.view = View::Failed {
                    term: message.term,
                    message: err.to_string(),
                };
            }
        }
    }

    /// Title and characters for the list panel.
    ///
    /// Shows the current result's residents, or every character seen this
    /// session when there is no current result.
    pub fn displayed_characters(&self) -> (String, Vec<Character>) {
        match &self.view {
            View::Results(result) => (
                format!("Characters from {}", result.location.name),
                result.characters.clone(),
            ),
            _ => {
                let session = self.session();
                let characters = session
                    .characters()
                    .list_all_unique()
                    .into_iter()
                    .cloned()
                    .collect();
                ("Search History".to_string(), characters)
            }
        }
    }

    /// Number of pages needed for `count` characters (at least one)
    pub fn page_count(count: usize) -> usize {
        count.div_ceil(PAGE_SIZE).max(1)
    }

    fn next_page(&mut self) {
        let (_, characters) = self.displayed_characters();
        if self.page + 1 < Self::page_count(characters.len()) {
            self.page += 1;
        }
    }

    fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    fn clear_history(&mut self) {
        self.session().history_mut().clear();
        self.history_index = 0;
        self.focus = Focus::Input;
    }

    fn history_len(&self) -> usize {
        self.session().history().len()
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - typing edits the query, `Enter` searches
    /// - `Down` opens the history dropdown, `Up`/`Down` move, `Enter` re-runs
    /// - `Ctrl+D` clears the search history
    /// - `Left`/`Right` or `PageUp`/`PageDown` change page
    /// - `F1` help, `F2` cache status
    /// - `Esc` closes the dropdown, clears the query, or quits when empty
    /// - `Ctrl+C` quits
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key_event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return;
        }

        match key_event.code {
            KeyCode::F(1) => {
                self.show_help = true;
                return;
            }
            KeyCode::F(2) => {
                self.show_cache_status = !self.show_cache_status;
                return;
            }
            KeyCode::Char('d') if ctrl => {
                self.clear_history();
                return;
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.previous_page();
                return;
            }
            KeyCode::Right | KeyCode::PageDown => {
                self.next_page();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => match key_event.code {
                KeyCode::Char(c) if !ctrl => {
                    self.query.push(c);
                }
                KeyCode::Backspace => {
                    self.query.pop();
                }
                KeyCode::Enter => {
                    let query = self.query.clone();
                    self.submit_search(&query);
                }
                KeyCode::Down => {
                    if self.history_len() > 0 {
                        self.focus = Focus::History;
                        self.history_index = 0;
                    }
                }
                KeyCode::Esc => {
                    if self.query.is_empty() {
                        self.should_quit = true;
                    } else {
                        self.query.clear();
                    }
                }
                _ => {}
            },
            Focus::History => match key_event.code {
                KeyCode::Up => {
                    if self.history_index == 0 {
                        self.focus = Focus::Input;
                    } else {
                        self.history_index -= 1;
                    }
                }
                KeyCode::Down => {
                    let len = self.history_len();
                    if self.history_index + 1 < len {
                        self.history_index += 1;
                    }
                }
                KeyCode::Enter => {
                    let term = self
                        .session()
                        .history()
                        .get(self.history_index)
                        .map(|item| item.search_term.clone());
                    self.focus = Focus::Input;
                    if let Some(term) = term {
                        self.query = term.clone();
                        self.submit_search(&term);
                    }
                }
                KeyCode::Esc => {
                    self.focus = Focus::Input;
                }
                _ => {}
            },
        }
    }
}
