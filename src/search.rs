//! Search orchestration over the session caches
//!
//! A [`SearchSession`] owns the location cache, the character cache and the
//! search history for the lifetime of the application. The
//! [`SearchOrchestrator`] drives one search through them: cache first, remote
//! lookup on a miss, then residents, then a fun fact about the first resident.
//!
//! Searches may overlap when the user types faster than the API answers.
//! Every search takes a [`SearchToken`] from the session; a search whose token
//! has been superseded stops writing to the session and reports
//! [`SearchOutcome::Superseded`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::cache::{CharacterCache, LocationCache};
use crate::data::{
    extract_resident_ids, fallback_fun_fact, ApiError, Character, CharacterLookup,
    FunFactGenerator, Location, LocationLookup, ResidentRefError,
};
use crate::history::SearchHistory;

/// Generation number captured when a search starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchToken(u64);

/// Caches and history for one application session
#[derive(Debug, Default)]
pub struct SearchSession {
    locations: LocationCache,
    characters: CharacterCache,
    history: SearchHistory,
    generation: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new search generation, invalidating all earlier tokens
    pub fn begin_search(&mut self) -> SearchToken {
        self.generation += 1;
        SearchToken(self.generation)
    }

    /// Returns true if no search has started since `token` was issued
    pub fn is_current(&self, token: SearchToken) -> bool {
        token.0 == self.generation
    }

    pub fn locations(&self) -> &LocationCache {
        &self.locations
    }

    pub fn characters(&self) -> &CharacterCache {
        &self.characters
    }

    pub fn locations_mut(&mut self) -> &mut LocationCache {
        &mut self.locations
    }

    pub fn characters_mut(&mut self) -> &mut CharacterCache {
        &mut self.characters
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut SearchHistory {
        &mut self.history
    }
}

/// Errors that abort a search
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search term was empty after trimming
    #[error("Search term is empty")]
    EmptyTerm,

    /// The remote API failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A resolved search, ready to display
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The term as searched
    pub term: String,
    pub location: Location,
    /// Residents of `location`, in resident order
    pub characters: Vec<Character>,
    /// Fun fact about the first resident, if there is one
    pub fun_fact: Option<String>,
    pub location_from_cache: bool,
    pub characters_from_cache: bool,
    /// Resident references that could not be parsed
    pub rejected_residents: Vec<ResidentRefError>,
}

/// How a search ended
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Found(Box<SearchResult>),
    /// The API knows no location matching the term
    NotFound { term: String },
    /// A newer search started before this one finished; nothing was recorded
    Superseded,
}

/// Runs searches against the shared session and the remote collaborators
#[derive(Clone)]
pub struct SearchOrchestrator {
    session: Arc<Mutex<SearchSession>>,
    locations_api: Arc<dyn LocationLookup>,
    characters_api: Arc<dyn CharacterLookup>,
    fun_facts: Arc<dyn FunFactGenerator>,
}

impl SearchOrchestrator {
    pub fn new(
        session: Arc<Mutex<SearchSession>>,
        locations_api: Arc<dyn LocationLookup>,
        characters_api: Arc<dyn CharacterLookup>,
        fun_facts: Arc<dyn FunFactGenerator>,
    ) -> Self {
        Self {
            session,
            locations_api,
            characters_api,
            fun_facts,
        }
    }

    /// Locks the shared session.
    ///
    /// The stores hold no invariants spanning a panic, so a poisoned lock is
    /// recovered rather than propagated.
    pub fn session(&self) -> MutexGuard<'_, SearchSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one search for `term`.
    ///
    /// The session lock is only held between awaits, never across one.
    pub async fn search(&self, term: &str) -> Result<SearchOutcome, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SearchError::EmptyTerm);
        }
        tracing::info!(term, "search started");

        let (token, cached) = {
            let mut session = self.session();
            session.history.record_selection(term);
            let token = session.begin_search();
            let cached = session
                .locations
                .find_ignore_case(term)
                .map(|(_, location)| location.clone());
            (token, cached)
        };

        let location_from_cache = cached.is_some();
        let location = match cached {
            Some(location) => {
                tracing::debug!(term, location = %location.name, "location cache hit");
                location
            }
            None => {
                tracing::debug!(term, "location cache miss");
                let found = match self.locations_api.find_by_name(term).await {
                    Ok(found) => found,
                    Err(err) => return self.remote_failure(token, err),
                };
                let Some(location) = found.into_iter().next() else {
                    tracing::info!(term, "no location found");
                    return Ok(self.not_found(token, term));
                };

                let mut session = self.session();
                if !session.is_current(token) {
                    return Ok(SearchOutcome::Superseded);
                }
                session.locations.set(term, location.clone());
                location
            }
        };

        let cached_characters = {
            let mut session = self.session();
            if !session.is_current(token) {
                return Ok(SearchOutcome::Superseded);
            }
            session.history.record_resolved(term, &location.name);
            session.characters.get(&location.name).map(<[Character]>::to_vec)
        };

        let residents = extract_resident_ids(&location.residents);
        let characters_from_cache = cached_characters.is_some();
        let characters = match cached_characters {
            Some(characters) => {
                tracing::debug!(location = %location.name, "character cache hit");
                characters
            }
            None if residents.ids.is_empty() => Vec::new(),
            None => {
                tracing::debug!(location = %location.name, count = residents.ids.len(), "character cache miss");
                let characters = match self.characters_api.find_by_ids(&residents.ids).await {
                    Ok(characters) => characters,
                    Err(err) => return self.remote_failure(token, err),
                };

                let mut session = self.session();
                if !session.is_current(token) {
                    return Ok(SearchOutcome::Superseded);
                }
                session.characters.set(location.name.clone(), characters.clone());
                characters
            }
        };

        let fun_fact = match characters.first() {
            Some(first) => Some(self.fun_fact_or_fallback(first).await),
            None => None,
        };

        if !self.session().is_current(token) {
            return Ok(SearchOutcome::Superseded);
        }

        tracing::info!(
            term,
            location = %location.name,
            residents = characters.len(),
            location_from_cache,
            characters_from_cache,
            "search resolved"
        );

        Ok(SearchOutcome::Found(Box::new(SearchResult {
            term: term.to_string(),
            location,
            characters,
            fun_fact,
            location_from_cache,
            characters_from_cache,
            rejected_residents: residents.rejected,
        })))
    }

    /// A failed lookup only surfaces as an error if no newer search has started
    fn remote_failure(
        &self,
        token: SearchToken,
        err: ApiError,
    ) -> Result<SearchOutcome, SearchError> {
        if !self.session().is_current(token) {
            return Ok(SearchOutcome::Superseded);
        }
        tracing::warn!(error = %err, "remote lookup failed");
        Err(SearchError::Api(err))
    }

    fn not_found(&self, token: SearchToken, term: &str) -> SearchOutcome {
        if self.session().is_current(token) {
            SearchOutcome::NotFound {
                term: term.to_string(),
            }
        } else {
            SearchOutcome::Superseded
        }
    }

    async fn fun_fact_or_fallback(&self, character: &Character) -> String {
        match self.fun_facts.fun_fact(character).await {
            Ok(fact) => fact,
            Err(err) => {
                tracing::warn!(character = %character.name, error = %err, "fun fact generation failed");
                fallback_fun_fact(character)
            }
        }
    }
}
