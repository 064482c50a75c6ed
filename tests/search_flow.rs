//! End-to-end search flow through the public library API
//!
//! Drives the orchestrator with in-memory collaborators and checks what ends
//! up in the caches and the history.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use portalscope::data::{
    ApiError, Character, CharacterLookup, CharacterStatus, FunFactError, FunFactGenerator,
    Location, LocationLookup, LocationRef,
};
use portalscope::search::{SearchOrchestrator, SearchOutcome, SearchResult, SearchSession};
use tokio::sync::Notify;

/// Remote API stand-in that counts its calls
#[derive(Default)]
struct Multiverse {
    locations: HashMap<String, Location>,
    characters: HashMap<u32, Character>,
    location_calls: AtomicUsize,
    character_calls: AtomicUsize,
}

#[async_trait]
impl LocationLookup for Multiverse {
    async fn find_by_name(&self, name: &str) -> Result<Vec<Location>, ApiError> {
        self.location_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .locations
            .get(&name.to_lowercase())
            .cloned()
            .into_iter()
            .collect())
    }
}

#[async_trait]
impl CharacterLookup for Multiverse {
    async fn find_by_ids(&self, ids: &[u32]) -> Result<Vec<Character>, ApiError> {
        self.character_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ids
            .iter()
            .filter_map(|id| self.characters.get(id).cloned())
            .collect())
    }
}

struct EchoFacts;

#[async_trait]
impl FunFactGenerator for EchoFacts {
    async fn fun_fact(&self, character: &Character) -> Result<String, FunFactError> {
        Ok(format!("{} is a {}.", character.name, character.species))
    }
}

fn character(id: u32, name: &str, location: &str) -> Character {
    Character {
        id,
        name: name.to_string(),
        status: CharacterStatus::Alive,
        species: "Human".to_string(),
        gender: "Male".to_string(),
        origin: LocationRef::default(),
        location: LocationRef {
            name: location.to_string(),
            url: String::new(),
        },
        image: format!("https://rickandmortyapi.com/api/character/avatar/{}.jpeg", id),
    }
}

fn location(id: u32, name: &str, residents: &[u32]) -> Location {
    Location {
        id,
        name: name.to_string(),
        location_type: "Planet".to_string(),
        dimension: String::new(),
        residents: residents
            .iter()
            .map(|id| format!("https://rickandmortyapi.com/api/character/{}", id))
            .collect(),
        url: String::new(),
    }
}

fn multiverse() -> Arc<Multiverse> {
    let mut api = Multiverse::default();
    api.locations
        .insert("earth".to_string(), location(1, "Earth (C-137)", &[1, 2]));
    api.locations
        .insert("citadel".to_string(), location(3, "Citadel of Ricks", &[1, 8]));
    api.characters.insert(1, character(1, "Rick Sanchez", "Citadel of Ricks"));
    api.characters.insert(2, character(2, "Morty Smith", "Citadel of Ricks"));
    api.characters.insert(8, character(8, "Adjudicator Rick", "Citadel of Ricks"));
    Arc::new(api)
}

fn orchestrator(api: Arc<Multiverse>) -> SearchOrchestrator {
    SearchOrchestrator::new(
        Arc::new(Mutex::new(SearchSession::new())),
        api.clone(),
        api,
        Arc::new(EchoFacts),
    )
}

fn found(outcome: SearchOutcome) -> SearchResult {
    match outcome {
        SearchOutcome::Found(result) => *result,
        other => panic!("Expected a result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_earth_scenario_end_to_end() {
    let api = multiverse();
    let orchestrator = orchestrator(api.clone());

    let result = found(orchestrator.search("Earth").await.unwrap());

    assert_eq!(result.location.id, 1);
    assert_eq!(
        result.characters.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(result.fun_fact.as_deref(), Some("Rick Sanchez is a Human."));

    let session = orchestrator.session();
    assert!(session.locations().has("Earth"));
    assert_eq!(session.locations().get("Earth"), Some(&result.location));
    assert_eq!(
        session.characters().get("Earth (C-137)").map(|c| c.len()),
        Some(2)
    );

    let history = session.history().items();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].search_term, "Earth");
    assert_eq!(history[0].location_name, "Earth (C-137)");
}

#[tokio::test]
async fn test_research_lowercase_hits_cache_and_refreshes_in_place() {
    let api = multiverse();
    let orchestrator = orchestrator(api.clone());

    let first = found(orchestrator.search("Earth").await.unwrap());
    let first_timestamp = orchestrator.session().history().items()[0].timestamp;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let second = found(orchestrator.search("earth").await.unwrap());

    assert!(second.location_from_cache);
    assert_eq!(second.location, first.location);
    assert_eq!(api.location_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.character_calls.load(Ordering::SeqCst), 1);

    let session = orchestrator.session();
    let history = session.history().items();
    assert_eq!(history.len(), 1);
    assert!(history[0].timestamp > first_timestamp);
}

#[tokio::test]
async fn test_shared_residents_are_unique_across_locations() {
    let orchestrator = orchestrator(multiverse());

    orchestrator.search("Earth").await.unwrap();
    orchestrator.search("Citadel").await.unwrap();

    let session = orchestrator.session();
    let all: Vec<u32> = session.characters().list_all().iter().map(|c| c.id).collect();
    let unique: Vec<u32> = session
        .characters()
        .list_all_unique()
        .iter()
        .map(|c| c.id)
        .collect();

    assert_eq!(all, vec![1, 2, 1, 8]);
    assert_eq!(unique, vec![1, 2, 8]);

    let terms: Vec<&str> = session
        .history()
        .items()
        .iter()
        .map(|item| item.search_term.as_str())
        .collect();
    assert_eq!(terms, vec!["Citadel", "Earth"]);
}

/// Location lookup that waits for a signal before answering
struct SlowLookup {
    inner: Arc<Multiverse>,
    gate: Arc<Notify>,
}

#[async_trait]
impl LocationLookup for SlowLookup {
    async fn find_by_name(&self, name: &str) -> Result<Vec<Location>, ApiError> {
        if name.eq_ignore_ascii_case("earth") {
            self.gate.notified().await;
        }
        self.inner.find_by_name(name).await
    }
}

#[tokio::test]
async fn test_stale_search_does_not_write_session() {
    let api = multiverse();
    let gate = Arc::new(Notify::new());
    let orchestrator = SearchOrchestrator::new(
        Arc::new(Mutex::new(SearchSession::new())),
        Arc::new(SlowLookup {
            inner: api.clone(),
            gate: gate.clone(),
        }),
        api,
        Arc::new(EchoFacts),
    );

    let slow = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.search("Earth").await })
    };
    // Let the slow search take its token and block on the gate
    tokio::time::sleep(Duration::from_millis(20)).await;

    found(orchestrator.search("Citadel").await.unwrap());
    gate.notify_one();

    let outcome = slow.await.expect("task panicked").unwrap();
    assert!(matches!(outcome, SearchOutcome::Superseded));

    let session = orchestrator.session();
    assert!(!session.locations().has("Earth"));
    assert!(session.locations().has("Citadel"));
    assert_eq!(session.history().len(), 1);
}
