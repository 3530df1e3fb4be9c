//! Integration tests for request/response correlation over the action broadcast
//!
//! Many callers wait on the same store at once, each for the terminal action
//! carrying its own request id. These tests check that every caller gets its
//! own answer, in whatever order the effects finish.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use optiflow_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use optiflow_runtime::{Store, StoreError};
use std::collections::BTreeMap;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum LookupAction {
    /// Ask for the stock of `sku`, answered after `delay_ms`
    Lookup { id: u64, sku: String, delay_ms: u64 },
    /// Answer to the lookup with this id
    Found { id: u64, sku: String, units: u32 },
    /// The lookup with this id failed
    Missing { id: u64, sku: String },
}

impl LookupAction {
    fn answers(&self, wanted: u64) -> bool {
        matches!(self, Self::Found { id, .. } | Self::Missing { id, .. } if *id == wanted)
    }
}

#[derive(Debug, Clone, Default)]
struct LookupState {
    in_flight: usize,
    stock: BTreeMap<String, u32>,
    misses: Vec<String>,
}

#[derive(Clone)]
struct LookupReducer;

impl Reducer for LookupReducer {
    type State = LookupState;
    type Action = LookupAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LookupAction::Lookup { id, sku, delay_ms } => {
                state.in_flight += 1;
                smallvec![Effect::Future(Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    if sku.starts_with("SKU-") {
                        let units = u32::try_from(sku.len() * 100).unwrap_or(u32::MAX);
                        Some(LookupAction::Found { id, sku, units })
                    } else {
                        Some(LookupAction::Missing { id, sku })
                    }
                }))]
            },
            LookupAction::Found { sku, units, .. } => {
                state.in_flight -= 1;
                state.stock.insert(sku, units);
                SmallVec::new()
            },
            LookupAction::Missing { sku, .. } => {
                state.in_flight -= 1;
                state.misses.push(sku);
                SmallVec::new()
            },
        }
    }
}

fn lookup(id: u64, sku: &str, delay_ms: u64) -> LookupAction {
    LookupAction::Lookup {
        id,
        sku: sku.to_string(),
        delay_ms,
    }
}

// ============================================================================
// Tests
// ============================================================================

/// Callers finishing out of order still each receive their own answer
#[tokio::test(start_paused = true)]
async fn test_concurrent_waiters_get_their_own_answer() {
    let store = Store::new(LookupState::default(), LookupReducer, ());

    let waiters: Vec<_> = [(1, "SKU-12345", 300), (2, "SKU-67890", 100), (3, "BOGUS", 200)]
        .into_iter()
        .map(|(id, sku, delay)| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .send_and_wait_for(
                        lookup(id, sku, delay),
                        move |action| action.answers(id),
                        Duration::from_secs(5),
                    )
                    .await
            })
        })
        .collect();

    let mut answers = Vec::new();
    for waiter in waiters {
        answers.push(waiter.await.expect("waiter task").expect("answer"));
    }

    assert!(matches!(&answers[0], LookupAction::Found { id: 1, sku, .. } if sku == "SKU-12345"));
    assert!(matches!(&answers[1], LookupAction::Found { id: 2, sku, .. } if sku == "SKU-67890"));
    assert!(matches!(&answers[2], LookupAction::Missing { id: 3, .. }));

    let (in_flight, known, misses) = store
        .state(|s| (s.in_flight, s.stock.len(), s.misses.clone()))
        .await;
    assert_eq!(in_flight, 0);
    assert_eq!(known, 2);
    assert_eq!(misses, vec!["BOGUS".to_string()]);
}

/// A waiter observing its answer also observes the state it produced
#[tokio::test]
async fn test_answer_arrives_after_state_is_applied() -> Result<(), StoreError> {
    let store = Store::new(LookupState::default(), LookupReducer, ());

    let answer = store
        .send_and_wait_for(
            lookup(7, "SKU-1", 0),
            |action| action.answers(7),
            Duration::from_secs(1),
        )
        .await?;

    let LookupAction::Found { sku, units, .. } = answer else {
        panic!("expected Found, got {answer:?}");
    };
    assert_eq!(store.state(|s| s.stock.get(&sku).copied()).await, Some(units));
    Ok(())
}

/// Answers for other ids never satisfy a waiter
#[tokio::test(start_paused = true)]
async fn test_foreign_answers_do_not_wake_waiter() {
    let store = Store::new(LookupState::default(), LookupReducer, ());

    let _ = store.send(lookup(1, "SKU-A", 10)).await;
    let result = store
        .send_and_wait_for(
            lookup(2, "SKU-B", 10_000),
            |action| action.answers(2),
            Duration::from_millis(500),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
    assert!(store.state(|s| s.stock.contains_key("SKU-A")).await);
}

/// Shutdown turns away new lookups and applies the answers of in-flight ones
#[tokio::test(start_paused = true)]
async fn test_shutdown_drains_in_flight_lookups() -> Result<(), StoreError> {
    let store = Store::new(LookupState::default(), LookupReducer, ());

    let _ = store.send(lookup(1, "SKU-SLOW", 200)).await?;
    assert_eq!(store.pending_effects(), 1);

    let rejected = store.clone();
    store.shutdown(Duration::from_secs(5)).await?;

    assert!(matches!(
        rejected.send(lookup(2, "SKU-LATE", 0)).await,
        Err(StoreError::ShutdownInProgress)
    ));
    assert_eq!(store.pending_effects(), 0);
    assert_eq!(store.state(|s| s.in_flight).await, 0);
    assert!(store.state(|s| s.stock.contains_key("SKU-SLOW")).await);
    Ok(())
}
