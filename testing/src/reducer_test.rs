//! Given-When-Then harness for reducers
//!
//! A scenario starts from a state, applies one or more actions in order and
//! then checks the final state and the effects returned along the way.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use optiflow_core::{effect::Effect, reducer::Reducer};

type StateAssertion<S> = Box<dyn FnOnce(&S)>;

type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent reducer scenario
///
/// Effects from every action are concatenated in dispatch order before the
/// effect assertions run. Nothing is executed: futures are only inspected.
///
/// # Example
///
/// ```ignore
/// use optiflow_testing::{assertions, ReducerTest};
///
/// ReducerTest::new(DashboardReducer)
///     .with_env(test_environment())
///     .given_state(ApplicationState::default())
///     .when_action(DashboardAction::ToggleSidebar)
///     .then_state(|state| assert!(!state.ui.sidebar_open))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a scenario for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Environment handed to every `reduce` call
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Starting state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Append an action to apply (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Append several actions, applied in iteration order
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Check the state after the last action (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Check the effects returned by all actions (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Apply the actions and run every assertion
    ///
    /// Returns the final state and the collected effects so a test can keep
    /// going, for example by running the effects with
    /// [`run_effects`](crate::run_effects).
    ///
    /// # Panics
    ///
    /// Panics if the state or environment is missing, if no action was
    /// given, or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) -> (S, Vec<Effect<A>>) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let env = self
            .environment
            .expect("Environment must be set with with_env()");
        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let mut effects = Vec::new();
        for action in self.actions {
            effects.extend(self.reducer.reduce(&mut state, action, &env));
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&effects);
        }

        (state, effects)
    }
}

/// Helper assertions for effects
pub mod assertions {
    use optiflow_core::effect::Effect;

    /// Assert that nothing will run
    ///
    /// Nested `Parallel` effects made only of `None` count as nothing.
    ///
    /// # Panics
    ///
    /// Panics if any effect would run a future.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {effects:?}"
        );
    }

    /// Assert the number of effects that will run a future
    ///
    /// `Parallel` effects are flattened before counting.
    ///
    /// # Panics
    ///
    /// Panics if the count doesn't match `expected`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_future_count<A>(effects: &[Effect<A>], expected: usize) {
        let found = count_futures(effects);
        assert_eq!(
            found, expected,
            "Expected {expected} future effects, but found {found}"
        );
    }

    /// Assert that at least one effect will run a future
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            count_futures(effects) > 0,
            "Expected at least one Future effect, but none found"
        );
    }

    fn count_futures<A>(effects: &[Effect<A>]) -> usize {
        effects
            .iter()
            .map(|effect| match effect {
                Effect::None => 0,
                Effect::Future(_) => 1,
                Effect::Parallel(children) => count_futures(children),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optiflow_core::{smallvec, SmallVec};

    #[derive(Clone, Debug)]
    struct ShelfState {
        stock: u32,
    }

    #[derive(Clone, Debug)]
    enum ShelfAction {
        Receive(u32),
        Ship(u32),
        Reorder,
    }

    struct ShelfReducer;

    struct ShelfEnv;

    impl Reducer for ShelfReducer {
        type State = ShelfState;
        type Action = ShelfAction;
        type Environment = ShelfEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                ShelfAction::Receive(units) => {
                    state.stock += units;
                    smallvec![Effect::None]
                },
                ShelfAction::Ship(units) => {
                    state.stock = state.stock.saturating_sub(units);
                    smallvec![Effect::None]
                },
                ShelfAction::Reorder => smallvec![Effect::merge(vec![
                    Effect::Future(Box::pin(async { Some(ShelfAction::Receive(10)) })),
                    Effect::Future(Box::pin(async { Some(ShelfAction::Receive(5)) })),
                ])],
            }
        }
    }

    #[test]
    fn test_single_action() {
        ReducerTest::new(ShelfReducer)
            .with_env(ShelfEnv)
            .given_state(ShelfState { stock: 3 })
            .when_action(ShelfAction::Receive(4))
            .then_state(|state| assert_eq!(state.stock, 7))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_actions_apply_in_order() {
        let (state, effects) = ReducerTest::new(ShelfReducer)
            .with_env(ShelfEnv)
            .given_state(ShelfState { stock: 0 })
            .when_actions([ShelfAction::Ship(5), ShelfAction::Receive(2)])
            .then_state(|state| assert_eq!(state.stock, 2))
            .run();

        assert_eq!(state.stock, 2);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_parallel_futures_are_counted() {
        ReducerTest::new(ShelfReducer)
            .with_env(ShelfEnv)
            .given_state(ShelfState { stock: 0 })
            .when_action(ShelfAction::Reorder)
            .then_effects(|effects| {
                assertions::assert_has_future_effect(effects);
                assertions::assert_future_count(effects, 2);
            })
            .run();
    }

    #[test]
    fn test_no_effects_accepts_nested_nones() {
        assertions::assert_no_effects::<ShelfAction>(&[]);
        assertions::assert_no_effects::<ShelfAction>(&[Effect::merge(vec![
            Effect::None,
            Effect::None,
        ])]);
    }

    #[tokio::test]
    async fn test_collected_effects_can_be_run() {
        let (_, effects) = ReducerTest::new(ShelfReducer)
            .with_env(ShelfEnv)
            .given_state(ShelfState { stock: 0 })
            .when_action(ShelfAction::Reorder)
            .run();

        let fed_back = crate::run_effects(effects).await;
        assert!(matches!(
            fed_back.as_slice(),
            [ShelfAction::Receive(10), ShelfAction::Receive(5)]
        ));
    }
}
