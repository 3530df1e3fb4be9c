//! # OptiFlow Core
//!
//! Core traits and types for the OptiFlow dashboard state container.
//!
//! The dashboard keeps all of its mutable state behind a single reducer:
//! every change is an action, every action goes through one pure function,
//! and every side effect is returned as a description for the runtime to
//! execute.
//!
//! ## Core Concepts
//!
//! - **State**: The aggregate the dashboard renders from
//! - **Action**: All possible inputs to a reducer (user intents and fetch results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use optiflow_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct SidebarState {
//!     open: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum SidebarAction {
//!     Toggle,
//! }
//!
//! struct SidebarReducer;
//!
//! impl Reducer for SidebarReducer {
//!     type State = SidebarState;
//!     type Action = SidebarAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SidebarState,
//!         action: SidebarAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<SidebarAction>; 4]> {
//!         match action {
//!             SidebarAction::Toggle => state.open = !state.open,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = SidebarState::default();
//! SidebarReducer.reduce(&mut state, SidebarAction::Toggle, &());
//! assert!(state.open);
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all state-transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// Most actions produce zero or one effect, so the return value is a
        /// `SmallVec` that stays on the stack for up to four effects.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values returned by reducers and executed by the Store runtime.
/// They are never executed by the reducer itself.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Wrap a future that performs work and never feeds an action back
        #[must_use]
        pub fn fire_and_forget<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = ()> + Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                fut.await;
                None
            }))
        }

        /// Check whether this effect does nothing
        ///
        /// A `Parallel` effect is a no-op when all of its children are.
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// External dependencies are abstracted behind traits and injected via the
/// reducer's Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};

    #[test]
    fn test_none_is_none() {
        assert!(Effect::<()>::None.is_none());
    }

    #[test]
    fn test_parallel_of_nones_is_none() {
        let effect = Effect::<()>::merge(vec![Effect::None, Effect::None]);
        assert!(effect.is_none());
    }

    #[test]
    fn test_future_is_not_none() {
        let effect = Effect::<()>::fire_and_forget(async {});
        assert!(!effect.is_none());

        let parallel = Effect::merge(vec![Effect::None, effect]);
        assert!(!parallel.is_none());
    }

    #[test]
    fn test_debug_hides_future() {
        let effect = Effect::<()>::fire_and_forget(async {});
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[tokio::test]
    async fn test_fire_and_forget_produces_no_action() {
        let effect = Effect::<u8>::fire_and_forget(async {});
        let Effect::Future(fut) = effect else {
            unreachable!("fire_and_forget always builds a Future effect");
        };
        assert_eq!(fut.await, None);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
