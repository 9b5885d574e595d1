use serde::Serialize;

use crate::{account::AccountState, action::Action, customer::CustomerState};

pub mod handle;
pub mod in_memory_store;

pub use handle::StoreHandle;
pub use in_memory_store::InMemoryStore;

/// A named piece of state together with the reducer that owns it.
///
/// The reducer mutates in place; implementations that prefer a pure
/// transition can compute the next state and assign it.
pub trait Slice {
    /// Action type prefix, e.g. `account` in `account/deposit`.
    const NAME: &'static str;
    type State: Default + Clone;
    type Action;

    fn reduce(state: &mut Self::State, action: Self::Action);
}

/// Combined state of every slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RootState {
    pub account: AccountState,
    pub customer: CustomerState,
}

/// State container. Actions are applied one at a time, each to completion.
///
/// NOTE: the in memory store is the only implementation, but keeping the
/// trait lets [`StoreHandle`] and the coordinator stay agnostic of it.
pub trait Store {
    fn dispatch(&mut self, action: Action);

    fn state(&self) -> &RootState;
}
