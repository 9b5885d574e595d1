use tracing::{debug, trace};

use crate::{account::AccountSlice, action::Action, customer::CustomerSlice};

use super::{RootState, Slice, Store};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RootState,
}

impl InMemoryStore {
    pub fn new(state: RootState) -> Self {
        Self { state }
    }
}

impl Store for InMemoryStore {
    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Account(action) => {
                debug!(action = action.name(), slice = AccountSlice::NAME, "dispatch");
                AccountSlice::reduce(&mut self.state.account, action);
            }
            Action::Customer(action) => {
                debug!(action = action.name(), slice = CustomerSlice::NAME, "dispatch");
                CustomerSlice::reduce(&mut self.state.customer, action);
            }
            Action::Other(kind) => {
                trace!(%kind, "no slice handles action, ignoring");
            }
        }
    }

    fn state(&self) -> &RootState {
        &self.state
    }
}
