use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::action::Action;

use super::{InMemoryStore, RootState, Store};

/// Shared, cloneable access to a [`Store`].
///
/// Each dispatch holds the lock only while the action is applied, so an
/// async task suspended elsewhere never blocks other dispatches. Readers get
/// snapshots or a [`watch`] subscription; there is no way to mutate state
/// except by dispatching.
pub struct StoreHandle<S = InMemoryStore> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    store: Mutex<S>,
    changes: watch::Sender<RootState>,
}

impl<S> Clone for StoreHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for StoreHandle<InMemoryStore> {
    fn default() -> Self {
        Self::new(InMemoryStore::default())
    }
}

impl<S> StoreHandle<S>
where
    S: Store,
{
    pub fn new(store: S) -> Self {
        let (changes, _) = watch::channel(store.state().clone());
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                changes,
            }),
        }
    }

    pub async fn dispatch(&self, action: impl Into<Action>) {
        let mut store = self.inner.store.lock().await;
        store.dispatch(action.into());
        self.inner.changes.send_replace(store.state().clone());
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> RootState {
        self.inner.store.lock().await.state().clone()
    }

    /// Receiver that is notified after every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.inner.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::{account::AccountAction, customer::CustomerAction};

    use super::*;

    #[tokio::test]
    async fn clones_share_one_store() {
        let handle = StoreHandle::default();
        let other = handle.clone();
        handle.dispatch(AccountAction::Deposit(dec!(10))).await;
        other.dispatch(AccountAction::Withdraw(dec!(4))).await;
        assert_eq!(handle.state().await.account.balance, dec!(6));
        assert_eq!(other.state().await, handle.state().await);
    }

    #[tokio::test]
    async fn subscribers_see_every_dispatch() {
        let handle = StoreHandle::default();
        let mut rx = handle.subscribe();
        assert_eq!(rx.borrow().account.balance, dec!(0));

        handle.dispatch(AccountAction::ConvertingCurrency).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().account.is_loading);

        handle
            .dispatch(CustomerAction::UpdateName("Jane".into()))
            .await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().customer.full_name, "Jane");
    }

    #[tokio::test]
    async fn starts_from_given_state() {
        let mut initial = RootState::default();
        initial.account.balance = dec!(99);
        let handle = StoreHandle::new(InMemoryStore::new(initial.clone()));
        assert_eq!(handle.state().await, initial);
        assert_eq!(*handle.subscribe().borrow(), initial);
    }
}
