use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    account::AccountAction,
    config::BankConfig,
    currency::Currency,
    store::{Store, StoreHandle},
};

pub mod frankfurter;

pub use frankfurter::FrankfurterClient;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Exchange rate request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Exchange rate service responded with status {status}")]
    Status { status: u16 },
    #[error("Exchange rate response has no rate for {currency}")]
    MissingRate { currency: Currency },
}

/// External service that converts an amount between two currencies.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn convert(
        &self,
        amount: Decimal,
        from: &Currency,
        to: &Currency,
    ) -> Result<Decimal, ConversionError>;
}

/// A foreign-currency deposit waiting for its rate lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub amount: Decimal,
    pub from: Currency,
    pub to: Currency,
}

impl Conversion {
    /// Action to dispatch before the lookup starts.
    pub fn begin(&self) -> AccountAction {
        AccountAction::ConvertingCurrency
    }

    pub async fn resolve<R>(&self, rates: &R) -> Result<AccountAction, ConversionError>
    where
        R: RateSource + ?Sized,
    {
        let converted = rates.convert(self.amount, &self.from, &self.to).await?;
        Ok(AccountAction::Deposit(converted))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositRequest {
    /// Domestic deposit, no lookup needed.
    Ready(AccountAction),
    Convert(Conversion),
}

pub struct DepositCoordinator<R> {
    rates: R,
    domestic: Currency,
    reset_loading_on_failure: bool,
}

impl<R> DepositCoordinator<R>
where
    R: RateSource,
{
    pub fn new(rates: R, domestic: Currency) -> Self {
        Self {
            rates,
            domestic,
            reset_loading_on_failure: true,
        }
    }

    pub fn from_config(rates: R, config: &BankConfig) -> Self {
        Self {
            rates,
            domestic: config.domestic_currency.clone(),
            reset_loading_on_failure: config.reset_loading_on_failure,
        }
    }

    /// When disabled, a failed lookup leaves `is_loading` set.
    pub fn reset_loading_on_failure(mut self, reset: bool) -> Self {
        self.reset_loading_on_failure = reset;
        self
    }

    pub fn domestic(&self) -> &Currency {
        &self.domestic
    }

    /// Decides how a deposit of `amount` in `currency` has to be carried out.
    pub fn deposit(&self, amount: Decimal, currency: Currency) -> DepositRequest {
        if currency == self.domestic {
            DepositRequest::Ready(AccountAction::Deposit(amount))
        } else {
            DepositRequest::Convert(Conversion {
                amount,
                from: currency,
                to: self.domestic.clone(),
            })
        }
    }

    /// Carries out a deposit against `store` and returns the deposit action
    /// that was dispatched.
    ///
    /// The store lock is not held during the lookup; other actions dispatched
    /// meanwhile are applied normally. Concurrent conversions are not
    /// serialized.
    pub async fn run<S>(
        &self,
        store: &StoreHandle<S>,
        amount: Decimal,
        currency: Currency,
    ) -> Result<AccountAction, ConversionError>
    where
        S: Store,
    {
        let conversion = match self.deposit(amount, currency) {
            DepositRequest::Ready(action) => {
                store.dispatch(action.clone()).await;
                return Ok(action);
            }
            DepositRequest::Convert(conversion) => conversion,
        };

        info!(
            amount = %conversion.amount,
            from = %conversion.from,
            to = %conversion.to,
            "converting deposit"
        );
        store.dispatch(conversion.begin()).await;

        match conversion.resolve(&self.rates).await {
            Ok(action) => {
                info!(from = %conversion.from, ?action, "conversion done");
                store.dispatch(action.clone()).await;
                Ok(action)
            }
            Err(err) => {
                warn!(%err, from = %conversion.from, "conversion failed");
                if self.reset_loading_on_failure {
                    store.dispatch(AccountAction::ConversionFailed).await;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use rust_decimal_macros::dec;
    use tokio::sync::{Mutex, oneshot};

    use super::*;

    struct StubRates {
        converted: Option<Decimal>,
        calls: AtomicUsize,
    }

    impl StubRates {
        fn returning(converted: Decimal) -> Self {
            Self {
                converted: Some(converted),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                converted: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RateSource for StubRates {
        async fn convert(
            &self,
            _amount: Decimal,
            _from: &Currency,
            to: &Currency,
        ) -> Result<Decimal, ConversionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.converted.ok_or_else(|| ConversionError::MissingRate {
                currency: to.clone(),
            })
        }
    }

    /// Records whether the store was already loading when the lookup ran.
    struct ObservingRates {
        store: StoreHandle,
        saw_loading: AtomicBool,
    }

    #[async_trait]
    impl RateSource for ObservingRates {
        async fn convert(
            &self,
            amount: Decimal,
            _from: &Currency,
            _to: &Currency,
        ) -> Result<Decimal, ConversionError> {
            let loading = self.store.state().await.account.is_loading;
            self.saw_loading.store(loading, Ordering::SeqCst);
            Ok(amount * dec!(1.1))
        }
    }

    /// Blocks until the test releases a converted amount.
    struct GatedRates {
        gate: Mutex<Option<oneshot::Receiver<Decimal>>>,
    }

    #[async_trait]
    impl RateSource for GatedRates {
        async fn convert(
            &self,
            _amount: Decimal,
            _from: &Currency,
            to: &Currency,
        ) -> Result<Decimal, ConversionError> {
            let rx = self.gate.lock().await.take();
            match rx {
                Some(rx) => rx.await.map_err(|_| ConversionError::MissingRate {
                    currency: to.clone(),
                }),
                None => Err(ConversionError::MissingRate {
                    currency: to.clone(),
                }),
            }
        }
    }

    #[test]
    fn domestic_deposit_is_ready_immediately() {
        let coordinator = DepositCoordinator::new(StubRates::returning(dec!(1)), Currency::usd());
        let request = coordinator.deposit(dec!(100), Currency::new("usd"));
        assert_eq!(
            request,
            DepositRequest::Ready(AccountAction::Deposit(dec!(100)))
        );
        assert_eq!(coordinator.rates.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn foreign_deposit_needs_conversion() {
        let coordinator = DepositCoordinator::new(StubRates::returning(dec!(1)), Currency::usd());
        let DepositRequest::Convert(conversion) =
            coordinator.deposit(dec!(100), Currency::new("EUR"))
        else {
            panic!("expected a conversion");
        };
        assert_eq!(conversion.amount, dec!(100));
        assert_eq!(conversion.from, Currency::new("EUR"));
        assert_eq!(conversion.to, Currency::usd());
        assert_eq!(conversion.begin(), AccountAction::ConvertingCurrency);
    }

    #[tokio::test]
    async fn run_domestic_deposit_skips_lookup() {
        let store = StoreHandle::default();
        let coordinator = DepositCoordinator::new(StubRates::returning(dec!(1)), Currency::usd());
        let action = coordinator
            .run(&store, dec!(100), Currency::usd())
            .await
            .unwrap();
        assert_eq!(action, AccountAction::Deposit(dec!(100)));
        let state = store.state().await;
        assert_eq!(state.account.balance, dec!(100));
        assert!(!state.account.is_loading);
        assert_eq!(coordinator.rates.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn run_foreign_deposit_credits_converted_amount() {
        let store = StoreHandle::default();
        let coordinator =
            DepositCoordinator::new(StubRates::returning(dec!(108.25)), Currency::usd());
        let action = coordinator
            .run(&store, dec!(100), Currency::new("EUR"))
            .await
            .unwrap();
        assert_eq!(action, AccountAction::Deposit(dec!(108.25)));
        let state = store.state().await;
        assert_eq!(state.account.balance, dec!(108.25));
        assert!(!state.account.is_loading);
        assert_eq!(coordinator.rates.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn loading_is_set_before_lookup() {
        let store = StoreHandle::default();
        let rates = ObservingRates {
            store: store.clone(),
            saw_loading: AtomicBool::new(false),
        };
        let coordinator = DepositCoordinator::new(rates, Currency::usd());
        coordinator
            .run(&store, dec!(10), Currency::new("GBP"))
            .await
            .unwrap();
        assert!(coordinator.rates.saw_loading.load(Ordering::SeqCst));
        let state = store.state().await;
        assert_eq!(state.account.balance, dec!(11));
        assert!(!state.account.is_loading);
    }

    #[tokio::test]
    async fn failure_resets_loading_and_keeps_balance() {
        let store = StoreHandle::default();
        store.dispatch(AccountAction::Deposit(dec!(50))).await;
        let coordinator = DepositCoordinator::new(StubRates::failing(), Currency::usd());
        let err = coordinator
            .run(&store, dec!(100), Currency::new("EUR"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::MissingRate { .. }));
        let state = store.state().await;
        assert_eq!(state.account.balance, dec!(50));
        assert!(!state.account.is_loading);
    }

    #[tokio::test]
    async fn failure_can_leave_loading_set() {
        let store = StoreHandle::default();
        let coordinator = DepositCoordinator::new(StubRates::failing(), Currency::usd())
            .reset_loading_on_failure(false);
        assert!(
            coordinator
                .run(&store, dec!(100), Currency::new("EUR"))
                .await
                .is_err()
        );
        let state = store.state().await;
        assert_eq!(state.account.balance, dec!(0));
        assert!(state.account.is_loading);
    }

    #[tokio::test]
    async fn store_stays_usable_while_converting() {
        let store = StoreHandle::default();
        let (release, gate) = oneshot::channel();
        let coordinator = Arc::new(DepositCoordinator::new(
            GatedRates {
                gate: Mutex::new(Some(gate)),
            },
            Currency::usd(),
        ));

        let mut rx = store.subscribe();
        let task = {
            let store = store.clone();
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .run(&store, dec!(100), Currency::new("EUR"))
                    .await
            })
        };

        // wait for the conversion to start
        rx.wait_for(|state| state.account.is_loading).await.unwrap();

        store.dispatch(AccountAction::Withdraw(dec!(30))).await;
        store
            .dispatch(AccountAction::RequestLoan {
                amount: dec!(200),
                purpose: "car".into(),
            })
            .await;
        let state = store.state().await;
        assert_eq!(state.account.balance, dec!(170));
        assert!(state.account.is_loading);

        release.send(dec!(110)).unwrap();
        let action = task.await.unwrap().unwrap();
        assert_eq!(action, AccountAction::Deposit(dec!(110)));

        let state = store.state().await;
        assert_eq!(state.account.balance, dec!(280));
        assert_eq!(state.account.loan, dec!(200));
        assert!(!state.account.is_loading);
    }
}
