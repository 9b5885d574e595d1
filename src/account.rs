use rust_decimal::Decimal;
use serde::Serialize;

use crate::{action::Action, store::Slice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAction {
    /// Domestic-currency amount, already converted if it came from elsewhere.
    Deposit(Decimal),
    ConvertingCurrency,
    Withdraw(Decimal),
    RequestLoan { amount: Decimal, purpose: String },
    PayLoan,
    ConversionFailed,
}

impl AccountAction {
    pub fn name(&self) -> &'static str {
        match self {
            AccountAction::Deposit(_) => "deposit",
            AccountAction::ConvertingCurrency => "convertingCurrency",
            AccountAction::Withdraw(_) => "withdraw",
            AccountAction::RequestLoan { .. } => "requestLoan",
            AccountAction::PayLoan => "payLoan",
            AccountAction::ConversionFailed => "conversionFailed",
        }
    }
}

/// Balance and loan of the single session account.
///
/// `loan` is zero exactly when `loan_purpose` is empty, as long as loans are
/// requested with a positive amount. Amounts are not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountState {
    pub balance: Decimal,
    pub loan: Decimal,
    pub loan_purpose: String,
    pub is_loading: bool,
}

impl AccountState {
    pub fn has_loan(&self) -> bool {
        self.loan > Decimal::ZERO
    }

    /// Returns the state that results from `action`. Never mutates `self`.
    pub fn apply(&self, action: &AccountAction) -> AccountState {
        match action {
            AccountAction::Deposit(amount) => AccountState {
                balance: self.balance + *amount,
                is_loading: false,
                ..self.clone()
            },
            AccountAction::ConvertingCurrency => AccountState {
                is_loading: true,
                ..self.clone()
            },
            AccountAction::Withdraw(amount) => AccountState {
                balance: self.balance - *amount,
                ..self.clone()
            },
            AccountAction::RequestLoan { amount, purpose } => {
                // one loan at a time
                if self.has_loan() {
                    return self.clone();
                }
                AccountState {
                    balance: self.balance + *amount,
                    loan: *amount,
                    loan_purpose: purpose.clone(),
                    ..self.clone()
                }
            }
            AccountAction::PayLoan => AccountState {
                balance: self.balance - self.loan,
                loan: Decimal::ZERO,
                loan_purpose: String::new(),
                ..self.clone()
            },
            AccountAction::ConversionFailed => AccountState {
                is_loading: false,
                ..self.clone()
            },
        }
    }
}

/// Transition over the root action type. Actions addressed to other slices, or
/// not recognized at all, leave the account untouched.
pub fn apply(state: &AccountState, action: &Action) -> AccountState {
    match action {
        Action::Account(action) => state.apply(action),
        Action::Customer(_) | Action::Other(_) => state.clone(),
    }
}

pub struct AccountSlice;

impl Slice for AccountSlice {
    const NAME: &'static str = "account";
    type State = AccountState;
    type Action = AccountAction;

    fn reduce(state: &mut AccountState, action: AccountAction) {
        *state = state.apply(&action);
    }
}
