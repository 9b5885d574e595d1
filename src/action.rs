use std::fmt;

use crate::{
    account::{AccountAction, AccountSlice},
    customer::{CustomerAction, CustomerSlice},
    store::Slice,
};

/// Everything that can be dispatched to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Account(AccountAction),
    Customer(CustomerAction),
    /// An action type no slice handles. Dispatching it is a no-op.
    Other(String),
}

impl Action {
    /// Wire name in `<slice>/<action>` form, e.g. `account/payLoan`.
    pub fn kind(&self) -> String {
        match self {
            Action::Account(action) => format!("{}/{}", AccountSlice::NAME, action.name()),
            Action::Customer(action) => format!("{}/{}", CustomerSlice::NAME, action.name()),
            Action::Other(kind) => kind.clone(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind())
    }
}

impl From<AccountAction> for Action {
    fn from(action: AccountAction) -> Self {
        Action::Account(action)
    }
}

impl From<CustomerAction> for Action {
    fn from(action: CustomerAction) -> Self {
        Action::Customer(action)
    }
}
