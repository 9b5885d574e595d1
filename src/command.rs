use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::AccountAction, action::Action, currency::Currency, customer::CustomerAction,
};

/// Loosely typed payload fields as they arrive from a script row.
#[derive(Debug, Clone, Default)]
pub struct ActionFields {
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub purpose: Option<String>,
    pub name: Option<String>,
    pub national_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain action, dispatched as is.
    Dispatch(Action),
    /// Deposit that may need a currency conversion first.
    Deposit { amount: Decimal, currency: Currency },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Amount is required for {kind}")]
    AmountRequired { kind: String },
    #[error("Field `{field}` is required for {kind}")]
    FieldRequired { kind: String, field: &'static str },
}

impl Command {
    /// Builds a command from an action type name and its payload fields.
    ///
    /// Unknown type names are not an error: they become [`Action::Other`] and
    /// are ignored by the store.
    pub fn parse(
        kind: &str,
        fields: ActionFields,
        domestic: &Currency,
    ) -> Result<Self, CommandError> {
        let account = |action: AccountAction| -> Result<Self, CommandError> {
            Ok(Self::Dispatch(Action::Account(action)))
        };
        match kind {
            "deposit" => Ok(Self::Deposit {
                amount: Self::amount(kind, fields.amount)?,
                currency: fields.currency.unwrap_or_else(|| domestic.clone()),
            }),
            "withdraw" => account(AccountAction::Withdraw(Self::amount(kind, fields.amount)?)),
            "requestLoan" => account(AccountAction::RequestLoan {
                amount: Self::amount(kind, fields.amount)?,
                purpose: Self::field(kind, "purpose", fields.purpose)?,
            }),
            "payLoan" => account(AccountAction::PayLoan),
            "convertingCurrency" => account(AccountAction::ConvertingCurrency),
            "conversionFailed" => account(AccountAction::ConversionFailed),
            "createCustomer" => Ok(Self::Dispatch(Action::Customer(
                CustomerAction::CreateCustomer {
                    full_name: Self::field(kind, "name", fields.name)?,
                    national_id: Self::field(kind, "national_id", fields.national_id)?,
                    created_at: Utc::now(),
                },
            ))),
            "updateName" => Ok(Self::Dispatch(Action::Customer(CustomerAction::UpdateName(
                Self::field(kind, "name", fields.name)?,
            )))),
            other => Ok(Self::Dispatch(Action::Other(other.to_string()))),
        }
    }

    fn amount(kind: &str, amount: Option<Decimal>) -> Result<Decimal, CommandError> {
        amount.ok_or_else(|| CommandError::AmountRequired {
            kind: kind.to_string(),
        })
    }

    fn field(
        kind: &str,
        field: &'static str,
        value: Option<String>,
    ) -> Result<String, CommandError> {
        value.ok_or_else(|| CommandError::FieldRequired {
            kind: kind.to_string(),
            field,
        })
    }
}
