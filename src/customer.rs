use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::Slice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerAction {
    CreateCustomer {
        full_name: String,
        national_id: String,
        created_at: DateTime<Utc>,
    },
    UpdateName(String),
}

impl CustomerAction {
    pub fn name(&self) -> &'static str {
        match self {
            CustomerAction::CreateCustomer { .. } => "createCustomer",
            CustomerAction::UpdateName(_) => "updateName",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerState {
    pub full_name: String,
    pub national_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl CustomerState {
    pub fn exists(&self) -> bool {
        self.created_at.is_some()
    }
}

pub struct CustomerSlice;

impl Slice for CustomerSlice {
    const NAME: &'static str = "customer";
    type State = CustomerState;
    type Action = CustomerAction;

    fn reduce(state: &mut CustomerState, action: CustomerAction) {
        match action {
            CustomerAction::CreateCustomer {
                full_name,
                national_id,
                created_at,
            } => {
                state.full_name = full_name;
                state.national_id = national_id;
                state.created_at = Some(created_at);
            }
            CustomerAction::UpdateName(full_name) => {
                state.full_name = full_name;
            }
        }
    }
}

/// Welcome line shown to the current customer.
pub fn greeting(customer: &CustomerState) -> String {
    format!("👋 Welcome, {}", customer.full_name)
}
