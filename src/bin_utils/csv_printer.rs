use std::io::Write;

use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::store::RootState;

#[derive(Debug, Serialize)]
pub struct StateRow<'a> {
    pub balance: Decimal,
    pub loan: Decimal,
    pub loan_purpose: &'a str,
    pub is_loading: bool,
    pub customer: &'a str,
}

impl<'a> From<&'a RootState> for StateRow<'a> {
    fn from(state: &'a RootState) -> Self {
        Self {
            balance: state.account.balance,
            loan: state.account.loan,
            loan_purpose: &state.account.loan_purpose,
            is_loading: state.account.is_loading,
            customer: &state.customer.full_name,
        }
    }
}

pub fn print_state<W>(output: &mut W, state: &RootState) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    if let Err(err) = writer.serialize(StateRow::from(state)) {
        anyhow::bail!("Failed to write to CSV: {err}")
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
