//! Drives an action script through the store, the way the binary does it.
//! Kept in the library so integration tests can run it too.

use std::io::{Read, Write};

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use crate::{
    command::{Command, CommandError},
    config::BankConfig,
    conversion::{ConversionError, DepositCoordinator, RateSource},
    customer::greeting,
    store::StoreHandle,
};
use csv_parser::CsvScriptParser;
use csv_printer::print_state;

pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    ConversionErr(#[from] ConversionError),
}

pub struct Service<'w, R, W: 'w, S> {
    pub input: R,
    pub output: &'w mut W,
    pub rates: S,
    pub config: BankConfig,
    pub error_printer: Box<dyn FnMut(u64, ProcessError)>,
}

impl<'w, R, W, S> Service<'w, R, W, S>
where
    R: Read,
    W: Write + 'w,
    S: RateSource,
{
    pub async fn run(mut self) -> Result<()> {
        let parser = CsvScriptParser::new(self.input);
        let store = StoreHandle::default();
        let coordinator = DepositCoordinator::from_config(self.rates, &self.config);

        for (line, row) in parser {
            let command = row.map_err(ProcessError::from).and_then(|row| {
                let (kind, fields) = row.into_parts();
                Ok(Command::parse(&kind, fields, coordinator.domestic())?)
            });
            let result = match command {
                Ok(Command::Dispatch(action)) => {
                    store.dispatch(action).await;
                    Ok(())
                }
                Ok(Command::Deposit { amount, currency }) => coordinator
                    .run(&store, amount, currency)
                    .await
                    .map(|_| ())
                    .map_err(ProcessError::from),
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                (self.error_printer)(line, err);
            }
        }

        let state = store.state().await;
        if state.customer.exists() {
            info!("{}", greeting(&state.customer));
        }
        print_state(self.output, &state)
    }
}
