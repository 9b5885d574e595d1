use std::io::Read;

use crate::{command::ActionFields, currency::Currency};
use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ScriptRow {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub purpose: Option<String>,
    pub name: Option<String>,
    pub national_id: Option<String>,
}

impl ScriptRow {
    pub fn into_parts(self) -> (String, ActionFields) {
        (
            self.kind,
            ActionFields {
                amount: self.amount,
                currency: self.currency,
                purpose: self.purpose,
                name: self.name,
                national_id: self.national_id,
            },
        )
    }
}

/// Parses an action script in CSV format, one action per row.
pub struct CsvScriptParser<R> {
    iter: DeserializeRecordsIntoIter<R, ScriptRow>,
}

impl<R> CsvScriptParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvScriptParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<ScriptRow>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
