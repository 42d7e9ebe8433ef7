use std::fmt::Write;
use std::sync::Arc;

use billed_core::DisplayBill;
use billed_employee::BillList;
use billed_store::Store;

use super::LogNavigator;
use crate::OutputFormat;

pub async fn run(store: Arc<dyn Store>, format: &OutputFormat) -> anyhow::Result<()> {
    let list = BillList::new(Some(store), Arc::new(LogNavigator));
    let bills = list.fetch_bills().await?.unwrap_or_default();
    print!("{}", render(&bills, format)?);
    Ok(())
}

fn render(bills: &[DisplayBill], format: &OutputFormat) -> anyhow::Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(bills)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{} bills:", bills.len())?;
            for bill in bills {
                let record = bill.record();
                let amount = record
                    .amount
                    .map_or_else(|| "-".to_owned(), |amount| format!("{amount} €"));
                writeln!(
                    out,
                    "  {date:<12} {status:<11} {amount:>8}  {kind} / {name}",
                    date = bill.date(),
                    status = bill.status(),
                    kind = record.expense_type,
                    name = record.name,
                )?;
            }
        }
    }
    Ok(out)
}
