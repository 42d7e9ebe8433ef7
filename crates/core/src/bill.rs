use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::format::format_status;
use crate::parse::parse_int;
use crate::types::BillId;

/// Percentage applied when a bill carries no usable `pct`.
pub const DEFAULT_PCT: i64 = 20;

fn default_pct() -> i64 {
    DEFAULT_PCT
}

/// Lifecycle status of a bill, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    /// Interpret a raw status keyword. Anything other than `pending` or
    /// `accepted` counts as refused.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            _ => Self::Refused,
        }
    }

    /// The keyword stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
        }
    }

    /// The label shown to employees.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::Accepted => "Accepté",
            Self::Refused => "Refusé",
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bill as exchanged with the store.
///
/// Every field tolerates being absent in store payloads. Fields this type
/// does not know about are kept in [`extra`](Self::extra) so that records
/// survive a read/display round without losing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    /// Store-assigned identifier. Absent on records built client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BillId>,
    /// Owner of the bill.
    #[serde(default)]
    pub email: String,
    /// Expense category (e.g. `"Transports"`).
    #[serde(rename = "type", default)]
    pub expense_type: String,
    /// Free-text label.
    #[serde(default)]
    pub name: String,
    /// Amount, `None` when the submitted value was not a number.
    #[serde(default, deserialize_with = "lenient_int")]
    pub amount: Option<i64>,
    /// Expense date, normally `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// VAT amount as typed by the employee.
    #[serde(default, deserialize_with = "lenient_text")]
    pub vat: String,
    /// Percentage, [`DEFAULT_PCT`] when absent or unparseable.
    #[serde(default = "default_pct", deserialize_with = "lenient_pct")]
    pub pct: i64,
    #[serde(default)]
    pub commentary: Option<String>,
    /// Remote location of the receipt image.
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Raw status keyword; see [`BillStatus::from_raw`].
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BillRecord {
    fn default() -> Self {
        Self {
            id: None,
            email: String::new(),
            expense_type: String::new(),
            name: String::new(),
            amount: None,
            date: String::new(),
            vat: String::new(),
            pct: DEFAULT_PCT,
            commentary: None,
            file_url: None,
            file_name: None,
            status: String::new(),
            extra: Map::new(),
        }
    }
}

impl BillRecord {
    /// Typed view of the raw status.
    pub fn bill_status(&self) -> BillStatus {
        BillStatus::from_raw(&self.status)
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(int_from_value))
}

fn lenient_pct<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_int(deserializer)?.unwrap_or(DEFAULT_PCT))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

#[allow(clippy::cast_possible_truncation)]
fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int(s),
        _ => None,
    }
}

/// Read-only projection of a [`BillRecord`] for the list view.
///
/// The status is always replaced by its label. The date is replaced by its
/// display label only when it could be formatted; otherwise the raw value
/// is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayBill {
    record: BillRecord,
    #[serde(skip)]
    date_formatted: bool,
}

impl DisplayBill {
    /// Projection with a successfully formatted date.
    pub fn formatted(mut record: BillRecord, date_label: String) -> Self {
        record.date = date_label;
        record.status = format_status(&record.status).to_owned();
        Self {
            record,
            date_formatted: true,
        }
    }

    /// Projection that keeps the raw date verbatim.
    pub fn with_raw_date(mut record: BillRecord) -> Self {
        record.status = format_status(&record.status).to_owned();
        Self {
            record,
            date_formatted: false,
        }
    }

    pub fn id(&self) -> Option<&BillId> {
        self.record.id.as_ref()
    }

    /// Display date, or the raw date when formatting failed.
    pub fn date(&self) -> &str {
        &self.record.date
    }

    /// Status label.
    pub fn status(&self) -> &str {
        &self.record.status
    }

    /// Whether [`date`](Self::date) holds a formatted label.
    pub fn is_date_formatted(&self) -> bool {
        self.date_formatted
    }

    pub fn record(&self) -> &BillRecord {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_store_payload() {
        let json = serde_json::json!({
            "id": "47qAXb6fIm2zOKkLzMro",
            "vat": "80",
            "fileUrl": "https://test.storage.tld/v0/b/billable.png",
            "status": "pending",
            "type": "Hôtel et logement",
            "commentary": "séminaire billed",
            "name": "encore",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "date": "2004-04-04",
            "amount": 400,
            "commentAdmin": "ok",
            "email": "a@a",
            "pct": 20
        });

        let bill: BillRecord = serde_json::from_value(json).unwrap();
        assert_eq!(bill.id.as_deref(), Some("47qAXb6fIm2zOKkLzMro"));
        assert_eq!(bill.expense_type, "Hôtel et logement");
        assert_eq!(bill.amount, Some(400));
        assert_eq!(bill.pct, 20);
        assert_eq!(bill.bill_status(), BillStatus::Pending);
        assert_eq!(bill.extra.get("commentAdmin"), Some(&Value::from("ok")));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let bill: BillRecord =
            serde_json::from_value(serde_json::json!({"id": "1", "date": "2022-01-01"})).unwrap();
        assert_eq!(bill.pct, DEFAULT_PCT);
        assert_eq!(bill.amount, None);
        assert!(bill.status.is_empty());
        assert!(bill.file_url.is_none());
        assert!(bill.extra.is_empty());
    }

    #[test]
    fn lenient_numeric_fields() {
        let bill: BillRecord = serde_json::from_value(serde_json::json!({
            "amount": "42",
            "pct": null,
            "vat": 70
        }))
        .unwrap();
        assert_eq!(bill.amount, Some(42));
        assert_eq!(bill.pct, DEFAULT_PCT);
        assert_eq!(bill.vat, "70");

        let bill: BillRecord =
            serde_json::from_value(serde_json::json!({"amount": 12.9, "pct": "abc"})).unwrap();
        assert_eq!(bill.amount, Some(12));
        assert_eq!(bill.pct, DEFAULT_PCT);
    }

    #[test]
    fn client_side_record_serializes_without_id() {
        let bill: BillRecord = serde_json::from_value(serde_json::json!({
            "email": "test@test.com",
            "type": "Transports",
            "amount": null,
            "status": "pending"
        }))
        .unwrap();
        let json = serde_json::to_value(&bill).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["type"], "Transports");
        assert_eq!(json["amount"], Value::Null);
        assert_eq!(json["pct"], 20);
        assert_eq!(json["fileUrl"], Value::Null);
    }

    #[test]
    fn display_projection_keeps_raw_date_on_request() {
        let bill: BillRecord = serde_json::from_value(
            serde_json::json!({"id": "1", "date": "bad-date", "status": "accepted"}),
        )
        .unwrap();

        let display = DisplayBill::with_raw_date(bill.clone());
        assert_eq!(display.date(), "bad-date");
        assert_eq!(display.status(), "Accepté");
        assert!(!display.is_date_formatted());

        let display = DisplayBill::formatted(bill, "1 Jan. 22".into());
        assert_eq!(display.date(), "1 Jan. 22");
        assert!(display.is_date_formatted());

        let json = serde_json::to_value(&display).unwrap();
        assert_eq!(json["date"], "1 Jan. 22");
        assert_eq!(json["status"], "Accepté");
    }

    #[test]
    fn status_round_trips_keyword() {
        for status in [BillStatus::Pending, BillStatus::Accepted, BillStatus::Refused] {
            assert_eq!(BillStatus::from_raw(status.as_str()), status);
        }
    }
}
