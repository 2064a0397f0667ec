//! Raw ledger records and their normalization into canonical transactions

use super::error::IngestError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lending-protocol action category
///
/// Parsed case-insensitively. Anything outside the four known actions is kept
/// verbatim (lower-cased) so it still counts toward `tx_count`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Deposit,
    Borrow,
    Repay,
    Liquidation,
    Other(String),
}

impl Action {
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        match lowered.as_str() {
            "deposit" => Action::Deposit,
            "borrow" => Action::Borrow,
            "repay" => Action::Repay,
            "liquidation" => Action::Liquidation,
            _ => Action::Other(lowered),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::Deposit => "deposit",
            Action::Borrow => "borrow",
            Action::Repay => "repay",
            Action::Liquidation => "liquidation",
            Action::Other(s) => s.as_str(),
        }
    }
}

/// One ledger entry as it appears in the input file.
///
/// Every field is optional and loosely typed: amounts and block numbers show
/// up both as JSON numbers and as decimal strings, so they stay as `Value`
/// until [`TransactionRecord::from_raw`] coerces them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub user_wallet: Option<Value>,
    #[serde(default)]
    pub tx_hash: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub block_number: Option<Value>,
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub protocol: Option<Value>,
    #[serde(default)]
    pub action_data: Option<Value>,
}

/// Action-specific detail carried through from `actionData`; not scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionDetails {
    pub borrow_rate_mode: Option<String>,
    pub borrow_rate: Option<f64>,
    pub repay_amount: Option<f64>,
    pub liquidated_collateral_amount: Option<f64>,
    pub liquidated_user: Option<String>,
}

/// Canonical transaction consumed by the scoring core
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub wallet: String,
    pub tx_hash: String,
    pub timestamp: DateTime<Utc>,
    pub block_number: u64,
    pub action: Action,
    pub asset: String,
    pub amount: f64,
    pub protocol: String,
    pub details: ActionDetails,
}

impl TransactionRecord {
    /// Build a record directly from already-typed values.
    pub fn new(
        wallet: &str,
        timestamp: DateTime<Utc>,
        action: Action,
        asset: &str,
        amount: f64,
    ) -> Self {
        Self {
            wallet: wallet.to_lowercase(),
            tx_hash: String::new(),
            timestamp,
            block_number: 0,
            action,
            asset: asset.to_string(),
            amount: sanitize_amount(amount),
            protocol: String::new(),
            details: ActionDetails::default(),
        }
    }

    /// Coerce a raw ledger entry into canonical shape.
    ///
    /// Fails only for entries that cannot be attributed or placed in time:
    /// a wallet that is not a string, or a timestamp that is present but
    /// unparsable. Missing fields fall back to empty strings, zero, or the
    /// Unix epoch.
    pub fn from_raw(raw: RawTransaction) -> Result<Self, IngestError> {
        let wallet = match raw.user_wallet {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.to_lowercase(),
            Some(other) => {
                return Err(IngestError::InvalidRecord(format!(
                    "userWallet is not a string: {}",
                    other
                )))
            }
        };

        let timestamp = parse_timestamp(raw.timestamp.as_ref())?;
        let action = Action::parse(&text_or_empty(raw.action.as_ref()));

        let empty = Map::new();
        let data = match raw.action_data.as_ref() {
            Some(Value::Object(map)) => map,
            _ => &empty,
        };

        let details = ActionDetails {
            borrow_rate_mode: data.get("borrowRateMode").and_then(value_as_text),
            borrow_rate: data.get("borrowRate").map(|v| parse_amount(Some(v))),
            repay_amount: data.get("repayAmount").map(|v| parse_amount(Some(v))),
            liquidated_collateral_amount: data
                .get("liquidatedCollateralAmount")
                .map(|v| parse_amount(Some(v))),
            liquidated_user: data.get("liquidatedUser").and_then(value_as_text),
        };

        Ok(Self {
            wallet,
            tx_hash: text_or_empty(raw.tx_hash.as_ref()),
            timestamp,
            block_number: parse_block_number(raw.block_number.as_ref()),
            action,
            asset: text_or_empty(data.get("asset")),
            amount: parse_amount(data.get("amount")),
            protocol: text_or_empty(raw.protocol.as_ref()).to_lowercase(),
            details,
        })
    }
}

/// Best-effort numeric parse, default 0.
///
/// Accepts JSON numbers and decimal strings. Absent, unparsable, non-finite
/// or negative values all become `0.0`; this never fails.
pub fn parse_amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.map(sanitize_amount).unwrap_or(0.0)
}

fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        0.0
    }
}

/// Block height, default 0
pub fn parse_block_number(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Parse a ledger timestamp.
///
/// Integers (or integer strings) are Unix seconds. Other strings are tried as
/// RFC 3339, `%Y-%m-%d %H:%M:%S`, then `%Y-%m-%d`. A missing timestamp is the
/// Unix epoch.
pub fn parse_timestamp(value: Option<&Value>) -> Result<DateTime<Utc>, IngestError> {
    let invalid = |v: &Value| IngestError::InvalidRecord(format!("unparsable timestamp: {}", v));

    match value {
        None | Some(Value::Null) => Ok(DateTime::<Utc>::default()),
        Some(v @ Value::Number(n)) => {
            let secs = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .ok_or_else(|| invalid(v))?;
            Utc.timestamp_opt(secs, 0).single().ok_or_else(|| invalid(v))
        }
        Some(v @ Value::String(s)) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<i64>() {
                return Utc.timestamp_opt(secs, 0).single().ok_or_else(|| invalid(v));
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Ok(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
                .ok_or_else(|| invalid(v))
        }
        Some(other) => Err(invalid(other)),
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_or_empty(value: Option<&Value>) -> String {
    value.and_then(value_as_text).unwrap_or_default()
}
