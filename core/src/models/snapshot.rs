//! Source snapshot document shape
//!
//! The on-disk JSON documents read by the Sync Engine (spec §6). Kept as a
//! distinct type from [`crate::models::connection::ConnectionPayload`] per
//! the re-architecting note in SPEC_FULL.md/spec §9: the storage boundary
//! has one unambiguous typed shape, decoded once, rather than the source
//! prototype's mix of "sometimes a JSON string, sometimes a decoded map."

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::connection::Entry;
use crate::models::transaction::Transaction;

/// Raw snapshot document as read from disk (spec §6 "Source snapshot
/// format").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub account_id: Option<String>,
    pub status: Option<String>,
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub monthly_summary: serde_json::Value,
}

/// Map a connection's display name to its snapshot filename (spec §6).
/// Falls back to lowercase-with-underscores + `.json` for unrecognized
/// names, exactly as the spec requires — there is no "unknown source"
/// error path, only the fallback.
pub fn snapshot_filename(display_name: &str) -> String {
    let known = [
        ("phonepe", "phonepe.json"),
        ("google pay", "gpay.json"),
        ("gpay", "gpay.json"),
        ("paytm", "paytm.json"),
        ("hdfc bank", "hdfc.json"),
        ("icici bank", "icici.json"),
        ("sbi bank", "sbi.json"),
        ("cash income", "cash_income.json"),
        ("testincome", "testincome.json"),
        ("testspend", "testspend.json"),
    ];
    let lower = display_name.to_lowercase();
    for (name, file) in known {
        if lower == name {
            return file.to_string();
        }
    }
    format!("{}.json", lower.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_display_names_map_to_fixed_files() {
        assert_eq!(snapshot_filename("PhonePe"), "phonepe.json");
        assert_eq!(snapshot_filename("Google Pay"), "gpay.json");
        assert_eq!(snapshot_filename("GPay"), "gpay.json");
        assert_eq!(snapshot_filename("HDFC Bank"), "hdfc.json");
    }

    #[test]
    fn unknown_display_name_falls_back_to_slug() {
        assert_eq!(snapshot_filename("My Custom Wallet"), "my_custom_wallet.json");
    }
}
