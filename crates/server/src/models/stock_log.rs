//! Stock audit log models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tillpoint_core::{ProductId, StockAction, StockLogId, UserId};

/// One stock movement, joined with product and user display fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLogEntry {
    pub id: StockLogId,
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
    pub action: StockAction,
    pub quantity_change: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values for inserting a stock log row inside an open transaction.
#[derive(Debug)]
pub struct NewStockLog<'a> {
    pub product_id: ProductId,
    pub user_id: Option<UserId>,
    pub action: StockAction,
    pub quantity_change: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: Option<&'a str>,
}

/// Listing filters for `GET /api/inventory/logs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLogFilter {
    pub product_id: Option<ProductId>,
    pub action: Option<StockAction>,
}

/// Classify a manual stock adjustment from its free-text reason.
///
/// Reasons mentioning restocking map to `Restock`, returns to `Return`,
/// theft or loss to `Theft`; anything else is a plain `Adjustment`.
#[must_use]
pub fn infer_stock_action(reason: Option<&str>) -> StockAction {
    let Some(reason) = reason else {
        return StockAction::Adjustment;
    };
    let lower = reason.to_lowercase();
    if lower.contains("restock") || lower.contains("receiv") || lower.contains("purchase") {
        StockAction::Restock
    } else if lower.contains("return") {
        StockAction::Return
    } else if lower.contains("theft") || lower.contains("stolen") || lower.contains("loss") {
        StockAction::Theft
    } else {
        StockAction::Adjustment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reason_is_adjustment() {
        assert_eq!(infer_stock_action(None), StockAction::Adjustment);
    }

    #[test]
    fn restock_keywords() {
        assert_eq!(
            infer_stock_action(Some("Restocked from supplier")),
            StockAction::Restock
        );
        assert_eq!(
            infer_stock_action(Some("received weekly delivery")),
            StockAction::Restock
        );
    }

    #[test]
    fn return_keyword() {
        assert_eq!(
            infer_stock_action(Some("customer return, unopened")),
            StockAction::Return
        );
    }

    #[test]
    fn theft_and_loss_keywords() {
        assert_eq!(infer_stock_action(Some("theft")), StockAction::Theft);
        assert_eq!(
            infer_stock_action(Some("inventory loss after audit")),
            StockAction::Theft
        );
    }

    #[test]
    fn anything_else_is_adjustment() {
        assert_eq!(
            infer_stock_action(Some("recount after stocktake")),
            StockAction::Adjustment
        );
    }
}
