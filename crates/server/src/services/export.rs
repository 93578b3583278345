//! CSV export of sales and stock logs.

use thiserror::Error;

use crate::error::AppError;
use crate::models::sale::SaleDetail;
use crate::models::stock_log::StockLogEntry;

/// Errors from CSV serialization.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv flush failed: {0}")]
    Flush(String),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Render the sale list as CSV, one row per sale with items summarised.
///
/// # Errors
///
/// Returns `ExportError` if serialization fails.
pub fn sales_csv(sales: &[SaleDetail]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Sale ID",
        "Date",
        "Cashier",
        "Customer",
        "Items",
        "Payment Method",
        "Status",
        "Discount",
        "Tax",
        "Total",
        "Points Redeemed",
        "Points Earned",
    ])?;

    for detail in sales {
        let items = detail
            .items
            .iter()
            .map(|item| format!("{}x {}", item.quantity, item.product_name))
            .collect::<Vec<_>>()
            .join("; ");

        writer.write_record([
            detail.sale.id.to_string(),
            detail.sale.created_at.format("%Y-%m-%d %H:%M").to_string(),
            detail.cashier_name.clone(),
            detail
                .customer_name
                .clone()
                .unwrap_or_else(|| "Walk-in".to_string()),
            items,
            detail.sale.payment_method.to_string(),
            detail.sale.status.to_string(),
            detail.sale.discount_amount.to_string(),
            detail.sale.tax_amount.to_string(),
            detail.sale.total_amount.to_string(),
            detail.sale.points_redeemed.to_string(),
            detail.sale.points_earned.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}

/// Render stock log entries as CSV.
///
/// # Errors
///
/// Returns `ExportError` if serialization fails.
pub fn stock_logs_csv(entries: &[StockLogEntry]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Date",
        "Product",
        "SKU",
        "Action",
        "Change",
        "Previous Stock",
        "New Stock",
        "User",
        "Reason",
    ])?;

    for entry in entries {
        writer.write_record([
            entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            entry.product_name.clone(),
            entry.sku.clone(),
            entry.action.to_string(),
            entry.quantity_change.to_string(),
            entry.previous_stock.to_string(),
            entry.new_stock.to_string(),
            entry.user_name.clone().unwrap_or_default(),
            entry.reason.clone().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}
