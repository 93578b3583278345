//! Checkout: cart validation, totals, and the sale transaction.
//!
//! Everything the sale touches happens in one database transaction:
//! loyalty point redemption and accrual, the sale and item rows, the stock
//! decrements and their audit log rows. Any failure rolls the whole sale
//! back.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use thiserror::Error;

use tillpoint_core::{StockAction, UserId};

use crate::db::sales::{self, NewSale, NewSaleItem};
use crate::db::settings::SettingsRepository;
use crate::db::stock_logs;
use crate::db::{RepositoryError, SaleRepository};
use crate::models::sale::{CreateSaleInput, SaleDetail, SaleLineInput};
use crate::models::stock_log::NewStockLog;

/// Fixed redemption rate: 20 loyalty points are worth one currency unit.
pub const POINTS_PER_CURRENCY_UNIT: i32 = 20;

/// Errors from checkout validation or the sale transaction.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("item quantity must be at least 1")]
    InvalidQuantity,

    #[error("prices, discounts and points must not be negative")]
    NegativeAmount,

    #[error("a customer is required to redeem loyalty points")]
    CustomerRequired,

    #[error("customer does not exist")]
    CustomerNotFound,

    #[error("insufficient stock for {0}")]
    InsufficientStock(String),

    #[error("customer does not have enough loyalty points")]
    InsufficientPoints,

    #[error("product is not available: {0}")]
    ProductUnavailable(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Computed cart amounts, all rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of line subtotals (unit price × quantity − line discount).
    pub subtotal: Decimal,
    /// Currency value of the redeemed loyalty points.
    pub redemption_value: Decimal,
    /// Subtotal after the sale discount and redemption, floored at zero.
    pub discounted: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute cart totals from the line items and sale-level reductions.
///
/// `tax_rate` is a percentage (10 means 10%), applied after discounts and
/// point redemption.
#[must_use]
pub fn compute_totals(
    items: &[SaleLineInput],
    discount_amount: Decimal,
    points_redeemed: i32,
    tax_rate: Decimal,
) -> CartTotals {
    let subtotal: Decimal = items
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity) - line.discount_amount)
        .sum();

    let redemption_value =
        (Decimal::from(points_redeemed) / Decimal::from(POINTS_PER_CURRENCY_UNIT)).round_dp(2);
    let discounted = (subtotal - discount_amount - redemption_value).max(Decimal::ZERO);
    let tax = (discounted * tax_rate / Decimal::from(100)).round_dp(2);
    let total = (discounted + tax).round_dp(2);

    CartTotals {
        subtotal: subtotal.round_dp(2),
        redemption_value,
        discounted: discounted.round_dp(2),
        tax,
        total,
    }
}

/// Loyalty points earned for a sale: `floor(total × rate)`, never negative.
#[must_use]
pub fn points_earned(total: Decimal, loyalty_rate: Decimal) -> i32 {
    (total * loyalty_rate)
        .floor()
        .to_i32()
        .unwrap_or(0)
        .max(0)
}

/// Reject carts that cannot be sold before touching the database.
fn validate(input: &CreateSaleInput) -> Result<(), CheckoutError> {
    if input.items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if input.items.iter().any(|line| line.quantity < 1) {
        return Err(CheckoutError::InvalidQuantity);
    }
    let negative = input.points_redeemed < 0
        || input.discount_amount < Decimal::ZERO
        || input
            .items
            .iter()
            .any(|line| line.unit_price < Decimal::ZERO || line.discount_amount < Decimal::ZERO);
    if negative {
        return Err(CheckoutError::NegativeAmount);
    }
    if input.points_redeemed > 0 && input.customer_id.is_none() {
        return Err(CheckoutError::CustomerRequired);
    }
    Ok(())
}

/// Checkout service. Owns the sale transaction.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run a checkout as one transaction and return the stored sale.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any write, `CustomerNotFound` when
    /// the named customer does not exist, `InsufficientPoints` or
    /// `InsufficientStock` when balances do not cover the request (rolling
    /// everything back), and `Repository` for database failures.
    pub async fn create_sale(
        &self,
        cashier: UserId,
        input: &CreateSaleInput,
    ) -> Result<SaleDetail, CheckoutError> {
        validate(input)?;

        let settings = SettingsRepository::new(self.pool).get_or_init().await?;
        let totals = compute_totals(
            &input.items,
            input.discount_amount,
            input.points_redeemed,
            settings.tax_rate,
        );
        let earned = if input.customer_id.is_some() {
            points_earned(totals.total, settings.loyalty_rate)
        } else {
            0
        };

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // Lock the customer row up front: this rejects unknown customers
        // before any write and serialises concurrent sales for the same
        // customer.
        if let Some(customer_id) = input.customer_id {
            let balance = sqlx::query_scalar::<_, i32>(
                "SELECT loyalty_points FROM customer WHERE id = $1 FOR UPDATE",
            )
            .bind(customer_id.as_i32())
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::from)?
            .ok_or(CheckoutError::CustomerNotFound)?;

            if balance < input.points_redeemed {
                return Err(CheckoutError::InsufficientPoints);
            }

            if input.points_redeemed > 0 {
                sqlx::query(
                    "UPDATE customer SET loyalty_points = loyalty_points - $1 WHERE id = $2",
                )
                .bind(input.points_redeemed)
                .bind(customer_id.as_i32())
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from)?;
            }
        }

        let sale_id = sales::insert_sale(
            &mut tx,
            &NewSale {
                user_id: cashier,
                customer_id: input.customer_id,
                total_amount: totals.total,
                tax_amount: totals.tax,
                discount_amount: input.discount_amount,
                points_redeemed: input.points_redeemed,
                points_earned: earned,
                payment_method: input.payment_method,
            },
        )
        .await
        .map_err(RepositoryError::from)?;

        for line in &input.items {
            // Conditional decrement: zero rows means missing, inactive, or
            // not enough stock.
            let updated = sqlx::query_as::<_, (i32, String)>(
                "UPDATE product
                 SET stock_quantity = stock_quantity - $2
                 WHERE id = $1 AND is_active AND stock_quantity >= $2
                 RETURNING stock_quantity, name",
            )
            .bind(line.product_id.as_i32())
            .bind(line.quantity)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            let Some((new_stock, _name)) = updated else {
                return Err(self.classify_line_failure(&mut tx, line).await);
            };

            let subtotal = (line.unit_price * Decimal::from(line.quantity)
                - line.discount_amount)
                .round_dp(2);
            sales::insert_item(
                &mut tx,
                sale_id,
                &NewSaleItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    discount_amount: line.discount_amount,
                    subtotal,
                },
            )
            .await
            .map_err(RepositoryError::from)?;

            stock_logs::insert(
                &mut tx,
                &NewStockLog {
                    product_id: line.product_id,
                    user_id: Some(cashier),
                    action: StockAction::Sale,
                    quantity_change: -line.quantity,
                    previous_stock: new_stock + line.quantity,
                    new_stock,
                    reason: None,
                },
            )
            .await
            .map_err(RepositoryError::from)?;
        }

        if earned > 0
            && let Some(customer_id) = input.customer_id
        {
            sqlx::query("UPDATE customer SET loyalty_points = loyalty_points + $1 WHERE id = $2")
                .bind(earned)
                .bind(customer_id.as_i32())
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from)?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        SaleRepository::new(self.pool)
            .get_by_id(sale_id)
            .await?
            .ok_or(CheckoutError::Repository(RepositoryError::NotFound))
    }

    /// Work out why a stock decrement matched no rows.
    async fn classify_line_failure(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        line: &SaleLineInput,
    ) -> CheckoutError {
        let product = sqlx::query_as::<_, (String, bool)>(
            "SELECT name, is_active FROM product WHERE id = $1",
        )
        .bind(line.product_id.as_i32())
        .fetch_optional(&mut **tx)
        .await;

        match product {
            Ok(Some((name, true))) => CheckoutError::InsufficientStock(name),
            Ok(Some((name, false))) => CheckoutError::ProductUnavailable(name),
            Ok(None) => CheckoutError::ProductUnavailable(format!(
                "product {} does not exist",
                line.product_id
            )),
            Err(e) => CheckoutError::Repository(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tillpoint_core::{PaymentMethod, ProductId};

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn line(price: &str, qty: i32, discount: &str) -> SaleLineInput {
        SaleLineInput {
            product_id: ProductId::new(1),
            quantity: qty,
            unit_price: dec(price),
            discount_amount: dec(discount),
        }
    }

    fn cart(items: Vec<SaleLineInput>) -> CreateSaleInput {
        CreateSaleInput {
            items,
            discount_amount: Decimal::ZERO,
            payment_method: PaymentMethod::Cash,
            customer_id: None,
            points_redeemed: 0,
        }
    }

    #[test]
    fn totals_for_single_line_with_tax() {
        let totals = compute_totals(&[line("10.00", 2, "0.00")], Decimal::ZERO, 0, dec("10"));
        assert_eq!(totals.subtotal, dec("20.00"));
        assert_eq!(totals.tax, dec("2.00"));
        assert_eq!(totals.total, dec("22.00"));
    }

    #[test]
    fn line_and_sale_discounts_reduce_the_taxable_amount() {
        let totals = compute_totals(&[line("10.00", 3, "1.00")], dec("4.00"), 0, dec("10"));
        // 30 - 1 = 29 subtotal, minus 4 sale discount = 25 taxable
        assert_eq!(totals.subtotal, dec("29.00"));
        assert_eq!(totals.discounted, dec("25.00"));
        assert_eq!(totals.tax, dec("2.50"));
        assert_eq!(totals.total, dec("27.50"));
    }

    #[test]
    fn twenty_points_are_worth_one_currency_unit() {
        let totals = compute_totals(&[line("10.00", 1, "0.00")], Decimal::ZERO, 40, dec("0"));
        assert_eq!(totals.redemption_value, dec("2.00"));
        assert_eq!(totals.total, dec("8.00"));
    }

    #[test]
    fn redemption_cannot_push_the_total_below_zero() {
        let totals = compute_totals(&[line("1.00", 1, "0.00")], Decimal::ZERO, 100, dec("10"));
        assert_eq!(totals.discounted, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn earned_points_floor_the_product() {
        assert_eq!(points_earned(dec("27.50"), dec("1")), 27);
        assert_eq!(points_earned(dec("27.50"), dec("2")), 55);
        assert_eq!(points_earned(dec("0.99"), dec("1")), 0);
    }

    #[test]
    fn negative_rates_never_earn_points() {
        assert_eq!(points_earned(dec("10.00"), dec("-1")), 0);
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert!(matches!(
            validate(&cart(vec![])),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(matches!(
            validate(&cart(vec![line("5.00", 0, "0.00")])),
            Err(CheckoutError::InvalidQuantity)
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(matches!(
            validate(&cart(vec![line("-5.00", 1, "0.00")])),
            Err(CheckoutError::NegativeAmount)
        ));
    }

    #[test]
    fn redeeming_points_without_a_customer_is_rejected() {
        let mut input = cart(vec![line("5.00", 1, "0.00")]);
        input.points_redeemed = 10;
        assert!(matches!(
            validate(&input),
            Err(CheckoutError::CustomerRequired)
        ));
    }

    #[test]
    fn valid_cart_passes() {
        assert!(validate(&cart(vec![line("5.00", 2, "0.50")])).is_ok());
    }
}
