//! Status and action enums for sales and inventory.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when an enum string from the database or wire is not recognised.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    /// Which enum failed to parse.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $repr:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Database/wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $repr,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($repr => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: stringify!($name),
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// How a sale was paid for.
    PaymentMethod {
        Cash => "CASH",
        Card => "CARD",
        Mobile => "MOBILE",
    }
}

string_enum! {
    /// Lifecycle status of a sale.
    SaleStatus {
        Completed => "COMPLETED",
        Refunded => "REFUNDED",
        Cancelled => "CANCELLED",
    }
}

string_enum! {
    /// Cause of a stock quantity change, recorded in the audit trail.
    StockAction {
        Sale => "SALE",
        Restock => "RESTOCK",
        Return => "RETURN",
        Theft => "THEFT",
        Adjustment => "ADJUSTMENT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_roundtrip() {
        for method in [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Mobile] {
            assert_eq!(method.as_str().parse::<PaymentMethod>().ok(), Some(method));
        }
    }

    #[test]
    fn test_stock_action_roundtrip() {
        for action in [
            StockAction::Sale,
            StockAction::Restock,
            StockAction::Return,
            StockAction::Theft,
            StockAction::Adjustment,
        ] {
            assert_eq!(action.as_str().parse::<StockAction>().ok(), Some(action));
        }
    }

    #[test]
    fn test_unknown_value_includes_kind() {
        let err = "GIFTED".parse::<SaleStatus>().expect_err("should fail");
        assert_eq!(err.kind, "SaleStatus");
        assert_eq!(err.value, "GIFTED");
    }

    #[test]
    fn test_serde_screaming_snake_case() {
        let json = serde_json::to_string(&StockAction::Restock).expect("serialize");
        assert_eq!(json, "\"RESTOCK\"");
    }
}
