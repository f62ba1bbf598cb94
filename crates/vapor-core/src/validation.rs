//! # Validation Module
//!
//! Turns a loosely typed bill submission into a [`NewBill`] the storage layer
//! can persist without further checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: POS screen (TypeScript)                                      │
//! │  └── Cart math, payment picker                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── JSON shape (serde, every field optional)                          │
//! │  └── THIS MODULE: required fields, numbers, enums, i64 range           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (quantity > 0)                                              │
//! │  └── Foreign key bill_items → bills                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Request fields are `Option` so a missing field becomes a field-tagged
//! [`ValidationError`] instead of an opaque deserializer message.
//!
//! ## Usage
//! ```rust
//! use vapor_core::validation::{validate_create_bill, CreateBillRequest};
//!
//! let body = r#"{
//!     "items": [{ "productId": "p1", "quantity": 2, "price": "15" }],
//!     "paymentMethod": "UPI",
//!     "totalAmount": 31.5
//! }"#;
//!
//! let request: CreateBillRequest = serde_json::from_str(body).unwrap();
//! let bill = validate_create_bill(request).unwrap();
//!
//! assert_eq!(bill.items[0].quantity, 2);
//! assert_eq!(bill.total_amount.cents(), 3150);
//! ```

use serde::Deserialize;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, MoneyParseError};
use crate::types::{NewBill, NewBillItem, PaymentMethod, TaxRate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product id accepted. Generated ids are 36-character UUIDs.
const MAX_PRODUCT_ID_LEN: usize = 64;

/// Largest accepted gap between submitted and recomputed totals, in cents.
const TOTAL_TOLERANCE_CENTS: i64 = 1;

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /bills`, exactly as the POS screen sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub items: Option<Vec<BillItemRequest>>,
    pub payment_method: Option<String>,
    pub total_amount: Option<NumberInput>,
}

/// One cart line of a [`CreateBillRequest`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemRequest {
    pub product_id: Option<String>,
    pub quantity: Option<NumberInput>,
    pub price: Option<NumberInput>,
}

/// A numeric field that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumberInput {
    /// Parses the value as money, rounding to the nearest cent.
    pub fn to_money(&self, field: &str) -> ValidationResult<Money> {
        let parsed = match self {
            NumberInput::Number(n) => n.to_string().parse::<Money>(),
            NumberInput::Text(s) => s.parse::<Money>(),
        };

        parsed.map_err(|e| match e {
            MoneyParseError::Empty => ValidationError::required(field),
            MoneyParseError::Invalid(_) => {
                ValidationError::invalid_format(field, "must be a decimal number")
            }
            MoneyParseError::Overflow => ValidationError::invalid_format(field, "value is too large"),
        })
    }

    /// Parses the value as a whole number. `2` and `"2"` and `2.0` pass, `2.5` does not.
    pub fn to_integer(&self, field: &str) -> ValidationResult<i64> {
        let not_integer = || ValidationError::invalid_format(field, "must be a whole number");

        match self {
            NumberInput::Number(n) => match n.as_i64() {
                Some(v) => Ok(v),
                None => n.as_f64().and_then(integral_f64).ok_or_else(not_integer),
            },
            NumberInput::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Err(ValidationError::required(field));
                }
                match s.parse::<i64>() {
                    Ok(v) => Ok(v),
                    Err(_) => s
                        .parse::<f64>()
                        .ok()
                        .and_then(integral_f64)
                        .ok_or_else(not_integer),
                }
            }
        }
    }
}

fn integral_f64(v: f64) -> Option<i64> {
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    (v.is_finite() && v.fract() == 0.0 && in_range).then_some(v as i64)
}

// =============================================================================
// Bill Validation
// =============================================================================

/// Validates a bill submission.
///
/// ## Rules
/// - `items` present and non-empty
/// - `paymentMethod` one of CASH, UPI, CARD, G-PAY
/// - `totalAmount` a non-negative decimal
/// - per line: non-blank `productId`, positive whole `quantity`,
///   non-negative `price`
/// - Σ price × quantity fits in i64 paise, so later arithmetic on the bill
///   cannot overflow
///
/// The first failing rule wins. Item errors carry an indexed path such as
/// `items[1].quantity`.
pub fn validate_create_bill(request: CreateBillRequest) -> ValidationResult<NewBill> {
    let items = request.items.ok_or_else(|| ValidationError::required("items"))?;
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    let payment_method = validate_payment_method(request.payment_method.as_deref())?;

    let total_amount = request
        .total_amount
        .as_ref()
        .ok_or_else(|| ValidationError::required("totalAmount"))?
        .to_money("totalAmount")?;
    validate_non_negative("totalAmount", total_amount)?;

    let items = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| validate_item(index, item))
        .collect::<ValidationResult<Vec<_>>>()?;

    let bill = NewBill {
        payment_method,
        total_amount,
        items,
    };
    if bill.subtotal().is_none() {
        return Err(ValidationError::invalid_format(
            "items",
            "bill subtotal is too large",
        ));
    }
    Ok(bill)
}

/// Validates the payment method string.
///
/// ```rust
/// use vapor_core::types::PaymentMethod;
/// use vapor_core::validation::validate_payment_method;
///
/// assert_eq!(validate_payment_method(Some("G-PAY")).unwrap(), PaymentMethod::GPay);
/// assert!(validate_payment_method(Some("  ")).is_err());
/// assert!(validate_payment_method(None).is_err());
/// ```
pub fn validate_payment_method(value: Option<&str>) -> ValidationResult<PaymentMethod> {
    match value.map(str::trim) {
        None | Some("") => Err(ValidationError::required("paymentMethod")),
        Some(method) => method.parse(),
    }
}

/// Validates a quantity value. Any positive integer is accepted.
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

fn validate_item(index: usize, item: BillItemRequest) -> ValidationResult<NewBillItem> {
    let path = |name: &str| format!("items[{index}].{name}");

    let product_id = item
        .product_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ValidationError::required(path("productId")))?;
    if product_id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: path("productId"),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    let quantity_field = path("quantity");
    let quantity = item
        .quantity
        .as_ref()
        .ok_or_else(|| ValidationError::required(&quantity_field))?
        .to_integer(&quantity_field)?;
    validate_quantity(&quantity_field, quantity)?;

    let price_field = path("price");
    let price = item
        .price
        .as_ref()
        .ok_or_else(|| ValidationError::required(&price_field))?
        .to_money(&price_field)?;
    validate_non_negative(&price_field, price)?;

    Ok(NewBillItem {
        product_id: product_id.to_string(),
        quantity,
        price,
    })
}

// =============================================================================
// Total Verification
// =============================================================================

/// Checks the submitted total against Σ(price × quantity) + tax.
///
/// Off by default at the server; the POS screen's own math is trusted unless
/// the operator turns this on.
///
/// ```rust
/// use vapor_core::money::Money;
/// use vapor_core::types::{NewBill, NewBillItem, PaymentMethod, TaxRate};
/// use vapor_core::validation::verify_total;
///
/// let bill = NewBill {
///     payment_method: PaymentMethod::Cash,
///     total_amount: Money::from_cents(15750),
///     items: vec![NewBillItem {
///         product_id: "thali".into(),
///         quantity: 1,
///         price: Money::from_major(150),
///     }],
/// };
///
/// assert!(verify_total(&bill, TaxRate::from_bps(500)).is_ok());
/// assert!(verify_total(&bill, TaxRate::zero()).is_err());
/// ```
pub fn verify_total(bill: &NewBill, rate: TaxRate) -> CoreResult<()> {
    let expected = bill
        .expected_total(rate)
        .ok_or_else(|| ValidationError::invalid_format("items", "bill total is too large"))?;
    // both sides are non-negative, so the difference cannot overflow
    if (bill.total_amount - expected).abs().cents() > TOTAL_TOLERANCE_CENTS {
        return Err(CoreError::TotalMismatch {
            submitted: bill.total_amount,
            expected,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> CreateBillRequest {
        serde_json::from_str(json).unwrap()
    }

    fn validate(json: &str) -> ValidationResult<NewBill> {
        validate_create_bill(request(json))
    }

    #[test]
    fn test_valid_bill() {
        let bill = validate(
            r#"{
                "items": [
                    {"productId": "a", "quantity": 2, "price": 15},
                    {"productId": "b", "quantity": "1", "price": "20.5"}
                ],
                "paymentMethod": "CASH",
                "totalAmount": 157.50000000000003
            }"#,
        )
        .unwrap();

        assert_eq!(bill.payment_method, PaymentMethod::Cash);
        assert_eq!(bill.total_amount, Money::from_cents(15750));
        assert_eq!(bill.items.len(), 2);
        assert_eq!(bill.items[1].price, Money::from_cents(2050));
        assert_eq!(bill.items[1].quantity, 1);
    }

    #[test]
    fn test_items_missing_or_empty() {
        let err = validate(r#"{"paymentMethod": "CASH", "totalAmount": 10}"#).unwrap_err();
        assert_eq!(err, ValidationError::required("items"));

        let err = validate(r#"{"items": [], "paymentMethod": "CASH", "totalAmount": 10}"#)
            .unwrap_err();
        assert!(matches!(err, ValidationError::Empty { ref field } if field == "items"));
    }

    #[test]
    fn test_large_carts_and_quantities_are_accepted() {
        let items = vec![
            BillItemRequest {
                product_id: Some("p".to_string()),
                quantity: Some(NumberInput::Text("1000".to_string())),
                price: Some(NumberInput::Text("1".to_string())),
            };
            250
        ];
        let bill = validate_create_bill(CreateBillRequest {
            items: Some(items),
            payment_method: Some("CASH".to_string()),
            total_amount: Some(NumberInput::Text("262500".to_string())),
        })
        .unwrap();

        assert_eq!(bill.items.len(), 250);
        assert_eq!(bill.items[0].quantity, 1000);
        assert_eq!(bill.subtotal(), Some(Money::from_major(250_000)));
    }

    #[test]
    fn test_subtotal_overflow_is_rejected() {
        let err = validate(
            r#"{"items": [{"productId": "a", "quantity": 2, "price": "90000000000000000"}],
                "paymentMethod": "CASH", "totalAmount": 1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "items"));

        let err = validate(
            r#"{"items": [
                    {"productId": "a", "quantity": 1, "price": "50000000000000000"},
                    {"productId": "b", "quantity": 1, "price": "50000000000000000"}
                ],
                "paymentMethod": "CASH", "totalAmount": 1}"#,
        )
        .unwrap_err();
        assert_eq!(err.field(), "items");
    }

    #[test]
    fn test_verify_total_overflow_is_an_error() {
        // the subtotal fits, only the tax pushes it past i64
        let bill = NewBill {
            payment_method: PaymentMethod::Card,
            total_amount: Money::from_cents(1),
            items: vec![NewBillItem {
                product_id: "x".to_string(),
                quantity: 1,
                price: Money::from_cents(i64::MAX - 10),
            }],
        };

        let err = verify_total(&bill, TaxRate::from_bps(500)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref e) if e.field() == "items"));
    }

    #[test]
    fn test_payment_method_rules() {
        let err = validate(r#"{"items": [{"productId": "a", "quantity": 1, "price": 1}], "totalAmount": 1}"#)
            .unwrap_err();
        assert_eq!(err, ValidationError::required("paymentMethod"));

        let err = validate(
            r#"{"items": [{"productId": "a", "quantity": 1, "price": 1}], "paymentMethod": "CHEQUE", "totalAmount": 1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_total_amount_rules() {
        let base = r#"{"items": [{"productId": "a", "quantity": 1, "price": 1}], "paymentMethod": "UPI""#;

        let err = validate(&format!("{base}}}")).unwrap_err();
        assert_eq!(err, ValidationError::required("totalAmount"));

        let err = validate(&format!(r#"{base}, "totalAmount": "abc"}}"#)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));

        let err = validate(&format!(r#"{base}, "totalAmount": -5}}"#)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));

        let bill = validate(&format!(r#"{base}, "totalAmount": 0}}"#)).unwrap();
        assert!(bill.total_amount.is_zero());
    }

    #[test]
    fn test_item_rules_carry_index() {
        let wrap = |item: &str| {
            format!(
                r#"{{"items": [{{"productId": "ok", "quantity": 1, "price": 1}}, {item}], "paymentMethod": "CARD", "totalAmount": 1}}"#
            )
        };

        let err = validate(&wrap(r#"{"quantity": 1, "price": 1}"#)).unwrap_err();
        assert_eq!(err, ValidationError::required("items[1].productId"));

        let err = validate(&wrap(r#"{"productId": "  ", "quantity": 1, "price": 1}"#)).unwrap_err();
        assert_eq!(err.field(), "items[1].productId");

        let err = validate(&wrap(r#"{"productId": "b", "quantity": 0, "price": 1}"#)).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { ref field } if field == "items[1].quantity"));

        let err = validate(&wrap(r#"{"productId": "b", "quantity": 1.5, "price": 1}"#)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));

        let err = validate(&wrap(r#"{"productId": "b", "quantity": 1}"#)).unwrap_err();
        assert_eq!(err, ValidationError::required("items[1].price"));

        let err = validate(&wrap(r#"{"productId": "b", "quantity": 1, "price": -1}"#)).unwrap_err();
        assert_eq!(err.field(), "items[1].price");
    }

    #[test]
    fn test_number_input_integer_forms() {
        let n = |json: &str| serde_json::from_str::<NumberInput>(json).unwrap();

        assert_eq!(n("3").to_integer("q").unwrap(), 3);
        assert_eq!(n("3.0").to_integer("q").unwrap(), 3);
        assert_eq!(n("\" 4 \"").to_integer("q").unwrap(), 4);
        assert!(n("\"NaN\"").to_integer("q").is_err());
        assert!(n("\"two\"").to_integer("q").is_err());
        assert_eq!(n("\"\"").to_integer("q").unwrap_err(), ValidationError::required("q"));
    }

    #[test]
    fn test_verify_total_tolerance() {
        let bill = |total: i64| NewBill {
            payment_method: PaymentMethod::Cash,
            total_amount: Money::from_cents(total),
            items: vec![NewBillItem {
                product_id: "x".to_string(),
                quantity: 3,
                price: Money::from_cents(1010),
            }],
        };

        // 3030 + 151.5 → 152 (half even) = 3182
        let rate = TaxRate::from_bps(500);
        assert!(verify_total(&bill(3182), rate).is_ok());
        assert!(verify_total(&bill(3181), rate).is_ok());
        assert!(verify_total(&bill(3183), rate).is_ok());
        assert!(matches!(
            verify_total(&bill(3180), rate),
            Err(CoreError::TotalMismatch { .. })
        ));
    }
}
