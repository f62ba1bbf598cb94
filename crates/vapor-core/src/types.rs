//! # Domain Types
//!
//! Core domain types used throughout Vapor POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Bill       │   │    BillItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄┐ │  id (UUID)      │◄──│  bill_id (FK)   │       │
//! │  │  name           │ └─│─ ─ ─ ─ ─ ─ ─ ─ ─│─ ─│  product_id     │       │
//! │  │  category       │   │  total_amount   │   │  quantity       │       │
//! │  │  price          │   │  payment_method │   │  price (frozen) │       │
//! │  │  is_available   │   │  created_at     │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  Bill ──owns──► BillItem      (delete cascades)                        │
//! │  BillItem ─ ─ ─► Product      (lookup only, may dangle)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `BillItem.price` is copied from the product at sale time. Later price
//! edits never rewrite history. Name and category are *not* snapshotted:
//! listings join the current product row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 500 bps = 5% GST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Category
// =============================================================================

/// Menu section a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Category {
    Tea,
    Drinks,
    Snacks,
    Meals,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Tea,
        Category::Drinks,
        Category::Snacks,
        Category::Meals,
    ];

    /// Wire / storage spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Tea => "TEA",
            Category::Drinks => "DRINKS",
            Category::Snacks => "SNACKS",
            Category::Meals => "MEALS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// UPI QR scan.
    Upi,
    /// Card on an external terminal.
    Card,
    /// Google Pay.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "G-PAY"))]
    #[serde(rename = "G-PAY")]
    GPay,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::GPay,
    ];

    /// Wire / storage spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "CARD",
            PaymentMethod::GPay => "G-PAY",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    /// Exact match on the wire spelling; the UI always sends upper case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "paymentMethod".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A menu item sellable at the counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the POS grid and on bills.
    pub name: String,

    pub category: Category,

    /// Current list price.
    #[ts(type = "number")]
    pub price: Money,

    /// Hidden from the POS grid when false. Selling never changes it.
    pub is_available: bool,
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line on a bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillItem {
    pub id: String,
    pub bill_id: String,
    /// Weak reference; the product may have been deleted since.
    pub product_id: String,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    #[ts(type = "number")]
    pub price: Money,
}

/// A bill line joined with the product it currently points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillItemWithProduct {
    #[serde(flatten)]
    pub item: BillItem,

    /// `None` when the product has been deleted from the catalog.
    pub product: Option<Product>,
}

// =============================================================================
// Bill
// =============================================================================

/// A completed sale as returned by bill creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Bill {
    pub id: String,
    /// Client-computed total including tax, stored as submitted.
    #[ts(type = "number")]
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub items: Vec<BillItem>,
}

/// A bill with each line joined to its current product, as listed for the
/// daily sales screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillWithProducts {
    pub id: String,
    #[ts(type = "number")]
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub items: Vec<BillItemWithProduct>,
}

// =============================================================================
// New Bill (validated input)
// =============================================================================

/// A bill that passed validation and is ready to be persisted.
///
/// Built by [`crate::validation::validate_create_bill`]; the constructor
/// guarantees at least one item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub payment_method: PaymentMethod,
    pub total_amount: Money,
    pub items: Vec<NewBillItem>,
}

/// One validated line of a [`NewBill`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillItem {
    pub product_id: String,
    pub quantity: i64,
    pub price: Money,
}

impl NewBill {
    /// Σ price × quantity, before tax. `None` if it does not fit in i64 paise.
    pub fn subtotal(&self) -> Option<Money> {
        self.items.iter().try_fold(Money::zero(), |acc, item| {
            acc.checked_add(item.price.checked_multiply_quantity(item.quantity)?)
        })
    }

    /// Subtotal plus tax at `rate`, the total the counter should have charged.
    pub fn expected_total(&self, rate: TaxRate) -> Option<Money> {
        let subtotal = self.subtotal()?;
        subtotal.checked_add(subtotal.calculate_tax(rate))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
