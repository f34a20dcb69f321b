use std::{convert::Infallible, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use ssg_common::Cents;
use thiserror::Error;

//--------------------------------------        OrderId        -------------------------------------------------------
/// The locally generated identifier of a [`LocalOrder`]. Immutable for the lifetime of the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn random() -> Self {
        Self(format!("ord-{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------   FinancialStatus     -------------------------------------------------------
/// The financial status of an order, mirroring the remote platform's vocabulary.
///
/// The recognised values are closed, but the remote platform is free to grow its vocabulary, so
/// anything else is carried through verbatim as [`FinancialStatus::Other`]. Unrecognised statuses
/// have no inventory side effects; they only update the stored status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinancialStatus {
    /// The order exists but has not been paid.
    Pending,
    /// Payment has been received in full.
    Paid,
    /// The payment was voided before capture.
    Voided,
    /// The payment was refunded after capture.
    Refunded,
    /// The payment attempt failed.
    Failed,
    /// A remote status this gateway does not recognise. Passed through untouched.
    Other(String),
}

impl FinancialStatus {
    /// True for the statuses that annul an order's stock reservations.
    pub fn annuls_reservation(&self) -> bool {
        matches!(self, FinancialStatus::Voided | FinancialStatus::Refunded | FinancialStatus::Failed)
    }
}

impl Default for FinancialStatus {
    fn default() -> Self {
        FinancialStatus::Pending
    }
}

impl Display for FinancialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinancialStatus::Pending => write!(f, "pending"),
            FinancialStatus::Paid => write!(f, "paid"),
            FinancialStatus::Voided => write!(f, "voided"),
            FinancialStatus::Refunded => write!(f, "refunded"),
            FinancialStatus::Failed => write!(f, "failed"),
            FinancialStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for FinancialStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pending" => FinancialStatus::Pending,
            "paid" => FinancialStatus::Paid,
            "voided" => FinancialStatus::Voided,
            "refunded" => FinancialStatus::Refunded,
            "failed" => FinancialStatus::Failed,
            other => FinancialStatus::Other(other.to_string()),
        })
    }
}

impl From<&str> for FinancialStatus {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl From<String> for FinancialStatus {
    fn from(value: String) -> Self {
        value.as_str().into()
    }
}

impl Serialize for FinancialStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FinancialStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

//--------------------------------------       LineItem        -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub variant_id: String,
    pub quantity: i64,
}

impl LineItem {
    pub fn new<S: Into<String>>(variant_id: S, quantity: i64) -> Self {
        Self { variant_id: variant_id.into(), quantity }
    }
}

//--------------------------------------      LocalOrder       -------------------------------------------------------
/// One purchase attempt tracked locally.
///
/// The remote platform owns canonical order and inventory truth; this record is a projection that
/// is allowed to go stale and is brought back in line by webhooks and sync passes. Exactly one of
/// `shopify_order_id` and `shopify_draft_order_id` is set, except transiently while a draft is
/// promoted to a real order, after which the draft id is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalOrder {
    pub id: OrderId,
    pub user_id: String,
    /// The customer id assigned by the remote platform.
    pub customer_id: String,
    pub shopify_order_id: Option<String>,
    pub shopify_draft_order_id: Option<String>,
    /// The human-facing order number, e.g. "#1001". Unset until the order is real.
    pub order_number: Option<String>,
    /// Unset for draft orders, whose price is only known once the invoice settles.
    pub total_price: Option<Cents>,
    pub status: FinancialStatus,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    NewLocalOrder      -------------------------------------------------------
/// The insert shape for a [`LocalOrder`]. The store assigns the local identifier.
#[derive(Debug, Clone)]
pub struct NewLocalOrder {
    pub user_id: String,
    pub customer_id: String,
    pub shopify_order_id: Option<String>,
    pub shopify_draft_order_id: Option<String>,
    pub order_number: Option<String>,
    pub total_price: Option<Cents>,
    pub status: FinancialStatus,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewLocalOrder {
    pub fn new(user_id: &str, customer_id: &str, status: FinancialStatus, line_items: Vec<LineItem>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            customer_id: customer_id.to_string(),
            shopify_order_id: None,
            shopify_draft_order_id: None,
            order_number: None,
            total_price: None,
            status,
            line_items,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks the record invariants before any remote or database side effect takes place.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.line_items.is_empty() {
            return Err(OrderValidationError::NoLineItems);
        }
        if self.line_items.iter().any(|item| item.quantity <= 0) {
            return Err(OrderValidationError::NonPositiveQuantity);
        }
        if self.shopify_order_id.is_some() == self.shopify_draft_order_id.is_some() {
            return Err(OrderValidationError::RemoteIdConflict);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderValidationError {
    #[error("An order must contain at least one line item")]
    NoLineItems,
    #[error("Line item quantities must be positive")]
    NonPositiveQuantity,
    #[error("Exactly one of the remote order id and draft order id must be set")]
    RemoteIdConflict,
}
