// medallion-core/src/domain/record.rs
//
// The three layers of the pipeline: Bronze (RawRecord), Silver
// (NormalizedRecord) and Gold (AggregatedRecord).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

// --- BRONZE ---

/// A single untyped cell as exported upstream.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Textual view of the cell, `None` for NULL.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Integer(v) => Some(Cow::Owned(v.to_string())),
            Self::Float(v) => Some(Cow::Owned(v.to_string())),
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Columns of the marketplace export, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RawField {
    OrderNumber,
    EntityName,
    EntityId,
    SaleDate,
    DeliveryFee,
    OrderValue,
    PlatformIncentive,
    StoreIncentive,
    PaymentMethod,
    CancellationReason,
    DeliveryType,
    SalesChannel,
}

impl RawField {
    pub const ALL: [RawField; 12] = [
        Self::OrderNumber,
        Self::EntityName,
        Self::EntityId,
        Self::SaleDate,
        Self::DeliveryFee,
        Self::OrderValue,
        Self::PlatformIncentive,
        Self::StoreIncentive,
        Self::PaymentMethod,
        Self::CancellationReason,
        Self::DeliveryType,
        Self::SalesChannel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderNumber => "order_number",
            Self::EntityName => "entity_name",
            Self::EntityId => "entity_id",
            Self::SaleDate => "sale_date",
            Self::DeliveryFee => "delivery_fee",
            Self::OrderValue => "order_value",
            Self::PlatformIncentive => "platform_incentive",
            Self::StoreIncentive => "store_incentive",
            Self::PaymentMethod => "payment_method",
            Self::CancellationReason => "cancellation_reason",
            Self::DeliveryType => "delivery_type",
            Self::SalesChannel => "sales_channel",
        }
    }
}

impl Serialize for RawField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the Bronze layer. `row` is the 1-based position in the export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    pub row: usize,
    pub order_number: RawValue,
    pub entity_name: RawValue,
    pub entity_id: RawValue,
    pub sale_date: RawValue,
    pub delivery_fee: RawValue,
    pub order_value: RawValue,
    pub platform_incentive: RawValue,
    pub store_incentive: RawValue,
    pub payment_method: RawValue,
    pub cancellation_reason: RawValue,
    pub delivery_type: RawValue,
    pub sales_channel: RawValue,
}

impl RawRecord {
    pub fn get(&self, field: RawField) -> &RawValue {
        match field {
            RawField::OrderNumber => &self.order_number,
            RawField::EntityName => &self.entity_name,
            RawField::EntityId => &self.entity_id,
            RawField::SaleDate => &self.sale_date,
            RawField::DeliveryFee => &self.delivery_fee,
            RawField::OrderValue => &self.order_value,
            RawField::PlatformIncentive => &self.platform_incentive,
            RawField::StoreIncentive => &self.store_incentive,
            RawField::PaymentMethod => &self.payment_method,
            RawField::CancellationReason => &self.cancellation_reason,
            RawField::DeliveryType => &self.delivery_type,
            RawField::SalesChannel => &self.sales_channel,
        }
    }

    pub fn set(&mut self, field: RawField, value: RawValue) {
        let slot = match field {
            RawField::OrderNumber => &mut self.order_number,
            RawField::EntityName => &mut self.entity_name,
            RawField::EntityId => &mut self.entity_id,
            RawField::SaleDate => &mut self.sale_date,
            RawField::DeliveryFee => &mut self.delivery_fee,
            RawField::OrderValue => &mut self.order_value,
            RawField::PlatformIncentive => &mut self.platform_incentive,
            RawField::StoreIncentive => &mut self.store_incentive,
            RawField::PaymentMethod => &mut self.payment_method,
            RawField::CancellationReason => &mut self.cancellation_reason,
            RawField::DeliveryType => &mut self.delivery_type,
            RawField::SalesChannel => &mut self.sales_channel,
        };
        *slot = value;
    }
}

// --- SILVER ---

/// Typed view of a RawRecord. Monetary amounts always carry 2 fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub order_id: i64,
    pub entity_name: String,
    pub entity_id: i64,
    pub sale_date: NaiveDate,
    pub delivery_fee: Decimal,
    pub order_value: Decimal,
    pub platform_incentive: Decimal,
    pub store_incentive: Decimal,
    pub payment_method: String,
    pub cancellation_reason: String,
    pub delivery_type: String,
    pub sales_channel: String,
}

/// A Silver record annotated by the lookup rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub record: NormalizedRecord,
    pub canonical_name: String,
    pub region: String,
    pub category: String,
}

// --- GOLD ---

/// Composite grouping key of the Gold layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub order_id: i64,
    pub entity_id: i64,
    pub canonical_name: String,
    pub payment_method: String,
    pub cancellation_reason: String,
    pub delivery_type: String,
    pub sales_channel: String,
    pub sale_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedRecord {
    pub key: GroupKey,
    pub revenue: Decimal,
    pub discount: Decimal,
    pub region: String,
    pub category: String,
    pub order_count: usize,
}

impl AggregatedRecord {
    pub fn profit(&self) -> Decimal {
        self.revenue - self.discount
    }
}
