// medallion-core/src/domain/normalize/mod.rs
//
// Bronze -> Silver: casts every raw field to its canonical type.

pub mod decode;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::record::{NormalizedRecord, RawField, RawRecord, RawValue};
pub use decode::DecodeError;
use decode::{decode_amount, decode_identifier, decode_serial_date};

/// Substitutes for NULL categorical values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CategoricalDefaults {
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default = "default_cancellation_reason")]
    pub cancellation_reason: String,
}

impl Default for CategoricalDefaults {
    fn default() -> Self {
        Self {
            payment_method: default_payment_method(),
            cancellation_reason: default_cancellation_reason(),
        }
    }
}

fn default_payment_method() -> String {
    "Não Informado".to_string()
}

fn default_cancellation_reason() -> String {
    "Sem Cancelamento".to_string()
}

/// Result of a normalization pass: decoded rows plus the rows left out.
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub records: Vec<NormalizedRecord>,
    pub rejected: Vec<DecodeError>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    defaults: CategoricalDefaults,
}

impl Normalizer {
    pub fn new(defaults: CategoricalDefaults) -> Self {
        Self { defaults }
    }

    /// Decodes every record. A record failing on any field is excluded and
    /// its first error is kept; the others are unaffected.
    #[instrument(skip_all, fields(rows = raw.len()))]
    pub fn normalize(&self, raw: &[RawRecord]) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome {
            records: Vec::with_capacity(raw.len()),
            rejected: Vec::new(),
        };

        for record in raw {
            match self.normalize_record(record) {
                Ok(normalized) => outcome.records.push(normalized),
                Err(err) => {
                    debug!(error = %err, "Row excluded");
                    outcome.rejected.push(err);
                }
            }
        }

        outcome
    }

    pub fn normalize_record(&self, raw: &RawRecord) -> Result<NormalizedRecord, DecodeError> {
        let row = raw.row;
        let amount = |field: RawField| decode_amount(row, field, raw.get(field));

        Ok(NormalizedRecord {
            order_id: decode_identifier(row, RawField::OrderNumber, &raw.order_number)?,
            entity_name: text_or_empty(&raw.entity_name),
            entity_id: decode_identifier(row, RawField::EntityId, &raw.entity_id)?,
            sale_date: decode_serial_date(row, RawField::SaleDate, &raw.sale_date)?,
            delivery_fee: amount(RawField::DeliveryFee)?,
            order_value: amount(RawField::OrderValue)?,
            platform_incentive: amount(RawField::PlatformIncentive)?,
            store_incentive: amount(RawField::StoreIncentive)?,
            payment_method: text_or(&raw.payment_method, &self.defaults.payment_method),
            cancellation_reason: text_or(
                &raw.cancellation_reason,
                &self.defaults.cancellation_reason,
            ),
            delivery_type: text_or_empty(&raw.delivery_type),
            sales_channel: text_or_empty(&raw.sales_channel),
        })
    }
}

// Text is kept verbatim: trimming happens when grouping, and rename rules
// match on the untouched export name.
fn text_or(value: &RawValue, default: &str) -> String {
    value
        .as_text()
        .map(|t| t.into_owned())
        .unwrap_or_else(|| default.to_string())
}

fn text_or_empty(value: &RawValue) -> String {
    text_or(value, "")
}
