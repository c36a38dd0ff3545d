// medallion-core/src/domain/aggregate.rs
//
// Silver -> Gold: filter, group by the composite key, sum the measures.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::domain::record::{AggregatedRecord, EnrichedRecord, GroupKey};

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    include_entity: Option<String>,
}

impl Aggregator {
    /// `include_entity` is a case-sensitive substring of the raw entity name.
    /// `None` keeps every record.
    pub fn new(include_entity: Option<String>) -> Self {
        Self { include_entity }
    }

    pub fn includes(&self, record: &EnrichedRecord) -> bool {
        self.includes_name(&record.record.entity_name)
    }

    /// Filter test on a raw (not renamed) entity name.
    pub fn includes_name(&self, raw_name: &str) -> bool {
        match &self.include_entity {
            Some(pattern) => raw_name.contains(pattern.as_str()),
            None => true,
        }
    }

    /// Groups are emitted in key order, which keeps repeated runs identical.
    ///
    /// Keys group on the Silver text as stored. Payment method, delivery type
    /// and sales channel are trimmed only on the emitted rows, so "PIX" and
    /// "PIX " stay separate groups that both read "PIX" in Gold.
    #[instrument(skip_all, fields(rows = records.len()))]
    pub fn aggregate(&self, records: &[EnrichedRecord]) -> Vec<AggregatedRecord> {
        let mut groups: BTreeMap<GroupKey, AggregatedRecord> = BTreeMap::new();
        let mut excluded = 0usize;

        for enriched in records {
            if !self.includes(enriched) {
                excluded += 1;
                continue;
            }
            let r = &enriched.record;
            let key = GroupKey {
                order_id: r.order_id,
                entity_id: r.entity_id,
                canonical_name: enriched.canonical_name.clone(),
                payment_method: r.payment_method.clone(),
                cancellation_reason: r.cancellation_reason.clone(),
                delivery_type: r.delivery_type.clone(),
                sales_channel: r.sales_channel.clone(),
                sale_date: r.sale_date,
            };

            let group = groups
                .entry(key)
                .or_insert_with_key(|key| AggregatedRecord {
                    key: key.clone(),
                    revenue: Decimal::ZERO,
                    discount: Decimal::ZERO,
                    region: enriched.region.clone(),
                    category: enriched.category.clone(),
                    order_count: 0,
                });
            group.revenue += r.order_value;
            group.discount += r.store_incentive;
            group.order_count += 1;
        }

        debug!(groups = groups.len(), excluded, "Aggregation complete");
        groups.into_values().map(trim_output).collect()
    }
}

fn trim_output(mut row: AggregatedRecord) -> AggregatedRecord {
    let key = &mut row.key;
    for text in [
        &mut key.payment_method,
        &mut key.delivery_type,
        &mut key.sales_channel,
    ] {
        *text = text.trim().to_string();
    }
    row
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::record::NormalizedRecord;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn enriched(order_id: i64, name: &str, value: &str, incentive: &str) -> EnrichedRecord {
        EnrichedRecord {
            record: NormalizedRecord {
                order_id,
                entity_name: name.to_string(),
                entity_id: 53018,
                sale_date: NaiveDate::from_ymd_opt(2023, 3, 15).unwrap(),
                delivery_fee: dec("5.00"),
                order_value: dec(value),
                platform_incentive: dec("0.00"),
                store_incentive: dec(incentive),
                payment_method: "CREDITO".to_string(),
                cancellation_reason: "Sem Cancelamento".to_string(),
                delivery_type: "DELIVERY".to_string(),
                sales_channel: "IFOOD".to_string(),
            },
            canonical_name: format!("canonical {name}"),
            region: "CE".to_string(),
            category: "Açai".to_string(),
        }
    }

    fn totals(rows: &[AggregatedRecord]) -> Vec<(GroupKey, Decimal, Decimal, Decimal)> {
        let mut out: Vec<_> = rows
            .iter()
            .map(|r| (r.key.clone(), r.revenue, r.discount, r.profit()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    #[test]
    fn test_single_record_group() {
        let rows = Aggregator::default().aggregate(&[enriched(1, "San Paolo X", "10.50", "1.00")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, dec("10.50"));
        assert_eq!(rows[0].discount, dec("1.00"));
        assert_eq!(rows[0].profit(), dec("9.50"));
        assert_eq!(rows[0].order_count, 1);
    }

    #[test]
    fn test_true_duplicates_are_summed() {
        let rows = Aggregator::default().aggregate(&[
            enriched(1, "San Paolo X", "10.10", "0.10"),
            enriched(1, "San Paolo X", "20.20", "0.20"),
            enriched(2, "San Paolo X", "5.00", "0.00"),
        ]);
        assert_eq!(rows.len(), 2);
        let dup = rows.iter().find(|r| r.key.order_id == 1).unwrap();
        assert_eq!(dup.revenue, dec("30.30"));
        assert_eq!(dup.discount, dec("0.30"));
        assert_eq!(dup.profit(), dec("30.00"));
        assert_eq!(dup.order_count, 2);
    }

    #[test]
    fn test_profit_is_exact() {
        // 0.1 + 0.2 style inputs that drift in binary floating point.
        let input: Vec<_> = (0..10).map(|_| enriched(7, "San Paolo X", "0.10", "0.20")).collect();
        let rows = Aggregator::default().aggregate(&input);
        assert_eq!(rows[0].revenue, dec("1.00"));
        assert_eq!(rows[0].discount, dec("2.00"));
        assert_eq!(rows[0].profit(), dec("-1.00"));
    }

    #[test]
    fn test_inclusion_filter_uses_raw_name() {
        let mut renamed = enriched(3, "San Paolo Y", "1.00", "0.00");
        renamed.canonical_name = "Doce Vórtice - Y".to_string();
        let mut other = enriched(4, "Pizzaria", "1.00", "0.00");
        other.canonical_name = "San Paolo lookalike".to_string();

        let rows = Aggregator::new(Some("San Paolo".to_string())).aggregate(&[renamed, other]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key.order_id, 3);
        assert_eq!(rows[0].key.canonical_name, "Doce Vórtice - Y");
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let rows = Aggregator::new(Some("San Paolo".to_string()))
            .aggregate(&[enriched(1, "SAN PAOLO X", "1.00", "0.00")]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_padded_text_groups_apart_but_is_trimmed_on_output() {
        let mut padded = enriched(1, "San Paolo X", "4.00", "0.00");
        padded.record.payment_method = "CREDITO ".to_string();
        let plain = enriched(1, "San Paolo X", "20.00", "0.00");

        let rows = Aggregator::default().aggregate(&[padded, plain]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.key.payment_method == "CREDITO"));
        let mut revenues: Vec<_> = rows.iter().map(|r| r.revenue).collect();
        revenues.sort();
        assert_eq!(revenues, vec![dec("4.00"), dec("20.00")]);
    }

    #[test]
    fn test_output_text_is_trimmed() {
        let mut padded = enriched(1, "San Paolo X", "1.00", "0.00");
        padded.record.payment_method = " CREDITO ".to_string();
        padded.record.delivery_type = "DELIVERY  ".to_string();
        padded.record.sales_channel = "\tIFOOD".to_string();

        let rows = Aggregator::default().aggregate(&[padded]);
        assert_eq!(rows[0].key.payment_method, "CREDITO");
        assert_eq!(rows[0].key.delivery_type, "DELIVERY");
        assert_eq!(rows[0].key.sales_channel, "IFOOD");
    }

    #[test]
    fn test_order_independence() {
        let input = vec![
            enriched(1, "San Paolo A", "10.00", "1.00"),
            enriched(2, "San Paolo B", "3.33", "0.33"),
            enriched(1, "San Paolo A", "4.44", "0.44"),
            enriched(3, "San Paolo C", "7.77", "0.00"),
            enriched(2, "San Paolo B", "1.11", "1.11"),
        ];
        let baseline = totals(&Aggregator::default().aggregate(&input));

        let mut reversed = input.clone();
        reversed.reverse();
        assert_eq!(totals(&Aggregator::default().aggregate(&reversed)), baseline);

        for shift in 1..input.len() {
            let mut rotated = input.clone();
            rotated.rotate_left(shift);
            assert_eq!(totals(&Aggregator::default().aggregate(&rotated)), baseline);
        }
    }
}
