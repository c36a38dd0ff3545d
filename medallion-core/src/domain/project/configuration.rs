// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::normalize::CategoricalDefaults;
use crate::domain::record::RawField;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    pub version: String,

    /// DuckDB database file, relative to the project directory.
    #[serde(default = "default_warehouse")]
    pub warehouse: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[serde(default)]
    pub bronze: BronzeConfig,

    #[serde(default)]
    pub silver: Option<LayerConfig>,

    #[serde(default = "default_gold")]
    pub gold: LayerConfig,

    #[serde(default)]
    pub lookups: LookupPaths,

    #[serde(default)]
    pub pipeline: PipelineSettings,

    #[serde(default)]
    pub defaults: CategoricalDefaults,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BronzeConfig {
    #[serde(default = "default_bronze_table")]
    pub table: String,

    /// Overrides of the export column names, keyed by field.
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
}

impl Default for BronzeConfig {
    fn default() -> Self {
        Self {
            table: default_bronze_table(),
            columns: BTreeMap::new(),
        }
    }
}

impl BronzeConfig {
    /// Column holding `field` in the Bronze table.
    pub fn column(&self, field: RawField) -> String {
        self.columns
            .get(field.as_str())
            .cloned()
            .unwrap_or_else(|| default_column(field).to_string())
    }

    /// Override keys that do not name a known field.
    pub fn unknown_columns(&self) -> Vec<String> {
        self.columns
            .keys()
            .filter(|k| !RawField::ALL.iter().any(|f| f.as_str() == k.as_str()))
            .cloned()
            .collect()
    }
}

/// Header of each field in the marketplace export.
pub fn default_column(field: RawField) -> &'static str {
    match field {
        RawField::OrderNumber => "N DO PEDIDO",
        RawField::EntityName => "RESTAURANTE",
        RawField::EntityId => "ID DO RESTAURANTE",
        RawField::SaleDate => "DATA",
        RawField::DeliveryFee => "TAXA DE ENTREGA",
        RawField::OrderValue => "VALOR DOS ITENS",
        RawField::PlatformIncentive => "INCENTIVO PROMOCIONAL DO IFOOD",
        RawField::StoreIncentive => "INCENTIVO PROMOCIONAL DA LOJA",
        RawField::PaymentMethod => "PAGAMENTO",
        RawField::CancellationReason => "MOTIVO DO CANCELAMENTO",
        RawField::DeliveryType => "TIPO DE ENTREGA DOS PEDIDOS",
        RawField::SalesChannel => "CANAL DE VENDAS",
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LayerConfig {
    pub table: String,
}

/// Optional project overrides of the embedded lookup tables.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LookupPaths {
    pub rename: Option<String>,
    pub regions: Option<String>,
    pub categories: Option<String>,
    #[serde(default)]
    pub validation: ValidationMode,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    Off,
    #[default]
    Warn,
    Strict,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineSettings {
    /// Substring of the raw entity name a row needs to reach Gold.
    #[serde(default = "default_include_entity")]
    pub include_entity: Option<String>,

    /// Fraction of rejected rows (0.0 - 1.0) above which the run fails.
    #[serde(default)]
    pub max_rejected_ratio: Option<f64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            include_entity: default_include_entity(),
            max_rejected_ratio: None,
        }
    }
}

fn default_include_entity() -> Option<String> {
    Some("San Paolo".to_string())
}
fn default_warehouse() -> String {
    "medallion.duckdb".to_string()
}
fn default_bronze_table() -> String {
    "bronze_ifood".to_string()
}
fn default_gold() -> LayerConfig {
    LayerConfig {
        table: "gold_ifood".to_string(),
    }
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
