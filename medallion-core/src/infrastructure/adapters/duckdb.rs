// medallion-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection, params};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use crate::domain::project::{BronzeConfig, LayerConfig};
use crate::domain::record::{AggregatedRecord, NormalizedRecord, RawField, RawRecord, RawValue};
use crate::error::MedallionError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::store::{GoldStore, RawStore, SilverStore};

const SILVER_DDL: &str = "(
    id_pedido_loja BIGINT,
    nome_restaurante VARCHAR,
    id_restaurante BIGINT,
    data_convertida DATE,
    taxa_entrega DECIMAL(10, 2),
    total_pedido DECIMAL(10, 2),
    incentivo_ifood DECIMAL(10, 2),
    incentivo_loja DECIMAL(10, 2),
    forma_pagamento VARCHAR,
    motivo_cancelamento VARCHAR,
    tipo_entrega VARCHAR,
    canal_vendas VARCHAR
)";

const SILVER_VALUES: &str = "(?, ?, ?, CAST(? AS DATE),
    CAST(? AS DECIMAL(10, 2)), CAST(? AS DECIMAL(10, 2)),
    CAST(? AS DECIMAL(10, 2)), CAST(? AS DECIMAL(10, 2)),
    ?, ?, ?, ?)";

// Sums can outgrow the per-row DECIMAL(10, 2).
const GOLD_DDL: &str = "(
    id_pedido_loja BIGINT,
    novo_nome_restaurante VARCHAR,
    id_restaurante BIGINT,
    estado VARCHAR,
    data_venda DATE,
    receita DECIMAL(18, 2),
    desconto DECIMAL(18, 2),
    lucro DECIMAL(18, 2),
    categoria VARCHAR,
    forma_pagamento VARCHAR,
    motivo_cancelamento VARCHAR,
    tipo_entrega VARCHAR,
    canal_vendas VARCHAR,
    qtd_pedidos BIGINT
)";

const GOLD_VALUES: &str = "(?, ?, ?, ?, CAST(? AS DATE),
    CAST(? AS DECIMAL(18, 2)), CAST(? AS DECIMAL(18, 2)), CAST(? AS DECIMAL(18, 2)),
    ?, ?, ?, ?, ?, ?)";

/// DuckDB-backed Bronze/Silver/Gold warehouse.
pub struct DuckDbWarehouse {
    conn: Arc<Mutex<Connection>>,
    bronze: BronzeConfig,
    silver: Option<LayerConfig>,
    gold: LayerConfig,
}

impl DuckDbWarehouse {
    pub fn open(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            bronze: BronzeConfig::default(),
            silver: None,
            gold: LayerConfig {
                table: "gold_ifood".to_string(),
            },
        })
    }

    pub fn with_layers(
        mut self,
        bronze: BronzeConfig,
        silver: Option<LayerConfig>,
        gold: LayerConfig,
    ) -> Self {
        self.bronze = bronze;
        self.silver = silver;
        self.gold = gold;
        self
    }

    pub fn has_silver(&self) -> bool {
        self.silver.is_some()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, InfrastructureError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned))
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), InfrastructureError> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    /// Column names of a table or view, in declaration order.
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>, InfrastructureError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_name = ? ORDER BY ordinal_position",
        )?;
        let columns = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(DatabaseError::TableNotFound(table.to_string()).into());
        }
        Ok(columns)
    }

    pub fn count_rows(&self, table: &str) -> Result<u64, InfrastructureError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            &format!("SELECT count(*) FROM {}", quote_ident(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// First `limit` rows of `table`, every cell rendered as text.
    pub fn sample(
        &self,
        table: &str,
        limit: usize,
    ) -> Result<(Vec<String>, Vec<Vec<Option<String>>>), InfrastructureError> {
        let columns = self.table_columns(table)?;
        let select = columns
            .iter()
            .map(|c| format!("CAST({} AS VARCHAR)", quote_ident(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM {} LIMIT {}",
            select,
            quote_ident(table),
            limit
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let width = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Option<String>>(i))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((columns, rows))
    }

    fn bronze_select(&self) -> Result<String, InfrastructureError> {
        let table = &self.bronze.table;
        let existing = self.table_columns(table)?;

        let missing: Vec<String> = RawField::ALL
            .iter()
            .map(|f| self.bronze.column(*f))
            .filter(|c| !existing.contains(c))
            .collect();
        if !missing.is_empty() {
            return Err(DatabaseError::SchemaMismatch {
                table: table.clone(),
                missing,
            }
            .into());
        }

        let select = RawField::ALL
            .iter()
            .map(|f| format!("CAST({} AS VARCHAR)", quote_ident(&self.bronze.column(*f))))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("SELECT {} FROM {}", select, quote_ident(table)))
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[async_trait]
impl RawStore for DuckDbWarehouse {
    #[instrument(skip(self), fields(table = %self.bronze.table))]
    async fn read_all(&self) -> Result<Vec<RawRecord>, MedallionError> {
        let sql = self.bronze_select()?;
        debug!(%sql, "Reading Bronze");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql).map_err(InfrastructureError::from)?;
        let cells = stmt
            .query_map([], |row| {
                (0..RawField::ALL.len())
                    .map(|i| row.get::<_, Option<String>>(i))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(InfrastructureError::from)?;

        let mut records = Vec::new();
        for (index, row) in cells.enumerate() {
            let row = row.map_err(InfrastructureError::from)?;
            let mut record = RawRecord {
                row: index + 1,
                ..Default::default()
            };
            for (field, cell) in RawField::ALL.iter().zip(row) {
                record.set(*field, cell.map(RawValue::Text).unwrap_or_default());
            }
            records.push(record);
        }

        info!(rows = records.len(), "Bronze loaded");
        Ok(records)
    }
}

#[async_trait]
impl SilverStore for DuckDbWarehouse {
    async fn replace_silver(&self, records: &[NormalizedRecord]) -> Result<(), MedallionError> {
        let Some(silver) = &self.silver else {
            return Ok(());
        };
        let table = quote_ident(&silver.table);

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(InfrastructureError::from)?;
        tx.execute_batch(&format!("CREATE OR REPLACE TABLE {} {}", table, SILVER_DDL))
            .map_err(InfrastructureError::from)?;
        {
            let mut stmt = tx
                .prepare(&format!("INSERT INTO {} VALUES {}", table, SILVER_VALUES))
                .map_err(InfrastructureError::from)?;
            for r in records {
                stmt.execute(params![
                    r.order_id,
                    r.entity_name,
                    r.entity_id,
                    r.sale_date.to_string(),
                    r.delivery_fee.to_string(),
                    r.order_value.to_string(),
                    r.platform_incentive.to_string(),
                    r.store_incentive.to_string(),
                    r.payment_method,
                    r.cancellation_reason,
                    r.delivery_type,
                    r.sales_channel,
                ])
                .map_err(InfrastructureError::from)?;
            }
        }
        tx.commit().map_err(InfrastructureError::from)?;

        info!(table = %silver.table, rows = records.len(), "Silver replaced");
        Ok(())
    }
}

#[async_trait]
impl GoldStore for DuckDbWarehouse {
    async fn replace_all(&self, records: &[AggregatedRecord]) -> Result<(), MedallionError> {
        let table = quote_ident(&self.gold.table);

        // Dropping `tx` before commit rolls everything back, so the previous
        // Gold snapshot survives any failure below.
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(InfrastructureError::from)?;
        tx.execute_batch(&format!("CREATE OR REPLACE TABLE {} {}", table, GOLD_DDL))
            .map_err(InfrastructureError::from)?;
        {
            let mut stmt = tx
                .prepare(&format!("INSERT INTO {} VALUES {}", table, GOLD_VALUES))
                .map_err(InfrastructureError::from)?;
            for r in records {
                let k = &r.key;
                stmt.execute(params![
                    k.order_id,
                    k.canonical_name,
                    k.entity_id,
                    r.region,
                    k.sale_date.to_string(),
                    r.revenue.to_string(),
                    r.discount.to_string(),
                    r.profit().to_string(),
                    r.category,
                    k.payment_method,
                    k.cancellation_reason,
                    k.delivery_type,
                    k.sales_channel,
                    i64::try_from(r.order_count).unwrap_or(i64::MAX),
                ])
                .map_err(InfrastructureError::from)?;
            }
        }
        tx.commit().map_err(InfrastructureError::from)?;

        info!(table = %self.gold.table, rows = records.len(), "Gold replaced");
        Ok(())
    }
}
