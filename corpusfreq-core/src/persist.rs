//! Persisting a document's frequency tables into its storage unit

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::accumulator::{FrequencyRecord, FrequencyTable};
use crate::aggregate::{AggregateRecord, AggregateTables, GroupKey};
use crate::error::Result;
use crate::store::{Column, Row, Store, TableSchema, Value};

/// Snapshot of every word-form record, without a primary key
pub const INTERMEDIATE_TABLE: &str = "проміжна_таблиця";

fn sample_columns(sample_count: usize) -> impl Iterator<Item = Column> {
    (1..=sample_count).map(|i| Column::integer(format!("sample_{i}")))
}

pub fn intermediate_schema(sample_count: usize) -> TableSchema {
    let mut columns = vec![
        Column::text("word_form"),
        Column::text("lemma"),
        Column::text("part_of_speech"),
        Column::integer("absolute_frequency"),
    ];
    columns.extend(sample_columns(sample_count));
    TableSchema::new(INTERMEDIATE_TABLE, columns)
}

pub fn aggregate_schema(key: GroupKey, sample_count: usize) -> TableSchema {
    let mut columns = vec![Column::text(key.column()), Column::integer("absolute_frequency")];
    columns.extend(sample_columns(sample_count));
    TableSchema::new(key.table_name(), columns).with_primary_key(0)
}

/// Storage unit for a document: the same path with a `db` extension
pub fn storage_path_for(document: &Path) -> PathBuf {
    document.with_extension("db")
}

fn intermediate_row(record: &FrequencyRecord) -> Row {
    let mut row: Row = vec![
        Value::from(record.word_form.as_str()),
        Value::from(record.lemma.as_str()),
        Value::from(record.part_of_speech.as_str()),
        Value::from(record.absolute_frequency()),
    ];
    row.extend(record.frequencies.iter().copied().map(Value::from));
    row
}

fn aggregate_row(record: &AggregateRecord) -> Row {
    let mut row: Row = vec![
        Value::from(record.key.as_str()),
        Value::from(record.absolute_frequency),
    ];
    row.extend(record.frequencies.iter().copied().map(Value::from));
    row
}

/// Write the intermediate snapshot and the three aggregate tables, then
/// commit the unit.
///
/// Every table holds only the current run: the snapshot is replaced wholesale
/// and each aggregate table is emptied before its rows are upserted by key,
/// so keys that no longer occur in the document do not linger.
pub fn persist(
    store: &mut Store,
    table: &FrequencyTable,
    aggregates: &AggregateTables,
) -> Result<()> {
    let k = table.sample_count();

    store.create_table(intermediate_schema(k))?;
    for key in GroupKey::ALL {
        store.create_table(aggregate_schema(key, k))?;
    }

    let mut snapshot: Vec<&FrequencyRecord> = table.records().iter().collect();
    snapshot.sort_by(|a, b| b.absolute_frequency().cmp(&a.absolute_frequency()));

    let intermediate = store.table_mut(INTERMEDIATE_TABLE)?;
    intermediate.clear();
    for record in snapshot {
        intermediate.insert(intermediate_row(record))?;
    }
    debug!(table = INTERMEDIATE_TABLE, rows = intermediate.len(), "snapshot written");

    for key in GroupKey::ALL {
        let target = store.table_mut(key.table_name())?;
        target.clear();
        for record in aggregates.get(key) {
            target.upsert(aggregate_row(record))?;
        }
        debug!(table = key.table_name(), rows = target.len(), "aggregate upserted");
    }

    store.commit()
}
