//! Document-scoped table store
//!
//! A [`Store`] is one storage unit: a set of named tables kept in memory and
//! written to a single file on [`Store::commit`]. Tables have a static schema
//! and an optional text primary key with insert-or-replace upserts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ColumnType::Text,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ColumnType::Integer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
    /// Index of the primary key column, which must be text
    pub primary_key: Option<usize>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            primary_key: None,
        }
    }

    pub fn with_primary_key(mut self, column: usize) -> Self {
        self.primary_key = Some(column);
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::schema(&self.name, "table has no columns"));
        }
        if let Some(pk) = self.primary_key {
            match self.columns.get(pk) {
                Some(column) if column.ty == ColumnType::Text => {}
                Some(column) => {
                    return Err(Error::schema(
                        &self.name,
                        format!("primary key `{}` is not a text column", column.name),
                    ))
                }
                None => {
                    return Err(Error::schema(
                        &self.name,
                        format!("no column {pk} for primary key"),
                    ))
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Integer(u32),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<u32> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    fn column_type(&self) -> ColumnType {
        match self {
            Value::Text(_) => ColumnType::Text,
            Value::Integer(_) => ColumnType::Integer,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value)
    }
}

pub type Row = Vec<Value>;

/// Rows ordered by row id; an upsert deletes the old row and appends the new
/// one, so replaced rows move to the end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "StoredTable", try_from = "StoredTable")]
pub struct Table {
    schema: TableSchema,
    rows: BTreeMap<u64, Row>,
    keys: AHashMap<String, u64>,
    next_rowid: u64,
}

impl Table {
    pub fn new(schema: TableSchema) -> Result<Self> {
        schema.validate()?;
        Ok(Self {
            schema,
            rows: BTreeMap::new(),
            keys: AHashMap::new(),
            next_rowid: 0,
        })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Append a row; fails on an existing primary key
    pub fn insert(&mut self, row: Row) -> Result<()> {
        self.check(&row)?;
        if let Some(key) = self.key_of(&row) {
            if self.keys.contains_key(key) {
                return Err(Error::DuplicateKey {
                    table: self.schema.name.clone(),
                    key: key.to_string(),
                });
            }
        }
        self.append(row);
        Ok(())
    }

    /// Insert the row, replacing any row with the same primary key
    pub fn upsert(&mut self, row: Row) -> Result<()> {
        if self.schema.primary_key.is_none() {
            return Err(Error::schema(&self.schema.name, "upsert requires a primary key"));
        }
        self.check(&row)?;
        if let Some(key) = self.key_of(&row) {
            if let Some(old) = self.keys.get(key) {
                self.rows.remove(old);
            }
        }
        self.append(row);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Row> {
        self.keys.get(key).and_then(|rowid| self.rows.get(rowid))
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.keys.clear();
    }

    fn append(&mut self, row: Row) {
        let rowid = self.next_rowid;
        self.next_rowid += 1;
        if let Some(key) = self.key_of(&row) {
            self.keys.insert(key.to_string(), rowid);
        }
        self.rows.insert(rowid, row);
    }

    fn key_of<'r>(&self, row: &'r Row) -> Option<&'r str> {
        self.schema
            .primary_key
            .and_then(|pk| row.get(pk))
            .and_then(Value::as_text)
    }

    fn check(&self, row: &Row) -> Result<()> {
        if row.len() != self.schema.columns.len() {
            return Err(Error::schema(
                &self.schema.name,
                format!("expected {} values, got {}", self.schema.columns.len(), row.len()),
            ));
        }
        for (value, column) in row.iter().zip(&self.schema.columns) {
            if value.column_type() != column.ty {
                return Err(Error::schema(
                    &self.schema.name,
                    format!("column `{}` expects {:?}", column.name, column.ty),
                ));
            }
        }
        Ok(())
    }
}

/// On-disk form of a table: row ids and the key index are rebuilt on load
#[derive(Serialize, Deserialize)]
struct StoredTable {
    schema: TableSchema,
    rows: Vec<Row>,
}

impl From<Table> for StoredTable {
    fn from(table: Table) -> Self {
        Self {
            schema: table.schema,
            rows: table.rows.into_values().collect(),
        }
    }
}

impl TryFrom<StoredTable> for Table {
    type Error = Error;

    fn try_from(stored: StoredTable) -> Result<Self> {
        let mut table = Table::new(stored.schema)?;
        for row in stored.rows {
            table.insert(row)?;
        }
        Ok(table)
    }
}

const MAGIC: [u8; 4] = *b"CFDB";
const VERSION: u16 = 2;

#[derive(Serialize, Deserialize)]
struct UnitFile {
    magic: [u8; 4],
    version: u16,
    tables: Vec<Table>,
}

/// One storage unit backed by a single file
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    tables: Vec<Table>,
}

impl Store {
    /// Open the unit at `path`, starting empty if the file does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = match std::fs::read(&path) {
            Ok(bytes) => {
                warn!(path = %path.display(), "rewriting existing storage unit");
                Self::decode(&bytes)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(Error::io(path, e)),
        };
        Ok(Self { path, tables })
    }

    fn decode(bytes: &[u8]) -> Result<Vec<Table>> {
        let unit: UnitFile =
            bincode::deserialize(bytes).map_err(|e| Error::Corrupt(e.to_string()))?;
        if unit.magic != MAGIC {
            return Err(Error::Corrupt("bad magic".into()));
        }
        if unit.version != VERSION {
            return Err(Error::Corrupt(format!("unsupported version {}", unit.version)));
        }
        Ok(unit.tables)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the table unless it exists with the same schema
    pub fn create_table(&mut self, schema: TableSchema) -> Result<()> {
        if let Some(existing) = self.tables.iter().find(|t| t.name() == schema.name) {
            if existing.schema() != &schema {
                return Err(Error::schema(
                    &schema.name,
                    "existing table has a different schema",
                ));
            }
            return Ok(());
        }
        self.tables.push(Table::new(schema)?);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(Table::name)
    }

    /// Write every table to disk, replacing the previous file in one rename
    pub fn commit(&self) -> Result<()> {
        let unit = UnitFile {
            magic: MAGIC,
            version: VERSION,
            tables: self.tables.clone(),
        };
        let bytes = bincode::serialize(&unit)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, &bytes).map_err(|e| Error::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| Error::io(&self.path, e))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "storage unit committed");
        Ok(())
    }
}
