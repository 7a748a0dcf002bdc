//! Parsed statement, as handed over by the SQL parser.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::{InsertValuesSegment, TableSegment, WhereClause};

/// `SELECT`, `UPDATE` or `DELETE`: only the predicates matter for routing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filtered {
    #[serde(default)]
    pub where_clause: Option<WhereClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    /// Target table.
    pub table: String,
    /// Column list. Empty if the statement doesn't name columns.
    #[serde(default)]
    pub columns: Vec<String>,
    /// `VALUES` tuples, in source order.
    #[serde(default)]
    pub values: Vec<InsertValuesSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatementKind {
    Select(Filtered),
    Insert(Insert),
    Update(Filtered),
    Delete(Filtered),
}

/// Statement text and the segments routing and rewriting need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub sql: String,
    pub kind: StatementKind,
    /// Every table name occurrence, in source order.
    #[serde(default)]
    pub tables: Vec<TableSegment>,
}

impl Statement {
    pub fn new(sql: impl ToString, kind: StatementKind) -> Self {
        Self {
            sql: sql.to_string(),
            kind,
            tables: vec![],
        }
    }

    pub fn with_table(mut self, table: TableSegment) -> Self {
        self.tables.push(table);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn kind(&self) -> &StatementKind {
        &self.kind
    }

    /// Distinct logical tables, in order of first appearance.
    pub fn logical_tables(&self) -> Vec<&str> {
        let mut tables = self
            .tables
            .iter()
            .map(|table| table.name.as_str())
            .collect::<IndexSet<_>>();

        if let StatementKind::Insert(ref insert) = self.kind {
            tables.insert(insert.table.as_str());
        }

        tables.into_iter().collect()
    }

    pub fn table_segments(&self) -> &[TableSegment] {
        &self.tables
    }

    /// `VALUES` tuples; empty unless this is an `INSERT`.
    pub fn insert_values(&self) -> &[InsertValuesSegment] {
        match self.kind {
            StatementKind::Insert(ref insert) => &insert.values,
            _ => &[],
        }
    }

    pub fn where_clause(&self) -> Option<&WhereClause> {
        match self.kind {
            StatementKind::Select(ref filtered)
            | StatementKind::Update(ref filtered)
            | StatementKind::Delete(ref filtered) => filtered.where_clause.as_ref(),
            StatementKind::Insert(_) => None,
        }
    }

    /// Table a column owner (table name or alias) refers to.
    pub fn owner_table(&self, owner: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|table| table.alias.as_deref() == Some(owner))
            .or_else(|| self.tables.iter().find(|table| table.is_owner(owner)))
            .map(|table| table.name.as_str())
    }
}
