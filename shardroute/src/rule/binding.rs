/// Logical tables that shard identically: same data source, same actual
/// table position on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindingTableRule {
    tables: Vec<String>,
}

impl BindingTableRule {
    pub fn new(tables: impl IntoIterator<Item = impl ToString>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Member tables, in configuration order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.iter().any(|t| t == table)
    }
}
