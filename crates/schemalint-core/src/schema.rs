//! Concrete schema model
//!
//! The materialized form of a logical schema after evaluation. The lint
//! engine only reads these values; it never mutates them.

/// A materialized schema: the tables that resulted from evaluating a
/// directory's declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// Schema name, when one was attached to the directory.
    pub name: Option<String>,

    /// Tables in evaluation order.
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn from_tables(tables: Vec<Table>) -> Self {
        Self { name: None, tables }
    }

    /// Find a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// One materialized table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Whether the table defines a primary key.
    pub has_primary_key: bool,

    /// Character set in effect for the table.
    pub charset: String,

    /// Storage engine in effect for the table.
    pub engine: String,

    /// Canonical re-rendered CREATE TABLE text, without a trailing delimiter.
    pub create_statement: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_primary_key: false,
            charset: String::new(),
            engine: String::new(),
            create_statement: String::new(),
        }
    }

    pub fn with_primary_key(mut self, has_primary_key: bool) -> Self {
        self.has_primary_key = has_primary_key;
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_create_statement(mut self, create_statement: impl Into<String>) -> Self {
        self.create_statement = create_statement.into();
        self
    }
}
