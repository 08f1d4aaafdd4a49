//! SELECT and CREATE TABLE statement builders.

use strata_types::{SortDirection, Value};

use crate::record::Record;

/// A rendered statement: SQL text plus the values bound to its placeholders,
/// in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The SQL text, with `?N` placeholders where values were supplied.
    pub sql: String,
    /// Values for the placeholders, `bindings[0]` corresponding to `?1`.
    pub bindings: Vec<Value>,
}

/// A chainable builder for a single SELECT statement.
///
/// Clause order in the rendered text is fixed (SELECT, FROM, WHERE,
/// ORDER BY, LIMIT) regardless of call order, and clauses with no input are
/// omitted entirely. [`render`](Self::render) is side-effect-free and may be
/// called repeatedly.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    default_table: String,
    select: Vec<String>,
    from: Vec<String>,
    predicates: Vec<String>,
    bindings: Vec<Value>,
    order_by: Vec<String>,
    limit: Option<u64>,
}

impl QueryBuilder {
    /// Creates a builder for the record kind's default table.
    pub fn new<R: Record>() -> Self {
        Self::for_table(R::TABLE)
    }

    /// Creates a builder with an explicit default table name.
    pub fn for_table(table: &str) -> Self {
        Self {
            default_table: table.to_string(),
            select: Vec::new(),
            from: Vec::new(),
            predicates: Vec::new(),
            bindings: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Adds one column to the select list. Never calling `select` renders
    /// `SELECT *`.
    pub fn select(mut self, column: &str) -> Self {
        self.select.push(column.to_string());
        self
    }

    /// Adds one table to the source list. Never calling `from` falls back to
    /// the default table the builder was created with.
    pub fn from(mut self, table: &str) -> Self {
        self.from.push(table.to_string());
        self
    }

    /// Adds an inner join to the source list.
    ///
    /// Joins are part of the FROM clause, not a separate clause category;
    /// call `from` before `join`.
    pub fn join(mut self, table: &str, left: &str, right: &str) -> Self {
        self.from
            .push(format!("INNER JOIN {table} ON {left} = {right}"));
        self
    }

    /// Adds one equality predicate, binding `value` to a fresh placeholder.
    /// Predicates are joined with `AND`.
    pub fn filter(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.bindings.push(value.into());
        self.predicates
            .push(format!("{column} = ?{}", self.bindings.len()));
        self
    }

    /// Adds one ORDER BY term. Terms are comma-joined in call order.
    pub fn order_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.order_by.push(format!("{column} {}", direction.as_sql()));
        self
    }

    /// Sets the row limit. A second call overwrites the first.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Renders the accumulated state into a [`Statement`].
    pub fn render(&self) -> Statement {
        let mut clauses = Vec::new();

        if self.select.is_empty() {
            clauses.push("SELECT *".to_string());
        } else {
            clauses.push(format!("SELECT {}", self.select.join(", ")));
        }

        if self.from.is_empty() {
            clauses.push(format!("FROM {}", self.default_table));
        } else {
            clauses.push(format!("FROM {}", self.from.join(" ")));
        }

        if !self.predicates.is_empty() {
            clauses.push(format!("WHERE {}", self.predicates.join(" AND ")));
        }

        if !self.order_by.is_empty() {
            clauses.push(format!("ORDER BY {}", self.order_by.join(", ")));
        }

        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {limit}"));
        }

        Statement {
            sql: format!("{};", clauses.join(" ")),
            bindings: self.bindings.clone(),
        }
    }
}

/// A builder for a single CREATE TABLE statement, used by migration units.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
    if_not_exists: bool,
    columns: Vec<String>,
}

impl TableBuilder {
    /// Creates a builder for the named table.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            if_not_exists: false,
            columns: Vec::new(),
        }
    }

    /// Renders `IF NOT EXISTS` after `CREATE TABLE`.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Adds the conventional autoincrementing `id` primary key column.
    pub fn primary_key(mut self) -> Self {
        self.columns
            .push("id INTEGER PRIMARY KEY AUTOINCREMENT".to_string());
        self
    }

    /// Adds one column definition verbatim, e.g. `"name TEXT NOT NULL"`.
    pub fn column(mut self, definition: &str) -> Self {
        self.columns.push(definition.to_string());
        self
    }

    /// Adds a table-level UNIQUE constraint on the given column.
    pub fn unique(mut self, column: &str) -> Self {
        self.columns.push(format!("UNIQUE ({column})"));
        self
    }

    /// Renders the accumulated state into a [`Statement`] (no bindings).
    pub fn render(&self) -> Statement {
        let create = if self.if_not_exists {
            "CREATE TABLE IF NOT EXISTS"
        } else {
            "CREATE TABLE"
        };

        Statement {
            sql: format!("{} {} ({});", create, self.name, self.columns.join(", ")),
            bindings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Row;

    struct User;

    impl Record for User {
        const TABLE: &'static str = "users";
        const COLUMNS: &'static [&'static str] = &["id", "name"];

        fn from_row(_row: &Row<'_>) -> rusqlite::Result<Self> {
            Ok(User)
        }
    }

    #[test]
    fn bare_builder_renders_select_star_from_default_table() {
        let statement = QueryBuilder::new::<User>().render();
        assert_eq!(statement.sql, "SELECT * FROM users;");
        assert!(statement.bindings.is_empty());
    }

    #[test]
    fn clause_order_is_fixed_regardless_of_call_order() {
        let statement = QueryBuilder::new::<User>()
            .limit(10)
            .order_by("name", SortDirection::Desc)
            .filter("id", 3_i64)
            .from("users")
            .select("name")
            .render();

        assert_eq!(
            statement.sql,
            "SELECT name FROM users WHERE id = ?1 ORDER BY name DESC LIMIT 10;"
        );
        assert_eq!(statement.bindings, vec![Value::Integer(3)]);
    }

    #[test]
    fn render_is_idempotent() {
        let query = QueryBuilder::new::<User>()
            .select("id")
            .filter("name", "alice");

        let first = query.render();
        let second = query.render();
        assert_eq!(first, second);
    }

    #[test]
    fn filters_join_with_and_and_bind_in_order() {
        let statement = QueryBuilder::new::<User>()
            .filter("name", "alice")
            .filter("id", 7_i64)
            .render();

        assert_eq!(
            statement.sql,
            "SELECT * FROM users WHERE name = ?1 AND id = ?2;"
        );
        assert_eq!(
            statement.bindings,
            vec![Value::Text("alice".to_string()), Value::Integer(7)]
        );
    }

    #[test]
    fn later_limit_overwrites_earlier_limit() {
        let statement = QueryBuilder::new::<User>().limit(5).limit(1).render();
        assert_eq!(statement.sql, "SELECT * FROM users LIMIT 1;");
        assert!(!statement.sql.contains("LIMIT 5"));
    }

    #[test]
    fn join_renders_inside_the_from_clause() {
        let statement = QueryBuilder::new::<User>()
            .from("users")
            .join("posts", "users.id", "posts.user_id")
            .render();

        assert_eq!(
            statement.sql,
            "SELECT * FROM users INNER JOIN posts ON users.id = posts.user_id;"
        );
    }

    #[test]
    fn order_by_terms_are_comma_joined() {
        let statement = QueryBuilder::new::<User>()
            .order_by("name", SortDirection::Asc)
            .order_by("id", SortDirection::Desc)
            .render();

        assert_eq!(
            statement.sql,
            "SELECT * FROM users ORDER BY name ASC, id DESC;"
        );
    }

    #[test]
    fn explicit_from_replaces_default_table() {
        let statement = QueryBuilder::new::<User>().from("accounts").render();
        assert_eq!(statement.sql, "SELECT * FROM accounts;");
    }

    #[test]
    fn table_builder_renders_create_table() {
        let statement = TableBuilder::new("users")
            .primary_key()
            .column("name TEXT NOT NULL")
            .render();

        assert_eq!(
            statement.sql,
            "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);"
        );
        assert!(statement.bindings.is_empty());
    }

    #[test]
    fn table_builder_if_not_exists_and_unique() {
        let statement = TableBuilder::new("tags")
            .if_not_exists()
            .primary_key()
            .column("label TEXT NOT NULL")
            .unique("label")
            .render();

        assert_eq!(
            statement.sql,
            "CREATE TABLE IF NOT EXISTS tags (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT NOT NULL, UNIQUE (label));"
        );
    }
}
