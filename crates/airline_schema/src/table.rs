//! Table declarations: decoding, querying and the interactive flows.

use std::collections::HashMap;
use std::io;

use airline_db::{DbConnection, DbRow, DbValue};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use tracing::debug;

use crate::column::ColumnDef;
use crate::condition::{Filter, SelectCondition, SelectOperator};
use crate::console::{confirm, select_in_range, select_index, Console};
use crate::error::{DecodeError, Result, SchemaError};
use crate::record::Record;
use crate::value::Value;

/// An ordered set of columns under a table (or result-set) name.
///
/// Column order is the insert-tuple order and the display order.
#[derive(Debug, Clone)]
pub struct TableDef {
    name: String,
    columns: Vec<ColumnDef>,
    index: HashMap<String, usize>,
}

impl TableDef {
    /// Declare a table. Column names must be unique and allowed values must
    /// match their column's type.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> std::result::Result<Self, SchemaError> {
        let name = name.into();
        let mut index = HashMap::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
            let mismatched = column
                .allowed_values
                .iter()
                .flatten()
                .find(|value| value.data_type() != column.data_type);
            if let Some(value) = mismatched {
                return Err(SchemaError::AllowedValueType {
                    column: column.name.clone(),
                    value: value.to_str(),
                    expected: column.data_type.to_string(),
                });
            }
        }

        Ok(Self {
            name,
            columns,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Look up a declared column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.index.get(name).map(|&position| &self.columns[position])
    }

    // ------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------

    /// Decode result rows into records, all or nothing.
    pub fn decode_rows(&self, rows: &[DbRow]) -> std::result::Result<Vec<Record>, DecodeError> {
        let mut records = Vec::with_capacity(rows.len());
        let mut layout: Vec<usize> = Vec::new();
        let mut layout_for: Option<&[String]> = None;

        for row in rows {
            // Rows of one result share a schema; resolve positions once per schema.
            if layout_for != Some(row.column_names()) {
                layout = self.layout(row.column_names())?;
                layout_for = Some(row.column_names());
            }
            records.push(self.decode_row(row, &layout)?);
        }

        Ok(records)
    }

    /// Position of every declared column in a result schema.
    fn layout(&self, result_columns: &[String]) -> std::result::Result<Vec<usize>, DecodeError> {
        self.columns
            .iter()
            .map(|column| {
                result_columns
                    .iter()
                    .position(|name| *name == column.name)
                    .ok_or_else(|| DecodeError::MissingColumn(column.name.clone()))
            })
            .collect()
    }

    fn decode_row(&self, row: &DbRow, layout: &[usize]) -> std::result::Result<Record, DecodeError> {
        let entries = self
            .columns
            .iter()
            .zip(layout)
            .map(|(column, &position)| {
                let cell = row
                    .get_raw(position)
                    .ok_or_else(|| DecodeError::MissingColumn(column.name.clone()))?;
                let value = column
                    .decode_cell(cell)
                    .map_err(|source| DecodeError::InvalidCell {
                        column: column.name.clone(),
                        source,
                    })?;
                Ok((column.name.clone(), value))
            })
            .collect::<std::result::Result<Vec<_>, DecodeError>>()?;

        Ok(Record::from_entries(entries))
    }

    // ------------------------------------------------------------------
    // Value collection
    // ------------------------------------------------------------------

    /// Prompt for one column until the input validates.
    pub fn collect_value(
        &self,
        console: &mut dyn Console,
        column: &ColumnDef,
        prompt: Option<&str>,
    ) -> io::Result<Value> {
        console.clear()?;
        let prompt = match prompt {
            Some(prompt) => prompt.to_string(),
            None => format!("Please enter a value for {}: ", column.name),
        };

        loop {
            let input = console.read_line(&prompt)?;
            match column.parse_input(&input) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(table = %self.name, column = %column.name, error = %err, "Input rejected");
                    for line in column.describe_expected(&err) {
                        console.print(&line)?;
                    }
                }
            }
        }
    }

    /// Collect a value for every column accepted by `include`, in declared order.
    pub fn collect_values(
        &self,
        console: &mut dyn Console,
        include: impl Fn(&ColumnDef) -> bool,
    ) -> io::Result<Vec<Value>> {
        console.clear()?;
        let mut values = Vec::new();
        for column in self.columns.iter().filter(|column| include(column)) {
            values.push(self.collect_value(console, column, None)?);
        }
        Ok(values)
    }

    /// Collect a value for every column.
    pub fn collect_all_values(&self, console: &mut dyn Console) -> io::Result<Vec<Value>> {
        self.collect_values(console, |_| true)
    }

    // ------------------------------------------------------------------
    // Condition collection
    // ------------------------------------------------------------------

    fn prompt_column(&self, console: &mut dyn Console, msg: &str) -> io::Result<&ColumnDef> {
        console.clear()?;
        console.print(msg)?;
        for (idx, column) in self.columns.iter().enumerate() {
            console.print(&format!("    ({}). {}", idx + 1, column.name))?;
        }
        let selected = select_in_range(console, "Please enter column number: ", self.columns.len())?;
        Ok(&self.columns[selected - 1])
    }

    fn prompt_operator(console: &mut dyn Console, column: &ColumnDef) -> io::Result<SelectOperator> {
        console.clear()?;
        console.print(&format!("Select an operator to compare against {}", column.name))?;
        for (idx, operator) in SelectOperator::ALL.iter().enumerate() {
            console.print(&format!("    ({}). {}", idx + 1, operator.name()))?;
        }
        let selected = select_in_range(console, "Please select an operator: ", SelectOperator::ALL.len())?;
        Ok(SelectOperator::ALL[selected - 1])
    }

    /// Build conditions until the user declines to add another.
    pub fn collect_conditions(&self, console: &mut dyn Console) -> io::Result<Vec<SelectCondition<'_>>> {
        self.collect_conditions_into(console, Filter::new())
            .map(Filter::into_conditions)
    }

    /// Same as [`TableDef::collect_conditions`], behind a yes/no gate.
    pub fn collect_conditions_optional(
        &self,
        console: &mut dyn Console,
    ) -> io::Result<Vec<SelectCondition<'_>>> {
        if confirm(
            console,
            "Would you like to specify some filters to narrow down your search?",
        )? {
            return self.collect_conditions(console);
        }
        Ok(Vec::new())
    }

    fn collect_conditions_into<'t>(
        &'t self,
        console: &mut dyn Console,
        mut filter: Filter<'t>,
    ) -> io::Result<Filter<'t>> {
        console.clear()?;
        loop {
            let column = self.prompt_column(console, "Please select a column to apply the condition to: ")?;
            let operator = Self::prompt_operator(console, column)?;
            let prompt = format!("Please enter a value to compare against {}: ", column.name);
            let value = self.collect_value(console, column, Some(prompt.as_str()))?;

            console.clear()?;
            filter.push(SelectCondition::new(column, operator, value));
            console.print(&format!("Applied conditions: {}", filter.summary()))?;

            if !confirm(console, "Would you like to add any more conditions?")? {
                return Ok(filter);
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// `SELECT * FROM <table>` restricted by `filter`, with its bound parameters.
    pub fn select_statement(&self, filter: &Filter<'_>) -> (String, Vec<DbValue>) {
        let mut statement = format!("SELECT * FROM {}", self.name);
        if let Some(where_clause) = filter.where_clause() {
            statement.push_str(" WHERE ");
            statement.push_str(&where_clause);
        }
        (statement, filter.params())
    }

    /// Run a caller-supplied parameterized statement and decode the result
    /// against this table's columns.
    pub fn query(&self, conn: &DbConnection, statement: &str, params: &[DbValue]) -> Result<Vec<Record>> {
        let rows = conn.query_all(statement, params)?;
        let records = self.decode_rows(&rows)?;
        debug!(table = %self.name, records = records.len(), "Decoded query result");
        Ok(records)
    }

    /// Query this table with `base` conditions plus any the user adds.
    pub fn query_with_conditions<'t>(
        &'t self,
        conn: &DbConnection,
        console: &mut dyn Console,
        base: &[SelectCondition<'t>],
    ) -> Result<Vec<Record>> {
        let mut filter: Filter<'t> = base.iter().cloned().collect();
        filter.extend(self.collect_conditions_optional(console)?);

        let (statement, params) = self.select_statement(&filter);
        debug!(table = %self.name, conditions = filter.len(), statement = %statement, "Querying records");
        self.query(conn, &statement, &params)
    }

    // ------------------------------------------------------------------
    // Display and selection
    // ------------------------------------------------------------------

    /// Render records as a numbered table (1-based), header in declared order.
    pub fn render_records(&self, records: &[Record]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec![Cell::new("#")];
        header.extend(
            self.columns
                .iter()
                .map(|column| Cell::new(&column.name).fg(Color::Cyan)),
        );
        table.set_header(header);

        for (idx, record) in records.iter().enumerate() {
            let mut row = vec![format!("({})", idx + 1)];
            row.extend(record.values().map(Value::to_str));
            table.add_row(row);
        }

        table.to_string()
    }

    pub fn display_records(&self, console: &mut dyn Console, records: &[Record]) -> io::Result<()> {
        console.print(&format!("Your query yielded {} records", records.len()))?;
        console.print(&self.render_records(records))
    }

    /// List matching records and let the user pick one; `None` when aborted.
    pub fn pick_record<'t>(
        &'t self,
        conn: &DbConnection,
        console: &mut dyn Console,
        base: &[SelectCondition<'t>],
    ) -> Result<Option<Record>> {
        let records = self.query_with_conditions(conn, console, base)?;
        self.display_records(console, &records)?;
        console.print("")?;
        console.print("    (0). Enter 0 to abort")?;

        let choice = select_index(
            console,
            &format!("Please select a {}: ", self.name),
            records.len(),
            true,
        )?;

        match choice {
            Some(n) => {
                debug!(table = %self.name, selection = n, "Record selected");
                Ok(records.into_iter().nth(n - 1))
            }
            None => {
                debug!(table = %self.name, "Selection aborted");
                Ok(None)
            }
        }
    }
}
