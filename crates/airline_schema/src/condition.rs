//! Filter conditions and the accumulator that turns them into a WHERE clause.

use airline_db::DbValue;

use crate::column::ColumnDef;
use crate::value::Value;

/// Comparison operator offered in the condition menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectOperator {
    Eq,
    Like,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl SelectOperator {
    /// Menu order.
    pub const ALL: [SelectOperator; 6] = [
        SelectOperator::Eq,
        SelectOperator::Like,
        SelectOperator::Gt,
        SelectOperator::Gte,
        SelectOperator::Lt,
        SelectOperator::Lte,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "Eq",
            Self::Like => "Like",
            Self::Gt => "Gt",
            Self::Gte => "Gte",
            Self::Lt => "Lt",
            Self::Lte => "Lte",
        }
    }

    pub fn to_sql_token(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Like => "LIKE",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

impl std::fmt::Display for SelectOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single comparison against one column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectCondition<'t> {
    pub column: &'t ColumnDef,
    pub operator: SelectOperator,
    pub value: Value,
}

impl<'t> SelectCondition<'t> {
    /// Bind a condition. The value must come from `column`'s own parser.
    pub fn new(column: &'t ColumnDef, operator: SelectOperator, value: Value) -> Self {
        debug_assert_eq!(column.data_type, value.data_type());
        Self {
            column,
            operator,
            value,
        }
    }

    /// For confirmation screens only; never part of an executed statement.
    pub fn to_display_string(&self) -> String {
        format!(
            "{} {} {}",
            self.column.name,
            self.operator.name(),
            self.value.to_str()
        )
    }

    /// The form placed into executed SQL; the value travels as a bound parameter.
    pub fn to_parameterized_clause(&self) -> String {
        format!("{} {} ?", self.column.name, self.operator.to_sql_token())
    }

    pub fn bind_value(&self) -> DbValue {
        self.value.to_db_value()
    }
}

/// Ordered accumulator of conditions, AND-joined in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter<'t> {
    conditions: Vec<SelectCondition<'t>>,
}

impl<'t> Filter<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: SelectCondition<'t>) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn push(&mut self, condition: SelectCondition<'t>) {
        self.conditions.push(condition);
    }

    pub fn extend(&mut self, conditions: impl IntoIterator<Item = SelectCondition<'t>>) {
        self.conditions.extend(conditions);
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn conditions(&self) -> &[SelectCondition<'t>] {
        &self.conditions
    }

    pub fn into_conditions(self) -> Vec<SelectCondition<'t>> {
        self.conditions
    }

    /// `a = ? AND b LIKE ?`, or `None` when there is nothing to filter on.
    pub fn where_clause(&self) -> Option<String> {
        if self.conditions.is_empty() {
            return None;
        }
        Some(
            self.conditions
                .iter()
                .map(SelectCondition::to_parameterized_clause)
                .collect::<Vec<_>>()
                .join(" AND "),
        )
    }

    /// Bound parameters, in the same order as the placeholders.
    pub fn params(&self) -> Vec<DbValue> {
        self.conditions.iter().map(SelectCondition::bind_value).collect()
    }

    /// `status Eq boarding, origin_id Gt 3`
    pub fn summary(&self) -> String {
        self.conditions
            .iter()
            .map(SelectCondition::to_display_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'t> FromIterator<SelectCondition<'t>> for Filter<'t> {
    fn from_iter<I: IntoIterator<Item = SelectCondition<'t>>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
        }
    }
}
