//! Type definitions of a SQL AST representation.

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub select_list: SelectList,
    pub from: Option<From>,
    pub joins: Vec<Join>,
    pub where_: Where,
    pub group_by: GroupBy,
    pub having: Having,
    pub order_by: OrderBy,
    pub limit: Limit,
}

/// A select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectList(pub Vec<SelectItem>);

/// One term of a select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*`
    Star,
    /// `table.*`
    TableStar(TableName),
    /// A plain column reference, no alias.
    Column(ColumnReference),
    /// An expression given an output name, `expr AS alias`.
    AliasedExpression {
        expression: Expression,
        alias: ColumnAlias,
    },
}

/// A FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub struct From {
    pub table: TableName,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Join {
    /// LEFT JOIN
    LeftJoin(LeftJoin),
}

/// A LEFT JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct LeftJoin {
    pub table: TableName,
    pub on: Expression,
}

/// A WHERE clause: conditions joined with AND. Empty means no clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Where(pub Vec<Expression>);

/// A GROUP BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub elements: Vec<ColumnReference>,
}

/// A HAVING clause: conditions joined with AND. Empty means no clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Having(pub Vec<Expression>);

/// An ORDER BY clause.
///
/// The engine's request contract is a single sort field; the list here is
/// the extension point for ordered multi-field sorting.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub elements: Vec<OrderByElement>,
}

/// A single element in an ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement {
    pub target: ColumnReference,
    pub direction: OrderByDirection,
}

/// A direction for a single ORDER BY element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// LIMIT and OFFSET clauses. A zero offset is equivalent to no offset and
/// is not rendered; a zero limit is rejected upstream by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// A scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A binary operation on two scalar expressions.
    BinaryOperation {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    /// `operand BETWEEN lower AND upper`
    Between {
        operand: Box<Expression>,
        lower: Box<Expression>,
        upper: Box<Expression>,
    },
    /// `operand IN (e1, e2, ...)`
    InList {
        operand: Box<Expression>,
        list: Vec<Expression>,
    },
    /// A function call over column references.
    FunctionCall {
        function: Function,
        args: Vec<Expression>,
    },
    /// `GROUP_CONCAT(DISTINCT column)`, collapsing a joined relation's
    /// fan-out back to one row per base entity.
    GroupConcatDistinct(ColumnReference),
    /// A column reference.
    ColumnReference(ColumnReference),
    /// An irreducible value, always bound as a parameter.
    Value(Value),
}

/// Represents the name of a binary operator. The name is supplied by the
/// closed operator enums in the metadata crate, never by a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOperator(pub &'static str);

/// A scalar function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

/// Value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
}

/// A database table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName(pub String);

/// A database table's column name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName(pub String);

/// A reference to a column of a specific table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnReference {
    pub table: TableName,
    pub name: ColumnName,
}

/// aliases that we give to select-list terms
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnAlias {
    pub name: String,
}
