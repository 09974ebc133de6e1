//! Filter expressions understood by the blob store.
//!
//! The JSON surface mirrors what users write in mount configurations:
//!
//! ```text
//! {"tag": "photos"}
//! {"key": "year", "value": "2023"}
//! {"key": "year"}
//! {"parent": "<blob id>"}
//! {"and": [<expr>, <expr>, ...]}
//! {"or": [<expr>, <expr>, ...]}
//! {"not": <expr>}
//! {}
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::blob::BlobMeta;
use crate::error::ModelError;

/// Boolean filter over blob metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Expression {
    /// Matches every blob.
    #[default]
    Empty,
    /// Blob carries the tag.
    Tag(String),
    /// Blob has the attribute with exactly this value.
    KeyValue { key: String, value: String },
    /// Blob has the attribute, any value.
    HasKey(String),
    /// Blob lists the ID among its parents.
    Parent(String),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
}

impl Expression {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn parent(parent_id: impl Into<String>) -> Self {
        Self::Parent(parent_id.into())
    }

    /// Conjunction with another expression.
    ///
    /// `Empty` is the identity: combining with it returns the other side.
    pub fn and(self, other: Expression) -> Self {
        match (self, other) {
            (Expression::Empty, rhs) => rhs,
            (lhs, Expression::Empty) => lhs,
            (lhs, rhs) => Expression::And(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Disjunction with another expression.
    ///
    /// `Empty` already matches everything, so it absorbs the other side.
    pub fn or(self, other: Expression) -> Self {
        match (self, other) {
            (Expression::Empty, _) | (_, Expression::Empty) => Expression::Empty,
            (lhs, rhs) => Expression::Or(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn and_tag(self, tag: impl Into<String>) -> Self {
        self.and(Self::tag(tag))
    }

    pub fn and_key_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.and(Self::key_value(key, value))
    }

    pub fn and_parent(self, parent_id: impl Into<String>) -> Self {
        self.and(Self::parent(parent_id))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Expression::Empty)
    }

    /// Evaluate the expression against one blob's metadata.
    pub fn matches(&self, meta: &BlobMeta) -> bool {
        match self {
            Expression::Empty => true,
            Expression::Tag(tag) => meta.tags.contains(tag),
            Expression::KeyValue { key, value } => {
                meta.metadata.get(key).is_some_and(|v| v == value)
            }
            Expression::HasKey(key) => meta.metadata.contains_key(key),
            Expression::Parent(parent_id) => meta.parents.contains(parent_id),
            Expression::And(lhs, rhs) => lhs.matches(meta) && rhs.matches(meta),
            Expression::Or(lhs, rhs) => lhs.matches(meta) || rhs.matches(meta),
            Expression::Not(inner) => !inner.matches(meta),
        }
    }

    /// Parse an expression from its JSON form.
    ///
    /// # Arguments
    /// * `value` - JSON object in one of the shapes listed in the module docs
    ///
    /// # Returns
    /// The parsed expression, or `ModelError::InvalidExpression` for any other shape.
    pub fn parse(value: &Value) -> Result<Self, ModelError> {
        let object: &Map<String, Value> = value
            .as_object()
            .ok_or_else(|| {
                ModelError::invalid_expression(format!("expected object, got {}", value))
            })?;

        if object.is_empty() {
            return Ok(Expression::Empty);
        }

        let has = |field: &str| object.contains_key(field);
        let expect_fields = |fields: &[&str]| -> Result<(), ModelError> {
            match object.keys().find(|k| !fields.contains(&k.as_str())) {
                Some(extra) => Err(ModelError::invalid_expression(format!(
                    "unexpected field '{}'",
                    extra
                ))),
                None => Ok(()),
            }
        };

        if has("tag") {
            expect_fields(&["tag"])?;
            return Ok(Expression::Tag(string_field(object, "tag")?));
        }

        if has("key") {
            if has("value") {
                expect_fields(&["key", "value"])?;
                return Ok(Expression::KeyValue {
                    key: string_field(object, "key")?,
                    value: string_field(object, "value")?,
                });
            }
            expect_fields(&["key"])?;
            return Ok(Expression::HasKey(string_field(object, "key")?));
        }

        if has("parent") {
            expect_fields(&["parent"])?;
            return Ok(Expression::Parent(string_field(object, "parent")?));
        }

        if has("and") {
            expect_fields(&["and"])?;
            return fold_operands(object, "and", Expression::And);
        }

        if has("or") {
            expect_fields(&["or"])?;
            return fold_operands(object, "or", Expression::Or);
        }

        if has("not") {
            expect_fields(&["not"])?;
            let inner: Expression = Expression::parse(&object["not"])?;
            return Ok(Expression::Not(Box::new(inner)));
        }

        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        Err(ModelError::invalid_expression(format!(
            "unrecognized expression fields: {}",
            keys.join(", ")
        )))
    }

    /// Render the expression back into its JSON form.
    pub fn to_json(&self) -> Value {
        match self {
            Expression::Empty => json!({}),
            Expression::Tag(tag) => json!({ "tag": tag }),
            Expression::KeyValue { key, value } => json!({ "key": key, "value": value }),
            Expression::HasKey(key) => json!({ "key": key }),
            Expression::Parent(parent_id) => json!({ "parent": parent_id }),
            Expression::And(lhs, rhs) => json!({ "and": [lhs.to_json(), rhs.to_json()] }),
            Expression::Or(lhs, rhs) => json!({ "or": [lhs.to_json(), rhs.to_json()] }),
            Expression::Not(inner) => json!({ "not": inner.to_json() }),
        }
    }
}

fn string_field(object: &Map<String, Value>, field: &str) -> Result<String, ModelError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ModelError::invalid_expression(format!("'{}' must be a string", field)))
}

fn fold_operands(
    object: &Map<String, Value>,
    field: &str,
    combine: fn(Box<Expression>, Box<Expression>) -> Expression,
) -> Result<Expression, ModelError> {
    let operands: &Vec<Value> = object
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| ModelError::invalid_expression(format!("'{}' must be an array", field)))?;

    if operands.len() < 2 {
        return Err(ModelError::invalid_expression(format!(
            "'{}' needs at least two operands, got {}",
            field,
            operands.len()
        )));
    }

    let mut parsed = operands.iter().map(Expression::parse);
    // len >= 2 was checked above
    let mut acc: Expression = match parsed.next() {
        Some(first) => first?,
        None => return Err(ModelError::invalid_expression("missing operands")),
    };
    for next in parsed {
        acc = combine(Box::new(acc), Box::new(next?));
    }
    Ok(acc)
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Empty => write!(f, "*"),
            Expression::Tag(tag) => write!(f, "tag={:?}", tag),
            Expression::KeyValue { key, value } => write!(f, "{}={:?}", key, value),
            Expression::HasKey(key) => write!(f, "has({})", key),
            Expression::Parent(parent_id) => write!(f, "parent={:?}", parent_id),
            Expression::And(lhs, rhs) => write!(f, "({} AND {})", lhs, rhs),
            Expression::Or(lhs, rhs) => write!(f, "({} OR {})", lhs, rhs),
            Expression::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: Value = Value::deserialize(deserializer)?;
        Expression::parse(&value).map_err(serde::de::Error::custom)
    }
}
