//! Pure conversions between DynamoDB attribute maps and [`Item`]s.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::StoreError;
use crate::item::{AttrValue, Item, Number, TodoChanges, CHECKED, ID, TEXT, UPDATED_AT};

pub fn item_from_attributes(
    attributes: &HashMap<String, AttributeValue>,
) -> Result<Item, StoreError> {
    attributes
        .iter()
        .map(|(name, value)| {
            attribute_to_value(value)
                .map(|value| (name.clone(), value))
                .map_err(|err| StoreError::InvalidData(format!("attribute {name}: {err}")))
        })
        .collect()
}

pub fn item_to_attributes(item: Item) -> HashMap<String, AttributeValue> {
    item.into_attributes()
        .into_iter()
        .map(|(name, value)| (name, value_to_attribute(value)))
        .collect()
}

fn attribute_to_value(value: &AttributeValue) -> Result<AttrValue, StoreError> {
    Ok(match value {
        AttributeValue::Null(_) => AttrValue::Null,
        AttributeValue::Bool(b) => AttrValue::Bool(*b),
        AttributeValue::S(s) => AttrValue::S(s.clone()),
        AttributeValue::N(n) => AttrValue::N(Number::parse(n)?),
        AttributeValue::L(values) => AttrValue::L(
            values
                .iter()
                .map(attribute_to_value)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => AttrValue::M(
            map.iter()
                .map(|(k, v)| attribute_to_value(v).map(|v| (k.clone(), v)))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::Ss(values) => AttrValue::Ss(values.clone()),
        AttributeValue::Ns(values) => AttrValue::Ns(
            values
                .iter()
                .map(|n| Number::parse(n))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(StoreError::InvalidData(format!(
                "unsupported attribute type: {other:?}"
            )))
        }
    })
}

fn value_to_attribute(value: AttrValue) -> AttributeValue {
    match value {
        AttrValue::Null => AttributeValue::Null(true),
        AttrValue::Bool(b) => AttributeValue::Bool(b),
        AttrValue::S(s) => AttributeValue::S(s),
        AttrValue::N(n) => AttributeValue::N(n.to_string()),
        AttrValue::L(values) => {
            AttributeValue::L(values.into_iter().map(value_to_attribute).collect())
        }
        AttrValue::M(map) => AttributeValue::M(
            map.into_iter()
                .map(|(k, v)| (k, value_to_attribute(v)))
                .collect(),
        ),
        AttrValue::Ss(values) => AttributeValue::Ss(values),
        AttrValue::Ns(values) => AttributeValue::Ns(values.iter().map(Number::to_string).collect()),
    }
}

/// The `SET` expression, names and values for an `UpdateItem` call.
#[derive(Debug, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

pub fn update_expression(changes: &TodoChanges, updated_at: &Number) -> UpdateExpression {
    let mut assignments = vec!["#updatedAt = :updatedAt"];
    let mut names = HashMap::from([
        ("#id".to_string(), ID.to_string()),
        ("#updatedAt".to_string(), UPDATED_AT.to_string()),
    ]);
    let mut values = HashMap::from([(
        ":updatedAt".to_string(),
        AttributeValue::N(updated_at.to_string()),
    )]);

    // `text` is a DynamoDB reserved word, so every name goes through a placeholder
    if let Some(text) = &changes.text {
        assignments.push("#text = :text");
        names.insert("#text".to_string(), TEXT.to_string());
        values.insert(":text".to_string(), AttributeValue::S(text.clone()));
    }
    if let Some(checked) = changes.checked {
        assignments.push("#checked = :checked");
        names.insert("#checked".to_string(), CHECKED.to_string());
        values.insert(":checked".to_string(), AttributeValue::Bool(checked));
    }

    UpdateExpression {
        expression: format!("SET {}", assignments.join(", ")),
        names,
        values,
    }
}
