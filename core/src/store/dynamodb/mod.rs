//! DynamoDB storage backend.
//!
//! The table has a single string hash key, `id`. Items are written as plain
//! attribute maps so attributes added by other writers survive a round trip.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use super::TodoStore;
use crate::error::{Result, StoreError};
use crate::item::{Item, Number, TodoChanges, ID};

mod conversions;
mod error;

use conversions::{item_from_attributes, item_to_attributes, update_expression};
use error::{map_delete_item_error, map_put_item_error, map_scan_error, map_update_item_error};

pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a client from the default AWS credential chain.
    ///
    /// `endpoint_url` points the client at a local DynamoDB instead of AWS.
    pub async fn connect(table_name: &str, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        Self::new(Client::new(&config), table_name)
    }
}

#[async_trait]
impl TodoStore for DynamoDbStore {
    async fn get_items(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(map_scan_error)?;

            for attributes in output.items() {
                items.push(item_from_attributes(attributes)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(table = %self.table_name, count = items.len(), "scanned todo items");
        Ok(items)
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        tracing::info!(table = %self.table_name, id, "deleted todo item");
        Ok(())
    }

    async fn put_item(&self, item: Item) -> Result<()> {
        let id = item
            .id()
            .ok_or_else(|| StoreError::InvalidData("item has no string id".to_string()))?
            .to_string();

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(item)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        tracing::info!(table = %self.table_name, id = %id, "stored todo item");
        Ok(())
    }

    async fn update_item(
        &self,
        id: &str,
        changes: &TodoChanges,
        updated_at: Number,
    ) -> Result<Item> {
        let update = update_expression(changes, &updated_at);

        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ID, AttributeValue::S(id.to_string()))
            .update_expression(update.expression)
            .condition_expression("attribute_exists(#id)")
            .set_expression_attribute_names(Some(update.names))
            .set_expression_attribute_values(Some(update.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, id))?;

        let attributes = output
            .attributes
            .ok_or_else(|| StoreError::QueryFailed("UpdateItem returned no attributes".to_string()))?;

        tracing::info!(table = %self.table_name, id, "updated todo item");
        item_from_attributes(&attributes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use aws_sdk_dynamodb::operation::scan::ScanOutput;
    use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
    use aws_sdk_dynamodb::types::error::ConditionalCheckFailedException;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};

    use super::*;
    use crate::item::{CHECKED, TEXT, UPDATED_AT};

    fn stored(id: &str, text: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (ID.to_string(), AttributeValue::S(id.to_string())),
            (TEXT.to_string(), AttributeValue::S(text.to_string())),
            (CHECKED.to_string(), AttributeValue::Bool(false)),
        ])
    }

    #[tokio::test]
    async fn scan_follows_last_evaluated_key() {
        let first_page = mock!(Client::scan)
            .match_requests(|req| req.exclusive_start_key().is_none())
            .then_output(|| {
                ScanOutput::builder()
                    .items(stored("a", "first"))
                    .last_evaluated_key(ID, AttributeValue::S("a".to_string()))
                    .build()
            });
        let second_page = mock!(Client::scan)
            .match_requests(|req| {
                req.exclusive_start_key()
                    .and_then(|key| key.get(ID))
                    .and_then(|id| id.as_s().ok())
                    .is_some_and(|id| id == "a")
            })
            .then_output(|| ScanOutput::builder().items(stored("b", "second")).build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&first_page, &second_page]);

        let items = DynamoDbStore::new(client, "todos").get_items().await.unwrap();

        let ids: Vec<_> = items.iter().filter_map(Item::id).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(first_page.num_calls(), 1);
        assert_eq!(second_page.num_calls(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_item_is_not_found() {
        let rule = mock!(Client::update_item).then_error(|| {
            UpdateItemError::ConditionalCheckFailedException(
                ConditionalCheckFailedException::builder()
                    .message("The conditional request failed")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);
        let changes = TodoChanges {
            text: Some("renamed".to_string()),
            checked: None,
        };

        let err = DynamoDbStore::new(client, "todos")
            .update_item("ghost", &changes, Number::from(1_705_314_600))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::NotFound {
                id: "ghost".to_string()
            }
        );
    }

    #[tokio::test]
    async fn update_returns_new_attributes() {
        let rule = mock!(Client::update_item)
            .match_requests(|req| {
                req.condition_expression() == Some("attribute_exists(#id)")
                    && req.return_values() == Some(&ReturnValue::AllNew)
            })
            .then_output(|| {
                let mut attributes = stored("a", "renamed");
                attributes.insert(UPDATED_AT.to_string(), AttributeValue::N("1705314600".to_string()));
                UpdateItemOutput::builder().set_attributes(Some(attributes)).build()
            });
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);
        let changes = TodoChanges {
            text: Some("renamed".to_string()),
            checked: None,
        };

        let item = DynamoDbStore::new(client, "todos")
            .update_item("a", &changes, Number::from(1_705_314_600))
            .await
            .unwrap();

        assert_eq!(item.id(), Some("a"));
        assert_eq!(item.get(TEXT).and_then(|v| v.as_s()), Some("renamed"));
    }
}
