//! Maps AWS SDK errors to [`StoreError`].

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;

use crate::error::StoreError;

/// Requests that never got a response from DynamoDB.
fn transport_error<E, R>(err: &SdkError<E, R>) -> Option<StoreError> {
    match err {
        SdkError::DispatchFailure(failure) => Some(StoreError::ConnectionFailed(format!(
            "dispatch failure: {failure:?}"
        ))),
        SdkError::TimeoutError(_) => {
            Some(StoreError::ConnectionFailed("request timed out".to_string()))
        }
        _ => None,
    }
}

/// Service errors every table operation can return, keyed by error code.
fn service_error<E>(operation: &str, err: E) -> StoreError
where
    E: ProvideErrorMetadata + Error,
{
    let known = match err.code() {
        Some("ResourceNotFoundException") => Some("Table not found"),
        Some("ProvisionedThroughputExceededException") => Some("Throughput exceeded, please retry"),
        Some("RequestLimitExceeded") => Some("Request limit exceeded, please retry"),
        Some("ItemCollectionSizeLimitExceededException") => {
            Some("Item collection size limit exceeded")
        }
        Some("TransactionConflictException") => Some("Transaction conflict, please retry"),
        Some("InternalServerError") => Some("DynamoDB internal server error"),
        _ => None,
    };

    match known {
        Some(message) => StoreError::QueryFailed(message.to_string()),
        None => StoreError::QueryFailed(format!(
            "{operation} failed: {}",
            DisplayErrorContext(err)
        )),
    }
}

pub fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> StoreError {
    transport_error(&err).unwrap_or_else(|| service_error("Scan", err.into_service_error()))
}

pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> StoreError {
    transport_error(&err).unwrap_or_else(|| service_error("DeleteItem", err.into_service_error()))
}

pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    transport_error(&err).unwrap_or_else(|| service_error("PutItem", err.into_service_error()))
}

/// A failed `attribute_exists` condition means the item is not there.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    id: &str,
) -> StoreError {
    if let Some(err) = transport_error(&err) {
        return err;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => StoreError::NotFound {
            id: id.to_string(),
        },
        err => service_error("UpdateItem", err),
    }
}
