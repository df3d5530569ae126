use std::time::Duration;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::create_table::{CreateTableError, CreateTableOutput};
use aws_sdk_dynamodb::operation::delete_table::{DeleteTableError, DeleteTableOutput};
use aws_sdk_dynamodb::operation::describe_table::{DescribeTableError, DescribeTableOutput};
use aws_sdk_dynamodb::operation::list_tables::ListTablesOutput;
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::types::error::{
    ConditionalCheckFailedException, ResourceInUseException, ResourceNotFoundException,
};
use aws_sdk_dynamodb::types::{
    AttributeValue, KeyType, ScalarAttributeType, TableDescription, TableStatus,
};
use aws_smithy_mocks::{RuleMode, mock, mock_client};
use dynamo_lifecycle::basic_operations::{execute_put_item, prepare_put_item};
use dynamo_lifecycle::errors::TableState;
use dynamo_lifecycle::table_operations::{
    execute_create_table, execute_delete_table, execute_list_tables, wait_for_table_active,
    wait_for_table_deleted,
};
use dynamo_lifecycle::{LifecycleError, MovieItem, TableSchema, WaitPolicy};

fn fast_policy(max_attempts: u32) -> WaitPolicy {
    WaitPolicy {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
        max_attempts,
    }
}

fn described(status: TableStatus) -> DescribeTableOutput {
    DescribeTableOutput::builder()
        .table(
            TableDescription::builder()
                .table_name("Movies")
                .table_status(status)
                .build(),
        )
        .build()
}

#[tokio::test]
async fn list_tables_sends_limit_and_caps_the_result() {
    let list = mock!(Client::list_tables)
        .match_requests(|req| req.limit() == Some(2))
        .then_output(|| {
            // An endpoint that ignores Limit.
            ListTablesOutput::builder()
                .table_names("Actors")
                .table_names("Books")
                .table_names("Movies")
                .build()
        });
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&list]);

    let (names, _) = execute_list_tables(&client, 2).await.unwrap();

    assert_eq!(names, vec!["Actors".to_string(), "Books".to_string()]);
    assert_eq!(list.num_calls(), 1);
}

#[tokio::test]
async fn list_tables_rejects_zero_limit_without_calling_the_service() {
    let list = mock!(Client::list_tables).then_output(|| ListTablesOutput::builder().build());
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, &[&list]);

    let err = execute_list_tables(&client, 0).await.unwrap_err();

    assert!(matches!(err, LifecycleError::Validation(_)));
    assert_eq!(list.num_calls(), 0);
}

#[tokio::test]
async fn create_table_sends_the_movies_schema() {
    let create = mock!(Client::create_table)
        .match_requests(|req| {
            let keys = req.key_schema.as_deref().unwrap_or_default();
            let defs = req.attribute_definitions.as_deref().unwrap_or_default();
            let throughput = req.provisioned_throughput();
            req.table_name() == Some("Movies")
                && keys.len() == 2
                && keys[0].attribute_name() == "Year"
                && keys[0].key_type() == &KeyType::Hash
                && keys[1].attribute_name() == "Title"
                && keys[1].key_type() == &KeyType::Range
                && defs.len() == 2
                && defs[0].attribute_type() == &ScalarAttributeType::N
                && defs[1].attribute_type() == &ScalarAttributeType::S
                && throughput.map(|t| (t.read_capacity_units(), t.write_capacity_units()))
                    == Some((10, 10))
        })
        .then_output(|| {
            CreateTableOutput::builder()
                .table_description(
                    TableDescription::builder()
                        .table_status(TableStatus::Creating)
                        .build(),
                )
                .build()
        });
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&create]);

    let result = execute_create_table(&client, "Movies", &TableSchema::movies())
        .await
        .unwrap();

    assert_eq!(result.status, Some(TableStatus::Creating));
    assert_eq!(create.num_calls(), 1);
}

#[tokio::test]
async fn create_table_on_existing_name_is_table_in_use() {
    let create = mock!(Client::create_table).then_error(|| {
        CreateTableError::ResourceInUseException(
            ResourceInUseException::builder()
                .message("Table already exists: Movies")
                .build(),
        )
    });
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&create]);

    let err = execute_create_table(&client, "Movies", &TableSchema::movies())
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::TableInUse { ref table } if table == "Movies"));
}

#[tokio::test]
async fn create_table_with_invalid_schema_never_reaches_the_service() {
    let create = mock!(Client::create_table).then_output(|| CreateTableOutput::builder().build());
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, &[&create]);

    let mut schema = TableSchema::movies();
    schema.sort_key.name = "Year".to_string();
    let err = execute_create_table(&client, "Movies", &schema).await.unwrap_err();

    assert!(matches!(err, LifecycleError::Validation(_)));
    assert_eq!(create.num_calls(), 0);
}

#[tokio::test]
async fn put_item_sends_conditional_write() {
    let put = mock!(Client::put_item)
        .match_requests(|req| {
            let item = req.item.clone().unwrap_or_default();
            let names = req.expression_attribute_names.clone().unwrap_or_default();
            req.table_name() == Some("Movies")
                && req.condition_expression() == Some("attribute_not_exists(#pk)")
                && names.get("#pk").map(String::as_str) == Some("Year")
                && item.get("Year") == Some(&AttributeValue::N("2022".to_string()))
                && item.get("Title") == Some(&AttributeValue::S("Dawn of Ice".to_string()))
        })
        .then_output(|| PutItemOutput::builder().build());
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&put]);

    let prepared = prepare_put_item("Movies", &TableSchema::movies(), &MovieItem::new(2022, "Dawn of Ice"));
    execute_put_item(&client, prepared).await.unwrap();

    assert_eq!(put.num_calls(), 1);
}

#[tokio::test]
async fn second_put_of_same_key_fails_the_condition() {
    let first = mock!(Client::put_item).then_output(|| PutItemOutput::builder().build());
    let second = mock!(Client::put_item).then_error(|| {
        PutItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder()
                .message("The conditional request failed")
                .build(),
        )
    });
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&first, &second]);
    let schema = TableSchema::movies();
    let movie = MovieItem::new(2022, "Dawn of Ice");

    execute_put_item(&client, prepare_put_item("Movies", &schema, &movie))
        .await
        .unwrap();
    let err = execute_put_item(&client, prepare_put_item("Movies", &schema, &movie))
        .await
        .unwrap_err();

    assert!(err.is_conditional_check_failed());
}

#[tokio::test]
async fn delete_missing_table_is_table_not_found() {
    let delete = mock!(Client::delete_table).then_error(|| {
        DeleteTableError::ResourceNotFoundException(
            ResourceNotFoundException::builder()
                .message("Cannot do operations on a non-existent table")
                .build(),
        )
    });
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&delete]);

    let err = execute_delete_table(&client, "Movies").await.unwrap_err();

    assert!(err.is_table_not_found());
}

#[tokio::test]
async fn delete_table_targets_the_named_table() {
    let delete = mock!(Client::delete_table)
        .match_requests(|req| req.table_name() == Some("Movies"))
        .then_output(|| DeleteTableOutput::builder().build());
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&delete]);

    execute_delete_table(&client, "Movies").await.unwrap();

    assert_eq!(delete.num_calls(), 1);
}

#[tokio::test]
async fn wait_for_active_polls_until_active() {
    let creating = mock!(Client::describe_table).then_output(|| described(TableStatus::Creating));
    let still_creating = mock!(Client::describe_table).then_output(|| described(TableStatus::Creating));
    let active = mock!(Client::describe_table).then_output(|| described(TableStatus::Active));
    let client = mock_client!(
        aws_sdk_dynamodb,
        RuleMode::Sequential,
        &[&creating, &still_creating, &active]
    );

    wait_for_table_active(&client, "Movies", &fast_policy(5))
        .await
        .unwrap();

    assert_eq!(active.num_calls(), 1);
}

#[tokio::test]
async fn wait_for_active_gives_up_after_max_attempts() {
    let polls: Vec<_> = (0..3)
        .map(|_| {
            mock!(Client::describe_table)
                .match_requests(|req| req.table_name() == Some("Movies"))
                .then_output(|| described(TableStatus::Creating))
        })
        .collect();
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, polls.iter());

    let err = wait_for_table_active(&client, "Movies", &fast_policy(3))
        .await
        .unwrap_err();

    match err {
        LifecycleError::WaitTimeout { table, state, attempts } => {
            assert_eq!(table, "Movies");
            assert_eq!(state, TableState::Active);
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn wait_for_active_on_missing_table_fails_fast() {
    let missing = mock!(Client::describe_table).then_error(|| {
        DescribeTableError::ResourceNotFoundException(ResourceNotFoundException::builder().build())
    });
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&missing]);

    let err = wait_for_table_active(&client, "Movies", &fast_policy(5))
        .await
        .unwrap_err();

    assert!(err.is_table_not_found());
}

#[tokio::test]
async fn wait_for_deleted_returns_once_table_is_gone() {
    let deleting = mock!(Client::describe_table).then_output(|| described(TableStatus::Deleting));
    let gone = mock!(Client::describe_table).then_error(|| {
        DescribeTableError::ResourceNotFoundException(ResourceNotFoundException::builder().build())
    });
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&deleting, &gone]);

    wait_for_table_deleted(&client, "Movies", &fast_policy(5))
        .await
        .unwrap();

    assert_eq!(gone.num_calls(), 1);
}

#[tokio::test]
async fn puts_with_same_year_and_different_title_share_the_partition_key_guard() {
    let guarded = |title: &'static str| {
        mock!(Client::put_item)
            .match_requests(move |req| {
                let item = req.item.clone().unwrap_or_default();
                let names = req.expression_attribute_names.clone().unwrap_or_default();
                req.condition_expression() == Some("attribute_not_exists(#pk)")
                    && names.len() == 1
                    && names.get("#pk").map(String::as_str) == Some("Year")
                    && item.get("Year") == Some(&AttributeValue::N("2022".to_string()))
                    && item.get("Title") == Some(&AttributeValue::S(title.to_string()))
            })
            .then_output(|| PutItemOutput::builder().build())
    };
    let first = guarded("Dawn of Ice");
    let second = guarded("Other");
    let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&first, &second]);
    let schema = TableSchema::movies();

    for movie in [MovieItem::new(2022, "Dawn of Ice"), MovieItem::new(2022, "Other")] {
        execute_put_item(&client, prepare_put_item("Movies", &schema, &movie))
            .await
            .unwrap();
    }

    assert_eq!(first.num_calls(), 1);
    assert_eq!(second.num_calls(), 1);
}
