//! Item-level operations for DynamoDB.
//!
//! - `put` - Conditional put that refuses to overwrite an existing key

mod put;

pub use put::{
    PreparedPutItem, PutItemResult, execute_put_item, prepare_put_item, sync_put_item,
};
