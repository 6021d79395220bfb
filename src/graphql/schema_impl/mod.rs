pub mod queries;

use async_graphql::{EmptyMutation, EmptySubscription, Schema as GraphQLSchema};

use crate::app_state::AppState;

pub use queries::QueryRoot;

/// Read-only catalog schema; all writes go through the admin REST routes.
pub type Schema = GraphQLSchema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(app_state)
        .finish()
}
