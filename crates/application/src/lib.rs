//! `bistro-application`: request pipeline and restaurant use cases.
//!
//! - `request` / `handler`: request contracts and their single handler
//! - `pipeline`: cross-cutting behaviors folded around handler invocation
//! - `dispatcher`: type-keyed registry that routes a request through the chain
//! - `validation`: field rules and per-request validators
//! - `data`: the data-context port implemented by `bistro-infra`
//! - `restaurants`: commands, queries, validators and handlers

pub mod data;
pub mod dispatcher;
pub mod handler;
pub mod pipeline;
pub mod request;
pub mod restaurants;
pub mod validation;

pub use data::{Change, ChangeSet, RestaurantStore, StoreError};
pub use dispatcher::{DispatchError, Dispatcher, DispatcherBuilder};
pub use handler::{HandlerResult, RequestHandler};
pub use request::Request;
pub use validation::Validator;
