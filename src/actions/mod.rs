pub mod extract;
pub mod parser;
pub mod schema;

pub use parser::{decode_response, parse_response, ActionParser};
pub use schema::{Action, ActionList, BrowserOperations, Operation, OperationSchema};
