use serde_json::Value;

use crate::actions::extract::extract_json_blocks;
use crate::actions::schema::{validate_record, ActionList, BrowserOperations, OperationSchema};
use crate::errors::{PilotError, PilotResult};

const NO_JSON: &str = "Response does not contain valid JSON";
const NOT_AN_ARRAY: &str = "Response JSON is not an array of actions";

/// Decodes model output into raw `{thought, action}` records.
///
/// The whole text is tried first, then the first fenced candidate. Further
/// candidates are never consulted.
pub fn decode_response(text: &str) -> PilotResult<Vec<Value>> {
    let decoded = serde_json::from_str::<Value>(text).or_else(|direct_err| {
        tracing::debug!(error = %direct_err, "response is not bare JSON, trying fenced blocks");
        extract_json_blocks(text)
            .next()
            .ok_or_else(|| PilotError::Parse(NO_JSON.into()))
            .and_then(|block| {
                serde_json::from_str::<Value>(block).map_err(|e| {
                    tracing::debug!(error = %e, "first fenced block is not valid JSON");
                    PilotError::Parse(NO_JSON.into())
                })
            })
    })?;

    match decoded {
        Value::Array(records) => Ok(records),
        other => {
            tracing::debug!(kind = ?other, "decoded JSON is not an array");
            Err(PilotError::Parse(NOT_AN_ARRAY.into()))
        }
    }
}

/// Turns model text into an ordered, fully validated action list.
#[derive(Debug, Clone, Default)]
pub struct ActionParser<S = BrowserOperations> {
    schema: S,
}

impl<S: OperationSchema> ActionParser<S> {
    pub fn new(schema: S) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn parse(&self, text: &str) -> PilotResult<ActionList<S::Operation>> {
        let records = decode_response(text)?;
        self.assemble(&records)
    }

    /// Validates records in order, failing on the first invalid one.
    pub fn assemble(&self, records: &[Value]) -> PilotResult<ActionList<S::Operation>> {
        let mut actions = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            tracing::debug!(index, record = %record, "processing action");
            let action = validate_record(&self.schema, record).inspect_err(|e| {
                tracing::warn!(index, error = %e, "action rejected");
            })?;
            actions.push(action);
        }
        tracing::info!(count = actions.len(), "action list assembled");
        Ok(ActionList::new(actions))
    }
}

/// Parses with the built-in browser operation set.
pub fn parse_response(text: &str) -> PilotResult<ActionList> {
    ActionParser::new(BrowserOperations).parse(text)
}
