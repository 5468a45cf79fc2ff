//! Fetch and process one operation's data.

use web_action_metadata::{build_metadata, decode_action_list, decode_metadata_response};

use crate::transport::Fetcher;
use crate::types::{ClientResult, Operation, SuccessData};

/// Fetch `path` and turn the body into the operation's success data.
///
/// The action list passes through untouched; metadata is normalized and
/// aggregated per route. Any failure aborts the whole run.
pub async fn run_operation(
    fetcher: &dyn Fetcher,
    operation: Operation,
    path: &str,
) -> ClientResult<SuccessData> {
    let body = fetcher.get_json(path).await?;

    match operation {
        Operation::Actions => Ok(SuccessData::Actions {
            data: decode_action_list(body)?,
        }),
        Operation::Metadata => {
            let raw = decode_metadata_response(body)?;
            Ok(SuccessData::Metadata {
                metadata: build_metadata(raw),
            })
        }
    }
}
