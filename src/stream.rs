//! Batch conversion: run many independent requests concurrently.
//!
//! Requests share the converter's immutable policy but nothing else, so a
//! job worker draining an upload queue can run them with bounded
//! concurrency and consume results as they complete. Results arrive in
//! completion order, tagged with the request's position in the input batch;
//! collect and sort by index if submission order matters.

use crate::convert::{ConversionRequest, Converter};
use crate::error::ConvertError;
use crate::output::ConversionResult;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;

/// A boxed stream of per-request outcomes, tagged with the request's index
/// in the submitted batch.
pub type ResultStream =
    Pin<Box<dyn Stream<Item = (usize, Result<ConversionResult, ConvertError>)> + Send>>;

/// Convert a batch of requests, at most `concurrency` in flight at once.
///
/// Each request is still executed sequentially internally (one strategy at
/// a time); concurrency applies across requests only. A failed request
/// yields its error as a stream item and does not affect the others.
///
/// # Example
/// ```rust,no_run
/// use docshift::{convert_stream, ConversionRequest, Converter};
/// use futures::StreamExt;
/// use std::sync::Arc;
///
/// # async fn example(converter: Arc<Converter>, requests: Vec<ConversionRequest>) {
/// let mut results = convert_stream(converter, requests, 8);
/// while let Some((index, outcome)) = results.next().await {
///     match outcome {
///         Ok(result) => println!("#{index}: {} via {}", result.output.len(), result.strategy),
///         Err(e) => eprintln!("#{index}: {e}"),
///     }
/// }
/// # }
/// ```
pub fn convert_stream(
    converter: Arc<Converter>,
    requests: Vec<ConversionRequest>,
    concurrency: usize,
) -> ResultStream {
    let concurrency = concurrency.max(1);
    let s = stream::iter(requests.into_iter().enumerate().map(move |(index, request)| {
        let converter = Arc::clone(&converter);
        async move { (index, converter.convert(&request).await) }
    }))
    .buffer_unordered(concurrency);
    Box::pin(s)
}
