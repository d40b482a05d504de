//! Stream aggregation
//!
//! Folds the fragments of one generation call into a growing text,
//! yielding a snapshot after every fragment and a final snapshot when the
//! source ends normally.

use futures::stream::{self, Stream, StreamExt};

/// Accumulated text at one point of a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSnapshot {
    pub text: String,
    pub is_final: bool,
}

/// Fragment → snapshot folding.
pub struct StreamAggregator;

impl StreamAggregator {
    /// Aggregate `source` lazily.
    ///
    /// Each `Ok` fragment yields a non-final snapshot; normal end of `source`
    /// yields one final snapshot with the same text. A failing fragment is
    /// passed through as the terminal item instead of a final snapshot, so
    /// partial text never looks complete.
    pub fn run<S, E>(source: S) -> impl Stream<Item = Result<AggregateSnapshot, E>>
    where
        S: Stream<Item = Result<String, E>> + Unpin,
    {
        stream::unfold(Some((source, String::new())), |state| async move {
            let (mut source, mut text) = state?;
            match source.next().await {
                Some(Ok(fragment)) => {
                    text.push_str(&fragment);
                    let snapshot = AggregateSnapshot {
                        text: text.clone(),
                        is_final: false,
                    };
                    Some((Ok(snapshot), Some((source, text))))
                }
                Some(Err(e)) => Some((Err(e), None)),
                None => Some((
                    Ok(AggregateSnapshot {
                        text,
                        is_final: true,
                    }),
                    None,
                )),
            }
        })
    }
}
