//! Batched nonce fetch with per-entry fallback.
//!
//! ```text
//! [BatchAttempt] ──ok──→ [Resolved(Batched)]
//!       │
//!       └── aggregate error ──→ [FallbackAttempt] ──→ [Resolved(PerEntry)]
//! ```
//!
//! Fallback reads run concurrently and all complete before the fetch
//! resolves. The fetch never fails as a whole; failures surface per outcome.

use crate::domain::{FetchMode, NonceQuery, NonceReadOutcome};
use crate::ports::outbound::NonceReader;
use futures::future::join_all;
use tracing::{debug, warn};

/// Outcomes of a nonce fetch and the strategy that produced them.
#[derive(Debug)]
pub struct NonceFetch {
    /// Strategy that produced `outcomes`.
    pub mode: FetchMode,
    /// Outcomes in query order. Length is whatever the reader returned.
    pub outcomes: Vec<NonceReadOutcome>,
}

enum FetchStage {
    BatchAttempt,
    FallbackAttempt,
    Resolved(NonceFetch),
}

/// Reads nonces for `queries`, degrading to one read per query if the
/// aggregated call fails.
pub async fn fetch_nonces<R>(reader: &R, queries: &[NonceQuery]) -> NonceFetch
where
    R: NonceReader + ?Sized,
{
    let mut stage = FetchStage::BatchAttempt;
    loop {
        stage = match stage {
            FetchStage::BatchAttempt => match reader.get_nonces(queries).await {
                Ok(outcomes) => FetchStage::Resolved(NonceFetch {
                    mode: FetchMode::Batched,
                    outcomes,
                }),
                Err(e) => {
                    warn!(
                        "[qc-18] Batched nonce read failed ({}), falling back to {} single reads",
                        e,
                        queries.len()
                    );
                    FetchStage::FallbackAttempt
                }
            },
            FetchStage::FallbackAttempt => {
                let outcomes = join_all(queries.iter().map(|query| reader.get_nonce(query))).await;
                debug!(
                    "[qc-18] Fallback reads finished: {}/{} succeeded",
                    outcomes.iter().filter(|o| o.is_ok()).count(),
                    outcomes.len()
                );
                FetchStage::Resolved(NonceFetch {
                    mode: FetchMode::PerEntry,
                    outcomes,
                })
            }
            FetchStage::Resolved(fetch) => return fetch,
        };
    }
}
