/// Feed ingestion.
///
/// - `feed` — per-stream HTTP feed client and the validated JSON parse step.
/// - `fixtures` (test only) — representative feed payloads.

pub mod feed;

#[cfg(test)]
pub(crate) mod fixtures;
