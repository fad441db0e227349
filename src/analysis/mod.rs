/// Reading analysis for the stream monitoring pipeline.
///
/// Submodules:
/// - `selector` — reduces a raw feed series to its latest valid reading.

pub mod selector;
