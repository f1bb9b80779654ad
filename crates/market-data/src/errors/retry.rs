/// Classification for the fallback policy.
///
/// Used by the aggregator to decide whether a failure from one provider
/// should move the request on to the next provider in the chain.
///
/// # Behavior Summary
///
/// | Class | Try Next Provider? |
/// |-------|-------------------|
/// | `Never` | No |
/// | `NextProvider` | Yes, unless the aggregator runs `FailFast` |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// The request itself is invalid (unresolved symbol, bad input).
    /// No provider can do better, so the chain stops here.
    Never,

    /// This provider failed (transport, status, payload, unknown symbol)
    /// but another provider might succeed.
    NextProvider,
}
