/// Transformation a worker node applies to one subtask payload.
///
/// Implementations must be pure and total: same input, same output, no
/// shared state touched, and no failure for any string that reached them.
pub trait SubtaskProcessor: Send + Sync {
    fn process(&self, payload: &str) -> String;
}

/// Default transform: Unicode uppercase.
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseProcessor;

impl SubtaskProcessor for UppercaseProcessor {
    fn process(&self, payload: &str) -> String {
        payload.to_uppercase()
    }
}

impl<F> SubtaskProcessor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn process(&self, payload: &str) -> String {
        self(payload)
    }
}
