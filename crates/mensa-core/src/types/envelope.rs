use crate::error::CrowdError;

/// Uniform result envelope exposed to the presentation layer.
///
/// Every repository operation resolves to one of these three shapes;
/// observation streams additionally yield `Loading` before the first
/// snapshot arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Envelope::Loading)
    }

    /// Unwrap the success value, panicking otherwise. Test helper.
    pub fn into_success(self) -> T {
        match self {
            Envelope::Success(value) => value,
            Envelope::Loading => panic!("envelope is Loading, not Success"),
            Envelope::Error(msg) => panic!("envelope is Error({msg}), not Success"),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Loading => Envelope::Loading,
            Envelope::Success(value) => Envelope::Success(f(value)),
            Envelope::Error(msg) => Envelope::Error(msg),
        }
    }
}

impl<T> From<Result<T, CrowdError>> for Envelope<T> {
    fn from(result: Result<T, CrowdError>) -> Self {
        match result {
            Ok(value) => Envelope::Success(value),
            Err(err) => Envelope::Error(err.to_string()),
        }
    }
}
