//! Listener return-value conversion.

use crate::error::BoxError;

/// Whether notification should continue to the next listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep notifying the remaining listeners.
    #[default]
    Continue,
    /// Stop notification; `notify` reports the halt to its caller.
    Halt,
}

/// Trait for converting a listener's return value into a [`Flow`].
///
/// # Default Implementations
///
/// - `()` → Continue
/// - `bool` → `true` = Continue, `false` = Halt
/// - `Flow` → As is
/// - `Option<T>` → `None` = Continue, otherwise delegates to `T`
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a listener",
    label = "missing `IntoFlow` implementation",
    note = "Listeners return `()`, `bool`, `Flow`, or a `Result` of those."
)]
pub trait IntoFlow {
    /// Convert the output into propagation behavior and optional error.
    fn into_flow(self) -> Result<Flow, BoxError>;
}

impl IntoFlow for () {
    fn into_flow(self) -> Result<Flow, BoxError> {
        Ok(Flow::Continue)
    }
}

impl IntoFlow for bool {
    fn into_flow(self) -> Result<Flow, BoxError> {
        Ok(if self { Flow::Continue } else { Flow::Halt })
    }
}

impl IntoFlow for Flow {
    fn into_flow(self) -> Result<Flow, BoxError> {
        Ok(self)
    }
}

impl<T: IntoFlow> IntoFlow for Option<T> {
    fn into_flow(self) -> Result<Flow, BoxError> {
        match self {
            Some(t) => t.into_flow(),
            None => Ok(Flow::Continue),
        }
    }
}

impl<T, E> IntoFlow for Result<T, E>
where
    T: IntoFlow,
    E: Into<BoxError>,
{
    fn into_flow(self) -> Result<Flow, BoxError> {
        match self {
            Ok(t) => t.into_flow(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_false_halts() {
        assert_eq!(false.into_flow().unwrap(), Flow::Halt);
        assert_eq!(true.into_flow().unwrap(), Flow::Continue);
        assert_eq!(().into_flow().unwrap(), Flow::Continue);
    }

    #[test]
    fn test_option_none_continues() {
        assert_eq!(None::<bool>.into_flow().unwrap(), Flow::Continue);
        assert_eq!(Some(false).into_flow().unwrap(), Flow::Halt);
    }

    #[test]
    fn test_result_error_propagates() {
        let failed: Result<bool, std::io::Error> = Err(std::io::Error::other("nope"));
        assert_eq!(failed.into_flow().unwrap_err().to_string(), "nope");

        let ok: Result<Flow, BoxError> = Ok(Flow::Halt);
        assert_eq!(ok.into_flow().unwrap(), Flow::Halt);
    }
}
