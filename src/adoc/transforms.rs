//! Composable stages
//!
//!     Parsing and resolution are written as stages implementing [`Runnable`]. A
//!     [`Transform`] wraps a stage (or a closure) and chains the next one with
//!     [`Transform::then`]; the compiler checks that each stage's output type is the next
//!     one's input type:
//!
//!         Transform::from_fn(Ok)          DraftDocument → DraftDocument
//!             .then(Seed)                 DraftDocument → Resolution
//!             .then(ExpandIncludes)       Resolution → Resolution
//!             .then(Finish)               Resolution → Resolved
//!
//!     The resolution pipeline is assembled this way in
//!     [assembling](crate::adoc::assembling); the text-to-draft entry point lives in
//!     [standard](standard).
//!
//!     Stages report recoverable problems as diagnostics on the value they pass along. A
//!     [`TransformError`] stops the chain and is only for stages that cannot produce any
//!     output.

pub mod standard;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("{0}")]
    Error(String),
    #[error("stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },
}

impl From<String> for TransformError {
    fn from(s: String) -> Self {
        TransformError::Error(s)
    }
}

impl From<&str> for TransformError {
    fn from(s: &str) -> Self {
        TransformError::Error(s.to_string())
    }
}

pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, TransformError>;
}

/// A chain of stages from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, TransformError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Append a stage.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let previous = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| stage.run(previous(input)?)),
        }
    }

    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, TransformError> {
        Transform::run(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountLines;
    impl Runnable<String, usize> for CountLines {
        fn run(&self, input: String) -> Result<usize, TransformError> {
            Ok(input.lines().count())
        }
    }

    struct RejectEmpty;
    impl Runnable<usize, usize> for RejectEmpty {
        fn run(&self, input: usize) -> Result<usize, TransformError> {
            if input == 0 {
                return Err(TransformError::StageFailed {
                    stage: "reject-empty".into(),
                    message: "no lines".into(),
                });
            }
            Ok(input)
        }
    }

    #[test]
    fn test_chained_stages_change_type() {
        let transform = Transform::from_fn(|s: String| Ok(s.trim().to_string()))
            .then(CountLines)
            .then(RejectEmpty);
        assert_eq!(transform.run("a\nb\n".into()), Ok(2));
    }

    #[test]
    fn test_failure_stops_the_chain() {
        let transform = Transform::from_fn(Ok).then(CountLines).then(RejectEmpty);
        let err = transform.run(String::new()).unwrap_err();
        assert_eq!(err.to_string(), "stage 'reject-empty' failed: no lines");
    }

    #[test]
    fn test_transform_is_a_stage() {
        let inner = Transform::from_fn(Ok).then(CountLines);
        let outer = Transform::from_fn(|s: String| Ok(format!("{}\nextra", s))).then(inner);
        assert_eq!(outer.run("one".into()), Ok(2));
    }

    #[test]
    fn test_error_conversion() {
        let err: TransformError = "plain".into();
        assert_eq!(err, TransformError::Error("plain".into()));
    }
}
