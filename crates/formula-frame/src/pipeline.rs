use crate::error::{FrameError, FrameResult};

/// A value threaded through a chain of fallible steps.
///
/// The first failing step replaces the value with its error; every later step is skipped and the
/// error is surfaced once by [`Pipeline::finish`]. A failed step never leaves a partially-updated
/// value behind because the value is dropped along with it.
///
/// ```
/// use formula_frame::{Container, Pipeline};
///
/// let result = Pipeline::new(Container::new(vec![3.0, 1.0, 2.0]))
///     .then(|c| c.subset(&[2, 0]))
///     .then(|c| c.subset(&[5]))
///     .then(|c| c.subset(&[0]))
///     .finish();
/// assert!(result.is_err());
/// ```
#[derive(Debug)]
pub struct Pipeline<T> {
    state: FrameResult<T>,
}

impl<T> Pipeline<T> {
    pub fn new(value: T) -> Self {
        Self { state: Ok(value) }
    }

    /// Apply an in-place step.
    pub fn then(self, step: impl FnOnce(&mut T) -> FrameResult<()>) -> Self {
        let state = self.state.and_then(|mut value| {
            step(&mut value)?;
            Ok(value)
        });
        Self { state }
    }

    /// Apply a step that produces a new value.
    pub fn map<U>(self, step: impl FnOnce(T) -> FrameResult<U>) -> Pipeline<U> {
        Pipeline {
            state: self.state.and_then(step),
        }
    }

    pub fn is_err(&self) -> bool {
        self.state.is_err()
    }

    pub fn error(&self) -> Option<&FrameError> {
        self.state.as_ref().err()
    }

    pub fn finish(self) -> FrameResult<T> {
        self.state
    }
}

impl<T> From<FrameResult<T>> for Pipeline<T> {
    fn from(state: FrameResult<T>) -> Self {
        Self { state }
    }
}
