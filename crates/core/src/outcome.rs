//! Success/failure value returned by every request handler.

use crate::error::Error;

/// Tagged union of a successful value or a business [`Error`].
///
/// Construct through [`Outcome::success`] / [`Outcome::failure`] (or the
/// variants directly). Reading the value of a failure, or the error of a
/// success, is a programming bug and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Success(T),
    Failure(Error),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    pub fn failure(error: Error) -> Self {
        Self::Failure(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Borrow the success value.
    ///
    /// # Panics
    /// Panics when called on a failure.
    #[track_caller]
    pub fn value(&self) -> &T {
        match self {
            Self::Success(v) => v,
            Self::Failure(e) => panic!("invalid state: value of a failed outcome ({e})"),
        }
    }

    /// Borrow the failure error.
    ///
    /// # Panics
    /// Panics when called on a success.
    #[track_caller]
    pub fn error(&self) -> &Error {
        match self {
            Self::Failure(e) => e,
            Self::Success(_) => panic!("invalid state: error of a successful outcome"),
        }
    }

    /// Take the success value.
    ///
    /// # Panics
    /// Panics when called on a failure.
    #[track_caller]
    pub fn into_value(self) -> T {
        match self {
            Self::Success(v) => v,
            Self::Failure(e) => panic!("invalid state: value of a failed outcome ({e})"),
        }
    }

    pub fn into_result(self) -> Result<T, Error> {
        match self {
            Self::Success(v) => Ok(v),
            Self::Failure(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(v) => Outcome::Success(f(v)),
            Self::Failure(e) => Outcome::Failure(e),
        }
    }
}

impl<T> From<Result<T, Error>> for Outcome<T> {
    fn from(value: Result<T, Error>) -> Self {
        match value {
            Ok(v) => Self::Success(v),
            Err(e) => Self::Failure(e),
        }
    }
}

impl<T> From<Error> for Outcome<T> {
    fn from(value: Error) -> Self {
        Self::Failure(value)
    }
}
