//! Result-or-future sum type returned by traced callables.

use std::fmt;
use std::future::{Future, IntoFuture};

use futures_util::future::{self, BoxFuture, Either, FutureExt, Ready};

/// What a callable produced: a finished result, or one still in flight.
pub enum Outcome<T, E> {
    Ready(Result<T, E>),
    Deferred(BoxFuture<'static, Result<T, E>>),
}

impl<T, E> Outcome<T, E> {
    /// Box a future as a deferred outcome.
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Outcome::Deferred(fut.boxed())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Outcome::Deferred(_))
    }

    /// The result, if the callable finished synchronously.
    ///
    /// A deferred outcome is dropped without being polled.
    pub fn into_ready(self) -> Option<Result<T, E>> {
        match self {
            Outcome::Ready(result) => Some(result),
            Outcome::Deferred(_) => None,
        }
    }
}

impl<T, E> fmt::Debug for Outcome<T, E>
where
    T: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Outcome::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl<T, E> IntoFuture for Outcome<T, E> {
    type Output = Result<T, E>;
    type IntoFuture = Either<Ready<Result<T, E>>, BoxFuture<'static, Result<T, E>>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Outcome::Ready(result) => Either::Left(future::ready(result)),
            Outcome::Deferred(fut) => Either::Right(fut),
        }
    }
}

/// Values a traced callable may return.
pub trait IntoOutcome {
    type Ok;
    type Err;

    fn into_outcome(self) -> Outcome<Self::Ok, Self::Err>;
}

impl<T, E> IntoOutcome for Result<T, E> {
    type Ok = T;
    type Err = E;

    fn into_outcome(self) -> Outcome<T, E> {
        Outcome::Ready(self)
    }
}

impl<T, E> IntoOutcome for Outcome<T, E> {
    type Ok = T;
    type Err = E;

    fn into_outcome(self) -> Outcome<T, E> {
        self
    }
}

impl<T, E> IntoOutcome for BoxFuture<'static, Result<T, E>> {
    type Ok = T;
    type Err = E;

    fn into_outcome(self) -> Outcome<T, E> {
        Outcome::Deferred(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_both_variants_await() {
        let ready = Ok::<u8, ()>(1).into_outcome();
        assert!(!ready.is_deferred());
        assert_eq!(ready.await, Ok(1));

        let deferred = async { Ok::<u8, ()>(2) }.boxed().into_outcome();
        assert!(deferred.is_deferred());
        assert_eq!(deferred.await, Ok(2));
    }

    #[test]
    fn test_into_ready() {
        let ready: Outcome<u8, &str> = Outcome::Ready(Err("no"));
        assert_eq!(ready.into_ready(), Some(Err("no")));

        let deferred: Outcome<u8, &str> = Outcome::deferred(async { Ok(3) });
        assert!(deferred.into_ready().is_none());
    }
}
