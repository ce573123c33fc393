//! Filter driver and the type-erased result wrapper.
//!
//! [`Predicate::apply`] is the typed entry point: it takes a slice of any
//! [`Element`] type and returns the surviving elements in their original
//! order and type. [`Predicate::call`] returns a [`FilterResult`] that hides
//! the element type until the caller extracts it with
//! [`FilterResult::into_vec`].
//!
//! Both are fail-fast: the first element whose evaluation fails aborts the
//! call and no partial output is produced.

use std::any::{Any, type_name};

use thiserror::Error;

use crate::{
    element::Element,
    evaluator::{EvalContext, EvalError},
    parser::ParseError,
    predicate::{Predicate, compile},
};

/// Errors of a whole compile-and-filter round trip.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Evaluation error at element {index}: {source}")]
    Eval { index: usize, source: EvalError },

    #[error("Type assertion failed: filtered Vec<{actual}> cannot be read as Vec<{expected}>")]
    TypeAssertion {
        expected: &'static str,
        actual: &'static str,
    },
}

impl Predicate {
    /// Keeps the elements for which the predicate holds.
    ///
    /// Kept elements are cloned once into the output; for `Rc`/`Arc`/`&T`
    /// elements that clone shares the pointee.
    ///
    /// ```
    /// let predicate = lambda_filter::compile("(v) => v*2 == v+3").unwrap();
    ///
    /// assert_eq!(predicate.apply(&[1, 2, 3, 4, 5, 6, 7]), Ok(vec![3]));
    /// assert_eq!(predicate.apply(&[1.0, 2.0, 3.0, 4.0]), Ok(vec![3.0]));
    /// ```
    pub fn apply<T: Element + Clone>(&self, items: &[T]) -> Result<Vec<T>, EvalError> {
        self.apply_indexed(items).map_err(|(_, e)| e)
    }

    /// Like [`Predicate::apply`], but the element type is only recovered at extraction.
    pub fn call<T: Element + Clone + 'static>(&self, items: &[T]) -> FilterResult {
        let outcome = match self.apply_indexed(items) {
            Ok(kept) => Ok(Box::new(kept) as Box<dyn Any>),
            Err((index, source)) => Err(FilterError::Eval { index, source }),
        };
        FilterResult {
            outcome,
            element_type: type_name::<T>(),
        }
    }

    fn apply_indexed<T: Element + Clone>(&self, items: &[T]) -> Result<Vec<T>, (usize, EvalError)> {
        let evaluator = self.evaluator();
        let mut kept = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let context = EvalContext::bind(self.parameter(), item);

            match evaluator.test(self.body(), &context) {
                Ok(true) => {
                    log::trace!("element {} kept", index);
                    kept.push(item.clone());
                }
                Ok(false) => log::trace!("element {} dropped", index),
                Err(e) => {
                    log::debug!("predicate {} failed on element {}: {}", self, index, e);
                    return Err((index, e));
                }
            }
        }

        log::debug!("predicate {} kept {}/{} elements", self, kept.len(), items.len());
        Ok(kept)
    }
}

/// Outcome of [`Predicate::call`]: the filtered collection, or the error that
/// aborted it.
pub struct FilterResult {
    outcome: Result<Box<dyn Any>, FilterError>,
    element_type: &'static str,
}

impl FilterResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&FilterError> {
        self.outcome.as_ref().err()
    }

    /// Type name of the elements the call was made with
    pub fn element_type(&self) -> &'static str {
        self.element_type
    }

    /// Extracts the filtered collection as `Vec<T>`.
    ///
    /// Fails with the evaluation error when the call itself failed, and with
    /// [`FilterError::TypeAssertion`] when `T` is not the input element type.
    ///
    /// ```
    /// use lambda_filter::{compile, FilterError};
    ///
    /// let predicate = compile("(v) => v > 5").unwrap();
    /// assert_eq!(predicate.call(&[4, 6, 8]).into_vec::<i32>(), Ok(vec![6, 8]));
    ///
    /// let wrong = predicate.call(&[4, 6, 8]).into_vec::<i64>();
    /// assert!(matches!(wrong, Err(FilterError::TypeAssertion { .. })));
    /// ```
    pub fn into_vec<T: 'static>(self) -> Result<Vec<T>, FilterError> {
        let FilterResult {
            outcome,
            element_type,
        } = self;

        outcome?
            .downcast::<Vec<T>>()
            .map(|items| *items)
            .map_err(|_| FilterError::TypeAssertion {
                expected: type_name::<T>(),
                actual: element_type,
            })
    }
}

impl std::fmt::Debug for FilterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("FilterResult");
        debug.field("element_type", &self.element_type);
        match &self.outcome {
            Ok(_) => debug.field("outcome", &"Ok(..)"),
            Err(e) => debug.field("outcome", e),
        };
        debug.finish()
    }
}

/// Compiles `source` and applies it to `items` in one step.
///
/// ```
/// let evens = lambda_filter::filter("(v) => v&1 == 0", &[1, 2, 3, 4, 5, 6, 7]).unwrap();
/// assert_eq!(evens, vec![2, 4, 6]);
/// ```
pub fn filter<T: Element + Clone>(source: &str, items: &[T]) -> Result<Vec<T>, FilterError> {
    let predicate = compile(source)?;
    predicate
        .apply_indexed(items)
        .map_err(|(index, source)| FilterError::Eval { index, source })
}
