//! Element adapters: how host types present themselves to a predicate.
//!
//! A collection element implements [`Element`] to say what the lambda
//! parameter evaluates to. Scalars bind to their own value; structured types
//! implement [`Record`] and bind to a [`Value::Record`] handle so their fields
//! can be read by name.
//!
//! ```
//! use lambda_filter::{Element, Record, Value};
//!
//! #[derive(Clone)]
//! struct Student {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl Record for Student {
//!     fn field(&self, name: &str) -> Option<Value<'_>> {
//!         match name {
//!             "Name" => Some(Value::from(self.name.as_str())),
//!             "Age" => Some(Value::Integer(self.age)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Element for Student {
//!     fn bind(&self) -> Value<'_> {
//!         Value::Record(self)
//!     }
//! }
//!
//! let students = vec![
//!     Student { name: "bob".into(), age: 22 },
//!     Student { name: "tom".into(), age: 25 },
//! ];
//! let adults = lambda_filter::filter("(s) => s.Age > 23", &students).unwrap();
//! assert_eq!(adults.len(), 1);
//! assert_eq!(adults[0].name, "tom");
//! ```
//!
//! Smart pointers and references bind to whatever their pointee binds to, so a
//! `Vec<Arc<Student>>` filters without touching the pointees and the output
//! holds the very same `Arc`s. The same holds for `&T` and `Rc<T>`. A kept
//! `Box<T>` is cloned like any owned value: the output holds an equal copy,
//! not the original allocation.

use std::{borrow::Cow, rc::Rc, sync::Arc};

use crate::value::Value;

/// Structured value whose fields can be looked up by name.
pub trait Record {
    /// Returns the named field, or `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<Value<'_>>;
}

/// Anything that can be bound to the lambda parameter.
pub trait Element {
    fn bind(&self) -> Value<'_>;
}

macro_rules! integer_element {
    ($($ty:ty),*) => {
        $(
            impl Element for $ty {
                fn bind(&self) -> Value<'_> {
                    Value::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_element!(i8, i16, i32, i64, u8, u16, u32);

/// Wide integers that do not fit in `i64` bind as floats, as large JSON numbers do.
macro_rules! wide_integer_element {
    ($($ty:ty),*) => {
        $(
            impl Element for $ty {
                fn bind(&self) -> Value<'_> {
                    match i64::try_from(*self) {
                        Ok(n) => Value::Integer(n),
                        Err(_) => Value::Float(*self as f64),
                    }
                }
            }
        )*
    };
}

wide_integer_element!(isize, usize, u64);

impl Element for f64 {
    fn bind(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl Element for f32 {
    fn bind(&self) -> Value<'_> {
        Value::Float(f64::from(*self))
    }
}

impl Element for bool {
    fn bind(&self) -> Value<'_> {
        Value::Boolean(*self)
    }
}

impl Element for str {
    fn bind(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self))
    }
}

impl Element for String {
    fn bind(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self.as_str()))
    }
}

impl Element for Cow<'_, str> {
    fn bind(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(&**self))
    }
}

impl<T: Element + ?Sized> Element for &T {
    fn bind(&self) -> Value<'_> {
        (**self).bind()
    }
}

/// Binds as the boxed value; kept boxes are deep copies.
impl<T: Element + ?Sized> Element for Box<T> {
    fn bind(&self) -> Value<'_> {
        (**self).bind()
    }
}

impl<T: Element + ?Sized> Element for Rc<T> {
    fn bind(&self) -> Value<'_> {
        (**self).bind()
    }
}

impl<T: Element + ?Sized> Element for Arc<T> {
    fn bind(&self) -> Value<'_> {
        (**self).bind()
    }
}
