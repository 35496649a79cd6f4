//! Symbolic field accessors.

use std::fmt;
use std::marker::PhantomData;

/// Shape of a symbolic accessor expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `value.name`
    Field(&'static str),
    /// `value.name as Target`
    Cast {
        operand: Box<Expr>,
        target: &'static str,
    },
    /// `value.a.b.c`
    Path(Vec<&'static str>),
    /// `value.method()`
    Call { method: &'static str },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "x.{name}"),
            Self::Cast { operand, target } => write!(f, "({operand} as {target})"),
            Self::Path(segments) => write!(f, "x.{}", segments.join(".")),
            Self::Call { method } => write!(f, "x.{method}()"),
        }
    }
}

/// A symbolic reference to a field of `T`.
///
/// Build one with the [`field!`](crate::field) macro, which checks at compile
/// time that the accessed field exists on `T`.
pub struct Accessor<T> {
    expr: Expr,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Accessor<T> {
    pub fn from_expr(expr: Expr) -> Self {
        Self {
            expr,
            _marker: PhantomData,
        }
    }

    pub fn field(name: &'static str) -> Self {
        Self::from_expr(Expr::Field(name))
    }

    pub fn cast(name: &'static str, target: &'static str) -> Self {
        Self::from_expr(Expr::Cast {
            operand: Box::new(Expr::Field(name)),
            target,
        })
    }

    pub fn path(segments: Vec<&'static str>) -> Self {
        Self::from_expr(Expr::Path(segments))
    }

    pub fn call(method: &'static str) -> Self {
        Self::from_expr(Expr::Call { method })
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self::from_expr(self.expr.clone())
    }
}

impl<T> PartialEq for Accessor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Accessor").field(&self.expr).finish()
    }
}

impl<T> fmt::Display for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}

/// Build a symbolic [`Accessor`] to a field of a type.
///
/// ```ignore
/// let name = field!(UserProfile => name);
/// let age = field!(UserProfile => age as i64);
/// ```
///
/// Chains (`field!(T => a.b)`) and method calls (`field!(T => m())`) also
/// compile, but the resolver rejects them.
#[macro_export]
macro_rules! field {
    ($ty:ty => $field:ident as $target:ty) => {{
        let _ = |value: &$ty| {
            let _ = &value.$field;
        };
        $crate::resolver::Accessor::<$ty>::cast(stringify!($field), stringify!($target))
    }};
    ($ty:ty => $method:ident ()) => {{
        let _ = |value: &$ty| {
            let _ = value.$method();
        };
        $crate::resolver::Accessor::<$ty>::call(stringify!($method))
    }};
    ($ty:ty => $first:ident $(. $rest:ident)+) => {{
        let _ = |value: &$ty| {
            let _ = &value.$first $(.$rest)+;
        };
        $crate::resolver::Accessor::<$ty>::path(vec![stringify!($first) $(, stringify!($rest))+])
    }};
    ($ty:ty => $field:ident) => {{
        let _ = |value: &$ty| {
            let _ = &value.$field;
        };
        $crate::resolver::Accessor::<$ty>::field(stringify!($field))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    struct Sample {
        name: String,
        age: i32,
        inner: Inner,
    }

    #[allow(dead_code)]
    struct Inner {
        value: u8,
    }

    impl Sample {
        fn label(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_field_macro_shapes() {
        assert_eq!(field!(Sample => name).expr(), &Expr::Field("name"));
        assert_eq!(
            field!(Sample => age as i64).expr(),
            &Expr::Cast {
                operand: Box::new(Expr::Field("age")),
                target: "i64"
            }
        );
        assert_eq!(
            field!(Sample => inner.value).expr(),
            &Expr::Path(vec!["inner", "value"])
        );
        assert_eq!(field!(Sample => label()).expr(), &Expr::Call { method: "label" });
    }

    #[test]
    fn test_display() {
        assert_eq!(field!(Sample => name).to_string(), "x.name");
        assert_eq!(field!(Sample => age as i64).to_string(), "(x.age as i64)");
        assert_eq!(field!(Sample => inner.value).to_string(), "x.inner.value");
        assert_eq!(field!(Sample => label()).to_string(), "x.label()");
    }
}
