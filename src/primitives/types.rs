//! Binding values - the dynamic values templates bind to.
//!
//! Contexts and bindings carry these; the primitives in this module compare,
//! flatten and format them.

use std::fmt;
use std::rc::Rc;

// =============================================================================
// Callable & Object
// =============================================================================

/// Function body stored in a [`NamedFn`].
pub type BindingFn = Rc<dyn Fn(&[BindingValue]) -> BindingValue>;

/// A callable value with a diagnostic name.
#[derive(Clone)]
pub struct NamedFn {
    name: Rc<str>,
    func: BindingFn,
}

impl NamedFn {
    pub fn new(name: impl Into<Rc<str>>, func: impl Fn(&[BindingValue]) -> BindingValue + 'static) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[BindingValue]) -> BindingValue {
        (self.func)(args)
    }

    /// Same function body (reference identity).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.func), Rc::as_ptr(&other.func))
    }
}

impl fmt::Debug for NamedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamedFn({})", self.name)
    }
}

/// Object values held by a binding.
pub trait BindingObject: fmt::Debug {
    /// Name of the object's type, when it exposes one.
    fn type_name(&self) -> Option<&str> {
        None
    }
}

// =============================================================================
// Binding Value
// =============================================================================

/// Dynamic value flowing through bindings and template contexts.
///
/// Scalars compare by value. Functions, objects and lists compare by
/// reference, so two separately built lists with equal items are different.
#[derive(Clone, Debug, Default)]
pub enum BindingValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Function(NamedFn),
    Object(Rc<dyn BindingObject>),
    List(Rc<[BindingValue]>),
}

impl BindingValue {
    pub fn list(items: impl Into<Vec<BindingValue>>) -> Self {
        BindingValue::List(Rc::from(items.into()))
    }

    pub fn str(value: &str) -> Self {
        BindingValue::Str(Rc::from(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, BindingValue::Null)
    }
}

impl From<f64> for BindingValue {
    fn from(value: f64) -> Self {
        BindingValue::Number(value)
    }
}

impl From<i32> for BindingValue {
    fn from(value: i32) -> Self {
        BindingValue::Number(f64::from(value))
    }
}

impl From<bool> for BindingValue {
    fn from(value: bool) -> Self {
        BindingValue::Bool(value)
    }
}

impl From<&str> for BindingValue {
    fn from(value: &str) -> Self {
        BindingValue::str(value)
    }
}

impl From<Vec<BindingValue>> for BindingValue {
    fn from(items: Vec<BindingValue>) -> Self {
        BindingValue::list(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_fn_call() {
        let double = NamedFn::new("double", |args| match args.first() {
            Some(BindingValue::Number(n)) => BindingValue::Number(n * 2.0),
            _ => BindingValue::Null,
        });
        assert_eq!(double.name(), "double");
        assert!(matches!(double.call(&[2.into()]), BindingValue::Number(n) if n == 4.0));
        assert!(double.call(&[]).is_null());
    }

    #[test]
    fn test_named_fn_identity() {
        let a = NamedFn::new("a", |_| BindingValue::Null);
        let b = NamedFn::new("a", |_| BindingValue::Null);
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_conversions() {
        assert!(matches!(BindingValue::from(true), BindingValue::Bool(true)));
        assert!(matches!(BindingValue::from("x"), BindingValue::Str(ref s) if &**s == "x"));
        let list = BindingValue::from(vec![1.into(), 2.into()]);
        assert!(matches!(list, BindingValue::List(ref items) if items.len() == 2));
    }
}
