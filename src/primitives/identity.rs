//! Change identity - the "did this binding change?" test.
//!
//! Values are unchanged when they are equal (scalars) or the same reference
//! (shared values). NaN is the one carve-out: NaN followed by NaN is no
//! change, otherwise every update pass would see a NaN binding as dirty.

use std::rc::Rc;
use std::sync::Arc;

use super::types::BindingValue;

/// Identity comparison used by change detection.
pub trait ChangeIdentity {
    fn same_identity(&self, other: &Self) -> bool;
}

/// True when the update engine should treat `b` as a new value replacing `a`.
#[inline]
pub fn is_different<T: ChangeIdentity + ?Sized>(a: &T, b: &T) -> bool {
    !a.same_identity(b)
}

macro_rules! exact_identity {
    ($($t:ty),* $(,)?) => {
        $(
            impl ChangeIdentity for $t {
                #[inline]
                fn same_identity(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

exact_identity!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, str, String,
);

impl ChangeIdentity for f64 {
    #[inline]
    fn same_identity(&self, other: &Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

impl ChangeIdentity for f32 {
    #[inline]
    fn same_identity(&self, other: &Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

impl<T: ?Sized> ChangeIdentity for Rc<T> {
    #[inline]
    fn same_identity(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(self), Rc::as_ptr(other))
    }
}

impl<T: ?Sized> ChangeIdentity for Arc<T> {
    #[inline]
    fn same_identity(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(self), Arc::as_ptr(other))
    }
}

impl<T: ChangeIdentity> ChangeIdentity for Option<T> {
    fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_identity(b),
            _ => false,
        }
    }
}

impl ChangeIdentity for BindingValue {
    fn same_identity(&self, other: &Self) -> bool {
        use BindingValue::*;

        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Number(a), Number(b)) => a.same_identity(b),
            (Str(a), Str(b)) => a == b,
            (Function(a), Function(b)) => a.ptr_eq(b),
            (Object(a), Object(b)) => a.same_identity(b),
            (List(a), List(b)) => a.same_identity(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::types::{BindingObject, NamedFn};

    #[derive(Debug)]
    struct Point;

    impl BindingObject for Point {}

    #[test]
    fn test_nan_is_not_different() {
        assert!(!is_different(&f64::NAN, &f64::NAN));
        assert!(!is_different(&f32::NAN, &f32::NAN));
        assert!(is_different(&f64::NAN, &1.0));
        assert!(is_different(&1.0, &f64::NAN));
    }

    #[test]
    fn test_scalars() {
        assert!(!is_different(&1, &1));
        assert!(is_different(&1, &2));
        assert!(!is_different("a", "a"));
        assert!(is_different(&Some(1), &None));
        assert!(!is_different(&0.0, &-0.0));
    }

    #[test]
    fn test_rc_reference_identity() {
        let a = Rc::new(5);
        let b = Rc::new(5);
        assert!(!is_different(&a, &a.clone()));
        assert!(is_different(&a, &b));
    }

    #[test]
    fn test_binding_values() {
        let nan = BindingValue::Number(f64::NAN);
        assert!(!is_different(&nan, &BindingValue::Number(f64::NAN)));
        assert!(is_different(&nan, &BindingValue::Number(1.0)));
        assert!(!is_different(&BindingValue::from(1), &BindingValue::from(1)));
        assert!(is_different(&BindingValue::from(1), &BindingValue::from(2)));
        assert!(!is_different(&BindingValue::from("x"), &BindingValue::from("x")));
        assert!(is_different(&BindingValue::Null, &BindingValue::from(false)));

        let list = BindingValue::list(vec![1.into()]);
        assert!(!is_different(&list, &list.clone()));
        assert!(is_different(&list, &BindingValue::list(vec![1.into()])));

        let f = NamedFn::new("f", |_| BindingValue::Null);
        assert!(!is_different(
            &BindingValue::Function(f.clone()),
            &BindingValue::Function(f)
        ));

        let obj: Rc<dyn BindingObject> = Rc::new(Point);
        assert!(!is_different(
            &BindingValue::Object(obj.clone()),
            &BindingValue::Object(obj)
        ));
        assert!(is_different(
            &BindingValue::Object(Rc::new(Point)),
            &BindingValue::Object(Rc::new(Point))
        ));
    }
}
