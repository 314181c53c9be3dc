//! Dependency lists for effect and memo hooks.
//!
//! A [`Deps`] is an ordered list of [`DepValue`]s compared shallowly,
//! element by element. An empty list means "run on every render".
//!
//! ```ignore
//! use spark_hooks::deps;
//!
//! ctx.use_effect(move || log_selection(selected), deps![selected, filter.as_str()]);
//! ctx.use_effect(|| tick(), deps![]); // every render
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// =============================================================================
// Dependency Value
// =============================================================================

/// A single dependency, tagged by kind.
///
/// Values of different kinds never compare equal. Types without a direct
/// conversion can be folded into [`DepValue::Hashed`] via
/// [`DepValue::hashed`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DepValue {
    Unit,
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// `f64` bit pattern, so NaN equals itself.
    Float(u64),
    Char(char),
    Str(String),
    Hashed(u64),
}

impl DepValue {
    /// Dependency on any hashable value.
    pub fn hashed<T: Hash + ?Sized>(value: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        DepValue::Hashed(hasher.finish())
    }
}

macro_rules! dep_from_int {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for DepValue {
                fn from(value: $t) -> Self {
                    DepValue::$variant(value as $target)
                }
            }
        )*
    };
}

dep_from_int!(Int, i64: i8, i16, i32, i64, isize);
dep_from_int!(UInt, u64: u8, u16, u32, u64, usize);

impl From<()> for DepValue {
    fn from(_: ()) -> Self {
        DepValue::Unit
    }
}

impl From<bool> for DepValue {
    fn from(value: bool) -> Self {
        DepValue::Bool(value)
    }
}

impl From<f32> for DepValue {
    fn from(value: f32) -> Self {
        DepValue::Float(f64::from(value).to_bits())
    }
}

impl From<f64> for DepValue {
    fn from(value: f64) -> Self {
        DepValue::Float(value.to_bits())
    }
}

impl From<char> for DepValue {
    fn from(value: char) -> Self {
        DepValue::Char(value)
    }
}

impl From<&str> for DepValue {
    fn from(value: &str) -> Self {
        DepValue::Str(value.to_string())
    }
}

impl From<String> for DepValue {
    fn from(value: String) -> Self {
        DepValue::Str(value)
    }
}

impl From<&String> for DepValue {
    fn from(value: &String) -> Self {
        DepValue::Str(value.clone())
    }
}

// =============================================================================
// Dependency List
// =============================================================================

/// Ordered dependency list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Deps(Vec<DepValue>);

impl Deps {
    pub fn new(values: Vec<DepValue>) -> Self {
        Self(values)
    }

    /// The empty list: the hook runs on every render.
    pub fn always() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[DepValue] {
        &self.0
    }

    /// Whether a hook guarded by `self` must run, given the list stored by
    /// its previous run (`None` if it never ran).
    pub fn changed_from(&self, previous: Option<&Deps>) -> bool {
        match previous {
            None => true,
            Some(_) if self.is_empty() => true,
            Some(previous) => {
                previous.len() != self.len()
                    || self.0.iter().zip(previous.0.iter()).any(|(a, b)| a != b)
            }
        }
    }
}

impl From<Vec<DepValue>> for Deps {
    fn from(values: Vec<DepValue>) -> Self {
        Self(values)
    }
}

/// Build a [`Deps`] list from values convertible into [`DepValue`].
///
/// `deps![]` is the empty list (run every render).
#[macro_export]
macro_rules! deps {
    () => {
        $crate::engine::Deps::always()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::engine::Deps::new(vec![$($crate::engine::DepValue::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_always_changes() {
        assert!(crate::deps![1, 2].changed_from(None));
    }

    #[test]
    fn test_equal_lists_do_not_change() {
        let previous = crate::deps![1, "a", true];
        assert!(!crate::deps![1, "a", true].changed_from(Some(&previous)));
    }

    #[test]
    fn test_any_element_change_is_detected() {
        let previous = crate::deps![1, "a"];
        assert!(crate::deps![2, "a"].changed_from(Some(&previous)));
        assert!(crate::deps![1, "b"].changed_from(Some(&previous)));
    }

    #[test]
    fn test_length_change_is_detected() {
        let previous = crate::deps![1];
        assert!(crate::deps![1, 1].changed_from(Some(&previous)));
    }

    #[test]
    fn test_empty_list_always_runs() {
        let previous = Deps::always();
        assert!(Deps::always().changed_from(Some(&previous)));
    }

    #[test]
    fn test_kinds_never_compare_equal() {
        assert_ne!(DepValue::from(1_i32), DepValue::from(1_u32));
        assert_eq!(DepValue::from(f64::NAN), DepValue::from(f64::NAN));
        assert_eq!(DepValue::hashed(&(1, "x")), DepValue::hashed(&(1, "x")));
    }
}
