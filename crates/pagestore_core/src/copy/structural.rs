//! Structural deep copy through explicit per-type implementations.
//!
//! # Invariants
//! - A copy shares no mutable sub-object with its source; `Rc`/`Arc` copies
//!   allocate fresh pointers.
//! - Nesting deeper than the context limit fails instead of overflowing the
//!   stack.
//! - Re-entering a shared pointer that is still being copied is a cycle and
//!   fails; the same pointer reached twice along different paths is copied
//!   twice (aliasing inside the source is not preserved).

use super::{CopyError, CopyResult};
use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

/// Depth limit used when no configuration is supplied.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Per-call bookkeeping for one deep copy traversal.
#[derive(Debug, Clone)]
pub struct CopyContext {
    depth: usize,
    max_depth: usize,
    active_shared: HashSet<usize>,
}

impl Default for CopyContext {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl CopyContext {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            active_shared: HashSet::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Runs `copy` one nesting level deeper.
    ///
    /// Composite implementations wrap their field copies in this call.
    pub fn enter<R>(
        &mut self,
        copy: impl FnOnce(&mut Self) -> CopyResult<R>,
    ) -> CopyResult<R> {
        if self.depth >= self.max_depth {
            return Err(CopyError::RecursionLimitExceeded {
                limit: self.max_depth,
            });
        }

        self.depth += 1;
        let result = copy(self);
        self.depth -= 1;
        result
    }

    fn enter_shared<R>(
        &mut self,
        address: usize,
        type_name: &'static str,
        copy: impl FnOnce(&mut Self) -> CopyResult<R>,
    ) -> CopyResult<R> {
        if !self.active_shared.insert(address) {
            return Err(CopyError::CycleDetected {
                type_name: type_name.to_string(),
            });
        }

        let result = self.enter(copy);
        self.active_shared.remove(&address);
        result
    }
}

/// Types that can produce an independent copy of themselves.
pub trait DeepCopy: Sized {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self>;

    /// Copies with a fresh context and the default depth limit.
    fn deep_copy(&self) -> CopyResult<Self> {
        self.deep_copy_in(&mut CopyContext::default())
    }
}

macro_rules! copy_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DeepCopy for $ty {
                fn deep_copy_in(&self, _ctx: &mut CopyContext) -> CopyResult<Self> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

copy_by_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        match self {
            Some(value) => Ok(Some(value.deep_copy_in(ctx)?)),
            None => Ok(None),
        }
    }
}

impl<T: DeepCopy> DeepCopy for Box<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| Ok(Box::new((**self).deep_copy_in(ctx)?)))
    }
}

impl<T: DeepCopy> DeepCopy for Vec<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| self.iter().map(|item| item.deep_copy_in(ctx)).collect())
    }
}

impl<T: DeepCopy> DeepCopy for VecDeque<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| self.iter().map(|item| item.deep_copy_in(ctx)).collect())
    }
}

impl<K: DeepCopy + Ord, V: DeepCopy> DeepCopy for BTreeMap<K, V> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| {
            self.iter()
                .map(|(key, value)| -> CopyResult<(K, V)> {
                    Ok((key.deep_copy_in(ctx)?, value.deep_copy_in(ctx)?))
                })
                .collect()
        })
    }
}

impl<K: DeepCopy + Eq + Hash, V: DeepCopy> DeepCopy for HashMap<K, V> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| {
            self.iter()
                .map(|(key, value)| -> CopyResult<(K, V)> {
                    Ok((key.deep_copy_in(ctx)?, value.deep_copy_in(ctx)?))
                })
                .collect()
        })
    }
}

impl<T: DeepCopy + Ord> DeepCopy for BTreeSet<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| self.iter().map(|item| item.deep_copy_in(ctx)).collect())
    }
}

impl<T: DeepCopy + Eq + Hash> DeepCopy for HashSet<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        ctx.enter(|ctx| self.iter().map(|item| item.deep_copy_in(ctx)).collect())
    }
}

impl<A: DeepCopy, B: DeepCopy> DeepCopy for (A, B) {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        Ok((self.0.deep_copy_in(ctx)?, self.1.deep_copy_in(ctx)?))
    }
}

impl<A: DeepCopy, B: DeepCopy, C: DeepCopy> DeepCopy for (A, B, C) {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        Ok((
            self.0.deep_copy_in(ctx)?,
            self.1.deep_copy_in(ctx)?,
            self.2.deep_copy_in(ctx)?,
        ))
    }
}

impl<T: DeepCopy> DeepCopy for Rc<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        let address = Rc::as_ptr(self) as *const () as usize;
        ctx.enter_shared(address, type_name::<T>(), |ctx| {
            Ok(Rc::new((**self).deep_copy_in(ctx)?))
        })
    }
}

impl<T: DeepCopy> DeepCopy for Arc<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        let address = Arc::as_ptr(self) as *const () as usize;
        ctx.enter_shared(address, type_name::<T>(), |ctx| {
            Ok(Arc::new((**self).deep_copy_in(ctx)?))
        })
    }
}

impl<T: DeepCopy> DeepCopy for RefCell<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        let value = self.try_borrow().map_err(|_| CopyError::BorrowConflict {
            type_name: type_name::<T>().to_string(),
        })?;
        Ok(RefCell::new(value.deep_copy_in(ctx)?))
    }
}

impl<T: DeepCopy + Copy> DeepCopy for Cell<T> {
    fn deep_copy_in(&self, ctx: &mut CopyContext) -> CopyResult<Self> {
        Ok(Cell::new(self.get().deep_copy_in(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::{CopyContext, DeepCopy};
    use crate::copy::CopyError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn depth_is_restored_after_copy() {
        let mut ctx = CopyContext::with_max_depth(8);
        let nested = vec![vec![1_u8, 2], vec![3]];
        let copy = nested.deep_copy_in(&mut ctx).unwrap();
        assert_eq!(copy, nested);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn depth_limit_counts_composite_levels_only() {
        let nested = vec![vec![1_u8]];
        let mut exact = CopyContext::with_max_depth(2);
        assert!(nested.deep_copy_in(&mut exact).is_ok());

        let mut short = CopyContext::with_max_depth(1);
        assert_eq!(
            nested.deep_copy_in(&mut short).unwrap_err(),
            CopyError::RecursionLimitExceeded { limit: 1 }
        );
        assert_eq!(short.depth(), 0);
    }

    #[test]
    fn mutably_borrowed_cell_is_a_borrow_conflict() {
        let cell = RefCell::new(5_u32);
        let _guard = cell.borrow_mut();
        assert!(matches!(
            cell.deep_copy(),
            Err(CopyError::BorrowConflict { .. })
        ));
    }

    #[test]
    fn shared_pointer_reached_twice_is_not_a_cycle() {
        let shared = Rc::new(String::from("shared"));
        let pair = (Rc::clone(&shared), Rc::clone(&shared));
        let copy = pair.deep_copy().unwrap();
        assert_eq!(*copy.0, "shared");
        assert!(!Rc::ptr_eq(&copy.0, &shared));
        assert!(!Rc::ptr_eq(&copy.0, &copy.1));
    }
}
