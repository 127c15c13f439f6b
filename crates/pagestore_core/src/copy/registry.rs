//! Copy functions looked up by runtime type identity.

use super::json::clone_json;
use super::structural::{CopyContext, DeepCopy};
use super::{CopyError, CopyResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

type ErasedCopyFn =
    Box<dyn Fn(&dyn Any, &mut CopyContext) -> CopyResult<Box<dyn Any>> + Send + Sync>;

struct RegisteredCopier {
    type_name: &'static str,
    copy: ErasedCopyFn,
}

/// Table of copy functions keyed by [`TypeId`].
///
/// Types without an entry are rejected with `UnsupportedType` rather than
/// copied by some fallback.
#[derive(Default)]
pub struct CopierRegistry {
    copiers: HashMap<TypeId, RegisteredCopier>,
}

impl Debug for CopierRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopierRegistry")
            .field("types", &self.registered_type_names())
            .finish()
    }
}

impl CopierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the structural [`DeepCopy`] implementation of `T`.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: DeepCopy + 'static,
    {
        self.register_fn::<T, _>(|value, ctx| value.deep_copy_in(ctx))
    }

    /// Registers the JSON round trip for `T`.
    pub fn register_json<T>(&mut self) -> &mut Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.register_fn::<T, _>(|value, _ctx| clone_json(value))
    }

    /// Registers a custom copy function, replacing any previous entry for `T`.
    pub fn register_fn<T, F>(&mut self, copy: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&T, &mut CopyContext) -> CopyResult<T> + Send + Sync + 'static,
    {
        let name = type_name::<T>();
        let erased: ErasedCopyFn = Box::new(
            move |value: &dyn Any, ctx: &mut CopyContext| -> CopyResult<Box<dyn Any>> {
                let typed = value
                    .downcast_ref::<T>()
                    .ok_or_else(|| unsupported(name.to_string()))?;
                Ok(Box::new(copy(typed, ctx)?) as Box<dyn Any>)
            },
        );

        self.copiers.insert(
            TypeId::of::<T>(),
            RegisteredCopier {
                type_name: name,
                copy: erased,
            },
        );
        self
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.copiers.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.copiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copiers.is_empty()
    }

    /// Returns registered type names, sorted.
    pub fn registered_type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.copiers.values().map(|entry| entry.type_name).collect();
        names.sort_unstable();
        names
    }

    /// Copies `value` with the function registered for `T`.
    ///
    /// # Errors
    /// - `UnsupportedType` when `T` has no registered copier.
    /// - Whatever the registered copier reports.
    pub fn copy<T: 'static>(&self, value: &T, ctx: &mut CopyContext) -> CopyResult<T> {
        let entry = self
            .copiers
            .get(&TypeId::of::<T>())
            .ok_or_else(|| unsupported(type_name::<T>().to_string()))?;

        let copied = (entry.copy)(value, ctx)?;
        copied
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| unsupported(type_name::<T>().to_string()))
    }

    /// Type-erased [`CopierRegistry::copy`]; the result has the runtime type
    /// of `value`.
    ///
    /// # Errors
    /// - `UnsupportedType` when the runtime type has no registered copier.
    ///   `dyn Any` does not expose type names, so the error names the
    ///   `TypeId` instead of the Rust type.
    pub fn copy_any(&self, value: &dyn Any, ctx: &mut CopyContext) -> CopyResult<Box<dyn Any>> {
        let type_id = Any::type_id(value);
        let entry = self
            .copiers
            .get(&type_id)
            .ok_or_else(|| unsupported(format!("<unregistered {type_id:?}>")))?;
        (entry.copy)(value, ctx)
    }
}

fn unsupported(type_name: String) -> CopyError {
    CopyError::UnsupportedType { type_name }
}

#[cfg(test)]
mod tests {
    use super::CopierRegistry;
    use crate::copy::structural::CopyContext;
    use crate::copy::CopyError;
    use std::any::Any;

    #[derive(Debug, PartialEq)]
    struct Opaque(u32);

    #[test]
    fn unregistered_type_is_unsupported() {
        let registry = CopierRegistry::new();
        let err = registry
            .copy(&Opaque(1), &mut CopyContext::default())
            .unwrap_err();
        match err {
            CopyError::UnsupportedType { type_name } => assert!(type_name.ends_with("Opaque")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_copier_is_used_for_its_type() {
        let mut registry = CopierRegistry::new();
        registry.register_fn::<Opaque, _>(|value, _ctx| Ok(Opaque(value.0 + 1)));

        let copied = registry
            .copy(&Opaque(1), &mut CopyContext::default())
            .unwrap();
        assert_eq!(copied, Opaque(2));
    }

    #[test]
    fn copy_any_keeps_runtime_type() {
        let mut registry = CopierRegistry::new();
        registry.register::<String>().register::<u64>();

        let value: Box<dyn Any> = Box::new(String::from("erased"));
        let copied = registry
            .copy_any(value.as_ref(), &mut CopyContext::default())
            .unwrap();
        assert_eq!(copied.downcast_ref::<String>().unwrap(), "erased");

        let missing: Box<dyn Any> = Box::new(7_i8);
        match registry.copy_any(missing.as_ref(), &mut CopyContext::default()) {
            Err(CopyError::UnsupportedType { type_name }) => {
                assert!(type_name.starts_with("<unregistered TypeId"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("unregistered type was copied"),
        }
    }
}
