//! Live instances

use std::ffi::c_void;
use std::ptr::NonNull;

use nativescript_sdk::{FieldType, Scalar, ScalarValue};

use crate::error::{BridgeError, BridgeResult};

use super::interface::{ResolvedField, ScriptInterface};

/// An instance created by a module. Destroyed through the module's
/// destruction function when dropped.
pub struct ScriptInstance<'a> {
    interface: &'a ScriptInterface,
    ptr: NonNull<c_void>,
}

impl<'a> ScriptInstance<'a> {
    pub(crate) fn new(interface: &'a ScriptInterface, ptr: NonNull<c_void>) -> Self {
        Self { interface, ptr }
    }

    /// Interface this instance was created through
    pub fn interface(&self) -> &'a ScriptInterface {
        self.interface
    }

    /// Raw instance pointer, valid until this value is dropped
    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr.as_ptr()
    }

    /// Read a field by index.
    pub fn get(&self, index: usize) -> BridgeResult<ScalarValue> {
        let field = self.interface.field(index)?;
        Ok(unsafe { field.accessor().get(self.ptr) })
    }

    /// Write a field by index. The value must be of the field's declared kind.
    pub fn set(&mut self, index: usize, value: ScalarValue) -> BridgeResult<()> {
        let field = self.interface.field(index)?;
        unsafe { field.accessor().set(self.ptr, value) }.map_err(|found| self.mismatch(field, found))
    }

    /// Read a field as a Rust scalar of the matching kind.
    pub fn get_as<T: Scalar>(&self, index: usize) -> BridgeResult<T> {
        let field = self.interface.field(index)?;
        if field.field_type() != T::FIELD_TYPE {
            return Err(self.mismatch(field, T::FIELD_TYPE));
        }
        let value = unsafe { field.accessor().get(self.ptr) };
        T::from_value(value).ok_or_else(|| self.mismatch(field, T::FIELD_TYPE))
    }

    /// Write a field from a Rust scalar of the matching kind.
    pub fn set_as<T: Scalar>(&mut self, index: usize, value: T) -> BridgeResult<()> {
        self.set(index, value.into_value())
    }

    /// Read a field by name.
    pub fn get_by_name(&self, name: &str) -> BridgeResult<ScalarValue> {
        self.get(self.interface.field_index(name)?)
    }

    /// Write a field by name.
    pub fn set_by_name(&mut self, name: &str, value: ScalarValue) -> BridgeResult<()> {
        let index = self.interface.field_index(name)?;
        self.set(index, value)
    }

    /// Destroy the instance now.
    pub fn destroy(self) {
        drop(self)
    }

    fn mismatch(&self, field: &ResolvedField, found: FieldType) -> BridgeError {
        BridgeError::TypeMismatch {
            type_name: self.interface.name().to_string(),
            field: field.name().to_string(),
            expected: field.field_type(),
            found,
        }
    }
}

impl Drop for ScriptInstance<'_> {
    fn drop(&mut self) {
        log::trace!("destroying {} instance {:p}", self.interface.name(), self.ptr);
        unsafe { (self.interface.destroy_fn())(self.ptr.as_ptr()) }
    }
}

impl std::fmt::Debug for ScriptInstance<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptInstance")
            .field("type", &self.interface.name())
            .field("ptr", &self.ptr)
            .finish()
    }
}
