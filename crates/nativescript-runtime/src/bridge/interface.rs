//! Typed views of one annotated type

use std::ffi::{c_char, c_int, c_void};
use std::ptr::NonNull;

use nativescript_sdk::abi::{CreateFn, DestroyFn, GetterFn, SetterFn};
use nativescript_sdk::value::wchar_t;
use nativescript_sdk::{FieldInfo, FieldType, ScalarValue, TypeInfo};

use crate::error::{BridgeError, BridgeResult};
use crate::ffi::{cast_fn, SymbolSource};

use super::instance::ScriptInstance;

// ============================================================================
// Accessor
// ============================================================================

/// A field's getter and setter, typed by the field's declared scalar kind.
#[derive(Debug, Clone, Copy)]
pub enum Accessor {
    /// `int`
    Int {
        /// Getter
        get: GetterFn<c_int>,
        /// Setter
        set: SetterFn<c_int>,
    },
    /// `char`
    Char {
        /// Getter
        get: GetterFn<c_char>,
        /// Setter
        set: SetterFn<c_char>,
    },
    /// `bool`
    Bool {
        /// Getter
        get: GetterFn<bool>,
        /// Setter
        set: SetterFn<bool>,
    },
    /// `float`
    Float {
        /// Getter
        get: GetterFn<f32>,
        /// Setter
        set: SetterFn<f32>,
    },
    /// `double`
    Double {
        /// Getter
        get: GetterFn<f64>,
        /// Setter
        set: SetterFn<f64>,
    },
    /// `wchar_t`
    WChar {
        /// Getter
        get: GetterFn<wchar_t>,
        /// Setter
        set: SetterFn<wchar_t>,
    },
}

impl Accessor {
    /// Type the two addresses by `ty`. Returns `None` for types that have no
    /// accessors.
    ///
    /// # Safety
    ///
    /// `getter` and `setter` must be functions with the getter and setter
    /// signatures of `ty`.
    pub unsafe fn from_addresses(ty: FieldType, getter: NonNull<c_void>, setter: NonNull<c_void>) -> Option<Self> {
        macro_rules! typed {
            ($variant:ident) => {
                Some(Accessor::$variant {
                    get: cast_fn(getter),
                    set: cast_fn(setter),
                })
            };
        }

        match ty {
            FieldType::Int => typed!(Int),
            FieldType::Char => typed!(Char),
            FieldType::Bool => typed!(Bool),
            FieldType::Float => typed!(Float),
            FieldType::Double => typed!(Double),
            FieldType::WChar => typed!(WChar),
            FieldType::Unknown | FieldType::Void => None,
        }
    }

    /// Scalar kind this accessor reads and writes
    pub fn field_type(&self) -> FieldType {
        match self {
            Accessor::Int { .. } => FieldType::Int,
            Accessor::Char { .. } => FieldType::Char,
            Accessor::Bool { .. } => FieldType::Bool,
            Accessor::Float { .. } => FieldType::Float,
            Accessor::Double { .. } => FieldType::Double,
            Accessor::WChar { .. } => FieldType::WChar,
        }
    }

    /// Read the field.
    ///
    /// # Safety
    ///
    /// `instance` must be a live instance of the type this accessor belongs to.
    pub unsafe fn get(&self, instance: NonNull<c_void>) -> ScalarValue {
        let ptr = instance.as_ptr();
        match *self {
            Accessor::Int { get, .. } => ScalarValue::Int(get(ptr)),
            Accessor::Char { get, .. } => ScalarValue::Char(get(ptr)),
            Accessor::Bool { get, .. } => ScalarValue::Bool(get(ptr)),
            Accessor::Float { get, .. } => ScalarValue::Float(get(ptr)),
            Accessor::Double { get, .. } => ScalarValue::Double(get(ptr)),
            Accessor::WChar { get, .. } => ScalarValue::WChar(get(ptr)),
        }
    }

    /// Write the field. A value of another kind is not written and its kind
    /// is returned as the error.
    ///
    /// # Safety
    ///
    /// `instance` must be a live instance of the type this accessor belongs to.
    pub unsafe fn set(&self, instance: NonNull<c_void>, value: ScalarValue) -> Result<(), FieldType> {
        let ptr = instance.as_ptr();
        match (*self, value) {
            (Accessor::Int { set, .. }, ScalarValue::Int(v)) => set(ptr, v),
            (Accessor::Char { set, .. }, ScalarValue::Char(v)) => set(ptr, v),
            (Accessor::Bool { set, .. }, ScalarValue::Bool(v)) => set(ptr, v),
            (Accessor::Float { set, .. }, ScalarValue::Float(v)) => set(ptr, v),
            (Accessor::Double { set, .. }, ScalarValue::Double(v)) => set(ptr, v),
            (Accessor::WChar { set, .. }, ScalarValue::WChar(v)) => set(ptr, v),
            (_, other) => return Err(other.field_type()),
        }
        Ok(())
    }
}

// ============================================================================
// ResolvedField
// ============================================================================

/// A field record together with its resolved accessors.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    info: FieldInfo,
    accessor: Accessor,
}

impl ResolvedField {
    /// Field record from the registration table
    pub fn info(&self) -> &FieldInfo {
        &self.info
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Declared scalar type
    pub fn field_type(&self) -> FieldType {
        self.info.ty
    }

    /// Typed getter and setter
    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }
}

// ============================================================================
// ScriptInterface
// ============================================================================

/// The resolved interface of one type: how to create and destroy instances
/// and how to read and write each field.
///
/// Only reachable as a borrow of the [`ScriptCollection`] that owns the
/// module, so it cannot outlive the code it points into.
///
/// [`ScriptCollection`]: super::ScriptCollection
#[derive(Debug)]
pub struct ScriptInterface {
    info: TypeInfo,
    create: CreateFn,
    destroy: DestroyFn,
    fields: Vec<ResolvedField>,
}

impl ScriptInterface {
    /// Resolve every symbol `info` names.
    pub(crate) fn resolve<S: SymbolSource + ?Sized>(module: &S, info: TypeInfo) -> BridgeResult<Self> {
        let lookup = |symbol: &str| {
            module.address(symbol).ok_or_else(|| BridgeError::MissingSymbol {
                type_name: info.name.clone(),
                symbol: symbol.to_string(),
            })
        };

        let create: CreateFn = unsafe { cast_fn(lookup(info.create.as_str())?) };
        let destroy: DestroyFn = unsafe { cast_fn(lookup(info.destroy.as_str())?) };

        let mut fields = Vec::with_capacity(info.fields.len());
        for field in &info.fields {
            let unsupported = || BridgeError::UnsupportedField {
                type_name: info.name.clone(),
                field: field.name.clone(),
                field_type: field.ty,
            };
            if !field.ty.is_accessible() {
                return Err(unsupported());
            }

            let getter = lookup(field.getter.as_str())?;
            let setter = lookup(field.setter.as_str())?;
            let accessor = unsafe { Accessor::from_addresses(field.ty, getter, setter) }.ok_or_else(unsupported)?;
            fields.push(ResolvedField {
                info: field.clone(),
                accessor,
            });
        }

        if !info.methods.is_empty() {
            log::debug!(
                "{}: {} declared method(s) kept as metadata only",
                info.name,
                info.methods.len()
            );
        }
        log::debug!("{}: resolved {} field(s) in {}", info.name, fields.len(), module.name());

        Ok(ScriptInterface {
            info,
            create,
            destroy,
            fields,
        })
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Record from the registration table
    pub fn info(&self) -> &TypeInfo {
        &self.info
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    /// Field by index
    pub fn field(&self, index: usize) -> BridgeResult<&ResolvedField> {
        self.fields.get(index).ok_or_else(|| BridgeError::FieldIndex {
            type_name: self.info.name.clone(),
            index,
        })
    }

    /// Index of the field called `name`
    pub fn field_index(&self, name: &str) -> BridgeResult<usize> {
        self.fields
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| BridgeError::UnknownField {
                type_name: self.info.name.clone(),
                field: name.to_string(),
            })
    }

    /// Create a new instance through the module's creation function.
    pub fn create(&self) -> BridgeResult<ScriptInstance<'_>> {
        let ptr = unsafe { (self.create)() };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(ScriptInstance::new(self, ptr)),
            None => Err(BridgeError::CreateFailed {
                type_name: self.info.name.clone(),
            }),
        }
    }

    pub(crate) fn destroy_fn(&self) -> DestroyFn {
        self.destroy
    }
}
