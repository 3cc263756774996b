//! C layout of the registration table and the exported function signatures
//!
//! The generated `ns.h` declares the same three records:
//!
//! ```c
//! typedef struct ns_field_info  { int type; const char* name; const char* getter; const char* setter; } ns_field_info;
//! typedef struct ns_method_info { const char* name; const int* parameters; int parameter_count; int return_type; } ns_method_info;
//! typedef struct ns_script_info { const char* name; const ns_field_info* fields; int field_count;
//!                                 const ns_method_info* methods; int method_count;
//!                                 const char* create; const char* destroy; } ns_script_info;
//! ```
//!
//! A module hands the table out through [`GetGeneratedScriptsFn`]. The table
//! must stay valid for as long as the module stays loaded.

use std::ffi::{c_char, c_int, c_void, CStr, CString};

use crate::error::{AbiError, AbiResult};
use crate::types::{FieldInfo, FieldType, MethodInfo, TypeInfo};

// ============================================================================
// Records
// ============================================================================

/// `ns_field_info`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawFieldInfo {
    /// [`FieldType`] wire tag
    pub field_type: c_int,
    /// Field name
    pub name: *const c_char,
    /// Getter symbol
    pub getter: *const c_char,
    /// Setter symbol
    pub setter: *const c_char,
}

/// `ns_method_info`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawMethodInfo {
    /// Method name
    pub name: *const c_char,
    /// Parameter type tags
    pub parameters: *const c_int,
    /// Number of entries in `parameters`
    pub parameter_count: c_int,
    /// Return type tag
    pub return_type: c_int,
}

/// `ns_script_info`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawScriptInfo {
    /// Type name
    pub name: *const c_char,
    /// Field records
    pub fields: *const RawFieldInfo,
    /// Number of entries in `fields`
    pub field_count: c_int,
    /// Method records
    pub methods: *const RawMethodInfo,
    /// Number of entries in `methods`
    pub method_count: c_int,
    /// Creation symbol
    pub create: *const c_char,
    /// Destruction symbol
    pub destroy: *const c_char,
}

// ============================================================================
// Function signatures
// ============================================================================

/// `void getGeneratedScripts(int* count, const ns_script_info** scripts)`
pub type GetGeneratedScriptsFn =
    unsafe extern "C" fn(count: *mut c_int, scripts: *mut *const RawScriptInfo);

/// `T* create<T>()`
pub type CreateFn = unsafe extern "C" fn() -> *mut c_void;

/// `void destroy<T>(T*)`
pub type DestroyFn = unsafe extern "C" fn(instance: *mut c_void);

/// `V <T>_get_<field>(T*)`
pub type GetterFn<V> = unsafe extern "C" fn(instance: *mut c_void) -> V;

/// `void <T>_set_<field>(T*, V)`
pub type SetterFn<V> = unsafe extern "C" fn(instance: *mut c_void, value: V);

// ============================================================================
// Decoding
// ============================================================================

/// Decode a registration table into owned metadata.
///
/// # Safety
///
/// `scripts` must point to `count` valid records whose strings and nested
/// arrays are readable for the duration of the call.
pub unsafe fn decode_table(count: c_int, scripts: *const RawScriptInfo) -> AbiResult<Vec<TypeInfo>> {
    let raw = slice_of(scripts, count, "script")?;
    raw.iter().enumerate().map(|(i, s)| decode_script(i, s)).collect()
}

unsafe fn decode_script(index: usize, raw: &RawScriptInfo) -> AbiResult<TypeInfo> {
    let name = c_string(raw.name, &format!("script[{}].name", index))?;

    let fields = slice_of(raw.fields, raw.field_count, &format!("{}.fields", name))?
        .iter()
        .enumerate()
        .map(|(i, f)| -> AbiResult<FieldInfo> {
            let what = format!("{}.fields[{}]", name, i);
            let ty = FieldType::from_tag(f.field_type);
            if ty == FieldType::Unknown && f.field_type != 0 {
                log::warn!("{}: unrecognized type tag {}", what, f.field_type);
            }
            Ok(FieldInfo {
                ty,
                name: c_string(f.name, &format!("{}.name", what))?,
                getter: c_string(f.getter, &format!("{}.getter", what))?,
                setter: c_string(f.setter, &format!("{}.setter", what))?,
            })
        })
        .collect::<AbiResult<Vec<_>>>()?;

    let methods = slice_of(raw.methods, raw.method_count, &format!("{}.methods", name))?
        .iter()
        .enumerate()
        .map(|(i, m)| -> AbiResult<MethodInfo> {
            let what = format!("{}.methods[{}]", name, i);
            let parameters = slice_of(m.parameters, m.parameter_count, &format!("{}.parameters", what))?
                .iter()
                .map(|&tag| FieldType::from_tag(tag))
                .collect();
            Ok(MethodInfo {
                name: c_string(m.name, &format!("{}.name", what))?,
                parameters,
                return_type: FieldType::from_tag(m.return_type),
            })
        })
        .collect::<AbiResult<Vec<_>>>()?;

    Ok(TypeInfo {
        create: c_string(raw.create, &format!("{}.create", name))?,
        destroy: c_string(raw.destroy, &format!("{}.destroy", name))?,
        name,
        fields,
        methods,
    })
}

unsafe fn slice_of<'a, T>(ptr: *const T, count: c_int, what: &str) -> AbiResult<&'a [T]> {
    if count < 0 {
        return Err(AbiError::NegativeCount {
            what: what.to_string(),
            count,
        });
    }
    if count == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(AbiError::NullPointer {
            what: what.to_string(),
        });
    }
    Ok(std::slice::from_raw_parts(ptr, count as usize))
}

unsafe fn c_string(ptr: *const c_char, what: &str) -> AbiResult<String> {
    if ptr.is_null() {
        return Err(AbiError::NullPointer {
            what: what.to_string(),
        });
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_string)
        .map_err(|_| AbiError::InvalidUtf8 {
            what: what.to_string(),
        })
}

// ============================================================================
// Encoding
// ============================================================================

/// An owned registration table in C layout.
///
/// Lets a module written in Rust (or a test) export the same table the
/// generated `scripts.generated.cpp` provides.
///
/// # Example
///
/// ```ignore
/// static TABLE: OnceLock<ScriptTable> = OnceLock::new();
///
/// #[no_mangle]
/// pub unsafe extern "C" fn getGeneratedScripts(count: *mut c_int, scripts: *mut *const RawScriptInfo) {
///     let table = TABLE.get_or_init(|| ScriptTable::new(&types()).unwrap());
///     table.write_to(count, scripts);
/// }
/// ```
pub struct ScriptTable {
    scripts: Vec<RawScriptInfo>,
    // Backing storage for the pointers above. Heap buffers do not move
    // when these vectors are moved.
    _strings: Vec<CString>,
    _fields: Vec<Vec<RawFieldInfo>>,
    _methods: Vec<Vec<RawMethodInfo>>,
    _parameters: Vec<Vec<c_int>>,
}

// Immutable after construction; every pointer targets storage owned by the table.
unsafe impl Send for ScriptTable {}
unsafe impl Sync for ScriptTable {}

impl ScriptTable {
    /// Encode metadata records.
    pub fn new(types: &[TypeInfo]) -> AbiResult<Self> {
        let mut strings = Vec::new();
        let mut all_fields = Vec::with_capacity(types.len());
        let mut all_methods = Vec::with_capacity(types.len());
        let mut all_parameters = Vec::new();
        let mut scripts = Vec::with_capacity(types.len());

        let mut intern = |text: &str, what: &str| -> AbiResult<*const c_char> {
            let owned = CString::new(text).map_err(|_| AbiError::InteriorNul {
                what: what.to_string(),
            })?;
            let ptr = owned.as_ptr();
            strings.push(owned);
            Ok(ptr)
        };

        for info in types {
            let fields = info
                .fields
                .iter()
                .map(|f| -> AbiResult<RawFieldInfo> {
                    Ok(RawFieldInfo {
                        field_type: f.ty.tag(),
                        name: intern(&f.name, "field name")?,
                        getter: intern(&f.getter, "getter symbol")?,
                        setter: intern(&f.setter, "setter symbol")?,
                    })
                })
                .collect::<AbiResult<Vec<_>>>()?;

            let mut methods = Vec::with_capacity(info.methods.len());
            for method in &info.methods {
                let parameters: Vec<c_int> = method.parameters.iter().map(|t| t.tag()).collect();
                methods.push(RawMethodInfo {
                    name: intern(&method.name, "method name")?,
                    parameters: parameters.as_ptr(),
                    parameter_count: c_count(parameters.len(), "parameter")?,
                    return_type: method.return_type.tag(),
                });
                all_parameters.push(parameters);
            }

            scripts.push(RawScriptInfo {
                name: intern(&info.name, "type name")?,
                fields: fields.as_ptr(),
                field_count: c_count(fields.len(), "field")?,
                methods: methods.as_ptr(),
                method_count: c_count(methods.len(), "method")?,
                create: intern(&info.create, "create symbol")?,
                destroy: intern(&info.destroy, "destroy symbol")?,
            });
            all_fields.push(fields);
            all_methods.push(methods);
        }
        c_count(scripts.len(), "script")?;

        Ok(ScriptTable {
            scripts,
            _strings: strings,
            _fields: all_fields,
            _methods: all_methods,
            _parameters: all_parameters,
        })
    }

    /// Number of records.
    pub fn count(&self) -> c_int {
        self.scripts.len() as c_int
    }

    /// Pointer to the first record.
    pub fn as_ptr(&self) -> *const RawScriptInfo {
        self.scripts.as_ptr()
    }

    /// Write count and array pointer the way `getGeneratedScripts` does.
    ///
    /// # Safety
    ///
    /// Both pointers must be valid for writes.
    pub unsafe fn write_to(&self, count: *mut c_int, scripts: *mut *const RawScriptInfo) {
        *count = self.count();
        *scripts = self.as_ptr();
    }

    /// Decode this table back into metadata.
    pub fn decode(&self) -> AbiResult<Vec<TypeInfo>> {
        unsafe { decode_table(self.count(), self.as_ptr()) }
    }
}

fn c_count(len: usize, what: &str) -> AbiResult<c_int> {
    c_int::try_from(len).map_err(|_| AbiError::TooLarge {
        what: what.to_string(),
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn sample() -> Vec<TypeInfo> {
        let mut player = TypeInfo::new("Player");
        player.push_field(FieldType::Int, "health");
        player.push_field(FieldType::Double, "speed");
        player.push_field(FieldType::Unknown, "count");
        vec![player, TypeInfo::new("Empty")]
    }

    #[test]
    fn test_table_preserves_order_and_symbols() {
        let types = sample();
        let table = ScriptTable::new(&types).unwrap();
        assert_eq!(table.count(), 2);

        let decoded = table.decode().unwrap();
        assert_eq!(decoded, types);
        assert_eq!(decoded[0].fields[2].ty, FieldType::Unknown);
        assert!(decoded[1].fields.is_empty());
    }

    #[test]
    fn test_table_survives_move() {
        let table = ScriptTable::new(&sample()).unwrap();
        let moved = Box::new(table);
        assert_eq!(moved.decode().unwrap()[0].name, "Player");
    }

    #[test]
    fn test_interior_nul_rejected() {
        let result = ScriptTable::new(&[TypeInfo::new("Bad\0Name")]);
        assert!(matches!(result, Err(AbiError::InteriorNul { .. })));
    }

    #[test]
    fn test_decode_rejects_malformed_tables() {
        unsafe {
            assert!(matches!(
                decode_table(-1, ptr::null()),
                Err(AbiError::NegativeCount { .. })
            ));
            assert!(matches!(
                decode_table(1, ptr::null()),
                Err(AbiError::NullPointer { .. })
            ));
            assert_eq!(decode_table(0, ptr::null()).unwrap(), Vec::new());
        }

        let name = CString::new("Broken").unwrap();
        let raw = RawScriptInfo {
            name: name.as_ptr(),
            fields: ptr::null(),
            field_count: 3,
            methods: ptr::null(),
            method_count: 0,
            create: name.as_ptr(),
            destroy: ptr::null(),
        };
        let result = unsafe { decode_table(1, &raw) };
        assert_eq!(
            result,
            Err(AbiError::NullPointer {
                what: "Broken.fields".to_string()
            })
        );
    }

    #[test]
    fn test_out_of_range_tag_decodes_as_unknown() {
        let name = CString::new("Odd").unwrap();
        let getter = CString::new("Odd_get_x").unwrap();
        let setter = CString::new("Odd_set_x").unwrap();
        let field_name = CString::new("x").unwrap();
        let field = RawFieldInfo {
            field_type: 99,
            name: field_name.as_ptr(),
            getter: getter.as_ptr(),
            setter: setter.as_ptr(),
        };
        let raw = RawScriptInfo {
            name: name.as_ptr(),
            fields: &field,
            field_count: 1,
            methods: ptr::null(),
            method_count: 0,
            create: name.as_ptr(),
            destroy: name.as_ptr(),
        };
        let decoded = unsafe { decode_table(1, &raw) }.unwrap();
        assert_eq!(decoded[0].fields[0].ty, FieldType::Unknown);
    }
}
