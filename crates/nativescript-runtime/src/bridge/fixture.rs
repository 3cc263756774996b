//! In-process modules for bridge tests.
//!
//! `Counter` stands in for a compiled annotated type: its lifecycle and
//! accessor functions have exactly the signatures the generated C++ exports.

use std::ffi::{c_char, c_int, c_void};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use nativescript_sdk::abi::{RawScriptInfo, ScriptTable};
use nativescript_sdk::value::wchar_t;
use nativescript_sdk::{FieldType, MethodInfo, TypeInfo, REGISTRATION_SYMBOL};

use crate::ffi::StaticModule;

#[repr(C)]
pub struct Counter {
    pub value: c_int,
    pub ratio: f64,
    pub alive: bool,
    pub grade: c_char,
    pub speed: f32,
    pub letter: wchar_t,
}

pub static COUNTERS_CREATED: AtomicUsize = AtomicUsize::new(0);
pub static COUNTERS_DESTROYED: AtomicUsize = AtomicUsize::new(0);

unsafe extern "C" fn create_counter() -> *mut c_void {
    COUNTERS_CREATED.fetch_add(1, Ordering::SeqCst);
    Box::into_raw(Box::new(Counter {
        value: 7,
        ratio: 0.5,
        alive: true,
        grade: b'B' as c_char,
        speed: 1.25,
        letter: 'λ' as wchar_t,
    })) as *mut c_void
}

unsafe extern "C" fn destroy_counter(instance: *mut c_void) {
    COUNTERS_DESTROYED.fetch_add(1, Ordering::SeqCst);
    drop(Box::from_raw(instance as *mut Counter));
}

macro_rules! accessors {
    ($get:ident, $set:ident, $field:ident, $ty:ty) => {
        unsafe extern "C" fn $get(instance: *mut c_void) -> $ty {
            (*(instance as *mut Counter)).$field
        }

        unsafe extern "C" fn $set(instance: *mut c_void, value: $ty) {
            (*(instance as *mut Counter)).$field = value;
        }
    };
}

accessors!(counter_get_value, counter_set_value, value, c_int);
accessors!(counter_get_ratio, counter_set_ratio, ratio, f64);
accessors!(counter_get_alive, counter_set_alive, alive, bool);
accessors!(counter_get_grade, counter_set_grade, grade, c_char);
accessors!(counter_get_speed, counter_set_speed, speed, f32);
accessors!(counter_get_letter, counter_set_letter, letter, wchar_t);

unsafe extern "C" fn create_null() -> *mut c_void {
    std::ptr::null_mut()
}

unsafe extern "C" fn destroy_noop(_instance: *mut c_void) {}

pub fn counter_type() -> TypeInfo {
    let mut info = TypeInfo::new("Counter");
    info.push_field(FieldType::Int, "value");
    info.push_field(FieldType::Double, "ratio");
    info.push_field(FieldType::Bool, "alive");
    info.push_field(FieldType::Char, "grade");
    info.push_field(FieldType::Float, "speed");
    info.push_field(FieldType::WChar, "letter");
    info
}

/// Define a registration entry point serving a fixed table.
macro_rules! registration {
    ($name:ident, $types:expr) => {
        unsafe extern "C" fn $name(count: *mut c_int, scripts: *mut *const RawScriptInfo) {
            static TABLE: OnceLock<ScriptTable> = OnceLock::new();
            let table = TABLE.get_or_init(|| ScriptTable::new(&$types).expect("fixture table"));
            table.write_to(count, scripts);
        }
    };
}

registration!(register_counter, [counter_type()]);
registration!(register_empty, Vec::<TypeInfo>::new());
registration!(register_broken, [counter_type(), TypeInfo::new("Ghost")]);
registration!(register_duplicate, {
    let mut second = TypeInfo::new("Counter");
    second.push_field(FieldType::Int, "value");
    [counter_type(), second]
});
registration!(register_unsupported, {
    let mut bag = TypeInfo::new("Bag");
    bag.push_field(FieldType::Unknown, "count");
    [bag]
});
registration!(register_hollow, [TypeInfo::new("Hollow")]);
registration!(register_method, {
    let mut jumper = TypeInfo::new("Jumper");
    jumper.methods.push(MethodInfo {
        name: "jump".to_string(),
        parameters: vec![FieldType::Float],
        return_type: FieldType::Void,
    });
    [jumper]
});

unsafe extern "C" fn register_negative(count: *mut c_int, scripts: *mut *const RawScriptInfo) {
    *count = -1;
    *scripts = std::ptr::null();
}

fn with_counter_symbols(module: StaticModule) -> StaticModule {
    module
        .with("createCounter", create_counter as *const c_void)
        .with("destroyCounter", destroy_counter as *const c_void)
        .with("Counter_get_value", counter_get_value as *const c_void)
        .with("Counter_set_value", counter_set_value as *const c_void)
        .with("Counter_get_ratio", counter_get_ratio as *const c_void)
        .with("Counter_set_ratio", counter_set_ratio as *const c_void)
        .with("Counter_get_alive", counter_get_alive as *const c_void)
        .with("Counter_set_alive", counter_set_alive as *const c_void)
        .with("Counter_get_grade", counter_get_grade as *const c_void)
        .with("Counter_set_grade", counter_set_grade as *const c_void)
        .with("Counter_get_speed", counter_get_speed as *const c_void)
        .with("Counter_set_speed", counter_set_speed as *const c_void)
        .with("Counter_get_letter", counter_get_letter as *const c_void)
        .with("Counter_set_letter", counter_set_letter as *const c_void)
}

fn module(name: &str, register: *const c_void) -> StaticModule {
    with_counter_symbols(StaticModule::new(name)).with(REGISTRATION_SYMBOL, register)
}

pub fn counter_module() -> StaticModule {
    module("counter", register_counter as *const c_void)
}

pub fn empty_module() -> StaticModule {
    module("empty", register_empty as *const c_void)
}

pub fn broken_module() -> StaticModule {
    module("broken", register_broken as *const c_void)
}

pub fn duplicate_module() -> StaticModule {
    module("duplicate", register_duplicate as *const c_void)
}

pub fn unsupported_module() -> StaticModule {
    // Accessors exist; the field is still rejected for its type.
    module("unsupported", register_unsupported as *const c_void)
        .with("createBag", create_null as *const c_void)
        .with("destroyBag", destroy_noop as *const c_void)
        .with("Bag_get_count", counter_get_value as *const c_void)
        .with("Bag_set_count", counter_set_value as *const c_void)
}

pub fn hollow_module() -> StaticModule {
    module("hollow", register_hollow as *const c_void)
        .with("createHollow", create_null as *const c_void)
        .with("destroyHollow", destroy_noop as *const c_void)
}

pub fn method_module() -> StaticModule {
    module("method", register_method as *const c_void)
        .with("createJumper", create_null as *const c_void)
        .with("destroyJumper", destroy_noop as *const c_void)
}

pub fn negative_count_module() -> StaticModule {
    module("negative", register_negative as *const c_void)
}

pub fn without_entry_point() -> StaticModule {
    with_counter_symbols(StaticModule::new("no-entry"))
}
