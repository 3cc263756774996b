//! Module access: where exported symbols come from.
//!
//! The bridge never calls the platform loader directly. It asks a
//! [`SymbolSource`] for addresses, so a module can be a shared library
//! opened at run time ([`Library`]) or a table of functions linked into the
//! current binary ([`StaticModule`]).

pub mod loader;
pub mod static_module;

use std::ffi::c_void;
use std::ptr::NonNull;

pub use loader::{Library, LoadError};
pub use static_module::StaticModule;

/// Exact-name lookup of exported functions.
///
/// Implementations must keep every address they return valid for as long
/// as the source itself is alive.
pub trait SymbolSource {
    /// Human-readable module name, used in errors and logs
    fn name(&self) -> &str;

    /// Address of `symbol`, or `None` when the module does not export it
    fn address(&self, symbol: &str) -> Option<NonNull<c_void>>;
}

impl<S: SymbolSource + ?Sized> SymbolSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn address(&self, symbol: &str) -> Option<NonNull<c_void>> {
        (**self).address(symbol)
    }
}

/// Reinterpret a symbol address as a function pointer.
///
/// # Safety
///
/// The address must be a function whose signature is exactly `F`.
pub(crate) unsafe fn cast_fn<F: Copy>(address: NonNull<c_void>) -> F {
    debug_assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*mut c_void>());
    std::mem::transmute_copy(&address.as_ptr())
}
