//! Shared library loading for generated modules
//!
//! Cross-platform support for opening compiled glue (.so, .dylib, .dll) and
//! looking up its exports by exact name.

use std::ffi::{c_void, CString};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use thiserror::Error;

use super::SymbolSource;

/// Errors that can occur while opening a module or looking up a symbol
#[derive(Debug, Error)]
pub enum LoadError {
    /// Module file missing or not a loadable library
    #[error("Cannot open module {path}: {reason}")]
    NotFound {
        /// Path that was attempted
        path: String,
        /// Loader message
        reason: String,
    },

    /// Symbol not exported by the module
    #[error("Symbol not found: {symbol} in {library}")]
    SymbolNotFound {
        /// Symbol name that was not found
        symbol: String,
        /// Library path
        library: String,
    },

    /// Path or symbol name cannot be passed to the platform loader
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Invalid path encoding
    #[error("Invalid UTF-8 in path: {0}")]
    InvalidPath(String),
}

/// An open shared library. Closed on drop, which invalidates every address
/// looked up through it.
pub struct Library {
    handle: LibraryHandle,
    path: String,
}

impl Library {
    /// Open a shared library.
    ///
    /// # Platform-specific behavior
    ///
    /// - **Linux / macOS**: `dlopen(RTLD_NOW | RTLD_LOCAL)`
    /// - **Windows**: `LoadLibraryW`
    ///
    /// A relative path is taken relative to the current directory, never
    /// looked up on the platform library search path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let resolved = absolute_path(path.as_ref())?;
        let path_str = resolved
            .to_str()
            .ok_or_else(|| LoadError::InvalidPath(format!("{:?}", resolved)))?;

        let handle = LibraryHandle::load(path_str)?;
        log::debug!("opened module {}", path_str);

        Ok(Library {
            handle,
            path: path_str.to_string(),
        })
    }

    /// Address of an exported symbol.
    pub fn symbol(&self, name: &str) -> Result<NonNull<c_void>, LoadError> {
        self.handle.symbol(name, &self.path)
    }

    /// Get the path this library was opened from
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SymbolSource for Library {
    fn name(&self) -> &str {
        &self.path
    }

    fn address(&self, symbol: &str) -> Option<NonNull<c_void>> {
        match self.symbol(symbol) {
            Ok(address) => Some(address),
            Err(e) => {
                log::debug!("{}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library").field("path", &self.path).finish()
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf, LoadError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|e| LoadError::NotFound {
            path: path.display().to_string(),
            reason: format!("cannot resolve against the current directory: {}", e),
        })
}

fn c_name(name: &str) -> Result<CString, LoadError> {
    CString::new(name).map_err(|_| LoadError::InvalidName(name.escape_debug().to_string()))
}

// Platform-specific implementations

#[cfg(unix)]
type LibraryHandle = UnixLibrary;

#[cfg(windows)]
type LibraryHandle = WindowsLibrary;

// ============================================================================
// Unix Implementation (Linux, macOS, BSD)
// ============================================================================

#[cfg(unix)]
struct UnixLibrary {
    handle: NonNull<c_void>,
}

#[cfg(unix)]
impl UnixLibrary {
    fn load(path: &str) -> Result<Self, LoadError> {
        let c_path = c_name(path)?;

        // RTLD_NOW: fail here rather than on first call
        // RTLD_LOCAL: keep this module's exports out of the global namespace
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };

        match NonNull::new(handle) {
            Some(handle) => Ok(UnixLibrary { handle }),
            None => Err(LoadError::NotFound {
                path: path.to_string(),
                reason: last_dl_error().unwrap_or_else(|| "Unknown error".to_string()),
            }),
        }
    }

    fn symbol(&self, name: &str, lib_path: &str) -> Result<NonNull<c_void>, LoadError> {
        let c_name = c_name(name)?;

        let symbol = unsafe {
            // Clear any previous error
            libc::dlerror();
            libc::dlsym(self.handle.as_ptr(), c_name.as_ptr())
        };

        if let Some(error) = last_dl_error() {
            return Err(LoadError::SymbolNotFound {
                symbol: name.to_string(),
                library: format!("{}: {}", lib_path, error),
            });
        }

        NonNull::new(symbol).ok_or_else(|| LoadError::SymbolNotFound {
            symbol: name.to_string(),
            library: lib_path.to_string(),
        })
    }
}

#[cfg(unix)]
fn last_dl_error() -> Option<String> {
    unsafe {
        let err_ptr = libc::dlerror();
        if err_ptr.is_null() {
            None
        } else {
            Some(std::ffi::CStr::from_ptr(err_ptr).to_string_lossy().into_owned())
        }
    }
}

#[cfg(unix)]
impl Drop for UnixLibrary {
    fn drop(&mut self) {
        unsafe {
            libc::dlclose(self.handle.as_ptr());
        }
    }
}

// The handle is only passed to dlsym/dlclose, which are thread-safe.
#[cfg(unix)]
unsafe impl Send for UnixLibrary {}
#[cfg(unix)]
unsafe impl Sync for UnixLibrary {}

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(windows)]
struct WindowsLibrary {
    handle: NonNull<c_void>,
}

#[cfg(windows)]
impl WindowsLibrary {
    fn load(path: &str) -> Result<Self, LoadError> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;

        let wide: Vec<u16> = OsStr::new(path)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let handle = unsafe { LoadLibraryW(wide.as_ptr()) };

        match NonNull::new(handle) {
            Some(handle) => Ok(WindowsLibrary { handle }),
            None => Err(LoadError::NotFound {
                path: path.to_string(),
                reason: format!("error code: {}", unsafe { GetLastError() }),
            }),
        }
    }

    fn symbol(&self, name: &str, lib_path: &str) -> Result<NonNull<c_void>, LoadError> {
        let c_name = c_name(name)?;

        let symbol = unsafe { GetProcAddress(self.handle.as_ptr(), c_name.as_ptr()) };

        NonNull::new(symbol).ok_or_else(|| LoadError::SymbolNotFound {
            symbol: name.to_string(),
            library: format!("{} (error code: {})", lib_path, unsafe { GetLastError() }),
        })
    }
}

#[cfg(windows)]
impl Drop for WindowsLibrary {
    fn drop(&mut self) {
        unsafe {
            FreeLibrary(self.handle.as_ptr());
        }
    }
}

#[cfg(windows)]
unsafe impl Send for WindowsLibrary {}
#[cfg(windows)]
unsafe impl Sync for WindowsLibrary {}

// Windows FFI declarations
#[cfg(windows)]
extern "system" {
    fn LoadLibraryW(filename: *const u16) -> *mut c_void;
    fn GetProcAddress(module: *mut c_void, procname: *const std::ffi::c_char) -> *mut c_void;
    fn FreeLibrary(module: *mut c_void) -> i32;
    fn GetLastError() -> u32;
}
