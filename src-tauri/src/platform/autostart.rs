//! Launch at login via the per-user Run key

use std::ffi::OsStr;
use std::iter;
use std::os::windows::ffi::OsStrExt;

use windows::core::PCWSTR;
use windows::Win32::Foundation::{
    ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA, ERROR_PATH_NOT_FOUND, ERROR_SUCCESS, WIN32_ERROR,
};
use windows::Win32::System::Registry::{
    RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
    HKEY_CURRENT_USER, KEY_READ, KEY_SET_VALUE, REG_SAM_FLAGS, REG_SZ,
};

const RUN_KEY: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Run";

/// Value name written under the Run key
const VALUE_NAME: &str = "Breaktime";

fn to_wide(input: &str) -> Vec<u16> {
    OsStr::new(input)
        .encode_wide()
        .chain(iter::once(0))
        .collect()
}

fn is_missing(code: WIN32_ERROR) -> bool {
    code == ERROR_FILE_NOT_FOUND || code == ERROR_PATH_NOT_FOUND
}

/// Open handle to the Run key, closed on drop
struct RunKey(HKEY);

impl RunKey {
    /// `Ok(None)` when the key does not exist
    fn open(access: REG_SAM_FLAGS) -> Result<Option<Self>, String> {
        let path = to_wide(RUN_KEY);
        let mut handle = HKEY::default();

        // SAFETY: `path` is a null-terminated UTF-16 buffer that outlives the
        // call and `handle` is a valid out pointer.
        let code = unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(path.as_ptr()),
                0,
                access,
                &mut handle,
            )
        };

        match code {
            ERROR_SUCCESS => Ok(Some(Self(handle))),
            code if is_missing(code) => Ok(None),
            code => Err(format!("Failed to open Run key: error code {}", code.0)),
        }
    }
}

impl Drop for RunKey {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful RegOpenKeyExW
        let _ = unsafe { RegCloseKey(self.0) };
    }
}

/// Whether a Run entry for the application exists
pub fn check_autostart_state() -> Result<bool, String> {
    let Some(key) = RunKey::open(KEY_READ)? else {
        return Ok(false);
    };
    let name = to_wide(VALUE_NAME);

    // SAFETY: `key` is open and `name` is null-terminated; no data buffer
    // is passed, so only existence is queried.
    let code = unsafe {
        RegQueryValueExW(
            key.0,
            PCWSTR::from_raw(name.as_ptr()),
            None,
            None,
            None,
            None,
        )
    };

    match code {
        ERROR_SUCCESS | ERROR_MORE_DATA => Ok(true),
        ERROR_FILE_NOT_FOUND => Ok(false),
        code => Err(format!("Failed to query Run entry: error code {}", code.0)),
    }
}

/// Register the current executable to start at login
pub fn enable_autostart() -> Result<(), String> {
    let exe = std::env::current_exe()
        .map_err(|e| format!("Failed to get executable path: {}", e))?;
    let command = to_wide(&format!("\"{}\"", exe.display()));
    let name = to_wide(VALUE_NAME);

    let key = RunKey::open(KEY_SET_VALUE)?
        .ok_or_else(|| "Run key does not exist".to_string())?;

    // SAFETY: `command` is a live UTF-16 buffer; the byte view covers it
    // exactly, including the terminator.
    let data = unsafe {
        std::slice::from_raw_parts(command.as_ptr() as *const u8, command.len() * 2)
    };

    // SAFETY: `key` is open and `name` is null-terminated
    let code = unsafe {
        RegSetValueExW(
            key.0,
            PCWSTR::from_raw(name.as_ptr()),
            0,
            REG_SZ,
            Some(data),
        )
    };

    if code != ERROR_SUCCESS {
        return Err(format!("Failed to write Run entry: error code {}", code.0));
    }

    tracing::info!("Autostart enabled: {}", exe.display());
    Ok(())
}

/// Remove the Run entry. Succeeds when it is already absent.
pub fn disable_autostart() -> Result<(), String> {
    let Some(key) = RunKey::open(KEY_SET_VALUE)? else {
        return Ok(());
    };
    let name = to_wide(VALUE_NAME);

    // SAFETY: `key` is open and `name` is null-terminated
    let code = unsafe { RegDeleteValueW(key.0, PCWSTR::from_raw(name.as_ptr())) };

    if code != ERROR_SUCCESS && code != ERROR_FILE_NOT_FOUND {
        return Err(format!("Failed to delete Run entry: error code {}", code.0));
    }

    tracing::info!("Autostart disabled");
    Ok(())
}
