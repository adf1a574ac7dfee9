//! COM automation of `Word.Application` (Windows only).

mod dispatch;
mod word;

pub use dispatch::DispatchObject;
pub use word::{ComConnector, ComWordApp, ComWordDocument};

use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};

/// COM initialised in single-threaded apartment mode for the current thread.
///
/// Every COM object created on this thread must be dropped before the guard.
pub struct ComApartment {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ComApartment {
    pub fn init() -> Result<Self, String> {
        unsafe {
            CoInitializeEx(None, COINIT_APARTMENTTHREADED)
                .ok()
                .map_err(|e| format!("CoInitializeEx failed: {e}"))?;
        }
        tracing::debug!("COM initialized (STA)");
        Ok(Self {
            _not_send: std::marker::PhantomData,
        })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
        tracing::debug!("COM uninitialized");
    }
}
