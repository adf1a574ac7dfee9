//! Late-bound access to Word's automation objects.
//!
//! Word ships no type library we link against, so every member is resolved
//! by name through IDispatch, the same way a VBA macro does. Arguments and
//! results travel as VARIANTs; only the handful of VARIANT kinds Word's
//! field-refresh members take or return are supported here.

use std::mem::ManuallyDrop;
use std::ptr;

use windows::{
    core::{Interface, IUnknown, BSTR, GUID, HSTRING, PCWSTR},
    Win32::{
        Foundation::{DISP_E_EXCEPTION, MK_E_UNAVAILABLE, VARIANT_BOOL},
        Globalization::GetSystemDefaultLCID,
        System::{
            Com::{
                CLSIDFromProgID, CoCreateInstance, IDispatch, CLSCTX_LOCAL_SERVER, DISPATCH_FLAGS,
                DISPATCH_METHOD, DISPATCH_PROPERTYGET, DISPATCH_PROPERTYPUT, DISPPARAMS,
                EXCEPINFO,
            },
            Ole::{GetActiveObject, DISPID_PROPERTYPUT},
            Variant::{VARIANT, VT_BOOL, VT_BSTR, VT_DISPATCH, VT_EMPTY, VT_I2, VT_I4, VT_NULL},
        },
    },
};

// VARIANT's unions are ManuallyDrop; fields are written with ptr::write.

/// `True`/`False` for flags such as `ReadOnly` or `ShowFieldCodes`.
pub fn variant_bool(val: bool) -> VARIANT {
    unsafe {
        let mut v = VARIANT::default();
        let inner = &mut *v.Anonymous.Anonymous;
        ptr::write(&mut inner.vt, VT_BOOL);
        ptr::write(
            &mut inner.Anonymous.boolVal,
            VARIANT_BOOL(if val { -1 } else { 0 }),
        );
        v
    }
}

/// A `Long`, used for `WdSaveOptions`, `WdAlertLevel` and collection indices.
pub fn variant_i32(val: i32) -> VARIANT {
    unsafe {
        let mut v = VARIANT::default();
        let inner = &mut *v.Anonymous.Anonymous;
        ptr::write(&mut inner.vt, VT_I4);
        ptr::write(&mut inner.Anonymous.lVal, val);
        v
    }
}

/// A `String` argument such as `FileName`.
pub fn variant_str(val: &str) -> VARIANT {
    unsafe {
        let bstr = BSTR::from(val);
        let mut v = VARIANT::default();
        let inner = &mut *v.Anonymous.Anonymous;
        ptr::write(&mut inner.vt, VT_BSTR);
        ptr::write(&mut inner.Anonymous.bstrVal, ManuallyDrop::new(bstr));
        v
    }
}

fn variant_vt(v: &VARIANT) -> u16 {
    unsafe { v.Anonymous.Anonymous.vt.0 }
}

/// `Long` or `Integer` result.
pub fn variant_get_i32(v: &VARIANT) -> Option<i32> {
    unsafe {
        let vt = v.Anonymous.Anonymous.vt;
        let anon = &v.Anonymous.Anonymous.Anonymous;
        if vt == VT_I4 {
            Some(anon.lVal)
        } else if vt == VT_I2 {
            Some(anon.iVal as i32)
        } else {
            None
        }
    }
}

/// `String` result, e.g. `Document.FullName`.
pub fn variant_get_string(v: &VARIANT) -> Option<String> {
    unsafe {
        if v.Anonymous.Anonymous.vt == VT_BSTR {
            let bstr = &v.Anonymous.Anonymous.Anonymous.bstrVal;
            Some(bstr.to_string())
        } else {
            None
        }
    }
}

/// An object of Word's automation model (`Application`, `Documents`,
/// `Document`, `Fields`, ...) reached through late-bound IDispatch.
#[derive(Clone)]
pub struct DispatchObject {
    inner: IDispatch,
}

impl DispatchObject {
    /// Start a new automation server, e.g. `Word.Application`.
    pub fn create_from_progid(progid: &str) -> Result<Self, String> {
        let clsid = clsid_for(progid)?;
        let inner: IDispatch = unsafe { CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER) }
            .map_err(|e| format!("CoCreateInstance failed for '{progid}': {e}"))?;
        Ok(Self { inner })
    }

    /// The instance the user already has open, if Word registered one in the
    /// Running Object Table. `Ok(None)` means Word is not running.
    pub fn get_active(progid: &str) -> Result<Option<Self>, String> {
        let clsid = clsid_for(progid)?;
        let mut unknown: Option<IUnknown> = None;
        match unsafe { GetActiveObject(&clsid, None, &mut unknown) } {
            Ok(()) => {}
            Err(e) if e.code() == MK_E_UNAVAILABLE => return Ok(None),
            Err(e) => return Err(format!("GetActiveObject failed for '{progid}': {e}")),
        }
        let Some(unknown) = unknown else {
            return Ok(None);
        };
        let inner: IDispatch = unknown
            .cast()
            .map_err(|e| format!("Running '{progid}' does not expose IDispatch: {e}"))?;
        Ok(Some(Self { inner }))
    }

    /// DISPIDs of a member followed by the names of its arguments, as
    /// `GetIDsOfNames` resolves them in one round trip.
    fn dispids(&self, names: &[&str]) -> Result<Vec<i32>, String> {
        let wide: Vec<Vec<u16>> = names
            .iter()
            .map(|n| n.encode_utf16().chain(std::iter::once(0)).collect())
            .collect();
        let pcwstrs: Vec<PCWSTR> = wide.iter().map(|w| PCWSTR(w.as_ptr())).collect();
        let mut ids = vec![0i32; names.len()];
        unsafe {
            self.inner.GetIDsOfNames(
                &GUID::zeroed(),
                pcwstrs.as_ptr(),
                pcwstrs.len() as u32,
                GetSystemDefaultLCID(),
                ids.as_mut_ptr(),
            )
        }
        .map_err(|e| format!("GetIDsOfNames({names:?}) failed: {e}"))?;
        Ok(ids)
    }

    /// Single `Invoke` entry point. `args` must already be in DISPPARAMS
    /// order (last argument first) and line up with `named`.
    fn call(
        &self,
        member: &str,
        dispid: i32,
        flags: DISPATCH_FLAGS,
        mut args: Vec<VARIANT>,
        mut named: Vec<i32>,
    ) -> Result<VARIANT, String> {
        fn ptr_or_null<T>(v: &mut [T]) -> *mut T {
            if v.is_empty() {
                ptr::null_mut()
            } else {
                v.as_mut_ptr()
            }
        }

        let params = DISPPARAMS {
            rgvarg: ptr_or_null(args.as_mut_slice()),
            rgdispidNamedArgs: ptr_or_null(named.as_mut_slice()),
            cArgs: args.len() as u32,
            cNamedArgs: named.len() as u32,
        };
        let mut result = VARIANT::default();
        let mut except = EXCEPINFO::default();
        let wants_result = flags != DISPATCH_PROPERTYPUT;
        unsafe {
            self.inner.Invoke(
                dispid,
                &GUID::zeroed(),
                GetSystemDefaultLCID(),
                flags,
                &params,
                wants_result.then_some(&mut result as *mut VARIANT),
                Some(&mut except),
                None,
            )
        }
        .map_err(|e| format_invoke_error(e, &except, member))?;
        Ok(result)
    }

    /// Read a property, e.g. `Document.FullName`.
    pub fn get_property(&self, name: &str) -> Result<VARIANT, String> {
        let ids = self.dispids(&[name])?;
        self.call(name, ids[0], DISPATCH_PROPERTYGET, Vec::new(), Vec::new())
    }

    /// Assign a property, e.g. `View.ShowFieldCodes = False`.
    pub fn set_property(&self, name: &str, value: VARIANT) -> Result<(), String> {
        let ids = self.dispids(&[name])?;
        self.call(
            name,
            ids[0],
            DISPATCH_PROPERTYPUT,
            vec![value],
            vec![DISPID_PROPERTYPUT],
        )?;
        Ok(())
    }

    /// Call a method that takes no arguments, e.g. `Document.Repaginate`.
    pub fn invoke_method(&self, name: &str) -> Result<VARIANT, String> {
        self.invoke_method_named(name, &[])
    }

    /// Call a method with named arguments, e.g.
    /// `Documents.Open(FileName:=..., ReadOnly:=False)`.
    pub fn invoke_method_named(
        &self,
        name: &str,
        args: &[(&str, VARIANT)],
    ) -> Result<VARIANT, String> {
        let mut names = Vec::with_capacity(args.len() + 1);
        names.push(name);
        names.extend(args.iter().map(|(arg_name, _)| *arg_name));
        let ids = self.dispids(&names)?;

        let values = args.iter().rev().map(|(_, v)| v.clone()).collect();
        let named = ids[1..].iter().rev().copied().collect();
        self.call(name, ids[0], DISPATCH_METHOD, values, named)
    }

    /// A property that returns another object, e.g. `Application.Documents`.
    pub fn get_child(&self, name: &str) -> Result<DispatchObject, String> {
        let variant = self.get_property(name)?;
        extract_dispatch(&variant, name)
    }

    /// A method with named arguments that returns an object, e.g.
    /// `Documents.Open`, which returns the opened `Document`.
    pub fn invoke_child_named(
        &self,
        name: &str,
        args: &[(&str, VARIANT)],
    ) -> Result<DispatchObject, String> {
        let variant = self.invoke_method_named(name, args)?;
        extract_dispatch(&variant, name)
    }

    /// `Count` of a collection such as `Documents` or `TablesOfContents`.
    pub fn count(&self) -> Result<i32, String> {
        let variant = self.get_property("Count")?;
        variant_get_i32(&variant).ok_or_else(|| {
            format!(
                "'Count' returned non-integer VARIANT (VT={})",
                variant_vt(&variant)
            )
        })
    }

    /// Every member of a collection. Word collections are 1-based.
    pub fn items(&self) -> Result<Vec<DispatchObject>, String> {
        let ids = self.dispids(&["Item"])?;
        (1..=self.count()?)
            .map(|i| {
                let item = self.call(
                    "Item",
                    ids[0],
                    DISPATCH_PROPERTYGET,
                    vec![variant_i32(i)],
                    Vec::new(),
                )?;
                extract_dispatch(&item, "Item")
            })
            .collect()
    }
}

fn clsid_for(progid: &str) -> Result<GUID, String> {
    let hstr = HSTRING::from(progid);
    unsafe { CLSIDFromProgID(&hstr) }
        .map_err(|e| format!("'{progid}' is not registered (CLSIDFromProgID: {e})"))
}

fn extract_dispatch(variant: &VARIANT, member: &str) -> Result<DispatchObject, String> {
    let vt = unsafe { variant.Anonymous.Anonymous.vt };
    if vt == VT_DISPATCH {
        // pdispVal is ManuallyDrop<Option<IDispatch>>
        let disp: &Option<IDispatch> = unsafe { &variant.Anonymous.Anonymous.Anonymous.pdispVal };
        if let Some(inner) = disp.clone() {
            return Ok(DispatchObject { inner });
        }
    }
    if vt == VT_DISPATCH || vt == VT_EMPTY || vt == VT_NULL {
        Err(format!("'{member}' returned no object"))
    } else {
        Err(format!(
            "'{member}' returned a VARIANT of type {} where an object was expected",
            vt.0
        ))
    }
}

/// Word reports most failures (locked file, bad password, protected view)
/// as DISP_E_EXCEPTION with the readable text in EXCEPINFO.
fn format_invoke_error(err: windows::core::Error, except: &EXCEPINFO, member: &str) -> String {
    if err.code() != DISP_E_EXCEPTION {
        return format!("Invoke('{member}') failed: {err}");
    }
    let or = |b: &BSTR, fallback: &str| {
        if b.is_empty() {
            fallback.to_string()
        } else {
            b.to_string()
        }
    };
    format!(
        "Word raised an error in '{member}': {} (source: {})",
        or(&except.bstrDescription, "no description"),
        or(&except.bstrSource, "unknown")
    )
}
