//! Windows SetupAPI device gateway.
//!
//! Enumeration walks every present devnode, reads its friendly name (falling
//! back to the device description) and derives the enablement state from
//! `CM_Get_DevNode_Status`: a devnode whose problem code is
//! `CM_PROB_DISABLED` is disabled, everything else counts as enabled.
//!
//! Enable/disable goes through the class installer with a
//! `DIF_PROPERTYCHANGE` request scoped `DICS_FLAG_GLOBAL`, which is the same
//! path Device Manager uses and persists across reboots.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use touchtray_core::{DeviceGateway, DeviceHandle, DeviceSnapshot, DisplayState, GatewayError};
use windows::core::PCWSTR;
use windows::Win32::Devices::DeviceAndDriverInstallation::{
    CM_Get_DevNode_Status, SetupDiCallClassInstaller, SetupDiDestroyDeviceInfoList,
    SetupDiEnumDeviceInfo, SetupDiGetClassDevsW, SetupDiGetDeviceInstanceIdW,
    SetupDiGetDeviceRegistryPropertyW, SetupDiSetClassInstallParamsW, CM_DEVNODE_STATUS_FLAGS,
    CM_PROB, CM_PROB_DISABLED, CR_SUCCESS, DICS_DISABLE, DICS_ENABLE, DICS_FLAG_GLOBAL,
    DIF_PROPERTYCHANGE, DIGCF_ALLCLASSES, DIGCF_PRESENT, DN_HAS_PROBLEM, HDEVINFO,
    SETUP_DI_REGISTRY_PROPERTY, SPDRP_DEVICEDESC, SPDRP_FRIENDLYNAME, SP_CLASSINSTALL_HEADER,
    SP_DEVINFO_DATA, SP_PROPCHANGE_PARAMS,
};
use windows::Win32::Foundation::ERROR_NO_MORE_ITEMS;

/// [`DeviceGateway`] backed by the Windows SetupAPI.
pub struct SetupApiGateway;

impl SetupApiGateway {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SetupApiGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceGateway for SetupApiGateway {
    fn enumerate(&self, pattern: &str) -> Result<Vec<DeviceSnapshot>, GatewayError> {
        let set = DeviceInfoSet::all_present()
            .map_err(|e| GatewayError::Enumerate(e.message()))?;
        let needle = pattern.to_lowercase();
        let mut matches = Vec::new();

        for entry in set.entries() {
            let data = entry.map_err(|e| GatewayError::Enumerate(e.message()))?;

            let Some(name) = set.display_name(&data) else {
                // Devnodes without a readable name cannot match a name filter.
                continue;
            };
            if !name.to_lowercase().contains(&needle) {
                continue;
            }

            let id = set
                .instance_id(&data)
                .map_err(|e| GatewayError::Enumerate(e.message()))?;
            let enabled = devnode_is_enabled(&data)?;

            matches.push(DeviceSnapshot {
                handle: DeviceHandle::new(id),
                display_name: name,
                state: DisplayState::from_enabled(enabled),
            });
        }
        Ok(matches)
    }

    fn set_enabled(&self, device: &DeviceHandle, enabled: bool) -> Result<(), GatewayError> {
        let set = DeviceInfoSet::all_present()
            .map_err(|e| GatewayError::StateChange(e.message()))?;

        for entry in set.entries() {
            let data = entry.map_err(|e| GatewayError::StateChange(e.message()))?;
            let id = set
                .instance_id(&data)
                .map_err(|e| GatewayError::StateChange(e.message()))?;
            if !id.eq_ignore_ascii_case(device.as_str()) {
                continue;
            }
            return apply_property_change(&set, &data, enabled);
        }

        Err(GatewayError::StateChange(format!(
            "device \"{device}\" is no longer present"
        )))
    }
}

/// Requests the enable/disable state change through the class installer.
fn apply_property_change(
    set: &DeviceInfoSet,
    data: &SP_DEVINFO_DATA,
    enabled: bool,
) -> Result<(), GatewayError> {
    let params = SP_PROPCHANGE_PARAMS {
        ClassInstallHeader: SP_CLASSINSTALL_HEADER {
            cbSize: std::mem::size_of::<SP_CLASSINSTALL_HEADER>() as u32,
            InstallFunction: DIF_PROPERTYCHANGE,
        },
        StateChange: if enabled { DICS_ENABLE } else { DICS_DISABLE },
        Scope: DICS_FLAG_GLOBAL,
        HwProfile: 0,
    };

    // SAFETY: `params` outlives both calls and its header cbSize is set per
    // the API contract; `data` belongs to the live `set`.
    unsafe {
        SetupDiSetClassInstallParamsW(
            set.0,
            Some(data),
            Some(&params.ClassInstallHeader),
            std::mem::size_of::<SP_PROPCHANGE_PARAMS>() as u32,
        )
        .map_err(|e| GatewayError::StateChange(e.message()))?;

        SetupDiCallClassInstaller(DIF_PROPERTYCHANGE, set.0, Some(data))
            .map_err(|e| GatewayError::StateChange(e.message()))?;
    }
    Ok(())
}

/// `true` unless the devnode reports the disabled problem code.
fn devnode_is_enabled(data: &SP_DEVINFO_DATA) -> Result<bool, GatewayError> {
    let mut status = CM_DEVNODE_STATUS_FLAGS(0);
    let mut problem = CM_PROB(0);

    // SAFETY: DevInst comes from a live enumeration entry and the out
    // pointers are valid for the duration of the call.
    let ret = unsafe { CM_Get_DevNode_Status(&mut status, &mut problem, data.DevInst, 0) };
    if ret != CR_SUCCESS {
        return Err(GatewayError::Enumerate(format!(
            "CM_Get_DevNode_Status failed with CONFIGRET {:?}",
            ret
        )));
    }
    Ok(!(status.contains(DN_HAS_PROBLEM) && problem == CM_PROB_DISABLED))
}

// ── Device info set RAII wrapper ──────────────────────────────────────────────

/// Owns an `HDEVINFO` list and destroys it on drop.
struct DeviceInfoSet(HDEVINFO);

impl DeviceInfoSet {
    /// Opens the list of all present devices across every class.
    fn all_present() -> windows::core::Result<Self> {
        // SAFETY: no class GUID and no enumerator filter; the returned
        // handle is owned by the wrapper.
        let handle = unsafe {
            SetupDiGetClassDevsW(None, PCWSTR::null(), None, DIGCF_ALLCLASSES | DIGCF_PRESENT)
        }?;
        Ok(Self(handle))
    }

    /// Iterates the devnodes in the list.
    fn entries(&self) -> impl Iterator<Item = windows::core::Result<SP_DEVINFO_DATA>> + '_ {
        let mut index = 0u32;
        let mut done = false;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let mut data = SP_DEVINFO_DATA {
                cbSize: std::mem::size_of::<SP_DEVINFO_DATA>() as u32,
                ..Default::default()
            };
            // SAFETY: cbSize is set per the API contract and the list
            // handle outlives the iterator (tied by the `'_` borrow).
            let result = unsafe { SetupDiEnumDeviceInfo(self.0, index, &mut data) };
            index += 1;
            match result {
                Ok(()) => Some(Ok(data)),
                Err(e) if e.code() == ERROR_NO_MORE_ITEMS.to_hresult() => {
                    done = true;
                    None
                }
                Err(e) => {
                    done = true;
                    Some(Err(e))
                }
            }
        })
    }

    /// Friendly name with a fallback to the device description.
    fn display_name(&self, data: &SP_DEVINFO_DATA) -> Option<String> {
        self.registry_string(data, SPDRP_FRIENDLYNAME)
            .or_else(|| self.registry_string(data, SPDRP_DEVICEDESC))
    }

    /// Reads a REG_SZ device registry property as a Rust string.
    fn registry_string(
        &self,
        data: &SP_DEVINFO_DATA,
        property: SETUP_DI_REGISTRY_PROPERTY,
    ) -> Option<String> {
        let mut required = 0u32;
        // SAFETY: size query with a null buffer; the call fails with
        // ERROR_INSUFFICIENT_BUFFER while still reporting the size.
        let _ = unsafe {
            SetupDiGetDeviceRegistryPropertyW(self.0, data, property, None, None, Some(&mut required))
        };
        if required == 0 {
            return None;
        }

        let mut buf = vec![0u8; required as usize];
        // SAFETY: the buffer was sized by the query above.
        unsafe {
            SetupDiGetDeviceRegistryPropertyW(
                self.0,
                data,
                property,
                None,
                Some(buf.as_mut_slice()),
                None,
            )
        }
        .ok()?;
        Some(utf16_bytes_to_string(&buf))
    }

    /// Reads the device instance identifier for the devnode.
    fn instance_id(&self, data: &SP_DEVINFO_DATA) -> windows::core::Result<String> {
        let mut required = 0u32;
        // SAFETY: size query with a null buffer, same pattern as above.
        let _ = unsafe { SetupDiGetDeviceInstanceIdW(self.0, data, None, Some(&mut required)) };

        let mut buf = vec![0u16; required as usize];
        // SAFETY: the buffer was sized by the query above.
        unsafe { SetupDiGetDeviceInstanceIdW(self.0, data, Some(buf.as_mut_slice()), None) }?;

        let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        Ok(String::from_utf16_lossy(&buf[..len]))
    }
}

impl Drop for DeviceInfoSet {
    fn drop(&mut self) {
        // SAFETY: the handle is owned by this wrapper and destroyed exactly
        // once.
        unsafe {
            let _ = SetupDiDestroyDeviceInfoList(self.0);
        }
    }
}

/// Converts a REG_SZ byte buffer (UTF-16LE) into a Rust string, stopping at
/// the first NUL.
fn utf16_bytes_to_string(bytes: &[u8]) -> String {
    let wide: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}
