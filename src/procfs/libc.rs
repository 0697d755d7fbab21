use std::collections::HashSet;
use std::ffi::CStr;
use std::io;
use std::ptr;

use libc::{freeifaddrs, getifaddrs, ifaddrs, sockaddr_in6, AF_INET, AF_INET6, IFF_LOOPBACK};

use crate::procfs::ProcfsError;

/// Returns the names of the network interfaces whose traffic is monitored.
///
/// Loopback interfaces are excluded, and an interface must have at least an IPv4 address, or an
/// IPv6 address which is not link-local.
pub fn eligible_interfaces() -> Result<HashSet<String>, ProcfsError> {
    let mut addrs: *mut ifaddrs = ptr::null_mut();

    let return_value = unsafe { getifaddrs(&mut addrs) };

    if return_value != 0 {
        return Err(ProcfsError::InterfaceListError(io::Error::last_os_error()));
    }

    let mut interfaces = HashSet::new();
    let mut cursor = addrs;

    while !cursor.is_null() {
        // Safety: `cursor` is a non-null node of the list returned by getifaddrs, which is not
        // freed before the end of this function
        let ifa = unsafe { &*cursor };

        if !ifa.ifa_name.is_null() && is_eligible(ifa) {
            let name = unsafe { CStr::from_ptr(ifa.ifa_name) };
            interfaces.insert(name.to_string_lossy().into_owned());
        }

        cursor = ifa.ifa_next;
    }

    unsafe { freeifaddrs(addrs) };

    Ok(interfaces)
}

fn is_eligible(ifa: &ifaddrs) -> bool {
    if ifa.ifa_flags & IFF_LOOPBACK as u32 != 0 || ifa.ifa_addr.is_null() {
        return false;
    }

    let family = unsafe { (*ifa.ifa_addr).sa_family } as i32;

    match family {
        AF_INET => true,
        AF_INET6 => {
            let addr = unsafe { &*(ifa.ifa_addr as *const sockaddr_in6) };
            !is_ipv6_link_local(&addr.sin6_addr.s6_addr)
        }
        _ => false,
    }
}

/// Link-local IPv6 addresses are in `fe80::/10`
fn is_ipv6_link_local(octets: &[u8; 16]) -> bool {
    octets[0] == 0xfe && (octets[1] & 0xc0) == 0x80
}
