//! Integration test: loader library errors
//!
//! Failures to open a loader, or to find its entry point, name the library
//! they were reported for.

use vkscope::{Loader, LoaderError};

#[test]
fn test_missing_library_error_names_the_path() {
    let path = "/nonexistent/vkscope/libvulkan.so.1";
    match Loader::from_path(path) {
        Err(LoaderError::Library(message)) => {
            assert!(message.starts_with(path), "message was {:?}", message);
        }
        other => panic!("expected LoaderError::Library, got {:?}", other.map(|l| l.origin().to_owned())),
    }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn test_library_without_entry_point_reports_missing_symbol() {
    match Loader::from_path("libc.so.6") {
        Err(LoaderError::MissingSymbol { library, symbol }) => {
            assert_eq!(library, "libc.so.6");
            assert_eq!(symbol, "vkGetInstanceProcAddr");
        }
        other => panic!("expected LoaderError::MissingSymbol, got {:?}", other.map(|l| l.origin().to_owned())),
    }
}

#[test]
fn test_proc_addr_loader_has_placeholder_origin() {
    // SAFETY: the stub resolves entry points like a loader and lives for the
    // whole process.
    let loader = unsafe { Loader::from_proc_addr(vkscope_stub_icd::get_instance_proc_addr()) };
    assert_eq!(loader.origin(), "<proc addr>");
}
