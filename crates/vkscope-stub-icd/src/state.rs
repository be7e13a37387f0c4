//! Per-thread driver state: what the stub advertises and what it was asked.

use std::cell::RefCell;
use std::collections::HashMap;

use ash::vk;

/// What the stub driver claims to implement.
#[derive(Debug, Clone)]
pub struct StubProfile {
    /// Packed version reported by `vkEnumerateInstanceVersion` and in device
    /// properties; core entry points newer than this are not handed out.
    pub api_version: u32,
    /// Instance extensions the driver supports.
    pub instance_extensions: Vec<&'static str>,
    /// Device extensions the driver supports.
    pub device_extensions: Vec<&'static str>,
    /// Entry points that are never handed out, whatever else holds.
    pub hidden: Vec<&'static str>,
    /// Entry points that fail with the given status.
    pub failures: Vec<(&'static str, vk::Result)>,
    pub physical_device_count: u32,
    /// How many times an extension enumeration answers `INCOMPLETE` before
    /// it lets a fetch succeed.
    pub incomplete_rounds: u32,
}

impl StubProfile {
    /// A driver for `api_version` with no extensions.
    pub fn core(api_version: u32) -> Self {
        Self {
            api_version,
            instance_extensions: Vec::new(),
            device_extensions: Vec::new(),
            hidden: Vec::new(),
            failures: Vec::new(),
            physical_device_count: 1,
            incomplete_rounds: 0,
        }
    }

    pub fn with_instance_extensions(mut self, names: &[&'static str]) -> Self {
        self.instance_extensions.extend_from_slice(names);
        self
    }

    pub fn with_device_extensions(mut self, names: &[&'static str]) -> Self {
        self.device_extensions.extend_from_slice(names);
        self
    }

    pub fn hide(mut self, name: &'static str) -> Self {
        self.hidden.push(name);
        self
    }

    pub fn fail(mut self, name: &'static str, result: vk::Result) -> Self {
        self.failures.push((name, result));
        self
    }

    pub fn with_physical_devices(mut self, count: u32) -> Self {
        self.physical_device_count = count;
        self
    }

    pub fn with_incomplete_rounds(mut self, rounds: u32) -> Self {
        self.incomplete_rounds = rounds;
        self
    }
}

impl Default for StubProfile {
    fn default() -> Self {
        Self::core(vk::API_VERSION_1_3)
    }
}

/// One recorded entry point invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: &'static str,
    /// Handle arguments in declaration order, then any created handles.
    pub args: Vec<u64>,
    /// `pAllocator` as an address, 0 for null.
    pub allocator: usize,
}

impl Call {
    /// The last handle argument: the object a destroy call destroyed, or
    /// the object a create call produced.
    pub fn handle(&self) -> u64 {
        self.args.last().copied().unwrap_or(0)
    }
}

#[derive(Debug)]
pub(crate) struct DriverState {
    pub profile: StubProfile,
    pub calls: Vec<Call>,
    pub violations: Vec<String>,
    /// Instance id -> enabled extensions.
    pub instances: HashMap<u64, Vec<String>>,
    /// Instance id -> physical device handles.
    pub physical_devices: HashMap<u64, Vec<vk::PhysicalDevice>>,
    /// Device id -> enabled extensions.
    pub devices: HashMap<u64, Vec<String>>,
    /// (device id, family, index) -> queue.
    pub queues: HashMap<(u64, u32, u32), vk::Queue>,
    pub incomplete_left: u32,
}

impl DriverState {
    fn new(profile: StubProfile) -> Self {
        Self {
            incomplete_left: profile.incomplete_rounds,
            profile,
            calls: Vec::new(),
            violations: Vec::new(),
            instances: HashMap::new(),
            physical_devices: HashMap::new(),
            devices: HashMap::new(),
            queues: HashMap::new(),
        }
    }

    pub fn record(&mut self, name: &'static str, args: &[u64], allocator: *const vk::AllocationCallbacks<'_>) {
        tracing::trace!(name, ?args, "stub call");
        self.calls.push(Call {
            name,
            args: args.to_vec(),
            allocator: allocator as usize,
        });
    }

    pub fn failure(&self, name: &str) -> Option<vk::Result> {
        self.profile
            .failures
            .iter()
            .find(|(failing, _)| *failing == name)
            .map(|(_, result)| *result)
    }

    pub fn violation(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.violations.push(message);
    }
}

thread_local! {
    static STATE: RefCell<Option<DriverState>> = const { RefCell::new(None) };
}

pub(crate) fn install(profile: StubProfile) {
    STATE.with(|state| *state.borrow_mut() = Some(DriverState::new(profile)));
}

pub(crate) fn uninstall() {
    STATE.with(|state| *state.borrow_mut() = None);
}

/// Run `f` against this thread's driver, or return `None` if none is
/// installed.
pub(crate) fn with<R>(f: impl FnOnce(&mut DriverState) -> R) -> Option<R> {
    STATE.with(|state| state.borrow_mut().as_mut().map(f))
}
