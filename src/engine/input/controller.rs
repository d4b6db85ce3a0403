// Controller: aggregates devices into two axes and indexed fire actions

use super::action::ActionRef;
use super::device::{same_device, Code, DeviceListener, DeviceListenerRef, DeviceRef};
use super::listener::ListenerList;
use super::{ControlError, Result};
use crate::core::math::is_active;
use glam::DVec2;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Integer identity of one discrete "button" concept (jump, attack, ...)
pub type FireIndex = i32;

/// Receives device state changes translated to controller-level names
pub trait DeviceControllerListener {
    fn on_device_changed(&self, device_name: &str, code: Code, repr: char, active: bool);
}

impl<F: Fn(&str, Code, char, bool)> DeviceControllerListener for F {
    fn on_device_changed(&self, device_name: &str, code: Code, repr: char, active: bool) {
        self(device_name, code, repr, active)
    }
}

pub type ControllerListenerRef = Rc<dyn DeviceControllerListener>;

/// A controller shared between game states and the delegates reading it
pub type SharedController = Rc<RefCell<dyn DeviceController>>;

/// The control surface gameplay code reads
///
/// Queries about state that was never registered return the neutral value
/// (`0.0`, `false`, `None`) instead of failing.
pub trait DeviceController {
    /// Add a horizontal axis contribution. The same pair twice counts twice.
    fn add_horizontal(&mut self, device: DeviceRef, action: ActionRef) -> Result<()>;

    /// Add a vertical axis contribution. The same pair twice counts twice.
    fn add_vertical(&mut self, device: DeviceRef, action: ActionRef) -> Result<()>;

    /// Bind an action to a fire index and record `name` as a device name for `code`
    fn add_fire(
        &mut self,
        name: &str,
        device: DeviceRef,
        index: FireIndex,
        code: Code,
        action: ActionRef,
    ) -> Result<()>;

    /// Show or hide every registered device
    fn set_visible(&mut self, visible: bool);

    /// Mask a device's axis contributions by device name
    fn set_disabled(&mut self, device_name: &str, horizontal: bool, vertical: bool);

    /// Horizontal sum computed by the last `update`
    fn horizontal_direction(&self) -> f64;

    /// Vertical sum computed by the last `update`
    fn vertical_direction(&self) -> f64;

    /// Both axes as a vector
    fn direction(&self) -> DVec2 {
        DVec2::new(self.horizontal_direction(), self.vertical_direction())
    }

    /// Check if any fire index is active right now
    fn is_any_fired(&self) -> bool;

    /// The first active fire index, in registration order
    fn fired(&self) -> Option<FireIndex>;

    /// Check if a fire index is active right now
    fn is_fired(&self, index: FireIndex) -> bool;

    /// Edge-triggered read of a fire index
    ///
    /// Returns true once per press; the index re-arms after an `update` that
    /// sees all its actions released. Call at most once per frame per index.
    fn is_fired_once(&mut self, index: FireIndex) -> bool;

    /// Poll devices, recompute axes, re-arm released fire latches
    fn update(&mut self, dt: f32) -> Result<()>;

    fn add_listener(&mut self, listener: ControllerListenerRef);

    fn remove_listener(&mut self, listener: &ControllerListenerRef);

    /// Forget every registration, keeping controller listeners
    fn clear(&mut self);
}

/// Stable handle of a registered device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(usize);

impl DeviceId {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AxisMask {
    horizontal: bool,
    vertical: bool,
}

struct DeviceSlot {
    device: DeviceRef,
    name: String,
    relay: DeviceListenerRef,
}

struct Contribution {
    device: DeviceId,
    action: ActionRef,
}

struct FireSlot {
    index: FireIndex,
    actions: Vec<ActionRef>,
    /// Set by `is_fired_once`, cleared by `update` once every action is released
    latched: bool,
}

impl FireSlot {
    fn is_active(&self) -> bool {
        self.actions.iter().any(|a| is_active(a.action()))
    }
}

/// State shared between the controller and its per-device relays
#[derive(Default)]
struct RelayHub {
    code_names: RefCell<HashMap<Code, Vec<String>>>,
    listeners: ListenerList<dyn DeviceControllerListener>,
}

impl RelayHub {
    /// The `index`-th device name registered for `code`
    fn device_name(&self, code: Code, index: i32) -> Option<String> {
        let names = self.code_names.borrow();
        let i = usize::try_from(index).ok()?;
        names.get(&code)?.get(i).cloned()
    }
}

/// Listener attached once to each distinct device
struct DeviceRelay {
    device_name: String,
    hub: Rc<RelayHub>,
}

impl DeviceListener for DeviceRelay {
    fn on_state_changed(&self, index: i32, code: Code, repr: char, active: bool) {
        let name = self.hub.device_name(code, index).unwrap_or_else(|| {
            log::warn!(
                "No device name #{} for code {} on {}, reporting the device itself",
                index,
                code,
                self.device_name
            );
            self.device_name.clone()
        });
        self.hub
            .listeners
            .notify(|l| l.on_device_changed(&name, code, repr, active));
    }
}

/// The concrete aggregator
///
/// Devices are kept in a dense arena and polled once per `update` no matter
/// how many actions reference them. Fire slots are kept in registration
/// order, which decides the answer of `fired`.
pub struct ControllerModel {
    devices: Vec<DeviceSlot>,
    horizontal: Vec<Contribution>,
    vertical: Vec<Contribution>,
    fires: Vec<FireSlot>,
    fire_lookup: HashMap<FireIndex, usize>,
    disabled: HashMap<String, AxisMask>,
    hub: Rc<RelayHub>,
    horizontal_direction: f64,
    vertical_direction: f64,
}

impl ControllerModel {
    /// Create an empty controller
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            horizontal: Vec::new(),
            vertical: Vec::new(),
            fires: Vec::new(),
            fire_lookup: HashMap::new(),
            disabled: HashMap::new(),
            hub: Rc::new(RelayHub::default()),
            horizontal_direction: 0.0,
            vertical_direction: 0.0,
        }
    }

    /// Create an empty controller behind a shared handle
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Find or register a device, attaching the relay on first sight
    fn register_device(&mut self, device: DeviceRef) -> Result<DeviceId> {
        if let Some(pos) = self
            .devices
            .iter()
            .position(|slot| same_device(&slot.device, &device))
        {
            return Ok(DeviceId(pos));
        }

        let name = device.name().to_string();
        if name.is_empty() {
            return Err(ControlError::UnnamedDevice);
        }

        let relay: DeviceListenerRef = Rc::new(DeviceRelay {
            device_name: name.clone(),
            hub: self.hub.clone(),
        });
        device.add_listener(relay.clone());

        let id = DeviceId(self.devices.len());
        log::debug!("Registered input device '{}' as #{}", name, id.0);
        self.devices.push(DeviceSlot {
            device,
            name,
            relay,
        });
        Ok(id)
    }

    /// Look up the handle of an already registered device
    pub fn device_id(&self, device: &DeviceRef) -> Option<DeviceId> {
        self.devices
            .iter()
            .position(|slot| same_device(&slot.device, device))
            .map(DeviceId)
    }

    /// Name of a registered device
    pub fn device_name(&self, id: DeviceId) -> Option<&str> {
        self.devices.get(id.0).map(|slot| slot.name.as_str())
    }

    /// Number of distinct registered devices
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Registered fire indices, in registration order
    pub fn fire_indices(&self) -> Vec<FireIndex> {
        self.fires.iter().map(|slot| slot.index).collect()
    }

    /// Check if a device name is masked on either axis
    pub fn is_disabled(&self, device_name: &str) -> (bool, bool) {
        self.disabled
            .get(device_name)
            .map(|mask| (mask.horizontal, mask.vertical))
            .unwrap_or((false, false))
    }

    /// Take every relay off its device and forget the devices
    fn detach_devices(&mut self) {
        for slot in self.devices.drain(..) {
            slot.device.remove_listener(&slot.relay);
        }
    }

    fn fire_slot(&self, index: FireIndex) -> Option<&FireSlot> {
        self.fire_lookup.get(&index).map(|&pos| &self.fires[pos])
    }

    fn masked_sum(&self, contributions: &[Contribution], masked: fn(&AxisMask) -> bool) -> f64 {
        contributions
            .iter()
            .filter(|c| {
                let name = &self.devices[c.device.0].name;
                !self.disabled.get(name).map(masked).unwrap_or(false)
            })
            .map(|c| c.action.action())
            .sum()
    }
}

impl Default for ControllerModel {
    fn default() -> Self {
        Self::new()
    }
}

// Devices usually outlive the controllers built over them
impl Drop for ControllerModel {
    fn drop(&mut self) {
        self.detach_devices();
    }
}

impl DeviceController for ControllerModel {
    fn add_horizontal(&mut self, device: DeviceRef, action: ActionRef) -> Result<()> {
        let device = self.register_device(device)?;
        self.horizontal.push(Contribution { device, action });
        Ok(())
    }

    fn add_vertical(&mut self, device: DeviceRef, action: ActionRef) -> Result<()> {
        let device = self.register_device(device)?;
        self.vertical.push(Contribution { device, action });
        Ok(())
    }

    fn add_fire(
        &mut self,
        name: &str,
        device: DeviceRef,
        index: FireIndex,
        code: Code,
        action: ActionRef,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(ControlError::UnnamedFire(index));
        }
        self.register_device(device)?;

        self.hub
            .code_names
            .borrow_mut()
            .entry(code)
            .or_default()
            .push(name.to_string());

        match self.fire_lookup.get(&index) {
            Some(&pos) => self.fires[pos].actions.push(action),
            None => {
                log::debug!("New fire index {} bound to code {} ({})", index, code, name);
                self.fire_lookup.insert(index, self.fires.len());
                self.fires.push(FireSlot {
                    index,
                    actions: vec![action],
                    latched: false,
                });
            }
        }
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        for slot in &self.devices {
            slot.device.set_visible(visible);
        }
    }

    fn set_disabled(&mut self, device_name: &str, horizontal: bool, vertical: bool) {
        if horizontal || vertical {
            self.disabled.insert(
                device_name.to_string(),
                AxisMask {
                    horizontal,
                    vertical,
                },
            );
        } else {
            self.disabled.remove(device_name);
        }
    }

    fn horizontal_direction(&self) -> f64 {
        self.horizontal_direction
    }

    fn vertical_direction(&self) -> f64 {
        self.vertical_direction
    }

    fn is_any_fired(&self) -> bool {
        self.fires.iter().any(FireSlot::is_active)
    }

    fn fired(&self) -> Option<FireIndex> {
        self.fires
            .iter()
            .find(|slot| slot.is_active())
            .map(|slot| slot.index)
    }

    fn is_fired(&self, index: FireIndex) -> bool {
        self.fire_slot(index).is_some_and(FireSlot::is_active)
    }

    fn is_fired_once(&mut self, index: FireIndex) -> bool {
        let Some(&pos) = self.fire_lookup.get(&index) else {
            return false;
        };
        let slot = &mut self.fires[pos];
        if slot.latched || !slot.is_active() {
            return false;
        }
        slot.latched = true;
        true
    }

    fn update(&mut self, dt: f32) -> Result<()> {
        for slot in &self.devices {
            slot.device
                .update(dt)
                .map_err(|source| ControlError::DeviceUpdate {
                    device: slot.name.clone(),
                    source,
                })?;
        }

        self.horizontal_direction = self.masked_sum(&self.horizontal, |m| m.horizontal);
        self.vertical_direction = self.masked_sum(&self.vertical, |m| m.vertical);

        for slot in self.fires.iter_mut().filter(|slot| slot.latched) {
            if !slot.is_active() {
                slot.latched = false;
            }
        }

        log::trace!(
            "Controller update: h={:.3} v={:.3}",
            self.horizontal_direction,
            self.vertical_direction
        );
        Ok(())
    }

    fn add_listener(&mut self, listener: ControllerListenerRef) {
        self.hub.listeners.add(listener);
    }

    fn remove_listener(&mut self, listener: &ControllerListenerRef) {
        self.hub.listeners.remove(listener);
    }

    fn clear(&mut self) {
        self.detach_devices();
        self.horizontal.clear();
        self.vertical.clear();
        self.fires.clear();
        self.fire_lookup.clear();
        self.disabled.clear();
        self.hub.code_names.borrow_mut().clear();
        self.horizontal_direction = 0.0;
        self.vertical_direction = 0.0;
        log::debug!("Controller cleared");
    }
}
