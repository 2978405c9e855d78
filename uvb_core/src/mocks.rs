//! Scripted collaborators for driving the meter without hardware.
//!
//! Every mock is a cheap handle: clones share state, so a test can keep one clone for
//! inspection and box another into the meter.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use uvb_traits::{Accelerometer, Adc, ButtonState, Buttons, HwResult, PowerControl, Store};

use crate::readout::{Display, Readout};

#[derive(Debug, Default)]
struct AdcInner {
    connected: bool,
    steady: i16,
    queue: VecDeque<i16>,
    latched: i16,
    volts_per_count: f32,
    requests: u64,
    reads: u64,
    probes: u64,
}

/// ADC with the same one-deep pipeline as the real part: each request latches the next
/// scripted count, each read returns the latched one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAdc {
    inner: Rc<RefCell<AdcInner>>,
}

impl ScriptedAdc {
    /// Connected ADC converting every request to `count`.
    pub fn constant(count: i16, volts_per_count: f32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AdcInner {
                connected: true,
                steady: count,
                volts_per_count,
                ..AdcInner::default()
            })),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.inner.borrow_mut().connected = connected;
    }

    pub fn set_count(&self, count: i16) {
        self.inner.borrow_mut().steady = count;
    }

    /// Value sitting in the pipeline before the first request.
    pub fn set_stale(&self, count: i16) {
        self.inner.borrow_mut().latched = count;
    }

    /// Counts consumed by the next requests before falling back to the steady count.
    pub fn push_counts(&self, counts: impl IntoIterator<Item = i16>) {
        self.inner.borrow_mut().queue.extend(counts);
    }

    pub fn requests(&self) -> u64 {
        self.inner.borrow().requests
    }

    pub fn reads(&self) -> u64 {
        self.inner.borrow().reads
    }

    /// Number of connectivity probes.
    pub fn probes(&self) -> u64 {
        self.inner.borrow().probes
    }
}

impl Adc for ScriptedAdc {
    fn is_connected(&mut self) -> bool {
        let mut s = self.inner.borrow_mut();
        s.probes += 1;
        s.connected
    }

    fn request_conversion(&mut self) {
        let mut s = self.inner.borrow_mut();
        s.requests += 1;
        let next = s.queue.pop_front().unwrap_or(s.steady);
        s.latched = next;
    }

    fn read_last_result(&mut self) -> i16 {
        let mut s = self.inner.borrow_mut();
        s.reads += 1;
        s.latched
    }

    fn volts_per_count(&self) -> f32 {
        self.inner.borrow().volts_per_count
    }
}

#[derive(Debug, Default)]
struct ImuInner {
    steady: [f32; 3],
    queue: VecDeque<[f32; 3]>,
}

/// Accelerometer returning queued samples, then a steady vector.
#[derive(Debug, Clone, Default)]
pub struct ScriptedImu {
    inner: Rc<RefCell<ImuInner>>,
}

impl ScriptedImu {
    /// Lying flat: 1 g on z.
    pub fn still() -> Self {
        Self::steady([0.0, 0.0, 1.0])
    }

    pub fn steady(accel: [f32; 3]) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ImuInner {
                steady: accel,
                queue: VecDeque::new(),
            })),
        }
    }

    pub fn push(&self, accel: [f32; 3]) {
        self.inner.borrow_mut().queue.push_back(accel);
    }

    pub fn set_steady(&self, accel: [f32; 3]) {
        self.inner.borrow_mut().steady = accel;
    }
}

impl Accelerometer for ScriptedImu {
    fn read_accel(&mut self) -> [f32; 3] {
        let mut s = self.inner.borrow_mut();
        let steady = s.steady;
        s.queue.pop_front().unwrap_or(steady)
    }
}

#[derive(Debug, Default)]
struct ButtonsInner {
    queue: VecDeque<ButtonState>,
    polls: u64,
}

/// Buttons returning queued states, then all released.
#[derive(Debug, Clone, Default)]
pub struct ScriptedButtons {
    inner: Rc<RefCell<ButtonsInner>>,
}

impl ScriptedButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, state: ButtonState) {
        self.inner.borrow_mut().queue.push_back(state);
    }

    pub fn polls(&self) -> u64 {
        self.inner.borrow().polls
    }
}

impl Buttons for ScriptedButtons {
    fn poll(&mut self) -> ButtonState {
        let mut s = self.inner.borrow_mut();
        s.polls += 1;
        s.queue.pop_front().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct DisplayInner {
    frames: Vec<Readout>,
    messages: Vec<String>,
    fail: bool,
}

/// Display that records every frame.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    inner: Rc<RefCell<DisplayInner>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Readout> {
        self.inner.borrow().frames.clone()
    }

    pub fn last(&self) -> Option<Readout> {
        self.inner.borrow().frames.last().copied()
    }

    pub fn messages(&self) -> Vec<String> {
        self.inner.borrow().messages.clone()
    }

    /// Make every subsequent render fail (frames are still recorded).
    pub fn fail_renders(&self) {
        self.inner.borrow_mut().fail = true;
    }
}

impl Display for RecordingDisplay {
    fn render(&mut self, readout: &Readout) -> HwResult<()> {
        let mut s = self.inner.borrow_mut();
        s.frames.push(*readout);
        if s.fail {
            return Err(Box::new(std::io::Error::other("display bus glitch")));
        }
        Ok(())
    }

    fn message(&mut self, text: &str) -> HwResult<()> {
        self.inner.borrow_mut().messages.push(text.to_string());
        Ok(())
    }
}

/// Power switch counting power-off requests.
#[derive(Debug, Clone, Default)]
pub struct RecordingPower {
    calls: Rc<RefCell<u32>>,
}

impl RecordingPower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        *self.calls.borrow()
    }
}

impl PowerControl for RecordingPower {
    fn power_off(&mut self) -> HwResult<()> {
        *self.calls.borrow_mut() += 1;
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, f32>>>,
    fail_writes: Rc<RefCell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: f32) -> Self {
        let s = Self::new();
        s.values.borrow_mut().insert(key.to_string(), value);
        s
    }

    pub fn get(&self, key: &str) -> Option<f32> {
        self.values.borrow().get(key).copied()
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.borrow_mut() = true;
    }
}

impl Store for MemoryStore {
    fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.get(key).unwrap_or(default)
    }

    fn put_f32(&mut self, key: &str, value: f32) -> HwResult<()> {
        if *self.fail_writes.borrow() {
            return Err(Box::new(std::io::Error::other("store write refused")));
        }
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}
