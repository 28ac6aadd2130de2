//! Lock-free parameter storage shared between control and audio threads.
//!
//! [`ParamStore`] holds one [`AtomicParam`] per descriptor. The control
//! thread (CLI, patch loader, UI) calls [`ParamStore::set`]; the audio thread
//! reads through the [`ParamSource`] trait. Every value is an `f32`
//! bit-cast into an `AtomicU32`, so reads and writes never lock or allocate.
//!
//! Parameters are independent: there is no atomicity across several values.
//! A reader may observe some of a batch of writes and not others.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::param_info::{ParamDescriptor, ParamId};

/// Read-only access to a parameter set by index.
///
/// This is the only parameter interface the synthesis engine consumes.
/// Implementations must be wait-free: no locking, no allocation.
pub trait ParamSource {
    /// Number of parameters available.
    fn param_count(&self) -> usize;

    /// Current value of parameter `index`, or `0.0` when out of range.
    fn value(&self, index: usize) -> f32;
}

impl ParamSource for [f32] {
    fn param_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn value(&self, index: usize) -> f32 {
        self.get(index).copied().unwrap_or(0.0)
    }
}

impl<const N: usize> ParamSource for [f32; N] {
    fn param_count(&self) -> usize {
        N
    }

    #[inline]
    fn value(&self, index: usize) -> f32 {
        self.as_slice().value(index)
    }
}

impl<T: ParamSource + ?Sized> ParamSource for &T {
    fn param_count(&self) -> usize {
        (**self).param_count()
    }

    #[inline]
    fn value(&self, index: usize) -> f32 {
        (**self).value(index)
    }
}

/// A single thread-safe parameter using a bit-cast `f32`.
///
/// Writes are clamped (and rounded when stepped) by the descriptor.
#[derive(Debug)]
pub struct AtomicParam {
    value: AtomicU32,
    descriptor: ParamDescriptor,
}

impl AtomicParam {
    /// Create a parameter holding the descriptor's default.
    pub fn new(descriptor: ParamDescriptor) -> Self {
        Self {
            value: AtomicU32::new(descriptor.quantize(descriptor.default).to_bits()),
            descriptor,
        }
    }

    /// Set the parameter value (control thread).
    #[inline]
    pub fn set(&self, value: f32) {
        let quantized = self.descriptor.quantize(value);
        self.value.store(quantized.to_bits(), Ordering::Relaxed);
    }

    /// Get the current value (audio thread).
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Restore the descriptor default.
    pub fn reset(&self) {
        self.set(self.descriptor.default);
    }

    /// The descriptor this parameter was built from.
    pub fn descriptor(&self) -> &ParamDescriptor {
        &self.descriptor
    }
}

impl Clone for AtomicParam {
    fn clone(&self) -> Self {
        Self {
            value: AtomicU32::new(self.value.load(Ordering::Relaxed)),
            descriptor: self.descriptor,
        }
    }
}

/// A full parameter set built from a descriptor table.
///
/// `ParamStore` is `Sync`; share it between threads with `Arc`.
///
/// # Example
///
/// ```rust
/// use cyqnus_core::{ParamDescriptor, ParamId, ParamSource, ParamStore};
///
/// let store = ParamStore::new(&[
///     ParamDescriptor::level("Sustain", "Sus", 0.5).with_id(ParamId(103), "amp_sustain"),
/// ]);
/// store.set(0, 4.0);
/// assert_eq!(store.value(0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct ParamStore {
    params: Vec<AtomicParam>,
}

impl ParamStore {
    /// Build a store holding each descriptor's default.
    pub fn new(descriptors: &[ParamDescriptor]) -> Self {
        let params = descriptors.iter().copied().map(AtomicParam::new).collect();
        Self { params }
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if the store holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Write a value. Out-of-range indices are ignored.
    #[inline]
    pub fn set(&self, index: usize, value: f32) {
        if let Some(param) = self.params.get(index) {
            param.set(value);
        }
    }

    /// Read a value, `0.0` for out-of-range indices.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.params.get(index).map_or(0.0, AtomicParam::get)
    }

    /// Descriptor for `index`.
    pub fn descriptor(&self, index: usize) -> Option<&ParamDescriptor> {
        self.params.get(index).map(AtomicParam::descriptor)
    }

    /// Iterate over every descriptor in index order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.params.iter().map(AtomicParam::descriptor)
    }

    /// Index of the parameter with the given string ID.
    ///
    /// Linear scan; resolve names at setup, not per sample.
    pub fn index_of(&self, string_id: &str) -> Option<usize> {
        self.params
            .iter()
            .position(|p| p.descriptor.string_id == string_id)
    }

    /// Index of the parameter with the given numeric ID.
    pub fn index_of_id(&self, id: ParamId) -> Option<usize> {
        self.params.iter().position(|p| p.descriptor.id == id)
    }

    /// Set a parameter by string ID. Returns `false` if the ID is unknown.
    pub fn set_by_name(&self, string_id: &str, value: f32) -> bool {
        match self.index_of(string_id) {
            Some(index) => {
                self.set(index, value);
                true
            }
            None => false,
        }
    }

    /// Restore every parameter to its default.
    pub fn reset_to_defaults(&self) {
        for param in &self.params {
            param.reset();
        }
    }

    /// Copy all current values into a plain vector.
    pub fn snapshot(&self) -> Vec<f32> {
        self.params.iter().map(AtomicParam::get).collect()
    }
}

impl ParamSource for ParamStore {
    fn param_count(&self) -> usize {
        self.params.len()
    }

    #[inline]
    fn value(&self, index: usize) -> f32 {
        self.get(index)
    }
}
