//! Selected files and their transient preview handles.
//!
//! A selected file is an in-memory image that has not been uploaded yet. To
//! render a thumbnail, the owning form derives a preview handle from it; the
//! handle references a copy of the bytes held by a [`PreviewRegistry`] and
//! must be released exactly once, no later than when the selection changes
//! or the form is torn down.
//!
//! Handles are move-only values: [`PreviewRegistry::release`] consumes the
//! handle, so a double release or a dereference after release is rejected by
//! the compiler rather than caught at runtime. Forms do not call `release`
//! directly; they go through [`PreviewSlot`] / [`PreviewSet`], which release
//! the previous acquisition before deriving the next one and expose a single
//! teardown path.

use std::collections::HashMap;

use tracing::{debug, warn};

/// An image chosen by the user, held in memory until uploaded or discarded.
///
/// Owned exclusively by the form that selected it until cleared or replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    /// Original filename, as picked.
    pub file_name: String,
    /// MIME type sniffed from the bytes; `None` when the data is not a
    /// recognized image format. The server validates uploads authoritatively.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl SelectedFile {
    /// Wrap raw bytes, sniffing the content type from the image header.
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let content_type = image::guess_format(&data)
            .ok()
            .map(|format| format.to_mime_type().to_string());

        Self {
            file_name: file_name.into(),
            content_type,
            data,
        }
    }
}

/// Default cap on simultaneously live preview handles.
const DEFAULT_CAPACITY: usize = 256;

/// A move-only reference to a live preview.
///
/// Not `Clone`: the registry hands out exactly one handle per derivation and
/// takes it back by value on release.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    id: u64,
}

impl PreviewHandle {
    /// Stable identifier, usable as a rendering key.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Allocates and releases preview handles for selected files.
#[derive(Debug)]
pub struct PreviewRegistry {
    entries: HashMap<u64, Vec<u8>>,
    next_id: u64,
    capacity: usize,
    derived: u64,
    released: u64,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Registry with an explicit cap on live handles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 0,
            capacity,
            derived: 0,
            released: 0,
        }
    }

    /// Derive a preview handle for the given selection.
    ///
    /// Returns `None` when there is nothing to preview (`file` is `None`) and
    /// when the registry is at capacity; the form then renders without a
    /// thumbnail instead of failing.
    pub fn derive(&mut self, file: Option<&SelectedFile>) -> Option<PreviewHandle> {
        let file = file?;

        if self.entries.len() >= self.capacity {
            warn!(
                capacity = self.capacity,
                file = %file.file_name,
                "Preview capacity exhausted, rendering without thumbnail"
            );
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, file.data.clone());
        self.derived += 1;

        debug!(id, file = %file.file_name, "Derived preview handle");
        Some(PreviewHandle { id })
    }

    /// Release a handle, consuming it.
    pub fn release(&mut self, handle: PreviewHandle) {
        if self.entries.remove(&handle.id).is_some() {
            self.released += 1;
            debug!(id = handle.id, "Released preview handle");
        } else {
            // A handle from a different registry; nothing to free here.
            warn!(id = handle.id, "Released handle is unknown to this registry");
        }
    }

    /// Thumbnail bytes for a live handle.
    pub fn resolve(&self, handle: &PreviewHandle) -> Option<&[u8]> {
        self.entries.get(&handle.id).map(Vec::as_slice)
    }

    /// Number of currently live handles.
    pub fn live(&self) -> usize {
        self.entries.len()
    }

    /// Total handles derived over the registry's lifetime.
    pub fn derived(&self) -> u64 {
        self.derived
    }

    /// Total handles released over the registry's lifetime.
    pub fn released(&self) -> u64 {
        self.released
    }
}

impl Default for PreviewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the preview for a single-file selection.
///
/// Replacing the selection releases the previous handle before deriving the
/// next one; [`PreviewSlot::clear`] is the teardown path and runs the same
/// release.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    handle: Option<PreviewHandle>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the previewed selection. Releases the old handle first.
    pub fn replace(&mut self, registry: &mut PreviewRegistry, file: Option<&SelectedFile>) {
        if let Some(old) = self.handle.take() {
            registry.release(old);
        }
        self.handle = registry.derive(file);
    }

    /// Release the current handle, if any. Invoked on form teardown and when
    /// the selection is cleared.
    pub fn clear(&mut self, registry: &mut PreviewRegistry) {
        if let Some(old) = self.handle.take() {
            registry.release(old);
        }
    }

    pub fn handle(&self) -> Option<&PreviewHandle> {
        self.handle.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }
}

/// Owns the previews for a multi-file selection, element-wise.
#[derive(Debug, Default)]
pub struct PreviewSet {
    handles: Vec<PreviewHandle>,
}

impl PreviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the previewed selection set. All previous handles are released
    /// before any new one is derived.
    pub fn replace(&mut self, registry: &mut PreviewRegistry, files: &[SelectedFile]) {
        for old in self.handles.drain(..) {
            registry.release(old);
        }
        self.handles = files
            .iter()
            .filter_map(|file| registry.derive(Some(file)))
            .collect();
    }

    /// Release all current handles. Invoked on form teardown.
    pub fn clear(&mut self, registry: &mut PreviewRegistry) {
        for old in self.handles.drain(..) {
            registry.release(old);
        }
    }

    pub fn handles(&self) -> &[PreviewHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_file(name: &str) -> SelectedFile {
        // Minimal JPEG magic so format sniffing succeeds.
        SelectedFile::new(name, vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
    }

    #[test]
    fn test_sniffs_jpeg_content_type() {
        let file = jpeg_file("shoe.jpg");
        assert_eq!(file.content_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_unrecognized_bytes_have_no_content_type() {
        let file = SelectedFile::new("notes.txt", b"plain text".to_vec());
        assert_eq!(file.content_type, None);
    }

    #[test]
    fn test_derive_none_for_empty_selection() {
        let mut registry = PreviewRegistry::new();
        assert!(registry.derive(None).is_none());
        assert_eq!(registry.derived(), 0);
    }

    #[test]
    fn test_derive_resolve_release() {
        let mut registry = PreviewRegistry::new();
        let file = jpeg_file("shoe.jpg");

        let handle = registry.derive(Some(&file)).unwrap();
        assert_eq!(registry.resolve(&handle), Some(file.data.as_slice()));
        assert_eq!(registry.live(), 1);

        registry.release(handle);
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.derived(), 1);
        assert_eq!(registry.released(), 1);
    }

    #[test]
    fn test_slot_replacement_releases_previous_handle() {
        let mut registry = PreviewRegistry::new();
        let mut slot = PreviewSlot::new();

        slot.replace(&mut registry, Some(&jpeg_file("a.jpg")));
        slot.replace(&mut registry, Some(&jpeg_file("b.jpg")));
        slot.replace(&mut registry, None);

        assert_eq!(registry.derived(), 2);
        assert_eq!(registry.released(), 2);
        assert_eq!(registry.live(), 0);
        assert!(slot.is_empty());
    }

    #[test]
    fn test_slot_clear_is_the_teardown_path() {
        let mut registry = PreviewRegistry::new();
        let mut slot = PreviewSlot::new();

        slot.replace(&mut registry, Some(&jpeg_file("a.jpg")));
        slot.clear(&mut registry);
        // Second clear finds no handle; nothing is released twice.
        slot.clear(&mut registry);

        assert_eq!(registry.derived(), 1);
        assert_eq!(registry.released(), 1);
    }

    #[test]
    fn test_set_replacement_is_element_wise() {
        let mut registry = PreviewRegistry::new();
        let mut set = PreviewSet::new();

        set.replace(
            &mut registry,
            &[jpeg_file("a.jpg"), jpeg_file("b.jpg"), jpeg_file("c.jpg")],
        );
        assert_eq!(set.len(), 3);

        set.replace(&mut registry, &[jpeg_file("d.jpg")]);
        assert_eq!(set.len(), 1);
        assert_eq!(registry.derived(), 4);
        assert_eq!(registry.released(), 3);
        assert_eq!(registry.live(), 1);

        set.clear(&mut registry);
        assert_eq!(registry.live(), 0);
    }

    #[test]
    fn test_capacity_exhaustion_degrades_to_no_preview() {
        let mut registry = PreviewRegistry::with_capacity(1);
        let file = jpeg_file("a.jpg");

        let first = registry.derive(Some(&file));
        assert!(first.is_some());
        assert!(registry.derive(Some(&file)).is_none());

        registry.release(first.unwrap());
        assert!(registry.derive(Some(&file)).is_some());
    }
}
