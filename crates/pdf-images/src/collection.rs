//! The ordered, identity-stable set of images waiting to be exported
//!
//! Every mutating operation returns a [`Snapshot`] so whoever renders the
//! collection can redraw from it. Operations naming an id that is no longer
//! present are no-ops rather than errors: ids arrive from a front end whose
//! view may lag behind the model.

use crate::types::*;
use std::collections::HashMap;

/// One image in the collection
#[derive(Debug, Clone)]
pub struct ImageEntry {
    id: ImageId,
    name: String,
    media_type: String,
    source: EncodedImage,
    rotation: Rotation,
}

impl ImageEntry {
    /// Create an entry with a fresh id and no rotation
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, source: EncodedImage) -> Self {
        Self {
            id: ImageId::fresh(),
            name: name.into(),
            media_type: media_type.into(),
            source,
            rotation: Rotation::None,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn source(&self) -> &EncodedImage {
        &self.source
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Geometry of the page this entry will produce
    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry::for_image(self.source.width, self.source.height, self.rotation)
    }

    fn view(&self) -> EntryView {
        EntryView {
            id: self.id,
            name: self.name.clone(),
            media_type: self.media_type.clone(),
            width: self.source.width,
            height: self.source.height,
            rotation: self.rotation,
        }
    }
}

/// Render-facing summary of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub id: ImageId,
    pub name: String,
    pub media_type: String,
    /// Natural width, before rotation
    pub width: u32,
    /// Natural height, before rotation
    pub height: u32,
    pub rotation: Rotation,
}

/// Ordered view of the collection after a mutation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Incremented whenever the collection actually changes
    pub revision: u64,
    pub entries: Vec<EntryView>,
}

impl Snapshot {
    pub fn ids(&self) -> Vec<ImageId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ImageCollection {
    entries: Vec<ImageEntry>,
    revision: u64,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn ids(&self) -> Vec<ImageId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            entries: self.entries.iter().map(ImageEntry::view).collect(),
        }
    }

    /// Add entries to the end, keeping their order. An entry whose id is
    /// already present is ignored.
    pub fn append(&mut self, entries: impl IntoIterator<Item = ImageEntry>) -> Snapshot {
        let before = self.entries.len();
        for entry in entries {
            if self.get(entry.id).is_some() {
                log::warn!("Ignoring duplicate entry {}", entry.id);
                continue;
            }
            self.entries.push(entry);
        }
        self.changed_if(self.entries.len() != before)
    }

    pub fn remove(&mut self, id: ImageId) -> Snapshot {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.changed_if(self.entries.len() != before)
    }

    /// Turn the entry a quarter turn clockwise
    pub fn rotate(&mut self, id: ImageId) -> Snapshot {
        let found = match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.rotation = entry.rotation.next();
                true
            }
            None => false,
        };
        self.changed_if(found)
    }

    /// Replace the order with `ids`, resolved against the current entries.
    ///
    /// Unknown ids are skipped and a repeated id is used once. Entries whose
    /// id is not in `ids` are dropped: the sequence describes the whole
    /// collection as the front end sees it.
    pub fn reorder(&mut self, ids: &[ImageId]) -> Snapshot {
        let before = self.ids();
        let mut by_id: HashMap<ImageId, ImageEntry> =
            self.entries.drain(..).map(|e| (e.id, e)).collect();

        self.entries = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        if !by_id.is_empty() {
            log::debug!("Reorder dropped {} entries not named in the new order", by_id.len());
        }
        let changed = self.ids() != before;
        self.changed_if(changed)
    }

    pub fn clear(&mut self) -> Snapshot {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        self.changed_if(changed)
    }

    fn changed_if(&mut self, changed: bool) -> Snapshot {
        if changed {
            self.revision += 1;
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, width: u32, height: u32) -> ImageEntry {
        let source = EncodedImage::new(Vec::<u8>::new(), image::ImageFormat::Png, width, height);
        ImageEntry::new(name, "image/png", source)
    }

    #[test]
    fn test_rotate_cycles_through_quarter_turns() {
        let mut collection = ImageCollection::new();
        let e = entry("a.png", 100, 50);
        let id = e.id();
        collection.append([e]);

        let degrees: Vec<u32> = (0..4)
            .map(|_| collection.rotate(id).entries[0].rotation.degrees())
            .collect();
        assert_eq!(degrees, vec![90, 180, 270, 0]);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut collection = ImageCollection::new();
        collection.append([entry("a.png", 10, 10)]);
        let revision = collection.revision();

        let missing = ImageId::fresh();
        assert_eq!(collection.rotate(missing).revision, revision);
        assert_eq!(collection.remove(missing).revision, revision);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_append_ignores_duplicate_ids() {
        let mut collection = ImageCollection::new();
        let e = entry("a.png", 10, 10);
        collection.append([e.clone()]);
        let snapshot = collection.append([e]);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_reorder_with_repeated_id_keeps_one() {
        let mut collection = ImageCollection::new();
        let (a, b) = (entry("a.png", 1, 1), entry("b.png", 1, 1));
        let (a_id, b_id) = (a.id(), b.id());
        collection.append([a, b]);

        let snapshot = collection.reorder(&[b_id, a_id, b_id]);
        assert_eq!(snapshot.ids(), vec![b_id, a_id]);
    }

    #[test]
    fn test_page_geometry_follows_rotation() {
        let mut collection = ImageCollection::new();
        let e = entry("wide.png", 100, 50);
        let id = e.id();
        collection.append([e]);

        collection.rotate(id);
        let geometry = collection.get(id).unwrap().page_geometry();
        assert_eq!((geometry.width, geometry.height), (50, 100));
        assert_eq!(geometry.orientation, Orientation::Portrait);
    }
}
