//! Assemble an ordered set of images into a PDF, one zero-margin page per
//! image, with per-image quarter-turn rotation.

pub mod assemble;
pub mod collection;
pub mod constants;
pub mod decode;
pub mod export;
pub mod inspect;
mod options;
pub mod pdf;
pub mod rotate;
mod types;

pub use assemble::{DocumentWriter, assemble_pages};
pub use collection::{EntryView, ImageCollection, ImageEntry, Snapshot};
pub use decode::{ImageSource, decode_batch, decode_inputs, decode_paths, load_image};
pub use export::{ExportCoordinator, ExportError, ExportOutcome};
pub use inspect::{inspect_pdf, page_geometries};
pub use options::*;
pub use pdf::{PrintPdfWriter, save_document};
pub use rotate::render_rotated;
pub use types::*;
