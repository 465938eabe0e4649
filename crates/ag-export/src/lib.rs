/// Persistence collaborator for asciigen.
///
/// Writes rendered art as txt/html/md, metadata sidecars, and project state.

pub mod metadata;
pub mod project;
pub mod writer;

pub use metadata::Metadata;
pub use project::Project;
pub use writer::{export, save_text, validate_output_path};
