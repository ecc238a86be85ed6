//! Model importer (OBJ + MTL -> named mesh parts)

mod export;
mod mtl;
mod obj;
mod types;

// Re-export public API
pub use export::write_obj;
pub use obj::load;
pub use types::{DEFAULT_DIFFUSE, ImportError, LoadedModel, Material, MeshPart};
