//! Inkform engine: body proportion editing and tattoo compositing
//!
//! Loads a humanoid mesh, classifies its body regions without a skeleton,
//! reshapes it with nine proportion knobs, and paints tattoo decals onto its
//! skin texture in UV space.
//!
//! # Modules
//!
//! - [`mesh`] - OBJ/MTL import and OBJ export
//! - [`body`] - Landmark classification from the vertex cloud
//! - [`deform`] - Proportion knobs and the deformer
//! - [`surface`] - Decals, compositing, hit-testing and undo
//! - [`texture`] - RGBA buffers, PNG I/O and stencil modifiers
//! - [`estimate`] - Price estimate for placed decals
//!
//! # Example
//! ```no_run
//! use inkform_engine::deform::{Knob, ModelDeformer, ProportionKnobs};
//! use inkform_engine::surface::{Decal, Surface};
//! use inkform_engine::texture::load_texture;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let model = inkform_engine::mesh::load(Path::new("human.obj"))?.corrected_z_up();
//!
//! let deformer = ModelDeformer::new(model.parts.clone());
//! let knobs = ProportionKnobs::default().with(Knob::LegLength, 1.2);
//! let parts = deformer.deformed_parts(&knobs);
//!
//! let mut surface = Surface::new();
//! surface.configure(model.material.diffuse_map.clone(), 1024, 1024);
//! let rose = Arc::new(load_texture(Path::new("rose.png"))?);
//! surface.add_decal(Decal::new(rose, 0.4, 0.3)?.with_uniform_scale(0.2)?);
//! let texture = surface.composited();
//! # let _ = (parts, texture);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod body;
pub mod deform;
pub mod estimate;
pub mod mesh;
pub mod surface;
pub mod texture;

// Re-export commonly used items
pub use body::{BodyLandmarks, QuantileClassifier, RegionClassifier};
pub use deform::{Knob, ModelDeformer, ProportionKnobs, deform};
pub use estimate::{Estimate, EstimateRow, estimate};
pub use mesh::{ImportError, LoadedModel, MeshPart};
pub use surface::{Decal, DecalError, DecalHistory, DecalParams, RemovedDecal, Surface};
pub use texture::{TextureBuffer, TextureError};
