pub mod contacts;
pub mod engine;
pub mod geometry;
pub mod surface;
pub mod transform;

pub use contacts::ContactId;
pub use engine::TransformSink;
pub use surface::GestureSurface;
pub use transform::TransformState;
