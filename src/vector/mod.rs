// Vector index access: trait seam plus the Qdrant REST implementation.

pub mod qdrant;
pub mod traits;

pub use qdrant::QdrantIndex;
pub use traits::{FieldFilter, RecordKind, VectorIndex};
