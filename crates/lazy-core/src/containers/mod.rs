//! Concrete containers
//!
//! Dense containers are assignment targets (`DenseMatrixMut`/`DenseVectorMut`);
//! compressed ones rebuild their storage on assignment.

mod compressed_matrix;
mod compressed_vector;
mod custom_matrix;
mod dynamic_matrix;
mod dynamic_vector;
mod static_matrix;
mod static_vector;

pub use compressed_matrix::CompressedMatrix;
pub use compressed_vector::CompressedVector;
pub use custom_matrix::CustomMatrix;
pub use dynamic_matrix::DynamicMatrix;
pub use dynamic_vector::DynamicVector;
pub use static_matrix::StaticMatrix;
pub use static_vector::StaticVector;
