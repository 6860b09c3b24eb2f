// Eigen-like aliases.
pub type Vector3d = nalgebra::Vector3::<f64>;
pub type Vector4d = nalgebra::Vector4::<f64>;
