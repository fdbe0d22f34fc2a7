#[cfg(not(feature = "portable-atomic"))]
pub use std::sync::Arc;
#[cfg(feature = "portable-atomic")]
pub use portable_atomic_util::Arc;
