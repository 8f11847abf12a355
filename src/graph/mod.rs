//! Block-rendering adapters around the spring engine.
//!
//! Graph nodes wrap the per-sample engine with what a host needs: block
//! rendering at a known sample rate, gate events for resets, parameter
//! modulation, and (with the `rtrb` feature) lock-free control from another
//! thread.

/// Core traits shared by all graph nodes.
pub mod node;
/// Spring engine as a graph node.
pub mod spring;

pub use node::{GraphNode, Modulatable, RenderCtx};
pub use spring::{SpringNode, SpringOutput};
#[cfg(feature = "rtrb")]
pub use spring::{SharedSpringNode, SpringHandle, SpringMessage};
