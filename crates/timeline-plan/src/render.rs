//! Rendering collaborator.
//!
//! Decoding, compositing and encoding happen outside this crate. A renderer
//! receives a finished plan and reports success or failure; retrying an
//! export means composing a fresh plan and rendering again.

use anyhow::Result;

use crate::composer::CompositionPlan;

pub trait CompositionRenderer {
    /// Handle to the rendered output, e.g. a file path or library id
    type Output;

    fn render(&mut self, plan: &CompositionPlan) -> Result<Self::Output>;
}
