/// Context passed to graph nodes during rendering
///
/// Contains information about how to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }

    /// Seconds per sample, the integration step for one tick.
    #[inline]
    pub fn sample_time(&self) -> f32 {
        1.0 / self.sample_rate
    }
}

/// Trait for nodes that support parameter modulation
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32);
}

/// Core trait for block-rendering graph nodes
///
/// Nodes render one block of samples at a time and respond to gate events.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Gate high.
    ///
    /// Default implementation does nothing.
    fn note_on(&mut self, _ctx: &RenderCtx) {
        // Default: do nothing
    }

    /// Gate low.
    ///
    /// Default implementation does nothing.
    fn note_off(&mut self, _ctx: &RenderCtx) {
        // Default: do nothing
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }
}
