#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    dsp::coefficients::CoefficientModel,
    engine::{SpringEngine, SpringParam, TickInputs, TickOutputs},
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/*
Spring Node
===========

Wraps a `SpringEngine` so it renders blocks like any other node. The engine
ticks once per sample; the node picks one of its outputs to write into the
block.

    let mut node = SpringNode::new(FrequencyFriction::default())
        .output(SpringOutput::Velocity);
    node.set_knob(SpringParam::Friction, 0.5);
    node.render_block(&mut buffer, &ctx);


Gate as Reset
-------------

note_on raises the reset input to GATE_LEVEL and holds it there; note_off
drops it to 0. The engine's Schmitt trigger turns that level into a single
reset on the first sample after note_on, so holding a note does not keep
resetting the spring.

note_on also latches the edge. The next rendered sample sees GATE_LEVEL even
if note_off arrived before the block was rendered, so a gate pulse shorter
than one block still resets the spring.

For sample-accurate resets driven by an audio-rate signal use
`render_with_reset`, which reads the reset input from a buffer instead.


Modulation
----------

`apply_modulation(param, base, modulation)` sets the knob to `base` and
patches `modulation` in as the control's external signal. Most controls add
the signal to the knob; Position follows it exactly. The Offset switch has
no jack and takes `base + modulation` as its knob value.
*/

const GATE_LEVEL: f32 = 10.0;

/// Which engine output a node writes into its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpringOutput {
    Acceleration,
    Velocity,
    Position,
    Difference,
}

impl SpringOutput {
    #[inline]
    fn select(&self, outputs: &TickOutputs) -> f32 {
        match self {
            SpringOutput::Acceleration => outputs.acceleration,
            SpringOutput::Velocity => outputs.velocity,
            SpringOutput::Position => outputs.position,
            SpringOutput::Difference => outputs.difference,
        }
    }
}

pub struct SpringNode<M: CoefficientModel> {
    engine: SpringEngine<M>,
    inputs: TickInputs<M::Controls>,
    output: SpringOutput,
    gate: f32,
    /// Set by note_on, cleared once a sample has rendered with the gate high.
    pending_edge: bool,
    last: TickOutputs,
}

impl<M: CoefficientModel> SpringNode<M> {
    pub fn new(model: M) -> Self {
        Self::with_engine(SpringEngine::new(model))
    }

    pub fn with_engine(engine: SpringEngine<M>) -> Self {
        Self {
            engine,
            inputs: TickInputs::new(0.0),
            output: SpringOutput::Position,
            gate: 0.0,
            pending_edge: false,
            last: TickOutputs::default(),
        }
    }

    /// Select the rendered output (defaults to Position).
    pub fn output(mut self, output: SpringOutput) -> Self {
        self.output = output;
        self
    }

    pub fn set_knob(&mut self, param: SpringParam, value: f32) {
        self.inputs.set_knob(param, value);
    }

    pub fn set_signal(&mut self, param: SpringParam, signal: Option<f32>) {
        self.inputs.set_signal(param, signal);
    }

    pub fn inputs(&self) -> &TickInputs<M::Controls> {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut TickInputs<M::Controls> {
        &mut self.inputs
    }

    pub fn engine(&self) -> &SpringEngine<M> {
        &self.engine
    }

    /// Outputs of the most recently rendered sample.
    pub fn last_outputs(&self) -> TickOutputs {
        self.last
    }

    pub fn is_gate_high(&self) -> bool {
        self.gate > 0.0
    }

    /// Return the engine to rest at 0 and drop the gate.
    pub fn clear(&mut self) {
        self.engine.reset();
        self.gate = 0.0;
        self.pending_edge = false;
        self.last = TickOutputs::default();
    }

    /// Render using a per-sample reset signal instead of the gate.
    ///
    /// Renders `min(out.len(), reset.len())` samples.
    pub fn render_with_reset(&mut self, out: &mut [f32], reset: &[f32], ctx: &RenderCtx) {
        self.inputs.sample_time = ctx.sample_time();
        for (sample, &level) in out.iter_mut().zip(reset) {
            self.inputs.reset = level;
            self.last = self.engine.tick(&self.inputs);
            *sample = self.output.select(&self.last);
        }
    }
}

impl<M: CoefficientModel> GraphNode for SpringNode<M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.inputs.sample_time = ctx.sample_time();
        for sample in out.iter_mut() {
            self.inputs.reset = if self.pending_edge {
                GATE_LEVEL
            } else {
                self.gate
            };
            self.pending_edge = false;
            self.last = self.engine.tick(&self.inputs);
            *sample = self.output.select(&self.last);
        }
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.gate = GATE_LEVEL;
        self.pending_edge = true;
    }

    fn note_off(&mut self, _ctx: &RenderCtx) {
        self.gate = 0.0;
    }
}

impl<M: CoefficientModel> Modulatable for SpringNode<M> {
    type Param = SpringParam;

    fn get_param(&self, param: SpringParam) -> f32 {
        self.inputs.knob(param).unwrap_or(0.0)
    }

    fn apply_modulation(&mut self, param: SpringParam, base: f32, modulation: f32) {
        match param {
            SpringParam::Offset => self.inputs.set_knob(param, base + modulation),
            _ => {
                self.inputs.set_knob(param, base);
                self.inputs.set_signal(param, Some(modulation));
            }
        }
    }
}

/// Control messages for a `SharedSpringNode`.
#[cfg(feature = "rtrb")]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpringMessage {
    SetKnob(SpringParam, f32),
    SetSignal(SpringParam, Option<f32>),
    GateOn,
    GateOff,
    /// Return the engine to rest at 0.
    Clear,
}

/// Sends control messages to a `SharedSpringNode` on another thread.
#[cfg(feature = "rtrb")]
pub struct SpringHandle {
    tx: Producer<SpringMessage>,
}

#[cfg(feature = "rtrb")]
impl SpringHandle {
    /// Queue a message. Returns false (and logs) when the queue is full.
    pub fn send(&mut self, message: SpringMessage) -> bool {
        match self.tx.push(message) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("spring control queue full, dropping {:?}", message);
                false
            }
        }
    }

    pub fn set_knob(&mut self, param: SpringParam, value: f32) -> bool {
        self.send(SpringMessage::SetKnob(param, value))
    }

    pub fn set_signal(&mut self, param: SpringParam, signal: Option<f32>) -> bool {
        self.send(SpringMessage::SetSignal(param, signal))
    }

    pub fn gate_on(&mut self) -> bool {
        self.send(SpringMessage::GateOn)
    }

    pub fn gate_off(&mut self) -> bool {
        self.send(SpringMessage::GateOff)
    }
}

#[cfg(feature = "rtrb")]
const SPRING_QUEUE_SIZE: usize = 256;

/// A `SpringNode` controlled through a lock-free queue.
#[cfg(feature = "rtrb")]
pub struct SharedSpringNode<M: CoefficientModel> {
    node: SpringNode<M>,
    rx: Consumer<SpringMessage>,
}

#[cfg(feature = "rtrb")]
impl<M: CoefficientModel> SharedSpringNode<M> {
    pub fn new(node: SpringNode<M>) -> (Self, SpringHandle) {
        let (tx, rx) = RingBuffer::<SpringMessage>::new(SPRING_QUEUE_SIZE);
        (Self { node, rx }, SpringHandle { tx })
    }

    pub fn node(&self) -> &SpringNode<M> {
        &self.node
    }

    fn drain_messages(&mut self, ctx: &RenderCtx) {
        while let Ok(message) = self.rx.pop() {
            match message {
                SpringMessage::SetKnob(param, value) => self.node.set_knob(param, value),
                SpringMessage::SetSignal(param, signal) => self.node.set_signal(param, signal),
                SpringMessage::GateOn => self.node.note_on(ctx),
                SpringMessage::GateOff => self.node.note_off(ctx),
                SpringMessage::Clear => self.node.clear(),
            }
        }
    }
}

#[cfg(feature = "rtrb")]
impl<M: CoefficientModel> GraphNode for SharedSpringNode<M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.drain_messages(ctx);
        self.node.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.node.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.node.note_off(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::coefficients::{Direct, FrequencyFriction};

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0)
    }

    #[test]
    fn position_stays_in_range() {
        let mut node = SpringNode::new(FrequencyFriction::default());
        node.set_knob(SpringParam::Position, 5.0);
        node.set_knob(SpringParam::Friction, 0.0);
        let mut buffer = vec![0.0; 4096];
        node.render_block(&mut buffer, &ctx());

        for &sample in &buffer {
            assert!(
                (0.0..=10.0).contains(&sample),
                "position {} out of offset range",
                sample
            );
        }
    }

    #[test]
    fn gate_resets_once_per_note() {
        let mut node = SpringNode::new(Direct);
        node.set_knob(SpringParam::Offset, 0.0);
        node.set_knob(SpringParam::Position, 3.0);
        let ctx = ctx();

        node.note_on(&ctx);
        let mut buffer = vec![0.0; 64];
        node.render_block(&mut buffer, &ctx);
        assert_eq!(buffer[0], 3.0, "first sample should snap to the target");
        assert!(node.engine().trigger_state() == crate::dsp::TriggerState::High);

        // Move the target while the gate is held: no second reset
        node.set_knob(SpringParam::Position, -3.0);
        node.render_block(&mut buffer, &ctx);
        assert!(buffer[0] > -3.0);

        node.note_off(&ctx);
        node.render_block(&mut buffer, &ctx);
        node.note_on(&ctx);
        node.render_block(&mut buffer, &ctx);
        assert_eq!(buffer[0], -3.0);
    }

    #[test]
    fn render_with_reset_is_sample_accurate() {
        let mut node = SpringNode::new(Direct);
        node.set_knob(SpringParam::Offset, 0.0);
        node.set_knob(SpringParam::Position, 2.0);

        let mut reset = vec![0.0; 32];
        reset[10..].fill(5.0);
        let mut out = vec![0.0; 32];
        node.render_with_reset(&mut out, &reset, &ctx());

        assert!(out[9] < 2.0);
        assert_eq!(out[10], 2.0);
    }

    #[test]
    fn selected_output_is_rendered() {
        let mut node = SpringNode::new(Direct).output(SpringOutput::Acceleration);
        node.set_knob(SpringParam::Offset, 0.0);
        node.set_knob(SpringParam::Position, 4.0);
        let mut buffer = vec![0.0; 8];
        node.render_block(&mut buffer, &ctx());
        // stiffness 100 * distance 4 saturates
        assert_eq!(buffer[0], 5.0);
        assert_eq!(node.last_outputs().acceleration, buffer[7]);
    }

    #[test]
    fn modulation_patches_signal() {
        let mut node = SpringNode::new(FrequencyFriction::default());
        node.apply_modulation(SpringParam::Friction, 2.0, 0.5);
        let control = node.inputs().coefficients.friction;
        assert_eq!(control.knob, 2.0);
        assert_eq!(control.signal, Some(0.5));
        assert_eq!(node.get_param(SpringParam::Friction), 2.0);

        node.apply_modulation(SpringParam::Offset, 0.0, 0.25);
        assert!(!node.inputs().offset);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn shared_node_applies_queued_messages() {
        let (mut node, mut handle) = SharedSpringNode::new(SpringNode::new(Direct));
        assert!(handle.set_knob(SpringParam::Offset, 0.0));
        assert!(handle.set_knob(SpringParam::Position, -2.0));
        assert!(handle.gate_on());

        let mut buffer = vec![0.0; 16];
        node.render_block(&mut buffer, &ctx());
        assert_eq!(buffer[0], -2.0);
        assert!(node.node().is_gate_high());

        assert!(handle.send(SpringMessage::Clear));
        node.render_block(&mut buffer, &ctx());
        assert!(!node.node().is_gate_high());
    }

    #[test]
    fn gate_pulse_within_one_block_still_resets() {
        let mut node = SpringNode::new(Direct);
        node.set_knob(SpringParam::Offset, 0.0);
        node.set_knob(SpringParam::Position, 3.0);
        let ctx = ctx();

        node.note_on(&ctx);
        node.note_off(&ctx);
        let mut buffer = vec![0.0; 1024];
        node.render_block(&mut buffer, &ctx);

        assert_eq!(buffer[0], 3.0);
        assert!(!node.is_gate_high());
        assert_eq!(node.engine().trigger_state(), crate::dsp::TriggerState::Low);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn queued_gate_pulse_resets_before_release() {
        let (mut node, mut handle) = SharedSpringNode::new(SpringNode::new(Direct));
        assert!(handle.set_knob(SpringParam::Offset, 0.0));
        assert!(handle.set_knob(SpringParam::Position, 3.0));
        assert!(handle.gate_on());
        assert!(handle.gate_off());

        let mut buffer = vec![0.0; 1024];
        node.render_block(&mut buffer, &ctx());
        assert_eq!(buffer[0], 3.0);

        // Released pulse does not fire again on the next block
        assert!(handle.set_knob(SpringParam::Position, -3.0));
        node.render_block(&mut buffer, &ctx());
        assert!(buffer[0] > -3.0);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn full_queue_reports_drop() {
        let (_node, mut handle) = SharedSpringNode::new(SpringNode::new(Direct));
        for _ in 0..SPRING_QUEUE_SIZE {
            assert!(handle.gate_on());
        }
        assert!(!handle.gate_off());
    }
}
