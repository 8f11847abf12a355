//! SpringApp - audio setup and runner

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use spring_theory::{
    dsp::CoefficientModel,
    graph::{GraphNode, RenderCtx, SharedSpringNode, SpringNode},
    Variant, MAX_BLOCK_SIZE,
};

use super::ui::{UiApp, UiStateInit, UiStateUpdate, SCOPE_BUFFER_SIZE};

/// Position (+/-10 units at most) to speaker level.
const OUTPUT_GAIN: f32 = 0.1;
/// Only every Nth rendered sample is sent to the scope.
const SCOPE_DECIMATION: usize = 16;
const STATE_QUEUE_SIZE: usize = 64;

pub struct SpringApp<M: CoefficientModel> {
    variant: Variant,
    model: M,
}

impl<M: CoefficientModel + 'static> SpringApp<M> {
    pub fn new(variant: Variant, model: M) -> Self {
        Self { variant, model }
    }

    /// Open the audio device, start the engine and take over the terminal.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let scope_rate = sample_rate / SCOPE_DECIMATION as f32;

        log::info!(
            "variant {}: {} Hz, {} channels",
            self.variant,
            sample_rate,
            channels
        );

        let (mut node, handle) = SharedSpringNode::new(SpringNode::new(self.model));
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_BUFFER_SIZE * 2);
        let (mut state_tx, state_rx) = RingBuffer::<UiStateUpdate>::new(STATE_QUEUE_SIZE);

        let ctx = RenderCtx::new(sample_rate);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut decimation_phase = 0usize;

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];
                    node.render_block(block, &ctx);

                    for &sample in block.iter() {
                        if decimation_phase == 0 {
                            // Scope falls behind rather than blocking audio
                            let _ = scope_tx.push(sample);
                        }
                        decimation_phase = (decimation_phase + 1) % SCOPE_DECIMATION;
                    }

                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s * OUTPUT_GAIN;
                        }
                    }

                    frames_written += frames_to_render;
                }

                let spring = node.node();
                let _ = state_tx.push(UiStateUpdate {
                    outputs: spring.last_outputs(),
                    coefficients: spring.engine().coefficients(),
                    recoveries: spring.engine().recoveries(),
                    gate: spring.is_gate_high(),
                });
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )?;

        stream.play()?;

        let init = UiStateInit::new(self.variant, sample_rate, channels, scope_rate);
        let mut ui = UiApp::new(scope_rx, state_rx, handle, init);

        let mut terminal = ratatui::init();
        let result = ui.run(&mut terminal);
        ratatui::restore();

        log::info!("spring stopped after {} recoveries", ui.recoveries());
        result
    }
}
