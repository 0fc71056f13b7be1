//! Frame rendering
//!
//! One pass per frame: clear to the background color, draw the cursor cell,
//! then the text quads on top.

use crate::gpu::SharedGpuState;
use crate::window::WindowState;

/// Lay out the visible cells as glyph quads
fn prepare_text(state: &mut WindowState) {
    let gpu = &mut state.gpu;
    gpu.text_renderer.clear();

    for (cell, character) in state.buffer.visible_cells() {
        let rect = state.grid.cell_rect(cell);
        if let Some(glyph) = gpu.glyph_cache.position_char(character, rect.x, rect.y) {
            gpu.text_renderer.push_glyph(&glyph);
        }
    }
}

pub fn render_frame(state: &mut WindowState, shared: &SharedGpuState) {
    prepare_text(state);
    state.gpu.glyph_cache.flush(&shared.queue);

    let cursor_rect = state.grid.cell_clip_rect(state.buffer.cursor());
    state
        .gpu
        .cursor_renderer
        .set_cell(&shared.queue, cursor_rect, state.colors.cursor);

    let frame = match state.gpu.surface.get_current_texture() {
        Ok(f) => f,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            log::debug!("Surface lost or outdated, reconfiguring");
            state.gpu.surface.configure(&shared.device, &state.gpu.config);
            state.dirty = true;
            return;
        }
        Err(e) => {
            log::warn!("Failed to get surface texture: {:?}", e);
            return;
        }
    };
    let frame_view = frame.texture.create_view(&Default::default());

    let mut encoder = shared
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Text Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(state.colors.background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        state.gpu.cursor_renderer.render(&mut pass);
        state.gpu.text_renderer.render(&shared.queue, &mut pass);
    }

    shared.queue.submit(std::iter::once(encoder.finish()));
    state.window.pre_present_notify();
    frame.present();
}
