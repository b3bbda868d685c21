use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec3;
use harbor_animate::{AnimationParams, Animator, FrameClock, ParamSpec};
use harbor_assets::{LoadOutcome, ModelLoader};
use harbor_kernel::Scene;
use harbor_render::draw_list;
use harbor_render_wgpu::{OrbitCamera, WgpuRenderer};
use harbor_scene::{
    CameraConfig, Composition, HarborConfig, ModelKind, WindowConfig, compose_harbor,
    install_model,
};
use harbor_tools::{FpsCounter, SceneInspector};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "harbor-desktop", about = "Animated harbor scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    config: HarborConfig,
    scene: Scene,
    animator: Animator,
    params: AnimationParams,
    clock: FrameClock,
    loader: ModelLoader<ModelKind>,
    failed: BTreeSet<ModelKind>,
    camera: OrbitCamera,
    fps: FpsCounter,
    show_panel: bool,
    dragging: bool,
}

impl AppState {
    fn new(config: HarborConfig) -> Self {
        let Composition { scene, rig } = compose_harbor(&config);
        let clock = config.frame.clock();

        let mut loader = ModelLoader::new();
        let mut failed = BTreeSet::new();
        for kind in ModelKind::ALL {
            let path = config.assets.model_path(kind);
            if let Err(e) = loader.request(kind, &path) {
                tracing::error!(%kind, path = %path.display(), "could not start model load: {e}");
                failed.insert(kind);
            }
        }

        Self {
            camera: camera_from(&config.camera),
            params: config.animation,
            config,
            scene,
            animator: Animator::new(rig),
            clock,
            loader,
            failed,
            fps: FpsCounter::default(),
            show_panel: true,
            dragging: false,
        }
    }

    /// One frame of simulation: adopt finished loads, then animate.
    fn update(&mut self, now: Instant) {
        let finished = self.loader.poll();
        self.adopt(finished);

        let delta = self.clock.tick(now);
        self.animator.update(delta, &self.params, &mut self.scene);
        self.fps.frame(now);
    }

    /// Install loaded models. Anything that does not end up in the scene is marked failed.
    fn adopt(&mut self, outcomes: Vec<LoadOutcome<ModelKind>>) {
        for outcome in outcomes {
            let kind = outcome.key;
            let Ok(info) = outcome.result else {
                self.failed.insert(kind);
                continue;
            };
            if let Err(e) = install_model(kind, &info, &mut self.scene, self.animator.rig_mut()) {
                tracing::warn!(%kind, "model not installed: {e}");
                self.failed.insert(kind);
            }
        }
    }

    fn model_status(&self, kind: ModelKind) -> &'static str {
        if kind.is_installed(&self.scene, self.animator.rig()) {
            "loaded"
        } else if self.failed.contains(&kind) {
            "failed"
        } else {
            "loading"
        }
    }

    fn set_param(&mut self, spec: &ParamSpec, value: f32) {
        match self.params.set(spec.key, value) {
            Ok(change) => self
                .animator
                .apply_change(change, &self.params, &mut self.scene),
            Err(e) => tracing::warn!("rejected {}: {e}", spec.key),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed && key == KeyCode::F1 {
            self.show_panel = !self.show_panel;
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        let summary = SceneInspector::summary(&self.scene);

        egui::SidePanel::right("controls")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Harbor");
                ui.label(format!(
                    "{:.0} FPS  ({:.1} ms)",
                    self.fps.fps(),
                    self.fps.frame_ms()
                ));
                ui.label(format!(
                    "Frame: {}  Nodes: {}",
                    summary.frame, summary.node_count
                ));
                let eye = self.camera.eye();
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})",
                    eye.x, eye.y, eye.z
                ));
                ui.separator();

                ui.heading("Animation");
                for spec in ParamSpec::all() {
                    let mut value = self.params.get(spec.key);
                    let slider = egui::Slider::new(&mut value, spec.min..=spec.max)
                        .step_by(f64::from(spec.step))
                        .text(spec.label);
                    if ui.add(slider).changed() {
                        self.set_param(&spec, value);
                    }
                }
                if ui.button("Reset").clicked() {
                    let defaults = self.config.animation;
                    for spec in ParamSpec::all() {
                        self.set_param(&spec, defaults.get(spec.key));
                    }
                }

                ui.separator();
                ui.heading("Models");
                for kind in ModelKind::ALL {
                    ui.label(format!("{kind}: {}", self.model_status(kind)));
                }

                ui.separator();
                ui.small("F1: Toggle panel | LMB drag: Orbit | Wheel: Zoom");
            });
    }
}

fn camera_from(config: &CameraConfig) -> OrbitCamera {
    OrbitCamera::looking_at(Vec3::from(config.eye), Vec3::from(config.target))
        .with_projection(config.fov_degrees.to_radians(), config.near, config.far)
        .with_limits(
            config.min_distance,
            config.max_distance,
            config.max_polar_degrees.to_radians(),
        )
}

/// Everything that exists once the window does.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        window_config: &WindowConfig,
        egui_ctx: &EguiContext,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("harbor_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn redraw(&mut self, state: &mut AppState, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let items = draw_list(&state.scene, state.camera.eye());
        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            state.scene.environment(),
            &items,
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        self.window.request_redraw();
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.state.config.window, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.camera.set_aspect(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size.width, new_size.height);
                self.state.camera.set_aspect(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                self.state.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.state.update(Instant::now());
                gpu.redraw(&mut self.state, &self.egui_ctx);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.dragging {
                self.state.camera.orbit(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("harbor-desktop starting");

    let config = HarborConfig::load_or_default(cli.config.as_deref())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp {
        state: AppState::new(config),
        gpu: None,
        egui_ctx: EguiContext::default(),
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use harbor_assets::{AssetError, ModelInfo};

    fn state() -> AppState {
        let mut config = HarborConfig::default();
        config.assets.root = PathBuf::from("/nonexistent/harbor-assets");
        AppState::new(config)
    }

    fn loaded(kind: ModelKind) -> LoadOutcome<ModelKind> {
        LoadOutcome {
            key: kind,
            path: PathBuf::from(kind.placement().path),
            result: Ok(ModelInfo::placeholder(kind.name())),
        }
    }

    #[test]
    fn load_error_marks_model_failed() {
        let mut app = state();
        app.adopt(vec![LoadOutcome {
            key: ModelKind::Mountain,
            path: PathBuf::from("mountain.gltf"),
            result: Err(AssetError::Io(std::io::Error::other("gone"))),
        }]);
        assert_eq!(app.model_status(ModelKind::Mountain), "failed");
        assert_eq!(app.model_status(ModelKind::Yacht), "loading");
    }

    #[test]
    fn refused_install_is_recorded_but_installed_model_reads_loaded() {
        let mut app = state();
        app.adopt(vec![loaded(ModelKind::Boat)]);
        assert_eq!(app.model_status(ModelKind::Boat), "loaded");

        app.adopt(vec![loaded(ModelKind::Boat)]);
        assert!(app.failed.contains(&ModelKind::Boat));
        assert_eq!(app.model_status(ModelKind::Boat), "loaded");
    }
}
