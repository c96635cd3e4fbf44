//! # Procedural Terrain
//!
//! A subdivided plane displaced by a height field. The height field is
//! written on the CPU by [`TerrainModel::perlin_terrain`] and uploaded by the
//! host whenever its dirty flag is set.
//!
//! The overall height is scaled by the coefficient `c`, which mirrors the
//! application-state slider [`COEFFICIENT_KEY`]. Moving the slider updates
//! the mirror, fires [`TerrainEvent::CoefficientChanged`] and schedules a
//! regeneration on the next [`NodeModel::time_update`].
//!
//! ## Noise
//!
//! [`perlin_noise`] is not gradient noise. It picks one of four diagonal
//! gradients from the parity of `x + y` and dots it with the fractional
//! offsets, with no fade curve and no interpolation between lattice points.
//! The terrain's look depends on this exact formula.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use cgmath::{InnerSpace, Vector2, Vector3};

use super::traits::NodeModel;
use crate::config::TerrainSettings;
use crate::error::Result;
use crate::events::{EventBus, ListenerHandle};
use crate::gfx::geometry::{generate_plane, GeometryData};
use crate::gfx::{DataTextureFloat1D, FilterMode, ImageTexture, Material, MaterialFactory, ShaderLibrary};
use crate::state::{AppState, SubscriptionHandle};

/// Name of the shader the terrain's material is stubbed from
pub const TERRAIN_SHADER: &str = "terrain";

/// Application-state key of the height coefficient
pub const COEFFICIENT_KEY: &str = "c";

/// Name the height field texture is bound under
pub const HEIGHT_MAP_TEXTURE: &str = "heightMap";

/// Initial texel value of a fresh height field
pub const HEIGHT_MAP_FILL: f32 = 0.5;

const NOISE_SCALE: f64 = 0.1;
const NOISE_AMPLITUDE: f64 = 0.01;
const ROLLING_FREQUENCY: f64 = 0.1;
const ROLLING_AMPLITUDE: f64 = 5.0;
const HEIGHT_SCALE: f64 = 0.05;
const DIFFUSE_STRENGTH: f32 = 0.5;

const GRADIENTS: [[f64; 2]; 4] = [[1.0, 1.0], [-1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]];

/// Events emitted by [`TerrainModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainEvent {
    /// The height coefficient changed; payload is the new value
    CoefficientChanged,
}

/// Truncates to an integer and wraps into the signed 32-bit range
fn wrap_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(4_294_967_296.0) as u32 as i32
}

/// Linear lattice hash in `0..=255`
///
/// Computes `(x * 15485863 + y * 101 + 23571) & 0xff` with wrapping 32-bit
/// integer semantics. [`perlin_noise`] does not consult it.
pub fn lattice_hash(x: f64, y: f64) -> u8 {
    let mixed = x * 15_485_863.0 + y * 101.0 + 23_571.0;
    (wrap_to_i32(mixed) & 0xff) as u8
}

/// Hash-selected gradient dotted with the fractional offsets of `(x, y)`
///
/// Pure: identical inputs always give identical outputs. The result lies in
/// `(-2, 2)`. Must stay in `f64`: `x + y` is truncated to pick the gradient,
/// and `f32` rounding moves cells across lattice boundaries.
pub fn perlin_noise(x: f64, y: f64) -> f64 {
    let dx = x - x.floor();
    let dy = y - y.floor();

    let gradient_index = (wrap_to_i32(x + y) & 3) as usize;
    let [grad_x, grad_y] = GRADIENTS[gradient_index];

    dx * grad_x + dy * grad_y
}

/// Height written at grid cell `(x, y)` for coefficient `c`
fn cell_height(x: u32, y: u32, c: f64) -> f64 {
    let (xf, yf) = (f64::from(x), f64::from(y));

    let noise_value = perlin_noise(xf * NOISE_SCALE, yf * NOISE_SCALE);
    let height_value = (NOISE_AMPLITUDE * noise_value).floor();
    let rolling = (xf * ROLLING_FREQUENCY).sin() * (yf * ROLLING_FREQUENCY).cos() * ROLLING_AMPLITUDE;

    c * HEIGHT_SCALE * (height_value + rolling)
}

/// Displaced-plane terrain driven by a height field
pub struct TerrainModel {
    name: String,
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
    texture_wrap: [f32; 2],
    use_data_texture: bool,
    height_map: DataTextureFloat1D,
    diffuse_map: ImageTexture,
    material: Material,

    // Shared with the app-state subscription
    c: Rc<Cell<f32>>,
    regenerate_pending: Rc<Cell<bool>>,
    events: Rc<RefCell<EventBus<TerrainEvent, f32>>>,
    subscription: Option<SubscriptionHandle>,
}

impl TerrainModel {
    /// Registers the terrain's sliders unless they already exist
    pub fn init_app_state(state: &mut AppState) -> Result<()> {
        state.add_slider_if_missing(COEFFICIENT_KEY, 1.0, 0.0, 2.0, 0.1)
    }

    /// Creates a terrain and subscribes it to the height coefficient
    ///
    /// # Arguments
    /// * `factory` - Loaded terrain shader to stub the material from
    /// * `state` - Application state holding the [`COEFFICIENT_KEY`] slider
    /// * `diffuse_map` - Surface texture, repeated `settings.texture_wrap` times
    /// * `settings` - Size, resolution and displacement mode
    pub fn new(
        factory: &dyn MaterialFactory,
        state: &mut AppState,
        diffuse_map: ImageTexture,
        settings: &TerrainSettings,
    ) -> Result<Self> {
        Self::init_app_state(state)?;
        let c = Rc::new(Cell::new(state.get_state(COEFFICIENT_KEY)?));

        let mut terrain = Self {
            name: "Terrain".to_string(),
            width: settings.width,
            height: settings.height,
            width_segments: settings.width_segments,
            height_segments: settings.height_segments,
            texture_wrap: settings.texture_wrap,
            use_data_texture: settings.use_data_texture,
            height_map: DataTextureFloat1D::create_solid(0, 0, HEIGHT_MAP_FILL),
            diffuse_map: diffuse_map.clone(),
            // Replaced by init()
            material: Material::new(factory.shader_name()),
            c,
            regenerate_pending: Rc::new(Cell::new(false)),
            events: Rc::new(RefCell::new(EventBus::new())),
            subscription: None,
        };
        terrain.init(factory, diffuse_map, None);

        // Weak handles only: a dropped terrain must not be kept alive by the state
        let owner: Weak<dyn Any> = Rc::downgrade(&terrain.c) as Weak<dyn Any>;
        let c = Rc::downgrade(&terrain.c);
        let pending = Rc::downgrade(&terrain.regenerate_pending);
        let events = Rc::downgrade(&terrain.events);
        terrain.subscription = Some(state.subscribe_owned(COEFFICIENT_KEY, owner, move |value| {
            let (Some(c), Some(pending), Some(events)) = (c.upgrade(), pending.upgrade(), events.upgrade()) else {
                return;
            };
            c.set(value);
            pending.set(true);
            match events.try_borrow_mut() {
                Ok(mut bus) => bus.signal(TerrainEvent::CoefficientChanged, &value),
                Err(_) => log::warn!("Terrain coefficient changed during its own dispatch; signal skipped"),
            };
        })?);

        log::info!(
            "Created terrain {}x{} with {}x{} segments (c = {})",
            terrain.width,
            terrain.height,
            terrain.width_segments,
            terrain.height_segments,
            terrain.c()
        );
        Ok(terrain)
    }

    /// Creates a terrain from the shader library
    ///
    /// Fails with [`SceneryError::ShaderModelNotLoaded`](crate::error::SceneryError::ShaderModelNotLoaded)
    /// if [`TERRAIN_SHADER`] has not been loaded yet.
    pub fn create(
        library: &ShaderLibrary,
        state: &mut AppState,
        diffuse_map: ImageTexture,
        settings: &TerrainSettings,
    ) -> Result<Self> {
        let shader = library.require(TERRAIN_SHADER)?;
        Self::new(&*shader, state, diffuse_map, settings)
    }

    /// (Re)builds the height field and material
    ///
    /// The height field is reset to [`HEIGHT_MAP_FILL`] with linear
    /// filtering. It is only bound to the material when displacing in the
    /// shader; otherwise use [`TerrainModel::displaced_geometry`].
    pub fn init(&mut self, factory: &dyn MaterialFactory, diffuse_map: ImageTexture, use_data_texture: Option<bool>) {
        if let Some(use_data_texture) = use_data_texture {
            self.use_data_texture = use_data_texture;
        }
        self.diffuse_map = diffuse_map.with_wrap(self.texture_wrap[0], self.texture_wrap[1]);

        self.height_map = DataTextureFloat1D::create_solid(self.width_segments, self.height_segments, HEIGHT_MAP_FILL);
        self.height_map.set_min_filter(FilterMode::Linear);
        self.height_map.set_mag_filter(FilterMode::Linear);

        let mut material = factory.create_material();
        material.set_texture("diffuseMap", &self.diffuse_map.name);
        material.set_uniform("textureWrap", self.texture_wrap);
        if self.use_data_texture {
            material.set_texture(HEIGHT_MAP_TEXTURE, HEIGHT_MAP_TEXTURE);
        }
        material.set_uniform("diffuse", DIFFUSE_STRENGTH);
        self.material = material;
    }

    /// Current height coefficient
    pub fn c(&self) -> f32 {
        self.c.get()
    }

    /// Whether a coefficient change is waiting for regeneration
    pub fn regenerate_pending(&self) -> bool {
        self.regenerate_pending.get()
    }

    /// Rewrites every cell of the height field
    ///
    /// Each cell gets `c * 0.05 * (floor(0.01 * noise) + rolling)`, where
    /// `noise = perlin_noise(0.1x, 0.1y)` and
    /// `rolling = 5 sin(0.1x) cos(0.1y)`. Marks the texture for upload.
    pub fn perlin_terrain(&mut self) {
        let c = self.c.get();
        for y in 0..self.height_map.height() {
            for x in 0..self.height_map.width() {
                let h = cell_height(x, y, f64::from(c)) as f32;
                self.height_map.set_pixel_nn(x as f32, y as f32, h);
            }
        }
        self.height_map.set_texture_needs_update();
        self.regenerate_pending.set(false);
        log::debug!(
            "Regenerated {}x{} height field with c = {}",
            self.height_map.width(),
            self.height_map.height(),
            c
        );
    }

    /// Height at a point in height-field texel coordinates
    ///
    /// Nearest-neighbour lookup without interpolation; points outside the
    /// grid read the nearest edge texel.
    pub fn terrain_height_at_point(&self, p: Vector2<f32>) -> f32 {
        self.height_map.get_pixel_nn(p.x, p.y)
    }

    pub fn height_map(&self) -> &DataTextureFloat1D {
        &self.height_map
    }

    pub fn diffuse_map(&self) -> &ImageTexture {
        &self.diffuse_map
    }

    pub fn use_data_texture(&self) -> bool {
        self.use_data_texture
    }

    /// Height field bytes if they changed since the last call
    pub fn take_height_map_update(&mut self) -> Option<&[u8]> {
        if self.height_map.take_needs_update() {
            Some(self.height_map.as_bytes())
        } else {
            None
        }
    }

    /// Listen for coefficient changes
    pub fn add_update_listener<F>(&mut self, callback: F) -> ListenerHandle<TerrainEvent>
    where
        F: FnMut(&f32) + 'static,
    {
        self.events
            .borrow_mut()
            .add_listener(TerrainEvent::CoefficientChanged, callback)
    }

    /// Like [`TerrainModel::add_update_listener`], replacing any listener
    /// previously registered under `name`
    pub fn add_named_update_listener<F>(&mut self, name: &str, callback: F) -> ListenerHandle<TerrainEvent>
    where
        F: FnMut(&f32) + 'static,
    {
        self.events
            .borrow_mut()
            .add_named_listener(TerrainEvent::CoefficientChanged, name, callback)
    }

    pub fn remove_update_listener(&mut self, handle: &ListenerHandle<TerrainEvent>) -> bool {
        self.events.borrow_mut().remove_listener(handle)
    }

    /// Fire [`TerrainEvent::CoefficientChanged`] with the current coefficient
    pub fn signal_custom_update(&self) {
        let c = self.c.get();
        match self.events.try_borrow_mut() {
            Ok(mut bus) => bus.signal(TerrainEvent::CoefficientChanged, &c),
            Err(_) => log::warn!("Terrain update signalled during its own dispatch; skipped"),
        }
    }

    /// Stop mirroring the application-state coefficient
    ///
    /// Returns `false` if the terrain was already detached.
    pub fn detach(&mut self, state: &mut AppState) -> bool {
        match self.subscription.take() {
            Some(handle) => state.unsubscribe(&handle),
            None => false,
        }
    }

    /// Terrain plane with the height field applied on the CPU
    ///
    /// Vertex `(i, j)` of the `(segments + 1)²` grid samples the nearest
    /// texel; normals come from central differences of the displaced grid.
    pub fn displaced_geometry(&self) -> GeometryData {
        let mut data = generate_plane(self.width, self.height, self.width_segments, self.height_segments);

        let cols = self.width_segments.max(1) + 1;
        let rows = self.height_segments.max(1) + 1;
        let texel_x = (self.height_map.width().max(1) - 1) as f32 / (cols - 1) as f32;
        let texel_y = (self.height_map.height().max(1) - 1) as f32 / (rows - 1) as f32;

        let heights: Vec<f32> = (0..rows)
            .flat_map(|j| (0..cols).map(move |i| (i, j)))
            .map(|(i, j)| self.height_map.get_pixel_nn(i as f32 * texel_x, j as f32 * texel_y))
            .collect();

        for (vertex, h) in data.vertices.iter_mut().zip(&heights) {
            vertex[2] = *h;
        }

        let step_x = self.width / (cols - 1) as f32;
        let step_y = self.height / (rows - 1) as f32;
        let at = |i: u32, j: u32| heights[(j * cols + i) as usize];

        for j in 0..rows {
            for i in 0..cols {
                let (left, right) = (i.saturating_sub(1), (i + 1).min(cols - 1));
                let (down, up) = (j.saturating_sub(1), (j + 1).min(rows - 1));

                let dzdx = (at(right, j) - at(left, j)) / ((right - left).max(1) as f32 * step_x);
                let dzdy = (at(i, up) - at(i, down)) / ((up - down).max(1) as f32 * step_y);

                let normal = Vector3::new(-dzdx, -dzdy, 1.0).normalize();
                data.normals[(j * cols + i) as usize] = normal.into();
            }
        }

        data
    }
}

impl NodeModel for TerrainModel {
    fn time_update(&mut self, t: f32) {
        if self.regenerate_pending.get() {
            log::trace!("Regenerating terrain at t = {}", t);
            self.perlin_terrain();
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneryError;
    use crate::gfx::shader::InMemoryShaderSource;
    use crate::gfx::{ShaderModel, UniformValue};

    fn shader() -> ShaderModel {
        let source = InMemoryShaderSource::new().with_shader(TERRAIN_SHADER, "", "");
        pollster::block_on(ShaderModel::load(TERRAIN_SHADER, &source)).unwrap()
    }

    fn terrain(state: &mut AppState, segments: u32) -> TerrainModel {
        let settings = TerrainSettings::default().with_segments(segments, segments);
        TerrainModel::new(&shader(), state, ImageTexture::new("grass"), &settings).unwrap()
    }

    #[test]
    fn test_lattice_hash_values() {
        assert_eq!(lattice_hash(0.0, 0.0), (23_571 & 0xff) as u8);
        assert_eq!(lattice_hash(1.0, 0.0), ((15_485_863 + 23_571) & 0xff) as u8);
        assert_eq!(lattice_hash(0.0, 2.0), ((202 + 23_571) & 0xff) as u8);
        assert_eq!(lattice_hash(-1.0, 0.0), ((23_571 - 15_485_863) & 0xff) as u8);
    }

    #[test]
    fn test_wrap_to_i32() {
        assert_eq!(wrap_to_i32(3.9), 3);
        assert_eq!(wrap_to_i32(-3.9), -3);
        assert_eq!(wrap_to_i32(4_294_967_297.0), 1);
        assert_eq!(wrap_to_i32(2_147_483_648.0), i32::MIN);
        assert_eq!(wrap_to_i32(f64::NAN), 0);
        assert_eq!(wrap_to_i32(f64::INFINITY), 0);
    }

    #[test]
    fn test_perlin_noise_is_zero_on_lattice() {
        for x in -3..3 {
            for y in -3..3 {
                assert_eq!(perlin_noise(f64::from(x), f64::from(y)), 0.0);
            }
        }
    }

    #[test]
    fn test_perlin_noise_gradient_selection() {
        // x + y truncates to 0 -> gradient (1, 1)
        assert!((perlin_noise(0.25, 0.5) - 0.75).abs() < 1e-6);
        // x + y truncates to 1 -> gradient (-1, 1)
        assert!((perlin_noise(0.75, 0.5) - (-0.75 + 0.5)).abs() < 1e-6);
        // x + y truncates to 2 -> gradient (1, -1)
        assert!((perlin_noise(1.5, 0.75) - (0.5 - 0.75)).abs() < 1e-6);
        // x + y truncates to 3 -> gradient (-1, -1)
        assert!((perlin_noise(1.5, 1.75) - (-0.5 - 0.75)).abs() < 1e-6);
        // x + y truncates to -1 -> index 3 -> gradient (-1, -1)
        assert!((perlin_noise(-1.5, 0.25) - (-0.5 - 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_perlin_noise_is_pure() {
        for i in 0..100 {
            let (x, y) = (f64::from(i) * 0.37, f64::from(i) * -0.21);
            assert_eq!(perlin_noise(x, y).to_bits(), perlin_noise(x, y).to_bits());
        }
    }

    #[test]
    fn test_terrain_fills_every_cell() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 8);
        assert!(terrain.height_map().pixels().iter().all(|&v| v == HEIGHT_MAP_FILL));

        terrain.perlin_terrain();

        let pixels = terrain.height_map().pixels();
        assert_eq!(pixels.len(), 64);
        assert!(pixels.iter().all(|v| v.is_finite()));
        assert!(pixels.iter().all(|&v| v != HEIGHT_MAP_FILL));
        assert!(terrain.height_map().needs_update());
    }

    #[test]
    fn test_perlin_terrain_is_repeatable() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 16);

        terrain.perlin_terrain();
        let first = terrain.height_map().pixels().to_vec();
        terrain.perlin_terrain();

        assert_eq!(first, terrain.height_map().pixels());
    }

    #[test]
    fn test_perlin_terrain_known_cells() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 32);
        terrain.perlin_terrain();

        // (x, y, height) for c = 1, evaluated in double precision
        let cells = [
            // Origin: no noise, no rolling
            (0, 0, 0.0),
            // 0.5 + 0.0 -> gradient (1, 1), floor term 0
            (5, 0, 0.119_856_38),
            // 1.0 + 0.0 on the lattice, noise is zero
            (10, 0, 0.210_367_75),
            // 1.5 + 0.0 -> gradient (-1, 1), floor term -1
            (15, 0, 0.199_373_75),
            // 1.9 + 0.1 sums to exactly 2.0 -> gradient (1, -1), floor term 0
            (19, 1, 0.235_393_13),
        ];
        for (x, y, expected) in cells {
            let actual = terrain.terrain_height_at_point(Vector2::new(x as f32, y as f32));
            assert!((actual - expected).abs() < 1e-6, "({}, {}): {} != {}", x, y, actual, expected);
        }
    }

    #[test]
    fn test_cell_on_lattice_boundary_uses_double_sum() {
        // 19 * 0.1 + 1 * 0.1 truncates to 2, not 1
        let noise = perlin_noise(19.0 * 0.1, 1.0 * 0.1);
        assert!((noise - 0.8).abs() < 1e-12);
        assert_eq!((0.01 * noise).floor(), 0.0);
    }

    #[test]
    fn test_height_lookup_reads_last_written_value() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 8);
        terrain.perlin_terrain();

        for y in 0..8 {
            for x in 0..8 {
                let expected = terrain.height_map().pixels()[(y * 8 + x) as usize];
                let p = Vector2::new(x as f32, y as f32);
                assert_eq!(terrain.terrain_height_at_point(p), expected);
            }
        }
        // Nearest neighbour, no interpolation
        assert_eq!(
            terrain.terrain_height_at_point(Vector2::new(2.2, 3.4)),
            terrain.terrain_height_at_point(Vector2::new(2.0, 3.0))
        );
    }

    #[test]
    fn test_coefficient_mirrors_app_state() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 8);
        assert_eq!(terrain.c(), 1.0);

        let seen = Rc::new(Cell::new(0.0));
        let seen_in = seen.clone();
        terrain.add_update_listener(move |c| seen_in.set(*c));

        state.set_state(COEFFICIENT_KEY, 1.5).unwrap();
        assert_eq!(terrain.c(), 1.5);
        assert_eq!(seen.get(), 1.5);
        assert!(terrain.regenerate_pending());

        terrain.time_update(0.1);
        assert!(!terrain.regenerate_pending());
        let (x, y) = (5u32, 3u32);
        let expected = cell_height(x, y, 1.5) as f32;
        assert!((terrain.terrain_height_at_point(Vector2::new(5.0, 3.0)) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_coefficient_scales_heights() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 8);
        terrain.perlin_terrain();
        let base = terrain.height_map().pixels().to_vec();

        state.set_state(COEFFICIENT_KEY, 2.0).unwrap();
        terrain.perlin_terrain();
        for (a, b) in base.iter().zip(terrain.height_map().pixels()) {
            assert!((a * 2.0 - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_detach_stops_mirroring() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 4);

        assert!(terrain.detach(&mut state));
        assert!(!terrain.detach(&mut state));
        state.set_state(COEFFICIENT_KEY, 0.2).unwrap();
        assert_eq!(terrain.c(), 1.0);
    }

    #[test]
    fn test_dropped_terrains_release_their_subscriptions() {
        let mut state = AppState::new();
        for _ in 0..3 {
            let terrain = terrain(&mut state, 4);
            drop(terrain);
        }
        assert_eq!(state.subscriber_count(COEFFICIENT_KEY), 0);

        let live = terrain(&mut state, 4);
        assert_eq!(state.subscriber_count(COEFFICIENT_KEY), 1);
        state.set_state(COEFFICIENT_KEY, 0.6).unwrap();
        assert_eq!(live.c(), 0.6);
    }

    #[test]
    fn test_named_update_listener_replaces_previous() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 4);
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let first_in = first.clone();
        terrain.add_named_update_listener("hud", move |_| first_in.set(first_in.get() + 1));
        let second_in = second.clone();
        terrain.add_named_update_listener("hud", move |_| second_in.set(second_in.get() + 1));

        terrain.signal_custom_update();
        assert_eq!((first.get(), second.get()), (0, 1));
    }

    #[test]
    fn test_signal_custom_update_and_remove_listener() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 4);
        let calls = Rc::new(Cell::new(0));
        let calls_in = calls.clone();
        let handle = terrain.add_update_listener(move |_| calls_in.set(calls_in.get() + 1));

        terrain.signal_custom_update();
        assert_eq!(calls.get(), 1);

        assert!(terrain.remove_update_listener(&handle));
        terrain.signal_custom_update();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_existing_slider_value_is_used() {
        let mut state = AppState::new();
        state.add_slider_if_missing(COEFFICIENT_KEY, 0.4, 0.0, 2.0, 0.1).unwrap();
        let terrain = terrain(&mut state, 4);
        assert_eq!(terrain.c(), 0.4);
    }

    #[test]
    fn test_create_requires_loaded_shader() {
        let mut state = AppState::new();
        let library = ShaderLibrary::new();
        let result = TerrainModel::create(
            &library,
            &mut state,
            ImageTexture::new("grass"),
            &TerrainSettings::default(),
        );
        assert!(matches!(result, Err(SceneryError::ShaderModelNotLoaded { .. })));
    }

    struct CountingFactory {
        created: Cell<u32>,
    }

    impl MaterialFactory for CountingFactory {
        fn shader_name(&self) -> &str {
            TERRAIN_SHADER
        }

        fn create_material(&self) -> Material {
            self.created.set(self.created.get() + 1);
            Material::new(TERRAIN_SHADER)
        }
    }

    #[test]
    fn test_construction_creates_one_material() {
        let mut state = AppState::new();
        let factory = CountingFactory { created: Cell::new(0) };
        let settings = TerrainSettings::default().with_segments(4, 4);
        let terrain = TerrainModel::new(&factory, &mut state, ImageTexture::new("grass"), &settings).unwrap();

        assert_eq!(factory.created.get(), 1);
        assert_eq!(terrain.material().uniform("diffuse"), Some(&UniformValue::Float(0.5)));
    }

    #[test]
    fn test_material_bindings() {
        let mut state = AppState::new();
        let terrain = terrain(&mut state, 4);
        let material = terrain.material();

        assert_eq!(material.shader_name, TERRAIN_SHADER);
        assert_eq!(material.uniform("diffuse"), Some(&UniformValue::Float(0.5)));
        assert_eq!(
            material.uniform(HEIGHT_MAP_TEXTURE),
            Some(&UniformValue::Texture(HEIGHT_MAP_TEXTURE.to_string()))
        );
        assert_eq!(terrain.diffuse_map().wrap, [5.0, 5.0]);
        assert_eq!(terrain.height_map().min_filter(), FilterMode::Linear);
    }

    #[test]
    fn test_cpu_displacement_without_data_texture() {
        let mut state = AppState::new();
        let settings = TerrainSettings::default()
            .with_segments(8, 8)
            .with_data_texture(false);
        let mut terrain = TerrainModel::new(&shader(), &mut state, ImageTexture::new("grass"), &settings).unwrap();
        assert!(terrain.material().uniform(HEIGHT_MAP_TEXTURE).is_none());

        terrain.perlin_terrain();
        let geometry = terrain.displaced_geometry();

        assert_eq!(geometry.vertex_count(), 81);
        // Corner vertices sample corner texels
        assert_eq!(geometry.vertices[0][2], terrain.height_map().get_pixel_nn(0.0, 0.0));
        assert_eq!(geometry.vertices[80][2], terrain.height_map().get_pixel_nn(7.0, 7.0));
        for n in &geometry.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
            assert!(n[2] > 0.0);
        }
    }

    #[test]
    fn test_take_height_map_update() {
        let mut state = AppState::new();
        let mut terrain = terrain(&mut state, 4);

        assert_eq!(terrain.take_height_map_update().map(<[u8]>::len), Some(16 * 4));
        assert!(terrain.take_height_map_update().is_none());

        terrain.perlin_terrain();
        assert!(terrain.take_height_map_update().is_some());
    }
}
