//! Point cloud, ring outlines, camera and the per-frame motion model.

use std::f32::consts::PI;

use rand::Rng;

pub const POINT_COUNT: usize = 2000;
pub const SHELL_RADIUS_MIN: f32 = 10.0;
pub const SHELL_RADIUS_MAX: f32 = 50.0;
pub const POINT_SIZE_MIN: f32 = 0.5;
pub const POINT_SIZE_MAX: f32 = 2.5;

/// Neon pink, cyan and lime.
pub const PALETTE_HEX: [u32; 3] = [0xff00c8, 0x00e5ff, 0xa8ff00];

pub const RING_COUNT: usize = 3;
pub const RING_SEGMENTS: usize = 128;
pub const RING_BASE_RADIUS: f32 = 15.0;
pub const RING_RADIUS_STEP: f32 = 8.0;
pub const RING_OPACITY: f32 = 0.3;

pub const CLOUD_EASING: f32 = 0.02;
pub const RING_EASING: f32 = 0.01;
pub const POINTER_ROTATION_SCALE: f32 = 0.3;
pub const CLOUD_SPIN_RATE: f32 = 0.05;
pub const RING_SPIN_RATE: f32 = 0.1;
pub const WAVE_AMPLITUDE: f32 = 0.5;
pub const WAVE_PHASE_PER_POINT: f32 = 0.01;

pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_DISTANCE: f32 = 30.0;
pub const MAX_PIXEL_RATIO: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }
}

pub fn palette() -> [Rgb; 3] {
    PALETTE_HEX.map(Rgb::from_hex)
}

#[derive(Debug, Clone)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Rgb>,
    pub sizes: Vec<f32>,
}

impl PointCloud {
    /// Uniform direction on the sphere, radius uniform in the shell range.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let colors_available = palette();
        let mut positions = Vec::with_capacity(POINT_COUNT);
        let mut colors = Vec::with_capacity(POINT_COUNT);
        let mut sizes = Vec::with_capacity(POINT_COUNT);

        for _ in 0..POINT_COUNT {
            let radius = rng.gen_range(SHELL_RADIUS_MIN..SHELL_RADIUS_MAX);
            let theta = rng.gen_range(0.0..(2.0 * PI));
            let phi = rng.gen_range(-1.0f32..1.0).acos();
            positions.push(Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ));
            colors.push(colors_available[rng.gen_range(0..colors_available.len())]);
            sizes.push(rng.gen_range(POINT_SIZE_MIN..POINT_SIZE_MAX));
        }

        Self {
            positions,
            colors,
            sizes,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct RingOutline {
    pub radius: f32,
    /// Closed loop: the first vertex is repeated at the end.
    pub positions: Vec<Vec3>,
    pub color: Rgb,
    pub opacity: f32,
    pub initial_rotation: Vec3,
    /// +1 or -1; neighbouring rings spin in opposite directions.
    pub spin_direction: f32,
}

pub fn ring_outlines() -> Vec<RingOutline> {
    let colors = palette();
    (0..RING_COUNT)
        .map(|index| {
            let radius = RING_BASE_RADIUS + index as f32 * RING_RADIUS_STEP;
            let positions = (0..=RING_SEGMENTS)
                .map(|segment| {
                    let angle = segment as f32 / RING_SEGMENTS as f32 * 2.0 * PI;
                    Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
                })
                .collect();
            RingOutline {
                radius,
                positions,
                color: colors[index % colors.len()],
                opacity: RING_OPACITY,
                initial_rotation: Vec3::new(PI * 0.3 + index as f32 * 0.2, index as f32 * 0.5, 0.0),
                spin_direction: if index % 2 == 0 { 1.0 } else { -1.0 },
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub pixel_ratio: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            aspect: width as f32 / height as f32,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            pixel_ratio: device_pixel_ratio.min(MAX_PIXEL_RATIO),
        }
    }

    /// Returns false and leaves the aspect untouched for a degenerate size.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }
}

/// Per-frame motion: pointer-driven easing, spin and the breathing wave.
#[derive(Debug, Clone)]
pub struct SceneMotion {
    pointer: (f32, f32),
    pub cloud_rotation: Vec3,
    pub ring_rotations: Vec<Vec3>,
    ring_spin: Vec<f32>,
    rest_positions: Vec<Vec3>,
    pub live_positions: Vec<Vec3>,
}

impl SceneMotion {
    pub fn new(cloud: &PointCloud, rings: &[RingOutline]) -> Self {
        Self {
            pointer: (0.0, 0.0),
            cloud_rotation: Vec3::default(),
            ring_rotations: rings.iter().map(|ring| ring.initial_rotation).collect(),
            ring_spin: rings.iter().map(|ring| ring.spin_direction).collect(),
            rest_positions: cloud.positions.clone(),
            live_positions: cloud.positions.clone(),
        }
    }

    /// Pointer in normalized device coordinates, x right and y up, both in [-1, 1].
    pub fn point_at(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub fn target_rotation(&self) -> (f32, f32) {
        (
            self.pointer.1 * POINTER_ROTATION_SCALE,
            self.pointer.0 * POINTER_ROTATION_SCALE,
        )
    }

    pub fn step(&mut self, elapsed_secs: f32) {
        let (target_x, target_y) = self.target_rotation();

        self.cloud_rotation.x += (target_x - self.cloud_rotation.x) * CLOUD_EASING;
        self.cloud_rotation.y += (target_y - self.cloud_rotation.y) * CLOUD_EASING;
        self.cloud_rotation.z = elapsed_secs * CLOUD_SPIN_RATE;

        for (rotation, spin) in self.ring_rotations.iter_mut().zip(&self.ring_spin) {
            rotation.z = elapsed_secs * RING_SPIN_RATE * spin;
            rotation.x += (target_x * 0.5 - rotation.x) * RING_EASING;
            rotation.y += (target_y * 0.5 - rotation.y) * RING_EASING;
        }

        for (index, (live, rest)) in self
            .live_positions
            .iter_mut()
            .zip(&self.rest_positions)
            .enumerate()
        {
            let wave = (elapsed_secs + index as f32 * WAVE_PHASE_PER_POINT).sin() * WAVE_AMPLITUDE;
            *live = Vec3::new(rest.x + wave, rest.y + wave * 0.5, rest.z);
        }
    }
}

/// Maps a client-space position to [-1, 1] with y pointing up.
pub fn normalize_pointer(
    client_x: f32,
    client_y: f32,
    window_width: u32,
    window_height: u32,
) -> Option<(f32, f32)> {
    if window_width == 0 || window_height == 0 {
        return None;
    }
    Some((
        client_x / window_width as f32 * 2.0 - 1.0,
        -(client_y / window_height as f32) * 2.0 + 1.0,
    ))
}

#[cfg(test)]
#[path = "../tests/geometry_tests.rs"]
mod tests;
