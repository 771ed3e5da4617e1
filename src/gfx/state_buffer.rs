//! State textures for the automaton
//!
//! Each `StateBuffer` holds one full generation: one binary cell per surface
//! pixel, stored redundantly in all four RGBA channels so the texture can be
//! sampled by the rule pass and presented by the composite pass alike.

use rand::Rng;

/// Texel format of every state buffer. Non-sRGB so a written 1.0 samples
/// back as exactly 1.0.
pub const STATE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// GPU texture holding one generation of cells
///
/// The sampler uses repeat addressing on both axes, which is what makes
/// neighbor lookups wrap toroidally in the rule shader, and nearest
/// filtering so cell values stay exactly 0 or 1.
pub struct StateBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Allocation number, used for debug labels. Assigned by the simulation
    /// engine from an explicit counter.
    pub index: u32,
    width: u32,
    height: u32,
}

impl StateBuffer {
    /// Allocates a buffer where every cell is independently alive with
    /// probability 0.5
    pub fn allocate(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        index: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("State Buffer {}", index)),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: STATE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let pixels = random_cells(width, height, &mut rand::rng());
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("State Buffer {} Sampler", index)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            index,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Generates the RGBA8 initial fill: each cell alive (255) with p=0.5, the
/// binary value repeated across R, G and B, alpha opaque
pub fn random_cells(width: u32, height: u32, rng: &mut impl Rng) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        let value = if rng.random_bool(0.5) { 255 } else { 0 };
        pixels.extend_from_slice(&[value, value, value, 255]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_cells_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let pixels = random_cells(16, 9, &mut rng);
        assert_eq!(pixels.len(), 16 * 9 * 4);

        for texel in pixels.chunks_exact(4) {
            assert!(texel[0] == 0 || texel[0] == 255);
            // Binary value carried redundantly in every color channel.
            assert_eq!(texel[0], texel[1]);
            assert_eq!(texel[0], texel[2]);
            assert_eq!(texel[3], 255);
        }
    }

    #[test]
    fn test_random_cells_half_alive() {
        let mut rng = StdRng::seed_from_u64(42);
        let pixels = random_cells(256, 256, &mut rng);
        let alive = pixels
            .chunks_exact(4)
            .filter(|texel| texel[0] == 255)
            .count();
        let fraction = alive as f64 / (256.0 * 256.0);
        assert!((0.45..0.55).contains(&fraction), "fraction = {fraction}");
    }
}
