use image::DynamicImage;
use image::imageops::FilterType;
use std::path::Path;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Errors from decoding an image into a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureOptions {
    /// Sample as sRGB colour data. Off for data maps such as specular.
    pub srgb: bool,
    /// Flip rows so the first row of the file ends up at v = 1.
    pub flip_vertically: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            srgb: true,
            flip_vertically: false,
        }
    }
}

/// Texel layout chosen from the decoded image's channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelLayout {
    /// One channel, sampled as `(r, 0, 0, 1)`.
    Red,
    /// Anything else, expanded to four channels.
    Rgba,
}

impl TexelLayout {
    pub fn for_channels(channels: u8) -> Self {
        if channels == 1 { Self::Red } else { Self::Rgba }
    }

    fn format(self, srgb: bool) -> wgpu::TextureFormat {
        match (self, srgb) {
            (Self::Red, _) => wgpu::TextureFormat::R8Unorm,
            (Self::Rgba, true) => wgpu::TextureFormat::Rgba8UnormSrgb,
            (Self::Rgba, false) => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    fn bytes_per_texel(self) -> u32 {
        match self {
            Self::Red => 1,
            Self::Rgba => 4,
        }
    }

    /// Normalize a decoded image to 8-bit texels of this layout.
    pub fn convert(self, image: &DynamicImage) -> DynamicImage {
        match self {
            Self::Red => DynamicImage::ImageLuma8(image.to_luma8()),
            Self::Rgba => DynamicImage::ImageRgba8(image.to_rgba8()),
        }
    }
}

/// Full mip chain down to 1x1, level 0 first.
pub fn mip_chain(base: DynamicImage) -> Vec<DynamicImage> {
    let mut levels = vec![base];
    loop {
        let Some(last) = levels.last() else {
            break;
        };
        let (w, h) = (last.width(), last.height());
        if w <= 1 && h <= 1 {
            break;
        }
        let next = last.resize_exact((w / 2).max(1), (h / 2).max(1), FilterType::Triangle);
        levels.push(next);
    }
    levels
}

/// A sampled 2D texture and its default view.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
}

/// Convert to the upload layout, apply the flip and build the mip chain.
pub fn prepare_levels(
    image: &DynamicImage,
    options: TextureOptions,
) -> (TexelLayout, Vec<DynamicImage>) {
    let layout = TexelLayout::for_channels(image.color().channel_count());
    let mut base = layout.convert(image);
    if options.flip_vertically {
        base = base.flipv();
    }
    (layout, mip_chain(base))
}

/// Read and decode an image file into upload-ready mip levels.
pub fn decode_levels(
    path: &Path,
    options: TextureOptions,
) -> Result<(TexelLayout, Vec<DynamicImage>), TextureError> {
    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)?;
    Ok(prepare_levels(&image, options))
}

impl Texture {
    /// Decode an image file and upload it with a full mip chain.
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        options: TextureOptions,
    ) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let (layout, levels) = decode_levels(path, options)?;
        Ok(Self::upload(
            device,
            queue,
            layout,
            &levels,
            options.srgb,
            &path.display().to_string(),
        ))
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DynamicImage,
        options: TextureOptions,
        label: &str,
    ) -> Self {
        let (layout, levels) = prepare_levels(image, options);
        Self::upload(device, queue, layout, &levels, options.srgb, label)
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: TexelLayout,
        levels: &[DynamicImage],
        srgb: bool,
        label: &str,
    ) -> Self {
        let format = layout.format(srgb);
        let (width, height) = levels.first().map_or((1, 1), |l| (l.width(), l.height()));
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: levels.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_bytes(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(level.width() * layout.bytes_per_texel()),
                    rows_per_image: Some(level.height()),
                },
                wgpu::Extent3d {
                    width: level.width(),
                    height: level.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        tracing::debug!(
            "uploaded texture {label}: {}x{} {:?}, {} mips",
            size.width,
            size.height,
            format,
            levels.len()
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            format,
        }
    }

    /// 1x1 texture of a single colour, used where a material has no map.
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        srgb: bool,
        label: &str,
    ) -> Self {
        let image = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(1, 1, image::Rgba(rgba)));
        Self::from_image(
            device,
            queue,
            &image,
            TextureOptions {
                srgb,
                flip_vertically: false,
            },
            label,
        )
    }

    pub fn depth(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// Load a texture from disk; on failure, log and fall back to a solid colour
/// so the frame still renders.
pub fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
    options: TextureOptions,
    fallback: [u8; 4],
) -> Texture {
    match Texture::from_path(device, queue, path, options) {
        Ok(texture) => texture,
        Err(e) => {
            tracing::error!("texture failed to load at path: {} ({e})", path.display());
            Texture::solid(device, queue, fallback, options.srgb, "fallback_texture")
        }
    }
}

/// Sampler shared by all material maps: repeat wrap, trilinear filtering.
pub fn material_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("material_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
