use stackworld_common::Rgba;

/// A straight-alpha RGBA pixel buffer.
///
/// This is the canvas everything is drawn to, the format view caches are
/// stored in, and the shape asset loaders hand layer sheets over in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Image {
    /// Create a fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Create an image with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap existing row-major pixels. Returns `None` on a length mismatch.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from tightly packed RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Copy a `width × height` region starting at `(x, y)`.
    /// Parts of the region outside this image come back transparent.
    pub fn crop(&self, x: i32, y: i32, width: u32, height: u32) -> Image {
        let mut out = Image::new(width, height);
        out.blit(self, -x, -y, false);
        out
    }

    /// Alpha-composite `src` with its top-left corner at `(x, y)`.
    /// The source is clipped against this image's bounds.
    pub fn draw_image(&mut self, src: &Image, x: i32, y: i32) {
        self.blit(src, x, y, true);
    }

    fn blit(&mut self, src: &Image, x: i32, y: i32, blend: bool) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x as i64 + src.width as i64).min(self.width as i64);
        let y1 = (y as i64 + src.height as i64).min(self.height as i64);
        if x0 as i64 >= x1 || y0 as i64 >= y1 {
            return;
        }
        for dy in y0 as i64..y1 {
            let sy = (dy - y as i64) as u32;
            for dx in x0 as i64..x1 {
                let sx = (dx - x as i64) as u32;
                let s = src.pixels[src.index(sx, sy)];
                let i = self.index(dx as u32, dy as u32);
                self.pixels[i] = if blend { s.over(self.pixels[i]) } else { s };
            }
        }
    }

    /// Tightly packed RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }
}
