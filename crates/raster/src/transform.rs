use crate::image::Image;

impl Image {
    /// Resample to `width × height` with nearest-neighbor sampling.
    pub fn scaled(&self, width: u32, height: u32) -> Image {
        let mut out = Image::new(width, height);
        if self.is_empty() || width == 0 || height == 0 {
            return out;
        }
        let (sw, sh) = (self.width() as u64, self.height() as u64);
        let (w, h) = (width as u64, height as u64);
        for y in 0..height {
            // sample at the destination pixel center
            let sy = ((2 * y as u64 + 1) * sh / (2 * h)) as u32;
            for x in 0..width {
                let sx = ((2 * x as u64 + 1) * sw / (2 * w)) as u32;
                if let Some(p) = self.get(sx, sy) {
                    out.set(x, y, p);
                }
            }
        }
        out
    }

    /// Rotate by `degrees` (clockwise on screen) about the image center.
    ///
    /// The canvas keeps its size, so corners that rotate outside are
    /// clipped and uncovered areas are transparent.
    pub fn rotated(&self, degrees: f64) -> Image {
        let (w, h) = (self.width(), self.height());
        let mut out = Image::new(w, h);
        if self.is_empty() {
            return out;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let cx = w as f64 / 2.0;
        let cy = h as f64 / 2.0;
        for y in 0..h {
            let dy = y as f64 + 0.5 - cy;
            for x in 0..w {
                let dx = x as f64 + 0.5 - cx;
                // inverse rotation maps the destination back into the source
                let sx = (dx * cos + dy * sin + cx).floor();
                let sy = (-dx * sin + dy * cos + cy).floor();
                if sx < 0.0 || sy < 0.0 {
                    continue;
                }
                if let Some(p) = self.get(sx as u32, sy as u32) {
                    out.set(x, y, p);
                }
            }
        }
        out
    }

    /// Integer upscale: each pixel becomes a `factor × factor` block.
    pub fn upscaled(&self, factor: u32) -> Image {
        let factor = factor.max(1);
        let mut out = Image::new(self.width() * factor, self.height() * factor);
        for y in 0..out.height() {
            for x in 0..out.width() {
                if let Some(p) = self.get(x / factor, y / factor) {
                    out.set(x, y, p);
                }
            }
        }
        out
    }
}
