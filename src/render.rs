use image::{GrayImage, Luma};

use crate::qr::Qr;

// Render
//------------------------------------------------------------------------------

// Both renderers read the symbol purely through the public module accessor
// and pad it with the standard 4-module quiet zone.
impl Qr {
    pub fn render(&self, module_size: u32) -> GrayImage {
        let qz_size = QUIET_ZONE_SIZE as u32 * module_size;
        let qr_size = self.side_size() as u32 * module_size;
        let total_size = qz_size + qr_size + qz_size;

        let mut canvas = GrayImage::new(total_size, total_size);
        for y in 0..total_size {
            for x in 0..total_size {
                let pixel = if x < qz_size || x >= qz_size + qr_size || y < qz_size || y >= qz_size + qr_size
                {
                    Luma([255])
                } else {
                    let mx = ((x - qz_size) / module_size) as usize;
                    let my = ((y - qz_size) / module_size) as usize;
                    if self.module(mx, my) {
                        Luma([0])
                    } else {
                        Luma([255])
                    }
                };
                canvas.put_pixel(x, y, pixel);
            }
        }
        canvas
    }

    pub fn to_str(&self, module_size: usize) -> String {
        let qz_size = QUIET_ZONE_SIZE * module_size;
        let qr_size = self.side_size() * module_size;
        let total_size = qz_size + qr_size + qz_size;

        let mut canvas = String::with_capacity(total_size * (total_size + 1));
        for y in 0..total_size {
            for x in 0..total_size {
                let dark = x >= qz_size
                    && x < qz_size + qr_size
                    && y >= qz_size
                    && y < qz_size + qr_size
                    && self.module((x - qz_size) / module_size, (y - qz_size) / module_size);
                canvas.push(if dark { '█' } else { ' ' });
            }
            canvas.push('\n');
        }
        canvas
    }
}

static QUIET_ZONE_SIZE: usize = 4;
