use crate::codec;
use crate::ec;
use crate::error::QRResult;
use crate::mask::{apply_best_mask, MaskPattern};
use crate::matrix::Matrix;
use crate::metadata::{format_info, ECLevel, Version};

// QR encoder
//------------------------------------------------------------------------------

// Owns the module grid for one symbol version. Every encode call rebuilds
// the grid in place; failed calls leave it indeterminate.
pub struct Qr {
    version: Version,
    matrix: Matrix,
    status: bool,
}

impl Qr {
    pub fn new(version: Version) -> Self {
        Self { version, matrix: Matrix::new(version), status: false }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn side_size(&self) -> usize {
        self.version.width()
    }

    // Color of module (x, y); x grows right, y grows down, origin top left.
    // Only meaningful after a successful encode.
    pub fn module(&self, x: usize, y: usize) -> bool {
        debug_assert!(self.status, "Last encode was not successful");
        self.matrix.get(y as i16, x as i16)
    }

    pub fn encode(
        &mut self,
        data: &[u8],
        ec_level: ECLevel,
        mask: Option<MaskPattern>,
    ) -> QRResult<MaskPattern> {
        self.status = false;

        let encoded = codec::encode(data, self.version, ec_level)?;
        let payload = ec::encode_blocks(encoded.data(), self.version, ec_level);

        self.matrix.reset();
        self.matrix.draw_function_patterns();
        self.matrix.draw_payload(&payload);

        let mask = match mask {
            Some(pattern) => pattern,
            None => apply_best_mask(&mut self.matrix, ec_level),
        };
        self.matrix.draw_format_info(format_info(ec_level, mask));
        self.matrix.apply_mask(mask);

        self.status = true;
        Ok(mask)
    }
}
