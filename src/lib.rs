//! QR code encoder conforming to ISO/IEC 18004.
//!
//! Builds the full encoding pipeline: mode selection and bitstream
//! construction, Reed-Solomon error correction over GF(256), interleaved
//! block layout, function pattern placement, zig-zag data placement,
//! penalty-scored masking and BCH-protected format/version information.
//!
//! ```
//! use qrforge::{ECLevel, Qr, Version};
//!
//! let mut qr = Qr::new(Version::new(1).unwrap());
//! qr.encode(b"HELLO WORLD", ECLevel::M, None).unwrap();
//! assert_eq!(qr.side_size(), 21);
//! let dark = qr.module(0, 0);
//! # assert!(dark);
//! ```

mod bits;
mod codec;
mod ec;
mod error;
mod gf256;
mod iter;
mod mask;
mod matrix;
mod metadata;
mod qr;
mod render;

pub use error::{QRError, QRResult};
pub use mask::MaskPattern;
pub use metadata::{ECLevel, Version};
pub use qr::Qr;
