use std::error::Error;

use qrforge::{ECLevel, MaskPattern, Qr, Version};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "HELLO WORLD";

    let mut qr = Qr::new(Version::new(3)?);

    qr.encode(data.as_bytes(), ECLevel::H, None)?;
    println!("{}", qr.to_str(1));

    qr.encode(data.as_bytes(), ECLevel::H, Some(MaskPattern::new(0)))?;
    println!("{}", qr.to_str(1));

    Ok(())
}
