use crate::gf256;
use crate::metadata::{ECLevel, Version};

// ECC: Error correction codeword generator & interleaver
//------------------------------------------------------------------------------

// Splits data codewords into blocks, computes the ecc codewords of each and
// scatters both into the column-major interleaved payload layout. The first
// n short blocks hold one codeword less; the interleave index drops back at
// the boundary to skip the slots short blocks never fill.
pub fn encode_blocks(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<u8> {
    let n_blocks = version.ec_block_count(ec_level);
    let ecc_len = version.ecc_per_block(ec_level);
    let capacity = version.total_codewords();

    let n_data_bytes = capacity - ecc_len * n_blocks;
    let short_len = capacity / n_blocks - ecc_len;
    let n_short_blocks = n_blocks - capacity % n_blocks;

    debug_assert!(
        data.len() == n_data_bytes,
        "Data len doesn't match data capacity: Data len {}, Capacity {n_data_bytes}",
        data.len(),
    );

    let gen_poly = gf256::generator_poly(ecc_len);
    let mut payload = vec![0; capacity];
    let mut block_start = 0;
    for i in 0..n_blocks {
        let data_len = if i < n_short_blocks { short_len } else { short_len + 1 };
        let block = &data[block_start..block_start + data_len];
        block_start += data_len;

        let mut k = i;
        for (j, &codeword) in block.iter().enumerate() {
            if j == short_len {
                k -= n_short_blocks;
            }
            payload[k] = codeword;
            k += n_blocks;
        }

        let ecc = gf256::poly_rem(block, &gen_poly);
        for (j, &codeword) in ecc.iter().enumerate() {
            payload[n_data_bytes + i + j * n_blocks] = codeword;
        }
    }
    payload
}
