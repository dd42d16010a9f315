//! Parallel decoding of independent session streams (feature `batch-ops`).

use rayon::prelude::*;
use std::io::{Read, Write};

use crate::decryptor::DecodeStats;
use crate::keys::SessionKeys;
use crate::{decrypt, HermesError};

/// Decode every `(input, output)` pair in parallel with the same keys.
///
/// Each stream gets its own session state. Returns the per-stream stats in input
/// order, or the first error encountered.
pub fn decrypt_batch<R, W>(
    batch: &mut [(R, W)],
    keys: &SessionKeys,
) -> Result<Vec<DecodeStats>, HermesError>
where
    R: Read + Send,
    W: Write + Send,
{
    batch
        .par_iter_mut()
        .map(|(src, dst)| decrypt(src, dst, keys))
        .collect()
}
