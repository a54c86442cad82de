//! Systematic Reed-Solomon coder over GF(2^8)
//!
//! The encoding matrix is a `(k + m) x k` Vandermonde matrix multiplied by the
//! inverse of its own top square. The top `k` rows become the identity, so
//! data shards pass through unchanged, and the bottom `m` rows generate
//! parity. Every `k`-row selection of a Vandermonde matrix with distinct
//! evaluation points is invertible, and right-multiplying by an invertible
//! matrix preserves that, so any `k` surviving shards are enough to rebuild
//! the rest.

use super::error::{CodingError, CodingResult, MAX_TOTAL_SHARDS};
use super::galois::{build_mul_table, process_slice_multiply, process_slice_multiply_add};
use super::matrix::Matrix;
use crate::coder::ErasureCoder;
use crate::config::CodecConfig;
use log::{debug, trace};
use rayon::prelude::*;

/// Reed-Solomon erasure coder for a fixed data/parity shard count
#[derive(Debug, Clone)]
pub struct ReedSolomon {
    data_shards: usize,
    parity_shards: usize,
    /// Full `(k + m) x k` encoding matrix
    matrix: Matrix,
    /// Rows `k..k+m` of `matrix`, kept apart for the encode hot path
    parity_rows: Matrix,
    config: CodecConfig,
}

impl ReedSolomon {
    pub fn new(data_shards: usize, parity_shards: usize) -> CodingResult<Self> {
        Self::with_config(data_shards, parity_shards, CodecConfig::default())
    }

    pub fn with_config(
        data_shards: usize,
        parity_shards: usize,
        config: CodecConfig,
    ) -> CodingResult<Self> {
        if data_shards == 0 {
            return Err(CodingError::NoDataShards);
        }
        let total = data_shards
            .checked_add(parity_shards)
            .filter(|&t| t <= MAX_TOTAL_SHARDS)
            .ok_or(CodingError::TooManyShards {
                total: data_shards.saturating_add(parity_shards),
            })?;

        let vandermonde = Matrix::vandermonde(total, data_shards);
        let top = vandermonde.sub_rows(0, data_shards);
        let matrix = vandermonde.multiply(&top.invert()?)?;
        let parity_rows = matrix.sub_rows(data_shards, total);

        debug!(
            "Built {}x{} Reed-Solomon encoding matrix",
            matrix.rows(),
            matrix.cols()
        );

        Ok(Self {
            data_shards,
            parity_shards,
            matrix,
            parity_rows,
            config,
        })
    }

    pub fn encoding_matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compute one output buffer per row of `rows` as `row · inputs`
    fn code_shards(&self, rows: &Matrix, inputs: &[&[u8]], len: usize) -> Vec<Vec<u8>> {
        let compute_row = |row: usize| {
            let mut output = vec![0u8; len];
            for (col, input) in inputs.iter().enumerate() {
                let tables = build_mul_table(rows.get(row, col));
                if col == 0 {
                    process_slice_multiply(input, &mut output, &tables);
                } else {
                    process_slice_multiply_add(input, &mut output, &tables);
                }
            }
            output
        };

        if self.config.use_parallel(len) && rows.rows() > 1 {
            (0..rows.rows()).into_par_iter().map(compute_row).collect()
        } else {
            (0..rows.rows()).map(compute_row).collect()
        }
    }
}

/// Validate the buffer set handed to a coder.
pub fn check_shard_buffers(
    shards: &[Vec<u8>],
    expected: usize,
    offset: usize,
    len: usize,
) -> CodingResult<()> {
    if shards.len() != expected {
        return Err(CodingError::ShardCountMismatch {
            expected,
            got: shards.len(),
        });
    }

    let needed = offset.checked_add(len).unwrap_or(usize::MAX);
    match shards.iter().position(|s| s.len() < needed) {
        Some(index) => Err(CodingError::ShardTooShort {
            index,
            len: shards[index].len(),
            needed,
        }),
        None => Ok(()),
    }
}

fn write_outputs(shards: &mut [Vec<u8>], targets: &[usize], outputs: Vec<Vec<u8>>, offset: usize) {
    for (&index, output) in targets.iter().zip(outputs) {
        shards[index][offset..offset + output.len()].copy_from_slice(&output);
    }
}

impl ErasureCoder for ReedSolomon {
    fn data_shard_count(&self) -> usize {
        self.data_shards
    }

    fn parity_shard_count(&self) -> usize {
        self.parity_shards
    }

    fn encode_parity(
        &self,
        shards: &mut [Vec<u8>],
        offset: usize,
        len: usize,
    ) -> CodingResult<()> {
        check_shard_buffers(shards, self.total_shard_count(), offset, len)?;
        if self.parity_shards == 0 {
            return Ok(());
        }

        let k = self.data_shards;
        let inputs: Vec<&[u8]> = shards[..k].iter().map(|s| &s[offset..offset + len]).collect();
        let parity = self.code_shards(&self.parity_rows, &inputs, len);

        let targets: Vec<usize> = (k..self.total_shard_count()).collect();
        write_outputs(shards, &targets, parity, offset);

        trace!("Encoded {} parity shards of {} bytes", self.parity_shards, len);
        Ok(())
    }

    fn reconstruct_missing(
        &self,
        shards: &mut [Vec<u8>],
        present: &[bool],
        offset: usize,
        len: usize,
    ) -> CodingResult<()> {
        let total = self.total_shard_count();
        check_shard_buffers(shards, total, offset, len)?;
        if present.len() != total {
            return Err(CodingError::PresenceLengthMismatch {
                expected: total,
                got: present.len(),
            });
        }

        let k = self.data_shards;
        let present_count = present.iter().filter(|&&p| p).count();
        if present_count == total {
            return Ok(());
        }
        if present_count < k {
            return Err(CodingError::NotEnoughShards {
                needed: k,
                present: present_count,
            });
        }

        let missing_data: Vec<usize> = (0..k).filter(|&i| !present[i]).collect();
        let missing_parity: Vec<usize> = (k..total).filter(|&i| !present[i]).collect();

        debug!(
            "Reconstructing {} data and {} parity shards",
            missing_data.len(),
            missing_parity.len()
        );

        if !missing_data.is_empty() {
            // Any k present rows form an invertible sub-matrix; take the first k
            let sub_indices: Vec<usize> = (0..total).filter(|&i| present[i]).take(k).collect();
            let decode_matrix = self.matrix.select_rows(&sub_indices).invert()?;
            let rows = decode_matrix.select_rows(&missing_data);

            let inputs: Vec<&[u8]> = sub_indices
                .iter()
                .map(|&i| &shards[i][offset..offset + len])
                .collect();
            let recovered = self.code_shards(&rows, &inputs, len);
            write_outputs(shards, &missing_data, recovered, offset);
        }

        if !missing_parity.is_empty() {
            // Data shards are complete now
            let rows = self.matrix.select_rows(&missing_parity);
            let inputs: Vec<&[u8]> = shards[..k].iter().map(|s| &s[offset..offset + len]).collect();
            let recovered = self.code_shards(&rows, &inputs, len);
            write_outputs(shards, &missing_parity, recovered, offset);
        }

        Ok(())
    }

    fn verify_parity(&self, shards: &[Vec<u8>], offset: usize, len: usize) -> CodingResult<bool> {
        check_shard_buffers(shards, self.total_shard_count(), offset, len)?;

        let k = self.data_shards;
        let inputs: Vec<&[u8]> = shards[..k].iter().map(|s| &s[offset..offset + len]).collect();
        let expected = self.code_shards(&self.parity_rows, &inputs, len);

        Ok(expected
            .iter()
            .zip(&shards[k..])
            .all(|(want, got)| want[..] == got[offset..offset + len]))
    }
}
