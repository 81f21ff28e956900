use crate::error::{AppError, AppResult};

const HEADER_LEN: usize = 8;
const VALUE_LEN: usize = std::mem::size_of::<f32>();

/// Square, dense similarity matrix stored row-major.
///
/// `row(i)[j]` is the score between rows i and j of the aligned table.
/// Symmetry is neither required nor checked.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(AppError::Artifact(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
            values.extend(row);
        }

        Ok(Self { dim, values })
    }

    /// Decodes the on-disk layout: `u32 rows`, `u32 cols` (little-endian), then
    /// `rows * cols` little-endian `f32` values.
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(AppError::Artifact(format!(
                "matrix header truncated: {} bytes",
                bytes.len()
            )));
        }

        let rows = read_u32(&bytes[0..4]) as usize;
        let cols = read_u32(&bytes[4..8]) as usize;
        if rows != cols {
            return Err(AppError::Artifact(format!(
                "matrix is not square: {} x {}",
                rows, cols
            )));
        }

        let payload = &bytes[HEADER_LEN..];
        let expected_len = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(VALUE_LEN))
            .ok_or_else(|| AppError::Artifact(format!("matrix too large: {} x {}", rows, cols)))?;
        if payload.len() != expected_len {
            return Err(AppError::Artifact(format!(
                "invalid matrix payload length: expected {}, got {}",
                expected_len,
                payload.len()
            )));
        }

        let values = payload
            .chunks_exact(VALUE_LEN)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(Self { dim: rows, values })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.values.len() * VALUE_LEN);
        let dim = self.dim as u32;
        bytes.extend_from_slice(&dim.to_le_bytes());
        bytes.extend_from_slice(&dim.to_le_bytes());
        for &value in &self.values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Number of rows (and columns)
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.dim {
            return None;
        }
        let start = index * self.dim;
        Some(&self.values[start..start + self.dim])
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
