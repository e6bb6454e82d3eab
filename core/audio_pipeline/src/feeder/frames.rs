use std::{io, slice::ChunksExact};

/// Coefficient vectors in chronological order, stored in one preallocated
/// buffer of `len() * vector_size()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientFrames {
    values: Vec<f32>,
    vector_size: usize,
}

impl CoefficientFrames {
    pub(crate) fn zeroed(frame_count: usize, vector_size: usize) -> Self {
        Self {
            values: vec![0.0; frame_count * vector_size],
            vector_size,
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.values.len().checked_div(self.vector_size).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.vector_size)?;
        self.values.get(start..start + self.vector_size)
    }

    pub fn iter(&self) -> ChunksExact<'_, f32> {
        self.values.chunks_exact(self.vector_size)
    }

    pub fn as_flat(&self) -> &[f32] {
        &self.values
    }

    /// Every slot from frame `first` to the end.
    pub(crate) fn slots_from_mut(&mut self, first: usize) -> &mut [f32] {
        &mut self.values[first * self.vector_size..]
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut [f32] {
        let start = index * self.vector_size;
        &mut self.values[start..start + self.vector_size]
    }

    /// Writes one line per frame with tab-separated values.
    pub fn write_tsv<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        for frame in self.iter() {
            for (i, value) in frame.iter().enumerate() {
                if i > 0 {
                    out.write_all(b"\t")?;
                }
                write!(out, "{value}")?;
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CoefficientFrames {
    type Item = &'a [f32];
    type IntoIter = ChunksExact<'a, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
