use crate::edge::edge_count;
use crate::error::SplitError;

/// Bit per raw edge. A consistent selection has `4 * polygon_count` bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSelection {
    bits: Vec<bool>,
}

impl EdgeSelection {
    pub fn new(polygon_count: usize) -> Self {
        Self {
            bits: vec![false; edge_count(polygon_count)],
        }
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn from_raw_indices(indices: &[usize], polygon_count: usize) -> Result<Self, SplitError> {
        let mut selection = Self::new(polygon_count);
        for &index in indices {
            selection.select(index)?;
        }
        Ok(selection)
    }

    /// Set raw indices in ascending order. Any set bit past the edges of
    /// `polygon_count` polygons is rejected.
    pub fn to_raw_indices(&self, polygon_count: usize) -> Result<Vec<usize>, SplitError> {
        let edge_count = edge_count(polygon_count);
        self.iter_selected()
            .map(|index| {
                if index >= edge_count {
                    return Err(SplitError::InvalidIndex { index, edge_count });
                }
                Ok(index)
            })
            .collect()
    }

    /// Set raw indices in ascending order, unchecked.
    pub fn iter_selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(index, selected)| selected.then_some(index))
    }

    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    pub fn select(&mut self, index: usize) -> Result<(), SplitError> {
        let edge_count = self.bits.len();
        let slot = self
            .bits
            .get_mut(index)
            .ok_or(SplitError::InvalidIndex { index, edge_count })?;
        *slot = true;
        Ok(())
    }

    pub fn deselect(&mut self, index: usize) -> bool {
        match self.bits.get_mut(index) {
            Some(slot) => std::mem::replace(slot, false),
            None => false,
        }
    }

    pub fn deselect_all(&mut self) {
        self.bits.iter_mut().for_each(|bit| *bit = false);
    }

    pub fn resize_for(&mut self, polygon_count: usize) {
        self.bits.resize(edge_count(polygon_count), false);
    }
}

/// Clears `selection`, sizes it for `polygon_count` polygons and marks exactly
/// `indices`. Selection is not mirrored onto neighbouring polygons that share a
/// geometric edge.
pub fn rebuild_selection(
    selection: &mut EdgeSelection,
    polygon_count: usize,
    indices: &[usize],
) -> Result<(), SplitError> {
    let edge_count = edge_count(polygon_count);
    if let Some(&index) = indices.iter().find(|index| **index >= edge_count) {
        return Err(SplitError::InvalidIndex { index, edge_count });
    }
    selection.deselect_all();
    selection.resize_for(polygon_count);
    for &index in indices {
        selection.select(index)?;
    }
    Ok(())
}
