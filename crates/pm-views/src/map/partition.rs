//! Contiguous partitioning of features across render layers

/// Split `items` into `parts` contiguous slices.
///
/// Part `i` covers `[i * n / parts, (i + 1) * n / parts)`, so sizes differ
/// by at most one and concatenating the parts yields `items`. Zero parts
/// is treated as one.
pub fn partition<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    let parts = parts.max(1);
    let n = items.len();
    (0..parts)
        .map(|i| &items[i * n / parts..(i + 1) * n / parts])
        .collect()
}

/// Ids of the sources and layers that carry the plotted points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsLayerSet {
    fan_out: usize,
}

impl PointsLayerSet {
    pub fn new(fan_out: usize) -> Self {
        Self {
            fan_out: fan_out.max(1),
        }
    }

    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    pub fn source_id(&self, part: usize) -> String {
        format!("points-data-{}", part + 1)
    }

    pub fn layer_id(&self, part: usize) -> String {
        format!("points-{}", part + 1)
    }

    pub fn source_ids(&self) -> Vec<String> {
        (0..self.fan_out).map(|i| self.source_id(i)).collect()
    }

    pub fn layer_ids(&self) -> Vec<String> {
        (0..self.fan_out).map(|i| self.layer_id(i)).collect()
    }
}

impl Default for PointsLayerSet {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halves() {
        for n in 0..9 {
            let items: Vec<usize> = (0..n).collect();
            let parts = partition(&items, 2);
            assert_eq!(parts.len(), 2);
            assert_eq!(parts[0].len(), n / 2);
            assert_eq!(parts[1].len(), n - n / 2);
            assert_eq!(parts.concat(), items);
        }
    }

    #[test]
    fn test_uneven_fan_out() {
        let items: Vec<u8> = (0..10).collect();
        let parts = partition(&items, 3);
        let sizes: Vec<usize> = parts.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![3, 3, 4]);
        assert_eq!(parts.concat(), items);
    }

    #[test]
    fn test_more_parts_than_items() {
        let parts = partition(&[1, 2], 4);
        assert_eq!(parts.iter().map(|p| p.len()).sum::<usize>(), 2);
        assert_eq!(parts.concat(), vec![1, 2]);
    }

    #[test]
    fn test_zero_parts_is_one() {
        assert_eq!(partition(&[1, 2, 3], 0), vec![&[1, 2, 3][..]]);
    }

    #[test]
    fn test_layer_ids() {
        let set = PointsLayerSet::default();
        assert_eq!(set.source_ids(), vec!["points-data-1", "points-data-2"]);
        assert_eq!(set.layer_ids(), vec!["points-1", "points-2"]);
        assert_eq!(PointsLayerSet::new(0).fan_out(), 1);
    }
}
