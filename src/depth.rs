/// Depth calculates minimum, maximum and average of leaf-node depths in
/// the [`crate::Index`] tree. The tree is never rebalanced, a large gap
/// between `min` and `max` means the tree is degenerating into a list.
#[derive(Clone, Debug, Default)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        self.samples += 1;
        self.total += depth;
        if self.samples == 1 || depth < self.min {
            self.min = depth
        }
        if depth > self.max {
            self.max = depth
        }
    }

    /// Return number of leaf-nodes sampled.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average depth of leaf-nodes, zero when nothing was
    /// sampled.
    pub fn mean(&self) -> usize {
        match self.samples {
            0 => 0,
            n => self.total / n,
        }
    }

    /// Render depth statistics on a single line, for logs.
    pub fn summary(&self) -> String {
        format!(
            "leaves {} depth (min, avg, max): {:?}",
            self.samples,
            (self.min, self.mean(), self.max)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_sample() {
        let mut depth = Depth::new();
        assert_eq!(depth.mean(), 0);
        assert_eq!(depth.summary(), "leaves 0 depth (min, avg, max): (0, 0, 0)");

        for d in [3, 1, 2, 300].iter() {
            depth.sample(*d);
        }
        assert_eq!(depth.samples(), 4);
        assert_eq!(depth.min(), 1);
        assert_eq!(depth.max(), 300);
        assert_eq!(depth.mean(), 76);
        assert_eq!(
            depth.summary(),
            "leaves 4 depth (min, avg, max): (1, 76, 300)"
        );
    }
}
