/// Upper bound on the number of points a stepped range may produce
pub(crate) const MAX_SAMPLES: usize = 1 << 24;

/// Evenly spaced samples over a closed interval, like `numpy.linspace`.
pub(crate) struct Linspace {
    start: f64,
    end: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub(crate) fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 { (max - min) / (n - 1) as f64 } else { 0. };

        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }

    /// Samples `min, min + step, ...` up to and including `max` when it lies on the grid.
    /// `None` when that would take more than [`MAX_SAMPLES`] points.
    pub(crate) fn stepped(min: f64, max: f64, step: f64) -> Option<Self> {
        // floor matches an arange over the closed interval; the tolerance keeps
        // ratios like 4.999999999999999 from flooring to 4
        let intervals = ((max - min) / step + f64::EPSILON * 8.).floor();

        if !(0. ..MAX_SAMPLES as f64).contains(&intervals) {
            return None;
        }

        let num = (intervals as usize).checked_add(1)?;
        let end = min + step * intervals;

        Some(Linspace::new(min, end, num))
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            return None;
        }

        let i = self.index;
        self.index += 1;

        // Pin the final sample so the upper bound is hit exactly
        if i + 1 == self.len && self.len > 1 {
            Some(self.end)
        } else {
            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace() {
    let points: Vec<_> = Linspace::new(0., 1., 5).collect();

    assert_eq!(points, vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(3., 7., 1).collect::<Vec<_>>(), vec![3.]);
    assert_eq!(Linspace::new(3., 7., 0).count(), 0);
}

#[test]
fn test_stepped() {
    let points: Vec<_> = Linspace::stepped(0., 10., 1.).unwrap().collect();

    assert_eq!(points.len(), 11);
    assert_eq!(points[0], 0.);
    assert_eq!(points[10], 10.);

    let points: Vec<_> = Linspace::stepped(0., 1., 0.1).unwrap().collect();

    assert_eq!(points.len(), 11);
    assert_eq!(points[10], 1.);

    // The upper bound is dropped when it does not sit on the grid
    let points: Vec<_> = Linspace::stepped(0., 1., 0.3).unwrap().collect();

    assert_eq!(points.len(), 4);
    assert!((points[3] - 0.9).abs() < 1e-12);

    // Counts that do not fit are refused instead of overflowing
    assert!(Linspace::stepped(0., 1e300, 1e-300).is_none());
    assert!(Linspace::stepped(0., MAX_SAMPLES as f64, 1.).is_none());
    assert_eq!(Linspace::stepped(0., (MAX_SAMPLES - 2) as f64, 1.).map(|l| l.len()), Some(MAX_SAMPLES - 1));
}
