use num::Float;
use tracing::trace;

/// Membership degree of `xx` on a sampled curve, similar to `numpy.interp`.
///
/// The universe must be sorted ascending and as long as `membership`. Queries
/// that land on a sample return its degree exactly; queries outside the
/// universe clamp to the nearest edge degree.
pub(crate) fn interp_membership<F: Float>(universe: &[F], membership: &[F], xx: F) -> F {
    debug_assert_eq!(universe.len(), membership.len());

    // Index of the first sample >= xx
    let hi = universe.partition_point(|&x| x < xx);

    if hi == universe.len() {
        trace!("interpolation query above the universe, clamping");
        return membership[hi - 1];
    }
    if universe[hi] == xx {
        return membership[hi];
    }
    if hi == 0 {
        trace!("interpolation query below the universe, clamping");
        return membership[0];
    }

    let lo = hi - 1;
    let (x1, x2) = (universe[lo], universe[hi]);
    let (m1, m2) = (membership[lo], membership[hi]);
    let slope = (m2 - m1) / (x2 - x1);

    slope * (xx - x1) + m1
}
