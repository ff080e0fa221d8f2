//! Locating where a path passes behind the globe.

use foundation::{Coordinate, TessellationFlags};
use projection::{Projection, Viewport};

use crate::interpolate::Path;

/// Bisection steps before giving up on convergence.
pub const MAX_HORIZON_ITERATIONS: usize = 20;

/// Bracket length (pixels on the globe surface) below which the search
/// counts as converged.
const CONVERGED_PX: f64 = 0.5;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HorizonCrossing {
    /// Visible end of the final bracket.
    pub coord: Coordinate,
    /// `false` when the iteration cap was hit first; `coord` is then only an
    /// approximation of the limb point.
    pub converged: bool,
}

/// Bisects the segment from `a` to `b`, whose ends differ in visibility, for
/// the point where the globe starts hiding it.
pub fn find_horizon(
    a: &Coordinate,
    b: &Coordinate,
    viewport: &Viewport,
    flags: TessellationFlags,
) -> HorizonCrossing {
    let projection = viewport.projection();
    let hidden = |c: &Coordinate| projection.forward(c, viewport).occluded;

    let (mut prev, mut cur) = (*a, *b);
    let cur_hidden = hidden(&cur);

    for _ in 0..MAX_HORIZON_ITERATIONS {
        // Screen positions of hidden points mirror visible ones, so measure
        // the bracket on the sphere.
        let chord = (cur.unit_vector() - prev.unit_vector()).length();
        if chord * viewport.radius() < CONVERGED_PX {
            return HorizonCrossing {
                coord: if cur_hidden { prev } else { cur },
                converged: true,
            };
        }

        let mid = match Path::between(&prev, &cur, flags) {
            Some(path) => path.point(&prev, &cur, 0.5, false),
            None => Coordinate::nlerp(&prev, &cur, 0.5),
        };
        if hidden(&mid) != cur_hidden {
            prev = mid;
        } else {
            cur = mid;
        }
    }

    tracing::trace!(?a, ?b, "horizon search hit the iteration cap");
    HorizonCrossing {
        coord: if cur_hidden { prev } else { cur },
        converged: false,
    }
}
