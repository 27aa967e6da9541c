//! Anti-aliased circle perimeter rasterisation.
use glam::IVec2;

/// Pixels of an anti-aliased circle perimeter of `radius` around `center`.
///
/// For every step along the first octant both pixels bracketing the exact circle are
/// emitted, then mirrored into all eight octants. Duplicates are possible and the
/// result is not clipped. A non-positive radius yields no pixels.
pub fn circle_perimeter_aa(center: IVec2, radius: i32) -> Vec<IVec2> {
    if radius <= 0 {
        return Vec::new();
    }

    let radius_sq = (radius as f64) * (radius as f64);
    let mut out = Vec::with_capacity((16 * radius as usize).min(1 << 20));
    push_octants(&mut out, center, 0, radius);

    let mut x = 0;
    let mut y = radius;
    let mut frac_prev = 0.0;
    while y > x + 1 {
        x += 1;
        let exact = (radius_sq - (x as f64) * (x as f64)).sqrt();
        let frac = exact.ceil() - exact;
        if frac < frac_prev {
            y -= 1;
        }
        push_octants(&mut out, center, x, y);
        push_octants(&mut out, center, x, y - 1);
        frac_prev = frac;
    }

    out
}

#[inline]
fn push_octants(out: &mut Vec<IVec2>, c: IVec2, a: i32, b: i32) {
    out.extend_from_slice(&[
        c + IVec2::new(a, b),
        c + IVec2::new(-a, b),
        c + IVec2::new(a, -b),
        c + IVec2::new(-a, -b),
        c + IVec2::new(b, a),
        c + IVec2::new(-b, a),
        c + IVec2::new(b, -a),
        c + IVec2::new(-b, -a),
    ]);
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn dist(p: IVec2, c: IVec2) -> f64 {
        let d = (p - c).as_dvec2();
        d.length()
    }

    #[test]
    fn non_positive_radius_is_empty() {
        assert!(circle_perimeter_aa(IVec2::ZERO, 0).is_empty());
        assert!(circle_perimeter_aa(IVec2::ZERO, -3).is_empty());
    }

    #[test]
    fn pixels_bracket_the_exact_circle() {
        let c = IVec2::new(50, 50);
        for radius in [1, 2, 5, 20, 40] {
            for p in circle_perimeter_aa(c, radius) {
                let d = dist(p, c);
                assert!(
                    d > radius as f64 - 1.5 && d < radius as f64 + 1.0,
                    "radius {radius}: pixel {p:?} at distance {d}"
                );
            }
        }
    }

    #[test]
    fn perimeter_is_closed_and_symmetric() {
        let c = IVec2::new(0, 0);
        let pts: HashSet<IVec2> = circle_perimeter_aa(c, 20).into_iter().collect();
        for p in &pts {
            assert!(pts.contains(&IVec2::new(-p.x, p.y)));
            assert!(pts.contains(&IVec2::new(p.y, p.x)));
        }
        // every column crossing the circle has at least one perimeter pixel above the axis
        for x in -20..=20 {
            assert!(pts.iter().any(|p| p.x == x && p.y >= 0), "gap at column {x}");
        }
    }
}
