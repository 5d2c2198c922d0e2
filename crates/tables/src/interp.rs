//! Trilinear and tricubic interpolation over a [`TableGeometry`].
//!
//! Field data is supplied as a function from a 1-based flattened node index
//! (see [`TableGeometry::idx`]) to the stored value, so the same kernels serve
//! every table column without copying.

use crate::{
    cubic::{cubic, cubic_deriv},
    geometry::{LogPoint, TableGeometry},
};

/// Lower corner of the 4×4×4 stencil used by the tricubic kernels.
///
/// The stencil is offset one node below the enclosing cell so that the query
/// lies between its second and third nodes along each axis, then shifted as
/// needed to stay inside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stencil {
    ir0: usize,
    it0: usize,
    ic0: usize,
}

impl Stencil {
    /// Locates the stencil for `p`.
    ///
    /// The geometry must have at least four nodes along every axis.
    pub(crate) fn locate(g: &TableGeometry, p: LogPoint) -> Self {
        let start = |i: usize, n: usize| i.saturating_sub(1).clamp(1, n - 3);

        Self {
            ir0: start(g.logrho_index(p.logrho), g.nden),
            it0: start(g.logt_index(p.logt), g.ntemp),
            ic0: start(g.ye_index(p.ye), g.nye),
        }
    }
}

/// Interpolates linearly within the 2×2×2 cell enclosing `p`.
pub(crate) fn trilinear(g: &TableGeometry, p: LogPoint, data: impl Fn(usize) -> f64) -> f64 {
    let ir1 = g.logrho_index(p.logrho);
    let it1 = g.logt_index(p.logt);
    let ic1 = g.ye_index(p.ye);

    let rd = ((p.logrho - g.logrho(ir1)) / g.dlogrho()).max(0.0);
    let td = ((p.logt - g.logt(it1)) / g.dlogt()).max(0.0);
    // Ye decreases with index, so distance is measured downward from node ic1.
    let xd = ((g.ye(ic1) - p.ye) / g.dye()).max(0.0);

    let corner = |dr: usize, dt: usize, dc: usize| data(g.idx(ir1 + dr, it1 + dt, ic1 + dc));
    let lerp = |lo: f64, hi: f64, w: f64| lo * (1.0 - w) + hi * w;

    // Collapse along Ye, then temperature, then density.
    let c00 = lerp(corner(0, 0, 0), corner(0, 0, 1), xd);
    let c01 = lerp(corner(0, 1, 0), corner(0, 1, 1), xd);
    let c10 = lerp(corner(1, 0, 0), corner(1, 0, 1), xd);
    let c11 = lerp(corner(1, 1, 0), corner(1, 1, 1), xd);

    let c0 = lerp(c00, c01, td);
    let c1 = lerp(c10, c11, td);

    lerp(c0, c1, rd)
}

/// Interpolates with nested cubic fits over the stencil around `p`.
pub(crate) fn tricubic(
    g: &TableGeometry,
    s: Stencil,
    p: LogPoint,
    data: impl Fn(usize) -> f64,
) -> f64 {
    let d1 = collapse_ye(g, s, p, data);
    let (dt, st) = temperature_offset(g, s, p);
    let (dr, sr) = density_offset(g, s, p);

    let d2: [f64; 4] = std::array::from_fn(|ii| cubic(&d1[ii], dt, st));
    cubic(&d2, dr, sr)
}

/// Derivative with respect to log₁₀ T of the tricubic interpolant.
pub(crate) fn tricubic_dt(
    g: &TableGeometry,
    s: Stencil,
    p: LogPoint,
    data: impl Fn(usize) -> f64,
) -> f64 {
    let d1 = collapse_ye(g, s, p, data);
    let (dt, st) = temperature_offset(g, s, p);
    let (dr, sr) = density_offset(g, s, p);

    // Collapse density first so the last fit runs along temperature.
    let d2: [f64; 4] = std::array::from_fn(|jj| {
        let column = [d1[0][jj], d1[1][jj], d1[2][jj], d1[3][jj]];
        cubic(&column, dr, sr)
    });
    cubic_deriv(&d2, dt, st)
}

/// Derivative with respect to log₁₀ ρ of the tricubic interpolant.
pub(crate) fn tricubic_drho(
    g: &TableGeometry,
    s: Stencil,
    p: LogPoint,
    data: impl Fn(usize) -> f64,
) -> f64 {
    let d1 = collapse_ye(g, s, p, data);
    let (dt, st) = temperature_offset(g, s, p);
    let (dr, sr) = density_offset(g, s, p);

    let d2: [f64; 4] = std::array::from_fn(|ii| cubic(&d1[ii], dt, st));
    cubic_deriv(&d2, dr, sr)
}

/// Fits the 16 Ye lines of the stencil, returning `d1[rho][T]`.
fn collapse_ye(
    g: &TableGeometry,
    s: Stencil,
    p: LogPoint,
    data: impl Fn(usize) -> f64,
) -> [[f64; 4]; 4] {
    // Ye nodes are stored decreasing.
    let dx = -g.dye();
    let sx = p.ye - g.ye(s.ic0 + 1);

    std::array::from_fn(|ii| {
        std::array::from_fn(|jj| {
            let line: [f64; 4] =
                std::array::from_fn(|kk| data(g.idx(s.ir0 + ii, s.it0 + jj, s.ic0 + kk)));
            cubic(&line, dx, sx)
        })
    })
}

fn temperature_offset(g: &TableGeometry, s: Stencil, p: LogPoint) -> (f64, f64) {
    (g.dlogt(), p.logt - g.logt(s.it0 + 1))
}

fn density_offset(g: &TableGeometry, s: Stencil, p: LogPoint) -> (f64, f64) {
    (g.dlogrho(), p.logrho - g.logrho(s.ir0 + 1))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn geometry(n: usize) -> TableGeometry {
        TableGeometry {
            nden: n,
            logrho_min: 6.0,
            logrho_max: 10.0,
            ntemp: n,
            logt_min: 9.0,
            logt_max: 10.5,
            nye: n,
            ye_min: 0.4,
            ye_max: 0.5,
        }
    }

    /// Samples `f(logrho, logt, ye)` at every node in table order.
    fn tabulate(g: &TableGeometry, f: impl Fn(f64, f64, f64) -> f64) -> Vec<f64> {
        let mut values = vec![0.0; g.npoints()];
        for ir in 1..=g.nden {
            for it in 1..=g.ntemp {
                for ic in 1..=g.nye {
                    values[g.idx(ir, it, ic) - 1] = f(g.logrho(ir), g.logt(it), g.ye(ic));
                }
            }
        }
        values
    }

    fn point(logrho: f64, logt: f64, ye: f64) -> LogPoint {
        LogPoint { logrho, logt, ye }
    }

    fn cubic_field(r: f64, t: f64, y: f64) -> f64 {
        r.powi(3) - 2.0 * r * t + t * t * y + 5.0 * y.powi(3) + 1.0
    }

    #[test]
    fn stencil_stays_inside_table() {
        let g = geometry(6);

        let low = Stencil::locate(&g, point(6.0, 9.0, 0.5));
        assert_eq!((low.ir0, low.it0, low.ic0), (1, 1, 1));

        let high = Stencil::locate(&g, point(10.0, 10.5, 0.4));
        assert_eq!((high.ir0, high.it0, high.ic0), (3, 3, 3));

        // Query in the middle cell [3, 4] starts the stencil at node 2.
        let mid = Stencil::locate(&g, point(g.logrho(3) + 0.1, g.logt(3) + 0.1, g.ye(3) - 0.001));
        assert_eq!((mid.ir0, mid.it0, mid.ic0), (2, 2, 2));
    }

    #[test]
    fn both_modes_reproduce_nodes() {
        let g = geometry(5);
        let values = tabulate(&g, |r, t, y| r.sin() + t * y - y.exp());
        let data = |j: usize| values[j - 1];

        for ir in 1..=g.nden {
            for it in 1..=g.ntemp {
                for ic in 1..=g.nye {
                    let p = point(g.logrho(ir), g.logt(it), g.ye(ic));
                    let stored = values[g.idx(ir, it, ic) - 1];

                    assert_relative_eq!(trilinear(&g, p, data), stored, epsilon = 1e-12);
                    let s = Stencil::locate(&g, p);
                    assert_relative_eq!(tricubic(&g, s, p, data), stored, epsilon = 1e-10);
                }
            }
        }
    }

    #[test]
    fn trilinear_is_exact_for_multilinear_fields() {
        let g = geometry(4);
        let f = |r: f64, t: f64, y: f64| 1.0 + 2.0 * r - t + 3.0 * y + r * t * y;
        let values = tabulate(&g, f);
        let data = |j: usize| values[j - 1];

        let p = point(7.3, 9.8, 0.437);
        assert_relative_eq!(trilinear(&g, p, data), f(7.3, 9.8, 0.437), epsilon = 1e-10);
    }

    #[test]
    fn tricubic_is_exact_for_cubic_fields() {
        let g = geometry(6);
        let values = tabulate(&g, cubic_field);
        let data = |j: usize| values[j - 1];

        for (r, t, y) in [(6.2, 9.1, 0.49), (8.05, 9.77, 0.431), (9.9, 10.4, 0.401)] {
            let p = point(r, t, y);
            let s = Stencil::locate(&g, p);
            assert_relative_eq!(
                tricubic(&g, s, p, data),
                cubic_field(r, t, y),
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn tricubic_derivatives_are_exact_for_cubic_fields() {
        let g = geometry(6);
        let values = tabulate(&g, cubic_field);
        let data = |j: usize| values[j - 1];

        let (r, t, y) = (7.7, 9.55, 0.463);
        let p = point(r, t, y);
        let s = Stencil::locate(&g, p);

        let dfdt = -2.0 * r + 2.0 * t * y;
        let dfdr = 3.0 * r * r - 2.0 * t;

        assert_relative_eq!(tricubic_dt(&g, s, p, data), dfdt, max_relative = 1e-8);
        assert_relative_eq!(tricubic_drho(&g, s, p, data), dfdr, max_relative = 1e-8);
    }

    #[test]
    fn trilinear_midpoint_is_mean_of_neighbors() {
        let g = TableGeometry {
            nden: 2,
            logrho_min: 8.0,
            logrho_max: 9.0,
            ntemp: 2,
            logt_min: 9.0,
            logt_max: 10.0,
            nye: 2,
            ye_min: 0.45,
            ye_max: 0.5,
        };
        let values: Vec<f64> = (1..=8).map(|j| j as f64 * 1.5).collect();
        let data = |j: usize| values[j - 1];

        let p = point(8.5, 10.0, 0.45);
        let lower = values[g.idx(1, 2, 2) - 1];
        let upper = values[g.idx(2, 2, 2) - 1];
        assert_relative_eq!(trilinear(&g, p, data), 0.5 * (lower + upper), epsilon = 1e-12);
    }
}
