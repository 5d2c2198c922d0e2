use std::{
    f64::consts::LN_10,
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use log::info;
use ndarray::{Array2, ArrayView1};
use nucleon_core::StateVector;
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{MassDensity, ThermodynamicTemperature},
    mass_density::gram_per_cubic_centimeter,
    thermodynamic_temperature::kelvin,
};

use crate::{
    GeometryError, InterpolationMode, TableError, TableGeometry,
    geometry::LogPoint,
    interp::{self, Stencil},
};

/// Number of discarded lines at the top of a table file.
const HEADER_LINES: usize = 4;

/// Leading temperature, density, and Ye columns of each data row.
const COORDINATE_COLUMNS: usize = 3;

/// Number of scalar fields stored per grid node.
pub const NUM_SCALARS: usize = 6;

/// Where to find an NSE table and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub path: PathBuf,
    pub geometry: TableGeometry,
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

/// A point at which to resolve the NSE state, in CGS units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NseQuery {
    /// Density (g cm⁻³).
    pub rho: f64,
    /// Temperature (K).
    pub t: f64,
    /// Electron fraction.
    pub ye: f64,
}

impl NseQuery {
    #[must_use]
    pub fn new(rho: f64, t: f64, ye: f64) -> Self {
        Self { rho, t, ye }
    }

    /// Creates a query from dimensioned density and temperature.
    #[must_use]
    pub fn from_quantities(
        density: MassDensity,
        temperature: ThermodynamicTemperature,
        ye: f64,
    ) -> Self {
        Self::new(
            density.get::<gram_per_cubic_centimeter>(),
            temperature.get::<kelvin>(),
            ye,
        )
    }
}

/// A field stored in the NSE table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NseField {
    /// Mean atomic mass.
    Abar,
    /// Binding energy per nucleon (MeV).
    Bea,
    /// Rate of change of the electron fraction from weak reactions.
    DyeDt,
    /// Rate of change of the mean atomic mass.
    DabarDt,
    /// Rate of change of the binding energy per nucleon.
    DbeaDt,
    /// Neutrino loss rate.
    ENu,
    /// Equilibrium mass fraction of the species with the given index.
    MassFraction(usize),
}

impl NseField {
    /// The scalar fields, in file column order.
    pub const SCALARS: [NseField; NUM_SCALARS] = [
        NseField::Abar,
        NseField::Bea,
        NseField::DyeDt,
        NseField::DabarDt,
        NseField::DbeaDt,
        NseField::ENu,
    ];
}

/// The interpolated NSE state at a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NseState {
    pub abar: f64,
    pub bea: f64,
    pub dyedt: f64,
    pub dabardt: f64,
    pub dbeadt: f64,
    pub e_nu: f64,
    /// Equilibrium mass fractions, clamped to `[0, 1]`.
    pub x: StateVector,
}

/// A tabulated nuclear statistical equilibrium state over `(ρ, T, Yₑ)`.
///
/// The table is immutable once built, so a single instance can be shared by
/// reference across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct NseTable {
    geometry: TableGeometry,
    mode: InterpolationMode,
    /// Scalar fields, shape `(NUM_SCALARS, npoints)`.
    scalars: Array2<f64>,
    /// Mass fractions, shape `(num_spec, npoints)`.
    mass_fractions: Array2<f64>,
}

impl NseTable {
    /// Builds a table from in-memory field data.
    ///
    /// Columns are indexed by flattened node number minus one, see
    /// [`TableGeometry::idx`].
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the geometry is invalid for `mode`, the
    /// arrays do not match it, or there are more species than a
    /// [`StateVector`] can hold.
    pub fn new(
        geometry: TableGeometry,
        mode: InterpolationMode,
        scalars: Array2<f64>,
        mass_fractions: Array2<f64>,
    ) -> Result<Self, TableError> {
        geometry.validate(mode)?;
        StateVector::try_zeros(mass_fractions.nrows())?;

        let npoints = geometry.npoints();
        if scalars.dim() != (NUM_SCALARS, npoints) {
            return Err(TableError::Shape {
                what: "scalar fields",
                expected: (NUM_SCALARS, npoints),
                found: scalars.dim(),
            });
        }
        if mass_fractions.ncols() != npoints {
            return Err(TableError::Shape {
                what: "mass fractions",
                expected: (mass_fractions.nrows(), npoints),
                found: mass_fractions.dim(),
            });
        }

        Ok(Self {
            geometry,
            mode,
            scalars,
            mass_fractions,
        })
    }

    /// Reads the table described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the file cannot be opened or does not match
    /// the configured geometry.
    pub fn load(config: &TableConfig, num_spec: usize) -> Result<Self, TableError> {
        info!("reading the NSE table `{}`", config.path.display());

        let file = File::open(&config.path).map_err(|source| TableError::Open {
            path: config.path.clone(),
            source,
        })?;
        let table = Self::from_reader(
            BufReader::new(file),
            config.geometry,
            config.interpolation,
            num_spec,
        )?;

        info!(
            "loaded NSE table with {} nodes and {} species ({:?} interpolation)",
            table.geometry.npoints(),
            num_spec,
            table.mode,
        );
        Ok(table)
    }

    /// Parses a table from any buffered reader.
    ///
    /// The first four lines are skipped. Each following row holds the node's
    /// temperature, density, and Ye (ignored), the six scalar fields in
    /// [`NseField::SCALARS`] order, and `num_spec` mass fractions. Rows run
    /// density-outer, temperature-middle, Ye-inner. Extra trailing values on a
    /// row and lines after the last row are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] carrying the offending line number if the
    /// input is short, has a blank row, or has a missing or unparsable value.
    pub fn from_reader(
        reader: impl BufRead,
        geometry: TableGeometry,
        mode: InterpolationMode,
        num_spec: usize,
    ) -> Result<Self, TableError> {
        geometry.validate(mode)?;

        let npoints = geometry.npoints();
        let mut scalars = Array2::zeros((NUM_SCALARS, npoints));
        let mut mass_fractions = Array2::zeros((num_spec, npoints));

        let mut lines = reader.lines();
        let mut line = 0;
        let mut next_line = || {
            line += 1;
            match lines.next() {
                Some(Ok(text)) => Ok((line, text)),
                Some(Err(source)) => Err(TableError::Read { line, source }),
                None => Err(TableError::Truncated {
                    line,
                    expected: npoints,
                }),
            }
        };

        for _ in 0..HEADER_LINES {
            next_line()?;
        }

        let ncols = COORDINATE_COLUMNS + NUM_SCALARS + num_spec;
        for ir in 1..=geometry.nden {
            for it in 1..=geometry.ntemp {
                for ic in 1..=geometry.nye {
                    let j = geometry.idx(ir, it, ic) - 1;
                    let (line, text) = next_line()?;
                    if text.trim().is_empty() {
                        return Err(TableError::BlankLine { line });
                    }

                    let mut found = 0;
                    for (column, token) in text.split_whitespace().take(ncols).enumerate() {
                        let value: f64 = token.parse().map_err(|source| TableError::Parse {
                            line,
                            column: column + 1,
                            value: token.to_string(),
                            source,
                        })?;

                        match column.checked_sub(COORDINATE_COLUMNS) {
                            None => {}
                            Some(k) if k < NUM_SCALARS => scalars[[k, j]] = value,
                            Some(k) => mass_fractions[[k - NUM_SCALARS, j]] = value,
                        }
                        found += 1;
                    }

                    if found < ncols {
                        return Err(TableError::MissingValues {
                            line,
                            expected: ncols,
                            found,
                        });
                    }
                }
            }
        }

        Self::new(geometry, mode, scalars, mass_fractions)
    }

    #[must_use]
    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    /// Number of species with tabulated mass fractions.
    #[must_use]
    pub fn num_spec(&self) -> usize {
        self.mass_fractions.nrows()
    }

    /// Resolves the NSE state at `query`.
    ///
    /// Out-of-range density, temperature, or Ye is clamped to the table
    /// boundary. Interpolated mass fractions are clamped to `[0, 1]`. When
    /// `skip_x_fill` is set the mass fractions are not interpolated and `x` is
    /// returned as zeros.
    #[must_use]
    pub fn interpolate(&self, query: &NseQuery, skip_x_fill: bool) -> NseState {
        let p = self.point(query);
        let lookup = self.lookup(p);

        let mut x = StateVector::zeros(self.num_spec());
        if !skip_x_fill {
            for (k, xk) in x.iter_mut().enumerate() {
                *xk = lookup(self.field_data(NseField::MassFraction(k))).clamp(0.0, 1.0);
            }
        }

        let [abar, bea, dyedt, dabardt, dbeadt, e_nu] =
            NseField::SCALARS.map(|field| lookup(self.field_data(field)));

        NseState {
            abar,
            bea,
            dyedt,
            dabardt,
            dbeadt,
            e_nu,
            x,
        }
    }

    /// Interpolates a single field at `query` with the table's configured
    /// mode.
    ///
    /// Mass fractions returned here are not clamped.
    ///
    /// # Panics
    ///
    /// Panics if `field` is a [`NseField::MassFraction`] index at or beyond
    /// [`num_spec`](Self::num_spec).
    #[must_use]
    pub fn value(&self, query: &NseQuery, field: NseField) -> f64 {
        let p = self.point(query);
        self.lookup(p)(self.field_data(field))
    }

    /// Partial derivative of `field` with respect to temperature (per K),
    /// from the tricubic interpolant regardless of the configured mode.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the table is too small for a cubic
    /// stencil.
    ///
    /// # Panics
    ///
    /// Panics if `field` is a [`NseField::MassFraction`] index at or beyond
    /// [`num_spec`](Self::num_spec).
    pub fn derivative_wrt_temperature(
        &self,
        query: &NseQuery,
        field: NseField,
    ) -> Result<f64, GeometryError> {
        self.geometry.validate(InterpolationMode::Cubic)?;

        let p = self.point(query);
        let s = Stencil::locate(&self.geometry, p);
        let data = self.field_data(field);
        let dfdlogt = interp::tricubic_dt(&self.geometry, s, p, |j| data[j - 1]);

        Ok(dfdlogt / (LN_10 * query.t))
    }

    /// Partial derivative of `field` with respect to density (per g cm⁻³),
    /// from the tricubic interpolant regardless of the configured mode.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the table is too small for a cubic
    /// stencil.
    ///
    /// # Panics
    ///
    /// Panics if `field` is a [`NseField::MassFraction`] index at or beyond
    /// [`num_spec`](Self::num_spec).
    pub fn derivative_wrt_density(
        &self,
        query: &NseQuery,
        field: NseField,
    ) -> Result<f64, GeometryError> {
        self.geometry.validate(InterpolationMode::Cubic)?;

        let p = self.point(query);
        let s = Stencil::locate(&self.geometry, p);
        let data = self.field_data(field);
        let dfdlogrho = interp::tricubic_drho(&self.geometry, s, p, |j| data[j - 1]);

        Ok(dfdlogrho / (LN_10 * query.rho))
    }

    fn point(&self, query: &NseQuery) -> LogPoint {
        self.geometry.clamp_point(query.rho, query.t, query.ye)
    }

    /// Returns an interpolator for the configured mode, with the cell or
    /// stencil located once for every field evaluated at `p`.
    fn lookup(&self, p: LogPoint) -> impl Fn(ArrayView1<'_, f64>) -> f64 + '_ {
        let g = &self.geometry;
        let stencil = match self.mode {
            InterpolationMode::Linear => None,
            InterpolationMode::Cubic => Some(Stencil::locate(g, p)),
        };

        move |data: ArrayView1<'_, f64>| match stencil {
            None => interp::trilinear(g, p, |j| data[j - 1]),
            Some(s) => interp::tricubic(g, s, p, |j| data[j - 1]),
        }
    }

    fn field_data(&self, field: NseField) -> ArrayView1<'_, f64> {
        match field {
            NseField::Abar => self.scalars.row(0),
            NseField::Bea => self.scalars.row(1),
            NseField::DyeDt => self.scalars.row(2),
            NseField::DabarDt => self.scalars.row(3),
            NseField::DbeaDt => self.scalars.row(4),
            NseField::ENu => self.scalars.row(5),
            NseField::MassFraction(k) => self.mass_fractions.row(k),
        }
    }
}
