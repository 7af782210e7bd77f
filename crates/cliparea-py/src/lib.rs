//! PyO3 bindings for the `cliparea` batch kernel.
//!
//! Notes
//! - Keep bindings thin and predictable: flat lists in, flat lists out. NumPy
//!   callers pass `array.ravel().tolist()` or rely on PyO3's sequence extraction.
//! - Geometry stays in Rust (`cliparea` crate); only buffer-shape problems
//!   become Python exceptions.

use cliparea::batch::{compute_areas, BatchCfg, BatchError, BatchLayout, Stride};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn map_batch_err(err: BatchError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Intersection areas for `ntriangles` subject/clipper pairs stored flat.
///
/// Layout matches the historical kernel: 6 values per polygon per pair.
/// Pass `derive_stride=True` to pack `nvertex * ndim` values per polygon instead.
#[pyfunction]
#[pyo3(signature = (ntriangles, nvertex, ndim, polygons, clippers, derive_stride = false, parallel = false))]
fn area_of_intersection(
    ntriangles: usize,
    nvertex: usize,
    ndim: usize,
    polygons: Vec<f64>,
    clippers: Vec<f64>,
    derive_stride: bool,
    parallel: bool,
) -> PyResult<Vec<f64>> {
    let layout = BatchLayout {
        pairs: ntriangles,
        vertices: nvertex,
        dims: ndim,
    };
    let cfg = BatchCfg {
        stride: if derive_stride {
            Stride::VertexCount
        } else {
            Stride::Triangle
        },
        parallel,
        validate_clippers: false,
    };
    let mut areas = vec![0.0; ntriangles];
    compute_areas(layout, &polygons, &clippers, &mut areas, &cfg).map_err(map_batch_err)?;
    Ok(areas)
}

/// Intersection area of one subject polygon with one convex (CCW) clipper.
#[pyfunction]
fn clip_polygons(subject: Vec<(f64, f64)>, clipper: Vec<(f64, f64)>) -> f64 {
    cliparea::api::pair_area(&subject, &clipper)
}

#[pymodule]
fn cliparea_native(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(area_of_intersection, m)?)?;
    m.add_function(wrap_pyfunction!(clip_polygons, m)?)?;
    m.add("__version__", cliparea::VERSION)?;
    Ok(())
}
