//! Diagnostic figures rendered with plotters.
//!
//! Two figures are produced: the error-scaling grid of the resolution sweep
//! (one panel per geometry and reaction rate, RMSD/atol against N on log2
//! axes with the fitted order in the legend) and the profile figure of a
//! single constant-surface-concentration run (simulation, analytic reference
//! and normalized error, colored from black at t0 to red at tend).

use super::show_this_pic::open_with_default_viewer;
use crate::Convergence::sweep::TripleResult;
use crate::Diffusion::analytic_model::Geometry;
use crate::Scenarios::const_surf_conc::RunReport;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Drawing error: {0}")]
    Draw(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Draw(e.to_string())
}

/// Render a figure to `savefig`, or to a temporary file opened with the
/// platform viewer when no path is given.
pub fn save_and_or_show_plot<F>(savefig: Option<&Path>, render: F) -> Result<(), PlotError>
where
    F: FnOnce(&Path) -> Result<(), PlotError>,
{
    match savefig {
        Some(path) => render(path),
        None => {
            let path = std::env::temp_dir().join("DiffCon_figure.png");
            render(&path)?;
            open_with_default_viewer(&path)?;
            Ok(())
        }
    }
}

const STENCIL_COLORS: [RGBColor; 3] = [RED, BLUE, BLACK];

/// Error-scaling figure: one panel per (geometry, rate), points per stencil
/// width plus the dashed fitted line labelled with the recovered order.
pub fn plot_error_scaling(
    results: &[TripleResult],
    n_rates: usize,
    savefig: Option<&Path>,
) -> Result<(), PlotError> {
    // group consecutive triples sharing (geometry, rate) into one panel
    let mut panels: Vec<((Geometry, f64), Vec<&TripleResult>)> = Vec::new();
    for res in results {
        match panels.last_mut() {
            Some((key, group)) if key.0 == res.geometry && key.1 == res.rate => group.push(res),
            _ => panels.push(((res.geometry, res.rate), vec![res])),
        }
    }
    if panels.is_empty() {
        return Err(PlotError::Draw("Nothing to plot".to_string()));
    }
    let cols = n_rates.max(1);
    let rows = panels.len().div_ceil(cols);

    save_and_or_show_plot(savefig, |path| {
        let root = BitMapBackend::new(path, (450 * cols as u32, 360 * rows as u32))
            .into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let areas = root.split_evenly((rows, cols));

        for (((geometry, rate), group), area) in panels.iter().zip(areas.iter()) {
            draw_scaling_panel(area, *geometry, *rate, group)?;
        }
        root.present().map_err(draw_err)?;
        Ok(())
    })
}

fn draw_scaling_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    geometry: Geometry,
    rate: f64,
    group: &[&TripleResult],
) -> Result<(), PlotError> {
    let mut pts_per_stencil: Vec<Vec<(f64, f64)>> = Vec::new();
    for res in group {
        pts_per_stencil.push(
            res.series
                .entries
                .iter()
                .filter(|&&(_, e)| e > 0.0)
                .map(|&(n, e)| ((n as f64).log2(), e.log2()))
                .collect(),
        );
    }
    let all: Vec<(f64, f64)> = pts_per_stencil.iter().flatten().copied().collect();
    if all.is_empty() {
        return Ok(());
    }
    let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for &(x, y) in &all {
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    let title = if rate == 0.0 {
        format!("{} diffusion", geometry)
    } else {
        format!("{} diffusion + 1 decay", geometry)
    };

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(32)
        .y_label_area_size(48)
        .build_cartesian_2d(x_lo - 0.5..x_hi + 0.5, y_lo - 1.0..y_hi + 1.0)
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .x_desc("log2 N")
        .y_desc("log2 RMSD/atol")
        .draw()
        .map_err(draw_err)?;

    for (si, (res, pts)) in group.iter().zip(pts_per_stencil.iter()).enumerate() {
        let color = STENCIL_COLORS[si % STENCIL_COLORS.len()];
        match si % 3 {
            0 => chart
                .draw_series(pts.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))
                .map_err(draw_err)?,
            1 => chart
                .draw_series(
                    pts.iter()
                        .map(|&(x, y)| TriangleMarker::new((x, y), 4, color.filled())),
                )
                .map_err(draw_err)?,
            _ => chart
                .draw_series(pts.iter().map(|&(x, y)| Cross::new((x, y), 3, color.filled())))
                .map_err(draw_err)?,
        };

        if let Some(fit) = res.fit {
            // dashed fit over the ladder prefix, shortened for higher stencils
            let take = res.series.len().saturating_sub(si).max(2);
            let line: Vec<(f64, f64)> = res
                .series
                .ns()
                .iter()
                .take(take)
                .map(|&n| ((n as f64).log2(), fit.predict(n as f64).log2()))
                .collect();
            chart
                .draw_series(DashedLineSeries::new(line, 5, 3, color.stroke_width(1)))
                .map_err(draw_err)?
                .label(format!("{}: {:.1}", res.nstencil, fit.order()))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 14, y)], color.stroke_width(2))
                });
        }
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;
    Ok(())
}

/// Profile figure for one constant-surface-concentration run: simulated and
/// analytic fields, pointwise error over atol, and the RMSD/atol history.
pub fn plot_profiles(
    report: &RunReport,
    atol: f64,
    savefig: Option<&Path>,
) -> Result<(), PlotError> {
    let nt = report.tout.len();
    let n = report.grid.n();
    if nt == 0 || n == 0 {
        return Err(PlotError::Draw("Empty run report".to_string()));
    }
    let tend = *report.tout.last().unwrap();

    save_and_or_show_plot(savefig, |path| {
        let root = BitMapBackend::new(path, (640, 1100)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let areas = root.split_evenly((4, 1));

        let x = &report.grid.xcenters;
        let sim: Vec<Vec<f64>> = (0..nt)
            .map(|ti| (0..n).map(|j| report.cout[ti][(j, 1)]).collect())
            .collect();
        let reference: Vec<Vec<f64>> = (0..nt)
            .map(|ti| (0..n).map(|j| report.reference[(ti, j)]).collect())
            .collect();
        let err: Vec<Vec<f64>> = (0..nt)
            .map(|ti| (0..n).map(|j| (sim[ti][j] - reference[ti][j]) / atol).collect())
            .collect();

        draw_field_panel(&areas[0], x, &sim, &report.tout, tend, "Simulation, C / M")?;
        draw_field_panel(&areas[1], x, &reference, &report.tout, tend, "Analytic, C / M")?;
        draw_field_panel(&areas[2], x, &err, &report.tout, tend, "Abs. err. / abs. tol.")?;

        // RMSD/atol history with its time average
        let t_lo = report.tout[0];
        let y_hi = report
            .spat_ave_rmsd_over_atol
            .iter()
            .cloned()
            .fold(f64::MIN, f64::max)
            .max(1e-300);
        let mut chart = ChartBuilder::on(&areas[3])
            .caption("RMSD / atol", ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(28)
            .y_label_area_size(48)
            .build_cartesian_2d(t_lo..tend, 0.0..y_hi * 1.05)
            .map_err(draw_err)?;
        chart
            .configure_mesh()
            .x_desc("t / s")
            .draw()
            .map_err(draw_err)?;
        chart
            .draw_series(LineSeries::new(
                report
                    .tout
                    .iter()
                    .zip(report.spat_ave_rmsd_over_atol.iter())
                    .map(|(&t, &e)| (t, e)),
                BLUE.stroke_width(1),
            ))
            .map_err(draw_err)?;
        chart
            .draw_series(DashedLineSeries::new(
                vec![
                    (t_lo, report.tot_ave_rmsd_over_atol),
                    (tend, report.tot_ave_rmsd_over_atol),
                ],
                5,
                3,
                BLACK.stroke_width(1),
            ))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    })
}

fn draw_field_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    x: &[f64],
    field: &[Vec<f64>],
    tout: &[f64],
    tend: f64,
    title: &str,
) -> Result<(), PlotError> {
    let (mut y_lo, mut y_hi) = (f64::MAX, f64::MIN);
    for row in field {
        for &v in row {
            y_lo = y_lo.min(v);
            y_hi = y_hi.max(v);
        }
    }
    if y_lo == y_hi {
        y_hi = y_lo + 1.0;
    }
    let x_lo = x[0];
    let x_hi = *x.last().unwrap();

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(28)
        .y_label_area_size(48)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .x_desc("x / m")
        .draw()
        .map_err(draw_err)?;

    for (ti, row) in field.iter().enumerate() {
        // black at t0 shading to red at tend, as in the classic figure
        let c = 1.0 - tout[ti] / tend;
        let color = RGBColor(
            (255.0 * (1.0 - c)) as u8,
            (255.0 * (0.5 - c / 2.0).max(0.0)) as u8,
            (255.0 * (0.5 - c / 2.0).max(0.0)) as u8,
        );
        chart
            .draw_series(LineSeries::new(
                x.iter().zip(row.iter()).map(|(&xi, &v)| (xi, v)),
                color.stroke_width(1),
            ))
            .map_err(draw_err)?;
    }
    Ok(())
}
