#[cfg(test)]
mod tests {
    use crate::Convergence::error_metrics::{rmsd_over_atol, spat_ave_rmsd_vs_time, time_average};
    use crate::Convergence::regression::fit_loglog;
    use crate::Convergence::sweep::{ConvergenceSweepRunner, SweepConfig, SweepError};
    use crate::Diffusion::analytic_model::Geometry;
    use crate::Solver::manufactured::ManufacturedSolver;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    #[test]
    fn test_rmsd_known_values() {
        let sim = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 2.0, 2.0]);
        let reference = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 2.0, 2.0]);
        let rmsd = spat_ave_rmsd_vs_time(&sim, &reference).unwrap();
        assert_relative_eq!(rmsd[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(rmsd[1], 0.0, epsilon = 1e-12);

        let normalized = rmsd_over_atol(&sim, &reference, 1e-2).unwrap();
        assert_relative_eq!(normalized[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(time_average(&normalized), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rmsd_shape_mismatch_is_error() {
        let a = DMatrix::zeros(2, 3);
        let b = DMatrix::zeros(2, 4);
        assert!(spat_ave_rmsd_vs_time(&a, &b).is_err());
        assert!(rmsd_over_atol(&a, &a, 0.0).is_err());
    }

    #[test]
    fn test_fit_recovers_exact_second_order() {
        // err(N) = c * N^-2 exactly, for a couple of constants c
        for c in [1.0, 3.7e4] {
            let ns: Vec<usize> = vec![8, 16, 32, 64, 128];
            let errs: Vec<f64> = ns.iter().map(|&n| c * (n as f64).powi(-2)).collect();
            let fit = fit_loglog(&ns, &errs, ns.len()).unwrap();
            assert_relative_eq!(fit.slope, -2.0, epsilon = 1e-9);
            assert_relative_eq!(fit.intercept, c.ln(), epsilon = 1e-9);
            assert_eq!(fit.n_used, 5);
        }
    }

    #[test]
    fn test_fit_prefix_excludes_floor_points() {
        // second-order decay that saturates at a floor from N = 64 on
        let ns: Vec<usize> = vec![8, 16, 32, 64, 128, 256];
        let errs: Vec<f64> = ns
            .iter()
            .map(|&n| (1e3 * (n as f64).powi(-2)).max(0.3))
            .collect();
        let biased = fit_loglog(&ns, &errs, ns.len()).unwrap();
        let prefix = fit_loglog(&ns, &errs, 3).unwrap();
        assert!(biased.order() < 1.9, "tail should flatten the full fit");
        assert_relative_eq!(prefix.order(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_skips_undefined_points_and_needs_two() {
        let ns = vec![8, 16, 32];
        let fit = fit_loglog(&ns, &[1.0, f64::NAN, 0.25], 3).unwrap();
        assert_eq!(fit.n_used, 2);
        assert!(fit_loglog(&ns, &[1.0, f64::NAN, f64::INFINITY], 3).is_none());
        assert!(fit_loglog(&[8], &[1.0], 1).is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut cfg = SweepConfig::default();
        cfg.nfit = vec![7, 5];
        assert!(matches!(
            cfg.validate(),
            Err(SweepError::Configuration(_))
        ));

        let mut cfg = SweepConfig::default();
        cfg.resolutions = vec![8, 8, 16];
        assert!(cfg.validate().is_err());

        let mut cfg = SweepConfig::default();
        cfg.nstencils = vec![3, 4];
        cfg.nfit = vec![7, 5];
        assert!(cfg.validate().is_err());

        assert!(SweepConfig::default().validate().is_ok());
    }

    fn planar_sweep_config() -> SweepConfig {
        SweepConfig {
            geometries: vec![Geometry::Planar],
            rates: vec![0.0],
            nstencils: vec![3, 5, 7],
            nfit: vec![7, 5, 4],
            resolutions: vec![8, 16, 32, 64, 128, 256, 512],
            ..SweepConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_orders_for_all_stencils() {
        let runner = ConvergenceSweepRunner::new(planar_sweep_config()).unwrap();
        let solver = ManufacturedSolver::new();
        let results = runner.run_sweep(&solver).unwrap();
        assert_eq!(results.len(), 3);

        let bounds = [(1.7, 2.3), (3.5, 4.5), (5.0, 6.5)];
        for (res, &(lo, hi)) in results.iter().zip(bounds.iter()) {
            assert_eq!(res.series.len(), 7);
            assert!(res.failures.is_empty());
            let order = res.order().expect("fit must exist");
            assert!(
                order > lo && order < hi,
                "stencil {}: order {} outside ({}, {})",
                res.nstencil,
                order,
                lo,
                hi
            );
            // per-time series kept alongside the scalar form
            assert_eq!(res.series_vs_time.len(), 7);
            assert_eq!(res.series_vs_time[0].1.len(), 42);
        }
    }

    #[test]
    fn test_failed_point_excluded_without_aborting() {
        let runner = ConvergenceSweepRunner::new(planar_sweep_config()).unwrap();
        let solver = ManufacturedSolver::new().with_failures(&[512]);
        let results = runner.run_sweep(&solver).unwrap();

        for res in &results {
            assert_eq!(res.series.len(), 6);
            assert!(!res.series.ns().contains(&512));
            assert_eq!(res.failures.len(), 1);
            assert_eq!(res.failures[0].n, 512);
            assert!(res.fit.is_some(), "fit must still succeed on the rest");
        }
        // 3-point stencil asked for 7 fit points, only 6 remain
        assert_eq!(results[0].fit.unwrap().n_used, 6);
    }

    #[test]
    fn test_sweep_is_deterministic_with_fixed_seed() {
        let mut cfg = planar_sweep_config();
        cfg.random_grid = true;
        cfg.resolutions = vec![8, 16, 32, 64];
        cfg.nfit = vec![4, 4, 4];
        let solver = ManufacturedSolver::new();

        let a = ConvergenceSweepRunner::new(cfg.clone())
            .unwrap()
            .run_sweep(&solver)
            .unwrap();
        let b = ConvergenceSweepRunner::new(cfg)
            .unwrap()
            .run_sweep(&solver)
            .unwrap();

        for (ra, rb) in a.iter().zip(b.iter()) {
            assert_eq!(ra.series.entries, rb.series.entries, "bit-identical series");
        }
    }
}
