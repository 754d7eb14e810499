#[cfg(test)]
mod tests {
    use crate::Scenarios::ScenarioError;
    use crate::Scenarios::const_surf_conc::ConstSurfConcTask;
    use crate::Scenarios::n_scaling::NScalingTask;
    use crate::Solver::manufactured::ManufacturedSolver;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_task_matches_documented_defaults() {
        let task = ConstSurfConcTask::default();
        assert_relative_eq!(task.D, 2e-3);
        assert_relative_eq!(task.t0, 1.0);
        assert_relative_eq!(task.tend, 13.0);
        assert_eq!(task.N, 64);
        assert_eq!(task.nt, 42);
        assert_eq!(task.nstencil, 3);
        assert_relative_eq!(task.factor, 1e5);
        assert_eq!(task.random_seed, 42);
    }

    #[test]
    fn test_run_report_contents() {
        let task = ConstSurfConcTask::new();
        let solver = ManufacturedSolver::new();
        let report = task.run(&solver).unwrap();

        assert_eq!(report.tout.len(), 42);
        assert_eq!(report.cout.len(), 42);
        assert_eq!(report.cout[0].nrows(), 64);
        assert_eq!(report.cout[0].ncols(), 2);
        assert_eq!(report.spat_ave_rmsd_over_atol.len(), 42);
        assert!(report.diagnostics.success);

        // manufactured error: amplitude * N^-2, RMSD of the sine profile is
        // amplitude / sqrt(2), constant in time
        let expected = 1e-3 * (64f64).powi(-2) / 2f64.sqrt() / task.atol;
        assert_relative_eq!(report.tot_ave_rmsd_over_atol, expected, epsilon = 1e-9);
        assert_relative_eq!(report.spat_ave_rmsd_over_atol[0], expected, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_initial_time_is_domain_error() {
        let mut task = ConstSurfConcTask::new();
        task.t0 = 0.0;
        let res = task.run(&ManufacturedSolver::new());
        assert!(matches!(res, Err(ScenarioError::Domain(_))));
    }

    #[test]
    fn test_check_task_rejects_bad_configs() {
        let mut task = ConstSurfConcTask::new();
        task.nstencil = 4;
        assert!(matches!(
            task.check_task(),
            Err(ScenarioError::Configuration(_))
        ));

        let mut task = ConstSurfConcTask::new();
        task.N = 5;
        task.nstencil = 7;
        assert!(task.check_task().is_err());

        let mut task = ConstSurfConcTask::new();
        task.tend = task.t0;
        assert!(task.check_task().is_err());

        let mut task = ConstSurfConcTask::new();
        task.atol = 0.0;
        assert!(task.check_task().is_err());

        assert!(ConstSurfConcTask::new().check_task().is_ok());
    }

    #[test]
    fn test_settings_roundtrip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.json");

        let mut task = ConstSurfConcTask::new();
        task.set_problem_name("roundtrip");
        task.set_grid(1e-6, 2.0, 128);
        task.set_times(0.5, 7.0, 11);
        task.set_tolerances(1e-9, 1e-9);
        task.save_settings(&path).unwrap();

        let loaded = ConstSurfConcTask::load_settings(&path).unwrap();
        assert_eq!(loaded.problem_name.as_deref(), Some("roundtrip"));
        assert_eq!(loaded.N, 128);
        assert_relative_eq!(loaded.x0, 1e-6);
        assert_relative_eq!(loaded.tend, 7.0);
        assert_relative_eq!(loaded.atol, 1e-9);
    }

    #[test]
    fn test_n_scaling_resolution_ladder() {
        let task = NScalingTask::new();
        assert_eq!(task.resolutions(), vec![8, 16, 32, 64, 128, 256, 512]);

        let mut task = NScalingTask::new();
        task.nNs = 3;
        assert_eq!(task.resolutions(), vec![8, 16, 32]);

        task.Ns = Some(vec![10, 20, 40]);
        assert_eq!(task.resolutions(), vec![10, 20, 40]);
    }

    #[test]
    fn test_n_scaling_runs_all_triples() {
        let mut task = NScalingTask::new();
        task.nNs = 4;
        task.nfit = vec![4, 3, 2];
        task.rates = vec![0.0, 0.1];
        let results = task.run(&ManufacturedSolver::new()).unwrap();
        // 3 geometries x 2 rates x 3 stencils
        assert_eq!(results.len(), 18);
        assert!(results.iter().all(|r| r.fit.is_some()));
    }

    #[test]
    fn test_n_scaling_mismatched_nfit_aborts() {
        let mut task = NScalingTask::new();
        task.nfit = vec![7, 5];
        let res = task.run(&ManufacturedSolver::new());
        assert!(matches!(res, Err(ScenarioError::Sweep(_))));
    }
}
