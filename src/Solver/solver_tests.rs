#[cfg(test)]
mod tests {
    use crate::Diffusion::analytic_model::Geometry;
    use crate::Diffusion::grid::{generate_grid, linspace};
    use crate::Solver::manufactured::ManufacturedSolver;
    use crate::Solver::rd_system::{
        IntegrationMethod, JacobianMode, RdSpec, SolverError, UnitScaling,
    };
    use crate::Solver::solver_api::ReactionDiffusionSolver;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn test_spec(n: usize, nstencil: usize) -> RdSpec {
        let grid = generate_grid(1e-10, 1.0, n, false, false, 42).unwrap();
        let modulation = (0..n).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        RdSpec {
            n_species: 2,
            stoich_reac: vec![vec![0], vec![1]],
            stoich_prod: vec![vec![1], vec![0]],
            k: vec![1.0, 1e5],
            D: vec![0.0, 2e-3],
            geometry: Geometry::Planar,
            grid,
            logy: false,
            logt: false,
            logx: false,
            nstencil,
            lrefl: true,
            rrefl: true,
            modulated_rxns: vec![0, 1],
            modulation: vec![modulation; 2],
            units: UnitScaling::default(),
        }
    }

    fn initial_state(spec: &RdSpec) -> DMatrix<f64> {
        DMatrix::from_fn(spec.n(), 2, |cell, species| {
            if species == 0 && cell == 0 { 1e5 } else { 0.0 }
        })
    }

    #[test]
    fn test_spec_validation_catches_mismatches() {
        let mut spec = test_spec(16, 3);
        spec.D = vec![0.0];
        assert!(matches!(spec.validate(), Err(SolverError::InvalidSpec(_))));

        let mut spec = test_spec(16, 3);
        spec.nstencil = 4;
        assert!(spec.validate().is_err());

        let mut spec = test_spec(4, 7);
        spec.nstencil = 7;
        assert!(spec.validate().is_err(), "grid smaller than stencil");

        let mut spec = test_spec(16, 3);
        spec.modulation[0].pop();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_manufactured_output_shape_and_source_passthrough() {
        let spec = test_spec(32, 3);
        let y0 = initial_state(&spec);
        let tout = linspace(1.0, 13.0, 5);
        let solver = ManufacturedSolver::new();
        let out = solver
            .integrate(
                &spec,
                &y0,
                &tout,
                1e-8,
                1e-10,
                JacobianMode::Analytic,
                IntegrationMethod::Bdf,
            )
            .unwrap();

        assert_eq!(out.cout.len(), 5);
        assert_eq!(out.cout[0].nrows(), 32);
        assert_eq!(out.cout[0].ncols(), 2);
        assert!(out.diagnostics.success);
        assert_eq!(out.diagnostics.method, "bdf");

        // tracer column is held at its initial profile
        for ti in 0..5 {
            assert_relative_eq!(out.cout[ti][(0, 0)], 1e5, epsilon = 1e-9);
            assert_relative_eq!(out.cout[ti][(5, 0)], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_manufactured_error_scales_with_resolution() {
        let tout = linspace(1.0, 13.0, 4);
        let solver = ManufacturedSolver::new();
        let mut max_err = Vec::new();
        for n in [16usize, 32] {
            let spec = test_spec(n, 3);
            let y0 = initial_state(&spec);
            let out = solver
                .integrate(
                    &spec,
                    &y0,
                    &tout,
                    1e-8,
                    1e-10,
                    JacobianMode::Analytic,
                    IntegrationMethod::Bdf,
                )
                .unwrap();
            let model = crate::Diffusion::analytic_model::AnalyticSurfaceModel::new(
                2e-3, 1.0, false,
            );
            let reference = model.evaluate(&spec.grid.xcenters, &tout).unwrap();
            let sim = out.species_field(1);
            let err = ((0..n)
                .map(|j| (sim[(0, j)] - reference[(0, j)]).powi(2))
                .sum::<f64>()
                / n as f64)
                .sqrt();
            max_err.push(err);
        }
        // doubling N shrinks the error by 2^2 for a 3-point stencil
        assert_relative_eq!(max_err[0] / max_err[1], 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_manufactured_failure_injection() {
        let spec = test_spec(512, 3);
        let y0 = initial_state(&spec);
        let tout = vec![1.0, 2.0];
        let solver = ManufacturedSolver::new().with_failures(&[512]);
        let res = solver.integrate(
            &spec,
            &y0,
            &tout,
            1e-8,
            1e-10,
            JacobianMode::Analytic,
            IntegrationMethod::Bdf,
        );
        assert!(matches!(res, Err(SolverError::NonConvergence(_))));
    }
}
