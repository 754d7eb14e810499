pub fn scaling_examples(task: usize) {
    //

    match task {
        0 => {
            // ANALYTIC REFERENCE PROFILE
            use crate::Diffusion::analytic_model::AnalyticSurfaceModel;
            use crate::Diffusion::grid::linspace;
            let model = AnalyticSurfaceModel::new(2e-3, 1.0, false);
            let x = linspace(0.0, 1.0, 11);
            let t = vec![1.0, 5.0, 13.0];
            let field = model.evaluate(&x, &t).unwrap();
            for (i, ti) in t.iter().enumerate() {
                let row: Vec<String> = (0..x.len())
                    .map(|j| format!("{:.4}", field[(i, j)]))
                    .collect();
                println!("t = {:>4}: [{}]", ti, row.join(", "));
            }
        }
        1 => {
            // SMALL CONVERGENCE SWEEP
            use crate::Convergence::sweep::{ConvergenceSweepRunner, SweepConfig};
            use crate::Diffusion::analytic_model::Geometry;
            use crate::Solver::manufactured::ManufacturedSolver;
            let config = SweepConfig {
                geometries: vec![Geometry::Planar],
                rates: vec![0.0],
                resolutions: vec![8, 16, 32, 64, 128],
                nfit: vec![5, 4, 3],
                ..SweepConfig::default()
            };
            let runner = ConvergenceSweepRunner::new(config).unwrap();
            let results = runner.run_sweep(&ManufacturedSolver::new()).unwrap();
            for res in &results {
                println!(
                    "{}-point stencil: order {:.2}",
                    res.nstencil,
                    res.order().unwrap()
                );
            }
        }
        2 => {
            // SINGLE RUN AGAINST THE ANALYTIC SOLUTION
            use crate::Scenarios::const_surf_conc::ConstSurfConcTask;
            use crate::Solver::manufactured::ManufacturedSolver;
            let mut task = ConstSurfConcTask::new();
            task.set_problem_name("const surf conc demo");
            task.set_grid(1e-10, 1.0, 128);
            let report = task.run(&ManufacturedSolver::new()).unwrap();
            println!(
                "N = {}, total RMSD/atol = {:.6e}, {} solver steps",
                task.N, report.tot_ave_rmsd_over_atol, report.diagnostics.n_steps
            );
        }
        _ => println!("No such example, valid tasks are 0..=2"),
    }
}
