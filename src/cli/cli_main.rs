use super::options::{CliArgs, CliError, parse_f64_list, parse_usize_list};
use crate::Diffusion::analytic_model::Geometry;
use crate::Examples::scaling_examples::scaling_examples;
use crate::Scenarios::const_surf_conc::ConstSurfConcTask;
use crate::Scenarios::n_scaling::NScalingTask;
use crate::Solver::manufactured::ManufacturedSolver;
use crate::Solver::rd_system::IntegrationMethod;
use crate::Utils::plotting::plot_profiles;
use log::{LevelFilter, error};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io::{self, Write};
use std::path::PathBuf;

pub fn run() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    init_logging(verbose);
    if let Err(e) = dispatch(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}

fn dispatch(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    match args.first().map(|s| s.as_str()) {
        Some("n-scaling") => run_n_scaling(CliArgs::parse(args.into_iter().skip(1))?),
        Some("const-surf-conc") => run_const_surf_conc(CliArgs::parse(args.into_iter().skip(1))?),
        Some(other) if !other.starts_with("--") => Err(Box::new(CliError::Configuration(
            format!("Unknown command: {} (expected n-scaling or const-surf-conc)", other),
        ))),
        _ => {
            run_interactive_menu();
            Ok(())
        }
    }
}

fn savefig_from(args: &CliArgs) -> Option<PathBuf> {
    // "None" is the sentinel for "display interactively instead of saving"
    match args.get("savefig") {
        None | Some("None") => None,
        Some(p) => Some(PathBuf::from(p)),
    }
}

fn run_n_scaling(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut task = NScalingTask::new();
    if let Some(v) = args.get("Ns") {
        task.Ns = Some(parse_usize_list(v)?);
    }
    if let Some(v) = args.get_parsed::<usize>("nNs")? {
        task.nNs = v;
    }
    if let Some(v) = args.get("rates") {
        task.rates = parse_f64_list(v)?;
    }
    if let Some(v) = args.get("nfit") {
        task.nfit = parse_usize_list(v)?;
    }
    if let Some(v) = args.get_parsed::<f64>("atol")? {
        task.atol = v;
    }
    if let Some(v) = args.get_parsed::<f64>("rtol")? {
        task.rtol = v;
    }
    task.plot = args.has("plot");
    task.savefig = savefig_from(&args);
    task.verbose = args.has("verbose");

    let solver = ManufacturedSolver::new();
    let results = task.run(&solver)?;
    for res in &results {
        println!(
            "{} rate={} nstencil={}: order {}",
            res.geometry,
            res.rate,
            res.nstencil,
            res.order()
                .map(|o| format!("{:.2}", o))
                .unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(())
}

fn run_const_surf_conc(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut task = ConstSurfConcTask::new();
    if let Some(v) = args.get_parsed::<f64>("D")? {
        task.D = v;
    }
    if let Some(v) = args.get_parsed::<f64>("t0")? {
        task.t0 = v;
    }
    if let Some(v) = args.get_parsed::<f64>("tend")? {
        task.tend = v;
    }
    if let Some(v) = args.get_parsed::<f64>("x0")? {
        task.x0 = v;
    }
    if let Some(v) = args.get_parsed::<f64>("xend")? {
        task.xend = v;
    }
    if let Some(v) = args.get_parsed::<usize>("N")? {
        task.N = v;
    }
    if let Some(v) = args.get_parsed::<usize>("nt")? {
        task.nt = v;
    }
    if let Some(v) = args.get_parsed::<f64>("k")? {
        task.k = v;
    }
    if let Some(v) = args.get_parsed::<usize>("nstencil")? {
        task.nstencil = v;
    }
    if let Some(v) = args.get_parsed::<f64>("atol")? {
        task.atol = v;
    }
    if let Some(v) = args.get_parsed::<f64>("rtol")? {
        task.rtol = v;
    }
    if let Some(v) = args.get_parsed::<f64>("factor")? {
        task.factor = v;
    }
    if let Some(v) = args.get_parsed::<f64>("scaling")? {
        task.scaling = v;
    }
    if let Some(v) = args.get_parsed::<u64>("seed")? {
        task.random_seed = v;
    }
    if let Some(v) = args.get("method") {
        task.method = IntegrationMethod::from_name(v)
            .map_err(|e| CliError::Configuration(e.to_string()))?;
    }
    if let Some(v) = args.get("geom") {
        task.geometry = Geometry::from_name(v)
            .map_err(|e| CliError::Configuration(e.to_string()))?;
    }
    task.logx = args.has("logx");
    task.logy = args.has("logy");
    task.logt = args.has("logt");
    task.random = args.has("random");
    task.linterpol = args.has("linterpol");
    task.rinterpol = args.has("rinterpol");
    task.num_jacobian = args.has("num-jacobian");
    task.verbose = args.has("verbose");

    let solver = ManufacturedSolver::new();
    let report = task.run(&solver)?;
    println!(
        "tout: {} points in [{}, {}], total RMSD/atol = {:.6e}",
        report.tout.len(),
        report.tout[0],
        report.tout[report.tout.len() - 1],
        report.tot_ave_rmsd_over_atol
    );
    println!(
        "solver: {} steps, {} rhs evals, {} rejected",
        report.diagnostics.n_steps, report.diagnostics.n_rhs_evals, report.diagnostics.n_rejected
    );
    if args.has("plot") {
        plot_profiles(&report, task.atol, savefig_from(&args).as_deref())?;
    }
    Ok(())
}

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => {
                let mut task = NScalingTask::new();
                task.verbose = true;
                if let Err(e) = task.run(&ManufacturedSolver::new()) {
                    println!("n-scaling failed: {}", e);
                }
            }
            "2" => {
                let mut task = ConstSurfConcTask::new();
                task.verbose = true;
                match task.run(&ManufacturedSolver::new()) {
                    Ok(report) => println!(
                        "total RMSD/atol = {:.6e}",
                        report.tot_ave_rmsd_over_atol
                    ),
                    Err(e) => println!("const-surf-conc failed: {}", e),
                }
            }
            "3" => {
                print!("\x1b[36mExample number (0-2): \x1b[0m");
                io::stdout().flush().unwrap();
                if let Ok(task) = get_user_input().trim().parse::<usize>() {
                    scaling_examples(task);
                }
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn show_main_menu() {
    println!(
        "\x1b[34m\n Wellcome to DiffCon: convergence verification toolkit for\n
    1-D reaction-diffusion simulations \n \x1b[0m"
    );
    println!("\x1b[33m1. Error scaling sweep (n-scaling)\x1b[0m");
    println!("\x1b[33m2. Constant surface concentration run\x1b[0m");
    println!("\x1b[33m3. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush().unwrap();
}

fn get_user_input() -> String {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .expect("Failed to read input");
    input
}
