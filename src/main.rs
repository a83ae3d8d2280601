use anyhow::{bail, Result};
use clap::{App, Arg};
use log::warn;
use nalgebra::Vector2;

use fastrack::clock::WallClock;
use fastrack::cost::DurationCost;
use fastrack::graph::dynamic_planner::GraphDynamicPlanner;
use fastrack::params::PlannerParams;
use fastrack::planner::Planner;
use fastrack::space::PointMassSpace;
use fastrack::states::StatesPointMass;
use fastrack::subplanner::StraightLinePlanner;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let matches = App::new("planner")
        .about("recursively feasible graph dynamic planner, planar point mass demo")
        .arg(
            Arg::with_name("params")
                .short("p")
                .long("params")
                .takes_value(true)
                .required(true)
                .help("path to the planner parameter json"),
        )
        .arg(
            Arg::with_name("start")
                .long("start")
                .takes_value(true)
                .default_value("0,0")
                .help("start position as px,py"),
        )
        .arg(
            Arg::with_name("goal")
                .long("goal")
                .takes_value(true)
                .default_value("8,8")
                .help("goal position as px,py"),
        )
        .arg(
            Arg::with_name("extent")
                .long("extent")
                .takes_value(true)
                .default_value("10")
                .help("half width of the square sampling region"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .default_value("0")
                .help("sampling seed"),
        )
        .get_matches();

    let params = PlannerParams::from_file(matches.value_of("params").unwrap())?;
    let start = parse_position(matches.value_of("start").unwrap())?;
    let goal = parse_position(matches.value_of("goal").unwrap())?;
    let extent: f64 = matches.value_of("extent").unwrap().parse()?;
    let seed: u64 = matches.value_of("seed").unwrap().parse()?;

    let space = PointMassSpace::new(
        Vector2::new(-extent, -extent),
        Vector2::new(extent, extent),
        Vector2::new(0., 0.),
        Vector2::new(0., 0.),
        seed,
    );
    let subplanner = StraightLinePlanner::new(1., params.time_step);

    let mut planner = GraphDynamicPlanner::new(
        space,
        Box::new(subplanner),
        Box::new(DurationCost),
        Box::new(WallClock::new()),
        params,
    )?;

    let traj = planner.plan(&start, &goal, 0.);
    if traj.is_empty() {
        warn!("planner returned an empty trajectory");
    }
    println!("{}", serde_json::to_string_pretty(&traj.to_waypoints())?);
    Ok(())
}

fn parse_position(text: &str) -> Result<StatesPointMass> {
    let parts: Vec<f64> = text
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()?;
    if parts.len() != 2 {
        bail!("expected a position as px,py, got {:?}", text);
    }
    Ok(StatesPointMass::at_rest(Vector2::new(parts[0], parts[1])))
}
