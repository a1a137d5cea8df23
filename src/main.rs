use std::time::Instant;

use log::info;

use tripflow_core::{PlannerOptions, Result, TripPlanner, logging, read_places, write_itinerary};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = PlannerOptions::from_args()?;
    logging::init_logger(&options)?;

    let places = read_places(options.input_path())?;
    info!("input: places={} days={}", places.len(), options.days);

    let planner = TripPlanner::from_options(&options);
    let itinerary = planner.run(places, options.days)?;

    let (travel_km, longest_leg_km, stay_min) = itinerary.log_metrics();
    write_itinerary(options.output_path(), &itinerary)?;

    info!(
        "output: days={} stay_min={stay_min} travel_km={travel_km:.1} longest_leg_km={longest_leg_km:.1} time={:.2}s",
        itinerary.len(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
