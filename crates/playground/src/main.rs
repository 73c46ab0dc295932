use model::{shape::DrawnShape, Coordinate, WaypointRole};
use osrm::OsrmClient;
use route_manager::Session;

/// Seed geometry for the demo route (Cancún).
const PREDEFINED_ROUTE: &str = "kgg`CxvmqOxMiGvU|T`MgGqaEomKlaA}Jhs@jV";

#[tokio::main]
async fn main() {
    env_logger::init();

    let router = OsrmClient::new();
    let mut session = Session::new();

    // A geofence over the hotel zone, drawn as an open ring; commit closes it.
    let collection = session
        .save_geofences(&[DrawnShape::Polygon(vec![
            Coordinate::new(21.16, -86.87),
            Coordinate::new(21.16, -86.84),
            Coordinate::new(21.19, -86.84),
            Coordinate::new(21.19, -86.87),
        ])])
        .expect("one polygon qualifies");
    println!(
        "geofences: {}",
        serde_json::to_string_pretty(&collection).expect("serializable")
    );

    let line = session
        .save_polylines(&[DrawnShape::Polyline(vec![
            Coordinate::new(21.177715, -86.910599),
            Coordinate::new(21.175245, -86.909178),
            Coordinate::new(21.172372, -86.911133),
        ])])
        .expect("one polyline qualifies");
    println!(
        "polylines: {}",
        serde_json::to_string_pretty(&line).expect("serializable")
    );

    match session.load_predefined_route(&router, PREDEFINED_ROUTE).await {
        Ok(route) => {
            println!(
                "predefined route: {} points, {:.1} km, fetched {}",
                route.path.points().len(),
                route.distance_km,
                route.fetched_at
            );
        }
        Err(why) => {
            log::error!("predefined route failed: {why}");
            return;
        }
    }

    for fence in session.crossed_fences() {
        println!("warning: route crosses {}", fence.name);
    }

    // Place endpoints the way a map click would and recompute.
    session.select_role(WaypointRole::Start);
    session.consume_click(Coordinate::new(21.150385, -86.8619659));
    session.select_role(WaypointRole::End);
    session.consume_click(Coordinate::new(21.17, -86.82));

    match session.calculate_route(&router).await {
        Ok(route) => println!(
            "calculated route: {} points, {:.1} km, {} s",
            route.path.points().len(),
            route.distance_km,
            route.duration.num_seconds()
        ),
        Err(why) => log::error!("route calculation failed: {why}"),
    }

    let mut offset = session
        .start_route_animation()
        .expect("a route is present");
    for _ in 0..5 {
        if offset.changed().await.is_err() {
            break;
        }
        println!("dash offset: {}", *offset.borrow());
    }
    session.stop_route_animation();

    session.clear_all();
}
