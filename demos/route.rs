//! Route an arrow between two shapes around a wall, then drag its shaft and
//! move the start. Run with `RUST_LOG=elbow=debug` to watch the router.

use elbow::{
    ArrowEnd, BoundEndpoint, EditContext, EditIntent, EndpointSpec, Point, Rect, RoutingOptions, edit,
    fixed_segments_to_json, route,
};
use tracing_subscriber::EnvFilter;

fn print_points(label: &str, points: &[Point]) {
    let joined: Vec<String> = points.iter().map(Point::to_string).collect();
    println!("{label}: {}", joined.join(" -> "));
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let a = Rect::new(0.0, 0.0, 100.0, 80.0);
    let b = Rect::new(420.0, 160.0, 520.0, 240.0);
    let wall = Rect::new(220.0, -60.0, 260.0, 200.0);
    let options = RoutingOptions::default();

    let start = EndpointSpec::bound(a);
    let end: EndpointSpec = BoundEndpoint::new(b).with_arrowhead(true).into();
    let routed = route(&start, &end, &[wall], &options)?;
    print_points("route", routed.points());
    println!("fallback: {}", routed.used_fallback());

    let ctx = EditContext::default()
        .with_start(a)
        .with_end(b)
        .with_arrowheads(false, true)
        .with_obstacles(vec![wall])
        .with_options(options);

    let points = routed.into_points();
    if points.len() < 4 {
        println!("no interior segment to drag");
        return Ok(());
    }
    let shaft = 1;
    let mid = points[shaft].midpoint(points[shaft + 1]);
    let drag = EditIntent::DragSegment { index: shaft, to: Point::new(mid.x + 20.0, mid.y + 20.0) };
    let dragged = edit(&points, &[], &drag, &ctx)?;
    print_points("dragged", dragged.world());
    println!("pins: {}", fixed_segments_to_json(dragged.fixed_segments()));

    let moved = EditIntent::DragEndpoint { which: ArrowEnd::Start, to: Point::new(50.0, 80.0) };
    let res = edit(dragged.world(), dragged.fixed_segments(), &moved, &ctx)?;
    print_points("moved", res.world());
    println!("pins: {}", fixed_segments_to_json(res.fixed_segments()));
    Ok(())
}
