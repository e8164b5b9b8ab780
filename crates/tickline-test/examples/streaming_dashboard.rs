//! Streaming Dashboard Example
//!
//! Drives a simulated profiler dashboard: the timeline streams live data,
//! the user zooms, selects a recorded call and frames it.

use tickline_core::{secs_to_ns, Span};
use tickline_series::DurationPoint;
use tickline_test::{init_tracing, DashboardSimulator, FrameJitter};

fn main() {
    init_tracing();
    println!("=== Tickline Streaming Dashboard ===\n");

    let mut sim = DashboardSimulator::new(60, FrameJitter::realistic(), 2024);
    sim.add_event(12_000_000, DurationPoint::finished(1_500_000));
    sim.add_event(40_000_000, DurationPoint::finished(250_000).with_partial_selection());
    sim.add_event(
        55_000_000,
        DurationPoint::unfinished().with_selectable_when_unspecified(),
    );

    // 1. Live streaming
    println!("1. Streaming for 2 seconds of frames");
    let result = sim.run_frames(120);
    let (data, view) = sim.snapshot();
    println!("   Frames: {}, simulated: {:.3}s", result.frames, result.elapsed_ns as f64 / 1e9);
    println!("   Data: {}", data);
    println!("   View: {} ({:?})", view, sim.timeline().state());

    // 2. Zoom in while streaming: the tail stays pinned
    println!("\n2. Zoom in");
    sim.timeline().zoom_in();
    sim.step(sim.timeline().config().animation_duration_ns);
    let (data, view) = sim.snapshot();
    println!("   View: {} (tail gap {:.1}us)", view, data.max - view.max);

    // 3. Select a recorded call
    println!("\n3. Drag over the call at 12s");
    sim.drag_select(&[(12_200_000.0, 12_300_000.0), (12_200_000.0, 12_900_000.0)]);
    let selected = sim.selection().selection().snapshot();
    println!("   Selection snapped to {}", selected);
    println!("   Timeline: {:?}", sim.timeline().state());

    // 4. Frame the selection
    println!("\n4. Frame the selection");
    sim.timeline().frame_to_range(selected);
    sim.step(secs_to_ns(1));
    println!("   View: {}", sim.timeline().view().snapshot());

    // 5. A running capture
    println!("\n5. Select inside the running capture at 55s");
    sim.selection().set(56_000_000.0, 57_000_000.0);
    println!("   Selection: {}", sim.selection().selection().snapshot());

    // 6. Back to live
    println!("\n6. Resume streaming");
    sim.selection().clear();
    sim.timeline().set_streaming(true);
    sim.run_frames(30);
    let (data, view) = sim.snapshot();
    println!("   View: {} follows data end {}", view, data.max);

    let request = Span::new(0.0, 1_000_000.0);
    println!(
        "\n   Can select {}? {}",
        request,
        sim.selection().can_select_range(request)
    );
}
