mod scenario;

use std::env;

use anyhow::{bail, Context};
use log::info;
use segvm::{bulk, Algorithm, SessionConfig, Simulator};

const USAGE: &str = "usage:
  sim-demo session <segments> <accesses> <frames> <FIFO|LRU>
  sim-demo bulk <pages> <frames> <FIFO|LRU>
  sim-demo translate <segments> <segment> <offset>";

fn run_session(
    segments: &str,
    accesses: &str,
    frames: &str,
    algorithm: &str,
) -> anyhow::Result<()> {
    let segment_table = scenario::parse_segments(segments).context("reading segments")?;
    let accesses = scenario::parse_accesses(accesses).context("reading accesses")?;
    let frame_count = scenario::parse_frames(frames)?;
    let algorithm: Algorithm = algorithm.parse()?;

    let config = SessionConfig::new(frame_count, algorithm, segment_table);

    info!(
        "session {} ({} frames, {})",
        hex::encode(config.fingerprint().to_be_bytes()),
        frame_count,
        algorithm
    );

    let mut simulator = Simulator::new();

    for (segment, offset) in accesses {
        let event = simulator.process(&config, segment, offset);
        println!("{}", event);

        if let (Some(resolved), Some(frame)) = (event.resolved, event.frame()) {
            println!(
                "         segmented address {} | page {} | offset in page {} | frame {}",
                resolved.segmented_address,
                resolved.page_index(),
                resolved.offset_in_page,
                frame
            );
        }
    }

    if let Some(session) = simulator.session() {
        println!("page faults: {}", session.page_faults());
    }

    Ok(())
}

fn run_bulk(pages: &str, frames: &str, algorithm: &str) -> anyhow::Result<()> {
    let pages = scenario::parse_pages(pages).context("reading pages")?;
    let frame_count = scenario::parse_frames(frames)?;
    let algorithm: Algorithm = algorithm.parse()?;

    let report = bulk::simulate(&pages, frame_count, algorithm);

    for event in &report.events {
        let mut line = format!(
            "step {:>3} | page {:<4} | {:<10} | [{}]",
            event.step,
            event.page,
            event.status(),
            event.rendered_frame_table().join(" ")
        );

        if let Some(loaded) = event.loaded() {
            line.push_str(&format!(" | loaded {}", loaded));
        }
        if let Some(evicted) = event.evicted() {
            line.push_str(&format!(" | evicted {}", evicted));
        }

        println!("{}", line);
    }

    println!(
        "page faults: {} (hit ratio {:.2})",
        report.page_faults,
        report.hit_ratio()
    );

    Ok(())
}

fn run_translate(segments: &str, segment: &str, offset: &str) -> anyhow::Result<()> {
    let segment_table = scenario::parse_segments(segments).context("reading segments")?;
    let segment = segment.parse().context("reading segment id")?;
    let offset = offset.parse().context("reading offset")?;

    match segment_table.translate_flat(segment, offset) {
        Ok(translation) => println!("{} -> {}", translation.note(), translation.physical_address),
        Err(err) => println!("{}", err),
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["session", segments, accesses, frames, algorithm] => {
            run_session(segments, accesses, frames, algorithm)
        }
        ["bulk", pages, frames, algorithm] => run_bulk(pages, frames, algorithm),
        ["translate", segments, segment, offset] => run_translate(segments, segment, offset),
        _ => bail!("{}", USAGE),
    }
}
