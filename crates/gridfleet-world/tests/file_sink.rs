//! Integration tests for writing rendered frames to disk.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use gridfleet_types::{Agent, AgentId, Color, GridPos};
use gridfleet_world::{FileFrameSink, FrameSink, OccupancyGrid, render_text};

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("gridfleet-world-{}", uuid::Uuid::new_v4()))
}

#[test]
fn creates_parent_dirs_and_overwrites_each_frame() {
    let dir = scratch_dir();
    let path = dir.join("nested").join("screen.txt");
    let mut sink = FileFrameSink::new(&path).unwrap();

    let mut grid = OccupancyGrid::new(4, 4).unwrap();
    let mut agents =
        vec![Agent::new(AgentId::new("alpha"), GridPos::new(0, 0), []).with_color(Color::Green)];

    grid.rebuild(&mut agents);
    sink.present(&grid.snapshot());

    agents[0].position = GridPos::new(3, 3);
    grid.rebuild(&mut agents);
    let second = grid.snapshot();
    sink.present(&second);

    assert_eq!(sink.frames_written(), 2);
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, render_text(&second));
    assert!(on_disk.ends_with("alpha: (x: 3, y: 3)"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn bare_file_name_needs_no_parent() {
    let sink = FileFrameSink::new("screen.txt");
    assert!(sink.is_ok());
}
