//! Integration tests for brainviz-io
//!
//! Round trips through real files on disk.

use brainviz_core::HEAD_RADIUS;
use brainviz_io::{read_layout, read_mesh};
use std::fs;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("brainviz_io_{}_{}", std::process::id(), name))
}

#[test]
fn test_read_obj_file_from_disk() {
    let path = temp_path("tetra.obj");
    fs::write(
        &path,
        "o tetra\nv 0 0 0\nv 10 0 0\nv 0 10 0\nv 0 0 10\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n",
    )
    .unwrap();

    let mesh = read_mesh(&path, None).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 4);
    assert!(mesh.validate().is_ok());

    let normalized = read_mesh(&path, Some(HEAD_RADIUS)).unwrap();
    let farthest = normalized
        .vertices
        .iter()
        .map(|v| v.coords.norm())
        .fold(0.0f32, f32::max);
    assert!((farthest - HEAD_RADIUS).abs() < 1e-5);

    fs::remove_file(&path).ok();
}

#[test]
fn test_obj_with_out_of_range_index_is_rejected() {
    let path = temp_path("broken.obj");
    fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 1 2 9\n").unwrap();

    assert!(read_mesh(&path, None).is_err());

    fs::remove_file(&path).ok();
}

#[test]
fn test_read_layout_file() {
    let path = temp_path("layout.csv");
    fs::write(&path, "# custom montage\nCz,0,0,1\nPz,-0.7,0,0.7\nOz,-1,0,0\n").unwrap();

    let layout = read_layout(&path).unwrap();
    assert_eq!(layout.len(), 3);
    assert_eq!(layout.position_of("Oz"), Some(2));

    fs::remove_file(&path).ok();
}
