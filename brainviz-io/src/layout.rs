//! Electrode layouts: the built-in headset montage and a simple text format

use crate::error::{open, IoError};
use brainviz_core::{spherical_to_point, Electrode, ElectrodeLayout, Point3f, Result, HEAD_RADIUS};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Approximate spherical coordinates (azimuth, elevation in degrees) of the
/// 14 channels of the Emotiv EPOC headset, in device channel order.
const EPOC_MONTAGE: [(&str, f32, f32); 14] = [
    ("AF3", 29.0, 24.0),
    ("F7", 54.0, 0.0),
    ("F3", 40.0, 42.0),
    ("FC5", 70.0, 21.0),
    ("T7", 90.0, 0.0),
    ("P7", 126.0, 0.0),
    ("O1", 162.0, 0.0),
    ("O2", -162.0, 0.0),
    ("P8", -126.0, 0.0),
    ("T8", -90.0, 0.0),
    ("FC6", -70.0, 21.0),
    ("F4", -40.0, 42.0),
    ("F8", -54.0, 0.0),
    ("AF4", -29.0, 24.0),
];

/// The Emotiv EPOC montage on the head sphere
pub fn epoc_layout() -> ElectrodeLayout {
    let electrodes = EPOC_MONTAGE
        .iter()
        .map(|&(label, az, el)| Electrode::new(label, spherical_to_point(HEAD_RADIUS, az, el)))
        .collect();
    // Labels in the montage table are unique
    ElectrodeLayout::new(electrodes).unwrap_or_default()
}

/// Read a layout from `label,x,y,z` lines.
///
/// Blank lines and lines starting with `#` are skipped. Fields may be
/// separated by commas or whitespace.
pub fn read_layout<P: AsRef<Path>>(path: P) -> Result<ElectrodeLayout> {
    let path = path.as_ref();
    let layout = parse_layout(open(path)?)?;
    log::info!("Loaded {} electrodes from {}", layout.len(), path.display());
    Ok(layout)
}

/// Parse a layout from any reader, see [`read_layout`]
pub fn parse_layout<R: Read>(input: R) -> Result<ElectrodeLayout> {
    let mut electrodes = Vec::new();
    for (number, line) in BufReader::new(input).lines().enumerate() {
        let line = line.map_err(IoError::from)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        electrodes.push(parse_line(line, number + 1)?);
    }
    if electrodes.is_empty() {
        return Err(IoError::InvalidFormat {
            format: "layout contains no electrodes".to_string(),
        }
        .into());
    }
    ElectrodeLayout::new(electrodes)
}

fn parse_line(line: &str, number: usize) -> std::result::Result<Electrode, IoError> {
    let parts: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 4 {
        return Err(IoError::ParseError {
            line: number,
            message: format!("expected 'label,x,y,z', got {} fields", parts.len()),
        });
    }

    let mut coords = [0.0f32; 3];
    for (slot, part) in coords.iter_mut().zip(&parts[1..]) {
        *slot = part.parse::<f32>().map_err(|e| IoError::ParseError {
            line: number,
            message: format!("invalid coordinate '{}': {}", part, e),
        })?;
    }
    Ok(Electrode::new(parts[0], Point3f::new(coords[0], coords[1], coords[2])))
}
