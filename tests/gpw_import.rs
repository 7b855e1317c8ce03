mod util;

use climrisk::entity::exposures::gpw::{
    BoundingBox, FILENAME_GPW, GpwReadOptions, column_major_index, read_gpw,
};
use climrisk::hazard::centroids::LatLon;
use climrisk::io::{RasterBand, RasterSource};
use climrisk::risk_error::RiskError;
use serial_test::serial;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use util::{capture_logs, centroids, touch, warnings};

/// Raster source returning a fixed band at a fixed resolution.
struct FakeRaster {
    resolution: u32,
    band: RasterBand,
}

impl RasterSource for FakeRaster {
    fn native_resolution(&self) -> u32 {
        self.resolution
    }

    fn read_band(&self, _path: &Path) -> Result<RasterBand, RiskError> {
        Ok(self.band.clone())
    }
}

/// GPW coverage at 1° (3600"): 145 rows from 85N, 360 cols from 180W.
/// Cell value encodes its position: 1000 * row + col.
fn one_degree_source() -> FakeRaster {
    let (rows, cols) = (145, 360);
    let data = (0..rows * cols)
        .map(|i| (1000 * (i / cols) + i % cols) as f32)
        .collect();
    FakeRaster {
        resolution: 3600,
        band: RasterBand::try_new(rows, cols, data).unwrap(),
    }
}

/// Scratch directory holding an (empty) GPW file.
fn gpw_dir() -> (TempDir, PathBuf) {
    let (dir, _) = touch(FILENAME_GPW);
    let path = dir.path().to_path_buf();
    (dir, path)
}

#[test]
fn missing_file_is_not_found() {
    let options = GpwReadOptions {
        gpw_path: PathBuf::from("no/such/gpw/dir"),
        ..GpwReadOptions::default()
    };
    let err = read_gpw(&options, &one_degree_source()).unwrap_err();
    assert_eq!(
        err,
        RiskError::FileNotFound(PathBuf::from("no/such/gpw/dir").join(FILENAME_GPW))
    );
}

#[test]
fn resampling_is_rejected() {
    let (_dir, gpw_path) = gpw_dir();
    let options = GpwReadOptions {
        gpw_path,
        resolution: 30,
        cut_bbox: None,
    };
    assert_eq!(
        read_gpw(&options, &one_degree_source()),
        Err(RiskError::UnsupportedResolution(30))
    );
}

#[test]
fn crop_is_flattened_column_major() {
    let (_dir, gpw_path) = gpw_dir();
    let options = GpwReadOptions {
        gpw_path,
        resolution: 3600,
        cut_bbox: Some(BoundingBox::new(0.5, 10.5, 2.5, 11.5)),
    };
    let tile = read_gpw(&options, &one_degree_source()).unwrap();

    assert_eq!((tile.rows, tile.cols), (2, 3));
    // global rows 78..=79 -> band rows 73..=74, cols 180..=182
    for col in 0..3 {
        for row in 0..2 {
            let expected = (1000 * (73 + row) + 180 + col) as f32;
            assert_eq!(tile.values[column_major_index(row, col, 2)], expected);
        }
    }
    assert_eq!(tile.lon, (0.0, 1.0));
    assert_eq!(tile.lat, (12.0, 1.0));
}

#[test]
fn negative_cells_become_zero() {
    let mut source = one_degree_source();
    let mut data = source.band.data().to_vec();
    data[0] = -3.4e38;
    source.band = RasterBand::try_new(145, 360, data).unwrap();
    let (_dir, gpw_path) = gpw_dir();
    let options = GpwReadOptions {
        gpw_path,
        resolution: 3600,
        cut_bbox: Some(BoundingBox::new(-180.0, 84.5, -180.0, 84.5)),
    };
    let tile = read_gpw(&options, &source).unwrap();
    assert_eq!(tile.values, vec![0.0]);
}

#[test]
#[serial]
fn unexpected_shape_warns() {
    let source = FakeRaster {
        resolution: 3600,
        band: RasterBand::zeros(10, 20),
    };
    let (_dir, gpw_path) = gpw_dir();
    let options = GpwReadOptions {
        gpw_path,
        resolution: 3600,
        cut_bbox: Some(BoundingBox::new(-179.5, 80.5, -179.5, 80.5)),
    };
    let (tile, logs) = capture_logs(|| read_gpw(&options, &source));
    assert!(tile.is_ok());
    let warns = warnings(&logs);
    assert_eq!(warns.len(), 2, "{logs:?}");
    assert!(warns[0].contains("10 x 20"));
    assert!(warns[1].contains("145x360"));
}

#[test]
fn tile_centroids_merge_with_other_sources() {
    let (_dir, gpw_path) = gpw_dir();
    let options = GpwReadOptions {
        gpw_path,
        resolution: 3600,
        cut_bbox: Some(BoundingBox::new(0.5, 10.5, 1.5, 11.5)),
    };
    let tile = read_gpw(&options, &one_degree_source()).unwrap();
    let mut exposure = tile.to_centroids();
    assert_eq!(exposure.size(), tile.values.len());
    assert_eq!(exposure.coord[0], LatLon::new(11.5, 0.5));

    let hazard = centroids(&[(10.5, 1.5), (-33.9, 18.4)], &[1, 2]);
    let pos = exposure.append(&hazard);

    assert_eq!(pos, vec![3, 4]);
    assert_eq!(exposure.id, vec![1, 2, 3, 4, 5]);
    assert!(exposure.check().is_ok());
}

#[test]
fn options_from_json() {
    let options: GpwReadOptions = serde_json::from_str(
        r#"{"resolution": 3600, "cut_bbox": {"min_lon": 5.9, "min_lat": 45.8, "max_lon": 10.5, "max_lat": 47.8}}"#,
    )
    .unwrap();
    assert_eq!(options.resolution, 3600);
    assert_eq!(options.gpw_path, PathBuf::from("."));
    assert_eq!(options.cut_bbox, Some(BoundingBox::new(5.9, 45.8, 10.5, 47.8)));
}
