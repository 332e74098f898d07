//! End-to-end tests against real NetCDF files written into a temp directory.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use ndarray::{Array1, Array2, Array3, Array4};
use ncbrowse::{
    AnyTimeSeries, DataPoint, Dataset, ElementType, IoFailure, NcBrowseError, Result, Scalar,
};
use netcdf::create;
use std::path::Path;
use tempfile::tempdir;

fn jan_1_2000() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
}

/// Writes a `days since 2000-01-01` time coordinate of length `$n`, values `0..$n`.
macro_rules! add_time_coordinate {
    ($file:expr, $n:expr) => {{
        let mut time = $file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", "days since 2000-01-01")?;
        time.put_attribute("calendar", "standard")?;
        let values = Array1::from_iter((0..$n).map(|i| i as f64));
        time.put(values.view(), ..)?;
    }};
}

/// time x lat x lon file where `sst[t, 0, 0] = t` and everything else is noise.
fn write_sst_file(path: &Path) -> Result<()> {
    let mut file = create(path)?;
    file.add_dimension("time", 5)?;
    file.add_dimension("lat", 2)?;
    file.add_dimension("lon", 3)?;

    add_time_coordinate!(file, 5);

    let mut sst = file.add_variable::<f64>("sst", &["time", "lat", "lon"])?;
    sst.put_attribute("long_name", "Sea surface temperature")?;
    sst.put_attribute("units", "degC")?;
    let data = Array3::from_shape_fn((5, 2, 3), |(t, j, k)| {
        if j == 0 && k == 0 {
            t as f64
        } else {
            100.0 + t as f64
        }
    });
    sst.put(data.view(), ..)?;
    Ok(())
}

#[test]
fn test_index_alignment_days_since_2000() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("sst.nc");
    write_sst_file(&file_path)?;

    let dataset = Dataset::open(&file_path)?;
    let sst = dataset.variable("sst")?;
    let series = dataset.read_time_series::<f64>(&sst)?;

    let expected: Vec<DataPoint<f64>> = (0..5)
        .map(|i| DataPoint::new(jan_1_2000() + TimeDelta::days(i), i as f64))
        .collect();
    assert_eq!(series, expected);

    dataset.close()?;
    Ok(())
}

#[test]
fn test_catalog_lists_variables_in_file_order() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("sst.nc");
    write_sst_file(&file_path)?;

    let dataset = Dataset::open(&file_path)?;
    let variables = dataset.list_variables()?;
    let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["time", "sst"]);

    let sst = &variables[1];
    assert_eq!(sst.element_type, ElementType::Float64);
    assert_eq!(sst.long_name.as_deref(), Some("Sea surface temperature"));
    assert_eq!(sst.attribute("units"), Some("degC"));
    assert_eq!(sst.missing_value, None);
    assert_eq!(sst.shape(), vec![5, 2, 3]);
    assert!(sst.dimensions[0].is_temporal);
    assert!(!sst.dimensions[1].is_temporal);

    // no long_name on the coordinate: absent, not empty
    assert_eq!(variables[0].long_name, None);
    Ok(())
}

#[test]
fn test_time_axis_in_second_position_with_integer_coordinate() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("station.nc");

    {
        let mut file = create(&file_path)?;
        file.add_dimension("station", 2)?;
        file.add_dimension("time", 4)?;

        {
            let mut time = file.add_variable::<i32>("time", &["time"])?;
            time.put_attribute("units", "hours since 1970-01-01 00:00:00")?;
            time.put_attribute("calendar", "gregorian")?;
            time.put(Array1::from(vec![0i32, 6, 12, 18]).view(), ..)?;
        }

        let mut temp = file.add_variable::<f32>("temp", &["station", "time"])?;
        let data = Array2::from_shape_vec((2, 4), vec![1.0f32, 2.0, 3.0, 4.0, 9.0, 9.0, 9.0, 9.0])?;
        temp.put(data.view(), ..)?;
    }

    let dataset = Dataset::open(&file_path)?;
    let temp = dataset.variable("temp")?;
    let series = dataset.read_time_series::<f32>(&temp)?;

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time");
    let values: Vec<f32> = series.iter().map(|p| p.value).collect();
    let dates: Vec<NaiveDateTime> = series.iter().map(|p| p.date).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(
        dates,
        vec![
            epoch,
            epoch + TimeDelta::hours(6),
            epoch + TimeDelta::hours(12),
            epoch + TimeDelta::hours(18),
        ]
    );
    Ok(())
}

#[test]
fn test_missing_values_are_dropped() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("rain.nc");

    {
        let mut file = create(&file_path)?;
        file.add_dimension("time", 5)?;
        add_time_coordinate!(file, 5);

        let mut rain = file.add_variable::<f32>("rain", &["time"])?;
        rain.put_attribute("missing_value", -9999i32)?;
        let data = Array1::from(vec![0.5f32, -9999.0, 1.5, -9999.0, 2.5]);
        rain.put(data.view(), ..)?;
    }

    let dataset = Dataset::open(&file_path)?;
    let rain = dataset.variable("rain")?;
    assert_eq!(rain.missing_value, Some(Scalar::Float32(-9999.0)));

    let series = dataset.read_time_series::<f32>(&rain)?;
    assert_eq!(
        series,
        vec![
            DataPoint::new(jan_1_2000(), 0.5),
            DataPoint::new(jan_1_2000() + TimeDelta::days(2), 1.5),
            DataPoint::new(jan_1_2000() + TimeDelta::days(4), 2.5),
        ]
    );
    Ok(())
}

#[test]
fn test_fill_value_marker() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("fill.nc");

    {
        let mut file = create(&file_path)?;
        file.add_dimension("time", 3)?;
        add_time_coordinate!(file, 3);

        let mut count = file.add_variable::<i32>("count", &["time"])?;
        count.put_attribute("_FillValue", -1i32)?;
        count.put(Array1::from(vec![7i32, -1, 9]).view(), ..)?;
    }

    let dataset = Dataset::open(&file_path)?;
    let count = dataset.variable("count")?;
    match dataset.read_any_time_series(&count)? {
        AnyTimeSeries::Int32(points) => {
            let values: Vec<i32> = points.iter().map(|p| p.value).collect();
            assert_eq!(values, vec![7, 9]);
        }
        other => panic!("Expected an int series, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_four_dimensions_not_supported() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("4d.nc");

    {
        let mut file = create(&file_path)?;
        file.add_dimension("time", 2)?;
        file.add_dimension("depth", 1)?;
        file.add_dimension("lat", 1)?;
        file.add_dimension("lon", 1)?;
        add_time_coordinate!(file, 2);

        let mut var = file.add_variable::<f32>("u", &["time", "depth", "lat", "lon"])?;
        var.put(Array4::<f32>::zeros((2, 1, 1, 1)).view(), ..)?;
    }

    let dataset = Dataset::open(&file_path)?;
    let u = dataset.variable("u")?;
    match dataset.read_time_series::<f32>(&u) {
        Err(NcBrowseError::NotSupported { message }) => assert!(message.contains("'u'")),
        other => panic!("Expected NotSupported, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_requested_type_must_match() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("sst.nc");
    write_sst_file(&file_path)?;

    let dataset = Dataset::open(&file_path)?;
    let sst = dataset.variable("sst")?;
    match dataset.read_time_series::<f32>(&sst) {
        Err(NcBrowseError::TypeMismatch {
            var,
            stored,
            requested,
        }) => {
            assert_eq!(var, "sst");
            assert_eq!(stored, ElementType::Float64);
            assert_eq!(requested, ElementType::Float32);
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_calendar_is_parse_error() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("nocal.nc");

    {
        let mut file = create(&file_path)?;
        file.add_dimension("time", 2)?;
        {
            let mut time = file.add_variable::<f64>("time", &["time"])?;
            time.put_attribute("units", "days since 2000-01-01")?;
            time.put(Array1::from(vec![0.0, 1.0]).view(), ..)?;
        }
        let mut v = file.add_variable::<f64>("v", &["time"])?;
        v.put(Array1::from(vec![1.0, 2.0]).view(), ..)?;
    }

    let dataset = Dataset::open(&file_path)?;
    let v = dataset.variable("v")?;
    match dataset.read_time_series::<f64>(&v) {
        Err(NcBrowseError::Parse { message, .. }) => assert!(message.contains("calendar")),
        other => panic!("Expected Parse error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_units_is_parse_error() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("nounits.nc");

    {
        let mut file = create(&file_path)?;
        file.add_dimension("time", 2)?;
        {
            let mut time = file.add_variable::<f64>("time", &["time"])?;
            time.put_attribute("calendar", "standard")?;
            time.put(Array1::from(vec![0.0, 1.0]).view(), ..)?;
        }
        let mut v = file.add_variable::<f64>("v", &["time"])?;
        v.put(Array1::from(vec![1.0, 2.0]).view(), ..)?;
    }

    let dataset = Dataset::open(&file_path)?;
    let v = dataset.variable("v")?;
    match dataset.read_time_series::<f64>(&v) {
        Err(NcBrowseError::Parse { input, message }) => {
            assert_eq!(input, "time");
            assert!(message.contains("units"));
        }
        other => panic!("Expected Parse error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_open_nonexistent_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let result = Dataset::open(temp_dir.path().join("missing.nc"));
    assert!(matches!(
        result,
        Err(NcBrowseError::Io {
            failure: IoFailure::NotFound,
            ..
        })
    ));
}

#[test]
fn test_open_directory_is_unreadable() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let result = Dataset::open(temp_dir.path());
    assert!(matches!(
        result,
        Err(NcBrowseError::Io {
            failure: IoFailure::Unreadable(_),
            ..
        })
    ));
}

#[test]
fn test_open_corrupt_file_is_format_error() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("garbage.nc");
    std::fs::write(&file_path, b"this is not a netcdf file").expect("Failed to write file");

    match Dataset::open(&file_path) {
        Err(NcBrowseError::Format { path, .. }) => assert_eq!(path, file_path),
        Err(other) => panic!("Expected Format error, got {:?}", other),
        Ok(_) => panic!("Expected Format error, file opened"),
    }
}
