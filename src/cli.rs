//! Command-line options and terminal rendering for the ncbrowse binary.

use clap::Parser;
use ncbrowse::{AnyTimeSeries, Dimension, Variable};
use std::path::PathBuf;

/// A CLI tool for browsing NetCDF variables and their time series
#[derive(Parser, Debug)]
#[command(
    version,
    name = "ncbrowse",
    about = "Browse NetCDF variables and extract their time series"
)]
pub struct Args {
    /// Path to the NetCDF file
    #[arg(short, long)]
    pub file: PathBuf,

    /// List all variables in the file (default when no other action is given)
    #[arg(long)]
    pub list_vars: bool,

    /// Describe a variable: type, dimensions and attributes
    #[arg(long)]
    pub describe: Option<String>,

    /// Print the time series of a variable
    #[arg(long)]
    pub series: Option<String>,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

fn shape_label(dimensions: &[Dimension]) -> String {
    if dimensions.is_empty() {
        return "scalar".to_string();
    }
    let names: Vec<String> = dimensions.iter().map(|d| d.name.clone()).collect();
    let sizes: Vec<String> = dimensions.iter().map(|d| d.size.to_string()).collect();
    format!("[{}] = ({})", names.join(", "), sizes.join(" × "))
}

/// Prints variables sorted by name.
pub fn print_variables(variables: &[Variable]) {
    println!("\n Variables");
    println!("=============");

    let mut sorted: Vec<&Variable> = variables.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    if sorted.is_empty() {
        println!("   (No variables found)");
        return;
    }
    for var in sorted {
        println!(
            "    {} ({}): {}",
            var.name,
            var.element_type,
            shape_label(&var.dimensions)
        );
        if let Some(long_name) = &var.long_name {
            println!("      └─ {}", long_name);
        }
    }
}

/// Prints type, dimensions, attributes and storage size of one variable.
pub fn describe_variable(var: &Variable) {
    println!("\n Variable Description: {}", var.name);
    println!("={}", "=".repeat(var.name.len() + 23));

    println!(" Data type: {}", var.element_type);
    if let Some(long_name) = &var.long_name {
        println!(" Long name: {}", long_name);
    }
    println!(" Shape: {}", shape_label(&var.dimensions));

    if !var.dimensions.is_empty() {
        println!("\n Dimension Details:");
        for dim in &var.dimensions {
            let mut flags = Vec::new();
            if dim.is_unlimited {
                flags.push("unlimited");
            }
            if dim.is_temporal {
                flags.push("time");
            }
            if flags.is_empty() {
                println!("    {} = {}", dim.name, dim.size);
            } else {
                println!("    {} = {} ({})", dim.name, dim.size, flags.join(", "));
            }
        }
    }

    match &var.missing_value {
        Some(marker) => println!("\n Missing value: {}", marker),
        None => println!("\n Missing value: (none)"),
    }

    if var.attributes.is_empty() {
        println!("\n  Attributes: (none)");
    } else {
        println!("\n  Attributes:");
        for attr in &var.attributes {
            println!("   • {}: \"{}\"", attr.name, attr.value);
        }
    }

    println!("\n Storage Information:");
    println!("    Total elements: {}", var.total_elements());
    println!("    Element size: {} bytes", var.element_type.size_bytes());
    println!("    Total size: {}", human_size(var.estimated_size_bytes()));
}

fn human_size(bytes: usize) -> String {
    let b = bytes as f64;
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", b / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.2} MB", b / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", b / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Prints one `date value` line per point.
pub fn print_series(var: &Variable, series: &AnyTimeSeries) {
    println!("\n Time series: {} ({} points)", var.name, series.len());
    println!("==============================");
    for point in series.to_f64_points() {
        println!("   {}  {}", point.date.format("%Y-%m-%d %H:%M:%S"), point.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["ncbrowse", "-f", "data.nc", "--series", "sst", "--json"]);
        assert_eq!(args.file, PathBuf::from("data.nc"));
        assert_eq!(args.series.as_deref(), Some("sst"));
        assert!(args.json);
        assert!(!args.verbose);
    }

    #[test]
    fn test_shape_label() {
        let dims = vec![Dimension::new("time", 4, true), Dimension::new("lat", 3, false)];
        assert_eq!(shape_label(&dims), "[time, lat] = (4 × 3)");
        assert_eq!(shape_label(&[]), "scalar");
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 bytes");
        assert_eq!(human_size(2048), "2.00 KB");
    }
}
