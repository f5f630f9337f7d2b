#![deny(warnings)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use relief::consts::EARTH_CIRCUMFERENCE_METERS;
use relief::dem_tile::DemTile;
use relief::errors::ReliefError;
use relief::float_raster::FloatRaster;
use relief::geotiff::read_elevation_tiff;
use relief::hillshading::multidirectional::MultidirectionalCompositor;
use relief::trig::deg_to_rad;
use relief::validity_mask::ValidityMask;

/// Multidirectional hillshading of elevation rasters.
///
/// Blends six independently-lit hillshade surfaces (five oblique lights
/// plus a near-vertical ambient one) into a single 8-bit relief image.
#[derive(Parser)]
#[command(name = "relief")]
struct Cli {
    /// Input elevation raster: .hgt, .hgt.gz or a single-band .tif.
    input: PathBuf,

    /// Output grayscale PNG.
    output: PathBuf,

    /// Multiplicative factor that converts elevation values to the units
    /// of the horizontal coordinate system.
    #[arg(long, default_value_t = 1.0)]
    z_factor: f32,

    /// Cell size in horizontal units, used for TIFF inputs. For HGT tiles
    /// the cell size is derived from the tile latitude instead.
    #[arg(long, default_value_t = 30.0)]
    cell_size: f32,

    /// Elevation value marking invalid samples in TIFF inputs.
    #[arg(long)]
    nodata: Option<f32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ReliefError> {
    let (elevation, mask, (cell_size_x, cell_size_y)) = load_input(cli)?;

    println!(
        "Shading a {}x{} elevation block...",
        elevation.width, elevation.height
    );

    let compositor = MultidirectionalCompositor::new(
        1,
        cli.z_factor,
        cell_size_x,
        cell_size_y,
    )?;
    let (shaded, output_mask) = compositor.process(&elevation, &mask)?;

    let valid_cells =
        output_mask.data().iter().filter(|&&flag| flag != 0).count();
    println!(
        "Shaded {}x{} cells, {} of them valid.",
        shaded.width, shaded.height, valid_cells
    );

    shaded.write_to_png(&cli.output).map_err(|error| {
        ReliefError::Dem(format!(
            "failed to write {}: {}",
            cli.output.display(),
            error
        ))
    })
}

type LoadedInput = (FloatRaster, ValidityMask, (f32, f32));

fn load_input(cli: &Cli) -> Result<LoadedInput, ReliefError> {
    let name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if name.ends_with(".tif") || name.ends_with(".tiff") {
        let (elevation, mask) =
            read_elevation_tiff(&cli.input, cli.nodata)?;
        Ok((elevation, mask, (cli.cell_size, cli.cell_size)))
    } else {
        let tile = DemTile::from_hgt_file(&cli.input)?;
        let spacing = grid_spacing(&tile);
        let (elevation, mask) = tile.to_elevation();
        Ok((elevation, mask, spacing))
    }
}

/// Approximate horizontal and vertical grid spacing of a DEM tile, in
/// meters. The horizontal spacing is taken half a degree north of the
/// southern edge, at the center of the tile.
fn grid_spacing(tile: &DemTile) -> (f32, f32) {
    let vertical =
        EARTH_CIRCUMFERENCE_METERS / 360.0 / tile.size as f32;
    let horizontal = deg_to_rad(tile.lat as f32 + 0.5).cos() * vertical;
    (horizontal, vertical)
}
