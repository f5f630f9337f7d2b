use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::errors::ReliefError;
use crate::float_raster::FloatRaster;
use crate::validity_mask::ValidityMask;

/// Height marking a void (no data) sample in SRTM tiles.
pub const VOID_HEIGHT: i16 = -32768;

/// A square SRTM-style grid of elevation samples, identified by the
/// longitude and latitude of its south-west corner.
pub struct DemTile {
    pub lon: i16,
    pub lat: i16,
    pub size: usize,
    heights: Box<[i16]>,
}

impl DemTile {
    /// # Panics
    ///
    /// Panics if the heights array does not match the tile size.
    pub fn new(lon: i16, lat: i16, size: usize, heights: Vec<i16>) -> DemTile {
        if heights.len() != size * size {
            panic!("The heights array does not match the tile size");
        }

        DemTile {
            lon,
            lat,
            size,
            heights: heights.into_boxed_slice(),
        }
    }

    /// Reads a tile from an HGT file: big-endian 16-bit heights forming a
    /// square grid, gzip-compressed if the file name ends in `.gz`. The
    /// tile position is parsed from the `N46E006`-style file stem.
    pub fn from_hgt_file(path: &Path) -> Result<DemTile, ReliefError> {
        let (lon, lat) = parse_tile_name(path)?;

        let file = File::open(path).map_err(|error| {
            ReliefError::Dem(format!(
                "failed to open {}: {}",
                path.display(),
                error
            ))
        })?;

        let heights = if path.extension().is_some_and(|ext| ext == "gz") {
            read_heights(&mut BufReader::new(GzDecoder::new(file)))
        } else {
            read_heights(&mut BufReader::new(file))
        }
        .map_err(|error| {
            ReliefError::Dem(format!(
                "failed to read {}: {}",
                path.display(),
                error
            ))
        })?;

        let size = (heights.len() as f64).sqrt() as usize;
        if size * size != heights.len() {
            return Err(ReliefError::Dem(format!(
                "{} does not contain a square number of heights",
                path.display()
            )));
        }

        Ok(DemTile::new(lon, lat, size, heights))
    }

    pub fn height_at(&self, x: usize, y: usize) -> i16 {
        self.heights[y * self.size + x]
    }

    /// Converts the tile to a floating-point elevation block plus the
    /// validity mask marking its void samples. Void heights become
    /// elevation 0.0 with a cleared flag.
    pub fn to_elevation(&self) -> (FloatRaster, ValidityMask) {
        let mut elevation = Vec::with_capacity(self.heights.len());
        let mut flags = Vec::with_capacity(self.heights.len());

        for &height in self.heights.iter() {
            if height == VOID_HEIGHT {
                elevation.push(0.0);
                flags.push(0);
            } else {
                elevation.push(height as f32);
                flags.push(255);
            }
        }

        (
            FloatRaster::from_data(self.size, self.size, elevation),
            ValidityMask::from_data(self.size, self.size, flags),
        )
    }
}

fn read_heights<R: Read>(reader: &mut R) -> Result<Vec<i16>, std::io::Error> {
    let mut heights: Vec<i16> = Vec::new();

    loop {
        match reader.read_i16::<BigEndian>() {
            Ok(height) => heights.push(height),
            Err(error) if error.kind() == ErrorKind::UnexpectedEof => {
                return Ok(heights)
            }
            Err(error) => return Err(error),
        }
    }
}

/// Parses the lon/lat of a tile from its `N46E006`-style file name.
fn parse_tile_name(path: &Path) -> Result<(i16, i16), ReliefError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ReliefError::Dem(format!("invalid tile path: {}", path.display()))
        })?;

    if name.len() < 7 || !name.is_char_boundary(7) {
        return Err(ReliefError::Dem(format!(
            "invalid tile name: {}",
            name
        )));
    }

    let id = &name[..7];
    let lat = id[1..3].parse::<i16>().map_err(|error| {
        ReliefError::Dem(format!(
            "failed to parse latitude of {}: {}",
            id, error
        ))
    })?;
    let lon = id[4..7].parse::<i16>().map_err(|error| {
        ReliefError::Dem(format!(
            "failed to parse longitude of {}: {}",
            id, error
        ))
    })?;

    let lon = match &id[3..4].to_uppercase()[..] {
        "E" => lon,
        "W" => -lon,
        _ => {
            return Err(ReliefError::Dem(format!(
                "invalid hemisphere letter in tile name: {}",
                id
            )))
        }
    };
    let lat = match &id[0..1].to_uppercase()[..] {
        "N" => lat,
        "S" => -lat,
        _ => {
            return Err(ReliefError::Dem(format!(
                "invalid hemisphere letter in tile name: {}",
                id
            )))
        }
    };

    Ok((lon, lat))
}

#[cfg(test)]
mod tests {
    use super::{DemTile, VOID_HEIGHT};
    use byteorder::{BigEndian, WriteBytesExt};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::Path;

    fn write_hgt<W: std::io::Write>(writer: &mut W, heights: &[i16]) {
        for &height in heights {
            writer.write_i16::<BigEndian>(height).unwrap();
        }
    }

    /// A tile written as raw big-endian heights reads back
    /// height-for-height, with its position parsed from the file name.
    #[test]
    fn read_from_hgt_file() {
        let path = Path::new("target/debug/N10E020.hgt");
        let heights = vec![100, 200, 300, 400, 500, 600, 700, 800, 900];
        let mut writer = BufWriter::new(File::create(path).unwrap());
        write_hgt(&mut writer, &heights);
        drop(writer);

        let tile = DemTile::from_hgt_file(path).unwrap();
        assert_eq!(tile.size, 3);
        assert_eq!(tile.lon, 20);
        assert_eq!(tile.lat, 10);
        assert_eq!(tile.height_at(0, 0), 100);
        assert_eq!(tile.height_at(2, 1), 600);
        assert_eq!(tile.height_at(2, 2), 900);
    }

    /// Gzip-compressed tiles are decompressed transparently, and southern
    /// and western hemisphere names parse to negative coordinates.
    #[test]
    fn read_from_gzipped_hgt_file() {
        let path = Path::new("target/debug/S05W103.hgt.gz");
        let file = File::create(path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_hgt(&mut encoder, &[0i16; 16]);
        encoder.finish().unwrap();

        let tile = DemTile::from_hgt_file(path).unwrap();
        assert_eq!(tile.size, 4);
        assert_eq!(tile.lon, -103);
        assert_eq!(tile.lat, -5);
    }

    /// A non-square height count is rejected.
    #[test]
    fn non_square_file_is_rejected() {
        let path = Path::new("target/debug/N11E021.hgt");
        let mut writer = BufWriter::new(File::create(path).unwrap());
        write_hgt(&mut writer, &[1, 2, 3, 4, 5]);
        drop(writer);

        assert!(DemTile::from_hgt_file(path).is_err());
    }

    #[test]
    fn malformed_tile_names_are_rejected() {
        assert!(DemTile::from_hgt_file(Path::new("X10E020.hgt")).is_err());
        assert!(DemTile::from_hgt_file(Path::new("N1.hgt")).is_err());
        assert!(DemTile::from_hgt_file(Path::new("NxxE020.hgt")).is_err());
    }

    /// Void samples become invalid mask flags in the elevation block.
    #[test]
    fn void_heights_invalidate_the_mask() {
        let mut heights = vec![500i16; 9];
        heights[4] = VOID_HEIGHT;
        let tile = DemTile::new(12, 47, 3, heights);

        let (elevation, mask) = tile.to_elevation();
        assert_eq!(elevation.get_pixel(0, 0), 500.0);
        assert_eq!(elevation.get_pixel(1, 1), 0.0);
        assert!(mask.is_valid(0, 0));
        assert!(!mask.is_valid(1, 1));
    }
}
