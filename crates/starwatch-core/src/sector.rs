//! Navigation sector naming.
//!
//! Space is divided into square sectors. Rows are lettered and columns
//! numbered, with the world origin in the corner of sector `F5`.

use glam::Vec2;

use crate::constants::{SECTOR_ORIGIN_OFFSET, SECTOR_SIZE};

/// Name of the sector containing `position` using the default sector size.
pub fn sector_name(position: Vec2) -> String {
    sector_name_with_size(position, SECTOR_SIZE)
}

/// Name of the sector containing `position` for a given sector edge length.
///
/// Rows at or past the origin row use upper-case letters (`A`..`Z`, then
/// `AA`, `AB`, ...). Rows before it use a descending lower-case pair
/// (`zz`, `zy`, ...). Negative columns wrap to `100 + column`.
/// A non-positive or non-finite `sector_size` falls back to [`SECTOR_SIZE`].
pub fn sector_name_with_size(position: Vec2, sector_size: f32) -> String {
    let sector_size = if sector_size.is_finite() && sector_size > 0.0 {
        sector_size
    } else {
        SECTOR_SIZE
    };
    let column = sector_index(position.x, sector_size);
    let row = sector_index(position.y, sector_size);

    let mut name = row_label(row);
    if column >= 0 {
        name.push_str(&column.to_string());
    } else {
        name.push_str(&(100 + column).to_string());
    }
    name
}

fn sector_index(coord: f32, sector_size: f32) -> i64 {
    // `as` saturates for out-of-range floats and maps NaN to 0
    ((coord / sector_size).floor() as i64).saturating_add(SECTOR_ORIGIN_OFFSET as i64)
}

fn row_label(row: i64) -> String {
    if row >= 0 {
        let mut label = String::new();
        let mut n = row;
        loop {
            label.insert(0, (b'A' + (n % 26) as u8) as char);
            n = n / 26 - 1;
            if n < 0 {
                break;
            }
        }
        label
    } else {
        let n = row.unsigned_abs() - 1;
        let first = (b'z' - ((n / 26) % 26) as u8) as char;
        let second = (b'z' - (n % 26) as u8) as char;
        format!("{first}{second}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_f5() {
        assert_eq!(sector_name(Vec2::new(0.0, 0.0)), "F5");
        assert_eq!(sector_name(Vec2::new(19_999.0, 19_999.0)), "F5");
    }

    #[test]
    fn neighbouring_sectors() {
        assert_eq!(sector_name(Vec2::new(20_000.0, 0.0)), "F6");
        assert_eq!(sector_name(Vec2::new(-1.0, 0.0)), "F4");
        assert_eq!(sector_name(Vec2::new(0.0, -1.0)), "E5");
        assert_eq!(sector_name(Vec2::new(0.0, 20_000.0)), "G5");
    }

    #[test]
    fn far_rows_and_columns() {
        // Row 26 wraps to two letters.
        assert_eq!(sector_name(Vec2::new(0.0, 21.0 * 20_000.0)), "AA5");
        // Row -1 and -2.
        assert_eq!(sector_name(Vec2::new(0.0, -6.0 * 20_000.0 + 1.0)), "zz5");
        assert_eq!(sector_name(Vec2::new(0.0, -7.0 * 20_000.0 + 1.0)), "zy5");
        // Column -1 wraps to 99.
        assert_eq!(sector_name(Vec2::new(-6.0 * 20_000.0 + 1.0, 0.0)), "F99");
    }

    #[test]
    fn far_positions_do_not_overflow() {
        let name = sector_name(Vec2::new(1.0e15, 0.0));
        assert!(name.starts_with('F'), "got {name}");
        assert!(!sector_name(Vec2::new(f32::MAX, f32::MAX)).is_empty());
        assert!(!sector_name(Vec2::new(f32::MIN, f32::MIN)).is_empty());
        assert!(!sector_name(Vec2::new(f32::INFINITY, f32::NEG_INFINITY)).is_empty());
    }

    #[test]
    fn invalid_sector_size_uses_default() {
        let expected = sector_name(Vec2::new(10.0, 0.0));
        assert_eq!(sector_name_with_size(Vec2::new(10.0, 0.0), 0.0), expected);
        assert_eq!(sector_name_with_size(Vec2::new(10.0, 0.0), -500.0), expected);
        assert_eq!(sector_name_with_size(Vec2::new(10.0, 0.0), f32::NAN), expected);
    }
}
