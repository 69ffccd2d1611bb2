//! `defects.csv`: one row per forbidden rectangle (spec.md §6). All four
//! columns (`BIN`, `X`, `Y`, `LX`, `LY`) are mandatory.

use anyhow::{Context, Result};
use packingsolver_instance::{BinTypeId, InstanceBuilder, Point, Size};
use std::path::Path;

use crate::row::{Row, open_with_header};

/// Reads `defects.csv` and adds one defect per row to `builder`.
///
/// `bin_type_ids` maps a defect's `BIN` column (its row index into
/// `bins.csv`) to the [`BinTypeId`] [`crate::bins::read_bin_types`] assigned
/// that row, since the two need not coincide once bin rows are re-ordered.
pub fn read_defects(path: impl AsRef<Path>, builder: &mut InstanceBuilder, bin_type_ids: &[BinTypeId]) -> Result<usize> {
    let path = path.as_ref();
    let (mut reader, header) = open_with_header(path)?;
    let mut count = 0;
    let mut record = csv::StringRecord::new();
    let mut line = 1u64;
    while reader.read_record(&mut record).with_context(|| format!("{}: read row", path.display()))? {
        line += 1;
        let row = Row::new(&header, record.clone(), line);
        let bin_row = row.i64_req("BIN")? as usize;
        let bin_type_id = *bin_type_ids.get(bin_row).with_context(|| {
            format!("{}: row {}: 'BIN' = {bin_row} is out of range (bins.csv has {} rows)", path.display(), line, bin_type_ids.len())
        })?;
        let x = row.f64("X")?;
        let y = row.f64("Y")?;
        let lx = row.f64("LX")?;
        let ly = row.f64("LY")?;
        builder.add_defect(bin_type_id, Point::new(x, y), Size::new(lx, ly))?;
        count += 1;
    }
    Ok(count)
}
