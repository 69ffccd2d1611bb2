//! `items.csv`: one row per item type (spec.md §6).

use anyhow::{Context, Result, bail};
use packingsolver_instance::{InstanceBuilder, ItemTypeId, RotationMask, Size, Size3};
use std::path::Path;

use crate::row::{Row, open_with_header};

/// Reads `items.csv` and adds one item type per row to `builder`. See
/// [`crate::bins::read_bin_types`] for the `three_dimensional` flag.
pub fn read_item_types(path: impl AsRef<Path>, builder: &mut InstanceBuilder, three_dimensional: bool) -> Result<Vec<ItemTypeId>> {
    let path = path.as_ref();
    let (mut reader, header) = open_with_header(path)?;
    let mut ids = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut line = 1u64;
    while reader.read_record(&mut record).with_context(|| format!("{}: read row", path.display()))? {
        line += 1;
        let row = Row::new(&header, record.clone(), line);
        let x = row.f64("X")?;
        let y = row.f64("Y")?;
        let profit = row.f64_or("PROFIT", -1.0)?;
        let profit = if profit < 0.0 { None } else { Some(profit) };
        let weight = row.f64_or("WEIGHT", 0.0)?;
        let copies = row.i64_or("COPIES", 1)?;
        let rotations_bits = row.u32_or("ROTATIONS", 1)?;
        let group_id = row.u32_or("GROUP_ID", 0)? as usize;

        let id = if three_dimensional {
            if !row.has_column("Z") {
                bail!("{}: row {}: missing mandatory column 'Z' for a 3D instance", path.display(), line);
            }
            let z = row.f64("Z")?;
            let stackability_id = row.u32_or("STACKABILITY_ID", 0)? as usize;
            let maximum_stackability = row.u32_or("MAXIMUM_STACKABILITY", u32::MAX)?;
            let maximum_weight_above = row.f64_or("MAXIMUM_WEIGHT_ABOVE", f64::MAX)?;
            let nesting_height = row.f64_or("NESTING_HEIGHT", 0.0)?;
            let rotations = RotationMask::from_bits_truncate(rotations_bits as u8);
            let rotations = if rotations.is_empty() { RotationMask::CANONICAL_ONLY } else { rotations };
            builder.add_box_item_type(
                Size3::new(x, y, z),
                rotations,
                copies,
                profit,
                weight,
                group_id,
                stackability_id,
                maximum_stackability,
                maximum_weight_above,
                nesting_height,
            )?
        } else {
            let rotations = RotationMask::from_bits_truncate(rotations_bits as u8);
            let rotations = if rotations.is_empty() { RotationMask::CANONICAL_ONLY } else { rotations };
            builder.add_rectangle_item_type(Size::new(x, y), rotations, copies, profit, weight, group_id)?
        };
        ids.push(id);
    }
    if ids.is_empty() {
        bail!("{}: no item type rows", path.display());
    }
    Ok(ids)
}
