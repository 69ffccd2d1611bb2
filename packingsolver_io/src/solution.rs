//! Solution emission: `(bin_id, item_type_id, x, y[, z], rotation[, stack_id])`
//! tuples, plus the rectangle-guillotine cut tree as `(depth, cut_position)`
//! rows (spec.md §6).

use anyhow::{Context, Result};
use packingsolver_solution::{Placement, Solution};
use std::path::Path;

/// One row of the placed-items CSV.
#[derive(Debug, serde::Serialize)]
struct PlacedItemRow {
    bin_id: usize,
    item_type_id: usize,
    x: f64,
    y: f64,
    z: f64,
    rotation: String,
    stack_id: i64,
}

/// One row of the rectangle-guillotine cut tree CSV.
#[derive(Debug, serde::Serialize)]
struct CutRow {
    bin_id: usize,
    depth: u32,
    cut_position: f64,
    item_type_id: i64,
}

fn rotation_name(rotation: packingsolver_instance::Rotation) -> &'static str {
    use packingsolver_instance::Rotation as R;
    match rotation {
        R::Xyz => "xyz",
        R::Xzy => "xzy",
        R::Yxz => "yxz",
        R::Yzx => "yzx",
        R::Zxy => "zxy",
        R::Zyx => "zyx",
    }
}

/// Writes a solution's placed items to `path` as CSV. Rectangle/box-scheme
/// items carry their `(x, y[, z])`; rectangle-guillotine items are
/// recorded only through the cut tree (see [`write_cut_tree_csv`]) and are
/// skipped here.
pub fn write_placed_items_csv(path: impl AsRef<Path>, solution: &Solution<'_>) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    let mut count = 0;
    for item in solution.items() {
        let (x, y, z) = match item.placement {
            Placement::Rect { x, y } => (x, y, 0.0),
            Placement::Box { x, y, z } => (x, y, z),
            Placement::GuillotineLeaf { .. } => continue,
        };
        writer
            .serialize(PlacedItemRow {
                bin_id: item.bin_pos,
                item_type_id: item.item_type_id,
                x,
                y,
                z,
                rotation: rotation_name(item.rotation).to_string(),
                stack_id: item.stack_id.map_or(-1, |s| s as i64),
            })
            .with_context(|| format!("{}: serialize placed item row", path.display()))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Writes a rectangle-guillotine solution's cut tree to `path` as
/// `(depth, cut_position)` rows, one per [`packingsolver_solution::CutNode`].
pub fn write_cut_tree_csv(path: impl AsRef<Path>, solution: &Solution<'_>) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for node in solution.cut_tree() {
        writer
            .serialize(CutRow {
                bin_id: node.bin_pos,
                depth: node.depth,
                cut_position: node.cut_position,
                item_type_id: node.item_type_id.map_or(-1, |id| id as i64),
            })
            .with_context(|| format!("{}: serialize cut tree row", path.display()))?;
    }
    writer.flush()?;
    Ok(solution.cut_tree().len())
}
