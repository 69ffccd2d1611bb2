//! `parameters.csv`: `NAME,VALUE` key-value rows (spec.md §6).

use anyhow::{Context, Result, bail};
use packingsolver_instance::InstanceBuilder;
use std::path::Path;

use crate::row::{Row, open_with_header};

/// Reads `parameters.csv` and applies every recognized `NAME` to `builder`:
/// `objective`, `unloading-constraint`, and `no-check-weight-constraints`
/// (repeatable; value is the excluded group id).
pub fn read_parameters(path: impl AsRef<Path>, builder: &mut InstanceBuilder) -> Result<()> {
    let path = path.as_ref();
    let (mut reader, header) = open_with_header(path)?;
    let mut record = csv::StringRecord::new();
    let mut line = 1u64;
    while reader.read_record(&mut record).with_context(|| format!("{}: read row", path.display()))? {
        line += 1;
        let row = Row::new(&header, record.clone(), line);
        let name = row.str_or("NAME", "");
        let value = row.str_or("VALUE", "");
        if name.is_empty() {
            bail!("{}: row {}: missing mandatory column 'NAME'", path.display(), line);
        }
        match name {
            "objective" => {
                let objective = value
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!("{}: row {}: {e}", path.display(), line))?;
                builder.set_objective(objective);
            }
            "unloading-constraint" => {
                let constraint = value
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!("{}: row {}: {e}", path.display(), line))?;
                builder.set_unloading_constraint(constraint);
            }
            "no-check-weight-constraints" => {
                let group_id = value
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("{}: row {}: 'VALUE' = {value:?} is not a group id", path.display(), line))?;
                builder.exclude_group_from_weight_constraint(group_id);
            }
            other => {
                tracing::warn!(parameter = other, "{}: row {}: unrecognized parameter name, ignoring", path.display(), line);
            }
        }
    }
    Ok(())
}
