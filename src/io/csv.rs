use std::{fs::File, path::Path};

use anyhow::{Context, Result, bail, ensure};
use polars::prelude::{CsvReadOptions, SerReader};

use crate::{graph::Graph, io::Assignment};

/// Read a plan from a CSV whose first two columns are node id and district label.
///
/// Every column is read as text, so ids with leading zeros survive.
pub fn read_assignment_csv(path: &Path, graph: &Graph) -> Result<Assignment> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv] Failed to open assignment CSV: {}", path.display()))?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv] Failed to read assignment CSV from {:?}", path))?;

    ensure!(df.width() >= 2, "[io::csv] CSV must have two columns: node id, district");
    ensure!(df.height() == graph.node_count(), "[io::csv] CSV has {} rows, expected {}", df.height(), graph.node_count());

    let names = df.get_column_names();
    let ids = df.column(names[0])?.str()?;
    let districts = df.column(names[1])?.str()?;

    let mut labels = vec![None; graph.node_count()];
    for (row, (id, district)) in ids.into_iter().zip(districts.into_iter()).enumerate() {
        let (Some(id), Some(district)) = (id, district) else {
            bail!("[io::csv] Row {row} has an empty cell")
        };
        let node = graph.node_index(id.trim())
            .with_context(|| format!("[io::csv] Node '{id}' in CSV not found in graph"))?;
        ensure!(labels[node].is_none(), "[io::csv] Node '{id}' is assigned twice");
        labels[node] = Some(district.trim().to_string());
    }

    Assignment::from_node_labels(graph, labels)
}
