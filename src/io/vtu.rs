//! VTK XML unstructured grid (`.vtu`) output.
//!
//! Writes the same records as the legacy writer (see [`vtk`](super::vtk))
//! in the XML layout, with ASCII data arrays. Reading `.vtu` is not
//! supported.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::vtk::{collect_cells, point_xyz, VtkFlags, MANIFOLD_ID_FIELD, MATERIAL_ID_FIELD};
use crate::error::Result;
use crate::mesh::Triangulation;

/// Write a triangulation as a VTK XML unstructured grid.
pub fn write<const DIM: usize, W: Write>(
    tria: &Triangulation<DIM>,
    writer: &mut W,
    flags: &VtkFlags,
) -> Result<()> {
    let records = collect_cells(tria, flags);

    writeln!(writer, "<?xml version=\"1.0\"?>")?;
    writeln!(
        writer,
        "<VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">"
    )?;
    writeln!(writer, "  <UnstructuredGrid>")?;
    writeln!(
        writer,
        "    <Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">",
        tria.n_vertices(),
        records.len()
    )?;

    writeln!(writer, "      <Points>")?;
    writeln!(
        writer,
        "        <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">"
    )?;
    for p in tria.vertices() {
        let [x, y, z] = point_xyz(p);
        writeln!(writer, "          {} {} {}", x, y, z)?;
    }
    writeln!(writer, "        </DataArray>")?;
    writeln!(writer, "      </Points>")?;

    writeln!(writer, "      <Cells>")?;
    open_array(writer, "Int64", "connectivity")?;
    for r in &records {
        let line: Vec<String> = r.vertices.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "          {}", line.join(" "))?;
    }
    close_array(writer)?;

    open_array(writer, "Int64", "offsets")?;
    let mut offset = 0;
    for r in &records {
        offset += r.vertices.len();
        writeln!(writer, "          {}", offset)?;
    }
    close_array(writer)?;

    open_array(writer, "UInt8", "types")?;
    for r in &records {
        writeln!(writer, "          {}", r.cell_type)?;
    }
    close_array(writer)?;
    writeln!(writer, "      </Cells>")?;

    writeln!(writer, "      <CellData Scalars=\"{}\">", MATERIAL_ID_FIELD)?;
    open_array(writer, "Int32", MATERIAL_ID_FIELD)?;
    for r in &records {
        writeln!(writer, "          {}", r.material_id)?;
    }
    close_array(writer)?;
    open_array(writer, "Int32", MANIFOLD_ID_FIELD)?;
    for r in &records {
        writeln!(writer, "          {}", r.manifold_id)?;
    }
    close_array(writer)?;
    writeln!(writer, "      </CellData>")?;

    writeln!(writer, "    </Piece>")?;
    writeln!(writer, "  </UnstructuredGrid>")?;
    writeln!(writer, "</VTKFile>")?;

    writer.flush()?;
    Ok(())
}

fn open_array<W: Write>(writer: &mut W, data_type: &str, name: &str) -> Result<()> {
    writeln!(
        writer,
        "        <DataArray type=\"{}\" Name=\"{}\" format=\"ascii\">",
        data_type, name
    )?;
    Ok(())
}

fn close_array<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "        </DataArray>")?;
    Ok(())
}

/// Save a triangulation to a `.vtu` file with default flags.
pub fn save<const DIM: usize, P: AsRef<Path>>(tria: &Triangulation<DIM>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(tria, &mut writer, &VtkFlags::default())?;
    log::info!(
        "wrote {}D triangulation with {} cells to {}",
        DIM,
        tria.n_active_cells(),
        path.display()
    );
    Ok(())
}
