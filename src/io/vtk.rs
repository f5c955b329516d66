//! Legacy VTK format support.
//!
//! Triangulations are written as ASCII `UNSTRUCTURED_GRID` datasets that
//! ParaView and VisIt open directly. Active cells come first, followed (when
//! enabled) by the faces that carry a boundary id or a manifold id. Two
//! scalar fields are attached to every record:
//!
//! - `MaterialID`: material id for cells, boundary id for faces
//! - `ManifoldID`: manifold id, `-1` for flat geometry
//!
//! The reader understands the subset of the format the writer produces plus
//! point data, and is mainly used to check and inspect written files.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::Point;

use crate::error::{MeshError, Result};
use crate::mesh::cell::{vtk_cell_type, vtk_ordering};
use crate::mesh::{
    create_triangulation, CellData, FaceData, ManifoldId, SubCellData, Triangulation,
    FLAT_MANIFOLD_ID,
};

/// Name of the scalar field holding material and boundary ids.
pub const MATERIAL_ID_FIELD: &str = "MaterialID";

/// Name of the scalar field holding manifold ids.
pub const MANIFOLD_ID_FIELD: &str = "ManifoldID";

const TITLE: &str = "Triangulation generated with meshgen";

/// Controls what is written to a VTK file.
#[derive(Debug, Clone)]
pub struct VtkFlags {
    /// Write the active cells (default: true).
    pub output_cells: bool,

    /// Write faces with a non-zero boundary id or a manifold id (default: true).
    pub output_faces: bool,
}

impl Default for VtkFlags {
    fn default() -> Self {
        Self {
            output_cells: true,
            output_faces: true,
        }
    }
}

impl VtkFlags {
    /// Write active cells only.
    pub fn cells_only() -> Self {
        Self {
            output_cells: true,
            output_faces: false,
        }
    }

    /// Set whether tagged faces are written.
    pub fn with_faces(mut self, output_faces: bool) -> Self {
        self.output_faces = output_faces;
        self
    }
}

/// One record of the `CELLS` section.
#[derive(Debug, Clone)]
pub(crate) struct VtkCell {
    pub vertices: Vec<usize>,
    pub cell_type: u8,
    pub material_id: i64,
    pub manifold_id: i64,
}

fn manifold_to_vtk(id: ManifoldId) -> i64 {
    if id == FLAT_MANIFOLD_ID {
        -1
    } else {
        id as i64
    }
}

/// Records to write, in file order, with vertices in VTK order.
pub(crate) fn collect_cells<const DIM: usize>(
    tria: &Triangulation<DIM>,
    flags: &VtkFlags,
) -> Vec<VtkCell> {
    let mut records = Vec::new();
    if flags.output_cells {
        let ordering = vtk_ordering(DIM);
        records.extend(tria.active_cells().iter().map(|c| VtkCell {
            vertices: ordering.iter().map(|&i| c.vertices[i]).collect(),
            cell_type: vtk_cell_type(DIM),
            material_id: c.material_id as i64,
            manifold_id: manifold_to_vtk(c.manifold_id),
        }));
    }
    if flags.output_faces && DIM > 1 {
        let ordering = vtk_ordering(DIM - 1);
        records.extend(tria.tagged_faces().map(|f| VtkCell {
            vertices: ordering.iter().map(|&i| f.vertices[i]).collect(),
            cell_type: vtk_cell_type(DIM - 1),
            material_id: f.boundary_id as i64,
            manifold_id: manifold_to_vtk(f.manifold_id),
        }));
    }
    records
}

/// Padded 3D coordinates of a vertex.
pub(crate) fn point_xyz<const DIM: usize>(p: &Point<f64, DIM>) -> [f64; 3] {
    let mut xyz = [0.0; 3];
    for d in 0..DIM.min(3) {
        xyz[d] = p[d];
    }
    xyz
}

/// Write a triangulation in legacy VTK format.
///
/// Output is a pure function of the triangulation: writing the same mesh
/// twice gives identical bytes.
pub fn write<const DIM: usize, W: Write>(
    tria: &Triangulation<DIM>,
    writer: &mut W,
    flags: &VtkFlags,
) -> Result<()> {
    let records = collect_cells(tria, flags);

    writeln!(writer, "# vtk DataFile Version 3.0")?;
    writeln!(writer, "{}", TITLE)?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;
    writeln!(writer)?;

    writeln!(writer, "POINTS {} double", tria.n_vertices())?;
    for p in tria.vertices() {
        let [x, y, z] = point_xyz(p);
        writeln!(writer, "{} {} {}", x, y, z)?;
    }
    writeln!(writer)?;

    let size: usize = records.iter().map(|r| r.vertices.len() + 1).sum();
    writeln!(writer, "CELLS {} {}", records.len(), size)?;
    for r in &records {
        write!(writer, "{}", r.vertices.len())?;
        for v in &r.vertices {
            write!(writer, " {}", v)?;
        }
        writeln!(writer)?;
    }
    writeln!(writer)?;

    writeln!(writer, "CELL_TYPES {}", records.len())?;
    for r in &records {
        writeln!(writer, "{}", r.cell_type)?;
    }
    writeln!(writer)?;

    writeln!(writer, "CELL_DATA {}", records.len())?;
    write_scalars(writer, MATERIAL_ID_FIELD, records.iter().map(|r| r.material_id))?;
    writeln!(writer)?;
    write_scalars(writer, MANIFOLD_ID_FIELD, records.iter().map(|r| r.manifold_id))?;

    writer.flush()?;
    Ok(())
}

fn write_scalars<W: Write>(
    writer: &mut W,
    name: &str,
    values: impl Iterator<Item = i64>,
) -> Result<()> {
    writeln!(writer, "SCALARS {} int 1", name)?;
    writeln!(writer, "LOOKUP_TABLE default")?;
    for v in values {
        writeln!(writer, "{}", v)?;
    }
    Ok(())
}

/// Save a triangulation to a legacy VTK file with default flags.
///
/// # Example
///
/// ```no_run
/// use meshgen::generate::cheese;
/// use meshgen::io::vtk;
///
/// let tria = cheese([3, 2]).unwrap();
/// vtk::save(&tria, "cheese_2D.vtk").unwrap();
/// ```
pub fn save<const DIM: usize, P: AsRef<Path>>(tria: &Triangulation<DIM>, path: P) -> Result<()> {
    save_with_flags(tria, path, &VtkFlags::default())
}

/// Save a triangulation to a legacy VTK file.
pub fn save_with_flags<const DIM: usize, P: AsRef<Path>>(
    tria: &Triangulation<DIM>,
    path: P,
    flags: &VtkFlags,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    write(tria, &mut writer, flags)?;
    log::info!(
        "wrote {}D triangulation with {} cells to {}",
        DIM,
        tria.n_active_cells(),
        path.display()
    );
    Ok(())
}

/// Contents of a legacy VTK unstructured grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VtkGrid {
    /// Title line of the file.
    pub title: String,
    /// Point coordinates.
    pub points: Vec<[f64; 3]>,
    /// Cell connectivity in VTK vertex order.
    pub cells: Vec<Vec<usize>>,
    /// VTK cell type of each cell.
    pub cell_types: Vec<u8>,
    /// Scalar cell fields by name.
    pub cell_data: BTreeMap<String, Vec<f64>>,
    /// Scalar point fields by name.
    pub point_data: BTreeMap<String, Vec<f64>>,
}

impl VtkGrid {
    /// Number of points.
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Number of records in the `CELLS` section.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Highest topological dimension among the cells (0 if there are none).
    pub fn dimension(&self) -> usize {
        self.cell_types
            .iter()
            .map(|&t| cell_type_dimension(t))
            .max()
            .unwrap_or(0)
    }

    /// Number of cells of the given topological dimension.
    pub fn n_cells_of_dimension(&self, dim: usize) -> usize {
        self.cell_types
            .iter()
            .filter(|&&t| cell_type_dimension(t) == dim)
            .count()
    }

    /// Rebuild a coarse triangulation from the grid.
    ///
    /// Cells of dimension `DIM` become cells, with material and manifold ids
    /// restored from the `MaterialID` and `ManifoldID` fields. Cells of
    /// dimension `DIM - 1` become face tags. A refined triangulation comes
    /// back as a coarse one with the same active cells.
    pub fn into_triangulation<const DIM: usize>(self) -> Result<Triangulation<DIM>> {
        if self.dimension() != DIM {
            return Err(MeshError::invalid_param(
                "dimension",
                self.dimension(),
                "file does not contain cells of the requested dimension",
            ));
        }

        let field = |name: &str, i: usize| self.cell_data.get(name).and_then(|v| v.get(i)).copied();
        let manifold = |i: usize| match field(MANIFOLD_ID_FIELD, i) {
            Some(m) if m >= 0.0 => m as ManifoldId,
            _ => FLAT_MANIFOLD_ID,
        };

        let mut cells = Vec::new();
        let mut subcell = SubCellData::default();
        for (i, (vtk_vertices, &cell_type)) in self.cells.iter().zip(&self.cell_types).enumerate() {
            let dim = cell_type_dimension(cell_type);
            if dim != DIM && dim + 1 != DIM {
                continue;
            }
            let ordering = vtk_ordering(dim);
            if vtk_vertices.len() != ordering.len() {
                return Err(MeshError::WrongVertexCount {
                    cell: i,
                    found: vtk_vertices.len(),
                    expected: ordering.len(),
                });
            }
            // the VTK permutation is its own inverse
            let vertices: Vec<usize> = ordering.iter().map(|&k| vtk_vertices[k]).collect();
            let id = field(MATERIAL_ID_FIELD, i).unwrap_or(0.0).max(0.0) as u32;

            if dim == DIM {
                cells.push(
                    CellData::new(vertices)
                        .with_material_id(id)
                        .with_manifold_id(manifold(i)),
                );
            } else {
                subcell.faces.push(
                    FaceData::new(vertices)
                        .with_boundary_id(id)
                        .with_manifold_id(manifold(i)),
                );
            }
        }

        let vertices = self
            .points
            .iter()
            .map(|xyz| {
                let mut p = Point::<f64, DIM>::origin();
                for d in 0..DIM.min(3) {
                    p[d] = xyz[d];
                }
                p
            })
            .collect();

        create_triangulation(vertices, cells, subcell)
    }
}

fn cell_type_dimension(cell_type: u8) -> usize {
    match cell_type {
        1 | 2 => 0,
        3 | 4 => 1,
        5..=9 => 2,
        _ => 3,
    }
}

/// Load a legacy VTK file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<VtkGrid> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| match e {
        MeshError::Io(e) => MeshError::Io(e),
        other => MeshError::LoadError {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })
}

/// Parse a legacy ASCII VTK unstructured grid.
pub fn read<R: BufRead>(mut reader: R) -> Result<VtkGrid> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    // every value takes at least two bytes, so counts above this are truncated files
    let capacity = |n: usize| n.min(content.len() / 2);

    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));
    let mut header = |expected: &str| -> Result<(usize, String)> {
        match lines.next() {
            Some((n, l)) => Ok((n, l.to_string())),
            None => Err(MeshError::parse(0, format!("missing {}", expected))),
        }
    };

    let (n, version) = header("version line")?;
    if !version.starts_with("# vtk DataFile Version") {
        return Err(MeshError::parse(n, "not a legacy VTK file"));
    }
    let (_, title) = header("title")?;
    let (n, encoding) = header("encoding")?;
    if encoding != "ASCII" {
        return Err(MeshError::parse(n, format!("unsupported encoding {}", encoding)));
    }
    let (n, dataset) = header("dataset")?;
    if dataset != "DATASET UNSTRUCTURED_GRID" {
        return Err(MeshError::parse(n, format!("unsupported dataset: {}", dataset)));
    }

    let mut tokens = Tokens::new(lines);
    let mut grid = VtkGrid {
        title,
        ..Default::default()
    };

    enum Section {
        None,
        Cell(usize),
        Point(usize),
    }
    let mut section = Section::None;

    while let Some((line, keyword)) = tokens.next_token() {
        match keyword {
            "POINTS" => {
                let n = tokens.parse::<usize>()?;
                let _scalar_type = tokens.word()?;
                grid.points.reserve(capacity(n));
                for _ in 0..n {
                    grid.points.push([tokens.parse()?, tokens.parse()?, tokens.parse()?]);
                }
            }
            "CELLS" => {
                let n = tokens.parse::<usize>()?;
                let _size = tokens.parse::<usize>()?;
                for _ in 0..n {
                    let k = tokens.parse::<usize>()?;
                    let mut cell = Vec::with_capacity(capacity(k));
                    for _ in 0..k {
                        let (line, v) = tokens.parse_at::<usize>()?;
                        if v >= grid.points.len() {
                            return Err(MeshError::parse(
                                line,
                                format!("point index {} out of range", v),
                            ));
                        }
                        cell.push(v);
                    }
                    grid.cells.push(cell);
                }
            }
            "CELL_TYPES" => {
                let n = tokens.parse::<usize>()?;
                for _ in 0..n {
                    grid.cell_types.push(tokens.parse()?);
                }
            }
            "CELL_DATA" => section = Section::Cell(tokens.parse()?),
            "POINT_DATA" => section = Section::Point(tokens.parse()?),
            "SCALARS" => {
                let name = tokens.word()?.to_string();
                let _data_type = tokens.word()?;
                // optional component count, then LOOKUP_TABLE <name>
                let mut next = tokens.word()?;
                if next != "LOOKUP_TABLE" {
                    next = tokens.word()?;
                }
                if next != "LOOKUP_TABLE" {
                    return Err(MeshError::parse(line, "expected LOOKUP_TABLE"));
                }
                let _table = tokens.word()?;

                let (n, target) = match section {
                    Section::Cell(n) => (n, &mut grid.cell_data),
                    Section::Point(n) => (n, &mut grid.point_data),
                    Section::None => {
                        return Err(MeshError::parse(line, "SCALARS outside a data section"))
                    }
                };
                let mut values = Vec::with_capacity(capacity(n));
                for _ in 0..n {
                    values.push(tokens.parse::<f64>()?);
                }
                target.insert(name, values);
            }
            other => {
                return Err(MeshError::parse(line, format!("unexpected keyword {}", other)));
            }
        }
    }

    if grid.cells.len() != grid.cell_types.len() {
        return Err(MeshError::parse(
            tokens.line,
            format!(
                "{} cells but {} cell types",
                grid.cells.len(),
                grid.cell_types.len()
            ),
        ));
    }

    Ok(grid)
}

/// Whitespace-separated tokens with their line numbers.
struct Tokens<'a, I: Iterator<Item = (usize, &'a str)>> {
    lines: I,
    current: std::str::SplitWhitespace<'a>,
    line: usize,
}

impl<'a, I: Iterator<Item = (usize, &'a str)>> Tokens<'a, I> {
    fn new(lines: I) -> Self {
        Self {
            lines,
            current: "".split_whitespace(),
            line: 0,
        }
    }

    fn next_token(&mut self) -> Option<(usize, &'a str)> {
        loop {
            if let Some(t) = self.current.next() {
                return Some((self.line, t));
            }
            let (n, l) = self.lines.next()?;
            self.line = n;
            self.current = l.split_whitespace();
        }
    }

    fn word(&mut self) -> Result<&'a str> {
        self.next_token()
            .map(|(_, t)| t)
            .ok_or_else(|| MeshError::parse(self.line, "unexpected end of file"))
    }

    fn parse_at<T: std::str::FromStr>(&mut self) -> Result<(usize, T)> {
        let token = self.word()?;
        token
            .parse()
            .map(|v| (self.line, v))
            .map_err(|_| MeshError::parse(self.line, format!("invalid number '{}'", token)))
    }

    fn parse<T: std::str::FromStr>(&mut self) -> Result<T> {
        self.parse_at().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{cheese, hyper_cube_with_cylindrical_hole};
    use crate::mesh::build_from_quads;
    use nalgebra::Point2;

    fn unit_square() -> Triangulation<2> {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap()
    }

    fn to_string<const DIM: usize>(tria: &Triangulation<DIM>, flags: &VtkFlags) -> String {
        let mut buffer = Vec::new();
        write(tria, &mut buffer, flags).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_square() {
        let text = to_string(&unit_square(), &VtkFlags::default());
        let expected = "\
# vtk DataFile Version 3.0
Triangulation generated with meshgen
ASCII
DATASET UNSTRUCTURED_GRID

POINTS 4 double
0 0 0
1 0 0
0 1 0
1 1 0

CELLS 1 5
4 0 1 3 2

CELL_TYPES 1
9

CELL_DATA 1
SCALARS MaterialID int 1
LOOKUP_TABLE default
0

SCALARS ManifoldID int 1
LOOKUP_TABLE default
-1
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_tagged_faces_written_as_lines() {
        let tria = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
        let text = to_string(&tria, &VtkFlags::default());
        assert!(text.contains("CELLS 16 64"));
        assert_eq!(text.lines().filter(|l| *l == "3").count(), 8);

        let text = to_string(&tria, &VtkFlags::cells_only());
        assert!(text.contains("CELLS 8 40"));
    }

    #[test]
    fn test_read_back() {
        let tria = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
        let text = to_string(&tria, &VtkFlags::default());
        let grid = read(text.as_bytes()).unwrap();

        assert_eq!(grid.title, TITLE);
        assert_eq!(grid.n_points(), 16);
        assert_eq!(grid.n_cells(), 16);
        assert_eq!(grid.dimension(), 2);
        assert_eq!(grid.n_cells_of_dimension(1), 8);
        assert_eq!(grid.cell_data[MANIFOLD_ID_FIELD][8], 0.0);

        let back: Triangulation<2> = grid.into_triangulation().unwrap();
        assert_eq!(back.n_active_cells(), 8);
        assert_eq!(back.active_cells(), tria.active_cells());
        assert_eq!(back.manifold_id(&[8, 9]), Some(0));
    }

    #[test]
    fn test_deterministic() {
        let tria = cheese([2, 2]).unwrap();
        let a = to_string(&tria, &VtkFlags::default());
        let b = to_string(&tria.clone(), &VtkFlags::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_dimension() {
        let text = to_string(&unit_square(), &VtkFlags::default());
        let grid = read(text.as_bytes()).unwrap();
        assert!(grid.into_triangulation::<3>().is_err());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            read("not vtk\n".as_bytes()),
            Err(MeshError::Parse { line: 1, .. })
        ));

        let binary = "# vtk DataFile Version 3.0\nx\nBINARY\nDATASET UNSTRUCTURED_GRID\n";
        assert!(matches!(
            read(binary.as_bytes()),
            Err(MeshError::Parse { line: 3, .. })
        ));

        let truncated =
            "# vtk DataFile Version 3.0\nx\nASCII\nDATASET UNSTRUCTURED_GRID\nPOINTS 2 double\n0 0 0\n";
        assert!(matches!(read(truncated.as_bytes()), Err(MeshError::Parse { .. })));

        let bad_index = "# vtk DataFile Version 3.0\nx\nASCII\nDATASET UNSTRUCTURED_GRID\n\
                         POINTS 1 double\n0 0 0\nCELLS 1 2\n1 4\n";
        assert!(matches!(
            read(bad_index.as_bytes()),
            Err(MeshError::Parse { line: 8, .. })
        ));

        let huge_points = "# vtk DataFile Version 3.0\nx\nASCII\nDATASET UNSTRUCTURED_GRID\n\
                           POINTS 18446744073709551615 double\n0 0 0\n";
        assert!(matches!(read(huge_points.as_bytes()), Err(MeshError::Parse { .. })));

        let huge_cell = "# vtk DataFile Version 3.0\nx\nASCII\nDATASET UNSTRUCTURED_GRID\n\
                         POINTS 1 double\n0 0 0\nCELLS 1 2\n18446744073709551615 0\n";
        assert!(matches!(read(huge_cell.as_bytes()), Err(MeshError::Parse { .. })));

        let huge_data = "# vtk DataFile Version 3.0\nx\nASCII\nDATASET UNSTRUCTURED_GRID\n\
                         POINTS 1 double\n0 0 0\nCELL_DATA 18446744073709551615\n\
                         SCALARS MaterialID int 1\nLOOKUP_TABLE default\n0\n";
        assert!(matches!(read(huge_data.as_bytes()), Err(MeshError::Parse { .. })));
    }

    #[test]
    fn test_save_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("square.vtk");
        assert!(matches!(
            save(&unit_square(), &path),
            Err(MeshError::SaveError { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheese_2D.vtk");
        let tria = cheese([3, 2]).unwrap();
        save(&tria, &path).unwrap();

        let grid = load(&path).unwrap();
        assert_eq!(grid.n_points(), 48);
        assert_eq!(grid.n_cells_of_dimension(2), 29);
    }
}
