//! The six fixed mesh recipes.
//!
//! Each [`Builder`] constructs a 2D quadrilateral mesh, optionally perturbs
//! it, extrudes it into a 3D hexahedral mesh, refines both globally and
//! writes them as `<name>_2D.vtk` and `<name>_3D.vtk`.
//!
//! | Builder | 2D shape | Layers, height | Refinements |
//! |---------|----------|----------------|-------------|
//! | `cube_hole` | square with a hole, radii 0.25 and 1 | 3, 2.0 | 4 |
//! | `subdivided_rect` | 3 x 2 grid on `(1,-1)..(4,1)`, y graded with `tanh` after extrusion | 3, 2.0 | 4 |
//! | `merge_cube_rect` | union of the two above | 3, 2.0 | 4 |
//! | `shift_cube` | square with a hole, top edge moved up by 0.5 | 3, 2.0 | 2 |
//! | `cheese` | plate with 3 x 2 holes | 3, 2.0 | 4 |
//! | `hamburg` | hard-coded 292-vertex grid in metres | 3, 1500.0 | 0 |
//!
//! # Example
//!
//! ```no_run
//! use meshgen::builders::{BuildOptions, Builder};
//!
//! for report in Builder::Cheese.run("out", &BuildOptions::default()).unwrap() {
//!     println!("{}\n", report);
//! }
//! ```

pub mod hamburg;

use std::fmt;
use std::path::{Path, PathBuf};

use nalgebra::{Point2, Vector2};

use crate::algo::refine::{refine_global, RefineOptions};
use crate::algo::transform::{shift_vertices_where, transform_with};
use crate::algo::Progress;
use crate::error::Result;
use crate::generate::{
    cheese, extrude_triangulation, hyper_cube_with_cylindrical_hole, merge_triangulations,
    subdivided_hyper_rectangle, ExtrudeOptions, MergeOptions,
};
use crate::io::vtk;
use crate::mesh::{MeshInfo, Triangulation2, Triangulation3};

const INNER_RADIUS: f64 = 0.25;
const OUTER_RADIUS: f64 = 1.0;

const RECT_REPETITIONS: [usize; 2] = [3, 2];
const RECT_CORNERS: ([f64; 2], [f64; 2]) = ([1.0, -1.0], [4.0, 1.0]);

const CHEESE_HOLES: [usize; 2] = [3, 2];

const SHIFT_LINE_Y: f64 = 1.0;
const SHIFT_TOLERANCE: f64 = 1e-5;
const SHIFT_OFFSET: f64 = 0.5;

/// One of the hard-coded mesh recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Builder {
    /// Square with a cylindrical hole
    CubeHole,
    /// Subdivided rectangle graded in y
    SubdividedRect,
    /// Square with a hole merged with the rectangle
    MergeCubeRect,
    /// Square with a hole and a shifted top edge
    ShiftCube,
    /// Plate with a pattern of square holes
    Cheese,
    /// Hard-coded coarse grid of Hamburg
    #[default]
    Hamburg,
}

/// Fixed parameters of a builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recipe {
    /// Stem of the output file names.
    pub output_name: &'static str,
    /// Number of hexahedral layers in the extruded mesh.
    pub n_layers: usize,
    /// Extrusion height.
    pub height: f64,
    /// Number of global refinement levels for both meshes.
    pub refinements: usize,
}

/// Runtime options for building meshes.
#[derive(Debug)]
pub struct BuildOptions {
    /// Compute refined vertices in parallel.
    pub parallel: bool,
    /// Progress reporter, one step per build stage.
    pub progress: Progress,
}

impl BuildOptions {
    /// Parallel refinement, no progress output.
    pub fn new() -> Self {
        Self {
            parallel: true,
            progress: Progress::none(),
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Report progress to `progress`.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The two meshes a builder produces.
#[derive(Debug, Clone)]
pub struct MeshPair {
    /// The refined 2D mesh.
    pub surface: Triangulation2,
    /// The refined, extruded 3D mesh.
    pub volume: Triangulation3,
}

/// A written mesh file.
#[derive(Debug, Clone)]
pub struct MeshReport {
    /// Summary of the mesh.
    pub info: MeshInfo,
    /// Where it was written.
    pub path: PathBuf,
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.info)?;
        write!(f, " written to {}", self.path.display())
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Builder {
    /// All builders, in their conventional order.
    pub const ALL: [Builder; 6] = [
        Builder::CubeHole,
        Builder::SubdividedRect,
        Builder::MergeCubeRect,
        Builder::ShiftCube,
        Builder::Cheese,
        Builder::Hamburg,
    ];

    /// Command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Builder::CubeHole => "cube_hole",
            Builder::SubdividedRect => "subdivided_rect",
            Builder::MergeCubeRect => "merge_cube_rect",
            Builder::ShiftCube => "shift_cube",
            Builder::Cheese => "cheese",
            Builder::Hamburg => "hamburg",
        }
    }

    /// The builder's fixed parameters.
    pub fn recipe(self) -> Recipe {
        let standard = |output_name, refinements| Recipe {
            output_name,
            n_layers: 3,
            height: 2.0,
            refinements,
        };
        match self {
            Builder::CubeHole => standard("cube_hole", 4),
            Builder::SubdividedRect => standard("subdivided_rect", 4),
            Builder::MergeCubeRect => standard("merge_cube_rect", 4),
            Builder::ShiftCube => standard("shift_cube", 2),
            Builder::Cheese => standard("cheese", 4),
            Builder::Hamburg => Recipe {
                output_name: "Hamburg",
                n_layers: 3,
                height: 1500.0,
                refinements: 0,
            },
        }
    }

    /// File names of the 2D and 3D outputs.
    pub fn file_names(self) -> (String, String) {
        let name = self.recipe().output_name;
        (format!("{}_2D.vtk", name), format!("{}_3D.vtk", name))
    }

    /// The coarse 2D mesh that gets extruded.
    pub fn coarse_surface(self) -> Result<Triangulation2> {
        match self {
            Builder::CubeHole => hyper_cube_with_cylindrical_hole(INNER_RADIUS, OUTER_RADIUS),
            Builder::SubdividedRect => rectangle(),
            Builder::MergeCubeRect => {
                let hole = hyper_cube_with_cylindrical_hole(INNER_RADIUS, OUTER_RADIUS)?;
                merge_triangulations(&hole, &rectangle()?, &MergeOptions::default())
            }
            Builder::ShiftCube => {
                let mut tria = hyper_cube_with_cylindrical_hole(INNER_RADIUS, OUTER_RADIUS)?;
                let moved = shift_vertices_where(
                    &mut tria,
                    |p| (p.y - SHIFT_LINE_Y).abs() < SHIFT_TOLERANCE,
                    Vector2::new(0.0, SHIFT_OFFSET),
                );
                log::debug!("shift_cube: moved {} vertices", moved);
                Ok(tria)
            }
            Builder::Cheese => cheese(CHEESE_HOLES),
            Builder::Hamburg => hamburg::coarse_grid(),
        }
    }

    /// Build and refine both meshes.
    pub fn build(self, options: &BuildOptions) -> Result<MeshPair> {
        let recipe = self.recipe();
        let progress = &options.progress;
        let stage = |step: usize, what: &str| {
            progress.report(step, 4, &format!("{}: {}", self.name(), what));
        };

        log::info!("building {}", self.name());

        stage(0, "constructing");
        let mut surface = self.coarse_surface()?;

        stage(1, "extruding");
        let mut volume = extrude_triangulation(
            &surface,
            recipe.n_layers,
            recipe.height,
            &ExtrudeOptions::default(),
        )?;

        if self == Builder::SubdividedRect {
            // graded after extrusion, so the 3D mesh stays uniform
            transform_with(
                &mut surface,
                |p| Point2::new(p.x, grade(p.y)),
                options.parallel,
            );
        }

        let refine = RefineOptions::new(recipe.refinements).with_parallel(options.parallel);
        stage(2, "refining 2D");
        refine_global(&mut surface, &refine);
        stage(3, "refining 3D");
        refine_global(&mut volume, &refine);
        progress.finish(4, &format!("{}: done", self.name()));

        Ok(MeshPair { surface, volume })
    }

    /// Build both meshes and write them to `output_dir`.
    ///
    /// An empty `output_dir` writes to the current directory with bare file
    /// names. Returns one report per written file, 2D first.
    pub fn run<P: AsRef<Path>>(self, output_dir: P, options: &BuildOptions) -> Result<Vec<MeshReport>> {
        let output_dir = output_dir.as_ref();
        if !output_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(output_dir)?;
        }

        let pair = self.build(options)?;
        let (name_2d, name_3d) = self.file_names();

        let path_2d = output_dir.join(name_2d);
        vtk::save(&pair.surface, &path_2d)?;
        let path_3d = output_dir.join(name_3d);
        vtk::save(&pair.volume, &path_3d)?;

        Ok(vec![
            MeshReport {
                info: pair.surface.info(),
                path: path_2d,
            },
            MeshReport {
                info: pair.volume.info(),
                path: path_3d,
            },
        ])
    }
}

fn rectangle() -> Result<Triangulation2> {
    let (p1, p2) = RECT_CORNERS;
    subdivided_hyper_rectangle(
        RECT_REPETITIONS,
        Point2::from(p1),
        Point2::from(p2),
        false,
    )
}

/// Grading of the rectangle's y coordinate, fixing `y = -1, 0, 1`.
fn grade(y: f64) -> f64 {
    (2.0 * y).tanh() / 2f64.tanh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sequential() -> BuildOptions {
        BuildOptions::new().with_parallel(false)
    }

    #[test]
    fn test_names() {
        assert_eq!(Builder::default(), Builder::Hamburg);
        assert_eq!(Builder::MergeCubeRect.to_string(), "merge_cube_rect");
        assert_eq!(
            Builder::Hamburg.file_names(),
            ("Hamburg_2D.vtk".to_string(), "Hamburg_3D.vtk".to_string())
        );
        let value = <Builder as clap::ValueEnum>::from_str("shift_cube", false).unwrap();
        assert_eq!(value, Builder::ShiftCube);
    }

    #[test]
    fn test_coarse_counts() {
        let counts: Vec<(usize, usize)> = Builder::ALL
            .iter()
            .map(|b| {
                let t = b.coarse_surface().unwrap();
                (t.n_vertices(), t.n_active_cells())
            })
            .collect();
        assert_eq!(
            counts,
            vec![(16, 8), (12, 6), (25, 14), (16, 8), (48, 29), (292, 244)]
        );
    }

    #[test]
    fn test_shift_cube_moves_top_edge() {
        let tria = Builder::ShiftCube.coarse_surface().unwrap();
        let top: Vec<_> = tria.vertices().iter().filter(|p| p.y > 1.0).collect();
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|p| p.y == 1.5));
        assert!(tria.is_valid());
    }

    #[test]
    fn test_grade_fixes_ends() {
        assert_relative_eq!(grade(-1.0), -1.0);
        assert_relative_eq!(grade(0.0), 0.0);
        assert_relative_eq!(grade(1.0), 1.0);
        assert!(grade(0.5) > 0.5);
    }

    #[test]
    fn test_shift_cube_build() {
        let pair = Builder::ShiftCube.build(&sequential()).unwrap();
        assert_eq!(pair.surface.n_active_cells(), 8 * 16);
        assert_eq!(pair.volume.n_active_cells(), 3 * 8 * 64);
        assert!(pair.volume.is_valid());
    }

    #[test]
    fn test_subdivided_rect_build() {
        let pair = Builder::SubdividedRect.build(&sequential()).unwrap();
        assert_eq!(pair.surface.n_active_cells(), 6 * 256);
        assert_eq!(pair.volume.n_active_cells(), 18 * 4096);
        // the grading fixes y = -1, 0, 1, so the coarse lattice keeps its area
        assert_relative_eq!(pair.surface.total_measure(), 6.0, epsilon = 1e-9);
        assert_eq!(pair.surface.vertices()[..12], rectangle().unwrap().vertices()[..]);
    }

    #[test]
    fn test_hamburg_build() {
        let pair = Builder::Hamburg.build(&sequential()).unwrap();
        assert_eq!(pair.surface.n_active_cells(), 244);
        assert_eq!(pair.volume.n_active_cells(), 3 * 244);
        let (min, max) = pair.volume.bounding_box().unwrap();
        assert_eq!(min.z, 0.0);
        assert_eq!(max.z, 1500.0);
    }

    #[test]
    fn test_report_display() {
        let report = MeshReport {
            info: Builder::Cheese.coarse_surface().unwrap().info(),
            path: PathBuf::from("cheese_2D.vtk"),
        };
        assert_eq!(
            report.to_string(),
            "Mesh info:\n dimension: 2\n no. of cells: 29\n written to cheese_2D.vtk"
        );
    }

    #[test]
    fn test_progress_stages() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = sequential().with_progress(Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        }));
        Builder::Hamburg.build(&options).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(0, 4), (1, 4), (2, 4), (3, 4), (4, 4)]);
    }
}
