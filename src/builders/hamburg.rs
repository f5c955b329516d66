//! The "Hamburg" coarse grid.
//!
//! A hand-made quadrilateral mesh on a 2 km lattice. Coordinates are stored
//! in kilometres and scaled to metres when the triangulation is built.

use nalgebra::Point2;

use crate::error::Result;
use crate::mesh::{build_from_quads, Triangulation2};

/// Number of vertices in the table.
pub const N_VERTICES: usize = 292;

/// Number of cells in the table.
pub const N_CELLS: usize = 244;

/// Metres per table unit.
pub const SCALE: f64 = 1000.0;

#[rustfmt::skip]
static VERTICES: [[f64; 2]; N_VERTICES] = [
    [548.0, 5934.0], [548.0, 5936.0], [548.0, 5938.0], [548.0, 5940.0],
    [548.0, 5942.0], [550.0, 5926.0], [550.0, 5928.0], [550.0, 5930.0],
    [550.0, 5932.0], [550.0, 5934.0], [550.0, 5936.0], [550.0, 5938.0],
    [550.0, 5940.0], [550.0, 5942.0], [550.0, 5944.0], [552.0, 5922.0],
    [552.0, 5924.0], [552.0, 5926.0], [552.0, 5928.0], [552.0, 5930.0],
    [552.0, 5932.0], [552.0, 5934.0], [552.0, 5936.0], [552.0, 5938.0],
    [552.0, 5940.0], [552.0, 5942.0], [552.0, 5944.0], [554.0, 5922.0],
    [554.0, 5924.0], [554.0, 5926.0], [554.0, 5928.0], [554.0, 5930.0],
    [554.0, 5932.0], [554.0, 5934.0], [554.0, 5936.0], [554.0, 5938.0],
    [554.0, 5940.0], [554.0, 5942.0], [556.0, 5920.0], [556.0, 5922.0],
    [556.0, 5924.0], [556.0, 5926.0], [556.0, 5928.0], [556.0, 5930.0],
    [556.0, 5932.0], [556.0, 5934.0], [556.0, 5936.0], [556.0, 5938.0],
    [556.0, 5940.0], [556.0, 5942.0], [558.0, 5920.0], [558.0, 5922.0],
    [558.0, 5924.0], [558.0, 5926.0], [558.0, 5928.0], [558.0, 5930.0],
    [558.0, 5932.0], [558.0, 5934.0], [558.0, 5936.0], [558.0, 5938.0],
    [558.0, 5940.0], [558.0, 5942.0], [558.0, 5944.0], [558.0, 5946.0],
    [560.0, 5918.0], [560.0, 5920.0], [560.0, 5922.0], [560.0, 5924.0],
    [560.0, 5926.0], [560.0, 5928.0], [560.0, 5930.0], [560.0, 5932.0],
    [560.0, 5934.0], [560.0, 5936.0], [560.0, 5938.0], [560.0, 5940.0],
    [560.0, 5942.0], [560.0, 5944.0], [560.0, 5946.0], [562.0, 5918.0],
    [562.0, 5920.0], [562.0, 5922.0], [562.0, 5924.0], [562.0, 5926.0],
    [562.0, 5928.0], [562.0, 5930.0], [562.0, 5932.0], [562.0, 5934.0],
    [562.0, 5936.0], [562.0, 5938.0], [562.0, 5940.0], [562.0, 5942.0],
    [562.0, 5944.0], [562.0, 5946.0], [564.0, 5918.0], [564.0, 5920.0],
    [564.0, 5922.0], [564.0, 5924.0], [564.0, 5926.0], [564.0, 5928.0],
    [564.0, 5930.0], [564.0, 5932.0], [564.0, 5934.0], [564.0, 5936.0],
    [564.0, 5938.0], [564.0, 5940.0], [564.0, 5942.0], [564.0, 5944.0],
    [564.0, 5946.0], [564.0, 5948.0], [564.0, 5950.0], [566.0, 5918.0],
    [566.0, 5920.0], [566.0, 5922.0], [566.0, 5924.0], [566.0, 5926.0],
    [566.0, 5928.0], [566.0, 5930.0], [566.0, 5932.0], [566.0, 5934.0],
    [566.0, 5936.0], [566.0, 5938.0], [566.0, 5940.0], [566.0, 5942.0],
    [566.0, 5944.0], [566.0, 5946.0], [566.0, 5948.0], [566.0, 5950.0],
    [568.0, 5918.0], [568.0, 5920.0], [568.0, 5922.0], [568.0, 5924.0],
    [568.0, 5926.0], [568.0, 5928.0], [568.0, 5930.0], [568.0, 5932.0],
    [568.0, 5934.0], [568.0, 5936.0], [568.0, 5938.0], [568.0, 5940.0],
    [568.0, 5942.0], [568.0, 5944.0], [568.0, 5946.0], [568.0, 5948.0],
    [568.0, 5950.0], [570.0, 5920.0], [570.0, 5922.0], [570.0, 5924.0],
    [570.0, 5926.0], [570.0, 5928.0], [570.0, 5930.0], [570.0, 5932.0],
    [570.0, 5934.0], [570.0, 5936.0], [570.0, 5938.0], [570.0, 5940.0],
    [570.0, 5942.0], [570.0, 5944.0], [570.0, 5946.0], [570.0, 5948.0],
    [570.0, 5950.0], [570.0, 5952.0], [570.0, 5954.0], [572.0, 5920.0],
    [572.0, 5922.0], [572.0, 5924.0], [572.0, 5926.0], [572.0, 5928.0],
    [572.0, 5930.0], [572.0, 5932.0], [572.0, 5934.0], [572.0, 5936.0],
    [572.0, 5938.0], [572.0, 5940.0], [572.0, 5942.0], [572.0, 5944.0],
    [572.0, 5946.0], [572.0, 5948.0], [572.0, 5950.0], [572.0, 5952.0],
    [572.0, 5954.0], [574.0, 5918.0], [574.0, 5920.0], [574.0, 5922.0],
    [574.0, 5924.0], [574.0, 5926.0], [574.0, 5928.0], [574.0, 5930.0],
    [574.0, 5932.0], [574.0, 5934.0], [574.0, 5936.0], [574.0, 5938.0],
    [574.0, 5940.0], [574.0, 5942.0], [574.0, 5944.0], [574.0, 5946.0],
    [574.0, 5948.0], [574.0, 5950.0], [574.0, 5952.0], [574.0, 5954.0],
    [574.0, 5956.0], [576.0, 5916.0], [576.0, 5918.0], [576.0, 5920.0],
    [576.0, 5922.0], [576.0, 5924.0], [576.0, 5926.0], [576.0, 5928.0],
    [576.0, 5930.0], [576.0, 5932.0], [576.0, 5934.0], [576.0, 5936.0],
    [576.0, 5938.0], [576.0, 5940.0], [576.0, 5942.0], [576.0, 5944.0],
    [576.0, 5946.0], [576.0, 5948.0], [576.0, 5950.0], [576.0, 5952.0],
    [576.0, 5954.0], [576.0, 5956.0], [578.0, 5916.0], [578.0, 5918.0],
    [578.0, 5920.0], [578.0, 5922.0], [578.0, 5924.0], [578.0, 5926.0],
    [578.0, 5928.0], [578.0, 5930.0], [578.0, 5932.0], [578.0, 5934.0],
    [578.0, 5936.0], [578.0, 5938.0], [578.0, 5940.0], [578.0, 5942.0],
    [578.0, 5944.0], [578.0, 5946.0], [578.0, 5948.0], [578.0, 5950.0],
    [578.0, 5952.0], [578.0, 5954.0], [578.0, 5956.0], [580.0, 5916.0],
    [580.0, 5918.0], [580.0, 5920.0], [580.0, 5922.0], [580.0, 5924.0],
    [580.0, 5926.0], [580.0, 5928.0], [580.0, 5930.0], [580.0, 5932.0],
    [580.0, 5936.0], [580.0, 5938.0], [580.0, 5940.0], [580.0, 5942.0],
    [580.0, 5944.0], [580.0, 5946.0], [580.0, 5948.0], [580.0, 5950.0],
    [580.0, 5952.0], [580.0, 5954.0], [580.0, 5956.0], [582.0, 5916.0],
    [582.0, 5918.0], [582.0, 5920.0], [582.0, 5922.0], [582.0, 5924.0],
    [582.0, 5926.0], [582.0, 5928.0], [582.0, 5930.0], [582.0, 5932.0],
    [582.0, 5942.0], [582.0, 5944.0], [584.0, 5916.0], [584.0, 5918.0],
    [584.0, 5920.0], [584.0, 5922.0], [584.0, 5924.0], [584.0, 5926.0],
    [584.0, 5928.0], [584.0, 5930.0], [586.0, 5918.0], [586.0, 5920.0],
    [586.0, 5922.0], [586.0, 5924.0], [586.0, 5926.0], [588.0, 5920.0],
    [588.0, 5922.0], [588.0, 5924.0], [590.0, 5922.0], [590.0, 5924.0],
];

#[rustfmt::skip]
static CELLS: [[usize; 4]; N_CELLS] = [
    [0, 9, 1, 10], [1, 10, 2, 11], [2, 11, 3, 12], [3, 12, 4, 13],
    [5, 17, 6, 18], [6, 18, 7, 19], [7, 19, 8, 20], [8, 20, 9, 21],
    [9, 21, 10, 22], [10, 22, 11, 23], [11, 23, 12, 24], [12, 24, 13, 25],
    [13, 25, 14, 26], [15, 27, 16, 28], [16, 28, 17, 29], [17, 29, 18, 30],
    [18, 30, 19, 31], [19, 31, 20, 32], [20, 32, 21, 33], [21, 33, 22, 34],
    [22, 34, 23, 35], [23, 35, 24, 36], [24, 36, 25, 37], [27, 39, 28, 40],
    [28, 40, 29, 41], [29, 41, 30, 42], [30, 42, 31, 43], [31, 43, 32, 44],
    [32, 44, 33, 45], [33, 45, 34, 46], [34, 46, 35, 47], [35, 47, 36, 48],
    [38, 50, 39, 51], [39, 51, 40, 52], [40, 52, 41, 53], [41, 53, 42, 54],
    [42, 54, 43, 55], [43, 55, 44, 56], [44, 56, 45, 57], [45, 57, 46, 58],
    [46, 58, 47, 59], [47, 59, 48, 60], [48, 60, 49, 61], [50, 65, 51, 66],
    [51, 66, 52, 67], [52, 67, 53, 68], [53, 68, 54, 69], [54, 69, 55, 70],
    [55, 70, 56, 71], [56, 71, 57, 72], [57, 72, 58, 73], [58, 73, 59, 74],
    [59, 74, 60, 75], [60, 75, 61, 76], [61, 76, 62, 77], [62, 77, 63, 78],
    [64, 79, 65, 80], [65, 80, 66, 81], [66, 81, 67, 82], [67, 82, 68, 83],
    [68, 83, 69, 84], [69, 84, 70, 85], [70, 85, 71, 86], [71, 86, 72, 87],
    [72, 87, 73, 88], [73, 88, 74, 89], [74, 89, 75, 90], [75, 90, 76, 91],
    [76, 91, 77, 92], [77, 92, 78, 93], [79, 94, 80, 95], [80, 95, 81, 96],
    [81, 96, 82, 97], [82, 97, 83, 98], [83, 98, 84, 99], [84, 99, 85, 100],
    [85, 100, 86, 101], [86, 101, 87, 102], [87, 102, 88, 103], [88, 103, 89, 104],
    [89, 104, 90, 105], [90, 105, 91, 106], [91, 106, 92, 107], [92, 107, 93, 108],
    [94, 111, 95, 112], [95, 112, 96, 113], [96, 113, 97, 114], [97, 114, 98, 115],
    [98, 115, 99, 116], [99, 116, 100, 117], [100, 117, 101, 118], [101, 118, 102, 119],
    [102, 119, 103, 120], [103, 120, 104, 121], [104, 121, 105, 122], [105, 122, 106, 123],
    [106, 123, 107, 124], [107, 124, 108, 125], [108, 125, 109, 126], [109, 126, 110, 127],
    [111, 128, 112, 129], [112, 129, 113, 130], [113, 130, 114, 131], [114, 131, 115, 132],
    [115, 132, 116, 133], [116, 133, 117, 134], [117, 134, 118, 135], [118, 135, 119, 136],
    [119, 136, 120, 137], [120, 137, 121, 138], [121, 138, 122, 139], [122, 139, 123, 140],
    [123, 140, 124, 141], [124, 141, 125, 142], [125, 142, 126, 143], [126, 143, 127, 144],
    [129, 145, 130, 146], [130, 146, 131, 147], [131, 147, 132, 148], [132, 148, 133, 149],
    [133, 149, 134, 150], [134, 150, 135, 151], [135, 151, 136, 152], [136, 152, 137, 153],
    [137, 153, 138, 154], [138, 154, 139, 155], [139, 155, 140, 156], [140, 156, 141, 157],
    [141, 157, 142, 158], [142, 158, 143, 159], [143, 159, 144, 160], [145, 163, 146, 164],
    [146, 164, 147, 165], [147, 165, 148, 166], [148, 166, 149, 167], [149, 167, 150, 168],
    [150, 168, 151, 169], [151, 169, 152, 170], [152, 170, 153, 171], [153, 171, 154, 172],
    [154, 172, 155, 173], [155, 173, 156, 174], [156, 174, 157, 175], [157, 175, 158, 176],
    [158, 176, 159, 177], [159, 177, 160, 178], [160, 178, 161, 179], [161, 179, 162, 180],
    [163, 182, 164, 183], [164, 183, 165, 184], [165, 184, 166, 185], [166, 185, 167, 186],
    [167, 186, 168, 187], [168, 187, 169, 188], [169, 188, 170, 189], [170, 189, 171, 190],
    [171, 190, 172, 191], [172, 191, 173, 192], [173, 192, 174, 193], [174, 193, 175, 194],
    [175, 194, 176, 195], [176, 195, 177, 196], [177, 196, 178, 197], [178, 197, 179, 198],
    [179, 198, 180, 199], [181, 202, 182, 203], [182, 203, 183, 204], [183, 204, 184, 205],
    [184, 205, 185, 206], [185, 206, 186, 207], [186, 207, 187, 208], [187, 208, 188, 209],
    [188, 209, 189, 210], [189, 210, 190, 211], [190, 211, 191, 212], [191, 212, 192, 213],
    [192, 213, 193, 214], [193, 214, 194, 215], [194, 215, 195, 216], [195, 216, 196, 217],
    [196, 217, 197, 218], [197, 218, 198, 219], [198, 219, 199, 220], [199, 220, 200, 221],
    [201, 222, 202, 223], [202, 223, 203, 224], [203, 224, 204, 225], [204, 225, 205, 226],
    [205, 226, 206, 227], [206, 227, 207, 228], [207, 228, 208, 229], [208, 229, 209, 230],
    [209, 230, 210, 231], [210, 231, 211, 232], [211, 232, 212, 233], [212, 233, 213, 234],
    [213, 234, 214, 235], [214, 235, 215, 236], [215, 236, 216, 237], [216, 237, 217, 238],
    [217, 238, 218, 239], [218, 239, 219, 240], [219, 240, 220, 241], [220, 241, 221, 242],
    [222, 243, 223, 244], [223, 244, 224, 245], [224, 245, 225, 246], [225, 246, 226, 247],
    [226, 247, 227, 248], [227, 248, 228, 249], [228, 249, 229, 250], [229, 250, 230, 251],
    [232, 252, 233, 253], [233, 253, 234, 254], [234, 254, 235, 255], [235, 255, 236, 256],
    [236, 256, 237, 257], [237, 257, 238, 258], [239, 259, 240, 260], [240, 260, 241, 261],
    [241, 261, 242, 262], [243, 263, 244, 264], [244, 264, 245, 265], [245, 265, 246, 266],
    [246, 266, 247, 267], [247, 267, 248, 268], [248, 268, 249, 269], [249, 269, 250, 270],
    [250, 270, 251, 271], [255, 272, 256, 273], [263, 274, 264, 275], [264, 275, 265, 276],
    [265, 276, 266, 277], [266, 277, 267, 278], [267, 278, 268, 279], [268, 279, 269, 280],
    [269, 280, 270, 281], [275, 282, 276, 283], [276, 283, 277, 284], [277, 284, 278, 285],
    [278, 285, 279, 286], [283, 287, 284, 288], [284, 288, 285, 289], [288, 290, 289, 291],
];

/// Build the coarse 2D grid, in metres.
pub fn coarse_grid() -> Result<Triangulation2> {
    let vertices: Vec<Point2<f64>> = VERTICES
        .iter()
        .map(|&[x, y]| Point2::new(x * SCALE, y * SCALE))
        .collect();
    build_from_quads(&vertices, &CELLS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_sizes() {
        let tria = coarse_grid().unwrap();
        assert_eq!(tria.n_vertices(), N_VERTICES);
        assert_eq!(tria.n_active_cells(), N_CELLS);
        assert!(CELLS.iter().flatten().all(|&v| v < N_VERTICES));
    }

    #[test]
    fn test_every_vertex_used() {
        let used: HashSet<usize> = CELLS.iter().flatten().copied().collect();
        assert_eq!(used.len(), N_VERTICES);
    }

    #[test]
    fn test_cells_on_lattice() {
        let tria = coarse_grid().unwrap();
        assert!(tria.is_valid());
        // every cell is a 2 km square
        for c in tria.active_cell_ids() {
            assert!((tria.cell_measure(c) - 4.0e6).abs() < 1e-3);
        }
        assert!((tria.total_measure() - N_CELLS as f64 * 4.0e6).abs() < 1.0);
    }

    #[test]
    fn test_connected_edges() {
        // 441 interior edges shared by two cells, 94 on the boundary
        let tria = coarse_grid().unwrap();
        assert_eq!(tria.boundary_faces().len(), 94);
    }
}
