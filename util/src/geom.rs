use glam::IVec2;

/// 4 directions, clock face order.
pub const DIR_4: [IVec2; 4] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 0]),
];

/// Iterate the four orthogonal neighbors of a grid cell in clock face order.
pub fn neighbors_4(p: IVec2) -> impl Iterator<Item = IVec2> + Clone {
    DIR_4.into_iter().map(move |d| p + d)
}

pub trait VecExt: Sized + Default {
    /// Absolute size of vector in taxicab metric.
    fn taxi_len(&self) -> i32;

    /// Vec points to an adjacent cell, left, right, up or down.
    fn is_adjacent(&self) -> bool {
        self.taxi_len() == 1
    }

    /// Taxicab distance between two points.
    fn taxi_dist(&self, other: &Self) -> i32;
}

impl VecExt for IVec2 {
    fn taxi_len(&self) -> i32 {
        self[0].abs() + self[1].abs()
    }

    fn taxi_dist(&self, other: &Self) -> i32 {
        (*other - *self).taxi_len()
    }
}
