use warfront_protocol::{PlayerId, TileRef};

/// Rectangular tile grid, the opaque map collaborator.
///
/// The simulation only needs land/water queries, 4-neighborhood adjacency,
/// Manhattan distance and per-tile ownership; painting geometry and map
/// file loading live elsewhere.
#[derive(Clone, Debug)]
pub struct GameMap {
    width: u32,
    height: u32,
    land: Vec<bool>,
    fallout: Vec<bool>,
    owner: Vec<Option<PlayerId>>,
}

impl GameMap {
    pub fn new(width: u32, height: u32, land: Vec<bool>) -> Self {
        let len = (width as usize) * (height as usize);
        assert_eq!(land.len(), len, "land mask size mismatch");
        Self {
            width,
            height,
            land,
            fallout: vec![false; len],
            owner: vec![None; len],
        }
    }

    /// All-land map, handy for tests and bot-only games.
    pub fn all_land(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self::new(width, height, vec![true; len])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.land.len()
    }

    pub fn is_empty(&self) -> bool {
        self.land.is_empty()
    }

    pub fn tile(&self, x: u32, y: u32) -> TileRef {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn x(&self, tile: TileRef) -> u32 {
        tile % self.width
    }

    pub fn y(&self, tile: TileRef) -> u32 {
        tile / self.width
    }

    pub fn is_land(&self, tile: TileRef) -> bool {
        self.land[tile as usize]
    }

    pub fn is_water(&self, tile: TileRef) -> bool {
        !self.is_land(tile)
    }

    /// Land tile with at least one water neighbor (boats can launch/land here).
    pub fn is_ocean_shore(&self, tile: TileRef) -> bool {
        self.is_land(tile) && self.neighbors(tile).iter().any(|&n| self.is_water(n))
    }

    pub fn has_fallout(&self, tile: TileRef) -> bool {
        self.fallout[tile as usize]
    }

    pub fn set_fallout(&mut self, tile: TileRef) {
        self.fallout[tile as usize] = true;
    }

    pub fn owner(&self, tile: TileRef) -> Option<PlayerId> {
        self.owner[tile as usize]
    }

    pub fn has_owner(&self, tile: TileRef) -> bool {
        self.owner[tile as usize].is_some()
    }

    pub(crate) fn set_owner(&mut self, tile: TileRef, owner: Option<PlayerId>) {
        self.owner[tile as usize] = owner;
    }

    /// 4-neighborhood, in-bounds only, in stable (up, down, left, right) order.
    pub fn neighbors(&self, tile: TileRef) -> Vec<TileRef> {
        let x = self.x(tile);
        let y = self.y(tile);
        let mut out = Vec::with_capacity(4);
        if y > 0 {
            out.push(tile - self.width);
        }
        if y + 1 < self.height {
            out.push(tile + self.width);
        }
        if x > 0 {
            out.push(tile - 1);
        }
        if x + 1 < self.width {
            out.push(tile + 1);
        }
        out
    }

    pub fn manhattan_dist(&self, a: TileRef, b: TileRef) -> u32 {
        let dx = self.x(a).abs_diff(self.x(b));
        let dy = self.y(a).abs_diff(self.y(b));
        dx + dy
    }
}

/// Closest pair between two tile sets by Manhattan distance.
///
/// Strided scan keeps this cheap on large borders; exactness does not
/// matter for boat launch selection, determinism does.
pub fn closest_two_tiles(
    map: &GameMap,
    from: &[TileRef],
    to: &[TileRef],
) -> Option<(TileRef, TileRef)> {
    if from.is_empty() || to.is_empty() {
        return None;
    }
    let stride = |len: usize| (len / 64).max(1);
    let from_stride = stride(from.len());
    let to_stride = stride(to.len());

    let mut best: Option<(TileRef, TileRef, u32)> = None;
    for &a in from.iter().step_by(from_stride) {
        for &b in to.iter().step_by(to_stride) {
            let d = map.manhattan_dist(a, b);
            if best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((a, b, d));
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_coordinates_roundtrip() {
        let map = GameMap::all_land(10, 8);
        let t = map.tile(7, 3);
        assert_eq!(map.x(t), 7);
        assert_eq!(map.y(t), 3);
    }

    #[test]
    fn neighbors_respect_bounds() {
        let map = GameMap::all_land(4, 4);
        let corner = map.tile(0, 0);
        assert_eq!(map.neighbors(corner).len(), 2);
        let center = map.tile(1, 1);
        assert_eq!(map.neighbors(center).len(), 4);
    }

    #[test]
    fn manhattan_distance() {
        let map = GameMap::all_land(10, 10);
        let a = map.tile(1, 1);
        let b = map.tile(4, 6);
        assert_eq!(map.manhattan_dist(a, b), 3 + 5);
    }

    #[test]
    fn ocean_shore_needs_adjacent_water() {
        // Left column water, rest land.
        let width = 5;
        let height = 3;
        let mut land = vec![true; (width * height) as usize];
        for y in 0..height {
            land[(y * width) as usize] = false;
        }
        let map = GameMap::new(width, height, land);

        assert!(map.is_ocean_shore(map.tile(1, 1)));
        assert!(!map.is_ocean_shore(map.tile(3, 1)));
        assert!(!map.is_ocean_shore(map.tile(0, 1))); // water itself
    }

    #[test]
    fn closest_pair_picks_minimum() {
        let map = GameMap::all_land(20, 20);
        let from = vec![map.tile(0, 0), map.tile(5, 5)];
        let to = vec![map.tile(19, 19), map.tile(6, 6)];
        let (a, b) = closest_two_tiles(&map, &from, &to).unwrap();
        assert_eq!(a, map.tile(5, 5));
        assert_eq!(b, map.tile(6, 6));
    }

    #[test]
    fn closest_pair_empty_inputs() {
        let map = GameMap::all_land(4, 4);
        assert!(closest_two_tiles(&map, &[], &[map.tile(0, 0)]).is_none());
    }
}
