use rlkit_core::{Point, Range};

fn sign(n: i32) -> i32 {
    if n > 0 {
        1
    } else if n < 0 {
        -1
    } else {
        0
    }
}

/// Field of vision computation with reusable buffers.
pub struct Fov {
    /// The rectangular range of valid positions.
    range: Range,
    /// Visibility bitmap for the last computation.
    seen: Vec<bool>,
    /// Cached list of visible points from the last `compute` call.
    visibles: Vec<Point>,
    /// Tiles buffer for the row scan.
    tiles_buf: Vec<Point>,
    /// Capacity (for lazy allocation).
    capacity: usize,
}

impl Fov {
    /// Create a new `Fov` for the given range.
    pub fn new(range: Range) -> Self {
        let cap = range.len();
        Self {
            range,
            seen: Vec::new(),
            visibles: Vec::new(),
            tiles_buf: Vec::new(),
            capacity: cap,
        }
    }

    /// Change the range and reset internal buffers if needed.
    pub fn set_range(&mut self, range: Range) {
        let cap = range.len();
        self.range = range;
        if cap > self.capacity {
            self.capacity = cap;
            self.seen = Vec::new();
        }
    }

    /// Return the current range.
    pub fn range(&self) -> Range {
        self.range
    }

    fn idx(&self, p: Point) -> usize {
        let q = p - self.range.min;
        let w = self.range.width();
        (q.y * w + q.x) as usize
    }

    fn ensure_seen(&mut self) {
        if self.seen.len() < self.capacity {
            self.seen.resize(self.capacity, false);
        }
    }

    /// Compute field of vision from `src` out to `max_depth` (Chebyshev).
    ///
    /// `passable` returns `true` if the given point does not block vision.
    /// Returns the cached slice of visible points; individual positions can
    /// also be queried with [`visible`](Self::visible).
    pub fn compute(
        &mut self,
        src: Point,
        max_depth: i32,
        passable: impl Fn(Point) -> bool,
    ) -> &[Point] {
        if !src.in_range(&self.range) {
            self.visibles.clear();
            return &self.visibles;
        }
        self.ensure_seen();
        for v in &mut self.seen {
            *v = false;
        }
        self.visibles.clear();

        let idx = self.idx(src);
        self.seen[idx] = true;
        self.visibles.push(src);
        for dir in 0..4 {
            self.scan_quadrant(src, max_depth, QuadDir(dir), &passable);
        }
        &self.visibles
    }

    /// Compute field of vision clipped to a Euclidean circle of `radius`.
    ///
    /// Equivalent to [`compute`](Self::compute) followed by
    /// [`retain_circular`](Self::retain_circular).
    pub fn compute_circular(
        &mut self,
        src: Point,
        radius: i32,
        passable: impl Fn(Point) -> bool,
    ) -> &[Point] {
        self.compute(src, radius, passable);
        self.retain_circular(src, radius);
        &self.visibles
    }

    /// Post-filter the current visibility results to a Euclidean circle
    /// centered on `center` with the given `radius`.
    pub fn retain_circular(&mut self, center: Point, radius: i32) {
        let r_sq = (radius as i64) * (radius as i64);
        self.visibles.retain(|&p| {
            let dx = (p.x - center.x) as i64;
            let dy = (p.y - center.y) as i64;
            dx * dx + dy * dy <= r_sq
        });
        // Re-mark the bitmap to match the retained set.
        if !self.seen.is_empty() {
            for v in &mut self.seen {
                *v = false;
            }
            for &p in &self.visibles {
                if p.in_range(&self.range) {
                    let idx = self.idx(p);
                    self.seen[idx] = true;
                }
            }
        }
    }

    fn reveal(&mut self, qt: Quadrant, tile: Point) {
        let p = qt.transform(tile);
        let idx = self.idx(p);
        if !self.seen[idx] {
            self.seen[idx] = true;
            self.visibles.push(p);
        }
    }

    fn scan_quadrant(
        &mut self,
        src: Point,
        max_depth: i32,
        dir: QuadDir,
        passable: &impl Fn(Point) -> bool,
    ) {
        let qt = Quadrant { dir, p: src };
        let (colmin, colmax) = qt.max_cols(self.range);
        let mut dmax = qt.max_depth(self.range);
        if dmax > max_depth {
            dmax = max_depth;
        }
        if dmax == 0 {
            return;
        }

        let unreachable = max_depth + 1;
        let mut rows: Vec<ScanRow> = vec![ScanRow {
            depth: 1,
            slope_start: Point::new(-1, 1),
            slope_end: Point::new(1, 1),
        }];

        while let Some(mut r) = rows.pop() {
            let mut ptile = Point::new(unreachable, 0);
            self.tiles_buf.clear();
            r.tiles(&mut self.tiles_buf, colmin, colmax);
            let tiles_len = self.tiles_buf.len();
            for ti in 0..tiles_len {
                let tile = self.tiles_buf[ti];
                let wall = !passable(qt.transform(tile));
                // Cardinal adjacency only: a boundary cell is revealed
                // when it touches the lit area non-diagonally.
                if (wall || r.is_symmetric(tile))
                    && ((tile.x <= 1 && tile.y == 0)
                        || (tile.x > 1 && passable(qt.transform(tile.shift(-1, 0))))
                        || (tile.y >= 0 && passable(qt.transform(tile.shift(0, -1))))
                        || (tile.y <= 0 && passable(qt.transform(tile.shift(0, 1)))))
                {
                    self.reveal(qt, tile);
                }
                if ptile.x == unreachable {
                    ptile = tile;
                    continue;
                }
                let pwall = !passable(qt.transform(ptile));
                if pwall && !wall {
                    // Transition wall -> floor: update running start slope.
                    if tile.x < dmax && !passable(qt.transform(tile.shift(1, 0))) {
                        r.slope_start = slope_square(tile.shift(1, 0));
                    } else if tile.x > 1 && !passable(qt.transform(tile.shift(-1, 0))) {
                        r.slope_start = slope_diamond(tile.shift(-1, 1));
                    } else {
                        r.slope_start = slope_diamond(tile);
                    }
                }
                if !pwall && wall {
                    // Transition floor -> wall: push child row for the
                    // floor segment we just passed.
                    let mut nr = r.next();
                    if tile.x < dmax && !passable(qt.transform(ptile.shift(1, 0))) {
                        nr.slope_end = slope_square(tile.shift(1, 0));
                    } else if ptile.x > 1 && !passable(qt.transform(ptile.shift(-1, 0))) {
                        nr.slope_end = slope_diamond(ptile.shift(-1, 0));
                    } else {
                        nr.slope_end = slope_diamond(tile);
                    }
                    if nr.depth <= dmax {
                        rows.push(nr);
                    }
                }
                ptile = tile;
            }
            if ptile.x == unreachable {
                continue;
            }
            if passable(qt.transform(ptile)) && r.depth < dmax {
                rows.push(r.next());
            }
        }
    }

    /// Query whether `p` is visible from the last `compute` call.
    pub fn visible(&self, p: Point) -> bool {
        if !p.in_range(&self.range) || self.seen.is_empty() {
            return false;
        }
        self.seen[self.idx(p)]
    }

    /// Iterate over all visible points from the last `compute` call.
    pub fn iter_visible(&self) -> impl Iterator<Item = Point> + '_ {
        self.visibles.iter().copied()
    }
}

// ── SSC helper types ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct QuadDir(i32);

#[derive(Debug, Clone, Copy)]
struct Quadrant {
    dir: QuadDir,
    p: Point,
}

impl Quadrant {
    fn transform(&self, tile: Point) -> Point {
        match self.dir.0 {
            0 => Point::new(self.p.x + tile.y, self.p.y - tile.x), // north
            1 => Point::new(self.p.x + tile.x, self.p.y + tile.y), // east
            2 => Point::new(self.p.x + tile.y, self.p.y + tile.x), // south
            _ => Point::new(self.p.x - tile.x, self.p.y + tile.y), // west
        }
    }

    fn max_cols(&self, rg: Range) -> (i32, i32) {
        match self.dir.0 {
            0 | 2 => {
                let dx = self.p.x - rg.min.x;
                let dy = rg.max.x - self.p.x - 1;
                (-dx, dy)
            }
            _ => {
                let dx = self.p.y - rg.min.y;
                let dy = rg.max.y - self.p.y - 1;
                (-dx, dy)
            }
        }
    }

    fn max_depth(&self, rg: Range) -> i32 {
        match self.dir.0 {
            0 => self.p.y - rg.min.y,
            1 => rg.max.x - self.p.x - 1,
            2 => rg.max.y - self.p.y - 1,
            _ => self.p.x - rg.min.x,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScanRow {
    depth: i32,
    slope_start: Point, // fractional as (num, den)
    slope_end: Point,
}

impl ScanRow {
    fn tiles(&self, ts: &mut Vec<Point>, colmin: i32, colmax: i32) {
        let depth = self.depth;
        let mut min = {
            let n = depth * self.slope_start.x;
            let div = n / self.slope_start.y;
            let rem = n % self.slope_start.y;
            match sign(rem) {
                1 => {
                    if 2 * rem >= self.slope_start.y {
                        div + 1
                    } else {
                        div
                    }
                }
                -1 => {
                    if -2 * rem > self.slope_start.y {
                        div - 1
                    } else {
                        div
                    }
                }
                _ => div,
            }
        };
        let mut max = {
            let n = depth * self.slope_end.x;
            let div = n / self.slope_end.y;
            let rem = n % self.slope_end.y;
            match sign(rem) {
                1 => {
                    if 2 * rem > self.slope_end.y {
                        div + 1
                    } else {
                        div
                    }
                }
                -1 => {
                    if -2 * rem >= self.slope_end.y {
                        div - 1
                    } else {
                        div
                    }
                }
                _ => div,
            }
        };
        if min < colmin {
            min = colmin;
        }
        if max > colmax {
            max = colmax;
        }
        for col in min..=max {
            ts.push(Point::new(depth, col));
        }
    }

    fn next(self) -> ScanRow {
        ScanRow {
            depth: self.depth + 1,
            slope_start: self.slope_start,
            slope_end: self.slope_end,
        }
    }

    fn is_symmetric(&self, tile: Point) -> bool {
        let col = tile.y;
        col * self.slope_start.y >= self.depth * self.slope_start.x
            && col * self.slope_end.y <= self.depth * self.slope_end.x
    }
}

fn slope_diamond(tile: Point) -> Point {
    Point::new(2 * tile.y - 1, 2 * tile.x)
}

fn slope_square(tile: Point) -> Point {
    Point::new(2 * tile.y - 1, 2 * tile.x + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_field() {
        let range = Range::new(0, 0, 11, 11);
        let mut fov = Fov::new(range);
        let source = Point::new(5, 5);
        fov.compute(source, 3, |_| true);

        assert!(fov.visible(source));
        assert!(fov.visible(Point::new(6, 5)));
        assert!(fov.visible(Point::new(5, 6)));
        // Beyond range.
        assert!(!fov.visible(Point::new(0, 0)));
    }

    #[test]
    fn wall_blocks() {
        let range = Range::new(0, 0, 11, 11);
        let mut fov = Fov::new(range);
        let source = Point::new(5, 5);
        let wall = Point::new(6, 5);
        fov.compute(source, 5, |p| p != wall);

        assert!(fov.visible(source));
        assert!(fov.visible(wall));
        assert!(!fov.visible(Point::new(7, 5)));
        assert!(!fov.visible(Point::new(8, 5)));
    }

    #[test]
    fn symmetry_between_floor_tiles() {
        let range = Range::new(0, 0, 20, 20);
        let wall = Point::new(8, 10);
        let passable = |p: Point| p != wall;

        let a = Point::new(10, 10);
        let b = Point::new(6, 10);

        let mut fov = Fov::new(range);
        fov.compute(a, 10, passable);
        let a_sees_b = fov.visible(b);

        fov.compute(b, 10, passable);
        let b_sees_a = fov.visible(a);

        assert_eq!(a_sees_b, b_sees_a);
    }

    #[test]
    fn source_always_visible() {
        let range = Range::new(0, 0, 9, 9);
        let mut fov = Fov::new(range);
        let src = Point::new(4, 4);
        // Even surrounded by walls, the origin itself is visible.
        fov.compute(src, 8, |p| p == src);
        assert!(fov.visible(src));
    }

    #[test]
    fn circular_clip() {
        let range = Range::new(0, 0, 20, 20);
        let mut fov = Fov::new(range);
        let src = Point::new(10, 10);

        fov.compute(src, 5, |_| true);
        let square_count = fov.iter_visible().count();
        assert!(fov.visible(Point::new(15, 15)));

        fov.compute_circular(src, 5, |_| true);
        let circle_count = fov.iter_visible().count();

        assert!(circle_count < square_count);
        // Corner at Euclidean distance ~7.07 is clipped.
        assert!(!fov.visible(Point::new(15, 15)));
        // Axis point at distance 5 remains.
        assert!(fov.visible(Point::new(15, 10)));
        // (3,4) offset has distance exactly 5.
        assert!(fov.visible(Point::new(13, 14)));
        assert!(fov.visible(src));
    }

    #[test]
    fn out_of_range_source_sees_nothing() {
        let range = Range::new(0, 0, 5, 5);
        let mut fov = Fov::new(range);
        let visibles = fov.compute(Point::new(10, 10), 8, |_| true);
        assert!(visibles.is_empty());
    }
}
