/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Row-major cell identifier, `row * columns + column`.
pub type CellIndex = u16;

/// Number of neighbor slots every cell carries, one per compass direction.
pub const NEIGHBOR_SLOTS: usize = 8;

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub const fn cell_index(row: Coord, column: Coord, columns: Coord) -> CellIndex {
    row as CellIndex * columns as CellIndex + column as CellIndex
}

/// Splits a row-major index back into `(row, column)`. `columns` must be non-zero.
pub const fn position(index: CellIndex, columns: Coord) -> (Coord, Coord) {
    let columns = columns as CellIndex;
    ((index / columns) as Coord, (index % columns) as Coord)
}

/// `(row delta, column delta)` per slot, row 0 at the top:
/// N, NE, E, SE, S, SW, W, NW.
const COMPASS_DELTAS: [(i8, i8); NEIGHBOR_SLOTS] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Applies `delta` to `position`, returning a value only when it remains in bounds.
fn apply_delta(
    position: (Coord, Coord),
    delta: (i8, i8),
    bounds: (Coord, Coord),
) -> Option<(Coord, Coord)> {
    let (row, column) = position;
    let (d_row, d_column) = delta;
    let (rows, columns) = bounds;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= rows {
        return None;
    }

    let next_column = column.checked_add_signed(d_column)?;
    if next_column >= columns {
        return None;
    }

    Some((next_row, next_column))
}

/// Positional neighbor indices of `index` on a `rows` x `columns` board, in
/// compass order. Out-of-grid directions stay `None`.
pub fn neighbor_matrix(
    index: CellIndex,
    rows: Coord,
    columns: Coord,
) -> [Option<CellIndex>; NEIGHBOR_SLOTS] {
    let center = position(index, columns);
    COMPASS_DELTAS.map(|delta| {
        apply_delta(center, delta, (rows, columns))
            .map(|(row, column)| cell_index(row, column, columns))
    })
}
