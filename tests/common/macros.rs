/// Asserts that a cell with the given id is present and alive.
#[macro_export]
macro_rules! assert_cell_alive {
    ($sim:expr, $id:expr) => {
        let cell = $sim
            .cells
            .iter()
            .find(|c| c.id == $id)
            .expect("Cell not found in world");
        assert!(cell.health > 0.0, "Cell {} has no health left", $id);
    };
}

/// Asserts that no cell with the given id remains in the world.
#[macro_export]
macro_rules! assert_cell_gone {
    ($sim:expr, $id:expr) => {
        let exists = $sim.cells.iter().any(|c| c.id == $id);
        assert!(!exists, "Cell {} should have been cleared", $id);
    };
}

/// Asserts that two floats agree within a tolerance.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $tolerance:expr) => {
        let (left, right) = ($left as f32, $right as f32);
        assert!(
            (left - right).abs() <= $tolerance,
            "{} and {} differ by more than {}",
            left,
            right,
            $tolerance
        );
    };
}
