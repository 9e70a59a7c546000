use tictactoe::{
    apply_index, coord_to_index, index_to_coord, Board, BoardStyle, Cell, Sign,
};

#[test]
fn index_maps_to_row_major_coordinates() {
    assert_eq!(index_to_coord(1), Some((0, 0)));
    assert_eq!(index_to_coord(3), Some((0, 2)));
    assert_eq!(index_to_coord(5), Some((1, 1)));
    assert_eq!(index_to_coord(7), Some((2, 0)));
    assert_eq!(index_to_coord(9), Some((2, 2)));
    assert_eq!(index_to_coord(0), None);
    assert_eq!(index_to_coord(10), None);
    for index in 1..=9 {
        let (r, c) = index_to_coord(index).unwrap();
        assert_eq!(coord_to_index(r, c), index);
    }
}

#[test]
fn new_board_is_empty() {
    let board = Board::new();
    assert!(board.is_empty());
    assert!(!board.is_full());
    assert_eq!(board.count(Sign::X), 0);
    assert_eq!(board.count(Sign::O), 0);
    assert_eq!(board.cell(5), Some(Cell::Empty));
    assert_eq!(board.get(3, 0), None);
}

#[test]
fn render_blank_and_numbered_rows() {
    let mut board = Board::new();
    assert!(apply_index(&mut board, 1, Sign::X));
    assert!(apply_index(&mut board, 5, Sign::O));

    assert_eq!(board.render_row(0, BoardStyle::Blank), "X |   |  ");
    assert_eq!(board.render_row(1, BoardStyle::Blank), "  | O |  ");
    assert_eq!(board.render_row(0, BoardStyle::Numbered), "X | 2 | 3");
    assert_eq!(board.render_row(1, BoardStyle::Numbered), "4 | O | 6");
    assert_eq!(board.render_row(2, BoardStyle::Numbered), "7 | 8 | 9");
}

#[test]
fn display_joins_rows_with_newlines() {
    let mut board = Board::new();
    assert!(apply_index(&mut board, 9, Sign::O));
    assert_eq!(board.to_string(), "  |   |  \n  |   |  \n  |   | O");
}

#[test]
fn counts_track_marks() {
    let mut board = Board::new();
    for (index, sign) in [(1, Sign::O), (2, Sign::X), (3, Sign::O)] {
        assert!(apply_index(&mut board, index, sign));
    }
    assert_eq!(board.count(Sign::O), 2);
    assert_eq!(board.count(Sign::X), 1);
    assert_eq!(board.cell(2), Some(Cell::X));
    let marked: Vec<u8> = board
        .iter()
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(marked, vec![1, 2, 3]);
}
