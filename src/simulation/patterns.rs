/// Small seed patterns, as `(dx, dy)` offsets from a placement origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Blinker,
    Toad,
    Beacon,
    Glider,
    RPentomino,
}

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Pattern::Blinker,
        Pattern::Toad,
        Pattern::Beacon,
        Pattern::Glider,
        Pattern::RPentomino,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::Blinker => "Blinker",
            Pattern::Toad => "Toad",
            Pattern::Beacon => "Beacon",
            Pattern::Glider => "Glider",
            Pattern::RPentomino => "R-pentomino",
        }
    }

    pub fn cells(self) -> &'static [(i64, i64)] {
        match self {
            Pattern::Blinker => &[(-1, 0), (0, 0), (1, 0)],
            Pattern::Toad => &[(0, 0), (1, 0), (2, 0), (-1, 1), (0, 1), (1, 1)],
            Pattern::Beacon => &[
                (0, 0),
                (1, 0),
                (0, 1),
                (1, 1),
                (2, 2),
                (3, 2),
                (2, 3),
                (3, 3),
            ],
            Pattern::Glider => &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            Pattern::RPentomino => &[(0, 0), (1, 0), (-1, 1), (0, 1), (0, 2)],
        }
    }
}
