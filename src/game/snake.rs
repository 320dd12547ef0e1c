use crate::config::{FRUIT_SCORE, GRID_HEIGHT, GRID_WIDTH, START_BODY_LEN};
use crate::game::types::{Cell, Direction, PlayerId};

#[derive(Clone, Debug)]
pub struct Snake {
    pub id: PlayerId,
    pub direction: Direction,
    change_to: Direction,
    pub score: u32,
    body: Vec<Cell>,
}

impl Snake {
    /// Starting layout: P1 à gauche regardant à droite, P2 à droite
    /// regardant à gauche, quatre segments alignés sur la grille.
    pub fn spawn(id: PlayerId) -> Self {
        let (head, direction) = match id {
            PlayerId::One => (Cell::new(GRID_WIDTH / 4, GRID_HEIGHT / 2), Direction::Right),
            PlayerId::Two => (
                Cell::new(GRID_WIDTH * 3 / 4, GRID_HEIGHT / 2),
                Direction::Left,
            ),
        };

        // Le corps s'étend derrière la tête, à l'opposé du cap.
        let (dx, dy) = direction.opposite().offset();
        let body = (0..START_BODY_LEN as i32)
            .map(|i| Cell::new(head.x + dx * i, head.y + dy * i))
            .collect();

        Self {
            id,
            direction,
            change_to: direction,
            score: 0,
            body,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn segments(&self) -> &[Cell] {
        &self.body
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Buffer a heading change; applied once per tick by `apply_turn`.
    pub fn queue_turn(&mut self, dir: Direction) {
        self.change_to = dir;
    }

    /// Un demi-tour (180°) est ignoré, le cap courant est conservé.
    pub fn apply_turn(&mut self) {
        if self.change_to != self.direction.opposite() {
            self.direction = self.change_to;
        }
    }

    /// Move the head one cell along the heading. Eating the fruit grows the
    /// body by one and scores; otherwise the tail shifts off.
    pub fn advance(&mut self, fruit: Cell) -> bool {
        let (dx, dy) = self.direction.offset();
        let head = self.head();
        self.body.insert(0, Cell::new(head.x + dx, head.y + dy));

        if self.head() == fruit {
            self.score += FRUIT_SCORE;
            true
        } else {
            self.body.pop();
            false
        }
    }

    /// Wholesale replacement from a remote report. Only ever called for the
    /// snake the peer owns.
    pub fn overwrite(&mut self, pos: Cell, body: Vec<Cell>, direction: Direction, score: u32) {
        self.body = if body.is_empty() { vec![pos] } else { body };
        self.direction = direction;
        self.change_to = direction;
        self.score = score;
    }
}
