use std::io::{self, Write};

use crate::game::GameState;

/// Sink for board snapshots replayed during training. Purely cosmetic.
pub trait Renderer {
    fn render(&mut self, state: &GameState);
}

/// Writes each snapshot as text, separated by a blank line.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl TextRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        TextRenderer { out: io::stdout() }
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        TextRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, state: &GameState) {
        // Rendering failures never interrupt training
        let _ = writeln!(self.out, "{state}\n");
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    #[test]
    fn test_text_renderer_writes_board() {
        let mut board = Board::new();
        board.make_move(6);

        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render(&board.get_state());
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.contains(". . . . . . X"));
        assert!(text.contains("Current player: Player 2"));
    }
}
