//! The rules a move goes through
//!
//! Every move runs the same five phases, and within each phase every rule in the board's list, in
//! order:
//!  1. [`RuleHooks::validate`]: any rule may reject the move. Nothing has changed yet, so the first
//!     rejection simply aborts.
//!  2. [`RuleHooks::before_move`]: work that has to happen before the piece moves. Anything that can
//!     fail is checked here before the board is touched.
//!  3. The moving piece is put on its destination. No rule is involved.
//!  4. [`RuleHooks::after_move`]: captures, the rook of a castle, en passant and castling rights.
//!  5. [`RuleHooks::after_turn`]: clocks, whose turn it is, and whether the game is over.
//!
//! After the piece has moved, a rule can only raise a terminal signal and never undo the move.

use board::GameConfig;

use crate::{Board, MoveContext, Result};

mod bureaucrat;
mod end_condition;
mod legality;
mod movement;
mod turn;

pub use bureaucrat::BureaucratCapture;
pub use end_condition::EndCondition;
pub use legality::Legality;
pub use movement::Movement;
pub use turn::{MultipleMoveTurn, StandardTurn};

/// The phases a rule can take part in
///
/// A rule only implements the phases it cares about; the rest do nothing.
pub trait RuleHooks {
    /// Called once when the rule is installed on a board
    fn on_game_start(&mut self, _board: &Board) {}

    fn validate(&self, _board: &mut Board, _ctx: &MoveContext) -> Result<()> {
        Ok(())
    }

    fn before_move(&mut self, _board: &mut Board, _ctx: &mut MoveContext) -> Result<()> {
        Ok(())
    }

    fn after_move(&mut self, _board: &mut Board, _ctx: &mut MoveContext) -> Result<()> {
        Ok(())
    }

    fn after_turn(&mut self, _board: &mut Board, _ctx: &mut MoveContext) -> Result<()> {
        Ok(())
    }
}

/// Every rule there is
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Legality(Legality),
    BureaucratCapture(BureaucratCapture),
    Movement(Movement),
    EndCondition(EndCondition),
    StandardTurn(StandardTurn),
    MultipleMoveTurn(MultipleMoveTurn),
}
impl Rule {
    pub fn hooks(&self) -> &dyn RuleHooks {
        match self {
            Self::Legality(rule) => rule,
            Self::BureaucratCapture(rule) => rule,
            Self::Movement(rule) => rule,
            Self::EndCondition(rule) => rule,
            Self::StandardTurn(rule) => rule,
            Self::MultipleMoveTurn(rule) => rule,
        }
    }

    pub fn hooks_mut(&mut self) -> &mut dyn RuleHooks {
        match self {
            Self::Legality(rule) => rule,
            Self::BureaucratCapture(rule) => rule,
            Self::Movement(rule) => rule,
            Self::EndCondition(rule) => rule,
            Self::StandardTurn(rule) => rule,
            Self::MultipleMoveTurn(rule) => rule,
        }
    }
}

/// Build the list of rules a game with the given config is played by
///
/// Legality comes first, then the bureaucrat's capture so it sees the capture before the standard
/// removal does, then the standard movement, end conditions, and finally the turn rule.
pub fn build_rules(config: &GameConfig) -> Vec<Rule> {
    let mut rules = vec![Rule::Legality(Legality)];
    if config.bureaucrat {
        rules.push(Rule::BureaucratCapture(BureaucratCapture));
    }
    rules.push(Rule::Movement(Movement));
    rules.push(Rule::EndCondition(EndCondition));
    if config.is_multi_move() {
        rules.push(Rule::MultipleMoveTurn(MultipleMoveTurn::new(
            config.white_moves_per_turn,
            config.black_moves_per_turn,
        )));
    } else {
        rules.push(Rule::StandardTurn(StandardTurn));
    }
    rules
}
