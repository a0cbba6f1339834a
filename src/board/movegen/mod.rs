mod kings;
mod knights;
mod pawns;
mod sliders;

use self::sliders::SliderType;
use super::attack_tables::{bishop_attacks, rook_attacks, KNIGHT_ATTACKS, PAWN_ATTACKS};
use super::{Bitboard, Board, Color, Move, MoveList, Piece, Square};

/// Squares strictly between `a` and `b` if they lie on a shared rank, file or
/// diagonal; 0 otherwise. Occupancy-independent: treats `a` and `b` as the
/// only two pieces on the board when tracing the ray.
fn ray_between(a_idx: usize, b_idx: usize) -> u64 {
    let occ = (1u64 << a_idx) | (1u64 << b_idx);
    let from_a = rook_attacks(a_idx, occ) | bishop_attacks(a_idx, occ);
    let from_b = rook_attacks(b_idx, occ) | bishop_attacks(b_idx, occ);
    from_a & from_b
}

impl Board {
    fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let color = if self.white_to_move {
            Color::White
        } else {
            Color::Black
        };
        let c_idx = color.index();

        for from_idx in self.pieces[c_idx][Piece::Pawn.index()].iter() {
            let from = Square::from_index(from_idx);
            for m in &self.generate_pawn_moves(from) {
                moves.push(*m);
            }
        }

        for from_idx in self.pieces[c_idx][Piece::Knight.index()].iter() {
            let from = Square::from_index(from_idx);
            for m in &self.generate_knight_moves(from) {
                moves.push(*m);
            }
        }

        for from_idx in self.pieces[c_idx][Piece::Bishop.index()].iter() {
            let from = Square::from_index(from_idx);
            for m in &self.generate_slider_moves(from, SliderType::Bishop) {
                moves.push(*m);
            }
        }

        for from_idx in self.pieces[c_idx][Piece::Rook.index()].iter() {
            let from = Square::from_index(from_idx);
            for m in &self.generate_slider_moves(from, SliderType::Rook) {
                moves.push(*m);
            }
        }

        for from_idx in self.pieces[c_idx][Piece::Queen.index()].iter() {
            let from = Square::from_index(from_idx);
            for m in &self.generate_slider_moves(from, SliderType::Queen) {
                moves.push(*m);
            }
        }

        for from_idx in self.pieces[c_idx][Piece::King.index()].iter() {
            let from = Square::from_index(from_idx);
            for m in &self.generate_king_moves(from) {
                moves.push(*m);
            }
        }
        moves
    }

    fn generate_piece_moves(&self, from: Square, piece: Piece) -> MoveList {
        match piece {
            Piece::Pawn => self.generate_pawn_moves(from),
            Piece::Knight => self.generate_knight_moves(from),
            Piece::Bishop => self.generate_slider_moves(from, SliderType::Bishop),
            Piece::Rook => self.generate_slider_moves(from, SliderType::Rook),
            Piece::Queen => self.generate_slider_moves(from, SliderType::Queen),
            Piece::King => self.generate_king_moves(from),
        }
    }

    fn create_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
        is_castling: bool,
        is_en_passant: bool,
    ) -> Move {
        if is_castling {
            return if to.file() > from.file() {
                Move::castle_kingside(from, to)
            } else {
                Move::castle_queenside(from, to)
            };
        }
        if is_en_passant {
            return Move::en_passant(from, to);
        }
        let is_capture = self.piece_at(to).is_some();
        if let Some(piece) = promotion {
            return if is_capture {
                Move::new_promotion_capture(from, to, piece)
            } else {
                Move::new_promotion(from, to, piece)
            };
        }
        if is_capture {
            Move::capture(from, to)
        } else {
            Move::quiet(from, to)
        }
    }

    /// Bitboard of enemy pieces currently giving check to `king_sq`.
    fn checkers_of(&self, king_sq: Square, us: Color) -> Bitboard {
        let them = us.opponent();
        let t_idx = them.index();
        let king_idx = king_sq.index();

        let pawn_sources = if them == Color::White {
            PAWN_ATTACKS[Color::Black.index()][king_idx]
        } else {
            PAWN_ATTACKS[Color::White.index()][king_idx]
        };
        let mut checkers = self.pieces[t_idx][Piece::Pawn.index()].0 & pawn_sources;
        checkers |= self.pieces[t_idx][Piece::Knight.index()].0 & KNIGHT_ATTACKS[king_idx];

        let rook_like =
            self.pieces[t_idx][Piece::Rook.index()].0 | self.pieces[t_idx][Piece::Queen.index()].0;
        let bishop_like =
            self.pieces[t_idx][Piece::Bishop.index()].0 | self.pieces[t_idx][Piece::Queen.index()].0;
        checkers |= rook_attacks(king_idx, self.all_occupied.0) & rook_like;
        checkers |= bishop_attacks(king_idx, self.all_occupied.0) & bishop_like;

        Bitboard(checkers)
    }

    /// For each of our pieces pinned against `king_sq`, the set of squares it
    /// may legally move to (the pin ray plus the pinning piece's square).
    fn pinned_pieces(&self, king_sq: Square, us: Color) -> Vec<(Square, u64)> {
        let them = us.opponent();
        let t_idx = them.index();
        let king_idx = king_sq.index();
        let our_occ = self.occupied[us.index()].0;
        let their_occ = self.occupied[t_idx].0;

        let rook_like =
            self.pieces[t_idx][Piece::Rook.index()].0 | self.pieces[t_idx][Piece::Queen.index()].0;
        let bishop_like =
            self.pieces[t_idx][Piece::Bishop.index()].0 | self.pieces[t_idx][Piece::Queen.index()].0;

        // X-ray through our own pieces: which enemy sliders would attack the
        // king if only enemy pieces were on the board.
        let rook_xray = rook_attacks(king_idx, their_occ) & rook_like;
        let bishop_xray = bishop_attacks(king_idx, their_occ) & bishop_like;

        let mut pins = Vec::new();
        for mut sliders in [rook_xray, bishop_xray] {
            while sliders != 0 {
                let pinner_idx = sliders.trailing_zeros() as usize;
                sliders &= sliders - 1;

                let between = ray_between(king_idx, pinner_idx);
                if between & their_occ != 0 {
                    continue; // another enemy piece sits in the way, no pin
                }
                let blockers = between & our_occ;
                if blockers.count_ones() == 1 {
                    let pinned_idx = blockers.trailing_zeros() as usize;
                    let pin_mask = between | (1u64 << pinner_idx);
                    pins.push((Square::from_index(pinned_idx), pin_mask));
                }
            }
        }
        pins
    }

    /// Legality test for a king move: make/unmake, since a king stepping
    /// along the ray of a slider giving check must not see itself as a
    /// blocker on its destination square.
    fn king_move_is_legal(&mut self, m: Move, us: Color) -> bool {
        let info = self.make_move(m);
        let legal = !self.is_in_check(us);
        self.unmake_move(m, info);
        legal
    }

    #[must_use]
    pub fn generate_moves(&mut self) -> MoveList {
        let us = self.current_color();
        let them = us.opponent();
        let pseudo_moves = self.generate_pseudo_moves();
        let mut legal_moves = MoveList::new();

        let Some(king_sq) = self.find_king(us) else {
            return legal_moves;
        };
        let checkers = self.checkers_of(king_sq, us);
        let num_checkers = checkers.popcount();

        if num_checkers >= 2 {
            // Double check: only the king can move.
            for m in &pseudo_moves {
                if m.from() == king_sq && self.king_move_is_legal(*m, us) {
                    legal_moves.push(*m);
                }
            }
            return legal_moves;
        }

        let check_mask = if num_checkers == 1 {
            let checker_idx = checkers.0.trailing_zeros() as usize;
            ray_between(king_sq.index(), checker_idx) | (1u64 << checker_idx)
        } else {
            u64::MAX
        };

        let pins = self.pinned_pieces(king_sq, us);

        for m in &pseudo_moves {
            let m = *m;

            if m.from() == king_sq {
                if self.king_move_is_legal(m, us) {
                    legal_moves.push(m);
                }
                continue;
            }

            if m.is_en_passant() {
                // The pawn that disappears can unmask a horizontal pin on
                // the king's rank; this can't be expressed as a single
                // static pin ray, so fall back to make/unmake here too.
                let info = self.make_move(m);
                let legal = !self.is_in_check(us);
                self.unmake_move(m, info);
                if legal {
                    legal_moves.push(m);
                }
                continue;
            }

            if num_checkers == 1 && (1u64 << m.to().index()) & check_mask == 0 {
                continue;
            }

            if let Some((_, pin_mask)) = pins.iter().find(|(sq, _)| *sq == m.from()) {
                if (1u64 << m.to().index()) & pin_mask == 0 {
                    continue;
                }
            }

            if m.is_castling() {
                let king_start_sq = m.from();
                let king_mid_sq = Square::new(
                    king_start_sq.rank(),
                    usize::midpoint(m.from().file(), m.to().file()),
                );
                let king_end_sq = m.to();

                if self.is_square_attacked(king_start_sq, them)
                    || self.is_square_attacked(king_mid_sq, them)
                    || self.is_square_attacked(king_end_sq, them)
                {
                    continue;
                }
            }

            legal_moves.push(m);
        }
        legal_moves
    }

    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        let color = self.current_color();
        self.is_in_check(color) && self.generate_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        let color = self.current_color();
        !self.is_in_check(color) && self.generate_moves().is_empty()
    }

    /// Filter and collect capture moves from a piece's move list
    fn collect_captures(piece_moves: &MoveList, dest: &mut MoveList) {
        for m in piece_moves {
            if m.is_capture() {
                dest.push(*m);
            }
        }
    }

    pub(crate) fn generate_tactical_moves(&mut self) -> MoveList {
        let current_color = self.current_color();
        let mut pseudo_tactical_moves = MoveList::new();
        let c_idx = current_color.index();

        // Pawns have special tactical move generation (includes promotions)
        for from_idx in self.pieces[c_idx][Piece::Pawn.index()].iter() {
            let from = Square::from_index(from_idx);
            self.generate_pawn_tactical_moves(from, &mut pseudo_tactical_moves);
        }

        // For other pieces, filter captures from their normal moves
        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            for from_idx in self.pieces[c_idx][piece.index()].iter() {
                let from = Square::from_index(from_idx);
                let piece_moves = self.generate_piece_moves(from, piece);
                Self::collect_captures(&piece_moves, &mut pseudo_tactical_moves);
            }
        }

        // Filter for legality
        let mut legal_tactical_moves = MoveList::new();
        for m in &pseudo_tactical_moves {
            let info = self.make_move(*m);
            if !self.is_in_check(current_color) {
                legal_tactical_moves.push(*m);
            }
            self.unmake_move(*m, info);
        }

        legal_tactical_moves
    }

    #[must_use]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in &moves {
            let info = self.make_move(*m);
            nodes += self.perft(depth - 1);
            self.unmake_move(*m, info);
        }

        nodes
    }
}
